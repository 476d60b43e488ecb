//! Candidate validation.
//!
//! Pure decision logic over a proposed `(amount, category)` pair and an
//! account allow-list. The commit path re-runs it inside the database
//! transaction, so the decision is always taken against live state.

use crate::{EngineError, MoneyCents, ResultEngine};

/// Accepts or rejects a candidate transaction against an allow-list.
///
/// Rejections:
/// - zero amount ([`InvalidAmount`]): a no-op entry is never recorded
/// - category missing from `allowed` ([`CategoryNotAllowed`]); the comparison
///   is exact, `"Food"` does not match `"food"`
///
/// [`InvalidAmount`]: EngineError::InvalidAmount
/// [`CategoryNotAllowed`]: EngineError::CategoryNotAllowed
pub fn validate_candidate(
    amount: MoneyCents,
    category: &str,
    allowed: &[String],
) -> ResultEngine<()> {
    if amount.is_zero() {
        return Err(EngineError::InvalidAmount(
            "amount must not be zero".to_string(),
        ));
    }
    if !allowed.iter().any(|label| label == category) {
        return Err(EngineError::CategoryNotAllowed(category.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> Vec<String> {
        vec!["food".to_string(), "rent".to_string()]
    }

    #[test]
    fn accepts_listed_category() {
        assert!(validate_candidate(MoneyCents::new(-2000), "food", &allowed()).is_ok());
        assert!(validate_candidate(MoneyCents::new(150_000), "rent", &allowed()).is_ok());
    }

    #[test]
    fn rejects_zero_amount() {
        assert_eq!(
            validate_candidate(MoneyCents::ZERO, "food", &allowed()),
            Err(EngineError::InvalidAmount(
                "amount must not be zero".to_string()
            ))
        );
    }

    #[test]
    fn rejects_unlisted_category() {
        assert_eq!(
            validate_candidate(MoneyCents::new(500), "salary", &allowed()),
            Err(EngineError::CategoryNotAllowed("salary".to_string()))
        );
    }

    #[test]
    fn rejects_any_category_when_list_is_empty() {
        assert_eq!(
            validate_candidate(MoneyCents::new(500), "food", &[]),
            Err(EngineError::CategoryNotAllowed("food".to_string()))
        );
    }

    #[test]
    fn comparison_is_case_sensitive() {
        assert_eq!(
            validate_candidate(MoneyCents::new(-100), "Food", &allowed()),
            Err(EngineError::CategoryNotAllowed("Food".to_string()))
        );
    }
}
