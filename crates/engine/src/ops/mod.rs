use std::collections::HashSet;

use sea_orm::DatabaseConnection;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{EngineError, ResultEngine};

mod access;
mod accounts;
mod transactions;

pub use transactions::Receipt;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

fn normalize_user_id(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidUserId(
            "user id must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Case- and diacritic-insensitive form of a label, used only to spot
/// near-duplicate categories. Stored labels keep their display form.
fn fold_label(label: &str) -> String {
    label
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Trims labels and rejects empty or duplicate entries, preserving order.
fn normalize_categories(categories: &[String]) -> ResultEngine<Vec<String>> {
    let mut seen = HashSet::with_capacity(categories.len());
    let mut out = Vec::with_capacity(categories.len());
    for raw in categories {
        let label = raw.trim();
        if label.is_empty() {
            return Err(EngineError::InvalidCategory(
                "category label must not be empty".to_string(),
            ));
        }
        if !seen.insert(fold_label(label)) {
            return Err(EngineError::InvalidCategory(format!(
                "duplicate category: {label}"
            )));
        }
        out.push(label.to_string());
    }
    Ok(out)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
