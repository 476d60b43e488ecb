//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists.

use crate::MoneyCents;

/// Commit one transaction against an account.
#[derive(Clone, Debug)]
pub struct CommitCmd {
    pub user_id: String,
    pub amount: MoneyCents,
    pub category: String,
    pub description: Option<String>,
}

impl CommitCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, amount: MoneyCents, category: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            amount,
            category: category.into(),
            description: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
