//! Account primitives.
//!
//! An `Account` is the per-user ledger head: the opening balance, the running
//! balance, and the category allow-list that gates commits. The running
//! balance always equals the opening balance plus the sum of all recorded
//! transaction amounts.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub user_id: String,
    pub initial_balance: MoneyCents,
    pub current_balance: MoneyCents,
    /// Allowed category labels, in the order the owner configured them.
    pub allowed_categories: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    pub initial_balance: i64,
    pub current_balance: i64,
    /// JSON array of category labels.
    pub allowed_categories: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub(crate) fn encode_categories(categories: &[String]) -> ResultEngine<String> {
    serde_json::to_string(categories)
        .map_err(|err| EngineError::Corrupted(format!("allowed_categories encode: {err}")))
}

fn decode_categories(raw: &str) -> ResultEngine<Vec<String>> {
    serde_json::from_str(raw)
        .map_err(|err| EngineError::Corrupted(format!("allowed_categories decode: {err}")))
}

impl TryFrom<Model> for Account {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            allowed_categories: decode_categories(&model.allowed_categories)?,
            user_id: model.user_id,
            initial_balance: MoneyCents::new(model.initial_balance),
            current_balance: MoneyCents::new(model.current_balance),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
