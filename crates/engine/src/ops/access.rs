use sea_orm::{DatabaseTransaction, prelude::*};

use crate::{EngineError, ResultEngine, accounts};

use super::Engine;

impl Engine {
    /// Fetch the account row for `user_id`, failing with [`AccountNotFound`]
    /// when it does not exist.
    ///
    /// Every operation goes through this inside its own DB transaction, so
    /// later statements in that transaction see the same row.
    ///
    /// [`AccountNotFound`]: EngineError::AccountNotFound
    pub(super) async fn require_account(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
    ) -> ResultEngine<accounts::Model> {
        accounts::Entity::find_by_id(user_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::AccountNotFound(user_id.to_string()))
    }
}
