use chrono::Utc;
use sea_orm::{ActiveValue, SqlErr, TransactionTrait, prelude::*};

use crate::{Account, EngineError, MoneyCents, ResultEngine, accounts};

use super::{Engine, normalize_categories, normalize_user_id, with_tx};

impl Engine {
    /// Create the account for `user_id` with the given opening balance.
    ///
    /// The running balance starts equal to the opening balance and the
    /// category allow-list starts empty. Creating the same account twice
    /// fails with [`AccountAlreadyExists`].
    ///
    /// [`AccountAlreadyExists`]: EngineError::AccountAlreadyExists
    pub async fn create_account(
        &self,
        user_id: &str,
        initial_balance: MoneyCents,
    ) -> ResultEngine<Account> {
        let user_id = normalize_user_id(user_id)?;
        let now = Utc::now();
        let model = accounts::ActiveModel {
            user_id: ActiveValue::Set(user_id.clone()),
            initial_balance: ActiveValue::Set(initial_balance.cents()),
            current_balance: ActiveValue::Set(initial_balance.cents()),
            allowed_categories: ActiveValue::Set(accounts::encode_categories(&[])?),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };
        with_tx!(self, |db_tx| {
            // The primary key races with concurrent creates; let the unique
            // constraint decide instead of a read-then-insert.
            let inserted = match model.insert(&db_tx).await {
                Ok(inserted) => inserted,
                Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                    return Err(EngineError::AccountAlreadyExists(user_id));
                }
                Err(err) => return Err(err.into()),
            };
            Account::try_from(inserted)
        })
    }

    /// Return the account for `user_id`.
    pub async fn account(&self, user_id: &str) -> ResultEngine<Account> {
        let user_id = normalize_user_id(user_id)?;
        with_tx!(self, |db_tx| {
            let model = self.require_account(&db_tx, &user_id).await?;
            Account::try_from(model)
        })
    }

    /// Replace the whole category allow-list for `user_id`.
    ///
    /// Labels are trimmed; empty or duplicate labels (compared without case
    /// and diacritics) are rejected before anything is written. Recorded
    /// transactions are untouched: the new list only gates future commits.
    pub async fn set_allowed_categories(
        &self,
        user_id: &str,
        categories: &[String],
    ) -> ResultEngine<Account> {
        let user_id = normalize_user_id(user_id)?;
        let categories = normalize_categories(categories)?;
        with_tx!(self, |db_tx| {
            let model = self.require_account(&db_tx, &user_id).await?;
            let update = accounts::ActiveModel {
                user_id: ActiveValue::Set(model.user_id),
                allowed_categories: ActiveValue::Set(accounts::encode_categories(&categories)?),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            };
            let updated = update.update(&db_tx).await?;
            Account::try_from(updated)
        })
    }

    /// Rewrite the opening balance, shifting the running balance by the same
    /// delta so the recorded history still adds up.
    pub async fn adjust_initial_balance(
        &self,
        user_id: &str,
        new_initial_balance: MoneyCents,
    ) -> ResultEngine<Account> {
        let user_id = normalize_user_id(user_id)?;
        with_tx!(self, |db_tx| {
            let model = self.require_account(&db_tx, &user_id).await?;
            let delta = new_initial_balance
                .checked_sub(MoneyCents::new(model.initial_balance))
                .ok_or_else(|| {
                    EngineError::Overflow(format!("initial balance delta for {user_id}"))
                })?;
            let current = MoneyCents::new(model.current_balance)
                .checked_add(delta)
                .ok_or_else(|| EngineError::Overflow(format!("current balance for {user_id}")))?;
            let update = accounts::ActiveModel {
                user_id: ActiveValue::Set(model.user_id),
                initial_balance: ActiveValue::Set(new_initial_balance.cents()),
                current_balance: ActiveValue::Set(current.cents()),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            };
            let updated = update.update(&db_tx).await?;
            Account::try_from(updated)
        })
    }
}
