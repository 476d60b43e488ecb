//! Ledger service: the single outward-facing surface of the system.
//!
//! Composes the engine (store + validator) with the voice extraction
//! pipeline. Transports call these methods and nothing else; every store
//! operation is re-exposed here so they carry one dependency.

pub use error::ServiceError;

mod error;

use engine::{Account, CommitCmd, Engine, MoneyCents, Receipt, Transaction};
use voice::Pipeline;

type ResultService<T> = Result<T, ServiceError>;

/// Orchestrates explicit and voice-derived commits over injected components.
///
/// Holds no state of its own: every read goes to the store of record, so
/// concurrent events never see a stale balance or category list.
pub struct LedgerService {
    engine: Engine,
    pipeline: Pipeline,
}

impl LedgerService {
    pub fn new(engine: Engine, pipeline: Pipeline) -> Self {
        Self { engine, pipeline }
    }

    /// Commit a fully specified transaction.
    ///
    /// Straight delegation: validation happens inside the engine's atomic
    /// commit, and its errors surface untranslated.
    pub async fn apply_explicit_transaction(&self, cmd: CommitCmd) -> ResultService<Receipt> {
        let receipt = self.engine.commit_transaction(cmd).await?;
        tracing::info!(
            user_id = receipt.transaction.user_id,
            amount = %receipt.transaction.amount,
            category = receipt.transaction.category,
            balance = %receipt.balance,
            "committed explicit transaction"
        );
        Ok(receipt)
    }

    /// Commit a transaction derived from a voice event.
    ///
    /// Fails fast with [`CategoriesNotConfigured`] when the account's
    /// allow-list is empty: without categories no extraction can yield a
    /// committable candidate, so no external call is worth making. On
    /// success the transcript is recorded as the entry's description.
    ///
    /// [`CategoriesNotConfigured`]: ServiceError::CategoriesNotConfigured
    pub async fn apply_voice_transaction(
        &self,
        user_id: &str,
        event: &str,
    ) -> ResultService<Receipt> {
        let account = self.engine.account(user_id).await?;
        if account.allowed_categories.is_empty() {
            tracing::warn!(user_id, "voice commit refused: no categories configured");
            return Err(ServiceError::CategoriesNotConfigured(account.user_id));
        }

        let candidate = self
            .pipeline
            .run(event, &account.allowed_categories)
            .await
            .inspect_err(|err| tracing::warn!(user_id, %err, "voice extraction failed"))?;

        let amount: MoneyCents = candidate.amount.parse().map_err(ServiceError::Engine)?;
        let receipt = self
            .engine
            .commit_transaction(
                CommitCmd::new(&account.user_id, amount, candidate.category)
                    .description(candidate.transcript),
            )
            .await?;
        tracing::info!(
            user_id,
            amount = %receipt.transaction.amount,
            category = receipt.transaction.category,
            balance = %receipt.balance,
            "committed voice transaction"
        );
        Ok(receipt)
    }

    pub async fn create_account(
        &self,
        user_id: &str,
        initial_balance: MoneyCents,
    ) -> ResultService<Account> {
        Ok(self.engine.create_account(user_id, initial_balance).await?)
    }

    pub async fn account(&self, user_id: &str) -> ResultService<Account> {
        Ok(self.engine.account(user_id).await?)
    }

    pub async fn set_allowed_categories(
        &self,
        user_id: &str,
        categories: &[String],
    ) -> ResultService<Account> {
        Ok(self
            .engine
            .set_allowed_categories(user_id, categories)
            .await?)
    }

    pub async fn adjust_initial_balance(
        &self,
        user_id: &str,
        new_initial_balance: MoneyCents,
    ) -> ResultService<Account> {
        Ok(self
            .engine
            .adjust_initial_balance(user_id, new_initial_balance)
            .await?)
    }

    pub async fn transactions(&self, user_id: &str) -> ResultService<Vec<Transaction>> {
        Ok(self.engine.transactions(user_id).await?)
    }
}
