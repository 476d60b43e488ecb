use chrono::Utc;
use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr};

use crate::{
    Account, CommitCmd, EngineError, MoneyCents, ResultEngine, Transaction, accounts,
    transactions, validate_candidate,
};

use super::{Engine, normalize_optional_text, normalize_user_id, with_tx};

/// Outcome of a commit: the stored entry plus the balance it produced.
#[derive(Clone, Debug, PartialEq)]
pub struct Receipt {
    pub transaction: Transaction,
    pub balance: MoneyCents,
}

impl Engine {
    /// Append one transaction and move the running balance by its amount.
    ///
    /// The allow-list check runs inside the same database transaction as the
    /// balance update and the insert, so a concurrent
    /// [`set_allowed_categories`] cannot slip a disallowed category through.
    /// The balance update is relative (`current_balance = current_balance +
    /// amount`), never a write of a precomputed total.
    ///
    /// [`set_allowed_categories`]: Engine::set_allowed_categories
    pub async fn commit_transaction(&self, cmd: CommitCmd) -> ResultEngine<Receipt> {
        let CommitCmd {
            user_id,
            amount,
            category,
            description,
        } = cmd;
        let user_id = normalize_user_id(&user_id)?;
        let description = normalize_optional_text(description.as_deref());
        with_tx!(self, |db_tx| {
            let account = Account::try_from(self.require_account(&db_tx, &user_id).await?)?;
            validate_candidate(amount, &category, &account.allowed_categories)?;
            let balance = account
                .current_balance
                .checked_add(amount)
                .ok_or_else(|| EngineError::Overflow(format!("current balance for {user_id}")))?;

            let now = Utc::now();
            accounts::Entity::update_many()
                .col_expr(
                    accounts::Column::CurrentBalance,
                    Expr::col(accounts::Column::CurrentBalance).add(amount.cents()),
                )
                .col_expr(accounts::Column::UpdatedAt, Expr::value(now))
                .filter(accounts::Column::UserId.eq(user_id.clone()))
                .exec(&db_tx)
                .await?;

            let tx = Transaction::new(user_id, amount, category, description, now);
            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;

            Ok(Receipt {
                transaction: tx,
                balance,
            })
        })
    }

    /// Full transaction history for `user_id`, oldest first.
    ///
    /// Ties on `created_at` fall back to the entry id so the order is stable.
    pub async fn transactions(&self, user_id: &str) -> ResultEngine<Vec<Transaction>> {
        let user_id = normalize_user_id(user_id)?;
        with_tx!(self, |db_tx| {
            self.require_account(&db_tx, &user_id).await?;
            let models = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id.clone()))
                .order_by_asc(transactions::Column::CreatedAt)
                .order_by_asc(transactions::Column::Id)
                .all(&db_tx)
                .await?;

            let mut out = Vec::with_capacity(models.len());
            for model in models {
                out.push(Transaction::try_from(model)?);
            }
            Ok(out)
        })
    }
}
