pub use accounts::Account;
pub use commands::CommitCmd;
pub use error::EngineError;
pub use money::MoneyCents;
pub use ops::{Engine, EngineBuilder, Receipt};
pub use transactions::Transaction;
pub use validate::validate_candidate;

mod accounts;
mod commands;
mod error;
mod money;
mod ops;
mod transactions;
mod validate;

type ResultEngine<T> = Result<T, EngineError>;
