use std::{sync::Arc, time::Duration};

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use uuid::Uuid;

use engine::{CommitCmd, Engine, EngineError, MoneyCents};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn engine_with_file_db() -> (Engine, DatabaseConnection, String, std::path::PathBuf) {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_dbs");
    std::fs::create_dir_all(&root).unwrap();

    let path = root.join(format!("ledger_{}.db", Uuid::new_v4()));
    let url = format!("sqlite:{}?mode=rwc", path.display());

    let db = Database::connect(&url).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();

    (engine, db, url, path)
}

fn labels(raw: &[&str]) -> Vec<String> {
    raw.iter().map(ToString::to_string).collect()
}

async fn account_with_categories(engine: &Engine, user_id: &str, cents: i64, cats: &[&str]) {
    engine
        .create_account(user_id, MoneyCents::new(cents))
        .await
        .unwrap();
    engine
        .set_allowed_categories(user_id, &labels(cats))
        .await
        .unwrap();
}

#[tokio::test]
async fn commit_moves_balance_and_appends_entry() {
    let (engine, _db) = engine_with_db().await;
    account_with_categories(&engine, "alice", 10_000, &["food", "rent"]).await;

    let receipt = engine
        .commit_transaction(
            CommitCmd::new("alice", MoneyCents::new(-2000), "food").description("groceries"),
        )
        .await
        .unwrap();

    assert_eq!(receipt.balance, MoneyCents::new(8000));
    assert_eq!(receipt.transaction.amount, MoneyCents::new(-2000));
    assert_eq!(receipt.transaction.category, "food");
    assert_eq!(
        receipt.transaction.description.as_deref(),
        Some("groceries")
    );

    let account = engine.account("alice").await.unwrap();
    assert_eq!(account.current_balance, MoneyCents::new(8000));
    assert_eq!(account.initial_balance, MoneyCents::new(10_000));

    let history = engine.transactions("alice").await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0], receipt.transaction);
}

#[tokio::test]
async fn receipt_reports_post_commit_balance() {
    let (engine, _db) = engine_with_db().await;
    account_with_categories(&engine, "alice", 0, &["salary", "food"]).await;

    let amounts = [150_000i64, -2000, -350, 4000];
    let mut expected = 0i64;
    for (i, cents) in amounts.iter().enumerate() {
        expected += cents;
        let category = if *cents > 0 { "salary" } else { "food" };
        let receipt = engine
            .commit_transaction(CommitCmd::new("alice", MoneyCents::new(*cents), category))
            .await
            .unwrap();
        assert_eq!(receipt.balance, MoneyCents::new(expected), "commit #{i}");
    }
}

#[tokio::test]
async fn unlisted_category_is_rejected_and_nothing_changes() {
    let (engine, _db) = engine_with_db().await;
    account_with_categories(&engine, "alice", 10_000, &["food"]).await;

    let err = engine
        .commit_transaction(CommitCmd::new("alice", MoneyCents::new(150_000), "salary"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::CategoryNotAllowed("salary".to_string()));

    let account = engine.account("alice").await.unwrap();
    assert_eq!(account.current_balance, MoneyCents::new(10_000));
    assert!(engine.transactions("alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn category_match_is_exact_at_commit_time() {
    let (engine, _db) = engine_with_db().await;
    account_with_categories(&engine, "alice", 10_000, &["Food"]).await;

    let err = engine
        .commit_transaction(CommitCmd::new("alice", MoneyCents::new(-500), "food"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::CategoryNotAllowed("food".to_string()));
}

#[tokio::test]
async fn commit_checks_the_live_allow_list() {
    let (engine, _db) = engine_with_db().await;
    account_with_categories(&engine, "alice", 10_000, &["food"]).await;

    // Replacing the list removes "food"; a commit that still names it must
    // fail against the new list.
    engine
        .set_allowed_categories("alice", &labels(&["rent"]))
        .await
        .unwrap();

    let err = engine
        .commit_transaction(CommitCmd::new("alice", MoneyCents::new(-500), "food"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::CategoryNotAllowed("food".to_string()));
}

#[tokio::test]
async fn empty_allow_list_rejects_every_commit() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_account("alice", MoneyCents::new(10_000))
        .await
        .unwrap();

    let err = engine
        .commit_transaction(CommitCmd::new("alice", MoneyCents::new(-500), "food"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::CategoryNotAllowed("food".to_string()));
}

#[tokio::test]
async fn zero_amount_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    account_with_categories(&engine, "alice", 10_000, &["food"]).await;

    let err = engine
        .commit_transaction(CommitCmd::new("alice", MoneyCents::ZERO, "food"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidAmount("amount must not be zero".to_string())
    );
    assert!(engine.transactions("alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn commit_that_would_overflow_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    account_with_categories(&engine, "alice", i64::MAX - 10, &["salary"]).await;

    let err = engine
        .commit_transaction(CommitCmd::new("alice", MoneyCents::new(100), "salary"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Overflow("current balance for alice".to_string())
    );

    // Nothing moved: the balance never wraps and no entry is recorded.
    let account = engine.account("alice").await.unwrap();
    assert_eq!(account.current_balance, MoneyCents::new(i64::MAX - 10));
    assert!(engine.transactions("alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn commit_requires_account() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .commit_transaction(CommitCmd::new("ghost", MoneyCents::new(-500), "food"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::AccountNotFound("ghost".to_string()));
}

#[tokio::test]
async fn blank_description_is_dropped() {
    let (engine, _db) = engine_with_db().await;
    account_with_categories(&engine, "alice", 10_000, &["food"]).await;

    let receipt = engine
        .commit_transaction(
            CommitCmd::new("alice", MoneyCents::new(-500), "food").description("  lunch  "),
        )
        .await
        .unwrap();
    assert_eq!(receipt.transaction.description.as_deref(), Some("lunch"));

    let receipt = engine
        .commit_transaction(
            CommitCmd::new("alice", MoneyCents::new(-500), "food").description("   "),
        )
        .await
        .unwrap();
    assert_eq!(receipt.transaction.description, None);
}

#[tokio::test]
async fn history_is_ordered_oldest_first() {
    let (engine, _db) = engine_with_db().await;
    account_with_categories(&engine, "alice", 0, &["food", "salary"]).await;

    for cents in [100i64, -200, 300] {
        let category = if cents > 0 { "salary" } else { "food" };
        engine
            .commit_transaction(CommitCmd::new("alice", MoneyCents::new(cents), category))
            .await
            .unwrap();
        // Keep commit timestamps distinct.
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let history = engine.transactions("alice").await.unwrap();
    let amounts: Vec<i64> = history.iter().map(|tx| tx.amount.cents()).collect();
    assert_eq!(amounts, vec![100, -200, 300]);
    assert!(history.windows(2).all(|w| w[0].created_at <= w[1].created_at));
}

#[tokio::test]
async fn listing_requires_account() {
    let (engine, _db) = engine_with_db().await;

    let err = engine.transactions("ghost").await.unwrap_err();
    assert_eq!(err, EngineError::AccountNotFound("ghost".to_string()));
}

#[tokio::test]
async fn balance_always_equals_initial_plus_history() {
    let (engine, _db) = engine_with_db().await;
    account_with_categories(&engine, "alice", 7700, &["food", "salary"]).await;

    for cents in [-1200i64, 50_000, -999, -1, 2500, -42, 7, -3000] {
        let category = if cents > 0 { "salary" } else { "food" };
        engine
            .commit_transaction(CommitCmd::new("alice", MoneyCents::new(cents), category))
            .await
            .unwrap();
    }

    let account = engine.account("alice").await.unwrap();
    let history_sum: i64 = engine
        .transactions("alice")
        .await
        .unwrap()
        .iter()
        .map(|tx| tx.amount.cents())
        .sum();
    assert_eq!(
        account.current_balance.cents(),
        account.initial_balance.cents() + history_sum
    );
}

#[tokio::test]
async fn concurrent_commits_lose_no_updates() {
    // One pooled connection: SQLite is a single-writer store anyway, and a
    // larger pool would hand each task its own private in-memory database.
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = Database::connect(options).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Arc::new(Engine::builder().database(db).build().await.unwrap());

    account_with_categories(&engine, "alice", 10_000, &["salary"]).await;

    let mut tasks = tokio::task::JoinSet::new();
    for i in 1..=10i64 {
        let engine = engine.clone();
        tasks.spawn(async move {
            engine
                .commit_transaction(CommitCmd::new("alice", MoneyCents::new(i * 100), "salary"))
                .await
        });
    }
    while let Some(joined) = tasks.join_next().await {
        joined.unwrap().unwrap();
    }

    // 10_000 + (100 + 200 + ... + 1000)
    let account = engine.account("alice").await.unwrap();
    assert_eq!(account.current_balance, MoneyCents::new(15_500));
    assert_eq!(engine.transactions("alice").await.unwrap().len(), 10);
}

#[tokio::test]
async fn restart_reads_same_state() {
    let (engine, db, url, path) = engine_with_file_db().await;
    engine
        .create_account("alice", MoneyCents::new(10_000))
        .await
        .unwrap();
    engine
        .set_allowed_categories("alice", &labels(&["food"]))
        .await
        .unwrap();
    engine
        .commit_transaction(CommitCmd::new("alice", MoneyCents::new(-2000), "food"))
        .await
        .unwrap();

    drop(engine);
    drop(db);

    let db2 = Database::connect(&url).await.unwrap();
    let engine2 = Engine::builder()
        .database(db2.clone())
        .build()
        .await
        .unwrap();

    let account = engine2.account("alice").await.unwrap();
    assert_eq!(account.current_balance, MoneyCents::new(8000));
    assert_eq!(account.allowed_categories, labels(&["food"]));

    let history = engine2.transactions("alice").await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].amount, MoneyCents::new(-2000));

    drop(db2);
    let _ = std::fs::remove_file(path);
}
