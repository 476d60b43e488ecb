//! `ledgerd` - operator CLI and composition root.
//!
//! Wires settings, database, engine, capability adapters and the ledger
//! service together, and exposes every service operation as a subcommand so
//! the whole system is drivable without a chat transport.

use std::{error::Error, sync::Arc, time::Duration};

use clap::{Args, Parser, Subcommand};
use sea_orm::{Database, DatabaseConnection};

use engine::{Account, CommitCmd, Engine, MoneyCents, Transaction};
use migration::MigratorTrait;
use service::LedgerService;
use voice::{
    AudioSource, FsAudioSource, OpenAiExtractor, OpenAiTranscriber, Pipeline, TelegramAudioSource,
};

mod settings;

#[derive(Parser, Debug)]
#[command(name = "ledgerd")]
#[command(about = "Personal ledger: accounts, categorized transactions, voice commits")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./ledger.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage accounts.
    Account(AccountArgs),
    /// Manage the category allow-list.
    Categories(CategoriesArgs),
    /// Balance corrections.
    Balance(BalanceArgs),
    /// Record and inspect transactions.
    Tx(TxArgs),
}

#[derive(Args, Debug)]
struct AccountArgs {
    #[command(subcommand)]
    command: AccountCommand,
}

#[derive(Subcommand, Debug)]
enum AccountCommand {
    /// Create an account (fails if it already exists).
    Create {
        user_id: String,
        /// Opening balance, e.g. "100.00". Defaults to 0.
        #[arg(long, default_value = "0")]
        initial_balance: String,
    },
    /// Show balances and the configured categories.
    Show { user_id: String },
}

#[derive(Args, Debug)]
struct CategoriesArgs {
    #[command(subcommand)]
    command: CategoriesCommand,
}

#[derive(Subcommand, Debug)]
enum CategoriesCommand {
    /// Replace the whole allow-list.
    Set {
        user_id: String,
        #[arg(required = true)]
        categories: Vec<String>,
    },
}

#[derive(Args, Debug)]
struct BalanceArgs {
    #[command(subcommand)]
    command: BalanceCommand,
}

#[derive(Subcommand, Debug)]
enum BalanceCommand {
    /// Rewrite the opening balance; the running balance shifts by the delta.
    Adjust {
        user_id: String,
        new_initial_balance: String,
    },
}

#[derive(Args, Debug)]
struct TxArgs {
    #[command(subcommand)]
    command: TxCommand,
}

#[derive(Subcommand, Debug)]
enum TxCommand {
    /// Commit an explicit transaction.
    Add {
        user_id: String,
        /// Signed amount: negative = outflow, positive = inflow.
        amount: String,
        category: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// List the full transaction history, oldest first.
    List { user_id: String },
    /// Commit a transaction extracted from a voice recording.
    Voice {
        user_id: String,
        /// Local audio file to run through the pipeline.
        #[arg(long, conflicts_with = "file_id")]
        file: Option<String>,
        /// Telegram voice-message file id to download instead.
        #[arg(long)]
        file_id: Option<String>,
    },
}

fn parse_amount(raw: &str) -> MoneyCents {
    match raw.parse() {
        Ok(amount) => amount,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    }
}

fn print_account(account: &Account) {
    println!("user:             {}", account.user_id);
    println!("initial balance:  {}", account.initial_balance);
    println!("current balance:  {}", account.current_balance);
    println!(
        "categories:       {}",
        if account.allowed_categories.is_empty() {
            "(none)".to_string()
        } else {
            account.allowed_categories.join(", ")
        }
    );
}

fn print_transaction(tx: &Transaction) {
    let description = tx.description.as_deref().unwrap_or("");
    println!(
        "{}  {:>12}  {}  {}",
        tx.created_at.format("%Y-%m-%d %H:%M:%S"),
        tx.amount.to_string(),
        tx.category,
        description
    );
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Build the full voice stack from settings. The audio source depends on how
/// the event was given: a local file needs no credentials, a Telegram file id
/// needs the bot token.
fn build_pipeline(
    settings: &settings::Settings,
    use_telegram: bool,
) -> Result<Pipeline, Box<dyn Error + Send + Sync>> {
    let Some(openai) = &settings.openai else {
        return Err("voice commits need [openai] settings (api_key)".into());
    };

    let client = reqwest::Client::new();
    let audio: Arc<dyn AudioSource> = if use_telegram {
        let Some(telegram) = &settings.telegram else {
            return Err("--file-id needs [telegram] settings (token)".into());
        };
        Arc::new(TelegramAudioSource::new(client.clone(), &telegram.token))
    } else {
        Arc::new(FsAudioSource)
    };
    let transcriber = Arc::new(OpenAiTranscriber::new(
        client.clone(),
        &openai.api_key,
        &openai.transcription_model,
    ));
    let extractor = Arc::new(OpenAiExtractor::new(
        client,
        &openai.api_key,
        &openai.extraction_model,
    ));

    Ok(Pipeline::new(audio, transcriber, extractor)
        .stage_timeout(Duration::from_secs(settings.voice.stage_timeout_secs)))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "ledgerd={level},engine={level},voice={level},service={level}",
            level = settings.app.level
        ))
        .init();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::Account(AccountArgs {
            command:
                AccountCommand::Create {
                    user_id,
                    initial_balance,
                },
        }) => {
            let initial_balance = parse_amount(&initial_balance);
            match engine.create_account(&user_id, initial_balance).await {
                Ok(account) => print_account(&account),
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(1);
                }
            }
        }
        Command::Account(AccountArgs {
            command: AccountCommand::Show { user_id },
        }) => match engine.account(&user_id).await {
            Ok(account) => print_account(&account),
            Err(err) => {
                eprintln!("{err}");
                std::process::exit(1);
            }
        },
        Command::Categories(CategoriesArgs {
            command:
                CategoriesCommand::Set {
                    user_id,
                    categories,
                },
        }) => match engine.set_allowed_categories(&user_id, &categories).await {
            Ok(account) => print_account(&account),
            Err(err) => {
                eprintln!("{err}");
                std::process::exit(1);
            }
        },
        Command::Balance(BalanceArgs {
            command:
                BalanceCommand::Adjust {
                    user_id,
                    new_initial_balance,
                },
        }) => {
            let new_initial_balance = parse_amount(&new_initial_balance);
            match engine
                .adjust_initial_balance(&user_id, new_initial_balance)
                .await
            {
                Ok(account) => print_account(&account),
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(1);
                }
            }
        }
        Command::Tx(TxArgs {
            command:
                TxCommand::Add {
                    user_id,
                    amount,
                    category,
                    description,
                },
        }) => {
            let amount = parse_amount(&amount);
            let mut cmd = CommitCmd::new(user_id, amount, category);
            if let Some(description) = description {
                cmd = cmd.description(description);
            }
            match engine.commit_transaction(cmd).await {
                Ok(receipt) => {
                    print_transaction(&receipt.transaction);
                    println!("balance: {}", receipt.balance);
                }
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(1);
                }
            }
        }
        Command::Tx(TxArgs {
            command: TxCommand::List { user_id },
        }) => match engine.transactions(&user_id).await {
            Ok(transactions) => {
                if transactions.is_empty() {
                    println!("no transactions");
                }
                for tx in &transactions {
                    print_transaction(tx);
                }
            }
            Err(err) => {
                eprintln!("{err}");
                std::process::exit(1);
            }
        },
        Command::Tx(TxArgs {
            command:
                TxCommand::Voice {
                    user_id,
                    file,
                    file_id,
                },
        }) => {
            let (event, use_telegram) = match (file, file_id) {
                (Some(path), None) => (path, false),
                (None, Some(id)) => (id, true),
                _ => {
                    eprintln!("exactly one of --file or --file-id is required");
                    std::process::exit(2);
                }
            };

            let pipeline = build_pipeline(&settings, use_telegram)?;
            let ledger = LedgerService::new(engine, pipeline);
            match ledger.apply_voice_transaction(&user_id, &event).await {
                Ok(receipt) => {
                    print_transaction(&receipt.transaction);
                    println!("balance: {}", receipt.balance);
                }
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
