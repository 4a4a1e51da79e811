use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, error::ErrorKind};
use serde::Serialize;
use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::application::{
    AppError, BalanceRequest, CreateAccountRequest, CreateUserRequest, DeactivateUserRequest,
    DepositRequest, HistoryRequest, LedgerService, TransferRequest, WithdrawRequest,
};
use crate::config::{Config, LogFormat};
use crate::domain::{Amount, LedgerLayout};
use crate::logging;

/// TinyLedger - in-memory users, accounts and transfers
///
/// Reads one command per line and prints one JSON response per line.
/// State lives only as long as the process.
#[derive(Parser)]
#[command(name = "tinyledger")]
#[command(about = "An in-memory ledger driven by line commands")]
#[command(version)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, env = "TINYLEDGER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Ledger layout for new accounts: "inline" or "history"
    #[arg(long, env = "TINYLEDGER_LAYOUT")]
    pub layout: Option<LedgerLayout>,

    /// Log filter used when RUST_LOG is not set (e.g. "debug")
    #[arg(long, env = "TINYLEDGER_LOG")]
    pub log_level: Option<String>,

    /// Log format: "compact", "pretty" or "json"
    #[arg(long)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a session: one command per line, one JSON response per line
    Shell {
        /// Read commands from this file instead of stdin
        #[arg(long)]
        script: Option<PathBuf>,
    },
}

/// One line of session input.
#[derive(Parser, Debug)]
#[command(name = "tinyledger", no_binary_name = true)]
pub struct SessionLine {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Create a user with one account
    CreateUser { name: String },

    /// Open another account for a user
    CreateAccount { user_id: String },

    /// Deactivate a user
    Deactivate { user_id: String },

    /// Deposit into an account
    Deposit {
        user_id: String,
        account_id: String,
        #[arg(allow_negative_numbers = true)]
        amount: Amount,
    },

    /// Withdraw from an account
    Withdraw {
        user_id: String,
        account_id: String,
        #[arg(allow_negative_numbers = true)]
        amount: Amount,
    },

    /// Transfer between two accounts
    Transfer {
        sender_user_id: String,
        sender_account_id: String,
        receiver_user_id: String,
        receiver_account_id: String,
        #[arg(allow_negative_numbers = true)]
        amount: Amount,
    },

    /// Show an account balance
    Balance { user_id: String, account_id: String },

    /// Show an account's ledger entries
    History { user_id: String, account_id: String },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(layout) = self.layout {
            config.layout = layout;
        }
        if let Some(level) = self.log_level {
            config.log.level = level;
        }
        if let Some(format) = self.log_format {
            config.log.format = format;
        }

        logging::init(&config.log)?;
        info!(layout = %config.layout, "ledger ready");

        let service = LedgerService::in_memory(config.layout);
        let mut stdout = std::io::stdout().lock();

        let Commands::Shell { script } = &self.command;
        match script {
            Some(path) => {
                let file = tokio::fs::File::open(path)
                    .await
                    .with_context(|| format!("Failed to open script {}", path.display()))?;
                run_session(&service, BufReader::new(file), &mut stdout).await
            }
            None => run_session(&service, BufReader::new(tokio::io::stdin()), &mut stdout).await,
        }
    }
}

/// Execute commands from `input` until EOF, writing one response per line.
/// Blank lines and lines starting with `#` are skipped.
pub async fn run_session<R, W>(service: &LedgerService, input: R, output: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();

    while let Some(raw) = lines.next_line().await? {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some(words) = shlex::split(line) else {
            writeln!(output, "{}", json!({ "error": "unbalanced quotes" }))?;
            continue;
        };

        match SessionLine::try_parse_from(words) {
            Ok(parsed) => {
                let response = match execute(service, parsed.command).await {
                    Ok(value) => value,
                    Err(err) => {
                        debug!(error = %err, "command failed");
                        json!({ "error": err.to_string() })
                    }
                };
                writeln!(output, "{response}")?;
            }
            Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                write!(output, "{}", err.render())?;
            }
            Err(err) => {
                let message = err.render().to_string();
                writeln!(output, "{}", json!({ "error": message.trim() }))?;
            }
        }
    }

    output.flush()?;
    Ok(())
}

/// Run a single command against the service and render its JSON response.
pub async fn execute(service: &LedgerService, command: SessionCommand) -> Result<Value, AppError> {
    let value = match command {
        SessionCommand::CreateUser { name } => {
            render(service.create_user(CreateUserRequest { name }).await?)
        }
        SessionCommand::CreateAccount { user_id } => {
            render(service.create_account(CreateAccountRequest { user_id }).await?)
        }
        SessionCommand::Deactivate { user_id } => {
            service
                .deactivate_user(DeactivateUserRequest { user_id })
                .await?;
            json!({ "status": "ok" })
        }
        SessionCommand::Deposit {
            user_id,
            account_id,
            amount,
        } => render(
            service
                .deposit(DepositRequest {
                    user_id,
                    account_id,
                    amount,
                })
                .await?,
        ),
        SessionCommand::Withdraw {
            user_id,
            account_id,
            amount,
        } => render(
            service
                .withdraw(WithdrawRequest {
                    user_id,
                    account_id,
                    amount,
                })
                .await?,
        ),
        SessionCommand::Transfer {
            sender_user_id,
            sender_account_id,
            receiver_user_id,
            receiver_account_id,
            amount,
        } => render(
            service
                .transfer(TransferRequest {
                    sender_user_id,
                    receiver_user_id,
                    sender_account_id,
                    receiver_account_id,
                    amount,
                })
                .await?,
        ),
        SessionCommand::Balance {
            user_id,
            account_id,
        } => render(
            service
                .balance(BalanceRequest {
                    user_id,
                    account_id,
                })
                .await?,
        ),
        SessionCommand::History {
            user_id,
            account_id,
        } => render(
            service
                .history(HistoryRequest {
                    user_id,
                    account_id,
                })
                .await?,
        ),
    };

    Ok(value)
}

fn render<T: Serialize>(response: T) -> Value {
    serde_json::to_value(response).unwrap_or_else(|err| json!({ "error": err.to_string() }))
}
