//! Query the Spark API from the command line.
//!
//! Prints one JSON object per line for every record returned.
//!
//! # Examples
//! ```sh
//! SPARK_ACCESS_TOKEN=... cargo run -p spark-client --bin spark-cli -- rooms --max 50
//! ```
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use spark_client::api::{PeopleQuery, RoomsQuery};
use spark_client::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use spark_client::records::Record;
use spark_client::{SparkClient, SparkConfig, SparkError};
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// `spark-cli` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "spark-cli", about = "Query the Cisco Spark REST API", version)]
struct CliArgs {
    /// Access token. Falls back to `SPARK_ACCESS_TOKEN` when omitted.
    #[arg(long, value_name = "token")]
    token: Option<String>,
    /// API root URL.
    #[arg(long = "base-url", value_name = "url", default_value = DEFAULT_BASE_URL)]
    base_url: String,
    /// Per-request timeout in seconds.
    #[arg(long, value_name = "seconds", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Show the authenticated person.
    Me,
    /// List rooms the authenticated person belongs to.
    Rooms {
        /// Page size hint.
        #[arg(long)]
        max: Option<u32>,
    },
    /// Look people up by email address.
    People {
        /// Exact email address.
        #[arg(long)]
        email: String,
    },
}

impl CliArgs {
    fn config(&self) -> SparkConfig {
        SparkConfig {
            access_token: self.token.clone(),
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout,
        }
    }
}

fn main() -> ExitCode {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "spark-cli failed");
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Spark(#[from] SparkError),
    #[error("write output: {0}")]
    Io(#[from] io::Error),
}

fn run(args: &CliArgs) -> Result<(), CliError> {
    let client = SparkClient::new(&args.config())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &args.command {
        Command::Me => emit(&mut out, &client.people().me()?)?,
        Command::Rooms { max } => {
            let query = RoomsQuery {
                max: *max,
                ..RoomsQuery::default()
            };
            for room in client.rooms().list(&query)? {
                emit(&mut out, &room?)?;
            }
        }
        Command::People { email } => {
            let query = PeopleQuery {
                email: Some(email.clone()),
                ..PeopleQuery::default()
            };
            for person in client.people().list(&query)? {
                emit(&mut out, &person?)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

fn emit<R: Record>(out: &mut impl Write, record: &R) -> Result<(), CliError> {
    let line = serde_json::to_string(&record.to_value()?)
        .map_err(|err| SparkError::malformed_response(err.to_string()))?;
    writeln!(out, "{line}")?;
    Ok(())
}
