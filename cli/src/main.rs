//! Command-line administration for the users REST API.
//!
//! Every subcommand goes through the same `users` library the browser client
//! uses, so status classification and validation errors read identically.


mod output;
mod transport;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use users::config::DEFAULT_BASE_URL;
use users::{ApiConfig, ApiError, ConfigError, CreateUserInput, RemoveOutcome, UpdateUserInput, UserQueries};

use crate::transport::ReqwestTransport;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid base URL: {0}")]
    Config(#[from] ConfigError),
    #[error("http client setup failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("nothing to update; pass at least one of --name, --email, --about, --password")]
    NothingToUpdate,
}

#[derive(Parser, Debug)]
#[command(name = "users-cli", about = "Users REST API command-line client")]
struct Cli {
    #[arg(long, env = "USERS_API_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum Format {
    #[default]
    Table,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every user.
    List {
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// Show one user as JSON.
    Get { id: String },
    /// Create a user.
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        about: Option<String>,
    },
    /// Update the given fields of a user. An empty value clears `name`/`about`.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        about: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
    /// Delete a user. Deleting a user that is already gone succeeds.
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ApiConfig::parse(&cli.base_url)?;
    let client = reqwest::Client::builder().build()?;
    let queries = UserQueries::new(ReqwestTransport::new(client, config.base_url));

    if let Err(error) = run(&queries, cli.command).await {
        tracing::error!(%error, "command failed");
        return Err(error);
    }
    Ok(())
}

async fn run(queries: &UserQueries<ReqwestTransport>, command: Command) -> Result<(), CliError> {
    match command {
        Command::List { format } => {
            let users = queries.list().await?;
            match format {
                Format::Table => print!("{}", output::users_table(&users)),
                Format::Json => print_json(&users)?,
            }
        }
        Command::Get { id } => print_json(&queries.get(&id).await?)?,
        Command::Create {
            email,
            password,
            name,
            about,
        } => {
            let input = CreateUserInput {
                name,
                email,
                about,
                password,
            };
            print_json(&queries.create(&input).await?)?;
        }
        Command::Update {
            id,
            name,
            email,
            about,
            password,
        } => {
            let input = update_input(name, email, about, password)?;
            print_json(&queries.update(&id, &input).await?)?;
        }
        Command::Delete { id } => match queries.remove(&id).await? {
            RemoveOutcome::Deleted => println!("deleted {id}"),
            RemoveOutcome::AlreadyGone => println!("{id} was already deleted"),
        },
    }
    Ok(())
}

fn update_input(
    name: Option<String>,
    email: Option<String>,
    about: Option<String>,
    password: Option<String>,
) -> Result<UpdateUserInput, CliError> {
    let input = UpdateUserInput {
        name,
        email,
        about,
        password,
    };
    if input.is_empty() {
        return Err(CliError::NothingToUpdate);
    }
    Ok(input)
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
