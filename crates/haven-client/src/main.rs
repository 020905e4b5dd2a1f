//! Haven CLI - command-line portal client
//!
//! Usage:
//!   haven register --name <name> --email <email> --password <pw> --captcha-token <tok>
//!   haven login --email <email> --password <pw> --captcha-token <tok>
//!   haven whoami
//!   haven records list <collection>
//!   haven records create <collection> <json>
//!   haven logout

use clap::{Parser, Subcommand};
use haven_client::{dashboard_path, route, ClientConfig, ClientSession, NewUser, RouteTarget};

#[derive(Parser)]
#[command(name = "haven")]
#[command(about = "Haven support portal CLI")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// victim, counsellor, legal, or admin (defaults to victim)
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        captcha_token: String,
    },
    /// Login with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        captcha_token: String,
    },
    /// Show the current identity and dashboard
    Whoami,
    /// End the current session
    Logout,
    /// Work with stored records
    Records {
        #[command(subcommand)]
        action: RecordsAction,
    },
}

#[derive(Subcommand)]
enum RecordsAction {
    /// List records in a collection
    List { collection: String },
    /// Create a record from a JSON payload
    Create { collection: String, payload: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let mut session = ClientSession::new(ClientConfig::from_env());
    session.restore()?;

    match cli.command {
        Commands::Register {
            name,
            email,
            password,
            role,
            captcha_token,
        } => {
            let user = NewUser {
                name,
                email,
                password,
                role,
            };
            let identity = session.register(&user, &captcha_token).await?;
            println!(
                "Registered {} <{}> as {}",
                identity.name, identity.email, identity.role
            );
        }
        Commands::Login {
            email,
            password,
            captcha_token,
        } => {
            let identity = session.login(&email, &password, &captcha_token).await?;
            println!("Logged in as {} ({})", identity.email, identity.role);
        }
        Commands::Whoami => match session.identity() {
            Some(identity) if route(Some(identity), None) == RouteTarget::Allow => {
                println!(
                    "{} <{}> role={} dashboard={}",
                    identity.name,
                    identity.email,
                    identity.role,
                    dashboard_path(identity.role)
                );
            }
            _ => println!("Not logged in"),
        },
        Commands::Logout => {
            session.logout()?;
            println!("Logged out");
        }
        Commands::Records { action } => match action {
            RecordsAction::List { collection } => {
                let records = session.list_records(&collection).await?;
                println!("{}", serde_json::to_string_pretty(&records)?);
            }
            RecordsAction::Create {
                collection,
                payload,
            } => {
                let payload: serde_json::Value = serde_json::from_str(&payload)?;
                let record = session.create_record(&collection, payload).await?;
                println!("{}", serde_json::to_string_pretty(&record)?);
            }
        },
    }

    Ok(())
}
