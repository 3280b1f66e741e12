//! NexaFlow CLI - decentralized content management from the terminal

use anyhow::Context;
use clap::{Parser, Subcommand};
use nexaflow_cli::{commands, format::parse_tags, LocalStore, UploadOptions};
use nexaflow_client::{Config, DispatchMode, NexaflowClient, DEFAULT_API_URL};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "nexaflow")]
#[command(about = "NexaFlow CLI - decentralized content management")]
#[command(version)]
struct Args {
    /// NexaFlow API URL
    #[arg(long, default_value = DEFAULT_API_URL, env = "NEXAFLOW_API_URL", global = true)]
    api_url: String,

    /// Directory holding login and space selection
    #[arg(long, env = "NEXAFLOW_CONFIG_DIR", global = true)]
    config_dir: Option<PathBuf>,

    /// Request dispatch: simulated, live or fallback
    #[arg(long, default_value = "simulated", env = "NEXAFLOW_DISPATCH", global = true)]
    dispatch: DispatchMode,

    /// Verbose output
    #[arg(short, long, env = "NEXAFLOW_DEBUG", global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in with a DID
    Login {
        /// DID to log in with (a demo DID when omitted)
        #[arg(long)]
        did: Option<String>,
        /// Private key stored alongside the DID
        #[arg(long, env = "NEXAFLOW_PRIVATE_KEY", hide_env_values = true)]
        private_key: Option<String>,
    },
    /// Forget the stored login
    Logout,
    /// Manage spaces
    Space {
        #[command(subcommand)]
        cmd: SpaceCmd,
    },
    /// Upload files
    Upload {
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Target space (defaults to the current space)
        #[arg(short, long)]
        space: Option<String>,
        /// File title (defaults to the file name)
        #[arg(short, long)]
        title: Option<String>,
        /// File description
        #[arg(short, long)]
        description: Option<String>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },
    /// Manage decentralized identities
    Identity {
        #[command(subcommand)]
        cmd: IdentityCmd,
    },
    /// Show network status
    Status,
}

#[derive(Subcommand, Debug)]
enum SpaceCmd {
    /// Create a new space
    Create {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// List spaces
    List,
    /// Switch the current space
    Use {
        /// Space ID
        space_id: String,
    },
}

#[derive(Subcommand, Debug)]
enum IdentityCmd {
    /// Create a new DID
    Create {
        /// DID method
        #[arg(short, long, default_value = "key")]
        method: String,
    },
    /// Check that a DID is well-formed
    Verify { did: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("nexaflow_cli={0},nexaflow_client={0}", log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_dir = match args.config_dir {
        Some(dir) => dir,
        None => LocalStore::default_dir()
            .context("cannot determine home directory, pass --config-dir")?,
    };
    let store = LocalStore::new(config_dir);

    tracing::debug!("API: {} ({} dispatch)", args.api_url, args.dispatch);
    if args.dispatch == DispatchMode::Simulated {
        tracing::debug!("Requests are built but not sent");
    }

    let mut client = NexaflowClient::new(Config::new(&args.api_url).with_dispatch(args.dispatch))?;

    match args.cmd {
        Commands::Login { did, private_key } => {
            commands::login(&store, did, private_key).await?;
        }
        Commands::Logout => commands::logout(&store).await?,
        Commands::Space { cmd } => match cmd {
            SpaceCmd::Create { name, description } => {
                commands::space_create(&mut client, &store, &name, description.as_deref()).await?;
            }
            SpaceCmd::List => {
                commands::space_list(&mut client, &store).await?;
            }
            SpaceCmd::Use { space_id } => commands::space_use(&store, &space_id).await?,
        },
        Commands::Upload {
            files,
            space,
            title,
            description,
            tags,
        } => {
            let options = UploadOptions {
                space,
                title,
                description,
                tags: tags.as_deref().map(parse_tags).unwrap_or_default(),
            };
            commands::upload(&mut client, &store, &files, &options).await?;
        }
        Commands::Identity { cmd } => match cmd {
            IdentityCmd::Create { method } => {
                commands::identity_create(&client, &method).await?;
            }
            IdentityCmd::Verify { did } => {
                commands::identity_verify(&did)?;
            }
        },
        Commands::Status => {
            commands::status(&client, &store).await?;
        }
    }

    Ok(())
}
