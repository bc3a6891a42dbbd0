//! FedSync coordination CLI.
//!
//! Drives the federated-learning coordination backend: central authorities
//! start and finalize model iterations and assign hospitals, assigned
//! clients submit trained-model updates with their metrics.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use gateway::GatewayClient;
use session::SessionStore;
use tracing_subscriber::EnvFilter;

mod commands;

/// FedSync federated-learning coordination CLI
#[derive(Parser)]
#[command(name = "fedsync")]
#[command(about = "Coordinate federated model iterations, assignments and submissions")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new account
    Signup {
        /// Account email
        #[arg(long)]
        email: String,

        /// Account password
        #[arg(long)]
        password: String,

        /// Hospital the account belongs to
        #[arg(long)]
        hospital: String,

        /// Account role ("central" or "client")
        #[arg(long)]
        role: String,
    },

    /// Log in and persist the session
    Login {
        /// Account email
        #[arg(long)]
        email: String,

        /// Account password
        #[arg(long)]
        password: String,
    },

    /// Clear the persisted session
    Logout,

    /// List running and finalized iterations (central role)
    Iterations,

    /// Start a new iteration (central role)
    Start {
        /// Iteration name, unique per authority
        #[arg(long)]
        iteration_name: String,

        /// Model architecture name
        #[arg(long)]
        model_name: String,

        /// Dataset domain the round trains on
        #[arg(long)]
        dataset_domain: String,

        /// Initial running version
        #[arg(long, default_value = "1")]
        version: u32,

        /// Path to the model artifact
        #[arg(long)]
        model_file: PathBuf,
    },

    /// Update an iteration; fields left out keep their current value
    Update {
        /// Iteration ID
        id: i64,

        /// New iteration name
        #[arg(long)]
        iteration_name: Option<String>,

        /// New model name
        #[arg(long)]
        model_name: Option<String>,

        /// New dataset domain
        #[arg(long)]
        dataset_domain: Option<String>,

        /// New version; 0 finalizes the iteration
        #[arg(long)]
        version: Option<u32>,

        /// Replacement model artifact
        #[arg(long)]
        model_file: Option<PathBuf>,
    },

    /// Finalize an iteration, keeping its fields and artifact
    Finalize {
        /// Iteration ID
        id: i64,
    },

    /// Search client accounts by email or hospital (central role)
    Clients {
        /// Search text; at least 2 characters before the backend is hit
        #[arg(long)]
        search: String,
    },

    /// Assign a client to a running iteration (central role)
    Assign {
        /// Search text identifying exactly one client
        #[arg(long)]
        client: String,

        /// Iteration ID to assign the client to
        #[arg(long)]
        iteration_id: i64,
    },

    /// List this authority's assignments (central role)
    Assignments,

    /// List the clients assigned to an iteration (central role)
    IterationClients {
        /// Iteration ID
        id: i64,
    },

    /// List the latest submission per client for an iteration (central role)
    Submissions {
        /// Iteration ID
        id: i64,
    },

    /// List iterations open for submission (client role)
    Open,

    /// Submit a trained model with metrics for an assignment (client role)
    Submit {
        /// Assignment ID of the open iteration
        #[arg(long)]
        assignment: i64,

        /// Reported accuracy
        #[arg(long)]
        accuracy: Option<f64>,

        /// Reported precision
        #[arg(long)]
        precision: Option<f64>,

        /// Reported recall
        #[arg(long)]
        recall: Option<f64>,

        /// Reported F1 score
        #[arg(long)]
        f1_score: Option<f64>,

        /// Path to the trained model artifact
        #[arg(long)]
        model_file: Option<PathBuf>,
    },

    /// Show the role-appropriate dashboard summary
    Dashboard,

    /// Download an iteration's model artifact into the local store
    Download {
        /// Iteration ID
        id: i64,
    },

    /// Run a prediction service
    Predict {
        #[command(subcommand)]
        service: commands::predict::PredictService,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let gateway = GatewayClient::new()?;
    let store = SessionStore::open_default();

    match cli.command {
        Commands::Signup {
            email,
            password,
            hospital,
            role,
        } => {
            commands::auth::signup(&gateway, &email, &password, &hospital, &role).await?;
        }
        Commands::Login { email, password } => {
            commands::auth::login(&gateway, &store, &email, &password).await?;
        }
        Commands::Logout => {
            commands::auth::logout(&store)?;
        }
        Commands::Iterations => {
            commands::iterations::list(&gateway, &store).await?;
        }
        Commands::Start {
            iteration_name,
            model_name,
            dataset_domain,
            version,
            model_file,
        } => {
            commands::iterations::start(
                &gateway,
                &store,
                iteration_name,
                model_name,
                dataset_domain,
                version,
                model_file,
            )
            .await?;
        }
        Commands::Update {
            id,
            iteration_name,
            model_name,
            dataset_domain,
            version,
            model_file,
        } => {
            commands::iterations::update(
                &gateway,
                &store,
                id,
                iteration_name,
                model_name,
                dataset_domain,
                version,
                model_file,
            )
            .await?;
        }
        Commands::Finalize { id } => {
            commands::iterations::finalize(&gateway, &store, id).await?;
        }
        Commands::Clients { search } => {
            commands::clients::search(&gateway, &store, &search).await?;
        }
        Commands::Assign {
            client,
            iteration_id,
        } => {
            commands::clients::assign(&gateway, &store, &client, iteration_id).await?;
        }
        Commands::Assignments => {
            commands::clients::assignments(&gateway, &store).await?;
        }
        Commands::IterationClients { id } => {
            commands::clients::iteration_clients(&gateway, &store, id).await?;
        }
        Commands::Submissions { id } => {
            commands::clients::submissions(&gateway, &store, id).await?;
        }
        Commands::Open => {
            commands::submit::open(&gateway, &store).await?;
        }
        Commands::Submit {
            assignment,
            accuracy,
            precision,
            recall,
            f1_score,
            model_file,
        } => {
            commands::submit::submit(
                &gateway,
                &store,
                assignment,
                accuracy,
                precision,
                recall,
                f1_score,
                model_file,
            )
            .await?;
        }
        Commands::Dashboard => {
            commands::dashboard::show(&gateway, &store).await?;
        }
        Commands::Download { id } => {
            commands::download::run(&gateway, &store, id).await?;
        }
        Commands::Predict { service } => {
            commands::predict::run(&gateway, service).await?;
        }
    }

    Ok(())
}
