//! Sourcecast - episode backend for a podcast promotional site.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use mongodb::bson::oid::ObjectId;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sourcecast::{
    api::{self, ApiState},
    auth::{self, TokenService},
    config::ServerConfig,
    model::{now_millis, Admin},
    repo::EpisodeRepository,
    store::{mongo::MongoStore, AdminStore},
};

/// Episode backend for the Sourcecast site.
#[derive(Parser)]
#[command(name = "sourcecast", about = "Episode backend for the Sourcecast site")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST API daemon.
    Daemon {
        /// Address to bind the API server.
        #[arg(long, default_value = "0.0.0.0:7878", env = "SOURCECAST_BIND")]
        bind: String,

        /// MongoDB connection string.
        #[arg(long, env = "MONGODB_URI")]
        mongodb_uri: String,

        /// Database name.
        #[arg(long, default_value = "sourcecast", env = "SOURCECAST_DB")]
        db: String,

        /// Secret for signing bearer tokens.
        #[arg(long, env = "JWT_SECRET")]
        jwt_secret: Option<String>,
    },

    /// Provision an administrator account (out-of-band; re-running for
    /// an existing username replaces its password and email).
    CreateAdmin {
        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        /// MongoDB connection string.
        #[arg(long, env = "MONGODB_URI")]
        mongodb_uri: String,

        /// Database name.
        #[arg(long, default_value = "sourcecast", env = "SOURCECAST_DB")]
        db: String,
    },

    /// Show daemon status.
    Status {
        /// Sourcecast API URL.
        #[arg(long, env = "SOURCECAST_API_URL", default_value = "http://localhost:7878")]
        api_url: String,
    },

    /// List episodes.
    Episodes {
        /// Sourcecast API URL.
        #[arg(long, env = "SOURCECAST_API_URL", default_value = "http://localhost:7878")]
        api_url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sourcecast=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Daemon {
            bind,
            mongodb_uri,
            db,
            jwt_secret,
        } => {
            let config = ServerConfig {
                bind,
                mongodb_uri,
                db_name: db,
                jwt_secret,
            };
            run_daemon(config).await?;
        }

        Commands::CreateAdmin {
            username,
            email,
            password,
            mongodb_uri,
            db,
        } => {
            create_admin(&mongodb_uri, &db, &username, &email, &password).await?;
        }

        Commands::Status { api_url } => {
            show_status(&api_url).await?;
        }

        Commands::Episodes { api_url } => {
            list_episodes(&api_url).await?;
        }
    }

    Ok(())
}

/// Run the API daemon.
async fn run_daemon(config: ServerConfig) -> Result<()> {
    tracing::info!("Starting Sourcecast daemon...");

    let store = Arc::new(MongoStore::new(&config.mongodb_uri, &config.db_name));
    let tokens = TokenService::new(&config.jwt_secret());

    let state = Arc::new(ApiState::new(
        EpisodeRepository::new(store.clone()),
        store,
        tokens,
    ));

    api::serve(state, &config.bind).await?;

    Ok(())
}

/// Provision an administrator. The password is hashed exactly once,
/// here, before it reaches the store.
async fn create_admin(
    mongodb_uri: &str,
    db: &str,
    username: &str,
    email: &str,
    password: &str,
) -> Result<()> {
    let store = MongoStore::new(mongodb_uri, db);

    let now = now_millis();
    let admin = match store.find_by_username(username).await? {
        // Keep the storage identity stable across re-provisioning.
        Some(existing) => Admin {
            id: existing.id,
            username: username.to_string(),
            password_hash: auth::hash_password(password)?,
            email: email.to_string(),
            created_at: existing.created_at,
            updated_at: now,
        },
        None => Admin {
            id: ObjectId::new().to_hex(),
            username: username.to_string(),
            password_hash: auth::hash_password(password)?,
            email: email.to_string(),
            created_at: now,
            updated_at: now,
        },
    };

    store.upsert(&admin).await?;

    println!("Administrator '{}' provisioned.", username);

    Ok(())
}

/// Show daemon status via API.
async fn show_status(api_url: &str) -> Result<()> {
    let client = reqwest::Client::new();
    let url = format!("{}/status", api_url);

    let response = client.get(&url).send().await?;

    if !response.status().is_success() {
        anyhow::bail!("Failed to get status: {}", response.status());
    }

    let status: serde_json::Value = response.json().await?;

    println!("Sourcecast Status");
    println!("=================");
    println!("Status:   {}", status["status"]);
    println!("Episodes: {}", status["episodes"]);
    println!("Featured: {}", status["latest_id"]);

    Ok(())
}

/// List episodes via API.
async fn list_episodes(api_url: &str) -> Result<()> {
    let client = reqwest::Client::new();
    let url = format!("{}/episodes", api_url);

    let response = client.get(&url).send().await?;

    if !response.status().is_success() {
        anyhow::bail!("Failed to list episodes: {}", response.status());
    }

    let episodes: Vec<serde_json::Value> = response.json().await?;

    if episodes.is_empty() {
        println!("No episodes found.");
        return Ok(());
    }

    println!("{:<24} {:<12} {:<8} {:<40}", "ID", "DATE", "LATEST", "TITLE");
    println!("{}", "-".repeat(84));

    for episode in episodes {
        let title: String = episode["title"]
            .as_str()
            .unwrap_or("?")
            .chars()
            .take(40)
            .collect();
        println!(
            "{:<24} {:<12} {:<8} {:<40}",
            episode["id"].as_str().unwrap_or("?"),
            episode["date"].as_str().unwrap_or("?"),
            if episode["isLatest"].as_bool().unwrap_or(false) {
                "yes"
            } else {
                ""
            },
            title,
        );
    }

    Ok(())
}
