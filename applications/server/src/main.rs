/// Ballotbox Server - polling and voting web service
use ballotbox_core::{LedgerStore, VotingLedger};
use ballotbox_server::{
    config::ServerConfig,
    create_router,
    services::{AuthService, NewAccount},
    state::AppState,
};
use ballotbox_storage::SqliteLedgerStore;
use clap::{Parser, Subcommand};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ballotbox-server")]
#[command(about = "Ballotbox polling and voting server", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "BALLOTBOX_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create a new user
    AddUser {
        /// Login name
        #[arg(short, long)]
        login: String,
        /// Email address
        #[arg(short, long)]
        email: String,
        /// Password
        #[arg(short, long)]
        password: String,
        /// Grant the admin role
        #[arg(long)]
        admin: bool,
    },
    /// List all users
    ListUsers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ballotbox_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::load_from(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve => {
            serve(config).await?;
        }
        Commands::AddUser {
            login,
            email,
            password,
            admin,
        } => {
            add_user(
                &config,
                NewAccount {
                    login,
                    email,
                    password,
                    is_admin: admin,
                },
            )
            .await?;
        }
        Commands::ListUsers => {
            list_users(&config).await?;
        }
    }

    Ok(())
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    config.validate()?;

    tracing::info!("Starting Ballotbox Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    let store = open_store(&config).await?;
    tracing::info!("Database connected");

    let auth_service = Arc::new(auth_service(&config));
    auth_service
        .ensure_bootstrap_admin(store.as_ref(), &config.bootstrap)
        .await?;
    tracing::info!("Auth service initialized");

    let ledger = Arc::new(VotingLedger::new(store));
    let app_state = AppState::new(ledger, auth_service);
    let app = create_router(app_state);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn add_user(config: &ServerConfig, account: NewAccount) -> anyhow::Result<()> {
    let store = open_store(config).await?;

    let user = auth_service(config)
        .create_account(store.as_ref(), account)
        .await?;

    println!(
        "Created user {} ({}){}",
        user.login,
        user.id,
        if user.is_admin { " [admin]" } else { "" }
    );

    Ok(())
}

async fn list_users(config: &ServerConfig) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let users = store.get_all_users().await?;

    println!("Users:");
    for user in users {
        println!(
            "  {} - {} <{}>{}",
            user.id,
            user.login,
            user.email,
            if user.is_admin { " [admin]" } else { "" }
        );
    }

    Ok(())
}

async fn open_store(config: &ServerConfig) -> anyhow::Result<Arc<dyn LedgerStore>> {
    let pool = ballotbox_storage::create_pool(&config.storage.database_url).await?;
    ballotbox_storage::run_migrations(&pool).await?;
    Ok(Arc::new(SqliteLedgerStore::new(pool)))
}

fn auth_service(config: &ServerConfig) -> AuthService {
    AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_expiration_hours,
        config.auth.jwt_refresh_expiration_days,
    )
    .with_bcrypt_cost(config.auth.bcrypt_cost)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
