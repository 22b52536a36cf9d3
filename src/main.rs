use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use barberdesk::config::{ConfigError, ConsoleConfig, GatewayKind};
use barberdesk::gateway::{ApiClient, AuthGateway, HttpAuthGateway, MockAuthGateway};
use barberdesk::guard;
use barberdesk::session::{Notification, NotificationLevel, SessionPersistence, SessionStore, spawn_unauthorized_watch};
use barberdesk::storage::{FileStore, StorageError};
use barberdesk::types::{RegisterRequest, Role, UserPatch};
use barberdesk::AuthError;
use clap::{Parser, Subcommand};
use tokio::sync::broadcast;

const EXPIRY_SETTLE_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("storage unavailable: {0}")]
    Storage(#[from] StorageError),
    #[error("{0}")]
    Auth(#[from] AuthError),
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("api-get requires BARBERDESK_GATEWAY=http")]
    HttpOnly,
    #[error("{0}")]
    Rejected(String),
}

#[derive(Parser, Debug)]
#[command(name = "barberdesk", about = "Barbershop console session CLI")]
struct Cli {
    /// Directory holding the persisted session snapshot and token.
    #[arg(long)]
    storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the restored session state.
    Status,
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
        #[arg(long)]
        role: Option<Role>,
    },
    Logout,
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
    UpdateProfile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        avatar: Option<String>,
    },
    /// Decide what a protected route would do for the current session.
    Guard {
        #[arg(long)]
        role: Option<Role>,
    },
    /// GET an authenticated backend resource and print it.
    ApiGet { path: String },
}

struct Console {
    store: SessionStore,
    api: Option<ApiClient>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ConsoleConfig::from_env()?;
    if let Some(dir) = cli.storage_dir {
        config.storage_dir = dir;
    }

    let console = build_console(&config)?;
    let mut notifications = console.store.notifications();
    let result = run(&console, cli.command).await;

    drain_notifications(&mut notifications);
    println!("{}", serde_json::to_string_pretty(&console.store.state())?);
    result
}

fn build_console(config: &ConsoleConfig) -> Result<Console, CliError> {
    let medium = FileStore::open(&config.storage_dir)?;
    let persistence = SessionPersistence::new(Arc::new(medium));

    let (gateway, api): (Arc<dyn AuthGateway>, Option<ApiClient>) = match config.gateway {
        GatewayKind::Mock => (Arc::new(MockAuthGateway::new(persistence.clone(), config.mock_latency)), None),
        GatewayKind::Http => {
            let api = ApiClient::new(&config.api_base_url, config.request_timeout, persistence.clone())?;
            (Arc::new(HttpAuthGateway::new(api.clone(), persistence.clone())), Some(api))
        }
    };

    let store = SessionStore::new(gateway, persistence);
    if let Some(api) = &api {
        let _watch = spawn_unauthorized_watch(store.clone(), api.on_unauthorized());
    }
    tracing::debug!(gateway = ?config.gateway, dir = %config.storage_dir.display(), "console ready");
    Ok(Console { store, api })
}

async fn run(console: &Console, command: Command) -> Result<(), CliError> {
    let store = &console.store;
    match command {
        Command::Status => Ok(()),
        Command::Login { email, password } => {
            store.login(&email, &password).await;
            settled(store)
        }
        Command::Register { name, email, phone, password, confirm_password, role } => {
            store
                .register(RegisterRequest { name, email, phone, password, confirm_password, role })
                .await;
            settled(store)
        }
        Command::Logout => {
            store.logout();
            Ok(())
        }
        Command::ForgotPassword { email } => {
            store.forgot_password(&email).await;
            settled(store)
        }
        Command::UpdateProfile { name, email, phone, avatar } => {
            store.update_profile(UserPatch { name, email, phone, avatar }).await;
            settled(store)
        }
        Command::Guard { role } => {
            let decision = guard::settle(&mut store.subscribe(), role).await;
            println!("{}", serde_json::to_string(&decision)?);
            Ok(())
        }
        Command::ApiGet { path } => run_api_get(console, &path).await,
    }
}

async fn run_api_get(console: &Console, path: &str) -> Result<(), CliError> {
    let api = console.api.as_ref().ok_or(CliError::HttpOnly)?;
    match api.get_json::<serde_json::Value>(path).await {
        Ok(body) => {
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(())
        }
        Err(AuthError::Unauthorized) => {
            // The watcher task performs the sign-out; give it a moment to land.
            let mut rx = console.store.subscribe();
            let _ = tokio::time::timeout(EXPIRY_SETTLE_TIMEOUT, rx.wait_for(|s| !s.is_authenticated)).await;
            Err(AuthError::Unauthorized.into())
        }
        Err(err) => Err(err.into()),
    }
}

/// Surface the store's recorded error as a failing exit status.
fn settled(store: &SessionStore) -> Result<(), CliError> {
    match store.state().error {
        Some(message) => Err(CliError::Rejected(message)),
        None => Ok(()),
    }
}

fn drain_notifications(rx: &mut broadcast::Receiver<Notification>) {
    while let Ok(note) = rx.try_recv() {
        let tag = match note.level {
            NotificationLevel::Success => "ok",
            NotificationLevel::Error => "error",
        };
        eprintln!("[{tag}] {}", note.message);
    }
}
