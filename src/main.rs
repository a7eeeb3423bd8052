use axum_extra::extract::cookie::Key;
use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &dbcheck::config::CONFIG;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        bind_addr = %cfg.bind_addr,
        database_url = %cfg.database_url,
        loglevel = %cfg.loglevel,
        session_ttl_hours = cfg.session_ttl_hours,
        servers = cfg.servers.len(),
    );

    if cfg.session_secret.len() < 32 {
        return Err("DBCHECK_SESSION_SECRET must be at least 32 bytes".into());
    }
    if cfg.session_secret == dbcheck::config::Config::default().session_secret {
        warn!("running with the default session secret; set DBCHECK_SESSION_SECRET");
    }

    let storage = dbcheck::db::spawn(&cfg.database_url).await?;
    storage.seed_servers(&cfg.servers).await?;
    info!(count = cfg.servers.len(), "report servers seeded");

    bootstrap_admin(&storage, cfg).await?;

    let key = Key::derive_from(cfg.session_secret.as_bytes());
    let state = dbcheck::router::DbCheckState::new(storage, key, cfg.session_ttl_hours);
    let app = dbcheck::router::dbcheck_router(state);

    let listener = TcpListener::bind(&cfg.bind_addr).await?;
    info!("HTTP server listening on {}", cfg.bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Create the initial admin user from config when no user with that email
/// exists yet. Users are never created through the public API.
async fn bootstrap_admin(
    storage: &dbcheck::db::ChecklistStorage,
    cfg: &dbcheck::config::Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let (Some(email), Some(password)) = (cfg.admin_email.as_ref(), cfg.admin_password.as_ref())
    else {
        return Ok(());
    };

    if storage.find_user_by_email(email).await?.is_some() {
        info!(email = %email, "admin user already present");
        return Ok(());
    }

    let hash = dbcheck::session::password::hash(password, bcrypt::DEFAULT_COST)?;
    let user = storage
        .create_user(email, &cfg.admin_name, &hash, dbcheck::db::Role::Admin)
        .await?;
    info!(email = %user.email, "bootstrap admin user created");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to install ctrl-c handler");
    }
}
