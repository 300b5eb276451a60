use shop_monitor::app_state::AppState;
use shop_monitor::auth::verifier::MockCredentialVerifier;
use shop_monitor::auth::AuthService;
use shop_monitor::configuration::{get_configuration, Settings};
use shop_monitor::create_app;
use shop_monitor::db::Database;
use shop_monitor::errors::Error;
use shop_monitor::events::ChangeEvent;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn bind_address(host: &str, port: u16) -> Result<SocketAddr, Error> {
    let host = IpAddr::from_str(host)?;
    Ok(SocketAddr::from((host, port)))
}

fn spawn_background_tasks(state: &AppState, settings: &Settings) {
    let auth = state.auth.clone();
    let sweep_interval = Duration::from_secs(settings.auth.sweep_interval_secs);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_interval);
        loop {
            interval.tick().await;
            let removed = auth.sweep();
            if removed > 0 {
                info!(removed, "expired sessions swept");
            }
        }
    });

    // Simulated backend sync: pending records become synced on a timer.
    let db = state.db.clone();
    let events = state.events.clone();
    let poll_interval = Duration::from_secs(settings.sync.poll_interval_secs);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(poll_interval);
        loop {
            interval.tick().await;
            match db.mark_pending_synced().await {
                Ok(synced) if !synced.is_empty() => {
                    info!(count = synced.len(), "pending products marked synced");
                    events.publish(ChangeEvent::ProductsChanged);
                }
                Ok(_) => {}
                Err(e) => error!("sync simulation failed: {}", e),
            }
        }
    });
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let configuration = get_configuration().expect("Failed to read configuration");
    let addr = bind_address(
        &configuration.application.host,
        configuration.application.port,
    )
    .expect("Failed to create socket address");
    let db = Database::try_from(&configuration.database).expect("Failed to create database");
    let auth = AuthService::new(
        Arc::new(MockCredentialVerifier::default()),
        Duration::from_millis(configuration.auth.network_delay_ms),
    );
    let (app, app_state) = create_app(db, auth).expect("Failed to start server");
    spawn_background_tasks(&app_state, &configuration);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");
    info!("listening on {}", addr);
    axum::serve(listener, app.into_make_service())
        .await
        .unwrap();
}
