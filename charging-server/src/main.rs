use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use charging_server::config::Config;
use charging_server::limiter::KeyedRateLimiter;
use charging_server::maps::{MapService, MapsClient, MapsConfig};
use charging_server::reviews::ReviewStore;
use charging_server::stations::{StationClient, StationClientConfig, StationService, StationSource};
use charging_server::web::{AppState, create_router};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("charging_server=info,tower_http=info")),
        )
        .init();

    if let Err(e) = run().await {
        error!(error = %e, "server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), BoxError> {
    let config = Config::from_env()?;
    config.log();

    let source = match &config.stations_file {
        Some(path) => StationSource::File(path.clone()),
        None => StationSource::Live(StationClient::new(StationClientConfig::new(
            &config.stations_url,
        ))?),
    };
    let stations = StationService::new(source, config.stations_cache_ttl);

    let reviews = match &config.postgres_uri {
        Some(url) => ReviewStore::postgres(url).await?,
        None => {
            warn!("POSTGRES_URI not set; reviews are kept in memory and lost on restart");
            ReviewStore::in_memory()
        }
    };

    let maps = match &config.maps_api_key {
        Some(key) => MapService::new(Some(MapsClient::new(MapsConfig::new(key))?)),
        None => {
            warn!("GOOGLE_MAPS_API_KEY not set; distances are estimates and routes are unavailable");
            MapService::new(None)
        }
    };

    info!(
        reviews = reviews.describe(),
        map_provider = maps.is_configured(),
        "services ready"
    );

    let limiter = KeyedRateLimiter::new(config.rate_limit);
    let state = AppState::new(stations, reviews, maps, limiter, config.nearby_max_limit);

    spawn_limiter_sweep(Arc::clone(&state.limiter), &config);

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(addr = %listener.local_addr()?, "charging station backend listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("server stopped");
    Ok(())
}

/// Periodically drop buckets that have been idle long enough to be full
/// again, so the per-client map does not grow without bound.
fn spawn_limiter_sweep(limiter: Arc<KeyedRateLimiter>, config: &Config) {
    let every = config.rate_limit_sweep;
    let idle_ttl = every.max(config.rate_limit.full_refill());

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.tick().await; // First tick is immediate, skip it
        loop {
            interval.tick().await;
            let removed = limiter.retain_idle(idle_ttl);
            debug!(removed, remaining = limiter.len(), "swept idle rate-limit buckets");
        }
    });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
