use std::net::SocketAddr;
use std::str::FromStr;

use snv_server::apigeo::{ApiGeoClient, ApiGeoConfig, MockApiGeo};
use snv_server::resolver::{GeoProvider, ResolverConfig, SnvResolver};
use snv_server::web::{AppState, create_router};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Default log filter when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "snv_server=info,tower_http=info";

/// Default listen address.
const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";

/// Read an environment variable, falling back to `default` when it is
/// unset or does not parse.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(name, value = %raw, "ignoring unparseable environment variable");
            default
        }),
        Err(_) => default,
    }
}

async fn serve<P: GeoProvider + 'static>(provider: P, config: ResolverConfig, addr: SocketAddr) {
    let state = AppState::new(SnvResolver::new(provider, config));
    let app = create_router(state);

    info!(%addr, "SNV resolver listening");
    info!("  GET /health        - Health check");
    info!("  GET /snv           - Resolve a coordinate to SNV segments");
    info!("  GET /snv/version   - SNV dataset version for a date");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = ResolverConfig::default()
        .with_cluster_skew_days(env_or("SNV_CLUSTER_SKEW_DAYS", 0))
        .with_segment_cache_capacity(env_or(
            "SNV_CACHE_CAPACITY",
            snv_server::cache::DEFAULT_SEGMENT_CAPACITY,
        ));

    let default_addr =
        SocketAddr::from_str(DEFAULT_LISTEN_ADDR).expect("Default listen address is valid");
    let addr = env_or("SNV_LISTEN_ADDR", default_addr);

    // Fixture mode for development without network access
    if let Ok(dir) = std::env::var("SNV_MOCK_DIR") {
        let mock = MockApiGeo::from_dir(&dir).expect("Failed to load mock data");
        info!(%dir, roads = mock.available_roads().len(), "serving APIGEO fixtures");
        serve(mock, config, addr).await;
        return;
    }

    let mut apigeo_config = ApiGeoConfig::default();
    if let Ok(url) = std::env::var("APIGEO_ROUTES_URL") {
        apigeo_config = apigeo_config.with_routes_url(url);
    }
    if let Ok(url) = std::env::var("APIGEO_SEGMENTS_URL") {
        apigeo_config = apigeo_config.with_segments_url(url);
    }

    let client = ApiGeoClient::new(apigeo_config).expect("Failed to create APIGEO client");
    serve(client, config, addr).await;
}
