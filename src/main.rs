mod analytics;
mod api;
mod config;
mod db;
mod error;
mod scorer;
mod simulator;
mod state;
mod types;

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::api::routes::{log_store_summary, router, ApiState};
use crate::config::Config;
use crate::db::loader::load_snapshot;
use crate::error::Result;
use crate::state::RecordStore;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    // --- Record store ---
    let pool = db::connect(&cfg.db_path).await?;
    info!("Database ready at {}", cfg.db_path);

    let snapshot = load_snapshot(&pool, cfg.baseline).await?;
    let store = RecordStore::new(snapshot);
    log_store_summary(&store);

    info!(
        baseline_orders = cfg.baseline.baseline_orders,
        baseline_aov = cfg.baseline.baseline_avg_order_value,
        fixed_costs = cfg.baseline.fixed_operating_costs,
        cogs_ratio = cfg.baseline.cost_of_goods_ratio,
        "Seed baseline: {} orders x {:.2} AOV, fixed costs {:.2}, COGS ratio {:.2}",
        cfg.baseline.baseline_orders,
        cfg.baseline.baseline_avg_order_value,
        cfg.baseline.fixed_operating_costs,
        cfg.baseline.cost_of_goods_ratio,
    );
    info!(
        "Feasibility weights: penetration={} demand={} cost={} (saturation={}, cost ceiling={}, margin/pt={})",
        cfg.feasibility.smartphone_penetration,
        cfg.feasibility.monthly_demand,
        cfg.feasibility.delivery_cost,
        cfg.feasibility.demand_saturation,
        cfg.feasibility.delivery_cost_ceiling,
        cfg.feasibility.margin_per_point,
    );

    // --- HTTP API server ---
    let api_state = ApiState::new(pool, store, cfg.feasibility, cfg.baseline);
    let app = router(api_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&cfg.cors_origins));

    let bind_addr = format!("0.0.0.0:{}", cfg.api_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("HTTP API listening on {bind_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return cors.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {o:?}");
                None
            }
        })
        .collect();
    cors.allow_origin(allowed)
}
