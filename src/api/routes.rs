use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use axum::{
    extract::{rejection::JsonRejection, MatchedPath, Query, Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::analytics::{self, PriceComparison, RetentionReport, SegmentReport};
use crate::api::health::HealthState;
use crate::api::latency::{RouteLatency, RouteLatencyReport};
use crate::db::{loader, seed, writer};
use crate::error::AppError;
use crate::scorer::{self, CityAssessment, FeasibilityWeights};
use crate::simulator;
use crate::state::{RecordStore, Snapshot};
use crate::types::{Baseline, Customer, Order, ScenarioInput, ScenarioResult, Tier};

#[derive(Clone)]
pub struct ApiState {
    pub pool: sqlx::SqlitePool,
    pub store: Arc<RecordStore>,
    pub health: Arc<HealthState>,
    pub latency: Arc<RouteLatency>,
    pub feasibility: FeasibilityWeights,
    /// Baseline written on `initialize-data`.
    pub seed_baseline: Baseline,
    /// Serializes reseeds so each swap installs the snapshot its own seed wrote.
    pub seed_lock: Arc<Mutex<()>>,
}

impl ApiState {
    pub fn new(
        pool: sqlx::SqlitePool,
        store: Arc<RecordStore>,
        feasibility: FeasibilityWeights,
        seed_baseline: Baseline,
    ) -> Self {
        let health = Arc::new(HealthState::new());
        if let Some(ns) = store.snapshot().seeded_at_ns {
            health.mark_seeded(ns);
        }
        Self {
            pool,
            store,
            health,
            latency: Arc::new(RouteLatency::new()),
            feasibility,
            seed_baseline,
            seed_lock: Arc::new(Mutex::new(())),
        }
    }
}

pub fn router(state: ApiState) -> Router {
    let api = Router::new()
        .route("/initialize-data", post(initialize_data))
        .route("/customers", get(get_customers))
        .route("/orders", get(get_orders))
        .route("/customer-segments", get(get_customer_segments))
        .route("/competitor-prices", get(get_competitor_prices))
        .route("/city-analysis", get(get_city_analysis))
        .route("/city-analysis/expansion", get(get_expansion_candidates))
        .route("/retention-analysis", get(get_retention_analysis))
        .route("/profitability-scenario", post(post_profitability_scenario))
        .route("/health", get(get_health))
        .route("/stats/latency", get(get_stats_latency))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state.latency),
            track_latency,
        ));

    Router::new().nest("/api", api).with_state(state)
}

async fn track_latency(
    State(latency): State<Arc<RouteLatency>>,
    req: Request,
    next: Next,
) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let started = Instant::now();
    let response = next.run(req).await;
    latency.record(&route, started.elapsed());
    response
}

/// Current snapshot. An unseeded store is served as-is: every view over it is zero-valued.
fn current_snapshot(state: &ApiState) -> Arc<Snapshot> {
    let snapshot = state.store.snapshot();
    if let Err(e) = snapshot.ensure_seeded() {
        debug!("{e}; serving zero-valued view");
    }
    snapshot
}

// ---------------------------------------------------------------------------
// Query param structs
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct CompetitorPricesQuery {
    /// Keep only products priced above their cheapest competitor.
    pub overpriced: Option<bool>,
}

#[derive(Deserialize)]
pub struct CityAnalysisQuery {
    pub tier: Option<Tier>,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct InitializeResponse {
    pub message: String,
    #[serde(flatten)]
    pub outcome: writer::SeedOutcome,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub initialized: bool,
    pub last_seeded_at_ns: u64,
    pub seed_runs: u64,
    pub scenarios_evaluated: u64,
    pub customers: usize,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn initialize_data(State(state): State<ApiState>) -> Result<Json<InitializeResponse>, AppError> {
    let _guard = state.seed_lock.lock().await;

    let seeded_at_ns = now_ns();
    let outcome = writer::seed(&state.pool, &seed::sample_dataset(), &state.seed_baseline, seeded_at_ns).await?;
    let snapshot = loader::load_snapshot(&state.pool, state.seed_baseline).await?;
    state.store.replace(snapshot);

    state.health.mark_seeded(seeded_at_ns);
    state.health.inc_seed_runs();

    Ok(Json(InitializeResponse {
        message: "Sample data initialized successfully".to_string(),
        outcome,
    }))
}

async fn get_customers(State(state): State<ApiState>) -> Json<Vec<Customer>> {
    Json(current_snapshot(&state).customers.clone())
}

async fn get_orders(State(state): State<ApiState>) -> Json<Vec<Order>> {
    Json(current_snapshot(&state).orders.clone())
}

async fn get_customer_segments(State(state): State<ApiState>) -> Json<SegmentReport> {
    let snapshot = current_snapshot(&state);
    Json(analytics::segment_report(&snapshot.customers))
}

async fn get_competitor_prices(
    State(state): State<ApiState>,
    Query(params): Query<CompetitorPricesQuery>,
) -> Json<Vec<PriceComparison>> {
    let snapshot = current_snapshot(&state);
    let comparisons = analytics::compare_all(&snapshot.prices)
        .into_iter()
        .filter(|c| params.overpriced.map_or(true, |want| c.is_overpriced() == want))
        .collect();
    Json(comparisons)
}

async fn get_city_analysis(
    State(state): State<ApiState>,
    Query(params): Query<CityAnalysisQuery>,
) -> Json<Vec<CityAssessment>> {
    let snapshot = current_snapshot(&state);
    Json(scorer::assess_all(&snapshot.cities, &state.feasibility, params.tier))
}

async fn get_expansion_candidates(State(state): State<ApiState>) -> Json<Vec<CityAssessment>> {
    let snapshot = current_snapshot(&state);
    Json(scorer::expansion_candidates(&snapshot.cities, &state.feasibility))
}

async fn get_retention_analysis(State(state): State<ApiState>) -> Json<RetentionReport> {
    let snapshot = current_snapshot(&state);
    Json(analytics::classify(&snapshot.customers, &snapshot.orders))
}

async fn post_profitability_scenario(
    State(state): State<ApiState>,
    payload: Result<Json<ScenarioInput>, JsonRejection>,
) -> Result<Json<ScenarioResult>, AppError> {
    let Json(input) = payload?;
    let baseline = state.store.snapshot().baseline;
    let result = simulator::simulate(&input, &baseline)?;
    state.health.inc_scenarios_evaluated();

    debug!(
        event = "SCENARIO",
        discount_rate = input.discount_rate,
        delivery_cost = input.delivery_cost,
        demand_multiplier = input.demand_multiplier,
        profit = result.profit,
        margin_percent = result.margin_percent,
        "scenario evaluated"
    );
    Ok(Json(result))
}

async fn get_health(State(state): State<ApiState>) -> Json<HealthResponse> {
    let customers = state.store.snapshot().customers.len();
    Json(HealthResponse {
        status: "ok",
        initialized: state.health.initialized(),
        last_seeded_at_ns: state.health.last_seeded_at_ns(),
        seed_runs: state.health.seed_runs(),
        scenarios_evaluated: state.health.scenarios_evaluated(),
        customers,
    })
}

async fn get_stats_latency(State(state): State<ApiState>) -> Json<Vec<RouteLatencyReport>> {
    Json(state.latency.report())
}

/// Log a one-line summary of what the store currently holds.
pub fn log_store_summary(store: &RecordStore) {
    let snapshot = store.snapshot();
    if snapshot.is_seeded() {
        info!(
            customers = snapshot.customers.len(),
            orders = snapshot.orders.len(),
            products = snapshot.prices.len(),
            cities = snapshot.cities.len(),
            "Record store loaded: {} customers, {} orders, {} products, {} cities",
            snapshot.customers.len(),
            snapshot.orders.len(),
            snapshot.prices.len(),
            snapshot.cities.len(),
        );
    } else {
        info!("Record store is empty; POST /api/initialize-data to seed it");
    }
}

fn now_ns() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_in_memory;
    use futures_util::future::try_join4;
    use serde_json::{json, Value};

    fn baseline() -> Baseline {
        Baseline {
            baseline_orders: 1000,
            baseline_avg_order_value: 500.0,
            fixed_operating_costs: 100_000.0,
            cost_of_goods_ratio: 0.0,
        }
    }

    /// Serve the API on an ephemeral port and return its `/api` base URL.
    async fn spawn_app() -> String {
        let pool = connect_in_memory().await.unwrap();
        let store = RecordStore::new(Snapshot::empty(baseline()));
        let state = ApiState::new(pool, store, FeasibilityWeights::default(), baseline());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });
        format!("http://{addr}/api")
    }

    async fn get_json(client: &reqwest::Client, url: String) -> Value {
        let resp = client.get(url).send().await.unwrap();
        assert!(resp.status().is_success(), "status {}", resp.status());
        resp.json().await.unwrap()
    }

    #[tokio::test]
    async fn views_are_zeroed_before_initialization() {
        let base = spawn_app().await;
        let client = reqwest::Client::new();

        let segments = get_json(&client, format!("{base}/customer-segments")).await;
        for name in ["premium", "regular", "budget"] {
            assert_eq!(segments["summary"][name], json!({"count": 0, "avg_aov": 0.0, "avg_retention": 0.0}));
        }

        let retention = get_json(&client, format!("{base}/retention-analysis")).await;
        assert_eq!(retention["high_retention_count"], 0);
        assert_eq!(retention["avg_delivery_time"], 0.0);

        let customers = get_json(&client, format!("{base}/customers")).await;
        assert_eq!(customers, json!([]));

        let health = get_json(&client, format!("{base}/health")).await;
        assert_eq!(health["initialized"], false);
    }

    #[tokio::test]
    async fn initialize_is_idempotent() {
        let base = spawn_app().await;
        let client = reqwest::Client::new();

        let first: Value = client.post(format!("{base}/initialize-data")).send().await.unwrap().json().await.unwrap();
        let customers_once = get_json(&client, format!("{base}/customers")).await;
        let second: Value = client.post(format!("{base}/initialize-data")).send().await.unwrap().json().await.unwrap();
        let customers_twice = get_json(&client, format!("{base}/customers")).await;

        assert_eq!(first["customers"], 8);
        assert_eq!(first["already_initialized"], false);
        assert_eq!(second["already_initialized"], true);
        assert_eq!(customers_once, customers_twice);
        assert_eq!(customers_twice.as_array().unwrap().len(), 8);

        let health = get_json(&client, format!("{base}/health")).await;
        assert_eq!(health["initialized"], true);
        assert_eq!(health["seed_runs"], 2);
    }

    #[tokio::test]
    async fn dashboard_views_after_initialization() {
        let base = spawn_app().await;
        let client = reqwest::Client::new();
        client.post(format!("{base}/initialize-data")).send().await.unwrap();

        let (segments, prices, cities, retention) = try_join4(
            client.get(format!("{base}/customer-segments")).send(),
            client.get(format!("{base}/competitor-prices")).send(),
            client.get(format!("{base}/city-analysis")).send(),
            client.get(format!("{base}/retention-analysis")).send(),
        )
        .await
        .unwrap();
        let segments: Value = segments.json().await.unwrap();
        let prices: Value = prices.json().await.unwrap();
        let cities: Value = cities.json().await.unwrap();
        let retention: Value = retention.json().await.unwrap();

        assert_eq!(segments["summary"]["premium"]["count"], 3);
        assert_eq!(segments["summary"]["regular"]["count"], 3);
        assert_eq!(segments["summary"]["budget"]["count"], 2);
        assert_eq!(segments["segments"]["budget"].as_array().unwrap().len(), 2);

        let prices = prices.as_array().unwrap();
        assert_eq!(prices.len(), 8);
        assert_eq!(prices[0]["product"], "Milk (1L)");
        assert_eq!(prices[0]["difference"], 4.0);
        assert_eq!(prices[0]["lowest_competitor"], "blinkit");
        assert_eq!(prices[0]["blinkit_price"], 58.0);
        assert_eq!(prices[0]["zepto_price"], 59.0);
        assert_eq!(prices[0]["bigbasket_price"], 60.0);

        assert_eq!(cities.as_array().unwrap().len(), 8);

        assert_eq!(retention["high_retention_count"], 3);
        assert_eq!(retention["medium_retention_count"], 3);
        assert_eq!(retention["low_retention_count"], 2);
        assert_eq!(retention["avg_delivery_time"], 18.75);
    }

    #[tokio::test]
    async fn filters_narrow_city_and_price_views() {
        let base = spawn_app().await;
        let client = reqwest::Client::new();
        client.post(format!("{base}/initialize-data")).send().await.unwrap();

        let tier2 = get_json(&client, format!("{base}/city-analysis?tier=tier-2")).await;
        let tier2 = tier2.as_array().unwrap();
        assert_eq!(tier2.len(), 5);
        assert!(tier2.iter().all(|c| c["tier"] == "tier-2"));

        let derived: Vec<&Value> = tier2.iter().filter(|c| c["score_source"] == "derived").collect();
        assert_eq!(derived.len(), 2);

        let expansion = get_json(&client, format!("{base}/city-analysis/expansion")).await;
        let expansion = expansion.as_array().unwrap();
        assert_eq!(expansion.len(), 5);
        assert_eq!(expansion[0]["city"], "Coimbatore");

        let not_overpriced = get_json(&client, format!("{base}/competitor-prices?overpriced=false")).await;
        assert_eq!(not_overpriced, json!([]));
    }

    #[tokio::test]
    async fn scenario_endpoint_evaluates_and_rejects() {
        let base = spawn_app().await;
        let client = reqwest::Client::new();

        let ok: Value = client
            .post(format!("{base}/profitability-scenario"))
            .json(&json!({"discount_rate": 10, "delivery_cost": 45, "demand_multiplier": 1}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(ok["orders"], 1000);
        assert_eq!(ok["revenue"], 450000.0);
        assert_eq!(ok["total_costs"], 145000.0);
        assert_eq!(ok["profit"], 305000.0);
        assert_eq!(ok["margin_percent"], 67.8);

        let rejected = client
            .post(format!("{base}/profitability-scenario"))
            .json(&json!({"discount_rate": 31, "delivery_cost": 45, "demand_multiplier": 1}))
            .send()
            .await
            .unwrap();
        assert_eq!(rejected.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = rejected.json().await.unwrap();
        assert_eq!(body["error"], "invalid_input");

        let malformed = client
            .post(format!("{base}/profitability-scenario"))
            .json(&json!({"discount_rate": "ten", "delivery_cost": 45}))
            .send()
            .await
            .unwrap();
        assert!(malformed.status().is_client_error(), "status {}", malformed.status());
        let body: Value = malformed.json().await.unwrap();
        assert_eq!(body["error"], "invalid_body");
        assert!(body["detail"].as_str().unwrap().starts_with("malformed request body"));

        let health = get_json(&client, format!("{base}/health")).await;
        assert_eq!(health["scenarios_evaluated"], 1);

        let latency = get_json(&client, format!("{base}/stats/latency")).await;
        let routes: Vec<&str> = latency
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|r| r["route"].as_str())
            .collect();
        assert!(routes.iter().any(|r| r.ends_with("/profitability-scenario")), "{routes:?}");
    }
}
