use actix_web::{middleware, web, App, HttpResponse, HttpServer, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::info;

use crate::config::OptimizerConfig;
use crate::coverage::{optimize_coverage, summarize, CoverageRequest, CoverageResult, CoverageSummary, Period};

// Only the latest run is kept; every request recomputes from scratch
pub struct AppState {
    pub latest: Mutex<Option<OptimizeResponse>>,
    pub defaults: OptimizerConfig,
}

impl AppState {
    pub fn new(defaults: OptimizerConfig) -> Self {
        Self {
            latest: Mutex::new(None),
            defaults,
        }
    }
}

/// Optimizer inputs as posted by the scheduling front end. A missing
/// `config` falls back to the server defaults.
#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    pub roster: Vec<String>,
    #[serde(default)]
    pub schedule: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub weekdays: HashMap<String, u8>,
    #[serde(default)]
    pub seniority: HashMap<String, u8>,
    #[serde(default)]
    pub periods: Vec<Period>,
    pub config: Option<OptimizerConfig>,
}

impl OptimizeRequest {
    fn into_request(self, defaults: &OptimizerConfig) -> CoverageRequest {
        CoverageRequest {
            roster: self.roster,
            schedule: self.schedule,
            weekdays: self.weekdays,
            seniority: self.seniority,
            periods: self.periods,
            config: self.config.unwrap_or_else(|| defaults.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeResponse {
    pub generated_at: DateTime<Utc>,
    pub result: CoverageResult,
    pub summary: CoverageSummary,
}

fn lock_failed() -> actix_web::Error {
    actix_web::error::ErrorInternalServerError("coverage state unavailable")
}

// Run the optimizer on posted inputs
async fn optimize(req: web::Json<OptimizeRequest>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let request = req.into_inner().into_request(&state.defaults);
    info!(
        roster = request.roster.len(),
        periods = request.periods.len(),
        seed = request.config.seed,
        "optimizing clinic coverage"
    );

    let result = optimize_coverage(&request);
    let summary = summarize(&request, &result);
    let response = OptimizeResponse {
        generated_at: Utc::now(),
        result,
        summary,
    };

    *state.latest.lock().map_err(|_| lock_failed())? = Some(response.clone());

    Ok(HttpResponse::Ok().json(response))
}

// Latest coverage table
async fn get_coverage(state: web::Data<AppState>) -> Result<HttpResponse> {
    let latest = state.latest.lock().map_err(|_| lock_failed())?;

    match latest.as_ref() {
        Some(response) => Ok(HttpResponse::Ok().json(response)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "success": false,
            "error": "Coverage not available"
        }))),
    }
}

// Load statistics of the latest run
async fn get_stats(state: web::Data<AppState>) -> Result<HttpResponse> {
    let latest = state.latest.lock().map_err(|_| lock_failed())?;

    match latest.as_ref() {
        Some(response) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "summary": response.summary,
            "counts": response.result.counts,
        }))),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "success": false,
            "error": "No data available"
        }))),
    }
}

async fn health() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({"status": "ok"})))
}

fn json_error(err: actix_web::error::JsonPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    let body = serde_json::json!({"success": false, "error": err.to_string()});
    actix_web::error::InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}

/// Registers the API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .route("/api/health", web::get().to(health))
        .route("/api/optimize", web::post().to(optimize))
        .route("/api/coverage", web::get().to(get_coverage))
        .route("/api/stats", web::get().to(get_stats));
}

pub async fn start_server(port: u16, defaults: OptimizerConfig) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState::new(defaults));

    info!(port, "starting coverage server");

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
