pub mod cli;

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::{
    Router,
    extract::Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use crate::core::{
    CreditUtilization, Debt, ExtraPaymentRecommendation, Strategy, StrategyComparison, Timeline,
    allocate_extra_payment, compare_strategies, credit_utilization, simulate, total_interest_for,
};
use crate::error::{PayoffError, PayoffResult};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiStrategy {
    #[serde(alias = "Snowball", alias = "lowest-balance", alias = "lowestBalance")]
    Snowball,
    #[serde(alias = "Avalanche", alias = "highest-rate", alias = "highestRate")]
    Avalanche,
}

impl From<ApiStrategy> for Strategy {
    fn from(value: ApiStrategy) -> Self {
        match value {
            ApiStrategy::Snowball => Strategy::Snowball,
            ApiStrategy::Avalanche => Strategy::Avalanche,
        }
    }
}

/// Request body shared by every endpoint. Absent fields fall back to
/// [`Settings::default`].
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PayoffPayload {
    debts: Vec<Debt>,
    strategy: Option<ApiStrategy>,
    extra_payment: Option<f64>,
    amount: Option<f64>,
}

/// Defaults applied to HTTP payloads and CLI flags alike.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Settings {
    pub strategy: Strategy,
    pub extra_payment: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            strategy: Strategy::Avalanche,
            extra_payment: 0.0,
        }
    }
}

#[derive(Debug)]
struct ApiRequest {
    debts: Vec<Debt>,
    strategy: Strategy,
    extra_payment: f64,
    amount: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateResponse {
    pub strategy: Strategy,
    pub extra_payment: f64,
    #[serde(flatten)]
    pub timeline: Timeline,
    pub balance_series: Vec<f64>,
}

impl SimulateResponse {
    pub fn new(strategy: Strategy, extra_payment: f64, timeline: Timeline) -> Self {
        Self {
            strategy,
            extra_payment,
            balance_series: timeline.balance_series(),
            timeline,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestResponse {
    pub strategy: Strategy,
    pub extra_payment: f64,
    pub total_interest: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocateResponse {
    pub strategy: Strategy,
    pub amount: f64,
    pub recommendations: Vec<ExtraPaymentRecommendation>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Rejects records the engine would otherwise turn into meaningless output:
/// empty names, duplicate ids, and negative or non-finite amounts.
pub fn validate_debts(debts: &[Debt]) -> PayoffResult<()> {
    let mut seen = HashSet::with_capacity(debts.len());
    for debt in debts {
        if !seen.insert(debt.id) {
            return Err(PayoffError::InvalidDebt {
                id: debt.id,
                reason: "duplicate id".to_string(),
            });
        }

        if debt.name.trim().is_empty() {
            return Err(PayoffError::InvalidDebt {
                id: debt.id,
                reason: "name must not be empty".to_string(),
            });
        }

        for (field, value) in [
            ("balance", Some(debt.balance)),
            ("interestRate", Some(debt.interest_rate)),
            ("minimumPayment", debt.minimum_payment),
            ("creditLimit", debt.credit_limit),
        ] {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(PayoffError::InvalidDebt {
                        id: debt.id,
                        reason: format!("{field} must be a finite number >= 0"),
                    });
                }
            }
        }
    }
    Ok(())
}

pub fn validate_amount(field: &'static str, value: f64) -> PayoffResult<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(PayoffError::InvalidAmount { field });
    }
    Ok(value)
}

pub fn router() -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/simulate", post(simulate_handler))
        .route("/api/interest", post(interest_handler))
        .route("/api/compare", post(compare_handler))
        .route("/api/allocate", post(allocate_handler))
        .route("/api/utilization", post(utilization_handler))
        .fallback(not_found_handler)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    log::info!("payoff HTTP API listening on http://{addr}");
    log::info!("Local access: http://127.0.0.1:{port}/api/health");

    axum::serve(listener, router()).await
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn simulate_handler(Json(payload): Json<PayoffPayload>) -> Response {
    with_request(payload, |request| {
        let timeline = simulate(&request.debts, request.strategy, request.extra_payment);
        SimulateResponse::new(request.strategy, request.extra_payment, timeline)
    })
}

async fn interest_handler(Json(payload): Json<PayoffPayload>) -> Response {
    with_request(payload, |request| InterestResponse {
        strategy: request.strategy,
        extra_payment: request.extra_payment,
        total_interest: total_interest_for(
            &request.debts,
            request.strategy,
            request.extra_payment,
        ),
    })
}

async fn compare_handler(Json(payload): Json<PayoffPayload>) -> Response {
    with_request(payload, |request| -> StrategyComparison {
        compare_strategies(&request.debts, request.extra_payment)
    })
}

async fn allocate_handler(Json(payload): Json<PayoffPayload>) -> Response {
    with_request(payload, |request| AllocateResponse {
        strategy: request.strategy,
        amount: request.amount,
        recommendations: allocate_extra_payment(&request.debts, request.strategy, request.amount),
    })
}

async fn utilization_handler(Json(payload): Json<PayoffPayload>) -> Response {
    with_request(payload, |request| -> CreditUtilization {
        credit_utilization(&request.debts)
    })
}

fn with_request<T, F>(payload: PayoffPayload, run: F) -> Response
where
    T: Serialize,
    F: FnOnce(&ApiRequest) -> T,
{
    match api_request_from_payload(payload) {
        Ok(request) => json_response(StatusCode::OK, run(&request)),
        Err(e) => error_response(StatusCode::BAD_REQUEST, &e.to_string()),
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn api_request_from_json(json: &str) -> PayoffResult<ApiRequest> {
    let payload = serde_json::from_str::<PayoffPayload>(json)?;
    api_request_from_payload(payload)
}

fn api_request_from_payload(payload: PayoffPayload) -> PayoffResult<ApiRequest> {
    let mut settings = Settings::default();

    if let Some(v) = payload.strategy {
        settings.strategy = v.into();
    }
    if let Some(v) = payload.extra_payment {
        settings.extra_payment = v;
    }

    validate_debts(&payload.debts)?;
    let extra_payment = validate_amount("extraPayment", settings.extra_payment)?;
    let amount = validate_amount("amount", payload.amount.unwrap_or(extra_payment))?;

    Ok(ApiRequest {
        debts: payload.debts,
        strategy: settings.strategy,
        extra_payment,
        amount,
    })
}
