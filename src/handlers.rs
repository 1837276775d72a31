use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use chrono::{SecondsFormat, Utc};

use crate::models::{
    Endpoints, FunnelResponse, FunnelSnapshot, HealthStatus, NotFoundResponse, ServiceDescriptor,
    ServiceStatus, TestPayload, TestResponse, TransactionRequest, TransactionResponse,
};
use crate::state::{memory_usage, AppState};

pub const SERVICE_NAME: &str = "CNH Social Backend";
const VERSION: &str = env!("CARGO_PKG_VERSION");
const PLATFORM: &str = "Railway";
const ONLINE: &str = "online";

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: ONLINE,
        timestamp: timestamp(),
        uptime_seconds: state.uptime_seconds(),
        message: "Backend CNH Social funcionando perfeitamente no Railway",
    })
}

pub async fn status(State(state): State<AppState>) -> Json<ServiceStatus> {
    Json(ServiceStatus {
        service: SERVICE_NAME,
        version: VERSION,
        status: ONLINE,
        platform: PLATFORM,
        environment: state.config.environment.clone(),
        timestamp: timestamp(),
        uptime_seconds: state.uptime_seconds(),
        memory_usage: memory_usage(),
        os_platform: std::env::consts::OS,
        runtime_version: concat!("rust ", env!("CARGO_PKG_RUST_VERSION")),
    })
}

pub async fn test_payload() -> Json<TestResponse> {
    Json(TestResponse {
        success: true,
        message: "Backend CNH Social - Teste OK (Railway)",
        timestamp: timestamp(),
        data: TestPayload::sample(),
    })
}

pub async fn root() -> Json<ServiceDescriptor> {
    Json(ServiceDescriptor {
        message: "CNH Social Backend API (Railway)",
        version: VERSION,
        status: ONLINE,
        platform: PLATFORM,
        endpoints: Endpoints {
            health: "/health",
            status: "/status",
            test: "/test",
        },
        timestamp: timestamp(),
    })
}

pub async fn funnel_data() -> Json<FunnelResponse> {
    Json(FunnelResponse {
        success: true,
        data: FunnelSnapshot::simulated(timestamp()),
    })
}

pub async fn create_transaction(
    State(state): State<AppState>,
    payload: TransactionRequest,
) -> Json<TransactionResponse> {
    tracing::info!(
        amount = ?payload.amount,
        customer = ?payload.customer,
        items = ?payload.items,
        "transaction received"
    );

    Json(TransactionResponse {
        success: true,
        message: "Transação criada com sucesso (Railway)",
        transaction_id: state.next_transaction_id(),
        amount: payload.amount,
        customer: payload.customer,
        timestamp: timestamp(),
    })
}

pub async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundResponse {
            error: "Endpoint não encontrado",
            path: uri.path().to_string(),
        }),
    )
}
