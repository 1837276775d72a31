use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: &'static str,
    pub timestamp: String,
    pub uptime_seconds: f64,
    pub message: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub service: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub platform: &'static str,
    pub environment: String,
    pub timestamp: String,
    pub uptime_seconds: f64,
    pub memory_usage: MemoryUsage,
    pub os_platform: &'static str,
    pub runtime_version: &'static str,
}

/// Byte counts sampled at request time.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryUsage {
    pub rss: u64,
    #[serde(rename = "virtual")]
    pub virtual_memory: u64,
    pub system_total: u64,
    pub system_used: u64,
}

#[derive(Serialize)]
pub struct TestResponse {
    pub success: bool,
    pub message: &'static str,
    pub timestamp: String,
    pub data: TestPayload,
}

#[derive(Serialize)]
pub struct TestPayload {
    /// Minor currency units (centavos).
    pub amount: u64,
    pub customer: Customer,
    pub items: Vec<LineItem>,
}

#[derive(Serialize)]
pub struct Customer {
    pub name: &'static str,
    pub email: &'static str,
    pub phone: &'static str,
    pub document: &'static str,
}

#[derive(Serialize)]
pub struct LineItem {
    pub title: &'static str,
    pub name: &'static str,
    pub quantity: u32,
    pub unit_amount: u64,
}

impl TestPayload {
    pub fn sample() -> Self {
        Self {
            amount: 6472,
            customer: Customer {
                name: "Maria Santos",
                email: "maria.santos@email.com",
                phone: "(11) 98765-4321",
                document: "12345678901",
            },
            items: vec![LineItem {
                title: "Tarifa de Processo CNH Social",
                name: "Tarifa CNH",
                quantity: 1,
                unit_amount: 6472,
            }],
        }
    }
}

#[derive(Serialize)]
pub struct ServiceDescriptor {
    pub message: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub platform: &'static str,
    pub endpoints: Endpoints,
    pub timestamp: String,
}

#[derive(Serialize)]
pub struct Endpoints {
    pub health: &'static str,
    pub status: &'static str,
    pub test: &'static str,
}

#[derive(Serialize)]
pub struct FunnelResponse {
    pub success: bool,
    pub data: FunnelSnapshot,
}

#[derive(Serialize)]
pub struct FunnelSnapshot {
    pub total_orders: u64,
    pub total_revenue: f64,
    pub average_order: f64,
    pub today_orders: u64,
    pub today_revenue: f64,
    pub conversion_rate: f64,
    pub last_transaction: LastTransaction,
}

#[derive(Serialize)]
pub struct LastTransaction {
    pub id: &'static str,
    pub amount: u64,
    pub customer: &'static str,
    pub timestamp: String,
}

impl FunnelSnapshot {
    pub fn simulated(timestamp: String) -> Self {
        Self {
            total_orders: 1247,
            total_revenue: 80623.84,
            average_order: 64.72,
            today_orders: 23,
            today_revenue: 1488.56,
            conversion_rate: 3.2,
            last_transaction: LastTransaction {
                id: "txn_123456789",
                amount: 6472,
                customer: "João Silva",
                timestamp,
            },
        }
    }
}

/// Loosely-typed transaction input; fields are echoed, never validated.
#[derive(Debug, Default, PartialEq)]
pub struct TransactionRequest {
    pub amount: Option<Value>,
    pub customer: Option<Value>,
    pub items: Option<Value>,
}

#[derive(Serialize)]
pub struct TransactionResponse {
    pub success: bool,
    pub message: &'static str,
    pub transaction_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Value>,
    pub timestamp: String,
}

#[derive(Serialize)]
pub struct NotFoundResponse {
    pub error: &'static str,
    pub path: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
}
