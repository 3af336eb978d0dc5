use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use solana_sdk::pubkey::Pubkey;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::config::Config;
use crate::middleware::logging::request_logging;
use crate::opportunity::detector::{find_opportunities, Opportunity};
use crate::opportunity::scanner::PriceScanner;
use crate::shared::errors::StorageError;
use crate::storage::records::{
    now_timestamp, DepositRecord, ProfitRecord, TransactionRecord, TransactionType,
    WithdrawalRecord,
};
use crate::storage::Stores;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub scanner: Arc<PriceScanner>,
    pub stores: Arc<Stores>,
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/prices", get(get_prices))
        .route("/wallet", get(get_wallet))
        .route("/profits/:user_id", get(get_profits))
        .route("/update-profits", post(update_profits))
        .route("/transactions/:user_id", get(get_transactions))
        .route("/withdraw", post(withdraw))
        .route("/log-deposit", post(log_deposit))
        .route("/deposits/:user_id", get(get_deposits))
        .layer(axum::middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ===== Route Handlers =====

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Fetch fresh quotes from every configured source and the opportunities they
/// imply. Upstream failures degrade to zero prices, so this never fails.
async fn get_prices(State(state): State<AppState>) -> Json<PricesResponse> {
    let quotes = state.scanner.scan().await;
    info!("Fetched prices: {:?}", quotes);

    let opportunities = find_opportunities(
        &quotes,
        &state.config.arbitrage.baseline,
        state.config.arbitrage.threshold_percent,
    );

    let prices: BTreeMap<String, f64> = quotes.into_iter().map(|q| (q.source, q.price)).collect();
    Json(PricesResponse {
        prices,
        opportunities,
    })
}

/// Return the admin deposit wallet address
async fn get_wallet(State(state): State<AppState>) -> Json<WalletResponse> {
    Json(WalletResponse {
        address: state.config.admin.wallet_address.clone(),
    })
}

/// Get a user's profit balance, zero if none recorded
async fn get_profits(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<ProfitsResponse> {
    let profits = state
        .stores
        .profits
        .find_by_user(&user_id)
        .await
        .map(|r| r.profits)
        .unwrap_or(0.0);
    Json(ProfitsResponse { profits })
}

/// Admin updates a user's profit balance
async fn update_profits(
    State(state): State<AppState>,
    Json(body): Json<UpdateProfitsRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if body.password != state.config.admin.password {
        return Err(ApiError::Unauthorized("Invalid admin password".to_string()));
    }

    state
        .stores
        .profits
        .upsert(ProfitRecord {
            user_id: body.user_id.clone(),
            profits: body.profits,
        })
        .await?;

    // Ledger append is a second, independent write; a crash in between leaves
    // the ledger behind the balance.
    state
        .stores
        .transactions
        .append(TransactionRecord {
            user_id: body.user_id,
            tx_type: TransactionType::Profit,
            amount: body.profits,
            address: None,
            currency: None,
            tx_id: None,
            timestamp: now_timestamp(),
        })
        .await?;

    Ok(Json(MessageResponse {
        message: "Profits updated successfully".to_string(),
    }))
}

/// Get a user's transaction history, newest first
async fn get_transactions(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<TransactionsResponse> {
    let transactions = state.stores.transactions.list_by_user(&user_id).await;
    Json(TransactionsResponse { transactions })
}

/// Submit a withdrawal request
async fn withdraw(
    State(state): State<AppState>,
    Json(body): Json<WithdrawRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if Pubkey::from_str(&body.address).is_err() {
        return Err(ApiError::BadRequest("Invalid Solana address".to_string()));
    }

    let timestamp = now_timestamp();
    state
        .stores
        .withdrawals
        .append(WithdrawalRecord {
            user_id: body.user_id.clone(),
            amount: body.amount,
            address: body.address.clone(),
            status: "pending".to_string(),
            timestamp: timestamp.clone(),
        })
        .await?;

    state
        .stores
        .transactions
        .append(TransactionRecord {
            user_id: body.user_id,
            tx_type: TransactionType::WithdrawalRequest,
            amount: body.amount,
            address: Some(body.address),
            currency: None,
            tx_id: None,
            timestamp,
        })
        .await?;

    Ok(Json(MessageResponse {
        message: "Withdrawal request submitted".to_string(),
    }))
}

/// Admin logs a deposit
async fn log_deposit(
    State(state): State<AppState>,
    Json(body): Json<LogDepositRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if body.password != state.config.admin.password {
        return Err(ApiError::Unauthorized("Invalid admin password".to_string()));
    }

    let tx_id = body.tx_id.unwrap_or_else(|| "N/A".to_string());
    let timestamp = now_timestamp();

    state
        .stores
        .deposits
        .append(DepositRecord {
            user_id: body.user_id.clone(),
            amount: body.amount,
            currency: body.currency.clone(),
            tx_id: tx_id.clone(),
            timestamp: timestamp.clone(),
        })
        .await?;

    state
        .stores
        .transactions
        .append(TransactionRecord {
            user_id: body.user_id,
            tx_type: TransactionType::Deposit,
            amount: body.amount,
            address: None,
            currency: Some(body.currency),
            tx_id: Some(tx_id),
            timestamp,
        })
        .await?;

    Ok(Json(MessageResponse {
        message: "Deposit logged successfully".to_string(),
    }))
}

/// Get a user's deposit history, newest first
async fn get_deposits(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<DepositsResponse> {
    let deposits = state.stores.deposits.list_by_user(&user_id).await;
    Json(DepositsResponse { deposits })
}

// ===== Request/Response Types =====

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateProfitsRequest {
    user_id: String,
    profits: f64,
    password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WithdrawRequest {
    user_id: String,
    amount: f64,
    address: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogDepositRequest {
    user_id: String,
    amount: f64,
    currency: String,
    tx_id: Option<String>,
    password: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Serialize)]
struct PricesResponse {
    prices: BTreeMap<String, f64>,
    opportunities: Vec<Opportunity>,
}

#[derive(Serialize)]
struct WalletResponse {
    address: String,
}

#[derive(Serialize)]
struct ProfitsResponse {
    profits: f64,
}

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

#[derive(Serialize)]
struct TransactionsResponse {
    transactions: Vec<TransactionRecord>,
}

#[derive(Serialize)]
struct DepositsResponse {
    deposits: Vec<DepositRecord>,
}

// ===== Error Handling =====

#[derive(Debug)]
enum ApiError {
    Storage(StorageError),
    Unauthorized(String),
    BadRequest(String),
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Storage(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Storage(err) => {
                error!("Storage error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
