use crate::errors::AppError;
use crate::state::AppState;
use crate::submitter::{TokenCall, TransactionReceipt};
use alloy_primitives::B256;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Json, Path, Query,
    },
    routing::{get, post},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use token_ledger::{
    parse_address, parse_amount, Address, EventFilter, EventName, LoggedEvent, TokenError, U256,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::{IntoParams, OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

// ── Request / response bodies ─────────────────────────────────────────────────

/// Amount as sent by clients: a decimal (or `0x` hex) string, or a plain
/// non-negative JSON integer.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Text(String),
    Number(u64),
}

impl AmountInput {
    fn parse(&self) -> Result<U256, TokenError> {
        match self {
            Self::Text(s) => parse_amount(s),
            Self::Number(n) => Ok(U256::from(*n)),
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct MintRequest {
    #[schema(example = "0xaaC412515A68ce958A5C5109a7b7195dCD7bFa13")]
    pub to: String,
    #[schema(value_type = String, example = "1000")]
    pub amount: AmountInput,
}

#[derive(Deserialize, ToSchema)]
pub struct TransferRequest {
    #[schema(example = "0xaaC412515A68ce958A5C5109a7b7195dCD7bFa13")]
    pub to: String,
    #[schema(value_type = String, example = "1000")]
    pub amount: AmountInput,
}

#[derive(Deserialize, ToSchema)]
pub struct ApproveRequest {
    #[schema(example = "0xaaC412515A68ce958A5C5109a7b7195dCD7bFa13")]
    pub spender: String,
    #[schema(value_type = String, example = "1000")]
    pub amount: AmountInput,
}

#[derive(Deserialize, ToSchema)]
pub struct TransferFromRequest {
    #[schema(example = "0xaaC412515A68ce958A5C5109a7b7195dCD7bFa13")]
    pub from: String,
    #[schema(example = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8")]
    pub to: String,
    #[schema(value_type = String, example = "1000")]
    pub amount: AmountInput,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    #[schema(example = "MyToken")]
    pub name: String,
    #[schema(example = "MTK")]
    pub symbol: String,
    #[schema(example = 18)]
    pub decimals: u8,
    #[schema(example = "1000000")]
    pub total_supply: String,
}

#[derive(Serialize, ToSchema)]
pub struct BalanceResponse {
    #[schema(example = "1000")]
    pub balance: String,
}

#[derive(Serialize, ToSchema)]
pub struct AllowanceResponse {
    #[schema(example = "300")]
    pub allowance: String,
}

#[derive(Serialize, ToSchema)]
pub struct TxResponse {
    pub hash: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventsResponse {
    #[schema(value_type = Vec<Object>)]
    pub events: Vec<LoggedEvent>,
    /// Pass back as `cursor` to continue polling.
    pub next_cursor: u64,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignerResponse {
    pub address: String,
    pub contract_address: String,
    pub network: String,
    pub chain_id: u64,
    pub rpc_url: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EventsQuery {
    /// `Transfer` or `Approval`
    pub event_name: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub owner: Option<String>,
    pub spender: Option<String>,
    /// First log index to consider.
    pub cursor: Option<u64>,
}

impl EventsQuery {
    fn to_filter(&self) -> Result<EventFilter, AppError> {
        let name = self
            .event_name
            .as_deref()
            .map(str::parse::<EventName>)
            .transpose()
            .map_err(AppError::BadRequest)?;

        Ok(EventFilter {
            name,
            from: optional_address(&self.from)?,
            to: optional_address(&self.to)?,
            owner: optional_address(&self.owner)?,
            spender: optional_address(&self.spender)?,
        })
    }
}

fn optional_address(value: &Option<String>) -> Result<Option<Address>, TokenError> {
    value.as_deref().map(parse_address).transpose()
}

// ── Handlers ──────────────────────────────────────────────────────────────────

async fn health_check() -> &'static str {
    "OK"
}

#[utoipa::path(
    get,
    path = "/token",
    responses(
        (status = 200, description = "Token metadata and supply", body = TokenResponse)
    ),
    tag = "Token"
)]
pub async fn token_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<TokenResponse>, AppError> {
    let metadata = state.token.metadata();
    let total_supply = state.token.total_supply();
    tracing::debug!(total_supply = %total_supply, "Token metadata requested");

    Ok(Json(TokenResponse {
        name: metadata.name,
        symbol: metadata.symbol,
        decimals: metadata.decimals,
        total_supply: total_supply.to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/balance/{address}",
    params(("address" = String, Path, description = "0x-prefixed account address")),
    responses(
        (status = 200, description = "Balance of the account", body = BalanceResponse),
        (status = 400, description = "Malformed address")
    ),
    tag = "Token"
)]
pub async fn balance_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(address): Path<String>,
) -> Result<Json<BalanceResponse>, AppError> {
    let account = parse_address(&address)?;
    let balance = state.token.balance_of(account);
    Ok(Json(BalanceResponse {
        balance: balance.to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/allowance/{owner}/{spender}",
    params(
        ("owner" = String, Path, description = "Account whose tokens are spent"),
        ("spender" = String, Path, description = "Account allowed to spend")
    ),
    responses(
        (status = 200, description = "Remaining allowance", body = AllowanceResponse),
        (status = 400, description = "Malformed address")
    ),
    tag = "Token"
)]
pub async fn allowance_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path((owner, spender)): Path<(String, String)>,
) -> Result<Json<AllowanceResponse>, AppError> {
    let owner = parse_address(&owner)?;
    let spender = parse_address(&spender)?;
    Ok(Json(AllowanceResponse {
        allowance: state.token.allowance(owner, spender).to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/transferFrom",
    request_body = TransferFromRequest,
    responses(
        (status = 200, description = "Transfer applied", body = TxResponse),
        (status = 400, description = "Malformed request"),
        (status = 422, description = "Insufficient allowance or balance")
    ),
    tag = "Transactions"
)]
pub async fn transfer_from_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<TransferFromRequest>, JsonRejection>,
) -> Result<Json<TxResponse>, AppError> {
    let Json(payload) = payload?;
    let call = TokenCall::TransferFrom {
        from: parse_address(&payload.from)?,
        to: parse_address(&payload.to)?,
        amount: payload.amount.parse()?,
    };
    submit(&state, call).await
}

#[utoipa::path(
    post,
    path = "/mint",
    request_body = MintRequest,
    responses(
        (status = 200, description = "Tokens minted", body = TxResponse),
        (status = 400, description = "Malformed request"),
        (status = 403, description = "Signer may not mint")
    ),
    tag = "Transactions"
)]
pub async fn mint_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<MintRequest>, JsonRejection>,
) -> Result<Json<TxResponse>, AppError> {
    let Json(payload) = payload?;
    let call = TokenCall::Mint {
        to: parse_address(&payload.to)?,
        amount: payload.amount.parse()?,
    };
    submit(&state, call).await
}

#[utoipa::path(
    post,
    path = "/transfer",
    request_body = TransferRequest,
    responses(
        (status = 200, description = "Transfer applied", body = TxResponse),
        (status = 400, description = "Malformed request"),
        (status = 422, description = "Insufficient balance")
    ),
    tag = "Transactions"
)]
pub async fn transfer_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<TransferRequest>, JsonRejection>,
) -> Result<Json<TxResponse>, AppError> {
    let Json(payload) = payload?;
    let call = TokenCall::Transfer {
        to: parse_address(&payload.to)?,
        amount: payload.amount.parse()?,
    };
    submit(&state, call).await
}

#[utoipa::path(
    post,
    path = "/approve",
    request_body = ApproveRequest,
    responses(
        (status = 200, description = "Allowance set", body = TxResponse),
        (status = 400, description = "Malformed request")
    ),
    tag = "Transactions"
)]
pub async fn approve_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<ApproveRequest>, JsonRejection>,
) -> Result<Json<TxResponse>, AppError> {
    let Json(payload) = payload?;
    let call = TokenCall::Approve {
        spender: parse_address(&payload.spender)?,
        amount: payload.amount.parse()?,
    };
    submit(&state, call).await
}

async fn submit(state: &AppState, call: TokenCall) -> Result<Json<TxResponse>, AppError> {
    let receipt = state.submitter.submit(call).await?;
    Ok(Json(TxResponse {
        hash: receipt.hash.to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/events",
    params(EventsQuery),
    responses(
        (status = 200, description = "Matching log entries", body = EventsResponse),
        (status = 400, description = "Malformed filter")
    ),
    tag = "Events"
)]
pub async fn events_handler(
    Extension(state): Extension<Arc<AppState>>,
    query: Result<Query<EventsQuery>, QueryRejection>,
) -> Result<Json<EventsResponse>, AppError> {
    let Query(query) = query?;
    let filter = query.to_filter()?;
    let cursor = query.cursor.unwrap_or(0);

    let events = state.token.events(&filter, cursor);
    let next_cursor = events.last().map_or(cursor, |logged| logged.index + 1);

    Ok(Json(EventsResponse {
        events,
        next_cursor,
    }))
}

#[utoipa::path(
    get,
    path = "/tx/{hash}",
    params(("hash" = String, Path, description = "Transaction hash returned by a write")),
    responses(
        (status = 200, description = "Transaction receipt", body = TransactionReceipt),
        (status = 404, description = "Unknown transaction")
    ),
    tag = "Transactions"
)]
pub async fn receipt_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(hash): Path<String>,
) -> Result<Json<TransactionReceipt>, AppError> {
    let parsed: B256 = hash
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid transaction hash: {hash}")))?;

    state
        .submitter
        .receipt(&parsed)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("transaction {hash}")))
}

#[utoipa::path(
    get,
    path = "/signer",
    responses(
        (status = 200, description = "Identity and network the gateway writes with", body = SignerResponse)
    ),
    tag = "Token"
)]
pub async fn signer_handler(Extension(state): Extension<Arc<AppState>>) -> Json<SignerResponse> {
    Json(SignerResponse {
        address: state.submitter.signer_address().to_string(),
        contract_address: state.submitter.contract_address().to_string(),
        network: state.network.name.clone(),
        chain_id: state.network.chain_id,
        rpc_url: state.network.rpc_url.clone(),
    })
}

// ── Router ────────────────────────────────────────────────────────────────────

#[derive(OpenApi)]
#[openapi(
    paths(
        token_handler, balance_handler, allowance_handler,
        transfer_from_handler, mint_handler, transfer_handler, approve_handler,
        events_handler, receipt_handler, signer_handler
    ),
    components(schemas(
        MintRequest, TransferRequest, ApproveRequest, TransferFromRequest,
        TokenResponse, BalanceResponse, AllowanceResponse, TxResponse,
        EventsResponse, SignerResponse, TransactionReceipt
    )),
    tags(
        (name = "Token", description = "Read-only token state"),
        (name = "Transactions", description = "Writes signed by the gateway key"),
        (name = "Events", description = "Transfer and Approval log")
    ),
    info(
        title = "Token Gateway API",
        version = "0.1.0",
        description = "HTTP access to an ERC20 ledger through a server-held signer"
    )
)]
pub struct ApiDoc;

pub fn create_app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health_check))
        .route("/token", get(token_handler))
        .route("/balance/:address", get(balance_handler))
        .route("/allowance/:owner/:spender", get(allowance_handler))
        .route("/transferFrom", post(transfer_from_handler))
        .route("/mint", post(mint_handler))
        .route("/transfer", post(transfer_handler))
        .route("/approve", post(approve_handler))
        .route("/events", get(events_handler))
        .route("/tx/:hash", get(receipt_handler))
        .route("/signer", get(signer_handler))
        .layer(Extension(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}
