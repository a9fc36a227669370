use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

pub const API_KEY_HEADER: &str = "API-Key";

/// Products the order endpoint accepts.
pub const PRODUCTS: [&str; 6] = [
    "EgrnObject",
    "EgrnObjectFast",
    "EgrnRightList",
    "EgrnRightListFast",
    "RiskAssessmentV2",
    "RiskAssessmentFastV2",
];

/// Queries for which `/search/` answers with the rate-limit error.
pub const LIMIT_EXCEEDED_QUERY: &str = "limit";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub product_name: String,
    pub object_key: String,
    #[serde(default)]
    pub object_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

#[derive(Deserialize)]
pub struct OrderRequest {
    pub order_items: Vec<OrderItem>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct OrderedItem {
    pub order_item_id: Uuid,
    pub status: String,
    #[serde(flatten)]
    pub item: OrderItem,
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub order_item_ids: Vec<Uuid>,
    #[serde(default)]
    pub offset: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    1000
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub query: String,
}

#[derive(Clone)]
pub struct AppState {
    api_key: Arc<str>,
    orders: Arc<RwLock<HashMap<Uuid, OrderedItem>>>,
}

type ApiResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

pub fn app(api_key: &str) -> Router {
    let state = AppState {
        api_key: Arc::from(api_key),
        orders: Arc::new(RwLock::new(HashMap::new())),
    };
    Router::new()
        .route("/search/", get(search))
        .route("/order/", post(create_order))
        .route("/orders/", post(order_status))
        .with_state(state)
}

pub async fn run(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(api_key)).await
}

fn server_error(message: &str) -> (StatusCode, Json<Value>) {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": message })))
}

/// Missing key is 403; a wrong key is reported the way the real API does it,
/// as a 500 with an `error` text.
fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, Json<Value>)> {
    match headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) {
        None => Err((StatusCode::FORBIDDEN, Json(json!({ "error": "доступ запрещён" })))),
        Some(key) if key == &*state.api_key => Ok(()),
        Some(_) => Err(server_error("невалидный ключ")),
    }
}

async fn search(State(state): State<AppState>, headers: HeaderMap, Query(params): Query<SearchParams>) -> ApiResult {
    authorize(&state, &headers)?;
    let query = params.query.trim();
    if query.is_empty() {
        return Err((StatusCode::BAD_REQUEST, Json(json!({ "error": "пустой запрос" }))));
    }
    if query == LIMIT_EXCEEDED_QUERY {
        return Err(server_error("Вы превысили лимит использования поиска"));
    }
    Ok(Json(json!({
        "data": [{
            "ObjectType": "Квартира",
            "Number": "77:01:0001001:1",
            "Address": query,
            "Area": "42.5",
            "kad_price": "8500000",
            "Status": "Актуально",
        }]
    })))
}

async fn create_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<OrderRequest>,
) -> ApiResult {
    authorize(&state, &headers)?;
    if request.order_items.is_empty() {
        return Err((StatusCode::BAD_REQUEST, Json(json!({ "error": "пустой заказ" }))));
    }
    if let Some(item) = request.order_items.iter().find(|i| !PRODUCTS.contains(&i.product_name.as_str())) {
        return Err(server_error(&format!("неверно указано поле product_name: {}", item.product_name)));
    }

    let mut orders = state.orders.write().await;
    let ordered: Vec<OrderedItem> = request
        .order_items
        .into_iter()
        .map(|item| {
            let ordered = OrderedItem {
                order_item_id: Uuid::new_v4(),
                status: "inprogress".to_string(),
                item,
            };
            orders.insert(ordered.order_item_id, ordered.clone());
            ordered
        })
        .collect();
    info!(items = ordered.len(), "order accepted");
    Ok(Json(json!({ "data": ordered })))
}

async fn order_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<StatusRequest>,
) -> ApiResult {
    authorize(&state, &headers)?;
    let orders = state.orders.read().await;
    let found: Vec<&OrderedItem> = request
        .order_item_ids
        .iter()
        .filter_map(|id| orders.get(id))
        .skip(request.offset)
        .take(request.limit)
        .collect();
    Ok(Json(json!({ "data": found })))
}
