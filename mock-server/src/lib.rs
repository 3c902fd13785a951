use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Deployment {
    pub id: String,
    pub product_id: String,
    pub environment: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct AnalyticsParams {
    pub range: Option<String>,
}

/// In-memory state. Lists come back in insertion order.
#[derive(Default)]
pub struct Store {
    pub products: Vec<Product>,
    pub deployments: Vec<Deployment>,
}

impl Store {
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products,
            deployments: Vec::new(),
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

type ApiResult<T> = Result<T, (StatusCode, Json<Value>)>;

pub fn app() -> Router {
    app_with(Store::default())
}

pub fn app_with(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    let api = Router::new()
        .route("/v1/products", get(list_products).post(create_product))
        .route("/v1/products/{id}", get(get_product))
        .route("/v1/deployments", get(list_deployments).post(create_deployment))
        .route("/v1/deployments/{id}", get(get_deployment))
        .route("/v1/analytics", get(analytics))
        .route_layer(middleware::from_fn(require_bearer));

    Router::new()
        .merge(api)
        .route("/_echo/headers", get(echo_headers))
        .with_state(db)
}

/// `RUST_LOG` if set, otherwise `debug` so resource creation is visible.
pub fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn error(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": message })))
}

async fn require_bearer(request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| !token.is_empty());

    if !authorized {
        return error(StatusCode::UNAUTHORIZED, "unauthorized").into_response();
    }
    next.run(request).await
}

async fn list_products(State(db): State<Db>, Query(params): Query<ListParams>) -> Json<Vec<Product>> {
    let store = db.read().await;
    let limit = params.limit.unwrap_or(usize::MAX);
    Json(store.products.iter().take(limit).cloned().collect())
}

async fn create_product(State(db): State<Db>, Json(input): Json<NewProduct>) -> (StatusCode, Json<Product>) {
    let product = Product {
        id: format!("prod_{}", Uuid::new_v4().simple()),
        name: input.name,
        description: input.description,
        created_at: Utc::now(),
    };
    debug!(id = %product.id, "created product");
    db.write().await.products.push(product.clone());
    (StatusCode::CREATED, Json(product))
}

async fn get_product(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<Json<Product>> {
    let store = db.read().await;
    store
        .products
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "product not found"))
}

async fn list_deployments(State(db): State<Db>) -> Json<Vec<Deployment>> {
    Json(db.read().await.deployments.clone())
}

/// Accepts any JSON object carrying string `product_id` and `environment`
/// fields; extra fields are ignored.
async fn create_deployment(
    State(db): State<Db>,
    Json(input): Json<Map<String, Value>>,
) -> ApiResult<(StatusCode, Json<Deployment>)> {
    let field = |name: &str| input.get(name).and_then(Value::as_str).map(str::to_string);
    let (Some(product_id), Some(environment)) = (field("product_id"), field("environment")) else {
        return Err(error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "product_id and environment are required",
        ));
    };

    let mut store = db.write().await;
    if !store.products.iter().any(|p| p.id == product_id) {
        return Err(error(StatusCode::NOT_FOUND, "product not found"));
    }

    let deployment = Deployment {
        id: format!("dep_{}", Uuid::new_v4().simple()),
        product_id,
        environment,
        status: "pending".to_string(),
        created_at: Utc::now(),
    };
    debug!(id = %deployment.id, environment = %deployment.environment, "created deployment");
    store.deployments.push(deployment.clone());
    Ok((StatusCode::CREATED, Json(deployment)))
}

async fn get_deployment(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<Json<Deployment>> {
    let store = db.read().await;
    store
        .deployments
        .iter()
        .find(|d| d.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "deployment not found"))
}

async fn analytics(State(db): State<Db>, Query(params): Query<AnalyticsParams>) -> Json<Value> {
    let store = db.read().await;
    Json(json!({
        "range": params.range.unwrap_or_else(|| "7d".to_string()),
        "products": store.products.len(),
        "deployments": store.deployments.len(),
    }))
}

/// Reflects request headers back as a JSON object, lower-cased names.
async fn echo_headers(headers: HeaderMap) -> Json<BTreeMap<String, String>> {
    Json(
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect(),
    )
}
