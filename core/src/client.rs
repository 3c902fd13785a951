//! Blocking client for the BlackRoad API.
//!
//! # Design
//! `BlackRoadClient` holds an immutable `ClientConfig` and a `Transport`.
//! Every operation is one stateless round trip: `build_request` describes the
//! call as data, the transport executes it, and `decode` turns the body into
//! the expected type. Nothing is retried and status codes are not inspected;
//! a body that does not match the expected shape is a `Decode` error carrying
//! the status.

use std::time::Instant;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::{Deployment, NewDeployment, NewProduct, Product};

/// Page size the other BlackRoad SDKs use when the caller does not pick one.
pub const DEFAULT_PRODUCT_LIMIT: u32 = 100;

const PRODUCTS: &str = "/v1/products";
const DEPLOYMENTS: &str = "/v1/deployments";
const ANALYTICS: &str = "/v1/analytics";

/// Synchronous client for the BlackRoad API.
///
/// Cheap to share: wrap it in an `Arc` or borrow it across scoped threads.
/// Concurrent calls share the transport's connection pool and nothing else.
#[derive(Debug, Clone)]
pub struct BlackRoadClient<T = UreqTransport> {
    config: ClientConfig,
    transport: T,
}

impl BlackRoadClient<UreqTransport> {
    /// Client for the production API with default timeout and user agent.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_config(ClientConfig::new(api_key))
    }

    pub fn with_config(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(config.timeout);
        Self { config, transport }
    }
}

impl<T: Transport> BlackRoadClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // -----------------------------------------------------------------------
    // Products
    // -----------------------------------------------------------------------

    pub fn list_products(&self, limit: u32) -> Result<Vec<Product>, ApiError> {
        self.get(&format!("{PRODUCTS}?limit={limit}"))
    }

    pub fn get_product(&self, id: &str) -> Result<Product, ApiError> {
        self.get(&format!("{PRODUCTS}/{id}"))
    }

    pub fn create_product(&self, input: &NewProduct) -> Result<Product, ApiError> {
        self.post(PRODUCTS, input)
    }

    // -----------------------------------------------------------------------
    // Deployments
    // -----------------------------------------------------------------------

    pub fn list_deployments(&self) -> Result<Vec<Deployment>, ApiError> {
        self.get(DEPLOYMENTS)
    }

    pub fn create_deployment(&self, product_id: &str, environment: &str) -> Result<Deployment, ApiError> {
        let input = NewDeployment {
            product_id: product_id.to_string(),
            environment: environment.to_string(),
        };
        self.post(DEPLOYMENTS, &input)
    }

    pub fn get_deployment_status(&self, id: &str) -> Result<Deployment, ApiError> {
        self.get(&format!("{DEPLOYMENTS}/{id}"))
    }

    /// Free-form deployment: posts `config` as-is and returns whatever JSON
    /// document the server answers with.
    pub fn deploy(&self, config: &Map<String, Value>) -> Result<Value, ApiError> {
        self.post(DEPLOYMENTS, config)
    }

    // -----------------------------------------------------------------------
    // Analytics
    // -----------------------------------------------------------------------

    /// Usage analytics for a time range such as `"7d"` or `"24h"`.
    pub fn get_analytics(&self, range: &str) -> Result<Value, ApiError> {
        let range: String = url::form_urlencoded::byte_serialize(range.as_bytes()).collect();
        self.get(&format!("{ANALYTICS}?range={range}"))
    }

    // -----------------------------------------------------------------------
    // Generic verbs
    // -----------------------------------------------------------------------

    pub fn get<R: DeserializeOwned>(&self, endpoint: &str) -> Result<R, ApiError> {
        self.request_json(HttpMethod::Get, endpoint, None::<&()>)
    }

    pub fn post<R, B>(&self, endpoint: &str, body: &B) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request_json(HttpMethod::Post, endpoint, Some(body))
    }

    pub fn put<R, B>(&self, endpoint: &str, body: &B) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request_json(HttpMethod::Put, endpoint, Some(body))
    }

    pub fn delete<R: DeserializeOwned>(&self, endpoint: &str) -> Result<R, ApiError> {
        self.request_json(HttpMethod::Delete, endpoint, None::<&()>)
    }

    /// Send a request and decode the response body as `R`.
    pub fn request_json<R, B>(&self, method: HttpMethod, endpoint: &str, body: Option<&B>) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.request(method, endpoint, body)?;
        decode(&response)
    }

    /// Send a request and return the response undecoded, whatever its status.
    pub fn request<B>(&self, method: HttpMethod, endpoint: &str, body: Option<&B>) -> Result<HttpResponse, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let request = self.build_request(method, endpoint, body)?;
        let started = Instant::now();
        let response = self.transport.execute(&request)?;
        debug!(
            method = %request.method,
            url = %request.url,
            status = response.status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "blackroad request"
        );
        Ok(response)
    }

    /// Describe a request without sending it.
    ///
    /// The URL is `base_url` followed by `endpoint` verbatim. Exactly three
    /// headers are set: bearer authorization, JSON content type and the
    /// configured user agent.
    pub fn build_request<B>(&self, method: HttpMethod, endpoint: &str, body: Option<&B>) -> Result<HttpRequest, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let body = body
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| ApiError::Serialization(e.to_string()))?;

        Ok(HttpRequest {
            method,
            url: format!("{}{}", self.config.base_url, endpoint),
            headers: vec![
                ("Authorization".to_string(), format!("Bearer {}", self.config.api_key)),
                ("Content-Type".to_string(), "application/json".to_string()),
                ("User-Agent".to_string(), self.config.user_agent.clone()),
            ],
            body,
        })
    }
}

/// Deserialize a response body regardless of its status code.
pub fn decode<R: DeserializeOwned>(response: &HttpResponse) -> Result<R, ApiError> {
    serde_json::from_slice(&response.body).map_err(|e| ApiError::Decode {
        status: response.status,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;

    /// Records every request and answers with a canned response.
    struct CannedTransport {
        status: u16,
        body: Vec<u8>,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl CannedTransport {
        fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
            Self {
                status,
                body: body.into(),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn last(&self) -> HttpRequest {
            self.seen.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl Transport for CannedTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(HttpResponse {
                status: self.status,
                body: self.body.clone(),
            })
        }
    }

    struct RefusingTransport;

    impl Transport for RefusingTransport {
        fn execute(&self, _request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            Err(ApiError::Transport("connection refused".to_string()))
        }
    }

    fn config() -> ClientConfig {
        ClientConfig::new("test-key").with_base_url("http://localhost:3000")
    }

    fn canned(status: u16, body: impl Into<Vec<u8>>) -> BlackRoadClient<CannedTransport> {
        BlackRoadClient::with_transport(config(), CannedTransport::new(status, body))
    }

    const PRODUCT: &str = r#"{"id":"p1","name":"Lucidia","description":"agent runtime","created_at":"2024-01-01T00:00:00Z"}"#;
    const DEPLOYMENT: &str = r#"{"id":"d1","product_id":"p1","environment":"staging","status":"pending","created_at":"2024-01-01T00:00:00Z"}"#;

    #[test]
    fn build_request_sets_exactly_three_headers() {
        let req = canned(200, "[]")
            .build_request(HttpMethod::Get, "/v1/products?limit=5", None::<&()>)
            .unwrap();
        assert_eq!(req.headers.len(), 3);
        assert_eq!(req.header("authorization"), Some("Bearer test-key"));
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("user-agent"), Some(config().user_agent.as_str()));
        assert!(req.body.is_none());
    }

    #[test]
    fn build_request_concatenates_without_normalizing() {
        let client = BlackRoadClient::with_transport(
            ClientConfig::new("k").with_base_url("http://localhost:3000/"),
            CannedTransport::new(200, "{}"),
        );
        let req = client.build_request(HttpMethod::Get, "/v1/products", None::<&()>).unwrap();
        assert_eq!(req.url, "http://localhost:3000//v1/products");
    }

    #[test]
    fn build_request_rejects_unserializable_body() {
        let mut body = BTreeMap::new();
        body.insert(vec![1u8, 2], "value");
        let err = canned(200, "{}")
            .build_request(HttpMethod::Post, "/v1/products", Some(&body))
            .unwrap_err();
        assert!(matches!(err, ApiError::Serialization(_)));
    }

    #[test]
    fn list_products_builds_limit_query() {
        let client = canned(200, "[]");
        let products = client.list_products(25).unwrap();
        assert!(products.is_empty());
        let req = client.transport.last();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/v1/products?limit=25");
    }

    #[test]
    fn get_product_decodes_body() {
        let client = canned(200, PRODUCT);
        let product = client.get_product("p1").unwrap();
        assert_eq!(product.name, "Lucidia");
        assert_eq!(client.transport.last().url, "http://localhost:3000/v1/products/p1");
    }

    #[test]
    fn get_product_error_body_is_decode_error() {
        let err = canned(404, r#"{"error":"product not found"}"#)
            .get_product("missing-id")
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode { status: 404, .. }));
    }

    #[test]
    fn matching_body_decodes_even_on_error_status() {
        let product = canned(500, PRODUCT).get_product("p1").unwrap();
        assert_eq!(product.id, "p1");
    }

    #[test]
    fn create_deployment_posts_payload() {
        let client = canned(201, DEPLOYMENT);
        let deployment = client.create_deployment("p1", "staging").unwrap();
        assert_eq!(deployment.status, "pending");

        let req = client.transport.last();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/v1/deployments");
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"product_id": "p1", "environment": "staging"}));
    }

    #[test]
    fn get_deployment_status_targets_id() {
        let client = canned(200, DEPLOYMENT);
        client.get_deployment_status("d1").unwrap();
        assert_eq!(client.transport.last().url, "http://localhost:3000/v1/deployments/d1");
    }

    #[test]
    fn deploy_sends_config_verbatim() {
        let client = canned(202, r#"{"accepted":true}"#);
        let mut config = Map::new();
        config.insert("product_id".to_string(), json!("p1"));
        config.insert("replicas".to_string(), json!(3));

        let result = client.deploy(&config).unwrap();
        assert_eq!(result, json!({"accepted": true}));

        let req = client.transport.last();
        assert_eq!(req.url, "http://localhost:3000/v1/deployments");
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"product_id": "p1", "replicas": 3}));
    }

    #[test]
    fn deploy_surfaces_decode_failure() {
        let err = canned(502, "<html>bad gateway</html>")
            .deploy(&Map::new())
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode { status: 502, .. }));
    }

    #[test]
    fn non_utf8_body_is_decode_error() {
        let err = canned(200, vec![0xff, 0xfe, b'{', b'}'])
            .get_analytics("7d")
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode { status: 200, .. }));
    }

    #[test]
    fn get_analytics_encodes_range() {
        let client = canned(200, r#"{"requests":10}"#);
        client.get_analytics("7d").unwrap();
        assert_eq!(client.transport.last().url, "http://localhost:3000/v1/analytics?range=7d");
        client.get_analytics("last week").unwrap();
        assert_eq!(
            client.transport.last().url,
            "http://localhost:3000/v1/analytics?range=last+week"
        );
    }

    #[test]
    fn delete_has_no_body() {
        let client = canned(200, "{}");
        let _: Value = client.delete("/v1/deployments/d1").unwrap();
        let req = client.transport.last();
        assert_eq!(req.method, HttpMethod::Delete);
        assert!(req.body.is_none());
    }

    #[test]
    fn transport_failure_propagates() {
        let client = BlackRoadClient::with_transport(config(), RefusingTransport);
        assert!(matches!(client.list_products(10), Err(ApiError::Transport(_))));
        assert!(matches!(client.deploy(&Map::new()), Err(ApiError::Transport(_))));
    }
}
