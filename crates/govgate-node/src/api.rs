//! HTTP API server for the Govgate node.
//!
//! `POST /authenticate` exchanges a signed authentication credential for a
//! session token. Every other path is a governed resource, readable with
//! `GET` and writable with `POST` by the bearer of a valid token.

use axum::{
    body::Bytes,
    extract::{Path, Request, State},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        StatusCode,
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;

use govgate_auth::{AuthError, Identity};
use govgate_dataverse::DataverseError;

use crate::state::AppState;

const ACTION_READ: &str = "read";
const ACTION_STORE: &str = "store";

// --- Response types ---

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize)]
pub struct StoreResponse {
    pub resource: String,
    pub size: usize,
}

/// An error rendered as a status code and an [`ErrorResponse`] body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn internal(err: impl std::fmt::Display) -> Self {
        tracing::error!(error = %err, "request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let status = match &err {
            AuthError::Credential(_)
            | AuthError::ServiceMismatch { .. }
            | AuthError::InvalidToken(_)
            | AuthError::TokenExpired
            | AuthError::MissingBearerToken => StatusCode::UNAUTHORIZED,
            AuthError::Unauthorized { .. } | AuthError::Governance(DataverseError::NoResult) => {
                StatusCode::FORBIDDEN
            }
            AuthError::Governance(_) => StatusCode::BAD_GATEWAY,
            AuthError::TokenIssue(_) | AuthError::Core(_) => return Self::internal(&err),
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

// --- Middleware ---

/// Verify the bearer token and expose its [`Identity`] to the handler.
async fn require_bearer(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match state.tokens.verify_header(header) {
        Ok(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(e) => {
            tracing::warn!(path = %request.uri().path(), error = %e, "bearer token rejected");
            ApiError::from(e).into_response()
        }
    }
}

// --- Handlers ---

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
    })
}

async fn handle_authenticate(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    // Every refusal is a 401; the proxy has already logged the cause.
    let identity = state
        .proxy
        .authenticate(&body)
        .await
        .map_err(|e| ApiError::new(StatusCode::UNAUTHORIZED, e.to_string()))?;
    let token = state.tokens.issue(&identity)?;
    // The token goes out unquoted despite the JSON content type.
    Ok(([(CONTENT_TYPE, "application/json")], token).into_response())
}

async fn handle_fetch(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(resource): Path<String>,
) -> Result<Vec<u8>, ApiError> {
    state
        .guard
        .authorize(&identity, &resource, ACTION_READ)
        .await?;

    match state.storage.get_resource(&resource).map_err(ApiError::internal)? {
        Some(data) => Ok(data),
        None => Err(ApiError::new(
            StatusCode::NOT_FOUND,
            format!("resource not found: {}", resource),
        )),
    }
}

async fn handle_store(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(resource): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<StoreResponse>), ApiError> {
    if !identity.can(ACTION_STORE) {
        tracing::warn!(did = %identity.subject(), resource = %resource, "store not granted");
        return Err(AuthError::Unauthorized {
            did: identity.subject().to_string(),
            action: ACTION_STORE.to_string(),
            resource,
        }
        .into());
    }

    state
        .storage
        .put_resource(&resource, &body)
        .map_err(ApiError::internal)?;
    tracing::info!(did = %identity.subject(), resource = %resource, size = body.len(), "resource stored");

    Ok((
        StatusCode::CREATED,
        Json(StoreResponse {
            resource,
            size: body.len(),
        }),
    ))
}

// --- Server ---

pub fn build_router(state: Arc<AppState>) -> Router {
    let resources = Router::new()
        .route("/{*resource}", get(handle_fetch).post(handle_store))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    Router::new()
        .route("/health", get(handle_health))
        .route("/authenticate", post(handle_authenticate))
        .merge(resources)
        .with_state(state)
}

pub async fn start_api_server(listen_addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!(%listen_addr, "HTTP API server started");
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use govgate_auth::{AuthProxy, ResourceGuard, SessionTokenIssuer};
    use govgate_core::TokenConfig;
    use govgate_credentials::{AuthClaimParser, AuthCredentialBuilder, AuthCredentialConfig};
    use govgate_crypto::{KeyAlgorithm, KeyPair};
    use govgate_dataverse::{GovernanceClient, InMemoryPolicyContract, InMemoryTripleStore};
    use http_body_util::BodyExt;
    use std::path::PathBuf;
    use tower::ServiceExt;

    use crate::storage::Storage;

    const SERVICE: &str = "did:key:zQ3shZxyDoD3QorxHJrFS68EjzDgQZSqZcj3wQqc1ngbF1vgz";
    const SERVICE_GOV: &str = "axone1service";
    const DATASET: &str = "did:key:dataset";
    const DATASET_GOV: &str = "axone1dataset";

    struct Fixture {
        app: Router,
        user: KeyPair,
        dir: PathBuf,
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            std::fs::remove_dir_all(&self.dir).ok();
        }
    }

    fn fixture(service_actions: &[&str], dataset_actions: &[&str]) -> Fixture {
        let user = KeyPair::generate(KeyAlgorithm::Secp256k1);
        let did = user.did();

        let store = InMemoryTripleStore::new();
        store.set_governance(SERVICE, format!("contract:law-stone:{}", SERVICE_GOV));
        store.set_governance(DATASET, format!("contract:law-stone:{}", DATASET_GOV));
        let contract = InMemoryPolicyContract::new();
        contract.deploy(SERVICE_GOV);
        contract.deploy(DATASET_GOV);
        contract.grant(SERVICE_GOV, &did, service_actions.iter().copied());
        contract.grant(DATASET_GOV, &did, dataset_actions.iter().copied());
        let governance = Arc::new(GovernanceClient::new(
            Arc::new(store),
            Arc::new(contract),
            "axone1cognitarium",
        ));

        let proxy = AuthProxy::with_governance_address(
            SERVICE,
            SERVICE_GOV,
            Arc::new(AuthClaimParser::default()),
            governance.clone(),
        );
        let tokens = SessionTokenIssuer::new(&TokenConfig {
            secret: Some("node-test-secret".into()),
            ..Default::default()
        })
        .unwrap();
        let dir = std::env::temp_dir().join(format!("govgate-api-{}", rand::random::<u64>()));
        let storage = Storage::open(&dir).unwrap();
        let state = AppState::new(proxy, tokens, ResourceGuard::new(governance), storage);

        Fixture {
            app: build_router(Arc::new(state)),
            user,
            dir,
        }
    }

    fn credential(kp: &KeyPair, service: &str) -> Vec<u8> {
        AuthCredentialBuilder::new(AuthCredentialConfig {
            to_service: service.into(),
            ..Default::default()
        })
        .sign_to_vec(kp)
        .unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Bytes) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body)
    }

    async fn login(f: &Fixture) -> String {
        let request = Request::builder()
            .method("POST")
            .uri("/authenticate")
            .body(Body::from(credential(&f.user, SERVICE)))
            .unwrap();
        let (status, body) = send(&f.app, request).await;
        assert_eq!(status, StatusCode::OK);
        String::from_utf8(body.to_vec()).unwrap()
    }

    fn with_token(method: &str, uri: &str, token: &str, body: Body) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .body(body)
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let f = fixture(&[], &[]);
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(&f.app, request).await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_authenticate_returns_raw_token() {
        let f = fixture(&["read"], &[]);
        let request = Request::builder()
            .method("POST")
            .uri("/authenticate")
            .body(Body::from(credential(&f.user, SERVICE)))
            .unwrap();
        let response = f.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let token = String::from_utf8(body.to_vec()).unwrap();
        assert!(!token.starts_with('"') && !token.ends_with('"'));
        assert_eq!(token.split('.').count(), 3);
    }

    #[tokio::test]
    async fn test_store_then_fetch() {
        let f = fixture(&["read", "store"], &["read"]);
        let token = login(&f).await;

        let uri = format!("/{}", DATASET);
        let (status, body) = send(
            &f.app,
            with_token("POST", &uri, &token, Body::from("hello")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["resource"], DATASET);
        assert_eq!(json["size"], 5);

        let (status, body) = send(&f.app, with_token("GET", &uri, &token, Body::empty())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], b"hello");
    }

    #[tokio::test]
    async fn test_fetch_absent_resource() {
        let f = fixture(&["read"], &["read"]);
        let token = login(&f).await;
        let uri = format!("/{}", DATASET);
        let (status, _) = send(&f.app, with_token("GET", &uri, &token, Body::empty())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_fetch_prohibited_by_resource() {
        let f = fixture(&["read"], &[]);
        let token = login(&f).await;
        let uri = format!("/{}", DATASET);
        let (status, body) = send(&f.app, with_token("GET", &uri, &token, Body::empty())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"].as_str().unwrap().contains("is not permitted to read"));
    }

    #[tokio::test]
    async fn test_fetch_ungoverned_resource() {
        let f = fixture(&["read"], &["read"]);
        let token = login(&f).await;
        let (status, _) = send(
            &f.app,
            with_token("GET", "/did:key:elsewhere", &token, Body::empty()),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_store_requires_grant() {
        let f = fixture(&["read"], &["read"]);
        let token = login(&f).await;
        let uri = format!("/{}", DATASET);
        let (status, _) = send(&f.app, with_token("POST", &uri, &token, Body::from("x"))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_authenticate_rejects_wrong_service() {
        let f = fixture(&["read"], &[]);
        let request = Request::builder()
            .method("POST")
            .uri("/authenticate")
            .body(Body::from(credential(&f.user, "did:key:other")))
            .unwrap();
        let (status, body) = send(&f.app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"]
            .as_str()
            .unwrap()
            .starts_with("credential not intended for this service"));
    }

    #[tokio::test]
    async fn test_authenticate_rejects_garbage() {
        let f = fixture(&[], &[]);
        let request = Request::builder()
            .method("POST")
            .uri("/authenticate")
            .body(Body::from("not a credential"))
            .unwrap();
        let (status, _) = send(&f.app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_missing_or_invalid_token() {
        let f = fixture(&["read"], &["read"]);
        let uri = format!("/{}", DATASET);

        let request = Request::builder().uri(&uri).body(Body::empty()).unwrap();
        let (status, body) = send(&f.app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "couldn't find bearer token");

        let (status, _) = send(&f.app, with_token("GET", &uri, "abc.def.ghi", Body::empty())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
