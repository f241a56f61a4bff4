//! HTTP surface of the server: authentication plus document collections.
//!
//! # Endpoints
//!
//! - `GET /health`: health check (no auth)
//! - `POST /auth/signup`, `POST /auth/signin`: issue a session (no auth)
//! - `POST /auth/signout`: end the current session
//! - `GET /me`: current user
//! - `GET|POST /collections/{collection}/documents`: list, query or insert
//! - `DELETE /collections/{collection}/documents/{id}`: delete one document

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde_json::Value;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::documents::SqliteItemStore;
use super::users::{UserError, UserRepository};
use crate::api::{
    DocumentQuery, ErrorBody, HealthResponse, SessionResponse, SignInRequest, SignUpRequest,
};
use crate::models::User;
use crate::wishlist::{Document, DocumentRef, ItemStore, Record, StoreError};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    users: Arc<UserRepository>,
    documents: Arc<SqliteItemStore>,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            users: Arc::new(UserRepository::new(pool.clone())),
            documents: Arc::new(SqliteItemStore::new(pool)),
        }
    }
}

/// Authenticated caller, added to request extensions by the auth layer.
#[derive(Debug, Clone)]
struct AuthUser {
    user: User,
    token: String,
}

/// Error response with a machine-readable code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: &'static str,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, error: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            error,
            message: message.into(),
        }
    }

    fn unauthorized(error: &'static str, message: &str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, error, message)
    }

    fn internal(e: impl std::fmt::Display) -> Self {
        tracing::error!("Internal error: {}", e);
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal",
            "Internal server error",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.error.to_string(),
                message: self.message,
            }),
        )
            .into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::InvalidQuery(message) => {
                ApiError::new(StatusCode::BAD_REQUEST, "invalid_query", message)
            }
            StoreError::PermissionDenied(message) => {
                ApiError::new(StatusCode::FORBIDDEN, "permission_denied", message)
            }
            other => ApiError::internal(other),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::EmailInUse => ApiError::new(
                StatusCode::CONFLICT,
                "email_in_use",
                "An account already exists for this email",
            ),
            UserError::InvalidCredentials => {
                ApiError::unauthorized("invalid_credentials", "Incorrect email or password")
            }
            UserError::InvalidInput(message) => {
                ApiError::new(StatusCode::BAD_REQUEST, "invalid_request", message)
            }
            UserError::PasswordHash(e) => ApiError::internal(e),
            UserError::Database(e) => ApiError::internal(e),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::internal(e)
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/auth/signup", post(sign_up))
        .route("/auth/signin", post(sign_in));

    let protected_routes = Router::new()
        .route("/auth/signout", post(sign_out))
        .route("/me", get(me))
        .route(
            "/collections/{collection}/documents",
            get(list_documents).post(insert_document),
        )
        .route(
            "/collections/{collection}/documents/{id}",
            delete(delete_document),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Resolves the bearer session token to a user.
async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(h) if h.starts_with("Bearer ") => h[7..].to_string(),
        Some(_) => {
            return Err(ApiError::unauthorized(
                "invalid_auth",
                "Authorization header must use Bearer scheme",
            ))
        }
        None => {
            return Err(ApiError::unauthorized(
                "missing_auth",
                "Authorization header required",
            ))
        }
    };

    match state.users.user_for_token(&token).await? {
        Some(user) => {
            request.extensions_mut().insert(AuthUser { user, token });
            Ok(next.run(request).await)
        }
        None => Err(ApiError::unauthorized(
            "invalid_session",
            "Session expired or signed out",
        )),
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let user = state
        .users
        .create(
            &request.first_name,
            &request.last_name,
            &request.email,
            &request.password,
        )
        .await?;
    let token = state.users.create_session(&user.uid).await?;
    tracing::info!("Created user {}", user.uid);

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            uid: user.uid,
            email: user.email,
            token,
        }),
    ))
}

async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let user = match state.users.verify(&request.email, &request.password).await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!("Sign in failed: {}", e);
            return Err(e.into());
        }
    };
    let token = state.users.create_session(&user.uid).await?;
    tracing::info!("User {} signed in", user.uid);

    Ok(Json(SessionResponse {
        uid: user.uid,
        email: user.email,
        token,
    }))
}

async fn sign_out(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<StatusCode, ApiError> {
    state.users.delete_session(&auth.token).await?;
    tracing::info!("User {} signed out", auth.user.uid);
    Ok(StatusCode::NO_CONTENT)
}

async fn me(Extension(auth): Extension<AuthUser>) -> Json<User> {
    Json(auth.user)
}

async fn insert_document(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Json(fields): Json<Record>,
) -> Result<(StatusCode, Json<DocumentRef>), ApiError> {
    let reference = state.documents.insert(&collection, fields).await?;
    Ok((StatusCode::CREATED, Json(reference)))
}

async fn list_documents(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Query(query): Query<DocumentQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let documents = match (query.field, query.equals) {
        (None, None) => state.documents.list_all(&collection).await?,
        (Some(field), Some(equals)) => {
            let value: Value = serde_json::from_str(&equals).map_err(|e| {
                ApiError::new(
                    StatusCode::BAD_REQUEST,
                    "invalid_query",
                    format!("equals must be JSON: {}", e),
                )
            })?;
            state.documents.query_eq(&collection, &field, &value).await?
        }
        _ => {
            return Err(ApiError::new(
                StatusCode::BAD_REQUEST,
                "invalid_query",
                "field and equals must be given together",
            ))
        }
    };
    Ok(Json(documents))
}

async fn delete_document(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state
        .documents
        .delete(&DocumentRef { collection, id })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::init_db;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::json;
    use tempfile::TempDir;
    use tower::ServiceExt;

    struct TestContext {
        app: Router,
        _temp_dir: TempDir,
    }

    async fn setup_app() -> TestContext {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_db(&temp_dir.path().join("test.db")).await.unwrap();
        TestContext {
            app: router(AppState::new(pool)),
            _temp_dir: temp_dir,
        }
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn sign_up_token(app: &Router) -> String {
        let (status, body) = send(
            app,
            "POST",
            "/auth/signup",
            None,
            Some(json!({
                "first_name": "Alexis",
                "last_name": "Urias",
                "email": "alexis@example.com",
                "password": "hunter22"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let ctx = setup_app().await;
        let (status, body) = send(&ctx.app, "GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_sign_up_sign_in_and_me() {
        let ctx = setup_app().await;
        let token = sign_up_token(&ctx.app).await;

        let (status, body) = send(&ctx.app, "GET", "/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["first_name"], "Alexis");
        assert_eq!(body["email"], "alexis@example.com");

        let (status, body) = send(
            &ctx.app,
            "POST",
            "/auth/signin",
            None,
            Some(json!({"email": "alexis@example.com", "password": "hunter22"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_ne!(body["token"].as_str().unwrap(), token);
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password() {
        let ctx = setup_app().await;
        sign_up_token(&ctx.app).await;

        let (status, body) = send(
            &ctx.app,
            "POST",
            "/auth/signin",
            None,
            Some(json!({"email": "alexis@example.com", "password": "wrong-pass"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "invalid_credentials");
    }

    #[tokio::test]
    async fn test_duplicate_sign_up_conflicts() {
        let ctx = setup_app().await;
        sign_up_token(&ctx.app).await;

        let (status, body) = send(
            &ctx.app,
            "POST",
            "/auth/signup",
            None,
            Some(json!({"email": "alexis@example.com", "password": "another1"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "email_in_use");
    }

    #[tokio::test]
    async fn test_sign_out_invalidates_token() {
        let ctx = setup_app().await;
        let token = sign_up_token(&ctx.app).await;

        let (status, _) = send(&ctx.app, "POST", "/auth/signout", Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&ctx.app, "GET", "/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "invalid_session");
    }

    #[tokio::test]
    async fn test_documents_require_auth() {
        let ctx = setup_app().await;

        let (status, body) = send(
            &ctx.app,
            "GET",
            "/collections/wishlist/documents",
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "missing_auth");
    }

    #[tokio::test]
    async fn test_document_crud() {
        let ctx = setup_app().await;
        let token = sign_up_token(&ctx.app).await;
        let uri = "/collections/wishlist/documents";

        for brand in ["Nike", "Kangol"] {
            let (status, body) = send(
                &ctx.app,
                "POST",
                uri,
                Some(&token),
                Some(json!({"itemName": "Hat", "brand": brand})),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
            assert_eq!(body["collection"], "wishlist");
        }

        let (status, body) = send(
            &ctx.app,
            "GET",
            "/collections/wishlist/documents?field=itemName&equals=%22Hat%22",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let matches = body.as_array().unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0]["fields"]["brand"], "Nike");

        let first_id = matches[0]["id"].as_str().unwrap();
        let (status, _) = send(
            &ctx.app,
            "DELETE",
            &format!("{}/{}", uri, first_id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = send(&ctx.app, "GET", uri, Some(&token), None).await;
        let remaining = body.as_array().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0]["fields"]["brand"], "Kangol");
    }

    #[tokio::test]
    async fn test_malformed_queries() {
        let ctx = setup_app().await;
        let token = sign_up_token(&ctx.app).await;

        for uri in [
            "/collections/wishlist/documents?field=item.name&equals=%22Hat%22",
            "/collections/wishlist/documents?field=itemName&equals=Hat",
            "/collections/wishlist/documents?field=itemName",
        ] {
            let (status, body) = send(&ctx.app, "GET", uri, Some(&token), None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(body["error"], "invalid_query");
        }
    }
}
