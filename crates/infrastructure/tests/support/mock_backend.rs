//! In-process stand-in for the backend: an auth API and a filtered REST API.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, post};
use serde_json::{Value, json};
use tokio::task::JoinHandle;

/// Anonymous key the mock accepts.
pub const ANON_KEY: &str = "anon-test-key";

/// How the auth API answers signups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// Signup returns a session.
    #[default]
    Confirmed,
    /// Signup returns a user that must confirm their email.
    Unconfirmed,
    /// Signup always returns 500; login still works for known users.
    SignupDown,
}

/// Behaviour switches for one mock instance.
#[derive(Debug, Clone, Default)]
pub struct MockOptions {
    /// Signup behaviour.
    pub auth: AuthMode,
    /// Deletes answer 204 but leave the row in place.
    pub ignore_deletes: bool,
    /// Updates echo the patched row without storing it.
    pub echo_unsaved_updates: bool,
    /// Rows present before the run, per collection.
    pub seed: Vec<(String, Value)>,
}

/// A request as the mock saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub apikey: Option<String>,
    pub authorization: Option<String>,
    pub prefer: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
struct Backend {
    options: MockOptions,
    users: HashMap<String, (String, String)>,
    tokens: HashMap<String, String>,
    tables: HashMap<String, Vec<Value>>,
    requests: Vec<RecordedRequest>,
    next_user: u32,
}

type Shared = Arc<Mutex<Backend>>;

/// Handle to a running mock; the server stops when it is dropped.
pub struct MockBackend {
    base_url: String,
    state: Shared,
    join: JoinHandle<()>,
}

impl MockBackend {
    /// Starts a mock on an ephemeral local port.
    pub async fn start(options: MockOptions) -> Self {
        let mut backend = Backend {
            options: options.clone(),
            ..Backend::default()
        };
        for (collection, row) in options.seed {
            backend.tables.entry(collection).or_default().push(row);
        }
        let state = Arc::new(Mutex::new(backend));

        let app = Router::new()
            .route("/auth/v1/signup", post(signup))
            .route("/auth/v1/token", post(token))
            .route("/auth/v1/logout", post(logout))
            .route("/rest/v1/{collection}", any(rest))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let base_url = format!("http://{}", listener.local_addr().expect("local addr"));
        let join = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url,
            state,
            join,
        }
    }

    /// Root URL to point the gateway at.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Rows currently stored in `collection`.
    pub fn rows(&self, collection: &str) -> Vec<Value> {
        self.state
            .lock()
            .unwrap()
            .tables
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Registers an account up front, as if a previous run created it.
    pub fn register(&self, email: &str, password: &str) -> String {
        let mut backend = self.state.lock().unwrap();
        backend.create_user(email, password)
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.join.abort();
    }
}

impl Backend {
    fn record(
        &mut self,
        method: Method,
        path: String,
        query: Vec<(String, String)>,
        headers: &HeaderMap,
        body: &Bytes,
    ) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(String::from)
        };
        self.requests.push(RecordedRequest {
            method,
            path,
            query,
            apikey: header("apikey"),
            authorization: header("authorization"),
            prefer: header("prefer"),
            content_type: header("content-type"),
            body: serde_json::from_slice(body).ok(),
        });
    }

    fn create_user(&mut self, email: &str, password: &str) -> String {
        self.next_user += 1;
        let id = format!("00000000-0000-4000-8000-{:012}", self.next_user);
        self.users
            .insert(email.to_string(), (id.clone(), password.to_string()));
        id
    }

    fn issue_token(&mut self, user_id: &str) -> Value {
        let token = format!("token-for-{user_id}-{}", self.tokens.len());
        self.tokens.insert(token.clone(), user_id.to_string());
        json!({
            "access_token": token,
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "refresh",
            "user": {"id": user_id, "aud": "authenticated"}
        })
    }

    fn bearer_user(&self, headers: &HeaderMap) -> Option<String> {
        let token = headers
            .get("authorization")?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")?;
        self.tokens.get(token).cloned()
    }
}

fn has_anon_key(headers: &HeaderMap) -> bool {
    headers.get("apikey").and_then(|v| v.to_str().ok()) == Some(ANON_KEY)
}

fn credentials(body: &Bytes) -> Option<(String, String)> {
    let value: Value = serde_json::from_slice(body).ok()?;
    Some((
        value.get("email")?.as_str()?.to_string(),
        value.get("password")?.as_str()?.to_string(),
    ))
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(json!({"msg": message}))).into_response()
}

async fn signup(State(state): State<Shared>, headers: HeaderMap, body: Bytes) -> Response {
    let mut backend = state.lock().unwrap();
    backend.record(Method::POST, "auth/v1/signup".into(), Vec::new(), &headers, &body);

    if !has_anon_key(&headers) {
        return error(StatusCode::UNAUTHORIZED, "No API key found in request");
    }
    if backend.options.auth == AuthMode::SignupDown {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "Database error saving new user");
    }
    let Some((email, password)) = credentials(&body) else {
        return error(StatusCode::BAD_REQUEST, "missing email or password");
    };
    if backend.users.contains_key(&email) {
        return error(StatusCode::UNPROCESSABLE_ENTITY, "User already registered");
    }

    let id = backend.create_user(&email, &password);
    let reply = if backend.options.auth == AuthMode::Unconfirmed {
        json!({"id": id, "email": email, "confirmation_sent_at": "2024-01-01T00:00:00Z"})
    } else {
        backend.issue_token(&id)
    };
    (StatusCode::OK, axum::Json(reply)).into_response()
}

async fn token(
    State(state): State<Shared>,
    Query(query): Query<Vec<(String, String)>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mut backend = state.lock().unwrap();
    backend.record(Method::POST, "auth/v1/token".into(), query.clone(), &headers, &body);

    if !query.iter().any(|(k, v)| k == "grant_type" && v == "password") {
        return error(StatusCode::BAD_REQUEST, "unsupported_grant_type");
    }
    let Some((email, password)) = credentials(&body) else {
        return error(StatusCode::BAD_REQUEST, "missing email or password");
    };
    match backend.users.get(&email).cloned() {
        Some((id, stored)) if stored == password => {
            let reply = backend.issue_token(&id);
            (StatusCode::OK, axum::Json(reply)).into_response()
        }
        _ => error(StatusCode::BAD_REQUEST, "Invalid login credentials"),
    }
}

async fn logout(State(state): State<Shared>, headers: HeaderMap, body: Bytes) -> Response {
    let mut backend = state.lock().unwrap();
    backend.record(Method::POST, "auth/v1/logout".into(), Vec::new(), &headers, &body);

    if backend.bearer_user(&headers).is_none() {
        return error(StatusCode::UNAUTHORIZED, "invalid JWT");
    }
    StatusCode::NO_CONTENT.into_response()
}

fn matches(row: &Value, query: &[(String, String)]) -> bool {
    query.iter().all(|(column, value)| {
        value
            .strip_prefix("eq.")
            .is_none_or(|expected| row.get(column).and_then(Value::as_str) == Some(expected))
    })
}

async fn rest(
    State(state): State<Shared>,
    method: Method,
    Path(collection): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mut backend = state.lock().unwrap();
    backend.record(method.clone(), collection.clone(), query.clone(), &headers, &body);

    if !has_anon_key(&headers) {
        return error(StatusCode::UNAUTHORIZED, "No API key found in request");
    }
    match collection.as_str() {
        "no_content" => return StatusCode::NO_CONTENT.into_response(),
        "malformed" => return (StatusCode::OK, "<html>oops</html>").into_response(),
        "crash" => return error(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
        _ => {}
    }

    let param = |name: &str| {
        query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    };
    let user = backend.bearer_user(&headers);

    if method == Method::GET && param("select").as_deref() == Some("count") {
        let count = backend.tables.get(&collection).map_or(0, Vec::len);
        return (StatusCode::OK, axum::Json(json!([{ "count": count }]))).into_response();
    }

    // row-level security: every other call needs a signed-in user
    let Some(user) = user else {
        return error(StatusCode::UNAUTHORIZED, "permission denied");
    };
    let ignore_deletes = backend.options.ignore_deletes;
    let echo_unsaved_updates = backend.options.echo_unsaved_updates;
    let table = backend.tables.entry(collection).or_default();

    let rows = if method == Method::GET {
        let limit = param("limit").and_then(|l| l.parse().ok()).unwrap_or(usize::MAX);
        table
            .iter()
            .filter(|row| matches(row, &query))
            .take(limit)
            .cloned()
            .collect()
    } else if method == Method::POST {
        let Ok(row) = serde_json::from_slice::<Value>(&body) else {
            return error(StatusCode::BAD_REQUEST, "invalid json");
        };
        if row.get("user_id").and_then(Value::as_str) != Some(user.as_str()) {
            return error(
                StatusCode::FORBIDDEN,
                "new row violates row-level security policy",
            );
        }
        table.push(row.clone());
        vec![row]
    } else if method == Method::PATCH {
        let Ok(Value::Object(patch)) = serde_json::from_slice::<Value>(&body) else {
            return error(StatusCode::BAD_REQUEST, "invalid json");
        };
        let mut updated = Vec::new();
        for row in table.iter_mut().filter(|row| matches(row, &query)) {
            let mut next = row.clone();
            if let Some(fields) = next.as_object_mut() {
                fields.extend(patch.clone());
            }
            if !echo_unsaved_updates {
                *row = next.clone();
            }
            updated.push(next);
        }
        updated
    } else if method == Method::DELETE {
        let removed: Vec<Value> = table
            .iter()
            .filter(|row| matches(row, &query))
            .cloned()
            .collect();
        if !ignore_deletes {
            table.retain(|row| !matches(row, &query));
        }
        removed
    } else {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    };

    let status = if method == Method::POST {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    (status, axum::Json(Value::Array(rows))).into_response()
}
