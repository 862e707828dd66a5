// Persistence gateway: REST surface over the clients collection.
//
// Every response carries permissive cross-origin headers. Identifier
// remapping (store `_id` -> public `id`) happens here and only here, for
// single records and collections alike.

use crate::db::{self, ClientDocument};
use crate::types::{Client, ClientInput, ClientPatch};
use crate::validation::SchemaValidator;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use rusqlite::Connection;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct MessageBody {
    message: String,
}

fn error_response(status: StatusCode, message: &str) -> axum::response::Response {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// The one id-remapping transform: internal `_id` becomes the public `id`.
impl From<ClientDocument> for Client {
    fn from(doc: ClientDocument) -> Self {
        Self {
            id: doc.oid,
            name: doc.name,
            email: doc.email,
            phone: doc.phone,
            document: doc.document,
            address: doc.address,
            created_at: doc.created_at,
        }
    }
}

fn is_valid_id(id: &str) -> bool {
    uuid::Uuid::parse_str(id).is_ok()
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/clients - all clients, internal ids remapped
async fn get_clients(State(state): State<AppState>) -> impl IntoResponse {
    let conn = state.db.lock().unwrap();

    match db::get_all_clients(&conn) {
        Ok(docs) => {
            let clients: Vec<Client> = docs.into_iter().map(|doc| doc.into()).collect();
            (StatusCode::OK, Json(clients)).into_response()
        }
        Err(e) => {
            eprintln!("Error fetching clients: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch clients")
        }
    }
}

/// GET /api/clients/:id - one client; 404 for malformed or unknown ids
async fn get_client_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    if !is_valid_id(&id) {
        return error_response(StatusCode::NOT_FOUND, "Client not found");
    }

    let conn = state.db.lock().unwrap();

    match db::get_client(&conn, &id) {
        Ok(Some(doc)) => (StatusCode::OK, Json(Client::from(doc))).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Client not found"),
        Err(e) => {
            eprintln!("Error fetching client {}: {}", id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch client")
        }
    }
}

/// POST /api/clients - create; schema violations and duplicates are 500
async fn create_client(
    State(state): State<AppState>,
    Json(input): Json<ClientInput>,
) -> impl IntoResponse {
    if let Err(violations) = SchemaValidator::new().validate(&input) {
        for v in &violations {
            eprintln!("Rejected client create: {}", v);
        }
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create client");
    }

    let conn = state.db.lock().unwrap();

    match db::insert_client(&conn, &input) {
        Ok(doc) => (StatusCode::CREATED, Json(Client::from(doc))).into_response(),
        Err(e) => {
            eprintln!("Error creating client: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create client")
        }
    }
}

/// PUT /api/clients/:id - replace the named fields
async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ClientPatch>,
) -> impl IntoResponse {
    if !is_valid_id(&id) {
        return error_response(StatusCode::BAD_REQUEST, "Invalid client id");
    }

    if let Err(violations) = SchemaValidator::new().validate_patch(&patch) {
        for v in &violations {
            eprintln!("Rejected client update {}: {}", id, v);
        }
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to update client");
    }

    let conn = state.db.lock().unwrap();

    match db::update_client(&conn, &id, &patch) {
        Ok(Some(doc)) => (StatusCode::OK, Json(Client::from(doc))).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Client not found"),
        Err(e) => {
            eprintln!("Error updating client {}: {}", id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to update client")
        }
    }
}

/// DELETE /api/clients/:id - hard delete
async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    if !is_valid_id(&id) {
        return error_response(StatusCode::BAD_REQUEST, "Invalid client id");
    }

    let conn = state.db.lock().unwrap();

    match db::delete_client(&conn, &id) {
        Ok(true) => (
            StatusCode::OK,
            Json(MessageBody {
                message: "Client deleted successfully".to_string(),
            }),
        )
            .into_response(),
        Ok(false) => error_response(StatusCode::NOT_FOUND, "Client not found"),
        Err(e) => {
            eprintln!("Error deleting client {}: {}", id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete client")
        }
    }
}

/// OPTIONS - answered immediately for preflight purposes
async fn preflight() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/clients",
            get(get_clients).post(create_client).options(preflight),
        )
        .route(
            "/api/clients/:id",
            get(get_client_by_id)
                .put(update_client)
                .delete(delete_client)
                .options(preflight),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_app() -> Router {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::setup_database(&conn).unwrap();
        router(AppState::new(conn))
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = match body {
            Some(json) => Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, value)
    }

    fn ana() -> Value {
        json!({
            "name": "Ana Silva",
            "email": "ana@x.com",
            "phone": "5551234567",
            "document": "12345",
            "address": "Rua A, 10"
        })
    }

    #[tokio::test]
    async fn test_create_then_list_includes_client_exactly_once() {
        let app = test_app();

        let (status, created) = send(&app, Method::POST, "/api/clients", Some(ana())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(!created["id"].as_str().unwrap().is_empty());
        assert_eq!(created["name"], "Ana Silva");
        assert_eq!(created["email"], "ana@x.com");
        assert!(created.get("_id").is_none());
        assert!(created.get("createdAt").is_some());

        let (status, listed) = send(&app, Method::GET, "/api/clients", None).await;
        assert_eq!(status, StatusCode::OK);
        let listed = listed.as_array().unwrap();
        let matches: Vec<_> = listed
            .iter()
            .filter(|c| c["id"] == created["id"])
            .collect();
        assert_eq!(matches.len(), 1);
        assert!(matches[0].get("_id").is_none());
    }

    #[tokio::test]
    async fn test_get_single_client() {
        let app = test_app();
        let (_, created) = send(&app, Method::POST, "/api/clients", Some(ana())).await;
        let id = created["id"].as_str().unwrap();

        let (status, fetched) =
            send(&app, Method::GET, &format!("/api/clients/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_get_unknown_or_malformed_id_is_not_found() {
        let app = test_app();

        let missing = uuid::Uuid::new_v4();
        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/api/clients/{}", missing),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Client not found");

        let (status, _) = send(&app, Method::GET, "/api/clients/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_schema_violation_is_rejected_before_the_store() {
        let app = test_app();

        let mut short_phone = ana();
        short_phone["phone"] = json!("123");

        let (status, body) = send(&app, Method::POST, "/api/clients", Some(short_phone)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to create client");

        // A body missing fields entirely fails the same way.
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/clients",
            Some(json!({"name": "Ana Silva"})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (_, listed) = send(&app, Method::GET, "/api/clients", None).await;
        assert!(listed.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_email_fails_and_never_lists() {
        let app = test_app();
        send(&app, Method::POST, "/api/clients", Some(ana())).await;

        let mut dup = ana();
        dup["document"] = json!("99999");

        let (status, _) = send(&app, Method::POST, "/api/clients", Some(dup)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (_, listed) = send(&app, Method::GET, "/api/clients", None).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_round_trip_keeps_id_and_created_at() {
        let app = test_app();
        let (_, created) = send(&app, Method::POST, "/api/clients", Some(ana())).await;
        let id = created["id"].as_str().unwrap().to_string();

        let mut changed = ana();
        changed["phone"] = json!("5550000000");
        changed["address"] = json!("Rua C, 30");

        let (status, updated) = send(
            &app,
            Method::PUT,
            &format!("/api/clients/{}", id),
            Some(changed),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["phone"], "5550000000");
        assert_eq!(updated["address"], "Rua C, 30");
        assert_eq!(updated["id"], created["id"]);
        assert_eq!(updated["createdAt"], created["createdAt"]);

        let (_, fetched) = send(&app, Method::GET, &format!("/api/clients/{}", id), None).await;
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn test_update_error_statuses() {
        let app = test_app();

        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/clients/not-a-uuid",
            Some(ana()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid client id");

        let missing = uuid::Uuid::new_v4();
        let (status, _) = send(
            &app,
            Method::PUT,
            &format!("/api/clients/{}", missing),
            Some(ana()),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_rejects_named_fields_that_break_the_schema() {
        let app = test_app();
        let (_, created) = send(&app, Method::POST, "/api/clients", Some(ana())).await;
        let id = created["id"].as_str().unwrap().to_string();

        let (status, _) = send(
            &app,
            Method::PUT,
            &format!("/api/clients/{}", id),
            Some(json!({"phone": "123"})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        // The record is untouched.
        let (_, fetched) = send(&app, Method::GET, &format!("/api/clients/{}", id), None).await;
        assert_eq!(fetched["phone"], "5551234567");
    }

    #[tokio::test]
    async fn test_delete_flow() {
        let app = test_app();
        let (_, created) = send(&app, Method::POST, "/api/clients", Some(ana())).await;
        let id = created["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            Method::DELETE,
            &format!("/api/clients/{}", id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Client deleted successfully");

        let (_, listed) = send(&app, Method::GET, "/api/clients", None).await;
        assert!(listed.as_array().unwrap().is_empty());

        // Deleting the same id again is not-found, not success.
        let (status, _) = send(
            &app,
            Method::DELETE,
            &format!("/api/clients/{}", id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::DELETE, "/api/clients/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_options_is_no_content() {
        let app = test_app();
        let (status, _) = send(&app, Method::OPTIONS, "/api/clients", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_unhandled_verb_is_method_not_allowed() {
        let app = test_app();
        let (status, _) = send(&app, Method::PATCH, "/api/clients", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_responses_carry_permissive_cors_headers() {
        let app = test_app();

        let request = Request::builder()
            .method(Method::GET)
            .uri("/api/clients")
            .header(header::ORIGIN, "http://localhost:5173")
            .body(Body::empty())
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let allow_origin = response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .expect("missing allow-origin header");
        assert_eq!(allow_origin, "*");
    }
}
