//! End-to-end tests: `LeadSync` over the real `ApiClient`, talking to a
//! small axum server that plays the leads backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use super::*;
use crate::api::session::Session;
use crate::api::ApiClient;
use crate::models::{UserInfo, UserRole};

#[derive(Default)]
struct Recorded {
    list_queries: Vec<HashMap<String, String>>,
    auth_headers: Vec<Option<String>>,
    searches: Vec<Value>,
    updates: Vec<(String, Value)>,
}

type Shared = Arc<Mutex<Recorded>>;

fn lead_json(id: &str, status: &str) -> Value {
    json!({
        "_id": id,
        "FirstName": "Asha",
        "LastName": "Rao",
        "ContactNumber": 9876543210u64,
        "callstatus": status,
        "productname": "Palm Grove",
        "budget": 7500000,
        "createdAt": "2024-06-01T10:00:00Z"
    })
}

async fn list_leads(
    State(rec): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    {
        let mut rec = rec.lock().unwrap();
        rec.auth_headers.push(
            headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        );
        rec.list_queries.push(params.clone());
    }

    if params.get("callby").map(String::as_str) == Some("blocked") {
        return (
            StatusCode::OK,
            Json(json!({"success": false, "message": "Not allowed to view these leads"})),
        );
    }

    match params.get("page").map(String::as_str) {
        Some("1") => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": [lead_json("l1", "Warm"), lead_json("l2", "Cold")],
                "pagination": {"currentPage": 1, "totalPages": 3, "totalItems": 45, "itemsPerPage": 20}
            })),
        ),
        _ => (StatusCode::NOT_FOUND, Json(json!({"message": "page not found"}))),
    }
}

async fn search_leads(State(rec): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    rec.lock().unwrap().searches.push(body);
    Json(json!({
        "success": true,
        "data": [lead_json("s1", "Site Visit Done")],
        "total": 1
    }))
}

async fn update_lead(
    State(rec): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    rec.lock().unwrap().updates.push((id, body));
    Json(json!({"success": true, "message": "Lead updated"}))
}

async fn call_statuses() -> Json<Value> {
    Json(json!({"success": true, "data": ["Warm", "Cold", "Site Visit Done"]}))
}

async fn products() -> Json<Value> {
    Json(json!({"success": true, "data": ["Palm Grove", "Lake View"]}))
}

async fn team_leads() -> Json<Value> {
    Json(json!({"success": true, "data": [{"_id": "u7", "username": "kiran", "role": "TL"}]}))
}

/// Starts the fake backend and returns its `/api` base URL.
async fn serve(rec: Shared) -> String {
    let app = Router::new()
        .route("/api/leads/", get(list_leads))
        .route("/api/leads/search", post(search_leads))
        .route("/api/leads/{id}", put(update_lead))
        .route("/api/leads/call-statuses", get(call_statuses))
        .route("/api/leads/allCallStatus", get(call_statuses))
        .route("/api/leads/products-name", get(products))
        .route("/api/users/tl", get(team_leads))
        .with_state(rec);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api", addr)
}

fn signed_in_client(base_url: &str) -> ApiClient {
    let client = ApiClient::new(base_url);
    client.sessions().save(Some(&Session {
        token: "t-123".into(),
        user: UserInfo {
            id: "u1".into(),
            username: "admin".into(),
            email: None,
            role: UserRole::Admin,
            team_lead: None,
        },
    }));
    client
}

#[tokio::test]
async fn test_missing_page_keeps_previous_page() {
    let rec = Shared::default();
    let base = serve(rec.clone()).await;
    let sync = LeadSync::new(
        Arc::new(signed_in_client(&base)),
        DashboardScope::All,
        SyncOptions::default(),
    );

    sync.load().await.unwrap();
    let before = sync.snapshot();
    assert_eq!(before.leads.len(), 2);
    assert_eq!(before.leads[0].contact_number.as_deref(), Some("9876543210"));
    assert_eq!(before.pagination.total_pages, 3);
    assert_eq!(before.pagination.total_items, 45);
    assert_eq!(before.lookups.team_leads[0].role, UserRole::TeamLead);
    // Unrouted lookups come back 404 and are left empty
    assert!(before.lookups.budgets.is_empty());

    let err = sync.next_page().await.unwrap_err();
    assert!(matches!(err, SyncError::Api(ApiError::NotFound(_))));

    let after = sync.snapshot();
    assert_eq!(after.error.as_deref(), Some("Failed to fetch leads"));
    assert_eq!(after.leads, before.leads);
    assert_eq!(after.pagination.current_page, 1);

    let rec = rec.lock().unwrap();
    let second = &rec.list_queries[1];
    assert_eq!(second["page"], "2");
    assert_eq!(second["limit"], "20");
    assert_eq!(second["callStatus"], "All");
    assert_eq!(second["productname"], "All");
    assert_eq!(second["mobileSearch"], "");
    assert!(rec
        .auth_headers
        .iter()
        .all(|h| h.as_deref() == Some("Bearer t-123")));
}

#[tokio::test]
async fn test_rejected_listing_shows_server_message() {
    let rec = Shared::default();
    let base = serve(rec.clone()).await;
    let sync = LeadSync::new(
        Arc::new(signed_in_client(&base)),
        DashboardScope::Own("blocked".into()),
        SyncOptions::default(),
    );

    let err = sync.load().await.unwrap_err();
    assert_eq!(
        err,
        SyncError::Api(ApiError::Rejected(Some("Not allowed to view these leads".into())))
    );
    let snapshot = sync.snapshot();
    assert_eq!(snapshot.error.as_deref(), Some("Not allowed to view these leads"));
    assert_eq!(snapshot.phase, SyncPhase::Ready);
    assert!(snapshot.leads.is_empty());
}

#[tokio::test]
async fn test_search_and_edit_round_trip() {
    let rec = Shared::default();
    let base = serve(rec.clone()).await;
    let sync = LeadSync::new(
        Arc::new(signed_in_client(&base)),
        DashboardScope::All,
        SyncOptions::default(),
    );
    sync.load().await.unwrap();

    sync.search("Asha", "98765").await.unwrap();
    let snapshot = sync.snapshot();
    assert!(snapshot.searching);
    assert_eq!(snapshot.leads[0].id, "s1");
    assert_eq!(snapshot.pagination.total_items, 1);

    let update = LeadUpdate {
        call_status: "Not Qualified".into(),
        remarks: "Budget too low".into(),
        ..Default::default()
    };
    sync.submit_edit("s1", update).await.unwrap();
    assert_eq!(sync.snapshot().notice.as_deref(), Some("Lead updated"));

    let rec = rec.lock().unwrap();
    assert_eq!(rec.searches.len(), 2);
    assert_eq!(rec.searches[0]["name"], "Asha");
    assert_eq!(rec.searches[0]["contactNumber"], "98765");
    assert_eq!(rec.searches[0]["page"], 1);
    let (id, body) = &rec.updates[0];
    assert_eq!(id, "s1");
    assert_eq!(body["callstatus"], "Not Qualified");
    assert_eq!(body["remarks"], "Budget too low");
}
