use actix_web::{middleware, web, App, HttpResponse, HttpServer, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::{info, warn};

use crate::error::AllocError;
use crate::schedule::{schedule_roster, AssignmentResult, Vocabulary};

// Only finished results are shared; every request runs its own allocation
pub struct AppState {
    pub last_result: Mutex<Option<AssignmentResult>>,
    pub vocabulary: Vocabulary,
}

impl AppState {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self {
            last_result: Mutex::new(None),
            vocabulary,
        }
    }
}

#[derive(Deserialize)]
pub struct AllocateRequest {
    pub staff: Vec<Value>,
    pub config: Map<String, Value>,
    pub vocabulary: Option<Vocabulary>,
}

#[derive(Serialize)]
pub struct AllocateResponse {
    success: bool,
    total_assigned: usize,
    result: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

// Allocation endpoint
async fn allocate(
    req: web::Json<AllocateRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    let vocabulary = req.vocabulary.unwrap_or_else(|| state.vocabulary.clone());

    match schedule_roster(&req.staff, &req.config, &vocabulary) {
        Ok(result) => {
            let response = AllocateResponse {
                success: true,
                total_assigned: result.total_assigned(),
                result: result.to_labeled(&vocabulary),
            };
            let mut last = state
                .last_result
                .lock()
                .map_err(|_| actix_web::error::ErrorInternalServerError("result store poisoned"))?;
            *last = Some(result);
            info!(assigned = response.total_assigned, "allocation stored");
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => {
            warn!(error = %e, kind = e.kind(), "allocation failed");
            // Placement failures also carry the occupancy that blocked them
            let failure = match &e {
                AllocError::Placement(failure) => serde_json::to_value(failure).ok(),
                _ => None,
            };
            Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "kind": e.kind(),
                "error": e.to_string(),
                "failure": failure,
            })))
        }
    }
}

// Last successful result, labeled with the server vocabulary
async fn get_result(state: web::Data<AppState>) -> Result<HttpResponse> {
    let last = state
        .last_result
        .lock()
        .map_err(|_| actix_web::error::ErrorInternalServerError("result store poisoned"))?;

    if let Some(ref result) = *last {
        Ok(HttpResponse::Ok().json(result.to_labeled(&state.vocabulary)))
    } else {
        Ok(HttpResponse::NotFound().json(serde_json::json!({"error": "No allocation available"})))
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/allocate", web::post().to(allocate))
        .route("/api/result", web::get().to(get_result));
}

pub async fn start_server(port: u16, vocabulary: Vocabulary) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState::new(vocabulary));

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};
    use serde_json::json;

    fn config() -> Value {
        json!({
            "InboundFront": 1, "InboundBack": 1, "InboundTotal": 2,
            "OutboundFront": 1, "OutboundBack": 1, "OutboundTotal": 2,
            "InboundTeam": "A", "OutboundTeam": "B", "MobileTeam": "C",
        })
    }

    #[actix_web::test]
    async fn test_allocate_then_fetch_result() {
        let state = web::Data::new(AppState::new(Vocabulary::default()));
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/allocate")
            .set_json(json!({
                "staff": [{"name": "Alice", "attendance": "Y", "team_name": "A", "preferred_section": "Front"}],
                "config": config(),
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["result"]["Inbound"]["Front"][0], "Alice");

        let req = test::TestRequest::get().uri("/api/result").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["Inbound"]["Front"][0], "Alice");
    }

    #[actix_web::test]
    async fn test_allocate_failure_is_bad_request() {
        let state = web::Data::new(AppState::new(Vocabulary::default()));
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/allocate")
            .set_json(json!({
                "staff": [{"name": "Zed", "attendance": "Y", "team_name": "Z"}],
                "config": config(),
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["kind"], "unknown_team");
        assert!(body["failure"].is_null());
        assert!(state.last_result.lock().unwrap().is_none());
    }

    #[actix_web::test]
    async fn test_placement_failure_reports_occupancy() {
        let state = web::Data::new(AppState::new(Vocabulary::default()));
        let app = test::init_service(App::new().app_data(state).configure(configure)).await;

        let staff: Vec<Value> = ["a", "b", "c"]
            .iter()
            .map(|name| json!({"name": name, "attendance": "Y", "team_name": "B"}))
            .collect();
        let req = test::TestRequest::post()
            .uri("/api/allocate")
            .set_json(json!({"staff": staff, "config": config()}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["kind"], "placement_failure");
        assert_eq!(body["failure"]["stage"], "OutboundTeam");
        assert_eq!(body["failure"]["staff"]["name"], "c");
        assert_eq!(body["failure"]["areas"][0]["total_limit"], 2);
    }

    #[actix_web::test]
    async fn test_result_missing_before_first_run() {
        let state = web::Data::new(AppState::new(Vocabulary::default()));
        let app = test::init_service(App::new().app_data(state).configure(configure)).await;
        let req = test::TestRequest::get().uri("/api/result").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_request_vocabulary_labels_response() {
        let state = web::Data::new(AppState::new(Vocabulary::default()));
        let app = test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/allocate")
            .set_json(json!({
                "staff": [{"name": "王芳", "Attendance": "Y", "team_name": "B", "preferred_section": "前台"}],
                "config": config(),
                "vocabulary": {"inbound": "入境", "outbound": "出境", "front": "前台", "back": "后台"},
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["result"]["出境"]["前台"][0], "王芳");
    }
}
