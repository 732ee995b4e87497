//! HTTP handler functions for the incident watch API.

use std::sync::{MutexGuard, PoisonError};

use actix_web::http::{Method, StatusCode, header};
use actix_web::{HttpRequest, HttpResponse, web};
use incident_watch_catalog_models::SearchResults;
use incident_watch_dashboard::Dashboard;
use incident_watch_dashboard::records::RecordError;
use incident_watch_dashboard_models::{NewVisit, NoteFields};
use incident_watch_offline::GatewayError;
use incident_watch_server_models::{
    ApiError, ApiHealth, ApiMunicipalityChoice, ApiNotification, ApiNotificationFeed,
    ApiPushDisplayed, ApiSearchResults, ApiStats, ApiZoneMatch, NewIncidentBody, SearchParams,
};

use crate::AppState;

fn dashboard(state: &AppState) -> MutexGuard<'_, Dashboard> {
    state
        .dashboard
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

fn record_error(e: &RecordError) -> HttpResponse {
    let mut builder = match e {
        RecordError::EmptyTitle
        | RecordError::VisitInPast { .. }
        | RecordError::UnknownMunicipality { .. } => HttpResponse::BadRequest(),
        RecordError::NoteNotFound { .. } | RecordError::VisitNotFound { .. } => {
            HttpResponse::NotFound()
        }
        RecordError::VisitClosed { .. } => HttpResponse::Conflict(),
    };
    builder.json(ApiError::new(e))
}

fn gateway_error(e: &GatewayError) -> HttpResponse {
    let mut builder = match e {
        GatewayError::InvalidPushPayload(_) => HttpResponse::BadRequest(),
        GatewayError::UnknownNotification { .. } => HttpResponse::NotFound(),
        GatewayError::Host { .. }
        | GatewayError::Http(_)
        | GatewayError::Network { .. }
        | GatewayError::InstallFailed { .. } => HttpResponse::BadGateway(),
    };
    builder.json(ApiError::new(e))
}

fn feed_body(dashboard: &Dashboard) -> ApiNotificationFeed {
    ApiNotificationFeed {
        unread: dashboard.notification_count(),
        notifications: dashboard.feed().iter().map(ApiNotification::from).collect(),
    }
}

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        gateway: state.gateway.state().to_string(),
    })
}

/// `GET /api/stats`
pub async fn stats(state: web::Data<AppState>) -> HttpResponse {
    let dashboard = dashboard(&state);
    HttpResponse::Ok().json(ApiStats::new(
        dashboard.stats(),
        dashboard.notification_count(),
    ))
}

/// `GET /api/notifications`
pub async fn notifications(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(feed_body(&dashboard(&state)))
}

/// `POST /api/notifications/read`
pub async fn mark_all_read(state: web::Data<AppState>) -> HttpResponse {
    let mut dashboard = dashboard(&state);
    dashboard.mark_all_read();
    HttpResponse::Ok().json(feed_body(&dashboard))
}

/// `DELETE /api/notifications`
pub async fn clear_notifications(state: web::Data<AppState>) -> HttpResponse {
    dashboard(&state).clear_notifications();
    HttpResponse::NoContent().finish()
}

/// `GET /api/incidents`
pub async fn incidents(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(dashboard(&state).incidents())
}

/// `POST /api/incidents`
///
/// Pushes an incident into the alert pipeline as if it had arrived from a
/// live transport.
pub async fn ingest_incident(
    state: web::Data<AppState>,
    body: web::Json<NewIncidentBody>,
) -> HttpResponse {
    let incident = body
        .into_inner()
        .into_incident(state.incident_ids.next_id(), state.clock.now());
    let notification = dashboard(&state).ingest(incident);
    HttpResponse::Created().json(ApiNotification::from(&notification))
}

/// `GET /api/search?q=`
pub async fn search(state: web::Data<AppState>, params: web::Query<SearchParams>) -> HttpResponse {
    let results: SearchResults = dashboard(&state).search(&params.q);
    HttpResponse::Ok().json(ApiSearchResults {
        total: results.total(),
        zones: results
            .zones
            .into_iter()
            .map(|z| ApiZoneMatch {
                municipality: z.municipality,
                zone: z.zone,
                incidence: z.incidence,
            })
            .collect(),
        municipalities: results.municipalities,
    })
}

/// `GET /api/municipalities`
///
/// `(id, name)` pairs for the visit form, in catalog order.
pub async fn municipalities(state: web::Data<AppState>) -> HttpResponse {
    let choices: Vec<ApiMunicipalityChoice> = dashboard(&state)
        .catalog()
        .choices()
        .into_iter()
        .map(|(id, name)| ApiMunicipalityChoice {
            id,
            name: name.to_string(),
        })
        .collect();
    HttpResponse::Ok().json(choices)
}

/// `GET /api/visits`
pub async fn visits(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(dashboard(&state).visits())
}

/// `POST /api/visits`
pub async fn create_visit(state: web::Data<AppState>, body: web::Json<NewVisit>) -> HttpResponse {
    match dashboard(&state).create_visit(body.into_inner()) {
        Ok(visit) => HttpResponse::Created().json(visit),
        Err(e) => record_error(&e),
    }
}

/// `POST /api/visits/{id}/complete`
pub async fn complete_visit(state: web::Data<AppState>, path: web::Path<i64>) -> HttpResponse {
    match dashboard(&state).complete_visit(path.into_inner()) {
        Ok(visit) => HttpResponse::Ok().json(visit),
        Err(e) => record_error(&e),
    }
}

/// `POST /api/visits/{id}/cancel`
pub async fn cancel_visit(state: web::Data<AppState>, path: web::Path<i64>) -> HttpResponse {
    match dashboard(&state).cancel_visit(path.into_inner()) {
        Ok(visit) => HttpResponse::Ok().json(visit),
        Err(e) => record_error(&e),
    }
}

/// `GET /api/businesses/{id}/visit-draft`
pub async fn visit_draft(state: web::Data<AppState>, path: web::Path<u32>) -> HttpResponse {
    let id = path.into_inner();
    dashboard(&state).visit_draft_from_business(id).map_or_else(
        || HttpResponse::NotFound().json(ApiError::new(format!("Business {id} not found"))),
        |draft| HttpResponse::Ok().json(draft),
    )
}

/// `GET /api/notes`
pub async fn notes(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(dashboard(&state).notes())
}

/// `POST /api/notes`
pub async fn create_note(state: web::Data<AppState>, body: web::Json<NoteFields>) -> HttpResponse {
    match dashboard(&state).create_note(body.into_inner()) {
        Ok(note) => HttpResponse::Created().json(note),
        Err(e) => record_error(&e),
    }
}

/// `GET /api/notes/{id}`
pub async fn note(state: web::Data<AppState>, path: web::Path<i64>) -> HttpResponse {
    let id = path.into_inner();
    dashboard(&state).note(id).map_or_else(
        || record_error(&RecordError::NoteNotFound { id }),
        |note| HttpResponse::Ok().json(note),
    )
}

/// `PUT /api/notes/{id}`
pub async fn update_note(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<NoteFields>,
) -> HttpResponse {
    match dashboard(&state).update_note(path.into_inner(), body.into_inner()) {
        Ok(note) => HttpResponse::Ok().json(note),
        Err(e) => record_error(&e),
    }
}

/// `POST /api/push`
///
/// Delivers a raw `{title, body, url?}` push payload to the offline
/// gateway.
pub async fn push(state: web::Data<AppState>, body: web::Bytes) -> HttpResponse {
    match state.gateway.push(&body) {
        Ok(shown) => HttpResponse::Created().json(ApiPushDisplayed {
            id: shown.id,
            url: shown.options.url,
        }),
        Err(e) => {
            log::warn!("Rejected push: {e}");
            gateway_error(&e)
        }
    }
}

/// `POST /api/push/{id}/click`
pub async fn notification_click(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> HttpResponse {
    match state.gateway.notification_click(&path) {
        Ok(url) => HttpResponse::Ok().json(serde_json::json!({ "opened": url })),
        Err(e) => gateway_error(&e),
    }
}

/// Every path not matched above: answered by the offline gateway, cache
/// first, origin second.
///
/// The cache is keyed by path and query together, so `/app.js?v=2` is not
/// answered with the cached `/app.js`.
pub async fn gateway_fetch(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    if req.method() != Method::GET {
        return HttpResponse::MethodNotAllowed().finish();
    }

    let target = req
        .uri()
        .path_and_query()
        .map_or_else(|| req.path(), |pq| pq.as_str());

    match state.gateway.fetch(target).await {
        Ok(response) => {
            let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::BAD_GATEWAY);
            let mut builder = HttpResponse::build(status);
            if let Some(content_type) = response.content_type {
                builder.insert_header((header::CONTENT_TYPE, content_type));
            }
            builder.body(response.body)
        }
        Err(e) => {
            log::error!("Failed to fetch {target}: {e}");
            HttpResponse::BadGateway().json(ApiError::new(e))
        }
    }
}
