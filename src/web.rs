use actix_web::http::StatusCode;
use actix_web::{middleware, web, App, HttpResponse, HttpServer, ResponseError, Result};
use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::sync::{Mutex, MutexGuard};
use tracing::info;

use crate::catalog::Catalog;
use crate::config::Settings;
use crate::error::{ErrorKind, ScheduleError};
use crate::export::{build_snapshot, write_snapshot};
use crate::parser::load_offerings;
use crate::schedule::{format_day, parse_day, AssignmentEngine, ProgramKey, ProgramSubject, TIME_SLOTS};
use crate::terms::{term_options, validate_term};

/// Shared state: the timetable of the last load, behind one lock so edits apply one at a time
pub struct AppState {
    pub timetable: Mutex<Option<AssignmentEngine>>,
    pub settings: Settings,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            timetable: Mutex::new(None),
            settings,
        }
    }
}

impl ResponseError for ScheduleError {
    fn status_code(&self) -> StatusCode {
        match (self, self.kind()) {
            (ScheduleError::NotLoaded, _) => StatusCode::CONFLICT,
            (_, ErrorKind::Validation) => StatusCode::BAD_REQUEST,
            (_, ErrorKind::Conflict) => StatusCode::CONFLICT,
            (_, ErrorKind::NotFound) => StatusCode::NOT_FOUND,
            (_, ErrorKind::Load) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut body = serde_json::json!({
            "success": false,
            "error": self.kind().as_str(),
            "message": self.to_string(),
        });
        if let ScheduleError::Conflict { subject_id, held_at, attempted } = self {
            body["subjectId"] = subject_id.as_str().into();
            body["heldAt"] = held_at.to_string().into();
            body["attempted"] = attempted.to_string().into();
        }
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[derive(Deserialize)]
pub struct LoadRequest {
    #[serde(default)]
    term: String,
}

#[derive(Deserialize)]
pub struct DayRequest {
    date: String,
}

/// A cell edit from the grid; an empty or missing subject clears the cell
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRequest {
    program: String,
    year: u32,
    date: String,
    slot: String,
    #[serde(default)]
    subject_id: Option<String>,
}

#[derive(Deserialize)]
pub struct CellQuery {
    program: String,
    year: u32,
    date: String,
    slot: String,
}

#[derive(Serialize)]
pub struct ProgramView<'a> {
    program: &'a str,
    year: u32,
    dept: &'a str,
    subjects: &'a [ProgramSubject],
    remaining: usize,
}

#[derive(Serialize)]
pub struct RemainingView<'a> {
    program: &'a str,
    year: u32,
    remaining: usize,
}

#[derive(Serialize)]
pub struct DayView {
    date: String,
    slots: Vec<&'static str>,
}

fn lock_timetable(state: &AppState) -> Result<MutexGuard<'_, Option<AssignmentEngine>>> {
    state
        .timetable
        .lock()
        .map_err(|_| actix_web::error::ErrorInternalServerError("timetable lock poisoned"))
}

fn remaining_views<'a>(engine: &'a AssignmentEngine, excluded_dept: &'a str) -> Vec<RemainingView<'a>> {
    engine
        .visible_programs(excluded_dept)
        .map(|(index, p)| RemainingView {
            program: &p.key.program,
            year: p.key.year,
            remaining: engine.remaining_at(index),
        })
        .collect()
}

// Term options endpoint
async fn get_terms() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(term_options(Local::now().year())))
}

// Load a term's offerings and start a fresh timetable
async fn load_term(req: web::Json<LoadRequest>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let term = validate_term(&req.term)?;
    let records = load_offerings(&state.settings.data_dir, term).map_err(ScheduleError::from)?;
    let catalog = Catalog::from_records(&records);
    let (subjects, programs) = (catalog.subjects.len(), catalog.programs.len());

    *lock_timetable(&state)? = Some(AssignmentEngine::new(catalog));
    info!(term, subjects, programs, "timetable loaded");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "term": term,
        "subjects": subjects,
        "programs": programs,
    })))
}

// Visible programs with their remaining counts
async fn get_programs(state: web::Data<AppState>) -> Result<HttpResponse> {
    let guard = lock_timetable(&state)?;
    let engine = guard.as_ref().ok_or(ScheduleError::NotLoaded)?;

    let programs: Vec<ProgramView> = engine
        .visible_programs(&state.settings.excluded_dept)
        .map(|(index, p)| ProgramView {
            program: &p.key.program,
            year: p.key.year,
            dept: &p.dept,
            subjects: &p.subjects,
            remaining: engine.remaining_at(index),
        })
        .collect();
    Ok(HttpResponse::Ok().json(programs))
}

async fn get_days(state: web::Data<AppState>) -> Result<HttpResponse> {
    let guard = lock_timetable(&state)?;
    let engine = guard.as_ref().ok_or(ScheduleError::NotLoaded)?;

    let days: Vec<DayView> = engine
        .active_days()
        .iter()
        .map(|&day| DayView {
            date: format_day(day),
            slots: TIME_SLOTS.to_vec(),
        })
        .collect();
    Ok(HttpResponse::Ok().json(days))
}

async fn add_day(req: web::Json<DayRequest>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let mut guard = lock_timetable(&state)?;
    let engine = guard.as_mut().ok_or(ScheduleError::NotLoaded)?;

    let added = engine.add_day(&req.date)?;
    let date = format_day(parse_day(&req.date)?);
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "date": date,
        "added": added,
    })))
}

// The path form only carries dashed dates; slashed forms go in the body
async fn remove_day_path(date: web::Path<String>, state: web::Data<AppState>) -> Result<HttpResponse> {
    remove_day(&date, &state)
}

async fn remove_day_body(req: web::Json<DayRequest>, state: web::Data<AppState>) -> Result<HttpResponse> {
    remove_day(&req.date, &state)
}

fn remove_day(date: &str, state: &AppState) -> Result<HttpResponse> {
    let mut guard = lock_timetable(state)?;
    let engine = guard.as_mut().ok_or(ScheduleError::NotLoaded)?;

    let freed = engine.remove_day(date)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "freed": freed,
        "remaining": remaining_views(engine, &state.settings.excluded_dept),
    })))
}

// Cell edit endpoint: assign, or clear when no subject is given
async fn put_cell(req: web::Json<CellRequest>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let mut guard = lock_timetable(&state)?;
    let engine = guard.as_mut().ok_or(ScheduleError::NotLoaded)?;

    let key = ProgramKey::new(req.program.clone(), req.year);
    let cell = engine.cell(&req.date, &req.slot)?;
    let subject_id = req.subject_id.as_deref().unwrap_or("").trim();

    let removed = if subject_id.is_empty() {
        engine.unassign(&key, cell)?
    } else {
        engine.assign(&key, cell, subject_id)?;
        None
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "cell": cell.to_string(),
        "subjectId": engine.assigned_at(&key, cell)?,
        "removed": removed,
        "remaining": remaining_views(engine, &state.settings.excluded_dept),
    })))
}

// Choice list for one cell
async fn get_available(query: web::Query<CellQuery>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let guard = lock_timetable(&state)?;
    let engine = guard.as_ref().ok_or(ScheduleError::NotLoaded)?;

    let key = ProgramKey::new(query.program.clone(), query.year);
    let cell = engine.cell(&query.date, &query.slot)?;
    Ok(HttpResponse::Ok().json(engine.available_subjects(&key, cell)?))
}

async fn get_snapshot(state: web::Data<AppState>) -> Result<HttpResponse> {
    let guard = lock_timetable(&state)?;
    let engine = guard.as_ref().ok_or(ScheduleError::NotLoaded)?;
    Ok(HttpResponse::Ok().json(build_snapshot(engine, &state.settings.excluded_dept)))
}

// Write the current snapshot into the export directory
async fn save_schedule(state: web::Data<AppState>) -> Result<HttpResponse> {
    let snapshot = {
        let guard = lock_timetable(&state)?;
        let engine = guard.as_ref().ok_or(ScheduleError::NotLoaded)?;
        build_snapshot(engine, &state.settings.excluded_dept)
    };

    fs::create_dir_all(&state.settings.export_dir)
        .map_err(|e| actix_web::error::ErrorInternalServerError(format!("Failed to create export dir: {}", e)))?;
    let path = state
        .settings
        .export_dir
        .join(format!("schedule-{}.json", Local::now().format("%Y%m%d-%H%M%S")));
    write_snapshot(&snapshot, &path)
        .map_err(|e| actix_web::error::ErrorInternalServerError(format!("Failed to save schedule: {}", e)))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Schedule saved successfully!",
        "path": path.display().to_string(),
        "days": snapshot.len(),
    })))
}

/// Registers the API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/terms", web::get().to(get_terms))
        .route("/api/load", web::post().to(load_term))
        .route("/api/programs", web::get().to(get_programs))
        .route("/api/days", web::get().to(get_days))
        .route("/api/days", web::post().to(add_day))
        .route("/api/days", web::delete().to(remove_day_body))
        .service(web::resource("/api/days/{date}").route(web::delete().to(remove_day_path)))
        .route("/api/cells", web::put().to(put_cell))
        .route("/api/available", web::get().to(get_available))
        .route("/api/snapshot", web::get().to(get_snapshot))
        .route("/api/save", web::post().to(save_schedule));
}

pub async fn start_server(settings: Settings) -> std::io::Result<()> {
    let port = settings.port;
    let app_state = web::Data::new(AppState::new(settings));

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
