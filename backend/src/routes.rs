use rocket::serde::json::Json;
use rocket::{delete, get, http::Status, post, put, State};
use rustrict::CensorStr;
use serde::Serialize;
use sqlx::PgPool;
use std::path::PathBuf;
use tracing::{info, instrument};

use shared::models::*;
use shared::replay::{Replay, Standing};
use shared::tally::{ElectionSummary, Tally};
use shared::report;
use shared::validation::validate_vote_fields;

use crate::error::ApiError;
use crate::session::{AdminGate, AdminToken};
use crate::store::VoteStore;
use crate::utils::parse_vote_id;

pub struct AppState {
    pub store: VoteStore,
    pub admin: AdminGate,
}

impl AppState {
    pub fn new(pool: Option<PgPool>, cache_path: PathBuf) -> Self {
        Self {
            store: VoteStore::new(pool, cache_path),
            admin: AdminGate::new(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentGroup {
    pub department: Department,
    pub voters: Vec<Vote>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayFrame {
    pub progress: f64,
    pub cluster_count: usize,
    pub total_votes: usize,
    pub standings: Vec<Standing>,
}

fn screen_fields(fields: &VoteFields) -> Result<(), ApiError> {
    validate_vote_fields(fields).map_err(|e| ApiError::Validation(e.to_string()))?;
    if fields.voter_name.is_inappropriate() {
        return Err(ApiError::Validation("Inappropriate voter name".into()));
    }
    Ok(())
}

#[rocket::options("/<_..>")]
pub async fn all_options() -> Status {
    Status::Ok
}

#[get("/votes")]
pub async fn list_votes(state: &State<AppState>) -> Result<Json<Vec<Vote>>, ApiError> {
    state.store.load_all().await.map(Json).map_err(Into::into)
}

#[get("/votes/by-department")]
pub async fn votes_by_department(
    state: &State<AppState>,
) -> Result<Json<Vec<DepartmentGroup>>, ApiError> {
    let votes = state.store.load_all().await?;
    let groups = Tally::new(&votes)
        .by_department()
        .into_iter()
        .map(|(department, voters)| DepartmentGroup {
            department,
            voters: voters.into_iter().cloned().collect(),
        })
        .collect();
    Ok(Json(groups))
}

#[get("/summary")]
pub async fn get_summary(state: &State<AppState>) -> Result<Json<ElectionSummary>, ApiError> {
    let votes = state.store.load_all().await?;
    Ok(Json(Tally::new(&votes).summary()))
}

/// Server-side scrub: derives the replay standings at an arbitrary progress.
/// Omitting `progress` lands on the fully-played-out end state.
#[get("/replay?<progress>")]
pub async fn get_replay(
    state: &State<AppState>,
    progress: Option<f64>,
) -> Result<Json<ReplayFrame>, ApiError> {
    let votes = state.store.load_all().await?;
    let mut replay = Replay::new(&votes);
    let target = progress.unwrap_or(replay.cluster_count() as f64);
    replay.scrub(target);
    Ok(Json(ReplayFrame {
        progress: replay.progress(),
        cluster_count: replay.cluster_count(),
        total_votes: replay.total_votes(),
        standings: replay.frame(),
    }))
}

#[get("/report")]
pub async fn get_report(state: &State<AppState>) -> Result<String, ApiError> {
    let votes = state.store.load_all().await?;
    Ok(report::render(&votes))
}

#[get("/status")]
pub async fn get_status(state: &State<AppState>) -> Result<Json<StoreStatus>, ApiError> {
    let votes = state.store.load_all().await?;
    Ok(Json(StoreStatus {
        offline: state.store.is_offline(),
        total_votes: votes.len(),
    }))
}

#[post("/admin/login", format = "json", data = "<request>")]
pub async fn admin_login(
    state: &State<AppState>,
    request: Json<AdminLoginRequest>,
) -> Result<Json<AdminSession>, ApiError> {
    state
        .admin
        .login(&request.password)
        .map(|token| Json(AdminSession { token }))
        .ok_or(ApiError::Unauthorized)
}

#[post("/admin/logout")]
pub async fn admin_logout(state: &State<AppState>, admin: AdminToken) -> Status {
    state.admin.logout(&admin.0);
    Status::NoContent
}

#[instrument(skip(state, fields, _admin))]
#[post("/votes", format = "json", data = "<fields>")]
pub async fn create_vote(
    state: &State<AppState>,
    fields: Json<VoteFields>,
    _admin: AdminToken,
) -> Result<Json<Vote>, ApiError> {
    let fields = fields.into_inner();
    screen_fields(&fields)?;
    let vote = state.store.insert(&fields).await?;
    info!(vote_id = %vote.id, candidate = %vote.candidate, "vote recorded");
    Ok(Json(vote))
}

/// Mutations answer with the freshly loaded list: the dashboard replaces its
/// state wholesale instead of patching.
#[instrument(skip(state, fields, _admin), fields(vote_id = %id))]
#[put("/votes/<id>", format = "json", data = "<fields>")]
pub async fn update_vote(
    state: &State<AppState>,
    id: &str,
    fields: Json<VoteFields>,
    _admin: AdminToken,
) -> Result<Json<Vec<Vote>>, ApiError> {
    let id = parse_vote_id(id)?;
    let fields = fields.into_inner();
    screen_fields(&fields)?;
    state.store.update(id, &fields).await?;
    info!("vote updated");
    state.store.load_all().await.map(Json).map_err(Into::into)
}

#[instrument(skip(state, _admin), fields(vote_id = %id))]
#[delete("/votes/<id>")]
pub async fn delete_vote(
    state: &State<AppState>,
    id: &str,
    _admin: AdminToken,
) -> Result<Json<Vec<Vote>>, ApiError> {
    let id = parse_vote_id(id)?;
    state.store.delete(id).await?;
    info!("vote deleted");
    state.store.load_all().await.map(Json).map_err(Into::into)
}
