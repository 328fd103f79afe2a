use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, Response},
};

use teamroster_api::{CreateTeamForm, ListTeamsResponse};
use teamroster_store::Store;

use crate::error::ApiErr;
use crate::render;
use crate::routes::Format;

fn teams_view(store: &Store, format: Format, status: StatusCode) -> Result<Response, ApiErr> {
    let teams = store.list_teams()?;
    Ok(format.respond(status, ListTeamsResponse { teams }, |view| {
        render::teams_list(&view.teams)
    }))
}

// ---------------------------------------------------------------------------
// Index page
// ---------------------------------------------------------------------------

/// GET /: full page with the team list.
pub async fn index(State(store): State<Store>) -> Result<Html<String>, ApiErr> {
    let teams = store.list_teams()?;
    Ok(Html(render::index_page(&teams)))
}

// ---------------------------------------------------------------------------
// List teams
// ---------------------------------------------------------------------------

/// GET /teams: team list fragment, sorted by name.
pub async fn list_teams(State(store): State<Store>, format: Format) -> Result<Response, ApiErr> {
    teams_view(&store, format, StatusCode::OK)
}

// ---------------------------------------------------------------------------
// Create team
// ---------------------------------------------------------------------------

/// POST /teams: create a team and return the updated list.
///
/// Duplicate names yield `409 Conflict`.
pub async fn create_team(
    State(store): State<Store>,
    format: Format,
    Form(form): Form<CreateTeamForm>,
) -> Result<Response, ApiErr> {
    let team = store.create_team(&form.name)?;
    tracing::info!(team_id = team.id, "created team {:?}", team.name);
    teams_view(&store, format, StatusCode::CREATED)
}

// ---------------------------------------------------------------------------
// Team detail
// ---------------------------------------------------------------------------

/// GET /teams/{id}: team detail with its members.
pub async fn get_team(
    State(store): State<Store>,
    Path(id): Path<i64>,
    format: Format,
) -> Result<Response, ApiErr> {
    let detail = store.team_detail(id)?;
    Ok(format.respond(StatusCode::OK, detail, render::team_detail))
}

// ---------------------------------------------------------------------------
// Delete team
// ---------------------------------------------------------------------------

/// DELETE /teams/{id}: delete a team and its members, return the updated list.
pub async fn delete_team(
    State(store): State<Store>,
    Path(id): Path<i64>,
    format: Format,
) -> Result<Response, ApiErr> {
    store.delete_team(id)?;
    tracing::info!(team_id = id, "deleted team");
    teams_view(&store, format, StatusCode::OK)
}
