use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};

use teamroster_api::AddMemberForm;
use teamroster_store::Store;

use crate::error::ApiErr;
use crate::render;
use crate::routes::Format;

fn members_view(
    store: &Store,
    team_id: i64,
    format: Format,
    status: StatusCode,
) -> Result<Response, ApiErr> {
    let detail = store.team_detail(team_id)?;
    Ok(format.respond(status, detail, render::members_list))
}

/// GET /teams/{id}/members: member list fragment.
pub async fn list_members(
    State(store): State<Store>,
    Path(team_id): Path<i64>,
    format: Format,
) -> Result<Response, ApiErr> {
    members_view(&store, team_id, format, StatusCode::OK)
}

/// POST /teams/{id}/members: add a member, return the team's updated member list.
pub async fn add_member(
    State(store): State<Store>,
    Path(team_id): Path<i64>,
    format: Format,
    Form(form): Form<AddMemberForm>,
) -> Result<Response, ApiErr> {
    let member = store.create_member(team_id, &form.name, form.role.as_deref())?;
    tracing::info!(team_id, member_id = member.id, "added member {:?}", member.name);
    members_view(&store, team_id, format, StatusCode::CREATED)
}

/// DELETE /members/{id}: remove a member, return its team's updated member list.
pub async fn delete_member(
    State(store): State<Store>,
    Path(member_id): Path<i64>,
    format: Format,
) -> Result<Response, ApiErr> {
    let team_id = store.delete_member(member_id)?;
    tracing::info!(team_id, member_id, "removed member");
    members_view(&store, team_id, format, StatusCode::OK)
}
