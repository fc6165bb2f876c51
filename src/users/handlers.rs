use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, Span};

use super::{dto::UserPayload, repo_types::User};
use crate::{
    error::{ApiError, ErrorKind},
    middleware::RequestContext,
    response::{Envelope, MessageEnvelope},
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(get_all).post(create))
        .route("/users/:id", get(get_by_id).put(update).delete(delete))
}

type ApiResult<T> = Result<T, ApiError>;

/// POST /users
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    ctx: RequestContext,
    body: Result<Json<UserPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Envelope<User>>)> {
    let payload = bind_payload(&ctx, body)?;
    let mut user = payload.into_user(0);

    state
        .users
        .create(&mut user)
        .await
        .map_err(|e| ctx.fail(ErrorKind::Internal, "Failed to create user", e))?;

    info!(user_id = user.id, "user created");
    Ok((StatusCode::CREATED, Json(Envelope::success(user))))
}

/// GET /users
#[instrument(skip_all)]
pub async fn get_all(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> ApiResult<Json<Envelope<Vec<User>>>> {
    let users = state
        .users
        .get_all()
        .await
        .map_err(|e| ctx.fail(ErrorKind::Internal, "Failed to fetch users", e))?;
    Ok(Json(Envelope::success(users)))
}

/// GET /users/:id
#[instrument(skip_all, fields(id = tracing::field::Empty))]
pub async fn get_by_id(
    State(state): State<AppState>,
    ctx: RequestContext,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Envelope<User>>> {
    let id = parse_id(&ctx, id)?;
    let user = find_existing(&state, &ctx, id).await?;
    Ok(Json(Envelope::success(user)))
}

/// PUT /users/:id. The path id always wins over anything in the body.
#[instrument(skip_all, fields(id = tracing::field::Empty))]
pub async fn update(
    State(state): State<AppState>,
    ctx: RequestContext,
    id: Result<Path<String>, PathRejection>,
    body: Result<Json<UserPayload>, JsonRejection>,
) -> ApiResult<Json<Envelope<User>>> {
    let id = parse_id(&ctx, id)?;
    let user = bind_payload(&ctx, body)?.into_user(id);

    find_existing(&state, &ctx, id).await?;

    state
        .users
        .update(&user)
        .await
        .map_err(|e| ctx.fail(ErrorKind::Internal, "Failed to update user", e))?;

    info!(user_id = user.id, "user updated");
    Ok(Json(Envelope::success(user)))
}

/// DELETE /users/:id
#[instrument(skip_all, fields(id = tracing::field::Empty))]
pub async fn delete(
    State(state): State<AppState>,
    ctx: RequestContext,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<MessageEnvelope>> {
    let id = parse_id(&ctx, id)?;

    find_existing(&state, &ctx, id).await?;

    state
        .users
        .delete(id)
        .await
        .map_err(|e| ctx.fail(ErrorKind::Internal, "Failed to delete user", e))?;

    info!(user_id = id, "user deleted");
    Ok(Json(MessageEnvelope::success("User deleted")))
}

fn parse_id(ctx: &RequestContext, raw: Result<Path<String>, PathRejection>) -> ApiResult<i64> {
    let Path(raw) = raw.map_err(|e| {
        ctx.fail(ErrorKind::Validation, format!("Invalid user ID: {}", e.body_text()), &e)
    })?;
    let id = raw
        .parse::<i64>()
        .map_err(|e| ctx.fail(ErrorKind::Validation, format!("Invalid user ID: {e}"), &e))?;
    Span::current().record("id", id);
    Ok(id)
}

fn bind_payload(
    ctx: &RequestContext,
    body: Result<Json<UserPayload>, JsonRejection>,
) -> ApiResult<UserPayload> {
    let Json(payload) = body.map_err(|e| {
        ctx.fail(
            ErrorKind::Validation,
            format!("Invalid request payload: {}", e.body_text()),
            &e,
        )
    })?;
    payload.validate().map_err(|e| {
        ctx.fail(ErrorKind::Validation, format!("Invalid request payload: {e}"), &e)
    })?;
    Ok(payload)
}

// Any lookup failure, not only a missing row, is reported as 404.
async fn find_existing(state: &AppState, ctx: &RequestContext, id: i64) -> ApiResult<User> {
    state
        .users
        .get_by_id(id)
        .await
        .map_err(|e| ctx.fail(ErrorKind::NotFound, "User not found", e))
}
