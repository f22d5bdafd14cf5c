//! Handlers for the `/venues` resource and the spaces nested under it.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;
use venuebook_core::error::CoreError;
use venuebook_core::pagination::Paginated;
use venuebook_core::phone::normalize_phone;
use venuebook_core::types::DbId;
use venuebook_db::models::space::{CreateSpace, Space};
use venuebook_db::models::venue::{CreateVenue, Venue, VenueSummary};
use venuebook_db::repositories::{SpaceRepo, VenueRepo};

use crate::error::{AppError, AppResult};
use crate::extract::{ValidatedJson, ValidatedQuery};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::query::ListQuery;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /venues`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVenueRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 500))]
    pub address: String,
    #[validate(length(min = 6, max = 20))]
    pub phone: Option<String>,
}

/// Request body for `POST /venues/{id}/spaces`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSpaceRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(range(min = 1))]
    pub capacity: i32,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// GET /api/v1/venues
///
/// Paginated venue listing with each venue's manager as `{id, name}`.
pub async fn list_venues(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ListQuery>,
) -> AppResult<Json<DataResponse<Paginated<VenueSummary>>>> {
    let params = query.to_params(VenueRepo::SORT_FIELDS)?;
    let page = VenueRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse::new(page)))
}

/// POST /api/v1/venues
///
/// Create a venue managed by the caller.
pub async fn create_venue(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    ValidatedJson(input): ValidatedJson<CreateVenueRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Venue>>)> {
    let venue = VenueRepo::create(
        &state.pool,
        &CreateVenue {
            manager_id: user.user_id,
            name: input.name.trim().to_string(),
            address: input.address.trim().to_string(),
            phone: input.phone.as_deref().map(|p| normalize_phone(p.trim())),
        },
    )
    .await?;

    tracing::info!(venue_id = venue.id, manager_id = user.user_id, "Venue created");

    Ok((StatusCode::CREATED, Json(DataResponse::new(venue))))
}

/// GET /api/v1/venues/{id}/spaces
pub async fn list_spaces(
    State(state): State<AppState>,
    Path(venue_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Space>>>> {
    ensure_venue(&state, venue_id).await?;
    let spaces = SpaceRepo::list_by_venue(&state.pool, venue_id).await?;
    Ok(Json(DataResponse::new(spaces)))
}

/// POST /api/v1/venues/{id}/spaces
///
/// Only the venue's manager or an admin may add spaces.
pub async fn create_space(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(venue_id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<CreateSpaceRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Space>>)> {
    let venue = ensure_venue(&state, venue_id).await?;
    ensure_manages(&user, &venue)?;

    let space = SpaceRepo::create(
        &state.pool,
        &CreateSpace {
            venue_id,
            name: input.name.trim().to_string(),
            capacity: input.capacity,
            description: input.description,
        },
    )
    .await?;

    tracing::info!(space_id = space.id, venue_id, "Space created");

    Ok((StatusCode::CREATED, Json(DataResponse::new(space))))
}

async fn ensure_venue(state: &AppState, venue_id: DbId) -> AppResult<Venue> {
    VenueRepo::find_by_id(&state.pool, venue_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Venue",
            id: venue_id,
        }))
}

/// Admins manage every venue; managers only their own.
pub(crate) fn ensure_manages(user: &AuthUser, venue: &Venue) -> AppResult<()> {
    if user.is_admin() || venue.manager_id == user.user_id {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "Only the venue's manager may do this".into(),
        )))
    }
}
