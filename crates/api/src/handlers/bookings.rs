//! Handlers for the `/bookings` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;
use venuebook_core::error::CoreError;
use venuebook_core::pagination::Paginated;
use venuebook_core::phone::normalize_phone;
use venuebook_core::roles::can_manage_venues;
use venuebook_core::status::BookingStatus;
use venuebook_core::types::{DbId, Timestamp};
use venuebook_db::models::booking::{BookingSummary, CreateBooking};
use venuebook_db::models::mail_log::MailLog;
use venuebook_db::repositories::{
    is_overlap_violation, BookingRepo, MailLogRepo, SpaceRepo, UserRepo, VenueRepo,
};

use crate::error::{AppError, AppResult};
use crate::extract::{ValidatedJson, ValidatedQuery};
use crate::handlers::venues::ensure_manages;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::notifications::{
    booking_cancelled_mail, booking_confirmation_mail, send_and_record, MailSubject,
};
use crate::query::BookingListQuery;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /bookings`.
///
/// `guest_name` / `guest_phone` book on behalf of a walk-in guest; only a
/// manager of the space's venue (or an admin) may send them.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookingRequest {
    pub space_id: DbId,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    #[validate(length(max = 500))]
    pub note: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub guest_name: Option<String>,
    #[validate(length(min = 6, max = 20))]
    pub guest_phone: Option<String>,
}

impl CreateBookingRequest {
    fn is_guest_booking(&self) -> bool {
        self.guest_name.is_some() || self.guest_phone.is_some()
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/bookings
///
/// Admins see every booking; everyone else sees only their own.
pub async fn list_bookings(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedQuery(query): ValidatedQuery<BookingListQuery>,
) -> AppResult<Json<DataResponse<Paginated<BookingSummary>>>> {
    let params = query.to_params(BookingRepo::SORT_FIELDS)?;
    let owner = if user.is_admin() {
        None
    } else {
        Some(user.user_id)
    };

    let page = BookingRepo::list_summaries(&state.pool, &query.filter(owner), &params).await?;
    let items = page
        .rows
        .into_iter()
        .map(|row| row.into_summary())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(DataResponse::new(Paginated::new(
        items,
        page.window,
        page.total,
    ))))
}

/// GET /api/v1/bookings/{id}
pub async fn get_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<BookingSummary>>> {
    let summary = load_summary(&state, id).await?;
    ensure_can_access(&user, &summary)?;
    Ok(Json(DataResponse::new(summary)))
}

/// POST /api/v1/bookings
///
/// Creates a confirmed booking. Overlapping an active booking of the same
/// space is a conflict. The confirmation mail outcome is recorded but never
/// fails the request.
pub async fn create_booking(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<BookingSummary>>)> {
    if input.end_time <= input.start_time {
        return Err(AppError::Core(CoreError::Validation(
            "end_time: must be after start_time".into(),
        )));
    }

    let space = SpaceRepo::find_by_id(&state.pool, input.space_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Space",
            id: input.space_id,
        }))?;

    let guest = input.is_guest_booking();
    if guest {
        if !can_manage_venues(&user.role) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Only venue managers may book for a guest".into(),
            )));
        }
        if input.guest_name.is_none() {
            return Err(AppError::Core(CoreError::Validation(
                "guest_name: required for a guest booking".into(),
            )));
        }
        let venue = VenueRepo::find_by_id(&state.pool, space.venue_id)
            .await?
            .ok_or_else(|| {
                CoreError::Integrity(format!(
                    "space {} references missing venue {}",
                    space.id, space.venue_id
                ))
            })?;
        ensure_manages(&user, &venue)?;
    }

    if BookingRepo::has_overlap(&state.pool, space.id, input.start_time, input.end_time).await? {
        return Err(slot_taken());
    }

    let booking = BookingRepo::create(
        &state.pool,
        &CreateBooking {
            space_id: space.id,
            user_id: (!guest).then_some(user.user_id),
            guest_name: input.guest_name.as_deref().map(|n| n.trim().to_string()),
            guest_phone: input
                .guest_phone
                .as_deref()
                .map(|p| normalize_phone(p.trim())),
            start_time: input.start_time,
            end_time: input.end_time,
            status: BookingStatus::Confirmed,
            note: input.note,
        },
    )
    .await
    .map_err(|err| {
        if is_overlap_violation(&err) {
            slot_taken()
        } else {
            AppError::Database(err)
        }
    })?;

    tracing::info!(
        booking_id = booking.id,
        space_id = booking.space_id,
        user_id = user.user_id,
        guest,
        "Booking created"
    );

    let summary = load_summary(&state, booking.id).await?;
    notify_owner(&state, &summary, NotifyKind::Confirmed).await;

    Ok((StatusCode::CREATED, Json(DataResponse::new(summary))))
}

/// POST /api/v1/bookings/{id}/cancel
pub async fn cancel_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<BookingSummary>>> {
    let summary = load_summary(&state, id).await?;
    ensure_can_access(&user, &summary)?;

    // The row exists, so `None` means another request cancelled it first.
    BookingRepo::cancel(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(format!(
                "Booking {id} is already cancelled"
            )))
        })?;

    tracing::info!(booking_id = id, user_id = user.user_id, "Booking cancelled");

    let summary = load_summary(&state, id).await?;
    notify_owner(&state, &summary, NotifyKind::Cancelled).await;

    Ok(Json(DataResponse::new(summary)))
}

/// GET /api/v1/bookings/{id}/mail-logs
///
/// Every recorded mail attempt for a booking, in the order attempted.
pub async fn list_mail_logs(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<MailLog>>>> {
    let summary = load_summary(&state, id).await?;
    ensure_manages(&user, &summary.space.venue)?;
    let logs = MailLogRepo::list_for_booking(&state.pool, id).await?;
    Ok(Json(DataResponse::new(logs)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_summary(state: &AppState, id: DbId) -> AppResult<BookingSummary> {
    let row = BookingRepo::find_summary(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id,
        }))?;
    Ok(row.into_summary()?)
}

fn slot_taken() -> AppError {
    AppError::Core(CoreError::Conflict(
        "The space is already booked for this time".into(),
    ))
}

/// Owner, the venue's manager, or an admin.
fn ensure_can_access(user: &AuthUser, summary: &BookingSummary) -> AppResult<()> {
    let is_owner = summary.booking.user_id == Some(user.user_id);
    if is_owner || user.is_admin() || summary.manager_id() == user.user_id {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "You do not have access to this booking".into(),
        )))
    }
}

#[derive(Debug, Clone, Copy)]
enum NotifyKind {
    Confirmed,
    Cancelled,
}

/// Mail the booking's owner. Guest bookings have no address and are skipped.
///
/// Runs after the booking change is committed, so no failure here reaches
/// the caller.
async fn notify_owner(state: &AppState, summary: &BookingSummary, kind: NotifyKind) {
    let Some(owner_id) = summary.booking.user_id else {
        return;
    };
    let owner = match UserRepo::find_by_id(&state.pool, owner_id).await {
        Ok(Some(owner)) => owner,
        Ok(None) => {
            tracing::warn!(
                booking_id = summary.booking.id,
                owner_id,
                "Booking owner not found, no mail sent"
            );
            return;
        }
        Err(err) => {
            tracing::error!(
                booking_id = summary.booking.id,
                owner_id,
                error = %err,
                "Failed to load booking owner, no mail sent"
            );
            return;
        }
    };

    let mail = match kind {
        NotifyKind::Confirmed => booking_confirmation_mail(&owner.email, summary),
        NotifyKind::Cancelled => booking_cancelled_mail(&owner.email, summary),
    };
    send_and_record(
        state,
        &mail,
        MailSubject {
            booking_id: Some(summary.booking.id),
            user_id: Some(owner_id),
        },
    )
    .await;
}
