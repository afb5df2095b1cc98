use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use validator::Validate;

use crate::modules::auth::middleware::AuthUser;
use crate::modules::auth::schema::ErrorResponse;
use crate::modules::booking::interface::BookingError;
use crate::modules::booking::schema::{
    BookingResponse, CancelBookingRequest, CancelBookingResponse, CreateBookingRequest,
    CreateBookingResponse,
};
use crate::services::reservation::ReservationService;
use crate::AppState;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn validation_error(err: validator::ValidationErrors) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(err.to_string())))
}

fn booking_error(err: BookingError) -> ApiError {
    (err.status_code(), Json(ErrorResponse::new(err.to_string())))
}

fn reservation(state: &AppState) -> ReservationService {
    ReservationService::new(
        state.inventory.clone(),
        state.bookings.clone(),
        state.mailer.clone(),
    )
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<CreateBookingResponse>), ApiError> {
    req.validate().map_err(validation_error)?;

    match reservation(&state).reserve(&user, req).await {
        Ok(booking) => {
            state
                .metrics
                .bookings_created_total
                .with_label_values(&[&booking.booking_type])
                .inc();
            Ok((
                StatusCode::CREATED,
                Json(CreateBookingResponse {
                    booking: booking.into(),
                }),
            ))
        }
        Err(err) => {
            if let BookingError::InsufficientCapacity(kind) = &err {
                state
                    .metrics
                    .booking_capacity_rejections_total
                    .with_label_values(&[kind.as_str()])
                    .inc();
            }
            Err(booking_error(err))
        }
    }
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<BookingResponse>, ApiError> {
    let booking = reservation(&state)
        .get(&user, &id)
        .await
        .map_err(booking_error)?;

    Ok(Json(booking.into()))
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(req): Json<CancelBookingRequest>,
) -> Result<Json<CancelBookingResponse>, ApiError> {
    req.validate().map_err(validation_error)?;

    let booking = reservation(&state)
        .cancel(&user, &id, req.reason.as_deref())
        .await
        .map_err(booking_error)?;

    state
        .metrics
        .bookings_cancelled_total
        .with_label_values(&[&booking.booking_type])
        .inc();

    Ok(Json(CancelBookingResponse {
        message: "Booking cancelled successfully",
        booking: booking.into(),
    }))
}
