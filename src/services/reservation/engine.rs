use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::modules::auth::model::User;
use crate::modules::booking::interface::{BookingError, BookingStore, InventoryStore, Result};
use crate::modules::booking::model::{Booking, BookingKind, BookingStatus, PaymentStatus};
use crate::modules::booking::schema::CreateBookingRequest;
use crate::modules::catalog::model::CabinClass;
use crate::services::mailer::{Mailer, OutboundEmail};
use crate::services::reservation::pricing::{self, AmountBreakdown};

/// Reservation flow over injectable stores. Capacity is claimed through
/// guarded single-row updates, so the availability check and the decrement
/// cannot be interleaved by a concurrent request: whoever loses the claim
/// gets InsufficientCapacity even if the earlier read looked fine.
pub struct ReservationService {
    inventory: Arc<dyn InventoryStore>,
    bookings: Arc<dyn BookingStore>,
    mailer: Arc<dyn Mailer>,
}

impl ReservationService {
    pub fn new(
        inventory: Arc<dyn InventoryStore>,
        bookings: Arc<dyn BookingStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            inventory,
            bookings,
            mailer,
        }
    }

    pub async fn reserve(&self, user: &User, request: CreateBookingRequest) -> Result<Booking> {
        let kind = BookingKind::from_str(&request.booking_type)
            .map_err(|_| BookingError::InvalidBookingType(request.booking_type.clone()))?;

        let now = Utc::now();
        let booking = match kind {
            BookingKind::Flight => self.reserve_flight(user, &request, now).await?,
            BookingKind::Hotel => self.reserve_hotel(user, &request, now).await?,
            BookingKind::Package => self.reserve_package(user, &request, now).await?,
        };

        // Capacity is already claimed; a failed insert must hand it back.
        if let Err(err) = self.bookings.insert(&booking).await {
            tracing::error!(
                booking_reference = %booking.booking_reference,
                "booking insert failed, releasing claimed capacity: {}",
                err
            );
            self.release_capacity(&booking).await;
            return Err(err);
        }

        tracing::info!(
            booking_reference = %booking.booking_reference,
            booking_type = %kind,
            user_id = %user.id,
            final_amount = %booking.final_amount,
            "booking created"
        );

        let confirmation = OutboundEmail::booking_confirmation(
            &user.email,
            &user.first_name,
            &booking.booking_reference,
            &booking.booking_type,
            &booking.final_amount.to_string(),
            &booking.currency,
        );
        if let Err(err) = self.mailer.send(confirmation).await {
            tracing::warn!(
                booking_reference = %booking.booking_reference,
                "confirmation email failed: {}",
                err
            );
        }

        Ok(booking)
    }

    pub async fn cancel(
        &self,
        user: &User,
        booking_id: &str,
        reason: Option<&str>,
    ) -> Result<Booking> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or(BookingError::BookingNotFound)?;

        if booking.user_id != user.id && !user.is_staff() {
            return Err(BookingError::NotAuthorized);
        }

        let now = Utc::now();
        // The status transition is the claim on the capacity restore; if it
        // did not take effect someone already cancelled and released.
        if !self.bookings.mark_cancelled(&booking.id, reason, now).await? {
            return Err(BookingError::AlreadyCancelled);
        }

        self.release_capacity(&booking).await;

        tracing::info!(
            booking_reference = %booking.booking_reference,
            user_id = %user.id,
            "booking cancelled"
        );

        let cancellation = OutboundEmail::booking_cancellation(
            &user.email,
            &user.first_name,
            &booking.booking_reference,
            reason.unwrap_or("Cancelled by customer"),
        );
        if let Err(err) = self.mailer.send(cancellation).await {
            tracing::warn!(
                booking_reference = %booking.booking_reference,
                "cancellation email failed: {}",
                err
            );
        }

        self.bookings
            .find_by_id(booking_id)
            .await?
            .ok_or(BookingError::BookingNotFound)
    }

    pub async fn get(&self, user: &User, booking_id: &str) -> Result<Booking> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or(BookingError::BookingNotFound)?;

        if booking.user_id != user.id && !user.is_staff() {
            return Err(BookingError::NotAuthorized);
        }

        Ok(booking)
    }

    async fn reserve_flight(
        &self,
        user: &User,
        request: &CreateBookingRequest,
        now: DateTime<Utc>,
    ) -> Result<Booking> {
        let flight_id = request.flight_id.as_deref().ok_or_else(|| {
            BookingError::Validation("flight_id is required for flight bookings".to_string())
        })?;
        let flight_date = request.flight_date.ok_or_else(|| {
            BookingError::Validation("flight_date is required for flight bookings".to_string())
        })?;
        if flight_date <= now {
            return Err(BookingError::Validation(
                "flight_date must be in the future".to_string(),
            ));
        }
        let cabin = match request.cabin_class.as_deref() {
            Some(raw) => CabinClass::from_str(raw)
                .map_err(|_| BookingError::Validation(format!("Unknown cabin class: {}", raw)))?,
            None => CabinClass::default(),
        };

        let flight = self
            .inventory
            .find_flight(flight_id)
            .await?
            .ok_or(BookingError::ResourceNotFound(BookingKind::Flight))?;

        let party = request.adults + request.children;
        if flight.available_seats(cabin) < party {
            return Err(BookingError::InsufficientCapacity(BookingKind::Flight));
        }

        let amounts = pricing::breakdown(
            pricing::flight_amount(flight.seat_price(cabin), party),
            pricing::default_tax_rate(),
        );

        if !self.inventory.claim_flight_seats(&flight.id, cabin, party).await? {
            return Err(BookingError::InsufficientCapacity(BookingKind::Flight));
        }

        let mut booking = base_booking(user, request, BookingKind::Flight, amounts, now);
        booking.flight_id = Some(flight.id);
        booking.cabin_class = Some(cabin.as_str().to_string());
        booking.flight_date = Some(flight_date);
        Ok(booking)
    }

    async fn reserve_hotel(
        &self,
        user: &User,
        request: &CreateBookingRequest,
        now: DateTime<Utc>,
    ) -> Result<Booking> {
        let hotel_id = request.hotel_id.as_deref().ok_or_else(|| {
            BookingError::Validation("hotel_id is required for hotel bookings".to_string())
        })?;
        let check_in = request.check_in_date.ok_or_else(|| {
            BookingError::Validation("check_in_date is required for hotel bookings".to_string())
        })?;
        let check_out = request.check_out_date.ok_or_else(|| {
            BookingError::Validation("check_out_date is required for hotel bookings".to_string())
        })?;
        if check_out <= check_in {
            return Err(BookingError::Validation(
                "check_out_date must be after check_in_date".to_string(),
            ));
        }
        if check_in <= now {
            return Err(BookingError::Validation(
                "check_in_date must be in the future".to_string(),
            ));
        }

        let hotel = self
            .inventory
            .find_hotel(hotel_id)
            .await?
            .ok_or(BookingError::ResourceNotFound(BookingKind::Hotel))?;

        if hotel.available_rooms < request.rooms {
            return Err(BookingError::InsufficientCapacity(BookingKind::Hotel));
        }

        let nights = pricing::nights_between(check_in, check_out);
        let amounts = pricing::breakdown(
            pricing::hotel_amount(hotel.price_per_night, nights, request.rooms),
            hotel.tax_rate,
        );

        if !self.inventory.claim_hotel_rooms(&hotel.id, request.rooms).await? {
            return Err(BookingError::InsufficientCapacity(BookingKind::Hotel));
        }

        let mut booking = base_booking(user, request, BookingKind::Hotel, amounts, now);
        booking.hotel_id = Some(hotel.id);
        booking.check_in_date = Some(check_in);
        booking.check_out_date = Some(check_out);
        Ok(booking)
    }

    async fn reserve_package(
        &self,
        user: &User,
        request: &CreateBookingRequest,
        now: DateTime<Utc>,
    ) -> Result<Booking> {
        let package_id = request.package_id.as_deref().ok_or_else(|| {
            BookingError::Validation("package_id is required for package bookings".to_string())
        })?;

        let package = self
            .inventory
            .find_package(package_id)
            .await?
            .ok_or(BookingError::ResourceNotFound(BookingKind::Package))?;

        let party = request.adults + request.children;
        if package.available_slots < party {
            return Err(BookingError::InsufficientCapacity(BookingKind::Package));
        }

        let amounts = pricing::breakdown(
            pricing::package_amount(package.price, package.discount_price),
            pricing::default_tax_rate(),
        );

        if !self.inventory.claim_package_slots(&package.id, party).await? {
            return Err(BookingError::InsufficientCapacity(BookingKind::Package));
        }

        let mut booking = base_booking(user, request, BookingKind::Package, amounts, now);
        booking.package_id = Some(package.id);
        Ok(booking)
    }

    /// Returns units to the counter the booking drew from. Failures are
    /// logged, not propagated: by the time this runs the booking state has
    /// already changed and the caller has nothing useful to do with them.
    async fn release_capacity(&self, booking: &Booking) {
        let outcome = match booking.kind() {
            Some(BookingKind::Flight) => match &booking.flight_id {
                Some(id) => {
                    self.inventory
                        .release_flight_seats(id, booking.cabin(), booking.party_size())
                        .await
                }
                None => Ok(false),
            },
            Some(BookingKind::Hotel) => match &booking.hotel_id {
                Some(id) => self.inventory.release_hotel_rooms(id, booking.rooms).await,
                None => Ok(false),
            },
            Some(BookingKind::Package) => match &booking.package_id {
                Some(id) => {
                    self.inventory
                        .release_package_slots(id, booking.party_size())
                        .await
                }
                None => Ok(false),
            },
            None => Ok(false),
        };

        match outcome {
            Ok(true) => {}
            Ok(false) => tracing::warn!(
                booking_reference = %booking.booking_reference,
                "capacity release skipped, resource missing or counter already full"
            ),
            Err(err) => tracing::error!(
                booking_reference = %booking.booking_reference,
                "capacity release failed: {}",
                err
            ),
        }
    }
}

fn base_booking(
    user: &User,
    request: &CreateBookingRequest,
    kind: BookingKind,
    amounts: AmountBreakdown,
    now: DateTime<Utc>,
) -> Booking {
    Booking {
        id: Uuid::new_v4().to_string(),
        booking_reference: Booking::generate_reference(),
        user_id: user.id.clone(),
        booking_type: kind.as_str().to_string(),
        flight_id: None,
        hotel_id: None,
        package_id: None,
        cabin_class: None,
        booking_date: now,
        flight_date: None,
        check_in_date: None,
        check_out_date: None,
        adults: request.adults,
        children: request.children,
        rooms: request.rooms,
        total_amount: amounts.base_amount,
        tax_amount: amounts.tax_amount,
        final_amount: amounts.final_amount,
        currency: "USD".to_string(),
        status: BookingStatus::Pending.as_str().to_string(),
        payment_status: PaymentStatus::Pending.as_str().to_string(),
        special_requests: request.special_requests.clone(),
        cancellation_reason: None,
        cancellation_date: None,
        created_at: now,
        updated_at: now,
    }
}
