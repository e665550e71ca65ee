//! Rental lifecycle service

use chrono::{NaiveDate, Utc};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::rental::{CreateRental, Rental},
    repository::Repository,
    services::availability::AvailabilityService,
};

/// Orchestrates the rental lifecycle: quotes the cost from the catalog,
/// enforces availability, and delegates to the rentals repository.
#[derive(Clone)]
pub struct RentalService {
    repository: Repository,
    availability: AvailabilityService,
}

impl RentalService {
    pub fn new(repository: Repository, availability: AvailabilityService) -> Self {
        Self {
            repository,
            availability,
        }
    }

    /// Create a rental. Fails with `Unavailable` when any day of the
    /// requested period has no free unit; nothing is written on
    /// failure. The member id is taken on trust from the caller.
    pub fn create_rental(&self, req: CreateRental) -> AppResult<Rental> {
        req.validate()?;
        if req.return_date < req.rental_date {
            return Err(AppError::InvalidPeriod {
                start: req.rental_date,
                end: req.return_date,
            });
        }

        let costume = self.repository.costumes.get_by_id(&req.costume_id)?;
        if !self.availability.is_available_for_period(
            &req.costume_id,
            &req.size,
            req.rental_date,
            req.return_date,
        ) {
            return Err(AppError::Unavailable {
                costume_id: req.costume_id,
                size: req.size,
                start: req.rental_date,
                end: req.return_date,
            });
        }

        let days = (req.return_date - req.rental_date).num_days() + 1;
        let total_cost = costume.price * days as f64;
        self.repository.rentals.create(&req, total_cost)
    }

    /// Return a rental on the given date, accruing any late fee
    pub fn return_rental(&self, rental_id: &str, actual_return_date: NaiveDate) -> AppResult<Rental> {
        self.repository
            .rentals
            .return_rental(rental_id, actual_return_date)
    }

    /// Cancel a rental that has not progressed past ACTIVE
    pub fn cancel_rental(&self, rental_id: &str) -> AppResult<Rental> {
        self.repository.rentals.cancel(rental_id)
    }

    /// Lazily push ACTIVE rentals past their due date to OVERDUE.
    /// Status is not temporally self-updating, so the UI runs this
    /// before any status read.
    pub fn refresh_all_statuses(&self) -> AppResult<bool> {
        self.repository
            .rentals
            .refresh_all_statuses(Utc::now().date_naive())
    }

    // Query operations; callers refresh first when they need current statuses.

    pub fn all_rentals(&self) -> Vec<Rental> {
        self.repository.rentals.all()
    }

    pub fn get_rental(&self, rental_id: &str) -> AppResult<Rental> {
        self.repository.rentals.get_by_id(rental_id)
    }

    pub fn member_rentals(&self, member_id: &str) -> Vec<Rental> {
        self.repository.rentals.by_member(member_id)
    }

    pub fn active_member_rentals(&self, member_id: &str) -> Vec<Rental> {
        self.repository.rentals.active_by_member(member_id)
    }

    pub fn costume_rentals(&self, costume_id: &str) -> Vec<Rental> {
        self.repository.rentals.by_costume(costume_id)
    }

    pub fn overdue_rentals(&self) -> Vec<Rental> {
        self.repository.rentals.overdue()
    }
}
