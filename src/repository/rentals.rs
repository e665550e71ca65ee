//! Rentals repository: the authoritative rental set and its store file

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use chrono::NaiveDate;

use crate::error::{AppError, AppResult};
use crate::models::rental::{CreateRental, Rental, RentalStatus};
use crate::repository::{read_guard, read_rows, write_guard, write_rows};

const HEADER: &str =
    "rentalId,memberId,costumeId,size,rentalDate,returnDate,actualReturnDate,totalCost,lateFee,status";

/// Owns the in-memory rental list loaded from the rental store. Every
/// mutation rewrites the full store file; queries are pure filters over
/// the in-memory set.
#[derive(Clone)]
pub struct RentalsRepository {
    path: PathBuf,
    rentals: Arc<RwLock<Vec<Rental>>>,
}

impl RentalsRepository {
    /// Load the rental store. Malformed rows are skipped with a warning
    /// rather than failing the whole load.
    pub fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        let mut rentals = Vec::new();
        for record in read_rows(&path)? {
            match Rental::from_record(&record) {
                Ok(rental) => rentals.push(rental),
                Err(e) => tracing::warn!("{}: skipping rental row: {}", path.display(), e),
            }
        }
        tracing::info!("{}: loaded {} rentals", path.display(), rentals.len());
        Ok(Self {
            path,
            rentals: Arc::new(RwLock::new(rentals)),
        })
    }

    fn persist(&self, rentals: &[Rental]) -> AppResult<()> {
        let rows: Vec<Vec<String>> = rentals.iter().map(Rental::to_record).collect();
        write_rows(&self.path, HEADER, &rows)
    }

    /// Next rental id: one past the highest numeric suffix among all
    /// existing ids, cancelled and stale records included.
    fn next_id(rentals: &[Rental]) -> String {
        let max = rentals
            .iter()
            .filter_map(|r| r.id.strip_prefix('R').and_then(|n| n.parse::<u32>().ok()))
            .max()
            .unwrap_or(0);
        format!("R{:03}", max + 1)
    }

    /// Append a new ACTIVE rental and persist the full set. The caller
    /// is responsible for the availability check; nothing is written
    /// when construction fails.
    pub fn create(&self, req: &CreateRental, total_cost: f64) -> AppResult<Rental> {
        let mut rentals = write_guard(&self.rentals);

        let rental = Rental::new(
            Self::next_id(&rentals),
            req.member_id.clone(),
            req.costume_id.clone(),
            req.size.clone(),
            req.rental_date,
            req.return_date,
            total_cost,
        )?;

        let mut next = rentals.clone();
        next.push(rental.clone());
        self.persist(&next)?;
        *rentals = next;

        tracing::info!(
            "created rental {} for member {} ({} {}, {} to {})",
            rental.id,
            rental.member_id,
            rental.costume_id,
            rental.size,
            rental.rental_date,
            rental.return_date
        );
        Ok(rental)
    }

    /// Complete a rental: record the actual return date, accrue the
    /// late fee from the implied daily rate, and mark it RETURNED.
    pub fn return_rental(&self, id: &str, actual_return_date: NaiveDate) -> AppResult<Rental> {
        let mut rentals = write_guard(&self.rentals);
        let mut next = rentals.clone();

        let rental = next
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Rental with id {} not found", id)))?;

        match rental.status {
            RentalStatus::Returned => return Err(AppError::AlreadyReturned(id.to_string())),
            RentalStatus::Cancelled => {
                return Err(AppError::InvalidState(format!(
                    "rental {} is cancelled and cannot be returned",
                    id
                )))
            }
            RentalStatus::Active | RentalStatus::Overdue => {}
        }

        rental.actual_return_date = Some(actual_return_date);
        rental.late_fee = rental.late_fee(rental.daily_rate(), actual_return_date);
        rental.status = RentalStatus::Returned;
        let returned = rental.clone();

        self.persist(&next)?;
        *rentals = next;

        tracing::info!(
            "returned rental {} on {} (late fee {:.2})",
            returned.id,
            actual_return_date,
            returned.late_fee
        );
        Ok(returned)
    }

    /// Cancel a rental that has not progressed past ACTIVE. The
    /// reserved units are released by virtue of the status change.
    pub fn cancel(&self, id: &str) -> AppResult<Rental> {
        let mut rentals = write_guard(&self.rentals);
        let mut next = rentals.clone();

        let rental = next
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Rental with id {} not found", id)))?;

        if rental.status != RentalStatus::Active {
            return Err(AppError::InvalidState(format!(
                "rental {} is {} and cannot be cancelled",
                id, rental.status
            )));
        }

        rental.status = RentalStatus::Cancelled;
        let cancelled = rental.clone();

        self.persist(&next)?;
        *rentals = next;

        tracing::info!("cancelled rental {}", cancelled.id);
        Ok(cancelled)
    }

    /// Recompute every rental's status from `today`. Persists only when
    /// at least one status changed; returns whether anything changed.
    pub fn refresh_all_statuses(&self, today: NaiveDate) -> AppResult<bool> {
        let mut rentals = write_guard(&self.rentals);
        let mut next = rentals.clone();

        let mut changed = false;
        for rental in next.iter_mut() {
            changed |= rental.refresh_status(today);
        }
        if changed {
            self.persist(&next)?;
            *rentals = next;
        }
        Ok(changed)
    }

    // Query operations: pure filters, no refresh, no persistence.

    pub fn all(&self) -> Vec<Rental> {
        read_guard(&self.rentals).clone()
    }

    pub fn find_by_id(&self, id: &str) -> Option<Rental> {
        read_guard(&self.rentals)
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    pub fn get_by_id(&self, id: &str) -> AppResult<Rental> {
        self.find_by_id(id)
            .ok_or_else(|| AppError::NotFound(format!("Rental with id {} not found", id)))
    }

    pub fn by_member(&self, member_id: &str) -> Vec<Rental> {
        read_guard(&self.rentals)
            .iter()
            .filter(|r| r.member_id == member_id)
            .cloned()
            .collect()
    }

    /// Rentals for a member that are not yet returned or cancelled
    pub fn active_by_member(&self, member_id: &str) -> Vec<Rental> {
        read_guard(&self.rentals)
            .iter()
            .filter(|r| r.member_id == member_id && !r.status.is_terminal())
            .cloned()
            .collect()
    }

    pub fn by_costume(&self, costume_id: &str) -> Vec<Rental> {
        read_guard(&self.rentals)
            .iter()
            .filter(|r| r.costume_id == costume_id)
            .cloned()
            .collect()
    }

    pub fn overdue(&self) -> Vec<Rental> {
        read_guard(&self.rentals)
            .iter()
            .filter(|r| r.status == RentalStatus::Overdue)
            .cloned()
            .collect()
    }

    /// True when the costume has any rental that is not yet returned or
    /// cancelled (used by the catalog delete guard)
    pub fn has_open_rentals_for_costume(&self, costume_id: &str) -> bool {
        read_guard(&self.rentals)
            .iter()
            .any(|r| r.costume_id == costume_id && !r.status.is_terminal())
    }

    /// True when the member has any rental that is not yet returned or
    /// cancelled (used by the member delete guard)
    pub fn has_open_rentals_for_member(&self, member_id: &str) -> bool {
        read_guard(&self.rentals)
            .iter()
            .any(|r| r.member_id == member_id && !r.status.is_terminal())
    }
}
