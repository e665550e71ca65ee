//! Rental model and status lifecycle

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Date layout used across all store files
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Late fee per overdue day, as a fraction of the daily rate
pub const LATE_FEE_RATE: f64 = 0.10;

/// Rental lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RentalStatus {
    /// Checked out or reserved
    Active,
    /// Completed (terminal)
    Returned,
    /// Past the scheduled return date and not yet returned
    Overdue,
    /// Terminated before fulfillment, stock released (terminal)
    Cancelled,
}

impl RentalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RentalStatus::Active => "ACTIVE",
            RentalStatus::Returned => "RETURNED",
            RentalStatus::Overdue => "OVERDUE",
            RentalStatus::Cancelled => "CANCELLED",
        }
    }

    /// A terminal status never changes again
    pub fn is_terminal(&self) -> bool {
        matches!(self, RentalStatus::Returned | RentalStatus::Cancelled)
    }
}

impl std::str::FromStr for RentalStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(RentalStatus::Active),
            "RETURNED" => Ok(RentalStatus::Returned),
            "OVERDUE" => Ok(RentalStatus::Overdue),
            "CANCELLED" => Ok(RentalStatus::Cancelled),
            other => Err(AppError::Parse(format!("unknown rental status '{}'", other))),
        }
    }
}

impl std::fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single rental record from the rental store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rental {
    pub id: String,
    pub member_id: String,
    pub costume_id: String,
    pub size: String,
    pub rental_date: NaiveDate,
    pub return_date: NaiveDate,
    pub actual_return_date: Option<NaiveDate>,
    pub total_cost: f64,
    pub late_fee: f64,
    pub status: RentalStatus,
}

/// Create rental request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRental {
    #[validate(length(min = 1))]
    pub member_id: String,
    #[validate(length(min = 1))]
    pub costume_id: String,
    #[validate(length(min = 1))]
    pub size: String,
    pub rental_date: NaiveDate,
    pub return_date: NaiveDate,
}

impl Rental {
    /// Build a new ACTIVE rental. Fails when the scheduled return date
    /// is before the start date.
    pub fn new(
        id: String,
        member_id: String,
        costume_id: String,
        size: String,
        rental_date: NaiveDate,
        return_date: NaiveDate,
        total_cost: f64,
    ) -> AppResult<Self> {
        if return_date < rental_date {
            return Err(AppError::InvalidPeriod {
                start: rental_date,
                end: return_date,
            });
        }
        Ok(Self {
            id,
            member_id,
            costume_id,
            size,
            rental_date,
            return_date,
            actual_return_date: None,
            total_cost,
            late_fee: 0.0,
            status: RentalStatus::Active,
        })
    }

    /// Inclusive day count of the booked period, always >= 1
    pub fn rental_days(&self) -> i64 {
        (self.return_date - self.rental_date).num_days() + 1
    }

    /// Per-day price implied by the original booking
    pub fn daily_rate(&self) -> f64 {
        let days = self.rental_days();
        if days > 0 {
            self.total_cost / days as f64
        } else {
            self.total_cost
        }
    }

    /// Days past the scheduled return date. Uses the actual return date
    /// once returned, `today` otherwise.
    pub fn overdue_days(&self, today: NaiveDate) -> i64 {
        let reference = self.actual_return_date.unwrap_or(today);
        (reference - self.return_date).num_days().max(0)
    }

    /// A rental is overdue when it is still open and `today` is
    /// strictly past the scheduled return date.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.status.is_terminal() && today > self.return_date
    }

    /// Recompute the status from `today`. Terminal states are left
    /// untouched. Returns whether the status changed; idempotent.
    pub fn refresh_status(&mut self, today: NaiveDate) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        let next = if self.is_overdue(today) {
            RentalStatus::Overdue
        } else {
            RentalStatus::Active
        };
        if next != self.status {
            self.status = next;
            true
        } else {
            false
        }
    }

    /// Late fee for the overdue span at `today`: 10% of the daily rate
    /// per overdue day.
    pub fn late_fee(&self, daily_rate: f64, today: NaiveDate) -> f64 {
        self.overdue_days(today) as f64 * daily_rate * LATE_FEE_RATE
    }

    /// Base cost plus the accrued late fee
    pub fn total_payment(&self) -> f64 {
        self.total_cost + self.late_fee
    }

    /// Serialize to the 10-field store row
    pub fn to_record(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.member_id.clone(),
            self.costume_id.clone(),
            self.size.clone(),
            self.rental_date.format(DATE_FORMAT).to_string(),
            self.return_date.format(DATE_FORMAT).to_string(),
            self.actual_return_date
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            format!("{:.2}", self.total_cost),
            format!("{:.2}", self.late_fee),
            self.status.to_string(),
        ]
    }

    /// Parse a store row back into a rental record
    pub fn from_record(record: &csv::StringRecord) -> AppResult<Self> {
        if record.len() != 10 {
            return Err(AppError::Parse(format!(
                "rental row has {} fields, expected 10",
                record.len()
            )));
        }
        let field = |i: usize| record.get(i).unwrap_or_default().trim();

        let rental_date = parse_date(field(4))?;
        let return_date = parse_date(field(5))?;
        if return_date < rental_date {
            return Err(AppError::Parse(format!(
                "rental {}: return date {} is before start date {}",
                field(0),
                return_date,
                rental_date
            )));
        }
        let actual_return_date = match field(6) {
            "" => None,
            s => Some(parse_date(s)?),
        };
        let status: RentalStatus = field(9).parse()?;

        // The stored invariant: an actual return date exists iff RETURNED
        if actual_return_date.is_some() != (status == RentalStatus::Returned) {
            return Err(AppError::Parse(format!(
                "rental {}: actual return date does not match status {}",
                field(0),
                status
            )));
        }

        Ok(Self {
            id: field(0).to_string(),
            member_id: field(1).to_string(),
            costume_id: field(2).to_string(),
            size: field(3).to_string(),
            rental_date,
            return_date,
            actual_return_date,
            total_cost: parse_money(field(7))?,
            late_fee: parse_money(field(8))?,
            status,
        })
    }
}

fn parse_date(s: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| AppError::Parse(format!("bad date '{}': {}", s, e)))
}

fn parse_money(s: &str) -> AppResult<f64> {
    let value: f64 = s
        .parse()
        .map_err(|e| AppError::Parse(format!("bad amount '{}': {}", s, e)))?;
    if value < 0.0 {
        return Err(AppError::Parse(format!("negative amount '{}'", s)));
    }
    Ok(value)
}
