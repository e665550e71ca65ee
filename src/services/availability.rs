//! Availability calculator
//!
//! Stock availability is an emergent property of the rental set: the
//! per-size stock count in the catalog is a fixed ceiling, and the
//! number of units in use on a given day is derived on demand from the
//! non-cancelled rentals overlapping that day. No mutable stock counter
//! exists anywhere.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::rental::RentalStatus;
use crate::repository::Repository;

#[derive(Clone)]
pub struct AvailabilityService {
    repository: Repository,
}

impl AvailabilityService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Fixed stock ceiling for a costume/size pair; 0 when either is
    /// unknown (callers treat 0 as "unavailable", not as an error).
    pub fn max_stock_for(&self, costume_id: &str, size: &str) -> u32 {
        self.repository.costumes.stock_for(costume_id, size)
    }

    /// Day-indexed count of reserved units for a costume/size pair,
    /// derived from every non-cancelled rental: each one counts on
    /// every day of its booked `[rental_date, return_date]` window,
    /// whatever its current status. Recomputed per query.
    pub fn reservation_counts(&self, costume_id: &str, size: &str) -> BTreeMap<NaiveDate, u32> {
        let mut counts: BTreeMap<NaiveDate, u32> = BTreeMap::new();
        for rental in self.repository.rentals.by_costume(costume_id) {
            if rental.size != size || rental.status == RentalStatus::Cancelled {
                continue;
            }
            for day in rental
                .rental_date
                .iter_days()
                .take_while(|d| *d <= rental.return_date)
            {
                *counts.entry(day).or_insert(0) += 1;
            }
        }
        counts
    }

    /// True only when every day in `[start, end]` keeps at least one
    /// free unit after all existing reservations are counted.
    pub fn is_available_for_period(
        &self,
        costume_id: &str,
        size: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> bool {
        if end < start {
            return false;
        }
        let max_stock = self.max_stock_for(costume_id, size);
        if max_stock == 0 {
            return false;
        }
        let counts = self.reservation_counts(costume_id, size);
        for day in start.iter_days().take_while(|d| *d <= end) {
            let reserved = counts.get(&day).copied().unwrap_or(0);
            if reserved >= max_stock {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::rental::CreateRental;
    use crate::repository::Repository;
    use std::collections::BTreeMap as Map;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    /// Repository over a temp dir with one costume: C1, size M stock 2, size S stock 0
    fn fixture(dir: &tempfile::TempDir) -> (Repository, AvailabilityService) {
        std::fs::write(
            dir.path().join("costumes.csv"),
            "C1,Vampire Cloak,HALLOWEEN,20.00,M:2,S:0,images/vampire.png\n",
        )
        .unwrap();
        let config = crate::config::StoreConfig {
            data_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let repository = Repository::open(&config).unwrap();
        let service = AvailabilityService::new(repository.clone());
        (repository, service)
    }

    fn book(repository: &Repository, member: &str, size: &str, start: &str, end: &str) -> String {
        repository
            .rentals
            .create(
                &CreateRental {
                    member_id: member.into(),
                    costume_id: "C1".into(),
                    size: size.into(),
                    rental_date: date(start),
                    return_date: date(end),
                },
                60.0,
            )
            .unwrap()
            .id
    }

    #[test]
    fn empty_store_is_fully_available() {
        let dir = tempfile::tempdir().unwrap();
        let (_, service) = fixture(&dir);
        assert!(service.is_available_for_period("C1", "M", date("2025-07-01"), date("2025-07-03")));
        assert!(service.reservation_counts("C1", "M").is_empty());
    }

    #[test]
    fn zero_stock_is_never_available() {
        let dir = tempfile::tempdir().unwrap();
        let (_, service) = fixture(&dir);
        assert_eq!(service.max_stock_for("C1", "S"), 0);
        assert!(!service.is_available_for_period("C1", "S", date("2025-07-01"), date("2025-07-01")));
        // Unknown costume or size behaves the same way
        assert!(!service.is_available_for_period("C9", "M", date("2025-07-01"), date("2025-07-01")));
        assert!(!service.is_available_for_period("C1", "XL", date("2025-07-01"), date("2025-07-01")));
    }

    #[test]
    fn full_days_block_overlapping_periods() {
        let dir = tempfile::tempdir().unwrap();
        let (repository, service) = fixture(&dir);

        book(&repository, "M001", "M", "2025-07-01", "2025-07-03");
        // One of two units taken: still available
        assert!(service.is_available_for_period("C1", "M", date("2025-07-01"), date("2025-07-03")));

        book(&repository, "M002", "M", "2025-07-01", "2025-07-03");
        // Both units taken: any overlapping day fails
        assert!(!service.is_available_for_period("C1", "M", date("2025-07-03"), date("2025-07-05")));
        assert!(!service.is_available_for_period("C1", "M", date("2025-07-01"), date("2025-07-01")));
        // A disjoint period is unaffected
        assert!(service.is_available_for_period("C1", "M", date("2025-07-04"), date("2025-07-06")));
    }

    #[test]
    fn counts_are_per_day_inclusive_of_both_ends() {
        let dir = tempfile::tempdir().unwrap();
        let (repository, service) = fixture(&dir);

        book(&repository, "M001", "M", "2025-07-01", "2025-07-03");
        book(&repository, "M002", "M", "2025-07-02", "2025-07-04");

        let counts = service.reservation_counts("C1", "M");
        let expected: Map<NaiveDate, u32> = Map::from([
            (date("2025-07-01"), 1),
            (date("2025-07-02"), 2),
            (date("2025-07-03"), 2),
            (date("2025-07-04"), 1),
        ]);
        assert_eq!(counts, expected);
    }

    #[test]
    fn cancelled_rentals_release_their_units() {
        let dir = tempfile::tempdir().unwrap();
        let (repository, service) = fixture(&dir);

        book(&repository, "M001", "M", "2025-07-01", "2025-07-03");
        let second = book(&repository, "M002", "M", "2025-07-01", "2025-07-03");
        assert!(!service.is_available_for_period("C1", "M", date("2025-07-02"), date("2025-07-02")));

        repository.rentals.cancel(&second).unwrap();
        assert!(service.is_available_for_period("C1", "M", date("2025-07-02"), date("2025-07-02")));
        assert_eq!(
            service.reservation_counts("C1", "M").get(&date("2025-07-02")),
            Some(&1)
        );
    }

    #[test]
    fn returned_rentals_still_count_inside_their_booked_window() {
        let dir = tempfile::tempdir().unwrap();
        let (repository, service) = fixture(&dir);

        book(&repository, "M001", "M", "2025-07-01", "2025-07-03");
        let second = book(&repository, "M002", "M", "2025-07-01", "2025-07-03");
        repository
            .rentals
            .return_rental(&second, date("2025-07-02"))
            .unwrap();

        // Availability only distinguishes CANCELLED; the returned
        // rental keeps counting over its booked window.
        assert!(!service.is_available_for_period("C1", "M", date("2025-07-03"), date("2025-07-03")));
    }

    #[test]
    fn inverted_range_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let (_, service) = fixture(&dir);
        assert!(!service.is_available_for_period("C1", "M", date("2025-07-03"), date("2025-07-01")));
    }
}
