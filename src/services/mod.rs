//! Business logic services

pub mod availability;
pub mod catalog;
pub mod members;
pub mod rentals;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub availability: availability::AvailabilityService,
    pub catalog: catalog::CatalogService,
    pub members: members::MembersService,
    pub rentals: rentals::RentalService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        let availability = availability::AvailabilityService::new(repository.clone());
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            members: members::MembersService::new(repository.clone()),
            rentals: rentals::RentalService::new(repository, availability.clone()),
            availability,
        }
    }
}
