//! Data models for Garderobe

pub mod costume;
pub mod member;
pub mod rental;

// Re-export commonly used types
pub use costume::{Costume, CreateCostume, EventCategory, UpdateCostume};
pub use member::{Member, RegisterMember, UpdateMember};
pub use rental::{CreateRental, Rental, RentalStatus};
