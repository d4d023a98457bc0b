//! Booking domain models.
//!
//! Provides the input side of the allocation engine: validated booking
//! requests and the resource types they draw from.
//!
//! # Domain Mappings
//!
//! | u-booking | Smart parking | Generic |
//! |-----------|---------------|---------|
//! | Request | Booking command | Job with fixed interval |
//! | Category | Event / Reservation / Parking / Essentials | Job class |
//! | ResourceType | Parking slot, device bundle | Machine type |
//! | PoolSizing | Slots and device units on site | Machines per type |

mod request;
mod resource;

pub use request::{Category, Request, RequestId};
pub use resource::{PoolSizing, ResourceSet, ResourceType};
