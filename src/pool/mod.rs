//! Resource pool and conflict tracking.
//!
//! Each resource type owns a list of interchangeable instances; each
//! instance keeps its bookings in an [`OverlapIndex`] so that a conflict
//! test costs one binary search.
//!
//! # Reference
//! - Cormen et al. (2009), *Introduction to Algorithms*, 3rd ed., Ch. 14.3
//!   "Interval trees"

mod allocation;
mod instance;
mod overlap;
mod resource_pool;

pub use allocation::Allocation;
pub use instance::{Instance, InstanceId};
pub use overlap::{Booking, OverlapIndex};
pub use resource_pool::{Placement, ResourcePool};
