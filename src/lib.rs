//! Multi-resource booking allocation.
//!
//! Assigns fixed-interval booking requests to a pool of interchangeable
//! resource instances without overlap. A request needing several resource
//! types is placed on all of them or on none. Four policies are provided
//! and scored by utilization: first-come-first-served, largest-job-first,
//! category priority, and a simulated-annealing refinement of
//! largest-job-first.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Request`, `Category`, `ResourceType`,
//!   `ResourceSet`, `PoolSizing`
//! - **`pool`**: `OverlapIndex`, `Instance`, `ResourcePool`, `Allocation`
//! - **`dispatching`**: Ordering rules and the `RuleEngine`
//! - **`scheduler`**: Greedy allocation, policies, utilization and KPIs
//! - **`sa`**: Simulated-annealing optimizer
//! - **`validation`**: Batch checks on request sets and allocations
//!
//! # Example
//!
//! ```
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use u_booking::models::{Category, PoolSizing, Request, ResourceType};
//! use u_booking::scheduler::AllocationPolicy;
//!
//! let requests = vec![
//!     Request::new(Category::Parking, 0, 5, [ResourceType::ParkingSlot]).unwrap(),
//!     Request::new(Category::Essentials, 2, 4, [ResourceType::BatteryCable]).unwrap(),
//! ];
//! let mut rng = StdRng::seed_from_u64(7);
//! let run = AllocationPolicy::Ljf.run(&requests, PoolSizing::default(), &mut rng);
//! assert!(run.is_completed());
//! assert_eq!(run.allocation.accepted_count(), 2);
//! ```
//!
//! # References
//!
//! - Kolen et al. (2007), "Interval scheduling: A survey"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"

pub mod dispatching;
pub mod error;
pub mod models;
pub mod pool;
pub mod sa;
pub mod scheduler;
pub mod validation;

pub use error::{AllocationError, Error, OptimizerError, RequestError, Result};
