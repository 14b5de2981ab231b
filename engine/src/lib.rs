//! Engine Crate
//!
//! Pure business rules for the field-force service: geofence verification,
//! rate lookup, expense row computation, the expense sheet approval
//! lifecycle, the daily attendance ledger and call route ordering.
//!
//! # Architecture
//!
//! - **Types**: Records and request bodies are defined in the `shared-types` crate
//! - **Rules**: Every operation here is a synchronous function over those
//!   records. Nothing touches storage or the clock; timestamps are passed in.
//!
//! # Example
//!
//! ```rust,ignore
//! use engine::{expense, rates};
//!
//! let config = rates::resolve(&table, owner.role, owner.status);
//! let entry = expense::apply_edit(&entry, &edit, &owner.territories, &config);
//! ```

pub mod attendance;
pub mod expense;
pub mod geo;
pub mod hierarchy;
pub mod rates;
pub mod route;

pub use attendance::{punch, PunchInput, PunchOutcome};
pub use expense::lifecycle::{self, Actor};
pub use expense::{apply_edit, materialize_month, recompute, summarize};
pub use geo::{haversine_km, haversine_meters, verify};
pub use rates::{default_rate_table, resolve};
pub use route::optimize;
