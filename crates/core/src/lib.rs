//! # Slotbook Core
//!
//! The slot-booking engine: owners publish time slots, claimants book and
//! release them.
//!
//! - [`builder`]: request validation and single/batch slot planning
//! - [`checker`]: duplicate and overlap predicates
//! - [`booking`]: the [`SlotBook`] service and its claim/cancel transitions
//! - [`queries`]: owner and claimant views
//! - [`store`]: the traits a datastore implements to host the engine
//!
//! Time is naive local time with minute precision, read through [`Clock`].

pub mod booking;
pub mod builder;
pub mod checker;
pub mod clock;
pub mod errors;
pub mod memory;
pub mod models;
pub mod policy;
pub mod queries;
pub mod store;

pub use booking::SlotBook;
pub use builder::SlotRequest;
pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::{BookingError, BookingResult};
pub use policy::SlotPolicy;
