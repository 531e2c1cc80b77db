//! osc-core: shared foundation for the oscillator sweep tools.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - timing (wall-clock phase timers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod timing;

pub use error::{OscError, OscResult};
pub use numeric::*;
pub use timing::Timer;
