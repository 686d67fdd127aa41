//! # Built-in subscribers
//!
//! - [`LogWriter`]: renders events through `tracing` (info for outcomes, debug for
//!   controller chatter, warn for failures).

mod log;

pub use log::LogWriter;
