//! Common value types.

mod message;
mod usage;

pub use message::*;
pub use usage::*;
