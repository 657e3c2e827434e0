//! LLM provider protocol definitions.
//!
//! Providers translate neutral [`ChatRequest`]s into a vendor's wire format
//! and expose the answer as a full response or a stream of text fragments.

mod request;
mod response;
mod task;
mod traits;

pub use request::*;
pub use response::*;
pub use task::*;
pub use traits::*;
