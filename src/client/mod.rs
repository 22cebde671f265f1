//! BoardGameGeek client module
//!
//! Typed operations per resource on top of the resilient transport.
//!
//! # Missing resources
//!
//! Every operation reports "no such resource" as `Ok(None)` (or an empty
//! list): a 404, a non-XML answer, or a document without the requested
//! record. Broken XML is always an error.

mod api;
mod types;

pub use api::BoardGameGeek;
pub use types::GameLookup;
