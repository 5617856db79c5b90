//! Input/output helpers.
//!
//! - raw value coercion (`coerce`)
//! - CSV ingest + validation (`ingest`)
//! - dataset and assessment exports (`export`)
//! - model artifact JSON read/write (`artifact`)
//! - JSON request/response contract (`request`)

pub mod artifact;
pub mod coerce;
pub mod export;
pub mod ingest;
pub mod request;

pub use artifact::*;
pub use coerce::*;
pub use export::*;
pub use ingest::*;
pub use request::*;
