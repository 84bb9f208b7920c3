//! Domain models for the carepoint system.

mod patient;
mod pharmacy;
mod prescription;
mod record;
mod reference;

pub use patient::*;
pub use pharmacy::*;
pub use prescription::*;
pub use record::*;
pub use reference::*;
