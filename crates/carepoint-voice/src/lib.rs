//! Speech I/O for carepoint.
//!
//! The host supplies speech synthesis and recognition engines; this crate
//! detects which are present, builds bilingual triage announcements, and
//! turns recognised speech into symptom labels the triage scorer knows.

pub mod announcement;
pub mod capabilities;
pub mod extraction;

pub use announcement::*;
pub use capabilities::*;
pub use extraction::*;
