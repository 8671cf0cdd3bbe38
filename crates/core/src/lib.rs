//! # DPS Core
//!
//! Core logic for a first-aid post ("Dispositif Prévisionnel de Secours")
//! triage and patient-tracking system:
//! - the intake codec packing structured form state into the flat,
//!   string-based patient record and recovering it again
//! - the active triage list ordering and aggregation pipeline
//! - a sharded JSON patient store and station configuration
//! - printable patient sheets and the equipment-readiness checklist
//!
//! **No presentation concerns**: terminals, forms and printing belong to the
//! consumers of this crate.

pub mod checklist;
pub mod codec;
pub mod config;
pub mod constants;
pub mod error;
pub mod intake;
pub mod notify;
pub mod patient;
pub mod report;
pub mod service;
pub mod store;
pub mod triage;

pub use config::CoreConfig;
pub use error::{DpsError, DpsResult};
pub use intake::PatientIntake;
pub use patient::Patient;

// Re-export the shared severity types so consumers need only one import.
pub use dps_types::{severity_rank, TriageCategory};
