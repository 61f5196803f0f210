//! Taper Schedule Generator Library
//!
//! Core functionality for generating benzodiazepine taper schedules:
//! diazepam-equivalent conversion, percentage-per-interval step-down,
//! tablet-combination rendering and artifact generation.

pub mod api;
pub mod build_info;
pub mod equivalence;
pub mod error;
pub mod models;
pub mod reports;
pub mod schedule;

pub use error::{TaperError, TaperResult};
pub use models::{TaperPlan, TaperRequest, TaperResponse};
pub use schedule::generate_plan;
