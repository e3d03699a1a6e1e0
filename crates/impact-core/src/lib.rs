pub mod aggregate;
pub mod calendar;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod flow;
pub mod history;
pub mod metrics;
pub mod report;
pub mod scoring;
pub mod sprint;
pub mod tracker;
pub mod types;

pub use error::{ImpactError, Result};
