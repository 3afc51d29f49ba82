//! # Superweapon Development Tools
//!
//! Command-line tools for development:
//! - Rules and scenario validation
//! - Headless scenario runs with a JSON report

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod error;
pub mod report;
pub mod validate;
