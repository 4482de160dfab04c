//! Survey cleaning and aggregation.
//!
//! Stages run in a fixed order: prune non-analytic columns, map ordinal
//! labels to scores, compute the configured aggregates, one-hot encode the
//! guide-usage flag, and correlate every numeric column.

pub mod aggregate;
pub mod analyzer;
pub mod correlation;
pub mod encode;
pub mod mapping;
pub mod prune;
pub mod types;
pub mod utility;
