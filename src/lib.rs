//! `preatmo` — empirical pre-atmosphere velocity corrections for meteors.
//!
//! A meteor decelerates between hitting the atmosphere and becoming bright
//! enough for a given observation system to detect it. This crate evaluates
//! precomputed simulation fits to recover that lost velocity from the
//! measured initial velocity, the zenith angle, and (for the unified table)
//! the peak magnitude.

pub mod constants;
pub mod fit_tables;
pub mod preatmo_errors;
