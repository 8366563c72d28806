//! # Constants and type definitions for preatmo
//!
//! This module centralizes the **conversion factors** and **common type
//! definitions** used throughout the `preatmo` library.
//!
//! ## Overview
//!
//! - Unit conversions (degrees ↔ radians, meters ↔ kilometers)
//! - Core type aliases used across the crate
//! - Bounds inherited from the reference fit tables

// -------------------------------------------------------------------------------------------------
// Conversion factors and table bounds
// -------------------------------------------------------------------------------------------------

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Meters per kilometer, used to convert fitted velocities (m/s) to km/s
pub const METERS_PER_KILOMETER: f64 = 1000.0;

/// Largest zenith angle covered by the unified fit table (degrees).
/// Queries above this value are clamped before evaluation.
pub const MAX_UNIFIED_ZANGLE: Degree = 75.0;

/// Field delimiter of the distributed fit tables
pub const FIT_TABLE_DELIMITER: u8 = b';';

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Velocity in kilometers per second
pub type KilometersPerSecond = f64;
/// Velocity in meters per second
pub type MetersPerSecond = f64;
/// Apparent magnitude
pub type Magnitude = f64;

/// The seven parameters `[a, b, c, d, e, f, g]` of a fitted velocity-difference model
pub type FitCoefficients = [f64; 7];
