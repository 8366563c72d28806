//! Velocity corrections from the per-pair simulation tables.
//!
//! Each observation system × meteoroid class pair has its own table
//! (`sim_<system>_<meteoroid>_fits.csv`). A record holds the entry velocity
//! the fit was produced for, the minimum zenith angle the fit is valid from,
//! and the seven parameters of an exponential model of the velocity
//! difference as a function of zenith angle.

use camino::Utf8Path;
use itertools::Itertools;
use serde::Deserialize;

use crate::constants::{
    Degree, FitCoefficients, KilometersPerSecond, MetersPerSecond, Radian, FIT_TABLE_DELIMITER,
    METERS_PER_KILOMETER, RADEG,
};
use crate::fit_tables::{
    read_table_file, sim_fit_file_name, sim_fit_table, MeteoroidType, SystemType,
};
use crate::preatmo_errors::PreatmoError;

/// Number of fields of a per-pair simulation table record.
const FIELD_COUNT: usize = 9;

/// One row of a per-pair simulation fit table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ZenithFitRecord {
    /// Simulated entry velocity the fit was produced for (m/s)
    pub reference_velocity: MetersPerSecond,
    /// Lower bound of zenith angle validity for this fit (rad)
    pub min_zangle: Radian,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
    pub g: f64,
}

impl ZenithFitRecord {
    /// Fit parameters in evaluation order `[a, b, c, d, e, f, g]`.
    pub fn coefficients(&self) -> FitCoefficients {
        [self.a, self.b, self.c, self.d, self.e, self.f, self.g]
    }
}

/// Parse a per-pair simulation fit table from its text content.
///
/// The first line is a header and is skipped unconditionally; every
/// remaining line must carry 9 numeric fields.
pub fn parse_fit_table(content: &str, delimiter: u8) -> Result<Vec<ZenithFitRecord>, PreatmoError> {
    super::decode_rows(content.lines().skip(1), delimiter, FIELD_COUNT)
}

/// Load a per-pair simulation fit table from a file.
///
/// Arguments
/// ---------
/// * `path`: path to the delimited text table
/// * `delimiter`: field delimiter byte (the distributed tables use `;`)
///
/// Return
/// ------
/// * the records in file order, or [`PreatmoError::FitTableNotFound`] if the
///   file does not exist, or a parse error if any retained line is malformed
pub fn load_fit_table(path: &Utf8Path, delimiter: u8) -> Result<Vec<ZenithFitRecord>, PreatmoError> {
    let content = read_table_file(path)?;
    parse_fit_table(&content, delimiter)
}

/// Evaluate the exponential zenith-angle model.
///
/// Arguments
/// ---------
/// * `zangle`: zenith angle (radians)
/// * `params`: fit parameters `[a, b, c, d, e, f, g]`
///
/// Return
/// ------
/// * the velocity difference in m/s. Extreme parameter/angle combinations can
///   overflow the exponentials; the IEEE-754 result (`inf`) is returned as is.
pub fn zangle_model(zangle: Radian, params: &FitCoefficients) -> MetersPerSecond {
    let [a, b, c, d, e, f, g] = *params;
    a + b * zangle + c * (d * zangle + e).exp() + f * (g * zangle.powi(2) + e).exp()
}

/// Select the record whose fitted velocity is nearest to `v_init` among the
/// records valid at the given zenith angle.
///
/// Records with `min_zangle` above `zangle` are discarded first. Among the
/// survivors the absolute distance `|reference_velocity/1000 - v_init|` is
/// minimized; when several records are at the same distance the first one in
/// file order wins. Returns `None` when no record is valid at `zangle`,
/// which callers should expect for very small zenith angles.
pub fn select_fit(
    records: &[ZenithFitRecord],
    v_init: KilometersPerSecond,
    zangle: Radian,
) -> Option<&ZenithFitRecord> {
    let candidates: Vec<&ZenithFitRecord> = records
        .iter()
        .filter(|record| record.min_zangle <= zangle)
        .collect();

    let nearest = candidates.iter().position_min_by(|first, second| {
        velocity_distance(first, v_init).total_cmp(&velocity_distance(second, v_init))
    })?;

    Some(candidates[nearest])
}

fn velocity_distance(record: &ZenithFitRecord, v_init: KilometersPerSecond) -> f64 {
    (record.reference_velocity / METERS_PER_KILOMETER - v_init).abs()
}

/// Returns the velocity difference a meteor of the given type, observed by
/// the given system, suffered before detection, as given by the simulations
/// of Vida et al. 2018. For the areas of the velocity/zenith angle phase
/// space where no simulations were above the detection limit, the difference
/// is taken from the closest available velocity.
///
/// Arguments
/// ---------
/// * `v_init`: measured initial velocity (km/s)
/// * `zangle`: zenith angle (degrees)
/// * `meteoroid_type`: one of `cometary`, `asteroidal`, `iron-rich`
/// * `system_type`: one of `intensified`, `moderate`, `allsky`
///
/// Return
/// ------
/// * the velocity difference in km/s
pub fn velocity_correction(
    v_init: KilometersPerSecond,
    zangle: Degree,
    meteoroid_type: &str,
    system_type: &str,
) -> Result<KilometersPerSecond, PreatmoError> {
    let system: SystemType = system_type.parse()?;
    let meteoroid: MeteoroidType = meteoroid_type.parse()?;

    let records = parse_fit_table(sim_fit_table(system, meteoroid), FIT_TABLE_DELIMITER)?;

    let zangle_rad = zangle * RADEG;
    let fit = select_fit(&records, v_init, zangle_rad).ok_or_else(|| {
        PreatmoError::NoMatchingFit(format!(
            "zenith angle {zangle:.2} deg is below the validity of every fit in {}",
            sim_fit_file_name(system, meteoroid)
        ))
    })?;

    Ok(zangle_model(zangle_rad, &fit.coefficients()) / METERS_PER_KILOMETER)
}
