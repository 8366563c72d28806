//! Velocity corrections from the unified fit table.
//!
//! A single table (`preatmosphere_fits.csv`) covers every observation system
//! and meteoroid class; rows are tagged with numeric category ids and carry
//! the peak magnitude of the simulated event next to its entry velocity. The
//! velocity difference is modelled as a degree-6 polynomial in zenith angle,
//! valid up to 75°.
//!
//! The table is sparse over a 2D velocity × magnitude grid per category, so
//! an exact match is rare. The selector is nearest-neighbor on each axis in
//! priority order: all rows at the minimal velocity distance are collected,
//! then the one closest in peak magnitude is taken.

use camino::Utf8Path;
use itertools::Itertools;
use serde::Deserialize;

use crate::constants::{
    Degree, FitCoefficients, KilometersPerSecond, Magnitude, MetersPerSecond, Radian,
    FIT_TABLE_DELIMITER, MAX_UNIFIED_ZANGLE, METERS_PER_KILOMETER, RADEG,
};
use crate::fit_tables::{read_table_file, unified_fit_table, MeteoroidType, SystemType};
use crate::preatmo_errors::PreatmoError;

/// Number of fields of a unified table record.
const FIELD_COUNT: usize = 11;

/// Comment marker of the unified table.
const COMMENT_MARKER: char = '#';

/// One row of the unified fit table.
///
/// The category ids are kept as floats like every other field; rows are
/// matched on exact equality against [`SystemType::unified_id`] and
/// [`MeteoroidType::unified_id`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UnifiedFitRecord {
    /// Observation system id (0 = allsky, 1 = moderate, 2 = intensified)
    pub system_id: f64,
    /// Meteoroid class id (0 = cometary, 1 = asteroidal, 2 = iron-rich)
    pub meteoroid_id: f64,
    /// Simulated entry velocity the fit was produced for (m/s)
    pub reference_velocity: MetersPerSecond,
    /// Peak magnitude of the simulated event
    pub reference_peak_magnitude: Magnitude,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
    pub g: f64,
}

impl UnifiedFitRecord {
    /// Fit parameters in evaluation order `[a, b, c, d, e, f, g]`.
    pub fn coefficients(&self) -> FitCoefficients {
        [self.a, self.b, self.c, self.d, self.e, self.f, self.g]
    }
}

/// Parse the unified fit table from its text content.
///
/// Lines whose first non-whitespace character is `#` are skipped, as are
/// blank lines; every remaining line must carry 11 numeric fields.
pub fn parse_fit_table(content: &str, delimiter: u8) -> Result<Vec<UnifiedFitRecord>, PreatmoError> {
    let data_lines = content
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.trim_start().starts_with(COMMENT_MARKER));

    super::decode_rows(data_lines, delimiter, FIELD_COUNT)
}

/// Load a unified fit table from a file.
///
/// Same contract as [`crate::fit_tables::exponential::load_fit_table`], for
/// the 11-field unified schema.
pub fn load_fit_table(
    path: &Utf8Path,
    delimiter: u8,
) -> Result<Vec<UnifiedFitRecord>, PreatmoError> {
    let content = read_table_file(path)?;
    parse_fit_table(&content, delimiter)
}

/// Evaluate the degree-6 polynomial zenith-angle model.
///
/// Arguments
/// ---------
/// * `zangle`: zenith angle (radians)
/// * `params`: fit parameters `[a, b, c, d, e, f, g]`
///
/// Return
/// ------
/// * the velocity difference in m/s
pub fn zangle_model(zangle: Radian, params: &FitCoefficients) -> MetersPerSecond {
    let [a, b, c, d, e, f, g] = *params;
    a + b * zangle
        + c * zangle.powi(2)
        + d * zangle.powi(3)
        + e * zangle.powi(4)
        + f * zangle.powi(5)
        + g * zangle.powi(6)
}

/// Select the best-matching record for the query.
///
/// Rows of other categories are discarded first. All survivors at the
/// minimal velocity distance `|reference_velocity/1000 - v_init|` form the
/// tied candidate set; among them the record minimizing
/// `|reference_peak_magnitude - peak_mag|` is taken, ties broken by first
/// occurrence. Returns `None` when the category filter leaves no row.
pub fn select_fit(
    records: &[UnifiedFitRecord],
    system: SystemType,
    meteoroid: MeteoroidType,
    v_init: KilometersPerSecond,
    peak_mag: Magnitude,
) -> Option<&UnifiedFitRecord> {
    let system_id = f64::from(system.unified_id());
    let meteoroid_id = f64::from(meteoroid.unified_id());

    let candidates: Vec<&UnifiedFitRecord> = records
        .iter()
        .filter(|record| record.system_id == system_id && record.meteoroid_id == meteoroid_id)
        .collect();

    let distances: Vec<f64> = candidates
        .iter()
        .map(|record| (record.reference_velocity / METERS_PER_KILOMETER - v_init).abs())
        .collect();
    let min_distance = distances.iter().copied().reduce(f64::min)?;

    // every record at the minimal velocity distance stays in the running
    let tied: Vec<&UnifiedFitRecord> = candidates
        .iter()
        .zip(&distances)
        .filter(|(_, distance)| **distance == min_distance)
        .map(|(record, _)| *record)
        .collect();

    let nearest = tied.iter().position_min_by(|first, second| {
        (first.reference_peak_magnitude - peak_mag)
            .abs()
            .total_cmp(&(second.reference_peak_magnitude - peak_mag).abs())
    })?;

    Some(tied[nearest])
}

/// Returns the velocity difference a meteor of the given type, observed by
/// the given system, suffered before detection, interpolated from the
/// unified simulation table by nearest velocity and peak magnitude.
///
/// Arguments
/// ---------
/// * `v_init`: measured initial velocity (km/s)
/// * `peak_mag`: peak magnitude of the meteor
/// * `zangle`: zenith angle (degrees); values above 75° are clamped to 75°,
///   the table holds no data beyond that bound
/// * `meteoroid_type`: one of `cometary`, `asteroidal`, `iron-rich`
/// * `system_type`: one of `intensified`, `moderate`, `allsky`
///
/// Return
/// ------
/// * the velocity difference in km/s
pub fn velocity_correction(
    v_init: KilometersPerSecond,
    peak_mag: Magnitude,
    zangle: Degree,
    meteoroid_type: &str,
    system_type: &str,
) -> Result<KilometersPerSecond, PreatmoError> {
    let system: SystemType = system_type.parse()?;
    let meteoroid: MeteoroidType = meteoroid_type.parse()?;

    let zangle = zangle.min(MAX_UNIFIED_ZANGLE);

    let records = parse_fit_table(unified_fit_table(), FIT_TABLE_DELIMITER)?;

    let fit = select_fit(&records, system, meteoroid, v_init, peak_mag).ok_or_else(|| {
        PreatmoError::NoMatchingFit(format!(
            "no unified fits for system_type = {system}, meteoroid_type = {meteoroid}"
        ))
    })?;

    log::debug!(
        "selected unified fit at v = {:.1} m/s, peak mag = {:+.2} for the query \
         (v_init = {v_init} km/s, peak_mag = {peak_mag}, {meteoroid} on a {system} system)",
        fit.reference_velocity,
        fit.reference_peak_magnitude,
    );

    Ok(zangle_model(zangle * RADEG, &fit.coefficients()) / METERS_PER_KILOMETER)
}

#[cfg(test)]
mod polynomial_test {
    use approx::assert_relative_eq;

    use super::*;

    fn record(
        system_id: f64,
        meteoroid_id: f64,
        reference_velocity: f64,
        reference_peak_magnitude: f64,
    ) -> UnifiedFitRecord {
        UnifiedFitRecord {
            system_id,
            meteoroid_id,
            reference_velocity,
            reference_peak_magnitude,
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 0.0,
            e: 0.0,
            f: 0.0,
            g: 0.0,
        }
    }

    #[test]
    fn test_zangle_model() {
        let params = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        // all powers of 0.5 are exact in binary
        assert_relative_eq!(zangle_model(0.5, &params), 3.859375, max_relative = 1e-15);
        assert_relative_eq!(zangle_model(0.0, &params), 1.0, max_relative = 1e-15);
    }

    #[test]
    fn test_select_fit_filters_categories() {
        let records = vec![
            record(0.0, 0.0, 20000.0, -2.0),
            record(1.0, 0.0, 30000.0, 3.0),
            record(1.0, 1.0, 20000.0, 3.0),
        ];

        let fit = select_fit(
            &records,
            SystemType::Moderate,
            MeteoroidType::Cometary,
            20.0,
            3.0,
        )
        .unwrap();
        // the only moderate/cometary row wins even though its velocity is farther
        assert_eq!(fit.reference_velocity, 30000.0);

        assert!(select_fit(
            &records,
            SystemType::Intensified,
            MeteoroidType::IronRich,
            20.0,
            3.0,
        )
        .is_none());
    }

    #[test]
    fn test_select_fit_magnitude_breaks_velocity_ties() {
        let records = vec![
            record(1.0, 0.0, 20000.0, 1.0),
            record(1.0, 0.0, 20000.0, 4.0),
            record(1.0, 0.0, 30000.0, 3.5),
        ];

        let fit = select_fit(
            &records,
            SystemType::Moderate,
            MeteoroidType::Cometary,
            20.0,
            3.5,
        )
        .unwrap();
        assert_eq!(fit.reference_peak_magnitude, 4.0);
    }

    #[test]
    fn test_select_fit_full_tie_takes_first() {
        let records = vec![
            record(1.0, 0.0, 20000.0, 3.0),
            record(1.0, 0.0, 20000.0, 4.0),
        ];

        // both candidates are 0.5 mag away; the first in file order wins
        let fit = select_fit(
            &records,
            SystemType::Moderate,
            MeteoroidType::Cometary,
            20.0,
            3.5,
        )
        .unwrap();
        assert_eq!(fit.reference_peak_magnitude, 3.0);
    }

    #[test]
    fn test_parse_fit_table_skips_comments() {
        let content = "# header comment\n\
                       \n\
                       1;0;20000.0;3.0;1.0;2.0;3.0;4.0;5.0;6.0;7.0\n\
                       \x20\x20# indented comment\n\
                       1;0;30000.0;2.0;1.0;2.0;3.0;4.0;5.0;6.0;7.0\n";
        let records = parse_fit_table(content, b';').unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].reference_velocity, 30000.0);
    }
}
