use preatmo::constants::{METERS_PER_KILOMETER, RADEG};
use preatmo::fit_tables::{exponential, polynomial, sim_fit_table, MeteoroidType, SystemType};
use preatmo::preatmo_errors::PreatmoError;

const SYSTEM_TYPES: [&str; 3] = ["intensified", "moderate", "allsky"];
const METEOROID_TYPES: [&str; 3] = ["cometary", "asteroidal", "iron-rich"];

#[test]
fn test_correction_finite_for_all_category_pairs() {
    for system_type in SYSTEM_TYPES {
        for meteoroid_type in METEOROID_TYPES {
            let delta =
                exponential::velocity_correction(20.0, 45.0, meteoroid_type, system_type).unwrap();
            assert!(
                delta.is_finite(),
                "non-finite exponential correction for {system_type}/{meteoroid_type}"
            );

            let delta =
                polynomial::velocity_correction(20.0, 1.0, 45.0, meteoroid_type, system_type)
                    .unwrap();
            assert!(
                delta.is_finite(),
                "non-finite polynomial correction for {system_type}/{meteoroid_type}"
            );
        }
    }
}

#[test]
fn test_unified_zenith_angle_clamp() {
    // the unified table holds no data beyond 75 deg; larger angles are clamped
    let at_75 = polynomial::velocity_correction(25.0, 0.5, 75.0, "asteroidal", "allsky").unwrap();
    let at_80 = polynomial::velocity_correction(25.0, 0.5, 80.0, "asteroidal", "allsky").unwrap();
    assert_eq!(at_75, at_80);

    // the per-pair tables apply no such clamp
    let at_75 = exponential::velocity_correction(25.0, 75.0, "asteroidal", "allsky").unwrap();
    let at_80 = exponential::velocity_correction(25.0, 80.0, "asteroidal", "allsky").unwrap();
    assert_ne!(at_75, at_80);
}

#[test]
fn test_zenith_floor_yields_no_matching_fit() {
    // every all-sky fit starts at 0.2 rad (~11.5 deg) or above
    let err = exponential::velocity_correction(20.0, 5.0, "cometary", "allsky").unwrap_err();
    assert!(
        matches!(err, PreatmoError::NoMatchingFit(_)),
        "unexpected error: {err:?}"
    );
}

#[test]
fn test_correction_is_deterministic() {
    let first = exponential::velocity_correction(33.3, 62.0, "iron-rich", "intensified").unwrap();
    let second = exponential::velocity_correction(33.3, 62.0, "iron-rich", "intensified").unwrap();
    assert_eq!(first, second);

    let first = polynomial::velocity_correction(33.3, 4.2, 62.0, "iron-rich", "intensified").unwrap();
    let second =
        polynomial::velocity_correction(33.3, 4.2, 62.0, "iron-rich", "intensified").unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_unknown_categories_are_rejected() {
    let err = exponential::velocity_correction(20.0, 45.0, "rocky", "moderate").unwrap_err();
    match err {
        PreatmoError::InvalidMeteoroidType(value) => assert_eq!(value, "rocky"),
        other => panic!("unexpected error: {other:?}"),
    }

    let err = exponential::velocity_correction(20.0, 45.0, "cometary", "CAMS").unwrap_err();
    assert!(matches!(err, PreatmoError::InvalidSystemType(_)));

    let err = polynomial::velocity_correction(20.0, 1.0, 45.0, "rocky", "moderate").unwrap_err();
    assert!(err.to_string().contains("rocky"));
}

#[test]
fn test_correction_matches_manual_pipeline() {
    // replay the whole lookup by hand over the distributed moderate/cometary
    // table and compare against the public function
    let records = exponential::parse_fit_table(
        sim_fit_table(SystemType::Moderate, MeteoroidType::Cometary),
        b';',
    )
    .unwrap();

    let zangle_rad = 45.0 * RADEG;
    let fit = exponential::select_fit(&records, 20.0, zangle_rad).unwrap();
    assert!(fit.min_zangle <= zangle_rad);

    let expected = exponential::zangle_model(zangle_rad, &fit.coefficients()) / METERS_PER_KILOMETER;
    let delta = exponential::velocity_correction(20.0, 45.0, "cometary", "moderate").unwrap();
    assert_eq!(delta, expected);
}

#[test]
fn test_exact_velocity_match_is_preferred() {
    // 20 km/s is a tabulated velocity, so its record is at distance zero and
    // must win over every competitor
    let records = exponential::parse_fit_table(
        sim_fit_table(SystemType::Moderate, MeteoroidType::Cometary),
        b';',
    )
    .unwrap();

    let fit = exponential::select_fit(&records, 20.0, 45.0 * RADEG).unwrap();
    assert_eq!(fit.reference_velocity, 20000.0);
}
