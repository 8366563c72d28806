//! Compute the pre-atmosphere velocity correction for a sample meteor with
//! both generations of fit tables.
//!
//! Run with `RUST_LOG=debug` to see which fit records get selected.

use preatmo::fit_tables::{exponential, polynomial};
use preatmo::preatmo_errors::PreatmoError;

fn main() -> Result<(), PreatmoError> {
    env_logger::init();

    // initial velocity (km/s)
    let v_init = 20.0;

    // zenith angle (deg)
    let zangle = 45.0;

    // peak magnitude, used by the unified table only
    let peak_mag = 2.0;

    let meteoroid_type = "cometary";
    let system_type = "moderate";

    let delta_v = exponential::velocity_correction(v_init, zangle, meteoroid_type, system_type)?;
    println!(
        "Correction for {meteoroid_type} meteoroids observed by {system_type} systems \
         with velocity of {v_init:.2} km/s: {delta_v:.3} km/s."
    );

    let delta_v =
        polynomial::velocity_correction(v_init, peak_mag, zangle, meteoroid_type, system_type)?;
    println!(
        "Unified table correction for the same meteor at peak magnitude {peak_mag:+.1}: \
         {delta_v:.3} km/s."
    );

    Ok(())
}
