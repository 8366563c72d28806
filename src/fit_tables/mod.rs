//! # Pre-atmosphere velocity fit tables
//!
//! This module provides tools to **handle the simulated velocity-difference
//! fit tables** used to correct a meteor's measured initial velocity for the
//! deceleration it suffered before detection. The tables hold closed-form fit
//! coefficients derived from ablation simulations over a grid of entry
//! velocities (Vida et al. 2018), binned by observation system and meteoroid
//! class.
//!
//! ## Public API
//!
//! ### [`crate::fit_tables::SystemType`]
//! Enumeration of the supported observation system classes:
//!
//! - `SystemType::Intensified` – image intensified systems, LM = +6.5 (WMPG influx systems, CAMO)
//! - `SystemType::Moderate` – moderate FOV systems, LM = +5.0 (CAMS, SonotaCo, IMO network)
//! - `SystemType::Allsky` – all-sky fireball systems, LM = -0.5 (ASGARD, EN, DFN)
//!
//! ### [`crate::fit_tables::MeteoroidType`]
//! Enumeration of the meteoroid density/ablation classes:
//!
//! - `MeteoroidType::Cometary` – density 360 to 1510 kg/m^3, ablation coefficient 0.1 s^2/km^2
//! - `MeteoroidType::Asteroidal` – density 2500 to 3500 kg/m^3, ablation coefficient 0.042 s^2/km^2
//! - `MeteoroidType::IronRich` – density 4150 to 5425 kg/m^3, ablation coefficient 0.07 s^2/km^2
//!
//! Both enums can be created from a string with `.parse()`; any other value
//! is rejected with an error naming the offending string and the accepted set.
//!
//! ### Correction functions
//!
//! Two generations of fit tables are distributed with the crate and each has
//! its own correction entry point:
//!
//! - [`exponential::velocity_correction`] – one table per
//!   system × meteoroid pair (`sim_<system>_<meteoroid>_fits.csv`), fits of
//!   the form `a + b·θ + c·exp(d·θ + e) + f·exp(g·θ² + e)`, gated by a
//!   per-record minimum zenith angle.
//! - [`polynomial::velocity_correction`] – a single table
//!   (`preatmosphere_fits.csv`) tagged by system/meteoroid ids and peak
//!   magnitude, degree-6 polynomial fits, valid up to a zenith angle of 75°.
//!
//! The tables are re-read on every call; they are small enough that the
//! parse cost is negligible and no state survives a call.

pub mod exponential;
pub mod polynomial;

use std::str::FromStr;

use camino::Utf8Path;
use itertools::Itertools;
use serde::de::DeserializeOwned;

use crate::preatmo_errors::PreatmoError;

/// Observation system class, distinguished by limiting magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemType {
    /// All-sky fireball systems (ASGARD, EN, DFN)
    Allsky,
    /// Moderate field-of-view systems (CAMS, SonotaCo, IMO network)
    Moderate,
    /// Image intensified systems (WMPG influx systems, CAMO)
    Intensified,
}

impl SystemType {
    /// Numeric id tagging rows of the unified fit table.
    pub fn unified_id(&self) -> u8 {
        match self {
            SystemType::Allsky => 0,
            SystemType::Moderate => 1,
            SystemType::Intensified => 2,
        }
    }

    /// Limiting magnitude of the system class.
    pub fn limiting_magnitude(&self) -> crate::constants::Magnitude {
        match self {
            SystemType::Allsky => -0.5,
            SystemType::Moderate => 5.0,
            SystemType::Intensified => 6.5,
        }
    }

    fn file_token(&self) -> &'static str {
        match self {
            SystemType::Allsky => "allsky",
            SystemType::Moderate => "moderate",
            SystemType::Intensified => "intensified",
        }
    }
}

impl FromStr for SystemType {
    type Err = PreatmoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "allsky" => Ok(SystemType::Allsky),
            "moderate" => Ok(SystemType::Moderate),
            "intensified" => Ok(SystemType::Intensified),
            _ => Err(PreatmoError::InvalidSystemType(s.to_string())),
        }
    }
}

impl std::fmt::Display for SystemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.file_token())
    }
}

/// Meteoroid density/ablation class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeteoroidType {
    Cometary,
    Asteroidal,
    IronRich,
}

impl MeteoroidType {
    /// Numeric id tagging rows of the unified fit table.
    pub fn unified_id(&self) -> u8 {
        match self {
            MeteoroidType::Cometary => 0,
            MeteoroidType::Asteroidal => 1,
            MeteoroidType::IronRich => 2,
        }
    }

    /// Bulk density range of the class, kg/m^3.
    pub fn density_range(&self) -> (f64, f64) {
        match self {
            MeteoroidType::Cometary => (360.0, 1510.0),
            MeteoroidType::Asteroidal => (2500.0, 3500.0),
            MeteoroidType::IronRich => (4150.0, 5425.0),
        }
    }

    /// Ablation coefficient of the class, s^2/km^2.
    pub fn ablation_coefficient(&self) -> f64 {
        match self {
            MeteoroidType::Cometary => 0.1,
            MeteoroidType::Asteroidal => 0.042,
            MeteoroidType::IronRich => 0.07,
        }
    }

    // The per-pair simulation files shorten "iron-rich" to "iron".
    fn file_token(&self) -> &'static str {
        match self {
            MeteoroidType::Cometary => "cometary",
            MeteoroidType::Asteroidal => "asteroidal",
            MeteoroidType::IronRich => "iron",
        }
    }
}

impl FromStr for MeteoroidType {
    type Err = PreatmoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cometary" => Ok(MeteoroidType::Cometary),
            "asteroidal" => Ok(MeteoroidType::Asteroidal),
            "iron-rich" => Ok(MeteoroidType::IronRich),
            _ => Err(PreatmoError::InvalidMeteoroidType(s.to_string())),
        }
    }
}

impl std::fmt::Display for MeteoroidType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeteoroidType::IronRich => write!(f, "iron-rich"),
            _ => write!(f, "{}", self.file_token()),
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Distributed reference tables
// -------------------------------------------------------------------------------------------------

static SIM_ALLSKY_COMETARY_FITS: &str = include_str!("data_tables/sim_allsky_cometary_fits.csv");
static SIM_ALLSKY_ASTEROIDAL_FITS: &str =
    include_str!("data_tables/sim_allsky_asteroidal_fits.csv");
static SIM_ALLSKY_IRON_FITS: &str = include_str!("data_tables/sim_allsky_iron_fits.csv");
static SIM_MODERATE_COMETARY_FITS: &str =
    include_str!("data_tables/sim_moderate_cometary_fits.csv");
static SIM_MODERATE_ASTEROIDAL_FITS: &str =
    include_str!("data_tables/sim_moderate_asteroidal_fits.csv");
static SIM_MODERATE_IRON_FITS: &str = include_str!("data_tables/sim_moderate_iron_fits.csv");
static SIM_INTENSIFIED_COMETARY_FITS: &str =
    include_str!("data_tables/sim_intensified_cometary_fits.csv");
static SIM_INTENSIFIED_ASTEROIDAL_FITS: &str =
    include_str!("data_tables/sim_intensified_asteroidal_fits.csv");
static SIM_INTENSIFIED_IRON_FITS: &str = include_str!("data_tables/sim_intensified_iron_fits.csv");

static PREATMOSPHERE_FITS: &str = include_str!("data_tables/preatmosphere_fits.csv");

/// Contents of the distributed per-pair simulation fit table for the given
/// system and meteoroid class.
pub fn sim_fit_table(system: SystemType, meteoroid: MeteoroidType) -> &'static str {
    match (system, meteoroid) {
        (SystemType::Allsky, MeteoroidType::Cometary) => SIM_ALLSKY_COMETARY_FITS,
        (SystemType::Allsky, MeteoroidType::Asteroidal) => SIM_ALLSKY_ASTEROIDAL_FITS,
        (SystemType::Allsky, MeteoroidType::IronRich) => SIM_ALLSKY_IRON_FITS,
        (SystemType::Moderate, MeteoroidType::Cometary) => SIM_MODERATE_COMETARY_FITS,
        (SystemType::Moderate, MeteoroidType::Asteroidal) => SIM_MODERATE_ASTEROIDAL_FITS,
        (SystemType::Moderate, MeteoroidType::IronRich) => SIM_MODERATE_IRON_FITS,
        (SystemType::Intensified, MeteoroidType::Cometary) => SIM_INTENSIFIED_COMETARY_FITS,
        (SystemType::Intensified, MeteoroidType::Asteroidal) => SIM_INTENSIFIED_ASTEROIDAL_FITS,
        (SystemType::Intensified, MeteoroidType::IronRich) => SIM_INTENSIFIED_IRON_FITS,
    }
}

/// Contents of the distributed unified fit table.
pub fn unified_fit_table() -> &'static str {
    PREATMOSPHERE_FITS
}

/// Conventional file name of a per-pair simulation fit table,
/// e.g. `sim_moderate_cometary_fits.csv`.
pub fn sim_fit_file_name(system: SystemType, meteoroid: MeteoroidType) -> String {
    format!(
        "sim_{}_{}_fits.csv",
        system.file_token(),
        meteoroid.file_token()
    )
}

// -------------------------------------------------------------------------------------------------
// Shared table loading machinery
// -------------------------------------------------------------------------------------------------

/// Read a fit table file into memory, mapping a missing file to
/// [`PreatmoError::FitTableNotFound`].
pub(crate) fn read_table_file(path: &Utf8Path) -> Result<String, PreatmoError> {
    std::fs::read_to_string(path).map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => PreatmoError::FitTableNotFound(path.to_owned()),
        _ => PreatmoError::IoError(err),
    })
}

/// Decode retained table lines into records of `field_count` numeric fields.
///
/// Arguments
/// ---------
/// * `lines`: the data lines of the table, header/comment lines already removed
/// * `delimiter`: field delimiter byte
/// * `field_count`: exact number of fields every record must carry
///
/// Return
/// ------
/// * the decoded records, in file order. The whole load aborts on the first
///   malformed line; no partial result is returned.
pub(crate) fn decode_rows<'a, T, I>(
    mut lines: I,
    delimiter: u8,
    field_count: usize,
) -> Result<Vec<T>, PreatmoError>
where
    T: DeserializeOwned,
    I: Iterator<Item = &'a str>,
{
    let buffer = lines.join("\n");

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(buffer.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.len() != field_count {
            return Err(PreatmoError::InvalidFieldCount {
                expected: field_count,
                found: record.len(),
            });
        }
        rows.push(record.deserialize(None)?);
    }
    Ok(rows)
}
