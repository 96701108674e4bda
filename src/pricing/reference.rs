//! Reference data: minimum wages by country and fence productivity tables.
//!
//! Built once at startup and shared read-only through application state.

use std::collections::BTreeMap;
use std::path::Path;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;

/// Built-in hourly minimum wages (local currency per hour).
///
/// A wage of 0 marks a country without a statutory minimum; the
/// international engine substitutes its wage floor for those.
const MIN_WAGES: &[(&str, Decimal)] = &[
    ("United Kingdom", dec!(12.21)),
    ("Ireland", dec!(13.50)),
    ("France", dec!(11.88)),
    ("Germany", dec!(12.82)),
    ("Netherlands", dec!(13.68)),
    ("Belgium", dec!(12.01)),
    ("Spain", dec!(8.51)),
    ("Italy", dec!(9.80)),
    ("Portugal", dec!(5.23)),
    ("Poland", dec!(4.95)),
    ("Czech Republic", dec!(4.95)),
    ("Austria", dec!(12.85)),
    ("Switzerland", dec!(25.00)),
    ("Sweden", dec!(0.00)),
    ("Norway", dec!(0.00)),
    ("Denmark", dec!(0.00)),
    ("United Arab Emirates", dec!(2.72)),
    ("Saudi Arabia", dec!(2.67)),
    ("Qatar", dec!(2.00)),
    ("Kuwait", dec!(2.72)),
    ("Oman", dec!(1.68)),
    ("Bahrain", dec!(2.13)),
    ("Turkey", dec!(3.29)),
    ("Egypt", dec!(1.36)),
    ("Jordan", dec!(2.27)),
    ("Lebanon", dec!(1.00)),
    ("United States", dec!(7.25)),
    ("Canada", dec!(11.00)),
    ("Australia", dec!(23.23)),
    ("New Zealand", dec!(22.70)),
];

/// Meters per day for an 8-person international crew.
const INTERNATIONAL_PRODUCTIVITY: &[(&str, u32)] =
    &[("OR", 1080), ("PR", 240), ("CM", 240), ("CT", 240), ("HM", 240)];

/// Meters per day for a 2-person UK crew.
const UK_PRODUCTIVITY: &[(&str, u32)] =
    &[("OR", 270), ("PR", 60), ("CM", 60), ("CT", 60), ("HM", 60)];

const INTERNATIONAL_DEFAULT_PRODUCTIVITY: u32 = 240;
const UK_DEFAULT_PRODUCTIVITY: u32 = 60;

/// Error loading reference data from disk
#[derive(Debug, thiserror::Error)]
pub enum ReferenceDataError {
    #[error("failed to read reference data from {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid reference data in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("reference data in {path} has no countries")]
    Empty { path: String },
}

/// Productivity by fence type code, in table order, with a fallback rate.
#[derive(Debug, Clone)]
pub struct ProductivityTable {
    rates: Vec<(String, u32)>,
    fallback: u32,
}

impl ProductivityTable {
    fn from_static(rates: &[(&str, u32)], fallback: u32) -> Self {
        Self {
            rates: rates
                .iter()
                .map(|(code, rate)| (code.to_string(), *rate))
                .collect(),
            fallback,
        }
    }

    /// Meters per day for a fence type; unknown types get the fallback rate.
    pub fn rate_for(&self, fence_type: &str) -> Decimal {
        let rate = self
            .rates
            .iter()
            .find(|(code, _)| code == fence_type)
            .map(|(_, rate)| *rate)
            .unwrap_or(self.fallback);
        Decimal::from(rate)
    }

    /// Fence type codes in table order
    pub fn codes(&self) -> Vec<String> {
        self.rates.iter().map(|(code, _)| code.clone()).collect()
    }
}

/// Static lookup tables used by both pricing engines
#[derive(Debug, Clone)]
pub struct ReferenceData {
    min_wages: BTreeMap<String, Decimal>,
    international_productivity: ProductivityTable,
    uk_productivity: ProductivityTable,
}

impl ReferenceData {
    /// Built-in tables
    pub fn standard() -> Self {
        Self::with_wages(
            MIN_WAGES
                .iter()
                .map(|(country, wage)| (country.to_string(), *wage))
                .collect(),
        )
    }

    /// Built-in productivity tables with a custom wage table.
    pub fn with_wages(min_wages: BTreeMap<String, Decimal>) -> Self {
        Self {
            min_wages,
            international_productivity: ProductivityTable::from_static(
                INTERNATIONAL_PRODUCTIVITY,
                INTERNATIONAL_DEFAULT_PRODUCTIVITY,
            ),
            uk_productivity: ProductivityTable::from_static(
                UK_PRODUCTIVITY,
                UK_DEFAULT_PRODUCTIVITY,
            ),
        }
    }

    /// Load the wage table from a JSON object of `{"Country": wage}`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ReferenceDataError> {
        let path = path.as_ref();
        let shown = path.display().to_string();

        let raw = std::fs::read_to_string(path).map_err(|source| ReferenceDataError::Read {
            path: shown.clone(),
            source,
        })?;

        let min_wages: BTreeMap<String, Decimal> =
            serde_json::from_str(&raw).map_err(|source| ReferenceDataError::Parse {
                path: shown.clone(),
                source,
            })?;

        if min_wages.is_empty() {
            return Err(ReferenceDataError::Empty { path: shown });
        }

        info!("Loaded {} country wages from {}", min_wages.len(), shown);
        Ok(Self::with_wages(min_wages))
    }

    /// Hourly minimum wage as listed (0 for placeholder entries).
    pub fn min_wage(&self, country: &str) -> Option<Decimal> {
        self.min_wages.get(country).copied()
    }

    /// Supported countries, sorted by name
    pub fn countries(&self) -> Vec<String> {
        self.min_wages.keys().cloned().collect()
    }

    pub fn international_productivity(&self) -> &ProductivityTable {
        &self.international_productivity
    }

    pub fn uk_productivity(&self) -> &ProductivityTable {
        &self.uk_productivity
    }

    /// Supported UK fence type codes
    pub fn uk_fence_types(&self) -> Vec<String> {
        self.uk_productivity.codes()
    }
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self::standard()
    }
}
