use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// SeismicRisk – the qualitative hazard ranking
// ---------------------------------------------------------------------------

/// Qualitative seismic hazard category of a fault system.
///
/// Variant order matches the hazard ranking, so `BTreeSet<SeismicRisk>`
/// iterates from lowest to highest risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SeismicRisk {
    Low,
    Moderate,
    ModerateToHigh,
    High,
    VeryHigh,
}

impl SeismicRisk {
    pub const ALL: [SeismicRisk; 5] = [
        SeismicRisk::Low,
        SeismicRisk::Moderate,
        SeismicRisk::ModerateToHigh,
        SeismicRisk::High,
        SeismicRisk::VeryHigh,
    ];

    /// Human readable label, identical to the label used in the source data.
    pub fn label(self) -> &'static str {
        match self {
            SeismicRisk::Low => "Low",
            SeismicRisk::Moderate => "Moderate",
            SeismicRisk::ModerateToHigh => "Moderate to High",
            SeismicRisk::High => "High",
            SeismicRisk::VeryHigh => "Very High",
        }
    }

    /// Integer weight used for heatmap density (1 = Low … 5 = Very High).
    pub fn weight(self) -> u32 {
        match self {
            SeismicRisk::Low => 1,
            SeismicRisk::Moderate => 2,
            SeismicRisk::ModerateToHigh => 3,
            SeismicRisk::High => 4,
            SeismicRisk::VeryHigh => 5,
        }
    }
}

impl fmt::Display for SeismicRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SeismicRisk {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SeismicRisk::ALL
            .into_iter()
            .find(|r| r.label() == s)
            .ok_or_else(|| format!("unknown seismic risk category '{s}'"))
    }
}

// ---------------------------------------------------------------------------
// FaultSystem – one row of the fault table
// ---------------------------------------------------------------------------

/// A major fault system. `latitude` / `longitude` are derived from the
/// source `location` pair once, at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct FaultSystem {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Comma-separated free-text tags, e.g. `"Normal, Thrust"`.
    pub fault_types: String,
    pub tectonic_drivers: String,
    pub examples: String,
    pub last_major_earthquake: String,
    pub description: String,
    pub seismic_risk: SeismicRisk,
    /// mm/year, never negative.
    pub annual_slip_rate: f64,
    /// Display colour as `#RRGGBB`.
    pub color: String,
}

impl FaultSystem {
    /// `[lat, lon]` in degrees.
    pub fn location(&self) -> [f64; 2] {
        [self.latitude, self.longitude]
    }
}

// ---------------------------------------------------------------------------
// HistoricalEarthquake – one row of the earthquake table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistoricalEarthquake {
    pub year: i32,
    /// Place name.
    pub location: String,
    /// Moment magnitude (Mw).
    pub magnitude: f64,
    pub lat: f64,
    pub lon: f64,
    pub deaths: u64,
    pub description: String,
}

// ---------------------------------------------------------------------------
// Dataset – the two validated tables
// ---------------------------------------------------------------------------

/// The immutable dataset store. Built once by
/// [`loader::load_embedded`](super::loader::load_embedded) and shared by
/// reference afterwards; there are no mutation methods.
#[derive(Debug, Clone)]
pub struct Dataset {
    faults: Vec<FaultSystem>,
    earthquakes: Vec<HistoricalEarthquake>,
    warnings: Vec<String>,
}

impl Dataset {
    pub(crate) fn new(
        faults: Vec<FaultSystem>,
        earthquakes: Vec<HistoricalEarthquake>,
        warnings: Vec<String>,
    ) -> Self {
        Dataset {
            faults,
            earthquakes,
            warnings,
        }
    }

    pub fn faults(&self) -> &[FaultSystem] {
        &self.faults
    }

    pub fn earthquakes(&self) -> &[HistoricalEarthquake] {
        &self.earthquakes
    }

    /// Non-fatal problems found while validating the source records.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Sorted distinct risk categories present in the fault table.
    pub fn risk_categories(&self) -> BTreeSet<SeismicRisk> {
        self.faults.iter().map(|f| f.seismic_risk).collect()
    }

    /// Inclusive `(min, max)` year over all earthquakes.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let min = self.earthquakes.iter().map(|q| q.year).min()?;
        let max = self.earthquakes.iter().map(|q| q.year).max()?;
        Some((min, max))
    }

    /// Inclusive `(min, max)` magnitude over all earthquakes.
    pub fn magnitude_bounds(&self) -> Option<(f64, f64)> {
        if self.earthquakes.is_empty() {
            return None;
        }
        let min = self
            .earthquakes
            .iter()
            .map(|q| q.magnitude)
            .fold(f64::INFINITY, f64::min);
        let max = self
            .earthquakes
            .iter()
            .map(|q| q.magnitude)
            .fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }
}
