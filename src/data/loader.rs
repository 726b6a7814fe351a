use std::collections::BTreeSet;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::model::{Dataset, FaultSystem, HistoricalEarthquake, SeismicRisk};
use super::DatasetError;
use crate::color::parse_hex;

// ---------------------------------------------------------------------------
// Compiled-in sources
// ---------------------------------------------------------------------------

const FAULT_SYSTEMS_JSON: &str = include_str!("../../assets/fault_systems.json");
const EARTHQUAKES_JSON: &str = include_str!("../../assets/historical_earthquakes.json");

const FAULT_TABLE: &str = "fault system";
const EARTHQUAKE_TABLE: &str = "historical earthquake";

/// Columns every fault consumer relies on.
pub const FAULT_COLUMNS: &[&str] = &[
    "location",
    "name",
    "seismic_risk",
    "annual_slip_rate",
    "color",
    "fault_types",
    "tectonic_drivers",
    "examples",
    "last_major_earthquake",
    "description",
];

/// Columns every earthquake consumer relies on.
pub const EARTHQUAKE_COLUMNS: &[&str] = &[
    "year",
    "location",
    "magnitude",
    "lat",
    "lon",
    "deaths",
    "description",
];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Build the dataset from the tables compiled into the binary.
pub fn load_embedded() -> Result<Dataset, DatasetError> {
    load_from_str(FAULT_SYSTEMS_JSON, EARTHQUAKES_JSON)
}

/// Build a dataset from two JSON documents, each a records-oriented array:
///
/// ```json
/// [
///   { "name": "Messina Strait", "location": [38.2, 15.6], ... },
///   ...
/// ]
/// ```
///
/// Records that are not objects, or that fail type/invariant checks, are
/// dropped and summarised in [`Dataset::warnings`]. A table in which no
/// record carries a required column is a fatal [`DatasetError`].
pub fn load_from_str(faults_json: &str, earthquakes_json: &str) -> Result<Dataset, DatasetError> {
    let mut warnings = Vec::new();

    let faults = load_table(
        FAULT_TABLE,
        faults_json,
        FAULT_COLUMNS,
        fault_from_json,
        &mut warnings,
    )?;
    let faults = drop_duplicate_names(faults, &mut warnings);

    let earthquakes = load_table(
        EARTHQUAKE_TABLE,
        earthquakes_json,
        EARTHQUAKE_COLUMNS,
        earthquake_from_json,
        &mut warnings,
    )?;

    log::info!(
        "Loaded {} fault systems and {} historical earthquakes ({} warnings)",
        faults.len(),
        earthquakes.len(),
        warnings.len()
    );

    Ok(Dataset::new(faults, earthquakes, warnings))
}

// ---------------------------------------------------------------------------
// Generic table validation
// ---------------------------------------------------------------------------

fn load_table<T>(
    table: &'static str,
    json: &str,
    required: &[&'static str],
    convert: fn(&JsonValue) -> Result<T>,
    warnings: &mut Vec<String>,
) -> Result<Vec<T>, DatasetError> {
    let root: JsonValue =
        serde_json::from_str(json).map_err(|source| DatasetError::Json { table, source })?;
    let records = root.as_array().ok_or(DatasetError::NotAList { table })?;

    let mut dropped: Vec<String> = Vec::new();
    let mut objects: Vec<(usize, &JsonValue)> = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        if rec.is_object() {
            objects.push((i, rec));
        } else {
            dropped.push(format!("record {i}: not a JSON object"));
        }
    }

    // Columns of the resulting table are the union of keys over its records.
    let columns: BTreeSet<&str> = objects
        .iter()
        .filter_map(|(_, rec)| rec.as_object())
        .flat_map(|obj| obj.keys().map(String::as_str))
        .collect();
    let missing: Vec<&'static str> = required
        .iter()
        .copied()
        .filter(|col| !columns.contains(col))
        .collect();
    if !missing.is_empty() {
        return Err(DatasetError::MissingColumns {
            table,
            columns: missing,
        });
    }

    let mut rows = Vec::with_capacity(objects.len());
    for (i, rec) in objects {
        match convert(rec) {
            Ok(row) => rows.push(row),
            Err(e) => dropped.push(format!("record {i}: {e:#}")),
        }
    }

    if !dropped.is_empty() {
        let msg = format!(
            "Dropped {} of {} {table} records: {}",
            dropped.len(),
            records.len(),
            dropped.join("; ")
        );
        log::warn!("{msg}");
        warnings.push(msg);
    }

    Ok(rows)
}

fn drop_duplicate_names(faults: Vec<FaultSystem>, warnings: &mut Vec<String>) -> Vec<FaultSystem> {
    let mut seen = BTreeSet::new();
    let mut kept = Vec::with_capacity(faults.len());
    for fault in faults {
        if seen.insert(fault.name.clone()) {
            kept.push(fault);
        } else {
            let msg = format!("Dropped duplicate {FAULT_TABLE} '{}'", fault.name);
            log::warn!("{msg}");
            warnings.push(msg);
        }
    }
    kept
}

// ---------------------------------------------------------------------------
// Fault records
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawFault {
    name: String,
    location: Vec<f64>,
    fault_types: String,
    tectonic_drivers: String,
    examples: String,
    last_major_earthquake: String,
    seismic_risk: String,
    description: String,
    annual_slip_rate: f64,
    color: String,
}

impl TryFrom<RawFault> for FaultSystem {
    type Error = anyhow::Error;

    fn try_from(raw: RawFault) -> Result<Self> {
        let &[latitude, longitude] = raw.location.as_slice() else {
            bail!(
                "location must have exactly 2 components, got {}",
                raw.location.len()
            );
        };
        let seismic_risk: SeismicRisk = raw.seismic_risk.parse().map_err(anyhow::Error::msg)?;
        if !raw.annual_slip_rate.is_finite() || raw.annual_slip_rate < 0.0 {
            bail!("annual_slip_rate must be >= 0, got {}", raw.annual_slip_rate);
        }
        if parse_hex(&raw.color).is_none() {
            bail!("color '{}' is not a #RRGGBB hex string", raw.color);
        }

        Ok(FaultSystem {
            name: raw.name,
            latitude,
            longitude,
            fault_types: raw.fault_types,
            tectonic_drivers: raw.tectonic_drivers,
            examples: raw.examples,
            last_major_earthquake: raw.last_major_earthquake,
            description: raw.description,
            seismic_risk,
            annual_slip_rate: raw.annual_slip_rate,
            color: raw.color,
        })
    }
}

fn fault_from_json(rec: &JsonValue) -> Result<FaultSystem> {
    let raw = RawFault::deserialize(rec).context("malformed fault record")?;
    let name = raw.name.clone();
    FaultSystem::try_from(raw).with_context(|| format!("fault '{name}'"))
}

// ---------------------------------------------------------------------------
// Earthquake records
// ---------------------------------------------------------------------------

fn earthquake_from_json(rec: &JsonValue) -> Result<HistoricalEarthquake> {
    let quake = HistoricalEarthquake::deserialize(rec).context("malformed earthquake record")?;
    if !quake.magnitude.is_finite() || quake.magnitude <= 0.0 {
        bail!(
            "earthquake {} {}: magnitude must be > 0, got {}",
            quake.year,
            quake.location,
            quake.magnitude
        );
    }
    if !(-90.0..=90.0).contains(&quake.lat) || !(-180.0..=180.0).contains(&quake.lon) {
        bail!(
            "earthquake {} {}: coordinates ({}, {}) out of range",
            quake.year,
            quake.location,
            quake.lat,
            quake.lon
        );
    }
    Ok(quake)
}
