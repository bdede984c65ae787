//! Telemetry dataset - semicolon CSV loader
//!
//! Reads the device CSV once, assigns each device a color and normalizes
//! timestamps. The resulting [`Dataset`] is never mutated afterwards.

use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, StringRecord, Trim};
use rand::Rng;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::color;
use crate::timestamp::{self, TimestampError};

pub const COL_DEVICE: &str = "mac_adress";
pub const COL_TIMESTAMP: &str = "timestamp";
pub const COL_ALTITUDE: &str = "Altitude";
pub const COL_CPU_TEMP: &str = "CPU_Temperature";
pub const COL_LATITUDE: &str = "Latitude";
pub const COL_LONGITUDE: &str = "Longitude";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: column '{column}' has non-numeric value '{value}'")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("row {row}: bad timestamp: {source}")]
    InvalidTimestamp {
        row: usize,
        source: TimestampError,
    },
}

/// One telemetry sample
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub cpu_temperature: f64,
    pub color: String,
}

/// Immutable collection of records plus the device → color table
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
    colors: BTreeMap<String, String>,
}

/// Column positions resolved from the header row
struct Columns {
    device: usize,
    timestamp: usize,
    altitude: usize,
    cpu_temp: usize,
    latitude: usize,
    longitude: usize,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self, LoadError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or(LoadError::MissingColumn(name))
        };
        Ok(Columns {
            device: find(COL_DEVICE)?,
            timestamp: find(COL_TIMESTAMP)?,
            altitude: find(COL_ALTITUDE)?,
            cpu_temp: find(COL_CPU_TEMP)?,
            latitude: find(COL_LATITUDE)?,
            longitude: find(COL_LONGITUDE)?,
        })
    }
}

/// A parsed row before colors are assigned
struct RawRecord {
    device_id: String,
    timestamp: DateTime<Utc>,
    latitude: f64,
    longitude: f64,
    altitude: f64,
    cpu_temperature: f64,
}

impl Dataset {
    /// Load and colorize the CSV at `path`
    pub fn load<P: AsRef<Path>, R: Rng + ?Sized>(
        path: P,
        rng: &mut R,
    ) -> Result<Self, LoadError> {
        let path = path.as_ref();
        tracing::debug!("Loading telemetry from {:?}", path);
        let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_reader(file, rng)?;
        tracing::info!(
            "Loaded {} records for {} devices from {:?}",
            dataset.len(),
            dataset.device_count(),
            path
        );
        Ok(dataset)
    }

    /// Parse semicolon-delimited telemetry from any reader
    pub fn from_reader<T: std::io::Read, R: Rng + ?Sized>(
        input: T,
        rng: &mut R,
    ) -> Result<Self, LoadError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(input);

        let columns = Columns::resolve(reader.headers()?)?;

        let mut raw = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let row = idx + 1;
            let record = result?;
            raw.push(parse_row(&record, &columns, row)?);
        }

        Ok(Self::from_raw(raw, rng))
    }

    fn from_raw<R: Rng + ?Sized>(raw: Vec<RawRecord>, rng: &mut R) -> Self {
        let mut colors = BTreeMap::new();

        let records = raw
            .into_iter()
            .map(|r| {
                let color = color::color_for(&mut colors, &r.device_id, rng).to_string();
                Record {
                    device_id: r.device_id,
                    timestamp: r.timestamp,
                    latitude: r.latitude,
                    longitude: r.longitude,
                    altitude: r.altitude,
                    cpu_temperature: r.cpu_temperature,
                    color,
                }
            })
            .collect();

        Dataset { records, colors }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct device ids, sorted ascending
    pub fn device_ids(&self) -> Vec<String> {
        self.colors.keys().cloned().collect()
    }

    pub fn device_count(&self) -> usize {
        self.colors.len()
    }

    pub fn contains_device(&self, id: &str) -> bool {
        self.colors.contains_key(id)
    }

    /// Color assigned to a device at load time
    pub fn color_of(&self, id: &str) -> Option<&str> {
        self.colors.get(id).map(String::as_str)
    }

    /// Samples recorded per device, counted in one pass
    pub fn sample_counts(&self) -> BTreeMap<&str, usize> {
        self.records.iter().fold(BTreeMap::new(), |mut counts, r| {
            *counts.entry(r.device_id.as_str()).or_insert(0) += 1;
            counts
        })
    }
}

fn parse_row(
    record: &StringRecord,
    columns: &Columns,
    row: usize,
) -> Result<RawRecord, LoadError> {
    let field = |idx: usize| record.get(idx).unwrap_or("");
    let number = |idx: usize, column: &'static str| -> Result<f64, LoadError> {
        let value = field(idx);
        value.parse::<f64>().map_err(|_| LoadError::InvalidNumber {
            row,
            column,
            value: value.to_string(),
        })
    };

    let timestamp = timestamp::parse_epoch(field(columns.timestamp))
        .map_err(|source| LoadError::InvalidTimestamp { row, source })?;

    Ok(RawRecord {
        device_id: field(columns.device).to_string(),
        timestamp,
        latitude: number(columns.latitude, COL_LATITUDE)?,
        longitude: number(columns.longitude, COL_LONGITUDE)?,
        altitude: number(columns.altitude, COL_ALTITUDE)?,
        cpu_temperature: number(columns.cpu_temp, COL_CPU_TEMP)?,
    })
}
