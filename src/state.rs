//! Application State - read-only context shared by every request

use std::sync::Arc;

use crate::config::MapConfig;
use crate::dataset::Dataset;
use crate::filter::FilterSelection;
use crate::render::{self, Figure};

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub map: Arc<MapConfig>,
    pub token: Option<Arc<str>>,
}

/// Checklist entry for one device
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DeviceEntry {
    pub id: String,
    pub color: String,
    pub count: usize,
}

impl AppState {
    pub fn new(dataset: Dataset, map: MapConfig, token: Option<String>) -> Self {
        Self {
            dataset: Arc::new(dataset),
            map: Arc::new(map),
            token: token.map(Arc::from),
        }
    }

    /// Render the figure for a selection against the loaded dataset
    pub fn render(&self, selection: &FilterSelection) -> Figure {
        if selection.is_empty() {
            tracing::debug!("Empty selection, rendering empty map");
        }
        let unknown = selection.unknown_ids(&self.dataset);
        if !unknown.is_empty() {
            tracing::debug!("Ignoring unknown device ids: {:?}", unknown);
        }
        render::render_figure(&self.dataset, selection, &self.map, self.token.as_deref())
    }

    /// Devices for the checklist, sorted by id
    pub fn devices(&self) -> Vec<DeviceEntry> {
        let counts = self.dataset.sample_counts();
        self.dataset
            .device_ids()
            .into_iter()
            .map(|id| DeviceEntry {
                color: self.dataset.color_of(&id).unwrap_or_default().to_string(),
                count: counts.get(id.as_str()).copied().unwrap_or(0),
                id,
            })
            .collect()
    }
}
