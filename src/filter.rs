//! Device filter - the set of device ids currently shown on the map

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::dataset::Dataset;

/// Selected device ids. Replaced wholesale on every checklist change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSelection(BTreeSet<String>);

impl FilterSelection {
    /// Initial state: every device in the dataset
    pub fn all(dataset: &Dataset) -> Self {
        Self(dataset.device_ids().into_iter().collect())
    }

    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(ids.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Ids not present in the dataset. They simply match nothing.
    pub fn unknown_ids<'a>(&'a self, dataset: &'a Dataset) -> Vec<&'a str> {
        self.iter().filter(|id| !dataset.contains_device(id)).collect()
    }
}
