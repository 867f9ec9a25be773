use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::array::Array;

/// Read-only access to the datasets of one satellite scene.
pub trait DataSource {
    /// Per-point dataset called `name`, if the scene has one.
    fn dataset(&self, name: &str) -> Option<&Array>;

    /// Nominal acquisition instant of the scene.
    fn start_time(&self) -> NaiveDateTime;

    fn contains(&self, name: &str) -> bool {
        self.dataset(name).is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub start_time: NaiveDateTime,

    #[serde(default)]
    pub datasets: BTreeMap<String, Array>,
}

impl Scene {
    pub fn new(start_time: NaiveDateTime) -> Self {
        Self {
            start_time,
            datasets: BTreeMap::new(),
        }
    }

    pub fn with_dataset(mut self, name: &str, array: Array) -> Self {
        self.datasets.insert(name.to_string(), array);
        self
    }

    pub fn dataset_names(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(|k| k.as_str())
    }
}

impl DataSource for Scene {
    fn dataset(&self, name: &str) -> Option<&Array> {
        self.datasets.get(name)
    }

    fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }
}
