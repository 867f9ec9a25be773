use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::models::Scene;

pub struct SceneReader {
    require_equal_lengths: bool,
}

impl SceneReader {
    pub fn new() -> Self {
        Self {
            require_equal_lengths: false,
        }
    }

    /// Reject scenes whose datasets do not all have the same length.
    pub fn with_equal_lengths(require_equal_lengths: bool) -> Self {
        Self {
            require_equal_lengths,
        }
    }

    /// Read a scene from a JSON file
    pub fn read_scene(&self, path: &Path) -> Result<Scene> {
        let file = File::open(path)?;
        let scene = self.parse_scene(BufReader::new(file))?;
        debug!(
            "Read scene {} with {} datasets from {}",
            scene.start_time,
            scene.datasets.len(),
            path.display()
        );
        Ok(scene)
    }

    pub fn parse_scene<R: std::io::Read>(&self, reader: R) -> Result<Scene> {
        let scene: Scene = serde_json::from_reader(reader)?;

        if self.require_equal_lengths {
            let mut lengths = scene.datasets.iter().map(|(name, array)| (name, array.len()));
            if let Some((first_name, first_len)) = lengths.next() {
                if let Some((name, len)) = lengths.find(|(_, len)| *len != first_len) {
                    return Err(ProcessingError::MalformedInput(format!(
                        "Dataset '{}' has {} values but '{}' has {}",
                        name, len, first_name, first_len
                    )));
                }
            }
        }

        Ok(scene)
    }
}

impl Default for SceneReader {
    fn default() -> Self {
        Self::new()
    }
}
