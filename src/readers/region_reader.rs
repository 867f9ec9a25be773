use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::models::{BoundingBox, GeographicRegion};
use crate::utils::constants::NO_REGION;

/// Named regions available to product lists.
#[derive(Debug, Clone, Default)]
pub struct RegionCatalog {
    regions: BTreeMap<String, Arc<BoundingBox>>,
}

impl RegionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, region: BoundingBox) {
        self.regions.insert(name.to_string(), Arc::new(region));
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(|k| k.as_str())
    }

    /// Region registered as `name`; `None` for the no-region sentinel
    pub fn lookup(&self, name: &str) -> Result<Option<Arc<dyn GeographicRegion>>> {
        if name == NO_REGION {
            return Ok(None);
        }

        self.regions
            .get(name)
            .map(|region| Some(region.clone() as Arc<dyn GeographicRegion>))
            .ok_or_else(|| ProcessingError::UnknownRegion(name.to_string()))
    }
}

pub struct RegionReader;

impl RegionReader {
    pub fn new() -> Self {
        Self
    }

    /// Read a YAML file mapping region names to bounding boxes
    pub fn read_catalog(&self, path: &Path) -> Result<RegionCatalog> {
        let file = File::open(path)?;
        self.parse_catalog(BufReader::new(file))
    }

    pub fn parse_catalog<R: std::io::Read>(&self, reader: R) -> Result<RegionCatalog> {
        let boxes: BTreeMap<String, BoundingBox> = serde_yaml::from_reader(reader)?;

        let mut catalog = RegionCatalog::new();
        for (name, bbox) in boxes {
            bbox.validate()?;
            if bbox.lat_min > bbox.lat_max {
                return Err(ProcessingError::Config(format!(
                    "Region '{}' has lat_min {} above lat_max {}",
                    name, bbox.lat_min, bbox.lat_max
                )));
            }
            catalog.insert(&name, bbox);
        }

        Ok(catalog)
    }
}

impl Default for RegionReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const AREAS: &str = "
euro4:
  description: Europe
  lon_min: -10.0
  lon_max: 40.0
  lat_min: 35.0
  lat_max: 70.0
pacific:
  lon_min: 170.0
  lon_max: -170.0
  lat_min: -10.0
  lat_max: 10.0
";

    #[test]
    fn test_read_catalog_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        write!(temp_file, "{}", AREAS)?;

        let catalog = RegionReader::new().read_catalog(temp_file.path())?;

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["euro4", "pacific"]);

        let euro4 = catalog.lookup("euro4")?.expect("region");
        assert!(euro4.contains(25.0, 60.0));
        assert!(!euro4.contains(0.0, -60.0));

        Ok(())
    }

    #[test]
    fn test_lookup_sentinel_and_unknown() {
        let catalog = RegionReader::new().parse_catalog(AREAS.as_bytes()).unwrap();

        assert!(catalog.lookup("None").unwrap().is_none());
        assert!(matches!(
            catalog.lookup("nowhere"),
            Err(ProcessingError::UnknownRegion(name)) if name == "nowhere"
        ));
    }

    #[test]
    fn test_invalid_box_rejected() {
        let yaml = "bad:\n  lon_min: 0.0\n  lon_max: 10.0\n  lat_min: 50.0\n  lat_max: 40.0\n";
        assert!(RegionReader::new().parse_catalog(yaml.as_bytes()).is_err());

        let yaml = "bad:\n  lon_min: 0.0\n  lon_max: 200.0\n  lat_min: 0.0\n  lat_max: 40.0\n";
        assert!(matches!(
            RegionReader::new().parse_catalog(yaml.as_bytes()),
            Err(ProcessingError::Validation(_))
        ));
    }
}
