//! Product list configuration.
//!
//! ```yaml
//! product_list:
//!   areas:
//!     euro4: {}
//!   postgis:
//!     host: localhost
//!     port: 5432
//!     database_name: lightning
//!     insert_str: "INSERT INTO flashes (time, geom) VALUES (%s, ST_MakePoint(%s, %s))"
//!     conversions:
//!       flash_time: [datetime64_to_str]
//!       longitude: []
//!       latitude: []
//! ```
//!
//! The first key under `areas` names the region; `None` disables filtering.

use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::models::FieldSpec;
use crate::processors::{Pipeline, SpatialFilter};
use crate::readers::region_reader::RegionCatalog;
use crate::utils::constants::NO_REGION;
use crate::writers::DatabaseSettings;

#[derive(Debug, Clone, Deserialize)]
struct ProductListFile {
    product_list: ProductList,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductList {
    #[serde(default)]
    pub areas: serde_yaml::Mapping,
    pub postgis: PostgisConfig,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PostgisConfig {
    #[validate(length(min = 1))]
    pub host: String,

    #[validate(range(min = 1))]
    pub port: u16,

    #[validate(length(min = 1))]
    pub database_name: String,

    #[validate(length(min = 1))]
    pub insert_str: String,

    pub conversions: FieldSpec,
}

impl ProductList {
    /// Region named by the first `areas` key
    pub fn region_id(&self) -> Result<&str> {
        let (key, _) = self.areas.iter().next().ok_or_else(|| {
            ProcessingError::Config(format!(
                "product_list.areas must name a region or '{}'",
                NO_REGION
            ))
        })?;

        match key {
            serde_yaml::Value::String(name) => Ok(name.as_str()),
            serde_yaml::Value::Null => Ok(NO_REGION),
            other => Err(ProcessingError::Config(format!(
                "Region name must be a string, got {:?}",
                other
            ))),
        }
    }

    pub fn database(&self) -> DatabaseSettings {
        DatabaseSettings {
            host: self.postgis.host.clone(),
            port: self.postgis.port,
            database_name: self.postgis.database_name.clone(),
        }
    }

    /// Resolve the region and build the pipeline for this product list
    pub fn pipeline(&self, catalog: &RegionCatalog) -> Result<Pipeline> {
        let region = catalog.lookup(self.region_id()?)?;
        Pipeline::new(
            self.postgis.conversions.clone(),
            &self.postgis.insert_str,
            SpatialFilter::new(region),
        )
    }
}

pub struct ConfigReader;

impl ConfigReader {
    pub fn new() -> Self {
        Self
    }

    /// Read and validate a product list YAML file
    pub fn read_product_list(&self, path: &Path) -> Result<ProductList> {
        let file = File::open(path)?;
        self.parse_product_list(BufReader::new(file))
    }

    pub fn parse_product_list<R: std::io::Read>(&self, reader: R) -> Result<ProductList> {
        let file: ProductListFile = serde_yaml::from_reader(reader)?;
        let product_list = file.product_list;

        product_list.postgis.validate()?;
        if product_list.postgis.conversions.is_empty() {
            return Err(ProcessingError::Config(
                "product_list.postgis.conversions must list at least one field".to_string(),
            ));
        }

        Ok(product_list)
    }
}

impl Default for ConfigReader {
    fn default() -> Self {
        Self::new()
    }
}
