pub mod config_reader;
pub mod region_reader;
pub mod scene_reader;

pub use config_reader::{ConfigReader, PostgisConfig, ProductList};
pub use region_reader::{RegionCatalog, RegionReader};
pub use scene_reader::SceneReader;
