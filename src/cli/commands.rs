use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, Level};

use crate::cli::args::{Cli, Commands};
use crate::error::{ProcessingError, Result};
use crate::processors::{ConversionRegistry, Pipeline, StoreSummary};
use crate::readers::{ConfigReader, RegionCatalog, RegionReader, SceneReader};
use crate::writers::{DatabaseSettings, MemoryWriter, PostgisWriter};

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose);

    match cli.command {
        Commands::Store {
            config,
            scene,
            areas,
            max_workers,
            dry_run,
            strict_lengths,
        } => {
            let product_list = ConfigReader::new().read_product_list(&config)?;
            let catalog = load_catalog(areas.as_deref())?;
            let pipeline = Arc::new(product_list.pipeline(&catalog)?);
            let database = product_list.database();

            println!("Storing {} scene(s) using {}", scene.len(), config.display());
            if dry_run {
                println!("Dry run - rows are printed, not written");
            }

            let permits = Arc::new(Semaphore::new(max_workers.max(1)));
            let mut tasks = JoinSet::new();

            // Each scene gets its own connection
            for path in scene {
                let pipeline = Arc::clone(&pipeline);
                let database = database.clone();
                let permits = Arc::clone(&permits);

                tasks.spawn(async move {
                    let _permit = permits
                        .acquire_owned()
                        .await
                        .map_err(|e| ProcessingError::Config(e.to_string()))?;
                    let reader = SceneReader::with_equal_lengths(strict_lengths);
                    let summary = store_scene(&pipeline, &database, &reader, &path, dry_run).await;
                    Ok::<_, ProcessingError>((path, summary))
                });
            }

            let mut first_error = None;
            let mut totals = StoreSummary {
                stored: 0,
                received: 0,
            };

            while let Some(joined) = tasks.join_next().await {
                let (path, outcome) = joined??;
                match outcome {
                    Ok(summary) => {
                        println!("{}: {}", path.display(), summary);
                        totals.stored += summary.stored;
                        totals.received += summary.received;
                    }
                    Err(e) => {
                        error!("Failed to store {}: {}", path.display(), e);
                        if first_error.is_none() {
                            first_error = Some(e);
                        }
                    }
                }
            }

            if let Some(e) = first_error {
                return Err(e);
            }

            println!("Total: {}", totals);
        }

        Commands::Validate { config, areas } => {
            println!("Validating product list: {}", config.display());

            let product_list = ConfigReader::new().read_product_list(&config)?;
            let catalog = load_catalog(areas.as_deref())?;
            let pipeline = product_list.pipeline(&catalog)?;

            println!("Region: {}", product_list.region_id()?);
            println!(
                "Database: {}:{}/{}",
                product_list.postgis.host,
                product_list.postgis.port,
                product_list.postgis.database_name
            );
            println!("Statement: {}", pipeline.statement());
            println!("Fields:");
            for field in pipeline.fields().iter() {
                if field.conversions.is_empty() {
                    println!("  • {}", field.name);
                } else {
                    println!("  • {} <- {}", field.name, field.conversions.join(" -> "));
                }
            }
            println!("✅ Product list is valid");
        }

        Commands::Conversions => {
            for name in ConversionRegistry::new().names() {
                println!("{}", name);
            }
        }
    }

    Ok(())
}

async fn store_scene(
    pipeline: &Pipeline,
    database: &DatabaseSettings,
    reader: &SceneReader,
    path: &Path,
    dry_run: bool,
) -> Result<StoreSummary> {
    let scene = reader.read_scene(path)?;

    // Rows are built before any connection is opened
    let batch = pipeline.prepare(&scene)?;

    if dry_run {
        let mut writer = MemoryWriter::new();
        let summary = pipeline.flush(batch, &mut writer).await?;
        println!("{}", writer.to_json()?);
        return Ok(summary);
    }

    let mut writer = PostgisWriter::connect(database).await?;
    let stored = pipeline.flush(batch, &mut writer).await;
    let closed = writer.close().await;

    let summary = stored?;
    closed?;
    Ok(summary)
}

fn load_catalog(areas: Option<&Path>) -> Result<RegionCatalog> {
    match areas {
        Some(path) => RegionReader::new().read_catalog(path),
        None => Ok(RegionCatalog::new()),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldSpec;
    use crate::processors::SpatialFilter;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const RAGGED_SCENE: &str = r#"{
        "start_time": "2025-06-05T10:00:00",
        "datasets": {
            "latitude": {"dtype": "float32", "values": [60.0, 42.0]},
            "longitude": {"dtype": "float32", "values": [25.0, 10.0]},
            "wind_speed": {"dtype": "float32", "values": [5.0]}
        }
    }"#;

    fn pipeline() -> Pipeline {
        let fields = FieldSpec::new()
            .with_field("wind_speed", &[])
            .with_field("latitude", &[])
            .with_field("longitude", &[]);
        Pipeline::new(fields, "INSERT INTO hrw VALUES (%s, %s, %s)", SpatialFilter::unrestricted())
            .unwrap()
    }

    fn database() -> DatabaseSettings {
        DatabaseSettings {
            host: "localhost".to_string(),
            port: 5432,
            database_name: "hrw".to_string(),
        }
    }

    #[tokio::test]
    async fn test_strict_lengths_rejects_ragged_scene() -> Result<()> {
        let mut scene_file = NamedTempFile::new()?;
        write!(scene_file, "{}", RAGGED_SCENE)?;

        let lenient = SceneReader::new();
        let summary =
            store_scene(&pipeline(), &database(), &lenient, scene_file.path(), true).await?;
        assert_eq!(summary.stored, 2);

        let strict = SceneReader::with_equal_lengths(true);
        let err = store_scene(&pipeline(), &database(), &strict, scene_file.path(), true)
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessingError::MalformedInput(_)));

        Ok(())
    }
}
