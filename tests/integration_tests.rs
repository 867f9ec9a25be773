use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

use points2postgis::models::{Row, Value};
use points2postgis::readers::{ConfigReader, RegionReader, SceneReader};
use points2postgis::writers::MemoryWriter;
use points2postgis::ProcessingError;

const AREAS: &str = "
euro4:
  description: Europe, approximated as a lon/lat box
  lon_min: -30.0
  lon_max: 45.0
  lat_min: 30.0
  lat_max: 75.0
";

const LI_SCENE: &str = r#"{
    "start_time": "2025-01-30T10:50:00",
    "datasets": {
        "latitude": {"dtype": "float32", "values": [60.0, 42.0, -60.0, -42.0]},
        "longitude": {"dtype": "float32", "values": [25.0, 10.0, 0.0, 42.0]},
        "flash_time": {"dtype": "datetime64[ns]", "values": [
            "2025-01-30T10:50:08.405699968", "2025-01-30T10:50:08.489699968",
            "2025-01-30T10:50:08.540699904", "2025-01-30T10:50:08.587699968"]},
        "radiance": {"dtype": "float32", "values": [10.0, 100.0, 1000.0, 2000.0]},
        "flash_footprint": {"dtype": "float32", "values": [2.0, 18.0, 5.0, 19.0]},
        "flash_duration": {"dtype": "timedelta64[ns]",
                           "values": [300000000, 606000000, 228000000, 602000000]}
    }
}"#;

fn li_config(area: &str) -> String {
    format!(
        r#"
product_list:
  areas:
    {area}: {{}}
  postgis:
    host: localhost
    port: 5432
    database_name: lightning
    insert_str: "INSERT INTO li_lfl (time, radiance, footprint, duration, geom) VALUES (%s, %s, %s, %s, ST_SetSRID(ST_MakePoint(%s, %s), 4326))"
    conversions:
      flash_time: [datetime64_to_str]
      radiance: []
      flash_footprint: [to_int16]
      flash_duration: [divide_by_million, to_uint16]
      latitude: []
      longitude: []
"#
    )
}

const HRW_SCENE: &str = r#"{
    "start_time": "2025-06-05T10:00:00",
    "datasets": {
        "latitude": {"dtype": "float32", "values": [60.0, 42.0, -60.0, -42.0]},
        "longitude": {"dtype": "float32", "values": [25.0, 10.0, 0.0, 42.0]},
        "air_pressure": {"dtype": "float32", "values": [980.0, 990.0, 1000.0, 1010.0]},
        "wind_speed": {"dtype": "float32", "values": [5.0, 10.0, 20.0, 30.0]},
        "wind_from_direction": {"dtype": "float32", "values": [15.0, 42.0, 59.0, 238.0]},
        "cloud_type": {"dtype": "uint8", "values": [1, 2, 3, 4]},
        "quality_index_with_forecast": {"dtype": "uint8", "values": [75, 78, 94, 84]}
    }
}"#;

const HRW_CONFIG: &str = r#"
product_list:
  areas:
    None: {}
  postgis:
    host: localhost
    port: 5432
    database_name: hrw
    insert_str: "INSERT INTO hrw VALUES (%s, %s, %s, %s, %s, %s, %s, %s)"
    conversions:
      nominal_time: [datetime_to_str]
      air_pressure: []
      wind_speed: []
      wind_from_direction: []
      cloud_type: []
      quality_index_with_forecast: []
      latitude: []
      longitude: []
"#;

fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("Failed to write fixture");
    path
}

fn li_row(time: &str, radiance: f32, footprint: i16, duration: u16, lat: f32, lon: f32) -> Row {
    Row::new(vec![
        Value::Text(time.to_string()),
        Value::Float32(radiance),
        Value::Int16(footprint),
        Value::UInt16(duration),
        Value::Float32(lat),
        Value::Float32(lon),
    ])
}

fn expected_li_rows() -> Vec<Row> {
    vec![
        li_row("2025-01-30 10:50:08.405700+00:00", 10.0, 2, 300, 60.0, 25.0),
        li_row("2025-01-30 10:50:08.489700+00:00", 100.0, 18, 606, 42.0, 10.0),
        li_row("2025-01-30 10:50:08.540700+00:00", 1000.0, 5, 228, -60.0, 0.0),
        li_row("2025-01-30 10:50:08.587700+00:00", 2000.0, 19, 602, -42.0, 42.0),
    ]
}

async fn run_li(area: &str) -> (points2postgis::processors::StoreSummary, MemoryWriter) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = write_file(&temp_dir, "li.yaml", &li_config(area));
    let areas_path = write_file(&temp_dir, "areas.yaml", AREAS);
    let scene_path = write_file(&temp_dir, "li.json", LI_SCENE);

    let product_list = ConfigReader::new().read_product_list(&config_path).unwrap();
    let catalog = RegionReader::new().read_catalog(&areas_path).unwrap();
    let pipeline = product_list.pipeline(&catalog).unwrap();
    let scene = SceneReader::new().read_scene(&scene_path).unwrap();

    let mut writer = MemoryWriter::new();
    let summary = pipeline.run(&scene, &mut writer).await.unwrap();
    (summary, writer)
}

#[tokio::test]
async fn test_li_without_area_stores_everything() {
    let (summary, writer) = run_li("None").await;

    assert_eq!(summary.stored, 4);
    assert_eq!(summary.received, 4);

    let rows: Vec<Row> = writer
        .executions()
        .iter()
        .map(|e| Row::new(e.values.clone()))
        .collect();
    assert_eq!(rows, expected_li_rows());

    let statement = &writer.executions()[0].statement;
    assert!(statement.contains("VALUES ($1, $2, $3, $4, ST_SetSRID(ST_MakePoint($5, $6), 4326))"));
    assert_eq!(writer.commits(), 1);
}

#[tokio::test]
async fn test_li_with_area_keeps_points_inside_in_order() {
    let (summary, writer) = run_li("euro4").await;

    assert_eq!(summary.to_string(), "Stored 2 of 4 observations.");

    let rows: Vec<Row> = writer
        .executions()
        .iter()
        .map(|e| Row::new(e.values.clone()))
        .collect();
    assert_eq!(rows, expected_li_rows()[..2].to_vec());
}

#[tokio::test]
async fn test_hrw_broadcasts_nominal_time() {
    let product_list = ConfigReader::new()
        .parse_product_list(HRW_CONFIG.as_bytes())
        .unwrap();
    let catalog = RegionReader::new().parse_catalog(AREAS.as_bytes()).unwrap();
    let pipeline = product_list.pipeline(&catalog).unwrap();
    let scene = SceneReader::new().parse_scene(HRW_SCENE.as_bytes()).unwrap();

    let mut writer = MemoryWriter::new();
    let summary = pipeline.run(&scene, &mut writer).await.unwrap();

    assert_eq!(summary.stored, 4);
    assert_eq!(
        writer.executions()[0].values,
        vec![
            Value::Text("2025-06-05 10:00:00".to_string()),
            Value::Float32(980.0),
            Value::Float32(5.0),
            Value::Float32(15.0),
            Value::UInt8(1),
            Value::UInt8(75),
            Value::Float32(60.0),
            Value::Float32(25.0),
        ]
    );
    assert!(writer
        .executions()
        .iter()
        .all(|e| e.values[0] == Value::Text("2025-06-05 10:00:00".to_string())));
    assert_eq!(
        writer.executions()[3].values[1..6].to_vec(),
        vec![
            Value::Float32(1010.0),
            Value::Float32(30.0),
            Value::Float32(238.0),
            Value::UInt8(4),
            Value::UInt8(84),
        ]
    );
}

#[tokio::test]
async fn test_unknown_field_produces_no_rows() {
    let config = HRW_CONFIG
        .replace("      cloud_type: []\n", "      cloud_phase: []\n");
    let mut config_file = NamedTempFile::new().unwrap();
    write!(config_file, "{}", config).unwrap();

    let product_list = ConfigReader::new()
        .read_product_list(config_file.path())
        .unwrap();
    let pipeline = product_list
        .pipeline(&points2postgis::readers::RegionCatalog::new())
        .unwrap();
    let scene = SceneReader::new().parse_scene(HRW_SCENE.as_bytes()).unwrap();

    let mut writer = MemoryWriter::new();
    let err = pipeline.run(&scene, &mut writer).await.unwrap_err();

    assert!(matches!(err, ProcessingError::UnknownField { ref field } if field == "cloud_phase"));
    assert_eq!(err.to_string(), "No dataset cloud_phase");
    assert!(writer.executions().is_empty());
}
