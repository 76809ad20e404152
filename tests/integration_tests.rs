use agri_etl::{BatchLoader, EtlError, PipelineConfig};
use pretty_assertions::assert_eq;
use rusqlite::types::Value as SqlValue;
use rusqlite::Connection;
use std::path::Path;
use tempfile::TempDir;

const CROP_CSV: &str = "State Name,District Name,Crop Year,Season,Crop,Area,Production\n\
Maharashtra,Pune,2001,Kharif     ,  Wheat ,1254,2000\n\
Maharashtra,Nashik,2001,Rabi,Rice,,1520.5\n\
Maharashtra, ,2002,Whole Year,Jowar,310,\n";

const NORMAL_CSV: &str = "SUBDIVISION,JAN,FEB,ANNUAL\n\
Konkan & Goa,0.9,0.4,3005.6\n\
Vidarbha,,5.1,1100.2\n";

const MONTHLY_CSV: &str = "Subdivision,Year,Jan,Feb\n\
Konkan & Goa,2010,0.0,1.2\n\
Vidarbha,2010,NA,3.4\n\
Marathwada,2011,2.2,\n\
Madhya Maharashtra,2011,1.0,0.5\n";

fn write_inputs(root: &Path) {
    let raw = root.join("data").join("csv data").join("raw");
    std::fs::create_dir_all(&raw).unwrap();
    std::fs::write(raw.join("area_production_yield_data.csv"), CROP_CSV).unwrap();
    std::fs::write(raw.join("normal_rainfall_data.csv"), NORMAL_CSV).unwrap();
    std::fs::write(raw.join("monthly_rainfall_data.csv"), MONTHLY_CSV).unwrap();
}

fn dump_table(conn: &Connection, table: &str) -> Vec<Vec<SqlValue>> {
    let mut stmt = conn
        .prepare(&format!("SELECT * FROM \"{}\" ORDER BY rowid", table))
        .unwrap();
    let width = stmt.column_count();
    stmt.query_map([], |row| {
        (0..width)
            .map(|i| row.get::<_, SqlValue>(i))
            .collect::<rusqlite::Result<Vec<_>>>()
    })
    .unwrap()
    .collect::<rusqlite::Result<Vec<_>>>()
    .unwrap()
}

fn table_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<rusqlite::Result<Vec<String>>>()
        .unwrap()
}

#[test]
fn test_full_run_creates_three_tables() {
    let dir = TempDir::new().unwrap();
    write_inputs(dir.path());
    let config = PipelineConfig::rooted_at(dir.path());
    let db_path = config.database_path.clone();

    let summary = BatchLoader::new(config).run().unwrap();
    assert_eq!(summary.total_rows(), 3 + 2 + 4);

    let conn = Connection::open(&db_path).unwrap();
    assert_eq!(
        table_names(&conn),
        vec!["crop_production", "monthly_rainfall", "normal_rainfall"]
    );
    assert_eq!(dump_table(&conn, "crop_production").len(), 3);
    assert_eq!(dump_table(&conn, "normal_rainfall").len(), 2);
    assert_eq!(dump_table(&conn, "monthly_rainfall").len(), 4);
}

#[test]
fn test_column_names_are_normalized() {
    let dir = TempDir::new().unwrap();
    write_inputs(dir.path());
    let config = PipelineConfig::rooted_at(dir.path());
    let db_path = config.database_path.clone();
    BatchLoader::new(config).run().unwrap();

    let conn = Connection::open(&db_path).unwrap();
    let stmt = conn.prepare("SELECT * FROM crop_production").unwrap();
    let names: Vec<&str> = stmt.column_names();
    assert_eq!(
        names,
        vec![
            "state_name",
            "district_name",
            "crop_year",
            "season",
            "crop",
            "area",
            "production"
        ]
    );
}

#[test]
fn test_missing_values_filled() {
    let dir = TempDir::new().unwrap();
    write_inputs(dir.path());
    let config = PipelineConfig::rooted_at(dir.path());
    let db_path = config.database_path.clone();
    BatchLoader::new(config).run().unwrap();

    let conn = Connection::open(&db_path).unwrap();
    let rows = dump_table(&conn, "crop_production");

    assert_eq!(
        rows[0],
        vec![
            SqlValue::Text("Maharashtra".into()),
            SqlValue::Text("Pune".into()),
            SqlValue::Integer(2001),
            SqlValue::Text("Kharif".into()),
            SqlValue::Text("Wheat".into()),
            SqlValue::Integer(1254),
            SqlValue::Real(2000.0),
        ]
    );
    // Missing area and missing district
    assert_eq!(rows[1][5], SqlValue::Integer(0));
    assert_eq!(rows[2][1], SqlValue::Text("Unknown".into()));
    assert_eq!(rows[2][6], SqlValue::Real(0.0));

    let monthly = dump_table(&conn, "monthly_rainfall");
    assert_eq!(monthly[1][2], SqlValue::Real(0.0));
    assert_eq!(monthly[2][3], SqlValue::Real(0.0));
}

#[test]
fn test_no_text_value_has_surrounding_whitespace_or_null() {
    let dir = TempDir::new().unwrap();
    write_inputs(dir.path());
    let config = PipelineConfig::rooted_at(dir.path());
    let db_path = config.database_path.clone();
    BatchLoader::new(config).run().unwrap();

    let conn = Connection::open(&db_path).unwrap();
    for table in ["crop_production", "normal_rainfall", "monthly_rainfall"] {
        for row in dump_table(&conn, table) {
            for value in row {
                match value {
                    SqlValue::Null => panic!("NULL stored in {}", table),
                    SqlValue::Text(s) => {
                        assert_eq!(s.trim(), s, "untrimmed value in {}", table);
                        assert!(!s.is_empty(), "empty text in {}", table);
                    }
                    _ => {}
                }
            }
        }
    }
}

#[test]
fn test_running_twice_gives_same_contents() {
    let dir = TempDir::new().unwrap();
    write_inputs(dir.path());
    let config = PipelineConfig::rooted_at(dir.path());
    let db_path = config.database_path.clone();

    BatchLoader::new(config.clone()).run().unwrap();
    let first: Vec<_> = {
        let conn = Connection::open(&db_path).unwrap();
        ["crop_production", "normal_rainfall", "monthly_rainfall"]
            .iter()
            .map(|t| dump_table(&conn, t))
            .collect()
    };

    BatchLoader::new(config).run().unwrap();
    let conn = Connection::open(&db_path).unwrap();
    let second: Vec<_> = ["crop_production", "normal_rainfall", "monthly_rainfall"]
        .iter()
        .map(|t| dump_table(&conn, t))
        .collect();

    assert_eq!(first, second);
}

#[test]
fn test_existing_table_is_replaced() {
    let dir = TempDir::new().unwrap();
    write_inputs(dir.path());
    let config = PipelineConfig::rooted_at(dir.path());
    let db_path = config.database_path.clone();

    {
        std::fs::create_dir_all(db_path.parent().unwrap()).unwrap();
        let conn = Connection::open(&db_path).unwrap();
        conn.execute_batch(
            "CREATE TABLE normal_rainfall (legacy TEXT);
             INSERT INTO normal_rainfall VALUES ('a'), ('b'), ('c'), ('d'), ('e');",
        )
        .unwrap();
    }

    BatchLoader::new(config).run().unwrap();

    let conn = Connection::open(&db_path).unwrap();
    assert_eq!(dump_table(&conn, "normal_rainfall").len(), 2);
    let stmt = conn.prepare("SELECT * FROM normal_rainfall").unwrap();
    assert_eq!(stmt.column_names(), vec!["subdivision", "jan", "feb", "annual"]);
}

#[test]
fn test_missing_input_aborts_before_store_is_created() {
    let dir = TempDir::new().unwrap();
    write_inputs(dir.path());
    std::fs::remove_file(
        dir.path()
            .join("data")
            .join("csv data")
            .join("raw")
            .join("monthly_rainfall_data.csv"),
    )
    .unwrap();
    let config = PipelineConfig::rooted_at(dir.path());
    let db_path = config.database_path.clone();

    let result = BatchLoader::new(config).run();

    match result {
        Err(EtlError::MissingInput { dataset, path }) => {
            assert_eq!(dataset, "monthly rainfall");
            assert!(path.ends_with("monthly_rainfall_data.csv"));
        }
        other => panic!("expected MissingInput, got {:?}", other.map(|s| s.tables)),
    }
    assert!(!db_path.exists());
}

#[test]
fn test_missing_input_keeps_previous_database() {
    let dir = TempDir::new().unwrap();
    write_inputs(dir.path());
    let config = PipelineConfig::rooted_at(dir.path());
    let db_path = config.database_path.clone();
    BatchLoader::new(config.clone()).run().unwrap();

    std::fs::remove_file(
        dir.path()
            .join("data")
            .join("csv data")
            .join("raw")
            .join("area_production_yield_data.csv"),
    )
    .unwrap();
    assert!(BatchLoader::new(config).run().is_err());

    let conn = Connection::open(&db_path).unwrap();
    assert_eq!(dump_table(&conn, "crop_production").len(), 3);
}

#[test]
fn test_store_failure_is_reported_as_job_abort() {
    let dir = TempDir::new().unwrap();
    write_inputs(dir.path());
    // A directory where the database file should be cannot be opened
    let db_path = dir.path().join("data").join("agriculture.db");
    std::fs::create_dir_all(&db_path).unwrap();

    let config = PipelineConfig::rooted_at(dir.path());
    let err = BatchLoader::new(config).run().unwrap_err();

    assert!(err.is_job_abort(), "unexpected error: {}", err);
}
