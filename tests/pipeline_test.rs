use anyhow::Result;
use school_capacities::{CapacityError, Config, Pipeline};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const ORP_CODEBOOK: &str = "KODJAZ,AKRCIS,KODCIS,CHODNOTA,ZKRTEXT,TEXT,KOD_RUIAN\n\
                            CS,ORP,65,3101,Benešov,Benešov,1023\n\
                            CS,ORP,65,3102,Beroun,Beroun,1031\n";

const DISTRICT_CODEBOOK: &str = "CHODNOTA;TEXT;KOD_RUIAN\n1040;Praha 4;43\n";

fn capacity_row(code: &str, name: &str, zapsani: &str) -> String {
    let mut cells: Vec<String> = vec![
        code, name, zapsani, "x", "1 400", "1 380", "35", "14%", "-150", "980", "12 3", "45",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    cells.extend(std::iter::repeat("0".to_string()).take(10));
    cells.extend(["1 100", "42"].map(String::from));
    cells.extend(std::iter::repeat(String::new()).take(11));
    cells.extend(["-12", "8", "", "30%", "-20"].map(String::from));
    assert_eq!(cells.len(), 40);
    cells.join(";")
}

fn write_inputs(data_dir: &Path, capacity_rows: &[String]) -> Result<()> {
    fs::create_dir_all(data_dir)?;

    let (orp_bytes, _, _) = encoding_rs::WINDOWS_1250.encode(ORP_CODEBOOK);
    fs::write(data_dir.join("CIS0065_CS.csv"), orp_bytes)?;

    let mut districts = b"\xEF\xBB\xBF".to_vec();
    districts.extend_from_slice(DISTRICT_CODEBOOK.as_bytes());
    fs::write(data_dir.join("obvody_praha.csv"), districts)?;

    let mut capacities = b"\xEF\xBB\xBF".to_vec();
    capacities.extend_from_slice(capacity_rows.join("\r\n").as_bytes());
    capacities.extend_from_slice(b"\r\n");
    fs::write(data_dir.join("Kapacity_s_tridami.csv"), capacities)?;
    Ok(())
}

fn benesov_expected() -> Value {
    json!({
        "id": 1023,
        "zs_kapacity_duben": 168,
        "ms_kapacity_duben": 1400,
        "ms_kapacity_zari": 1380,
        "ms_previs": -150,
        "ms_uprchliku": 35,
        "ms_zapsani": 1250,
        "ms_zapsani_z_nahlasenych": 14,
        "zs_kapacity_zari": 1100,
        "zs_previs": -20,
        "zs_previs_1_stupen": -12,
        "zs_previs_2_stupen": 8,
        "zs_uprchliku": 42,
        "zs_zapsani": 980,
        "zs_zapsani_z_nahlasenych": 30
    })
}

fn prague_expected() -> Value {
    json!({
        "id": 19,
        "ms_zapsani": 579,
        "ms_kapacity_duben": 0,
        "ms_kapacity_zari": 0,
        "ms_uprchliku": 0,
        "ms_zapsani_z_nahlasenych": 14,
        "ms_previs": -2370,
        "zs_zapsani": 4174,
        "zs_kapacity_duben": 0,
        "zs_kapacity_zari": 0,
        "zs_uprchliku": 0,
        "zs_zapsani_z_nahlasenych": 30,
        "zs_previs_1_stupen": -1440,
        "zs_previs_2_stupen": -1347,
        "zs_previs": -2787
    })
}

fn keys(value: &Value) -> Vec<String> {
    value
        .as_object()
        .map(|o| o.keys().cloned().collect())
        .unwrap_or_default()
}

#[test]
fn test_single_row_produces_record_plus_prague() -> Result<()> {
    let temp_dir = tempdir()?;
    let config = Config::with_base_dir(temp_dir.path());
    write_inputs(&config.data_dir, &[capacity_row("3101", "Benešov", "1 250")])?;

    let summary = Pipeline::run(&config)?;

    assert_eq!(summary.rows_read, 1);
    assert_eq!(summary.records_computed, 1);
    assert_eq!(summary.records_written, 2);
    assert!(summary.output_file.is_absolute());

    let written = fs::read_to_string(&config.output)?;
    assert!(written.starts_with("[\n    {\n        \"id\": 19,\n        \"ms_zapsani\": 579,"));
    assert!(!written.ends_with('\n'));

    let output: Value = serde_json::from_str(&written)?;
    let records = output.as_array().expect("array");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0], prague_expected());
    assert_eq!(records[1], benesov_expected());
    assert_eq!(keys(&records[1]), keys(&benesov_expected()));
    assert_eq!(keys(&records[0]), keys(&prague_expected()));
    Ok(())
}

#[test]
fn test_header_sentinel_and_unmapped_rows_are_dropped() -> Result<()> {
    let temp_dir = tempdir()?;
    let config = Config::with_base_dir(temp_dir.path());
    write_inputs(
        &config.data_dir,
        &[
            "Kód ORP;Název ORP;Zapsaní MŠ".to_string(),
            "0;Hlavní město Praha;souhrn".to_string(),
            capacity_row("1040", "Praha 4", "600"),
            capacity_row("9999", "Neznámé", "nečíslo"),
            capacity_row("3101", "Benešov", "1 250"),
        ],
    )?;

    let summary = Pipeline::run(&config)?;

    assert_eq!(summary.rows_read, 5);
    assert_eq!(summary.rows_unmapped, 2);
    assert_eq!(summary.rows_ignored, 1);
    assert_eq!(summary.corrections_applied, 2);

    let output: Value = serde_json::from_str(&fs::read_to_string(&config.output)?)?;
    let records = output.as_array().expect("array");
    let ids: Vec<i64> = records.iter().filter_map(|r| r["id"].as_i64()).collect();
    assert_eq!(ids, vec![19, 1023, 9943]);

    let praha_4 = &records[2];
    assert_eq!(praha_4["ms_zapsani"], 600);
    assert_eq!(praha_4["ms_kapacity_zari"], 0);
    assert_eq!(praha_4["zs_kapacity_zari"], 0);
    assert_eq!(praha_4["zs_kapacity_duben"], 168);
    Ok(())
}

#[test]
fn test_missing_input_fails_without_output() -> Result<()> {
    let temp_dir = tempdir()?;
    let config = Config::with_base_dir(temp_dir.path());
    write_inputs(&config.data_dir, &[capacity_row("3101", "Benešov", "1 250")])?;
    fs::remove_file(config.district_codebook_path())?;

    let result = Pipeline::run(&config);

    assert!(matches!(result, Err(CapacityError::Read { .. })));
    assert!(!config.output.exists());
    Ok(())
}

#[test]
fn test_malformed_number_fails_without_output() -> Result<()> {
    let temp_dir = tempdir()?;
    let config = Config::with_base_dir(temp_dir.path());
    write_inputs(
        &config.data_dir,
        &[
            capacity_row("3101", "Benešov", "1 250"),
            capacity_row("3102", "Beroun", "1.250"),
        ],
    )?;

    match Pipeline::run(&config) {
        Err(CapacityError::InvalidNumber { field, row, .. }) => {
            assert_eq!(field, "ms_zapsani");
            assert_eq!(row, "3102");
        }
        other => panic!("expected invalid number, got {:?}", other),
    }
    assert!(!config.output.exists());
    Ok(())
}
