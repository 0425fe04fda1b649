// ==========================================
// 命令行 import 子命令集成测试
// ==========================================
// 测试目标: 配置文件 + 命令行参数覆盖 → 完整导入
// ==========================================


use clap::Parser;
use sheet_upsert::app::{run_import, Cli, Command};
use sheet_upsert::logging;
use std::fs;
use tempfile::tempdir;
use test_helpers::{create_test_db, fetch_column, fetch_name_age, write_xlsx};

fn import_args(argv: &[&str]) -> sheet_upsert::app::ImportArgs {
    let mut full = vec!["sheet-upsert", "import"];
    full.extend_from_slice(argv);
    let Command::Import(args) = Cli::try_parse_from(full).unwrap().command;
    args
}

#[test]
fn test_import_with_config_file() {
    logging::init_test();

    let (_db, db_path) = create_test_db().unwrap();
    let dir = tempdir().unwrap();
    let file = dir.path().join("users.xlsx");
    write_xlsx(&file, &[&["Nachname", "Age"], &["Meier", "30"]]).unwrap();

    let config_path = dir.path().join("import.json");
    let config = serde_json::json!({
        "database": { "path": db_path },
        "import": {
            "columns": ["Name:Nachname"],
            "unique_fields": ["Name"],
            "defaults": ["lang:en"]
        }
    });
    fs::write(&config_path, config.to_string()).unwrap();

    let args = import_args(&[
        "-d",
        file.to_str().unwrap(),
        "-c",
        config_path.to_str().unwrap(),
    ]);
    let summary = run_import(&args).unwrap();

    assert_eq!(summary.counters.created, 1);
    assert_eq!(
        fetch_name_age(&db_path),
        vec![(Some("Meier".to_string()), Some("30".to_string()))]
    );
    assert_eq!(fetch_column(&db_path, "lang"), vec![Some("en".to_string())]);
}

#[test]
fn test_command_line_replaces_config_lists() {
    logging::init_test();

    let (_db, db_path) = create_test_db().unwrap();
    let dir = tempdir().unwrap();
    let file = dir.path().join("users.xlsx");
    write_xlsx(&file, &[&["Name", "lang"], &["Meier", "de"]]).unwrap();

    let config_path = dir.path().join("import.json");
    let config = serde_json::json!({
        "database": { "path": db_path },
        "import": { "unique_fields": ["email"], "defaults": ["lang:en"] }
    });
    fs::write(&config_path, config.to_string()).unwrap();

    let args = import_args(&[
        "-d",
        file.to_str().unwrap(),
        "-c",
        config_path.to_str().unwrap(),
        "-u",
        "Name",
    ]);
    let summary = run_import(&args).unwrap();

    assert_eq!(summary.counters.created, 1);
    assert_eq!(fetch_column(&db_path, "lang"), vec![Some("de".to_string())]);
}

#[test]
fn test_missing_unique_field_is_rejected() {
    logging::init_test();

    let (_db, db_path) = create_test_db().unwrap();
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("import.json");
    fs::write(
        &config_path,
        serde_json::json!({ "database": { "path": db_path } }).to_string(),
    )
    .unwrap();

    let args = import_args(&[
        "-d",
        dir.path().to_str().unwrap(),
        "-c",
        config_path.to_str().unwrap(),
    ]);

    assert!(run_import(&args).is_err());
}
