// ==========================================
// ImportOrchestrator 集成测试
// ==========================================
// 测试目标: 真实 SQLite + 真实 xlsx / csv 文件的完整导入流程
// ==========================================


use sheet_upsert::config::{ImportOptions, ImportProfile};
use sheet_upsert::domain::{FileState, ImportCounters};
use sheet_upsert::importer::{ImportError, ImportOrchestrator, UniversalFileParser};
use sheet_upsert::logging;
use sheet_upsert::repository::{SqliteTableRepository, TableRepository};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use test_helpers::{create_test_db, fetch_column, fetch_name_age, open_repo, strings, write_xlsx};

fn options_from(profile: ImportProfile) -> ImportOptions {
    ImportOptions::from_profile(profile).expect("Failed to parse options")
}

fn orchestrator(
    db_path: &str,
    options: ImportOptions,
) -> ImportOrchestrator<SqliteTableRepository, UniversalFileParser> {
    ImportOrchestrator::new(open_repo(db_path), UniversalFileParser, options)
        .expect("Failed to create orchestrator")
}

fn name_unique() -> ImportProfile {
    ImportProfile {
        unique_fields: strings(&["Name"]),
        ..ImportProfile::default()
    }
}

#[test]
fn test_alice_insert_then_update() {
    logging::init_test();

    let (_db, db_path) = create_test_db().unwrap();
    let dir = tempdir().unwrap();
    let file = dir.path().join("users.xlsx");
    write_xlsx(&file, &[&["Name", "Age"], &["  Alice  ", "30"]]).unwrap();

    let options = options_from(ImportProfile {
        value_mappings: strings(&["Age:30:thirty"]),
        ..name_unique()
    });
    let importer = orchestrator(&db_path, options);

    // 第一次: 插入
    let first = importer.run(&file);
    assert_eq!(first.counters, ImportCounters { created: 1, updated: 0 });
    assert_eq!(
        fetch_name_age(&db_path),
        vec![(Some("Alice".to_string()), Some("thirty".to_string()))]
    );

    // 第二次: 同一文件只产生更新
    let second = importer.run(&file);
    assert_eq!(second.counters, ImportCounters { created: 0, updated: 1 });
    assert_eq!(importer.repository().count_rows("fe_users").unwrap(), 1);
}

#[test]
fn test_row_without_unique_value_is_skipped() {
    logging::init_test();

    let (_db, db_path) = create_test_db().unwrap();
    let dir = tempdir().unwrap();
    let file = dir.path().join("users.xlsx");
    write_xlsx(
        &file,
        &[&["Name", "Age"], &["", "30"], &["   ", "31"], &["Bob", "40"]],
    )
    .unwrap();

    let importer = orchestrator(&db_path, options_from(name_unique()));
    let summary = importer.run(&file);

    assert_eq!(summary.counters, ImportCounters { created: 1, updated: 0 });
    assert_eq!(summary.files[0].skipped_rows, 2);
    assert_eq!(
        fetch_name_age(&db_path),
        vec![(Some("Bob".to_string()), Some("40".to_string()))]
    );
}

#[test]
fn test_unknown_column_fails_before_any_row() {
    logging::init_test();

    let (_db, db_path) = create_test_db().unwrap();
    let dir = tempdir().unwrap();
    let file = dir.path().join("users.xlsx");
    write_xlsx(&file, &[&["Name", "Shoe size"], &["Alice", "42"]]).unwrap();

    let importer = orchestrator(&db_path, options_from(name_unique()));
    let summary = importer.run(&file);

    assert_eq!(summary.files[0].state, FileState::RolledBack);
    assert_eq!(summary.counters, ImportCounters::default());
    assert!(fetch_name_age(&db_path).is_empty());
}

#[test]
fn test_missing_table_fails_closed() {
    logging::init_test();

    let (_db, db_path) = create_test_db().unwrap();
    let dir = tempdir().unwrap();
    let file = dir.path().join("users.xlsx");
    write_xlsx(&file, &[&["Name"], &["Alice"]]).unwrap();

    let options = options_from(ImportProfile {
        table: Some("no_such_table".to_string()),
        ..name_unique()
    });
    let report = orchestrator(&db_path, options).import_file(&file);

    assert_eq!(report.state, FileState::RolledBack);
    assert!(report.error.unwrap().contains("no_such_table"));
}

#[test]
fn test_trimming_can_be_disabled() {
    logging::init_test();

    let (_db, db_path) = create_test_db().unwrap();
    let dir = tempdir().unwrap();
    let file = dir.path().join("users.xlsx");
    write_xlsx(&file, &[&["Name", "email"], &["  Bob  ", " bob@example.org "]]).unwrap();

    let options = options_from(ImportProfile {
        trim: Some(false),
        ..name_unique()
    });
    orchestrator(&db_path, options).run(&file);

    assert_eq!(fetch_column(&db_path, "Name"), vec![Some("  Bob  ".to_string())]);
    assert_eq!(
        fetch_column(&db_path, "email"),
        vec![Some(" bob@example.org ".to_string())]
    );
}

#[test]
fn test_column_mapping_and_defaults() {
    logging::init_test();

    let (_db, db_path) = create_test_db().unwrap();
    let dir = tempdir().unwrap();
    let file = dir.path().join("users.xlsx");
    write_xlsx(
        &file,
        &[&["Nachname", "Sprache"], &["Meier", "de"], &["Huber", ""]],
    )
    .unwrap();

    let options = options_from(ImportProfile {
        columns: strings(&["Name:Nachname", "lang:Sprache"]),
        defaults: strings(&["lang:en", "crdate:{today}"]),
        ..name_unique()
    });
    orchestrator(&db_path, options).run(&file);

    // 列分配覆盖默认值（即使单元格为空）
    assert_eq!(
        fetch_column(&db_path, "lang"),
        vec![Some("de".to_string()), Some(String::new())]
    );

    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    let crdates = fetch_column(&db_path, "crdate");
    assert_eq!(crdates.len(), 2);
    assert!(crdates.iter().all(|d| d.as_deref() == Some(today.as_str())));
}

#[test]
fn test_directory_with_failing_file() {
    logging::init_test();

    let (_db, db_path) = create_test_db().unwrap();
    let data_dir = tempdir().unwrap();
    let routing_dir = tempdir().unwrap();
    let success_dir = routing_dir.path().join("success");
    let error_dir = routing_dir.path().join("error");

    write_xlsx(
        &data_dir.path().join("good.xlsx"),
        &[&["Name", "Age"], &["Alice", "30"], &["Bob", "40"]],
    )
    .unwrap();
    write_xlsx(
        &data_dir.path().join("bad.xlsx"),
        &[&["Name", "Age"], &["Carol", "50"], &["Dave", "invalid"]],
    )
    .unwrap();
    // 非 xlsx 文件不参与目录导入
    fs::write(data_dir.path().join("notes.csv"), "Name\nEve\n").unwrap();

    let options = ImportOptions {
        success_directory: Some(success_dir.clone()),
        error_directory: Some(error_dir.clone()),
        ..options_from(name_unique())
    };
    let summary = orchestrator(&db_path, options).run(data_dir.path());

    assert_eq!(summary.files.len(), 2);
    assert_eq!(summary.committed_files(), 1);
    assert_eq!(summary.failed_files(), 1);
    assert_eq!(summary.counters, ImportCounters { created: 2, updated: 0 });

    // 失败文件中的已处理行全部回滚
    assert_eq!(
        fetch_column(&db_path, "Name"),
        vec![Some("Alice".to_string()), Some("Bob".to_string())]
    );

    assert!(success_dir.join("good.xlsx").exists());
    assert!(error_dir.join("bad.xlsx").exists());
    assert!(!data_dir.path().join("good.xlsx").exists());
    assert!(!data_dir.path().join("bad.xlsx").exists());
    assert!(data_dir.path().join("notes.csv").exists());
}

#[test]
fn test_csv_file_import() {
    logging::init_test();

    let (_db, db_path) = create_test_db().unwrap();
    let dir = tempdir().unwrap();
    let file = dir.path().join("users.csv");
    fs::write(&file, "Name,Age,email\nAlice,30,a@example.org\n,,\nBob,41\n").unwrap();

    let summary = orchestrator(&db_path, options_from(name_unique())).run(&file);

    assert_eq!(summary.counters.created, 2);
    assert_eq!(
        fetch_column(&db_path, "email"),
        vec![Some("a@example.org".to_string()), None]
    );
}

#[test]
fn test_missing_data_path_still_summarises() {
    let (_db, db_path) = create_test_db().unwrap();

    let summary = orchestrator(&db_path, options_from(name_unique()))
        .run(Path::new("/nonexistent/users.xlsx"));

    assert_eq!(summary.counters, ImportCounters::default());
    assert_eq!(summary.files.len(), 1);
    assert_eq!(summary.files[0].state, FileState::Unreadable);
    assert!(summary.files[0]
        .error
        .as_deref()
        .is_some_and(|e| e.contains("/nonexistent/users.xlsx")));
}

#[test]
fn test_blank_unique_field_is_rejected_before_import() {
    let (_db, db_path) = create_test_db().unwrap();

    let options = options_from(ImportProfile {
        unique_fields: strings(&["Name", ""]),
        ..ImportProfile::default()
    });
    let result = ImportOrchestrator::new(open_repo(&db_path), UniversalFileParser, options);

    assert!(matches!(result, Err(ImportError::ConfigValueError { .. })));
}

#[test]
fn test_excel_dates_are_imported_as_dates() {
    logging::init_test();

    let (_db, db_path) = create_test_db().unwrap();
    let dir = tempdir().unwrap();
    let file = dir.path().join("users.xlsx");

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(0, 0, "Name").unwrap();
    worksheet.write_string(0, 1, "crdate").unwrap();
    worksheet.write_string(1, 0, "Alice").unwrap();
    worksheet
        .write_datetime_with_format(
            1,
            1,
            &ExcelDateTime::from_ymd(2024, 1, 15).unwrap(),
            &Format::new().set_num_format("yyyy-mm-dd"),
        )
        .unwrap();
    workbook.save(&file).unwrap();

    orchestrator(&db_path, options_from(name_unique())).run(&file);

    assert_eq!(
        fetch_column(&db_path, "crdate"),
        vec![Some("2024-01-15".to_string())]
    );
}
