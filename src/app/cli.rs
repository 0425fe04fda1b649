// ==========================================
// 表格导入工具 - 命令行
// ==========================================
// 子命令: import
// 配置文件提供默认值，命令行参数覆盖
// ==========================================

use crate::config::{load_config_file, ConfigFile, ImportOptions, ImportProfile};
use crate::domain::RunSummary;
use crate::importer::{ImportOrchestrator, UniversalFileParser};
use crate::repository::SqliteTableRepository;
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "sheet-upsert")]
#[command(version)]
#[command(about = "Import spreadsheet rows into a database table, inserting or updating by unique fields")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Print row-level diagnostics (skipped rows, imported values)
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Import a spreadsheet file or every *.xlsx file of a directory
    Import(ImportArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct ImportArgs {
    /// Spreadsheet file, or directory whose *.xlsx files are imported
    #[arg(long, short = 'd')]
    pub data_file: PathBuf,

    /// JSON configuration file (database connection and import profile)
    #[arg(long, short = 'c')]
    pub config_file: Option<PathBuf>,

    /// Column mapping "db_column:source_column"
    #[arg(long = "column")]
    pub columns: Vec<String>,

    /// Target table [default: fe_users]
    #[arg(long, short = 't')]
    pub table: Option<String>,

    /// Value mapping "field:source_value:target_value"
    #[arg(long = "map", short = 'm')]
    pub value_mappings: Vec<String>,

    /// Field identifying an existing record; also required on every row
    #[arg(long = "unique-field", short = 'u')]
    pub unique_fields: Vec<String>,

    /// Default value "field:value"; {now}, {today} and {timestamp} are evaluated per row
    #[arg(long = "default")]
    pub defaults: Vec<String>,

    /// Move successfully imported files here
    #[arg(long)]
    pub success_directory: Option<PathBuf>,

    /// Move files that failed to import here
    #[arg(long)]
    pub error_directory: Option<PathBuf>,

    /// Keep leading and trailing whitespace of values
    #[arg(long)]
    pub no_trim: bool,
}

impl ImportArgs {
    /// 命令行参数 → 导入配置（未给出的项为空，以便配置文件生效）
    pub fn to_profile(&self) -> ImportProfile {
        ImportProfile {
            table: self.table.clone(),
            columns: self.columns.clone(),
            value_mappings: self.value_mappings.clone(),
            unique_fields: self.unique_fields.clone(),
            defaults: self.defaults.clone(),
            trim: self.no_trim.then_some(false),
            success_directory: self.success_directory.clone(),
            error_directory: self.error_directory.clone(),
        }
    }
}

/// 执行 import 子命令
pub fn run_import(args: &ImportArgs) -> anyhow::Result<RunSummary> {
    let config = match &args.config_file {
        Some(path) => load_config_file(path)?,
        None => ConfigFile::default(),
    };

    let profile = config.import.overlay(args.to_profile());
    let options = ImportOptions::from_profile(profile)?;
    info!(table = %options.table, database = %config.database.path, "导入选项已解析");

    let repo = SqliteTableRepository::new(&config.database)
        .with_context(|| format!("无法打开数据库: {}", config.database.path))?;
    let orchestrator = ImportOrchestrator::new(repo, UniversalFileParser, options)?;

    Ok(orchestrator.run(&args.data_file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_import_arguments() {
        let cli = Cli::try_parse_from([
            "sheet-upsert",
            "import",
            "-d",
            "users.xlsx",
            "--column",
            "last_name:Name",
            "--column",
            "first_name:Vorname",
            "-u",
            "last_name",
            "-m",
            "gender:Herr:1",
            "--default",
            "crdate:{now}",
            "--no-trim",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        let Command::Import(args) = cli.command;
        assert_eq!(args.data_file, PathBuf::from("users.xlsx"));
        assert_eq!(args.columns, vec!["last_name:Name", "first_name:Vorname"]);

        let profile = args.to_profile();
        assert_eq!(profile.unique_fields, vec!["last_name"]);
        assert_eq!(profile.value_mappings, vec!["gender:Herr:1"]);
        assert_eq!(profile.trim, Some(false));
        assert_eq!(profile.table, None);
    }

    #[test]
    fn test_trim_left_to_config_when_flag_absent() {
        let cli = Cli::try_parse_from(["sheet-upsert", "import", "-d", "dir", "-t", "members"])
            .unwrap();
        let Command::Import(args) = cli.command;

        let profile = args.to_profile();
        assert_eq!(profile.trim, None);
        assert_eq!(profile.table.as_deref(), Some("members"));
    }

    #[test]
    fn test_data_file_is_required() {
        assert!(Cli::try_parse_from(["sheet-upsert", "import"]).is_err());
    }
}
