// ==========================================
// 表格导入工具 - 命令行主入口
// ==========================================

use clap::Parser;
use sheet_upsert::app::{run_import, Cli, Command};
use sheet_upsert::logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日志系统
    logging::init(cli.verbose);
    tracing::debug!(version = sheet_upsert::VERSION, "sheet-upsert 启动");

    match cli.command {
        Command::Import(args) => {
            let summary = run_import(&args)?;

            println!("Items updated: {}", summary.counters.updated);
            println!("Items created: {}", summary.counters.created);
        }
    }

    Ok(())
}
