// ==========================================
// 表格导入工具 - 应用层
// ==========================================
// 职责: 命令行解析，连接配置与导入层
// ==========================================

pub mod cli;

// 重导出
pub use cli::{run_import, Cli, Command, ImportArgs};
