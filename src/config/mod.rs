// ==========================================
// 表格导入工具 - 配置层
// ==========================================
// 职责: 连接配置、导入选项、配置文件加载
// 优先级: 命令行 > 配置文件 > 内置默认值
// ==========================================

pub mod config_file;
pub mod connection;
pub mod import_options;

pub use config_file::{load_config_file, ConfigFile};
pub use connection::ConnectionConfig;
pub use import_options::{ImportOptions, ImportProfile, DEFAULT_TABLE};
