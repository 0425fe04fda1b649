// ==========================================
// 表格导入工具 - 核心库
// ==========================================
// 功能: 将表格文件逐行写入数据库表（按唯一字段插入或更新）
// 技术栈: Rust + SQLite + calamine
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 导入数据结构
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 表格读取与落库
pub mod importer;

// 配置层 - 连接与导入选项
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 应用层 - 命令行
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

pub use config::{ConnectionConfig, ImportOptions};
pub use domain::{ImportCounters, RunSummary};
pub use importer::{ImportError, ImportOrchestrator, ImportResult, UniversalFileParser};
pub use repository::{SqliteTableRepository, TableRepository};

// ==========================================
// 常量定义
// ==========================================

// 版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
