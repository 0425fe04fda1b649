// ==========================================
// 表格导入工具 - 数据库连接配置
// ==========================================
// 来源: 配置文件 "database" 段，缺省时使用内置默认值
// ==========================================

use crate::db::DEFAULT_BUSY_TIMEOUT_MS;
use serde::Deserialize;

/// 默认数据库文件
pub const DEFAULT_DATABASE_PATH: &str = "db.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// SQLite 数据库文件路径
    pub path: String,
    /// busy_timeout（毫秒）
    pub busy_timeout_ms: u64,
    /// 是否开启外键约束
    pub foreign_keys: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_DATABASE_PATH.to_string(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            foreign_keys: true,
        }
    }
}

impl ConnectionConfig {
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}
