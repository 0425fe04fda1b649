// ==========================================
// 表格导入工具 - 配置文件加载
// ==========================================
// 格式: JSON
// {
//   "database": { "path": "...", "busy_timeout_ms": 5000, "foreign_keys": true },
//   "import":   { "table": "fe_users", "columns": ["last_name:Name"], ... }
// }
// 两段均可省略
// ==========================================

use crate::config::connection::ConnectionConfig;
use crate::config::import_options::ImportProfile;
use crate::importer::error::{ImportError, ImportResult};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub database: ConnectionConfig,
    pub import: ImportProfile,
}

/// 读取并解析配置文件
pub fn load_config_file(path: &Path) -> ImportResult<ConfigFile> {
    let key = path.display().to_string();

    let content = fs::read_to_string(path).map_err(|e| ImportError::ConfigReadError {
        key: key.clone(),
        message: e.to_string(),
    })?;

    let config: ConfigFile =
        serde_json::from_str(&content).map_err(|e| ImportError::ConfigReadError {
            key,
            message: e.to_string(),
        })?;

    debug!(path = %path.display(), database = %config.database.path, "配置文件已加载");
    Ok(config)
}
