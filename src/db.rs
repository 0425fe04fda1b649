// ==========================================
// 表格导入工具 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一 Connection::open 的 PRAGMA 行为（外键 / busy_timeout）
// - 关闭自动提交由调用方通过显式 BEGIN 完成
// ==========================================

use crate::config::ConnectionConfig;
use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(
    conn: &Connection,
    config: &ConnectionConfig,
) -> rusqlite::Result<()> {
    let foreign_keys = if config.foreign_keys { "ON" } else { "OFF" };
    conn.execute_batch(&format!("PRAGMA foreign_keys = {};", foreign_keys))?;
    conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(config: &ConnectionConfig) -> rusqlite::Result<Connection> {
    let conn = Connection::open(&config.path)?;
    configure_sqlite_connection(&conn, config)?;
    Ok(conn)
}
