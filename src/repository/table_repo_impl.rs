// ==========================================
// 表格导入工具 - 目标表 Repository 实现
// ==========================================
// 职责: 实现导入相关数据访问（使用 rusqlite）
// 约束: 标识符转义 + 参数绑定，事务由显式 BEGIN/COMMIT/ROLLBACK 控制
// ==========================================

use crate::config::ConnectionConfig;
use crate::db::open_sqlite_connection;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_builder::{
    build_insert_sql, build_update_sql, quote_identifier, SqlQueryBuilder,
};
use crate::repository::table_repo::{ColumnValues, TableRepository};
use rusqlite::{params, params_from_iter, Connection};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::trace;

// ==========================================
// SqliteTableRepository
// ==========================================
pub struct SqliteTableRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteTableRepository {
    /// 按连接配置打开数据库
    pub fn new(config: &ConnectionConfig) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(config)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;

        Ok(Self::from_connection(Arc::new(Mutex::new(conn))))
    }

    /// 从已有连接创建
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 共享底层连接
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn run_transaction_statement(&self, statement: &str) -> RepositoryResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(statement)
            .map_err(|e| RepositoryError::DatabaseTransactionError(format!("{}: {}", statement, e)))
    }
}

impl TableRepository for SqliteTableRepository {
    fn begin(&self) -> RepositoryResult<()> {
        self.run_transaction_statement("BEGIN")
    }

    fn commit(&self) -> RepositoryResult<()> {
        self.run_transaction_statement("COMMIT")
    }

    fn rollback(&self) -> RepositoryResult<()> {
        self.run_transaction_statement("ROLLBACK")
    }

    fn list_columns(&self, table: &str) -> RepositoryResult<Vec<String>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;
        let columns = stmt
            .query_map(params![table], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(columns)
    }

    fn exists(&self, table: &str, criteria: &ColumnValues) -> RepositoryResult<bool> {
        let conn = self.lock()?;

        let mut builder =
            SqlQueryBuilder::new(&format!("SELECT COUNT(*) FROM {}", quote_identifier(table)));
        for column in criteria.keys() {
            builder = builder.where_eq(column);
        }
        let sql = builder.build();
        trace!(sql = %sql, "存在性查询");

        let count: i64 = conn.query_row(&sql, params_from_iter(criteria.values()), |row| {
            row.get(0)
        })?;

        Ok(count > 0)
    }

    fn insert(&self, table: &str, values: &ColumnValues) -> RepositoryResult<usize> {
        if values.is_empty() {
            return Err(RepositoryError::EmptyColumnSet(format!("INSERT INTO {}", table)));
        }

        let conn = self.lock()?;

        let columns: Vec<&String> = values.keys().collect();
        let sql = build_insert_sql(table, &columns);
        trace!(sql = %sql, "插入记录");

        Ok(conn.execute(&sql, params_from_iter(values.values()))?)
    }

    fn update(
        &self,
        table: &str,
        values: &ColumnValues,
        criteria: &ColumnValues,
    ) -> RepositoryResult<usize> {
        if values.is_empty() {
            return Err(RepositoryError::EmptyColumnSet(format!("UPDATE {}", table)));
        }

        let conn = self.lock()?;

        let set_columns: Vec<&String> = values.keys().collect();
        let where_columns: Vec<&String> = criteria.keys().collect();
        let sql = build_update_sql(table, &set_columns, &where_columns);
        trace!(sql = %sql, "更新记录");

        Ok(conn.execute(
            &sql,
            params_from_iter(values.values().chain(criteria.values())),
        )?)
    }

    fn count_rows(&self, table: &str) -> RepositoryResult<usize> {
        let conn = self.lock()?;

        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", quote_identifier(table)),
            [],
            |row| row.get(0),
        )?;

        Ok(count as usize)
    }
}
