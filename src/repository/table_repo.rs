// ==========================================
// 表格导入工具 - 目标表 Repository Trait
// ==========================================
// 职责: 定义导入所需的数据访问接口（不包含业务逻辑）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::repository::error::RepositoryResult;
use std::collections::BTreeMap;

/// 列名 → 值（None 写入 NULL）
pub type ColumnValues = BTreeMap<String, Option<String>>;

// ==========================================
// TableRepository Trait
// ==========================================
// 用途: 导入目标表的数据访问
// 实现者: SqliteTableRepository（使用 rusqlite）
pub trait TableRepository {
    // ===== 事务 =====

    /// 开启事务
    fn begin(&self) -> RepositoryResult<()>;

    /// 提交事务
    fn commit(&self) -> RepositoryResult<()>;

    /// 回滚事务
    fn rollback(&self) -> RepositoryResult<()>;

    // ===== 表结构 =====

    /// 读取目标表的实际列名（表不存在时返回空列表）
    fn list_columns(&self, table: &str) -> RepositoryResult<Vec<String>>;

    // ===== 查询与写入 =====

    /// 按等值合取条件判断记录是否存在
    ///
    /// # 参数
    /// - table: 表名
    /// - criteria: 列名 → 值（全部 AND 连接）
    ///
    /// # 返回
    /// - Ok(true): 至少一条匹配
    /// - Ok(false): 无匹配
    fn exists(&self, table: &str, criteria: &ColumnValues) -> RepositoryResult<bool>;

    /// 插入一条记录
    fn insert(&self, table: &str, values: &ColumnValues) -> RepositoryResult<usize>;

    /// 按等值合取条件更新记录
    ///
    /// # 返回
    /// - Ok(usize): 受影响行数
    fn update(
        &self,
        table: &str,
        values: &ColumnValues,
        criteria: &ColumnValues,
    ) -> RepositoryResult<usize>;

    /// 统计表记录数
    fn count_rows(&self, table: &str) -> RepositoryResult<usize>;
}
