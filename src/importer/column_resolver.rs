// ==========================================
// 表格导入工具 - 列分配解析器
// ==========================================
// 职责: 显式列映射 + 表头自动识别 → 数据库列分配表
// 流程: 阶段 1 显式规则 → 阶段 2 按值差集补齐未映射列 → 表结构校验
// ==========================================

use crate::domain::import::{ColumnAssignment, ColumnMapping};
use crate::importer::error::{ImportError, ImportResult};
use tracing::debug;

pub struct ColumnResolver<'a> {
    explicit_mappings: &'a [ColumnMapping],
}

impl<'a> ColumnResolver<'a> {
    pub fn new(explicit_mappings: &'a [ColumnMapping]) -> Self {
        Self { explicit_mappings }
    }

    /// 解析列分配表
    ///
    /// # 参数
    /// - header: 文件表头列名（按列顺序）
    ///
    /// # 返回
    /// - ColumnAssignment: 数据库列 → 源列
    pub fn resolve(&self, header: &[String]) -> ColumnAssignment {
        let mut assignment = ColumnAssignment::new();
        self.apply_explicit(&mut assignment);
        self.apply_unmapped(&mut assignment, header);

        debug!(columns = assignment.len(), "列分配解析完成");
        assignment
    }

    /// 阶段 1: 显式映射
    ///
    /// 同一源列可被多个数据库列引用（一列扇出到多列）。
    fn apply_explicit(&self, assignment: &mut ColumnAssignment) {
        for mapping in self.explicit_mappings {
            assignment.assign(mapping.db_column.as_str(), mapping.source_column.as_str());
        }
    }

    /// 阶段 2: 表头中未作为源列使用的列 → 同名映射
    ///
    /// 差集按“值”（源列）计算，不按键计算。空白列名不参与。
    fn apply_unmapped(&self, assignment: &mut ColumnAssignment, header: &[String]) {
        let unmapped: Vec<&String> = header
            .iter()
            .filter(|column| !column.is_empty())
            .filter(|column| !assignment.uses_source(column))
            .collect();

        for column in unmapped {
            assignment.assign(column.as_str(), column.as_str());
        }
    }
}

/// 校验列分配表中的每个数据库列都存在于目标表
///
/// # 参数
/// - assignment: 列分配表
/// - table: 目标表名
/// - table_columns: 目标表实际列名
///
/// # 返回
/// - Ok(()): 全部存在
/// - Err(TableNotFound): 目标表没有任何列（不存在）
/// - Err(UnknownColumn): 第一个不存在的列
pub fn validate_against_schema(
    assignment: &ColumnAssignment,
    table: &str,
    table_columns: &[String],
) -> ImportResult<()> {
    if table_columns.is_empty() {
        return Err(ImportError::TableNotFound(table.to_string()));
    }

    match assignment
        .db_columns()
        .find(|column| !table_columns.iter().any(|c| c == column))
    {
        Some(column) => Err(ImportError::UnknownColumn {
            column: column.to_string(),
            table: table.to_string(),
        }),
        None => Ok(()),
    }
}
