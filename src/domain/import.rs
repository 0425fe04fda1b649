// ==========================================
// 表格导入工具 - 导入领域模型
// ==========================================
// 职责: 行 / 实体 / 列分配 / 计数器等核心数据结构
// 红线: 不含数据访问逻辑
// ==========================================

use chrono::{DateTime, Local};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

/// 原始行: 源列名 → 单元格值
///
/// 由表头与当前行拼接而成，重复表头时后者覆盖前者。
pub type RawRow = HashMap<String, String>;

/// 候选实体: 数据库列名 → 值
///
/// 使用 BTreeMap 保证生成 SQL 时列顺序稳定。
pub type CandidateEntity = BTreeMap<String, Option<String>>;

/// 唯一键子集: 候选实体在唯一字段上的投影
pub type UniqueKeySubset = BTreeMap<String, Option<String>>;

// ==========================================
// ColumnMapping - 显式列映射
// ==========================================
// 配置格式: "db_column:source_column"（按第一个冒号切分）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub db_column: String,
    pub source_column: String,
}

// ==========================================
// ColumnAssignment - 列分配表
// ==========================================
// 数据库列 → 源列；每个文件构建一次
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnAssignment {
    entries: BTreeMap<String, String>,
}

impl ColumnAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入一条分配（同名数据库列后写覆盖先写）
    pub fn assign(&mut self, db_column: impl Into<String>, source_column: impl Into<String>) {
        self.entries.insert(db_column.into(), source_column.into());
    }

    /// 查询数据库列对应的源列
    pub fn source_of(&self, db_column: &str) -> Option<&str> {
        self.entries.get(db_column).map(String::as_str)
    }

    /// 源列是否已被任意数据库列使用（按值判断）
    pub fn uses_source(&self, source_column: &str) -> bool {
        self.entries.values().any(|s| s == source_column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(db, source)| (db.as_str(), source.as_str()))
    }

    pub fn db_columns(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ==========================================
// ValueMapping - 值替换规则
// ==========================================
// 配置格式: "field:source_value:target_value"，例如 "gender:Herr:1"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueMapping {
    pub field: String,
    pub source: String,
    pub target: String,
}

// ==========================================
// DefaultValue - 默认值规则
// ==========================================
// 配置格式: "field:value"，value 可为动态标记
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultValue {
    pub field: String,
    pub source: DefaultSource,
}

/// 默认值来源
///
/// 动态来源在构建实体时求值，而不是每个文件只求一次。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultSource {
    /// 字面值
    Literal(String),
    /// `{now}` → `YYYY-MM-DD HH:MM:SS`
    CurrentDateTime,
    /// `{today}` → `YYYY-MM-DD`
    CurrentDate,
    /// `{timestamp}` → Unix 秒
    UnixTimestamp,
}

impl DefaultSource {
    pub const NOW_MARKER: &'static str = "{now}";
    pub const TODAY_MARKER: &'static str = "{today}";
    pub const TIMESTAMP_MARKER: &'static str = "{timestamp}";

    /// 识别动态标记，其余按字面值处理
    pub fn from_marker(raw: &str) -> Self {
        match raw {
            Self::NOW_MARKER => DefaultSource::CurrentDateTime,
            Self::TODAY_MARKER => DefaultSource::CurrentDate,
            Self::TIMESTAMP_MARKER => DefaultSource::UnixTimestamp,
            other => DefaultSource::Literal(other.to_string()),
        }
    }

    /// 在给定时刻求值
    pub fn resolve(&self, now: DateTime<Local>) -> String {
        match self {
            DefaultSource::Literal(value) => value.clone(),
            DefaultSource::CurrentDateTime => now.format("%Y-%m-%d %H:%M:%S").to_string(),
            DefaultSource::CurrentDate => now.format("%Y-%m-%d").to_string(),
            DefaultSource::UnixTimestamp => now.timestamp().to_string(),
        }
    }
}

// ==========================================
// ImportCounters - 新增 / 更新计数
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportCounters {
    pub created: usize,
    pub updated: usize,
}

impl ImportCounters {
    pub fn record(&mut self, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Inserted => self.created += 1,
            UpsertOutcome::Updated => self.updated += 1,
        }
    }

    /// 合并另一个计数器（文件提交后并入运行总计）
    pub fn merge(&mut self, other: ImportCounters) {
        self.created += other.created;
        self.updated += other.updated;
    }
}

/// 单行落库结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

// ==========================================
// 文件级状态与报告
// ==========================================

/// 单个文件的导入状态
///
/// Processing → Committed | RolledBack；
/// 数据路径本身无法读取时为 Unreadable（未开启事务）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    Processing,
    Committed,
    RolledBack,
    Unreadable,
}

#[derive(Debug, Clone)]
pub struct FileReport {
    pub batch_id: String,
    pub path: PathBuf,
    pub state: FileState,
    /// 本文件的计数（回滚时不计入运行总计）
    pub counters: ImportCounters,
    pub skipped_rows: usize,
    pub error: Option<String>,
    /// 文件被移动到的新位置
    pub routed_to: Option<PathBuf>,
}

impl FileReport {
    pub fn is_committed(&self) -> bool {
        self.state == FileState::Committed
    }
}

/// 一次运行的汇总
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub counters: ImportCounters,
    pub files: Vec<FileReport>,
}

impl RunSummary {
    pub fn committed_files(&self) -> usize {
        self.files.iter().filter(|f| f.is_committed()).count()
    }

    pub fn failed_files(&self) -> usize {
        self.files.len() - self.committed_files()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_source_markers() {
        assert_eq!(DefaultSource::from_marker("{now}"), DefaultSource::CurrentDateTime);
        assert_eq!(DefaultSource::from_marker("{today}"), DefaultSource::CurrentDate);
        assert_eq!(DefaultSource::from_marker("{timestamp}"), DefaultSource::UnixTimestamp);
        assert_eq!(
            DefaultSource::from_marker("now"),
            DefaultSource::Literal("now".to_string())
        );
    }

    #[test]
    fn test_default_source_resolve() {
        let now = Local.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();

        assert_eq!(DefaultSource::CurrentDateTime.resolve(now), "2024-03-05 07:08:09");
        assert_eq!(DefaultSource::CurrentDate.resolve(now), "2024-03-05");
        assert_eq!(DefaultSource::UnixTimestamp.resolve(now), now.timestamp().to_string());
        assert_eq!(DefaultSource::Literal("en".to_string()).resolve(now), "en");
    }

    #[test]
    fn test_column_assignment_uses_source_by_value() {
        let mut assignment = ColumnAssignment::new();
        assignment.assign("last_name", "Name");

        assert!(assignment.uses_source("Name"));
        assert!(!assignment.uses_source("last_name"));
    }

    #[test]
    fn test_counters_merge() {
        let mut total = ImportCounters::default();
        let mut file = ImportCounters::default();
        file.record(UpsertOutcome::Inserted);
        file.record(UpsertOutcome::Updated);
        file.record(UpsertOutcome::Updated);

        total.merge(file);

        assert_eq!(total, ImportCounters { created: 1, updated: 2 });
    }
}
