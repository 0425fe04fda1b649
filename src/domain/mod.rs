// ==========================================
// 表格导入工具 - 领域模型层
// ==========================================
// 职责: 定义导入过程的数据结构
// 红线: 不含数据访问逻辑
// ==========================================

pub mod import;

// 重导出核心类型
pub use import::{
    CandidateEntity, ColumnAssignment, ColumnMapping, DefaultSource, DefaultValue, FileReport,
    FileState, ImportCounters, RawRow, RunSummary, UniqueKeySubset, UpsertOutcome, ValueMapping,
};
