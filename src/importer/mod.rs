// ==========================================
// 表格导入工具 - 导入层
// ==========================================
// 职责: 表格行 → 候选实体 → 插入 / 更新
// 支持: Excel (.xlsx/.xls/.xlsm/.ods), CSV
// ==========================================

// 模块声明
pub mod column_resolver;
pub mod entity_builder;
pub mod error;
pub mod field_validator;
pub mod file_parser;
pub mod file_router;
pub mod import_orchestrator;
pub mod importer_trait;
pub mod upsert_decider;

// 重导出核心类型
pub use column_resolver::{validate_against_schema, ColumnResolver};
pub use entity_builder::EntityBuilder;
pub use error::{ImportError, ImportResult};
pub use field_validator::RequiredFieldValidator;
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use file_router::FileRouter;
pub use import_orchestrator::{collect_data_files, ImportOrchestrator};
pub use upsert_decider::UpsertDecider;

// 重导出 Trait 接口
pub use importer_trait::{RowStream, SpreadsheetReader};
