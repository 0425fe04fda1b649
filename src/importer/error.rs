// ==========================================
// 表格导入工具 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::repository::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.xlsm/.ods/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("文件缺少表头行: {0}")]
    MissingHeader(String),

    // ===== 配置错误 =====
    #[error("配置读取失败 (key: {key}): {message}")]
    ConfigReadError { key: String, message: String },

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    ConfigValueError {
        key: String,
        value: String,
        message: String,
    },

    #[error("唯一字段列表不能为空")]
    MissingUniqueFields,

    // ===== 表结构错误 =====
    #[error("数据表不存在: {0}")]
    TableNotFound(String),

    #[error("列 \"{column}\" 在数据表 \"{table}\" 中不存在")]
    UnknownColumn { column: String, table: String },

    // ===== 文件转移错误 =====
    #[error("目录不可写: {0}")]
    DirectoryNotWritable(String),

    #[error("文件移动失败 ({from} → {to}): {message}")]
    FileMoveError {
        from: String,
        to: String,
        message: String,
    },

    // ===== 数据库错误 =====
    #[error(transparent)]
    Database(#[from] RepositoryError),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

impl ImportError {
    /// 是否为配置类错误（在任何行处理之前即可发现）
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            ImportError::ConfigReadError { .. }
                | ImportError::ConfigValueError { .. }
                | ImportError::MissingUniqueFields
                | ImportError::TableNotFound(_)
                | ImportError::UnknownColumn { .. }
        )
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
