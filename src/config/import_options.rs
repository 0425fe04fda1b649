// ==========================================
// 表格导入工具 - 导入选项
// ==========================================
// 来源优先级: 命令行 > 配置文件 "import" 段 > 内置默认值
// 标量: 命令行给出即覆盖；列表: 命令行给出即整体替换
// ==========================================

use crate::domain::import::{ColumnMapping, DefaultSource, DefaultValue, ValueMapping};
use crate::importer::error::{ImportError, ImportResult};
use serde::Deserialize;
use std::path::PathBuf;

/// 默认目标表
pub const DEFAULT_TABLE: &str = "fe_users";

// ==========================================
// ImportProfile - 未解析的导入配置
// ==========================================
// 字符串形式，与配置文件 / 命令行一一对应
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ImportProfile {
    pub table: Option<String>,
    /// "db_column:source_column"
    pub columns: Vec<String>,
    /// "field:source_value:target_value"
    pub value_mappings: Vec<String>,
    pub unique_fields: Vec<String>,
    /// "field:value"
    pub defaults: Vec<String>,
    pub trim: Option<bool>,
    pub success_directory: Option<PathBuf>,
    pub error_directory: Option<PathBuf>,
}

impl ImportProfile {
    /// 以 `overrides` 覆盖当前配置
    pub fn overlay(self, overrides: ImportProfile) -> ImportProfile {
        fn pick_list(base: Vec<String>, over: Vec<String>) -> Vec<String> {
            if over.is_empty() {
                base
            } else {
                over
            }
        }

        ImportProfile {
            table: overrides.table.or(self.table),
            columns: pick_list(self.columns, overrides.columns),
            value_mappings: pick_list(self.value_mappings, overrides.value_mappings),
            unique_fields: pick_list(self.unique_fields, overrides.unique_fields),
            defaults: pick_list(self.defaults, overrides.defaults),
            trim: overrides.trim.or(self.trim),
            success_directory: overrides.success_directory.or(self.success_directory),
            error_directory: overrides.error_directory.or(self.error_directory),
        }
    }
}

// ==========================================
// ImportOptions - 解析后的导入选项
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    pub table: String,
    pub column_mappings: Vec<ColumnMapping>,
    pub value_mappings: Vec<ValueMapping>,
    pub unique_fields: Vec<String>,
    pub defaults: Vec<DefaultValue>,
    pub trim: bool,
    pub success_directory: Option<PathBuf>,
    pub error_directory: Option<PathBuf>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE.to_string(),
            column_mappings: Vec::new(),
            value_mappings: Vec::new(),
            unique_fields: Vec::new(),
            defaults: Vec::new(),
            trim: true,
            success_directory: None,
            error_directory: None,
        }
    }
}

impl ImportOptions {
    /// 解析配置字符串
    ///
    /// # 返回
    /// - Err(ConfigValueError): 任一字符串格式错误
    pub fn from_profile(profile: ImportProfile) -> ImportResult<Self> {
        let column_mappings = profile
            .columns
            .iter()
            .map(|raw| parse_column_mapping(raw))
            .collect::<ImportResult<Vec<_>>>()?;

        let value_mappings = profile
            .value_mappings
            .iter()
            .map(|raw| parse_value_mapping(raw))
            .collect::<ImportResult<Vec<_>>>()?;

        let defaults = profile
            .defaults
            .iter()
            .map(|raw| parse_default_value(raw))
            .collect::<ImportResult<Vec<_>>>()?;

        Ok(Self {
            table: profile.table.unwrap_or_else(|| DEFAULT_TABLE.to_string()),
            column_mappings,
            value_mappings,
            unique_fields: profile.unique_fields,
            defaults,
            trim: profile.trim.unwrap_or(true),
            success_directory: profile.success_directory,
            error_directory: profile.error_directory,
        })
    }

    /// 在读取任何文件之前校验
    pub fn validate(&self) -> ImportResult<()> {
        if self.table.trim().is_empty() {
            return Err(ImportError::ConfigValueError {
                key: "table".to_string(),
                value: self.table.clone(),
                message: "表名不能为空".to_string(),
            });
        }

        if self.unique_fields.is_empty() {
            return Err(ImportError::MissingUniqueFields);
        }

        // 空白的唯一字段永远无法满足必填校验，会导致每一行都被跳过
        if let Some(blank) = self.unique_fields.iter().find(|f| f.trim().is_empty()) {
            return Err(ImportError::ConfigValueError {
                key: "unique-field".to_string(),
                value: blank.clone(),
                message: "唯一字段名不能为空".to_string(),
            });
        }

        Ok(())
    }

    /// 必填字段即唯一字段
    pub fn required_fields(&self) -> &[String] {
        &self.unique_fields
    }
}

// ==========================================
// 配置字符串解析
// ==========================================

/// "db_column:source_column"，按第一个冒号切分
pub fn parse_column_mapping(raw: &str) -> ImportResult<ColumnMapping> {
    match raw.split_once(':') {
        Some((db_column, source_column)) if !db_column.is_empty() => Ok(ColumnMapping {
            db_column: db_column.to_string(),
            source_column: source_column.to_string(),
        }),
        _ => Err(value_error("column", raw, "格式应为 db_column:source_column")),
    }
}

/// "field:source_value:target_value"，目标值可包含冒号
pub fn parse_value_mapping(raw: &str) -> ImportResult<ValueMapping> {
    let mut parts = raw.splitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(field), Some(source), Some(target)) if !field.is_empty() => Ok(ValueMapping {
            field: field.to_string(),
            source: source.to_string(),
            target: target.to_string(),
        }),
        _ => Err(value_error("map", raw, "格式应为 field:source_value:target_value")),
    }
}

/// "field:value"，按第一个冒号切分，值可为动态标记
pub fn parse_default_value(raw: &str) -> ImportResult<DefaultValue> {
    match raw.split_once(':') {
        Some((field, value)) if !field.is_empty() => Ok(DefaultValue {
            field: field.to_string(),
            source: DefaultSource::from_marker(value),
        }),
        _ => Err(value_error("default", raw, "格式应为 field:value")),
    }
}

fn value_error(key: &str, value: &str, message: &str) -> ImportError {
    ImportError::ConfigValueError {
        key: key.to_string(),
        value: value.to_string(),
        message: message.to_string(),
    }
}
