// ==========================================
// 表格导入工具 - 导入层 Trait
// ==========================================
// 职责: 定义表格读取接口（不包含实现）
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use std::path::Path;

/// 表格中的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    /// 在源文件中的行号（从 1 开始，空白行也计数）
    pub number: usize,
    /// 单元格值，按列顺序排列
    pub cells: Vec<String>,
}

impl SheetRow {
    pub fn new(number: usize, cells: Vec<String>) -> Self {
        Self { number, cells }
    }
}

/// 行流: 只能向前读取
pub type RowStream = Box<dyn Iterator<Item = ImportResult<SheetRow>>>;

// ==========================================
// SpreadsheetReader Trait
// ==========================================
// 用途: 表格读取接口
// 实现者: ExcelParser, CsvParser, UniversalFileParser
//
// 每次调用都会重新打开文件；只读取第一个工作表，
// 完全空白的行不会出现在行流中。
pub trait SpreadsheetReader {
    /// 打开文件并返回第一个工作表的行流（第一个非空行为表头）
    ///
    /// # 参数
    /// - file_path: 文件路径
    ///
    /// # 返回
    /// - Ok(RowStream): 行流
    /// - Err: 文件不存在、格式不支持、解析失败
    fn open_rows(&self, file_path: &Path) -> ImportResult<RowStream>;

    /// 读取表头行
    ///
    /// # 返回
    /// - Ok(Vec<String>): 表头列名
    /// - Err: 文件无数据行或读取失败
    fn read_header(&self, file_path: &Path) -> ImportResult<Vec<String>> {
        match self.open_rows(file_path)?.next() {
            Some(header) => header.map(|row| row.cells),
            None => Err(ImportError::MissingHeader(file_path.display().to_string())),
        }
    }
}
