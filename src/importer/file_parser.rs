// ==========================================
// 表格导入工具 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls/.xlsm/.ods) / CSV (.csv)
// 约束: 只读第一个工作表；第 1 行永远是表头（与格式无关）
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::{RowStream, SheetRow, SpreadsheetReader};
use calamine::{open_workbook_auto, Data, DataType, Reader};
use chrono::Timelike;
use csv::ReaderBuilder;
use std::path::Path;

/// Excel 系列扩展名
const EXCEL_EXTENSIONS: [&str; 4] = ["xlsx", "xls", "xlsm", "ods"];

/// 检查文件存在并返回小写扩展名
fn checked_extension(path: &Path) -> ImportResult<String> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }

    Ok(path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase())
}

/// 完全空白的行（所有单元格为空字符串）
fn is_blank_row(cells: &[String]) -> bool {
    cells.iter().all(|c| c.is_empty())
}

/// 单元格 → 字符串
///
/// 整数值的浮点单元格不带小数部分（Excel 数字一律存为浮点）。
/// 日期单元格输出 `YYYY-MM-DD`，带时间部分时输出 `YYYY-MM-DD HH:MM:SS`。
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(_) => match cell.as_datetime() {
            Some(dt) if dt.num_seconds_from_midnight() == 0 && dt.nanosecond() == 0 => {
                dt.format("%Y-%m-%d").to_string()
            }
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => cell.to_string(),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        other => other.to_string(),
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl SpreadsheetReader for CsvParser {
    fn open_rows(&self, file_path: &Path) -> ImportResult<RowStream> {
        let ext = checked_extension(file_path)?;
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        // 表头由调用方处理，这里按普通行读取
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_path(file_path)?;

        let rows = reader
            .into_records()
            .enumerate()
            .filter_map(|(index, result)| match result {
                Ok(record) => {
                    let cells: Vec<String> = record.iter().map(str::to_string).collect();
                    // 跳过完全空白的行
                    if is_blank_row(&cells) {
                        None
                    } else {
                        // 行号取记录起始行（空行不产生记录）
                        let number = record
                            .position()
                            .map_or(index + 1, |p| p.line() as usize);
                        Some(Ok(SheetRow::new(number, cells)))
                    }
                }
                Err(e) => Some(Err(ImportError::from(e))),
            });

        Ok(Box::new(rows))
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl SpreadsheetReader for ExcelParser {
    fn open_rows(&self, file_path: &Path) -> ImportResult<RowStream> {
        let ext = checked_extension(file_path)?;
        if !EXCEL_EXTENSIONS.contains(&ext.as_str()) {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;

        // 只处理第一个 sheet，其余全部忽略
        let sheet_name = workbook.sheet_names().first().cloned().ok_or_else(|| {
            ImportError::ExcelParseError("Excel 文件无工作表".to_string())
        })?;
        let range = workbook.worksheet_range(&sheet_name)?;

        // Range 从第一个非空单元格开始，行号需加上起始偏移
        let first_row = range.start().map_or(0, |(row, _)| row as usize);
        let rows: Vec<ImportResult<SheetRow>> = range
            .rows()
            .enumerate()
            .map(|(index, row)| {
                let cells = row.iter().map(cell_to_string).collect::<Vec<_>>();
                SheetRow::new(first_row + index + 1, cells)
            })
            .filter(|row| !is_blank_row(&row.cells))
            .map(Ok)
            .collect();

        Ok(Box::new(rows.into_iter()))
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl SpreadsheetReader for UniversalFileParser {
    fn open_rows(&self, file_path: &Path) -> ImportResult<RowStream> {
        let ext = checked_extension(file_path)?;

        match ext.as_str() {
            "csv" => CsvParser.open_rows(file_path),
            e if EXCEL_EXTENSIONS.contains(&e) => ExcelParser.open_rows(file_path),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}
