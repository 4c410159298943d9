// ==========================================
// 设备维护排程系统 - 文件解析器实现
// ==========================================
// 支持: CSV (.csv / 任意 Read 流) / Excel (.xlsx/.xls, 第一个工作表)
// 约定:
//   - 第一行为表头(去空白,去 UTF-8 BOM)
//   - 完全空白的行跳过,但仍占用行号
//   - I/O 失败 → 致命错误; 单行编码错误 → 行级错误
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::{FileParser, RawRow, RawTable};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

const UTF8_BOM: char = '\u{feff}';

/// 按表头把一行单元格组装为映射
fn build_row_map<'a, I>(headers: &[String], values: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut row_map = HashMap::new();
    for (col_idx, value) in values.into_iter().enumerate() {
        if let Some(header) = headers.get(col_idx) {
            if !header.is_empty() {
                row_map.insert(header.clone(), value.trim().to_string());
            }
        }
    }
    row_map
}

fn is_blank_row(row_map: &HashMap<String, String>) -> bool {
    row_map.values().all(|v| v.is_empty())
}

fn check_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// 字节偏移 → 物理行号(1 起),偏移只增不减
#[derive(Default)]
struct LineCounter {
    pos: usize,
    line: usize,
}

impl LineCounter {
    /// 跳过偏移处的换行符(csv 读取器会略过空行),返回记录实际起始行
    fn line_at(&mut self, data: &[u8], offset: usize) -> usize {
        let start = data
            .get(offset..)
            .and_then(|rest| rest.iter().position(|b| *b != b'\n' && *b != b'\r'))
            .map(|i| offset + i)
            .unwrap_or(data.len());
        if start > self.pos {
            self.line += data[self.pos..start].iter().filter(|b| **b == b'\n').count();
            self.pos = start;
        }
        self.line + 1
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl CsvParser {
    /// 从任意字节流解析 CSV
    ///
    /// 整个流先读入内存: 读取失败即整体中止,不产生任何行
    pub fn parse_reader<R: Read>(&self, mut source: R) -> ImportResult<RawTable> {
        let mut data = Vec::new();
        source.read_to_end(&mut data)?;

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(data.as_slice());

        // 读取表头
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches(UTF8_BOM).trim().to_string())
            .collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(ImportError::MissingHeader);
        }

        // 行号 = 记录所在物理行 - 表头所在物理行,空行同样占用行号
        let mut lines = LineCounter::default();
        let header_line = lines.line_at(&data, 0);
        let mut rows = Vec::new();
        let mut last_row_number = 0;
        for result in reader.records() {
            let offset = match &result {
                Ok(record) => record.position(),
                Err(e) => e.position(),
            }
            .map(|p| p.byte() as usize);
            let row_number = match offset {
                Some(offset) => lines.line_at(&data, offset).saturating_sub(header_line),
                None => last_row_number + 1,
            };
            last_row_number = row_number;
            match result {
                Ok(record) => {
                    let row_map = build_row_map(&headers, record.iter());
                    if is_blank_row(&row_map) {
                        debug!(row_number, "跳过空白行");
                        continue;
                    }
                    rows.push(RawRow {
                        row_number,
                        cells: Ok(row_map),
                    });
                }
                // 流读取失败: 整体中止
                Err(e) if e.is_io_error() => return Err(e.into()),
                // 单行内容问题(如非 UTF-8): 记为行级错误
                Err(e) => rows.push(RawRow {
                    row_number,
                    cells: Err(format!("无法读取该行: {}", e)),
                }),
            }
        }

        Ok(RawTable { headers, rows })
    }
}

impl FileParser for CsvParser {
    fn parse_file(&self, file_path: &Path) -> ImportResult<RawTable> {
        check_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(file_path)?;
        self.parse_reader(file)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_file(&self, file_path: &Path) -> ImportResult<RawTable> {
        check_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;

        // 读取第一个 sheet
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;
        let range = workbook.worksheet_range(&sheet_name)?;

        // 提取表头（第一行）
        let mut sheet_rows = range.rows();
        let header_row = sheet_rows.next().ok_or(ImportError::MissingHeader)?;
        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for (row_idx, data_row) in sheet_rows.enumerate() {
            let row_number = row_idx + 1;
            let values: Vec<String> = data_row.iter().map(|cell| cell.to_string()).collect();
            let row_map = build_row_map(&headers, values.iter().map(String::as_str));
            if is_blank_row(&row_map) {
                continue;
            }
            rows.push(RawRow {
                row_number,
                cells: Ok(row_map),
            });
        }

        Ok(RawTable { headers, rows })
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl FileParser for UniversalFileParser {
    fn parse_file(&self, file_path: &Path) -> ImportResult<RawTable> {
        match extension_of(file_path).as_str() {
            "csv" => CsvParser.parse_file(file_path),
            "xlsx" | "xls" => ExcelParser.parse_file(file_path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}
