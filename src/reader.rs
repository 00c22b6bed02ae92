// ==========================================
// Excel 实体映射引擎 - 文件读取层
// ==========================================
// 职责: Excel / CSV 文件 → 统一网格
// 依据: calamine 解析工作簿, csv 解析分隔文本
// 红线: 读取层只产出网格, 不做任何实体级解释
// ==========================================

use crate::cell::RawCell;
use crate::error::{ExcelError, ExcelResult};
use crate::grid::SheetGrid;
use calamine::{open_workbook_auto, Data, DataType, Range, Reader};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// 工作簿读取支持的扩展名
const EXCEL_EXTENSIONS: [&str; 5] = ["xlsx", "xls", "xlsm", "xlsb", "ods"];

// ==========================================
// SheetReader - 统一读取接口
// ==========================================
/// 把表格文件读取为 [`SheetGrid`] 的统一接口
pub trait SheetReader {
    /// 读取文件为统一网格
    ///
    /// # 返回
    /// - Ok(SheetGrid): 表头 + 数据行, 空白行已丢弃
    /// - Err: 文件不存在 / 格式不支持 / 工作表缺失或为空 / 底层解析错误
    fn read_grid(&self, path: &Path) -> ExcelResult<SheetGrid>;
}

// ==========================================
// ExcelReader - 工作簿读取
// ==========================================

/// Excel 工作簿读取器, 按下标选择工作表
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcelReader {
    sheet_index: usize,
}

impl ExcelReader {
    /// 读取首个工作表
    pub fn new() -> Self {
        Self { sheet_index: 0 }
    }

    /// 读取指定下标的工作表, 下标从 0 起
    pub fn with_sheet(sheet_index: usize) -> Self {
        Self { sheet_index }
    }
}

impl SheetReader for ExcelReader {
    #[instrument(skip(self), fields(file = %path.display(), sheet = self.sheet_index))]
    fn read_grid(&self, path: &Path) -> ExcelResult<SheetGrid> {
        ensure_file_exists(path)?;
        let extension = extension_of(path);
        if !EXCEL_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ExcelError::UnsupportedFormat(path.display().to_string()));
        }

        let mut workbook = open_workbook_auto(path)?;
        let sheet_names = workbook.sheet_names().to_owned();
        let sheet_name = sheet_names
            .get(self.sheet_index)
            .cloned()
            .ok_or(ExcelError::SheetNotFound {
                index: self.sheet_index,
                count: sheet_names.len(),
            })?;

        let range = workbook.worksheet_range(&sheet_name)?;
        // 部分格式不提供公式信息, 按无公式处理
        let formulas = match workbook.worksheet_formula(&sheet_name) {
            Ok(formulas) => formulas,
            Err(error) => {
                warn!("工作表 {} 公式信息读取失败: {}", sheet_name, error);
                Range::empty()
            }
        };

        let (start, end) = match (range.start(), range.end()) {
            (Some(start), Some(end)) => (start, end),
            _ => return Err(ExcelError::EmptySheet(sheet_name)),
        };

        let mut header_cells = Vec::new();
        let mut data_rows = Vec::new();
        for row in start.0..=end.0 {
            // 列下标从绝对 0 列起, 首个已用列之前的单元格一律空白
            let mut cells = Vec::with_capacity((end.1 + 1) as usize);
            for col in 0..=end.1 {
                cells.push(raw_cell(range.get_value((row, col)), formulas.get_value((row, col))));
            }
            if row == start.0 {
                header_cells = cells;
            } else {
                data_rows.push(cells);
            }
        }

        let grid = SheetGrid::new(header_cells, data_rows);
        info!(
            "工作表 {} 读取完成: {} 行 x {} 列",
            sheet_name,
            grid.row_count(),
            grid.column_count()
        );
        Ok(grid)
    }
}

/// 单元格取值, 公式单元格以公式文本优先
fn raw_cell(value: Option<&Data>, formula: Option<&String>) -> RawCell {
    if let Some(formula_text) = formula {
        if !formula_text.is_empty() {
            return RawCell::Formula(formula_text.clone());
        }
    }

    match value {
        None | Some(Data::Empty) => RawCell::Blank,
        Some(Data::String(text)) => RawCell::Text(text.clone()),
        Some(Data::Float(number)) => RawCell::Number(*number),
        Some(Data::Int(number)) => RawCell::Number(*number as f64),
        Some(Data::Bool(flag)) => RawCell::Bool(*flag),
        Some(data @ (Data::DateTime(_) | Data::DateTimeIso(_))) => match data.as_datetime() {
            Some(datetime) => RawCell::DateTime(datetime),
            None => RawCell::Blank,
        },
        // 错误单元格与时长单元格没有映射对应物, 按空白处理
        Some(Data::Error(_)) | Some(Data::DurationIso(_)) => RawCell::Blank,
    }
}

// ==========================================
// CsvReader - 分隔文本读取
// ==========================================

/// CSV 文件读取器, 首条记录视为表头
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvReader;

impl CsvReader {
    pub fn new() -> Self {
        Self
    }
}

impl SheetReader for CsvReader {
    #[instrument(skip(self), fields(file = %path.display()))]
    fn read_grid(&self, path: &Path) -> ExcelResult<SheetGrid> {
        ensure_file_exists(path)?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;

        let mut header_cells: Option<Vec<RawCell>> = None;
        let mut data_rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let cells: Vec<RawCell> = record
                .iter()
                .map(|field| RawCell::Text(field.to_string()))
                .collect();
            match header_cells {
                None => header_cells = Some(cells),
                Some(_) => data_rows.push(cells),
            }
        }

        let header_cells =
            header_cells.ok_or_else(|| ExcelError::EmptySheet(path.display().to_string()))?;
        let grid = SheetGrid::new(header_cells, data_rows);
        debug!("CSV 读取完成: {} 行 x {} 列", grid.row_count(), grid.column_count());
        Ok(grid)
    }
}

// ==========================================
// UniversalReader - 按扩展名分发
// ==========================================

/// 按文件扩展名自动选择读取方式
#[derive(Debug, Clone, Copy, Default)]
pub struct UniversalReader {
    sheet_index: usize,
}

impl UniversalReader {
    pub fn new() -> Self {
        Self { sheet_index: 0 }
    }

    /// Excel 文件按指定工作表读取, CSV 不受影响
    pub fn with_sheet(sheet_index: usize) -> Self {
        Self { sheet_index }
    }
}

impl SheetReader for UniversalReader {
    fn read_grid(&self, path: &Path) -> ExcelResult<SheetGrid> {
        ensure_file_exists(path)?;

        let extension = extension_of(path);
        match extension.as_str() {
            "csv" => CsvReader::new().read_grid(path),
            ext if EXCEL_EXTENSIONS.contains(&ext) => {
                ExcelReader::with_sheet(self.sheet_index).read_grid(path)
            }
            _ => Err(ExcelError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

// ==========================================
// 快捷入口
// ==========================================

/// 读取 Excel 文件的首个工作表
pub fn read_excel(path: impl AsRef<Path>) -> ExcelResult<SheetGrid> {
    ExcelReader::new().read_grid(path.as_ref())
}

/// 读取 Excel 文件的指定工作表
pub fn read_excel_sheet(path: impl AsRef<Path>, sheet_index: usize) -> ExcelResult<SheetGrid> {
    ExcelReader::with_sheet(sheet_index).read_grid(path.as_ref())
}

/// 读取 CSV 文件
pub fn read_csv(path: impl AsRef<Path>) -> ExcelResult<SheetGrid> {
    CsvReader::new().read_grid(path.as_ref())
}

/// 按扩展名自动读取 Excel 或 CSV 文件
pub fn read_file(path: impl AsRef<Path>) -> ExcelResult<SheetGrid> {
    UniversalReader::new().read_grid(path.as_ref())
}

// ===== 公共辅助 =====

fn ensure_file_exists(path: &Path) -> ExcelResult<()> {
    if !path.exists() {
        return Err(ExcelError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(OsStr::to_str)
        .map(str::to_lowercase)
        .unwrap_or_default()
}
