// ==========================================
// Excel 实体映射引擎 - 表格网格
// ==========================================
// 职责: 持有规范化后的表头与数据区二维表,
//       作为绑定提取与行映射的唯一输入面
// 红线: 表头与数据区宽度恒定一致, 缺失单元格一律为空串
// ==========================================

use crate::cell::RawCell;
use serde::{Deserialize, Serialize};

/// 表格最小列数
///
/// 物理表头不足该列数时, 以空列名补齐到该宽度。
pub const MIN_COLUMN_COUNT: usize = 4;

// ==========================================
// SheetGrid - 规范化后的表格
// ==========================================
// 用途: 读取层写入一次, 映射层只读消费
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetGrid {
    /// 表头（首行）, 宽度即整表宽度
    headers: Vec<String>,
    /// 数据区, 每行与表头等宽
    rows: Vec<Vec<String>>,
}

impl SheetGrid {
    /// 从原始单元格构建网格
    ///
    /// # 规则
    /// - 整表宽度 = `max(表头物理宽度, MIN_COLUMN_COUNT)`
    /// - 每个单元格按 [`RawCell::normalize`] 规范化
    /// - 数据行超宽截断、不足补空串, 保持矩形
    /// - 规范化后整行为空的数据行被丢弃
    pub fn new(header_cells: Vec<RawCell>, data_rows: Vec<Vec<RawCell>>) -> Self {
        let width = header_cells.len().max(MIN_COLUMN_COUNT);
        let headers = normalize_to_width(header_cells, width);
        let rows = data_rows
            .into_iter()
            // 空白判定只看整表宽度以内的单元格
            .filter(|cells| !cells.iter().take(width).all(RawCell::is_blank))
            .map(|cells| normalize_to_width(cells, width))
            .collect();

        Self { headers, rows }
    }

    /// 表头列名（按表格列序）
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// 数据区二维表（按表格行序）
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// 整表宽度
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// 数据行数（不含表头）
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// 列名在表头中的索引
    ///
    /// 精确匹配（不折叠大小写、不再次修剪）; 表头存在重名列时
    /// 返回首个匹配列的索引, 这是约定行为而非缺陷。
    pub fn column_index(&self, name: &str) -> Option<usize> {
        index_of_column(&self.headers, name)
    }
}

/// 列名在表头切片中的索引, 首个匹配者胜出
pub(crate) fn index_of_column(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|header| header == name)
}

/// 单元格规范化并整形到固定宽度
fn normalize_to_width(cells: Vec<RawCell>, width: usize) -> Vec<String> {
    let mut row: Vec<String> = cells
        .into_iter()
        .take(width)
        .map(|cell| cell.normalize())
        .collect();
    row.resize(width, String::new());
    row
}
