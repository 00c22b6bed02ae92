// ==========================================
// Excel 实体映射引擎 - 错误类型
// ==========================================
// 依据: Rust 错误处理最佳实践
// 工具: thiserror 派生宏
// 分层: 文件/工作表 → 模式校验 → 行数据 → 单值转换
// ==========================================

use thiserror::Error;

/// 映射操作错误类型
///
/// 模式级错误（必须列缺失）在任何行被处理之前产生；
/// 行级错误（`Row`）携带出错的表格行号与列名，并保留底层转换错误作为 cause。
#[derive(Error, Debug)]
pub enum ExcelError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.xlsm/.xlsb/.ods/.csv）")]
    UnsupportedFormat(String),

    #[error("工作表索引越界: {index}（工作簿共 {count} 个工作表）")]
    SheetNotFound { index: usize, count: usize },

    #[error("工作表无数据: {0}")]
    EmptySheet(String),

    #[error("Excel 解析失败: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("CSV 解析失败: {0}")]
    Csv(#[from] csv::Error),

    // ===== 模式校验错误 =====
    #[error("必须列缺失: {0}")]
    RequiredColumnMissing(String),

    // ===== 行数据错误 =====
    #[error("字段填充失败 (行 {row}, 列 {column}): {source}")]
    Row {
        row: usize,
        column: String,
        #[source]
        source: ConvertError,
    },
}

/// 单元格值转换错误类型
///
/// 仅当目标字段为必须字段时才会上浮为 [`ExcelError::Row`]；
/// 可选字段的转换失败被逐字段吞掉，字段保持默认值。
#[derive(Error, Debug)]
pub enum ConvertError {
    // ===== 内置类型错误 =====
    #[error("无法解析为整数（{target}）: {value:?}")]
    InvalidInteger {
        target: &'static str,
        value: String,
    },

    #[error("字符字段要求恰好一个字符: {0:?}")]
    InvalidChar(String),

    #[error("日期格式有误（期望 yyyy-MM-dd HH:mm:ss）: {0:?}")]
    InvalidDateTime(String),

    // ===== 注册表错误 =====
    #[error("不支持的字段类型: {0}")]
    UnsupportedType(&'static str),

    #[error("转换器输出类型不匹配: 期望 {0}")]
    TypeMismatch(&'static str),

    // ===== 自定义类型错误 =====
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}

/// Result 类型别名
pub type ExcelResult<T> = Result<T, ExcelError>;
