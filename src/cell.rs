// ==========================================
// Excel 实体映射引擎 - 原始单元格
// ==========================================
// 职责: 承载外部读取器分类后的单元格原始值,
//       并将其规范化为统一的字符串表示
// 红线: 规范化永不失败, 未知形态一律按空白处理
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 单元格字符串化时使用的固定日期时间格式
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ==========================================
// RawCell - 读取器交付的原始单元格
// ==========================================
// 用途: 读取层输出 / SheetGrid 输入
// 说明: 日期型数值单元格由读取器负责解码,
//       这里只接收解码完成的 NaiveDateTime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawCell {
    /// 空白或缺失的单元格
    Blank,
    /// 文本单元格
    Text(String),
    /// 普通数值单元格（未标记为日期格式）
    Number(f64),
    /// 日期格式的数值单元格（已由读取器解码）
    DateTime(NaiveDateTime),
    /// 布尔单元格
    Bool(bool),
    /// 公式单元格（保留公式原文, 不取计算结果）
    Formula(String),
}

impl RawCell {
    /// 规范化为统一的字符串表示
    ///
    /// # 规则
    /// - 空白 → `""`
    /// - 文本 → 去除首尾空白后的原文
    /// - 日期数值 → `YYYY-MM-DD HH:MM:SS`
    /// - 普通数值 → 截断小数部分后的整数字符串（向零截断）
    /// - 布尔 → `"TRUE"` / `"FALSE"`
    /// - 公式 → 去除首尾空白后的公式原文
    pub fn normalize(&self) -> String {
        match self {
            RawCell::Blank => String::new(),
            RawCell::Text(text) => text.trim().to_string(),
            RawCell::Number(value) => (*value as i64).to_string(),
            RawCell::DateTime(datetime) => datetime.format(DATETIME_FORMAT).to_string(),
            RawCell::Bool(true) => "TRUE".to_string(),
            RawCell::Bool(false) => "FALSE".to_string(),
            RawCell::Formula(formula) => formula.trim().to_string(),
        }
    }

    /// 规范化后是否为空字符串
    pub fn is_blank(&self) -> bool {
        match self {
            RawCell::Blank => true,
            RawCell::Text(text) => text.trim().is_empty(),
            RawCell::Formula(formula) => formula.trim().is_empty(),
            _ => false,
        }
    }
}
