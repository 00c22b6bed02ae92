// ==========================================
// Excel 实体映射引擎 - 类型转换注册表
// ==========================================
// 职责: 字符串单元格值 → 字段类型值的统一调度
// 调度顺序: 内置类型 → 进程级自定义类型注册表
// 红线: 注册只在初始化阶段发生, 映射期间注册表只读
// ==========================================

use crate::cell::DATETIME_FORMAT;
use crate::error::ConvertError;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::any::{self, Any, TypeId};
use std::num::ParseIntError;
use std::str::FromStr;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

// ==========================================
// ExcelType - 自定义类型扩展接口
// ==========================================
/// 可从单元格字符串解析的自定义字段类型
///
/// 内置类型（`String` / `i64` / `i32` / `i16` / `char` /
/// `NaiveDateTime` / `DateTime<Utc>`）之外的字段类型实现本 trait,
/// 并在任何映射操作开始之前通过 [`register_type`] 注册一次。
///
/// # 示例
/// ```
/// use excel2entity::{convert, register_type, ExcelType};
///
/// struct Money(i64); // 以分为单位的金额
///
/// impl ExcelType for Money {
///     fn parse_value(raw: &str) -> anyhow::Result<Self> {
///         let yuan: f64 = raw.trim_start_matches('¥').parse()?;
///         Ok(Money((yuan * 100.0) as i64))
///     }
/// }
///
/// register_type::<Money>();
/// let price: Money = convert("¥12.50").unwrap();
/// assert_eq!(price.0, 1250);
/// ```
pub trait ExcelType: Sized + 'static {
    /// 解析单元格字符串为类型值
    ///
    /// # 返回
    /// - Ok(Self): 解析成功
    /// - Err: 解析失败, 错误作为转换错误的 cause 上浮
    fn parse_value(raw: &str) -> anyhow::Result<Self>;
}

// ==========================================
// 进程级自定义类型注册表
// ==========================================
// 生命周期: 初始化阶段写入（唯一互斥写路径）, 映射期间共享只读
// 键: 目标类型的 TypeId, 注册顺序即调度顺序

/// 类型擦除后的解析函数
type ErasedParse = Box<dyn Fn(&str) -> Result<Box<dyn Any>, ConvertError> + Send + Sync>;

struct RegisteredType {
    type_id: TypeId,
    type_name: &'static str,
    parse: ErasedParse,
}

static USER_TYPES: RwLock<Vec<RegisteredType>> = RwLock::new(Vec::new());

/// 注册自定义字段类型, 幂等
///
/// 重复注册同一类型是无操作而非错误。注册持有互斥写锁,
/// 并发映射操作应在全部注册完成之后再开始。
pub fn register_type<T: ExcelType>() {
    let type_id = TypeId::of::<T>();
    let type_name = any::type_name::<T>();

    // 注册表只增不删, 锁中毒后的数据仍然完整, 直接恢复
    let mut types = USER_TYPES.write().unwrap_or_else(PoisonError::into_inner);
    if let Some(existing) = types.iter().find(|entry| entry.type_id == type_id) {
        debug!("类型 {} 已注册, 忽略重复注册", existing.type_name);
        return;
    }

    types.push(RegisteredType {
        type_id,
        type_name,
        parse: Box::new(|raw| {
            T::parse_value(raw)
                .map(|value| Box::new(value) as Box<dyn Any>)
                .map_err(ConvertError::Custom)
        }),
    });
    debug!("注册自定义类型: {}", type_name);
}

// ==========================================
// 转换调度
// ==========================================

/// 字符串单元格值 → 目标类型值
///
/// # 调度顺序
/// 1. 内置类型精确匹配
/// 2. 按 TypeId 查询自定义类型注册表
/// 3. 均未命中 → [`ConvertError::UnsupportedType`]
pub fn convert<F: 'static>(raw: &str) -> Result<F, ConvertError> {
    match convert_builtin::<F>(raw) {
        Some(result) => result,
        None => convert_registered::<F>(raw),
    }
}

/// 内置类型转换, 未命中返回 None
fn convert_builtin<F: 'static>(raw: &str) -> Option<Result<F, ConvertError>> {
    let target = TypeId::of::<F>();

    // 字符串: 原样透传
    if target == TypeId::of::<String>() {
        return Some(cast_value(Box::new(raw.to_string())));
    }
    // 长整型
    if target == TypeId::of::<i64>() {
        return Some(parse_integer::<i64>(raw).and_then(|v| cast_value(Box::new(v))));
    }
    // 整型
    if target == TypeId::of::<i32>() {
        return Some(parse_integer::<i32>(raw).and_then(|v| cast_value(Box::new(v))));
    }
    // 短整型
    if target == TypeId::of::<i16>() {
        return Some(parse_integer::<i16>(raw).and_then(|v| cast_value(Box::new(v))));
    }
    // 字符型: 要求恰好一个字符
    if target == TypeId::of::<char>() {
        return Some(parse_char(raw).and_then(|v| cast_value(Box::new(v))));
    }
    // 日期时间型
    if target == TypeId::of::<NaiveDateTime>() {
        return Some(parse_datetime(raw).and_then(|v| cast_value(Box::new(v))));
    }
    // 时间戳型（UTC）
    if target == TypeId::of::<DateTime<Utc>>() {
        return Some(
            parse_datetime(raw)
                .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
                .and_then(|v| cast_value(Box::new(v))),
        );
    }

    None
}

/// 查询自定义类型注册表并委托解析
fn convert_registered<F: 'static>(raw: &str) -> Result<F, ConvertError> {
    let target = TypeId::of::<F>();
    let types = USER_TYPES.read().unwrap_or_else(PoisonError::into_inner);

    for entry in types.iter() {
        if entry.type_id == target {
            let value = (entry.parse)(raw)?;
            return cast_value(value);
        }
    }

    Err(ConvertError::UnsupportedType(any::type_name::<F>()))
}

/// 将擦除后的值还原为目标类型
fn cast_value<F: 'static>(value: Box<dyn Any>) -> Result<F, ConvertError> {
    value
        .downcast::<F>()
        .map(|boxed| *boxed)
        .map_err(|_| ConvertError::TypeMismatch(any::type_name::<F>()))
}

// ==========================================
// 内置解析函数
// ==========================================

/// 严格十进制整数解析（不接受千分位分隔符, 溢出即失败）
fn parse_integer<I>(raw: &str) -> Result<I, ConvertError>
where
    I: FromStr<Err = ParseIntError> + 'static,
{
    raw.parse::<I>().map_err(|_| ConvertError::InvalidInteger {
        target: any::type_name::<I>(),
        value: raw.to_string(),
    })
}

/// 单字符解析, 多字节 UTF-8 字符算一个字符
fn parse_char(raw: &str) -> Result<char, ConvertError> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(ConvertError::InvalidChar(raw.to_string())),
    }
}

/// 固定格式日期时间解析
fn parse_datetime(raw: &str) -> Result<NaiveDateTime, ConvertError> {
    NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT)
        .map_err(|_| ConvertError::InvalidDateTime(raw.to_string()))
}
