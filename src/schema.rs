// ==========================================
// Excel 实体映射引擎 - 实体结构描述
// ==========================================
// 职责: 实体字段 ↔ 表头列名的声明式绑定
// 依据: 列名 + 必须标志 + 赋值函数三元组
// 红线: 绑定提取快速失败, 必须列缺失立即报错
// ==========================================

use crate::convert::convert;
use crate::error::{ConvertError, ExcelError};
use crate::grid;

// ==========================================
// ExcelEntity - 可映射实体接口
// ==========================================
/// 可从表格数据行构造的实体类型
///
/// 实体通过 [`EntitySchema`] 声明自身字段与表头列名的对应关系,
/// 映射时逐行构造 `Default` 初值并按描述填充字段。
///
/// # 示例
/// ```
/// use excel2entity::{EntitySchema, ExcelEntity};
///
/// #[derive(Default)]
/// struct Person {
///     name: String,
///     age: i32,
/// }
///
/// impl ExcelEntity for Person {
///     fn schema() -> EntitySchema<Self> {
///         EntitySchema::builder()
///             .field("姓名", true, |p: &mut Person, v: String| p.name = v)
///             .field("年龄", false, |p: &mut Person, v: i32| p.age = v)
///             .build()
///     }
/// }
/// ```
pub trait ExcelEntity: Default {
    /// 实体的字段绑定描述
    fn schema() -> EntitySchema<Self>;
}

// ==========================================
// EntitySchema - 字段绑定描述
// ==========================================

/// 赋值函数: 转换单元格字符串并写入实体字段
type ApplyFn<T> = Box<dyn Fn(&mut T, &str) -> Result<(), ConvertError> + Send + Sync>;

pub(crate) struct ColumnSpec<T> {
    pub(crate) column: String,
    pub(crate) required: bool,
    pub(crate) apply: ApplyFn<T>,
}

/// 实体字段绑定描述, 按声明顺序持有各字段的列规格
pub struct EntitySchema<T> {
    columns: Vec<ColumnSpec<T>>,
}

impl<T> EntitySchema<T> {
    /// 创建空的描述构建器
    pub fn builder() -> EntitySchemaBuilder<T> {
        EntitySchemaBuilder {
            columns: Vec::new(),
        }
    }

    /// 已声明的字段数
    pub fn field_count(&self) -> usize {
        self.columns.len()
    }

    /// 对照表头解析各字段的列下标
    ///
    /// # 规则
    /// - 按字段声明顺序逐个解析, 首个缺失的必须列立即报错
    /// - 可选列缺失 → 绑定保留, 列下标为 None, 映射时跳过
    pub(crate) fn bind<'schema>(
        &'schema self,
        headers: &[String],
    ) -> Result<Vec<FieldBinding<'schema, T>>, ExcelError> {
        let mut bindings = Vec::with_capacity(self.columns.len());
        for spec in &self.columns {
            let column_index = grid::index_of_column(headers, &spec.column);
            if column_index.is_none() && spec.required {
                return Err(ExcelError::RequiredColumnMissing(spec.column.clone()));
            }
            bindings.push(FieldBinding { column_index, spec });
        }
        Ok(bindings)
    }
}

/// 字段与具体表头的绑定结果
pub(crate) struct FieldBinding<'schema, T> {
    pub(crate) column_index: Option<usize>,
    pub(crate) spec: &'schema ColumnSpec<T>,
}

// ==========================================
// EntitySchemaBuilder - 描述构建器
// ==========================================

/// [`EntitySchema`] 的构建器, 字段声明顺序即绑定与填充顺序
pub struct EntitySchemaBuilder<T> {
    columns: Vec<ColumnSpec<T>>,
}

impl<T: 'static> EntitySchemaBuilder<T> {
    /// 声明一个字段绑定
    ///
    /// # 参数
    /// - column: 表头列名, 精确匹配
    /// - required: 必须列标志, true 时列缺失导致整个映射失败
    /// - assign: 转换成功后把值写入实体字段的赋值函数
    pub fn field<V: 'static>(
        mut self,
        column: impl Into<String>,
        required: bool,
        assign: fn(&mut T, V),
    ) -> Self {
        self.columns.push(ColumnSpec {
            column: column.into(),
            required,
            apply: Box::new(move |entity, raw| {
                let value = convert::<V>(raw)?;
                assign(entity, value);
                Ok(())
            }),
        });
        self
    }

    pub fn build(self) -> EntitySchema<T> {
        EntitySchema {
            columns: self.columns,
        }
    }
}
