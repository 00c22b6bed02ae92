// ==========================================
// Excel 实体映射引擎 - 数据行映射
// ==========================================
// 职责: 数据行 → 实体对象的逐行构造
// 依据: 实体描述绑定结果, 行内按字段声明顺序填充
// 红线: 全有或全无, 任一必须字段失败则整体失败
// ==========================================

use crate::error::{ExcelError, ExcelResult};
use crate::grid::SheetGrid;
use crate::schema::{ExcelEntity, FieldBinding};
use tracing::{debug, instrument};

/// 表头占第 1 行, 首条数据行从第 2 行起编号
const DATA_ROW_OFFSET: usize = 2;

impl SheetGrid {
    /// 把全部数据行映射为实体列表
    ///
    /// # 规则
    /// - 先对照表头解析实体描述, 必须列缺失立即失败
    /// - 逐行构造 `Default` 初值并按字段声明顺序填充
    /// - 必须字段转换失败 → 带行号列名整体失败, 不产出部分结果
    /// - 可选字段转换失败或列缺失 → 字段保持默认值, 继续填充
    ///
    /// # 返回
    /// 实体列表, 条数与数据行数一致
    #[instrument(skip(self), fields(rows = self.row_count()))]
    pub fn to_entities<T: ExcelEntity>(&self) -> ExcelResult<Vec<T>> {
        let schema = T::schema();
        let bindings = schema.bind(self.headers())?;

        let mut entities = Vec::with_capacity(self.row_count());
        for (offset, row) in self.rows().iter().enumerate() {
            entities.push(map_row(row, &bindings, offset + DATA_ROW_OFFSET)?);
        }

        debug!("实体映射完成, 共 {} 条", entities.len());
        Ok(entities)
    }
}

/// 把单条数据行填充为实体
fn map_row<T: ExcelEntity>(
    row: &[String],
    bindings: &[FieldBinding<'_, T>],
    row_number: usize,
) -> ExcelResult<T> {
    let mut entity = T::default();

    for binding in bindings {
        // 可选列未绑定到表头, 跳过
        let Some(column_index) = binding.column_index else {
            continue;
        };
        let raw = row.get(column_index).map(String::as_str).unwrap_or("");

        if let Err(cause) = (binding.spec.apply)(&mut entity, raw) {
            if binding.spec.required {
                return Err(ExcelError::Row {
                    row: row_number,
                    column: binding.spec.column.clone(),
                    source: cause,
                });
            }
            debug!(
                "第 {} 行可选字段 {} 转换失败, 保持默认值: {}",
                row_number, binding.spec.column, cause
            );
        }
    }

    Ok(entity)
}
