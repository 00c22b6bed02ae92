// ==========================================
// Excel 实体映射引擎 - 核心库
// ==========================================
// 技术栈: calamine + csv + chrono
// 定位: 表格数据到类型化实体的声明式映射
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 单元格层 - 原始值与归一化
pub mod cell;

// 网格层 - 表头与数据行
pub mod grid;

// 转换层 - 类型转换注册表
pub mod convert;

// 描述层 - 实体字段绑定
pub mod schema;

// 映射层 - 数据行到实体（SheetGrid::to_entities）
mod mapper;

// 读取层 - Excel / CSV 文件
pub mod reader;

// 错误类型
pub mod error;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 单元格与网格
pub use cell::{RawCell, DATETIME_FORMAT};
pub use grid::{SheetGrid, MIN_COLUMN_COUNT};

// 实体描述
pub use schema::{EntitySchema, EntitySchemaBuilder, ExcelEntity};

// 类型转换
pub use convert::{convert, register_type, ExcelType};

// 文件读取
pub use reader::{
    read_csv, read_excel, read_excel_sheet, read_file, CsvReader, ExcelReader, SheetReader,
    UniversalReader,
};

// 错误类型
pub use error::{ConvertError, ExcelError, ExcelResult};

// ==========================================
// 常量定义
// ==========================================

// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 库名称
pub const APP_NAME: &str = "Excel 实体映射引擎";

// ==========================================
// 预编译检查
// ==========================================
