// ==========================================
// Excel 实体映射引擎 - 实体映射集成测试
// ==========================================
// 覆盖: 全类型字段填充 / 必须列与必须字段失败语义 /
//       可选字段默认值 / 全有或全无
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use excel2entity::{EntitySchema, ExcelEntity, ExcelError, RawCell, SheetGrid};

// ==========================================
// 测试实体
// ==========================================

#[derive(Debug, Default, PartialEq)]
struct Employee {
    id: i64,
    name: String,
    age: i32,
    level: i16,
    gender: char,
    birthday: Option<NaiveDateTime>,
    remark: String,
}

impl ExcelEntity for Employee {
    fn schema() -> EntitySchema<Self> {
        EntitySchema::builder()
            .field("工号", true, |e: &mut Employee, v: i64| e.id = v)
            .field("姓名", true, |e: &mut Employee, v: String| e.name = v)
            .field("年龄", true, |e: &mut Employee, v: i32| e.age = v)
            .field("职级", false, |e: &mut Employee, v: i16| e.level = v)
            .field("性别", false, |e: &mut Employee, v: char| e.gender = v)
            .field("生日", false, |e: &mut Employee, v: NaiveDateTime| {
                e.birthday = Some(v)
            })
            .field("备注", false, |e: &mut Employee, v: String| e.remark = v)
            .build()
    }
}

// 空描述实体: 不从表格取任何字段
#[derive(Debug, Default, PartialEq)]
struct Placeholder;

impl ExcelEntity for Placeholder {
    fn schema() -> EntitySchema<Self> {
        EntitySchema::builder().build()
    }
}

// ==========================================
// 辅助函数: 文本网格构造
// ==========================================

fn grid(headers: Vec<&str>, rows: Vec<Vec<&str>>) -> SheetGrid {
    SheetGrid::new(
        headers
            .into_iter()
            .map(|cell| RawCell::Text(cell.to_string()))
            .collect(),
        rows.into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| RawCell::Text(cell.to_string()))
                    .collect()
            })
            .collect(),
    )
}

fn birthday(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

// ==========================================
// 全类型字段填充
// ==========================================

#[test]
fn test_full_mapping_all_field_types() {
    let grid = grid(
        vec!["工号", "姓名", "年龄", "职级", "性别", "生日", "备注"],
        vec![vec![
            "9000000000",
            "张三",
            "23",
            "3",
            "男",
            "2013-11-28 10:20:53",
            "组长",
        ]],
    );

    let employees: Vec<Employee> = grid.to_entities().unwrap();
    assert_eq!(
        employees[0],
        Employee {
            id: 9_000_000_000,
            name: "张三".to_string(),
            age: 23,
            level: 3,
            gender: '男',
            birthday: Some(birthday(2013, 11, 28, 10, 20, 53)),
            remark: "组长".to_string(),
        }
    );
}

#[test]
fn test_entity_count_and_order_follow_rows() {
    let grid = grid(
        vec!["工号", "姓名", "年龄", "备注"],
        vec![
            vec!["1", "张三", "23", ""],
            vec!["2", "李四", "31", ""],
            vec!["3", "王五", "28", ""],
        ],
    );

    let employees: Vec<Employee> = grid.to_entities().unwrap();
    assert_eq!(employees.len(), 3);
    let names: Vec<&str> = employees.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["张三", "李四", "王五"]);
}

#[test]
fn test_header_only_grid_maps_to_empty_list() {
    let grid = grid(vec!["工号", "姓名", "年龄", "备注"], vec![]);

    let employees: Vec<Employee> = grid.to_entities().unwrap();
    assert!(employees.is_empty());
}

#[test]
fn test_empty_schema_maps_rows_to_defaults() {
    let grid = grid(
        vec!["工号", "姓名", "年龄", "备注"],
        vec![vec!["1", "张三", "23", ""], vec!["2", "李四", "31", ""]],
    );

    // 空描述合法: 不绑定任何列, 每行产出一个默认实体
    assert_eq!(Placeholder::schema().field_count(), 0);
    let rows: Vec<Placeholder> = grid.to_entities().unwrap();
    assert_eq!(rows, vec![Placeholder, Placeholder]);
}

// ==========================================
// 必须列与必须字段
// ==========================================

#[test]
fn test_missing_required_column_aborts() {
    // 表头没有年龄列, 任何行都不应被映射
    let grid = grid(
        vec!["工号", "姓名", "备注", "性别"],
        vec![vec!["1", "张三", "组长", "男"]],
    );

    let result: Result<Vec<Employee>, ExcelError> = grid.to_entities();
    match result {
        Err(ExcelError::RequiredColumnMissing(column)) => assert_eq!(column, "年龄"),
        other => panic!("期望必须列缺失错误, 实际 {other:?}"),
    }
}

#[test]
fn test_required_value_error_reports_position() {
    let grid = grid(
        vec!["工号", "姓名", "年龄", "备注"],
        vec![
            vec!["1", "张三", "23", ""],
            vec!["2", "李四", "三十一", ""],
        ],
    );

    let err = grid.to_entities::<Employee>().unwrap_err();
    match &err {
        ExcelError::Row { row, column, .. } => {
            // 表头占第 1 行, 出错数据是第 2 条
            assert_eq!(*row, 3);
            assert_eq!(column, "年龄");
        }
        other => panic!("期望行级错误, 实际 {other:?}"),
    }
    // 错误信息里带行号与列名, 便于直接定位
    let message = err.to_string();
    assert!(message.contains("行 3"), "实际信息: {message}");
    assert!(message.contains("年龄"), "实际信息: {message}");
}

#[test]
fn test_mapping_is_all_or_nothing() {
    let grid = grid(
        vec!["工号", "姓名", "年龄", "备注"],
        vec![
            vec!["1", "张三", "23", ""],
            vec!["2", "李四", "abc", ""],
            vec!["3", "王五", "28", ""],
        ],
    );

    // 任一行失败即整体失败, 不产出前两行的部分结果
    assert!(grid.to_entities::<Employee>().is_err());
}

#[test]
fn test_empty_required_string_maps_to_empty() {
    let grid = grid(
        vec!["工号", "姓名", "年龄", "备注"],
        vec![vec!["1", "", "23", ""]],
    );

    let employees: Vec<Employee> = grid.to_entities().unwrap();
    assert_eq!(employees[0].name, "");
}

#[test]
fn test_empty_required_integer_fails() {
    let grid = grid(
        vec!["工号", "姓名", "年龄", "备注"],
        vec![vec!["1", "张三", "", ""]],
    );

    assert!(matches!(
        grid.to_entities::<Employee>(),
        Err(ExcelError::Row { .. })
    ));
}

// ==========================================
// 可选字段
// ==========================================

#[test]
fn test_optional_bad_values_keep_defaults() {
    let grid = grid(
        vec!["工号", "姓名", "年龄", "职级", "性别", "生日", "备注"],
        vec![vec![
            "1",
            "张三",
            "23",
            "非数字",
            "男女",
            "2013/11/28",
            "组长",
        ]],
    );

    let employees: Vec<Employee> = grid.to_entities().unwrap();
    // 可选字段逐个失败但整行照常产出
    assert_eq!(employees[0].level, 0);
    assert_eq!(employees[0].gender, char::default());
    assert_eq!(employees[0].birthday, None);
    assert_eq!(employees[0].age, 23);
    assert_eq!(employees[0].remark, "组长");
}

#[test]
fn test_absent_optional_columns_keep_defaults() {
    let grid = grid(
        vec!["工号", "姓名", "年龄", "无关列"],
        vec![vec!["1", "张三", "23", "x"]],
    );

    let employees: Vec<Employee> = grid.to_entities().unwrap();
    assert_eq!(employees[0].level, 0);
    assert_eq!(employees[0].birthday, None);
    assert_eq!(employees[0].remark, "");
}

// ==========================================
// 表头形态
// ==========================================

#[test]
fn test_duplicate_column_uses_first_occurrence() {
    let grid = grid(
        vec!["工号", "姓名", "年龄", "年龄"],
        vec![vec!["1", "张三", "23", "99"]],
    );

    let employees: Vec<Employee> = grid.to_entities().unwrap();
    assert_eq!(employees[0].age, 23);
}

#[test]
fn test_unrelated_extra_columns_ignored() {
    let grid = grid(
        vec!["部门", "工号", "姓名", "年龄", "车间"],
        vec![vec!["精整", "7", "赵六", "40", "二车间"]],
    );

    let employees: Vec<Employee> = grid.to_entities().unwrap();
    assert_eq!(employees[0].id, 7);
    assert_eq!(employees[0].name, "赵六");
    assert_eq!(employees[0].age, 40);
}
