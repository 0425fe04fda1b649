// ==========================================
// 表格导入工具 - SQL 构建工具模块
// ==========================================
// 职责: 按列名集合动态生成参数化 SQL
// 约束: 标识符统一加双引号转义，值一律走 ?N 占位符
// ==========================================

/// 转义 SQL 标识符（表名 / 列名）
///
/// # 示例
/// ```
/// use sheet_upsert::repository::sql_builder::quote_identifier;
///
/// assert_eq!(quote_identifier("fe_users"), "\"fe_users\"");
/// assert_eq!(quote_identifier("a\"b"), "\"a\"\"b\"");
/// ```
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// 构建 INSERT 语句
///
/// # 参数
/// - `table`: 表名
/// - `columns`: 列名（顺序即占位符顺序）
///
/// # 示例
/// ```
/// use sheet_upsert::repository::sql_builder::build_insert_sql;
///
/// let sql = build_insert_sql("fe_users", &["name", "age"]);
/// assert_eq!(sql, "INSERT INTO \"fe_users\" (\"name\", \"age\") VALUES (?1, ?2)");
/// ```
pub fn build_insert_sql<S: AsRef<str>>(table: &str, columns: &[S]) -> String {
    let column_list = columns
        .iter()
        .map(|c| quote_identifier(c.as_ref()))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=columns.len())
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_identifier(table),
        column_list,
        placeholders
    )
}

/// 构建 UPDATE 语句
///
/// SET 列占用 ?1..?n，WHERE 列紧随其后 ?n+1..?n+m。
///
/// # 示例
/// ```
/// use sheet_upsert::repository::sql_builder::build_update_sql;
///
/// let sql = build_update_sql("fe_users", &["name", "age"], &["name"]);
/// assert_eq!(
///     sql,
///     "UPDATE \"fe_users\" SET \"name\" = ?1, \"age\" = ?2 WHERE \"name\" = ?3"
/// );
/// ```
pub fn build_update_sql<S: AsRef<str>, W: AsRef<str>>(
    table: &str,
    set_columns: &[S],
    where_columns: &[W],
) -> String {
    let assignments = set_columns
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{} = ?{}", quote_identifier(c.as_ref()), i + 1))
        .collect::<Vec<_>>()
        .join(", ");

    let mut builder = SqlQueryBuilder::new(&format!(
        "UPDATE {} SET {}",
        quote_identifier(table),
        assignments
    ))
    .starting_at(set_columns.len() + 1);
    for column in where_columns {
        builder = builder.where_eq(column.as_ref());
    }

    builder.build()
}

/// SQL 查询构建器（流式 API）
///
/// 只支持等值条件的合取（AND），占位符按添加顺序自动编号。
///
/// # 示例
/// ```
/// use sheet_upsert::repository::sql_builder::SqlQueryBuilder;
///
/// let sql = SqlQueryBuilder::new("SELECT COUNT(*) FROM \"fe_users\"")
///     .where_eq("username")
///     .where_eq("pid")
///     .build();
///
/// assert_eq!(
///     sql,
///     "SELECT COUNT(*) FROM \"fe_users\" WHERE \"username\" = ?1 AND \"pid\" = ?2"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct SqlQueryBuilder {
    select_clause: String,
    where_clauses: Vec<String>,
    next_placeholder: usize,
}

impl SqlQueryBuilder {
    /// 创建新的 SQL 查询构建器
    pub fn new(select: &str) -> Self {
        Self {
            select_clause: select.to_string(),
            where_clauses: Vec::new(),
            next_placeholder: 1,
        }
    }

    /// 设置第一个 WHERE 占位符的编号
    pub fn starting_at(mut self, placeholder: usize) -> Self {
        self.next_placeholder = placeholder;
        self
    }

    /// 添加等值条件 `"column" = ?N`
    pub fn where_eq(mut self, column: &str) -> Self {
        self.where_clauses.push(format!(
            "{} = ?{}",
            quote_identifier(column),
            self.next_placeholder
        ));
        self.next_placeholder += 1;
        self
    }

    /// 构建最终的 SQL 语句
    pub fn build(&self) -> String {
        let mut sql = self.select_clause.clone();

        // 添加 WHERE 条件
        if !self.where_clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_clauses.join(" AND "));
        }

        sql
    }
}

// ==========================================
// 单元测试
// ==========================================
