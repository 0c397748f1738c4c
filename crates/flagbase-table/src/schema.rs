/// Declarative description of one relational table owned by the store.
#[derive(Debug, Clone)]
pub struct TableSchema {
    /// The name of the table.
    pub name: &'static str,
    /// Ordered list of column definitions.
    pub columns: Vec<ColumnDef>,
    /// Secondary indexes as `(index_name, column)` pairs.
    pub indexes: Vec<(&'static str, &'static str)>,
}

/// Defines a single column within a table schema.
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub name: &'static str,
    pub col_type: ColumnType,
    pub primary_key: bool,
    /// Literal SQL default, e.g. `"1"`.
    pub default: Option<&'static str>,
}

impl ColumnDef {
    fn new(name: &'static str, col_type: ColumnType) -> Self {
        Self { name, col_type, primary_key: false, default: None }
    }

    fn primary(mut self) -> Self {
        self.primary_key = true;
        self
    }

    fn with_default(mut self, sql: &'static str) -> Self {
        self.default = Some(sql);
        self
    }
}

/// Logical column types used by flagbase tables.
///
/// Each type maps to an underlying SQLite storage type:
/// - `Uuid` -> TEXT (server-generated UUID v4)
/// - `Text` -> TEXT
/// - `Real` -> REAL
/// - `Bool` -> INTEGER (0/1)
/// - `Json` -> TEXT (serialized JSON document)
/// - `Timestamp` -> TEXT (ISO 8601, UTC offset)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Uuid,
    Text,
    Real,
    Bool,
    Json,
    Timestamp,
}

impl ColumnType {
    /// Returns the SQLite type affinity string for this column type.
    pub fn to_sqlite_type(self) -> &'static str {
        match self {
            ColumnType::Uuid => "TEXT",
            ColumnType::Text => "TEXT",
            ColumnType::Real => "REAL",
            ColumnType::Bool => "INTEGER",
            ColumnType::Json => "TEXT",
            ColumnType::Timestamp => "TEXT",
        }
    }
}

impl TableSchema {
    /// Renders the `CREATE TABLE IF NOT EXISTS` statement plus its indexes.
    pub fn create_sql(&self) -> String {
        let col_defs: Vec<String> = self
            .columns
            .iter()
            .map(|col| {
                let mut def = format!("{} {}", col.name, col.col_type.to_sqlite_type());
                if col.primary_key {
                    def.push_str(" PRIMARY KEY");
                } else {
                    def.push_str(" NOT NULL");
                }
                if let Some(default) = col.default {
                    def.push_str(" DEFAULT ");
                    def.push_str(default);
                }
                def
            })
            .collect();

        let mut sql = format!(
            "CREATE TABLE IF NOT EXISTS {} ({});",
            self.name,
            col_defs.join(", ")
        );
        for (index, column) in &self.indexes {
            sql.push_str(&format!(
                "\nCREATE INDEX IF NOT EXISTS {} ON {} ({});",
                index, self.name, column
            ));
        }
        sql
    }
}

/// Schema of the `items` table.
pub fn items_schema() -> TableSchema {
    TableSchema {
        name: "items",
        columns: vec![
            ColumnDef::new("id", ColumnType::Uuid).primary(),
            ColumnDef::new("name", ColumnType::Text),
            ColumnDef::new("value", ColumnType::Real),
            ColumnDef::new("created_at", ColumnType::Timestamp),
        ],
        indexes: vec![],
    }
}

/// Schema of the `features` table.
pub fn features_schema() -> TableSchema {
    TableSchema {
        name: "features",
        columns: vec![
            ColumnDef::new("id", ColumnType::Uuid).primary(),
            ColumnDef::new("name", ColumnType::Text),
            ColumnDef::new("value", ColumnType::Json),
            ColumnDef::new("resource_id", ColumnType::Text),
            ColumnDef::new("active", ColumnType::Bool).with_default("1"),
            ColumnDef::new("created_at", ColumnType::Timestamp),
        ],
        indexes: vec![("idx_features_resource_id", "resource_id")],
    }
}

/// Every table the store creates on open.
pub fn all_schemas() -> Vec<TableSchema> {
    vec![items_schema(), features_schema()]
}
