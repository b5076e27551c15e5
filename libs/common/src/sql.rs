//! SQL statement building blocks
//!
//! Statements are always parameterized: values travel in [`Statement::args`]
//! and are bound positionally (`$1`, `$2`, ...), never spliced into the text.
//! Table and column names, on the other hand, are placed into the text as
//! quoted identifiers and must come from server-side constants.

use chrono::{NaiveDate, NaiveTime};

/// A scalar value bound to a statement placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float(value)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(value: NaiveDate) -> Self {
        SqlValue::Date(value)
    }
}

impl From<NaiveTime> for SqlValue {
    fn from(value: NaiveTime) -> Self {
        SqlValue::Time(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlValue::Null, Into::into)
    }
}

/// Column assignments for a partial update, kept in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateFields {
    entries: Vec<(String, SqlValue)>,
}

impl UpdateFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `value` to `column`.
    ///
    /// Re-assigning a column replaces its value but keeps its original
    /// position, so the compiled placeholder order stays stable.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<SqlValue>) {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == column) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((column, value)),
        }
    }

    /// Builder-style variant of [`UpdateFields::set`]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.set(column, value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl IntoIterator for UpdateFields {
    type Item = (String, SqlValue);
    type IntoIter = std::vec::IntoIter<(String, SqlValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Statement text plus its positional arguments
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub args: Vec<SqlValue>,
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            args: Vec::new(),
        }
    }

    /// Append the argument for the next placeholder
    pub fn bind(mut self, value: impl Into<SqlValue>) -> Self {
        self.args.push(value.into());
        self
    }
}

/// Compile a single-row partial update.
///
/// Produces `UPDATE "<table>" SET "<c1>"=$1, "<c2>"=$2 WHERE "<key>"=$3
/// RETURNING *` with the field values in assignment order followed by the
/// key value. An empty `fields` still compiles (to an empty `SET` list);
/// callers that target engines rejecting that must check first.
///
/// # Example
///
/// ```
/// use common::sql::{UpdateFields, SqlValue, sql_for_partial_update};
///
/// let fields = UpdateFields::new().with("name", "Jane");
/// let statement = sql_for_partial_update("users", fields, "userid", "u1");
///
/// assert_eq!(
///     statement.sql,
///     r#"UPDATE "users" SET "name"=$1 WHERE "userid"=$2 RETURNING *"#
/// );
/// assert_eq!(
///     statement.args,
///     vec![SqlValue::from("Jane"), SqlValue::from("u1")]
/// );
/// ```
pub fn sql_for_partial_update(
    table: &str,
    fields: UpdateFields,
    key_column: &str,
    key_value: impl Into<SqlValue>,
) -> Statement {
    let mut assignments = Vec::with_capacity(fields.len());
    let mut args = Vec::with_capacity(fields.len() + 1);

    for (idx, (column, value)) in fields.into_iter().enumerate() {
        assignments.push(format!("\"{}\"=${}", column, idx + 1));
        args.push(value);
    }

    let sql = format!(
        "UPDATE \"{}\" SET {} WHERE \"{}\"=${} RETURNING *",
        table,
        assignments.join(", "),
        key_column,
        assignments.len() + 1
    );
    args.push(key_value.into());

    Statement { sql, args }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generates_query_and_values() {
        let fields = UpdateFields::new()
            .with("firstName", "John")
            .with("age", 30_i64);

        let statement = sql_for_partial_update("users", fields, "id", 1_i64);

        assert_eq!(
            statement.sql,
            r#"UPDATE "users" SET "firstName"=$1, "age"=$2 WHERE "id"=$3 RETURNING *"#
        );
        assert_eq!(
            statement.args,
            vec![
                SqlValue::Text("John".to_string()),
                SqlValue::Int(30),
                SqlValue::Int(1)
            ]
        );
    }

    #[test]
    fn test_single_field_update() {
        let fields = UpdateFields::new().with("age", 30_i64);

        let statement = sql_for_partial_update("users", fields, "id", 1_i64);

        assert_eq!(
            statement.sql,
            r#"UPDATE "users" SET "age"=$1 WHERE "id"=$2 RETURNING *"#
        );
        assert_eq!(statement.args, vec![SqlValue::Int(30), SqlValue::Int(1)]);
    }

    #[test]
    fn test_empty_fields_compile_to_empty_set_list() {
        let statement = sql_for_partial_update("users", UpdateFields::new(), "id", 1_i64);

        assert_eq!(
            statement.sql,
            r#"UPDATE "users" SET  WHERE "id"=$1 RETURNING *"#
        );
        assert_eq!(statement.args, vec![SqlValue::Int(1)]);
    }

    #[test]
    fn test_user_name_update_scenario() {
        let fields = UpdateFields::new().with("name", "Jane");

        let statement = sql_for_partial_update("users", fields, "userid", "u1");

        assert_eq!(
            statement.sql,
            r#"UPDATE "users" SET "name"=$1 WHERE "userid"=$2 RETURNING *"#
        );
        assert_eq!(
            statement.args,
            vec![SqlValue::from("Jane"), SqlValue::from("u1")]
        );
    }

    #[test]
    fn test_placeholder_count_and_argument_order() {
        let fields = UpdateFields::new()
            .with("status", "Approved")
            .with("amount", 250.0)
            .with("eventname", None::<String>)
            .with("requestdate", NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        let expected_values: Vec<SqlValue> = fields.clone().into_iter().map(|(_, v)| v).collect();

        let statement = sql_for_partial_update("calendareventrequests", fields, "requestid", "r1");

        assert_eq!(statement.sql.matches('$').count(), 5);
        for idx in 1..=5 {
            assert!(statement.sql.contains(&format!("=${}", idx)));
        }
        assert!(!statement.sql.contains("$6"));

        let mut expected = expected_values;
        expected.push(SqlValue::from("r1"));
        assert_eq!(statement.args, expected);
    }

    #[test]
    fn test_compilation_is_deterministic() {
        let fields = UpdateFields::new()
            .with("name", "Jane")
            .with("email", "jane@example.com")
            .with("artistname", Some("DJ Jane"));

        let first = sql_for_partial_update("users", fields.clone(), "userid", "u1");
        let second = sql_for_partial_update("users", fields, "userid", "u1");

        assert_eq!(first, second);
    }

    #[test]
    fn test_values_never_reach_statement_text() {
        let fields = UpdateFields::new().with("name", "Robert'); DROP TABLE users;--");

        let statement = sql_for_partial_update("users", fields, "userid", "u1");

        assert!(!statement.sql.contains("DROP TABLE"));
        assert_eq!(
            statement.args[0],
            SqlValue::from("Robert'); DROP TABLE users;--")
        );
    }

    #[test]
    fn test_reassigning_a_column_keeps_its_position() {
        let mut fields = UpdateFields::new().with("name", "Jane").with("password", "");
        fields.set("password", "$argon2id$existing");
        fields.set("location", "Lisbon");

        assert_eq!(
            fields.columns().collect::<Vec<_>>(),
            vec!["name", "password", "location"]
        );
        assert_eq!(
            fields.get("password"),
            Some(&SqlValue::from("$argon2id$existing"))
        );
    }

    #[test]
    fn test_option_converts_to_null() {
        assert_eq!(SqlValue::from(None::<String>), SqlValue::Null);
        assert_eq!(SqlValue::from(Some(2.5)), SqlValue::Float(2.5));
    }

    #[test]
    fn test_statement_builder_binds_in_order() {
        let statement = Statement::new("SELECT userid FROM users WHERE userid = $1 AND email = $2")
            .bind("u1")
            .bind("jane@example.com");

        assert_eq!(
            statement.args,
            vec![SqlValue::from("u1"), SqlValue::from("jane@example.com")]
        );
    }
}
