use tokio_postgres::Row;
use crate::postgres_client_wrapper::FromRow;
use crate::schema_reader::define_working_query;
use crate::{default_postgres_column_size, default_postgres_decimal_digits, Column, SqlType};

#[derive(Debug, Eq, PartialEq)]
pub struct TableColumnsResult {
    pub column_name: String,
    pub type_name: String,
    pub is_nullable: bool,
    pub data_type_length: Option<i32>,
    pub numeric_precision: Option<i32>,
    pub numeric_scale: Option<i32>,
    pub comment: Option<String>,
}

impl FromRow for TableColumnsResult {
    fn from_row(row: Row) -> crate::Result<Self> {
        Ok(TableColumnsResult {
            column_name: row.try_get(0)?,
            type_name: row.try_get(1)?,
            is_nullable: row.try_get(2)?,
            data_type_length: row.try_get(3)?,
            numeric_precision: row.try_get(4)?,
            numeric_scale: row.try_get(5)?,
            comment: row.try_get(6)?,
        })
    }
}

impl TableColumnsResult {
    pub fn to_column(&self) -> Column {
        let type_name = self.type_name.as_str();

        let (column_size, decimal_digits) = match type_name {
            "numeric" => (
                self.numeric_precision.unwrap_or_else(|| default_postgres_column_size(type_name)),
                self.numeric_scale.unwrap_or_default(),
            ),
            _ => (
                self.data_type_length.unwrap_or_else(|| default_postgres_column_size(type_name)),
                default_postgres_decimal_digits(type_name),
            ),
        };

        Column {
            name: self.column_name.clone(),
            data_type: SqlType::from_postgres_type_name(type_name).code(),
            column_size,
            decimal_digits,
            nullable: self.is_nullable,
            remarks: self.comment.clone().filter(|c| !c.is_empty()),
            type_name: self.type_name.clone(),
            primary_key_position: None,
        }
    }
}

//language=postgresql
define_working_query!(get_columns, TableColumnsResult, (schema: &str, table: &str), r#"
select attr.attname::text,
       t.typname::text,
       not attr.attnotnull                                                        as is_nullable,
       information_schema._pg_char_max_length(attr.atttypid, attr.atttypmod)::int4 as data_type_length,
       information_schema._pg_numeric_precision(attr.atttypid, attr.atttypmod)::int4,
       information_schema._pg_numeric_scale(attr.atttypid, attr.atttypmod)::int4,
       col_description(cl.oid, attr.attnum)::text                                  as comment
from pg_attribute attr
         join pg_class cl on attr.attrelid = cl.oid
         join pg_namespace ns on ns.oid = cl.relnamespace
         join pg_type t on attr.atttypid = t.oid
where ns.nspname::text = $1
  and cl.relname::text = $2
  and attr.attnum > 0
  and not attr.attisdropped
order by attr.attname;
"#);

#[cfg(test)]
mod tests {
    use super::*;

    fn result(type_name: &str) -> TableColumnsResult {
        TableColumnsResult {
            column_name: "value".to_string(),
            type_name: type_name.to_string(),
            is_nullable: true,
            data_type_length: None,
            numeric_precision: None,
            numeric_scale: None,
            comment: None,
        }
    }

    #[test]
    fn sizes_come_from_the_type_modifier() {
        let varchar = TableColumnsResult { data_type_length: Some(50), ..result("varchar") }.to_column();
        assert_eq!((varchar.data_type, varchar.column_size, varchar.decimal_digits), (12, 50, 0));

        let numeric = TableColumnsResult { numeric_precision: Some(12), numeric_scale: Some(2), ..result("numeric") }.to_column();
        assert_eq!((numeric.data_type, numeric.column_size, numeric.decimal_digits), (2, 12, 2));
    }

    #[test]
    fn sizes_fall_back_to_type_defaults() {
        let int4 = TableColumnsResult { numeric_precision: Some(32), ..result("int4") }.to_column();
        assert_eq!((int4.data_type, int4.column_size, int4.decimal_digits), (4, 10, 0));

        let timestamp = result("timestamp").to_column();
        assert_eq!((timestamp.column_size, timestamp.decimal_digits), (29, 6));
    }

    #[test]
    fn empty_comments_are_no_remarks() {
        let column = TableColumnsResult { comment: Some("".to_string()), ..result("text") }.to_column();

        assert_eq!(column.remarks, None);
    }
}
