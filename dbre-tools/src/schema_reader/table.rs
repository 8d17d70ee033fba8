use std::str::FromStr;
use tokio_postgres::Row;
use crate::postgres_client_wrapper::FromRow;
use crate::schema_reader::define_working_query;
use crate::TableType;

#[derive(Debug, Eq, PartialEq)]
pub struct TablesResult {
    pub catalog_name: String,
    pub schema_name: String,
    pub table_name: String,
    pub table_type: String,
}

impl FromRow for TablesResult {
    fn from_row(row: Row) -> crate::Result<Self> {
        Ok(TablesResult {
            catalog_name: row.try_get(0)?,
            schema_name: row.try_get(1)?,
            table_name: row.try_get(2)?,
            table_type: row.try_get(3)?,
        })
    }
}

impl TablesResult {
    pub fn table_type(&self) -> crate::Result<TableType> {
        TableType::from_str(&self.table_type)
    }
}

//language=postgresql
define_working_query!(get_tables, TablesResult, (catalog: &str, schema: &str, table: &str), r#"
select t.table_catalog::text,
       t.table_schema::text,
       t.table_name::text,
       t.table_type::text
from information_schema.tables t
where t.table_catalog::text like $1
  and t.table_schema::text like $2
  and t.table_name::text like $3
  and t.table_schema not in ('pg_catalog', 'pg_toast', 'information_schema')
  and t.table_type in ('BASE TABLE', 'VIEW')
order by t.table_schema, t.table_name;
"#);
