use tokio_postgres::Row;
use crate::postgres_client_wrapper::FromRow;
use crate::schema_reader::define_working_query;
use crate::PrimaryKey;

#[derive(Debug, Eq, PartialEq)]
pub struct PrimaryKeyColumnResult {
    pub constraint_name: String,
    pub column_name: String,
    pub key_sequence: i32,
}

impl FromRow for PrimaryKeyColumnResult {
    fn from_row(row: Row) -> crate::Result<Self> {
        Ok(PrimaryKeyColumnResult {
            constraint_name: row.try_get(0)?,
            column_name: row.try_get(1)?,
            key_sequence: row.try_get(2)?,
        })
    }
}

impl PrimaryKeyColumnResult {
    pub fn to_primary_key(&self) -> PrimaryKey {
        PrimaryKey {
            name: self.constraint_name.clone(),
            column_name: self.column_name.clone(),
            key_sequence: self.key_sequence,
        }
    }
}

//language=postgresql
define_working_query!(get_primary_keys, PrimaryKeyColumnResult, (schema: &str, table: &str), r#"
select con.conname::text   as constraint_name,
       attr.attname::text  as column_name,
       key.ord::int4       as key_sequence
from pg_constraint con
         join pg_class cl on con.conrelid = cl.oid
         join pg_namespace ns on ns.oid = cl.relnamespace
         cross join lateral unnest(con.conkey) with ordinality as key(attnum, ord)
         join pg_attribute attr on attr.attrelid = cl.oid and attr.attnum = key.attnum
where con.contype = 'p'
  and ns.nspname::text = $1
  and cl.relname::text = $2
order by key.ord;
"#);
