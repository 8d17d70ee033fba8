use tokio_postgres::Row;
use crate::postgres_client_wrapper::FromRow;
use crate::schema_reader::define_working_query;
use crate::ForeignKeyColumn;

/// One column of a foreign key. The columns of a key arrive next to each other, in key order.
#[derive(Debug, Eq, PartialEq)]
pub struct ForeignKeyColumnResult {
    pub constraint_name: String,
    pub target_table_name: String,
    pub column_name: String,
    pub target_column_name: String,
    pub key_sequence: i32,
}

impl FromRow for ForeignKeyColumnResult {
    fn from_row(row: Row) -> crate::Result<Self> {
        Ok(ForeignKeyColumnResult {
            constraint_name: row.try_get(0)?,
            target_table_name: row.try_get(1)?,
            column_name: row.try_get(2)?,
            target_column_name: row.try_get(3)?,
            key_sequence: row.try_get(4)?,
        })
    }
}

impl ForeignKeyColumnResult {
    pub fn to_foreign_key_column(&self) -> ForeignKeyColumn {
        ForeignKeyColumn {
            name: self.column_name.clone(),
            referenced_column: self.target_column_name.clone(),
            key_sequence: self.key_sequence,
        }
    }
}

//language=postgresql
define_working_query!(get_foreign_keys, ForeignKeyColumnResult, (schema: &str, table: &str), r#"
select con.conname::text         as constraint_name,
       target.relname::text      as target_table_name,
       attr.attname::text        as column_name,
       target_attr.attname::text as target_column_name,
       key.ord::int4             as key_sequence
from pg_constraint con
         join pg_class cl on con.conrelid = cl.oid
         join pg_namespace ns on ns.oid = cl.relnamespace
         join pg_class target on con.confrelid = target.oid
         cross join lateral unnest(con.conkey, con.confkey) with ordinality as key(attnum, target_attnum, ord)
         join pg_attribute attr on attr.attrelid = cl.oid and attr.attnum = key.attnum
         join pg_attribute target_attr on target_attr.attrelid = target.oid and target_attr.attnum = key.target_attnum
where con.contype = 'f'
  and ns.nspname::text = $1
  and cl.relname::text = $2
order by con.conname, key.ord;
"#);
