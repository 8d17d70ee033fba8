use tokio_postgres::Row;
use crate::postgres_client_wrapper::FromRow;
use crate::schema_reader::define_working_query;

pub struct SchemaResult {
    pub name: String,
}

impl FromRow for SchemaResult {
    fn from_row(row: Row) -> crate::Result<Self> {
        Ok(Self {
            name: row.try_get(0)?,
        })
    }
}

//language=postgresql
define_working_query!(get_schemas, SchemaResult, (), r#"
select n.nspname::text as name
from pg_namespace n
         left join pg_depend dep on dep.objid = n.oid
where (n.oid > 16384 or n.nspname = 'public')
    and (dep.objid is null or dep.deptype <> 'e')
order by n.nspname;
"#);
