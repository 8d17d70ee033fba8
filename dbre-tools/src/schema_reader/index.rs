use tokio_postgres::Row;
use crate::postgres_client_wrapper::FromRow;
use crate::schema_reader::define_working_query;
use crate::{Index, INDEX_CLUSTERED, INDEX_HASHED, INDEX_OTHER};

/// One key column of an index. Expression columns carry the expression as their name.
#[derive(Debug, Eq, PartialEq)]
pub struct IndexColumnResult {
    pub index_name: String,
    pub column_name: String,
    pub non_unique: bool,
    pub is_hashed: bool,
    pub is_clustered: bool,
}

impl FromRow for IndexColumnResult {
    fn from_row(row: Row) -> crate::Result<Self> {
        Ok(IndexColumnResult {
            index_name: row.try_get(0)?,
            column_name: row.try_get(1)?,
            non_unique: row.try_get(2)?,
            is_hashed: row.try_get(3)?,
            is_clustered: row.try_get(4)?,
        })
    }
}

impl IndexColumnResult {
    pub fn sort_type(&self) -> i16 {
        if self.is_hashed {
            INDEX_HASHED
        } else if self.is_clustered {
            INDEX_CLUSTERED
        } else {
            INDEX_OTHER
        }
    }

    pub fn to_index(&self) -> Index {
        Index {
            name: self.index_name.clone(),
            column_name: self.column_name.clone(),
            non_unique: self.non_unique,
            sort_type: self.sort_type(),
        }
    }
}

//language=postgresql
define_working_query!(get_indexes, IndexColumnResult, (schema: &str, table: &str), r#"
select idx.relname::text                                                  as index_name,
       (case
            when key.attnum <> 0 then att.attname::text
            else pg_get_indexdef(ix.indexrelid, key.ord::int4, true)::text
           end)                                                           as column_name,
       not ix.indisunique                                                 as non_unique,
       am.amname = 'hash'                                                 as is_hashed,
       ix.indisclustered                                                  as is_clustered
from pg_index ix
         join pg_class cl on ix.indrelid = cl.oid
         join pg_namespace ns on ns.oid = cl.relnamespace
         join pg_class idx on ix.indexrelid = idx.oid
         join pg_am am on idx.relam = am.oid
         cross join lateral unnest(ix.indkey::int2[]) with ordinality as key(attnum, ord)
         left join pg_attribute att on att.attrelid = ix.indrelid and att.attnum = key.attnum
where ns.nspname::text = $1
  and cl.relname::text = $2
  and key.ord <= ix.indnkeyatts
order by idx.relname, key.ord;
"#);

#[cfg(test)]
mod tests {
    use super::*;

    fn index_column(is_hashed: bool, is_clustered: bool) -> IndexColumnResult {
        IndexColumnResult {
            index_name: "person_idx".to_string(),
            column_name: "name".to_string(),
            non_unique: true,
            is_hashed,
            is_clustered,
        }
    }

    #[test]
    fn sort_type_follows_access_method_then_clustering() {
        assert_eq!(index_column(true, true).sort_type(), INDEX_HASHED);
        assert_eq!(index_column(false, true).sort_type(), INDEX_CLUSTERED);
        assert_eq!(index_column(false, false).to_index().sort_type, INDEX_OTHER);
    }
}
