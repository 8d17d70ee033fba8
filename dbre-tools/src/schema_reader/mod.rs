use itertools::Itertools;
use tracing::{debug, instrument};
use crate::postgres_client_wrapper::PostgresClientWrapper;
use crate::schema_reader::foreign_key::ForeignKeyColumnResult;
use crate::schema_reader::table::TablesResult;
use crate::{table_map, ForeignKey, IdentifiableTable, IdentifierCase, Result, Table, TableMap};

mod filter;
mod foreign_key;
mod index;
mod primary_key;
mod schema;
mod table;
mod table_column;
#[cfg(test)]
pub mod tests;

pub use filter::TableFilter;

/// Reads tables from the catalog of a live postgres database.
pub struct SchemaReader<'a> {
    connection: &'a PostgresClientWrapper,
    identifier_case: IdentifierCase,
}

impl SchemaReader<'_> {
    /// `identifier_case` is how the connected database stores unquoted names. Filter values are
    /// folded to it before they are compared against the catalog.
    pub fn new(connection: &PostgresClientWrapper, identifier_case: IdentifierCase) -> SchemaReader<'_> {
        SchemaReader { connection, identifier_case }
    }

    /// Reads every table and view matching the filter, with their columns, primary key,
    /// foreign keys and indexes.
    #[instrument(skip_all)]
    pub async fn read_tables(&self, filter: &TableFilter) -> Result<TableMap> {
        let matcher = filter.table_name_matcher()?;
        let patterns = filter.like_patterns(self.identifier_case);

        let candidates = self.get_tables(&patterns.catalog, &patterns.schema, &patterns.table).await?;

        let mut tables = Vec::with_capacity(candidates.len());

        for candidate in &candidates {
            if !matcher.is_match(&candidate.table_name) {
                debug!(table = candidate.table_name.as_str(), "Table is filtered out");
                continue;
            }

            tables.push(self.read_table(candidate).await?);
        }

        Ok(table_map(tables))
    }

    async fn read_table(&self, candidate: &TablesResult) -> Result<Table> {
        let schema = candidate.schema_name.as_str();
        let name = candidate.table_name.as_str();

        debug!(schema, table = name, "Reading table");

        let identity = IdentifiableTable::new(
            Some(&candidate.catalog_name),
            Some(schema),
            name,
            candidate.table_type()?,
        );

        let columns = self.get_columns(schema, name).await?
            .iter()
            .map(|c| c.to_column())
            .collect();

        let primary_keys = self.get_primary_keys(schema, name).await?
            .iter()
            .map(|pk| pk.to_primary_key())
            .collect();

        let foreign_keys = Self::group_foreign_keys(self.get_foreign_keys(schema, name).await?);

        let indexes = self.get_indexes(schema, name).await?
            .iter()
            .map(|i| i.to_index())
            .collect();

        Ok(Table::from_live_schema(identity, columns, primary_keys, foreign_keys, indexes))
    }

    fn group_foreign_keys(rows: Vec<ForeignKeyColumnResult>) -> Vec<ForeignKey> {
        rows.iter()
            .chunk_by(|r| (r.constraint_name.as_str(), r.target_table_name.as_str()))
            .into_iter()
            .map(|((name, target), columns)| ForeignKey::new(name, target, columns.map(|c| c.to_foreign_key_column()).collect()))
            .collect()
    }

    /// The names of the schemas that hold user objects.
    #[instrument(skip_all)]
    pub async fn read_schemas(&self) -> Result<Vec<String>> {
        let schemas = self.get_schemas().await?;

        Ok(schemas.into_iter().map(|s| s.name).collect())
    }
}

macro_rules! define_working_query {
    ($fn_name:ident, $result:ty, ($($param:ident: $param_type:ty),*), $query:literal) => {
        impl $crate::schema_reader::SchemaReader<'_> {
            #[tracing::instrument(skip_all)]
            pub(in crate::schema_reader) async fn $fn_name(&self, $($param: $param_type),*) -> $crate::Result<Vec<$result>> {
                self.connection.get_results_with_params($query, &[$(&$param),*]).await
            }
        }
    };
}

pub(crate) use define_working_query;
