use std::collections::BTreeSet;
use tracing::{debug, instrument};
use crate::postgres_client_wrapper::PostgresClientWrapper;
use crate::{DatabaseDialect, IdentifiableTable, Result, SchemaReader, Table, TableFilter, TableMap};

/// Read-only access to the structure of a connected database.
pub struct Database<'a> {
    connection: &'a PostgresClientWrapper,
}

impl<'a> Database<'a> {
    pub fn new(connection: &'a PostgresClientWrapper) -> Self {
        Database { connection }
    }

    fn reader(&self) -> SchemaReader<'a> {
        SchemaReader::new(self.connection, self.connection.identifier_case())
    }

    /// Reads a single table. The lookup is case-insensitive, `None` when there is no such table.
    #[instrument(skip_all, fields(table = %identity))]
    pub async fn get_table(&self, identity: &IdentifiableTable) -> Result<Option<Table>> {
        let filter = TableFilter {
            catalog: identity.catalog().map(str::to_string),
            schema: identity.schema().map(str::to_string),
            table: Some(identity.table().to_string()),
            ..Default::default()
        };

        let mut tables = self.reader().read_tables(&filter).await?;

        Ok(tables.shift_remove(identity))
    }

    #[instrument(skip_all)]
    pub async fn get_tables(&self, filter: &TableFilter) -> Result<TableMap> {
        self.reader().read_tables(filter).await
    }

    /// The names of the sequences in the database, trimmed and lower cased.
    /// Empty for dialects without sequences.
    #[instrument(skip_all, fields(dialect = %dialect))]
    pub async fn get_sequences(&self, dialect: DatabaseDialect) -> Result<BTreeSet<String>> {
        let Some(query) = dialect.sequence_query() else {
            debug!("Dialect has no sequences");
            return Ok(BTreeSet::new());
        };

        let names = self.connection.get_single_results::<String>(query).await?;

        Ok(names.iter()
            .map(|n| n.trim().to_lowercase())
            .collect())
    }

    #[instrument(skip_all)]
    pub async fn get_schemas(&self) -> Result<Vec<String>> {
        self.reader().read_schemas().await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use super::*;
    use crate::test_helpers;
    use crate::test_helpers::TestHelper;
    use crate::TableType;
    use dbre_test_macros::pg_test;

    #[pg_test(arg(postgres = 15))]
    async fn gets_a_single_table_regardless_of_case(helper: &TestHelper) {
        helper.execute_not_query(r#"
        create table person(id int4 primary key);
        create table persons(id int4 primary key);
        "#).await;

        let database = Database::new(helper.get_conn());

        let table = database.get_table(&IdentifiableTable::new(None, None, "PERSON", TableType::Table)).await.unwrap().unwrap();
        assert_eq!(table.name(), "person");
        assert_eq!(table.primary_key_name(), Some("person_pkey"));

        let missing = database.get_table(&IdentifiableTable::new(None, None, "nobody", TableType::Table)).await.unwrap();
        assert!(missing.is_none());

        let view = database.get_table(&IdentifiableTable::new(None, None, "person", TableType::View)).await.unwrap();
        assert!(view.is_none());
    }

    #[pg_test(arg(postgres = 15))]
    async fn gets_sequences_per_dialect(helper: &TestHelper) {
        helper.execute_not_query(r#"
        create sequence Invoice_Number;
        create table person(id serial primary key);
        "#).await;

        let database = Database::new(helper.get_conn());

        let sequences = database.get_sequences(DatabaseDialect::Postgres).await.unwrap();
        assert_eq!(sequences, BTreeSet::from(["invoice_number".to_string(), "person_id_seq".to_string()]));

        let sequences = database.get_sequences(DatabaseDialect::MySql).await.unwrap();
        assert!(sequences.is_empty());
    }

    #[pg_test(arg(postgres = 15))]
    async fn gets_schemas(helper: &TestHelper) {
        helper.execute_not_query("create schema billing;").await;

        let database = Database::new(helper.get_conn());

        assert_eq!(database.get_schemas().await.unwrap(), vec!["billing".to_string(), "public".to_string()]);
    }
}
