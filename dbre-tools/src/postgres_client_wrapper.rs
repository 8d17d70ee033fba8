use tokio::task::JoinHandle;
use tokio_postgres::{Client, NoTls, Row};
use tokio_postgres::types::{FromSqlOwned, ToSql};
use tracing::{debug, warn};
use crate::{DbreError, IdentifierCase, Result};

/// The alias used to find out how the server folds unquoted identifiers.
const CASE_PROBE_ALIAS: &str = "CaseProbe";

pub struct PostgresClientWrapper {
    client: Client,
    join_handle: JoinHandle<()>,
    version: i32,
    identifier_case: IdentifierCase,
}

impl PostgresClientWrapper {
    pub async fn new(connection_string: &str) -> Result<Self> {
        let (client, connection) =
            tokio_postgres::connect(connection_string, NoTls).await?;

        // The connection object performs the actual communication with the database,
        // so spawn it off to run on its own.
        let join_handle = tokio::spawn(async move {
            if let Err(e) = connection.await {
                warn!("Postgres connection closed with an error: {}", e);
            }
        });

        let version = Self::read_version(&client).await?;
        let identifier_case = Self::probe_identifier_case(&client).await?;

        debug!(version, ?identifier_case, "Connected to postgres");

        Ok(PostgresClientWrapper {
            client,
            join_handle,
            version,
            identifier_case,
        })
    }

    async fn read_version(client: &Client) -> Result<i32> {
        match client.simple_query("SHOW server_version_num;").await?.first() {
            Some(tokio_postgres::SimpleQueryMessage::Row(row)) => {
                let raw = row.get(0).unwrap_or_default();
                let version: i32 = raw.parse().map_err(|_| DbreError::InvalidPostgresVersionResponse(raw.to_string()))?;
                if version < 120000 {
                    return Err(DbreError::UnsupportedPostgresVersion(version));
                }
                Ok(version / 1000)
            }
            _ => Err(DbreError::InvalidPostgresVersionResponse("no rows".to_string()))
        }
    }

    /// Prepares a statement with an unquoted alias and looks at the column name the
    /// server reports back.
    async fn probe_identifier_case(client: &Client) -> Result<IdentifierCase> {
        let statement = client.prepare(&format!("select 1 as {CASE_PROBE_ALIAS}")).await?;

        match statement.columns().first() {
            Some(column) => Ok(IdentifierCase::detect(CASE_PROBE_ALIAS, column.name())),
            None => Err(DbreError::InvalidNumberOfResults {
                actual: 0,
                expected: 1,
            }),
        }
    }

    pub async fn execute_non_query(&self, sql: &str) -> Result {
        self.client.batch_execute(sql).await.map_err(|e| DbreError::PostgresErrorWithQuery {
            source: e,
            query: sql.to_string(),
        })?;

        Ok(())
    }

    pub async fn get_results<T: FromRow>(&self, sql: &str) -> Result<Vec<T>> {
        self.get_results_with_params(sql, &[]).await
    }

    pub async fn get_results_with_params<T: FromRow>(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> Result<Vec<T>> {

        let query_results = self.client.query(sql, params).await.map_err(|e| DbreError::PostgresErrorWithQuery {
            source: e,
            query: sql.to_string(),
        })?;

        let mut output = Vec::with_capacity(query_results.len());

        for row in query_results.into_iter() {
            output.push(T::from_row(row)?);
        }

        Ok(output)
    }

    pub async fn get_result<T: FromRow>(&self, sql: &str) -> Result<T> {
        let results = self.get_results(sql).await?;
        if results.len() != 1 {
            return Err(DbreError::InvalidNumberOfResults{
                actual: results.len(),
                expected: 1,
            });
        }

        results.into_iter().next().ok_or(DbreError::InvalidNumberOfResults {
            actual: 0,
            expected: 1,
        })
    }

    pub async fn get_single_results<T: FromSqlOwned>(&self, sql: &str) -> Result<Vec<T>> {
        let r = self.get_results::<(T,)>(sql).await?.into_iter()
            .map(|t| t.0)
            .collect();

        Ok(r)
    }

    pub async fn get_single_result<T: FromSqlOwned>(&self, sql: &str) -> Result<T> {
        let result = self.get_result::<(T,)>(sql).await?;
        Ok(result.0)
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    /// How the connected server stores unquoted identifiers. Resolved once when connecting.
    pub fn identifier_case(&self) -> IdentifierCase {
        self.identifier_case
    }
}

impl Drop for PostgresClientWrapper {
    fn drop(&mut self) {
        self.join_handle.abort();
    }
}

pub trait FromRow: Sized {
    fn from_row(row: Row) -> Result<Self>;
}

impl<T1: FromSqlOwned> FromRow for (T1,) {
    fn from_row(row: Row) -> Result<Self> {
        Ok((
            row.try_get(0)?,
        ))
    }
}

impl<T1: FromSqlOwned, T2: FromSqlOwned> FromRow for (T1, T2) {
    fn from_row(row: Row) -> Result<Self> {
        Ok((
            row.try_get(0)?,
            row.try_get(1)?,
        ))
    }
}
