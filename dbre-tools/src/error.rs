use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbreError {
    #[error("Error from postgres: `{0}`")]
    PostgresError(#[from] tokio_postgres::Error),

    #[error("Error from postgres: `{source}` when executing query: `{query}`")]
    PostgresErrorWithQuery {
        query: String,
        #[source]
        source: tokio_postgres::Error,
    },

    #[error("Invalid number of results returned from query. Expected `{expected}`, got `{actual}`")]
    InvalidNumberOfResults {
        actual: usize,
        expected: usize,
    },

    #[error("Postgres version {0} is not supported")]
    UnsupportedPostgresVersion(i32),

    #[error("Invalid response when asking postgres for its version: '{0}'")]
    InvalidPostgresVersionResponse(String),

    #[error("io error: `{0}`")]
    IoError(#[from] std::io::Error),

    #[error("Error reading or writing xml: `{0}`")]
    XmlError(#[from] quick_xml::Error),

    #[error("Invalid table name pattern '{pattern}': `{source}`")]
    InvalidTablePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid dbre document: {0}")]
    InvalidDocument(String),

    #[error("The dbre document '{0}' does not exist")]
    DocumentNotFound(PathBuf),

    #[error("The dbre document template '{0}' could not be found")]
    TemplateNotFound(PathBuf),

    #[error("Unknown table type '{0}'")]
    UnknownTableType(String),

    #[error("Unknown database dialect '{0}'")]
    UnknownDialect(String),
}

pub type Result<T = ()> = std::result::Result<T, DbreError>;
