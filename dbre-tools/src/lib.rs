#[cfg(any(test, feature = "test_utilities"))]
pub mod test_helpers;

mod postgres_client_wrapper;
mod schema_reader;
mod models;
mod error;
mod dialect;
mod database;
mod document;
mod document_reader;
mod persisted_format;
mod reconcile;
mod storage;

pub use error::*;
pub use models::*;
pub use dialect::*;
pub use database::*;
pub use document::*;
pub use document_reader::*;
pub use persisted_format::*;
pub use reconcile::*;
pub use storage::*;
pub use postgres_client_wrapper::PostgresClientWrapper;
pub use schema_reader::{SchemaReader, TableFilter};


pub(crate) fn default<T: Default>() -> T {
    T::default()
}
