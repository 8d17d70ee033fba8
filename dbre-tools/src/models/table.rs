use indexmap::IndexMap;
use itertools::Itertools;
use serde::Serialize;
use tracing::warn;
use crate::models::column::Column;
use crate::models::foreign_key::ForeignKey;
use crate::models::identity::IdentifiableTable;
use crate::models::index::Index;
use crate::models::primary_key::PrimaryKey;
use crate::models::sql_type::normalize_type_name;

/// Tables keyed by their identity, in the order they were added.
pub type TableMap = IndexMap<IdentifiableTable, Table>;

/// Where a [`Table`] was read from.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize)]
pub enum TableOrigin {
    LiveSchema,
    PersistedDocument,
}

#[derive(Debug, Clone, Serialize)]
pub struct Table {
    identity: IdentifiableTable,
    origin: TableOrigin,
    columns: Vec<Column>,
    primary_key_name: Option<String>,
    foreign_keys: Vec<ForeignKey>,
    indexes: Vec<Index>,
}

impl Table {
    /// Builds a table from catalog introspection, where primary key membership
    /// is reported separately from the columns.
    pub fn from_live_schema(
        identity: IdentifiableTable,
        columns: Vec<Column>,
        primary_keys: Vec<PrimaryKey>,
        foreign_keys: Vec<ForeignKey>,
        indexes: Vec<Index>,
    ) -> Self {
        Self::build(identity, TableOrigin::LiveSchema, columns, primary_keys, foreign_keys, indexes)
    }

    /// Builds a table from a persisted document, where columns carry their primary key
    /// position inline and the primary key elements supply the key's name.
    pub fn from_persisted_document(
        identity: IdentifiableTable,
        columns: Vec<Column>,
        primary_keys: Vec<PrimaryKey>,
        foreign_keys: Vec<ForeignKey>,
        indexes: Vec<Index>,
    ) -> Self {
        Self::build(identity, TableOrigin::PersistedDocument, columns, primary_keys, foreign_keys, indexes)
    }

    fn build(
        identity: IdentifiableTable,
        origin: TableOrigin,
        columns: Vec<Column>,
        primary_keys: Vec<PrimaryKey>,
        foreign_keys: Vec<ForeignKey>,
        indexes: Vec<Index>,
    ) -> Self {
        let mut columns = columns;

        for column in &mut columns {
            column.type_name = normalize_type_name(&column.type_name);
        }

        for pk in &primary_keys {
            match columns.iter_mut().find(|c| c.name == pk.column_name) {
                Some(column) => column.primary_key_position = Some(pk.key_sequence),
                None => warn!(table = identity.table(), column = pk.column_name.as_str(), "Primary key refers to an unknown column"),
            }
        }

        let primary_key_name = primary_keys.iter()
            .map(|pk| pk.name.clone())
            .next();

        Table {
            identity,
            origin,
            columns: columns.into_iter().sorted().collect(),
            primary_key_name,
            foreign_keys: foreign_keys.into_iter().sorted().collect(),
            indexes: indexes.into_iter()
                .filter(|i| !i.is_statistics())
                .sorted()
                .collect(),
        }
    }

    pub fn identity(&self) -> &IdentifiableTable {
        &self.identity
    }

    pub fn name(&self) -> &str {
        self.identity.table()
    }

    pub fn origin(&self) -> TableOrigin {
        self.origin
    }

    /// Columns ordered by name.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn primary_key_name(&self) -> Option<&str> {
        self.primary_key_name.as_deref()
    }

    /// The primary key projected from the columns' key positions, ordered by key sequence.
    /// Empty when the key has no name.
    pub fn primary_keys(&self) -> Vec<PrimaryKey> {
        let Some(name) = &self.primary_key_name else {
            return vec![];
        };

        self.columns.iter()
            .filter_map(|c| c.primary_key_position.map(|position| PrimaryKey {
                name: name.clone(),
                column_name: c.name.clone(),
                key_sequence: position,
            }))
            .sorted()
            .collect()
    }

    pub fn foreign_keys(&self) -> &[ForeignKey] {
        &self.foreign_keys
    }

    pub fn indexes(&self) -> &[Index] {
        &self.indexes
    }

    /// Compares everything but the origin. Tables are otherwise matched by identity through a [`TableMap`].
    pub fn content_eq(&self, other: &Table) -> bool {
        self.identity == other.identity
            && self.identity.table() == other.identity.table()
            && self.columns == other.columns
            && self.primary_key_name == other.primary_key_name
            && self.foreign_keys == other.foreign_keys
            && self.indexes == other.indexes
    }
}

/// Collects tables into a [`TableMap`]. When two tables share an identity the first one is kept.
pub fn table_map(tables: impl IntoIterator<Item = Table>) -> TableMap {
    let mut map = TableMap::new();

    for table in tables {
        if map.contains_key(table.identity()) {
            warn!(table = table.name(), "Skipping table with an identity that was already seen");
            continue;
        }

        map.insert(table.identity().clone(), table);
    }

    map
}
