use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use serde::Serialize;
use crate::DbreError;

#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash, Default, Serialize)]
pub enum TableType {
    #[default]
    Table,
    View,
}

impl TableType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableType::Table => "TABLE",
            TableType::View => "VIEW",
        }
    }
}

impl Display for TableType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableType {
    type Err = DbreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "TABLE" | "BASE TABLE" => Ok(TableType::Table),
            "VIEW" => Ok(TableType::View),
            _ => Err(DbreError::UnknownTableType(s.to_string())),
        }
    }
}

/// The identity of a table, compared without regard to case.
///
/// Catalog and schema are accepted by [`IdentifiableTable::new`] but not retained:
/// every identity lives in one implicit catalog and schema. Tables with the same
/// name in different schemas therefore share an identity. Supporting several
/// catalogs or schemas means storing the two values here, which changes every
/// canonical id already written to existing documents.
#[derive(Debug, Clone, Serialize)]
pub struct IdentifiableTable {
    catalog: Option<String>,
    schema: Option<String>,
    table: String,
    table_type: TableType,
}

impl IdentifiableTable {
    pub fn new(_catalog: Option<&str>, _schema: Option<&str>, table: &str, table_type: TableType) -> Self {
        IdentifiableTable {
            catalog: None,
            schema: None,
            table: table.to_string(),
            table_type,
        }
    }

    pub fn catalog(&self) -> Option<&str> {
        self.catalog.as_deref()
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn table_type(&self) -> TableType {
        self.table_type
    }

    /// `<TYPE>.<catalog>.<schema>.<table>`, leaving out the segments that are not set.
    pub fn canonical_id(&self) -> String {
        let mut id = self.table_type.as_str().to_string();

        for segment in [self.catalog.as_deref(), self.schema.as_deref(), Some(self.table.as_str())].into_iter().flatten() {
            id.push('.');
            id.push_str(segment);
        }

        id
    }

    fn folded(&self) -> (Option<String>, Option<String>, String, TableType) {
        (
            self.catalog.as_deref().map(str::to_uppercase),
            self.schema.as_deref().map(str::to_uppercase),
            self.table.to_uppercase(),
            self.table_type,
        )
    }
}

impl PartialEq for IdentifiableTable {
    fn eq(&self, other: &Self) -> bool {
        self.folded() == other.folded()
    }
}

impl Eq for IdentifiableTable {}

impl Hash for IdentifiableTable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.folded().hash(state);
    }
}

impl Display for IdentifiableTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.canonical_id())
    }
}
