use std::cmp::Ordering;
use itertools::Itertools;
use serde::Serialize;

#[derive(Debug, Eq, PartialEq, Clone, Serialize)]
pub struct ForeignKey {
    pub name: String,
    pub referenced_table: String,
    pub columns: Vec<ForeignKeyColumn>,
}

impl ForeignKey {
    pub fn new(name: &str, referenced_table: &str, columns: Vec<ForeignKeyColumn>) -> Self {
        ForeignKey {
            name: name.to_string(),
            referenced_table: referenced_table.to_string(),
            columns: columns.into_iter().sorted().collect(),
        }
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn referenced_column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.referenced_column.as_str())
    }
}

impl Ord for ForeignKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl PartialOrd for ForeignKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Eq, PartialEq, Clone, Serialize)]
pub struct ForeignKeyColumn {
    pub name: String,
    pub referenced_column: String,
    pub key_sequence: i32,
}

impl Ord for ForeignKeyColumn {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key_sequence.cmp(&other.key_sequence)
    }
}

impl PartialOrd for ForeignKeyColumn {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
