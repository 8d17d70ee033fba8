use std::cmp::Ordering;
use serde::Serialize;

/// One column of a table's primary key.
#[derive(Debug, Eq, PartialEq, Clone, Serialize)]
pub struct PrimaryKey {
    pub name: String,
    pub column_name: String,
    pub key_sequence: i32,
}

impl PartialOrd for PrimaryKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PrimaryKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key_sequence.cmp(&other.key_sequence)
    }
}
