use std::cmp::Ordering;
use serde::Serialize;

/// Index entries of this sort type are table statistics reported by the catalog, not indexes.
pub const INDEX_STATISTICS: i16 = 0;
pub const INDEX_CLUSTERED: i16 = 1;
pub const INDEX_HASHED: i16 = 2;
pub const INDEX_OTHER: i16 = 3;

/// One column of an index.
#[derive(Debug, Eq, PartialEq, Clone, Serialize)]
pub struct Index {
    pub name: String,
    pub column_name: String,
    pub non_unique: bool,
    pub sort_type: i16,
}

impl Index {
    pub fn is_statistics(&self) -> bool {
        self.sort_type == INDEX_STATISTICS
    }
}

impl Ord for Index {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
            .then_with(|| self.column_name.cmp(&other.column_name))
    }
}

impl PartialOrd for Index {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
