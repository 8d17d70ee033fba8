use std::cmp::Ordering;
use serde::Serialize;
use crate::models::sql_type::sql_type_name;

#[derive(Debug, Eq, PartialEq, Clone, Default, Serialize)]
pub struct Column {
    pub name: String,
    pub data_type: i32,
    pub column_size: i32,
    pub decimal_digits: i32,
    pub nullable: bool,
    pub remarks: Option<String>,
    /// The vendor type name without precision or scale.
    pub type_name: String,
    /// Position of the column within the table's primary key, starting at 1.
    pub primary_key_position: Option<i32>,
}

impl Column {
    /// The symbolic name of `data_type`, such as `VARCHAR`.
    pub fn sql_type_name(&self) -> &'static str {
        sql_type_name(self.data_type)
    }
}

impl Ord for Column {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl PartialOrd for Column {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
