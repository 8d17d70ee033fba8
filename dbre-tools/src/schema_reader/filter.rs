use regex::{Regex, RegexBuilder};
use crate::{DbreError, IdentifierCase, Result};

/// Narrows down the tables read from the live schema.
///
/// `catalog`, `schema` and `table` are SQL `LIKE` patterns, `None` matches everything. They are
/// folded to the database's identifier case before use. `include_tables` and `exclude_tables` are
/// `*`/`?` globs matched against table names without regard to case.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct TableFilter {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub table: Option<String>,
    pub include_tables: Vec<String>,
    pub exclude_tables: Vec<String>,
}

impl TableFilter {
    /// A filter matching a single table name, or tables matching a `LIKE` pattern.
    pub fn for_table(table: &str) -> Self {
        TableFilter {
            table: Some(table.to_string()),
            ..Default::default()
        }
    }

    pub(crate) fn like_patterns(&self, identifier_case: IdentifierCase) -> LikePatterns {
        let fold = |value: &Option<String>| match value {
            Some(v) => identifier_case.fold(v),
            None => "%".to_string(),
        };

        LikePatterns {
            catalog: fold(&self.catalog),
            schema: fold(&self.schema),
            table: fold(&self.table),
        }
    }

    pub(crate) fn table_name_matcher(&self) -> Result<TableNameMatcher> {
        Ok(TableNameMatcher {
            include: compile_globs(&self.include_tables)?,
            exclude: compile_globs(&self.exclude_tables)?,
        })
    }
}

#[derive(Debug, Eq, PartialEq)]
pub(crate) struct LikePatterns {
    pub catalog: String,
    pub schema: String,
    pub table: String,
}

#[derive(Debug)]
pub(crate) struct TableNameMatcher {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
}

impl TableNameMatcher {
    /// A name is kept when it matches an include pattern, or there are none, and no exclude pattern.
    pub fn is_match(&self, table_name: &str) -> bool {
        let included = self.include.is_empty() || self.include.iter().any(|r| r.is_match(table_name));

        included && !self.exclude.iter().any(|r| r.is_match(table_name))
    }
}

fn compile_globs(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns.iter()
        .map(|p| compile_glob(p))
        .collect()
}

fn compile_glob(pattern: &str) -> Result<Regex> {
    let mut regex = String::with_capacity(pattern.len() + 8);
    regex.push('^');

    for c in pattern.trim().chars() {
        match c {
            '*' => regex.push_str(".*"),
            '?' => regex.push('.'),
            c => regex.push_str(&regex::escape(&c.to_string())),
        }
    }

    regex.push('$');

    RegexBuilder::new(&regex)
        .case_insensitive(true)
        .build()
        .map_err(|e| DbreError::InvalidTablePattern {
            pattern: pattern.to_string(),
            source: e,
        })
}
