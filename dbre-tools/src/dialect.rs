use std::fmt::{Display, Formatter};
use std::str::FromStr;
use crate::DbreError;

/// How a database stores identifiers that were not quoted when they were created.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Default)]
pub enum IdentifierCase {
    Upper,
    Lower,
    #[default]
    AsIs,
}

impl IdentifierCase {
    /// Works out the convention from an unquoted identifier and the name the database reported for it.
    pub fn detect(unquoted: &str, reported: &str) -> Self {
        if reported != unquoted && reported == unquoted.to_uppercase() {
            IdentifierCase::Upper
        } else if reported != unquoted && reported == unquoted.to_lowercase() {
            IdentifierCase::Lower
        } else {
            IdentifierCase::AsIs
        }
    }

    /// Folds an identifier to the case the database uses internally.
    pub fn fold(&self, identifier: &str) -> String {
        match self {
            IdentifierCase::Upper => identifier.to_uppercase(),
            IdentifierCase::Lower => identifier.to_lowercase(),
            IdentifierCase::AsIs => identifier.to_string(),
        }
    }
}

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum DatabaseDialect {
    Postgres,
    H2,
    Hsql,
    Derby,
    MySql,
    SqlServer,
    Oracle,
    Db2,
    Firebird,
    Sybase,
}

impl DatabaseDialect {
    pub const ALL: [DatabaseDialect; 10] = [
        DatabaseDialect::Postgres,
        DatabaseDialect::H2,
        DatabaseDialect::Hsql,
        DatabaseDialect::Derby,
        DatabaseDialect::MySql,
        DatabaseDialect::SqlServer,
        DatabaseDialect::Oracle,
        DatabaseDialect::Db2,
        DatabaseDialect::Firebird,
        DatabaseDialect::Sybase,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DatabaseDialect::Postgres => "postgres",
            DatabaseDialect::H2 => "h2",
            DatabaseDialect::Hsql => "hsql",
            DatabaseDialect::Derby => "derby",
            DatabaseDialect::MySql => "mysql",
            DatabaseDialect::SqlServer => "sqlserver",
            DatabaseDialect::Oracle => "oracle",
            DatabaseDialect::Db2 => "db2",
            DatabaseDialect::Firebird => "firebird",
            DatabaseDialect::Sybase => "sybase",
        }
    }

    pub fn supports_sequences(&self) -> bool {
        self.sequence_query().is_some()
    }

    /// A query returning the name of every sequence as its only column.
    pub fn sequence_query(&self) -> Option<&'static str> {
        match self {
            //language=postgresql
            DatabaseDialect::Postgres => Some("select c.relname::text from pg_class c where c.relkind = 'S' order by c.relname"),
            DatabaseDialect::H2 => Some("select sequence_name from information_schema.sequences"),
            DatabaseDialect::Hsql => Some("select sequence_name from information_schema.system_sequences"),
            DatabaseDialect::Derby => Some("select sequencename from sys.syssequences"),
            DatabaseDialect::Oracle => Some("select sequence_name from user_sequences"),
            DatabaseDialect::Db2 => Some("select seqname from sysibm.syssequences"),
            DatabaseDialect::Firebird => Some("select rdb$generator_name from rdb$generators"),
            DatabaseDialect::SqlServer => Some("select name from sys.sequences"),
            DatabaseDialect::MySql | DatabaseDialect::Sybase => None,
        }
    }

    /// The convention the vendor uses by default for unquoted identifiers.
    pub fn identifier_case(&self) -> IdentifierCase {
        match self {
            DatabaseDialect::Postgres => IdentifierCase::Lower,
            DatabaseDialect::H2
            | DatabaseDialect::Hsql
            | DatabaseDialect::Derby
            | DatabaseDialect::Oracle
            | DatabaseDialect::Db2
            | DatabaseDialect::Firebird => IdentifierCase::Upper,
            DatabaseDialect::MySql | DatabaseDialect::SqlServer | DatabaseDialect::Sybase => IdentifierCase::AsIs,
        }
    }
}

impl Display for DatabaseDialect {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DatabaseDialect {
    type Err = DbreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        match wanted.as_str() {
            "postgresql" | "pg" => Ok(DatabaseDialect::Postgres),
            "hsqldb" => Ok(DatabaseDialect::Hsql),
            "mssql" => Ok(DatabaseDialect::SqlServer),
            _ => DatabaseDialect::ALL.into_iter()
                .find(|d| d.name() == wanted)
                .ok_or_else(|| DbreError::UnknownDialect(s.to_string())),
        }
    }
}
