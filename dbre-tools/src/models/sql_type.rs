/// The standard SQL/CLI type codes a column's `data_type` is expressed in.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum SqlType {
    Bit,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Float,
    Real,
    Double,
    Numeric,
    Decimal,
    Char,
    VarChar,
    LongVarChar,
    Date,
    Time,
    Timestamp,
    Binary,
    VarBinary,
    LongVarBinary,
    Null,
    Other,
    Array,
    Blob,
    Clob,
    Boolean,
    SqlXml,
    TimeWithTimezone,
    TimestampWithTimezone,
}

impl SqlType {
    const ALL: [SqlType; 28] = [
        SqlType::Bit,
        SqlType::TinyInt,
        SqlType::SmallInt,
        SqlType::Integer,
        SqlType::BigInt,
        SqlType::Float,
        SqlType::Real,
        SqlType::Double,
        SqlType::Numeric,
        SqlType::Decimal,
        SqlType::Char,
        SqlType::VarChar,
        SqlType::LongVarChar,
        SqlType::Date,
        SqlType::Time,
        SqlType::Timestamp,
        SqlType::Binary,
        SqlType::VarBinary,
        SqlType::LongVarBinary,
        SqlType::Null,
        SqlType::Other,
        SqlType::Array,
        SqlType::Blob,
        SqlType::Clob,
        SqlType::Boolean,
        SqlType::SqlXml,
        SqlType::TimeWithTimezone,
        SqlType::TimestampWithTimezone,
    ];

    pub fn code(&self) -> i32 {
        match self {
            SqlType::Bit => -7,
            SqlType::TinyInt => -6,
            SqlType::SmallInt => 5,
            SqlType::Integer => 4,
            SqlType::BigInt => -5,
            SqlType::Float => 6,
            SqlType::Real => 7,
            SqlType::Double => 8,
            SqlType::Numeric => 2,
            SqlType::Decimal => 3,
            SqlType::Char => 1,
            SqlType::VarChar => 12,
            SqlType::LongVarChar => -1,
            SqlType::Date => 91,
            SqlType::Time => 92,
            SqlType::Timestamp => 93,
            SqlType::Binary => -2,
            SqlType::VarBinary => -3,
            SqlType::LongVarBinary => -4,
            SqlType::Null => 0,
            SqlType::Other => 1111,
            SqlType::Array => 2003,
            SqlType::Blob => 2004,
            SqlType::Clob => 2005,
            SqlType::Boolean => 16,
            SqlType::SqlXml => 2009,
            SqlType::TimeWithTimezone => 2013,
            SqlType::TimestampWithTimezone => 2014,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SqlType::Bit => "BIT",
            SqlType::TinyInt => "TINYINT",
            SqlType::SmallInt => "SMALLINT",
            SqlType::Integer => "INTEGER",
            SqlType::BigInt => "BIGINT",
            SqlType::Float => "FLOAT",
            SqlType::Real => "REAL",
            SqlType::Double => "DOUBLE",
            SqlType::Numeric => "NUMERIC",
            SqlType::Decimal => "DECIMAL",
            SqlType::Char => "CHAR",
            SqlType::VarChar => "VARCHAR",
            SqlType::LongVarChar => "LONGVARCHAR",
            SqlType::Date => "DATE",
            SqlType::Time => "TIME",
            SqlType::Timestamp => "TIMESTAMP",
            SqlType::Binary => "BINARY",
            SqlType::VarBinary => "VARBINARY",
            SqlType::LongVarBinary => "LONGVARBINARY",
            SqlType::Null => "NULL",
            SqlType::Other => "OTHER",
            SqlType::Array => "ARRAY",
            SqlType::Blob => "BLOB",
            SqlType::Clob => "CLOB",
            SqlType::Boolean => "BOOLEAN",
            SqlType::SqlXml => "SQLXML",
            SqlType::TimeWithTimezone => "TIME_WITH_TIMEZONE",
            SqlType::TimestampWithTimezone => "TIMESTAMP_WITH_TIMEZONE",
        }
    }

    pub fn from_code(code: i32) -> Option<SqlType> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    /// Maps a postgres type name (`pg_type.typname`) to its SQL type.
    pub fn from_postgres_type_name(type_name: &str) -> SqlType {
        match type_name {
            "int2" => SqlType::SmallInt,
            "int4" | "serial" => SqlType::Integer,
            "int8" | "bigserial" | "oid" => SqlType::BigInt,
            "float4" => SqlType::Real,
            "float8" | "money" => SqlType::Double,
            "numeric" => SqlType::Numeric,
            "bool" | "bit" => SqlType::Bit,
            "char" | "bpchar" => SqlType::Char,
            "varchar" | "text" | "name" => SqlType::VarChar,
            "bytea" => SqlType::Binary,
            "date" => SqlType::Date,
            "time" | "timetz" => SqlType::Time,
            "timestamp" | "timestamptz" => SqlType::Timestamp,
            "xml" => SqlType::SqlXml,
            t if t.starts_with('_') => SqlType::Array,
            _ => SqlType::Other,
        }
    }
}

/// The symbolic name of a type code, `OTHER` when the code is unknown.
pub fn sql_type_name(code: i32) -> &'static str {
    SqlType::from_code(code).unwrap_or(SqlType::Other).name()
}

/// Strips a precision/scale suffix from a vendor type name: `varchar(50)` becomes `varchar`,
/// `timestamp(3) with time zone` becomes `timestamp with time zone`.
pub fn normalize_type_name(type_name: &str) -> String {
    let mut normalized = String::with_capacity(type_name.len());
    let mut depth = 0usize;

    for c in type_name.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if depth == 0 => normalized.push(c),
            _ => {}
        }
    }

    normalized.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The column size reported for a postgres type when it has no explicit length or precision.
pub fn default_postgres_column_size(type_name: &str) -> i32 {
    match type_name {
        "bool" => 1,
        "char" => 1,
        "int2" => 5,
        "int4" | "oid" => 10,
        "int8" => 19,
        "float4" => 8,
        "float8" | "money" => 17,
        "date" => 13,
        "time" => 15,
        "timetz" => 21,
        "timestamp" => 29,
        "timestamptz" => 35,
        "uuid" => 36,
        _ => i32::MAX,
    }
}

/// The decimal digits reported for a postgres type without an explicit scale.
pub fn default_postgres_decimal_digits(type_name: &str) -> i32 {
    match type_name {
        "float4" => 8,
        "float8" => 17,
        "time" | "timetz" | "timestamp" | "timestamptz" => 6,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for t in SqlType::ALL {
            assert_eq!(SqlType::from_code(t.code()), Some(t));
        }
        assert_eq!(SqlType::from_code(424242), None);
        assert_eq!(sql_type_name(424242), "OTHER");
        assert_eq!(sql_type_name(12), "VARCHAR");
    }

    #[test]
    fn maps_postgres_types() {
        assert_eq!(SqlType::from_postgres_type_name("int4"), SqlType::Integer);
        assert_eq!(SqlType::from_postgres_type_name("varchar"), SqlType::VarChar);
        assert_eq!(SqlType::from_postgres_type_name("_int4"), SqlType::Array);
        assert_eq!(SqlType::from_postgres_type_name("jsonb"), SqlType::Other);
    }

    #[test]
    fn strips_precision_and_scale() {
        assert_eq!(normalize_type_name("varchar(50)"), "varchar");
        assert_eq!(normalize_type_name("numeric(10, 2)"), "numeric");
        assert_eq!(normalize_type_name("timestamp(3) with time zone"), "timestamp with time zone");
        assert_eq!(normalize_type_name("int4"), "int4");
    }
}
