use std::str::FromStr;
use tracing::instrument;
use crate::persisted_format::*;
use crate::{table_map, Column, DbreError, Document, Element, ForeignKey, ForeignKeyColumn, IdentifiableTable, Index, PrimaryKey, Result, Table, TableMap, TableType};

/// The tables described by a persisted document, along with the document's package.
#[derive(Debug, Clone)]
pub struct PersistedModel {
    pub package: Option<String>,
    pub tables: TableMap,
}

/// Reads the model out of a persisted document.
///
/// Every `table` element below the root becomes a [`Table`]. Elements the format doesn't know
/// about are skipped, so hand-added content survives a read without being interpreted.
#[instrument(skip_all)]
pub fn parse_document(document: &Document) -> Result<PersistedModel> {
    let root = document.root();

    if root.name() != DATABASE_ELEMENT {
        return Err(DbreError::InvalidDocument(format!("Expected root element '{}', found '{}'", DATABASE_ELEMENT, root.name())));
    }

    let package = root.attribute(PACKAGE_ATTRIBUTE)
        .filter(|p| !p.is_empty())
        .map(str::to_string);

    let tables = root.child_elements(TABLE_ELEMENT)
        .map(read_table)
        .collect::<Result<Vec<_>>>()?;

    let table_count = tables.len();
    let tables = table_map(tables);

    if tables.len() != table_count {
        return Err(DbreError::InvalidDocument("The document describes the same table more than once".to_string()));
    }

    Ok(PersistedModel { package, tables })
}

fn read_table(element: &Element) -> Result<Table> {
    let name = required(element, NAME_ATTRIBUTE)?;
    let table_type = TableType::from_str(required(element, TABLE_TYPE_ATTRIBUTE)?)
        .map_err(|e| invalid(element, &e.to_string()))?;
    let catalog = optional(element, CATALOG_ATTRIBUTE);
    let schema = optional(element, SCHEMA_ATTRIBUTE);

    let identity = IdentifiableTable::new(catalog, schema, name, table_type);

    let columns = element.child_elements(COLUMN_ELEMENT)
        .map(read_column)
        .collect::<Result<Vec<_>>>()?;

    let primary_keys = element.child_elements(PRIMARY_KEY_ELEMENT)
        .map(read_primary_key)
        .collect::<Result<Vec<_>>>()?;

    let foreign_keys = element.child_elements(FOREIGN_KEY_ELEMENT)
        .map(read_foreign_key)
        .collect::<Result<Vec<_>>>()?;

    let indexes = element.child_elements(INDEX_ELEMENT)
        .map(read_index)
        .collect::<Result<Vec<_>>>()?;

    Ok(Table::from_persisted_document(identity, columns, primary_keys, foreign_keys, indexes))
}

fn read_column(element: &Element) -> Result<Column> {
    let is_primary_key = match element.attribute(IS_PK_ATTRIBUTE) {
        Some(value) => parse_bool(element, IS_PK_ATTRIBUTE, value)?,
        None => false,
    };

    let primary_key_position = if is_primary_key {
        Some(parse_number(element, PK_SEQ_ATTRIBUTE, required(element, PK_SEQ_ATTRIBUTE)?)?)
    } else {
        None
    };

    Ok(Column {
        name: required(element, NAME_ATTRIBUTE)?.to_string(),
        data_type: required_number(element, DATA_TYPE_ATTRIBUTE)?,
        column_size: required_number(element, COLUMN_SIZE_ATTRIBUTE)?,
        decimal_digits: required_number(element, DECIMAL_DIGITS_ATTRIBUTE)?,
        nullable: parse_bool(element, NULLABLE_ATTRIBUTE, required(element, NULLABLE_ATTRIBUTE)?)?,
        remarks: optional(element, REMARKS_ATTRIBUTE).map(str::to_string),
        type_name: required(element, TYPE_NAME_ATTRIBUTE)?.to_string(),
        primary_key_position,
    })
}

fn read_primary_key(element: &Element) -> Result<PrimaryKey> {
    Ok(PrimaryKey {
        name: required(element, NAME_ATTRIBUTE)?.to_string(),
        column_name: required(element, COLUMN_NAME_ATTRIBUTE)?.to_string(),
        key_sequence: required_number(element, KEY_SEQ_ATTRIBUTE)?,
    })
}

fn read_foreign_key(element: &Element) -> Result<ForeignKey> {
    let name = required(element, NAME_ATTRIBUTE)?;
    let referenced_table = required(element, FK_TABLE_ATTRIBUTE)?;

    let column_names = list(element, FK_COLUMN_ATTRIBUTE);
    let referenced_columns = list(element, PK_COLUMN_ATTRIBUTE);

    if column_names.len() != referenced_columns.len() {
        return Err(invalid(element, &format!("'{}' and '{}' list a different number of columns", FK_COLUMN_ATTRIBUTE, PK_COLUMN_ATTRIBUTE)));
    }

    let key_sequences = match element.attribute(KEY_SEQ_ATTRIBUTE) {
        Some(_) => {
            let sequences = list(element, KEY_SEQ_ATTRIBUTE).into_iter()
                .map(|s| parse_number(element, KEY_SEQ_ATTRIBUTE, s))
                .collect::<Result<Vec<i32>>>()?;

            if sequences.len() != column_names.len() {
                return Err(invalid(element, &format!("'{}' lists a different number of entries than '{}'", KEY_SEQ_ATTRIBUTE, FK_COLUMN_ATTRIBUTE)));
            }

            sequences
        }
        None => (1..=column_names.len() as i32).collect(),
    };

    let columns = column_names.into_iter()
        .zip(referenced_columns)
        .zip(key_sequences)
        .map(|((name, referenced_column), key_sequence)| ForeignKeyColumn {
            name: name.to_string(),
            referenced_column: referenced_column.to_string(),
            key_sequence,
        })
        .collect();

    Ok(ForeignKey::new(name, referenced_table, columns))
}

fn read_index(element: &Element) -> Result<Index> {
    Ok(Index {
        name: required(element, NAME_ATTRIBUTE)?.to_string(),
        column_name: required(element, COLUMN_NAME_ATTRIBUTE)?.to_string(),
        non_unique: parse_bool(element, NON_UNIQUE_ATTRIBUTE, required(element, NON_UNIQUE_ATTRIBUTE)?)?,
        sort_type: required_number(element, TYPE_ATTRIBUTE)?,
    })
}

fn required<'a>(element: &'a Element, attribute: &str) -> Result<&'a str> {
    element.attribute(attribute)
        .ok_or_else(|| invalid(element, &format!("missing attribute '{}'", attribute)))
}

fn optional<'a>(element: &'a Element, attribute: &str) -> Option<&'a str> {
    element.attribute(attribute).filter(|v| !v.is_empty())
}

fn list<'a>(element: &'a Element, attribute: &str) -> Vec<&'a str> {
    match optional(element, attribute) {
        Some(value) => value.split(LIST_SEPARATOR).map(str::trim).collect(),
        None => vec![],
    }
}

fn required_number<T: FromStr>(element: &Element, attribute: &str) -> Result<T> {
    parse_number(element, attribute, required(element, attribute)?)
}

fn parse_number<T: FromStr>(element: &Element, attribute: &str, value: &str) -> Result<T> {
    value.trim().parse()
        .map_err(|_| invalid(element, &format!("attribute '{}' is not a number: '{}'", attribute, value)))
}

fn parse_bool(element: &Element, attribute: &str, value: &str) -> Result<bool> {
    match value.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(invalid(element, &format!("attribute '{}' is not a boolean: '{}'", attribute, value))),
    }
}

fn invalid(element: &Element, message: &str) -> DbreError {
    match element.attribute(ID_ATTRIBUTE) {
        Some(id) => DbreError::InvalidDocument(format!("<{} id=\"{}\">: {}", element.name(), id, message)),
        None => DbreError::InvalidDocument(format!("<{}>: {}", element.name(), message)),
    }
}
