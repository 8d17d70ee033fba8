//! Element and attribute names of the persisted dbre document, and how the model is rendered into them.

use itertools::Itertools;
use crate::{Column, Element, ForeignKey, Index, PrimaryKey, Table};

pub const DATABASE_ELEMENT: &str = "database";
pub const TABLE_ELEMENT: &str = "table";
pub const COLUMN_ELEMENT: &str = "column";
pub const PRIMARY_KEY_ELEMENT: &str = "primaryKey";
pub const FOREIGN_KEY_ELEMENT: &str = "foreignKey";
pub const INDEX_ELEMENT: &str = "index";

pub const PACKAGE_ATTRIBUTE: &str = "package";
pub const ID_ATTRIBUTE: &str = "id";
pub const NAME_ATTRIBUTE: &str = "name";
pub const CATALOG_ATTRIBUTE: &str = "catalog";
pub const SCHEMA_ATTRIBUTE: &str = "schema";
pub const TABLE_TYPE_ATTRIBUTE: &str = "tableType";
pub const TYPE_ATTRIBUTE: &str = "type";
pub const TYPE_NAME_ATTRIBUTE: &str = "typeName";
pub const DATA_TYPE_ATTRIBUTE: &str = "dataType";
pub const COLUMN_SIZE_ATTRIBUTE: &str = "columnSize";
pub const DECIMAL_DIGITS_ATTRIBUTE: &str = "decimalDigits";
pub const NULLABLE_ATTRIBUTE: &str = "nullable";
pub const REMARKS_ATTRIBUTE: &str = "remarks";
pub const IS_PK_ATTRIBUTE: &str = "isPk";
pub const PK_SEQ_ATTRIBUTE: &str = "pkSeq";
pub const COLUMN_NAME_ATTRIBUTE: &str = "columnName";
pub const KEY_SEQ_ATTRIBUTE: &str = "keySeq";
pub const FK_TABLE_ATTRIBUTE: &str = "fkTable";
pub const FK_COLUMN_ATTRIBUTE: &str = "fkColumn";
pub const PK_TABLE_ATTRIBUTE: &str = "pkTable";
pub const PK_COLUMN_ATTRIBUTE: &str = "pkColumn";
pub const NON_UNIQUE_ATTRIBUTE: &str = "nonUnique";

/// Separates the columns of a multi-column foreign key in a single attribute.
pub const LIST_SEPARATOR: char = ',';

/// Attribute name/value pairs in the order they are written.
pub type Attributes = Vec<(&'static str, String)>;

/// The kinds of element nested inside a `table` element.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash)]
pub enum ChildKind {
    Column,
    PrimaryKey,
    ForeignKey,
    Index,
}

impl ChildKind {
    pub const ALL: [ChildKind; 4] = [ChildKind::Column, ChildKind::PrimaryKey, ChildKind::ForeignKey, ChildKind::Index];

    pub fn element_name(&self) -> &'static str {
        match self {
            ChildKind::Column => COLUMN_ELEMENT,
            ChildKind::PrimaryKey => PRIMARY_KEY_ELEMENT,
            ChildKind::ForeignKey => FOREIGN_KEY_ELEMENT,
            ChildKind::Index => INDEX_ELEMENT,
        }
    }

    /// The attributes that identify an element of this kind within its table.
    pub fn key_attributes(&self) -> &'static [&'static str] {
        match self {
            ChildKind::Column => &[NAME_ATTRIBUTE],
            ChildKind::PrimaryKey => &[NAME_ATTRIBUTE, COLUMN_NAME_ATTRIBUTE],
            ChildKind::ForeignKey => &[NAME_ATTRIBUTE, FK_TABLE_ATTRIBUTE],
            ChildKind::Index => &[NAME_ATTRIBUTE, COLUMN_NAME_ATTRIBUTE],
        }
    }

    /// Attributes that are only written for some values. An update removes them when the new value leaves them out.
    pub fn optional_attributes(&self) -> &'static [&'static str] {
        match self {
            ChildKind::Column => &[IS_PK_ATTRIBUTE, PK_SEQ_ATTRIBUTE],
            ChildKind::ForeignKey => &[FK_COLUMN_ATTRIBUTE, PK_TABLE_ATTRIBUTE, PK_COLUMN_ATTRIBUTE, KEY_SEQ_ATTRIBUTE],
            ChildKind::PrimaryKey | ChildKind::Index => &[],
        }
    }

    /// Picks the natural key out of a full attribute list.
    pub fn natural_key(&self, attributes: &[(&'static str, String)]) -> NaturalKey {
        NaturalKey(
            self.key_attributes().iter()
                .map(|key| {
                    let value = attributes.iter()
                        .find(|(name, _)| name == key)
                        .map(|(_, v)| v.clone())
                        .unwrap_or_default();
                    (*key, value)
                })
                .collect(),
        )
    }
}

/// The attribute values that identify a nested element inside its table element.
#[derive(Debug, Eq, PartialEq, Clone, Hash)]
pub struct NaturalKey(Vec<(&'static str, String)>);

impl NaturalKey {
    pub fn new(values: Vec<(&'static str, String)>) -> Self {
        NaturalKey(values)
    }

    pub fn matches(&self, element: &Element) -> bool {
        self.0.iter().all(|(name, value)| element.attribute(name).unwrap_or_default() == value.as_str())
    }

    /// The local part of the element's canonical id.
    pub fn local_id(&self) -> String {
        self.0.iter().map(|(_, v)| v.as_str()).join(".")
    }
}

/// A nested element rendered from the model.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct ChildElement {
    pub kind: ChildKind,
    pub key: NaturalKey,
    pub id: String,
    pub attributes: Attributes,
}

impl ChildElement {
    fn new(kind: ChildKind, table_id: &str, attributes_without_id: Attributes) -> Self {
        let key = kind.natural_key(&attributes_without_id);
        let id = format!("{}.{}", table_id, key.local_id());

        let mut attributes = Vec::with_capacity(attributes_without_id.len() + 1);
        attributes.push((ID_ATTRIBUTE, id.clone()));
        attributes.extend(attributes_without_id);

        ChildElement { kind, key, id, attributes }
    }
}

pub fn table_attributes(table: &Table) -> Attributes {
    let identity = table.identity();

    vec![
        (ID_ATTRIBUTE, identity.canonical_id()),
        (NAME_ATTRIBUTE, identity.table().to_string()),
        (CATALOG_ATTRIBUTE, identity.catalog().unwrap_or_default().to_string()),
        (SCHEMA_ATTRIBUTE, identity.schema().unwrap_or_default().to_string()),
        (TABLE_TYPE_ATTRIBUTE, identity.table_type().to_string()),
    ]
}

/// Every nested element of the table, in document order: columns, primary keys, foreign keys, indexes.
pub fn child_elements(table: &Table) -> Vec<ChildElement> {
    let table_id = table.identity().canonical_id();

    let columns = table.columns().iter().map(|c| ChildElement::new(ChildKind::Column, &table_id, column_attributes(c)));
    let primary_keys = table.primary_keys().into_iter().map(|pk| ChildElement::new(ChildKind::PrimaryKey, &table_id, primary_key_attributes(&pk)));
    let foreign_keys = table.foreign_keys().iter().map(|fk| ChildElement::new(ChildKind::ForeignKey, &table_id, foreign_key_attributes(fk)));
    let indexes = table.indexes().iter().map(|i| ChildElement::new(ChildKind::Index, &table_id, index_attributes(i)));

    columns
        .chain(primary_keys)
        .chain(foreign_keys)
        .chain(indexes)
        .collect()
}

fn column_attributes(column: &Column) -> Attributes {
    let mut attributes = vec![
        (NAME_ATTRIBUTE, column.name.clone()),
        (TYPE_ATTRIBUTE, column.sql_type_name().to_string()),
        (TYPE_NAME_ATTRIBUTE, column.type_name.clone()),
        (DATA_TYPE_ATTRIBUTE, column.data_type.to_string()),
        (COLUMN_SIZE_ATTRIBUTE, column.column_size.to_string()),
        (DECIMAL_DIGITS_ATTRIBUTE, column.decimal_digits.to_string()),
        (NULLABLE_ATTRIBUTE, column.nullable.to_string()),
        (REMARKS_ATTRIBUTE, column.remarks.clone().unwrap_or_default()),
    ];

    if let Some(position) = column.primary_key_position {
        attributes.push((IS_PK_ATTRIBUTE, true.to_string()));
        attributes.push((PK_SEQ_ATTRIBUTE, position.to_string()));
    }

    attributes
}

fn primary_key_attributes(primary_key: &PrimaryKey) -> Attributes {
    vec![
        (COLUMN_NAME_ATTRIBUTE, primary_key.column_name.clone()),
        (NAME_ATTRIBUTE, primary_key.name.clone()),
        (KEY_SEQ_ATTRIBUTE, primary_key.key_sequence.to_string()),
    ]
}

fn foreign_key_attributes(foreign_key: &ForeignKey) -> Attributes {
    let mut attributes = vec![
        (NAME_ATTRIBUTE, foreign_key.name.clone()),
        (FK_TABLE_ATTRIBUTE, foreign_key.referenced_table.clone()),
    ];

    if !foreign_key.columns.is_empty() {
        let separator = LIST_SEPARATOR.to_string();
        attributes.push((FK_COLUMN_ATTRIBUTE, foreign_key.column_names().join(&separator)));
        attributes.push((PK_TABLE_ATTRIBUTE, foreign_key.referenced_table.clone()));
        attributes.push((PK_COLUMN_ATTRIBUTE, foreign_key.referenced_column_names().join(&separator)));
        attributes.push((KEY_SEQ_ATTRIBUTE, foreign_key.columns.iter().map(|c| c.key_sequence).join(&separator)));
    }

    attributes
}

fn index_attributes(index: &Index) -> Attributes {
    vec![
        (NAME_ATTRIBUTE, index.name.clone()),
        (COLUMN_NAME_ATTRIBUTE, index.column_name.clone()),
        (NON_UNIQUE_ATTRIBUTE, index.non_unique.to_string()),
        (TYPE_ATTRIBUTE, index.sort_type.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{default, ForeignKeyColumn, IdentifiableTable, TableType, INDEX_OTHER};

    fn person() -> Table {
        Table::from_live_schema(
            IdentifiableTable::new(None, None, "PERSON", TableType::Table),
            vec![
                Column { name: "ID".to_string(), data_type: 4, column_size: 10, type_name: "int4".to_string(), ..default() },
                Column { name: "OWNER_ID".to_string(), data_type: 4, column_size: 10, nullable: true, type_name: "int4".to_string(), ..default() },
            ],
            vec![PrimaryKey { name: "PERSON_PKEY".to_string(), column_name: "ID".to_string(), key_sequence: 1 }],
            vec![ForeignKey::new("PERSON_OWNER_FK", "OWNER", vec![
                ForeignKeyColumn { name: "OWNER_ID".to_string(), referenced_column: "ID".to_string(), key_sequence: 1 },
            ])],
            vec![Index { name: "PERSON_PKEY".to_string(), column_name: "ID".to_string(), non_unique: false, sort_type: INDEX_OTHER }],
        )
    }

    #[test]
    fn renders_table_attributes() {
        let attributes = table_attributes(&person());

        assert_eq!(attributes, vec![
            ("id", "TABLE.PERSON".to_string()),
            ("name", "PERSON".to_string()),
            ("catalog", "".to_string()),
            ("schema", "".to_string()),
            ("tableType", "TABLE".to_string()),
        ]);
    }

    #[test]
    fn child_ids_extend_the_table_id() {
        let ids: Vec<_> = child_elements(&person()).into_iter().map(|c| (c.kind, c.id)).collect();

        assert_eq!(ids, vec![
            (ChildKind::Column, "TABLE.PERSON.ID".to_string()),
            (ChildKind::Column, "TABLE.PERSON.OWNER_ID".to_string()),
            (ChildKind::PrimaryKey, "TABLE.PERSON.PERSON_PKEY.ID".to_string()),
            (ChildKind::ForeignKey, "TABLE.PERSON.PERSON_OWNER_FK.OWNER".to_string()),
            (ChildKind::Index, "TABLE.PERSON.PERSON_PKEY.ID".to_string()),
        ]);
    }

    #[test]
    fn primary_key_columns_carry_inline_flags() {
        let children = child_elements(&person());

        let id = &children[0].attributes;
        assert!(id.contains(&("isPk", "true".to_string())));
        assert!(id.contains(&("pkSeq", "1".to_string())));

        let owner = &children[1].attributes;
        assert!(!owner.iter().any(|(name, _)| *name == "isPk"));
    }

    #[test]
    fn natural_key_matches_elements() {
        let mut element = Element::new("index");
        element.set_attribute("name", "PERSON_PKEY");
        element.set_attribute("columnName", "ID");

        let key = NaturalKey::new(vec![("name", "PERSON_PKEY".to_string()), ("columnName", "ID".to_string())]);
        assert!(key.matches(&element));

        let other = NaturalKey::new(vec![("name", "PERSON_PKEY".to_string()), ("columnName", "NAME".to_string())]);
        assert!(!other.matches(&element));
    }
}
