use std::collections::{BTreeSet, HashSet};
use crate::persisted_format::*;
use crate::{Element, Table, TableMap};

/// One edit to the persisted document. Tables are addressed by their exact name,
/// nested elements by their natural key inside the owning table.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DocumentChange {
    CreateTable {
        name: String,
        id: String,
        attributes: Attributes,
    },
    UpdateTable {
        name: String,
        id: String,
        attributes: Attributes,
    },
    DeleteTable {
        name: String,
    },
    CreateChild {
        table: String,
        kind: ChildKind,
        key: NaturalKey,
        id: String,
        attributes: Attributes,
    },
    UpdateChild {
        table: String,
        kind: ChildKind,
        key: NaturalKey,
        id: String,
        attributes: Attributes,
    },
    DeleteChild {
        table: String,
        kind: ChildKind,
        key: NaturalKey,
    },
}

impl DocumentChange {
    pub fn is_create(&self) -> bool {
        matches!(self, DocumentChange::CreateTable { .. } | DocumentChange::CreateChild { .. })
    }

    pub fn is_update(&self) -> bool {
        matches!(self, DocumentChange::UpdateTable { .. } | DocumentChange::UpdateChild { .. })
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, DocumentChange::DeleteTable { .. } | DocumentChange::DeleteChild { .. })
    }
}

/// The changes that bring a document in line with the desired tables, plus the canonical
/// ids of every element they create or update.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ChangeSet {
    pub changes: Vec<DocumentChange>,
    pub known_ids: BTreeSet<String>,
}

/// Compares the desired tables against the `database` element of an existing document.
///
/// Creates and updates come first, in the order of `desired`, each table followed by its
/// columns, primary keys, foreign keys and indexes. Deletes follow after all of them: an
/// existing element is removed when the id it holds once the upserts are done is not one of
/// the known ids.
pub fn diff(desired: &TableMap, existing: &Element) -> ChangeSet {
    let mut change_set = ChangeSet::default();

    for table in desired.values() {
        let name = table.name().to_string();
        let id = table.identity().canonical_id();
        let attributes = table_attributes(table);

        let existing_table = find_table(existing, &name);

        change_set.known_ids.insert(id.clone());
        change_set.changes.push(match existing_table {
            Some(_) => DocumentChange::UpdateTable { name: name.clone(), id, attributes },
            None => DocumentChange::CreateTable { name: name.clone(), id, attributes },
        });

        for child in child_elements(table) {
            let exists = existing_table
                .map(|t| t.child_elements(child.kind.element_name()).any(|e| child.key.matches(e)))
                .unwrap_or(false);

            change_set.known_ids.insert(child.id.clone());

            let ChildElement { kind, key, id, attributes } = child;
            change_set.changes.push(if exists {
                DocumentChange::UpdateChild { table: name.clone(), kind, key, id, attributes }
            } else {
                DocumentChange::CreateChild { table: name.clone(), kind, key, id, attributes }
            });
        }
    }

    let deletes = orphans(desired, existing, &change_set.known_ids);
    change_set.changes.extend(deletes);
    change_set
}

/// Changes are addressed by table name, so only the first table element with a given name is
/// ever upserted into.
fn find_table<'a>(existing: &'a Element, name: &str) -> Option<&'a Element> {
    existing.child_elements(TABLE_ELEMENT)
        .find(|e| e.attribute(NAME_ATTRIBUTE) == Some(name))
}

fn orphans(desired: &TableMap, existing: &Element, known_ids: &BTreeSet<String>) -> Vec<DocumentChange> {
    let mut deletes = vec![];
    let mut seen = HashSet::new();

    for element in existing.child_elements(TABLE_ELEMENT) {
        let name = element.attribute(NAME_ATTRIBUTE).unwrap_or_default();

        if !seen.insert(name) {
            continue;
        }

        let upserted: Vec<&Table> = desired.values().filter(|t| t.name() == name).collect();

        // The last upsert into an element decides its id.
        let table_id = match upserted.last() {
            Some(table) => table.identity().canonical_id(),
            None => current_id(element).to_string(),
        };

        if !known_ids.contains(&table_id) {
            deletes.push(DocumentChange::DeleteTable { name: name.to_string() });
            continue;
        }

        let upserted_children: Vec<ChildElement> = upserted.iter()
            .flat_map(|t| child_elements(t))
            .collect();

        for kind in ChildKind::ALL {
            for child in element.child_elements(kind.element_name()) {
                let child_id = upserted_children.iter()
                    .rev()
                    .find(|c| c.kind == kind && c.key.matches(child))
                    .map(|c| c.id.as_str())
                    .unwrap_or_else(|| current_id(child));

                if !known_ids.contains(child_id) {
                    deletes.push(DocumentChange::DeleteChild {
                        table: name.to_string(),
                        kind,
                        key: existing_key(kind, child),
                    });
                }
            }
        }
    }

    deletes
}

fn current_id(element: &Element) -> &str {
    element.attribute(ID_ATTRIBUTE).unwrap_or_default()
}

fn existing_key(kind: ChildKind, element: &Element) -> NaturalKey {
    NaturalKey::new(
        kind.key_attributes().iter()
            .map(|a| (*a, element.attribute(a).unwrap_or_default().to_string()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use super::*;
    use crate::{default, table_map, Column, Document, IdentifiableTable, Table, TableType};

    fn table(name: &str, columns: &[&str]) -> Table {
        of_type(name, TableType::Table, columns)
    }

    fn of_type(name: &str, table_type: TableType, columns: &[&str]) -> Table {
        Table::from_live_schema(
            IdentifiableTable::new(None, None, name, table_type),
            columns.iter().map(|c| Column { name: c.to_string(), data_type: 12, column_size: 50, nullable: true, type_name: "varchar".to_string(), ..default() }).collect(),
            vec![],
            vec![],
            vec![],
        )
    }

    fn existing(xml: &str) -> Element {
        Document::parse(xml).unwrap().root().clone()
    }

    #[test]
    fn everything_is_created_in_an_empty_document() {
        let desired = table_map([table("PERSON", &["NAME", "EMAIL"])]);

        let change_set = diff(&desired, &existing(r#"<database package=""/>"#));

        assert!(change_set.changes.iter().all(DocumentChange::is_create));
        assert_eq!(change_set.changes.len(), 3);
        assert_eq!(change_set.known_ids, BTreeSet::from([
            "TABLE.PERSON".to_string(),
            "TABLE.PERSON.EMAIL".to_string(),
            "TABLE.PERSON.NAME".to_string(),
        ]));
    }

    #[test]
    fn matching_elements_are_updated_and_orphans_deleted_last() {
        let desired = table_map([table("PERSON", &["NAME"]), table("ADDRESS", &["STREET"])]);

        let change_set = diff(&desired, &existing(indoc! {r#"
            <database>
                <table name="PERSON" tableType="TABLE">
                    <column name="NAME"/>
                    <column name="AGE"/>
                </table>
                <table name="LEGACY" tableType="TABLE"/>
            </database>
        "#}));

        let summary: Vec<_> = change_set.changes.iter()
            .map(|c| match c {
                DocumentChange::CreateTable { name, .. } => format!("create {}", name),
                DocumentChange::UpdateTable { name, .. } => format!("update {}", name),
                DocumentChange::DeleteTable { name } => format!("delete {}", name),
                DocumentChange::CreateChild { id, .. } => format!("create {}", id),
                DocumentChange::UpdateChild { id, .. } => format!("update {}", id),
                DocumentChange::DeleteChild { table, key, .. } => format!("delete {}.{}", table, key.local_id()),
            })
            .collect();

        assert_eq!(summary, vec![
            "update PERSON",
            "update TABLE.PERSON.NAME",
            "create ADDRESS",
            "create TABLE.ADDRESS.STREET",
            "delete PERSON.AGE",
            "delete LEGACY",
        ]);
    }

    #[test]
    fn table_names_match_exactly() {
        let desired = table_map([table("person", &[])]);

        let change_set = diff(&desired, &existing(r#"<database><table name="PERSON" tableType="TABLE"/></database>"#));

        assert!(matches!(&change_set.changes[0], DocumentChange::CreateTable { name, .. } if name == "person"));
        assert!(matches!(&change_set.changes[1], DocumentChange::DeleteTable { name } if name == "PERSON"));
    }

    #[test]
    fn same_named_tables_keep_each_others_children() {
        let desired = table_map([
            of_type("person", TableType::Table, &["id", "name"]),
            of_type("person", TableType::View, &["a"]),
        ]);

        let change_set = diff(&desired, &existing(indoc! {r#"
            <database>
                <table id="VIEW.person" name="person" tableType="VIEW">
                    <column id="TABLE.person.id" name="id"/>
                    <column id="TABLE.person.name" name="name"/>
                    <column id="VIEW.person.a" name="a"/>
                    <column id="TABLE.person.gone" name="gone"/>
                </table>
            </database>
        "#}));

        let deletes: Vec<_> = change_set.changes.iter().filter(|c| c.is_delete()).collect();

        assert_eq!(deletes, vec![&DocumentChange::DeleteChild {
            table: "person".to_string(),
            kind: ChildKind::Column,
            key: NaturalKey::new(vec![("name", "gone".to_string())]),
        }]);
    }

    #[test]
    fn unmatched_tables_holding_a_known_id_are_kept() {
        let desired = table_map([table("PERSON", &["NAME"])]);

        let change_set = diff(&desired, &existing(indoc! {r#"
            <database>
                <table id="TABLE.PERSON" name="PERSON" tableType="TABLE"/>
                <table id="TABLE.PERSON" name="PEOPLE" tableType="TABLE">
                    <column id="TABLE.PERSON.NAME" name="NAME"/>
                    <column id="TABLE.PEOPLE.AGE" name="AGE"/>
                </table>
            </database>
        "#}));

        let deletes: Vec<_> = change_set.changes.iter().filter(|c| c.is_delete()).collect();

        assert_eq!(deletes, vec![&DocumentChange::DeleteChild {
            table: "PEOPLE".to_string(),
            kind: ChildKind::Column,
            key: NaturalKey::new(vec![("name", "AGE".to_string())]),
        }]);
    }
}
