use tracing::debug;
use crate::persisted_format::*;
use crate::reconcile::diff::DocumentChange;
use crate::{DbreError, Document, Element, Result};

/// Applies the changes to the document in order.
///
/// Creates and updates are both upserts: the element is located, or appended when it is missing,
/// and its attributes are overwritten in place. Attributes the element doesn't have yet are
/// appended in the order they are given.
pub fn apply_changes(document: &mut Document, changes: &[DocumentChange]) -> Result {
    let root = document.root_mut();

    for change in changes {
        match change {
            DocumentChange::CreateTable { name, id, attributes } | DocumentChange::UpdateTable { name, id, attributes } => {
                debug!(%id, "Upserting table");
                let element = root.find_or_append_child(TABLE_ELEMENT, |e| e.attribute(NAME_ATTRIBUTE) == Some(name.as_str()));
                write_attributes(element, attributes, &[]);
            }
            DocumentChange::DeleteTable { name } => {
                debug!(%name, "Removing table");
                root.remove_children(TABLE_ELEMENT, |e| e.attribute(NAME_ATTRIBUTE) == Some(name.as_str()));
            }
            DocumentChange::CreateChild { table, kind, key, id, attributes } | DocumentChange::UpdateChild { table, kind, key, id, attributes } => {
                debug!(%id, "Upserting {}", kind.element_name());
                let table_element = find_table(root, table)?;
                let element = table_element.find_or_append_child(kind.element_name(), |e| key.matches(e));
                write_attributes(element, attributes, kind.optional_attributes());
            }
            DocumentChange::DeleteChild { table, kind, key } => {
                debug!(%table, key = %key.local_id(), "Removing {}", kind.element_name());
                let table_element = find_table(root, table)?;
                table_element.remove_children(kind.element_name(), |e| key.matches(e));
            }
        }
    }

    Ok(())
}

fn find_table<'a>(root: &'a mut Element, name: &str) -> Result<&'a mut Element> {
    root.find_child_mut(TABLE_ELEMENT, |e| e.attribute(NAME_ATTRIBUTE) == Some(name))
        .ok_or_else(|| DbreError::InvalidDocument(format!("no table element named '{}' to change", name)))
}

fn write_attributes(element: &mut Element, attributes: &[(&'static str, String)], optional: &[&'static str]) {
    for (name, value) in attributes {
        element.set_attribute(name, value);
    }

    for name in optional {
        if !attributes.iter().any(|(a, _)| a == name) {
            element.remove_attribute(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use super::*;

    fn column_change(table: &str, name: &str, attributes: Attributes) -> DocumentChange {
        let kind = ChildKind::Column;
        DocumentChange::UpdateChild {
            table: table.to_string(),
            key: kind.natural_key(&attributes),
            id: format!("TABLE.{}.{}", table, name),
            kind,
            attributes,
        }
    }

    #[test]
    fn attributes_are_overwritten_in_place() {
        let mut document = Document::parse(indoc! {r#"
            <database package="">
                <table name="PERSON" custom="kept" tableType="TABLE">
                    <column nullable="true" name="ID" isPk="true" pkSeq="1" note="by hand"/>
                </table>
            </database>
        "#}).unwrap();
        document.normalize_whitespace();

        apply_changes(&mut document, &[
            DocumentChange::UpdateTable {
                name: "PERSON".to_string(),
                id: "TABLE.PERSON".to_string(),
                attributes: vec![("id", "TABLE.PERSON".to_string()), ("name", "PERSON".to_string()), ("tableType", "TABLE".to_string())],
            },
            column_change("PERSON", "ID", vec![("id", "TABLE.PERSON.ID".to_string()), ("name", "ID".to_string()), ("nullable", "false".to_string())]),
        ]).unwrap();

        similar_asserts::assert_eq!(document.to_xml_string().unwrap(), indoc! {r#"
            <?xml version="1.0" encoding="UTF-8" standalone="no"?>
            <database package="">
                <table name="PERSON" custom="kept" tableType="TABLE" id="TABLE.PERSON">
                    <column nullable="false" name="ID" note="by hand" id="TABLE.PERSON.ID"/>
                </table>
            </database>
        "#});
    }

    #[test]
    fn deletes_only_touch_the_matching_element() {
        let mut document = Document::parse(indoc! {r#"
            <database>
                <table name="PERSON"><column name="ID"/><column name="AGE"/></table>
                <table name="ADDRESS"><column name="AGE"/></table>
            </database>
        "#}).unwrap();

        apply_changes(&mut document, &[
            DocumentChange::DeleteChild {
                table: "PERSON".to_string(),
                kind: ChildKind::Column,
                key: NaturalKey::new(vec![("name", "AGE".to_string())]),
            },
        ]).unwrap();

        let tables: Vec<_> = document.root().child_elements("table").collect();
        assert_eq!(tables[0].child_elements("column").map(|c| c.attribute("name").unwrap()).collect::<Vec<_>>(), vec!["ID"]);
        assert_eq!(tables[1].child_elements("column").count(), 1);
    }

    #[test]
    fn children_of_a_missing_table_are_an_error() {
        let mut document = Document::parse("<database/>").unwrap();

        let result = apply_changes(&mut document, &[column_change("PERSON", "ID", vec![("name", "ID".to_string())])]);

        assert!(matches!(result, Err(DbreError::InvalidDocument(_))));
    }
}
