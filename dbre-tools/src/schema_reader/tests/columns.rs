use crate::schema_reader::tests;
use crate::test_helpers;
use crate::test_helpers::TestHelper;
use crate::{default, Column, IdentifiableTable, TableType};
use dbre_test_macros::pg_test;

#[pg_test(arg(postgres = 12))]
#[pg_test(arg(postgres = 13))]
#[pg_test(arg(postgres = 14))]
#[pg_test(arg(postgres = 15))]
#[pg_test(arg(postgres = 16))]
async fn reads_columns(helper: &TestHelper) {
    let tables = tests::read_all_tables(helper, r#"
    create table person(
        id int4 not null,
        name varchar(50),
        balance numeric(12, 2) not null,
        created timestamp
    );

    comment on column person.name is 'Full name';
    "#).await;

    assert_eq!(tables.len(), 1);

    let table = &tables[&IdentifiableTable::new(None, None, "PERSON", TableType::Table)];

    assert_eq!(table.columns(), &[
        Column {
            name: "balance".to_string(),
            data_type: 2,
            column_size: 12,
            decimal_digits: 2,
            nullable: false,
            type_name: "numeric".to_string(),
            ..default()
        },
        Column {
            name: "created".to_string(),
            data_type: 93,
            column_size: 29,
            decimal_digits: 6,
            nullable: true,
            type_name: "timestamp".to_string(),
            ..default()
        },
        Column {
            name: "id".to_string(),
            data_type: 4,
            column_size: 10,
            decimal_digits: 0,
            nullable: false,
            type_name: "int4".to_string(),
            ..default()
        },
        Column {
            name: "name".to_string(),
            data_type: 12,
            column_size: 50,
            decimal_digits: 0,
            nullable: true,
            remarks: Some("Full name".to_string()),
            type_name: "varchar".to_string(),
            ..default()
        },
    ]);
}

#[pg_test(arg(postgres = 15))]
async fn reads_views(helper: &TestHelper) {
    let tables = tests::read_all_tables(helper, r#"
    create table person(id int4 not null, active bool not null);
    create view active_person as select id from person where active;
    "#).await;

    let view = &tables[&IdentifiableTable::new(None, None, "active_person", TableType::View)];

    assert_eq!(view.identity().canonical_id(), "VIEW.active_person");
    assert_eq!(view.columns().len(), 1);
    assert!(view.primary_keys().is_empty());
}
