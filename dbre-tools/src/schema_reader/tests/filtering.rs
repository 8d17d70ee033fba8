use crate::schema_reader::tests;
use crate::test_helpers;
use crate::test_helpers::TestHelper;
use crate::TableFilter;
use dbre_test_macros::pg_test;

async fn create_tables(helper: &TestHelper) {
    helper.execute_not_query(r#"
    create table person(id int4 not null);
    create table person_audit(id int4 not null);
    create table address(id int4 not null);
    create schema billing;
    create table billing.invoice(id int4 not null);
    "#).await;
}

fn names(tables: &crate::TableMap) -> Vec<&str> {
    tables.values().map(|t| t.name()).collect()
}

#[pg_test(arg(postgres = 15))]
async fn filter_values_are_folded_to_lower_case(helper: &TestHelper) {
    create_tables(helper).await;

    let tables = tests::read_tables(helper, &TableFilter::for_table("PERSON")).await;
    assert_eq!(names(&tables), vec!["person"]);

    let tables = tests::read_tables(helper, &TableFilter {
        schema: Some("BILLING".to_string()),
        ..Default::default()
    }).await;
    assert_eq!(names(&tables), vec!["invoice"]);
}

#[pg_test(arg(postgres = 15))]
async fn like_and_glob_patterns(helper: &TestHelper) {
    create_tables(helper).await;

    let tables = tests::read_tables(helper, &TableFilter {
        schema: Some("public".to_string()),
        table: Some("person%".to_string()),
        ..Default::default()
    }).await;
    assert_eq!(names(&tables), vec!["person", "person_audit"]);

    let tables = tests::read_tables(helper, &TableFilter {
        schema: Some("public".to_string()),
        exclude_tables: vec!["*_AUDIT".to_string()],
        ..Default::default()
    }).await;
    assert_eq!(names(&tables), vec!["address", "person"]);
}
