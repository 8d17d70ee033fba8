use crate::schema_reader::tests;
use crate::test_helpers;
use crate::test_helpers::TestHelper;
use crate::{ForeignKey, ForeignKeyColumn, IdentifiableTable, Index, PrimaryKey, TableType, INDEX_CLUSTERED, INDEX_HASHED, INDEX_OTHER};
use dbre_test_macros::pg_test;

#[pg_test(arg(postgres = 12))]
#[pg_test(arg(postgres = 13))]
#[pg_test(arg(postgres = 14))]
#[pg_test(arg(postgres = 15))]
#[pg_test(arg(postgres = 16))]
async fn reads_composite_keys(helper: &TestHelper) {
    let tables = tests::read_all_tables(helper, r#"
    create table orders(
        tenant int4 not null,
        id int4 not null,
        primary key (tenant, id)
    );

    create table order_line(
        line_no int4 not null primary key,
        order_tenant int4 not null,
        order_id int4 not null,
        constraint order_line_order_fk foreign key (order_tenant, order_id) references orders(tenant, id)
    );
    "#).await;

    let orders = &tables[&IdentifiableTable::new(None, None, "orders", TableType::Table)];
    assert_eq!(orders.primary_keys(), vec![
        PrimaryKey { name: "orders_pkey".to_string(), column_name: "tenant".to_string(), key_sequence: 1 },
        PrimaryKey { name: "orders_pkey".to_string(), column_name: "id".to_string(), key_sequence: 2 },
    ]);
    assert_eq!(orders.indexes(), &[
        Index { name: "orders_pkey".to_string(), column_name: "id".to_string(), non_unique: false, sort_type: INDEX_OTHER },
        Index { name: "orders_pkey".to_string(), column_name: "tenant".to_string(), non_unique: false, sort_type: INDEX_OTHER },
    ]);

    let order_line = &tables[&IdentifiableTable::new(None, None, "order_line", TableType::Table)];
    assert_eq!(order_line.foreign_keys(), &[
        ForeignKey::new("order_line_order_fk", "orders", vec![
            ForeignKeyColumn { name: "order_tenant".to_string(), referenced_column: "tenant".to_string(), key_sequence: 1 },
            ForeignKeyColumn { name: "order_id".to_string(), referenced_column: "id".to_string(), key_sequence: 2 },
        ]),
    ]);
    assert_eq!(order_line.primary_key_name(), Some("order_line_pkey"));
}

#[pg_test(arg(postgres = 15))]
async fn reads_index_kinds(helper: &TestHelper) {
    let tables = tests::read_all_tables(helper, r#"
    create table person(id int4 not null, name text not null, email text not null);
    create index person_name_hash on person using hash (name);
    create unique index person_email_lower on person (lower(email));
    "#).await;

    let person = &tables[0];

    assert_eq!(person.indexes(), &[
        Index { name: "person_email_lower".to_string(), column_name: "lower(email)".to_string(), non_unique: false, sort_type: INDEX_OTHER },
        Index { name: "person_name_hash".to_string(), column_name: "name".to_string(), non_unique: true, sort_type: INDEX_HASHED },
    ]);
}

#[pg_test(arg(postgres = 12))]
#[pg_test(arg(postgres = 16))]
async fn index_columns_are_named_like_the_table_columns(helper: &TestHelper) {
    let tables = tests::read_all_tables(helper, r#"
    create table t(id int4 primary key, "Name" text, "order" int4);
    create index t_idx on t("Name", "order");
    cluster t using t_pkey;
    "#).await;

    let t = &tables[0];

    assert_eq!(t.indexes(), &[
        Index { name: "t_idx".to_string(), column_name: "Name".to_string(), non_unique: true, sort_type: INDEX_OTHER },
        Index { name: "t_idx".to_string(), column_name: "order".to_string(), non_unique: true, sort_type: INDEX_OTHER },
        Index { name: "t_pkey".to_string(), column_name: "id".to_string(), non_unique: false, sort_type: INDEX_CLUSTERED },
    ]);
    assert!(t.indexes().iter().all(|i| t.column(&i.column_name).is_some()));
}
