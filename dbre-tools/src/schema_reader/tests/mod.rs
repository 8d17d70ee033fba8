mod columns;
mod filtering;
mod keys;

use super::*;
use crate::test_helpers::TestHelper;

pub async fn read_tables(helper: &TestHelper, filter: &TableFilter) -> TableMap {
    let conn = helper.get_conn();
    let reader = SchemaReader::new(conn, conn.identifier_case());
    reader.read_tables(filter).await.unwrap()
}

pub async fn read_all_tables(helper: &TestHelper, create_statement: &str) -> TableMap {
    helper.execute_not_query(create_statement).await;

    read_tables(helper, &TableFilter::default()).await
}
