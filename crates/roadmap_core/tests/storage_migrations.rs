use roadmap_core::db::migrations::latest_version;
use roadmap_core::db::{open_db, open_db_in_memory, DbError};
use roadmap_core::{PersistenceGateway, SqliteGateway};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_kv_store() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_eq!(
        column_names(&conn, "kv_store"),
        vec!["key", "value", "updated_at"]
    );
}

#[test]
fn reopening_keeps_schema_and_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roadmap.db");

    let gateway = SqliteGateway::open(&path).unwrap();
    gateway.set("theme", "light").unwrap();
    drop(gateway);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    let gateway = SqliteGateway::from_connection(conn);
    assert_eq!(gateway.get("theme").unwrap().as_deref(), Some("light"));
}

#[test]
fn newer_schema_version_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = SqliteGateway::open(&path).err().expect("open should fail");
    match err {
        DbError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn column_names(conn: &Connection, table: &str) -> Vec<String> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table});"))
        .unwrap();
    let mut rows = stmt.query([]).unwrap();
    let mut columns = Vec::new();
    while let Some(row) = rows.next().unwrap() {
        columns.push(row.get::<_, String>(1).unwrap());
    }
    columns
}
