//! Stage lifecycle tests: creation, cloning, lineage isolation

use crate::common::TestFixture;
use stagedb::StagedbError;

#[test]
fn test_created_stage_survives_reopen() {
    let fixture = TestFixture::new().unwrap();
    let store = fixture.store();

    {
        let handle = store.create_fresh("01").unwrap();
        handle
            .execute(
                "CREATE TABLE names (id INTEGER PRIMARY KEY, full_name TEXT NOT NULL);
                 INSERT INTO names (full_name) VALUES ('Tom Hardy');",
            )
            .unwrap();
    } // handle dropped, file released

    let reopened = store.open("01").unwrap();
    assert_eq!(reopened.select_count("names").unwrap(), 1);
    let row = reopened
        .select_one("SELECT full_name FROM names WHERE id = 1")
        .unwrap()
        .unwrap();
    assert_eq!(row.get_str("full_name"), Some("Tom Hardy"));
}

#[test]
fn test_clone_matches_source_at_clone_time() {
    let fixture = TestFixture::new().unwrap();
    let store = fixture.store();

    {
        let source = store.create_fresh("01").unwrap();
        source
            .execute(
                "CREATE TABLE names (id INTEGER PRIMARY KEY, full_name TEXT NOT NULL);
                 INSERT INTO names (full_name) VALUES ('a'), ('b'), ('c');",
            )
            .unwrap();
    }

    let target = store.clone_from("01", "02").unwrap();
    let source = store.open("01").unwrap();

    let query = "SELECT full_name FROM names ORDER BY id";
    assert_eq!(
        source.select_many(query).unwrap(),
        target.select_many(query).unwrap()
    );
}

#[test]
fn test_clone_isolates_writes_from_source() {
    let fixture = TestFixture::new().unwrap();
    let store = fixture.store();

    {
        let source = store.create_fresh("01").unwrap();
        source
            .execute(
                "CREATE TABLE names (id INTEGER PRIMARY KEY, full_name TEXT NOT NULL);
                 INSERT INTO names (full_name) VALUES ('original');",
            )
            .unwrap();
    }

    let target = store.clone_from("01", "02").unwrap();
    target
        .execute("INSERT INTO names (full_name) VALUES ('only on 02')")
        .unwrap();
    drop(target);

    // Writes to the target never appear when re-querying the source
    let source = store.open("01").unwrap();
    assert_eq!(source.select_count("names").unwrap(), 1);
    assert!(source
        .select_one("SELECT * FROM names WHERE full_name = 'only on 02'")
        .unwrap()
        .is_none());
}

#[test]
fn test_lineage_chain_counts_diverge() {
    let fixture = TestFixture::new().unwrap();
    let store = fixture.store();

    {
        let root = store.create_fresh("01").unwrap();
        root.execute("CREATE TABLE names (id INTEGER PRIMARY KEY, full_name TEXT NOT NULL)")
            .unwrap();
    }

    {
        let stage2 = store.clone_from("01", "02").unwrap();
        stage2
            .execute("INSERT INTO names (full_name) VALUES ('added on 02')")
            .unwrap();
    }

    {
        let stage3 = store.clone_from("02", "03").unwrap();
        stage3
            .execute("INSERT INTO names (full_name) VALUES ('added on 03')")
            .unwrap();
    }

    assert_eq!(store.open("01").unwrap().select_count("names").unwrap(), 0);
    assert_eq!(store.open("02").unwrap().select_count("names").unwrap(), 1);
    assert_eq!(store.open("03").unwrap().select_count("names").unwrap(), 2);
}

#[test]
fn test_lifecycle_violations() {
    let fixture = TestFixture::new().unwrap();
    let store = fixture.store();

    drop(store.create_fresh("01").unwrap());

    assert!(matches!(
        store.create_fresh("01"),
        Err(StagedbError::StageExists { .. })
    ));
    assert!(matches!(
        store.clone_from("01", "01"),
        Err(StagedbError::StageExists { .. })
    ));
    assert!(matches!(
        store.clone_from("99", "02"),
        Err(StagedbError::SourceStageNotFound { .. })
    ));
    assert!(matches!(
        store.open("99"),
        Err(StagedbError::StageNotFound { .. })
    ));
}

#[test]
fn test_workspace_lists_lineage() {
    let fixture = TestFixture::new().unwrap();
    let store = fixture.store();

    drop(store.create_fresh("01").unwrap());
    drop(store.clone_from("01", "02").unwrap());

    assert_eq!(
        fixture.workspace.list_stages().unwrap(),
        vec!["01".to_string(), "02".to_string()]
    );
    assert!(fixture.workspace.stage_exists("02"));
    assert!(!fixture.workspace.stage_exists("03"));
}
