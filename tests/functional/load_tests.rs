//! Bulk-load tests: batching, escaping, and the staged dataset flow

use crate::common::TestFixture;
use stagedb::data::DatasetCache;
use stagedb::loader::StageLoader;
use stagedb::schema::{ACTORS, MOVIES, MOVIE_RATINGS};
use stagedb::sql::SqlValue;
use stagedb::{bulk, queries};

fn name_rows(names: &[&str]) -> Vec<Vec<SqlValue>> {
    names.iter().map(|n| vec![SqlValue::from(*n)]).collect()
}

#[test]
fn test_insert_actors_with_batch_size_one() {
    let fixture = TestFixture::new().unwrap();
    let handle = fixture.bootstrapped_stage("01").unwrap();

    // Batch size 1 forces two separate INSERT statements
    let rows = name_rows(&["Tom Hardy", "Tom Hanks"]);
    let inserted = bulk::insert_batched(&handle, ACTORS, &["full_name"], &rows, 1).unwrap();
    assert_eq!(inserted, 2);

    let count = handle
        .select_one(&queries::select_count(ACTORS))
        .unwrap()
        .unwrap();
    assert_eq!(count.get_i64("c"), Some(2));

    let actor = handle
        .select_one(&queries::select_actor_by_name("Tom Hardy"))
        .unwrap()
        .unwrap();
    assert!(actor.get_i64("id").is_some());
    assert_eq!(actor.get_str("full_name"), Some("Tom Hardy"));
}

#[test]
fn test_count_matches_for_any_batch_size() {
    let names = ["a", "b", "c", "d", "e", "f", "g"];

    for batch_size in [1, 3, 7, 500] {
        let fixture = TestFixture::new().unwrap();
        let handle = fixture.bootstrapped_stage("01").unwrap();

        let before = handle.select_count(ACTORS).unwrap();
        let inserted =
            bulk::insert_batched(&handle, ACTORS, &["full_name"], &name_rows(&names), batch_size)
                .unwrap();

        assert_eq!(inserted, names.len());
        assert_eq!(
            handle.select_count(ACTORS).unwrap(),
            before + names.len() as i64,
            "batch size {}",
            batch_size
        );
    }
}

#[test]
fn test_escaping_round_trip() {
    let fixture = TestFixture::new().unwrap();
    let handle = fixture.bootstrapped_stage("01").unwrap();

    let rows = name_rows(&["O'Brien"]);
    bulk::insert_batched(&handle, ACTORS, &["full_name"], &rows, 500).unwrap();

    let actor = handle
        .select_one(&queries::select_actor_by_name("O'Brien"))
        .unwrap()
        .unwrap();
    assert_eq!(actor.get_str("full_name"), Some("O'Brien"));
}

#[test]
fn test_staged_dataset_flow() {
    let fixture = TestFixture::new().unwrap();
    let store = fixture.store();
    let data_dir = fixture.write_dataset().unwrap();
    let cache = DatasetCache::load(&data_dir).unwrap();

    // Stage 01: schema only
    drop(fixture.bootstrapped_stage("01").unwrap());

    // Stage 02: flat data, cloned from 01
    {
        let stage2 = store.clone_from("01", "02").unwrap();
        let mut loader = StageLoader::new(500, false);
        let counts = loader.load_flat(&stage2, &cache).unwrap();

        assert_eq!(counts.movies, 3);
        assert_eq!(stage2.select_count(MOVIES).unwrap(), 3);
        assert_eq!(
            stage2.select_count(ACTORS).unwrap(),
            cache.actors().len() as i64
        );

        // Title with an apostrophe survives the load
        let movie = stage2
            .select_one(&queries::select_movie("tt0240772"))
            .unwrap()
            .unwrap();
        assert_eq!(movie.get_str("original_title"), Some("Ocean's Eleven"));

        // Absent tagline was rendered as empty string, not NULL
        let inside_out = stage2
            .select_one(&queries::select_movie("tt2096673"))
            .unwrap()
            .unwrap();
        assert_eq!(inside_out.get_str("tagline"), Some(""));
    }

    // Stage 03: ratings, cloned from 02
    {
        let stage3 = store.clone_from("02", "03").unwrap();
        let mut loader = StageLoader::new(500, false);
        let ratings = loader.load_ratings(&stage3, &cache, 2).unwrap();

        assert_eq!(ratings, 4);
        assert_eq!(stage3.select_count(MOVIE_RATINGS).unwrap(), 4);

        let row = stage3
            .select_one(&queries::select_ratings_by_user_id(2))
            .unwrap()
            .unwrap();
        assert!(row.get_i64("id").is_some());
        assert_eq!(row.get_i64("user_id"), Some(2));
        assert_eq!(row.get_f64("rating"), Some(3.0));
        assert_eq!(row.get_str("time_created"), Some("1997-06-23 04:12:48"));
    }

    // Earlier stages were never written by later loads
    assert_eq!(
        store.open("02").unwrap().select_count(MOVIE_RATINGS).unwrap(),
        0
    );
    assert_eq!(store.open("01").unwrap().select_count(MOVIES).unwrap(), 0);
}

#[test]
fn test_both_variants_match_on_real_table() {
    let fixture = TestFixture::new().unwrap();
    let rows = name_rows(&["a", "b", "c", "d", "e"]);

    let multi = fixture.bootstrapped_stage("01").unwrap();
    bulk::insert_batched(&multi, ACTORS, &["full_name"], &rows, 2).unwrap();

    let each = fixture.bootstrapped_stage("02").unwrap();
    bulk::insert_each_batched(&each, ACTORS, &["full_name"], &rows, 2).unwrap();

    assert_eq!(
        multi.select_count(ACTORS).unwrap(),
        each.select_count(ACTORS).unwrap()
    );
}
