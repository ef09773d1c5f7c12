//! Foreign-key enforcement tests

use crate::common::TestFixture;
use stagedb::data::DatasetCache;
use stagedb::loader::StageLoader;
use stagedb::queries;
use stagedb::schema::GENRES;
use stagedb::stage::StageHandle;

fn loaded_stage(fixture: &TestFixture) -> StageHandle {
    let data_dir = fixture.write_dataset().unwrap();
    let cache = DatasetCache::load(&data_dir).unwrap();

    let handle = fixture.bootstrapped_stage("01").unwrap();
    let mut loader = StageLoader::new(500, false);
    loader.load_flat(&handle, &cache).unwrap();
    loader.link_relationships(&handle, &cache).unwrap();
    loader.load_ratings(&handle, &cache, 500).unwrap();
    handle
}

#[test]
fn test_cannot_delete_referenced_genre() {
    let fixture = TestFixture::new().unwrap();
    let handle = loaded_stage(&fixture);
    handle.set_foreign_keys(true).unwrap();

    let genre = handle
        .select_one(&queries::select_genre("Comedy"))
        .unwrap()
        .unwrap();
    let genre_id = genre.get_i64("id").unwrap();

    // The engine rejects the delete; the parent row stays intact
    let result = handle.execute(&format!("DELETE FROM {} WHERE id = {}", GENRES, genre_id));
    assert!(result.is_err());

    let still_there = handle
        .select_one(&queries::select_row_by_id(GENRES, genre_id))
        .unwrap();
    assert!(still_there.is_some());
}

#[test]
fn test_cannot_delete_rated_movie() {
    let fixture = TestFixture::new().unwrap();
    let handle = loaded_stage(&fixture);
    handle.set_foreign_keys(true).unwrap();

    let movie = handle
        .select_one(&queries::select_movie_id("tt0369610"))
        .unwrap()
        .unwrap();
    let movie_id = movie.get_i64("id").unwrap();

    let result = handle.execute(&format!("DELETE FROM movies WHERE id = {}", movie_id));
    assert!(result.is_err());

    let still_there = handle
        .select_one(&queries::select_row_by_id("movies", movie_id))
        .unwrap();
    assert!(still_there.is_some());
}

#[test]
fn test_can_delete_unreferenced_movie() {
    let fixture = TestFixture::new().unwrap();
    let handle = fixture.bootstrapped_stage("01").unwrap();
    handle.set_foreign_keys(true).unwrap();

    handle
        .execute(
            "INSERT INTO movies (imdb_id, popularity, budget, revenue, original_title, homepage, \
             tagline, overview, runtime, release_date, budget_adjusted, revenue_adjusted) \
             VALUES ('tt9999999', 1.0, 0, 0, 'Orphan Movie', '', '', '', 90, '2020-01-01', 0.0, 0.0)",
        )
        .unwrap();

    let movie = handle
        .select_one(&queries::select_movie_id("tt9999999"))
        .unwrap()
        .unwrap();
    let movie_id = movie.get_i64("id").unwrap();

    handle
        .execute(&format!("DELETE FROM movies WHERE id = {}", movie_id))
        .unwrap();

    let gone = handle
        .select_one(&queries::select_row_by_id("movies", movie_id))
        .unwrap();
    assert!(gone.is_none());
}

#[test]
fn test_enforcement_is_off_unless_enabled() {
    let fixture = TestFixture::new().unwrap();
    let handle = loaded_stage(&fixture);

    // Default session leaves foreign keys unenforced; the delete succeeds
    // and orphans the junction rows.
    let genre = handle
        .select_one(&queries::select_genre("Crime"))
        .unwrap()
        .unwrap();
    let genre_id = genre.get_i64("id").unwrap();

    handle
        .execute(&format!("DELETE FROM {} WHERE id = {}", GENRES, genre_id))
        .unwrap();

    let gone = handle
        .select_one(&queries::select_row_by_id(GENRES, genre_id))
        .unwrap();
    assert!(gone.is_none());
}
