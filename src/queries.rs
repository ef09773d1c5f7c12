//! Select-statement generators for the movies schema
//!
//! Interpolated values pass through [`crate::sql::escape`]; callers hand
//! the generated text to the query facade.

use crate::schema::{ACTORS, DIRECTORS, GENRES, KEYWORDS, MOVIES, MOVIE_RATINGS, PRODUCTION_COMPANIES};
use crate::sql::escape;

pub fn select_count(table: &str) -> String {
    format!("SELECT COUNT(*) AS c FROM {}", table)
}

pub fn select_row_by_id(table: &str, id: i64) -> String {
    format!("SELECT * FROM {} WHERE id = {}", table, id)
}

pub fn select_actor_by_name(name: &str) -> String {
    format!(
        "SELECT * FROM {} WHERE full_name = '{}'",
        ACTORS,
        escape(name)
    )
}

pub fn select_director_by_name(name: &str) -> String {
    format!(
        "SELECT * FROM {} WHERE full_name = '{}'",
        DIRECTORS,
        escape(name)
    )
}

pub fn select_keyword(keyword: &str) -> String {
    format!(
        "SELECT * FROM {} WHERE keyword = '{}'",
        KEYWORDS,
        escape(keyword)
    )
}

pub fn select_genre(genre: &str) -> String {
    format!("SELECT * FROM {} WHERE genre = '{}'", GENRES, escape(genre))
}

pub fn select_production_company(name: &str) -> String {
    format!(
        "SELECT * FROM {} WHERE company_name = '{}'",
        PRODUCTION_COMPANIES,
        escape(name)
    )
}

pub fn select_movie(imdb_id: &str) -> String {
    format!(
        "SELECT * FROM {} WHERE imdb_id = '{}'",
        MOVIES,
        escape(imdb_id)
    )
}

pub fn select_movie_id(imdb_id: &str) -> String {
    format!(
        "SELECT id FROM {} WHERE imdb_id = '{}'",
        MOVIES,
        escape(imdb_id)
    )
}

pub fn select_ratings_by_user_id(user_id: i64) -> String {
    format!(
        "SELECT * FROM {} WHERE user_id = {} ORDER BY id LIMIT 1",
        MOVIE_RATINGS, user_id
    )
}
