//! Base schema for the movies dataset
//!
//! Applied once per lineage root, when the very first stage is created.
//! Later stages inherit the schema through cloning.

use crate::error::Result;
use crate::stage::StageHandle;

pub const ACTORS: &str = "actors";
pub const KEYWORDS: &str = "keywords";
pub const DIRECTORS: &str = "directors";
pub const GENRES: &str = "genres";
pub const PRODUCTION_COMPANIES: &str = "production_companies";
pub const MOVIES: &str = "movies";
pub const MOVIE_RATINGS: &str = "movie_ratings";
pub const MOVIE_ACTORS: &str = "movie_actors";
pub const MOVIE_DIRECTORS: &str = "movie_directors";
pub const MOVIE_GENRES: &str = "movie_genres";
pub const MOVIE_KEYWORDS: &str = "movie_keywords";
pub const MOVIE_PRODUCTION_COMPANIES: &str = "movie_production_companies";

pub const ALL_RELATIONSHIP_TABLES: [&str; 5] = [
    MOVIE_ACTORS,
    MOVIE_DIRECTORS,
    MOVIE_GENRES,
    MOVIE_KEYWORDS,
    MOVIE_PRODUCTION_COMPANIES,
];

const BASE_SCHEMA: &str = "
CREATE TABLE actors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    full_name TEXT NOT NULL
);

CREATE TABLE keywords (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    keyword TEXT NOT NULL
);

CREATE TABLE directors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    full_name TEXT NOT NULL
);

CREATE TABLE genres (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    genre TEXT NOT NULL
);

CREATE TABLE production_companies (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    company_name TEXT NOT NULL
);

CREATE TABLE movies (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    imdb_id TEXT NOT NULL,
    popularity REAL NOT NULL,
    budget INTEGER NOT NULL,
    revenue INTEGER NOT NULL,
    original_title TEXT NOT NULL,
    homepage TEXT NOT NULL,
    tagline TEXT NOT NULL,
    overview TEXT NOT NULL,
    runtime INTEGER NOT NULL,
    release_date TEXT NOT NULL,
    budget_adjusted REAL NOT NULL,
    revenue_adjusted REAL NOT NULL
);

CREATE TABLE movie_ratings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    movie_id INTEGER NOT NULL,
    rating REAL NOT NULL,
    time_created TEXT NOT NULL,
    FOREIGN KEY (movie_id) REFERENCES movies (id)
);

CREATE TABLE movie_actors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    movie_id INTEGER NOT NULL,
    actor_id INTEGER NOT NULL,
    FOREIGN KEY (movie_id) REFERENCES movies (id),
    FOREIGN KEY (actor_id) REFERENCES actors (id)
);

CREATE TABLE movie_directors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    movie_id INTEGER NOT NULL,
    director_id INTEGER NOT NULL,
    FOREIGN KEY (movie_id) REFERENCES movies (id),
    FOREIGN KEY (director_id) REFERENCES directors (id)
);

CREATE TABLE movie_genres (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    movie_id INTEGER NOT NULL,
    genre_id INTEGER NOT NULL,
    FOREIGN KEY (movie_id) REFERENCES movies (id),
    FOREIGN KEY (genre_id) REFERENCES genres (id)
);

CREATE TABLE movie_keywords (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    movie_id INTEGER NOT NULL,
    keyword_id INTEGER NOT NULL,
    FOREIGN KEY (movie_id) REFERENCES movies (id),
    FOREIGN KEY (keyword_id) REFERENCES keywords (id)
);

CREATE TABLE movie_production_companies (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    movie_id INTEGER NOT NULL,
    company_id INTEGER NOT NULL,
    FOREIGN KEY (movie_id) REFERENCES movies (id),
    FOREIGN KEY (company_id) REFERENCES production_companies (id)
);

CREATE UNIQUE INDEX idx_movies_imdb_id ON movies (imdb_id);
CREATE INDEX idx_movie_ratings_movie_id ON movie_ratings (movie_id);
CREATE INDEX idx_movie_actors_movie_id ON movie_actors (movie_id);
CREATE INDEX idx_movie_directors_movie_id ON movie_directors (movie_id);
CREATE INDEX idx_movie_genres_movie_id ON movie_genres (movie_id);
CREATE INDEX idx_movie_keywords_movie_id ON movie_keywords (movie_id);
CREATE INDEX idx_movie_production_companies_movie_id ON movie_production_companies (movie_id);
";

/// Apply the full table, foreign-key, and index definitions to a freshly
/// created lineage root.
pub fn bootstrap(handle: &StageHandle) -> Result<()> {
    handle.execute(BASE_SCHEMA)?;
    log::info!("Bootstrapped schema on stage {}", handle.label());
    Ok(())
}
