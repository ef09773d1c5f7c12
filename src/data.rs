//! CSV data source for the movies dataset
//!
//! The cache is caller-owned: [`DatasetCache::load`] reads the CSV files
//! exactly once and memoizes both the typed records and the distinct-name
//! derivations. Records are produced here, consumed once by the loader,
//! and never mutated.

use crate::error::{Result, StagedbError};
use indexmap::IndexSet;
use serde::Deserialize;
use std::path::Path;

/// One movie row, coerced to the column types of the movies table.
///
/// Multi-valued fields (genres, keywords, cast, directors, production
/// companies) arrive pipe-separated in the CSV and are split here.
#[derive(Debug, Clone)]
pub struct Movie {
    pub imdb_id: String,
    pub popularity: f64,
    pub budget: i64,
    pub revenue: i64,
    pub original_title: String,
    pub homepage: String,
    pub tagline: Option<String>,
    pub overview: String,
    pub runtime: i64,
    pub release_date: String,
    pub budget_adjusted: f64,
    pub revenue_adjusted: f64,
    pub genres: Vec<String>,
    pub keywords: Vec<String>,
    pub cast: Vec<String>,
    pub directors: Vec<String>,
    pub production_companies: Vec<String>,
}

/// One rating row from ratings.csv.
#[derive(Debug, Clone, Deserialize)]
pub struct Rating {
    pub imdb_id: String,
    pub user_id: i64,
    pub rating: f64,
    pub time_created: String,
}

#[derive(Debug, Deserialize)]
struct MovieRecord {
    imdb_id: String,
    popularity: f64,
    budget: i64,
    revenue: i64,
    original_title: String,
    homepage: String,
    tagline: String,
    overview: String,
    runtime: i64,
    release_date: String,
    budget_adjusted: f64,
    revenue_adjusted: f64,
    genres: String,
    keywords: String,
    cast: String,
    directors: String,
    production_companies: String,
}

impl From<MovieRecord> for Movie {
    fn from(record: MovieRecord) -> Self {
        Movie {
            imdb_id: record.imdb_id,
            popularity: record.popularity,
            budget: record.budget,
            revenue: record.revenue,
            original_title: record.original_title,
            homepage: record.homepage,
            tagline: if record.tagline.is_empty() {
                None
            } else {
                Some(record.tagline)
            },
            overview: record.overview,
            runtime: record.runtime,
            release_date: record.release_date,
            budget_adjusted: record.budget_adjusted,
            revenue_adjusted: record.revenue_adjusted,
            genres: split_list(&record.genres),
            keywords: split_list(&record.keywords),
            cast: split_list(&record.cast),
            directors: split_list(&record.directors),
            production_companies: split_list(&record.production_companies),
        }
    }
}

fn split_list(field: &str) -> Vec<String> {
    field
        .split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Load-once cache over the dataset directory.
pub struct DatasetCache {
    movies: Vec<Movie>,
    ratings: Vec<Rating>,
    actors: Vec<String>,
    keywords: Vec<String>,
    directors: Vec<String>,
    genres: Vec<String>,
    production_companies: Vec<String>,
}

impl DatasetCache {
    /// Read movies.csv and ratings.csv from `dir` and memoize the records
    /// and the distinct-name derivations.
    pub fn load(dir: &Path) -> Result<Self> {
        let movies_path = dir.join("movies.csv");
        if !movies_path.exists() {
            return Err(StagedbError::data_source(format!(
                "movies.csv not found in {}",
                dir.display()
            )));
        }

        let mut movies = Vec::new();
        let mut reader = csv::Reader::from_path(&movies_path)?;
        for record in reader.deserialize::<MovieRecord>() {
            movies.push(Movie::from(record?));
        }

        // ratings.csv is optional: early stages only need the flat data
        let ratings_path = dir.join("ratings.csv");
        let mut ratings = Vec::new();
        if ratings_path.exists() {
            let mut reader = csv::Reader::from_path(&ratings_path)?;
            for record in reader.deserialize::<Rating>() {
                ratings.push(record?);
            }
        }

        let actors = distinct(movies.iter().flat_map(|m| m.cast.iter()));
        let keywords = distinct(movies.iter().flat_map(|m| m.keywords.iter()));
        let directors = distinct(movies.iter().flat_map(|m| m.directors.iter()));
        let genres = distinct(movies.iter().flat_map(|m| m.genres.iter()));
        let production_companies =
            distinct(movies.iter().flat_map(|m| m.production_companies.iter()));

        log::info!(
            "Loaded {} movies and {} ratings from {}",
            movies.len(),
            ratings.len(),
            dir.display()
        );

        Ok(Self {
            movies,
            ratings,
            actors,
            keywords,
            directors,
            genres,
            production_companies,
        })
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn ratings(&self) -> &[Rating] {
        &self.ratings
    }

    /// Distinct cast names, in first-seen order.
    pub fn actors(&self) -> &[String] {
        &self.actors
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn directors(&self) -> &[String] {
        &self.directors
    }

    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    pub fn production_companies(&self) -> &[String] {
        &self.production_companies
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    let set: IndexSet<&String> = values.collect();
    set.into_iter().cloned().collect()
}
