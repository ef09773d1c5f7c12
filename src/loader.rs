//! Staged population routines for the movies dataset
//!
//! Drives the Bulk Loader against a stage in the order the lineage
//! expects: flat entity tables first, then the movies table, then junction
//! links and ratings resolved against previously inserted ids.

use crate::bulk;
use crate::data::{DatasetCache, Movie};
use crate::error::{Result, StagedbError};
use crate::progress::ProgressReporter;
use crate::queries;
use crate::schema::{
    ACTORS, DIRECTORS, GENRES, KEYWORDS, MOVIES, MOVIE_ACTORS, MOVIE_DIRECTORS, MOVIE_GENRES,
    MOVIE_KEYWORDS, MOVIE_PRODUCTION_COMPANIES, MOVIE_RATINGS, PRODUCTION_COMPANIES,
};
use crate::sql::SqlValue;
use crate::stage::StageHandle;
use indexmap::IndexMap;
use std::collections::HashMap;

const MOVIE_COLUMNS: [&str; 12] = [
    "imdb_id",
    "popularity",
    "budget",
    "revenue",
    "original_title",
    "homepage",
    "tagline",
    "overview",
    "runtime",
    "release_date",
    "budget_adjusted",
    "revenue_adjusted",
];

/// Row counts submitted by a flat-data load.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FlatLoadCounts {
    pub actors: usize,
    pub keywords: usize,
    pub directors: usize,
    pub genres: usize,
    pub production_companies: usize,
    pub movies: usize,
}

/// Loader for populating one stage from the dataset cache.
pub struct StageLoader {
    batch_size: usize,
    progress: ProgressReporter,
}

impl StageLoader {
    pub fn new(batch_size: usize, show_progress: bool) -> Self {
        let progress = if show_progress {
            ProgressReporter::new_for_load()
        } else {
            ProgressReporter::new_minimal()
        };

        Self {
            batch_size,
            progress,
        }
    }

    /// Load the flat tables: name/lookup entities plus the movies table.
    pub fn load_flat(
        &mut self,
        handle: &StageHandle,
        cache: &DatasetCache,
    ) -> Result<FlatLoadCounts> {
        let counts = FlatLoadCounts {
            actors: self.load_names(handle, ACTORS, "full_name", cache.actors())?,
            keywords: self.load_names(handle, KEYWORDS, "keyword", cache.keywords())?,
            directors: self.load_names(handle, DIRECTORS, "full_name", cache.directors())?,
            genres: self.load_names(handle, GENRES, "genre", cache.genres())?,
            production_companies: self.load_names(
                handle,
                PRODUCTION_COMPANIES,
                "company_name",
                cache.production_companies(),
            )?,
            movies: self.load_movies(handle, cache.movies())?,
        };

        log::info!(
            "Loaded flat data into stage {}: {} movies",
            handle.label(),
            counts.movies
        );
        Ok(counts)
    }

    fn load_names(
        &mut self,
        handle: &StageHandle,
        table: &str,
        column: &str,
        names: &[String],
    ) -> Result<usize> {
        self.progress.start_table(table, names.len() as u64);

        let rows: Vec<Vec<SqlValue>> = names
            .iter()
            .map(|name| vec![SqlValue::from(name.clone())])
            .collect();
        let inserted = bulk::insert_batched(handle, table, &[column], &rows, self.batch_size)?;

        self.progress
            .finish_table(&format!("Loaded {} rows into {}", inserted, table));
        Ok(inserted)
    }

    fn load_movies(&mut self, handle: &StageHandle, movies: &[Movie]) -> Result<usize> {
        self.progress.start_table(MOVIES, movies.len() as u64);

        let rows: Vec<Vec<SqlValue>> = movies.iter().map(movie_row).collect();
        let inserted = bulk::insert_batched(handle, MOVIES, &MOVIE_COLUMNS, &rows, self.batch_size)?;

        self.progress
            .finish_table(&format!("Loaded {} rows into {}", inserted, MOVIES));
        Ok(inserted)
    }

    /// Populate the junction tables by resolving the ids inserted by
    /// [`StageLoader::load_flat`]. Returns the total number of links.
    pub fn link_relationships(
        &mut self,
        handle: &StageHandle,
        cache: &DatasetCache,
    ) -> Result<usize> {
        self.progress.start_phase("Linking movie relationships...");

        let movie_ids = id_map(handle, MOVIES, "imdb_id")?;
        let actor_ids = id_map(handle, ACTORS, "full_name")?;
        let keyword_ids = id_map(handle, KEYWORDS, "keyword")?;
        let director_ids = id_map(handle, DIRECTORS, "full_name")?;
        let genre_ids = id_map(handle, GENRES, "genre")?;
        let company_ids = id_map(handle, PRODUCTION_COMPANIES, "company_name")?;

        let mut total = 0;
        for (junction, fk_column, ids, values) in [
            (MOVIE_ACTORS, "actor_id", &actor_ids, movie_field(cache, |m| &m.cast)),
            (MOVIE_KEYWORDS, "keyword_id", &keyword_ids, movie_field(cache, |m| &m.keywords)),
            (MOVIE_DIRECTORS, "director_id", &director_ids, movie_field(cache, |m| &m.directors)),
            (MOVIE_GENRES, "genre_id", &genre_ids, movie_field(cache, |m| &m.genres)),
            (
                MOVIE_PRODUCTION_COMPANIES,
                "company_id",
                &company_ids,
                movie_field(cache, |m| &m.production_companies),
            ),
        ] {
            let mut rows = Vec::new();
            for (imdb_id, names) in values {
                let movie_id = resolve(&movie_ids, imdb_id, MOVIES)?;
                for name in names {
                    let entity_id = resolve(ids, name, junction)?;
                    rows.push(vec![SqlValue::Integer(movie_id), SqlValue::Integer(entity_id)]);
                }
            }
            total +=
                bulk::insert_batched(handle, junction, &["movie_id", fk_column], &rows, self.batch_size)?;
        }

        self.progress
            .finish_table(&format!("Linked {} relationship rows", total));
        log::info!("Linked {} relationship rows on stage {}", total, handle.label());
        Ok(total)
    }

    /// Load ratings, resolving each movie's id first and issuing one
    /// single-row INSERT per rating, concatenated per batch.
    pub fn load_ratings(
        &mut self,
        handle: &StageHandle,
        cache: &DatasetCache,
        batch_size: usize,
    ) -> Result<usize> {
        self.progress
            .start_table(MOVIE_RATINGS, cache.ratings().len() as u64);

        // Group by movie, preserving first-seen order
        let mut by_imdb_id: IndexMap<&str, Vec<&crate::data::Rating>> = IndexMap::new();
        for rating in cache.ratings() {
            by_imdb_id
                .entry(rating.imdb_id.as_str())
                .or_default()
                .push(rating);
        }

        let mut total = 0;
        for (imdb_id, ratings) in by_imdb_id {
            let movie_id = handle
                .select_one(&queries::select_movie_id(imdb_id))?
                .and_then(|row| row.get_i64("id"))
                .ok_or_else(|| {
                    StagedbError::data_source(format!("no movie found for imdb id {}", imdb_id))
                })?;

            let rows: Vec<Vec<SqlValue>> = ratings
                .iter()
                .map(|r| {
                    vec![
                        SqlValue::Integer(r.user_id),
                        SqlValue::Integer(movie_id),
                        SqlValue::Real(r.rating),
                        SqlValue::Text(r.time_created.clone()),
                    ]
                })
                .collect();

            total += bulk::insert_each_batched(
                handle,
                MOVIE_RATINGS,
                &["user_id", "movie_id", "rating", "time_created"],
                &rows,
                batch_size,
            )?;
            self.progress.update_rows(total as u64);
        }

        self.progress
            .finish_table(&format!("Loaded {} rows into {}", total, MOVIE_RATINGS));
        log::info!("Loaded {} ratings on stage {}", total, handle.label());
        Ok(total)
    }
}

fn movie_row(movie: &Movie) -> Vec<SqlValue> {
    vec![
        SqlValue::Text(movie.imdb_id.clone()),
        SqlValue::Real(movie.popularity),
        SqlValue::Integer(movie.budget),
        SqlValue::Integer(movie.revenue),
        SqlValue::Text(movie.original_title.clone()),
        SqlValue::Text(movie.homepage.clone()),
        SqlValue::OptionalText(movie.tagline.clone()),
        SqlValue::Text(movie.overview.clone()),
        SqlValue::Integer(movie.runtime),
        SqlValue::Text(movie.release_date.clone()),
        SqlValue::Real(movie.budget_adjusted),
        SqlValue::Real(movie.revenue_adjusted),
    ]
}

/// Per-movie multi-valued field, keyed by imdb id.
fn movie_field<'a>(
    cache: &'a DatasetCache,
    field: impl Fn(&'a Movie) -> &'a Vec<String>,
) -> Vec<(&'a str, &'a Vec<String>)> {
    cache
        .movies()
        .iter()
        .map(|m| (m.imdb_id.as_str(), field(m)))
        .collect()
}

fn id_map(handle: &StageHandle, table: &str, key_column: &str) -> Result<HashMap<String, i64>> {
    let rows = handle.select_many(&format!("SELECT id, {} FROM {}", key_column, table))?;
    let mut map = HashMap::with_capacity(rows.len());
    for row in rows {
        if let (Some(id), Some(key)) = (row.get_i64("id"), row.get_str(key_column)) {
            map.insert(key.to_string(), id);
        }
    }
    Ok(map)
}

fn resolve(ids: &HashMap<String, i64>, key: &str, context: &str) -> Result<i64> {
    ids.get(key).copied().ok_or_else(|| {
        StagedbError::data_source(format!("no id found for '{}' while loading {}", key, context))
    })
}
