//! Command implementations for the stagedb CLI

use crate::cli::{Commands, LoadPhase, OutputFormat};
use crate::data::DatasetCache;
use crate::error::{Result, StagedbError};
use crate::loader::StageLoader;
use crate::schema;
use crate::stage::StageStore;
use crate::workspace::StagedbWorkspace;
use std::path::Path;

/// Execute a command
pub fn execute_command(command: Commands, workspace_path: Option<&Path>) -> Result<()> {
    match command {
        Commands::Init { force } => init_command(workspace_path, force),
        Commands::Create { stage } => create_command(workspace_path, &stage),
        Commands::Clone { source, target } => clone_command(workspace_path, &source, &target),
        Commands::Load {
            data_dir,
            stage,
            phase,
            batch_size,
            ratings_batch_size,
        } => load_command(
            workspace_path,
            &data_dir,
            &stage,
            &phase,
            batch_size,
            ratings_batch_size,
        ),
        Commands::Exec {
            stage,
            sql,
            foreign_keys,
        } => exec_command(workspace_path, &stage, &sql, foreign_keys),
        Commands::Query { stage, sql, format } => query_command(workspace_path, &stage, &sql, &format),
        Commands::List { format } => list_command(workspace_path, &format),
    }
}

fn store(workspace_path: Option<&Path>) -> Result<StageStore> {
    let workspace = StagedbWorkspace::find_or_create(workspace_path)?;
    Ok(StageStore::new(workspace))
}

/// Initialize stagedb workspace
fn init_command(workspace_path: Option<&Path>, force: bool) -> Result<()> {
    let current_dir = std::env::current_dir()?;
    let root = workspace_path.unwrap_or(&current_dir);

    let workspace = if force {
        let workspace = StagedbWorkspace::from_root(root.to_path_buf())?;
        std::fs::create_dir_all(&workspace.stagedb_dir)?;
        workspace.create_config_with_force(true)?;
        workspace.ensure_gitignore()?;
        workspace
    } else {
        // For init, always create in the specified directory rather than
        // searching parent directories for an existing workspace
        StagedbWorkspace::create_new(root.to_path_buf())?
    };

    println!("✅ Initialized stagedb workspace at: {}", workspace.root.display());
    println!("📁 Stage directory: {}", workspace.stagedb_dir.display());

    Ok(())
}

/// Create a lineage-root stage and apply the base schema
fn create_command(workspace_path: Option<&Path>, stage: &str) -> Result<()> {
    let store = store(workspace_path)?;
    let handle = store.create_fresh(stage)?;
    schema::bootstrap(&handle)?;

    println!("✅ Created stage '{}' with base schema", stage);
    Ok(())
}

/// Clone an existing stage into a new one
fn clone_command(workspace_path: Option<&Path>, source: &str, target: &str) -> Result<()> {
    let store = store(workspace_path)?;
    store.clone_from(source, target)?;

    println!("✅ Cloned stage '{}' into '{}'", source, target);
    Ok(())
}

/// Load CSV data into a stage
fn load_command(
    workspace_path: Option<&Path>,
    data_dir: &Path,
    stage: &str,
    phase: &str,
    batch_size: usize,
    ratings_batch_size: usize,
) -> Result<()> {
    let phase = LoadPhase::parse(phase).map_err(StagedbError::invalid_input)?;
    let store = store(workspace_path)?;
    let handle = store.open(stage)?;

    let cache = DatasetCache::load(data_dir)?;
    let mut loader = StageLoader::new(batch_size, true);

    if matches!(phase, LoadPhase::Flat | LoadPhase::All) {
        let counts = loader.load_flat(&handle, &cache)?;
        println!(
            "✅ Loaded flat data into stage '{}': {} actors, {} keywords, {} directors, {} genres, {} companies, {} movies",
            stage,
            counts.actors,
            counts.keywords,
            counts.directors,
            counts.genres,
            counts.production_companies,
            counts.movies
        );
    }

    if matches!(phase, LoadPhase::Links | LoadPhase::All) {
        let links = loader.link_relationships(&handle, &cache)?;
        println!("✅ Linked {} relationship rows on stage '{}'", links, stage);
    }

    if matches!(phase, LoadPhase::Ratings | LoadPhase::All) {
        let ratings = loader.load_ratings(&handle, &cache, ratings_batch_size)?;
        println!("✅ Loaded {} ratings into stage '{}'", ratings, stage);
    }

    Ok(())
}

/// Execute raw SQL against a stage
fn exec_command(
    workspace_path: Option<&Path>,
    stage: &str,
    sql: &str,
    foreign_keys: bool,
) -> Result<()> {
    let store = store(workspace_path)?;
    let handle = store.open(stage)?;

    if foreign_keys {
        handle.set_foreign_keys(true)?;
    }
    handle.execute(sql)?;

    println!("✅ Executed against stage '{}'", stage);
    Ok(())
}

/// Run a read query and print the result rows
fn query_command(workspace_path: Option<&Path>, stage: &str, sql: &str, format: &str) -> Result<()> {
    let format = OutputFormat::parse(format).map_err(StagedbError::invalid_input)?;
    let store = store(workspace_path)?;
    let handle = store.open(stage)?;

    let rows = handle.select_many(sql)?;

    match format {
        OutputFormat::Json => {
            let values: Vec<serde_json::Value> = rows.iter().map(|r| r.to_json()).collect();
            println!("{}", serde_json::to_string_pretty(&values)?);
        }
        OutputFormat::Pretty => {
            if rows.is_empty() {
                println!("(no rows)");
            } else {
                for row in &rows {
                    let rendered: Vec<String> = row
                        .columns()
                        .map(|c| format!("{}={}", c, render_value(row.get(c))))
                        .collect();
                    println!("{}", rendered.join("  "));
                }
                println!("({} rows)", rows.len());
            }
        }
    }

    Ok(())
}

fn render_value(value: Option<&rusqlite::types::Value>) -> String {
    use rusqlite::types::Value;
    match value {
        Some(Value::Null) | None => "NULL".to_string(),
        Some(Value::Integer(i)) => i.to_string(),
        Some(Value::Real(r)) => r.to_string(),
        Some(Value::Text(s)) => s.clone(),
        Some(Value::Blob(b)) => format!("<blob:{} bytes>", b.len()),
    }
}

/// List all stages in the workspace
fn list_command(workspace_path: Option<&Path>, format: &str) -> Result<()> {
    let format = OutputFormat::parse(format).map_err(StagedbError::invalid_input)?;
    let workspace = StagedbWorkspace::find_or_create(workspace_path)?;
    let stages = workspace.list_stages()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stages)?);
        }
        OutputFormat::Pretty => {
            if stages.is_empty() {
                println!("No stages found");
            } else {
                let stats = workspace.stats()?;
                for stage in &stages {
                    println!("  {}", stage);
                }
                println!("({} stages, {} bytes)", stats.stage_count, stats.total_db_size);
            }
        }
    }

    Ok(())
}
