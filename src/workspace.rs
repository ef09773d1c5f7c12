//! Workspace management for stagedb operations

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Manages the .stagedb workspace directory
#[derive(Debug, Clone)]
pub struct StagedbWorkspace {
    /// Project root directory (where .stagedb/ lives)
    pub root: PathBuf,
    /// .stagedb/ directory path
    pub stagedb_dir: PathBuf,
}

impl StagedbWorkspace {
    /// Find existing workspace or create a new one
    pub fn find_or_create(start_dir: Option<&Path>) -> Result<Self> {
        let current_dir = std::env::current_dir()?;
        let start = start_dir.unwrap_or(&current_dir);

        // First try to find an existing .stagedb directory
        if let Some(workspace) = Self::find_existing(start)? {
            return Ok(workspace);
        }

        // If not found, create in current directory or specified directory
        let root = start.to_path_buf();
        Self::create_new(root)
    }

    /// Find existing .stagedb workspace by walking up the directory tree
    fn find_existing(start_dir: &Path) -> Result<Option<Self>> {
        let mut current = start_dir;

        loop {
            let stagedb_dir = current.join(".stagedb");
            if stagedb_dir.exists() && stagedb_dir.is_dir() {
                return Ok(Some(Self::from_root(current.to_path_buf())?));
            }

            // Also check for .git directory as a hint for project root
            let git_dir = current.join(".git");
            if git_dir.exists() {
                // Found git repo but no .stagedb, could create here
                break;
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => break, // Reached filesystem root
            }
        }

        Ok(None)
    }

    /// Create a new workspace in the specified root directory
    pub fn create_new(root: PathBuf) -> Result<Self> {
        let workspace = Self::from_root(root)?;

        fs::create_dir_all(&workspace.stagedb_dir)?;

        // Create initial config file
        workspace.create_config()?;

        // Update .gitignore
        workspace.ensure_gitignore()?;

        log::info!("Created stagedb workspace at: {}", workspace.root.display());

        Ok(workspace)
    }

    /// Create workspace from root directory path
    pub fn from_root(root: PathBuf) -> Result<Self> {
        let stagedb_dir = root.join(".stagedb");

        Ok(Self { root, stagedb_dir })
    }

    /// Get the database file path backing a stage label
    pub fn stage_path(&self, label: &str) -> PathBuf {
        self.stagedb_dir.join(format!("{}.db", label))
    }

    /// List all stage labels with backing storage, sorted
    pub fn list_stages(&self) -> Result<Vec<String>> {
        let mut stages = Vec::new();

        if !self.stagedb_dir.exists() {
            return Ok(stages);
        }

        for entry in fs::read_dir(&self.stagedb_dir)? {
            let entry = entry?;
            let path = entry.path();

            if let Some(extension) = path.extension() {
                if extension == "db" {
                    if let Some(stem) = path.file_stem() {
                        if let Some(label) = stem.to_str() {
                            stages.push(label.to_string());
                        }
                    }
                }
            }
        }

        stages.sort();
        Ok(stages)
    }

    /// Check if a stage has backing storage
    pub fn stage_exists(&self, label: &str) -> bool {
        self.stage_path(label).exists()
    }

    /// Create initial configuration file
    fn create_config(&self) -> Result<()> {
        self.create_config_with_force(false)
    }

    /// Create configuration file with optional force overwrite
    pub fn create_config_with_force(&self, force: bool) -> Result<()> {
        let config_path = self.stagedb_dir.join("config.json");

        if config_path.exists() && !force {
            return Ok(()); // Don't overwrite existing config unless forced
        }

        let config = serde_json::json!({
            "version": crate::FORMAT_VERSION,
            "created": chrono::Utc::now(),
            "default_batch_size": crate::DEFAULT_BATCH_SIZE,
            "fact_batch_size": crate::FACT_BATCH_SIZE
        });

        fs::write(config_path, serde_json::to_string_pretty(&config)?)?;
        Ok(())
    }

    /// Ensure .gitignore contains stagedb entries
    pub fn ensure_gitignore(&self) -> Result<()> {
        let gitignore_path = self.root.join(".gitignore");
        let stagedb_ignore = "# Ignore stage database files\n.stagedb/*.db\n";

        if gitignore_path.exists() {
            let content = fs::read_to_string(&gitignore_path)?;
            if !content.contains(".stagedb/*.db") {
                let new_content = if content.ends_with('\n') {
                    format!("{}\n{}", content, stagedb_ignore)
                } else {
                    format!("{}\n\n{}", content, stagedb_ignore)
                };
                fs::write(gitignore_path, new_content)?;
                log::info!("Updated .gitignore with stagedb entries");
            }
        } else {
            fs::write(gitignore_path, stagedb_ignore)?;
            log::info!("Created .gitignore with stagedb entries");
        }

        Ok(())
    }

    /// Get workspace statistics
    pub fn stats(&self) -> Result<WorkspaceStats> {
        let stages = self.list_stages()?;
        let mut total_db_size = 0u64;

        for label in &stages {
            let path = self.stage_path(label);
            if path.exists() {
                if let Ok(metadata) = fs::metadata(&path) {
                    total_db_size += metadata.len();
                }
            }
        }

        Ok(WorkspaceStats {
            stage_count: stages.len(),
            total_db_size,
        })
    }
}

/// Statistics about the workspace
#[derive(Debug, Default)]
pub struct WorkspaceStats {
    pub stage_count: usize,
    pub total_db_size: u64,
}
