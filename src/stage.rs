//! Stage snapshot store and statement execution
//!
//! A stage is a named, immutable-after-derivation snapshot of the database.
//! Stages form a lineage: each later stage is derived from its predecessor
//! by cloning the whole backing file, never by mutating it in place.

use crate::error::{Result, StagedbError};
use crate::workspace::StagedbWorkspace;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

/// How much statement text to keep when tagging an execution error.
/// Bulk insert statements can run to megabytes.
const STATEMENT_CONTEXT_LEN: usize = 200;

/// Creates and opens stage snapshots backed by the workspace.
///
/// One open handle per stage at a time is a usage contract, not an enforced
/// lock: the store does not protect against concurrent opens of the same
/// stage, and callers are expected to drop a stage's handle before deriving
/// a new stage from it.
pub struct StageStore {
    workspace: StagedbWorkspace,
}

impl StageStore {
    pub fn new(workspace: StagedbWorkspace) -> Self {
        Self { workspace }
    }

    pub fn workspace(&self) -> &StagedbWorkspace {
        &self.workspace
    }

    /// Allocate new, empty backing storage for a stage and open it.
    pub fn create_fresh(&self, label: &str) -> Result<StageHandle> {
        if self.workspace.stage_exists(label) {
            return Err(StagedbError::stage_exists(label));
        }

        fs::create_dir_all(&self.workspace.stagedb_dir)?;
        let path = self.workspace.stage_path(label);
        let conn = Connection::open(&path)?;

        log::info!("Created stage {} at {}", label, path.display());

        Ok(StageHandle {
            label: label.to_string(),
            path: Some(path),
            conn,
        })
    }

    /// Copy the entire backing storage of `source` into new storage for
    /// `target`, then open the target.
    ///
    /// The copy is a full physical one: writes to the target are never
    /// observable on the source. The source stage's handle must be dropped
    /// (or at minimum idle with no open transaction) before cloning, so the
    /// backing file is complete on disk. A failed clone may leave a partial
    /// target file, which the caller must remove before retrying.
    pub fn clone_from(&self, source: &str, target: &str) -> Result<StageHandle> {
        if !self.workspace.stage_exists(source) {
            return Err(StagedbError::source_stage_not_found(source));
        }
        if self.workspace.stage_exists(target) {
            return Err(StagedbError::stage_exists(target));
        }

        let source_path = self.workspace.stage_path(source);
        let target_path = self.workspace.stage_path(target);
        fs::copy(&source_path, &target_path)?;

        log::info!("Cloned stage {} into {}", source, target);

        let conn = Connection::open(&target_path)?;
        Ok(StageHandle {
            label: target.to_string(),
            path: Some(target_path),
            conn,
        })
    }

    /// Open existing storage for a stage without cloning.
    pub fn open(&self, label: &str) -> Result<StageHandle> {
        if !self.workspace.stage_exists(label) {
            return Err(StagedbError::stage_not_found(label));
        }

        let path = self.workspace.stage_path(label);
        let conn = Connection::open(&path)?;

        Ok(StageHandle {
            label: label.to_string(),
            path: Some(path),
            conn,
        })
    }
}

/// An open session bound to exactly one stage's storage.
///
/// The handle owns the underlying connection for its lifetime; dropping it
/// releases the file resource deterministically.
pub struct StageHandle {
    label: String,
    path: Option<PathBuf>,
    pub(crate) conn: Connection,
}

impl StageHandle {
    /// Open an ephemeral in-memory stage, not backed by the workspace.
    pub fn in_memory(label: &str) -> Result<Self> {
        Ok(Self {
            label: label.to_string(),
            path: None,
            conn: Connection::open_in_memory()?,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Backing file path, if any (None for in-memory stages).
    pub fn path(&self) -> Option<&std::path::Path> {
        self.path.as_deref()
    }

    /// Run one or more semicolon-separated statements against the stage.
    ///
    /// Engine errors propagate unchanged, tagged with the statement's
    /// context. No retry, and no application-level transaction: each
    /// statement commits per the session's autocommit setting, so a failing
    /// statement leaves the preceding statements of the same call intact.
    pub fn execute(&self, sql: &str) -> Result<()> {
        self.conn
            .execute_batch(sql)
            .map_err(|e| StagedbError::execution(statement_context(sql), e))
    }

    /// Toggle foreign-key constraint enforcement for this session.
    ///
    /// SQLite defaults to OFF; callers that need referential-integrity
    /// checks must enable it explicitly.
    pub fn set_foreign_keys(&self, enabled: bool) -> Result<()> {
        self.conn
            .pragma_update(None, "foreign_keys", enabled)
            .map_err(StagedbError::from)
    }
}

fn statement_context(sql: &str) -> String {
    let trimmed = sql.trim();
    if trimmed.len() <= STATEMENT_CONTEXT_LEN {
        trimmed.to_string()
    } else {
        let mut end = STATEMENT_CONTEXT_LEN;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &trimmed[..end])
    }
}
