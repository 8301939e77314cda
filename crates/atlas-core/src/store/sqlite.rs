//! SQLite-backed plan store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::task;

use super::{PlanMutator, PlanStore};
use crate::db::Database;
use crate::error::{AtlasError, JoinResultExt, Result};
use crate::models::{Plan, PlanId};

/// Plan store on a SQLite file.
///
/// Holds only the path; every operation opens its own connection on the
/// blocking pool, so concurrent requests never share a connection and
/// coordinate through SQLite's locking alone.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    /// Creates parent directories and initializes the schema.
    ///
    /// # Errors
    ///
    /// Returns `AtlasError::FileSystem` if the parent directory cannot be
    /// created, `AtlasError::Database` if schema setup fails.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| AtlasError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let init_path = db_path.clone();
        task::spawn_blocking(move || Database::new(&init_path).map(|_| ()))
            .await
            .join_context()??;

        Ok(Self { db_path })
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }
}

#[async_trait]
impl PlanStore for SqliteStore {
    async fn create(&self, plan: &Plan) -> Result<()> {
        let db_path = self.db_path.clone();
        let plan = plan.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.insert_plan(&plan)
        })
        .await
        .join_context()?
    }

    async fn get(&self, plan_id: &PlanId) -> Result<Plan> {
        let db_path = self.db_path.clone();
        let plan_id = plan_id.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_plan(&plan_id)?
                .ok_or(AtlasError::NotFound { plan_id })
        })
        .await
        .join_context()?
    }

    async fn update(
        &self,
        plan_id: &PlanId,
        expected_turn: u64,
        mutator: PlanMutator,
    ) -> Result<Plan> {
        let db_path = self.db_path.clone();
        let plan_id = plan_id.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.update_plan(&plan_id, expected_turn, mutator)
        })
        .await
        .join_context()?
    }
}
