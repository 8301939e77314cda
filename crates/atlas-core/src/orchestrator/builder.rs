//! Builder for creating and configuring Orchestrator instances.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::debug;

use super::Orchestrator;
use crate::{
    classifier::{Classifier, KeywordClassifier},
    config::OrchestratorConfig,
    error::{AtlasError, Result},
    specialist::{KnowledgeBase, SampleCatalog, Specialists, TravelData},
    store::{PlanStore, SqliteStore},
};

/// Builder for creating and configuring Orchestrator instances.
#[derive(Clone, Default)]
pub struct OrchestratorBuilder {
    database_path: Option<PathBuf>,
    store: Option<Arc<dyn PlanStore>>,
    config: Option<OrchestratorConfig>,
    travel: Option<Arc<dyn TravelData>>,
    knowledge: Option<Arc<dyn KnowledgeBase>>,
    classifier: Option<Arc<dyn Classifier>>,
}

impl OrchestratorBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/atlas/atlas.db` or `~/.local/share/atlas/atlas.db`.
    /// Ignored when a store is supplied with [`Self::with_store`].
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Uses an existing store instead of opening a SQLite file.
    pub fn with_store(mut self, store: Arc<dyn PlanStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Travel data for the flight, hotel and activities specialists.
    pub fn with_travel_data(mut self, travel: Arc<dyn TravelData>) -> Self {
        self.travel = Some(travel);
        self
    }

    /// Knowledge source for the destination specialist.
    pub fn with_knowledge_base(mut self, knowledge: Arc<dyn KnowledgeBase>) -> Self {
        self.knowledge = Some(knowledge);
        self
    }

    /// Decides which specialists a `continue` input makes stale.
    pub fn with_classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Builds the configured orchestrator.
    ///
    /// # Errors
    ///
    /// Returns `AtlasError::Configuration` if the configuration is invalid
    /// Returns `AtlasError::FileSystem` if the database path is invalid
    /// Returns `AtlasError::Database` if database initialization fails
    pub async fn build(self) -> Result<Orchestrator> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let store: Arc<dyn PlanStore> = match self.store {
            Some(store) => store,
            None => {
                let db_path = match self.database_path {
                    Some(path) => path,
                    None => Self::default_database_path()?,
                };
                debug!("Opening plan database at {}", db_path.display());
                Arc::new(SqliteStore::open(db_path).await?)
            }
        };

        let catalog = Arc::new(SampleCatalog::new());
        let travel: Arc<dyn TravelData> = match self.travel {
            Some(travel) => travel,
            None => catalog.clone(),
        };
        let knowledge: Arc<dyn KnowledgeBase> = match self.knowledge {
            Some(knowledge) => knowledge,
            None => catalog,
        };
        let classifier: Arc<dyn Classifier> = match self.classifier {
            Some(classifier) => classifier,
            None => Arc::new(KeywordClassifier),
        };

        Ok(Orchestrator::new(
            store,
            Specialists::new(travel, knowledge),
            classifier,
            config,
        ))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("atlas")
            .place_data_file("atlas.db")
            .map_err(|e| AtlasError::XdgDirectory(e.to_string()))
    }
}
