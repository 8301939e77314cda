//! Collaborator interfaces the reference specialists query.
//!
//! Both traits are external capabilities: a structured travel-data source and
//! a free-text knowledge retrieval service. [`super::SampleCatalog`] is a
//! deterministic stand-in for both.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Activity, FlightOption, HotelOption};

/// Error returned by a collaborator call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct CollaboratorError {
    pub message: String,
    /// Whether the same call may succeed if repeated
    pub retryable: bool,
}

impl CollaboratorError {
    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retryable: true,
        }
    }

    pub fn permanent(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retryable: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightQuery {
    pub origin: Option<String>,
    pub destination: String,
    pub days: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotelQuery {
    pub city: String,
    pub nights: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityQuery {
    pub city: String,
    pub days: u32,
    pub interests: Vec<String>,
}

/// Structured travel-data queries by city, dates and budget.
#[async_trait]
pub trait TravelData: Send + Sync {
    async fn search_flights(
        &self,
        query: &FlightQuery,
    ) -> Result<Vec<FlightOption>, CollaboratorError>;

    async fn search_hotels(&self, query: &HotelQuery)
        -> Result<Vec<HotelOption>, CollaboratorError>;

    async fn search_activities(
        &self,
        query: &ActivityQuery,
    ) -> Result<Vec<Activity>, CollaboratorError>;
}

/// Semantic retrieval of destination facts.
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    async fn lookup(&self, query: &str) -> Result<Vec<String>, CollaboratorError>;
}
