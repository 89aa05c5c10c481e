use async_trait::async_trait;

use super::error::CatalogError;
use super::features::{Attribute, FeatureVector};

/// One page of a playlist's entries. `None` marks an entry with no usable
/// track id (local file, episode, region-blocked track).
#[derive(Debug, Clone, Default)]
pub struct TrackPage {
    pub items: Vec<Option<String>>,
    /// Offset of the next page, if there is one.
    pub next: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationQuery {
    pub seed_tracks: Vec<String>,
    /// Mood targets, sent as `target_<attribute>`. Empty for a relaxed query.
    pub targets: Vec<(Attribute, f64)>,
    pub limit: u32,
    /// ISO country code; `None` lets the provider use the token's market.
    pub market: Option<String>,
}

impl RecommendationQuery {
    pub fn relaxed(&self) -> Self {
        RecommendationQuery {
            targets: Vec::new(),
            ..self.clone()
        }
    }

    pub fn is_relaxed(&self) -> bool {
        self.targets.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecommendationOutcome {
    Accepted(Vec<String>),
    Empty,
    /// The provider refused the parameters (e.g. for this market).
    Rejected(String),
}

impl RecommendationOutcome {
    pub fn from_tracks(ids: Vec<String>) -> Self {
        if ids.is_empty() {
            RecommendationOutcome::Empty
        } else {
            RecommendationOutcome::Accepted(ids)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistDraft {
    pub name: String,
    pub description: String,
    pub public: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreatedPlaylist {
    pub id: String,
    pub name: String,
    pub url: Option<String>,
}

/// Everything the mixer needs from the streaming provider.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Refreshes the bearer credential if it has expired. Returns whether a
    /// refresh happened.
    async fn refresh_if_expired(&self) -> Result<bool, CatalogError>;

    async fn playlist_tracks(
        &self,
        playlist_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<TrackPage, CatalogError>;

    /// One entry per requested id, in request order; `None` where the
    /// provider has no features. Callers pass at most 100 ids.
    async fn feature_vectors(&self, ids: &[String]) -> Result<Vec<Option<FeatureVector>>, CatalogError>;

    async fn recommendations(&self, query: &RecommendationQuery) -> Result<RecommendationOutcome, CatalogError>;

    async fn create_playlist(&self, owner: &str, draft: &PlaylistDraft) -> Result<CreatedPlaylist, CatalogError>;

    async fn add_tracks(&self, playlist_id: &str, ids: &[String]) -> Result<(), CatalogError>;
}
