//! Mood mixing engine: turns a source playlist and a mood into a new
//! playlist, talking to the provider only through [`Catalog`].

pub mod catalog;
pub mod error;
pub mod features;
pub mod materialize;
pub mod mood;
pub mod playlist_ref;
pub mod selector;
pub mod source;
#[cfg(test)]
mod tests;

use rand::{rngs::StdRng, SeedableRng};
use tracing::info;

pub use self::catalog::{Catalog, CreatedPlaylist, PlaylistDraft};
pub use self::error::{CatalogError, MixError};
pub use self::mood::Mood;
pub use self::playlist_ref::PlaylistRef;
pub use self::selector::SelectionMode;

use self::materialize::materialize;
use self::selector::{rank_by_distance, recommend, sample_seeds, shuffle_seed, shuffled, DISTANCE_CAP};
use self::source::{fetch_all_track_ids, fetch_feature_vectors, PAGE_SIZE};

/// What the user submitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MixRequest {
    pub playlist: String,
    pub mood: Option<Mood>,
    pub custom_name: Option<String>,
    pub mode: SelectionMode,
    pub public: bool,
}

impl MixRequest {
    fn custom_name(&self) -> Option<&str> {
        self.custom_name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct MixSettings {
    /// ISO country code for recommendations; `None` uses the token's market.
    pub market: Option<String>,
    pub page_size: u32,
}

impl Default for MixSettings {
    fn default() -> Self {
        MixSettings {
            market: None,
            page_size: PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MixOutcome {
    pub playlist: CreatedPlaylist,
    pub mood: Mood,
    pub mode: SelectionMode,
    pub track_count: usize,
    /// Informational messages, e.g. a relaxed recommendation fallback.
    pub notices: Vec<String>,
    /// The credential was refreshed during this run and should be persisted.
    pub refreshed_credential: bool,
}

pub fn playlist_name(mood: Mood, custom_name: Option<&str>) -> String {
    match custom_name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => name.to_string(),
        None => format!("Mood Mix: {mood}"),
    }
}

pub fn playlist_description(mood: Mood, mode: SelectionMode, date: chrono::NaiveDate) -> String {
    format!(
        "{mood} mix: {}. Made with moodmix on {}.",
        mode.describe(),
        date.format("%Y-%m-%d")
    )
}

pub struct Mixer {
    settings: MixSettings,
    rng: StdRng,
}

impl Mixer {
    pub fn new(settings: MixSettings) -> Self {
        Mixer::with_rng(settings, StdRng::from_entropy())
    }

    pub fn with_rng(settings: MixSettings, rng: StdRng) -> Self {
        Mixer { settings, rng }
    }

    /// Runs one mix end to end for the user `owner`. Input problems are
    /// reported before any request is made; nothing is created unless a
    /// non-empty selection was made.
    pub async fn mix<C: Catalog + ?Sized>(
        &mut self,
        catalog: &C,
        owner: &str,
        request: &MixRequest,
    ) -> Result<MixOutcome, MixError> {
        let playlist = PlaylistRef::parse(&request.playlist)?;
        let mood = request.mood.ok_or(MixError::MissingMood)?;
        let mode = request.mode;
        info!(playlist = %playlist.id(), mood = mood.key(), %mode, "starting mix");

        let refreshed_credential = catalog.refresh_if_expired().await?;
        if refreshed_credential {
            info!("access token refreshed");
        }

        let ids = fetch_all_track_ids(catalog, playlist.id(), self.settings.page_size).await?;
        info!(tracks = ids.len(), "source playlist loaded");
        if ids.is_empty() {
            return Err(MixError::NoTracksFound);
        }
        mode.ensure_enough(ids.len())?;

        let mut notices = Vec::new();
        let selection = match mode {
            SelectionMode::Distance => {
                let vectors = fetch_feature_vectors(catalog, &ids).await?;
                let ranked = rank_by_distance(&ids, &vectors, mood.target(), DISTANCE_CAP);
                if ranked.is_empty() {
                    return Err(MixError::NoTracksFound);
                }
                ranked
            }
            SelectionMode::Recommend => {
                let seeds = sample_seeds(&ids, &mut self.rng)?;
                let recommended = recommend(catalog, seeds, mood, self.settings.market.clone()).await?;
                notices.extend(recommended.notice);
                recommended.tracks
            }
            SelectionMode::Shuffle => {
                let seed = shuffle_seed(mood, request.custom_name());
                info!(seed = %hex::encode(&seed[..4]), "shuffling");
                shuffled(&ids, seed)?
            }
        };

        let draft = PlaylistDraft {
            name: playlist_name(mood, request.custom_name()),
            description: playlist_description(mood, mode, chrono::Local::now().date_naive()),
            public: request.public,
        };
        let created = materialize(catalog, owner, &draft, &selection).await?;
        info!(playlist = %created.id, tracks = selection.len(), "mix complete");

        Ok(MixOutcome {
            playlist: created,
            mood,
            mode,
            track_count: selection.len(),
            notices,
            refreshed_credential,
        })
    }
}
