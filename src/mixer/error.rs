use thiserror::Error;

use super::selector::SelectionMode;

/// Call-level failures reported by a [`Catalog`](super::catalog::Catalog).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("session expired or not authorized")]
    Unauthorized,
    #[error("rate limited by Spotify")]
    RateLimited,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("Spotify API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("network error: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    Malformed(String),
}

impl CatalogError {
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        match status {
            401 => CatalogError::Unauthorized,
            404 => CatalogError::NotFound(message.into()),
            429 => CatalogError::RateLimited,
            _ => CatalogError::Api { status, message: message.into() },
        }
    }
}

#[derive(Debug, Error)]
pub enum MixError {
    #[error("'{0}' is not a Spotify playlist link or URI")]
    InvalidPlaylistRef(String),
    #[error("pick a mood first")]
    MissingMood,
    #[error("no tracks found")]
    NoTracksFound,
    #[error("{mode} mode needs at least {required} tracks, playlist has {found}")]
    NotEnoughTracks {
        mode: SelectionMode,
        required: usize,
        found: usize,
    },
    #[error("Spotify returned no recommendations for these seeds")]
    NoRecommendations,
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("playlist '{name}' was created but only {inserted} of {total} tracks were added: {source}")]
    PartialPlaylist {
        name: String,
        url: Option<String>,
        inserted: usize,
        total: usize,
        #[source]
        source: CatalogError,
    },
}

impl MixError {
    /// Short suggestion shown under the error message.
    pub fn hint(&self) -> &'static str {
        match self {
            MixError::InvalidPlaylistRef(_) => {
                "Paste a link like https://open.spotify.com/playlist/… or a spotify:playlist:… URI"
            }
            MixError::MissingMood => "Use ↑/↓ on the mood list to choose one",
            MixError::NoTracksFound => "The playlist may be empty, or its tracks have no audio features",
            MixError::NotEnoughTracks { .. } => "Try a bigger playlist or another mode",
            MixError::NoRecommendations => "Try the distance or shuffle mode instead",
            MixError::Catalog(CatalogError::Unauthorized) => "Restart moodmix to log in again",
            MixError::Catalog(CatalogError::RateLimited) => "Wait a minute and submit again",
            MixError::Catalog(_) => {
                "Check that the playlist is accessible to your account and that the endpoint is enabled for your app"
            }
            MixError::PartialPlaylist { .. } => "The playlist was kept; add the rest by hand or submit again",
        }
    }

    /// Whether the failure was caught before any request went out.
    pub fn is_input_error(&self) -> bool {
        matches!(self, MixError::InvalidPlaylistRef(_) | MixError::MissingMood)
    }
}
