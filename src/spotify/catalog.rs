use async_trait::async_trait;
use rspotify::{
    http::HttpError,
    model::{PlayableId, PlayableItem, PlaylistId, TrackId, UserId},
    prelude::*,
    ClientError, ClientResult, Token,
};
use serde::Deserialize;
use std::{collections::HashMap, sync::Arc};
use tracing::{debug, warn};

use crate::cache::Cache;
use crate::mixer::catalog::{
    Catalog, CreatedPlaylist, PlaylistDraft, RecommendationOutcome, RecommendationQuery, TrackPage,
};
use crate::mixer::features::FeatureVector;
use crate::mixer::CatalogError;

use super::{persist_token, SharedSpotify};

/// [`Catalog`] backed by the Spotify Web API.
pub struct SpotifyCatalog {
    spotify: SharedSpotify,
    cache: Arc<Cache>,
}

impl SpotifyCatalog {
    pub fn new(spotify: SharedSpotify, cache: Arc<Cache>) -> Self {
        SpotifyCatalog { spotify, cache }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
    #[serde(default)]
    error_description: Option<String>,
}

/// Web API errors nest an object; the accounts service uses a bare code.
#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Api { message: String },
    Code(String),
}

/// The provider's own message from an error response body, if it has one.
pub(crate) fn error_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    let message = match parsed.error {
        ErrorDetail::Api { message } => message,
        ErrorDetail::Code(code) => parsed.error_description.unwrap_or(code),
    };
    let message = message.trim();
    (!message.is_empty()).then(|| message.to_string())
}

async fn map_client_error(err: ClientError) -> CatalogError {
    match err {
        ClientError::Http(http) => match *http {
            HttpError::StatusCode(response) => {
                let status = response.status();
                let fallback = status.canonical_reason().unwrap_or("request failed").to_string();
                let message = match response.text().await {
                    Ok(body) => error_message(&body).unwrap_or(fallback),
                    Err(e) => {
                        debug!("could not read error body: {e}");
                        fallback
                    }
                };
                CatalogError::from_status(status.as_u16(), message)
            }
            other => CatalogError::Transport(other.to_string()),
        },
        ClientError::ParseJson(e) => CatalogError::Malformed(e.to_string()),
        other => CatalogError::Transport(other.to_string()),
    }
}

async fn checked<T>(result: ClientResult<T>) -> Result<T, CatalogError> {
    match result {
        Ok(value) => Ok(value),
        Err(e) => Err(map_client_error(e).await),
    }
}

#[derive(Deserialize)]
struct AudioFeaturesPayload {
    audio_features: Vec<Option<FeatureVector>>,
}

#[derive(Deserialize)]
struct RecommendationsPayload {
    tracks: Vec<RecommendedTrack>,
}

#[derive(Deserialize)]
struct RecommendedTrack {
    id: Option<String>,
}

pub(crate) fn parse_audio_features(body: &str, expected: usize) -> Result<Vec<Option<FeatureVector>>, CatalogError> {
    let payload: AudioFeaturesPayload =
        serde_json::from_str(body).map_err(|e| CatalogError::Malformed(e.to_string()))?;
    if payload.audio_features.len() != expected {
        warn!(
            got = payload.audio_features.len(),
            expected, "audio-features answered with a different count"
        );
    }
    Ok(payload.audio_features)
}

pub(crate) fn parse_recommendations(body: &str) -> Result<Vec<String>, CatalogError> {
    let payload: RecommendationsPayload =
        serde_json::from_str(body).map_err(|e| CatalogError::Malformed(e.to_string()))?;
    Ok(payload.tracks.into_iter().filter_map(|t| t.id).collect())
}

/// Query parameters for `GET /recommendations`.
pub(crate) fn recommendation_params(query: &RecommendationQuery) -> Vec<(String, String)> {
    let mut params = vec![
        ("seed_tracks".to_string(), query.seed_tracks.join(",")),
        ("limit".to_string(), query.limit.to_string()),
    ];
    if let Some(market) = &query.market {
        params.push(("market".to_string(), market.clone()));
    }
    for (attr, value) in &query.targets {
        params.push((format!("target_{attr}"), value.to_string()));
    }
    params
}

#[async_trait]
impl Catalog for SpotifyCatalog {
    async fn refresh_if_expired(&self) -> Result<bool, CatalogError> {
        let sp = self.spotify.lock().await;
        let expired = {
            let token = sp
                .token
                .lock()
                .await
                .map_err(|_| CatalogError::Transport("token store unavailable".into()))?;
            token.as_ref().map_or(true, Token::is_expired)
        };
        if !expired {
            return Ok(false);
        }
        checked(sp.refresh_token().await).await?;
        if let Err(e) = persist_token(&sp, &self.cache).await {
            warn!("Could not cache refreshed token: {e}");
        }
        Ok(true)
    }

    async fn playlist_tracks(&self, playlist_id: &str, offset: u32, limit: u32) -> Result<TrackPage, CatalogError> {
        let pid = PlaylistId::from_id(playlist_id.to_owned()).map_err(|e| CatalogError::NotFound(e.to_string()))?;
        let sp = self.spotify.lock().await;
        let page = checked(
            sp.playlist_items_manual(pid, None, None, Some(limit), Some(offset))
                .await,
        )
        .await?;

        let count = page.items.len() as u32;
        let next = page.next.as_ref().map(|_| offset + count);
        let items = page
            .items
            .into_iter()
            .map(|item| match item.track {
                Some(PlayableItem::Track(track)) => track.id.map(|id| id.id().to_string()),
                _ => None,
            })
            .collect();
        Ok(TrackPage { items, next })
    }

    async fn feature_vectors(&self, ids: &[String]) -> Result<Vec<Option<FeatureVector>>, CatalogError> {
        let joined = ids.join(",");
        let mut params = HashMap::new();
        params.insert("ids", joined.as_str());

        let sp = self.spotify.lock().await;
        let body = checked(sp.api_get("audio-features", &params).await).await?;
        parse_audio_features(&body, ids.len())
    }

    async fn recommendations(&self, query: &RecommendationQuery) -> Result<RecommendationOutcome, CatalogError> {
        let owned = recommendation_params(query);
        let params: HashMap<&str, &str> = owned.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        debug!(relaxed = query.is_relaxed(), "requesting recommendations");

        let sp = self.spotify.lock().await;
        match sp.api_get("recommendations", &params).await {
            Ok(body) => Ok(RecommendationOutcome::from_tracks(parse_recommendations(&body)?)),
            Err(e) => match map_client_error(e).await {
                CatalogError::Api { status: 400, message } => Ok(RecommendationOutcome::Rejected(message)),
                CatalogError::NotFound(message) => Ok(RecommendationOutcome::Rejected(message)),
                other => Err(other),
            },
        }
    }

    async fn create_playlist(&self, owner: &str, draft: &PlaylistDraft) -> Result<CreatedPlaylist, CatalogError> {
        let user = UserId::from_id(owner.to_owned()).map_err(|e| CatalogError::Malformed(e.to_string()))?;
        let sp = self.spotify.lock().await;
        let playlist = checked(
            sp.user_playlist_create(
                user,
                &draft.name,
                Some(draft.public),
                Some(false),
                Some(&draft.description),
            )
            .await,
        )
        .await?;

        Ok(CreatedPlaylist {
            id: playlist.id.id().to_string(),
            name: playlist.name,
            url: playlist.external_urls.get("spotify").cloned(),
        })
    }

    async fn add_tracks(&self, playlist_id: &str, ids: &[String]) -> Result<(), CatalogError> {
        let pid = PlaylistId::from_id(playlist_id.to_owned()).map_err(|e| CatalogError::NotFound(e.to_string()))?;
        let items = ids
            .iter()
            .map(|id| TrackId::from_id(id.clone()).map(PlayableId::Track))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CatalogError::Malformed(e.to_string()))?;

        let sp = self.spotify.lock().await;
        checked(sp.playlist_add_items(pid, items, None).await).await?;
        Ok(())
    }
}
