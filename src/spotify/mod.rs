use anyhow::{anyhow, Result};
use rspotify::{
    clients::{BaseClient, OAuthClient},
    prelude::*,
    scopes, AuthCodePkceSpotify, Config as SpotifyConfig, Credentials, OAuth,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::cache::Cache;
use crate::config::Config;

pub mod auth;
pub mod catalog;

const TOKEN_CACHE_KEY: &str = "moodmix:spotify_token";
const TOKEN_TTL_SECS: u64 = 3600 * 24;

pub type SharedSpotify = Arc<Mutex<AuthCodePkceSpotify>>;

/// The logged-in user and the client acting for them. Passed explicitly to
/// everything that talks to Spotify.
#[derive(Clone)]
pub struct Session {
    pub spotify: SharedSpotify,
    pub user_id: String,
    pub display_name: String,
}

impl Session {
    pub async fn open(spotify: SharedSpotify) -> Result<Self> {
        let me = {
            let sp = spotify.lock().await;
            sp.me().await?
        };
        let user_id = me.id.id().to_string();
        let display_name = me.display_name.clone().unwrap_or_else(|| user_id.clone());
        info!(user = %user_id, "session opened");
        Ok(Session {
            spotify,
            user_id,
            display_name,
        })
    }
}

/// Builds the client. Returns the authorize URL when the user still has to
/// log in, or `None` when a cached token was refreshed successfully.
pub async fn build_spotify_client(config: &Config, cache: &Cache) -> Result<(SharedSpotify, Option<String>)> {
    let creds = Credentials::new(&config.client_id, &config.client_secret);

    let scopes = scopes!(
        "playlist-read-private",
        "playlist-read-collaborative",
        "playlist-modify-public",
        "playlist-modify-private",
        "user-library-read",
        "user-read-private"
    );

    let oauth = OAuth {
        redirect_uri: config.redirect_uri.clone(),
        scopes,
        ..Default::default()
    };

    let sp_config = SpotifyConfig {
        token_refreshing: true,
        ..Default::default()
    };

    let mut spotify = AuthCodePkceSpotify::with_config(creds, oauth, sp_config);

    if let Ok(Some(token_json)) = cache.get(TOKEN_CACHE_KEY).await {
        if let Ok(token) = serde_json::from_str::<rspotify::Token>(&token_json) {
            info!("Loaded cached token from Redis");
            *spotify.token.lock().await.map_err(|_| anyhow!("token store unavailable"))? = Some(token);

            match spotify.refresh_token().await {
                Ok(()) => {
                    persist_token(&spotify, cache).await?;
                    return Ok((Arc::new(Mutex::new(spotify)), None));
                }
                Err(e) => {
                    warn!("Cached token could not be refreshed ({e}), logging in again");
                    *spotify.token.lock().await.map_err(|_| anyhow!("token store unavailable"))? = None;
                    cache.delete(TOKEN_CACHE_KEY).await.ok();
                }
            }
        }
    }

    let url = spotify.get_authorize_url(None)?;
    info!("Auth URL generated");

    Ok((Arc::new(Mutex::new(spotify)), Some(url)))
}

/// Exchanges the redirect `code` for a token and caches it.
pub async fn complete_auth(spotify: &SharedSpotify, code: &str, cache: &Cache) -> Result<()> {
    let sp = spotify.lock().await;
    sp.request_token(code).await?;
    persist_token(&sp, cache).await
}

/// The OAuth `state` the redirect must echo back.
pub async fn expected_state(spotify: &SharedSpotify) -> String {
    spotify.lock().await.oauth.state.clone()
}

pub async fn persist_token(spotify: &AuthCodePkceSpotify, cache: &Cache) -> Result<()> {
    let token_json = {
        let guard = spotify.token.lock().await.map_err(|_| anyhow!("token store unavailable"))?;
        match guard.as_ref() {
            Some(token) => serde_json::to_string(token)?,
            None => return Ok(()),
        }
    };
    cache.set(TOKEN_CACHE_KEY, &token_json, Some(TOKEN_TTL_SECS)).await?;
    info!("Token saved to cache");
    Ok(())
}
