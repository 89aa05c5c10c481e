use std::fmt;

use super::error::MixError;

pub const PLAYLIST_ID_LEN: usize = 22;

const URI_PREFIX: &str = "spotify:playlist:";
const LINK_HOST: &str = "open.spotify.com";

/// A validated playlist id, parsed from a share link or a `spotify:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistRef(String);

impl PlaylistRef {
    pub fn parse(input: &str) -> Result<Self, MixError> {
        let invalid = || MixError::InvalidPlaylistRef(input.trim().to_string());

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(invalid());
        }
        let decoded = urlencoding::decode(trimmed).map_err(|_| invalid())?;

        let token = if let Some(rest) = decoded.strip_prefix(URI_PREFIX) {
            rest
        } else {
            id_from_link(&decoded).ok_or_else(invalid)?
        };

        if is_playlist_token(token) {
            Ok(PlaylistRef(token.to_string()))
        } else {
            Err(invalid())
        }
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaylistRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{URI_PREFIX}{}", self.0)
    }
}

fn id_from_link(link: &str) -> Option<&str> {
    let without_scheme = link
        .strip_prefix("https://")
        .or_else(|| link.strip_prefix("http://"))
        .unwrap_or(link);
    let path = without_scheme.strip_prefix(LINK_HOST)?;
    let path = path.split(&['?', '#'][..]).next().unwrap_or("");

    let mut segments = path.split('/').filter(|s| !s.is_empty());
    // optional locale segment, e.g. /intl-de/playlist/<id>
    let mut head = segments.next()?;
    if head.starts_with("intl-") {
        head = segments.next()?;
    }
    if head != "playlist" {
        return None;
    }
    let id = segments.next()?;
    match segments.next() {
        None => Some(id),
        Some(_) => None,
    }
}

fn is_playlist_token(s: &str) -> bool {
    s.len() == PLAYLIST_ID_LEN && s.bytes().all(|b| b.is_ascii_alphanumeric())
}
