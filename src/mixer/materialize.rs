use tracing::{info, warn};

use super::catalog::{Catalog, CreatedPlaylist, PlaylistDraft};
use super::error::MixError;

pub const ADD_BATCH: usize = 100;

/// Creates the destination playlist and appends `tracks` in order, one
/// request per `ADD_BATCH` ids. A failed batch stops the run; the playlist
/// and the batches already added stay in place.
pub async fn materialize<C: Catalog + ?Sized>(
    catalog: &C,
    owner: &str,
    draft: &PlaylistDraft,
    tracks: &[String],
) -> Result<CreatedPlaylist, MixError> {
    let playlist = catalog.create_playlist(owner, draft).await?;
    info!(playlist = %playlist.id, name = %playlist.name, "playlist created");

    let mut inserted = 0usize;
    for batch in tracks.chunks(ADD_BATCH) {
        if let Err(source) = catalog.add_tracks(&playlist.id, batch).await {
            warn!(playlist = %playlist.id, inserted, total = tracks.len(), "batch insert failed: {source}");
            return Err(MixError::PartialPlaylist {
                name: playlist.name,
                url: playlist.url,
                inserted,
                total: tracks.len(),
                source,
            });
        }
        inserted += batch.len();
    }

    Ok(playlist)
}
