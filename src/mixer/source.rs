use std::collections::HashSet;

use tracing::debug;

use super::catalog::Catalog;
use super::error::CatalogError;
use super::features::FeatureVector;

pub const PAGE_SIZE: u32 = 100;
pub const FEATURE_BATCH: usize = 100;

/// Collects every track id of a playlist, in playlist order, following the
/// page cursor until it runs out. Entries without an id are skipped and a
/// repeated id is kept once.
pub async fn fetch_all_track_ids<C: Catalog + ?Sized>(
    catalog: &C,
    playlist_id: &str,
    page_size: u32,
) -> Result<Vec<String>, CatalogError> {
    let mut ids = Vec::new();
    let mut seen = HashSet::new();
    let mut skipped = 0usize;
    let mut offset = 0u32;

    loop {
        let page = catalog.playlist_tracks(playlist_id, offset, page_size).await?;
        debug!(offset, items = page.items.len(), "playlist page");

        for id in page.items {
            match id {
                Some(id) if !id.is_empty() => {
                    if seen.insert(id.clone()) {
                        ids.push(id);
                    }
                }
                _ => skipped += 1,
            }
        }

        match page.next {
            // a cursor that does not move forward would loop forever
            Some(next) if next > offset => offset = next,
            _ => break,
        }
    }

    if skipped > 0 {
        debug!(skipped, "playlist entries without a track id");
    }
    Ok(ids)
}

/// Fetches feature vectors for `ids` in provider-sized chunks. The result is
/// aligned with `ids`.
pub async fn fetch_feature_vectors<C: Catalog + ?Sized>(
    catalog: &C,
    ids: &[String],
) -> Result<Vec<Option<FeatureVector>>, CatalogError> {
    let mut vectors = Vec::with_capacity(ids.len());
    for chunk in ids.chunks(FEATURE_BATCH) {
        let mut got = catalog.feature_vectors(chunk).await?;
        // keep alignment even if the provider answers short
        got.resize(chunk.len(), None);
        vectors.extend(got);
    }
    Ok(vectors)
}
