use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use super::catalog::{Catalog, RecommendationOutcome, RecommendationQuery};
use super::error::MixError;
use super::features::{Attribute, FeatureVector};
use super::mood::Mood;

pub const DISTANCE_CAP: usize = 50;
pub const SEED_COUNT: usize = 5;
pub const RECOMMENDATION_LIMIT: u32 = 50;
pub const SHUFFLE_MIN_TRACKS: usize = 3;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    strum_macros::Display,
    strum_macros::EnumIter,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum SelectionMode {
    #[default]
    Distance,
    Recommend,
    Shuffle,
}

impl SelectionMode {
    pub fn min_tracks(self) -> usize {
        match self {
            SelectionMode::Distance => 1,
            SelectionMode::Recommend => SEED_COUNT,
            SelectionMode::Shuffle => SHUFFLE_MIN_TRACKS,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            SelectionMode::Distance => "closest matches from your playlist",
            SelectionMode::Recommend => "new tracks recommended by Spotify",
            SelectionMode::Shuffle => "your playlist, reshuffled for the mood",
        }
    }

    pub fn ensure_enough(self, found: usize) -> Result<(), MixError> {
        let required = self.min_tracks();
        if found < required {
            return Err(MixError::NotEnoughTracks {
                mode: self,
                required,
                found,
            });
        }
        Ok(())
    }
}

/// Ranks `ids` by distance to `target`, closest first, keeping at most `cap`.
/// `vectors[i]` belongs to `ids[i]`; tracks without a vector are dropped.
pub fn rank_by_distance(
    ids: &[String],
    vectors: &[Option<FeatureVector>],
    target: &[(Attribute, f64)],
    cap: usize,
) -> Vec<String> {
    let mut scored: Vec<(&String, f64)> = ids
        .iter()
        .zip(vectors)
        .filter_map(|(id, v)| v.as_ref().map(|v| (id, v.distance_to(target))))
        .collect();

    let dropped = ids.len() - scored.len();
    if dropped > 0 {
        debug!(dropped, "tracks without audio features left out of ranking");
    }

    // stable: equal distances keep playlist order
    scored.sort_by(|a, b| a.1.total_cmp(&b.1));
    scored.into_iter().take(cap).map(|(id, _)| id.clone()).collect()
}

/// Draws [`SEED_COUNT`] distinct seed tracks.
pub fn sample_seeds<R: Rng + ?Sized>(ids: &[String], rng: &mut R) -> Result<Vec<String>, MixError> {
    SelectionMode::Recommend.ensure_enough(ids.len())?;
    Ok(ids.choose_multiple(rng, SEED_COUNT).cloned().collect())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recommended {
    pub tracks: Vec<String>,
    /// Set when the mood targets had to be dropped.
    pub notice: Option<String>,
}

/// Asks the catalog for mood-biased recommendations, retrying once with the
/// seeds alone if the mood targets yield nothing or are refused.
pub async fn recommend<C: Catalog + ?Sized>(
    catalog: &C,
    seeds: Vec<String>,
    mood: Mood,
    market: Option<String>,
) -> Result<Recommended, MixError> {
    let query = RecommendationQuery {
        seed_tracks: seeds,
        targets: mood.target().to_vec(),
        limit: RECOMMENDATION_LIMIT,
        market,
    };

    let notice = match catalog.recommendations(&query).await? {
        RecommendationOutcome::Accepted(tracks) => {
            info!(count = tracks.len(), "recommendations accepted");
            return Ok(Recommended { tracks, notice: None });
        }
        RecommendationOutcome::Empty => {
            format!("No {mood} matches for these seeds, used seed tracks only")
        }
        RecommendationOutcome::Rejected(reason) => {
            warn!(%reason, "mood targets rejected, retrying with seeds only");
            format!("Spotify refused the {mood} targets here, used seed tracks only")
        }
    };

    match catalog.recommendations(&query.relaxed()).await? {
        RecommendationOutcome::Accepted(tracks) => Ok(Recommended {
            tracks,
            notice: Some(notice),
        }),
        RecommendationOutcome::Empty | RecommendationOutcome::Rejected(_) => Err(MixError::NoRecommendations),
    }
}

/// Seed for shuffle mode, derived from the mood and the trimmed custom name.
pub fn shuffle_seed(mood: Mood, custom_name: Option<&str>) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(mood.key().as_bytes());
    hasher.update(b"|");
    if let Some(name) = custom_name.map(str::trim).filter(|n| !n.is_empty()) {
        hasher.update(name.as_bytes());
    }
    let digest = hasher.finalize();
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&digest);
    seed
}

/// Deterministic permutation of the whole list.
pub fn shuffled(ids: &[String], seed: [u8; 32]) -> Result<Vec<String>, MixError> {
    SelectionMode::Shuffle.ensure_enough(ids.len())?;
    let mut out = ids.to_vec();
    let mut rng = StdRng::from_seed(seed);
    out.shuffle(&mut rng);
    Ok(out)
}
