use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use rand::{rngs::StdRng, SeedableRng};
use tokio_test::block_on;

use super::catalog::{RecommendationOutcome, RecommendationQuery, TrackPage};
use super::features::{Attribute, FeatureVector};
use super::materialize::materialize;
use super::source::fetch_all_track_ids;
use super::*;

const PLAYLIST: &str = "https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M?si=x";
const OWNER: &str = "listener";

type RecommendFn = Box<dyn Fn(&RecommendationQuery) -> Result<RecommendationOutcome, CatalogError> + Send + Sync>;

#[derive(Default)]
struct Calls {
    refreshes: usize,
    pages: Vec<(u32, u32)>,
    feature_requests: Vec<usize>,
    recommendations: Vec<RecommendationQuery>,
    created: Vec<(String, PlaylistDraft)>,
    batches: Vec<Vec<String>>,
}

struct FakeCatalog {
    entries: Vec<Option<String>>,
    features: HashMap<String, FeatureVector>,
    recommend: RecommendFn,
    fail_batch: Option<usize>,
    fail_pages: Option<CatalogError>,
    expired: bool,
    calls: Mutex<Calls>,
}

impl FakeCatalog {
    fn with_tracks(n: usize) -> Self {
        FakeCatalog::with_entries((0..n).map(|i| Some(format!("t{i:03}"))).collect())
    }

    fn with_entries(entries: Vec<Option<String>>) -> Self {
        FakeCatalog {
            entries,
            features: HashMap::new(),
            recommend: Box::new(|q: &RecommendationQuery| {
                Ok(RecommendationOutcome::from_tracks(
                    q.seed_tracks.iter().map(|s| format!("rec-{s}")).collect(),
                ))
            }),
            fail_batch: None,
            fail_pages: None,
            expired: false,
            calls: Mutex::new(Calls::default()),
        }
    }

    fn feature(mut self, id: &str, v: FeatureVector) -> Self {
        self.features.insert(id.to_string(), v);
        self
    }

    fn calls(&self) -> std::sync::MutexGuard<'_, Calls> {
        self.calls.lock().unwrap()
    }

    fn added(&self) -> Vec<String> {
        self.calls().batches.concat()
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn refresh_if_expired(&self) -> Result<bool, CatalogError> {
        self.calls().refreshes += 1;
        Ok(self.expired)
    }

    async fn playlist_tracks(&self, _playlist_id: &str, offset: u32, limit: u32) -> Result<TrackPage, CatalogError> {
        self.calls().pages.push((offset, limit));
        if let Some(err) = &self.fail_pages {
            return Err(err.clone());
        }
        let start = (offset as usize).min(self.entries.len());
        let end = (start + limit as usize).min(self.entries.len());
        Ok(TrackPage {
            items: self.entries[start..end].to_vec(),
            next: (end < self.entries.len()).then_some(end as u32),
        })
    }

    async fn feature_vectors(&self, ids: &[String]) -> Result<Vec<Option<FeatureVector>>, CatalogError> {
        assert!(ids.len() <= 100, "feature request too large: {}", ids.len());
        self.calls().feature_requests.push(ids.len());
        Ok(ids.iter().map(|id| self.features.get(id).cloned()).collect())
    }

    async fn recommendations(&self, query: &RecommendationQuery) -> Result<RecommendationOutcome, CatalogError> {
        self.calls().recommendations.push(query.clone());
        (self.recommend)(query)
    }

    async fn create_playlist(&self, owner: &str, draft: &PlaylistDraft) -> Result<CreatedPlaylist, CatalogError> {
        self.calls().created.push((owner.to_string(), draft.clone()));
        Ok(CreatedPlaylist {
            id: "new-playlist".into(),
            name: draft.name.clone(),
            url: Some("https://open.spotify.com/playlist/new-playlist".into()),
        })
    }

    async fn add_tracks(&self, _playlist_id: &str, ids: &[String]) -> Result<(), CatalogError> {
        let mut calls = self.calls();
        if self.fail_batch == Some(calls.batches.len()) {
            return Err(CatalogError::RateLimited);
        }
        calls.batches.push(ids.to_vec());
        Ok(())
    }
}

fn request(mood: Mood, mode: SelectionMode) -> MixRequest {
    MixRequest {
        playlist: PLAYLIST.into(),
        mood: Some(mood),
        custom_name: None,
        mode,
        public: false,
    }
}

fn mixer() -> Mixer {
    Mixer::with_rng(MixSettings::default(), StdRng::seed_from_u64(42))
}

fn ids(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("t{i:03}")).collect()
}

// ── Pagination ───────────────────────────────────────────────────────────────

#[test]
fn pagination_extracts_around_page_boundary() {
    for (n, pages) in [(99, 1), (100, 1), (101, 2), (250, 3)] {
        let catalog = FakeCatalog::with_tracks(n);
        let got = block_on(fetch_all_track_ids(&catalog, "p", 100)).unwrap();
        assert_eq!(got, ids(n), "n={n}");
        assert_eq!(catalog.calls().pages.len(), pages, "n={n}");
    }
}

#[test]
fn pagination_skips_entries_without_ids() {
    let catalog = FakeCatalog::with_entries(vec![
        Some("a".into()),
        None,
        Some(String::new()),
        Some("b".into()),
    ]);
    let got = block_on(fetch_all_track_ids(&catalog, "p", 2)).unwrap();
    assert_eq!(got, vec!["a", "b"]);
}

#[test]
fn pagination_drops_repeated_ids() {
    let catalog = FakeCatalog::with_entries(vec![
        Some("a".into()),
        Some("b".into()),
        Some("a".into()),
        Some("c".into()),
    ]);
    let got = block_on(fetch_all_track_ids(&catalog, "p", 3)).unwrap();
    assert_eq!(got, vec!["a", "b", "c"]);
}

#[test]
fn empty_playlist_is_one_request() {
    let catalog = FakeCatalog::with_tracks(0);
    assert!(block_on(fetch_all_track_ids(&catalog, "p", 100)).unwrap().is_empty());
    assert_eq!(catalog.calls().pages, vec![(0, 100)]);
}

// ── Materializer ─────────────────────────────────────────────────────────────

fn draft() -> PlaylistDraft {
    PlaylistDraft {
        name: "Mix".into(),
        description: "d".into(),
        public: true,
    }
}

#[test]
fn inserts_in_batches_of_one_hundred() {
    let catalog = FakeCatalog::with_tracks(0);
    let tracks = ids(250);
    block_on(materialize(&catalog, OWNER, &draft(), &tracks)).unwrap();

    let sizes: Vec<usize> = catalog.calls().batches.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![100, 100, 50]);
    assert_eq!(catalog.added(), tracks);
}

#[test]
fn failed_batch_leaves_partial_playlist() {
    let mut catalog = FakeCatalog::with_tracks(0);
    catalog.fail_batch = Some(1);
    let err = block_on(materialize(&catalog, OWNER, &draft(), &ids(250))).unwrap_err();

    match err {
        MixError::PartialPlaylist {
            inserted, total, source, url, ..
        } => {
            assert_eq!(inserted, 100);
            assert_eq!(total, 250);
            assert_eq!(source, CatalogError::RateLimited);
            assert!(url.is_some());
        }
        other => panic!("unexpected: {other:?}"),
    }
    let calls = catalog.calls();
    assert_eq!(calls.created.len(), 1);
    assert_eq!(calls.batches.len(), 1, "no retry after a failed batch");
}

// ── Input validation ─────────────────────────────────────────────────────────

#[test]
fn bad_reference_fails_before_any_request() {
    let catalog = FakeCatalog::with_tracks(10);
    let mut req = request(Mood::Happy, SelectionMode::Shuffle);
    req.playlist = "https://example.com/not-a-playlist".into();

    let err = block_on(mixer().mix(&catalog, OWNER, &req)).unwrap_err();
    assert!(matches!(err, MixError::InvalidPlaylistRef(_)));
    assert!(err.is_input_error());
    let calls = catalog.calls();
    assert_eq!(calls.refreshes, 0);
    assert!(calls.pages.is_empty());
}

#[test]
fn missing_mood_fails_before_any_request() {
    let catalog = FakeCatalog::with_tracks(10);
    let mut req = request(Mood::Happy, SelectionMode::Shuffle);
    req.mood = None;

    let err = block_on(mixer().mix(&catalog, OWNER, &req)).unwrap_err();
    assert!(matches!(err, MixError::MissingMood));
    assert!(catalog.calls().pages.is_empty());
}

// ── Distance mode ────────────────────────────────────────────────────────────

fn happy_vector(valence: f64, energy: f64) -> FeatureVector {
    FeatureVector::default()
        .with(Attribute::Valence, valence)
        .with(Attribute::Energy, energy)
}

#[test]
fn distance_mode_creates_ranked_playlist() {
    let catalog = FakeCatalog::with_tracks(4)
        .feature("t000", happy_vector(0.1, 0.1))
        .feature("t001", happy_vector(0.8, 0.7))
        .feature("t003", happy_vector(0.7, 0.7));

    let outcome = block_on(mixer().mix(&catalog, OWNER, &request(Mood::Happy, SelectionMode::Distance))).unwrap();

    assert_eq!(outcome.track_count, 3);
    assert_eq!(outcome.playlist.name, "Mood Mix: Happy 😄");
    assert!(outcome.notices.is_empty());
    assert_eq!(catalog.added(), vec!["t001", "t003", "t000"]);

    let calls = catalog.calls();
    let (owner, draft) = &calls.created[0];
    assert_eq!(owner, OWNER);
    assert!(!draft.public);
    assert!(draft.description.contains("Happy"));
}

#[test]
fn distance_mode_caps_at_fifty_and_chunks_feature_requests() {
    let mut catalog = FakeCatalog::with_tracks(230);
    for i in 0..230 {
        catalog = catalog.feature(&format!("t{i:03}"), happy_vector(0.8, i as f64 / 230.0));
    }
    let outcome = block_on(mixer().mix(&catalog, OWNER, &request(Mood::Chill, SelectionMode::Distance))).unwrap();

    assert_eq!(outcome.track_count, 50);
    assert_eq!(catalog.calls().feature_requests, vec![100, 100, 30]);
}

#[test]
fn distance_mode_without_features_creates_nothing() {
    let catalog = FakeCatalog::with_tracks(8);
    let err = block_on(mixer().mix(&catalog, OWNER, &request(Mood::Focus, SelectionMode::Distance))).unwrap_err();
    assert!(matches!(err, MixError::NoTracksFound));
    assert!(catalog.calls().created.is_empty());
}

#[test]
fn empty_source_is_no_tracks_found() {
    let catalog = FakeCatalog::with_entries(vec![None, None]);
    let err = block_on(mixer().mix(&catalog, OWNER, &request(Mood::Sad, SelectionMode::Shuffle))).unwrap_err();
    assert!(matches!(err, MixError::NoTracksFound));
}

// ── Recommendation mode ──────────────────────────────────────────────────────

#[test]
fn recommend_mode_uses_five_seeds_and_mood_targets() {
    let catalog = FakeCatalog::with_tracks(20);
    let outcome = block_on(mixer().mix(&catalog, OWNER, &request(Mood::Workout, SelectionMode::Recommend))).unwrap();

    assert!(outcome.notices.is_empty());
    assert_eq!(outcome.track_count, 5);
    let calls = catalog.calls();
    assert_eq!(calls.recommendations.len(), 1);
    let q = &calls.recommendations[0];
    assert_eq!(q.seed_tracks.len(), 5);
    assert_eq!(q.targets, Mood::Workout.target().to_vec());
    assert!(calls.feature_requests.is_empty());
}

#[test]
fn recommend_rejection_falls_back_to_seeds_only() {
    let mut catalog = FakeCatalog::with_tracks(12);
    catalog.recommend = Box::new(|q: &RecommendationQuery| {
        if q.market.as_deref() == Some("XX") && !q.is_relaxed() {
            Ok(RecommendationOutcome::Rejected("invalid target for market".into()))
        } else {
            Ok(RecommendationOutcome::Accepted(vec!["r1".into(), "r2".into()]))
        }
    });
    let settings = MixSettings {
        market: Some("XX".into()),
        ..MixSettings::default()
    };
    let mut mixer = Mixer::with_rng(settings, StdRng::seed_from_u64(3));

    let outcome = block_on(mixer.mix(&catalog, OWNER, &request(Mood::Romantic, SelectionMode::Recommend))).unwrap();

    assert_eq!(outcome.notices.len(), 1);
    assert_eq!(catalog.added(), vec!["r1", "r2"]);
    let calls = catalog.calls();
    assert_eq!(calls.recommendations.len(), 2);
    assert!(calls.recommendations[1].is_relaxed());
    assert_eq!(calls.recommendations[0].seed_tracks, calls.recommendations[1].seed_tracks);
}

#[test]
fn recommend_empty_twice_is_an_error() {
    let mut catalog = FakeCatalog::with_tracks(12);
    catalog.recommend = Box::new(|_: &RecommendationQuery| Ok(RecommendationOutcome::Empty));
    let err = block_on(mixer().mix(&catalog, OWNER, &request(Mood::Party, SelectionMode::Recommend))).unwrap_err();
    assert!(matches!(err, MixError::NoRecommendations));
    assert_eq!(catalog.calls().recommendations.len(), 2);
    assert!(catalog.calls().created.is_empty());
}

#[test]
fn recommend_oracle_failure_is_not_retried() {
    let mut catalog = FakeCatalog::with_tracks(12);
    catalog.recommend = Box::new(|_: &RecommendationQuery| Err(CatalogError::Unauthorized));
    let err = block_on(mixer().mix(&catalog, OWNER, &request(Mood::Party, SelectionMode::Recommend))).unwrap_err();
    assert!(matches!(err, MixError::Catalog(CatalogError::Unauthorized)));
    assert_eq!(catalog.calls().recommendations.len(), 1);
}

#[test]
fn recommend_seed_boundary() {
    let catalog = FakeCatalog::with_tracks(5);
    assert!(block_on(mixer().mix(&catalog, OWNER, &request(Mood::Happy, SelectionMode::Recommend))).is_ok());

    let catalog = FakeCatalog::with_tracks(4);
    let err = block_on(mixer().mix(&catalog, OWNER, &request(Mood::Happy, SelectionMode::Recommend))).unwrap_err();
    assert!(matches!(err, MixError::NotEnoughTracks { required: 5, found: 4, .. }));
    assert!(catalog.calls().recommendations.is_empty());
    assert!(catalog.calls().created.is_empty());
}

// ── Shuffle mode ─────────────────────────────────────────────────────────────

#[test]
fn shuffle_boundary() {
    let catalog = FakeCatalog::with_tracks(3);
    let outcome = block_on(mixer().mix(&catalog, OWNER, &request(Mood::Chill, SelectionMode::Shuffle))).unwrap();
    assert_eq!(outcome.track_count, 3);

    let catalog = FakeCatalog::with_tracks(2);
    let err = block_on(mixer().mix(&catalog, OWNER, &request(Mood::Chill, SelectionMode::Shuffle))).unwrap_err();
    assert!(matches!(err, MixError::NotEnoughTracks { required: 3, found: 2, .. }));
    assert!(catalog.calls().created.is_empty());
}

#[test]
fn shuffle_is_reproducible_across_runs() {
    let mut req = request(Mood::Sad, SelectionMode::Shuffle);
    req.custom_name = Some("rainy day".into());

    let first = FakeCatalog::with_tracks(150);
    block_on(Mixer::new(MixSettings::default()).mix(&first, OWNER, &req)).unwrap();
    let second = FakeCatalog::with_tracks(150);
    block_on(Mixer::new(MixSettings::default()).mix(&second, OWNER, &req)).unwrap();

    assert_eq!(first.added(), second.added());
    assert_eq!(first.added().len(), 150);
    assert_eq!(first.calls().created[0].1.name, "rainy day");
}

// ── Session and failures ─────────────────────────────────────────────────────

#[test]
fn expired_credential_is_reported_as_refreshed() {
    let mut catalog = FakeCatalog::with_tracks(5);
    catalog.expired = true;
    let outcome = block_on(mixer().mix(&catalog, OWNER, &request(Mood::Focus, SelectionMode::Shuffle))).unwrap();
    assert!(outcome.refreshed_credential);
    assert_eq!(catalog.calls().refreshes, 1);
}

#[test]
fn page_failure_surfaces_verbatim() {
    let mut catalog = FakeCatalog::with_tracks(5);
    catalog.fail_pages = Some(CatalogError::NotFound("playlist".into()));
    let err = block_on(mixer().mix(&catalog, OWNER, &request(Mood::Focus, SelectionMode::Shuffle))).unwrap_err();
    assert_eq!(err.to_string(), "not found: playlist");
    assert!(catalog.calls().created.is_empty());
}

#[test]
fn public_flag_is_passed_through() {
    let catalog = FakeCatalog::with_tracks(5);
    let mut req = request(Mood::Energetic, SelectionMode::Shuffle);
    req.public = true;
    block_on(mixer().mix(&catalog, OWNER, &req)).unwrap();
    assert!(catalog.calls().created[0].1.public);
}

#[test]
fn naming_helpers() {
    assert_eq!(playlist_name(Mood::Party, None), "Mood Mix: Party 🎉");
    assert_eq!(playlist_name(Mood::Party, Some("  ")), "Mood Mix: Party 🎉");
    assert_eq!(playlist_name(Mood::Party, Some(" Friday ")), "Friday");

    let date = chrono::NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
    assert_eq!(
        playlist_description(Mood::Focus, SelectionMode::Shuffle, date),
        "Focus 🧠 mix: your playlist, reshuffled for the mood. Made with moodmix on 2026-10-18."
    );
}
