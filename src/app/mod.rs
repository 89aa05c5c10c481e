pub mod state;

use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use std::{sync::Arc, time::Duration};
use tokio::{sync::mpsc, time};
use tracing::{error, info, warn};

use crate::{
    app::state::{AppState, Followup, MixForm, Notification},
    cache::Cache,
    config::Config,
    events::map_key_to_action,
    mixer::{MixError, MixOutcome, MixSettings, Mixer},
    spotify::{
        auth::wait_for_auth_code, build_spotify_client, catalog::SpotifyCatalog, complete_auth, expected_state,
        Session,
    },
};

const TICK_MS: u64 = 80;

/// Market value asking Spotify to use the country of the logged-in user.
const MARKET_FROM_TOKEN: &str = "from_token";

pub struct App {
    pub state: AppState,
    config: Config,
    cache: Arc<Cache>,
}

impl App {
    pub fn new(config: Config, cache: Arc<Cache>) -> Self {
        let form = MixForm::new(config.mode, config.public);
        App {
            state: AppState::new(form, config.redirect_uri.clone()),
            config,
            cache,
        }
    }

    fn settings(&self) -> MixSettings {
        MixSettings {
            market: Some(self.config.market.clone().unwrap_or_else(|| MARKET_FROM_TOKEN.to_string())),
            ..Default::default()
        }
    }

    async fn connect<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut ratatui::Terminal<B>,
    ) -> Result<Session> {
        let (spotify, auth_url) = build_spotify_client(&self.config, &self.cache).await?;

        if let Some(url) = auth_url {
            self.state.auth_url = Some(url.clone());
            if let Err(e) = open::that(&url) {
                warn!("Could not open browser: {e}");
            }
            terminal.draw(|f| crate::ui::render(f, &self.state))?;

            let state = expected_state(&spotify).await;
            let auth = wait_for_auth_code(&self.config.redirect_uri, &state).await?;
            complete_auth(&spotify, &auth.code, &self.cache)
                .await
                .context("Token exchange with Spotify failed")?;
        }

        let session = Session::open(spotify).await.context("Could not load your Spotify profile")?;
        self.state.is_authenticated = true;
        self.state.auth_url = None;
        self.state.user_name = Some(session.display_name.clone());
        self.state
            .set_notification(Notification::info(format!("Connected as {} ✓", session.display_name)));
        info!("Authenticated successfully");
        Ok(session)
    }

    pub async fn run<B: ratatui::backend::Backend>(&mut self, terminal: &mut ratatui::Terminal<B>) -> Result<()> {
        let session = self.connect(terminal).await?;
        let catalog = Arc::new(SpotifyCatalog::new(session.spotify.clone(), self.cache.clone()));
        let settings = self.settings();

        let (done_tx, mut done_rx) = mpsc::channel::<Result<MixOutcome, MixError>>(1);
        let mut tick_interval = time::interval(Duration::from_millis(TICK_MS));
        let mut event_stream = EventStream::new();

        loop {
            terminal.draw(|f| crate::ui::render(f, &self.state))?;

            if let Some(request) = self.state.take_pending() {
                let catalog = catalog.clone();
                let owner = session.user_id.clone();
                let settings = settings.clone();
                let tx = done_tx.clone();
                tokio::spawn(async move {
                    let mut mixer = Mixer::new(settings);
                    let result = mixer.mix(catalog.as_ref(), &owner, &request).await;
                    let _ = tx.send(result).await;
                });
            }

            tokio::select! {
                _ = tick_interval.tick() => {
                    self.state.on_tick();
                }
                Some(result) = done_rx.recv() => {
                    match &result {
                        Ok(outcome) => info!(
                            playlist = %outcome.playlist.id,
                            refreshed = outcome.refreshed_credential,
                            "mix finished"
                        ),
                        Err(e) if e.is_input_error() => info!("mix rejected: {e}"),
                        Err(e) => error!("mix failed: {e}"),
                    }
                    self.state.finish(result);
                }
                maybe_event = event_stream.next() => {
                    if let Some(Ok(Event::Key(key))) = maybe_event {
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }
                        if let Some(action) = map_key_to_action(key, self.state.editing_text()) {
                            if let Some(Followup::OpenUrl(url)) = self.state.apply(action) {
                                if let Err(e) = open::that(&url) {
                                    warn!("Could not open browser: {e}");
                                    self.state.set_notification(Notification::error(format!("Open {url} manually")));
                                }
                            }
                        }
                    }
                }
            }

            if self.state.should_quit {
                break;
            }
        }

        Ok(())
    }
}
