use strum::IntoEnumIterator;

use crate::events::UserAction;
use crate::mixer::{MixError, MixOutcome, MixRequest, Mood, SelectionMode};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Playlist,
    Mood,
    Name,
    Mode,
    Visibility,
    Submit,
}

impl FormField {
    const ORDER: [FormField; 6] = [
        FormField::Playlist,
        FormField::Mood,
        FormField::Name,
        FormField::Mode,
        FormField::Visibility,
        FormField::Submit,
    ];

    fn index(self) -> usize {
        FormField::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        FormField::ORDER[(self.index() + 1) % FormField::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let len = FormField::ORDER.len();
        FormField::ORDER[(self.index() + len - 1) % len]
    }

    pub fn is_text(self) -> bool {
        matches!(self, FormField::Playlist | FormField::Name)
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Playlist => "Playlist",
            FormField::Mood => "Mood",
            FormField::Name => "Name",
            FormField::Mode => "Mode",
            FormField::Visibility => "Visibility",
            FormField::Submit => "Create",
        }
    }
}

fn step<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    let len = all.len();
    let i = all.iter().position(|x| *x == current).unwrap_or(0);
    let next = if forward { (i + 1) % len } else { (i + len - 1) % len };
    all[next]
}

#[derive(Debug, Clone, Default)]
pub struct MixForm {
    pub focus: FormField,
    pub playlist: String,
    pub mood: Option<Mood>,
    pub name: String,
    pub mode: SelectionMode,
    pub public: bool,
}

impl MixForm {
    pub fn new(mode: SelectionMode, public: bool) -> Self {
        MixForm {
            mode,
            public,
            ..Default::default()
        }
    }

    pub fn request(&self) -> MixRequest {
        let name = self.name.trim();
        MixRequest {
            playlist: self.playlist.clone(),
            mood: self.mood,
            custom_name: (!name.is_empty()).then(|| name.to_string()),
            mode: self.mode,
            public: self.public,
        }
    }

    /// Moves through the moods. With nothing picked yet, forward starts at
    /// the first mood and backward at the last.
    pub fn cycle_mood(&mut self, forward: bool) {
        let moods: Vec<Mood> = Mood::iter().collect();
        self.mood = Some(match self.mood {
            Some(current) => step(&moods, current, forward),
            None if forward => moods[0],
            None => moods[moods.len() - 1],
        });
    }

    pub fn cycle_mode(&mut self, forward: bool) {
        let modes: Vec<SelectionMode> = SelectionMode::iter().collect();
        self.mode = step(&modes, self.mode, forward);
    }

    /// Picks a mood by its 1-based position in the list.
    pub fn pick_mood(&mut self, position: u8) {
        if let Some(mood) = Mood::iter().nth(usize::from(position).wrapping_sub(1)) {
            self.mood = Some(mood);
        }
    }

    fn focused_text(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Playlist => Some(&mut self.playlist),
            FormField::Name => Some(&mut self.name),
            _ => None,
        }
    }

    pub fn input(&mut self, c: char) {
        if let Some(text) = self.focused_text() {
            text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.focused_text() {
            text.pop();
        }
    }
}

/// What the result panel shows after a successful mix.
#[derive(Debug, Clone, PartialEq)]
pub struct MixSummary {
    pub name: String,
    pub url: Option<String>,
    pub mood: Mood,
    pub mode: SelectionMode,
    pub track_count: usize,
    pub notices: Vec<String>,
}

pub const REFRESHED_NOTICE: &str = "Spotify login was refreshed and saved";

impl From<MixOutcome> for MixSummary {
    fn from(outcome: MixOutcome) -> Self {
        let mut notices = outcome.notices;
        if outcome.refreshed_credential {
            notices.push(REFRESHED_NOTICE.to_string());
        }
        MixSummary {
            name: outcome.playlist.name,
            url: outcome.playlist.url,
            mood: outcome.mood,
            mode: outcome.mode,
            track_count: outcome.track_count,
            notices,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum MixStatus {
    #[default]
    Idle,
    Running,
    Done(MixSummary),
    Failed {
        message: String,
        hint: &'static str,
        /// Link to a playlist that was created before the failure.
        url: Option<String>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Notification {
    pub message: String,
    pub remaining_ticks: u8,
    pub is_error: bool,
}

impl Notification {
    pub fn info(msg: impl Into<String>) -> Self {
        Notification { message: msg.into(), remaining_ticks: 30, is_error: false }
    }
    pub fn error(msg: impl Into<String>) -> Self {
        Notification { message: msg.into(), remaining_ticks: 40, is_error: true }
    }
}

/// Side effects an action asks the app loop to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum Followup {
    OpenUrl(String),
}

#[derive(Default)]
pub struct AppState {
    pub form: MixForm,
    pub status: MixStatus,
    pub notification: Option<Notification>,
    /// Request waiting to be picked up by the app loop.
    pending: Option<MixRequest>,
    pub show_help: bool,
    pub should_quit: bool,
    pub is_authenticated: bool,
    pub auth_url: Option<String>,
    pub redirect_uri: String,
    pub user_name: Option<String>,
    pub tick: u64,
}

impl AppState {
    pub fn new(form: MixForm, redirect_uri: impl Into<String>) -> Self {
        AppState {
            form,
            redirect_uri: redirect_uri.into(),
            ..Default::default()
        }
    }

    pub fn set_notification(&mut self, n: Notification) {
        self.notification = Some(n);
    }

    pub fn tick_notification(&mut self) {
        if let Some(ref mut n) = self.notification {
            if n.remaining_ticks > 0 {
                n.remaining_ticks -= 1;
            } else {
                self.notification = None;
            }
        }
    }

    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        self.tick_notification();
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER[(self.tick as usize) % SPINNER.len()]
    }

    pub fn is_running(&self) -> bool {
        self.status == MixStatus::Running
    }

    pub fn editing_text(&self) -> bool {
        !self.show_help && self.form.focus.is_text()
    }

    /// Queues the current form as a mix request. Ignored while a mix runs.
    pub fn submit(&mut self) -> bool {
        if self.is_running() {
            self.set_notification(Notification::info("A mix is already running"));
            return false;
        }
        self.pending = Some(self.form.request());
        self.status = MixStatus::Running;
        true
    }

    pub fn take_pending(&mut self) -> Option<MixRequest> {
        self.pending.take()
    }

    pub fn finish(&mut self, result: Result<MixOutcome, MixError>) {
        match result {
            Ok(outcome) => {
                let summary = MixSummary::from(outcome);
                self.set_notification(Notification::info(format!(
                    "Created '{}' with {} tracks",
                    summary.name, summary.track_count
                )));
                self.status = MixStatus::Done(summary);
            }
            Err(err) => {
                let url = match &err {
                    MixError::PartialPlaylist { url, .. } => url.clone(),
                    _ => None,
                };
                self.set_notification(Notification::error(err.to_string()));
                self.status = MixStatus::Failed {
                    message: err.to_string(),
                    hint: err.hint(),
                    url,
                };
            }
        }
    }

    /// Link of the playlist made by the last run, if any.
    pub fn result_url(&self) -> Option<&str> {
        match &self.status {
            MixStatus::Done(summary) => summary.url.as_deref(),
            MixStatus::Failed { url, .. } => url.as_deref(),
            _ => None,
        }
    }

    pub fn apply(&mut self, action: UserAction) -> Option<Followup> {
        if self.show_help {
            match action {
                UserAction::Quit => self.should_quit = true,
                UserAction::ToggleHelp | UserAction::Back => self.show_help = false,
                _ => {}
            }
            return None;
        }

        match action {
            UserAction::Quit | UserAction::Back => self.should_quit = true,
            UserAction::ToggleHelp => self.show_help = true,
            UserAction::FocusNext => self.form.focus = self.form.focus.next(),
            UserAction::FocusPrev => self.form.focus = self.form.focus.prev(),
            UserAction::Up | UserAction::Down => {
                let forward = action == UserAction::Down;
                match self.form.focus {
                    FormField::Mood => self.form.cycle_mood(forward),
                    FormField::Mode => self.form.cycle_mode(forward),
                    FormField::Visibility => self.form.public = !self.form.public,
                    _ if forward => self.form.focus = self.form.focus.next(),
                    _ => self.form.focus = self.form.focus.prev(),
                }
            }
            UserAction::Toggle => match self.form.focus {
                FormField::Visibility => self.form.public = !self.form.public,
                FormField::Submit => {
                    self.submit();
                }
                _ => {}
            },
            UserAction::Submit => {
                self.submit();
            }
            UserAction::Input(c) => self.form.input(c),
            UserAction::Backspace => self.form.backspace(),
            UserAction::PickMood(n) => self.form.pick_mood(n),
            UserAction::OpenResult => match self.result_url() {
                Some(url) => return Some(Followup::OpenUrl(url.to_string())),
                None => self.set_notification(Notification::info("Nothing to open yet")),
            },
        }
        None
    }
}
