use std::str::FromStr;

use super::features::Attribute;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display, strum_macros::EnumIter)]
pub enum Mood {
    #[strum(to_string = "Happy 😄")]
    Happy,
    #[strum(to_string = "Chill 😌")]
    Chill,
    #[strum(to_string = "Energetic ⚡")]
    Energetic,
    #[strum(to_string = "Workout 💪")]
    Workout,
    #[strum(to_string = "Focus 🧠")]
    Focus,
    #[strum(to_string = "Party 🎉")]
    Party,
    #[strum(to_string = "Sad ☔")]
    Sad,
    #[strum(to_string = "Romantic ❤️")]
    Romantic,
}

impl Mood {
    /// Stable lowercase identifier, used for shuffle seeding and parsing.
    pub fn key(self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Chill => "chill",
            Mood::Energetic => "energetic",
            Mood::Workout => "workout",
            Mood::Focus => "focus",
            Mood::Party => "party",
            Mood::Sad => "sad",
            Mood::Romantic => "romantic",
        }
    }

    /// Partial target vector for this mood.
    pub fn target(self) -> &'static [(Attribute, f64)] {
        use Attribute::*;
        match self {
            Mood::Happy => &[(Valence, 0.8), (Energy, 0.7)],
            Mood::Chill => &[(Valence, 0.5), (Energy, 0.3)],
            Mood::Energetic => &[(Energy, 0.9), (Danceability, 0.8)],
            Mood::Workout => &[(Energy, 0.95), (Danceability, 0.7), (Tempo, 130.0)],
            Mood::Focus => &[(Energy, 0.4), (Instrumentalness, 0.7)],
            Mood::Party => &[(Danceability, 0.9), (Energy, 0.9)],
            Mood::Sad => &[(Valence, 0.2), (Energy, 0.4)],
            Mood::Romantic => &[(Valence, 0.6), (Acousticness, 0.7)],
        }
    }

    pub fn blurb(self) -> &'static str {
        match self {
            Mood::Happy => "Bright, positive, upbeat",
            Mood::Chill => "Mellow and low energy",
            Mood::Energetic => "Driving and danceable",
            Mood::Workout => "Hard-hitting, around 130 BPM",
            Mood::Focus => "Calm and mostly instrumental",
            Mood::Party => "Floor fillers only",
            Mood::Sad => "Low, heavy-hearted",
            Mood::Romantic => "Warm and acoustic",
        }
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use strum::IntoEnumIterator;
        let wanted = s.trim().to_ascii_lowercase();
        Mood::iter()
            .find(|m| m.key() == wanted)
            .ok_or_else(|| format!("unknown mood '{s}'"))
    }
}
