use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display, strum_macros::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Attribute {
    Valence,
    Energy,
    Danceability,
    Tempo,
    Instrumentalness,
    Acousticness,
}

impl Attribute {
    /// Inclusive bounds a value of this attribute must fall within.
    #[cfg(test)]
    pub fn bounds(self) -> (f64, f64) {
        match self {
            Attribute::Tempo => (f64::MIN_POSITIVE, f64::MAX),
            _ => (0.0, 1.0),
        }
    }

    #[cfg(test)]
    pub fn in_bounds(self, value: f64) -> bool {
        let (lo, hi) = self.bounds();
        value.is_finite() && value >= lo && value <= hi
    }
}

/// Provider-supplied descriptor set for one track. Attributes the provider
/// did not report stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FeatureVector {
    #[serde(default)]
    pub valence: Option<f64>,
    #[serde(default)]
    pub energy: Option<f64>,
    #[serde(default)]
    pub danceability: Option<f64>,
    #[serde(default)]
    pub tempo: Option<f64>,
    #[serde(default)]
    pub instrumentalness: Option<f64>,
    #[serde(default)]
    pub acousticness: Option<f64>,
}

impl FeatureVector {
    pub fn get(&self, attr: Attribute) -> Option<f64> {
        match attr {
            Attribute::Valence => self.valence,
            Attribute::Energy => self.energy,
            Attribute::Danceability => self.danceability,
            Attribute::Tempo => self.tempo,
            Attribute::Instrumentalness => self.instrumentalness,
            Attribute::Acousticness => self.acousticness,
        }
    }

    #[cfg(test)]
    pub fn with(mut self, attr: Attribute, value: f64) -> Self {
        let slot = match attr {
            Attribute::Valence => &mut self.valence,
            Attribute::Energy => &mut self.energy,
            Attribute::Danceability => &mut self.danceability,
            Attribute::Tempo => &mut self.tempo,
            Attribute::Instrumentalness => &mut self.instrumentalness,
            Attribute::Acousticness => &mut self.acousticness,
        };
        *slot = Some(value);
        self
    }

    /// Sum of squared raw differences against `target`, over the attributes
    /// present on both sides. Missing values contribute nothing.
    pub fn distance_to(&self, target: &[(Attribute, f64)]) -> f64 {
        target
            .iter()
            .filter_map(|&(attr, want)| {
                self.get(attr).map(|have| {
                    let d = have - want;
                    d * d
                })
            })
            .sum()
    }
}
