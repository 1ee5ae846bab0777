// Strong typing over strings. Newtypes for timestamps and movie ids, plus the API payload shapes.
// Config arrives as JSON from the page loader; every field has a default.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::UiError;

/// Timestamp in microseconds. Newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn from_micros(us: u64) -> Self {
        Timestamp(us)
    }

    pub fn from_millis(ms: u64) -> Self {
        Timestamp(ms.saturating_mul(1000))
    }

    /// Convert a `performance.now()` / animation-frame reading.
    pub fn from_millis_f64(ms: f64) -> Self {
        if ms.is_finite() && ms > 0.0 {
            Timestamp((ms * 1000.0).round() as u64)
        } else {
            Timestamp(0)
        }
    }

    pub fn as_micros(&self) -> u64 {
        self.0
    }

    pub fn as_millis(&self) -> f64 {
        self.0 as f64 / 1000.0
    }

    pub fn offset_by(self, delay: Duration) -> Self {
        Timestamp(self.0.saturating_add(delay.as_micros() as u64))
    }

    /// Time elapsed since `earlier`, zero if `earlier` is in the future.
    pub fn since(&self, earlier: Timestamp) -> Duration {
        Duration::from_micros(self.0.saturating_sub(earlier.0))
    }
}

/// Server-side movie id (TMDB id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(u64);

impl MovieId {
    pub fn new(id: u64) -> Self {
        MovieId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Parse the `id` field of a submitted form.
    pub fn parse(raw: &str) -> Result<Self, UiError> {
        raw.trim()
            .parse::<u64>()
            .map(MovieId)
            .map_err(|_| UiError::Validation(format!("Invalid movie id: {:?}", raw)))
    }
}

impl std::fmt::Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A movie as the API sends it. Only lives as a payload and as rendered markup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub director: Option<String>,
    /// Minutes. The server sends 0 when unknown.
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default, rename = "imdbRating")]
    pub imdb_rating: Option<f64>,
}

impl MovieRecord {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        MovieRecord {
            id: MovieId::new(id),
            title: title.into(),
            poster_url: None,
            release_date: None,
            rating: None,
            director: None,
            runtime: None,
            genres: Vec::new(),
            imdb_rating: None,
        }
    }
}

/// Aggregate year-in-review numbers from `GET /api/wrapped`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StatsSummary {
    pub hours: u64,
    pub minutes: u64,
    pub total_movies: u64,
    #[serde(default)]
    pub most_common_genre: Option<String>,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub taste_label: Option<String>,
    #[serde(default)]
    pub rated_movies: u64,
}

/// Toast flavor, mapped to the `toast-info` / `toast-error` classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    #[default]
    Info,
    Error,
}

impl ToastKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ToastKind::Info => "info",
            ToastKind::Error => "error",
        }
    }
}

/// UI configuration passed from JS.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// API origin. Empty means same origin as the page.
    #[serde(default)]
    pub api_base: String,
    #[serde(default = "default_toast_display_ms")]
    pub toast_display_ms: u64,
    #[serde(default = "default_toast_removal_ms")]
    pub toast_removal_ms: u64,
    /// Delay between the fade-out class and detaching a removed card.
    #[serde(default = "default_fade_out_ms")]
    pub fade_out_ms: u64,
    #[serde(default = "default_count_up_ms")]
    pub count_up_ms: u64,
    /// Visible fraction of a slide needed to activate it.
    #[serde(default = "default_slide_threshold")]
    pub slide_threshold: f64,
    /// Show an error toast when the wrapped stats cannot be loaded.
    #[serde(default)]
    pub stats_failure_toast: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            api_base: String::new(),
            toast_display_ms: default_toast_display_ms(),
            toast_removal_ms: default_toast_removal_ms(),
            fade_out_ms: default_fade_out_ms(),
            count_up_ms: default_count_up_ms(),
            slide_threshold: default_slide_threshold(),
            stats_failure_toast: false,
        }
    }
}

impl UiConfig {
    pub fn from_json(json: &str) -> Result<Self, UiError> {
        let config: UiConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), UiError> {
        if !(self.slide_threshold > 0.0 && self.slide_threshold <= 1.0) {
            return Err(UiError::InvalidConfig(format!(
                "slide_threshold must be in (0, 1], got {}",
                self.slide_threshold
            )));
        }
        Ok(())
    }

    pub fn toast_display(&self) -> Duration {
        Duration::from_millis(self.toast_display_ms)
    }

    pub fn toast_removal(&self) -> Duration {
        Duration::from_millis(self.toast_removal_ms)
    }

    pub fn fade_out(&self) -> Duration {
        Duration::from_millis(self.fade_out_ms)
    }

    pub fn count_up(&self) -> Duration {
        Duration::from_millis(self.count_up_ms)
    }
}

fn default_toast_display_ms() -> u64 {
    2000
}

fn default_toast_removal_ms() -> u64 {
    200
}

fn default_fade_out_ms() -> u64 {
    200
}

fn default_count_up_ms() -> u64 {
    900
}

fn default_slide_threshold() -> f64 {
    0.6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_conversions() {
        let ts = Timestamp::from_millis_f64(1500.5);
        assert_eq!(ts.as_micros(), 1_500_500);
        assert!((ts.as_millis() - 1500.5).abs() < 0.0001);
        assert_eq!(Timestamp::from_millis_f64(f64::NAN), Timestamp::from_micros(0));
    }

    #[test]
    fn since_saturates() {
        let early = Timestamp::from_millis(10);
        let late = Timestamp::from_millis(25);
        assert_eq!(late.since(early), Duration::from_millis(15));
        assert_eq!(early.since(late), Duration::ZERO);
    }

    #[test]
    fn movie_record_tolerates_sparse_payload() {
        let json = r#"{"id": 603, "title": "The Matrix", "runtime": 136, "imdbRating": 8.7}"#;
        let record: MovieRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, MovieId::new(603));
        assert_eq!(record.runtime, Some(136));
        assert_eq!(record.imdb_rating, Some(8.7));
        assert!(record.genres.is_empty());
        assert!(record.poster_url.is_none());
    }

    #[test]
    fn movie_id_parse_rejects_garbage() {
        assert_eq!(MovieId::parse(" 42 ").unwrap(), MovieId::new(42));
        assert!(matches!(MovieId::parse("abc"), Err(UiError::Validation(_))));
    }

    #[test]
    fn config_defaults_fill_missing_fields() {
        let config = UiConfig::from_json(r#"{"toast_display_ms": 1000}"#).unwrap();
        assert_eq!(config.toast_display_ms, 1000);
        assert_eq!(config.toast_removal_ms, 200);
        assert_eq!(config.count_up_ms, 900);
        assert_eq!(config.slide_threshold, 0.6);
        assert!(!config.stats_failure_toast);
    }

    #[test]
    fn config_rejects_out_of_range_threshold() {
        let err = UiConfig::from_json(r#"{"slide_threshold": 1.5}"#).unwrap_err();
        assert!(matches!(err, UiError::InvalidConfig(_)));
    }
}
