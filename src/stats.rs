// Wrapped stats: tier table, rating-bar widths, derived day count, and hydration of the stats page.
// Every dynamic value has an explicit bind point; nothing is located by scanning rendered text.

use crate::api::MovieApi;
use crate::count_up::CountStat;
use crate::error::UiError;
use crate::markup;
use crate::slides::{SlideController, SlideSurface};
use crate::toast::ToastSink;
use crate::types::StatsSummary;

pub const STATS_LOAD_FAILED: &str = "Could not load your stats";
pub const UNKNOWN_GENRE: &str = "Unknown";

/// Title/subtitle pair for a watch-count tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tier {
    pub title: &'static str,
    pub subtitle: &'static str,
}

/// Tiers by inclusive lower bound, highest first.
const TIERS: [(u64, Tier); 6] = [
    (
        50,
        Tier {
            title: "PROFESSIONAL MOVIE WATCHER",
            subtitle: "Popcorn is basically a food group for you.",
        },
    ),
    (
        40,
        Tier {
            title: "Certified Cinephile",
            subtitle: "The cinema staff know you by name.",
        },
    ),
    (
        30,
        Tier {
            title: "Film Buff",
            subtitle: "You have opinions about director's cuts.",
        },
    ),
    (
        20,
        Tier {
            title: "Movie Enthusiast",
            subtitle: "Friday night is always movie night.",
        },
    ),
    (
        10,
        Tier {
            title: "Casual Viewer",
            subtitle: "A solid lineup, with room for more.",
        },
    ),
    (
        5,
        Tier {
            title: "Weekend Watcher",
            subtitle: "A few favorites and counting.",
        },
    ),
];

const STARTER_TIER: Tier = Tier {
    title: "Just getting started",
    subtitle: "Every great list starts with one movie.",
};

pub fn tier_for(total_movies: u64) -> Tier {
    TIERS
        .iter()
        .find(|(min, _)| total_movies >= *min)
        .map(|(_, tier)| *tier)
        .unwrap_or(STARTER_TIER)
}

/// Fill percentage for a 0-10 rating, clamped to 0..=100.
pub fn rating_bar_percent(rating: f64) -> f64 {
    (rating * 10.0).clamp(0.0, 100.0)
}

/// CSS width for a raw `data-rating` value. `None` when the value is not a finite number.
pub fn rating_bar_width(raw: &str) -> Option<String> {
    let rating: f64 = raw.trim().parse().ok()?;
    if !rating.is_finite() {
        return None;
    }
    Some(format!("{}%", rating_bar_percent(rating)))
}

/// Total watch time in days, one decimal.
pub fn days_watched(hours: u64, minutes: u64) -> String {
    let total_minutes = hours.saturating_mul(60).saturating_add(minutes) as f64;
    format!("{:.1}", total_minutes / 60.0 / 24.0)
}

/// Fallback when the server did not send a taste label.
pub fn taste_label(average_rating: f64) -> &'static str {
    if average_rating > 8.5 {
        "You are a true connoisseur, hats off good man!"
    } else if average_rating > 6.5 {
        "You have good taste"
    } else if average_rating > 4.5 {
        "I see you watch most things"
    } else {
        "Bro, what are you watching?"
    }
}

/// Text bind points on the stats page (`data-stat` values plus the tier/genre classes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextBind {
    Days,
    TierTitle,
    TierText,
    Genre,
    Taste,
    AverageRating,
}

impl TextBind {
    /// Selector of the elements showing this value.
    pub fn selector(self) -> String {
        match self {
            TextBind::Days => markup::stat("days"),
            TextBind::TierTitle => markup::class(markup::TIER_TITLE),
            TextBind::TierText => markup::class(markup::TIER_TEXT),
            TextBind::Genre => markup::class(markup::GENRE_CHIP),
            TextBind::Taste => markup::stat("taste"),
            TextBind::AverageRating => markup::stat("average"),
        }
    }
}

/// Everything the page shows, derived from one summary.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsPatch {
    pub hours: u64,
    pub movies: u64,
    pub days: String,
    pub tier: Tier,
    pub genre: String,
    pub taste: String,
    pub average_rating: String,
}

impl StatsPatch {
    pub fn from_summary(summary: &StatsSummary) -> Self {
        let average = summary.average_rating.unwrap_or(0.0);
        StatsPatch {
            hours: summary.hours,
            movies: summary.total_movies,
            days: days_watched(summary.hours, summary.minutes),
            tier: tier_for(summary.total_movies),
            genre: summary
                .most_common_genre
                .clone()
                .filter(|g| !g.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_GENRE.to_string()),
            taste: summary
                .taste_label
                .clone()
                .unwrap_or_else(|| taste_label(average).to_string()),
            average_rating: format!("{:.1}", average),
        }
    }

    pub fn texts(&self) -> [(TextBind, &str); 6] {
        [
            (TextBind::Days, self.days.as_str()),
            (TextBind::TierTitle, self.tier.title),
            (TextBind::TierText, self.tier.subtitle),
            (TextBind::Genre, self.genre.as_str()),
            (TextBind::Taste, self.taste.as_str()),
            (TextBind::AverageRating, self.average_rating.as_str()),
        ]
    }
}

/// Stats page bind points.
pub trait StatsView {
    /// Rewrite the `data-to` of every counter bound to `stat`.
    fn set_count_target(&mut self, stat: CountStat, target: u64);
    fn set_text(&mut self, bind: TextBind, text: &str);
}

/// `.rating-fill` bars.
pub trait RatingBars {
    /// Raw `data-rating` of each bar, in document order.
    fn ratings(&self) -> Vec<Option<String>>;
    fn set_width(&mut self, bar: usize, width: &str);
}

/// Size every rating bar. Returns how many were sized.
pub fn apply_rating_bars(bars: &mut impl RatingBars) -> usize {
    let mut sized = 0;
    for (index, raw) in bars.ratings().into_iter().enumerate() {
        if let Some(width) = raw.as_deref().and_then(rating_bar_width) {
            bars.set_width(index, &width);
            sized += 1;
        }
    }
    sized
}

/// Whether a failed stats fetch is reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    Silent,
    Toast,
}

/// Fetches the summary once and patches the page.
pub struct StatsHydrator<A, N> {
    api: A,
    toasts: N,
    on_failure: FailurePolicy,
}

impl<A: MovieApi, N: ToastSink> StatsHydrator<A, N> {
    pub fn new(api: A, toasts: N, on_failure: FailurePolicy) -> Self {
        StatsHydrator {
            api,
            toasts,
            on_failure,
        }
    }

    /// On failure the page keeps its placeholder markup.
    pub async fn hydrate<V, S>(
        &self,
        view: &mut V,
        slides: Option<(&mut SlideController, &mut S)>,
    ) -> Result<StatsPatch, UiError>
    where
        V: StatsView,
        S: SlideSurface,
    {
        let summary = match self.api.wrapped().await {
            Ok(summary) => summary,
            Err(err) => {
                crate::error_log!("Loading wrapped stats failed: {}", err);
                if self.on_failure == FailurePolicy::Toast {
                    self.toasts.error(&err.user_message(STATS_LOAD_FAILED));
                }
                return Err(err);
            }
        };

        let patch = StatsPatch::from_summary(&summary);
        view.set_count_target(CountStat::Hours, patch.hours);
        view.set_count_target(CountStat::Movies, patch.movies);
        for (bind, text) in patch.texts() {
            view.set_text(bind, text);
        }
        if let Some((controller, surface)) = slides {
            controller.retarget(CountStat::Hours, patch.hours, surface);
            controller.retarget(CountStat::Movies, patch.movies, surface);
        }
        crate::info_log!("Wrapped stats loaded: {} movies", patch.movies);
        Ok(patch)
    }
}
