// Movie card markup for search results and the personal list.
// Rendering replaces the container wholesale, so it hands back an `Unbound` token that must be bound.

use std::borrow::Cow;
use std::cmp::Ordering;

use serde::Deserialize;

use crate::api::FavoriteForm;
use crate::markup;
use crate::types::MovieRecord;

pub const EMPTY_FAVORITES: &str =
    r#"<p class="empty-state">Your list is empty. Search for a movie and add it here.</p>"#;

/// Which form a card carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardAction {
    /// Search page: add to list.
    Add,
    /// Personal list: remove from list.
    Remove,
}

impl CardAction {
    pub fn form_class(self) -> &'static str {
        match self {
            CardAction::Add => markup::ADD_FORM,
            CardAction::Remove => markup::REMOVE_FORM,
        }
    }
}

pub fn escape_html(s: &str) -> Cow<'_, str> {
    if s.contains(['&', '<', '>', '"', '\'']) {
        let mut escaped = String::with_capacity(s.len() + 8);
        for c in s.chars() {
            match c {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&#x27;"),
                _ => escaped.push(c),
            }
        }
        Cow::Owned(escaped)
    } else {
        Cow::Borrowed(s)
    }
}

/// "2h 28m", "45m", "2h". `None` for unknown or zero runtimes.
pub fn format_runtime(minutes: Option<u32>) -> Option<String> {
    let minutes = minutes.filter(|m| *m > 0)?;
    let (hours, rest) = (minutes / 60, minutes % 60);
    Some(match (hours, rest) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    })
}

pub fn format_rating(rating: Option<f64>) -> String {
    format!("{:.1}", rating.filter(|r| r.is_finite()).unwrap_or(0.0))
}

fn hidden_input(name: &str, value: &str) -> String {
    format!(
        r#"<input type="hidden" name="{}" value="{}">"#,
        escape_html(name),
        escape_html(value)
    )
}

fn action_form(record: &MovieRecord, action: CardAction) -> String {
    match action {
        CardAction::Add => {
            let inputs: String = FavoriteForm::from_record(record)
                .fields
                .iter()
                .map(|(name, value)| hidden_input(name, value))
                .collect();
            format!(
                r#"<form class="{}" action="/api/favorites" method="post">{}<button type="submit">Add to list</button></form>"#,
                action.form_class(),
                inputs
            )
        }
        CardAction::Remove => format!(
            r#"<form class="{}" action="/api/favorites/{}" method="post">{}<button type="submit">Remove</button></form>"#,
            action.form_class(),
            record.id,
            hidden_input("id", &record.id.to_string())
        ),
    }
}

pub fn render_card(record: &MovieRecord, action: CardAction) -> String {
    let title = escape_html(&record.title);
    let poster = match record.poster_url.as_deref().filter(|u| !u.is_empty()) {
        Some(url) => format!(
            r#"<img class="poster" src="{}" alt="{}">"#,
            escape_html(url),
            title
        ),
        None => r#"<div class="poster poster-placeholder">No poster</div>"#.to_string(),
    };

    let mut details = vec![
        format!(
            r#"<p class="release-date">{}</p>"#,
            escape_html(record.release_date.as_deref().unwrap_or("Unknown"))
        ),
        format!(
            r#"<p class="director">Director: {}</p>"#,
            escape_html(record.director.as_deref().unwrap_or("Unknown"))
        ),
        format!(r#"<p class="rating">⭐ {}</p>"#, format_rating(record.rating)),
    ];
    if let Some(runtime) = format_runtime(record.runtime) {
        details.push(format!(r#"<p class="runtime">{}</p>"#, runtime));
    }
    if !record.genres.is_empty() {
        details.push(format!(
            r#"<p class="genres">{}</p>"#,
            escape_html(&record.genres.join(", "))
        ));
    }

    format!(
        r#"<div class="{}" data-id="{}">{}<div class="card-body"><h3 class="title">{}</h3>{}{}</div></div>"#,
        markup::MOVIE_CARD,
        record.id,
        poster,
        title,
        details.concat(),
        action_form(record, action)
    )
}

/// Results container.
pub trait ResultsSurface {
    fn set_content(&mut self, html: &str);
    fn show_empty_state(&mut self, html: &str);
}

/// Attaches submit handlers to the forms inside the results container.
pub trait ActionBinder {
    /// Detach any handler of this kind from every form of this kind.
    fn unbind(&mut self, action: CardAction);
    fn bind(&mut self, action: CardAction);
}

/// Freshly rendered cards whose forms have no handlers yet.
#[must_use = "rendered cards have no submit handlers until bound"]
#[derive(Debug)]
pub struct Unbound {
    action: CardAction,
    cards: usize,
}

impl Unbound {
    /// Re-attach handlers, dropping any previous ones first. Returns the card count.
    pub fn bind(self, binder: &mut impl ActionBinder) -> usize {
        binder.unbind(self.action);
        binder.bind(self.action);
        self.cards
    }
}

/// Card renderer for one page kind.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    action: CardAction,
}

impl Renderer {
    pub fn search() -> Self {
        Renderer {
            action: CardAction::Add,
        }
    }

    pub fn favorites() -> Self {
        Renderer {
            action: CardAction::Remove,
        }
    }

    pub fn action(&self) -> CardAction {
        self.action
    }

    pub fn render(&self, records: &[MovieRecord], surface: &mut impl ResultsSurface) -> Unbound {
        if records.is_empty() && self.action == CardAction::Remove {
            surface.show_empty_state(EMPTY_FAVORITES);
        } else {
            let html: String = records
                .iter()
                .map(|record| render_card(record, self.action))
                .collect();
            surface.set_content(&html);
        }
        Unbound {
            action: self.action,
            cards: records.len(),
        }
    }
}

/// Ordering of the personal list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Order the movies were added in.
    #[default]
    Added,
    Rating,
    Release,
}

impl SortKey {
    pub fn from_query(value: &str) -> Self {
        match value {
            "rating" => SortKey::Rating,
            "release" => SortKey::Release,
            _ => SortKey::Added,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SortParams {
    #[serde(default)]
    sort: Option<String>,
    #[serde(default)]
    reverse: Option<String>,
}

/// Boolean spellings the server accepts in query parameters.
fn truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

/// `sort` and `reverse` from a `?sort=rating&reverse=true` query string.
/// A malformed query falls back to server order.
pub fn sort_from_query(query: &str) -> (SortKey, bool) {
    let params: SortParams =
        serde_urlencoded::from_str(query.trim_start_matches('?')).unwrap_or_default();
    (
        params
            .sort
            .as_deref()
            .map(SortKey::from_query)
            .unwrap_or_default(),
        params.reverse.as_deref().map(truthy).unwrap_or(false),
    )
}

/// Rating and release sort descending unless `reverse`; added order flips only with `reverse`.
pub fn sort_favorites(records: &mut [MovieRecord], key: SortKey, reverse: bool) {
    let descending = |ordering: Ordering| if reverse { ordering } else { ordering.reverse() };
    match key {
        SortKey::Added => {
            if reverse {
                records.reverse();
            }
        }
        SortKey::Rating => records.sort_by(|a, b| {
            descending(a.rating.unwrap_or(0.0).total_cmp(&b.rating.unwrap_or(0.0)))
        }),
        SortKey::Release => records.sort_by(|a, b| {
            descending(
                a.release_date
                    .as_deref()
                    .unwrap_or("")
                    .cmp(b.release_date.as_deref().unwrap_or("")),
            )
        }),
    }
}
