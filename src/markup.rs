// Markup binding contract: class names and data attributes the page templates provide.
// Renaming any of these breaks the binding between templates and this crate.

pub const ADD_FORM: &str = "add-to-list-form";
pub const REMOVE_FORM: &str = "remove-from-list-form";
pub const MOVIE_CARD: &str = "movie-card";
pub const FADE_OUT: &str = "fade-out";

pub const TOAST_CONTAINER_ID: &str = "toast-container";
pub const TOAST: &str = "toast";
pub const SHOW: &str = "show";

pub const SLIDE: &str = "slide";
pub const SLIDE_ORDINAL_ATTR: &str = "data-slide";
pub const SLIDE_ACTIVE: &str = "is-active";
pub const DOT: &str = "dot";
pub const DOT_ACTIVE: &str = "active";
pub const COUNT_UP: &str = "count-up";
pub const COUNT_TARGET_ATTR: &str = "data-to";
/// Explicit bind point for a dynamic stats value.
pub const STAT_ATTR: &str = "data-stat";

pub const RATING_FILL: &str = "rating-fill";
pub const RATING_ATTR: &str = "data-rating";
pub const TIER_TITLE: &str = "tier-title";
pub const TIER_TEXT: &str = "tier-text";
pub const GENRE_CHIP: &str = "genre-chip";

pub const RESULTS: &str = "results";
pub const FAVORITES_LIST: &str = "favorites-list";
pub const SEARCH_FORM: &str = "search-form";
pub const LOGIN_FORM: &str = "login-form";
pub const REGISTER_FORM: &str = "register-form";

/// Class selector for a class name.
pub fn class(name: &str) -> String {
    format!(".{}", name)
}

/// Attribute selector for a `data-stat` bind point.
pub fn stat(value: &str) -> String {
    format!("[{}=\"{}\"]", STAT_ATTR, value)
}

/// Toast flavor class, `toast-info` or `toast-error`.
pub fn toast_kind_class(kind: crate::types::ToastKind) -> String {
    format!("{}-{}", TOAST, kind.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ToastKind;

    #[test]
    fn selectors_and_kind_classes() {
        assert_eq!(class(ADD_FORM), ".add-to-list-form");
        assert_eq!(toast_kind_class(ToastKind::Error), "toast-error");
        assert_eq!(toast_kind_class(ToastKind::Info), "toast-info");
        assert_eq!(stat("days"), r#"[data-stat="days"]"#);
    }
}
