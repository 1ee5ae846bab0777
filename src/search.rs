// Search form and personal-list loading: validate, fetch, render, bind.

use crate::api::MovieApi;
use crate::error::UiError;
use crate::render::{sort_favorites, ActionBinder, Renderer, ResultsSurface, SortKey};
use crate::toast::ToastSink;

pub const EMPTY_QUERY: &str = "Enter something to search for";
pub const SEARCH_FAILED: &str = "Search failed";
pub const FAVORITES_FAILED: &str = "Could not load your list";

/// What the query text matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchKind {
    #[default]
    Film,
    Director,
}

impl SearchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchKind::Film => "film",
            SearchKind::Director => "director",
        }
    }

    pub fn from_param(value: &str) -> Self {
        match value.trim() {
            "director" => SearchKind::Director,
            _ => SearchKind::Film,
        }
    }
}

/// A non-empty, trimmed search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    text: String,
    kind: SearchKind,
}

impl SearchQuery {
    pub fn new(text: &str, kind: SearchKind) -> Result<Self, UiError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(UiError::Validation(EMPTY_QUERY.to_string()));
        }
        Ok(SearchQuery {
            text: text.to_string(),
            kind,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> SearchKind {
        self.kind
    }
}

/// Pages that list movie cards fetched from the API.
pub struct ResultsPage<A, N> {
    api: A,
    toasts: N,
}

impl<A: MovieApi, N: ToastSink> ResultsPage<A, N> {
    pub fn new(api: A, toasts: N) -> Self {
        ResultsPage { api, toasts }
    }

    /// Run a search and show the hits with add forms. Returns the card count.
    pub async fn search(
        &self,
        text: &str,
        kind: SearchKind,
        surface: &mut impl ResultsSurface,
        binder: &mut impl ActionBinder,
    ) -> Result<usize, UiError> {
        let query = match SearchQuery::new(text, kind) {
            Ok(query) => query,
            Err(err) => {
                self.toasts.error(&err.user_message(EMPTY_QUERY));
                return Err(err);
            }
        };

        match self.api.search(&query).await {
            Ok(records) => Ok(Renderer::search().render(&records, surface).bind(binder)),
            Err(err) => {
                crate::error_log!("Search for {:?} failed: {}", query.text(), err);
                self.toasts.error(&err.user_message(SEARCH_FAILED));
                Err(err)
            }
        }
    }

    /// Fetch and show the personal list with remove forms.
    pub async fn load_favorites(
        &self,
        sort: SortKey,
        reverse: bool,
        surface: &mut impl ResultsSurface,
        binder: &mut impl ActionBinder,
    ) -> Result<usize, UiError> {
        match self.api.list_favorites().await {
            Ok(mut records) => {
                sort_favorites(&mut records, sort, reverse);
                Ok(Renderer::favorites().render(&records, surface).bind(binder))
            }
            Err(err) => {
                crate::error_log!("Loading favorites failed: {}", err);
                self.toasts.error(&err.user_message(FAVORITES_FAILED));
                Err(err)
            }
        }
    }
}
