// movielist_ui: Rust/WASM client for the movie list site.
// All UI logic lives in the host-testable core; `web` binds it to the DOM. JS only calls `new App(config).mount()`.

#[macro_use]
mod logging;

mod api;
mod auth;
mod count_up;
mod dispatcher;
mod error;
pub mod markup;
mod render;
mod search;
mod slides;
mod stats;
mod timers;
mod toast;
mod types;

#[cfg(target_arch = "wasm32")]
pub mod web;

use wasm_bindgen::prelude::*;

pub use api::{server_message, AddStatus, FavoriteForm, HttpApi, MovieApi};
pub use auth::{AuthForms, Credentials, Registration, MOVIES_PATH};
pub use count_up::{CountStat, CountUp};
pub use dispatcher::{AddOutcome, CardSurface, FavoriteDispatcher, RemoveOutcome};
pub use error::UiError;
pub use render::{
    escape_html, format_rating, format_runtime, render_card, sort_favorites, sort_from_query,
    ActionBinder, CardAction, Renderer, ResultsSurface, SortKey, Unbound,
};
pub use search::{ResultsPage, SearchKind, SearchQuery};
pub use slides::{IntersectionEntry, SlideController, SlideSpec, SlideSurface};
pub use stats::{
    apply_rating_bars, days_watched, rating_bar_width, taste_label, tier_for, FailurePolicy,
    RatingBars, StatsHydrator, StatsPatch, StatsView, TextBind, Tier,
};
pub use timers::{TimerId, Timers};
pub use toast::{Notifier, SilentToasts, ToastPhase, ToastSink, ToastSurface, ToastToken, Toaster};
pub use types::*;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Page entry point exposed to JavaScript.
#[wasm_bindgen]
pub struct App {
    config: UiConfig,
    #[cfg(target_arch = "wasm32")]
    mounted: Option<web::Mounted>,
}

impl App {
    fn from_config(config_json: &str) -> Result<App, UiError> {
        let config = if config_json.trim().is_empty() {
            UiConfig::default()
        } else {
            UiConfig::from_json(config_json)?
        };
        Ok(App {
            config,
            #[cfg(target_arch = "wasm32")]
            mounted: None,
        })
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }
}

#[wasm_bindgen]
impl App {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<App, JsValue> {
        App::from_config(config_json).map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))
    }

    /// Tier title for a watched-movie count.
    #[wasm_bindgen(js_name = tierTitle)]
    pub fn tier_title(total_movies: u32) -> String {
        tier_for(u64::from(total_movies)).title.to_string()
    }

    /// CSS width for a `data-rating` value, or `undefined` when it is not a number.
    #[wasm_bindgen(js_name = ratingBarWidth)]
    pub fn rating_bar_width(raw: &str) -> Option<String> {
        stats::rating_bar_width(raw)
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl App {
    /// Bind toasts, forms, rating bars, and the slideshow on the current page. Idempotent.
    pub fn mount(&mut self) -> Result<(), JsValue> {
        if self.mounted.is_some() {
            return Ok(());
        }
        let mounted = web::mount(&self.config)
            .map_err(|e| JsValue::from_str(&format!("Mount failed: {}", e)))?;
        self.mounted = Some(mounted);
        Ok(())
    }
}
