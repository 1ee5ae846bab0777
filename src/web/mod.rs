// Browser bindings. Compiled for wasm32 only; each type adapts DOM objects to a core seam.

mod forms;
mod slideshow;
mod surfaces;
mod timers;

use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, NodeList, Window};

pub use forms::{FormBinder, SharedBinder};
pub use slideshow::Slideshow;
pub use surfaces::{DomCard, DomRatingBars, DomResults, DomSlides, DomStats, DomToastSurface};
pub use timers::BrowserTimers;

use crate::api::HttpApi;
use crate::auth::AuthForms;
use crate::dispatcher::FavoriteDispatcher;
use crate::error::UiError;
use crate::markup::{self, class};
use crate::render::{sort_from_query, ActionBinder, CardAction};
use crate::search::ResultsPage;
use crate::stats::{apply_rating_bars, FailurePolicy, StatsHydrator};
use crate::toast::{Notifier, SilentToasts, ToastSink};
use crate::types::UiConfig;

pub(crate) type Toasts = Rc<dyn ToastSink>;
pub(crate) type Dispatcher = FavoriteDispatcher<HttpApi, Toasts, BrowserTimers>;

pub(crate) fn dom_error(err: JsValue) -> UiError {
    UiError::Dom(format!("{:?}", err))
}

pub(crate) fn elements(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub(crate) fn select_all(document: &Document, selector: &str) -> Vec<Element> {
    match document.query_selector_all(selector) {
        Ok(list) => elements(&list),
        Err(err) => {
            crate::warn_log!("Bad selector {}: {:?}", selector, err);
            Vec::new()
        }
    }
}

/// Live page state. Dropping it leaves the listeners attached but stops nothing else.
pub struct Mounted {
    _binder: SharedBinder,
    _slideshow: Option<Rc<Slideshow>>,
}

fn toasts(document: &Document, timers: &BrowserTimers, config: &UiConfig) -> Toasts {
    match document.get_element_by_id(markup::TOAST_CONTAINER_ID) {
        Some(container) => Rc::new(Notifier::new(
            DomToastSurface::new(document.clone(), container),
            timers.clone(),
            config,
        )),
        None => {
            crate::warn_log!("No #{}; toasts are disabled", markup::TOAST_CONTAINER_ID);
            Rc::new(SilentToasts)
        }
    }
}

fn api_base(config: &UiConfig, window: &Window) -> Result<String, UiError> {
    if config.api_base.is_empty() {
        window.location().origin().map_err(dom_error)
    } else {
        Ok(config.api_base.clone())
    }
}

/// Bind everything the current page offers.
pub fn mount(config: &UiConfig) -> Result<Mounted, UiError> {
    let window = web_sys::window().ok_or_else(|| UiError::Dom("no window".to_string()))?;
    let document = window
        .document()
        .ok_or_else(|| UiError::Dom("no document".to_string()))?;
    let timers = BrowserTimers::new(window.clone());
    let toasts = toasts(&document, &timers, config);
    let api = HttpApi::new(api_base(config, &window)?);

    apply_rating_bars(&mut DomRatingBars::collect(&document));

    let dispatcher = Rc::new(FavoriteDispatcher::new(
        api.clone(),
        Rc::clone(&toasts),
        timers.clone(),
        config,
    ));
    let mut form_binder = FormBinder::new(document.clone());
    form_binder.on(CardAction::Add, forms::add_handler(Rc::clone(&dispatcher)));
    form_binder.on(CardAction::Remove, forms::remove_handler(dispatcher));
    let mut binder = SharedBinder::new(form_binder);
    for action in [CardAction::Add, CardAction::Remove] {
        binder.unbind(action);
        binder.bind(action);
    }

    let page = Rc::new(ResultsPage::new(api.clone(), Rc::clone(&toasts)));
    forms::bind_search(&document, Rc::clone(&page), binder.clone());
    forms::bind_auth(&document, Rc::new(AuthForms::new(api.clone(), Rc::clone(&toasts))));

    if let Ok(Some(list)) = document.query_selector(&class(markup::FAVORITES_LIST)) {
        let (sort, reverse) = sort_from_query(&window.location().search().unwrap_or_default());
        let mut binder = binder.clone();
        spawn_local(async move {
            let mut surface = DomResults::new(list);
            let _ = page
                .load_favorites(sort, reverse, &mut surface, &mut binder)
                .await;
        });
    }

    let slideshow = Slideshow::start(&document, timers, config)?;
    if let Some(show) = &slideshow {
        let policy = if config.stats_failure_toast {
            FailurePolicy::Toast
        } else {
            FailurePolicy::Silent
        };
        let hydrator = StatsHydrator::new(api, toasts, policy);
        let show = Rc::clone(show);
        spawn_local(async move {
            let mut view = DomStats::new(document);
            if let Ok(patch) = hydrator.hydrate::<_, DomSlides>(&mut view, None).await {
                show.retarget(&patch);
            }
        });
    }

    crate::info_log!("movielist_ui mounted");
    Ok(Mounted {
        _binder: binder,
        _slideshow: slideshow,
    })
}
