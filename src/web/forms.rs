// Submit handlers for card forms, the search form, and the auth forms.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, FormData, HtmlFormElement};

use super::surfaces::{DomCard, DomResults};
use super::{dom_error, select_all, Dispatcher, Toasts};
use crate::api::{FavoriteForm, HttpApi};
use crate::auth::{AuthForms, Credentials, Registration};
use crate::error::UiError;
use crate::markup::{self, class};
use crate::render::{ActionBinder, CardAction};
use crate::search::{ResultsPage, SearchKind};

type SubmitHandler = Rc<dyn Fn(Event)>;

/// Attaches one submit listener per card form and remembers it so it can be removed again.
pub struct FormBinder {
    document: Document,
    handlers: HashMap<CardAction, SubmitHandler>,
    bound: HashMap<CardAction, Vec<(Element, Closure<dyn FnMut(Event)>)>>,
}

impl FormBinder {
    pub fn new(document: Document) -> Self {
        FormBinder {
            document,
            handlers: HashMap::new(),
            bound: HashMap::new(),
        }
    }

    pub fn on(&mut self, action: CardAction, handler: impl Fn(Event) + 'static) {
        self.handlers.insert(action, Rc::new(handler));
    }
}

impl ActionBinder for FormBinder {
    fn unbind(&mut self, action: CardAction) {
        for (form, listener) in self.bound.remove(&action).unwrap_or_default() {
            let _ = form
                .remove_event_listener_with_callback("submit", listener.as_ref().unchecked_ref());
        }
    }

    fn bind(&mut self, action: CardAction) {
        let Some(handler) = self.handlers.get(&action).cloned() else {
            return;
        };
        let mut bound = Vec::new();
        for form in select_all(&self.document, &class(action.form_class())) {
            let handler = Rc::clone(&handler);
            let listener =
                Closure::wrap(Box::new(move |event: Event| handler(event)) as Box<dyn FnMut(Event)>);
            match form.add_event_listener_with_callback("submit", listener.as_ref().unchecked_ref()) {
                Ok(()) => bound.push((form, listener)),
                Err(err) => crate::warn_log!("Binding {} failed: {:?}", action.form_class(), err),
            }
        }
        self.bound.entry(action).or_default().extend(bound);
    }
}

/// Binder shared between the mount code and async render flows. Borrows only inside each call.
#[derive(Clone)]
pub struct SharedBinder(Rc<RefCell<FormBinder>>);

impl SharedBinder {
    pub fn new(binder: FormBinder) -> Self {
        SharedBinder(Rc::new(RefCell::new(binder)))
    }
}

impl ActionBinder for SharedBinder {
    fn unbind(&mut self, action: CardAction) {
        self.0.borrow_mut().unbind(action);
    }

    fn bind(&mut self, action: CardAction) {
        self.0.borrow_mut().bind(action);
    }
}

/// Every string field of a form, in form order.
fn form_fields(form: &HtmlFormElement) -> Result<Vec<(String, String)>, UiError> {
    let data = FormData::new_with_form(form).map_err(dom_error)?;
    let entries = js_sys::try_iter(&data)
        .map_err(dom_error)?
        .ok_or_else(|| UiError::Dom("form data is not iterable".to_string()))?;

    let mut fields = Vec::new();
    for entry in entries {
        let entry = js_sys::Array::from(&entry.map_err(dom_error)?);
        if let (Some(name), Some(value)) = (entry.get(0).as_string(), entry.get(1).as_string()) {
            fields.push((name, value));
        }
    }
    Ok(fields)
}

fn field(fields: &[(String, String)], name: &str) -> String {
    fields
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.clone())
        .unwrap_or_default()
}

/// Stop the native submit and read the form's fields.
fn intercept(event: &Event) -> Option<(HtmlFormElement, Vec<(String, String)>)> {
    event.prevent_default();
    let form = event.current_target()?.dyn_into::<HtmlFormElement>().ok()?;
    match form_fields(&form) {
        Ok(fields) => Some((form, fields)),
        Err(err) => {
            crate::error_log!("Reading form failed: {}", err);
            None
        }
    }
}

pub fn add_handler(dispatcher: Rc<Dispatcher>) -> impl Fn(Event) {
    move |event: Event| {
        let Some((_, fields)) = intercept(&event) else {
            return;
        };
        let dispatcher = Rc::clone(&dispatcher);
        spawn_local(async move {
            dispatcher.add(&FavoriteForm::new(fields)).await;
        });
    }
}

pub fn remove_handler(dispatcher: Rc<Dispatcher>) -> impl Fn(Event) {
    move |event: Event| {
        let Some((form, fields)) = intercept(&event) else {
            return;
        };
        let Ok(Some(card)) = form.closest(&class(markup::MOVIE_CARD)) else {
            return;
        };
        let raw_id = field(&fields, "id");
        let dispatcher = Rc::clone(&dispatcher);
        spawn_local(async move {
            dispatcher.remove(&DomCard(card), &raw_id).await;
        });
    }
}

fn listen(form: &Element, handler: impl FnMut(Event) + 'static) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    match form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref()) {
        Ok(()) => closure.forget(),
        Err(err) => crate::warn_log!("Binding form failed: {:?}", err),
    }
}

pub fn bind_search(document: &Document, page: Rc<ResultsPage<HttpApi, Toasts>>, binder: SharedBinder) {
    for form in select_all(document, &class(markup::SEARCH_FORM)) {
        let document = document.clone();
        let page = Rc::clone(&page);
        let binder = binder.clone();
        listen(&form, move |event: Event| {
            let Some((_, fields)) = intercept(&event) else {
                return;
            };
            let Ok(Some(container)) = document.query_selector(&class(markup::RESULTS)) else {
                crate::warn_log!("No .{} container for search results", markup::RESULTS);
                return;
            };
            let page = Rc::clone(&page);
            let mut binder = binder.clone();
            spawn_local(async move {
                let mut surface = DomResults::new(container);
                let kind = SearchKind::from_param(&field(&fields, "type"));
                let _ = page
                    .search(&field(&fields, "q"), kind, &mut surface, &mut binder)
                    .await;
            });
        });
    }
}

fn navigate(path: &str) {
    let result = web_sys::window()
        .ok_or_else(|| UiError::Dom("no window".to_string()))
        .and_then(|window| window.location().set_href(path).map_err(dom_error));
    if let Err(err) = result {
        crate::error_log!("Navigation to {} failed: {}", path, err);
    }
}

pub fn bind_auth(document: &Document, forms: Rc<AuthForms<HttpApi, Toasts>>) {
    for form in select_all(document, &class(markup::LOGIN_FORM)) {
        let forms = Rc::clone(&forms);
        listen(&form, move |event: Event| {
            let Some((_, fields)) = intercept(&event) else {
                return;
            };
            let credentials = Credentials::new(field(&fields, "username"), field(&fields, "password"));
            let forms = Rc::clone(&forms);
            spawn_local(async move {
                if let Ok(path) = forms.login(&credentials).await {
                    navigate(path);
                }
            });
        });
    }

    for form in select_all(document, &class(markup::REGISTER_FORM)) {
        let forms = Rc::clone(&forms);
        listen(&form, move |event: Event| {
            let Some((_, fields)) = intercept(&event) else {
                return;
            };
            let registration = Registration::new(
                field(&fields, "username"),
                field(&fields, "password"),
                field(&fields, "confirm"),
            );
            let forms = Rc::clone(&forms);
            spawn_local(async move {
                if let Ok(path) = forms.register(&registration).await {
                    navigate(path);
                }
            });
        });
    }
}
