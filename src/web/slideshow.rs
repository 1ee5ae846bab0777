// Wires the slide controller to an IntersectionObserver and an animation-frame loop.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
};

use super::dom_error;
use super::surfaces::DomSlides;
use super::timers::BrowserTimers;
use crate::count_up::CountStat;
use crate::error::UiError;
use crate::slides::{IntersectionEntry, SlideController};
use crate::stats::StatsPatch;
use crate::timers::Timers;
use crate::types::{Timestamp, UiConfig};

pub struct Slideshow {
    controller: RefCell<SlideController>,
    surface: RefCell<DomSlides>,
    timers: BrowserTimers,
    ticking: Cell<bool>,
    observer: RefCell<Option<IntersectionObserver>>,
}

impl Slideshow {
    /// `None` when the page has no slides.
    pub fn start(
        document: &Document,
        timers: BrowserTimers,
        config: &UiConfig,
    ) -> Result<Option<Rc<Self>>, UiError> {
        let surface = DomSlides::collect(document);
        if surface.is_empty() {
            return Ok(None);
        }

        let controller = SlideController::new(surface.specs(), surface.dot_count(), config);
        let show = Rc::new(Slideshow {
            controller: RefCell::new(controller),
            surface: RefCell::new(surface),
            timers,
            ticking: Cell::new(false),
            observer: RefCell::new(None),
        });

        let now = show.timers.now();
        show.controller
            .borrow_mut()
            .activate_first(now, &mut *show.surface.borrow_mut());
        Self::schedule_tick(&show);

        let observer = Self::observe(&show, config.slide_threshold)?;
        *show.observer.borrow_mut() = Some(observer);
        crate::info_log!("Slideshow mounted with {} slides", show.controller.borrow().len());
        Ok(Some(show))
    }

    fn observe(show: &Rc<Self>, threshold: f64) -> Result<IntersectionObserver, UiError> {
        let weak = Rc::downgrade(show);
        let callback = Closure::wrap(Box::new(move |entries: js_sys::Array, _: JsValue| {
            let Some(show) = weak.upgrade() else {
                return;
            };
            let batch: Vec<IntersectionEntry> = {
                let surface = show.surface.borrow();
                entries
                    .iter()
                    .filter_map(|value| value.dyn_into::<IntersectionObserverEntry>().ok())
                    .filter_map(|entry| {
                        let slide = surface.index_of(&entry.target())?;
                        Some(IntersectionEntry {
                            slide,
                            ratio: entry.intersection_ratio(),
                        })
                    })
                    .collect()
            };
            show.handle(&batch);
        }) as Box<dyn FnMut(js_sys::Array, JsValue)>);

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(threshold));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .map_err(dom_error)?;
        callback.forget();

        for slide in show.surface.borrow().slides() {
            observer.observe(slide);
        }
        Ok(observer)
    }

    fn handle(self: &Rc<Self>, batch: &[IntersectionEntry]) {
        let now = self.timers.now();
        let changed = self
            .controller
            .borrow_mut()
            .handle_intersections(batch, now, &mut *self.surface.borrow_mut());
        if changed {
            Self::schedule_tick(self);
        }
    }

    fn schedule_tick(show: &Rc<Self>) {
        if !show.controller.borrow().is_animating() || show.ticking.replace(true) {
            return;
        }
        let next = Rc::clone(show);
        show.timers
            .next_frame(Box::new(move |now: Timestamp| next.tick(now)));
    }

    fn tick(self: Rc<Self>, now: Timestamp) {
        self.ticking.set(false);
        let running = self
            .controller
            .borrow_mut()
            .tick(now, &mut *self.surface.borrow_mut());
        if running {
            Self::schedule_tick(&self);
        }
    }

    /// Point the hours and movie counters at hydrated values.
    pub fn retarget(&self, patch: &StatsPatch) {
        let mut controller = self.controller.borrow_mut();
        let mut surface = self.surface.borrow_mut();
        controller.retarget(CountStat::Hours, patch.hours, &mut *surface);
        controller.retarget(CountStat::Movies, patch.movies, &mut *surface);
    }
}
