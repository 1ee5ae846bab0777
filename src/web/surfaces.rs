// DOM implementations of the core surfaces.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use super::select_all;
use crate::count_up::{CountStat, CountUp};
use crate::dispatcher::CardSurface;
use crate::markup::{self, class};
use crate::render::ResultsSurface;
use crate::slides::{SlideSpec, SlideSurface};
use crate::stats::{RatingBars, StatsView, TextBind};
use crate::toast::{ToastSurface, ToastToken};
use crate::types::ToastKind;

/// `#toast-container`. Holds at most the one live toast node.
pub struct DomToastSurface {
    document: Document,
    container: Element,
    current: Option<(ToastToken, Element)>,
}

impl DomToastSurface {
    pub fn new(document: Document, container: Element) -> Self {
        DomToastSurface {
            document,
            container,
            current: None,
        }
    }
}

impl ToastSurface for DomToastSurface {
    fn clear(&mut self) {
        self.container.set_inner_html("");
        self.current = None;
    }

    fn insert(&mut self, token: ToastToken, message: &str, kind: ToastKind) {
        let node = match self.document.create_element("div") {
            Ok(node) => node,
            Err(err) => {
                crate::error_log!("Creating toast failed: {:?}", err);
                return;
            }
        };
        node.set_class_name(&format!("{} {}", markup::TOAST, markup::toast_kind_class(kind)));
        node.set_text_content(Some(message));
        if let Err(err) = self.container.append_child(&node) {
            crate::error_log!("Inserting toast failed: {:?}", err);
            return;
        }
        self.current = Some((token, node));
    }

    fn set_shown(&mut self, token: ToastToken, shown: bool) {
        let Some((live, node)) = &self.current else {
            return;
        };
        if *live != token {
            return;
        }
        let classes = node.class_list();
        let _ = if shown {
            classes.add_1(markup::SHOW)
        } else {
            classes.remove_1(markup::SHOW)
        };
    }

    fn remove(&mut self, token: ToastToken) {
        if matches!(&self.current, Some((live, _)) if *live == token) {
            if let Some((_, node)) = self.current.take() {
                node.remove();
            }
        }
    }
}

/// A `.movie-card` element.
#[derive(Clone)]
pub struct DomCard(pub Element);

impl CardSurface for DomCard {
    fn fade_out(&self) {
        let _ = self.0.class_list().add_1(markup::FADE_OUT);
    }

    fn restore(&self) {
        let _ = self.0.class_list().remove_1(markup::FADE_OUT);
    }

    fn detach(&self) {
        self.0.remove();
    }
}

/// `.results` or `.favorites-list`.
pub struct DomResults {
    container: Element,
}

impl DomResults {
    pub fn new(container: Element) -> Self {
        DomResults { container }
    }
}

impl ResultsSurface for DomResults {
    fn set_content(&mut self, html: &str) {
        self.container.set_inner_html(html);
    }

    fn show_empty_state(&mut self, html: &str) {
        self.container.set_inner_html(html);
    }
}

pub struct DomStats {
    document: Document,
}

impl DomStats {
    pub fn new(document: Document) -> Self {
        DomStats { document }
    }
}

impl StatsView for DomStats {
    fn set_count_target(&mut self, stat: CountStat, target: u64) {
        let selector = format!("{}{}", class(markup::COUNT_UP), markup::stat(stat.as_str()));
        for counter in select_all(&self.document, &selector) {
            let _ = counter.set_attribute(markup::COUNT_TARGET_ATTR, &target.to_string());
        }
    }

    fn set_text(&mut self, bind: TextBind, text: &str) {
        for element in select_all(&self.document, &bind.selector()) {
            element.set_text_content(Some(text));
        }
    }
}

pub struct DomRatingBars {
    bars: Vec<Element>,
}

impl DomRatingBars {
    pub fn collect(document: &Document) -> Self {
        DomRatingBars {
            bars: select_all(document, &class(markup::RATING_FILL)),
        }
    }
}

impl RatingBars for DomRatingBars {
    fn ratings(&self) -> Vec<Option<String>> {
        self.bars
            .iter()
            .map(|bar| bar.get_attribute(markup::RATING_ATTR))
            .collect()
    }

    fn set_width(&mut self, bar: usize, width: &str) {
        if let Some(bar) = self.bars.get(bar).and_then(|b| b.dyn_ref::<HtmlElement>()) {
            let _ = bar.style().set_property("width", width);
        }
    }
}

/// Slides, dots, and each slide's counters, in document order.
pub struct DomSlides {
    slides: Vec<Element>,
    dots: Vec<Element>,
    counters: Vec<Vec<Element>>,
}

impl DomSlides {
    pub fn collect(document: &Document) -> Self {
        let slides = select_all(document, &class(markup::SLIDE));
        let counters = slides
            .iter()
            .map(|slide| match slide.query_selector_all(&class(markup::COUNT_UP)) {
                Ok(list) => super::elements(&list),
                Err(_) => Vec::new(),
            })
            .collect();
        DomSlides {
            dots: select_all(document, &class(markup::DOT)),
            slides,
            counters,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn slides(&self) -> &[Element] {
        &self.slides
    }

    pub fn dot_count(&self) -> usize {
        self.dots.len()
    }

    pub fn index_of(&self, target: &Element) -> Option<usize> {
        self.slides
            .iter()
            .position(|slide| slide.is_same_node(Some(target)))
    }

    /// Controller input read from `data-slide`, `data-to`, and `data-stat`.
    pub fn specs(&self) -> Vec<SlideSpec> {
        self.slides
            .iter()
            .zip(&self.counters)
            .map(|(slide, counters)| SlideSpec {
                ordinal: slide
                    .get_attribute(markup::SLIDE_ORDINAL_ATTR)
                    .and_then(|v| v.trim().parse().ok()),
                counters: counters
                    .iter()
                    .map(|counter| {
                        let target = counter
                            .get_attribute(markup::COUNT_TARGET_ATTR)
                            .and_then(|v| v.trim().parse().ok())
                            .unwrap_or(0);
                        let stat = counter
                            .get_attribute(markup::STAT_ATTR)
                            .and_then(|v| CountStat::from_attr(&v));
                        CountUp::new(target).with_stat(stat)
                    })
                    .collect(),
            })
            .collect()
    }
}

fn toggle(element: Option<&Element>, name: &str, on: bool) {
    if let Some(element) = element {
        let _ = if on {
            element.class_list().add_1(name)
        } else {
            element.class_list().remove_1(name)
        };
    }
}

impl SlideSurface for DomSlides {
    fn set_slide_active(&mut self, slide: usize, active: bool) {
        toggle(self.slides.get(slide), markup::SLIDE_ACTIVE, active);
    }

    fn set_dot_active(&mut self, dot: usize, active: bool) {
        toggle(self.dots.get(dot), markup::DOT_ACTIVE, active);
    }

    fn paint_count(&mut self, slide: usize, counter: usize, value: u64) {
        if let Some(element) = self.counters.get(slide).and_then(|c| c.get(counter)) {
            element.set_text_content(Some(&value.to_string()));
        }
    }
}
