// Slide activation for the wrapped slideshow.
// Scroll visibility promotes one slide (and its dot) to active and starts that slide's counters once.

use std::time::Duration;

use crate::count_up::{CountStat, CountUp};
use crate::types::{Timestamp, UiConfig};

/// Static description of one `.slide` element.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideSpec {
    /// 1-based `data-slide` ordinal. Selects the dot.
    pub ordinal: Option<u32>,
    pub counters: Vec<CountUp>,
}

impl SlideSpec {
    pub fn new(ordinal: u32, counters: Vec<CountUp>) -> Self {
        SlideSpec {
            ordinal: Some(ordinal),
            counters,
        }
    }
}

/// One intersection observation, as delivered by the observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub slide: usize,
    pub ratio: f64,
}

/// Paints controller state onto slides, dots, and counters.
pub trait SlideSurface {
    fn set_slide_active(&mut self, slide: usize, active: bool);
    fn set_dot_active(&mut self, dot: usize, active: bool);
    fn paint_count(&mut self, slide: usize, counter: usize, value: u64);
}

/// Owns the active slide, the active dot, and every counter's done flag.
pub struct SlideController {
    slides: Vec<SlideSpec>,
    dot_count: usize,
    threshold: f64,
    duration: Duration,
    active_slide: Option<usize>,
    active_dot: Option<usize>,
}

impl SlideController {
    pub fn new(slides: Vec<SlideSpec>, dot_count: usize, config: &UiConfig) -> Self {
        SlideController {
            slides,
            dot_count,
            threshold: config.slide_threshold,
            duration: config.count_up(),
            active_slide: None,
            active_dot: None,
        }
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn active_slide(&self) -> Option<usize> {
        self.active_slide
    }

    pub fn active_dot(&self) -> Option<usize> {
        self.active_dot
    }

    pub fn counter(&self, slide: usize, counter: usize) -> Option<&CountUp> {
        self.slides.get(slide)?.counters.get(counter)
    }

    /// Activate the first slide without waiting for the observer.
    pub fn activate_first(&mut self, now: Timestamp, surface: &mut impl SlideSurface) -> bool {
        if self.slides.is_empty() {
            return false;
        }
        self.activate(0, now, surface)
    }

    /// Process one observer batch in delivery order. Returns true if anything changed.
    pub fn handle_intersections(
        &mut self,
        entries: &[IntersectionEntry],
        now: Timestamp,
        surface: &mut impl SlideSurface,
    ) -> bool {
        let mut changed = false;
        for entry in entries {
            if entry.ratio >= self.threshold {
                changed |= self.activate(entry.slide, now, surface);
            }
        }
        changed
    }

    /// Make `slide` the active one. No-op for the already active slide.
    pub fn activate(&mut self, slide: usize, now: Timestamp, surface: &mut impl SlideSurface) -> bool {
        if slide >= self.slides.len() || self.active_slide == Some(slide) {
            return false;
        }

        if let Some(previous) = self.active_slide {
            surface.set_slide_active(previous, false);
        }
        surface.set_slide_active(slide, true);
        self.active_slide = Some(slide);

        if let Some(previous) = self.active_dot.take() {
            surface.set_dot_active(previous, false);
        }
        let dot = self.slides[slide]
            .ordinal
            .and_then(|ordinal| ordinal.checked_sub(1))
            .map(|index| index as usize)
            .filter(|&index| index < self.dot_count);
        if let Some(dot) = dot {
            surface.set_dot_active(dot, true);
            self.active_dot = Some(dot);
        }

        for counter in &mut self.slides[slide].counters {
            counter.start(now);
        }
        true
    }

    /// Paint one animation frame. Returns true while any counter is still running.
    pub fn tick(&mut self, now: Timestamp, surface: &mut impl SlideSurface) -> bool {
        let mut running = false;
        for (slide_index, slide) in self.slides.iter_mut().enumerate() {
            for (counter_index, counter) in slide.counters.iter_mut().enumerate() {
                if let Some(value) = counter.frame(now, self.duration) {
                    surface.paint_count(slide_index, counter_index, value);
                }
                running |= counter.is_running();
            }
        }
        running
    }

    pub fn is_animating(&self) -> bool {
        self.slides
            .iter()
            .flat_map(|s| s.counters.iter())
            .any(CountUp::is_running)
    }

    /// Point every counter bound to `stat` at a new target. Returns how many counters matched.
    pub fn retarget(&mut self, stat: CountStat, target: u64, surface: &mut impl SlideSurface) -> usize {
        let mut matched = 0;
        for (slide_index, slide) in self.slides.iter_mut().enumerate() {
            for (counter_index, counter) in slide.counters.iter_mut().enumerate() {
                if counter.stat() != Some(stat) {
                    continue;
                }
                matched += 1;
                if let Some(value) = counter.retarget(target) {
                    surface.paint_count(slide_index, counter_index, value);
                }
            }
        }
        matched
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;

    use super::SlideSurface;

    #[derive(Debug, Default)]
    pub(crate) struct FakeSlides {
        pub active_slides: Vec<bool>,
        pub active_dots: Vec<bool>,
        pub painted: HashMap<(usize, usize), u64>,
        pub paint_log: Vec<(usize, usize, u64)>,
    }

    impl FakeSlides {
        pub(crate) fn new(slides: usize, dots: usize) -> Self {
            FakeSlides {
                active_slides: vec![false; slides],
                active_dots: vec![false; dots],
                ..Default::default()
            }
        }

        pub(crate) fn active_count(&self) -> usize {
            self.active_slides.iter().filter(|a| **a).count()
        }
    }

    impl SlideSurface for FakeSlides {
        fn set_slide_active(&mut self, slide: usize, active: bool) {
            self.active_slides[slide] = active;
        }

        fn set_dot_active(&mut self, dot: usize, active: bool) {
            self.active_dots[dot] = active;
        }

        fn paint_count(&mut self, slide: usize, counter: usize, value: u64) {
            self.painted.insert((slide, counter), value);
            self.paint_log.push((slide, counter, value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeSlides;
    use super::*;
    use proptest::prelude::*;

    fn controller() -> SlideController {
        let slides = vec![
            SlideSpec::new(1, vec![CountUp::new(12).with_stat(Some(CountStat::Hours))]),
            SlideSpec::new(2, vec![CountUp::new(30).with_stat(Some(CountStat::Movies)), CountUp::new(4)]),
            SlideSpec::new(3, vec![]),
        ];
        SlideController::new(slides, 3, &UiConfig::default())
    }

    fn entry(slide: usize, ratio: f64) -> IntersectionEntry {
        IntersectionEntry { slide, ratio }
    }

    #[test]
    fn first_slide_activates_on_mount() {
        let mut controller = controller();
        let mut surface = FakeSlides::new(3, 3);
        assert!(controller.activate_first(Timestamp::from_millis(0), &mut surface));
        assert_eq!(controller.active_slide(), Some(0));
        assert_eq!(controller.active_dot(), Some(0));
        assert!(surface.active_slides[0]);
        assert!(surface.active_dots[0]);
        assert!(controller.counter(0, 0).unwrap().is_done());
        assert!(!controller.counter(1, 0).unwrap().is_done());
    }

    #[test]
    fn empty_slideshow_stays_inactive() {
        let mut controller = SlideController::new(vec![], 0, &UiConfig::default());
        let mut surface = FakeSlides::new(0, 0);
        assert!(!controller.activate_first(Timestamp::from_millis(0), &mut surface));
        assert_eq!(controller.active_slide(), None);
    }

    #[test]
    fn below_threshold_is_ignored() {
        let mut controller = controller();
        let mut surface = FakeSlides::new(3, 3);
        controller.activate_first(Timestamp::from_millis(0), &mut surface);
        assert!(!controller.handle_intersections(&[entry(1, 0.59)], Timestamp::from_millis(10), &mut surface));
        assert_eq!(controller.active_slide(), Some(0));
        assert!(controller.handle_intersections(&[entry(1, 0.6)], Timestamp::from_millis(10), &mut surface));
        assert_eq!(controller.active_slide(), Some(1));
        assert_eq!(surface.active_count(), 1);
        assert!(!surface.active_dots[0]);
        assert!(surface.active_dots[1]);
    }

    #[test]
    fn self_transition_is_a_no_op() {
        let mut controller = controller();
        let mut surface = FakeSlides::new(3, 3);
        controller.activate_first(Timestamp::from_millis(0), &mut surface);
        assert!(!controller.activate(0, Timestamp::from_millis(5), &mut surface));
    }

    #[test]
    fn last_entry_of_a_batch_wins() {
        let mut controller = controller();
        let mut surface = FakeSlides::new(3, 3);
        let batch = [entry(2, 0.9), entry(1, 0.7)];
        controller.handle_intersections(&batch, Timestamp::from_millis(0), &mut surface);
        assert_eq!(controller.active_slide(), Some(1));
        assert_eq!(surface.active_count(), 1);
    }

    #[test]
    fn missing_dot_leaves_no_dot_active() {
        let slides = vec![SlideSpec::new(1, vec![]), SlideSpec::new(5, vec![])];
        let mut controller = SlideController::new(slides, 1, &UiConfig::default());
        let mut surface = FakeSlides::new(2, 1);
        controller.activate_first(Timestamp::from_millis(0), &mut surface);
        controller.activate(1, Timestamp::from_millis(0), &mut surface);
        assert_eq!(controller.active_dot(), None);
        assert!(!surface.active_dots[0]);
    }

    #[test]
    fn counters_run_once_per_page_load() {
        let mut controller = controller();
        let mut surface = FakeSlides::new(3, 3);
        controller.activate_first(Timestamp::from_millis(0), &mut surface);

        let mut now = 0;
        while controller.tick(Timestamp::from_millis(now), &mut surface) {
            now += 16;
        }
        assert_eq!(surface.painted[&(0, 0)], 12);

        // Leave and come back: the counter must not restart.
        controller.activate(1, Timestamp::from_millis(now), &mut surface);
        controller.activate(0, Timestamp::from_millis(now + 100), &mut surface);
        surface.paint_log.clear();
        controller.tick(Timestamp::from_millis(now + 116), &mut surface);
        assert!(surface.paint_log.iter().all(|(slide, _, _)| *slide != 0));
        assert_eq!(surface.painted[&(0, 0)], 12);
    }

    #[test]
    fn only_the_active_slide_counts_up() {
        let mut controller = controller();
        let mut surface = FakeSlides::new(3, 3);
        controller.activate(1, Timestamp::from_millis(0), &mut surface);
        controller.tick(Timestamp::from_millis(450), &mut surface);
        assert_eq!(surface.painted.get(&(1, 0)), Some(&15));
        assert_eq!(surface.painted.get(&(1, 1)), Some(&2));
        assert_eq!(surface.painted.get(&(0, 0)), None);
    }

    #[test]
    fn retarget_updates_bound_counters() {
        let mut controller = controller();
        let mut surface = FakeSlides::new(3, 3);
        controller.activate_first(Timestamp::from_millis(0), &mut surface);
        controller.tick(Timestamp::from_millis(900), &mut surface);
        assert_eq!(surface.painted[&(0, 0)], 12);

        assert_eq!(controller.retarget(CountStat::Hours, 48, &mut surface), 1);
        assert_eq!(surface.painted[&(0, 0)], 48);

        // Not started yet: new target used when the slide activates.
        assert_eq!(controller.retarget(CountStat::Movies, 50, &mut surface), 1);
        controller.activate(1, Timestamp::from_millis(1000), &mut surface);
        controller.tick(Timestamp::from_millis(1900), &mut surface);
        assert_eq!(surface.painted[&(1, 0)], 50);
    }

    proptest! {
        #[test]
        fn at_most_one_active_slide(
            batches in prop::collection::vec(
                prop::collection::vec((0usize..5, 0.0f64..1.0), 0..4),
                1..20,
            )
        ) {
            let slides = (1..=5).map(|n| SlideSpec::new(n, vec![CountUp::new(n as u64 * 10)])).collect();
            let mut controller = SlideController::new(slides, 5, &UiConfig::default());
            let mut surface = FakeSlides::new(5, 5);
            controller.activate_first(Timestamp::from_millis(0), &mut surface);

            for (step, batch) in batches.into_iter().enumerate() {
                let entries: Vec<_> = batch.into_iter().map(|(slide, ratio)| entry(slide, ratio)).collect();
                let now = Timestamp::from_millis(step as u64 * 100);
                controller.handle_intersections(&entries, now, &mut surface);
                controller.tick(now, &mut surface);

                prop_assert_eq!(surface.active_count(), 1);
                prop_assert_eq!(surface.active_dots.iter().filter(|d| **d).count(), 1);
                let active = controller.active_slide().unwrap();
                prop_assert!(surface.active_slides[active]);
            }
        }
    }
}
