// Browser timers: setTimeout, requestAnimationFrame, and performance.now().

use std::time::Duration;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

use crate::timers::{FrameTask, Task, TimerId, Timers};
use crate::types::Timestamp;

#[derive(Clone)]
pub struct BrowserTimers {
    window: Window,
}

impl BrowserTimers {
    pub fn new(window: Window) -> Self {
        BrowserTimers { window }
    }
}

impl Timers for BrowserTimers {
    fn after(&self, delay: Duration, task: Task) -> TimerId {
        let callback = Closure::once_into_js(move || task());
        let millis = delay.as_millis().min(i32::MAX as u128) as i32;
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), millis)
        {
            Ok(handle) => TimerId::Timeout(handle),
            Err(err) => {
                crate::error_log!("setTimeout failed: {:?}", err);
                TimerId::Timeout(0)
            }
        }
    }

    fn next_frame(&self, task: FrameTask) -> TimerId {
        let callback =
            Closure::once_into_js(move |time: f64| task(Timestamp::from_millis_f64(time)));
        match self.window.request_animation_frame(callback.unchecked_ref()) {
            Ok(handle) => TimerId::Frame(handle),
            Err(err) => {
                crate::error_log!("requestAnimationFrame failed: {:?}", err);
                TimerId::Frame(0)
            }
        }
    }

    fn cancel(&self, id: TimerId) {
        match id {
            TimerId::Timeout(handle) => self.window.clear_timeout_with_handle(handle),
            TimerId::Frame(handle) => {
                let _ = self.window.cancel_animation_frame(handle);
            }
        }
    }

    fn now(&self) -> Timestamp {
        self.window
            .performance()
            .map(|performance| Timestamp::from_millis_f64(performance.now()))
            .unwrap_or_default()
    }
}
