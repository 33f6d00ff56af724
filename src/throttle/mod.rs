//! Request-budget tracking over a fixed time window
//!
//! The [`Throttler`] counts consumed HTTP requests, globally and per tracked
//! component (keyword), against configurable thresholds inside an hour-long
//! window. It only does the bookkeeping: the decision of whether a proposed
//! batch fits the remaining budget lives in [`admission`].
//!
//! Counters move in one direction. They reset exclusively through
//! [`Throttler::refresh`] when the window has elapsed, never implicitly.

pub mod admission;

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// Default global request budget per window
pub const DEFAULT_GLOBAL_THRESHOLD: u32 = 15;

/// Length of the throttling window, in hours
const WINDOW_HOURS: i64 = 1;

/// Tracks consumed request budget inside a time window
#[derive(Debug)]
pub struct Throttler {
    global_threshold: u32,
    component_threshold: Option<u32>,
    counter: u32,
    components: HashMap<String, u32>,
    active: bool,
    window_start: Option<DateTime<Utc>>,
}

impl Throttler {
    /// Creates a throttler with the given thresholds
    ///
    /// `component_threshold` of `None` disables per-component checking
    /// entirely. The throttler starts inactive; call [`start`](Self::start)
    /// to open the window.
    pub fn new(global_threshold: u32, component_threshold: Option<u32>) -> Self {
        Self {
            global_threshold,
            component_threshold,
            counter: 0,
            components: HashMap::new(),
            active: false,
            window_start: None,
        }
    }

    /// Opens the time window and begins tracking
    ///
    /// Returns false if the throttler was already started.
    pub fn start(&mut self) -> bool {
        if self.window_start.is_some() {
            return false;
        }
        self.window_start = Some(Utc::now());
        self.active = true;
        true
    }

    /// Suspends tracking without touching the window or the counters
    pub fn stop(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        true
    }

    /// Resumes tracking after a [`stop`](Self::stop)
    pub fn resume(&mut self) -> bool {
        if self.window_start.is_none() || self.active {
            return false;
        }
        self.active = true;
        true
    }

    /// Returns true if the current window has fully elapsed
    pub fn time_expired(&self) -> bool {
        match self.window_start {
            Some(start) => Utc::now() - start > Duration::hours(WINDOW_HOURS),
            None => false,
        }
    }

    /// Resets all counters and opens a new window
    pub fn refresh(&mut self) {
        self.counter = 0;
        for hits in self.components.values_mut() {
            *hits = 0;
        }
        self.window_start = Some(Utc::now());
    }

    /// Registers a component to track
    ///
    /// Only allowed while tracking is suspended, so component registration
    /// and keyword bookkeeping move in lockstep. Returns false when active or
    /// when the component already exists (its counter is preserved).
    pub fn add_component(&mut self, name: &str) -> bool {
        if self.active || self.components.contains_key(name) {
            return false;
        }
        self.components.insert(name.to_string(), 0);
        true
    }

    /// Records one consumed request against a component
    ///
    /// Increments both the global counter and the component's counter.
    /// Returns false when inactive or the component is unknown.
    pub fn update_component(&mut self, name: &str) -> bool {
        if !self.active {
            return false;
        }
        match self.components.get_mut(name) {
            Some(hits) => {
                *hits += 1;
                self.counter += 1;
                true
            }
            None => false,
        }
    }

    /// Returns the global hit counter
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Returns the global request threshold
    pub fn global_threshold(&self) -> u32 {
        self.global_threshold
    }

    /// Returns the per-component threshold, if one is configured
    pub fn component_threshold(&self) -> Option<u32> {
        self.component_threshold
    }

    /// Returns the per-component hit counters
    pub fn components(&self) -> &HashMap<String, u32> {
        &self.components
    }

    /// Sets the global threshold; rejects zero
    pub fn set_global_threshold(&mut self, threshold: u32) -> bool {
        if threshold == 0 {
            return false;
        }
        self.global_threshold = threshold;
        true
    }

    /// Sets the per-component threshold; rejects zero
    pub fn set_component_threshold(&mut self, threshold: u32) -> bool {
        if threshold == 0 {
            return false;
        }
        self.component_threshold = Some(threshold);
        true
    }
}
