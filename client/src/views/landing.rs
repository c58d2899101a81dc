use std::time::{Duration, Instant};

use crate::router::{AuthState, Route, home_for};

pub const HERO_TITLE: &str = "Welcome to EduHub";
pub const HERO_SUBTITLE: &str =
    "Create assignments, collect submissions and keep every deadline in view.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
}

pub const FEATURES: [Feature; 3] = [
    Feature {
        title: "Create Assignments",
        description: "Teachers publish assignments with a description and a due date.",
    },
    Feature {
        title: "Submit Work",
        description: "Students hand in a link to their work before the deadline.",
    },
    Feature {
        title: "Track Deadlines",
        description: "See what is due soon and what is already overdue at a glance.",
    },
];

/// Rotates through [`FEATURES`] on a fixed interval.
#[derive(Debug, Clone)]
pub struct FeatureCarousel {
    index: usize,
    interval: Duration,
    last_rotated: Instant,
}

impl FeatureCarousel {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            index: 0,
            interval,
            last_rotated: now,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &'static Feature {
        &FEATURES[self.index % FEATURES.len()]
    }

    /// Advances once per elapsed interval. Returns `true` if the feature
    /// changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.interval.is_zero() {
            return false;
        }

        let mut rotated = false;
        while now.saturating_duration_since(self.last_rotated) >= self.interval {
            self.last_rotated += self.interval;
            self.index = (self.index + 1) % FEATURES.len();
            rotated = true;
        }
        rotated
    }

    /// Manual selection restarts the interval.
    pub fn select(&mut self, index: usize, now: Instant) {
        self.index = index % FEATURES.len();
        self.last_rotated = now;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallToAction {
    pub label: &'static str,
    pub target: Route,
}

#[derive(Debug, Clone)]
pub struct LandingView {
    pub carousel: FeatureCarousel,
}

impl LandingView {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            carousel: FeatureCarousel::new(interval, now),
        }
    }

    /// Buttons under the hero text for the given auth state.
    pub fn call_to_action(auth: &AuthState) -> Vec<CallToAction> {
        match auth.role() {
            None => vec![
                CallToAction {
                    label: "Start Your Journey",
                    target: Route::Register,
                },
                CallToAction {
                    label: "Sign In",
                    target: Route::Login,
                },
            ],
            Some(role) => vec![CallToAction {
                label: "Go to Dashboard",
                target: home_for(role),
            }],
        }
    }
}
