use std::collections::HashMap;
use std::time::Instant;

use itertools::Itertools;

/// Named stopwatches. Finished timers accumulate so a summary can be printed after many steps.
#[derive(Default)]
pub struct TimerManager {
    current_timers: HashMap<String, Instant>,
    finished_timers: HashMap<String, TimerTotal>,
}

#[derive(Copy, Clone, Debug, Default)]
pub struct TimerTotal {
    pub count: u32,
    pub total_secs: f32,
    pub max_secs: f32,
}

impl TimerTotal {
    pub fn mean_secs(&self) -> f32 {
        if self.count == 0 {
            return 0.0;
        }

        self.total_secs / self.count as f32
    }
}

impl TimerManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start<S: AsRef<str>>(&mut self, name: S) {
        self.current_timers
            .insert(name.as_ref().to_string(), Instant::now());
    }

    /// Stops a timer and returns its duration in seconds, or `None` if it was never started.
    pub fn end<S: AsRef<str>>(&mut self, name: S) -> Option<f32> {
        let start = self.current_timers.remove(name.as_ref())?;
        let duration = start.elapsed().as_secs_f32();

        let total = self
            .finished_timers
            .entry(name.as_ref().to_string())
            .or_default();
        total.count += 1;
        total.total_secs += duration;
        total.max_secs = total.max_secs.max(duration);

        Some(duration)
    }

    /// All finished timers, sorted by name.
    pub fn get_all(&self) -> Vec<(&String, TimerTotal)> {
        self.finished_timers
            .iter()
            .map(|(name, total)| (name, *total))
            .sorted_by(|a, b| a.0.cmp(b.0))
            .collect_vec()
    }
}
