use std::fs;
use std::time::{Duration, Instant};

use crate::game::Move;

const MEMORY_SAMPLE_INTERVAL: usize = 4096;

/// Counters and timing for one search run. Budget exhaustion is a normal
/// outcome; `hit_state_limit`/`hit_time_limit` record why a run gave up.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchMetrics {
    pub elapsed_seconds: f64,
    pub states_explored: usize,
    pub states_generated: usize,
    pub max_queue_size: usize,
    pub max_depth_reached: usize,
    pub solution_length: usize,
    pub peak_memory_mb: f64,
    pub average_memory_mb: f64,
    pub hit_state_limit: bool,
    pub hit_time_limit: bool,
}

impl SearchMetrics {
    pub fn states_per_second(&self) -> f64 {
        if self.elapsed_seconds > 0.0 {
            self.states_explored as f64 / self.elapsed_seconds
        } else {
            0.0
        }
    }
}

/// Live counters maintained by the search loops, frozen into a
/// `SearchMetrics` when the run finishes.
pub(crate) struct MetricsTracker {
    started_at: Instant,
    pub states_explored: usize,
    pub states_generated: usize,
    pub max_queue_size: usize,
    pub max_depth_reached: usize,
    pub hit_state_limit: bool,
    pub hit_time_limit: bool,
    memory_samples: Vec<f64>,
}

impl MetricsTracker {
    pub fn start() -> Self {
        let mut tracker = Self {
            started_at: Instant::now(),
            states_explored: 0,
            states_generated: 1,
            max_queue_size: 1,
            max_depth_reached: 0,
            hit_state_limit: false,
            hit_time_limit: false,
            memory_samples: Vec::new(),
        };
        tracker.sample_memory();
        tracker
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn bump_explored(&mut self) {
        self.states_explored += 1;
        if self.states_explored % MEMORY_SAMPLE_INTERVAL == 0 {
            self.sample_memory();
        }
    }

    pub fn note_queue_len(&mut self, len: usize) {
        self.max_queue_size = self.max_queue_size.max(len);
    }

    pub fn note_depth(&mut self, depth: usize) {
        self.max_depth_reached = self.max_depth_reached.max(depth);
    }

    pub fn finish(mut self, solution_length: usize) -> SearchMetrics {
        self.sample_memory();
        let peak = self
            .memory_samples
            .iter()
            .copied()
            .fold(0.0f64, f64::max);
        let average = if self.memory_samples.is_empty() {
            0.0
        } else {
            self.memory_samples.iter().sum::<f64>() / self.memory_samples.len() as f64
        };
        SearchMetrics {
            elapsed_seconds: self.started_at.elapsed().as_secs_f64(),
            states_explored: self.states_explored,
            states_generated: self.states_generated,
            max_queue_size: self.max_queue_size,
            max_depth_reached: self.max_depth_reached,
            solution_length,
            peak_memory_mb: peak,
            average_memory_mb: average,
            hit_state_limit: self.hit_state_limit,
            hit_time_limit: self.hit_time_limit,
        }
    }

    fn sample_memory(&mut self) {
        if let Some(mb) = current_rss_mb() {
            self.memory_samples.push(mb);
        }
    }
}

pub fn current_rss_mb() -> Option<f64> {
    let status = fs::read_to_string("/proc/self/status").ok()?;
    let line = status.lines().find(|line| line.starts_with("VmRSS:"))?;
    let kb = line
        .split_whitespace()
        .nth(1)
        .and_then(|value| value.parse::<u64>().ok())?;
    Some(kb as f64 / 1024.0)
}

/// Renders the solution report consumed by the analysis side. The labeled
/// metric lines are a fixed scraping contract; keep them stable.
pub fn render_report(
    game_label: &str,
    algorithm_label: &str,
    initial_layout: Option<&str>,
    solution: Option<&[Move]>,
    metrics: &SearchMetrics,
) -> String {
    let mut out = String::new();

    if let Some(layout) = initial_layout {
        out.push_str(layout);
        out.push_str("\n\n");
    }

    out.push_str(&format!("Solution for Game {game_label}\n"));
    out.push_str(&"=".repeat(50));
    out.push_str("\n\n");
    out.push_str(&format!("Algorithm: {algorithm_label}\n\n"));

    out.push_str("Performance Metrics:\n");
    out.push_str(&"-".repeat(50));
    out.push('\n');
    out.push_str(&format!("Time taken: {:.2} seconds\n", metrics.elapsed_seconds));
    out.push_str(&format!("Peak memory usage: {:.2} MB\n", metrics.peak_memory_mb));
    out.push_str(&format!("Average memory: {:.2} MB\n", metrics.average_memory_mb));
    out.push_str(&format!("States explored: {}\n", metrics.states_explored));
    out.push_str(&format!("States generated: {}\n", metrics.states_generated));
    out.push_str(&format!("States per second: {:.2}\n", metrics.states_per_second()));
    out.push_str(&format!("Maximum queue size: {}\n", metrics.max_queue_size));
    out.push_str(&format!("Maximum depth reached: {}\n", metrics.max_depth_reached));
    out.push_str(&format!("Solution length: {}\n", metrics.solution_length));
    out.push('\n');

    match solution {
        Some(moves) => {
            out.push_str("Solution Moves:\n");
            out.push_str(&"-".repeat(50));
            out.push('\n');
            for (idx, mv) in moves.iter().enumerate() {
                out.push_str(&format!("Move {}: {}\n", idx + 1, mv.describe()));
            }
        }
        None => {
            out.push_str("No solution found within the exploration budget.\n");
        }
    }

    out
}
