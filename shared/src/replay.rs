use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::models::{Candidate, Vote};

/// Votes recorded within this window of each other animate as one step.
/// Historical bulk inserts land tens of milliseconds apart, and replaying
/// them staggered would misrepresent what was a single event.
pub const CLUSTER_EPSILON_MS: i64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplaySpeed {
    Slow,
    Normal,
    Fast,
}

impl ReplaySpeed {
    /// Total wall-clock duration of a full replay at this speed.
    pub const fn duration_ms(self) -> f64 {
        match self {
            ReplaySpeed::Slow => 40_000.0,
            ReplaySpeed::Normal => 20_000.0,
            ReplaySpeed::Fast => 10_000.0,
        }
    }
}

/// One bar of the animated chart at the current progress. `count` carries the
/// fractional mid-cluster value for bar height; `display_count` is the floor
/// shown as the label.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub candidate: Candidate,
    pub count: f64,
    pub display_count: u64,
}

// Tie order for identical timestamps: abstentions surface first, then the
// incumbent front-runner, then the rest by name. Kept from the historical
// data's observable replay order.
fn tie_rank(candidate: Candidate) -> u8 {
    match candidate {
        Candidate::Abstained => 0,
        Candidate::BrittanyAngel => 1,
        _ => 2,
    }
}

/// Scrubber-controlled replay of how the tallies accumulated.
///
/// Progress runs over `0.0..=cluster_count`: the integer part counts fully
/// resolved clusters, the fraction contributes proportionally to every vote
/// in the cluster currently animating. The drive loop is delta-time
/// integrated off caller-supplied instants, so playback speed is independent
/// of tick rate and tests can feed synthetic clocks.
#[derive(Debug, Clone)]
pub struct Replay {
    clusters: Vec<Vec<Candidate>>,
    total_votes: usize,
    progress: f64,
    playing: bool,
    speed: ReplaySpeed,
    last_tick_ms: Option<f64>,
}

impl Replay {
    /// Sorts chronologically (ties broken by the fixed candidate priority,
    /// then voter name, then id, so any input permutation replays
    /// identically) and chains votes closer than [`CLUSTER_EPSILON_MS`] into
    /// simultaneous clusters.
    pub fn new(votes: &[Vote]) -> Self {
        let mut ordered: Vec<&Vote> = votes.iter().collect();
        ordered.sort_by(|a, b| {
            a.timestamp_ms
                .cmp(&b.timestamp_ms)
                .then_with(|| tie_rank(a.candidate).cmp(&tie_rank(b.candidate)))
                .then_with(|| a.candidate.as_str().cmp(b.candidate.as_str()))
                .then_with(|| a.voter_name.cmp(&b.voter_name))
                .then_with(|| a.id.cmp(&b.id))
        });

        let mut clusters: Vec<Vec<Candidate>> = Vec::new();
        for pair in 0..ordered.len() {
            let vote = ordered[pair];
            let simultaneous = pair > 0
                && vote.timestamp_ms - ordered[pair - 1].timestamp_ms < CLUSTER_EPSILON_MS;
            if simultaneous {
                if let Some(current) = clusters.last_mut() {
                    current.push(vote.candidate);
                    continue;
                }
            }
            clusters.push(vec![vote.candidate]);
        }

        Self {
            clusters,
            total_votes: votes.len(),
            progress: 0.0,
            playing: false,
            speed: ReplaySpeed::Normal,
            last_tick_ms: None,
        }
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    pub fn total_votes(&self) -> usize {
        self.total_votes
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn speed(&self) -> ReplaySpeed {
        self.speed
    }

    /// Changes the playback rate in place; progress and playback state are
    /// untouched.
    pub fn set_speed(&mut self, speed: ReplaySpeed) {
        self.speed = speed;
    }

    /// Starts playback. Restarting from the end rewinds to zero first.
    pub fn play(&mut self) {
        if self.clusters.is_empty() {
            return;
        }
        if self.progress >= self.clusters.len() as f64 {
            self.progress = 0.0;
        }
        self.playing = true;
        self.last_tick_ms = None;
    }

    pub fn pause(&mut self) {
        self.playing = false;
        self.last_tick_ms = None;
    }

    pub fn reset(&mut self) {
        self.playing = false;
        self.last_tick_ms = None;
        self.progress = 0.0;
    }

    /// Jumps straight to a progress value, clamped to the valid range.
    /// Scrubbing always stops autoplay.
    pub fn scrub(&mut self, progress: f64) {
        self.playing = false;
        self.last_tick_ms = None;
        let max = self.clusters.len() as f64;
        self.progress = if progress.is_finite() {
            progress.clamp(0.0, max)
        } else {
            0.0
        };
    }

    /// Advances playback to `now_ms`. The first tick after `play` only
    /// records the instant; each subsequent tick integrates
    /// `cluster_count * delta / duration`. Reaching the end clamps and stops.
    pub fn tick(&mut self, now_ms: f64) {
        if !self.playing {
            return;
        }
        let Some(last) = self.last_tick_ms else {
            self.last_tick_ms = Some(now_ms);
            return;
        };
        let delta = (now_ms - last).max(0.0);
        self.last_tick_ms = Some(now_ms);

        let max = self.clusters.len() as f64;
        self.progress += max * delta / self.speed.duration_ms();
        if self.progress >= max {
            self.progress = max;
            self.playing = false;
            self.last_tick_ms = None;
        }
    }

    /// Re-derives the per-candidate standings for the current progress:
    /// every fully resolved cluster contributes whole votes, the in-progress
    /// cluster contributes its fraction. Sorted by running count descending,
    /// alphabetical on ties, so the ranking reshuffles live during playback.
    /// An empty vote list yields an empty frame.
    pub fn frame(&self) -> Vec<Standing> {
        if self.total_votes == 0 {
            return Vec::new();
        }

        let mut counts = [0.0f64; Candidate::BALLOT.len()];
        let index_of = |candidate: Candidate| {
            Candidate::BALLOT
                .iter()
                .position(|&c| c == candidate)
                .unwrap_or(0)
        };

        let whole = (self.progress.floor() as usize).min(self.clusters.len());
        let fraction = self.progress - self.progress.floor();

        for cluster in &self.clusters[..whole] {
            for &candidate in cluster {
                counts[index_of(candidate)] += 1.0;
            }
        }
        if fraction > 0.0 {
            if let Some(cluster) = self.clusters.get(whole) {
                for &candidate in cluster {
                    counts[index_of(candidate)] += fraction;
                }
            }
        }

        let mut standings: Vec<Standing> = Candidate::BALLOT
            .iter()
            .map(|&candidate| {
                let count = counts[index_of(candidate)];
                Standing {
                    candidate,
                    count,
                    display_count: count.floor() as u64,
                }
            })
            .collect();
        standings.sort_by(|a, b| {
            b.count
                .partial_cmp(&a.count)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.candidate.as_str().cmp(b.candidate.as_str()))
        });
        standings
    }
}
