//! Frame cursor for the phase-portrait animation.
//!
//! Playback is driven by a timer model: the frontend reports elapsed wall
//! time through [`AnimationState::advance`] and the cursor moves one frame per
//! elapsed interval, wrapping to frame 0 after the last sample.

use std::time::Duration;

use lv_core::TimeSeries;

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(50);
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationState {
    frame: usize,
    frame_count: usize,
    playing: bool,
    interval: Duration,
    pending: Duration,
}

/// What the animation shows at the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameView<'a> {
    pub trail_x: &'a [f64],
    pub trail_y: &'a [f64],
    pub t: f64,
    pub prey: f64,
    pub predators: f64,
}

impl FrameView<'_> {
    pub fn readout(&self) -> String {
        format!(
            "Time: {:.1}\nPrey: {:.1}\nPredators: {:.1}",
            self.t, self.prey, self.predators
        )
    }
}

impl AnimationState {
    pub fn new(frame_count: usize, interval: Duration) -> Self {
        Self {
            frame: 0,
            frame_count,
            playing: false,
            interval: interval.max(MIN_INTERVAL),
            pending: Duration::ZERO,
        }
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn play(&mut self) {
        if self.frame_count == 0 || self.playing {
            return;
        }
        self.playing = true;
        self.pending = Duration::ZERO;
    }

    pub fn pause(&mut self) {
        self.playing = false;
        self.pending = Duration::ZERO;
    }

    /// Pause and rewind to frame 0.
    pub fn reset(&mut self) {
        self.pause();
        self.frame = 0;
    }

    /// Change the tick interval. A running timer restarts with the new
    /// interval; the current frame is kept.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval.max(MIN_INTERVAL);
        if self.playing {
            self.pause();
            self.play();
        }
    }

    /// Interval from user text in milliseconds. Returns false and leaves the
    /// interval untouched when the text is not a positive integer.
    pub fn set_interval_text(&mut self, text: &str) -> bool {
        match text.trim().parse::<u64>() {
            Ok(ms) if ms > 0 => {
                self.set_interval(Duration::from_millis(ms));
                true
            }
            _ => false,
        }
    }

    /// One timer tick.
    pub fn step(&mut self) {
        if self.frame_count == 0 {
            return;
        }
        self.frame = (self.frame + 1) % self.frame_count;
    }

    /// Feed elapsed wall time; returns the number of ticks that fired.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        if !self.playing {
            return 0;
        }
        self.pending += elapsed;
        let mut ticks = 0;
        while self.pending >= self.interval {
            self.pending -= self.interval;
            self.step();
            ticks += 1;
        }
        ticks
    }

    /// Time until the next tick, for scheduling repaints.
    pub fn until_next_tick(&self) -> Option<Duration> {
        self.playing
            .then(|| self.interval.saturating_sub(self.pending))
    }

    pub fn view<'a>(&self, series: &'a TimeSeries) -> Option<FrameView<'a>> {
        let frame = self.frame.min(series.len().checked_sub(1)?);
        let (t, prey, predators) = series.sample(frame)?;
        Some(FrameView {
            trail_x: &series.x()[..=frame],
            trail_y: &series.y()[..=frame],
            t,
            prey,
            predators,
        })
    }
}
