//! Session scheduler implementation.
//!
//! The scheduler is a tick-driven state machine. It owns no timer of its
//! own: every `tick()` tells the driver whether to arm exactly one more
//! delayed tick, and the driver (terminal loop, GUI timer, test harness)
//! decides how to wait.
//!
//! ## State Transitions
//!
//! ```text
//! Work --(complete|skip)--> ShortBreak | LongBreak --(complete|skip)--> Work
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut scheduler = SessionScheduler::new(config, host)?;
//! let mut next = scheduler.start();
//! while let Some(TickOutcome::Rearm(delay)) = next {
//!     sleep(delay);
//!     next = Some(scheduler.tick());
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use super::schedule::{Accent, Durations, SchedulerConfig, SessionKind};
use crate::error::ConfigError;
use crate::format::{format_clock, format_progress, CYCLE_LEN};

/// What the driver must do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Arm one more tick after the given delay.
    Rearm(Duration),
    /// Chain ended: the timer was stopped or the interval completed.
    Halt,
}

/// Render hints for the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub time_text: String,
    pub progress_text: String,
    pub accent: Accent,
    pub kind: SessionKind,
    pub running: bool,
}

/// Passed to the host when an interval runs to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub finished: SessionKind,
    pub next: SessionKind,
    pub session_count: u32,
}

impl Completion {
    pub fn next_is_work(&self) -> bool {
        self.next == SessionKind::Work
    }

    pub fn message(&self) -> &'static str {
        if self.next_is_work() {
            "Break over, start session"
        } else {
            "Session done, take a break"
        }
    }
}

/// Capabilities the scheduler needs from whoever displays it.
///
/// `interval_complete` is fire-and-forget: the scheduler moves on to the
/// next interval as soon as it returns, so hosts that play sounds or show
/// popups must hand that work off rather than block here.
pub trait SchedulerHost {
    fn render(&mut self, frame: &RenderFrame);
    fn interval_complete(&mut self, completion: &Completion);
}

/// Snapshot of scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerState {
    /// Seconds elapsed in the current interval, `0..=limit + 1`.
    pub elapsed_secs: u64,
    pub running: bool,
    pub kind: SessionKind,
    /// Completed work intervals.
    pub session_count: u32,
}

impl Default for SchedulerState {
    fn default() -> Self {
        Self {
            elapsed_secs: 0,
            running: false,
            kind: SessionKind::Work,
            session_count: 0,
        }
    }
}

impl SchedulerState {
    /// The state after the current interval ends, stopped and zeroed.
    ///
    /// Leaving work bumps `session_count` first and picks the long break on
    /// every fourth session; leaving any break returns to work.
    pub fn transition(self) -> Self {
        let (kind, session_count) = match self.kind {
            SessionKind::Work => {
                let count = self.session_count.saturating_add(1);
                let next = if count % CYCLE_LEN == 0 {
                    SessionKind::LongBreak
                } else {
                    SessionKind::ShortBreak
                };
                (next, count)
            }
            SessionKind::ShortBreak | SessionKind::LongBreak => {
                (SessionKind::Work, self.session_count)
            }
        };
        Self {
            elapsed_secs: 0,
            running: false,
            kind,
            session_count,
        }
    }

    pub fn render_frame(&self) -> RenderFrame {
        RenderFrame {
            time_text: format_clock(self.elapsed_secs),
            progress_text: format_progress(self.session_count),
            accent: self.kind.accent(),
            kind: self.kind,
            running: self.running,
        }
    }
}

/// Work/short-break/long-break rotation driven by an external tick source.
#[derive(Debug)]
pub struct SessionScheduler<H> {
    durations: Durations,
    tick_interval: Duration,
    state: SchedulerState,
    /// A re-arm returned by `tick()` has not been consumed yet.
    chain_armed: bool,
    host: H,
}

impl<H: SchedulerHost> SessionScheduler<H> {
    /// Build a stopped scheduler at the start of a work interval.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDuration`] if any duration or the tick
    /// period is zero. No partially initialised scheduler is ever returned.
    pub fn new(config: SchedulerConfig, host: H) -> Result<Self, ConfigError> {
        let durations = config.durations()?;
        debug!(
            work_secs = durations.work_secs,
            short_break_secs = durations.short_break_secs,
            long_break_secs = durations.long_break_secs,
            tick_interval_ms = config.tick_interval_ms,
            "scheduler created"
        );
        Ok(Self {
            durations,
            tick_interval: config.tick_interval(),
            state: SchedulerState::default(),
            chain_armed: false,
            host,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.state.elapsed_secs
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn kind(&self) -> SessionKind {
        self.state.kind
    }

    pub fn session_count(&self) -> u32 {
        self.state.session_count
    }

    pub fn durations(&self) -> Durations {
        self.durations
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Current display, without advancing anything.
    pub fn snapshot(&self) -> RenderFrame {
        self.state.render_frame()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start or resume the countdown.
    ///
    /// Returns the outcome of the first tick when a new chain begins. Returns
    /// `None` when already running, or when a re-arm from an earlier chain is
    /// still pending; that re-arm picks the countdown back up when it fires.
    pub fn start(&mut self) -> Option<TickOutcome> {
        if self.state.running {
            return None;
        }
        self.state.running = true;
        debug!(
            kind = ?self.state.kind,
            elapsed_secs = self.state.elapsed_secs,
            "timer started"
        );
        if self.chain_armed {
            return None;
        }
        Some(self.tick())
    }

    /// Pause. Elapsed time is kept.
    pub fn stop(&mut self) {
        if !self.state.running {
            return;
        }
        self.state.running = false;
        debug!(
            kind = ?self.state.kind,
            elapsed_secs = self.state.elapsed_secs,
            "timer stopped"
        );
    }

    /// Start when stopped, stop when running.
    pub fn toggle(&mut self) -> Option<TickOutcome> {
        if self.state.running {
            self.stop();
            None
        } else {
            self.start()
        }
    }

    /// End the current interval without the completion notification.
    pub fn skip(&mut self) {
        let from = self.state.kind;
        self.state = self.state.transition();
        debug!(
            from = ?from,
            to = ?self.state.kind,
            session_count = self.state.session_count,
            "interval skipped"
        );
        self.host.render(&self.state.render_frame());
    }

    /// Stop and rewind the current interval. Kind and session count are kept.
    pub fn reset(&mut self) {
        self.state.running = false;
        self.state.elapsed_secs = 0;
        debug!(kind = ?self.state.kind, "timer reset");
        self.host.render(&self.state.render_frame());
    }

    /// Advance the countdown by one tick.
    ///
    /// Renders and counts up while `elapsed_secs <= limit`; the tick after
    /// that (`limit + 1`) is the grace tick that completes the interval.
    /// A tick that arrives while stopped halts the chain untouched.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.running {
            self.chain_armed = false;
            return TickOutcome::Halt;
        }

        let limit = self.durations.duration(self.state.kind);
        if self.state.elapsed_secs <= limit {
            self.host.render(&self.state.render_frame());
            self.state.elapsed_secs += 1;
            self.chain_armed = true;
            return TickOutcome::Rearm(self.tick_interval);
        }

        self.complete();
        TickOutcome::Halt
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self) {
        self.chain_armed = false;
        let finished = self.state.kind;
        let next = self.state.transition();
        let completion = Completion {
            finished,
            next: next.kind,
            session_count: next.session_count,
        };
        info!(
            finished = ?finished,
            next = ?next.kind,
            session_count = next.session_count,
            "interval complete"
        );
        self.state.running = false;
        self.state.elapsed_secs = 0;
        self.host.interval_complete(&completion);
        self.state = next;
        self.host.render(&self.state.render_frame());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Recorder {
        frames: Vec<RenderFrame>,
        completions: Vec<Completion>,
    }

    impl SchedulerHost for Recorder {
        fn render(&mut self, frame: &RenderFrame) {
            self.frames.push(frame.clone());
        }

        fn interval_complete(&mut self, completion: &Completion) {
            self.completions.push(*completion);
        }
    }

    fn one_minute() -> SessionScheduler<Recorder> {
        let config = SchedulerConfig {
            work_minutes: 1,
            short_break_minutes: 1,
            long_break_minutes: 1,
            tick_interval_ms: 1,
        };
        SessionScheduler::new(config, Recorder::default()).unwrap()
    }

    #[test]
    fn new_scheduler_is_idle_work() {
        let s = one_minute();
        assert_eq!(s.state(), SchedulerState::default());
        assert_eq!(s.kind(), SessionKind::Work);
        assert!(!s.is_running());
        assert_eq!(s.snapshot().time_text, "00:00");
        assert_eq!(s.snapshot().progress_text, "0/4");
    }

    #[test]
    fn invalid_config_fails_at_construction() {
        let config = SchedulerConfig {
            work_minutes: 0,
            ..SchedulerConfig::default()
        };
        let err = SessionScheduler::new(config, Recorder::default()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidDuration {
                field: "work_minutes",
                ..
            }
        ));
    }

    #[test]
    fn start_runs_first_tick_inline() {
        let mut s = one_minute();
        assert_eq!(
            s.start(),
            Some(TickOutcome::Rearm(Duration::from_millis(1)))
        );
        assert!(s.is_running());
        assert_eq!(s.elapsed_secs(), 1);
        assert_eq!(s.host().frames.len(), 1);
        assert_eq!(s.host().frames[0].time_text, "00:00");
    }

    #[test]
    fn second_start_is_noop() {
        let mut s = one_minute();
        s.start();
        assert_eq!(s.start(), None);
        assert_eq!(s.elapsed_secs(), 1);
        assert_eq!(s.host().frames.len(), 1);
    }

    #[test]
    fn stop_preserves_elapsed_and_halts_pending_tick() {
        let mut s = one_minute();
        s.start();
        s.tick();
        s.stop();
        assert_eq!(s.tick(), TickOutcome::Halt);
        assert_eq!(s.tick(), TickOutcome::Halt);
        assert_eq!(s.elapsed_secs(), 2);
        assert!(!s.is_running());
    }

    #[test]
    fn restart_before_pending_tick_reuses_chain() {
        let mut s = one_minute();
        s.start();
        s.stop();
        // The earlier re-arm has not fired yet, so no second chain begins.
        assert_eq!(s.start(), None);
        assert_eq!(s.tick(), TickOutcome::Rearm(Duration::from_millis(1)));
        assert_eq!(s.elapsed_secs(), 2);
    }

    #[test]
    fn restart_after_halt_begins_new_chain() {
        let mut s = one_minute();
        s.start();
        s.stop();
        assert_eq!(s.tick(), TickOutcome::Halt);
        assert!(matches!(s.start(), Some(TickOutcome::Rearm(_))));
        assert_eq!(s.elapsed_secs(), 2);
    }

    #[test]
    fn toggle_flips_running() {
        let mut s = one_minute();
        assert!(s.toggle().is_some());
        assert!(s.is_running());
        assert!(s.toggle().is_none());
        assert!(!s.is_running());
    }

    #[test]
    fn grace_tick_completes_work() {
        let mut s = one_minute();
        s.start();
        for _ in 0..60 {
            assert!(matches!(s.tick(), TickOutcome::Rearm(_)));
        }
        assert_eq!(s.elapsed_secs(), 61);
        assert_eq!(s.host().frames.last().unwrap().time_text, "01:00");

        assert_eq!(s.tick(), TickOutcome::Halt);
        assert_eq!(s.kind(), SessionKind::ShortBreak);
        assert_eq!(s.session_count(), 1);
        assert_eq!(s.elapsed_secs(), 0);
        assert!(!s.is_running());

        let completions = &s.host().completions;
        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].finished, SessionKind::Work);
        assert!(!completions[0].next_is_work());
        assert_eq!(completions[0].message(), "Session done, take a break");

        let last = s.host().frames.last().unwrap();
        assert_eq!(last.time_text, "00:00");
        assert_eq!(last.accent, Accent::Calm);
        assert_eq!(last.progress_text, "1/4");
    }

    #[test]
    fn skip_transitions_without_notification() {
        let mut s = one_minute();
        s.start();
        s.tick();
        s.skip();
        assert!(!s.is_running());
        assert_eq!(s.elapsed_secs(), 0);
        assert_eq!(s.kind(), SessionKind::ShortBreak);
        assert_eq!(s.session_count(), 1);
        assert!(s.host().completions.is_empty());
        assert_eq!(s.host().frames.last().unwrap().accent, Accent::Calm);
    }

    #[test]
    fn skip_from_break_keeps_count() {
        let mut s = one_minute();
        s.skip();
        s.skip();
        assert_eq!(s.kind(), SessionKind::Work);
        assert_eq!(s.session_count(), 1);
    }

    #[test]
    fn reset_keeps_kind_and_count() {
        let mut s = one_minute();
        s.skip();
        s.start();
        s.tick();
        s.tick();
        s.reset();
        assert_eq!(s.elapsed_secs(), 0);
        assert!(!s.is_running());
        assert_eq!(s.kind(), SessionKind::ShortBreak);
        assert_eq!(s.session_count(), 1);
        assert_eq!(s.tick(), TickOutcome::Halt);
    }

    #[test]
    fn transition_rule_cycles_to_long_break() {
        let mut state = SchedulerState::default();
        let mut breaks = Vec::new();
        for _ in 0..4 {
            state = state.transition();
            breaks.push(state.kind);
            state = state.transition();
            assert_eq!(state.kind, SessionKind::Work);
        }
        assert_eq!(
            breaks,
            vec![
                SessionKind::ShortBreak,
                SessionKind::ShortBreak,
                SessionKind::ShortBreak,
                SessionKind::LongBreak
            ]
        );
        assert_eq!(state.session_count, 4);
    }

    #[test]
    fn completion_message_after_break() {
        let c = Completion {
            finished: SessionKind::LongBreak,
            next: SessionKind::Work,
            session_count: 4,
        };
        assert!(c.next_is_work());
        assert_eq!(c.message(), "Break over, start session");
    }
}
