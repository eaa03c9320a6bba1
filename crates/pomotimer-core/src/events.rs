use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Accent, Completion, RenderFrame, SchedulerState, SessionKind};

/// Every observable change in the timer, as a front end would report it.
/// Headless front ends stream these as JSON lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        kind: SessionKind,
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    TimerStopped {
        kind: SessionKind,
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    TimerSkipped {
        to: SessionKind,
        session_count: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        kind: SessionKind,
        at: DateTime<Utc>,
    },
    Rendered {
        time_text: String,
        progress_text: String,
        accent: Accent,
        kind: SessionKind,
        at: DateTime<Utc>,
    },
    IntervalCompleted {
        finished: SessionKind,
        next: SessionKind,
        session_count: u32,
        message: String,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn started(state: &SchedulerState) -> Self {
        Event::TimerStarted {
            kind: state.kind,
            elapsed_secs: state.elapsed_secs,
            at: Utc::now(),
        }
    }

    pub fn stopped(state: &SchedulerState) -> Self {
        Event::TimerStopped {
            kind: state.kind,
            elapsed_secs: state.elapsed_secs,
            at: Utc::now(),
        }
    }

    pub fn skipped(state: &SchedulerState) -> Self {
        Event::TimerSkipped {
            to: state.kind,
            session_count: state.session_count,
            at: Utc::now(),
        }
    }

    pub fn reset(state: &SchedulerState) -> Self {
        Event::TimerReset {
            kind: state.kind,
            at: Utc::now(),
        }
    }

    pub fn rendered(frame: &RenderFrame) -> Self {
        Event::Rendered {
            time_text: frame.time_text.clone(),
            progress_text: frame.progress_text.clone(),
            accent: frame.accent,
            kind: frame.kind,
            at: Utc::now(),
        }
    }

    pub fn completed(completion: &Completion) -> Self {
        Event::IntervalCompleted {
            finished: completion.finished,
            next: completion.next,
            session_count: completion.session_count,
            message: completion.message().to_string(),
            at: Utc::now(),
        }
    }
}
