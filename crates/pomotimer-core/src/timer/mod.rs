mod engine;
mod schedule;

pub use engine::{
    Completion, RenderFrame, SchedulerHost, SchedulerState, SessionScheduler, TickOutcome,
};
pub use schedule::{Accent, Durations, SchedulerConfig, SessionKind};
