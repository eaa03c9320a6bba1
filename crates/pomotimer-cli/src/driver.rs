//! Tick driver shared by every front end.
//!
//! Owns the one-shot re-arm for the scheduler's countdown and feeds user
//! commands into it. Everything runs on one task, so the scheduler needs
//! no locking.

use std::future::pending;

use pomotimer_core::{SchedulerHost, SchedulerState, SessionScheduler, TickOutcome};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{sleep_until, Instant};

/// User commands, whatever key or line produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Toggle,
    Start,
    Stop,
    Skip,
    Reset,
    Quit,
}

impl Command {
    /// Parse a headless command line.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "toggle" | "space" => Some(Command::Toggle),
            "start" => Some(Command::Start),
            "stop" | "pause" => Some(Command::Stop),
            "skip" => Some(Command::Skip),
            "reset" => Some(Command::Reset),
            "quit" | "close" | "exit" => Some(Command::Quit),
            _ => None,
        }
    }
}

/// A scheduler host that also hears about applied commands.
pub trait Frontend: SchedulerHost {
    fn command_applied(&mut self, command: Command, state: &SchedulerState);

    /// When the front end wants a wake-up of its own (e.g. banner expiry).
    fn wake_at(&self) -> Option<Instant> {
        None
    }

    fn wake(&mut self) {}
}

fn arm(outcome: TickOutcome) -> Option<Instant> {
    match outcome {
        TickOutcome::Rearm(delay) => Some(Instant::now() + delay),
        TickOutcome::Halt => None,
    }
}

async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => pending().await,
    }
}

/// Run until `Quit`, or until the command stream closes and the timer is
/// stopped. A closed stream with a running timer lets the current interval
/// play out first.
pub async fn drive<F: Frontend>(
    scheduler: &mut SessionScheduler<F>,
    mut commands: UnboundedReceiver<Command>,
) {
    let mut rearm: Option<Instant> = None;
    let mut draining = false;

    let initial = scheduler.snapshot();
    scheduler.host_mut().render(&initial);

    loop {
        let wake = scheduler.host().wake_at();
        tokio::select! {
            _ = sleep_until_opt(rearm) => {
                rearm = arm(scheduler.tick());
                if draining && !scheduler.is_running() {
                    break;
                }
            }
            _ = sleep_until_opt(wake) => {
                scheduler.host_mut().wake();
            }
            received = commands.recv(), if !draining => {
                let Some(command) = received else {
                    tracing::debug!("command stream closed");
                    draining = true;
                    if !scheduler.is_running() {
                        break;
                    }
                    continue;
                };
                tracing::debug!(?command, "command received");
                let was_running = scheduler.is_running();
                let outcome = match command {
                    Command::Quit => break,
                    Command::Toggle => scheduler.toggle(),
                    Command::Start => scheduler.start(),
                    Command::Stop => {
                        scheduler.stop();
                        None
                    }
                    Command::Skip => {
                        scheduler.skip();
                        None
                    }
                    Command::Reset => {
                        scheduler.reset();
                        None
                    }
                };
                // A pending re-arm stays put; the scheduler decides on arrival
                // whether it resumes or halts.
                if let Some(outcome) = outcome {
                    rearm = arm(outcome);
                }
                let state = scheduler.state();
                let run_command = matches!(command, Command::Toggle | Command::Start | Command::Stop);
                if run_command && state.running == was_running {
                    continue;
                }
                scheduler.host_mut().command_applied(command, &state);
            }
        }
    }

    scheduler.stop();
}
