//! Headless front end: commands in on stdin, JSON events out on stdout.

use std::io::Write;

use pomotimer_core::{Completion, Event, RenderFrame, SchedulerHost, SchedulerState, SessionScheduler};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

use crate::driver::{drive, Command, Frontend};
use crate::notify::Notifier;

/// Writes one JSON event per line.
pub struct JsonHost<W: Write> {
    out: W,
    notifier: Notifier,
}

impl<W: Write> JsonHost<W> {
    pub fn new(out: W, notifier: Notifier) -> Self {
        Self { out, notifier }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, event: &Event) {
        let result = serde_json::to_string(event)
            .map_err(std::io::Error::other)
            .and_then(|line| writeln!(self.out, "{line}"))
            .and_then(|()| self.out.flush());
        if let Err(e) = result {
            tracing::warn!("failed to write event: {}", e);
        }
    }
}

impl<W: Write> SchedulerHost for JsonHost<W> {
    fn render(&mut self, frame: &RenderFrame) {
        self.emit(&Event::rendered(frame));
    }

    fn interval_complete(&mut self, completion: &Completion) {
        self.emit(&Event::completed(completion));
        self.notifier.play(completion);
    }
}

impl<W: Write> Frontend for JsonHost<W> {
    fn command_applied(&mut self, command: Command, state: &SchedulerState) {
        let event = match command {
            Command::Skip => Event::skipped(state),
            Command::Reset => Event::reset(state),
            Command::Quit => return,
            Command::Toggle | Command::Start if state.running => Event::started(state),
            Command::Toggle | Command::Stop if !state.running => Event::stopped(state),
            // Start on a stopped state or Stop on a running one: nothing to report.
            Command::Toggle | Command::Start | Command::Stop => return,
        };
        self.emit(&event);
    }
}

fn spawn_stdin_reader(tx: UnboundedSender<Command>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => match Command::parse(&line) {
                    Some(command) => {
                        if tx.send(command).is_err() {
                            return;
                        }
                    }
                    None => tracing::warn!("unknown command: {}", line.trim()),
                },
                Ok(None) => return,
                Err(e) => {
                    tracing::warn!("stdin read failed: {}", e);
                    return;
                }
            }
        }
    });
}

/// Run from stdin until `quit`, or until stdin ends and the timer stops.
pub async fn run<W: Write>(scheduler: &mut SessionScheduler<JsonHost<W>>) {
    let (tx, rx) = unbounded_channel();
    spawn_stdin_reader(tx);
    drive(scheduler, rx).await;
}
