//! Interactive terminal front end.
//!
//! One status line, rewritten in place: the clock in the interval's accent
//! colour, cycle progress, the interval name and a key legend. Keys are read
//! on a plain thread and forwarded to the driver.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use crossterm::cursor::MoveToColumn;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType};
use crossterm::{execute, queue};
use pomotimer_core::storage::UiConfig;
use pomotimer_core::{
    Completion, RenderFrame, SchedulerHost, SchedulerState, SessionScheduler,
};
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};
use tokio::time::Instant;

use crate::driver::{drive, Command, Frontend};
use crate::notify::Notifier;

const LEGEND: &str = "space:start/stop | s:skip | r:reset | q:close";

/// Restores cooked mode however the run ends.
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        disable_raw_mode().ok();
        let mut stdout = io::stdout();
        execute!(stdout, Print("\r\n")).ok();
    }
}

/// Map a colour name from the config file to a terminal colour.
pub fn parse_color(name: &str) -> Color {
    match name.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "dark_red" => Color::DarkRed,
        "green" => Color::Green,
        "dark_green" => Color::DarkGreen,
        "yellow" => Color::Yellow,
        "dark_yellow" => Color::DarkYellow,
        "blue" => Color::Blue,
        "dark_blue" => Color::DarkBlue,
        "magenta" => Color::Magenta,
        "dark_magenta" => Color::DarkMagenta,
        "cyan" => Color::Cyan,
        "dark_cyan" => Color::DarkCyan,
        "white" => Color::White,
        "grey" | "gray" => Color::Grey,
        "dark_grey" | "dark_gray" => Color::DarkGrey,
        _ => Color::Reset,
    }
}

fn key_command(code: KeyCode, modifiers: KeyModifiers) -> Option<Command> {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }
    match code {
        KeyCode::Char(' ') | KeyCode::Enter => Some(Command::Toggle),
        KeyCode::Char('s') => Some(Command::Skip),
        KeyCode::Char('r') => Some(Command::Reset),
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}

/// Poll the keyboard until the driver goes away or the user quits.
fn spawn_key_reader(tx: UnboundedSender<Command>) {
    thread::spawn(move || loop {
        match event::poll(Duration::from_millis(100)) {
            Ok(false) => {
                if tx.is_closed() {
                    return;
                }
            }
            Ok(true) => {
                let Ok(Event::Key(key)) = event::read() else {
                    continue;
                };
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(command) = key_command(key.code, key.modifiers) {
                    if tx.send(command).is_err() || command == Command::Quit {
                        return;
                    }
                }
            }
            Err(e) => {
                tracing::warn!("keyboard poll failed: {}", e);
                tx.send(Command::Quit).ok();
                return;
            }
        }
    });
}

/// Paints render frames onto a single terminal line.
pub struct TerminalHost<W: Write> {
    out: W,
    ui: UiConfig,
    notifier: Notifier,
    last: Option<RenderFrame>,
    banner: Option<(&'static str, Instant)>,
}

impl<W: Write> TerminalHost<W> {
    pub fn new(out: W, ui: UiConfig, notifier: Notifier) -> Self {
        Self {
            out,
            ui,
            notifier,
            last: None,
            banner: None,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&mut self) {
        let Some(frame) = &self.last else {
            return;
        };
        let color = parse_color(self.ui.color_for(frame.accent));
        let status = if frame.running { "running" } else { "paused" };
        let tail = match self.banner {
            Some((message, _)) => format!(" | {message}"),
            None => format!(" | {LEGEND}"),
        };

        let result = queue!(
            self.out,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            SetForegroundColor(color),
            Print(&frame.time_text),
            ResetColor,
            Print(format!(
                "  {}  {} ({}){}",
                frame.progress_text,
                frame.kind.label(),
                status,
                tail
            ))
        )
        .and_then(|()| self.out.flush());
        if let Err(e) = result {
            tracing::warn!("terminal write failed: {}", e);
        }
    }
}

impl<W: Write> SchedulerHost for TerminalHost<W> {
    fn render(&mut self, frame: &RenderFrame) {
        self.last = Some(frame.clone());
        self.paint();
    }

    fn interval_complete(&mut self, completion: &Completion) {
        if !self.notifier.enabled() {
            return;
        }
        if self.notifier.bell() {
            queue!(self.out, Print('\u{7}')).ok();
        }
        let until = Instant::now() + Duration::from_secs(self.notifier.popup_secs());
        self.banner = Some((completion.message(), until));
        self.notifier.play(completion);
    }
}

impl<W: Write> Frontend for TerminalHost<W> {
    fn command_applied(&mut self, _command: Command, state: &SchedulerState) {
        if let Some(frame) = &mut self.last {
            frame.running = state.running;
        }
        self.paint();
    }

    fn wake_at(&self) -> Option<Instant> {
        self.banner.map(|(_, until)| until)
    }

    fn wake(&mut self) {
        self.banner = None;
        self.paint();
    }
}

/// Run the interactive timer until the user closes it.
///
/// # Errors
///
/// Returns an error if the terminal cannot be switched to raw mode.
pub async fn run<W: Write>(
    scheduler: &mut SessionScheduler<TerminalHost<W>>,
) -> io::Result<()> {
    let _raw = RawMode::enable()?;
    let (tx, rx) = unbounded_channel();
    spawn_key_reader(tx);
    drive(scheduler, rx).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pomotimer_core::storage::NotificationsConfig;

    fn quiet() -> NotificationsConfig {
        NotificationsConfig {
            desktop: false,
            ..NotificationsConfig::default()
        }
    }
    use pomotimer_core::{SchedulerConfig, SessionKind};

    fn host() -> TerminalHost<Vec<u8>> {
        let notifications = NotificationsConfig {
            bell: true,
            ..quiet()
        };
        TerminalHost::new(Vec::new(), UiConfig::default(), Notifier::new(notifications))
    }

    fn output(host: TerminalHost<Vec<u8>>) -> String {
        String::from_utf8(host.into_inner()).unwrap()
    }

    #[test]
    fn keys_map_to_commands() {
        assert_eq!(
            key_command(KeyCode::Char(' '), KeyModifiers::NONE),
            Some(Command::Toggle)
        );
        assert_eq!(
            key_command(KeyCode::Char('s'), KeyModifiers::NONE),
            Some(Command::Skip)
        );
        assert_eq!(
            key_command(KeyCode::Char('r'), KeyModifiers::NONE),
            Some(Command::Reset)
        );
        assert_eq!(
            key_command(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Some(Command::Quit)
        );
        assert_eq!(key_command(KeyCode::Char('x'), KeyModifiers::NONE), None);
    }

    #[test]
    fn color_names_parse() {
        assert_eq!(parse_color("red"), Color::Red);
        assert_eq!(parse_color("Dark Blue"), Color::DarkBlue);
        assert_eq!(parse_color("dark-grey"), Color::DarkGrey);
        assert_eq!(parse_color("#123456"), Color::Reset);
    }

    #[test]
    fn render_writes_clock_progress_and_legend() {
        let mut h = host();
        h.render(&SchedulerState::default().render_frame());
        let text = output(h);
        assert!(text.contains("00:00"));
        assert!(text.contains("0/4"));
        assert!(text.contains("Work (paused)"));
        assert!(text.contains(LEGEND));
    }

    #[tokio::test]
    async fn completion_shows_banner_and_rings_bell() {
        let mut h = host();
        let next = SchedulerState::default().transition();
        h.interval_complete(&Completion {
            finished: SessionKind::Work,
            next: next.kind,
            session_count: next.session_count,
        });
        assert!(h.wake_at().is_some());
        h.render(&next.render_frame());
        let text = output(h);
        assert!(text.contains('\u{7}'));
        assert!(text.contains("Session done, take a break"));
        assert!(text.contains("Short Break"));
    }

    #[tokio::test]
    async fn wake_clears_banner() {
        let mut h = host();
        h.interval_complete(&Completion {
            finished: SessionKind::ShortBreak,
            next: SessionKind::Work,
            session_count: 1,
        });
        h.wake();
        assert!(h.wake_at().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn scheduler_drives_terminal_host() {
        let config = SchedulerConfig {
            work_minutes: 1,
            short_break_minutes: 1,
            long_break_minutes: 1,
            tick_interval_ms: 10,
        };
        let mut s = SessionScheduler::new(config, host()).unwrap();
        let (tx, rx) = unbounded_channel();
        tx.send(Command::Toggle).unwrap();
        drop(tx);
        drive(&mut s, rx).await;
        let text = output(s.into_host());
        assert!(text.contains("01:00"));
        assert!(text.contains("1/4"));
    }
}
