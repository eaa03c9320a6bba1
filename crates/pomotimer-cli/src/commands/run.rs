use clap::Args;
use pomotimer_core::{Config, SchedulerConfig, SessionScheduler};

use crate::notify::Notifier;
use crate::{headless, terminal};

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Work interval in minutes [default: from config, 25]
    pub work: Option<u64>,
    /// Short break in minutes [default: from config, 5]
    pub short_break: Option<u64>,
    /// Long break in minutes [default: from config, 15]
    pub long_break: Option<u64>,
    /// Tick period in milliseconds (shorten to fast-forward)
    #[arg(long, env = "POMOTIMER_TICK_MS")]
    pub tick_ms: Option<u64>,
    /// Read commands from stdin and print JSON events instead of the
    /// interactive display
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    /// Command-line values win over the config file.
    pub fn apply(&self, base: SchedulerConfig) -> SchedulerConfig {
        SchedulerConfig {
            work_minutes: self.work.unwrap_or(base.work_minutes),
            short_break_minutes: self.short_break.unwrap_or(base.short_break_minutes),
            long_break_minutes: self.long_break.unwrap_or(base.long_break_minutes),
            tick_interval_ms: self.tick_ms.unwrap_or(base.tick_interval_ms),
        }
    }
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let scheduler_config = args.apply(config.scheduler_config());
    scheduler_config.validate()?;
    tracing::info!(
        work_minutes = scheduler_config.work_minutes,
        short_break_minutes = scheduler_config.short_break_minutes,
        long_break_minutes = scheduler_config.long_break_minutes,
        tick_interval_ms = scheduler_config.tick_interval_ms,
        json = args.json,
        "starting timer"
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let notifier = Notifier::new(config.notifications.clone());

    let result = if args.json {
        let host = headless::JsonHost::new(std::io::stdout(), notifier);
        let mut scheduler = SessionScheduler::new(scheduler_config, host)?;
        runtime.block_on(headless::run(&mut scheduler));
        Ok(())
    } else {
        let host = terminal::TerminalHost::new(std::io::stdout(), config.ui.clone(), notifier);
        let mut scheduler = SessionScheduler::new(scheduler_config, host)?;
        runtime.block_on(terminal::run(&mut scheduler))
    };
    // A pending stdin read cannot be cancelled; don't wait on it.
    runtime.shutdown_background();
    Ok(result?)
}
