use std::io::Write as _;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser as _;
use cobalt::co::Ownership;
use cobalt::host::{LocalTimer, StatusSink, StatusTarget, Timer, block_local};
use cobalt::pre::*;
use cobalt::status::{self, StatusLoopBuilder, TerminationFlag};

/// Animate a busy status line in the terminal
#[derive(clap::Parser)]
struct Cli {
    /// Message displayed in front of the dots
    #[clap(short, long, default_value = "Working")]
    message: String,
    /// Stop after this many seconds. Without it, run until Ctrl-C
    #[clap(short, long)]
    seconds: Option<f64>,
    /// Time each frame is displayed, in milliseconds
    #[clap(short, long)]
    period_ms: Option<u64>,
    /// Let the loop keep itself alive instead of being owned by main
    #[clap(long)]
    strong: bool,
    /// Show debug logs
    #[clap(short, long)]
    verbose: bool,
}

/// Renders on the current terminal line
struct TerminalLine;
impl StatusSink for TerminalLine {
    fn render_status(&self, _: &StatusTarget, text: &str) -> cobalt::Result<()> {
        let mut stdout = std::io::stdout().lock();
        cobalt::check!(write!(stdout, "\r\x1b[2K{text}"), "failed to write status line")?;
        cobalt::check!(stdout.flush(), "failed to flush stdout")
    }
}

fn main() -> cobalt::Result<()> {
    let args = Cli::parse();
    cobalt::log_init(if args.verbose { "debug" } else { "warn" });

    let mut config = cobalt::StatusConfig::from_env()?;
    config.frames = status::busy_frames(&args.message);
    if let Some(period_ms) = args.period_ms {
        config.period_ms = period_ms;
    }
    if args.strong {
        config.ownership = Ownership::Strong;
    }
    let timeout = match args.seconds {
        Some(seconds) => Some(cobalt::check!(
            Duration::try_from_secs_f64(seconds),
            "invalid --seconds: {seconds}"
        )?),
        None => None,
    };

    let flag = TerminationFlag::new();
    let signal = flag.signal();
    cobalt::check!(
        ctrlc::try_set_handler(move || signal.stop()),
        "failed to set ctrl-c handler"
    )?;
    {
        let message = args.message.clone();
        flag.on_finalize(move || {
            let mut stdout = std::io::stdout().lock();
            cobalt::check!(
                writeln!(stdout, "\r\x1b[2K{message}... done"),
                "failed to write status line"
            )
        });
    }

    let status = block_local(async move {
        let timer = Rc::new(LocalTimer::new());
        let status = StatusLoopBuilder::from_config(&config).start(
            &flag,
            timer.clone(),
            Rc::new(TerminalLine),
        )?;
        log::debug!("started {status:?}");
        if let Some(timeout) = timeout {
            let flag = flag.clone();
            timer.schedule_after(
                timeout,
                Box::new(move || {
                    flag.stop();
                    Ok(())
                }),
            );
        }
        cobalt::Ok(status)
    })??;

    log::debug!("finished {status:?}");
    Ok(())
}
