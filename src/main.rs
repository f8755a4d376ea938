use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use poolwatch::app::App;
use poolwatch::demo::Demo;
use poolwatch::settings::{Overrides, Settings};
use poolwatch::telemetry::{self, LogTarget};
use poolwatch::ui::{Board, Theme};
use poolwatch::{
    events, presentation_channel, ui, EventReceiver, MonitorRegistry, Orientation, ReconcileLoop,
};

/// How long the draw loop waits for input before redrawing.
const FRAME_POLL: Duration = Duration::from_millis(50);

#[derive(Parser, Debug)]
#[command(name = "poolwatch")]
#[command(about = "Live bar indicators for worker pools")]
struct Args {
    /// TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Milliseconds between updates
    #[arg(short, long)]
    interval: Option<u64>,

    /// Axis ceiling as a multiple of pool capacity (e.g. 1.5)
    #[arg(short, long)]
    scale: Option<f64>,

    /// Alert cut point as a fraction of the axis (e.g. 0.9)
    #[arg(long)]
    alert: Option<f64>,

    /// Warning cut point as a fraction of the axis (e.g. 0.8)
    #[arg(long)]
    warning: Option<f64>,

    /// Grid line spacing when no cut point is set; 0 disables
    #[arg(long)]
    grid_spacing: Option<u32>,

    /// Draw bars left to right instead of bottom to top
    #[arg(long)]
    horizontal: bool,

    /// Skip the terminal UI and log every tick
    #[arg(long)]
    headless: bool,

    /// Write logs to this file while the terminal UI is running
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Do not start the demo pools
    #[arg(long)]
    no_demo: bool,

    /// Shut the demo pools down after this many seconds
    #[arg(long, conflicts_with = "no_demo")]
    demo_seconds: Option<u64>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            interval_ms: self.interval,
            scale: self.scale,
            alert: self.alert,
            warning: self.warning,
            grid_spacing: self.grid_spacing,
            orientation: self.horizontal.then_some(Orientation::Horizontal),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::load(args.config.as_deref(), &args.overrides())?;

    let headless = args.headless || !io::stdout().is_terminal();
    let log_target = match (&args.log_file, headless) {
        (_, true) => LogTarget::Stderr,
        (Some(path), false) => LogTarget::File(path.clone()),
        (None, false) => LogTarget::Off,
    };
    telemetry::init(log_target)?;
    info!(?settings, headless, "starting");

    let rt = tokio::runtime::Runtime::new()?;
    let (events, receiver) = presentation_channel();
    let registry = MonitorRegistry::new(settings.monitor_options(), events);

    // Spawning needs the runtime context; the draw loop runs on this thread.
    let (handle, demo) = rt.block_on(async {
        let handle = ReconcileLoop::spawn(registry.clone(), settings.interval());
        let demo = if args.no_demo {
            None
        } else {
            let run_for = args.demo_seconds.map(Duration::from_secs);
            Some(Demo::start(&registry, run_for)?)
        };
        Ok::<_, anyhow::Error>((handle, demo))
    })?;

    let result = if headless {
        rt.block_on(run_headless(receiver, &settings))
    } else {
        run_tui(receiver, &settings)
    };

    handle.stop();
    if let Some(demo) = demo {
        demo.shutdown();
    }
    rt.block_on(handle.join());
    info!("stopped");

    result
}

/// Drain events into an off-screen board and log each indicator every tick.
///
/// Returns on Ctrl-C, or once the last pool has been removed.
async fn run_headless(mut receiver: EventReceiver, settings: &Settings) -> Result<()> {
    let mut board = Board::new(settings.orientation);
    let mut ticker = tokio::time::interval(settings.interval());
    let mut was_empty = true;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                receiver.drain(&mut board);
                for indicator in board.indicators() {
                    info!(caption = %indicator.caption, "{indicator}");
                }
                if board.is_empty() && !was_empty {
                    info!("no pools left");
                    break;
                }
                was_empty = board.is_empty();
            }
        }
    }
    Ok(())
}

/// Run the terminal UI until the user quits.
fn run_tui(receiver: EventReceiver, settings: &Settings) -> Result<()> {
    // Detect before raw mode; the probe talks to the terminal.
    let theme = Theme::auto_detect();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Restore the terminal if anything panics
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let mut app = App::new(receiver, settings.orientation, settings.interval());
    app.theme = theme;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while app.running {
        app.drain_events();
        terminal.draw(|frame| ui::draw(frame, app))?;

        if let Some(Event::Key(key)) = events::poll_event(FRAME_POLL)? {
            events::handle_key_event(app, key);
        }
    }
    Ok(())
}
