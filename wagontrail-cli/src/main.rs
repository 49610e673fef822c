mod script;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use log::{debug, info};
use std::io::{Write, stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use script::Directive;
use wagontrail_game::{
    ContentLoader, GameSession, GameStatus, Pulse, SimConfig, StaticContent, TickSource,
};

#[derive(Debug, Parser)]
#[command(name = "wagontrail", version)]
#[command(about = "Lead a wagon party west across the trail, one day at a time")]
struct Args {
    /// Seed for the simulation's random stream
    #[arg(long, default_value_t = 1848)]
    seed: u64,

    /// Simulation tick interval in milliseconds (overrides the config file)
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Redraw interval in milliseconds; every frame is a system tick
    #[arg(long, default_value_t = 100)]
    frame_ms: u64,

    /// JSON file overriding the default tuning
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run headless from a script file (`-` for stdin) instead of the keyboard
    #[arg(long)]
    script: Option<PathBuf>,

    /// Stop after this many pulses
    #[arg(long)]
    max_pulses: Option<u64>,

    /// No colors and no screen clearing
    #[arg(long)]
    plain: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    if args.plain {
        colored::control::set_override(false);
    }

    let config = load_config(&args)?;
    let content = StaticContent
        .load_content()
        .context("failed to load bundled content")?;
    let tick_interval = config.tick_interval();
    let mut session =
        GameSession::new(content, config, args.seed).context("failed to start session")?;
    info!("seed {} tick {:?}", args.seed, tick_interval);

    let pulses = match &args.script {
        Some(path) => {
            let directives = script::load(path)?;
            run_script(&mut session, &directives, &args)?
        }
        None => run_interactive(&mut session, &args, tick_interval).await?,
    };

    print_summary(&session, pulses);
    Ok(())
}

fn load_config(args: &Args) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            SimConfig::from_json(&json)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => SimConfig::default(),
    };
    if let Some(ms) = args.tick_ms {
        config.tick_interval_ms = ms;
        config.validate().context("invalid --tick-ms")?;
    }
    Ok(config)
}

/// Writes the top window's text whenever it changes.
struct Screen {
    plain: bool,
    clear: bool,
    last: String,
}

impl Screen {
    const fn new(plain: bool, clear: bool) -> Self {
        Self {
            plain,
            clear: clear && !plain,
            last: String::new(),
        }
    }

    fn show(&mut self, text: String) -> Result<()> {
        if text == self.last {
            return Ok(());
        }
        let mut out = stdout().lock();
        if self.clear {
            write!(out, "\x1b[2J\x1b[H")?;
        } else if !self.last.is_empty() {
            writeln!(out, "{}", "--------------------------------".dimmed())?;
        }
        let mut lines = text.lines();
        if let Some(title) = lines.next() {
            if self.plain {
                writeln!(out, "{title}")?;
            } else {
                writeln!(out, "{}", title.bright_yellow().bold())?;
            }
        }
        for line in lines {
            writeln!(out, "{line}")?;
        }
        out.flush()?;
        self.last = text;
        Ok(())
    }
}

fn budget_left(args: &Args, pulses: u64) -> bool {
    args.max_pulses.is_none_or(|max| pulses < max)
}

fn run_script(session: &mut GameSession, directives: &[Directive], args: &Args) -> Result<u64> {
    let mut screen = Screen::new(args.plain, false);
    let mut pulses = 0_u64;
    screen.show(session.screen())?;

    for directive in directives {
        if session.quit_requested() || !budget_left(args, pulses) {
            break;
        }
        debug!("script: {directive:?}");
        let (pulse, count) = match directive {
            Directive::Input(line) => {
                session
                    .send_input(line)
                    .with_context(|| format!("input {line:?} failed"))?;
                (Pulse::SYSTEM, 1)
            }
            Directive::Wait(n) => (Pulse::SIMULATION, *n),
            Directive::System(n) => (Pulse::SYSTEM, *n),
            Directive::Skip => (Pulse::FORCED_SKIP, 1),
        };
        for _ in 0..count {
            if !budget_left(args, pulses) {
                break;
            }
            session.pulse(pulse).context("pulse failed")?;
            pulses += 1;
        }
        screen.show(session.screen())?;
    }
    Ok(pulses)
}

async fn run_interactive(
    session: &mut GameSession,
    args: &Args,
    tick_interval: Duration,
) -> Result<u64> {
    let mut screen = Screen::new(args.plain, true);
    let mut ticks = TickSource::new(tick_interval);
    let mut frame = tokio::time::interval(Duration::from_millis(args.frame_ms.max(1)));
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut pulses = 0_u64;
    let mut last = Instant::now();
    screen.show(session.screen())?;
    while !session.quit_requested() && budget_left(args, pulses) {
        tokio::select! {
            _ = frame.tick() => {
                let now = Instant::now();
                let pulse = ticks.advance(now - last);
                last = now;
                session.pulse(pulse).context("pulse failed")?;
                pulses += 1;
            }
            line = rx.recv() => {
                let Some(line) = line else {
                    info!("input closed");
                    break;
                };
                session
                    .send_input(&line)
                    .with_context(|| format!("input {line:?} failed"))?;
            }
        }
        screen.show(session.screen())?;
    }
    Ok(pulses)
}

fn print_summary(session: &GameSession, pulses: u64) {
    let sim = session.simulation();
    let status = match session.status() {
        GameStatus::Running => "running".normal(),
        GameStatus::Win => "won".green().bold(),
        GameStatus::Fail => "lost".red().bold(),
    };
    println!();
    println!(
        "Session ended after {pulses} pulses and {} turns; game {status}.",
        sim.total_turns()
    );
}
