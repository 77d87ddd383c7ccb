//! Blitz Napoleonic CLI
//!
//! Runs self-play campaigns in the terminal. While a game runs, type on stdin:
//! `p` to pause or resume, `r` to restart, `white <strategy>` or
//! `black <strategy>` to change a commander, `q` to quit. Once the series is
//! over, `r` starts another game and `q` prints the report and exits.

use anyhow::{Context, Result};
use blitz_core::{GameState, Side};
use campaign::{render_hud, Campaign, CampaignConfig, CampaignHandle, Strategy};
use clap::{Parser, ValueEnum};
use oracle_engine::{Advisor, GeminiAdvisor, OfflineAdvisor};
use std::io::{BufRead, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "blitz")]
#[command(about = "Self-playing Napoleonic chess campaign", long_about = None)]
struct Args {
    /// TOML config file; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Strategy of the French (moves first)
    #[arg(long, value_enum)]
    white: Option<Strategy>,

    /// Strategy of the British
    #[arg(long, value_enum)]
    black: Option<Strategy>,

    /// Number of consecutive games
    #[arg(short, long, default_value = "1")]
    games: u32,

    /// Pause between half-moves in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// How long to wait for remote advice in milliseconds
    #[arg(long)]
    advice_timeout_ms: Option<u64>,

    /// Request commentary every N half-moves (0 disables it)
    #[arg(long)]
    commentary_every: Option<usize>,

    /// Seed for the local policy
    #[arg(long)]
    seed: Option<u64>,

    /// Declare a draw after this many half-moves
    #[arg(long)]
    max_half_moves: Option<usize>,

    /// Swap strategies between sides every other game
    #[arg(long)]
    alternate: bool,

    /// Start from a FEN-style piece placement, e.g. "4k3/8/8/8/8/8/8/R3K3"
    #[arg(long)]
    position: Option<String>,

    /// Side to move in --position (white or black)
    #[arg(long, default_value = "white", value_parser = parse_side)]
    turn: Side,

    /// Never contact the remote advisor
    #[arg(long)]
    offline: bool,

    /// Only print the final report
    #[arg(short, long)]
    quiet: bool,

    /// Save the series report as JSON
    #[arg(long)]
    report: Option<PathBuf>,
}

impl Args {
    fn apply(&self, config: &mut CampaignConfig) {
        if let Some(white) = self.white {
            config.white = white;
        }
        if let Some(black) = self.black {
            config.black = black;
        }
        if let Some(ms) = self.delay_ms {
            config.move_delay_ms = ms;
        }
        if let Some(ms) = self.advice_timeout_ms {
            config.advice_timeout_ms = ms;
        }
        if let Some(every) = self.commentary_every {
            config.commentary_every = every;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.max_half_moves.is_some() {
            config.max_half_moves = self.max_half_moves;
        }
        if self.alternate {
            config.alternate_sides = true;
        }
    }
}

fn parse_side(s: &str) -> Result<Side, String> {
    match s.to_lowercase().as_str() {
        "white" | "w" | "french" => Ok(Side::White),
        "black" | "b" | "british" => Ok(Side::Black),
        _ => Err(format!("unknown side '{s}' (expected white or black)")),
    }
}

fn build_advisor(config: &CampaignConfig, offline: bool) -> Arc<dyn Advisor> {
    if offline {
        return Arc::new(OfflineAdvisor);
    }
    match GeminiAdvisor::new(config.advisor.clone().resolve_api_key()) {
        Ok(advisor) => {
            if advisor.config().api_key.is_none() {
                warn!("no API key found; remote advice and commentary will fall back");
            }
            Arc::new(advisor)
        }
        Err(e) => {
            warn!(error = %e, "advisor unavailable, playing offline");
            Arc::new(OfflineAdvisor)
        }
    }
}

/// Prints every published snapshot.
fn spawn_renderer(campaign: &Campaign) {
    let mut snapshots = campaign.subscribe();
    let commentary = campaign.commentary();
    let handle = campaign.handle();

    tokio::spawn(async move {
        loop {
            let state = snapshots.borrow_and_update().clone();
            let line = commentary.borrow().text.clone();
            let strategies = [handle.strategy(Side::White), handle.strategy(Side::Black)];
            println!("{}", render_hud(&state, strategies, &line));
            if snapshots.changed().await.is_err() {
                break;
            }
        }
    });
}

/// Reads control commands from stdin until EOF.
///
/// Runs on a plain thread so a pending read never holds up runtime shutdown.
fn spawn_controls(handle: CampaignHandle, quit: Arc<Notify>) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let mut words = line.split_whitespace();
            match (words.next(), words.next()) {
                (Some("p"), None) => {
                    let paused = handle.toggle_pause();
                    info!(paused, "{}", if paused { "campaign paused" } else { "campaign resumed" });
                }
                (Some("r"), None) => {
                    let epoch = handle.restart();
                    info!(epoch, "restart requested");
                }
                (Some("q"), None) => {
                    quit.notify_one();
                    break;
                }
                (Some(side), Some(name)) => {
                    let (Ok(side), Ok(strategy)) = (parse_side(side), Strategy::from_str(name, true))
                    else {
                        warn!("unrecognised command: {line}");
                        continue;
                    };
                    handle.set_strategy(side, strategy);
                    info!(side = side.army(), %strategy, "new commander");
                }
                (None, _) => {}
                _ => warn!("unrecognised command: {line}"),
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => CampaignConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => CampaignConfig::default(),
    };
    args.apply(&mut config);
    config.validate()?;

    let advisor = build_advisor(&config, args.offline);
    info!(
        white = %config.white,
        black = %config.black,
        advisor = advisor.name(),
        games = args.games,
        "campaign begins"
    );

    let mut campaign = Campaign::new(config, advisor);
    if let Some(placement) = &args.position {
        let start = GameState::from_placement(placement, args.turn)
            .with_context(|| format!("invalid --position '{placement}'"))?;
        campaign = campaign.with_start(start);
    }

    if !args.quiet {
        spawn_renderer(&campaign);
    }
    let quit = Arc::new(Notify::new());
    spawn_controls(campaign.handle(), Arc::clone(&quit));

    let mut results = tokio::select! {
        results = campaign.play_series(args.games) => results,
        _ = quit.notified() => {
            info!("the army withdraws");
            return Ok(());
        }
    };

    if !args.quiet && std::io::stdin().is_terminal() {
        println!("Series complete. r: new campaign, q: quit");
        let handle = campaign.handle();
        loop {
            tokio::select! {
                end = campaign.next_campaign() => {
                    results.record(handle.strategy(Side::White), handle.strategy(Side::Black), &end);
                }
                _ = quit.notified() => break,
            }
        }
    }

    println!("{}", results.generate_report());
    if let Some(path) = &args.report {
        results
            .save(path)
            .with_context(|| format!("saving report to {}", path.display()))?;
        info!(path = %path.display(), "report saved");
    }

    Ok(())
}
