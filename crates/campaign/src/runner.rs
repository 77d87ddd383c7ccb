//! The campaign runner: one game loop, one writer.
//!
//! [`Campaign`] owns the current snapshot and is the only thing that ever
//! replaces it. Readers subscribe to a `watch` channel and only ever see
//! published, immutable `Arc<GameState>` values. Control (pause, restart,
//! strategy changes) goes through cloneable [`CampaignHandle`]s.
//!
//! Restarts are epoch based: the handle bumps the epoch, the runner resets at
//! its next cycle, and anything computed for an older epoch (a remote move
//! that was still in flight, a commentary line) is dropped on arrival.

use blitz_core::{Agent, GameState, Side, Winner};
use oracle_engine::{commentary_or_fallback, Advisor, CommentaryRequest};
use random_engine::RandomEngine;
use std::borrow::Cow;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::{watch, Notify};
use tracing::{debug, info, warn};

use crate::config::{CampaignConfig, Strategy};
use crate::results::SeriesResults;
use crate::selector::{select_move, Selection, SelectionSource};

/// Commentary shown before the first report of a fresh campaign.
pub const OPENING_COMMENTARY: &str = "The battle lines are drawn...";
/// Commentary shown right after a restart.
pub const RESTART_COMMENTARY: &str = "Charge! The dawn brings glory!";

/// The latest line of commentary and the game it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commentary {
    pub epoch: u64,
    /// Half-moves played when the line was requested
    pub half_move: usize,
    pub text: String,
}

/// What one decision cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// A half-move was applied and published
    Moved { selection: Selection, notation: String },
    /// The chosen move did not apply; nothing changed
    Rejected(Selection),
    /// The side to move had no legal move; the game is drawn
    Drawn,
    /// The game is already over; waiting for a restart
    Finished,
    Paused,
    /// Another decision cycle is in flight
    Busy,
    /// A restart happened while deciding; the decision was dropped
    Stale,
    /// The board was reset for a new epoch
    Restarted { epoch: u64 },
}

struct Shared {
    epoch: AtomicU64,
    paused: AtomicBool,
    deciding: AtomicBool,
    strategies: RwLock<[Strategy; 2]>,
    wake: Notify,
}

impl Shared {
    fn strategy(&self, side: Side) -> Strategy {
        self.strategies
            .read()
            .unwrap_or_else(PoisonError::into_inner)[side.idx()]
    }
}

/// Held for the duration of a decision cycle.
struct DecisionGuard {
    shared: Arc<Shared>,
}

impl DecisionGuard {
    fn acquire(shared: &Arc<Shared>) -> Option<Self> {
        shared
            .deciding
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                shared: Arc::clone(shared),
            })
    }
}

impl Drop for DecisionGuard {
    fn drop(&mut self) {
        self.shared.deciding.store(false, Ordering::Release);
    }
}

/// Cloneable remote control for a running [`Campaign`].
#[derive(Clone)]
pub struct CampaignHandle {
    shared: Arc<Shared>,
}

impl CampaignHandle {
    pub fn pause(&self) {
        self.shared.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.shared.paused.store(false, Ordering::SeqCst);
        self.shared.wake.notify_waiters();
    }

    /// Flips the pause flag and returns whether the campaign is now paused.
    pub fn toggle_pause(&self) -> bool {
        let was_paused = self.shared.paused.fetch_xor(true, Ordering::SeqCst);
        if was_paused {
            self.shared.wake.notify_waiters();
        }
        !was_paused
    }

    pub fn is_paused(&self) -> bool {
        self.shared.paused.load(Ordering::SeqCst)
    }

    /// Starts a new epoch. Also unpauses, so the new game begins straight away.
    pub fn restart(&self) -> u64 {
        let epoch = self.shared.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared.paused.store(false, Ordering::SeqCst);
        self.shared.wake.notify_waiters();
        epoch
    }

    pub fn epoch(&self) -> u64 {
        self.shared.epoch.load(Ordering::SeqCst)
    }

    pub fn is_deciding(&self) -> bool {
        self.shared.deciding.load(Ordering::Acquire)
    }

    /// Takes effect from the next decision for that side.
    pub fn set_strategy(&self, side: Side, strategy: Strategy) {
        self.shared
            .strategies
            .write()
            .unwrap_or_else(PoisonError::into_inner)[side.idx()] = strategy;
    }

    pub fn strategy(&self, side: Side) -> Strategy {
        self.shared.strategy(side)
    }
}

/// Runs self-play games between two strategies.
pub struct Campaign {
    config: CampaignConfig,
    advisor: Arc<dyn Advisor>,
    local: RandomEngine,
    shared: Arc<Shared>,
    /// Position every new epoch starts from
    start: Arc<GameState>,
    /// Epoch the current state belongs to
    epoch: u64,
    state: Arc<GameState>,
    state_tx: watch::Sender<Arc<GameState>>,
    commentary_tx: Arc<watch::Sender<Commentary>>,
}

impl Campaign {
    pub fn new(config: CampaignConfig, advisor: Arc<dyn Advisor>) -> Self {
        let local = match config.seed {
            Some(seed) => RandomEngine::seeded(seed),
            None => RandomEngine::new(),
        }
        .with_capture_bias(config.capture_bias)
        .with_name("capture-biased");

        let start = Arc::new(GameState::initial());
        let (state_tx, _) = watch::channel(Arc::clone(&start));
        let (commentary_tx, _) = watch::channel(Commentary {
            epoch: 0,
            half_move: 0,
            text: OPENING_COMMENTARY.to_string(),
        });

        let shared = Arc::new(Shared {
            epoch: AtomicU64::new(0),
            paused: AtomicBool::new(false),
            deciding: AtomicBool::new(false),
            strategies: RwLock::new([config.white, config.black]),
            wake: Notify::new(),
        });

        Self {
            config,
            advisor,
            local,
            shared,
            state: Arc::clone(&start),
            start,
            epoch: 0,
            state_tx,
            commentary_tx: Arc::new(commentary_tx),
        }
    }

    /// Use `start` instead of the standard deployment, now and after every restart.
    pub fn with_start(mut self, start: GameState) -> Self {
        self.start = Arc::new(start);
        self.state = Arc::clone(&self.start);
        self.state_tx.send_replace(Arc::clone(&self.state));
        self
    }

    pub fn handle(&self) -> CampaignHandle {
        CampaignHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Published snapshots, starting with the current one.
    pub fn subscribe(&self) -> watch::Receiver<Arc<GameState>> {
        self.state_tx.subscribe()
    }

    pub fn commentary(&self) -> watch::Receiver<Commentary> {
        self.commentary_tx.subscribe()
    }

    pub fn state(&self) -> Arc<GameState> {
        Arc::clone(&self.state)
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn config(&self) -> &CampaignConfig {
        &self.config
    }

    /// Runs one decision cycle: pick a move for the side to move and apply it.
    pub async fn step(&mut self) -> StepOutcome {
        let current = self.shared.epoch.load(Ordering::SeqCst);
        if current != self.epoch {
            self.reset(current);
            return StepOutcome::Restarted { epoch: current };
        }
        if self.shared.paused.load(Ordering::SeqCst) {
            return StepOutcome::Paused;
        }
        if self.state.is_game_over() {
            return StepOutcome::Finished;
        }
        let Some(_guard) = DecisionGuard::acquire(&self.shared) else {
            return StepOutcome::Busy;
        };

        let snapshot = Arc::clone(&self.state);
        let epoch = self.epoch;
        let side = snapshot.turn;
        let strategy = self.shared.strategy(side);

        let selection = select_move(
            &snapshot,
            strategy,
            self.advisor.as_ref(),
            &mut self.local,
            self.config.advice_timeout(),
        )
        .await;

        if self.shared.epoch.load(Ordering::SeqCst) != epoch {
            debug!(epoch, "restart during decision, dropping it");
            return StepOutcome::Stale;
        }

        let Some(mut selection) = selection else {
            info!(side = side.army(), "no legal moves, truce declared");
            self.publish(snapshot.declare_draw().into_owned());
            return StepOutcome::Drawn;
        };

        let mut applied = snapshot.apply(selection.from, selection.to);
        if matches!(applied, Cow::Borrowed(_)) && selection.source == SelectionSource::Remote {
            warn!(
                side = side.army(),
                "advice {} -> {} is not playable, playing locally",
                selection.from,
                selection.to
            );
            let Some(choice) = self.local.choose(&snapshot) else {
                self.publish(snapshot.declare_draw().into_owned());
                return StepOutcome::Drawn;
            };
            selection = Selection {
                from: choice.from,
                to: choice.to,
                source: SelectionSource::Local,
            };
            applied = snapshot.apply(selection.from, selection.to);
        }

        let next = match applied {
            Cow::Borrowed(_) => {
                debug!("move {} -> {} ignored", selection.from, selection.to);
                return StepOutcome::Rejected(selection);
            }
            Cow::Owned(next) => next,
        };

        self.request_commentary(&snapshot);

        let notation = next
            .last_move()
            .map(|m| m.notation.clone())
            .unwrap_or_default();
        info!(
            ply = next.history.len(),
            side = side.army(),
            strategy = %strategy,
            source = ?selection.source,
            eval = next.evaluation,
            "{notation}"
        );

        let next = self.enforce_move_cap(next);
        if let Some(winner) = next.winner() {
            match winner {
                Winner::Side(s) => info!(winner = s.army(), "the enemy king has fallen"),
                Winner::Draw => info!("half-move cap reached, truce declared"),
            }
        }
        self.publish(next);

        StepOutcome::Moved {
            selection,
            notation,
        }
    }

    /// Plays until the current game ends, pacing half-moves by the configured delay.
    ///
    /// A restart from a handle mid-game switches to the new game and keeps going.
    pub async fn play_game(&mut self) -> Arc<GameState> {
        loop {
            let outcome = self.step().await;
            match outcome {
                StepOutcome::Paused => {
                    self.wait_while_paused().await;
                    continue;
                }
                StepOutcome::Restarted { .. } => continue,
                StepOutcome::Finished | StepOutcome::Drawn => return self.state(),
                StepOutcome::Moved { .. } if self.state.is_game_over() => return self.state(),
                _ => {}
            }
            tokio::time::sleep(self.config.move_delay()).await;
        }
    }

    /// Waits for a restart from a handle, then plays the new game to its end.
    pub async fn next_campaign(&mut self) -> Arc<GameState> {
        loop {
            let notified = self.shared.wake.notified();
            if self.shared.epoch.load(Ordering::SeqCst) != self.epoch {
                break;
            }
            notified.await;
        }
        self.play_game().await
    }

    /// Plays `games` consecutive games, restarting between them.
    pub async fn play_series(&mut self, games: u32) -> SeriesResults {
        let handle = self.handle();
        let base = [self.config.white, self.config.black];
        let mut results = SeriesResults::new();

        for game in 0..games {
            if game > 0 {
                let epoch = handle.restart();
                self.reset(epoch);
            }
            let (white, black) = if self.config.alternate_sides && game % 2 == 1 {
                (base[1], base[0])
            } else {
                (base[0], base[1])
            };
            handle.set_strategy(Side::White, white);
            handle.set_strategy(Side::Black, black);

            let end = self.play_game().await;
            results.record(white, black, &end);
        }
        results
    }

    async fn wait_while_paused(&self) {
        loop {
            let notified = self.shared.wake.notified();
            if !self.shared.paused.load(Ordering::SeqCst) {
                return;
            }
            notified.await;
        }
    }

    fn reset(&mut self, epoch: u64) {
        info!(epoch, "new campaign");
        self.epoch = epoch;
        self.local.new_game();
        self.publish((*self.start).clone());
        self.commentary_tx.send_replace(Commentary {
            epoch,
            half_move: 0,
            text: RESTART_COMMENTARY.to_string(),
        });
    }

    fn publish(&mut self, state: GameState) {
        let state = Arc::new(state);
        self.state = Arc::clone(&state);
        self.state_tx.send_replace(state);
    }

    fn enforce_move_cap(&self, next: GameState) -> GameState {
        match self.config.max_half_moves {
            Some(cap) if !next.is_game_over() && next.history.len() >= cap => {
                next.declare_draw().into_owned()
            }
            _ => next,
        }
    }

    /// On the commentary cadence, asks for a line about the latest move of
    /// `snapshot` in the background. Lines from an older epoch, or older than
    /// the one already shown, are discarded.
    fn request_commentary(&self, snapshot: &GameState) {
        let every = self.config.commentary_every;
        let played = snapshot.history.len();
        if every == 0 || played == 0 || played % every != 0 {
            return;
        }
        let Some(last) = snapshot.last_move() else {
            return;
        };

        let request = CommentaryRequest {
            notation: last.notation.clone(),
            evaluation: snapshot.evaluation,
        };
        let advisor = Arc::clone(&self.advisor);
        let shared = Arc::clone(&self.shared);
        let tx = Arc::clone(&self.commentary_tx);
        let epoch = self.epoch;

        tokio::spawn(async move {
            let text = commentary_or_fallback(advisor.as_ref(), &request).await;
            if shared.epoch.load(Ordering::SeqCst) != epoch {
                debug!(epoch, "dropping commentary from an old campaign");
                return;
            }
            tx.send_if_modified(|current| {
                if current.epoch == epoch && current.half_move > played {
                    return false;
                }
                *current = Commentary {
                    epoch,
                    half_move: played,
                    text,
                };
                true
            });
        });
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod runner_tests;
