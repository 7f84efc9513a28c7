//! Game runtime: owns the snapshot and carries out its effects.
//!
//! All state changes happen in [`GameRuntime::dispatch`] on the caller's
//! task. Fetches and delayed commits run as tokio tasks that only report
//! back over a channel. A fetch result is applied only if no newer fetch
//! was started after it.

use crate::tile_source::TileSource;
use concentration_game::{Effect, GameEvent, GameState, PendingCommit, shuffle};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

/// Background result sent back to the runtime.
#[derive(Debug)]
enum Message {
    /// Outcome of fetch number `request`.
    Fetched { request: u64, event: GameEvent },
    /// A commit delay elapsed.
    CommitDue(PendingCommit),
}

/// Drives a [`GameState`] against a [`TileSource`].
pub struct GameRuntime {
    state: GameState,
    source: Arc<dyn TileSource>,
    rng: StdRng,
    tx: mpsc::UnboundedSender<Message>,
    rx: mpsc::UnboundedReceiver<Message>,
    timers: HashMap<PendingCommit, JoinHandle<()>>,
    fetch: Option<JoinHandle<()>>,
    fetch_request: u64,
}

impl GameRuntime {
    /// Creates a runtime in the `Loading` phase. Nothing is fetched until
    /// [`GameRuntime::start`] or a reset.
    #[instrument(skip(source))]
    pub fn new(source: Arc<dyn TileSource>, commit_delay: Duration, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state: GameState::new(commit_delay),
            source,
            rng,
            tx,
            rx,
            timers: HashMap::new(),
            fetch: None,
            fetch_request: 0,
        }
    }

    /// Current snapshot.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Number of delayed commits still scheduled.
    pub fn scheduled_commits(&self) -> usize {
        self.timers.len()
    }

    /// Triggers the first fetch.
    pub fn start(&mut self) {
        self.dispatch(GameEvent::Reset);
    }

    /// Forwards a click on the tile at `index`.
    pub fn click(&mut self, index: usize) {
        self.dispatch(GameEvent::Click(index));
    }

    /// Refetches, reshuffles and restarts the game.
    pub fn reset(&mut self) {
        self.dispatch(GameEvent::Reset);
    }

    /// Applies one event and runs the effects it produces.
    #[instrument(skip(self))]
    pub fn dispatch(&mut self, event: GameEvent) {
        if let GameEvent::CommitDue(commit) = &event {
            self.timers.remove(commit);
        }

        let state = std::mem::take(&mut self.state);
        let transition = state.apply(event);
        self.state = transition.state;

        for effect in transition.effects {
            self.run_effect(effect);
        }
    }

    /// Applies every event that is already waiting. Returns how many were
    /// applied; results of superseded fetches are dropped and not counted.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(message) = self.rx.try_recv() {
            if self.receive(message) {
                applied += 1;
            }
        }
        applied
    }

    /// Routes one background message. Returns false when it was dropped.
    fn receive(&mut self, message: Message) -> bool {
        match message {
            Message::Fetched { request, event } => {
                if request != self.fetch_request {
                    debug!(
                        request,
                        current = self.fetch_request,
                        "Dropping result of a superseded fetch"
                    );
                    return false;
                }
                self.fetch = None;
                self.dispatch(event);
            }
            Message::CommitDue(commit) => self.dispatch(GameEvent::CommitDue(commit)),
        }
        true
    }

    /// Waits for the next background message and handles it. Returns false
    /// when nothing is in flight, since no message can arrive then.
    pub async fn step(&mut self) -> bool {
        if self.fetch.is_none() && self.timers.is_empty() {
            return match self.rx.try_recv() {
                Ok(message) => {
                    self.receive(message);
                    true
                }
                Err(_) => false,
            };
        }
        match self.rx.recv().await {
            Some(message) => {
                self.receive(message);
                true
            }
            None => false,
        }
    }

    /// Steps until no fetch or commit is in flight.
    pub async fn settle(&mut self) {
        while self.step().await {}
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::FetchBoard => self.spawn_fetch(),
            Effect::ScheduleCommit { commit, delay } => self.schedule_commit(commit, delay),
            Effect::CancelCommits { before_generation } => self.cancel_commits(before_generation),
        }
    }

    #[instrument(skip(self))]
    fn spawn_fetch(&mut self) {
        if let Some(previous) = self.fetch.take() {
            debug!("Superseding in-flight fetch");
            previous.abort();
        }

        self.fetch_request += 1;
        let request = self.fetch_request;
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let mut rng = StdRng::from_rng(&mut self.rng);

        self.fetch = Some(tokio::spawn(async move {
            let event = match source.fetch_board().await {
                Ok(tiles) => GameEvent::BoardFetched(shuffle(tiles, &mut rng)),
                Err(e) => {
                    error!(error = %e, "There was a problem fetching the tiles");
                    GameEvent::FetchFailed(e.to_string())
                }
            };
            let _ = tx.send(Message::Fetched { request, event });
        }));
    }

    #[instrument(skip(self))]
    fn schedule_commit(&mut self, commit: PendingCommit, delay: Duration) {
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Message::CommitDue(commit));
        });
        if let Some(previous) = self.timers.insert(commit, handle) {
            previous.abort();
        }
    }

    #[instrument(skip(self))]
    fn cancel_commits(&mut self, before_generation: u64) {
        let before = self.timers.len();
        self.timers.retain(|commit, handle| {
            let keep = commit.generation >= before_generation;
            if !keep {
                handle.abort();
            }
            keep
        });
        let cancelled = before - self.timers.len();
        if cancelled > 0 {
            info!(cancelled, "Cancelled commits from a previous board");
        }
    }
}

impl Drop for GameRuntime {
    fn drop(&mut self) {
        if let Some(fetch) = self.fetch.take() {
            fetch.abort();
        }
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
    }
}
