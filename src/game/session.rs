//! Game session lifecycle: Idle -> Running -> Stopped, and back via restart
//!
//! The session exclusively owns the playfield and the tick source. The
//! presentation layer never mutates it; it calls [`GameSession::start`],
//! [`GameSession::restart`] and [`GameSession::dispatch_direction`] and reads
//! [`RenderableState`] snapshots, either directly or through
//! [`GameSession::subscribe`].

use anyhow::{Context, Result};
use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tokio::sync::watch;

use super::{
    action::Direction,
    config::GameConfig,
    engine::{self, Playfield, TickResult},
    food::place_food,
    grid::Grid,
    scheduler::{Scheduler, TickEvent, TickHandle},
    snake::Snake,
    state::{Collision, RenderableState, SessionState, Vector2},
};

pub struct GameSession<S: Scheduler, R: Rng = StdRng> {
    grid: Grid,
    tick_interval: Duration,
    initial_snake: Snake,
    initial_direction: Direction,
    field: Playfield,
    state: SessionState,
    collision: Option<Collision>,
    scheduler: S,
    ticker: Option<S::Handle>,
    generation: u64,
    rng: R,
    updates: watch::Sender<RenderableState>,
}

impl<S: Scheduler> GameSession<S> {
    /// Create an idle session. Food placement is seeded from `config.seed`
    /// when set, from the OS otherwise.
    pub fn new(config: &GameConfig, scheduler: S) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, scheduler, rng)
    }
}

impl<S: Scheduler, R: Rng> GameSession<S, R> {
    pub fn with_rng(config: &GameConfig, scheduler: S, mut rng: R) -> Result<Self> {
        config.validate().context("Invalid game configuration")?;
        let grid = config.grid().context("Board has no tiles")?;
        let initial_snake = config.initial_snake()?;
        let field = fresh_playfield(&initial_snake, config.initial_direction, &grid, &mut rng)?;

        let (updates, _) = watch::channel(RenderableState {
            segments: field.snake.segments().to_vec(),
            food: field.food,
            score: field.score,
            state: SessionState::Idle,
            tile_count: grid.tile_count(),
            collision: None,
        });

        Ok(Self {
            grid,
            tick_interval: config.tick_interval(),
            initial_snake,
            initial_direction: config.initial_direction,
            field,
            state: SessionState::Idle,
            collision: None,
            scheduler,
            ticker: None,
            generation: 0,
            rng,
            updates,
        })
    }

    /// Reset the board and begin ticking. Valid from any state.
    ///
    /// The previous tick source is cancelled before the new one is installed.
    pub fn start(&mut self) -> Result<()> {
        self.cancel_ticker();

        self.field = fresh_playfield(
            &self.initial_snake,
            self.initial_direction,
            &self.grid,
            &mut self.rng,
        )?;
        self.collision = None;
        self.state = SessionState::Running;

        self.generation += 1;
        self.ticker = Some(self.scheduler.schedule(self.tick_interval, self.generation));
        info!(
            "game started (generation {}, food at ({}, {}))",
            self.generation, self.field.food.x, self.field.food.y
        );

        self.publish();
        Ok(())
    }

    /// Start over after a game over; same as [`GameSession::start`]
    pub fn restart(&mut self) -> Result<()> {
        self.start()
    }

    /// Handle one firing of the tick source.
    ///
    /// Returns `None` when the session is not running or the event belongs to a
    /// cancelled source.
    pub fn on_tick(&mut self, event: TickEvent) -> Option<TickResult> {
        if self.state != SessionState::Running {
            trace!("tick ignored while {:?}", self.state);
            return None;
        }
        if event.generation != self.generation {
            trace!(
                "stale tick from generation {} (current {})",
                event.generation, self.generation
            );
            return None;
        }

        let result = engine::tick(&mut self.field, &self.grid, &mut self.rng);
        match result {
            TickResult::GameOver(collision) => {
                self.cancel_ticker();
                self.state = SessionState::Stopped;
                self.collision = Some(collision);
                info!(
                    "game over by {:?}, final score {}, length {}",
                    collision,
                    self.field.score,
                    self.field.snake.len()
                );
            }
            TickResult::AteFood => debug!(
                "food eaten, score {}, next food at ({}, {})",
                self.field.score, self.field.food.x, self.field.food.y
            ),
            TickResult::Continue => {}
        }

        self.publish();
        Some(result)
    }

    /// Queue a unit-vector direction for the next tick.
    ///
    /// Ignored when the session is not running, when `delta` is not one of the
    /// four unit vectors, or when it reverses the committed direction.
    pub fn queue_direction(&mut self, delta: Vector2) -> bool {
        if self.state != SessionState::Running {
            return false;
        }
        let Some(direction) = Direction::from_delta(delta) else {
            return false;
        };

        let accepted = self.field.queue(direction);
        if !accepted {
            trace!("reverse turn to {:?} ignored", direction);
        }
        accepted
    }

    /// Entry point for input collaborators: maps a key direction to its unit vector
    pub fn dispatch_direction(&mut self, direction: Direction) -> bool {
        self.queue_direction(direction.into())
    }

    /// Current renderable state
    pub fn snapshot(&self) -> RenderableState {
        RenderableState {
            segments: self.field.snake.segments().to_vec(),
            food: self.field.food,
            score: self.field.score,
            state: self.state,
            tile_count: self.grid.tile_count(),
            collision: self.collision,
        }
    }

    /// Receive a fresh snapshot after every tick and every reset
    pub fn subscribe(&self) -> watch::Receiver<RenderableState> {
        self.updates.subscribe()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.field.score
    }

    pub fn snake(&self) -> &Snake {
        &self.field.snake
    }

    pub fn food(&self) -> Vector2 {
        self.field.food
    }

    pub fn direction(&self) -> Direction {
        self.field.direction
    }

    pub fn queued_direction(&self) -> Direction {
        self.field.queued_direction
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn collision(&self) -> Option<Collision> {
        self.collision
    }

    /// Generation of the most recently scheduled tick source; 0 before the first start
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Tick event the current source produces
    pub fn current_tick(&self) -> TickEvent {
        TickEvent {
            generation: self.generation,
        }
    }

    fn cancel_ticker(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }

    fn publish(&self) {
        self.updates.send_replace(self.snapshot());
    }
}

impl<S: Scheduler, R: Rng> Drop for GameSession<S, R> {
    fn drop(&mut self) {
        self.cancel_ticker();
    }
}

fn fresh_playfield<R: Rng>(
    snake: &Snake,
    direction: Direction,
    grid: &Grid,
    rng: &mut R,
) -> Result<Playfield> {
    let food = place_food(rng, snake, grid).context("No free cell for the first food")?;
    Ok(Playfield::new(snake.clone(), direction, food))
}
