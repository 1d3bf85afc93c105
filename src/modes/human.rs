use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::{debug, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::interval;

use crate::game::{
    GameConfig, GameSession, RenderableState, SessionState, TickEvent, TickResult, TokioScheduler,
};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Interactive play in the terminal.
///
/// One event loop owns the session. Key presses, tick events and redraws are
/// handled one at a time, so a tick always runs to completion before the next
/// event is looked at.
pub struct HumanMode {
    session: GameSession<TokioScheduler>,
    ticks: mpsc::Receiver<TickEvent>,
    updates: watch::Receiver<RenderableState>,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: &GameConfig) -> Result<Self> {
        let (scheduler, ticks) = TokioScheduler::channel();
        let session = GameSession::new(config, scheduler)?;
        let updates = session.subscribe();

        Ok(Self {
            session,
            ticks,
            updates,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Redraw at 30 FPS; the simulation runs on the session's own tick source
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event)?,
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                Some(tick) = self.ticks.recv() => {
                    self.handle_tick(tick);
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    let state = self.updates.borrow_and_update().clone();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &state, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                info!("quitting");
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Move(direction) => {
                    self.session.dispatch_direction(direction);
                }
                KeyAction::Start => {
                    if self.session.state() != SessionState::Running {
                        self.start_game()?;
                    }
                }
                KeyAction::Restart => self.start_game()?,
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }

        Ok(())
    }

    fn handle_tick(&mut self, tick: TickEvent) {
        if let Some(TickResult::GameOver(collision)) = self.session.on_tick(tick) {
            debug!("tick {:?} ended the game: {:?}", tick, collision);
            self.metrics.on_game_over(self.session.score());
        }
    }

    fn start_game(&mut self) -> Result<()> {
        self.session.start()?;
        self.metrics.on_game_start();
        Ok(())
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
