//! Headless game loop wiring the session to the autopilot and pacing systems.

use std::{
    thread,
    time::{Duration, Instant},
};

use snake_portal_core::{Command, Event, GameState, PlayerInput, SessionSnapshot};
use snake_portal_system_autopilot::Autopilot;
use snake_portal_system_pacing::Pacing;
use snake_portal_world::{apply, query, Config, Session};
use tracing::{debug, info, warn};

const FRAME: Duration = Duration::from_millis(16);

/// Drives one session from the menu until it ends or the tick budget runs out.
#[derive(Debug)]
pub(crate) struct Driver {
    session: Session,
    autopilot: Option<Autopilot>,
    pacing: Pacing,
    realtime: bool,
    events: Vec<Event>,
    commands: Vec<Command>,
}

impl Driver {
    pub(crate) fn new(seed: u64, autopilot: bool, realtime: bool) -> Self {
        Self {
            session: Session::new(Config::new(seed)),
            autopilot: autopilot.then(Autopilot::new),
            pacing: Pacing::default(),
            realtime,
            events: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// Starts the game, runs up to `max_ticks` ticks, then quits.
    ///
    /// Returns the snapshot taken after the session terminated.
    pub(crate) fn run(&mut self, max_ticks: u64) -> SessionSnapshot {
        self.press(PlayerInput::Start);

        let mut ticks = 0;
        while ticks < max_ticks && self.is_running() {
            let due = if self.realtime {
                self.wait_for_ticks()
            } else {
                1
            };
            for _ in 0..due {
                if ticks >= max_ticks || !self.is_running() {
                    break;
                }
                self.step();
                ticks += 1;
            }
        }

        if ticks >= max_ticks && self.is_running() {
            warn!(max_ticks, "tick budget exhausted");
        }

        self.press(PlayerInput::Quit);
        query::snapshot(&self.session)
    }

    fn is_running(&self) -> bool {
        !query::is_terminated(&self.session) && query::state(&self.session) != GameState::GameOver
    }

    fn wait_for_ticks(&mut self) -> u32 {
        let started = Instant::now();
        thread::sleep(FRAME);
        if query::state(&self.session) != GameState::Playing
            && query::state(&self.session) != GameState::LevelTransition
        {
            self.pacing.reset();
            return 0;
        }
        self.pacing
            .handle(started.elapsed(), query::speed(&self.session))
    }

    fn step(&mut self) {
        if let Some(autopilot) = self.autopilot.as_mut() {
            autopilot.handle(&query::snapshot(&self.session), &mut self.commands);
        }
        for command in self.commands.drain(..) {
            apply(&mut self.session, command, &mut self.events);
        }
        apply(&mut self.session, Command::Tick, &mut self.events);
        self.flush_events();
    }

    fn press(&mut self, input: PlayerInput) {
        apply(&mut self.session, Command::Input { input }, &mut self.events);
        self.flush_events();
    }

    fn flush_events(&mut self) {
        for event in self.events.drain(..) {
            match event {
                Event::SnakeAdvanced { .. } => {}
                Event::FoodEaten {
                    score,
                    apples_eaten,
                    ..
                } => debug!(score, apples_eaten, "food eaten"),
                Event::LevelAdvanced { level } => info!(level = level.get(), "entered level"),
                Event::Collided { kind } => info!(?kind, "collision"),
                Event::FoodPlacementFailed { reason } => warn!(%reason, "no food on the field"),
                other => debug!(event = ?other, "event"),
            }
        }
    }
}
