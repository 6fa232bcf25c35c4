#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for Snake Portal.
//!
//! A [`Session`] owns the snake, the food, the current level's obstacles and
//! the portal gate. Adapters mutate it exclusively through [`apply`] and read
//! it through the [`query`] module.

mod food;
mod portal;
mod snake;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use snake_portal_core::{
    CellCoord, CollisionKind, Command, Direction, Event, GameState, GridGeometry, Level,
    ObstacleLayout, PlayerInput, Speed, Trigger, INITIAL_SNAKE_LENGTH, MAX_PLACEMENT_ATTEMPTS,
    SCORE_PER_APPLE,
};
use snake_portal_system_level_generation::LevelGenerator;
use tracing::{debug, info, trace, warn};

use crate::{food::Food, portal::PortalGate, snake::Snake};

const DEFAULT_RNG_SEED: u64 = 0x5a4e_4b45_7061_7468;

/// Configuration parameters required to construct a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a configuration seeding food and level randomness with `rng_seed`.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }

    /// Seed for the session's random stream.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_RNG_SEED)
    }
}

/// Represents one authoritative game session.
#[derive(Debug)]
pub struct Session {
    grid: GridGeometry,
    state: GameState,
    terminated: bool,
    snake: Snake,
    food: Food,
    level: Level,
    obstacles: ObstacleLayout,
    generator: LevelGenerator,
    portal: PortalGate,
    score: u32,
    apples_eaten: u32,
    speed: Speed,
    rng: ChaCha8Rng,
    tick_index: u64,
}

impl Session {
    /// Creates a session waiting in the menu.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let grid = GridGeometry::STANDARD;
        let mut session = Self {
            grid,
            state: GameState::Menu,
            terminated: false,
            snake: Snake::centered(grid, INITIAL_SNAKE_LENGTH),
            food: Food::default(),
            level: Level::FIRST,
            obstacles: ObstacleLayout::empty(),
            generator: LevelGenerator::new(grid),
            portal: PortalGate::new(grid),
            score: 0,
            apples_eaten: 0,
            speed: Speed::INITIAL,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed()),
            tick_index: 0,
        };
        session.reset(&mut Vec::new());
        session
    }

    fn reset(&mut self, out_events: &mut Vec<Event>) {
        self.snake = Snake::centered(self.grid, INITIAL_SNAKE_LENGTH);
        self.level = Level::FIRST;
        self.obstacles = self.generator.generate(self.level, &mut self.rng);
        self.portal.close();
        self.score = 0;
        self.apples_eaten = 0;
        self.speed = Speed::INITIAL;
        self.respawn_food(out_events);
        debug!("session reset");
    }

    fn process_input(&mut self, input: PlayerInput, out_events: &mut Vec<Event>) {
        if input == PlayerInput::Quit {
            self.terminated = true;
            info!(score = self.score, level = self.level.get(), "session terminated");
            out_events.push(Event::Terminated);
            return;
        }

        if let Some(direction) = input.direction() {
            if self.state == GameState::Playing && !self.snake.change_direction(direction) {
                trace!(?direction, "reversal ignored");
            }
            return;
        }

        if let Some(trigger) = input.trigger() {
            let _ = self.fire(trigger, out_events);
        }
    }

    fn fire(&mut self, trigger: Trigger, out_events: &mut Vec<Event>) -> bool {
        let from = self.state;
        let Some(to) = from.transition(trigger) else {
            trace!(?from, ?trigger, "trigger not valid in current state");
            return false;
        };

        if from.resets_session(trigger) {
            self.reset(out_events);
        }

        self.state = to;
        debug!(?from, ?to, ?trigger, "state changed");
        out_events.push(Event::StateChanged { from, to });
        true
    }

    fn tick(&mut self, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        match self.state {
            GameState::Playing => self.step(out_events),
            GameState::LevelTransition => {
                if self.portal.advance_transition() {
                    self.advance_level(out_events);
                }
            }
            GameState::Menu | GameState::Paused | GameState::GameOver => {}
        }
    }

    fn step(&mut self, out_events: &mut Vec<Event>) {
        self.open_portal_if_ready(out_events);

        self.snake.advance();
        let head = self.snake.head();
        out_events.push(Event::SnakeAdvanced { head });

        if self.portal.is_fully_through(self.snake.segments()) {
            self.portal.begin_transition();
            let _ = self.fire(Trigger::PortalTraversed, out_events);
            return;
        }

        if self.food.is_at(head) {
            self.eat(head, out_events);
        }

        if !self.portal.is_at_opening(head) && self.snake.check_wall_collision(self.grid) {
            self.crash(CollisionKind::Wall, out_events);
            return;
        }

        if self.snake.check_self_collision() {
            self.crash(CollisionKind::SelfBody, out_events);
            return;
        }

        if self.obstacles.check_collision(head) {
            self.crash(CollisionKind::Obstacle, out_events);
        }
    }

    fn eat(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        self.snake.grow();
        self.score = self.score.saturating_add(SCORE_PER_APPLE);
        self.apples_eaten = self.apples_eaten.saturating_add(1);
        out_events.push(Event::FoodEaten {
            cell,
            score: self.score,
            apples_eaten: self.apples_eaten,
        });
        self.respawn_food(out_events);
        self.speed = self.speed.accelerate();
        debug!(
            score = self.score,
            apples_eaten = self.apples_eaten,
            pending_growth = self.snake.pending_growth(),
            ticks_per_second = self.speed.ticks_per_second(),
            "food eaten"
        );
        self.open_portal_if_ready(out_events);
    }

    fn crash(&mut self, kind: CollisionKind, out_events: &mut Vec<Event>) {
        out_events.push(Event::Collided { kind });
        if self.fire(Trigger::Collision, out_events) {
            info!(
                ?kind,
                score = self.score,
                level = self.level.get(),
                length = self.snake.len(),
                "game over"
            );
        }
    }

    fn open_portal_if_ready(&mut self, out_events: &mut Vec<Event>) {
        if self.portal.open_if_ready(self.apples_eaten) {
            info!(level = self.level.get(), "portal opened");
            out_events.push(Event::PortalOpened);
        }
    }

    fn advance_level(&mut self, out_events: &mut Vec<Event>) {
        self.level = self.level.next();
        self.obstacles = self.generator.generate(self.level, &mut self.rng);
        self.apples_eaten = 0;
        self.portal.close();

        let entry = CellCoord::new(self.portal.center_column(), self.grid.rows() - 1);
        self.snake.reenter(entry, Direction::Up);
        self.respawn_food(out_events);

        info!(
            level = self.level.get(),
            obstacle_cells = self.obstacles.cell_count(),
            "level advanced"
        );
        out_events.push(Event::LevelAdvanced { level: self.level });
        let _ = self.fire(Trigger::DwellElapsed, out_events);
    }

    fn respawn_food(&mut self, out_events: &mut Vec<Event>) {
        let snake = &self.snake;
        let obstacles = &self.obstacles;
        let placement = self.food.try_respawn(
            &mut self.rng,
            self.grid,
            MAX_PLACEMENT_ATTEMPTS,
            |cell| snake.occupies(cell) || obstacles.check_collision(cell),
        );

        match placement {
            Ok(cell) => trace!(?cell, "food placed"),
            Err(reason) => {
                warn!(%reason, "food placement failed");
                out_events.push(Event::FoodPlacementFailed { reason });
            }
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Applies the provided command to the session, mutating state deterministically.
///
/// A terminated session ignores every command.
pub fn apply(session: &mut Session, command: Command, out_events: &mut Vec<Event>) {
    if session.terminated {
        return;
    }

    match command {
        Command::Input { input } => session.process_input(input, out_events),
        Command::Tick => session.tick(out_events),
    }
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use snake_portal_core::{
        CellCoord, GameState, GridGeometry, Level, ObstacleLayout, SessionSnapshot, Speed,
        APPLES_PER_LEVEL,
    };

    use super::Session;

    /// Captures everything a renderer needs to draw the current frame.
    #[must_use]
    pub fn snapshot(session: &Session) -> SessionSnapshot {
        let transition_ticks_remaining = (session.state == GameState::LevelTransition)
            .then(|| session.portal.transition_ticks_remaining());

        SessionSnapshot {
            state: session.state,
            body: session.snake.segments().collect(),
            direction: session.snake.direction(),
            food: session.food.cell(),
            obstacles: session.obstacles.cells(),
            score: session.score,
            level: session.level,
            apples_eaten: session.apples_eaten,
            apples_per_level: APPLES_PER_LEVEL,
            portal: session.portal.view(),
            transition_ticks_remaining,
            speed: session.speed,
            terminated: session.terminated,
            tick_index: session.tick_index,
            grid: session.grid,
        }
    }

    /// Active state machine state.
    #[must_use]
    pub fn state(session: &Session) -> GameState {
        session.state
    }

    /// Reports whether a quit request terminated the session.
    #[must_use]
    pub fn is_terminated(session: &Session) -> bool {
        session.terminated
    }

    /// Current tick cadence, used by adapters to pace [`super::apply`] calls.
    #[must_use]
    pub fn speed(session: &Session) -> Speed {
        session.speed
    }

    /// Accumulated score.
    #[must_use]
    pub fn score(session: &Session) -> u32 {
        session.score
    }

    /// Active level.
    #[must_use]
    pub fn level(session: &Session) -> Level {
        session.level
    }

    /// Obstacle layout of the active level.
    #[must_use]
    pub fn obstacles(session: &Session) -> &ObstacleLayout {
        &session.obstacles
    }

    /// Head cell of the snake.
    #[must_use]
    pub fn head(session: &Session) -> CellCoord {
        session.snake.head()
    }

    /// Play field geometry.
    #[must_use]
    pub fn grid(session: &Session) -> GridGeometry {
        session.grid
    }
}

/// Helpers that stage precise scenarios for tests and tooling.
#[cfg(feature = "scenario_scaffolding")]
pub mod scaffolding {
    use snake_portal_core::{CellCoord, ObstacleLayout};

    use super::Session;

    /// Moves the food onto `cell` without consulting the RNG.
    pub fn place_food(session: &mut Session, cell: CellCoord) {
        session.food.place(cell);
    }

    /// Overrides the number of food items eaten on the current level.
    pub fn set_apples_eaten(session: &mut Session, apples_eaten: u32) {
        session.apples_eaten = apples_eaten;
    }

    /// Replaces the current level's obstacles.
    pub fn install_obstacles(session: &mut Session, layout: ObstacleLayout) {
        session.obstacles = layout;
    }

    /// Growth queued for upcoming moves.
    #[must_use]
    pub fn pending_growth(session: &Session) -> u32 {
        session.snake.pending_growth()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_portal_core::{APPLES_PER_LEVEL, LEVEL_TRANSITION_TICKS};

    fn playing_session(seed: u64) -> (Session, Vec<Event>) {
        let mut session = Session::new(Config::new(seed));
        let mut events = Vec::new();
        apply(
            &mut session,
            Command::Input {
                input: PlayerInput::Start,
            },
            &mut events,
        );
        (session, events)
    }

    fn steer(session: &mut Session, input: PlayerInput) {
        let mut events = Vec::new();
        apply(session, Command::Input { input }, &mut events);
    }

    fn tick(session: &mut Session) -> Vec<Event> {
        let mut events = Vec::new();
        apply(session, Command::Tick, &mut events);
        events
    }

    #[test]
    fn new_session_waits_in_menu_with_safe_food() {
        let session = Session::new(Config::new(7));
        let snapshot = query::snapshot(&session);
        assert_eq!(snapshot.state, GameState::Menu);
        assert_eq!(snapshot.body.len(), INITIAL_SNAKE_LENGTH);
        let food = snapshot.food.expect("food placed");
        assert!(!snapshot.body.contains(&food));
        assert!(snapshot.obstacles.is_empty());
        assert_eq!(snapshot.transition_ticks_remaining, None);
    }

    #[test]
    fn ticks_outside_playing_leave_snake_frozen() {
        let mut session = Session::new(Config::new(7));
        let before = query::snapshot(&session).body;
        let events = tick(&mut session);
        assert!(events.is_empty());
        assert_eq!(query::snapshot(&session).body, before);
    }

    #[test]
    fn pause_toggles_and_freezes_simulation() {
        let (mut session, _) = playing_session(3);
        steer(&mut session, PlayerInput::TogglePause);
        assert_eq!(session.state, GameState::Paused);
        let head = session.snake.head();
        let _ = tick(&mut session);
        assert_eq!(session.snake.head(), head);
        steer(&mut session, PlayerInput::MoveUp);
        assert_eq!(session.snake.direction(), Direction::Right, "input ignored while paused");
        steer(&mut session, PlayerInput::TogglePause);
        assert_eq!(session.state, GameState::Playing);
    }

    #[test]
    fn tenth_apple_opens_portal_on_same_tick() {
        let (mut session, _) = playing_session(9);
        session.apples_eaten = APPLES_PER_LEVEL - 1;
        let ahead = session.snake.head().offset(Direction::Right);
        session.food.place(ahead);

        let events = tick(&mut session);

        assert_eq!(session.apples_eaten, APPLES_PER_LEVEL);
        assert!(session.portal.is_open());
        assert!(events.contains(&Event::PortalOpened));
        assert_eq!(session.score, SCORE_PER_APPLE);
        assert_eq!(session.snake.pending_growth(), 1);
        assert_ne!(session.food.cell(), Some(ahead));
    }

    #[test]
    fn portal_exit_bypasses_wall_rule() {
        let (mut session, _) = playing_session(21);
        session.apples_eaten = APPLES_PER_LEVEL;
        session.snake = Snake::new(CellCoord::new(20, 0), 3);
        let _ = session.snake.change_direction(Direction::Up);
        let _ = tick(&mut session);
        assert_eq!(session.snake.head(), CellCoord::new(20, -1));
        assert_eq!(session.state, GameState::Playing);
    }

    #[test]
    fn leaving_outside_opening_is_a_wall_collision() {
        let (mut session, _) = playing_session(21);
        session.apples_eaten = APPLES_PER_LEVEL;
        session.snake = Snake::new(CellCoord::new(25, 0), 3);
        let _ = session.snake.change_direction(Direction::Up);
        let events = tick(&mut session);
        assert_eq!(session.state, GameState::GameOver);
        assert!(events.contains(&Event::Collided {
            kind: CollisionKind::Wall
        }));
    }

    #[test]
    fn turning_into_own_body_ends_game() {
        let (mut session, _) = playing_session(6);
        session.snake = Snake::new(CellCoord::new(10, 10), 5);
        session.food.place(CellCoord::new(30, 25));

        steer(&mut session, PlayerInput::MoveDown);
        let _ = tick(&mut session);
        steer(&mut session, PlayerInput::MoveLeft);
        let _ = tick(&mut session);
        steer(&mut session, PlayerInput::MoveUp);
        let events = tick(&mut session);

        assert_eq!(session.snake.head(), CellCoord::new(9, 10));
        assert_eq!(session.state, GameState::GameOver);
        let collided = events
            .iter()
            .position(|event| {
                *event
                    == Event::Collided {
                        kind: CollisionKind::SelfBody,
                    }
            })
            .expect("self collision reported");
        assert_eq!(
            events.get(collided + 1),
            Some(&Event::StateChanged {
                from: GameState::Playing,
                to: GameState::GameOver,
            })
        );
    }

    #[test]
    fn exhausted_food_placement_keeps_playing_without_food() {
        let (mut session, _) = playing_session(12);
        let ahead = session.snake.head().offset(Direction::Right);
        let kept = [session.snake.head(), ahead, CellCoord::new(19, 15)];
        let filler: Vec<CellCoord> = session
            .grid
            .cells()
            .filter(|cell| !kept.contains(cell))
            .collect();
        session.obstacles = ObstacleLayout::new([snake_portal_core::Obstacle::new(filler)]);
        session.food.place(ahead);

        let events = tick(&mut session);

        assert!(events.contains(&Event::FoodPlacementFailed {
            reason: snake_portal_core::PlacementError::Exhausted {
                attempts: MAX_PLACEMENT_ATTEMPTS,
            },
        }));
        let snapshot = query::snapshot(&session);
        assert_eq!(snapshot.food, None);
        assert_eq!(snapshot.state, GameState::Playing);
        assert_eq!(snapshot.score, SCORE_PER_APPLE);

        let events = tick(&mut session);
        assert!(events.contains(&Event::Collided {
            kind: CollisionKind::Obstacle
        }));
    }

    #[test]
    fn obstacle_collision_ends_game() {
        let (mut session, _) = playing_session(4);
        let ahead = session.snake.head().offset(Direction::Right);
        session.obstacles = ObstacleLayout::new([snake_portal_core::Obstacle::new([ahead])]);
        let events = tick(&mut session);
        assert_eq!(session.state, GameState::GameOver);
        assert!(events.contains(&Event::Collided {
            kind: CollisionKind::Obstacle
        }));
    }

    #[test]
    fn full_level_sequence_advances_after_dwell() {
        let (mut session, _) = playing_session(1234);
        steer(&mut session, PlayerInput::MoveUp);
        session.apples_eaten = APPLES_PER_LEVEL - 1;
        let ahead = session.snake.head().offset(Direction::Up);
        session.food.place(ahead);

        let _ = tick(&mut session);
        assert!(session.portal.is_open());

        let mut ticks = 0;
        while session.state == GameState::Playing && ticks < 64 {
            let _ = tick(&mut session);
            ticks += 1;
        }
        assert_eq!(session.state, GameState::LevelTransition);
        assert!(session.snake.segments().all(|segment| segment.row() < 0));

        let frozen: Vec<CellCoord> = session.snake.segments().collect();
        steer(&mut session, PlayerInput::MoveLeft);
        steer(&mut session, PlayerInput::TogglePause);
        for _ in 1..LEVEL_TRANSITION_TICKS {
            let _ = tick(&mut session);
        }
        assert_eq!(session.state, GameState::LevelTransition);
        assert_eq!(
            query::snapshot(&session).transition_ticks_remaining,
            Some(1)
        );
        assert_eq!(session.snake.segments().collect::<Vec<_>>(), frozen);

        let events = tick(&mut session);
        assert_eq!(session.state, GameState::Playing);
        assert_eq!(session.level, Level::new(2));
        assert_eq!(session.apples_eaten, 0);
        assert!(!session.portal.is_open());
        assert_eq!(session.obstacles.cell_count(), 13);
        assert!(events.contains(&Event::LevelAdvanced {
            level: Level::new(2)
        }));
        assert_eq!(session.snake.head(), CellCoord::new(20, 29));
        assert_eq!(session.snake.direction(), Direction::Up);
        let food = session.food.cell().expect("food placed");
        assert!(!session.obstacles.check_collision(food));
    }

    #[test]
    fn quit_terminates_from_any_state() {
        let (mut session, _) = playing_session(2);
        let mut events = Vec::new();
        apply(
            &mut session,
            Command::Input {
                input: PlayerInput::Quit,
            },
            &mut events,
        );
        assert_eq!(events, vec![Event::Terminated]);
        assert!(query::is_terminated(&session));

        let head = session.snake.head();
        events.clear();
        apply(&mut session, Command::Tick, &mut events);
        assert!(events.is_empty());
        assert_eq!(session.snake.head(), head);
    }
}
