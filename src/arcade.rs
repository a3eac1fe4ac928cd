//! Arcade controller
//!
//! Owns the page-level routing between the home screen and the three games,
//! the currently running session and the host's listener callbacks. One
//! session runs at a time; selecting another game replaces it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::frame::{SceneFrame, maze_frame, rings_frame, runner_frame};
use crate::input::Direction;
use crate::maze::MazeBrain;
use crate::rings::RingsGame;
use crate::settings::ArcadeSettings;
use crate::sim::events::{GameEvent, Output};
use crate::sim::state::RunnerState;
use crate::sim::tick::{TickInput, tick};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    StarshipRun,
    MazeBrain,
    DoughnutStars,
}

impl GameKind {
    pub const ALL: [GameKind; 3] = [GameKind::StarshipRun, GameKind::MazeBrain, GameKind::DoughnutStars];

    /// Id of the home screen button that starts this game
    pub fn button_id(self) -> &'static str {
        match self {
            GameKind::StarshipRun => "gameOne",
            GameKind::MazeBrain => "gameTwo",
            GameKind::DoughnutStars => "gameThree",
        }
    }

    /// Id of the element the game renders into
    pub fn container_id(self) -> &'static str {
        match self {
            GameKind::StarshipRun => "world",
            GameKind::MazeBrain => "maze-world",
            GameKind::DoughnutStars => "doughnut-world",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            GameKind::StarshipRun => "Starship Run",
            GameKind::MazeBrain => "Maze Brain",
            GameKind::DoughnutStars => "Doughnut Stars",
        }
    }
}

/// Which parts of the page are visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Screen {
    /// Game picker shown on the home screen
    pub arcade_area: bool,
    pub home_controls: bool,
    pub game_controls: bool,
    /// Container of the running game, if any
    pub game: Option<GameKind>,
}

impl Screen {
    pub fn home() -> Self {
        Self {
            arcade_area: true,
            home_controls: true,
            game_controls: false,
            game: None,
        }
    }

    pub fn playing(kind: GameKind) -> Self {
        Self {
            arcade_area: false,
            home_controls: false,
            game_controls: true,
            game: Some(kind),
        }
    }

    pub fn is_container_visible(&self, kind: GameKind) -> bool {
        self.game == Some(kind)
    }
}

/// A running game, owned by whoever started it
#[derive(Debug)]
pub enum Session {
    Runner {
        state: Box<RunnerState>,
        /// Keys pressed since the last tick
        pending: TickInput,
    },
    Maze(Box<MazeBrain>),
    Rings(RingsGame),
}

impl Session {
    /// Start a fresh game of `kind` configured from `settings`
    pub fn start(kind: GameKind, settings: &ArcadeSettings) -> Self {
        let seed = settings.resolve_seed();
        log::info!("Starting {} (seed {})", kind.title(), seed);
        match kind {
            GameKind::StarshipRun => Session::Runner {
                state: Box::new(RunnerState::new(seed, settings.modes())),
                pending: TickInput::default(),
            },
            GameKind::MazeBrain => {
                let mut brain = MazeBrain::new(seed, settings.touch_repeat_ticks);
                if settings.face_control {
                    brain.toggle_face_control();
                }
                Session::Maze(Box::new(brain))
            }
            GameKind::DoughnutStars => Session::Rings(RingsGame::new(seed)),
        }
    }

    pub fn kind(&self) -> GameKind {
        match self {
            Session::Runner { .. } => GameKind::StarshipRun,
            Session::Maze(_) => GameKind::MazeBrain,
            Session::Rings(_) => GameKind::DoughnutStars,
        }
    }

    /// Advance one fixed step
    pub fn tick(&mut self) {
        match self {
            Session::Runner { state, pending } => {
                let input = std::mem::take(pending);
                tick(state, &input);
            }
            Session::Maze(brain) => brain.tick(),
            Session::Rings(game) => game.tick(),
        }
    }

    /// Route a keyboard key code
    pub fn key(&mut self, code: u32) {
        match self {
            Session::Runner { pending, .. } => pending.pressed.push(code),
            Session::Maze(brain) => brain.key(code),
            Session::Rings(game) => game.key(code),
        }
    }

    /// On-screen arrow button click
    pub fn press(&mut self, direction: Direction) {
        match self {
            Session::Maze(brain) => brain.press(direction),
            Session::Rings(game) => game.nudge(direction),
            Session::Runner { .. } => self.key(direction.key_code()),
        }
    }

    /// Arrow button held down (maze only; others treat it as one press)
    pub fn touch_start(&mut self, direction: Direction) {
        match self {
            Session::Maze(brain) => brain.touch_start(direction),
            _ => self.press(direction),
        }
    }

    pub fn touch_end(&mut self) {
        if let Session::Maze(brain) = self {
            brain.touch_end();
        }
    }

    /// Hand tracking result for the rings game
    pub fn hand(&mut self, wrist: glam::Vec2) {
        if let Session::Rings(game) = self {
            game.set_hand(wrist);
        }
    }

    /// Face detection result for the maze
    pub fn face(&mut self, center_x: f32, frame_width: f32) {
        if let Session::Maze(brain) = self {
            brain.face_detected(center_x, frame_width);
        }
    }

    /// Geometry and view to draw right now
    pub fn frame(&self) -> SceneFrame {
        match self {
            Session::Runner { state, .. } => runner_frame(state),
            Session::Maze(brain) => maze_frame(brain),
            Session::Rings(game) => rings_frame(game),
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        match self {
            Session::Runner { state, .. } => state.drain_events(),
            Session::Maze(brain) => brain.drain_events(),
            Session::Rings(game) => game.drain_events(),
        }
    }
}

type Slot<T> = Option<Box<dyn FnMut(T)>>;

/// Host callbacks, one named slot per event kind
#[derive(Default)]
pub struct Listeners {
    on_pause: Slot<()>,
    on_resume: Slot<()>,
    on_score_changed: Slot<u64>,
    on_collision: Slot<Output>,
    output: Slot<Output>,
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("on_pause", &self.on_pause.is_some())
            .field("on_resume", &self.on_resume.is_some())
            .field("on_score_changed", &self.on_score_changed.is_some())
            .field("on_collision", &self.on_collision.is_some())
            .field("output", &self.output.is_some())
            .finish()
    }
}

impl Listeners {
    pub fn on_pause(&mut self, f: impl FnMut(()) + 'static) {
        self.on_pause = Some(Box::new(f));
    }

    pub fn on_resume(&mut self, f: impl FnMut(()) + 'static) {
        self.on_resume = Some(Box::new(f));
    }

    pub fn on_score_changed(&mut self, f: impl FnMut(u64) + 'static) {
        self.on_score_changed = Some(Box::new(f));
    }

    pub fn on_collision(&mut self, f: impl FnMut(Output) + 'static) {
        self.on_collision = Some(Box::new(f));
    }

    pub fn output(&mut self, f: impl FnMut(Output) + 'static) {
        self.output = Some(Box::new(f));
    }

    /// Route an event to its slot; unset slots drop it
    pub fn dispatch(&mut self, event: GameEvent) {
        match event {
            GameEvent::Paused => fire(&mut self.on_pause, ()),
            GameEvent::Resumed => fire(&mut self.on_resume, ()),
            GameEvent::Score(score) => fire(&mut self.on_score_changed, score),
            GameEvent::Collision(out) => fire(&mut self.on_collision, out),
            GameEvent::Output(out) => fire(&mut self.output, out),
        }
    }
}

fn fire<T>(slot: &mut Slot<T>, value: T) {
    if let Some(callback) = slot.as_mut() {
        callback(value);
    }
}

/// Page controller: screen routing plus the running session
#[derive(Debug)]
pub struct Arcade {
    pub settings: ArcadeSettings,
    pub listeners: Listeners,
    screen: Screen,
    session: Option<Session>,
    accumulator: f32,
}

impl Arcade {
    pub fn new(settings: ArcadeSettings) -> Self {
        Self {
            settings,
            listeners: Listeners::default(),
            screen: Screen::home(),
            session: None,
            accumulator: 0.0,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    /// Show `kind` and start a fresh session for it
    pub fn select(&mut self, kind: GameKind) -> &mut Session {
        if let Some(previous) = self.session.take() {
            log::info!("Replacing {} with {}", previous.kind().title(), kind.title());
        }
        self.screen = Screen::playing(kind);
        self.accumulator = 0.0;
        let session = self.session.insert(Session::start(kind, &self.settings));
        // Startup messages reach the host before the first frame
        for event in session.drain_events() {
            self.listeners.dispatch(event);
        }
        session
    }

    /// Tear down the running session and go back home
    pub fn stop(&mut self) -> Option<Session> {
        self.screen = Screen::home();
        self.accumulator = 0.0;
        let session = self.session.take();
        if let Some(session) = &session {
            log::info!("Stopped {}", session.kind().title());
        }
        session
    }

    /// Flip maze face control and remember the choice
    ///
    /// Returns the new state, or `None` when no maze is running.
    pub fn toggle_face_control(&mut self) -> Option<bool> {
        let Some(Session::Maze(brain)) = self.session.as_mut() else {
            return None;
        };
        let enabled = brain.toggle_face_control();
        self.settings.face_control = enabled;
        self.settings.save();
        Some(enabled)
    }

    /// Run as many fixed steps as `dt` seconds cover, then dispatch events
    ///
    /// Returns the number of ticks run.
    pub fn advance(&mut self, dt: f32) -> u32 {
        let Some(session) = self.session.as_mut() else {
            return 0;
        };

        self.accumulator += dt.clamp(0.0, 0.1);
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            session.tick();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        for event in session.drain_events() {
            self.listeners.dispatch(event);
        }
        substeps
    }
}
