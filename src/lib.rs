//! Squad Invaders - a formation-combat arcade simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (formation, emitters, hit resolution, session)
//! - `highscores`: High-score store contract and implementations
//! - `settings`: Arena and runtime configuration
//! - `error`: Setup and precondition errors raised by the core

pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use error::SimError;
pub use highscores::{FileHighScores, HighScoreStore, MemoryHighScores};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Default simulation step in milliseconds (~60 Hz)
    pub const TICK_MS: u64 = 16;

    /// Default arena dimensions
    pub const SCREEN_WIDTH: f32 = 900.0;
    pub const SCREEN_HEIGHT: f32 = 550.0;

    /// Formation grid
    pub const FORMATION_ROWS: usize = 6;
    pub const FORMATION_COLS: usize = 10;
    pub const FORMATION_SIZE: usize = FORMATION_ROWS * FORMATION_COLS;
    /// Top-left unit spawn position
    pub const FORMATION_ORIGIN: (f32, f32) = (90.0, 90.0);
    pub const UNIT_WIDTH: f32 = 30.0;
    pub const UNIT_HEIGHT: f32 = 20.0;
    /// Horizontal distance between two unit origins
    pub const UNIT_SPACING_X: f32 = UNIT_WIDTH * 2.0;
    /// Vertical distance between two rows
    pub const UNIT_SPACING_Y: f32 = UNIT_HEIGHT + UNIT_HEIGHT / 4.0;
    /// Points for row 0; each lower row is worth 10 less
    pub const TOP_ROW_POINTS: u32 = 60;
    pub const ROW_POINT_STEP: u32 = 10;
    /// Points gained by every unit per wave survived
    pub const WAVE_POINT_BONUS: u32 = 2;
    /// Formation speed at session start (distance per tick)
    pub const FORMATION_BASE_SPEED: f32 = 2.0;
    /// Speed added per wave number on wave advance
    pub const FORMATION_WAVE_SPEEDUP: f32 = 0.1;
    /// Speed added every `KILLS_PER_SPEEDUP` kills
    pub const FORMATION_KILL_SPEEDUP: f32 = 0.1;
    pub const KILLS_PER_SPEEDUP: u32 = 3;
    /// Vertical shift per completed wave, and its cap
    pub const WAVE_DROP_STEP: f32 = 10.0;
    pub const WAVE_DROP_MAX_WAVES: u32 = 11;
    /// A unit whose bottom edge reaches `screen_height - BOTTOM_MARGIN` ends the run
    pub const BOTTOM_MARGIN: f32 = 60.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 20.0;
    pub const PLAYER_SPEED: f32 = 8.0;
    /// Gap between the player's bottom edge and the bottom of the arena
    pub const PLAYER_FLOOR_GAP: f32 = 30.0;
    pub const STARTING_HEALTH: i32 = 5;
    /// Score bonus per wave number reached
    pub const WAVE_SCORE_BONUS: u64 = 100;

    /// Player laser
    pub const LASER_WIDTH: f32 = 3.0;
    pub const LASER_HEIGHT: f32 = 12.0;
    pub const LASER_VELOCITY: f32 = -5.0;
    pub const LASER_DAMAGE: i32 = 1;
    pub const LASER_COOLDOWN_MS: u64 = 350;

    /// Hostile bombs (formation and bonus ship)
    pub const BOMB_WIDTH: f32 = 6.0;
    pub const BOMB_HEIGHT: f32 = 12.0;
    pub const BOMB_COOLDOWN_MS: u64 = 1500;
    pub const FORMATION_BOMB_VELOCITY: f32 = 3.0;
    pub const FORMATION_BOMB_DAMAGE: i32 = 1;
    pub const SHIP_BOMB_VELOCITY: f32 = 3.0;
    pub const SHIP_BOMB_DAMAGE: i32 = 2;
    /// Bomb velocity gained per wave number on wave advance
    pub const BOMB_WAVE_SPEEDUP: f32 = 0.05;

    /// Bonus ship
    pub const SHIP_WIDTH: f32 = 50.0;
    pub const SHIP_HEIGHT: f32 = 20.0;
    pub const SHIP_ALTITUDE: f32 = 40.0;
    pub const SHIP_BASE_SPEED: f32 = 3.0;
    pub const SHIP_BASE_POINTS: u64 = 100;
    pub const SHIP_WAVE_POINTS: u64 = 100;
    pub const SHIP_WAVE_SPEEDUP: f32 = 0.1;
    /// No further speed increase after this wave
    pub const SHIP_SPEEDUP_LAST_WAVE: u32 = 14;
    /// Seconds the ship waits offscreen before (re)entering
    pub const SHIP_REAPPEAR_SECS: (u64, u64) = (2, 10);

    /// Supply drops (heal the player on contact)
    pub const SUPPLY_WIDTH: f32 = 10.0;
    pub const SUPPLY_HEIGHT: f32 = 10.0;
    pub const SUPPLY_VELOCITY: f32 = 2.0;
    pub const SUPPLY_DAMAGE: i32 = -1;
    pub const SUPPLY_ALTITUDE: f32 = 10.0;
    pub const SUPPLY_MIN_INTERVAL_MS: u64 = 30_000;
    /// One in `SUPPLY_CHANCE` ticks launches once the interval has passed
    pub const SUPPLY_CHANCE: u32 = 1000;
}
