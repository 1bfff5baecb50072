//! Side Scroller - frame-stepped core of an NES-style platformer
//!
//! Core modules:
//! - `sim`: Simulation (collision resolution, entity state machines, level loop)
//! - `renderer`: Draw-list composition handed to an external renderer
//! - `audio`: Sound cue keys and volume policy
//! - `diagnostics`: Injected structured-event sinks
//! - `progress`: Carry-over record between levels
//! - `settings`: Player preferences

pub mod audio;
pub mod diagnostics;
pub mod error;
pub mod progress;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{LayoutError, SettingsError};
pub use progress::{NextScene, Progress};
pub use settings::Settings;

/// Game configuration constants
///
/// Velocities are in pixels per frame, durations in seconds.
pub mod consts {
    /// Nominal frame time the velocity constants were tuned for
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Viewport dimensions
    pub const SCREEN_WIDTH: i32 = 800;
    pub const SCREEN_HEIGHT: i32 = 600;
    pub const GROUND_HEIGHT: i32 = SCREEN_HEIGHT - 62;

    /// Player sizes (width, height)
    pub const SMALL_SIZE: (i32, i32) = (32, 43);
    pub const BIG_SIZE: (i32, i32) = (40, 80);

    /// Player horizontal movement
    pub const WALK_ACCEL: f32 = 0.15;
    pub const RUN_ACCEL: f32 = 0.3;
    pub const TURNAROUND: f32 = 0.35;
    pub const MAX_WALK_SPEED: f32 = 6.0;
    pub const MAX_RUN_SPEED: f32 = 12.0;

    /// Player vertical movement
    pub const GRAVITY: f32 = 1.01;
    pub const JUMP_GRAVITY: f32 = 0.31;
    pub const JUMP_VEL: f32 = -10.0;
    pub const FAST_JUMP_VEL: f32 = -12.5;
    /// Horizontal speed above which jumps use `FAST_JUMP_VEL`
    pub const FAST_JUMP_THRESHOLD: f32 = 4.0;
    pub const MAX_Y_VEL: f32 = 11.0;
    pub const DEATH_JUMP_VEL: f32 = -11.0;
    pub const DEATH_GRAVITY: f32 = 0.5;
    pub const STOMP_BOUNCE_VEL: f32 = -7.0;
    /// Downward speed after striking the underside of something
    pub const HEAD_BUMP_VEL: f32 = 7.0;
    pub const HURT_NUDGE_VEL: f32 = -1.0;

    /// Player timers
    pub const SMALL_TO_BIG_DURATION: f32 = 0.7;
    pub const BIG_TO_FIRE_DURATION: f32 = 0.65;
    pub const BIG_TO_SMALL_DURATION: f32 = 0.7;
    pub const HURT_INVINCIBLE_DURATION: f32 = 2.0;
    pub const STAR_DURATION: f32 = 11.0;

    /// Hostiles
    pub const GOOMBA_SIZE: (i32, i32) = (43, 43);
    pub const KOOPA_SIZE: (i32, i32) = (43, 64);
    pub const SHELL_SIZE: (i32, i32) = (43, 38);
    pub const ENEMY_SPEED: f32 = 2.0;
    pub const ENEMY_GRAVITY: f32 = 1.5;
    pub const SHELL_SPEED: f32 = 10.0;
    pub const DYING_JUMP_VEL: f32 = -8.0;
    pub const DYING_GRAVITY: f32 = 0.5;
    pub const JUMPED_ON_DURATION: f32 = 0.5;
    /// Hostiles further than this left of the viewport are dropped
    pub const OFFSCREEN_CULL_MARGIN: i32 = 300;

    /// Blocks
    pub const BLOCK_SIZE: i32 = 43;
    pub const BUMP_VEL: f32 = -6.0;
    pub const BUMP_GRAVITY: f32 = 1.2;
    pub const SIX_COINS: u8 = 6;

    /// Items
    pub const POWERUP_SIZE: (i32, i32) = (40, 40);
    pub const REVEAL_VEL: f32 = -1.0;
    pub const MUSHROOM_SPEED: f32 = 3.0;
    pub const POWERUP_GRAVITY: f32 = 1.0;
    pub const STAR_SPEED: f32 = 5.0;
    pub const STAR_GRAVITY: f32 = 0.4;
    pub const STAR_BOUNCE_VEL: f32 = -8.0;
    pub const COIN_SIZE: (i32, i32) = (20, 28);
    pub const COIN_POP_VEL: f32 = -15.0;
    pub const COIN_GRAVITY: f32 = 1.0;
    pub const FIREBALL_SIZE: (i32, i32) = (12, 12);
    pub const FIREBALL_SPEED: f32 = 12.0;
    pub const FIREBALL_START_Y_VEL: f32 = 10.0;
    pub const FIREBALL_GRAVITY: f32 = 0.9;
    pub const FIREBALL_BOUNCE_VEL: f32 = -8.0;
    pub const MAX_FIREBALLS: usize = 2;
    pub const BRICK_PIECE_SIZE: (i32, i32) = (12, 12);
    pub const BRICK_PIECE_GRAVITY: f32 = 0.8;

    /// Collision probes
    pub const GROUND_PROBE: i32 = 5;
    pub const BRICK_TOP_PROBE: i32 = 5;
    /// Player may not walk further left than this inside the viewport
    pub const VIEWPORT_LEFT_MARGIN: i32 = 5;

    /// Scoring
    pub const STOMP_SCORE: u32 = 100;
    pub const KILL_SCORE: u32 = 100;
    pub const SHELL_SCORE: u32 = 400;
    pub const POWERUP_SCORE: u32 = 1000;
    pub const COIN_SCORE: u32 = 200;
    pub const BRICK_SCORE: u32 = 50;
    pub const TIME_BONUS: u32 = 50;

    /// Score popups
    pub const POPUP_RISE: i32 = 3;
    pub const POPUP_RISE_DISTANCE: i32 = 75;
    pub const FLAG_POPUP_CEILING: i32 = 120;

    /// Flagpole and castle sequence
    pub const FLAG_SLIDE_SPEED: f32 = 5.0;
    pub const POLE_SLIDE_SPEED: f32 = 5.0;
    pub const CASTLE_WALK_SPEED: f32 = 2.0;

    /// Level clock
    pub const TIME_UNIT_SECS: f32 = 0.4;
    pub const DEATH_SCENE_DURATION: f32 = 3.0;
    pub const FIREWORKS_DURATION: f32 = 2.0;
}

/// Round a per-frame velocity to a whole-pixel displacement
#[inline]
pub fn displacement(vel: f32) -> i32 {
    vel.round() as i32
}

/// Move `current` toward `target` by at most `step`
#[inline]
pub fn approach(current: f32, target: f32, step: f32) -> f32 {
    if current < target {
        (current + step).min(target)
    } else {
        (current - step).max(target)
    }
}
