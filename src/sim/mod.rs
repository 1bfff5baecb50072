//! Simulation module
//!
//! All gameplay logic lives here. This module is pure:
//! - Frame-stepped only, through [`tick`]
//! - Stable iteration order (collections are `Vec`s in spawn order)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod enemy;
pub mod entity;
pub mod flagpole;
pub mod item;
pub mod layout;
pub mod level;
pub mod obstacle;
pub mod player;
pub mod rect;
pub mod score;
pub mod state;
pub mod tick;

pub use collision::{Axis, Category, CollisionOutcome, Contact};
pub use enemy::{Dying, DyingKind, Enemy, EnemyKind, Shell, ShellState};
pub use entity::{Actor, Body, Direction, FrameContext};
pub use flagpole::{FlagState, Flagpole, flag_points};
pub use item::{BrickPiece, Coin, Fireball, Powerup, PowerupKind};
pub use layout::LevelLayout;
pub use level::Level;
pub use obstacle::{BlockState, Contents, Obstacle, ObstacleKind, ObstacleRegistry};
pub use player::{Player, PlayerState};
pub use rect::Rect;
pub use score::{PopupValue, ScorePopup};
pub use state::{
    Checkpoint, CollisionRecord, GameEvent, GamePhase, LevelOutcome, Trigger, World,
};
pub use tick::{TickInput, tick};
