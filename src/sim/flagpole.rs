//! End-of-level flagpole
//!
//! The flag hangs at the top of the pole until the player grabs it, then
//! slides to the bottom. The player's grab height decides the bonus.

use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;
use crate::displacement;

pub const POLE_WIDTH: i32 = 10;
pub const FLAG_SIZE: (i32, i32) = (40, 40);

/// Grab height bands (player bottom strictly above the threshold) and bonus
const FLAG_BANDS: [(i32, u32); 4] = [(200, 5000), (300, 2000), (370, 800), (430, 400)];
const FLAG_BASE_POINTS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlagState {
    #[default]
    Top,
    Sliding,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flagpole {
    pub pole: Rect,
    pub flag: Rect,
    pub state: FlagState,
    /// Bottom edge of the flag once lowered
    flag_bottom: i32,
}

impl Flagpole {
    /// Pole at `x` spanning `top..pole_bottom`; flag hangs left of the pole
    pub fn new(x: i32, top: i32, flag_bottom: i32, pole_bottom: i32) -> Self {
        Self {
            pole: Rect::new(x, top, POLE_WIDTH, pole_bottom - top),
            flag: Rect::new(x - FLAG_SIZE.0 + POLE_WIDTH / 2, top, FLAG_SIZE.0, FLAG_SIZE.1),
            state: FlagState::Top,
            flag_bottom,
        }
    }

    pub fn pole_bottom(&self) -> i32 {
        self.pole.bottom()
    }

    pub fn start_slide(&mut self) {
        if self.state == FlagState::Top {
            self.state = FlagState::Sliding;
        }
    }

    pub fn is_lowered(&self) -> bool {
        self.state == FlagState::Bottom
    }

    pub fn advance(&mut self) {
        if self.state != FlagState::Sliding {
            return;
        }
        self.flag.y += displacement(FLAG_SLIDE_SPEED);
        if self.flag.bottom() >= self.flag_bottom {
            self.flag.y = self.flag_bottom - self.flag.height;
            self.state = FlagState::Bottom;
        }
    }
}

/// Bonus for grabbing the pole with the player's feet at `player_bottom`
pub fn flag_points(player_bottom: i32) -> u32 {
    FLAG_BANDS
        .iter()
        .find(|(limit, _)| player_bottom < *limit)
        .map(|&(_, points)| points)
        .unwrap_or(FLAG_BASE_POINTS)
}
