//! Floating score popups

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// What a popup shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PopupValue {
    Points(u32),
    OneUp,
}

/// A number that drifts upward from where points were earned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorePopup {
    /// Level position of the popup's top-left corner
    pub pos: IVec2,
    pub value: PopupValue,
    origin_y: i32,
    /// Flag popups climb to a fixed height and stay there
    ceiling: Option<i32>,
    pub alive: bool,
}

impl ScorePopup {
    pub fn new(pos: IVec2, value: PopupValue) -> Self {
        Self {
            pos,
            value,
            origin_y: pos.y,
            ceiling: None,
            alive: true,
        }
    }

    /// Popup awarded for grabbing the flagpole
    pub fn flag(pos: IVec2, points: u32) -> Self {
        Self {
            ceiling: Some(FLAG_POPUP_CEILING),
            ..Self::new(pos, PopupValue::Points(points))
        }
    }

    pub fn advance(&mut self) {
        match self.ceiling {
            Some(ceiling) => {
                self.pos.y = (self.pos.y - POPUP_RISE).max(ceiling);
            }
            None => {
                self.pos.y -= POPUP_RISE;
                if self.origin_y - self.pos.y >= POPUP_RISE_DISTANCE {
                    self.alive = false;
                }
            }
        }
    }
}
