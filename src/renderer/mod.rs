//! Draw-list composition
//!
//! The crate does not draw. [`compose`] turns a [`World`] into an ordered
//! list of sprites in screen space; the host renderer blits them in order.

pub mod sprites;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::sim::{PopupValue, Rect, World};

/// Back-to-front layers, in draw order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DrawLayer {
    /// Powerups and the player's fireballs
    Powerups,
    Coins,
    Bricks,
    ItemBoxes,
    Dying,
    Shells,
    Hostiles,
    Player,
    Flagpole,
    Debris,
    /// Score popups; drawn over everything
    Overlay,
}

/// What to draw
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Visual {
    Sprite(&'static str),
    /// Score popup text
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawItem {
    pub layer: DrawLayer,
    pub visual: Visual,
    /// Destination in screen pixels
    pub rect: Rect,
}

/// Everything visible this frame, in draw order
pub fn compose(world: &World) -> Vec<DrawItem> {
    let view = world.viewport;
    let mut items = Vec::new();
    let mut push = |layer: DrawLayer, key: &'static str, rect: Rect| {
        if rect.intersects(&view) {
            items.push(DrawItem {
                layer,
                visual: Visual::Sprite(key),
                rect: rect.offset(-view.x, -view.y),
            });
        }
    };

    for p in world.powerups.iter().filter(|p| p.alive) {
        push(DrawLayer::Powerups, sprites::powerup(p.kind), p.body.rect());
    }
    for f in world.player.fireballs.iter().filter(|f| f.alive) {
        push(DrawLayer::Powerups, "fireball", f.body.rect());
    }
    for c in world.coins.iter().filter(|c| c.alive) {
        push(DrawLayer::Coins, sprites::coin(c), c.body.rect());
    }
    for b in world.obstacles.bricks.iter().filter(|b| b.alive) {
        push(DrawLayer::Bricks, sprites::block(b), b.rect);
    }
    for b in &world.obstacles.item_boxes {
        push(DrawLayer::ItemBoxes, sprites::block(b), b.rect);
    }
    for d in world.dying.iter().filter(|d| d.alive) {
        push(DrawLayer::Dying, sprites::dying(d), d.body.rect());
    }
    for s in world.shells.iter().filter(|s| s.alive) {
        push(DrawLayer::Shells, sprites::shell(s), s.body.rect());
    }
    for e in world.enemies.iter().filter(|e| e.alive) {
        push(DrawLayer::Hostiles, sprites::enemy(e), e.body.rect());
    }
    if !world.player.in_castle {
        push(DrawLayer::Player, sprites::player(&world.player), world.player.body.rect());
    }
    push(DrawLayer::Flagpole, "pole", world.flagpole.pole);
    push(DrawLayer::Flagpole, "flag", world.flagpole.flag);
    for piece in world.debris.iter().filter(|p| p.alive) {
        push(DrawLayer::Debris, "brick_piece", piece.body.rect());
    }

    for popup in world.popups.iter().filter(|p| p.alive) {
        let text = match popup.value {
            PopupValue::Points(points) => points.to_string(),
            PopupValue::OneUp => "1UP".to_string(),
        };
        let at = popup.pos - IVec2::new(view.x, view.y);
        items.push(DrawItem {
            layer: DrawLayer::Overlay,
            visual: Visual::Text(text),
            rect: Rect::new(at.x, at.y, 0, 0),
        });
    }

    items
}
