//! Sprite keys for entity states
//!
//! The host's asset loader maps these keys to frames. Keys only depend on
//! state, never on time, so the same world always yields the same list.

use crate::sim::{
    BlockState, Coin, Direction, Dying, DyingKind, Enemy, EnemyKind, Obstacle, ObstacleKind, Player,
    PlayerState, PowerupKind, Shell,
};
use crate::sim::enemy::DyingState;
use crate::sim::item::CoinState;

/// Rows: small, big, fire. Columns: stand, walk, jump, pole.
const PLAYER_KEYS: [[&str; 4]; 3] = [
    ["player_small_stand", "player_small_walk", "player_small_jump", "player_small_pole"],
    ["player_big_stand", "player_big_walk", "player_big_jump", "player_big_pole"],
    ["player_fire_stand", "player_fire_walk", "player_fire_jump", "player_fire_pole"],
];

pub fn player(player: &Player) -> &'static str {
    let power = match (player.big, player.fire) {
        (_, true) => 2,
        (true, false) => 1,
        (false, false) => 0,
    };
    let pose = match player.state {
        PlayerState::Stand | PlayerState::InCastle => 0,
        PlayerState::Walk | PlayerState::Run | PlayerState::WalkingToCastle => 1,
        PlayerState::Jump | PlayerState::Fall | PlayerState::EndOfLevelFall => 2,
        PlayerState::Flagpole => 3,
        PlayerState::SmallToBig | PlayerState::BigToFire | PlayerState::BigToSmall => {
            return "player_transition";
        }
        PlayerState::DeathJump => return "player_dead",
    };
    PLAYER_KEYS[power][pose]
}

pub fn enemy(enemy: &Enemy) -> &'static str {
    match enemy.kind {
        EnemyKind::Goomba => "goomba_walk",
        EnemyKind::Koopa => match enemy.body.direction {
            Direction::Left => "koopa_walk_left",
            Direction::Right => "koopa_walk_right",
        },
    }
}

pub fn shell(_shell: &Shell) -> &'static str {
    "koopa_shell"
}

pub fn dying(dying: &Dying) -> &'static str {
    match (dying.kind, dying.state) {
        (DyingKind::Goomba, DyingState::JumpedOn { .. }) => "goomba_squashed",
        (DyingKind::Goomba, DyingState::DeathJump) => "goomba_flipped",
        (DyingKind::Koopa, _) => "koopa_flipped",
        (DyingKind::Shell, _) => "shell_flipped",
    }
}

pub fn powerup(kind: PowerupKind) -> &'static str {
    match kind {
        PowerupKind::Mushroom => "mushroom",
        PowerupKind::FireFlower => "fire_flower",
        PowerupKind::Star => "star",
        PowerupKind::LifeMushroom => "life_mushroom",
    }
}

pub fn coin(coin: &Coin) -> &'static str {
    match coin.state {
        CoinState::Resting => "coin",
        CoinState::Spinning { .. } => "coin_spin",
    }
}

pub fn block(block: &Obstacle) -> &'static str {
    match (block.kind, block.state) {
        (_, BlockState::Opened) => "block_opened",
        (ObstacleKind::ItemBox, _) => "item_box",
        _ => "brick",
    }
}
