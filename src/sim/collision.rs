//! Collision resolution
//!
//! Movers integrate one axis at a time. After each axis the mover's rect is
//! tested against the collider categories in a fixed priority order; only
//! the first category with an overlap is resolved. Solid categories push the
//! mover out, the rest are reported back so the mover's pass can apply the
//! game rule (stomp, pickup, kill...).

use serde::{Deserialize, Serialize};

use super::enemy::{Enemy, EnemyKind, Shell};
use super::entity::{Body, Direction};
use super::item::{BrickPiece, Coin, Powerup, PowerupKind};
use super::obstacle::{BlockState, Contents, ObstacleRegistry};
use super::player::PlayerState;
use super::rect::Rect;
use super::state::World;
use crate::audio::SoundEffect;
use crate::consts::*;

/// Integration axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn as_str(self) -> &'static str {
        match self {
            Axis::Horizontal => "horizontal",
            Axis::Vertical => "vertical",
        }
    }
}

/// Collider categories, in no particular order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    ItemBox,
    Brick,
    /// Ground, pipes and steps
    Terrain,
    Enemy,
    Shell,
    Powerup,
    Coin,
}

impl Category {
    /// Solid categories push movers out; the others only report contact
    pub fn is_solid(self) -> bool {
        matches!(self, Category::ItemBox | Category::Brick | Category::Terrain)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::ItemBox => "item_box",
            Category::Brick => "brick",
            Category::Terrain => "terrain",
            Category::Enemy => "enemy",
            Category::Shell => "shell",
            Category::Powerup => "powerup",
            Category::Coin => "coin",
        }
    }
}

/// Per-mover category priority lists
pub mod order {
    use super::Category::{self, *};

    pub const PLAYER_X: &[Category] = &[ItemBox, Brick, Terrain, Enemy, Shell, Powerup, Coin];
    pub const PLAYER_Y: &[Category] = &[ItemBox, Brick, Terrain, Enemy, Shell];
    pub const ENEMY_X: &[Category] = &[Terrain, Brick, ItemBox, Enemy, Shell];
    pub const ENEMY_Y: &[Category] = &[Terrain, Brick, ItemBox];
    pub const SHELL_X: &[Category] = &[Terrain, Brick, ItemBox, Enemy];
    pub const SHELL_Y: &[Category] = &[Terrain, Brick, ItemBox];
    /// Mushrooms and 1-ups, both axes
    pub const POWERUP: &[Category] = &[Terrain, Brick, ItemBox];
    pub const STAR_Y: &[Category] = &[Terrain, Brick, ItemBox];
    pub const FIREBALL_X: &[Category] = &[Terrain, Brick, ItemBox, Enemy, Shell];
    pub const FIREBALL_Y: &[Category] = &[Terrain, Brick, ItemBox];
    /// What counts as floor for the ground probe
    pub const FLOOR: &[Category] = &[Terrain, Brick, ItemBox];
}

/// The collider a mover ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub category: Category,
    /// Index into the category's collection
    pub index: usize,
    /// Collider bounds at the time of contact
    pub rect: Rect,
}

/// Result of resolving one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionOutcome {
    Clear,
    /// Pushed out sideways, x velocity zeroed
    Blocked(Contact),
    /// Snapped onto the top of a solid, y velocity zeroed
    Landed(Contact),
    /// Snapped under the bottom of a solid, sent downward
    HeadBump(Contact),
    /// Overlapping a non-solid; the caller decides what happens
    Touched(Contact),
}

impl CollisionOutcome {
    pub fn contact(&self) -> Option<&Contact> {
        match self {
            CollisionOutcome::Clear => None,
            CollisionOutcome::Blocked(c)
            | CollisionOutcome::Landed(c)
            | CollisionOutcome::HeadBump(c)
            | CollisionOutcome::Touched(c) => Some(c),
        }
    }
}

/// Read-only view of everything a mover can collide with
pub struct Colliders<'a> {
    pub obstacles: &'a ObstacleRegistry,
    pub enemies: &'a [Enemy],
    pub shells: &'a [Shell],
    pub powerups: &'a [Powerup],
    pub coins: &'a [Coin],
}

/// Borrow the collider collections of a world field by field, leaving the
/// player and the rest of the world free for mutation.
macro_rules! colliders {
    ($world:expr) => {
        Colliders {
            obstacles: &$world.obstacles,
            enemies: &$world.enemies,
            shells: &$world.shells,
            powerups: &$world.powerups,
            coins: &$world.coins,
        }
    };
}
pub(crate) use colliders;

fn first<T>(
    items: &[T],
    rect: &Rect,
    skip: Option<usize>,
    live_rect: impl Fn(&T) -> Option<Rect>,
) -> Option<(usize, Rect)> {
    items
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != skip)
        .find_map(|(i, item)| {
            live_rect(item)
                .filter(|r| r.intersects(rect))
                .map(|r| (i, r))
        })
}

impl Colliders<'_> {
    /// First live collider of `category` overlapping `rect`
    pub fn first_hit(
        &self,
        rect: &Rect,
        category: Category,
        exclude: Option<(Category, usize)>,
    ) -> Option<Contact> {
        let skip = exclude.and_then(|(c, i)| (c == category).then_some(i));
        let hit = match category {
            Category::Terrain | Category::Brick | Category::ItemBox => {
                first(self.obstacles.category(category), rect, skip, |o| {
                    o.alive.then_some(o.rect)
                })
            }
            Category::Enemy => first(self.enemies, rect, skip, |e| e.alive.then(|| e.body.rect())),
            Category::Shell => first(self.shells, rect, skip, |s| s.alive.then(|| s.body.rect())),
            Category::Powerup => first(self.powerups, rect, skip, |p| p.alive.then(|| p.body.rect())),
            Category::Coin => first(self.coins, rect, skip, |c| {
                c.is_collectible().then(|| c.body.rect())
            }),
        };
        hit.map(|(index, rect)| Contact {
            category,
            index,
            rect,
        })
    }

    /// First hit walking `order`; later categories are not consulted
    pub fn first_in_order(
        &self,
        rect: &Rect,
        order: &[Category],
        exclude: Option<(Category, usize)>,
    ) -> Option<Contact> {
        order
            .iter()
            .find_map(|&category| self.first_hit(rect, category, exclude))
    }
}

/// Push `body` out of `obstacle` along x toward the side it came from
pub fn push_out_x(body: &mut Body, obstacle: Rect) {
    if body.pos.x < obstacle.x {
        body.set_right(obstacle.left());
    } else {
        body.set_left(obstacle.right());
    }
}

/// Resolve one axis for a mover that has already been integrated on it.
///
/// `prev_rect` is the mover's rect before integration on this axis and
/// decides landing versus head bump. `exclude` keeps a mover from colliding
/// with itself when it is also a collider.
pub fn resolve(
    body: &mut Body,
    prev_rect: Rect,
    axis: Axis,
    colliders: &Colliders<'_>,
    order: &[Category],
    exclude: Option<(Category, usize)>,
) -> CollisionOutcome {
    let Some(contact) = colliders.first_in_order(&body.rect(), order, exclude) else {
        return CollisionOutcome::Clear;
    };
    if !contact.category.is_solid() {
        return CollisionOutcome::Touched(contact);
    }

    let other = contact.rect;
    match axis {
        Axis::Horizontal => {
            push_out_x(body, other);
            body.vel.x = 0.0;
            CollisionOutcome::Blocked(contact)
        }
        Axis::Vertical => {
            let from_above = if prev_rect.bottom() <= other.top() {
                true
            } else if prev_rect.top() >= other.bottom() {
                false
            } else {
                body.rect().top() <= other.top()
            };
            if from_above {
                body.set_bottom(other.top());
                body.vel.y = 0.0;
                CollisionOutcome::Landed(contact)
            } else {
                body.set_top(other.bottom());
                body.vel.y = HEAD_BUMP_VEL;
                CollisionOutcome::HeadBump(contact)
            }
        }
    }
}

/// Something solid lies within a few pixels below `rect`
pub fn ground_probe(rect: Rect, colliders: &Colliders<'_>) -> bool {
    colliders
        .first_in_order(&rect.offset(0, GROUND_PROBE), order::FLOOR, None)
        .is_some()
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// Move the player one frame and apply whatever it runs into
pub fn resolve_player(world: &mut World) {
    if world.player.state.ignores_collisions() {
        return;
    }

    let prev = world.player.body.rect();
    world.player.body.step_x();
    let outcome = {
        let colliders = colliders!(world);
        resolve(&mut world.player.body, prev, Axis::Horizontal, &colliders, order::PLAYER_X, None)
    };
    world.record_collision(Axis::Horizontal, &outcome);
    if let CollisionOutcome::Touched(contact) = outcome {
        player_touch_x(world, contact);
    }

    if !world.player.state.skips_vertical() {
        let prev = world.player.body.rect();
        world.player.body.step_y();
        let outcome = {
            let colliders = colliders!(world);
            resolve(&mut world.player.body, prev, Axis::Vertical, &colliders, order::PLAYER_Y, None)
        };
        world.record_collision(Axis::Vertical, &outcome);
        match outcome {
            CollisionOutcome::Landed(_) => world.player.land(),
            CollisionOutcome::HeadBump(contact) => {
                world.player.head_bump();
                strike_block(world, contact);
            }
            CollisionOutcome::Touched(contact) if world.player.body.vel.y > 0.0 => {
                player_stomp(world, contact);
            }
            _ => {}
        }

        let grounded = {
            let colliders = colliders!(world);
            ground_probe(world.player.body.rect(), &colliders)
        };
        if !grounded {
            world.player.start_fall();
        }
    }

    let min_x = world.viewport.x + VIEWPORT_LEFT_MARGIN;
    if world.player.body.pos.x < min_x {
        world.player.body.set_left(min_x);
    }
}

/// A hostile touched the player from the side
fn hurt_player(world: &mut World) {
    if world.player.big {
        world.sound(SoundEffect::Pipe);
        world.player.shrink();
        world.obstacles.morph_contents(Contents::FireFlower, Contents::Mushroom);
    } else {
        world.player.start_death_jump();
    }
}

fn player_touch_x(world: &mut World, contact: Contact) {
    match contact.category {
        Category::Enemy => {
            if world.player.invincible {
                let facing = world.player.body.direction;
                world.kill_enemy(contact.index, facing, KILL_SCORE);
            } else if !world.player.hurt_invincible {
                hurt_player(world);
            }
        }
        Category::Shell => {
            if world.shells[contact.index].is_sliding() {
                if world.player.invincible {
                    let facing = world.player.body.direction;
                    world.kill_shell(contact.index, facing, SHELL_SCORE);
                } else if !world.player.hurt_invincible {
                    hurt_player(world);
                }
            } else {
                let direction = if world.player.body.pos.x < contact.rect.x {
                    world.player.body.set_right(contact.rect.left());
                    Direction::Right
                } else {
                    world.player.body.set_left(contact.rect.right());
                    Direction::Left
                };
                let shell = &mut world.shells[contact.index];
                shell.kick(direction);
                shell.body.step_x();
                world.sound(SoundEffect::Kick);
            }
        }
        Category::Powerup => collect_powerup(world, contact.index),
        Category::Coin => {
            world.coins[contact.index].alive = false;
            world.sound(SoundEffect::Coin);
            world.coin_total += 1;
            world.award(COIN_SCORE, contact.rect);
        }
        Category::ItemBox | Category::Brick | Category::Terrain => {
            unreachable!("solid categories never report Touched")
        }
    }
}

fn collect_powerup(world: &mut World, index: usize) {
    let powerup = &mut world.powerups[index];
    if !powerup.alive {
        return;
    }
    powerup.alive = false;
    let (kind, rect) = (powerup.kind, powerup.body.rect());

    match kind {
        PowerupKind::Mushroom | PowerupKind::FireFlower => {
            world.sound(SoundEffect::Powerup);
            world.award(POWERUP_SCORE, rect);
            let player = &mut world.player;
            if player.big && player.fire {
                world.award(POWERUP_SCORE, rect);
            } else if player.big {
                player.fire = true;
                player.start_transition(PlayerState::BigToFire);
                if kind == PowerupKind::Mushroom {
                    world.obstacles.morph_contents(Contents::Mushroom, Contents::FireFlower);
                }
            } else {
                player.start_transition(PlayerState::SmallToBig);
            }
        }
        PowerupKind::Star => {
            world.sound(SoundEffect::Powerup);
            world.award(POWERUP_SCORE, rect);
            world.player.make_invincible();
        }
        PowerupKind::LifeMushroom => {
            world.sound(SoundEffect::OneUp);
            world.award_life(rect);
        }
    }
}

/// Player came down on a hostile while falling
fn player_stomp(world: &mut World, contact: Contact) {
    match contact.category {
        Category::Enemy => {
            let enemy = &mut world.enemies[contact.index];
            if !enemy.alive {
                return;
            }
            enemy.alive = false;
            let enemy = enemy.clone();
            match enemy.kind {
                EnemyKind::Goomba => world.dying.push(enemy.into_squashed()),
                EnemyKind::Koopa => world.shells.push(enemy.shell()),
            }
            world.sound(SoundEffect::Stomp);
            world.award(STOMP_SCORE, contact.rect);
        }
        Category::Shell => {
            let player_centre = world.player.body.rect().centerx();
            let shell = &mut world.shells[contact.index];
            if shell.is_sliding() {
                shell.stop();
                world.sound(SoundEffect::Stomp);
                world.award(SHELL_SCORE, contact.rect);
            } else {
                let away = if player_centre < contact.rect.centerx() {
                    Direction::Right
                } else {
                    Direction::Left
                };
                shell.kick(away);
                world.sound(SoundEffect::Kick);
            }
        }
        Category::Powerup | Category::Coin => {
            unreachable!("player vertical order only touches hostiles")
        }
        Category::ItemBox | Category::Brick | Category::Terrain => {
            unreachable!("solid categories never report Touched")
        }
    }
    world.player.body.set_bottom(contact.rect.top());
    world.player.stomp_bounce();
}

/// Player's head struck a block from below
fn strike_block(world: &mut World, contact: Contact) {
    match contact.category {
        Category::ItemBox => {
            let block = &mut world.obstacles.item_boxes[contact.index];
            if block.state != BlockState::Resting {
                return;
            }
            let reveals_powerup = block.contents.and_then(|c| c.powerup()).is_some();
            let release = block.start_bump();
            if reveals_powerup {
                world.sound(SoundEffect::PowerupAppears);
            } else {
                world.sound(SoundEffect::Bump);
            }
            if let Some(release) = release {
                world.release_from_block(contact.rect, release);
            }
        }
        Category::Brick => {
            let block = &mut world.obstacles.bricks[contact.index];
            if block.state != BlockState::Resting {
                return;
            }
            if world.player.big {
                block.alive = false;
                smash_brick(world, contact.rect);
            } else {
                let release = block.start_bump();
                world.sound(SoundEffect::Bump);
                if let Some(release) = release {
                    world.release_from_block(contact.rect, release);
                }
            }
        }
        _ => {}
    }
}

fn smash_brick(world: &mut World, brick: Rect) {
    world.sound(SoundEffect::BrickSmash);
    world.award(BRICK_SCORE, brick);
    world.debris.extend(BrickPiece::burst(brick));

    // Anything standing on the brick goes with it
    let probe = brick.offset(0, -BRICK_TOP_PROBE);
    for i in 0..world.enemies.len() {
        if world.enemies[i].alive && world.enemies[i].body.rect().intersects(&probe) {
            world.kill_enemy(i, Direction::Right, KILL_SCORE);
        }
    }
    for i in 0..world.shells.len() {
        if world.shells[i].alive && world.shells[i].body.rect().intersects(&probe) {
            world.kill_shell(i, Direction::Right, KILL_SCORE);
        }
    }
}

// ---------------------------------------------------------------------------
// Hostiles
// ---------------------------------------------------------------------------

/// Move every live enemy and apply its contacts
pub fn resolve_enemies(world: &mut World) {
    let count = world.enemies.len();
    for i in 0..count {
        if !world.enemies[i].alive {
            continue;
        }

        let mut body = world.enemies[i].body;
        let prev = body.rect();
        body.step_x();
        let outcome = {
            let colliders = colliders!(world);
            resolve(&mut body, prev, Axis::Horizontal, &colliders, order::ENEMY_X, Some((Category::Enemy, i)))
        };
        world.enemies[i].body = body;

        match outcome {
            CollisionOutcome::Blocked(_) => world.enemies[i].turn_around(),
            CollisionOutcome::Touched(contact) if contact.category == Category::Enemy => {
                let enemy = &mut world.enemies[i];
                push_out_x(&mut enemy.body, contact.rect);
                let away = if enemy.body.rect().centerx() > contact.rect.centerx() {
                    Direction::Right
                } else {
                    Direction::Left
                };
                enemy.face(away);
            }
            CollisionOutcome::Touched(contact) if contact.category == Category::Shell => {
                enemy_meets_shell(world, i, contact.index);
            }
            _ => {}
        }

        if !world.enemies[i].alive {
            continue;
        }

        let mut body = world.enemies[i].body;
        let prev = body.rect();
        body.step_y();
        let (outcome, grounded) = {
            let colliders = colliders!(world);
            let outcome = resolve(&mut body, prev, Axis::Vertical, &colliders, order::ENEMY_Y, None);
            (outcome, ground_probe(body.rect(), &colliders))
        };
        let enemy = &mut world.enemies[i];
        enemy.body = body;
        match outcome {
            CollisionOutcome::Landed(_) => enemy.land(),
            CollisionOutcome::HeadBump(_) => enemy.start_fall(),
            _ if !grounded => enemy.start_fall(),
            _ => {}
        }

        let rect = enemy.body.rect();
        if rect.x < world.viewport.x - OFFSCREEN_CULL_MARGIN || rect.top() > world.viewport.bottom() {
            enemy.alive = false;
        }
    }
}

fn enemy_meets_shell(world: &mut World, enemy: usize, shell: usize) {
    if world.shells[shell].is_sliding() {
        let direction = world.shells[shell].body.direction;
        world.kill_enemy(enemy, direction, SHELL_SCORE);
    } else {
        let direction = world.enemies[enemy].body.direction;
        world.shells[shell].kick(direction);
        world.kill_enemy(enemy, direction, 0);
    }
}

/// Move every live shell; sliding shells knock out enemies in their path
pub fn resolve_shells(world: &mut World) {
    let count = world.shells.len();
    for i in 0..count {
        if !world.shells[i].alive {
            continue;
        }
        let was_sliding = world.shells[i].is_sliding();

        let mut body = world.shells[i].body;
        let prev = body.rect();
        body.step_x();
        let outcome = {
            let colliders = colliders!(world);
            resolve(&mut body, prev, Axis::Horizontal, &colliders, order::SHELL_X, None)
        };
        world.shells[i].body = body;

        match outcome {
            CollisionOutcome::Blocked(_) if was_sliding => {
                world.shells[i].rebound();
                world.sound(SoundEffect::Bump);
            }
            CollisionOutcome::Touched(contact) if was_sliding => {
                let direction = world.shells[i].body.direction;
                world.kill_enemy(contact.index, direction, KILL_SCORE);
            }
            _ => {}
        }

        let mut body = world.shells[i].body;
        let prev = body.rect();
        body.step_y();
        let (outcome, grounded) = {
            let colliders = colliders!(world);
            let outcome = resolve(&mut body, prev, Axis::Vertical, &colliders, order::SHELL_Y, None);
            (outcome, ground_probe(body.rect(), &colliders))
        };
        let shell = &mut world.shells[i];
        shell.body = body;
        match outcome {
            CollisionOutcome::Landed(_) => shell.land(),
            CollisionOutcome::HeadBump(_) => shell.start_fall(),
            _ if !grounded => shell.start_fall(),
            _ => {}
        }

        let rect = shell.body.rect();
        if rect.x < world.viewport.x - OFFSCREEN_CULL_MARGIN || rect.top() > world.viewport.bottom() {
            shell.alive = false;
        }
    }
}

// ---------------------------------------------------------------------------
// Items and projectiles
// ---------------------------------------------------------------------------

/// Move revealed powerups against the level geometry
pub fn resolve_powerups(world: &mut World) {
    let count = world.powerups.len();
    for i in 0..count {
        let powerup = &world.powerups[i];
        if !powerup.alive || powerup.is_revealing() || powerup.kind == PowerupKind::FireFlower {
            continue;
        }
        let walks = powerup.kind.walks();

        let mut body = powerup.body;
        let prev = body.rect();
        body.step_x();
        let outcome = if walks {
            let colliders = colliders!(world);
            resolve(&mut body, prev, Axis::Horizontal, &colliders, order::POWERUP, None)
        } else {
            CollisionOutcome::Clear
        };
        world.powerups[i].body = body;
        if let CollisionOutcome::Blocked(contact) = outcome {
            let direction = if body.pos.x < contact.rect.x {
                Direction::Left
            } else {
                Direction::Right
            };
            world.powerups[i].reverse(direction);
        }

        let mut body = world.powerups[i].body;
        let prev = body.rect();
        body.step_y();
        let y_order = if walks { order::POWERUP } else { order::STAR_Y };
        let (outcome, grounded) = {
            let colliders = colliders!(world);
            let outcome = resolve(&mut body, prev, Axis::Vertical, &colliders, y_order, None);
            (outcome, ground_probe(body.rect(), &colliders))
        };
        let powerup = &mut world.powerups[i];
        powerup.body = body;
        match outcome {
            CollisionOutcome::Landed(_) => powerup.land(),
            _ if !grounded => powerup.start_fall(),
            _ => {}
        }
    }
}

/// Move the player's fireballs; they burn the first enemy they touch
pub fn resolve_fireballs(world: &mut World) {
    let count = world.player.fireballs.len();
    for i in 0..count {
        if !world.player.fireballs[i].alive {
            continue;
        }

        let prev = world.player.fireballs[i].body.rect();
        world.player.fireballs[i].body.step_x();
        let outcome = {
            let colliders = colliders!(world);
            resolve(
                &mut world.player.fireballs[i].body,
                prev,
                Axis::Horizontal,
                &colliders,
                order::FIREBALL_X,
                None,
            )
        };
        match outcome {
            CollisionOutcome::Clear => {}
            CollisionOutcome::Touched(contact) if contact.category == Category::Enemy => {
                let direction = world.player.fireballs[i].body.direction;
                world.kill_enemy(contact.index, direction, KILL_SCORE);
                world.player.fireballs[i].alive = false;
            }
            _ => world.player.fireballs[i].alive = false,
        }
        if !world.player.fireballs[i].alive {
            continue;
        }

        let prev = world.player.fireballs[i].body.rect();
        world.player.fireballs[i].body.step_y();
        let outcome = {
            let colliders = colliders!(world);
            resolve(
                &mut world.player.fireballs[i].body,
                prev,
                Axis::Vertical,
                &colliders,
                order::FIREBALL_Y,
                None,
            )
        };
        if let CollisionOutcome::Landed(_) | CollisionOutcome::HeadBump(_) = outcome {
            world.player.fireballs[i].hit_floor();
        }
    }
}
