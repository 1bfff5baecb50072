//! Per-frame level update
//!
//! One call to [`tick`] advances the level by one frame. The phase decides
//! which path runs: the full update while playing, a reduced one while the
//! world is frozen, and the scripted end-of-level sequences.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::collision::{resolve_enemies, resolve_fireballs, resolve_player, resolve_powerups, resolve_shells};
use super::entity::{Actor, FrameContext};
use super::flagpole::flag_points;
use super::player::PlayerState;
use super::score::ScorePopup;
use super::state::{GameEvent, GamePhase, LevelOutcome, Trigger, World};
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::displacement;

/// Buttons held during a frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    /// Run, and throw fireballs when powered up
    pub action: bool,
}

/// Advance the level by one frame of `dt` seconds
pub fn tick(world: &mut World, input: &TickInput, dt: f32) {
    world.events.clear();
    world.frame += 1;

    let ctx = FrameContext {
        dt,
        viewport: world.viewport,
        input: *input,
    };

    match world.phase {
        GamePhase::Playing => update_playing(world, &ctx),
        GamePhase::Frozen => update_frozen(world, &ctx),
        GamePhase::InCastle => update_in_castle(world),
        GamePhase::FlagAndFireworks => update_fireworks(world, dt),
        GamePhase::Finished(_) => {}
    }
}

fn update_playing(world: &mut World, ctx: &FrameContext) {
    // Player first; everything else reacts to where it ends up
    advance_player(world, ctx);
    advance_popups(world);
    world.flagpole.advance();
    check_checkpoints(world);
    advance_entities(world, ctx);

    resolve_player(world);
    resolve_enemies(world);
    resolve_shells(world);
    resolve_powerups(world);
    resolve_fireballs(world);
    advance_flag_sequence(world);

    world.cull();
    update_camera(world);
    run_clock(world, ctx.dt);
    check_level_end(world);
}

/// Only the player and the popups move while a transition or death plays out
fn update_frozen(world: &mut World, ctx: &FrameContext) {
    advance_player(world, ctx);
    advance_popups(world);
    world.popups.retain(|p| p.alive);

    if world.player.dead {
        world.phase_timer += ctx.dt;
        if world.phase_timer >= DEATH_SCENE_DURATION {
            world.set_phase(GamePhase::Finished(LevelOutcome::Died));
        }
    } else if !world.player.state.is_transition() {
        world.set_phase(GamePhase::Playing);
    }
}

/// Count the remaining time down into the score
fn update_in_castle(world: &mut World) {
    advance_popups(world);
    world.popups.retain(|p| p.alive);

    if world.time_left > 0 {
        world.time_left -= 1;
        world.score += TIME_BONUS;
        world.sound(SoundEffect::CountDown);
    } else {
        world.phase_timer = 0.0;
        world.set_phase(GamePhase::FlagAndFireworks);
    }
}

fn update_fireworks(world: &mut World, dt: f32) {
    advance_popups(world);
    world.phase_timer += dt;
    if world.phase_timer >= FIREWORKS_DURATION {
        world.set_phase(GamePhase::Finished(LevelOutcome::Cleared));
    }
}

fn advance_player(world: &mut World, ctx: &FrameContext) {
    world.player.advance(ctx);
    for effect in world.player.take_sounds() {
        world.events.push(GameEvent::Sound(effect));
    }
}

fn advance_popups(world: &mut World) {
    for popup in &mut world.popups {
        popup.advance();
    }
}

/// Fire every checkpoint the player overlaps, once
fn check_checkpoints(world: &mut World) {
    let player = world.player.body.rect();
    let (fired, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut world.checkpoints)
        .into_iter()
        .partition(|c| c.rect.intersects(&player));
    world.checkpoints = pending;

    for checkpoint in fired {
        log::debug!("Checkpoint '{}' fired at x={}", checkpoint.name, player.x);
        match checkpoint.trigger {
            Trigger::EnemyGroup(group) => {
                if let Some(members) = world.enemy_groups.get_mut(group) {
                    world.enemies.append(members);
                }
            }
            Trigger::Flagpole => start_flag_sequence(world),
        }
        world.events.push(GameEvent::CheckpointFired(checkpoint.name));
    }
}

fn start_flag_sequence(world: &mut World) {
    if world.player.state.is_level_end() || world.player.dead {
        return;
    }
    let rect = world.player.body.rect();
    let points = flag_points(rect.bottom());
    world.score += points;
    world
        .popups
        .push(ScorePopup::flag(IVec2::new(rect.centerx(), rect.bottom()), points));
    world.player.grab_pole(world.flagpole.pole);
    world.flagpole.start_slide();
    world.sound(SoundEffect::Flagpole);
    log::info!("Flagpole grabbed at bottom={} for {} points", rect.bottom(), points);
}

/// Hop off the pole once the flag is down; enter the castle at the door
fn advance_flag_sequence(world: &mut World) {
    match world.player.state {
        PlayerState::Flagpole if world.flagpole.is_lowered() && world.player.is_on_pole_base() => {
            world.player.leave_pole(world.flagpole.pole);
        }
        PlayerState::WalkingToCastle if world.player.body.rect().left() >= world.castle_door_x => {
            world.player.enter_castle();
            world.set_phase(GamePhase::InCastle);
        }
        _ => {}
    }
}

fn advance_live<A: Actor>(actors: &mut [A], ctx: &FrameContext) {
    for actor in actors.iter_mut().filter(|a| a.is_alive()) {
        actor.advance(ctx);
    }
}

/// Per-frame motion of everything except the player
fn advance_entities(world: &mut World, ctx: &FrameContext) {
    advance_live(&mut world.enemies, ctx);
    advance_live(&mut world.dying, ctx);
    advance_live(&mut world.shells, ctx);

    let mut released = Vec::new();
    for block in world
        .obstacles
        .bricks
        .iter_mut()
        .chain(world.obstacles.item_boxes.iter_mut())
    {
        if let Some(release) = block.advance() {
            released.push((block.rect, release));
        }
    }
    for (rect, release) in released {
        world.release_from_block(rect, release);
    }

    advance_live(&mut world.powerups, ctx);
    advance_live(&mut world.coins, ctx);
    advance_live(&mut world.debris, ctx);
    advance_live(&mut world.player.fireballs, ctx);
}

/// Scroll right once the player passes a third of the screen, left when
/// the player is left of centre
fn update_camera(world: &mut World) {
    let rect = world.player.body.rect();
    let vel = world.player.body.vel.x;
    let view = &mut world.viewport;
    let third = view.x + view.width / 3;

    if vel > 0.0 && rect.centerx() >= third {
        view.x += displacement(vel);
    } else if vel < 0.0 && rect.x < view.centerx() {
        view.x += displacement(vel);
    }
    view.x = view.x.clamp(0, (world.level_width - view.width).max(0));
}

fn run_clock(world: &mut World, dt: f32) {
    if world.player.state.is_level_end() || world.player.dead {
        return;
    }
    world.clock += dt;
    while world.clock >= TIME_UNIT_SECS {
        world.clock -= TIME_UNIT_SECS;
        world.time_left = world.time_left.saturating_sub(1);
    }
}

fn check_level_end(world: &mut World) {
    let player = &mut world.player;

    if !player.dead && !player.state.is_level_end() {
        if player.body.rect().top() > world.viewport.bottom() {
            log::info!("Player fell out of the level at x={}", player.body.pos.x);
            player.start_death_jump();
        } else if world.time_left == 0 {
            log::info!("Level clock ran out");
            player.start_death_jump();
        }
    }

    if player.dead {
        for effect in player.take_sounds() {
            world.events.push(GameEvent::Sound(effect));
        }
        world.phase_timer = 0.0;
        world.set_phase(GamePhase::Frozen);
    } else if player.state.is_transition() {
        world.set_phase(GamePhase::Frozen);
    }
}
