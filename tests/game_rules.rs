//! Gameplay rules driven through full frames.
//!
//! Each test sets up a small world by hand, steps it with `tick`, and checks
//! the score, counters and entity states the rule should leave behind.

mod common;

use glam::{IVec2, Vec2};

use side_scroller::audio::SoundEffect;
use side_scroller::consts::*;
use side_scroller::sim::enemy::DyingState;
use side_scroller::sim::item::PowerupState;
use side_scroller::sim::{
    BlockState, Checkpoint, Coin, Contents, Direction, Enemy, EnemyKind, Flagpole, GameEvent,
    GamePhase, LevelOutcome, Obstacle, ObstacleKind, PlayerState, PopupValue, Powerup,
    PowerupKind, Rect, Shell, ShellState, Trigger, World,
};

fn sounds(world: &World) -> Vec<SoundEffect> {
    world
        .events
        .iter()
        .filter_map(|e| match e {
            GameEvent::Sound(effect) => Some(*effect),
            _ => None,
        })
        .collect()
}

/// Drop the player onto something with its feet at `bottom`
fn falling_onto(world: &mut World, left: i32, bottom: i32) {
    world.player.body.set_left(left);
    world.player.body.set_bottom(bottom);
    world.player.body.vel.y = 6.0;
    world.player.state = PlayerState::Fall;
}

fn make_big(world: &mut World) {
    world.player.big = true;
    world.player.body.resize(BIG_SIZE);
}

// ---------------------------------------------------------------------------
// Stomping
// ---------------------------------------------------------------------------

#[test]
fn stomp_squashes_goomba() {
    let mut world = common::flat_world(4000);
    world
        .enemies
        .push(Enemy::new(EnemyKind::Goomba, 300, GROUND_HEIGHT, Direction::Left));
    let goomba = world.enemies[0].body.rect();
    falling_onto(&mut world, 305, goomba.top() - 5);

    common::step(&mut world, common::idle());

    assert!(world.enemies.is_empty());
    assert_eq!(world.score, STOMP_SCORE);
    assert_eq!(world.dying.len(), 1);
    assert!(matches!(world.dying[0].state, DyingState::JumpedOn { .. }));
    assert_eq!(world.popups[0].pos, IVec2::new(goomba.centerx(), goomba.top()));
    assert_eq!(world.player.body.vel.y, STOMP_BOUNCE_VEL);
    assert_eq!(world.player.body.rect().bottom(), goomba.top());
    assert!(sounds(&world).contains(&SoundEffect::Stomp));
}

#[test]
fn stomp_turns_koopa_into_idle_shell() {
    let mut world = common::flat_world(4000);
    world
        .enemies
        .push(Enemy::new(EnemyKind::Koopa, 300, GROUND_HEIGHT, Direction::Left));
    let koopa = world.enemies[0].body.rect();
    falling_onto(&mut world, 305, koopa.top() - 4);

    common::step(&mut world, common::idle());

    assert!(world.enemies.is_empty());
    assert!(world.dying.is_empty());
    assert_eq!(world.shells.len(), 1);
    let shell = &world.shells[0];
    assert_eq!(shell.state, ShellState::Idle);
    assert_eq!(shell.body.rect().centerx(), koopa.centerx());
    assert_eq!(shell.body.rect().bottom(), koopa.bottom());
    assert_eq!(world.score, STOMP_SCORE);
}

#[test]
fn side_contact_hurts_small_player() {
    let mut world = common::flat_world(4000);
    world
        .enemies
        .push(Enemy::new(EnemyKind::Goomba, 200, GROUND_HEIGHT, Direction::Left));
    world.player.body.set_right(198);
    world.player.body.vel.x = 3.0;
    world.player.state = PlayerState::Walk;

    common::step(&mut world, common::right());

    assert!(world.player.dead);
    assert_eq!(world.player.state, PlayerState::DeathJump);
    assert_eq!(world.phase, GamePhase::Frozen);
}

#[test]
fn side_contact_shrinks_big_player() {
    let mut world = common::flat_world(4000);
    make_big(&mut world);
    world.player.fire = true;
    world.obstacles.insert(
        Obstacle::new(1, "box", ObstacleKind::ItemBox, Rect::new(600, 300, BLOCK_SIZE, BLOCK_SIZE))
            .with_contents(Some(Contents::FireFlower)),
    );
    world
        .enemies
        .push(Enemy::new(EnemyKind::Goomba, 200, GROUND_HEIGHT, Direction::Left));
    world.player.body.set_right(198);
    world.player.body.vel.x = 3.0;
    world.player.state = PlayerState::Walk;

    common::step(&mut world, common::right());

    assert!(!world.player.dead);
    assert!(!world.player.fire);
    assert_eq!(world.player.state, PlayerState::BigToSmall);
    assert_eq!(world.obstacles.item_boxes[0].contents, Some(Contents::Mushroom));

    // Frozen until the shrink finishes, then small and briefly untouchable
    while world.phase == GamePhase::Frozen {
        common::step(&mut world, common::idle());
    }
    assert!(!world.player.big);
    assert!(world.player.hurt_invincible);
    assert_eq!(world.player.body.size, IVec2::new(SMALL_SIZE.0, SMALL_SIZE.1));
}

// ---------------------------------------------------------------------------
// Shells
// ---------------------------------------------------------------------------

#[test]
fn walking_into_idle_shell_kicks_it_away() {
    let mut world = common::flat_world(4000);
    world
        .shells
        .push(Shell::new(400, GROUND_HEIGHT, Direction::Left));
    let shell = world.shells[0].body.rect();
    world.player.body.set_right(shell.left() - 2);
    world.player.body.vel.x = 3.0;
    world.player.state = PlayerState::Walk;

    common::step(&mut world, common::right());

    let shell = &world.shells[0];
    assert_eq!(shell.state, ShellState::Slide);
    assert_eq!(shell.body.vel.x, SHELL_SPEED);
    assert!(!world.player.dead);
    assert!(sounds(&world).contains(&SoundEffect::Kick));
}

#[test]
fn idle_shell_kicked_from_the_right_slides_left() {
    let mut world = common::flat_world(4000);
    world
        .shells
        .push(Shell::new(400, GROUND_HEIGHT, Direction::Right));
    let shell = world.shells[0].body.rect();
    world.player.body.set_left(shell.right() + 2);
    world.player.body.vel.x = -3.0;
    world.player.body.direction = Direction::Left;
    world.player.state = PlayerState::Walk;

    common::step(&mut world, common::left());

    assert_eq!(world.shells[0].state, ShellState::Slide);
    assert_eq!(world.shells[0].body.vel.x, -SHELL_SPEED);
}

#[test]
fn stomping_sliding_shell_stops_it() {
    let mut world = common::flat_world(4000);
    let mut shell = Shell::new(400, GROUND_HEIGHT, Direction::Right);
    shell.kick(Direction::Right);
    world.shells.push(shell);
    let rect = world.shells[0].body.rect();
    falling_onto(&mut world, rect.left() + 10, rect.top() - 4);

    common::step(&mut world, common::idle());

    assert_eq!(world.shells[0].state, ShellState::Idle);
    assert_eq!(world.shells[0].body.vel.x, 0.0);
    assert_eq!(world.score, SHELL_SCORE);
}

#[test]
fn enemy_walking_into_idle_shell_sets_it_sliding() {
    let mut world = common::flat_world(4000);
    world
        .shells
        .push(Shell::new(400, GROUND_HEIGHT, Direction::Left));
    world
        .enemies
        .push(Enemy::new(EnemyKind::Goomba, 450, GROUND_HEIGHT, Direction::Left));

    for _ in 0..30 {
        common::step(&mut world, common::idle());
        if world.enemies.is_empty() {
            break;
        }
    }

    assert!(world.enemies.is_empty());
    assert_eq!(world.dying.len(), 1);
    assert_eq!(world.shells[0].state, ShellState::Slide);
    assert_eq!(world.shells[0].body.vel.x, -SHELL_SPEED);
    assert_eq!(world.score, 0);
}

#[test]
fn sliding_shell_knocks_out_enemies() {
    let mut world = common::flat_world(4000);
    let mut shell = Shell::new(400, GROUND_HEIGHT, Direction::Right);
    shell.kick(Direction::Right);
    world.shells.push(shell);
    world
        .enemies
        .push(Enemy::new(EnemyKind::Koopa, 520, GROUND_HEIGHT, Direction::Left));

    for _ in 0..30 {
        common::step(&mut world, common::idle());
        if world.enemies.is_empty() {
            break;
        }
    }

    assert!(world.enemies.is_empty());
    assert_eq!(world.dying.len(), 1);
    assert!(matches!(world.dying[0].state, DyingState::DeathJump));
    assert!(world.shells[0].is_sliding());
    assert!(world.score > 0);
}

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

#[test]
fn big_player_smashes_brick_and_what_stands_on_it() {
    let mut world = common::flat_world(4000);
    let brick = Rect::new(300, 300, BLOCK_SIZE, BLOCK_SIZE);
    world
        .obstacles
        .insert(Obstacle::new(1, "brick_1", ObstacleKind::Brick, brick));
    world
        .enemies
        .push(Enemy::new(EnemyKind::Goomba, 300, brick.top(), Direction::Left));
    world.player.body.set_left(305);
    make_big(&mut world);
    world.player.body.set_top(brick.bottom() + 2);
    world.player.body.vel.y = -8.0;
    world.player.state = PlayerState::Jump;

    common::step(&mut world, common::idle());

    assert!(world.obstacles.bricks.is_empty());
    assert!(world.enemies.is_empty());
    assert_eq!(world.score, BRICK_SCORE + KILL_SCORE);
    assert_eq!(world.debris.len(), 4);
    assert_eq!(world.player.state, PlayerState::Fall);
    assert!(sounds(&world).contains(&SoundEffect::BrickSmash));
}

#[test]
fn small_player_only_bumps_brick() {
    let mut world = common::flat_world(4000);
    let brick = Rect::new(300, 300, BLOCK_SIZE, BLOCK_SIZE);
    world
        .obstacles
        .insert(Obstacle::new(1, "brick_1", ObstacleKind::Brick, brick));
    world.player.body.set_left(305);
    world.player.body.set_top(brick.bottom() + 2);
    world.player.body.vel.y = -8.0;
    world.player.state = PlayerState::Jump;

    common::step(&mut world, common::idle());

    assert_eq!(world.obstacles.bricks.len(), 1);
    assert_eq!(world.obstacles.bricks[0].state, BlockState::Bumped);
    assert_eq!(world.score, 0);
    assert!(sounds(&world).contains(&SoundEffect::Bump));

    // Settles back to rest; an empty brick never opens
    for _ in 0..30 {
        common::step(&mut world, common::idle());
    }
    assert_eq!(world.obstacles.bricks[0].state, BlockState::Resting);
    assert_eq!(world.obstacles.bricks[0].rect, brick);
}

#[test]
fn item_box_reveals_powerup_after_bump() {
    let mut world = common::flat_world(4000);
    let block = Rect::new(300, 300, BLOCK_SIZE, BLOCK_SIZE);
    world.obstacles.insert(
        Obstacle::new(1, "box_1", ObstacleKind::ItemBox, block)
            .with_contents(Some(Contents::Mushroom)),
    );
    world.player.body.set_left(305);
    world.player.body.set_top(block.bottom() + 2);
    world.player.body.vel.y = -8.0;
    world.player.state = PlayerState::Jump;

    common::step(&mut world, common::idle());
    assert!(sounds(&world).contains(&SoundEffect::PowerupAppears));
    assert!(world.powerups.is_empty());

    for _ in 0..30 {
        common::step(&mut world, common::idle());
        if !world.powerups.is_empty() {
            break;
        }
    }
    assert_eq!(world.powerups.len(), 1);
    assert_eq!(world.powerups[0].kind, PowerupKind::Mushroom);
    assert_eq!(world.obstacles.item_boxes[0].state, BlockState::Opened);
}

#[test]
fn coin_box_pays_immediately() {
    let mut world = common::flat_world(4000);
    let block = Rect::new(300, 300, BLOCK_SIZE, BLOCK_SIZE);
    world.obstacles.insert(
        Obstacle::new(1, "box_1", ObstacleKind::ItemBox, block).with_contents(Some(Contents::Coin)),
    );
    world.player.body.set_left(305);
    world.player.body.set_top(block.bottom() + 2);
    world.player.body.vel.y = -8.0;
    world.player.state = PlayerState::Jump;

    common::step(&mut world, common::idle());

    assert_eq!(world.coin_total, 1);
    assert_eq!(world.score, COIN_SCORE);
    assert!(sounds(&world).contains(&SoundEffect::Coin));
}

// ---------------------------------------------------------------------------
// Pickups
// ---------------------------------------------------------------------------

/// Resting powerup of `kind` overlapping the standing player
fn powerup_at_player(world: &mut World, kind: PowerupKind) {
    let player = world.player.body.rect();
    let mut powerup = Powerup::reveal_from(kind, Rect::new(player.x, player.bottom(), 40, 40));
    powerup.body.pos = IVec2::new(player.x, player.bottom() - POWERUP_SIZE.1);
    powerup.body.vel = Vec2::ZERO;
    powerup.state = PowerupState::Resting;
    world.powerups.push(powerup);
}

#[test]
fn mushroom_grows_small_player() {
    let mut world = common::flat_world(4000);
    powerup_at_player(&mut world, PowerupKind::Mushroom);

    common::step(&mut world, common::idle());

    assert!(world.powerups.is_empty());
    assert_eq!(world.score, POWERUP_SCORE);
    assert_eq!(world.player.state, PlayerState::SmallToBig);
    assert_eq!(world.phase, GamePhase::Frozen);

    while world.phase == GamePhase::Frozen {
        common::step(&mut world, common::idle());
    }
    assert!(world.player.big);
    assert_eq!(world.player.body.rect().bottom(), GROUND_HEIGHT);
}

#[test]
fn mushroom_gives_big_player_fire_and_morphs_boxes() {
    let mut world = common::flat_world(4000);
    make_big(&mut world);
    world.obstacles.insert(
        Obstacle::new(1, "box", ObstacleKind::ItemBox, Rect::new(600, 300, BLOCK_SIZE, BLOCK_SIZE))
            .with_contents(Some(Contents::Mushroom)),
    );
    powerup_at_player(&mut world, PowerupKind::Mushroom);

    common::step(&mut world, common::idle());

    assert!(world.player.fire);
    assert_eq!(world.player.state, PlayerState::BigToFire);
    assert_eq!(world.score, POWERUP_SCORE);
    assert_eq!(world.obstacles.item_boxes[0].contents, Some(Contents::FireFlower));
}

#[test]
fn flower_for_fire_player_is_only_points() {
    let mut world = common::flat_world(4000);
    make_big(&mut world);
    world.player.fire = true;
    powerup_at_player(&mut world, PowerupKind::FireFlower);

    common::step(&mut world, common::idle());

    assert_eq!(world.score, 2 * POWERUP_SCORE);
    assert_eq!(world.player.state, PlayerState::Stand);
    assert_eq!(world.phase, GamePhase::Playing);
}

#[test]
fn star_grants_invincibility() {
    let mut world = common::flat_world(4000);
    powerup_at_player(&mut world, PowerupKind::Star);

    common::step(&mut world, common::idle());

    assert!(world.player.invincible);
    assert_eq!(world.score, POWERUP_SCORE);
}

#[test]
fn life_mushroom_adds_a_life() {
    let mut world = common::flat_world(4000);
    let lives = world.lives;
    powerup_at_player(&mut world, PowerupKind::LifeMushroom);

    common::step(&mut world, common::idle());

    assert_eq!(world.lives, lives + 1);
    assert_eq!(world.score, 0);
    assert_eq!(world.popups[0].value, PopupValue::OneUp);
    assert!(sounds(&world).contains(&SoundEffect::OneUp));
}

#[test]
fn resting_coin_is_collected_on_touch() {
    let mut world = common::flat_world(4000);
    let player = world.player.body.rect();
    world
        .coins
        .push(Coin::resting(IVec2::new(player.right() + 1, player.y + 5)));
    world.player.body.vel.x = 3.0;
    world.player.state = PlayerState::Walk;

    common::step(&mut world, common::right());

    assert!(world.coins.is_empty());
    assert_eq!(world.coin_total, 1);
    assert_eq!(world.score, COIN_SCORE);
}

#[test]
fn invincible_player_knocks_enemies_out() {
    let mut world = common::flat_world(4000);
    world.player.make_invincible();
    world
        .enemies
        .push(Enemy::new(EnemyKind::Goomba, 200, GROUND_HEIGHT, Direction::Left));
    world.player.body.set_right(198);
    world.player.body.vel.x = 3.0;
    world.player.state = PlayerState::Walk;

    common::step(&mut world, common::right());

    assert!(!world.player.dead);
    assert!(world.enemies.is_empty());
    assert_eq!(world.score, KILL_SCORE);
}

// ---------------------------------------------------------------------------
// Checkpoints and the end of the level
// ---------------------------------------------------------------------------

#[test]
fn checkpoint_releases_group_once() {
    let mut world = common::flat_world(4000);
    world.enemy_groups.push(vec![Enemy::new(
        EnemyKind::Goomba,
        700,
        GROUND_HEIGHT,
        Direction::Left,
    )]);
    world
        .checkpoints
        .push(Checkpoint::new("checkpoint_1", 150, SCREEN_HEIGHT, Trigger::EnemyGroup(0)));
    world.player.body.set_left(145);

    common::step(&mut world, common::idle());
    assert_eq!(world.enemies.len(), 1);
    assert!(world.checkpoints.is_empty());
    assert!(world
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::CheckpointFired(name) if name == "checkpoint_1")));

    // Walk away and back across the same strip
    world.player.body.set_left(60);
    common::step(&mut world, common::idle());
    world.player.body.set_left(145);
    common::step(&mut world, common::idle());
    assert_eq!(world.enemies.len(), 1);
    assert!(world.enemy_groups[0].is_empty());
}

#[test]
fn flagpole_run_clears_the_level() {
    let mut world = common::flat_world(4000);
    world.flagpole = Flagpole::new(600, 100, 485, GROUND_HEIGHT);
    world.castle_door_x = 800;
    world
        .checkpoints
        .push(Checkpoint::new("flag_pole", 550, SCREEN_HEIGHT, Trigger::Flagpole));

    let mut grabbed_at = None;
    let mut time_at_castle = None;
    for _ in 0..3000 {
        common::step(&mut world, common::right());
        if grabbed_at.is_none() && world.player.state == PlayerState::Flagpole {
            grabbed_at = Some(world.score);
            assert!(sounds(&world).contains(&SoundEffect::Flagpole));
            assert_eq!(world.player.body.rect().right(), 600);
        }
        if time_at_castle.is_none() && world.phase == GamePhase::InCastle {
            time_at_castle = Some(world.time_left);
            assert!(world.player.in_castle);
        }
        if world.is_finished() {
            break;
        }
    }

    assert_eq!(world.outcome(), Some(LevelOutcome::Cleared));
    // Feet on the ground when grabbing: lowest band
    assert_eq!(grabbed_at, Some(100));
    let time = time_at_castle.unwrap();
    assert!(time > 0);
    assert_eq!(world.time_left, 0);
    assert_eq!(world.score, 100 + time * TIME_BONUS);
}

#[test]
fn clock_stops_once_flag_is_grabbed() {
    let mut world = common::flat_world(4000);
    world.flagpole = Flagpole::new(300, 100, 485, GROUND_HEIGHT);
    world.castle_door_x = 3000;
    world
        .checkpoints
        .push(Checkpoint::new("flag_pole", 150, SCREEN_HEIGHT, Trigger::Flagpole));
    world.player.body.set_left(145);

    common::step(&mut world, common::idle());
    assert_eq!(world.player.state, PlayerState::Flagpole);
    let time = world.time_left;
    for _ in 0..200 {
        common::step(&mut world, common::idle());
    }
    assert_eq!(world.time_left, time);
}
