use bevy_ecs::prelude::*;
use log::{debug, info, trace};

use crate::components::{
    Board, BoardEffect, Cursor, EffectBus, EffectClock, GameOverReason, GameState, GemRng, Input,
    Particle, Pos, PowerUpKind,
};
use crate::config;
use crate::engine;
use crate::particles;
use crate::screenshake;

/// Handles one tick of buffered input: cursor movement, selection, and
/// swap submission. Swaps are refused while a previous move's effects are
/// still playing; that is the only mutual exclusion the game needs.
pub fn input_system(world: &mut World) {
    let input = world.resource::<Input>().clone();
    *world.resource_mut::<Input>() = Input::default();

    if input.restart {
        new_game(world);
        return;
    }

    let game_over = world.resource::<GameState>().game_over;
    if game_over {
        return;
    }

    let board_size = world.resource::<Board>().size();
    let mut cursor = world.resource::<Cursor>().clone();

    if input.up && cursor.pos.row > 0 {
        cursor.pos.row -= 1;
    }
    if input.down && cursor.pos.row + 1 < board_size {
        cursor.pos.row += 1;
    }
    if input.left && cursor.pos.col > 0 {
        cursor.pos.col -= 1;
    }
    if input.right && cursor.pos.col + 1 < board_size {
        cursor.pos.col += 1;
    }
    if input.cancel {
        cursor.selected = None;
    }

    let busy = world.resource::<EffectClock>().busy();
    if input.select && !busy {
        match cursor.selected {
            None => {
                debug!("Selected {}", cursor.pos);
                cursor.selected = Some(cursor.pos);
            }
            Some(selected) if selected == cursor.pos => {
                cursor.selected = None;
            }
            Some(selected) if selected.is_adjacent(cursor.pos) => {
                let target = cursor.pos;
                cursor.selected = None;
                *world.resource_mut::<Cursor>() = cursor.clone();
                submit_move(world, selected, target);
            }
            Some(_) => {
                // Too far away: treat it as a fresh selection
                cursor.selected = Some(cursor.pos);
            }
        }
    }

    *world.resource_mut::<Cursor>() = cursor;
}

// Runs the engine for one player move and applies the outcome to the
// session state.
fn submit_move(world: &mut World, from: Pos, to: Pos) {
    let outcome = world.resource_scope(|world, mut board: Mut<Board>| {
        world.resource_scope(|world, mut rng: Mut<GemRng>| {
            let mut fx = world.resource_mut::<EffectBus>();
            engine::attempt_move(&mut board, &mut rng, &mut fx, from, to)
        })
    });

    if !outcome.accepted {
        debug!("Swap {from} -> {to} not accepted");
        return;
    }

    {
        let mut game_state = world.resource_mut::<GameState>();
        game_state.score += outcome.score_delta;
        game_state.moves_left = game_state.moves_left.saturating_sub(1);
        game_state.moves_used += 1;
        game_state.cascades_resolved += outcome.cascades;
        game_state.best_cascade = game_state.best_cascade.max(outcome.cascades);
        game_state.power_ups_created += outcome.power_ups_created.len() as u32;
    }

    let out_of_moves = world.resource::<GameState>().moves_left == 0;
    let no_moves_left = world.resource_scope(|_, mut board: Mut<Board>| {
        engine::is_game_over(&mut board)
    });

    if out_of_moves || no_moves_left {
        let reason = if out_of_moves {
            GameOverReason::OutOfMoves
        } else {
            GameOverReason::NoLegalMoves
        };
        let mut game_state = world.resource_mut::<GameState>();
        game_state.end_game(reason);
        let (score, moves, duration) = game_state.final_summary();
        info!("Game over ({reason:?}): score {score}, moves {moves}, {duration:.1}s");
    }
}

pub fn game_tick_system(world: &mut World, delta_seconds: f32) {
    trace!("Game tick with delta: {}", delta_seconds);

    particles::update_particles(world, delta_seconds);
    world.resource_mut::<EffectClock>().tick(delta_seconds);

    let events = world.resource_mut::<EffectBus>().drain();
    for event in events {
        play_effect(world, &event);
    }
}

// Turns one engine event into particles, shake, and presentation delay.
fn play_effect(world: &mut World, event: &BoardEffect) {
    let pause = config::destruction_pause();
    let particles_on = config::particles_enabled();
    match event {
        BoardEffect::Destroyed { cells } => {
            if particles_on {
                particles::spawn_destruction_particles(world, cells);
            }
            screenshake::trigger_clear_shake(world, cells.len());
            world.resource_mut::<EffectClock>().extend(pause);
        }
        BoardEffect::Blast { kind, origin, cells } => {
            if particles_on {
                particles::spawn_blast_particles(world, *kind, *origin, cells);
            }
            let intensity = if cells.len() > 12 { 2.0 } else { 0.8 };
            screenshake::trigger_screen_shake(world, intensity, 0.25);
            world.resource_mut::<EffectClock>().extend(pause);
        }
        BoardEffect::Combination { kinds, anchor, cells } => {
            debug!("Combination {kinds:?} at {anchor} hit {} cells", cells.len());
            if particles_on {
                particles::spawn_blast_particles(world, kinds.0, *anchor, cells);
            }
            screenshake::trigger_screen_shake(world, 3.0, 0.4);
            world.resource_mut::<EffectClock>().extend(pause * 2.0);
        }
        BoardEffect::Flight { from, to } => {
            if particles_on {
                particles::spawn_flight_particles(world, *from, *to);
            }
            world.resource_mut::<EffectClock>().extend(config::flight_pause());
        }
        BoardEffect::PowerUpSpawned { kind, pos } => {
            debug!("Power-up {kind:?} appeared at {pos}");
            if particles_on {
                particles::spawn_power_up_particles(world, *kind, *pos);
            }
        }
        BoardEffect::Refilled { cells } => {
            trace!("Refilled {} cells", cells.len());
        }
    }
}

/// Tears the session down to a fresh board and full move budget. Keeps the
/// random source so a sown seed carries across games.
pub fn new_game(world: &mut World) {
    info!("Starting a new game");

    let board = world.resource_scope(|_, mut rng: Mut<GemRng>| engine::new_board(&mut rng));
    world.insert_resource(board);

    let starting_moves = config::starting_moves();
    world.resource_mut::<GameState>().reset(starting_moves);
    *world.resource_mut::<Cursor>() = Cursor::default();
    *world.resource_mut::<EffectClock>() = EffectClock::default();
    world.resource_mut::<EffectBus>().drain();

    let particles_to_remove: Vec<Entity> = world
        .query::<(Entity, &Particle)>()
        .iter(world)
        .map(|(e, _)| e)
        .collect();
    for entity in particles_to_remove {
        world.despawn(entity);
    }

    // A fresh board can in principle start with no legal swap
    let stuck = world.resource_scope(|_, mut board: Mut<Board>| engine::is_game_over(&mut board));
    if stuck {
        world
            .resource_mut::<GameState>()
            .end_game(GameOverReason::NoLegalMoves);
    }
}

// Re-exported for the UI layer, which shows a hint of what a power-up does
#[must_use]
pub fn power_up_name(kind: PowerUpKind) -> &'static str {
    match kind {
        PowerUpKind::HorizontalRocket => "Row Rocket",
        PowerUpKind::VerticalRocket => "Column Rocket",
        PowerUpKind::Tnt => "TNT",
        PowerUpKind::ColorBomb => "Color Bomb",
        PowerUpKind::FlyAway => "Fly-Away",
    }
}
