#[cfg(test)]
mod tests {
    use crate::components::{
        Board, Cell, Cursor, EffectBus, EffectClock, GameOverReason, GameState, GemColor, Input,
        Particle, Pos,
    };
    use crate::systems::{game_tick_system, input_system, new_game};
    use crate::tests::test_utils::{create_test_world, stripe_board};
    use bevy_ecs::prelude::*;

    // A stripe board where swapping (3, 2) and (4, 2) makes a Yellow run
    fn one_move_world() -> World {
        let mut board = stripe_board(8);
        *board.get_mut(Pos::new(4, 1)) = Cell::gem(GemColor::Yellow);
        *board.get_mut(Pos::new(4, 3)) = Cell::gem(GemColor::Yellow);
        *board.get_mut(Pos::new(3, 2)) = Cell::gem(GemColor::Yellow);
        create_test_world(board)
    }

    fn press(world: &mut World, set: impl FnOnce(&mut Input)) {
        set(&mut world.resource_mut::<Input>());
        input_system(world);
    }

    #[test]
    fn test_cursor_movement_clamps_to_board() {
        let mut world = create_test_world(stripe_board(8));
        world.resource_mut::<Cursor>().pos = Pos::new(0, 0);

        press(&mut world, |i| i.up = true);
        press(&mut world, |i| i.left = true);
        assert_eq!(world.resource::<Cursor>().pos, Pos::new(0, 0));

        press(&mut world, |i| i.down = true);
        press(&mut world, |i| i.right = true);
        assert_eq!(world.resource::<Cursor>().pos, Pos::new(1, 1));
    }

    #[test]
    fn test_select_toggle_and_cancel() {
        let mut world = create_test_world(stripe_board(8));
        world.resource_mut::<Cursor>().pos = Pos::new(2, 2);

        press(&mut world, |i| i.select = true);
        assert_eq!(world.resource::<Cursor>().selected, Some(Pos::new(2, 2)));

        // Selecting the same cell again clears the selection
        press(&mut world, |i| i.select = true);
        assert_eq!(world.resource::<Cursor>().selected, None);

        press(&mut world, |i| i.select = true);
        press(&mut world, |i| i.cancel = true);
        assert_eq!(world.resource::<Cursor>().selected, None);
    }

    #[test]
    fn test_swap_into_match_consumes_a_move() {
        let mut world = one_move_world();
        world.resource_mut::<Cursor>().pos = Pos::new(3, 2);

        press(&mut world, |i| i.select = true);
        press(&mut world, |i| i.down = true);
        press(&mut world, |i| i.select = true);

        let game_state = world.resource::<GameState>();
        assert_eq!(game_state.moves_used, 1);
        assert!(game_state.score >= 50);
        assert_eq!(world.resource::<Cursor>().selected, None);

        // The engine left effects for the presentation layer
        assert!(!world.resource::<EffectBus>().is_empty());
    }

    #[test]
    fn test_fruitless_swap_consumes_nothing() {
        let mut world = create_test_world(stripe_board(8));
        world.resource_mut::<Cursor>().pos = Pos::new(0, 0);

        press(&mut world, |i| i.select = true);
        press(&mut world, |i| i.right = true);
        press(&mut world, |i| i.select = true);

        let game_state = world.resource::<GameState>();
        assert_eq!(game_state.moves_used, 0);
        assert_eq!(game_state.score, 0);
    }

    #[test]
    fn test_pending_effects_block_swaps() {
        let mut world = one_move_world();
        world.resource_mut::<EffectClock>().extend(1.0);
        world.resource_mut::<Cursor>().pos = Pos::new(3, 2);

        press(&mut world, |i| i.select = true);
        assert_eq!(world.resource::<Cursor>().selected, None);
        assert_eq!(world.resource::<GameState>().moves_used, 0);
    }

    #[test]
    fn test_game_tick_drains_effects_and_paces_moves() {
        let mut world = one_move_world();
        world.resource_mut::<Cursor>().pos = Pos::new(3, 2);
        press(&mut world, |i| i.select = true);
        press(&mut world, |i| i.down = true);
        press(&mut world, |i| i.select = true);
        assert!(!world.resource::<EffectBus>().is_empty());

        game_tick_system(&mut world, 0.05);

        assert!(world.resource::<EffectBus>().is_empty());
        assert!(world.resource::<EffectClock>().busy());

        // Destruction left some sparks behind
        let particle_count = world.query::<&Particle>().iter(&world).count();
        assert!(particle_count > 0);
    }

    #[test]
    fn test_out_of_moves_ends_game() {
        let mut world = one_move_world();
        world.resource_mut::<GameState>().moves_left = 1;
        world.resource_mut::<Cursor>().pos = Pos::new(3, 2);

        press(&mut world, |i| i.select = true);
        press(&mut world, |i| i.down = true);
        press(&mut world, |i| i.select = true);

        let game_state = world.resource::<GameState>();
        assert!(game_state.game_over);
        assert_eq!(game_state.game_over_reason, Some(GameOverReason::OutOfMoves));
        assert!(game_state.finished_at.is_some());
    }

    #[test]
    fn test_input_ignored_after_game_over() {
        let mut world = one_move_world();
        world
            .resource_mut::<GameState>()
            .end_game(GameOverReason::OutOfMoves);
        world.resource_mut::<Cursor>().pos = Pos::new(3, 2);

        press(&mut world, |i| i.select = true);
        press(&mut world, |i| i.down = true);
        press(&mut world, |i| i.select = true);

        assert_eq!(world.resource::<GameState>().moves_used, 0);
    }

    #[test]
    fn test_new_game_resets_session() {
        let mut world = one_move_world();
        {
            let mut game_state = world.resource_mut::<GameState>();
            game_state.score = 500;
            game_state.moves_left = 0;
            game_state.end_game(GameOverReason::OutOfMoves);
        }
        world.resource_mut::<EffectClock>().extend(1.0);

        new_game(&mut world);

        let game_state = world.resource::<GameState>();
        assert_eq!(game_state.score, 0);
        assert!(!game_state.game_over);
        assert!(game_state.moves_left > 0);
        assert!(!world.resource::<EffectClock>().busy());
        assert_eq!(world.resource::<Board>().count_empty(), 0);
    }

    #[test]
    fn test_restart_flag_starts_new_game() {
        let mut world = one_move_world();
        world.resource_mut::<GameState>().score = 123;

        press(&mut world, |i| i.restart = true);

        assert_eq!(world.resource::<GameState>().score, 0);
    }
}
