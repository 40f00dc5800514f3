#[cfg(test)]
mod tests {
    use crate::components::{EffectBus, GemColor, GemRng, Pos, PowerUpKind};
    use crate::matcher::{detect_special_patterns, find_exploding_chains};
    use crate::powerup::{create_power_ups, trigger_power_up};
    use crate::tests::test_utils::stripe_board;

    fn set_gem(board: &mut crate::components::Board, row: usize, col: usize, color: GemColor) {
        *board.get_mut(Pos::new(row, col)) = crate::components::Cell::gem(color);
    }

    // Factory -----------------------------------------------------------

    #[test]
    fn test_four_chain_makes_horizontal_rocket() {
        let mut board = stripe_board(8);
        for col in 2..6 {
            set_gem(&mut board, 3, col, GemColor::Yellow);
        }

        let chains = find_exploding_chains(&board);
        let patterns = detect_special_patterns(&board);
        assert_eq!(chains.len(), 1);
        assert!(patterns.is_empty());

        let mut fx = EffectBus::default();
        let (placements, report) = create_power_ups(&mut board, &chains, &patterns, &mut fx);

        // The rocket lands on the chain's middle cell (0-based index 2)
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].kind, PowerUpKind::HorizontalRocket);
        assert_eq!(placements[0].pos, Pos::new(3, 4));

        let anchor = board.get(Pos::new(3, 4));
        assert_eq!(anchor.power_up, Some(PowerUpKind::HorizontalRocket));
        assert!(!anchor.empty);
        assert_eq!(anchor.color, None);

        // The other three chain cells are destroyed
        for col in [2, 3, 5] {
            assert!(board.get(Pos::new(3, col)).empty, "col {col} should be empty");
        }
        assert_eq!(report.destroyed.len(), 3);
        assert_eq!(report.groups, vec![4]);
    }

    #[test]
    fn test_vertical_four_chain_makes_vertical_rocket() {
        let mut board = stripe_board(8);
        for row in 1..5 {
            set_gem(&mut board, row, 6, GemColor::Magenta);
        }

        let chains = find_exploding_chains(&board);
        let mut fx = EffectBus::default();
        let (placements, _) = create_power_ups(&mut board, &chains, &[], &mut fx);

        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].kind, PowerUpKind::VerticalRocket);
        assert_eq!(placements[0].pos, Pos::new(3, 6));
    }

    #[test]
    fn test_five_chain_makes_color_bomb() {
        let mut board = stripe_board(8);
        for col in 1..6 {
            set_gem(&mut board, 5, col, GemColor::Cyan);
        }

        let chains = find_exploding_chains(&board);
        let mut fx = EffectBus::default();
        let (placements, _) = create_power_ups(&mut board, &chains, &[], &mut fx);

        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].kind, PowerUpKind::ColorBomb);
        assert_eq!(placements[0].pos, Pos::new(5, 3));
    }

    #[test]
    fn test_vertical_five_chain_also_makes_color_bomb() {
        // Orientation never matters past the rocket threshold
        let mut board = stripe_board(8);
        for row in 2..7 {
            set_gem(&mut board, row, 0, GemColor::Cyan);
        }

        let chains = find_exploding_chains(&board);
        let mut fx = EffectBus::default();
        let (placements, _) = create_power_ups(&mut board, &chains, &[], &mut fx);

        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].kind, PowerUpKind::ColorBomb);
        assert_eq!(placements[0].pos, Pos::new(4, 0));
    }

    #[test]
    fn test_three_chain_makes_no_power_up() {
        let mut board = stripe_board(8);
        for col in 0..3 {
            set_gem(&mut board, 0, col, GemColor::Yellow);
        }

        let chains = find_exploding_chains(&board);
        let mut fx = EffectBus::default();
        let (placements, report) = create_power_ups(&mut board, &chains, &[], &mut fx);

        assert!(placements.is_empty());
        assert_eq!(report.destroyed.len(), 3);
        for col in 0..3 {
            assert!(board.get(Pos::new(0, col)).empty);
        }
    }

    #[test]
    fn test_square_makes_fly_away_at_top_left() {
        let mut board = stripe_board(8);
        for (row, col) in [(2, 2), (2, 3), (3, 2), (3, 3)] {
            set_gem(&mut board, row, col, GemColor::Yellow);
        }

        let patterns = detect_special_patterns(&board);
        assert_eq!(patterns.len(), 1);

        let mut fx = EffectBus::default();
        let (placements, report) = create_power_ups(&mut board, &[], &patterns, &mut fx);

        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].kind, PowerUpKind::FlyAway);
        assert_eq!(placements[0].pos, Pos::new(2, 2));
        assert_eq!(report.groups, vec![4]);

        for (row, col) in [(2, 3), (3, 2), (3, 3)] {
            assert!(board.get(Pos::new(row, col)).empty);
        }
    }

    #[test]
    fn test_l_pentomino_makes_tnt_at_center() {
        let mut board = stripe_board(8);
        for (row, col) in [(4, 4), (4, 5), (4, 6), (5, 4), (6, 4)] {
            set_gem(&mut board, row, col, GemColor::Yellow);
        }

        let patterns = detect_special_patterns(&board);
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].kind, PowerUpKind::Tnt);
        assert_eq!(patterns[0].anchor, Pos::new(4, 4));
    }

    #[test]
    fn test_chain_overlapping_pattern_makes_no_rocket() {
        // A square plus two more cells in its top row: the square claims
        // its cells first, so the 4-run gets no rocket of its own
        let mut board = stripe_board(8);
        for (row, col) in [(0, 0), (0, 1), (1, 0), (1, 1), (0, 2), (0, 3)] {
            set_gem(&mut board, row, col, GemColor::Yellow);
        }

        let patterns = detect_special_patterns(&board);
        let chains = find_exploding_chains(&board);
        assert_eq!(patterns.len(), 1);
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].len(), 4);

        let mut fx = EffectBus::default();
        let (placements, _) = create_power_ups(&mut board, &chains, &patterns, &mut fx);

        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].kind, PowerUpKind::FlyAway);
        assert_eq!(placements[0].pos, Pos::new(0, 0));

        // The chain cells outside the pattern are still destroyed
        assert!(board.get(Pos::new(0, 2)).empty);
        assert!(board.get(Pos::new(0, 3)).empty);
    }

    // Activation --------------------------------------------------------

    #[test]
    fn test_tnt_interior_footprint() {
        let mut board = stripe_board(8);
        board.spawn_power_up(PowerUpKind::Tnt, Pos::new(4, 4)).unwrap();

        let mut rng = GemRng::seeded(1);
        let mut fx = EffectBus::default();
        let report = trigger_power_up(&mut board, &mut rng, &mut fx, Pos::new(4, 4), None);

        // Itself plus two in each of the four directions
        assert_eq!(report.destroyed.len(), 9);
        for pos in [
            Pos::new(4, 4),
            Pos::new(2, 4),
            Pos::new(3, 4),
            Pos::new(5, 4),
            Pos::new(6, 4),
            Pos::new(4, 2),
            Pos::new(4, 3),
            Pos::new(4, 5),
            Pos::new(4, 6),
        ] {
            assert!(board.get(pos).empty, "{pos} should be empty");
        }
        // A diagonal neighbor survives
        assert!(!board.get(Pos::new(3, 3)).empty);
    }

    #[test]
    fn test_tnt_clips_at_corner() {
        let mut board = stripe_board(8);
        board.spawn_power_up(PowerUpKind::Tnt, Pos::new(0, 0)).unwrap();

        let mut rng = GemRng::seeded(1);
        let mut fx = EffectBus::default();
        let report = trigger_power_up(&mut board, &mut rng, &mut fx, Pos::new(0, 0), None);

        assert_eq!(report.destroyed.len(), 5);
    }

    #[test]
    fn test_horizontal_rocket_clears_row_only() {
        let mut board = stripe_board(8);
        board
            .spawn_power_up(PowerUpKind::HorizontalRocket, Pos::new(2, 3))
            .unwrap();

        let mut rng = GemRng::seeded(1);
        let mut fx = EffectBus::default();
        let report = trigger_power_up(&mut board, &mut rng, &mut fx, Pos::new(2, 3), None);

        assert_eq!(report.destroyed.len(), 8);
        for col in 0..8 {
            assert!(board.get(Pos::new(2, col)).empty);
        }
        for col in 0..8 {
            assert!(!board.get(Pos::new(1, col)).empty);
            assert!(!board.get(Pos::new(3, col)).empty);
        }
    }

    #[test]
    fn test_rocket_chain_activates_other_rocket() {
        let mut board = stripe_board(8);
        board
            .spawn_power_up(PowerUpKind::HorizontalRocket, Pos::new(2, 1))
            .unwrap();
        board
            .spawn_power_up(PowerUpKind::VerticalRocket, Pos::new(2, 6))
            .unwrap();

        let mut rng = GemRng::seeded(1);
        let mut fx = EffectBus::default();
        let report = trigger_power_up(&mut board, &mut rng, &mut fx, Pos::new(2, 1), None);

        // Row 2 and column 6 both go: the second rocket fired its own
        // footprint instead of just dying
        for col in 0..8 {
            assert!(board.get(Pos::new(2, col)).empty);
        }
        for row in 0..8 {
            assert!(board.get(Pos::new(row, 6)).empty);
        }
        assert_eq!(report.destroyed.len(), 15);
        assert_eq!(report.groups.len(), 2);
    }

    #[test]
    fn test_color_bomb_uses_swapped_color() {
        let mut board = stripe_board(8);
        board
            .spawn_power_up(PowerUpKind::ColorBomb, Pos::new(0, 0))
            .unwrap();

        let mut rng = GemRng::seeded(1);
        let mut fx = EffectBus::default();
        // (0, 1) holds a Green gem in the stripe layout
        let report =
            trigger_power_up(&mut board, &mut rng, &mut fx, Pos::new(0, 0), Some(Pos::new(0, 1)));

        // Every green cell died along with the bomb itself
        assert_eq!(report.destroyed.len(), 23);
        for pos in board.positions().collect::<Vec<_>>() {
            assert_ne!(board.get(pos).matchable(), Some(GemColor::Green));
        }
    }

    #[test]
    fn test_color_bomb_falls_back_to_neighbor_color() {
        let mut board = stripe_board(8);
        board
            .spawn_power_up(PowerUpKind::ColorBomb, Pos::new(0, 0))
            .unwrap();

        let mut rng = GemRng::seeded(1);
        let mut fx = EffectBus::default();
        let report = trigger_power_up(&mut board, &mut rng, &mut fx, Pos::new(0, 0), None);

        // First colored neighbor scanning up/down/left/right is (1, 0),
        // which is Green in the stripe layout
        assert!(report.destroyed.len() > 1);
        for pos in board.positions().collect::<Vec<_>>() {
            assert_ne!(board.get(pos).matchable(), Some(GemColor::Green));
        }
    }

    #[test]
    fn test_fly_away_two_phase() {
        let mut board = stripe_board(8);
        // Give (6, 6) three same-colored neighbors so the target search
        // has a unique maximum
        for (row, col) in [(6, 5), (6, 6), (6, 7), (5, 6)] {
            set_gem(&mut board, row, col, GemColor::Cyan);
        }
        board
            .spawn_power_up(PowerUpKind::FlyAway, Pos::new(1, 1))
            .unwrap();

        let mut rng = GemRng::seeded(1);
        let mut fx = EffectBus::default();
        let report = trigger_power_up(&mut board, &mut rng, &mut fx, Pos::new(1, 1), None);

        // Phase 1: the four neighbors of the origin
        for pos in [Pos::new(0, 1), Pos::new(2, 1), Pos::new(1, 0), Pos::new(1, 2)] {
            assert!(board.get(pos).empty, "{pos} should be empty");
        }

        // Phase 2: the landing blast at the best target
        assert!(board.get(Pos::new(6, 6)).empty);
        assert!(board.get(Pos::new(6, 5)).empty);
        assert!(board.get(Pos::new(5, 6)).empty);

        // origin + 4 neighbors + target cross (5 cells)
        assert_eq!(report.destroyed.len(), 10);
        assert_eq!(report.groups.len(), 2);
    }
}
