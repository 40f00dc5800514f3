#[cfg(test)]
mod tests {
    use crate::components::{Pos, PowerUpKind};
    use crate::matcher::{
        Orientation, board_should_explode, detect_special_patterns, find_exploding_chains,
        should_explode,
    };
    use crate::tests::test_utils::{board_of, stripe_board};

    #[test]
    fn test_single_row_chain() {
        let board = board_of(&["BBB", "RGR", "GRG"]);

        let chains = find_exploding_chains(&board);
        assert_eq!(chains.len(), 1);

        let chain = &chains[0];
        assert_eq!(chain.orientation, Orientation::Horizontal);
        assert_eq!(
            chain.cells,
            vec![Pos::new(0, 0), Pos::new(0, 1), Pos::new(0, 2)]
        );
    }

    #[test]
    fn test_five_run_is_one_chain() {
        let board = board_of(&[
            "RGBRG",
            "GBRGB",
            "YYYYY",
            "BRGBR",
            "RGBRG",
        ]);

        let chains = find_exploding_chains(&board);
        assert_eq!(chains.len(), 1, "a 5-run must not split into shorter chains");
        assert_eq!(chains[0].len(), 5);
        assert_eq!(chains[0].middle(), Pos::new(2, 2));
    }

    #[test]
    fn test_vertical_chain() {
        let board = board_of(&["MGB", "MBG", "MGB"]);

        let chains = find_exploding_chains(&board);
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].orientation, Orientation::Vertical);
        assert_eq!(
            chains[0].cells,
            vec![Pos::new(0, 0), Pos::new(1, 0), Pos::new(2, 0)]
        );
    }

    #[test]
    fn test_power_up_breaks_run() {
        let mut board = board_of(&["BBB", "RGR", "GRG"]);
        board
            .spawn_power_up(PowerUpKind::Tnt, Pos::new(0, 1))
            .unwrap();

        // The run is severed by the power-up cell
        assert!(find_exploding_chains(&board).is_empty());
        assert!(!should_explode(&board, Pos::new(0, 0)));
        assert!(!should_explode(&board, Pos::new(0, 1)));
    }

    #[test]
    fn test_should_explode_point_query() {
        let board = board_of(&["BBB", "RGR", "GRG"]);
        assert!(should_explode(&board, Pos::new(0, 0)));
        assert!(should_explode(&board, Pos::new(0, 1)));
        assert!(should_explode(&board, Pos::new(0, 2)));
        assert!(!should_explode(&board, Pos::new(1, 0)));
        assert!(!should_explode(&board, Pos::new(2, 2)));
    }

    #[test]
    fn test_square_pattern_detection() {
        let board = board_of(&["YYR", "YYG", "BRG"]);

        // No linear run exists, but the square still explodes the board
        assert!(find_exploding_chains(&board).is_empty());
        assert!(board_should_explode(&board));

        let patterns = detect_special_patterns(&board);
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].kind, PowerUpKind::FlyAway);
        assert_eq!(patterns[0].anchor, Pos::new(0, 0));
        assert_eq!(patterns[0].members.len(), 4);
    }

    #[test]
    fn test_square_claims_are_disjoint() {
        // A 2x3 block of one color holds only one square pattern
        let board = board_of(&["YYY", "YYY", "RGB"]);

        let patterns = detect_special_patterns(&board);
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].anchor, Pos::new(0, 0));
    }

    #[test]
    fn test_l_pentomino_detection() {
        let board = board_of(&[
            "RGBRG",
            "GMMMB",
            "BMGBR",
            "RMBGB",
            "GBRGR",
        ]);

        let patterns = detect_special_patterns(&board);
        assert_eq!(patterns.len(), 1);

        let l = &patterns[0];
        assert_eq!(l.kind, PowerUpKind::Tnt);
        assert_eq!(l.anchor, Pos::new(1, 1));
        assert_eq!(l.members.len(), 5);
        for member in [
            Pos::new(1, 1),
            Pos::new(1, 2),
            Pos::new(1, 3),
            Pos::new(2, 1),
            Pos::new(3, 1),
        ] {
            assert!(l.members.contains(&member), "missing {member}");
        }
    }

    #[test]
    fn test_squares_have_priority_over_ls() {
        // The 2x2 square eats four of the cells an L would want
        let board = board_of(&[
            "YYBRG",
            "YYGBR",
            "YRBGB",
            "GBRGR",
            "RGBRG",
        ]);

        let patterns = detect_special_patterns(&board);
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].kind, PowerUpKind::FlyAway);
    }

    #[test]
    fn test_stripe_board_is_inert() {
        let board = stripe_board(8);
        assert!(find_exploding_chains(&board).is_empty());
        assert!(detect_special_patterns(&board).is_empty());
        assert!(!board_should_explode(&board));
    }
}
