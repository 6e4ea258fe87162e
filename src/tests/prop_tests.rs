use proptest::prelude::*;

use crate::prelude::*;

prop_compose! {
    fn arb_piles()(piles in prop::collection::vec(1u32..6, 1..5)) -> Vec<u32> {
        piles
    }
}

proptest! {
    #[test]
    fn nim_moves_are_all_legal_and_decrease_the_total(piles in arb_piles()) {
        let start = NimGame::new(piles).start();
        let total: u32 = start.piles().iter().sum();
        for mv in start.moves(PlayerId::PlayerFirst).unwrap() {
            let next = start.next(mv).unwrap();
            let next_total: u32 = next.piles().iter().sum();
            prop_assert_eq!(next_total, total - mv.take);
            prop_assert_eq!(next.player(), PlayerId::PlayerSecond);
        }
    }

    #[test]
    fn nim_move_count_matches_the_token_total(piles in arb_piles()) {
        let start = NimGame::new(piles).start();
        let total: u32 = start.piles().iter().sum();
        let moves = start.moves(PlayerId::PlayerFirst).unwrap();
        prop_assert_eq!(moves.len() as u32, total);
    }

    #[test]
    fn tictactoe_turns_alternate_along_any_playout(seed in any::<u64>()) {
        use crate::rand::Rng;
        let mut rng = RngState::seeded(seed);
        let mut state = TicTacToe.start();
        while !state.is_terminal() {
            let player = state.player();
            let moves = state.moves(player).unwrap();
            prop_assert!(!moves.is_empty());
            let mv = moves[rng.0.gen_range(0..moves.len())];
            state = state.next(mv).unwrap();
            prop_assert_eq!(state.last_mover(), player);
        }
        prop_assert!(state.outcome().is_some());
    }
}
