//! Exhaustive minimax search for the computer player.
//!
//! Every remaining line of play is explored with no pruning and no
//! memoization. Scores are `+1`/`0`/`-1` from the computer's point of view and
//! carry no notion of distance, so a win in one move and a win in three moves
//! are worth the same. Ties go to the lowest-indexed move, which keeps the
//! chosen move reproducible.

use log::{debug, trace};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::game::Game;
use crate::tic_tac_toe::{Board, Mark};

pub(crate) const WIN: i8 = 1;
pub(crate) const DRAW: i8 = 0;
pub(crate) const LOSS: i8 = -1;

/// Center and corners, every one of them a safe first move.
pub(crate) const OPENING_CELLS: [usize; 5] = [0, 2, 4, 6, 8];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SearchResult<A> {
    pub score: i8,
    pub best_move: Option<A>,
}

impl<A> SearchResult<A> {
    fn terminal(score: i8) -> Self {
        Self {
            score,
            best_move: None,
        }
    }
}

/// Picks the computer's move.
///
/// On an empty board one of [`OPENING_CELLS`] is drawn from `rng` instead of
/// searching. Returns `None` only when the board is already decided, which the
/// caller is expected to rule out first.
pub(crate) fn cpu_move<R: Rng + ?Sized>(
    board: &Board,
    ai: Mark,
    human: Mark,
    rng: &mut R,
) -> Option<usize> {
    if board.is_empty() {
        let cell = OPENING_CELLS.choose(rng).copied();
        debug!("{} opens at {:?}", ai, cell);
        return cell;
    }

    let result = search(board, true, ai, human);
    debug!(
        "{} plays {:?} with score {}",
        ai, result.best_move, result.score
    );
    result.best_move
}

/// Scores `game` for `ai`. When `maximizing` it is `ai` to move, otherwise
/// `human`.
pub(crate) fn search<G: Game>(
    game: &G,
    maximizing: bool,
    ai: G::Player,
    human: G::Player,
) -> SearchResult<G::Action> {
    let mut nodes = 0usize;
    let result = minimax(game, maximizing, ai, human, &mut nodes);
    trace!("visited {} nodes", nodes);
    result
}

fn minimax<G: Game>(
    game: &G,
    maximizing: bool,
    ai: G::Player,
    human: G::Player,
    nodes: &mut usize,
) -> SearchResult<G::Action> {
    *nodes += 1;

    match game.winner() {
        Some(winner) if winner == ai => return SearchResult::terminal(WIN),
        Some(winner) if winner == human => return SearchResult::terminal(LOSS),
        _ if game.is_full() => return SearchResult::terminal(DRAW),
        _ => {}
    }

    // i8::MIN and i8::MAX stand in for -inf and +inf.
    let (player, mut best_score) = if maximizing {
        (ai, i8::MIN)
    } else {
        (human, i8::MAX)
    };
    let mut best_move = None;

    for action in game.available_moves() {
        let mut child = game.clone();
        child.place(action, player);
        let score = minimax(&child, !maximizing, ai, human, nodes).score;

        let improved = if maximizing {
            score > best_score
        } else {
            score < best_score
        };
        if improved {
            best_score = score;
            best_move = Some(action);
        }
    }

    SearchResult {
        score: best_score,
        best_move,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::tic_tac_toe::{board, GameOutcome};

    fn play_out(mut board: Board, mut to_move: Mark, rng: &mut StdRng) -> GameOutcome {
        while board.outcome() == GameOutcome::InProgress {
            let cell = cpu_move(&board, to_move, to_move.opponent(), rng).unwrap();
            board.play(cell, to_move).unwrap();
            to_move = to_move.opponent();
        }
        board.outcome()
    }

    /// Walks every possible reply by the human and fails if `ai` ever loses.
    fn assert_never_loses(board: Board, to_move: Mark, ai: Mark, rng: &mut StdRng) {
        match board.outcome() {
            GameOutcome::Win(mark) => {
                assert_eq!(mark, ai, "{} lost on\n{}", ai, board);
                return;
            }
            GameOutcome::Draw => return,
            GameOutcome::InProgress => {}
        }

        if to_move == ai {
            let cell = cpu_move(&board, ai, ai.opponent(), rng).unwrap();
            let mut next = board;
            next.play(cell, ai).unwrap();
            assert_never_loses(next, ai.opponent(), ai, rng);
        } else {
            for cell in board.available_moves() {
                let mut next = board;
                next.play(cell, to_move).unwrap();
                assert_never_loses(next, ai, ai, rng);
            }
        }
    }

    #[test]
    fn test_opening_is_center_or_corner() {
        let mut rng = StdRng::seed_from_u64(7);
        let board = Board::new();
        let mut seen = HashSet::new();
        for _ in 0..200 {
            let cell = cpu_move(&board, Mark::X, Mark::O, &mut rng).unwrap();
            assert!(OPENING_CELLS.contains(&cell), "opened at {}", cell);
            seen.insert(cell);
        }
        assert!(seen.len() > 1, "opening never varied: {:?}", seen);
    }

    #[test]
    fn test_full_search_from_empty_board() {
        let result = search(&Board::new(), true, Mark::X, Mark::O);
        assert_eq!(
            result,
            SearchResult {
                score: DRAW,
                best_move: Some(0)
            }
        );
    }

    #[test]
    fn test_blocks_open_line() {
        // X threatens the bottom row; only 6 avoids a loss.
        let board = board("....O..XX");
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(cpu_move(&board, Mark::O, Mark::X, &mut rng), Some(6));
        assert_eq!(
            search(&board, true, Mark::O, Mark::X),
            SearchResult {
                score: DRAW,
                best_move: Some(6)
            }
        );
    }

    #[test]
    fn test_search_ignores_win_distance() {
        // O wins at once on 5, but 2 forks rows and diagonal and also wins.
        let board = board("XX.OO....");
        let result = search(&board, true, Mark::O, Mark::X);
        assert_eq!(result.score, WIN);
        assert_eq!(result.best_move, Some(2));

        let mut immediate = board;
        immediate.play(5, Mark::O).unwrap();
        assert_eq!(immediate.winner(), Some(Mark::O));
    }

    #[test]
    fn test_last_cell_scores() {
        assert_eq!(
            search(&board("XOXXOOOX."), true, Mark::X, Mark::O),
            SearchResult {
                score: DRAW,
                best_move: Some(8)
            }
        );
        assert_eq!(
            search(&board("XOXOXOOX."), true, Mark::X, Mark::O),
            SearchResult {
                score: WIN,
                best_move: Some(8)
            }
        );
        assert_eq!(
            search(&board("XOXOXOOX."), true, Mark::O, Mark::X),
            SearchResult {
                score: DRAW,
                best_move: Some(8)
            }
        );
        assert_eq!(
            search(&board("XOXOXOOX."), false, Mark::O, Mark::X),
            SearchResult {
                score: LOSS,
                best_move: Some(8)
            }
        );
    }

    #[test]
    fn test_decided_board_has_no_move() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            search(&board("XXXOO...."), true, Mark::O, Mark::X),
            SearchResult {
                score: LOSS,
                best_move: None
            }
        );
        assert_eq!(
            search(&board("OOOXX.X.."), false, Mark::O, Mark::X).score,
            WIN
        );
        assert_eq!(cpu_move(&board("XOXOXOOXO"), Mark::X, Mark::O, &mut rng), None);
    }

    #[test]
    fn test_board_left_untouched() {
        let board = board("X...O...X");
        let before = board;
        let mut rng = StdRng::seed_from_u64(0);
        let _ = cpu_move(&board, Mark::O, Mark::X, &mut rng);
        let _ = search(&board, false, Mark::O, Mark::X);
        assert_eq!(board, before);
    }

    #[test]
    fn test_self_play_draws() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10 {
            assert_eq!(play_out(Board::new(), Mark::X, &mut rng), GameOutcome::Draw);
        }
    }

    #[test]
    fn test_never_loses_as_o() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_never_loses(Board::new(), Mark::X, Mark::O, &mut rng);
    }

    #[test]
    fn test_never_loses_as_x() {
        let mut rng = StdRng::seed_from_u64(2);
        for cell in OPENING_CELLS {
            let mut board = Board::new();
            board.play(cell, Mark::X).unwrap();
            assert_never_loses(board, Mark::O, Mark::X, &mut rng);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn cpu_move_is_legal(
            order in Just((0..9).collect::<Vec<usize>>()).prop_shuffle(),
            played in 0..9usize,
            seed in any::<u64>(),
        ) {
            let mut board = Board::new();
            let mut to_move = Mark::X;
            for &cell in order.iter().take(played) {
                if board.outcome() != GameOutcome::InProgress {
                    break;
                }
                board.play(cell, to_move).unwrap();
                to_move = to_move.opponent();
            }
            prop_assume!(board.outcome() == GameOutcome::InProgress);

            let mut rng = StdRng::seed_from_u64(seed);
            let cell = cpu_move(&board, to_move, to_move.opponent(), &mut rng).unwrap();
            prop_assert!(board.available_moves().contains(&cell));
        }
    }
}
