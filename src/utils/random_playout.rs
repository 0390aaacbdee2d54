//! Seeded random playouts that re-check the engine's invariants every ply.
//!
//! Used by the `rules_soak` binary and the integration tests. Each ply picks
//! a legal move uniformly, then verifies that candidate lists stay
//! pseudo-legal and that classification and a commit/revert pair leave the
//! index unchanged before playing it for real.

use log::debug;
use rand::prelude::IndexedRandom;
use rand::{rngs::StdRng, SeedableRng};

use crate::chess_errors::MoveError;
use crate::game_state::chess_types::{Color, PieceKind};
use crate::game_state::game_state::{GameState, Outcome};
use crate::move_generation::game_status::classify;
use crate::move_generation::legal_move_apply::commit;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayoutEnd {
    Finished(Outcome),
    MaxPlies,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayoutSummary {
    pub seed: u64,
    pub plies: u32,
    pub captures: u32,
    pub end: PlayoutEnd,
}

/// Play from the standard position until the game ends or `max_plies` is
/// reached. A broken invariant is reported as [`MoveError::InvariantViolation`].
pub fn random_playout(seed: u64, max_plies: u32) -> Result<PlayoutSummary, MoveError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut game = GameState::new_game();
    let mut captures = 0;

    while game.ply < max_plies {
        if let Some(outcome) = game.outcome() {
            return Ok(PlayoutSummary {
                seed,
                plies: game.ply,
                captures,
                end: PlayoutEnd::Finished(outcome),
            });
        }

        check_candidates(&game)?;
        check_classify_is_pure(&mut game)?;

        let moves = game.legal_moves()?;
        let request = *moves
            .as_slice()
            .choose(&mut rng)
            .ok_or_else(|| MoveError::InvariantViolation("position is not terminal but has no legal move".to_owned()))?;

        let before = game.index.clone();
        let tx = commit(&mut game.index, &request, &mut PieceKind::Queen)?;
        tx.revert(&mut game.index)?;
        if game.index != before {
            return Err(MoveError::InvariantViolation(format!(
                "revert of {}{} did not restore the board (seed {seed}, ply {})",
                request.start, request.end, game.ply
            )));
        }

        let report = game.play(&request, &mut PieceKind::Queen)?;
        if report.captured.is_some() {
            captures += 1;
        }
        debug!("seed {seed} ply {}: {}{}", game.ply, request.start, request.end);
    }

    Ok(PlayoutSummary {
        seed,
        plies: game.ply,
        captures,
        end: match game.outcome() {
            Some(outcome) => PlayoutEnd::Finished(outcome),
            None => PlayoutEnd::MaxPlies,
        },
    })
}

/// Every candidate of the side to move is on-board by construction, must not
/// hold one of its own pieces and must list the piece exactly once in the
/// destination index.
fn check_candidates(game: &GameState) -> Result<(), MoveError> {
    let side = game.side_to_move;
    for id in game.index.pieces_of(side) {
        let piece = game.index.live_piece(id)?;
        for &target in &piece.candidates {
            if game.index.owner_at(target) == Some(side) {
                return Err(MoveError::InvariantViolation(format!(
                    "{side} {:?} on {} lists its own square {target} (ply {})",
                    piece.kind, piece.position, game.ply
                )));
            }
            let listed = game.index.pieces_reaching(target).iter().filter(|&&other| other == id).count();
            if listed != 1 {
                return Err(MoveError::InvariantViolation(format!(
                    "{side} {:?} on {} appears {listed} times under {target} (ply {})",
                    piece.kind, piece.position, game.ply
                )));
            }
        }
    }
    Ok(())
}

fn check_classify_is_pure(game: &mut GameState) -> Result<(), MoveError> {
    let before = game.index.clone();
    let side: Color = game.side_to_move;
    let status = classify(&mut game.index, side)?;
    if status != game.status || game.index != before {
        return Err(MoveError::InvariantViolation(format!(
            "classify for {side} at ply {} changed the position or disagreed ({status:?} vs {:?})",
            game.ply, game.status
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::Position;

    #[test]
    fn same_seed_same_game() {
        let first = random_playout(7, 40).expect("playout");
        let second = random_playout(7, 40).expect("playout");
        assert_eq!(first, second);
        assert!(first.plies <= 40);
    }

    #[test]
    fn candidates_hold_through_a_capture_sequence() {
        let mut game = GameState::new_game();
        check_candidates(&game).expect("opening candidates");
        for (from, to) in [("e2", "e4"), ("d7", "d5"), ("e4", "d5"), ("d8", "d5"), ("b1", "c3")] {
            let from = Position::from_algebraic(from).expect("valid square");
            let to = Position::from_algebraic(to).expect("valid square");
            let request = game.request(from, to).expect("request");
            game.play(&request, &mut PieceKind::Queen).expect("legal move");
            check_candidates(&game).expect("candidates after move");
        }
    }

    #[test]
    fn own_square_candidate_is_reported() {
        let mut game = GameState::new_game();
        let e2 = Position::from_algebraic("e2").expect("valid square");
        let d2 = Position::from_algebraic("d2").expect("valid square");
        let pawn = game.index.piece_id_at(e2).expect("pawn");
        game.index.set_candidates(pawn, vec![d2]).expect("set candidates");
        assert!(matches!(
            check_candidates(&game),
            Err(MoveError::InvariantViolation(_))
        ));
    }
}
