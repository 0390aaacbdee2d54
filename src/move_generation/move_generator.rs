//! Per-piece generation passes and their per-color drivers.
//!
//! Each pass reads occupancy only, never another piece's candidate list, so
//! the order pieces are visited in does not matter. The kind is selected by a
//! plain match rather than a trait object.

use log::trace;

use crate::chess_errors::MoveError;
use crate::game_state::chess_types::{Color, PieceId, PieceKind, Position};
use crate::game_state::piece_record::Piece;
use crate::game_state::position_index::{PositionIndex, ThreatTable};
use crate::moves::king_moves::king_moves;
use crate::moves::pawn_moves::{pawn_moves, pawn_threats};
use crate::moves::sliding_moves::{sliding_moves, sliding_threats};
use crate::moves::stepping_moves::{step_moves, step_threats};

/// Pseudo-legal destinations of `piece` in the current position.
pub fn candidate_destinations(index: &PositionIndex, piece: &Piece) -> Result<Vec<Position>, MoveError> {
    let mut out = Vec::with_capacity(16);
    match piece.kind {
        PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => sliding_moves(index, piece, &mut out),
        PieceKind::Knight => step_moves(index, piece, &mut out),
        PieceKind::King => king_moves(index, piece, &mut out)?,
        PieceKind::Pawn => pawn_moves(index, piece, &mut out),
    }
    Ok(out)
}

/// Rebuild one piece's candidate list and its destination-index entries.
pub fn generate_moves(index: &mut PositionIndex, id: PieceId) -> Result<usize, MoveError> {
    let candidates = candidate_destinations(index, index.live_piece(id)?)?;
    let count = candidates.len();
    index.set_candidates(id, candidates)?;
    Ok(count)
}

pub fn generate_threats(index: &PositionIndex, piece: &Piece, table: &mut ThreatTable) {
    match piece.kind {
        PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => sliding_threats(index, piece, table),
        PieceKind::Knight | PieceKind::King => step_threats(index, piece, table),
        PieceKind::Pawn => pawn_threats(index, piece, table),
    }
}

/// Regenerate candidates for every piece `color` owns. The destination index
/// is cleared first and afterwards describes `color` only.
///
/// Castle destinations read the opponent's threat set, so
/// [`generate_threats_for`] must already have run for the opponent.
pub fn generate_moves_for(index: &mut PositionIndex, color: Color) -> Result<usize, MoveError> {
    index.clear_destinations();
    let mut total = 0;
    for id in index.pieces_of(color) {
        total += generate_moves(index, id)?;
    }
    trace!("generated {total} candidate moves for {color}");
    Ok(total)
}

/// Replace `color`'s threat, defence and pinner sets.
pub fn generate_threats_for(index: &mut PositionIndex, color: Color) -> Result<(), MoveError> {
    let mut table = ThreatTable::default();
    for id in index.pieces_of(color) {
        generate_threats(index, index.live_piece(id)?, &mut table);
    }
    trace!(
        "{color} threatens {} squares and defends {}",
        table.threats.len(),
        table.defences.len()
    );
    *index.threat_table_mut(color) = table;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_position_has_twenty_candidates() {
        let mut index = PositionIndex::standard();
        generate_threats_for(&mut index, Color::Black).expect("threats");
        assert_eq!(generate_moves_for(&mut index, Color::White), Ok(20));

        let e4 = Position::from_algebraic("e4").expect("valid square");
        let reaching = index.pieces_reaching(e4);
        assert_eq!(reaching.len(), 1);
        assert_eq!(
            index.piece(reaching[0]).map(|p| p.position),
            Position::from_algebraic("e2")
        );
    }

    #[test]
    fn regenerating_one_piece_replaces_its_destination_entries() {
        let mut index = PositionIndex::standard();
        generate_threats_for(&mut index, Color::Black).expect("threats");
        generate_moves_for(&mut index, Color::White).expect("moves");

        let e2 = Position::from_coords(5, 2);
        let e3 = Position::from_coords(5, 3);
        let e4 = Position::from_coords(5, 4);
        let pawn = index.piece_id_at(e2).expect("pawn");

        assert_eq!(generate_moves(&mut index, pawn), Ok(2));
        assert_eq!(generate_moves(&mut index, pawn), Ok(2));
        assert_eq!(index.pieces_reaching(e4), &[pawn]);
        assert_eq!(index.pieces_reaching(e3), &[pawn]);

        // Block the pawn and regenerate: stale squares must disappear.
        let knight = index.lift(Position::from_coords(2, 8)).expect("knight");
        index.place(knight, e3).expect("place");
        assert_eq!(generate_moves(&mut index, pawn), Ok(0));
        assert!(index.pieces_reaching(e4).is_empty());
        assert!(index.pieces_reaching(e3).is_empty());
    }

    #[test]
    fn generated_destinations_never_hold_own_pieces() {
        let mut index = PositionIndex::standard();
        generate_threats_for(&mut index, Color::White).expect("threats");
        generate_moves_for(&mut index, Color::Black).expect("moves");
        for id in index.pieces_of(Color::Black) {
            let piece = index.piece(id).expect("live piece");
            for &target in &piece.candidates {
                assert_ne!(index.owner_at(target), Some(Color::Black));
            }
        }
    }

    #[test]
    fn opening_threats_cover_the_third_rank() {
        let mut index = PositionIndex::standard();
        generate_threats_for(&mut index, Color::White).expect("threats");
        let table = index.threat_table(Color::White);
        for file in 1..=8 {
            assert!(table.threats.contains(&Position::from_coords(file, 3)));
        }
        assert!(!table.threats.contains(&Position::from_coords(4, 4)));
        assert!(table.defences.contains(&Position::from_coords(5, 2)));
    }
}
