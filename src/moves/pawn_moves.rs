//! Pawn pushes, diagonal captures and en passant.

use crate::game_state::chess_types::{PieceKind, Position};
use crate::game_state::piece_record::Piece;
use crate::game_state::position_index::{PositionIndex, ThreatTable};

/// Diagonal squares a pawn attacks.
pub fn pawn_attack_squares(piece: &Piece) -> impl Iterator<Item = Position> + '_ {
    let forward = piece.color.forward();
    [-1, 1]
        .into_iter()
        .filter_map(move |df| piece.position.offset((df, forward)))
}

/// The enemy pawn this pawn may take en passant, if the current en-passant
/// target sits beside it on the adjacent file.
pub fn en_passant_victim(index: &PositionIndex, piece: &Piece) -> Option<Position> {
    let target = index.en_passant().target?;
    let beside = target.rank() == piece.position.rank()
        && (target.file() - piece.position.file()).abs() == 1;
    if !beside {
        return None;
    }
    let victim = index.piece_at(target)?;
    (victim.kind == PieceKind::Pawn && victim.color != piece.color).then_some(target)
}

pub fn pawn_moves(index: &PositionIndex, piece: &Piece, out: &mut Vec<Position>) {
    let forward = piece.color.forward();

    if let Some(one) = piece.position.offset((0, forward)) {
        if !index.is_occupied(one) {
            out.push(one);
            if !piece.has_moved() {
                if let Some(two) = one.offset((0, forward)) {
                    if !index.is_occupied(two) {
                        out.push(two);
                    }
                }
            }
        }
    }

    for target in pawn_attack_squares(piece) {
        if index.owner_at(target).is_some_and(|owner| owner != piece.color) {
            out.push(target);
        }
    }

    if let Some(victim) = en_passant_victim(index, piece) {
        if let Some(landing) = victim.offset((0, forward)) {
            out.push(landing);
        }
    }
}

/// Both diagonals are attacked whether or not they are occupied. An
/// en-passant victim is also threatened.
pub fn pawn_threats(index: &PositionIndex, piece: &Piece, table: &mut ThreatTable) {
    for target in pawn_attack_squares(piece) {
        if index.owner_at(target) == Some(piece.color) {
            table.defences.insert(target);
        } else {
            table.threats.insert(target);
        }
    }
    if let Some(victim) = en_passant_victim(index, piece) {
        table.threats.insert(victim);
    }
}
