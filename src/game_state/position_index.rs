//! Board occupancy and the per-color tables derived from it.
//!
//! `PositionIndex` owns every piece through an arena of [`PieceId`] slots.
//! Occupancy maps squares to ids, the destination index maps squares to the
//! ids that can currently move there, and kings are referenced by id for
//! constant-time check queries. Threat, defence and pinner sets are kept per
//! color and rebuilt wholesale by the generation passes.
//!
//! Only move commitment and the setup/load entry points mutate occupancy.

use std::collections::{BTreeMap, BTreeSet};

use log::info;

use crate::chess_errors::{LoadError, MoveError};
use crate::game_state::chess_rules::{pawn_home_rank, standard_layout};
use crate::game_state::chess_types::*;
use crate::game_state::piece_record::Piece;

/// Squares one color attacks, covers, or sees a piece behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreatTable {
    /// Empty or enemy-occupied squares this color reaches.
    pub threats: BTreeSet<Position>,
    /// Own-occupied squares this color covers.
    pub defences: BTreeSet<Position>,
    /// Enemy-occupied squares directly behind an attacked enemy piece on a
    /// sliding ray. Advisory: pins are never enforced from this set.
    pub pinners: BTreeSet<Position>,
}

impl ThreatTable {
    pub fn clear(&mut self) {
        self.threats.clear();
        self.defences.clear();
        self.pinners.clear();
    }

    /// Threatened or defended.
    #[inline]
    pub fn covers(&self, square: Position) -> bool {
        self.threats.contains(&square) || self.defences.contains(&square)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionIndex {
    arena: Vec<Option<Piece>>,
    occupancy: BTreeMap<Position, PieceId>,
    destinations: BTreeMap<Position, Vec<PieceId>>,
    threat_tables: [ThreatTable; 2],
    kings: [PieceId; 2],
    en_passant: EnPassantState,
    castled: [bool; 2],
}

impl PositionIndex {
    /// The standard starting layout. No generation pass has run yet.
    pub fn standard() -> Self {
        Self::from_placements(&standard_layout()).expect("standard layout should always load")
    }

    /// Build an index from a `(position, color, kind)` sequence.
    ///
    /// Validates structure only: one piece per square, exactly one king per
    /// color, and no pawn left on its promotion rank. Check legality of the
    /// loaded position is verified by
    /// [`GameState::load`](crate::game_state::game_state::GameState::load).
    /// A pawn placed off its home rank is marked as having moved.
    pub fn from_placements(placements: &[PlacedPiece]) -> Result<Self, LoadError> {
        let mut arena = Vec::with_capacity(placements.len());
        let mut occupancy = BTreeMap::new();
        let mut kings: [Option<PieceId>; 2] = [None, None];

        for placed in placements {
            if occupancy.contains_key(&placed.position) {
                return Err(LoadError::OvercrowdedSquare(placed.position));
            }
            if placed.kind == PieceKind::Pawn && placed.position.rank() == placed.color.last_rank() {
                return Err(LoadError::UnpromotedPawn(placed.position));
            }

            let id = PieceId(arena.len());
            if placed.kind == PieceKind::King {
                let slot = &mut kings[placed.color.index()];
                if slot.is_some() {
                    return Err(LoadError::TooManyKings(placed.color));
                }
                *slot = Some(id);
            }

            let mut piece = Piece::new(placed.kind, placed.color, placed.position);
            if placed.kind == PieceKind::Pawn && placed.position.rank() != pawn_home_rank(placed.color) {
                piece.move_count = 1;
            }
            arena.push(Some(piece));
            occupancy.insert(placed.position, id);
        }

        let white_king = kings[Color::White.index()].ok_or(LoadError::MissingKing(Color::White))?;
        let black_king = kings[Color::Black.index()].ok_or(LoadError::MissingKing(Color::Black))?;

        info!("indexed {} pieces", arena.len());

        Ok(PositionIndex {
            arena,
            occupancy,
            destinations: BTreeMap::new(),
            threat_tables: [ThreatTable::default(), ThreatTable::default()],
            kings: [white_king, black_king],
            en_passant: EnPassantState::default(),
            castled: [false, false],
        })
    }

    // --- Piece lookup ---

    #[inline]
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.arena.get(id.0).and_then(Option::as_ref)
    }

    #[inline]
    pub(crate) fn piece_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.arena.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Like [`piece`](Self::piece) but a dangling id is an invariant violation.
    pub fn live_piece(&self, id: PieceId) -> Result<&Piece, MoveError> {
        self.piece(id)
            .ok_or_else(|| MoveError::InvariantViolation(format!("piece {id:?} is not on the board")))
    }

    pub(crate) fn live_piece_mut(&mut self, id: PieceId) -> Result<&mut Piece, MoveError> {
        self.piece_mut(id)
            .ok_or_else(|| MoveError::InvariantViolation(format!("piece {id:?} is not on the board")))
    }

    #[inline]
    pub fn piece_id_at(&self, square: Position) -> Option<PieceId> {
        self.occupancy.get(&square).copied()
    }

    #[inline]
    pub fn piece_at(&self, square: Position) -> Option<&Piece> {
        self.piece_id_at(square).and_then(|id| self.piece(id))
    }

    #[inline]
    pub fn is_occupied(&self, square: Position) -> bool {
        self.occupancy.contains_key(&square)
    }

    #[inline]
    pub fn owner_at(&self, square: Position) -> Option<Color> {
        self.piece_at(square).map(|piece| piece.color)
    }

    /// Ids of every piece `color` owns, in square order.
    pub fn pieces_of(&self, color: Color) -> Vec<PieceId> {
        self.occupancy
            .values()
            .copied()
            .filter(|&id| self.piece(id).is_some_and(|piece| piece.color == color))
            .collect()
    }

    pub fn piece_count(&self) -> usize {
        self.occupancy.len()
    }

    // --- Kings ---

    #[inline]
    pub fn king_id(&self, color: Color) -> PieceId {
        self.kings[color.index()]
    }

    pub fn king(&self, color: Color) -> Result<&Piece, MoveError> {
        let king = self.live_piece(self.king_id(color))?;
        if king.kind != PieceKind::King || king.color != color {
            return Err(MoveError::InvariantViolation(format!(
                "{color} king reference points at a {:?}",
                king.kind
            )));
        }
        Ok(king)
    }

    pub fn king_position(&self, color: Color) -> Result<Position, MoveError> {
        self.king(color).map(|king| king.position)
    }

    // --- Derived tables ---

    #[inline]
    pub fn threat_table(&self, color: Color) -> &ThreatTable {
        &self.threat_tables[color.index()]
    }

    #[inline]
    pub(crate) fn threat_table_mut(&mut self, color: Color) -> &mut ThreatTable {
        &mut self.threat_tables[color.index()]
    }

    /// Pieces of the last generated side that can move to `square`.
    pub fn pieces_reaching(&self, square: Position) -> &[PieceId] {
        self.destinations.get(&square).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn clear_destinations(&mut self) {
        self.destinations.clear();
    }

    /// Replace a piece's candidate list and its destination-index entries.
    /// Entries left over from the piece's previous list are dropped first.
    pub(crate) fn set_candidates(&mut self, id: PieceId, candidates: Vec<Position>) -> Result<(), MoveError> {
        let previous = std::mem::replace(&mut self.live_piece_mut(id)?.candidates, candidates.clone());
        for square in previous {
            if let Some(ids) = self.destinations.get_mut(&square) {
                ids.retain(|&other| other != id);
                if ids.is_empty() {
                    self.destinations.remove(&square);
                }
            }
        }
        for square in candidates {
            self.destinations.entry(square).or_default().push(id);
        }
        Ok(())
    }

    #[inline]
    pub fn en_passant(&self) -> EnPassantState {
        self.en_passant
    }

    #[inline]
    pub(crate) fn set_en_passant(&mut self, state: EnPassantState) {
        self.en_passant = state;
    }

    /// Whether `color` has already castled. Latched: never cleared by play.
    #[inline]
    pub fn has_castled(&self, color: Color) -> bool {
        self.castled[color.index()]
    }

    #[inline]
    pub(crate) fn set_castled(&mut self, color: Color, castled: bool) {
        self.castled[color.index()] = castled;
    }

    // --- Raw mutation used by move commitment ---

    /// Remove whatever occupies `square` from occupancy, keeping it in the arena.
    pub(crate) fn lift(&mut self, square: Position) -> Option<PieceId> {
        self.occupancy.remove(&square)
    }

    /// Put a live piece on `square` and update its recorded position.
    pub(crate) fn place(&mut self, id: PieceId, square: Position) -> Result<(), MoveError> {
        self.live_piece_mut(id)?.position = square;
        if let Some(previous) = self.occupancy.insert(square, id) {
            if previous != id {
                return Err(MoveError::InvariantViolation(format!(
                    "{square} was already occupied by {previous:?}"
                )));
            }
        }
        Ok(())
    }

    /// Destroy a piece. Kings can never be removed.
    pub(crate) fn take_from_arena(&mut self, id: PieceId) -> Result<Piece, MoveError> {
        if self.kings.contains(&id) {
            return Err(MoveError::InvariantViolation("attempted to delete a king".to_owned()));
        }
        self.arena
            .get_mut(id.0)
            .and_then(Option::take)
            .ok_or_else(|| MoveError::InvariantViolation(format!("piece {id:?} already removed")))
    }

    /// Bring a destroyed piece back into its original slot.
    pub(crate) fn restore_to_arena(&mut self, id: PieceId, piece: Piece) -> Result<(), MoveError> {
        match self.arena.get_mut(id.0) {
            Some(slot) if slot.is_none() => {
                *slot = Some(piece);
                Ok(())
            }
            _ => Err(MoveError::InvariantViolation(format!("slot {id:?} cannot be restored"))),
        }
    }

    /// Create a new piece (promotion). It is not placed on the board.
    pub(crate) fn push_piece(&mut self, piece: Piece) -> PieceId {
        let id = PieceId(self.arena.len());
        self.arena.push(Some(piece));
        id
    }

    /// Destroy the most recently created piece, undoing [`push_piece`](Self::push_piece).
    pub(crate) fn pop_piece(&mut self, id: PieceId) -> Result<Piece, MoveError> {
        if id.0 + 1 != self.arena.len() {
            return Err(MoveError::InvariantViolation(format!(
                "piece {id:?} is not the most recently created"
            )));
        }
        self.arena
            .pop()
            .flatten()
            .ok_or_else(|| MoveError::InvariantViolation(format!("piece {id:?} already removed")))
    }

    // --- External views ---

    /// Full occupancy for external rendering.
    pub fn snapshot(&self) -> BTreeMap<Position, (Color, PieceKind)> {
        self.occupancy
            .iter()
            .filter_map(|(&square, &id)| self.piece(id).map(|p| (square, (p.color, p.kind))))
            .collect()
    }

    /// The `(position, color, kind)` sequence for external persistence, in
    /// square order.
    pub fn placements(&self) -> Vec<PlacedPiece> {
        self.snapshot()
            .into_iter()
            .map(|(position, (color, kind))| PlacedPiece::new(position, color, kind))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Position {
        Position::from_algebraic(name).expect("valid square")
    }

    fn kings_only() -> Vec<PlacedPiece> {
        vec![
            PlacedPiece::new(sq("e1"), Color::White, PieceKind::King),
            PlacedPiece::new(sq("e8"), Color::Black, PieceKind::King),
        ]
    }

    #[test]
    fn standard_index_has_kings_on_e_file() {
        let index = PositionIndex::standard();
        assert_eq!(index.piece_count(), 32);
        assert_eq!(index.king_position(Color::White), Ok(sq("e1")));
        assert_eq!(index.king_position(Color::Black), Ok(sq("e8")));
        assert_eq!(index.pieces_of(Color::White).len(), 16);
    }

    #[test]
    fn load_rejects_structural_problems() {
        let mut crowded = kings_only();
        crowded.push(PlacedPiece::new(sq("e1"), Color::White, PieceKind::Rook));
        assert_eq!(
            PositionIndex::from_placements(&crowded),
            Err(LoadError::OvercrowdedSquare(sq("e1")))
        );

        let mut two_kings = kings_only();
        two_kings.push(PlacedPiece::new(sq("a1"), Color::Black, PieceKind::King));
        assert_eq!(
            PositionIndex::from_placements(&two_kings),
            Err(LoadError::TooManyKings(Color::Black))
        );

        let no_white = vec![PlacedPiece::new(sq("e8"), Color::Black, PieceKind::King)];
        assert_eq!(
            PositionIndex::from_placements(&no_white),
            Err(LoadError::MissingKing(Color::White))
        );

        let mut stuck_pawn = kings_only();
        stuck_pawn.push(PlacedPiece::new(sq("a8"), Color::White, PieceKind::Pawn));
        assert_eq!(
            PositionIndex::from_placements(&stuck_pawn),
            Err(LoadError::UnpromotedPawn(sq("a8")))
        );
    }

    #[test]
    fn advanced_pawns_load_as_moved() {
        let mut placements = kings_only();
        placements.push(PlacedPiece::new(sq("a2"), Color::White, PieceKind::Pawn));
        placements.push(PlacedPiece::new(sq("b4"), Color::White, PieceKind::Pawn));
        let index = PositionIndex::from_placements(&placements).expect("valid position");
        assert!(!index.piece_at(sq("a2")).expect("pawn").has_moved());
        assert!(index.piece_at(sq("b4")).expect("pawn").has_moved());
    }

    #[test]
    fn kings_cannot_leave_the_arena() {
        let mut index = PositionIndex::from_placements(&kings_only()).expect("valid position");
        let king = index.king_id(Color::White);
        assert!(index.take_from_arena(king).unwrap_err().is_fatal());
    }

    #[test]
    fn placements_follow_square_order() {
        let index = PositionIndex::from_placements(&[
            PlacedPiece::new(sq("e8"), Color::Black, PieceKind::King),
            PlacedPiece::new(sq("e1"), Color::White, PieceKind::King),
        ])
        .expect("valid position");
        let squares: Vec<_> = index.placements().iter().map(|p| p.position).collect();
        assert_eq!(squares, vec![sq("e1"), sq("e8")]);
    }
}
