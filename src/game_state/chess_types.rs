//! Core value types shared by every part of the rules engine.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::chess_errors::LoadError;

/// Side owning a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Rank direction pawns of this color advance in.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Rank holding this color's king and rooks at setup.
    #[inline]
    pub const fn back_rank(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => 8,
        }
    }

    /// Rank on which this color's pawns promote.
    #[inline]
    pub const fn last_rank(self) -> i8 {
        self.opposite().back_rank()
    }

    /// Integer code used by external save files.
    #[inline]
    pub const fn code(self) -> u8 {
        match self {
            Color::Black => 0,
            Color::White => 1,
        }
    }
}

impl TryFrom<u8> for Color {
    type Error = LoadError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Color::Black),
            1 => Ok(Color::White),
            _ => Err(LoadError::BadEnumValue {
                field: "color",
                value,
            }),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// File/rank displacement applied to a [`Position`].
pub type Offset = (i8, i8);

/// Piece kind. Color is stored separately on the piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Integer code used by external save files.
    #[inline]
    pub const fn code(self) -> u8 {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Rook => 1,
            PieceKind::Knight => 2,
            PieceKind::Bishop => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    #[inline]
    pub const fn is_sliding(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }

    /// Kinds a pawn may promote to.
    #[inline]
    pub const fn is_promotion_target(self) -> bool {
        matches!(
            self,
            PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen
        )
    }

    pub const fn symbol(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }
}

impl TryFrom<u8> for PieceKind {
    type Error = LoadError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PieceKind::Pawn),
            1 => Ok(PieceKind::Rook),
            2 => Ok(PieceKind::Knight),
            3 => Ok(PieceKind::Bishop),
            4 => Ok(PieceKind::Queen),
            5 => Ok(PieceKind::King),
            _ => Err(LoadError::BadEnumValue {
                field: "piece kind",
                value,
            }),
        }
    }
}

/// A square on the board. Files a-h are 1-8, ranks are 1-8.
///
/// Construction always validates, so an off-board `Position` cannot exist.
/// Ordering is rank-major (a1, b1, ..., h1, a2, ...) and only serves
/// deterministic iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "(u8, u8)", into = "(u8, u8)")]
pub struct Position {
    file: i8,
    rank: i8,
}

impl Position {
    #[inline]
    pub const fn new(file: i8, rank: i8) -> Option<Self> {
        if file >= 1 && file <= 8 && rank >= 1 && rank <= 8 {
            Some(Position { file, rank })
        } else {
            None
        }
    }

    /// Const constructor for squares known to be on the board.
    ///
    /// Panics on off-board coordinates; meant for constants and tests.
    pub const fn from_coords(file: i8, rank: i8) -> Self {
        assert!(file >= 1 && file <= 8 && rank >= 1 && rank <= 8, "square off the board");
        Position { file, rank }
    }

    #[inline]
    pub const fn file(self) -> i8 {
        self.file
    }

    #[inline]
    pub const fn rank(self) -> i8 {
        self.rank
    }

    /// The square displaced by `offset`, or `None` when it falls off the board.
    #[inline]
    pub const fn offset(self, offset: Offset) -> Option<Self> {
        Position::new(self.file + offset.0, self.rank + offset.1)
    }

    /// Parse a two-character square name such as `"e4"`.
    pub fn from_algebraic(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        let file = chars.next()?;
        let rank = chars.next()?;
        if chars.next().is_some() || !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return None;
        }
        Position::new((file as u8 - b'a' + 1) as i8, (rank as u8 - b'0') as i8)
    }

    /// Every square in rank-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        (1..=8).flat_map(|rank| (1..=8).map(move |file| Position { file, rank }))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.rank, self.file).cmp(&(other.rank, other.file))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = char::from(b'a' + (self.file - 1) as u8);
        write!(f, "{file}{}", self.rank)
    }
}

impl TryFrom<(u8, u8)> for Position {
    type Error = LoadError;

    fn try_from((file, rank): (u8, u8)) -> Result<Self, Self::Error> {
        i8::try_from(file)
            .ok()
            .zip(i8::try_from(rank).ok())
            .and_then(|(f, r)| Position::new(f, r))
            .ok_or(LoadError::InvalidSquare { file, rank })
    }
}

impl From<Position> for (u8, u8) {
    fn from(position: Position) -> Self {
        (position.file as u8, position.rank as u8)
    }
}

/// Stable handle to a piece in the [`PositionIndex`](crate::game_state::position_index::PositionIndex) arena.
///
/// The destination index and king references hold ids rather than squares,
/// so a piece keeps its identity while it moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub(crate) usize);

/// Result of the castling evaluation for one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CastleRights {
    None,
    Queenside,
    Kingside,
    Both,
}

impl CastleRights {
    pub const fn from_sides(queenside: bool, kingside: bool) -> Self {
        match (queenside, kingside) {
            (true, true) => CastleRights::Both,
            (true, false) => CastleRights::Queenside,
            (false, true) => CastleRights::Kingside,
            (false, false) => CastleRights::None,
        }
    }

    #[inline]
    pub const fn kingside(self) -> bool {
        matches!(self, CastleRights::Kingside | CastleRights::Both)
    }

    #[inline]
    pub const fn queenside(self) -> bool {
        matches!(self, CastleRights::Queenside | CastleRights::Both)
    }
}

/// Classification of the position for the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Nominal,
    Check,
    Checkmate,
    Stalemate,
}

impl GameStatus {
    pub const fn from_flags(in_check: bool, has_legal_move: bool) -> Self {
        match (in_check, has_legal_move) {
            (true, true) => GameStatus::Check,
            (true, false) => GameStatus::Checkmate,
            (false, true) => GameStatus::Nominal,
            (false, false) => GameStatus::Stalemate,
        }
    }

    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, GameStatus::Checkmate | GameStatus::Stalemate)
    }
}

/// En-passant right, valid for exactly one ply after a two-square pawn advance.
///
/// `target` is the square of the pawn that just advanced, i.e. the pawn that
/// may be captured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnPassantState {
    pub target: Option<Position>,
}

impl EnPassantState {
    #[inline]
    pub const fn is_active(self) -> bool {
        self.target.is_some()
    }
}

/// One entry of the `(position, color, kind)` sequence exchanged with
/// external persistence and the bulk-load entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedPiece {
    pub position: Position,
    pub color: Color,
    pub kind: PieceKind,
}

impl PlacedPiece {
    pub const fn new(position: Position, color: Color, kind: PieceKind) -> Self {
        PlacedPiece {
            position,
            color,
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_validate_and_order_rank_major() {
        assert!(Position::new(0, 4).is_none());
        assert!(Position::new(4, 9).is_none());
        let h1 = Position::from_coords(8, 1);
        let a2 = Position::from_coords(1, 2);
        assert!(h1 < a2);
        assert_eq!(Position::all().count(), 64);
        assert_eq!(Position::all().next(), Position::from_algebraic("a1"));
    }

    #[test]
    fn algebraic_names_round_trip() {
        let e4 = Position::from_algebraic("e4").expect("valid square");
        assert_eq!((e4.file(), e4.rank()), (5, 4));
        assert_eq!(e4.to_string(), "e4");
        assert!(Position::from_algebraic("i1").is_none());
        assert!(Position::from_algebraic("e44").is_none());
    }

    #[test]
    fn offsets_fall_off_the_board() {
        let a1 = Position::from_coords(1, 1);
        assert_eq!(a1.offset((1, 2)), Some(Position::from_coords(2, 3)));
        assert_eq!(a1.offset((-1, 0)), None);
    }

    #[test]
    fn enum_codes_reject_unknown_values() {
        assert_eq!(Color::try_from(1), Ok(Color::White));
        assert_eq!(PieceKind::try_from(1), Ok(PieceKind::Rook));
        assert_eq!(
            PieceKind::try_from(6),
            Err(LoadError::BadEnumValue {
                field: "piece kind",
                value: 6
            })
        );
        assert!(Position::try_from((9u8, 1u8)).is_err());
    }

    #[test]
    fn status_mapping_covers_the_four_cases() {
        assert_eq!(GameStatus::from_flags(true, true), GameStatus::Check);
        assert_eq!(GameStatus::from_flags(true, false), GameStatus::Checkmate);
        assert_eq!(GameStatus::from_flags(false, true), GameStatus::Nominal);
        assert_eq!(GameStatus::from_flags(false, false), GameStatus::Stalemate);
    }
}
