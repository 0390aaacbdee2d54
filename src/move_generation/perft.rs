use crate::chess_errors::MoveError;
use crate::game_state::chess_types::{GameStatus, PieceKind};
use crate::game_state::game_state::{GameState, PlyReport};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub en_passant: usize,
    pub castles: usize,
    pub promotions: usize,
    pub checks: usize,
    pub checkmates: usize,
    pub stalemates: usize,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
        self.checkmates += rhs.checkmates;
        self.stalemates += rhs.stalemates;
    }

    fn tally(&mut self, report: &PlyReport) {
        self.nodes += 1;
        if report.captured.is_some() {
            self.captures += 1;
        }
        if report.en_passant {
            self.en_passant += 1;
        }
        if report.castled {
            self.castles += 1;
        }
        if report.promoted_to.is_some() {
            self.promotions += 1;
        }
        match report.status {
            GameStatus::Check => self.checks += 1,
            GameStatus::Checkmate => {
                self.checks += 1;
                self.checkmates += 1;
            }
            GameStatus::Stalemate => self.stalemates += 1,
            GameStatus::Nominal => {}
        }
    }
}

/// Count leaf nodes `depth` plies below `game_state`, with tallies of what
/// the last ply did. Every child is played on its own clone.
pub fn perft(game_state: &GameState, depth: u8) -> Result<PerftCounts, MoveError> {
    if depth == 0 {
        return Ok(PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        });
    }

    let mut root = game_state.clone();
    let mut total = PerftCounts::default();
    for request in root.legal_moves()? {
        let mut child = root.clone();
        let report = child.play(&request, &mut PieceKind::Queen)?;
        if depth == 1 {
            total.tally(&report);
        } else {
            total.merge(perft(&child, depth - 1)?);
        }
    }
    Ok(total)
}

/// Node count per root move, for narrowing down a mismatch.
pub fn perft_divide(game_state: &GameState, depth: u8) -> Result<Vec<(String, usize)>, MoveError> {
    let mut root = game_state.clone();
    let mut out = Vec::new();
    for request in root.legal_moves()? {
        let mut child = root.clone();
        child.play(&request, &mut PieceKind::Queen)?;
        let nodes = perft(&child, depth.saturating_sub(1))?.nodes;
        let promotion = request.promotion.map(|kind| kind.symbol().to_ascii_lowercase());
        let name = format!(
            "{}{}{}",
            request.start,
            request.end,
            promotion.map(String::from).unwrap_or_default()
        );
        out.push((name, nodes));
    }
    Ok(out)
}
