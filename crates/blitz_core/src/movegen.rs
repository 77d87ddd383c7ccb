use crate::{board::Board, types::*};

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_DELTAS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const BISHOP_RAYS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const ROOK_RAYS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const QUEEN_RAYS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
];

/// A pseudo-legal move for the side to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub piece: PieceId,
    pub from: Square,
    pub to: Square,
    pub captured: Option<PieceId>,
}

impl Candidate {
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

/// Destination squares for one piece, in a fixed per-kind enumeration order.
///
/// Occupancy rules only: nothing here knows about check.
pub fn generate_moves(piece: &Piece, board: &Board) -> Vec<Square> {
    let mut out = Vec::with_capacity(28);
    generate_moves_into(piece, board, &mut out);
    out
}

/// Same as [`generate_moves`], reusing the caller's buffer.
pub fn generate_moves_into(piece: &Piece, board: &Board, out: &mut Vec<Square>) {
    out.clear();
    match piece.kind {
        PieceKind::Pawn => gen_pawn(piece, board, out),
        PieceKind::Knight => gen_steps(piece, board, &KNIGHT_DELTAS, out),
        PieceKind::Bishop => gen_slider(piece, board, &BISHOP_RAYS, out),
        PieceKind::Rook => gen_slider(piece, board, &ROOK_RAYS, out),
        PieceKind::Queen => gen_slider(piece, board, &QUEEN_RAYS, out),
        PieceKind::King => gen_steps(piece, board, &KING_DELTAS, out),
    }
}

/// Every pseudo-legal move for `side`, pieces visited in id order.
pub fn legal_moves(board: &Board, side: Side) -> Vec<Candidate> {
    let mut out = Vec::with_capacity(64);
    let mut dests = Vec::with_capacity(28);
    for piece in board.pieces_of(side) {
        generate_moves_into(piece, board, &mut dests);
        out.extend(dests.iter().map(|&to| Candidate {
            piece: piece.id,
            from: piece.position,
            to,
            captured: board.id_at(to),
        }));
    }
    out
}

fn gen_pawn(piece: &Piece, board: &Board, out: &mut Vec<Square>) {
    let dir = piece.side.forward();
    let from = piece.position;

    // forward 1, then forward 2 for an unmoved pawn
    if let Some(to) = from.offset(dir, 0) {
        if board.piece_at(to).is_none() {
            out.push(to);
            if !piece.has_moved {
                if let Some(to2) = from.offset(2 * dir, 0) {
                    if board.piece_at(to2).is_none() {
                        out.push(to2);
                    }
                }
            }
        }
    }

    // diagonal captures only; an empty diagonal is never a move
    for df in [1, -1] {
        if let Some(to) = from.offset(dir, df) {
            if let Some(target) = board.piece_at(to) {
                if target.side != piece.side {
                    out.push(to);
                }
            }
        }
    }
}

fn gen_steps(piece: &Piece, board: &Board, deltas: &[(i8, i8)], out: &mut Vec<Square>) {
    for &(dr, df) in deltas {
        if let Some(to) = piece.position.offset(dr, df) {
            match board.piece_at(to) {
                None => out.push(to),
                Some(pc) if pc.side != piece.side => out.push(to),
                _ => {}
            }
        }
    }
}

fn gen_slider(piece: &Piece, board: &Board, rays: &[(i8, i8)], out: &mut Vec<Square>) {
    for &(dr, df) in rays {
        let mut cur = piece.position;
        while let Some(to) = cur.offset(dr, df) {
            match board.piece_at(to) {
                None => out.push(to),
                Some(pc) if pc.side != piece.side => {
                    out.push(to);
                    break;
                }
                _ => break,
            }
            cur = to;
        }
    }
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
