use crate::types::{PieceKind, Square};

/// Short algebraic-style text for a move: piece letter, `x` on capture, destination.
///
/// There is no disambiguation between pieces that could reach the same square.
pub fn notation(kind: PieceKind, to: Square, is_capture: bool) -> String {
    let mut s = String::with_capacity(4);
    if let Some(letter) = kind.letter() {
        s.push(letter);
    }
    if is_capture {
        s.push('x');
    }
    s.push_str(&to.coord());
    s
}
