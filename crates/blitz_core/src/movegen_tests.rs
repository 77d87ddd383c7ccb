use super::*;
use crate::state::GameState;

fn sq(rank: i8, file: i8) -> Square {
    Square::new(rank, file).unwrap()
}

fn lone(kind: PieceKind, side: Side, at: Square) -> (Board, Piece) {
    let mut board = Board::empty();
    let id = board.place(kind, side, at).unwrap();
    let piece = *board.piece(id).unwrap();
    (board, piece)
}

#[test]
fn test_startpos_moves() {
    let state = GameState::initial();
    // 16 pawn moves plus 4 knight moves, as in standard chess
    assert_eq!(state.legal_moves().len(), 20);
}

#[test]
fn test_unmoved_pawn_single_and_double_step() {
    let (board, pawn) = lone(PieceKind::Pawn, Side::White, sq(1, 4));
    assert_eq!(generate_moves(&pawn, &board), vec![sq(2, 4), sq(3, 4)]);
}

#[test]
fn test_black_pawn_moves_down() {
    let (board, pawn) = lone(PieceKind::Pawn, Side::Black, sq(6, 2));
    assert_eq!(generate_moves(&pawn, &board), vec![sq(5, 2), sq(4, 2)]);
}

#[test]
fn test_moved_pawn_has_no_double_step() {
    let state = GameState::from_placement("8/8/8/8/8/4P3/8/8", Side::White).unwrap();
    let pawn = state.board.piece_at(sq(2, 4)).unwrap();
    assert!(pawn.has_moved);
    assert_eq!(generate_moves(pawn, &state.board), vec![sq(3, 4)]);
}

#[test]
fn test_pawn_blocked_in_front() {
    let state = GameState::from_placement("8/8/8/8/8/4p3/4P3/8", Side::White).unwrap();
    let pawn = state.board.piece_at(sq(1, 4)).unwrap();
    assert!(generate_moves(pawn, &state.board).is_empty());
}

#[test]
fn test_pawn_double_step_blocked_on_destination() {
    let state = GameState::from_placement("8/8/8/8/4p3/8/4P3/8", Side::White).unwrap();
    let pawn = state.board.piece_at(sq(1, 4)).unwrap();
    assert_eq!(generate_moves(pawn, &state.board), vec![sq(2, 4)]);
}

#[test]
fn test_pawn_captures_only_enemies_diagonally() {
    // enemy on f3, friend on d3, nothing in front
    let state = GameState::from_placement("8/8/8/8/8/3N1n2/4P3/8", Side::White).unwrap();
    let pawn = state.board.piece_at(sq(1, 4)).unwrap();
    assert_eq!(
        generate_moves(pawn, &state.board),
        vec![sq(2, 4), sq(3, 4), sq(2, 5)]
    );
}

#[test]
fn test_pawn_on_last_rank_stays_on_board() {
    let state = GameState::from_placement("4P3/8/8/8/8/8/8/8", Side::White).unwrap();
    let pawn = state.board.piece_at(sq(7, 4)).unwrap();
    assert!(generate_moves(pawn, &state.board).is_empty());
}

#[test]
fn test_knight_in_corner_region() {
    let (board, knight) = lone(PieceKind::Knight, Side::White, sq(0, 1));
    assert_eq!(
        generate_moves(&knight, &board),
        vec![sq(1, 3), sq(2, 0), sq(2, 2)]
    );
}

#[test]
fn test_knight_own_piece_blocks_single_offset() {
    let state = GameState::from_placement("8/8/8/8/8/P1p5/8/1N6", Side::White).unwrap();
    let knight = state.board.piece_at(sq(0, 1)).unwrap();
    // a3 is friendly, c3 is an enemy
    assert_eq!(
        generate_moves(knight, &state.board),
        vec![sq(1, 3), sq(2, 2)]
    );
}

#[test]
fn test_rook_ray_stops_at_pieces() {
    // rook d4, friendly pawn d6, enemy pawn f4
    let state = GameState::from_placement("8/8/3P4/8/3R1p2/8/8/8", Side::White).unwrap();
    let rook = state.board.piece_at(sq(3, 3)).unwrap();
    let moves = generate_moves(rook, &state.board);

    assert!(moves.contains(&sq(4, 3)));
    assert!(!moves.contains(&sq(5, 3)), "friendly square is excluded");
    assert!(!moves.contains(&sq(6, 3)), "ray does not continue past a blocker");
    assert!(moves.contains(&sq(3, 5)), "enemy square is a capture");
    assert!(!moves.contains(&sq(3, 6)));
    assert_eq!(moves.len(), 3 + 1 + 3 + 2);
}

#[test]
fn test_bishop_and_queen_counts_on_empty_board() {
    let (board, bishop) = lone(PieceKind::Bishop, Side::Black, sq(3, 3));
    assert_eq!(generate_moves(&bishop, &board).len(), 13);

    let (board, queen) = lone(PieceKind::Queen, Side::Black, sq(3, 3));
    assert_eq!(generate_moves(&queen, &board).len(), 27);
}

#[test]
fn test_queen_enumerates_diagonals_first() {
    let (board, queen) = lone(PieceKind::Queen, Side::White, sq(0, 0));
    let moves = generate_moves(&queen, &board);
    assert_eq!(moves[0], sq(1, 1));
    assert_eq!(moves[7], sq(1, 0));
}

#[test]
fn test_king_may_step_next_to_enemy_king() {
    let state = GameState::from_placement("8/8/8/3k4/8/3K4/8/8", Side::White).unwrap();
    let king = state.board.piece_at(sq(2, 3)).unwrap();
    let moves = generate_moves(king, &state.board);
    assert_eq!(moves.len(), 8);
    assert!(moves.contains(&sq(3, 3)));
}

#[test]
fn test_legal_moves_flag_captures() {
    let state = GameState::from_placement("8/8/8/8/8/8/8/r3K3", Side::White).unwrap();
    let captures: Vec<_> = state
        .legal_moves()
        .into_iter()
        .filter(Candidate::is_capture)
        .collect();
    assert!(captures.is_empty(), "a1 is four files away from the king");

    let state = GameState::from_placement("8/8/8/8/8/8/8/3rK3", Side::White).unwrap();
    let captures: Vec<_> = state
        .legal_moves()
        .into_iter()
        .filter(Candidate::is_capture)
        .collect();
    assert_eq!(captures.len(), 1);
    assert_eq!(captures[0].to, sq(0, 3));
}
