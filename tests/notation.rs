use pretty_assertions::assert_eq;
use tabula::chess::board::Board;
use tabula::chess::core::{PieceKind, Player, Position, Promotion};
use tabula::chess::moves::{Move, MoveFlags};

fn completed(board: &Board, text: &str) -> Move {
    let mut next_move = Move::read(text);
    next_move.complete(board);
    next_move
}

fn play(board: &mut Board, text: &str) {
    let next_move = completed(board, text);
    assert!(board.apply_move(&next_move), "{text} should be legal");
}

#[test]
fn squares() {
    assert_eq!(Position::try_from("a8").unwrap(), Position::new(0, 0));
    assert_eq!(Position::try_from("h1").unwrap(), Position::new(7, 7));
    assert_eq!(Position::new(3, 4).to_string(), "e5");
    assert_eq!(Position::INVALID.to_string(), "--");
    assert_eq!(
        Position::try_from("i1").unwrap_err().to_string(),
        "file should be within 'a'..='h', got 'i'"
    );
    assert_eq!(
        Position::try_from("a9").unwrap_err().to_string(),
        "rank should be within '1'..='8', got '9'"
    );
    assert!(Position::try_from("a10").is_err());
    assert_eq!(Position::from_text("a0"), Position::INVALID);
}

#[test]
fn all_flags() {
    let parsed = Move::read("e5d6E");
    assert_eq!(parsed.flags(), MoveFlags::EN_PASSANT);
    assert_eq!(parsed.capture(), PieceKind::Space);

    let parsed = Move::read("g7h8qN");
    assert_eq!(parsed.promotion(), Some(Promotion::Knight));
    assert_eq!(parsed.capture(), PieceKind::Queen);
    assert_eq!(parsed.to_string(), "g7h8Nq");

    assert_eq!(Move::read("e8g8c").flags(), MoveFlags::CASTLE_KINGSIDE);
    assert_eq!(Move::read("e1c1C").flags(), MoveFlags::CASTLE_QUEENSIDE);
    for letter in ['p', 'n', 'b', 'r', 'q', 'k'] {
        let parsed = Move::read(&format!("a1a2{letter}"));
        assert_eq!(parsed.capture(), PieceKind::try_from(letter).unwrap());
    }
    for letter in ['Q', 'R', 'B', 'N'] {
        let parsed = Move::read(&format!("a7a8{letter}"));
        assert_eq!(parsed.promotion(), Some(Promotion::try_from(letter).unwrap()));
    }
}

#[test]
fn malformed_text_is_kept() {
    for text in ["", "e2", "e2e", "z2e4", "e2e9", "e2e4K", "e2e4 "] {
        let parsed = Move::read(text);
        assert_eq!(parsed.error(), Some(text), "{text:?} should be malformed");
        assert_eq!(parsed.to_string(), text);
        assert!(Move::try_from(text).is_err());
    }
    assert_eq!(
        "e2".parse::<Move>().unwrap_err().to_string(),
        "move should have at least 4 chars, got 'e2'"
    );
}

#[test]
fn special_moves_round_trip() {
    let mut board = Board::try_from(
        "
        r . . . k . . r
        . P . p . . . .
        . . . . . . . .
        . . . . P . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        R . . . K . . R
        ",
    )
    .unwrap();
    let castle = completed(&board, "e1g1");
    let promotion = completed(&board, "b7a8");
    let long_castle = completed(&board, "e1c1");
    play(&mut board, "a1a2");
    play(&mut board, "d7d5");
    let en_passant = completed(&board, "e5d6");
    for original in [castle, promotion, long_castle, en_passant] {
        let decoded = Move::read(&original.to_string());
        assert_eq!(decoded.source(), original.source());
        assert_eq!(decoded.dest(), original.dest());
        assert_eq!(decoded.flags(), original.flags());
        assert_eq!(decoded.promotion(), original.promotion());
        assert_eq!(decoded.error(), None);
    }
    assert_eq!(
        [
            completed(&board, "e1g1").to_string(),
            completed(&board, "b7a8").to_string(),
            completed(&board, "e5d6").to_string(),
        ],
        ["e1g1c", "b7a8Qr", "e5d6E"]
    );
}

#[test]
fn players() {
    assert_eq!(Player::try_from("w").unwrap(), Player::White);
    assert_eq!(Player::try_from("black").unwrap(), Player::Black);
    assert!(Player::try_from("red").is_err());
    assert_eq!(Player::White.opponent(), Player::Black);
}
