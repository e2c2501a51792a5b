use pretty_assertions::assert_eq;
use tabula::chess::core::{PieceKind, Player, Position};
use tabula::game::{Click, Game};
use tabula::interface::{Canvas, Interaction, Selection, TextCanvas};

fn click(game: &mut Game, ui: &mut Selection, square: &str) -> Click {
    ui.select(Position::from_text(square));
    game.on_click(ui)
}

fn moved(game: &mut Game, ui: &mut Selection, from: &str, to: &str) -> String {
    assert_eq!(click(game, ui, from), Click::Hinted, "{from} should be a piece");
    match click(game, ui, to) {
        Click::Moved(played) => played.to_string(),
        other => panic!("{from}{to} should be played, got {other:?}"),
    }
}

#[test]
fn castling_by_clicks() {
    let mut game = Game::default();
    let mut ui = Selection::new();
    for (from, to) in [
        ("e2", "e4"),
        ("e7", "e5"),
        ("g1", "f3"),
        ("b8", "c6"),
        ("f1", "c4"),
    ] {
        let _ = moved(&mut game, &mut ui, from, to);
    }
    assert_eq!(moved(&mut game, &mut ui, "g8", "f6"), "g8f6");
    assert_eq!(moved(&mut game, &mut ui, "e1", "g1"), "e1g1c");
    let board = game.board();
    assert_eq!(board[Position::from_text("g1")].kind(), PieceKind::King);
    assert_eq!(board[Position::from_text("f1")].kind(), PieceKind::Rook);
    assert_eq!(board.side_to_move(), Player::Black);
}

#[test]
fn pieces_can_not_jump() {
    let mut game = Game::default();
    let mut ui = Selection::new();
    // The bishop is blocked by its own pawns.
    assert_eq!(click(&mut game, &mut ui, "f1"), Click::Hinted);
    assert!(game.possible().is_empty());
    assert_eq!(click(&mut game, &mut ui, "b5"), Click::Cleared);
    assert_eq!(game.board().ply(), 0);
    assert!(!game.play("f1b5").unwrap());
    assert!(!game.play("a1a3").unwrap());
    assert!(game.play("a2a4").unwrap());
}

#[test]
fn fake_castle_is_refused() {
    let mut game = Game::default();
    for text in ["e2e4", "e7e5", "e1e2", "e8e7", "e2e1", "e7e8", "g1f3", "g8f6", "f1c4", "f8c5"] {
        assert!(game.play(text).unwrap(), "{text} should be legal");
    }
    // The king has moved, so the two-square step is neither a castle nor a
    // king move.
    assert!(!game.play("e1g1").unwrap());
    assert!(!game.play("e1g1c").unwrap());
    assert_eq!(
        game.hints(Position::from_text("e1"))
            .iter()
            .map(ToString::to_string)
            .filter(|m| m.ends_with('c'))
            .collect::<Vec<_>>(),
        vec!["e1g1c"]
    );
}

#[test]
fn en_passant_by_clicks() {
    let mut game = Game::default();
    let mut ui = Selection::new();
    for text in ["e2e4", "a7a6", "e4e5", "d7d5"] {
        assert!(game.play(text).unwrap());
    }
    assert_eq!(click(&mut game, &mut ui, "e5"), Click::Hinted);
    assert!(game
        .possible()
        .iter()
        .any(|m| m.to_string() == "e5d6E"));
    let Click::Moved(played) = click(&mut game, &mut ui, "d6") else {
        panic!("en passant should be played");
    };
    assert_eq!(played.to_string(), "e5d6E");
    assert!(game.board()[Position::from_text("d5")].is_space());
}

#[test]
fn under_promotion_is_accepted() {
    let mut game = Game::default();
    for text in ["h2h4", "g7g5", "h4g5", "h7h6", "g5h6", "f8g7", "h6g7", "e7e6"] {
        assert!(game.play(text).unwrap(), "{text} should be legal");
    }
    assert!(game.play("g7h8Nr").unwrap());
    assert_eq!(
        game.board()[Position::from_text("h8")].kind(),
        PieceKind::Knight
    );
    assert_eq!(game.undo().unwrap().to_string(), "g7h8Nr");
    assert!(game.play("g7h8").unwrap());
    assert_eq!(
        game.board()[Position::from_text("h8")].kind(),
        PieceKind::Queen
    );
}

#[test]
fn drawing_hints() {
    let mut game = Game::default();
    let mut ui = Selection::new();
    assert_eq!(click(&mut game, &mut ui, "b1"), Click::Hinted);
    let mut canvas = TextCanvas::new();
    game.draw(&mut canvas, &ui);
    let rendered = canvas.to_string();
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines[5], "3 *  .  *  .  .  .  .  .");
    assert_eq!(lines[7], "1 R [N] B  Q  K  B  N  R");
    canvas.draw_board();
    assert_eq!(canvas, TextCanvas::new());
    game.reset();
    assert!(game.possible().is_empty());
    assert_eq!(ui.hover(), Position::INVALID);
}
