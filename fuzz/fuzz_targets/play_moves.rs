#![no_main]
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;
use tabula::chess::core::Position;
use tabula::game::Game;
use tabula::interface::Selection;

// Every byte is a click on one of the 64 squares.
fuzz_target!(|data: &[u8]| {
    let mut game = Game::default();
    let mut ui = Selection::new();
    let mut snapshots = vec![game.board().clone()];
    for &byte in data {
        let square = byte % 64;
        ui.select(Position::new((square / 8) as i8, (square % 8) as i8));
        let _ = game.on_click(&mut ui);
        if game.board().ply() as usize == snapshots.len() {
            snapshots.push(game.board().clone());
        }
        for (index, piece) in game.board().pieces().enumerate() {
            assert_eq!(piece.position().index(), Some(index));
        }
        assert_eq!(game.board().history().len(), game.board().ply() as usize);
    }
    snapshots.pop();
    while let Some(snapshot) = snapshots.pop() {
        game.undo().expect("every played move can be taken back");
        assert_eq!(game.board(), &snapshot);
    }
});
