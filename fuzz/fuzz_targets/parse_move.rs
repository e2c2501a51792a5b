#![no_main]
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;
use tabula::chess::moves::Move;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let parsed = Move::read(text);
        if parsed.error().is_some() {
            assert_eq!(parsed.to_string(), text);
            return;
        }
        let reparsed = Move::read(&parsed.to_string());
        assert_eq!(reparsed.error(), None);
        assert_eq!(reparsed.source(), parsed.source());
        assert_eq!(reparsed.dest(), parsed.dest());
        assert_eq!(reparsed.flags(), parsed.flags());
    }
});
