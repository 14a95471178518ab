#![no_main]

use libfuzzer_sys::fuzz_target;
use vouch_verification::compare;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let (found, expected) = text.split_once('\n').unwrap_or((text, text));

    let _ = compare(found, expected);

    // Every well-typed requirement satisfies itself.
    if vouch_grammar::Comparison::parse(found).is_ok() {
        assert!(compare(found, found).is_none());
    }
});
