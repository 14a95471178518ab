#![no_main]

use libfuzzer_sys::fuzz_target;
use vouch_statement::Statement;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // A statement that parses must render back to text that parses to the
    // same statement.
    if let Ok(statement) = Statement::parse(text) {
        if let Ok(rendered) = statement.render() {
            assert_eq!(Statement::parse(&rendered).ok(), Some(statement));
        }
    }
});
