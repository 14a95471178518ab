#![no_main]

use libfuzzer_sys::fuzz_target;
use vouch_grammar::ResourceId;
use vouch_statement::scan_resources;
use vouch_types::Provider;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // The resource parser must tolerate anything: malformed lines are dropped.
    for provider in Provider::ALL {
        let _ = scan_resources(text, provider);
    }

    // Every identifier that decodes must re-encode to something that decodes
    // to the same identifier.
    for line in text.lines() {
        if let Ok(id) = ResourceId::parse(line) {
            assert_eq!(ResourceId::parse(&id.to_string()), Ok(id));
        }
    }
});
