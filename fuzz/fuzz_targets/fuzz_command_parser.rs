#![no_main]

use leaselens::session::SessionCommand;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(line) = std::str::from_utf8(data) {
        // Arbitrary input must parse, fail cleanly, or be empty; never panic
        let _ = SessionCommand::parse(line);
    }
});
