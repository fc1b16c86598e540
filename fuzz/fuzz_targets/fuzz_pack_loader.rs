#![no_main]

use std::path::Path;

use leaselens::config::loader::PackLoader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to string, ignoring invalid UTF-8
    if let Ok(yaml_str) = std::str::from_utf8(data) {
        // Create a loader with default limits
        let loader = PackLoader::with_defaults();

        // Attempt to load the pack
        // We don't care about the result, just that it doesn't panic
        let _ = loader.load_from_str(yaml_str, Path::new("fuzz.yaml"));
    }
});
