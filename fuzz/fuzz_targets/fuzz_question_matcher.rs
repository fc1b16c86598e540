#![no_main]

use leaselens::chat::QuestionMatcher;
use leaselens::config::schema::ChatConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Try to parse as JSON and then as a chat config
    if let Ok(chat) = serde_json::from_slice::<ChatConfig>(data) {
        let matcher = QuestionMatcher::compile(&chat);

        // Route a few probes through the compiled table; any canned
        // question from the config itself must route somewhere sane
        let _ = matcher.match_question("");
        let _ = matcher.match_question("can my landlord raise my rent?");
        for qa in &chat.canned {
            let _ = matcher.match_question(&qa.question);
        }
    }
});
