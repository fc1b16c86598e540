mod common;

use std::time::Duration;

use common::{FAST_TIMINGS, LeaseLensProcess, settle};

fn run_args() -> Vec<&'static str> {
    let mut args = vec!["run"];
    args.extend_from_slice(FAST_TIMINGS);
    args
}

/// Bare invocation starts a session: banner, home screen, clean EOF exit.
#[tokio::test(flavor = "multi_thread")]
async fn banner_and_home_on_start() {
    let proc = LeaseLensProcess::spawn_session(&[]);
    let output = proc.finish().await;

    assert!(
        output.status.success(),
        "EOF should end the session cleanly: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("LeaseLens v"),
        "banner should print on start: {stdout}"
    );
    assert!(
        stdout.contains("== Rental Agreement Analysis =="),
        "home screen should print on start: {stdout}"
    );
}

/// `demo` runs the scripted analysis through to the dashboard.
#[tokio::test(flavor = "multi_thread")]
async fn demo_reaches_dashboard() {
    let mut proc = LeaseLensProcess::spawn_session(&run_args());
    proc.send_line("demo").await;
    settle().await;
    proc.send_line("quit").await;
    let output = proc.finish().await;

    assert!(
        output.status.success(),
        "quit should exit 0: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("== Analyzing your document =="),
        "progress screen should show: {stdout}"
    );
    assert!(
        stdout.contains("[x] Scanning document structure"),
        "step completion should print live: {stdout}"
    );
    assert!(
        stdout.contains("Analysis complete."),
        "completion line should print: {stdout}"
    );
    assert!(
        stdout.contains("== Residential Lease Agreement =="),
        "dashboard should show the analyzed document: {stdout}"
    );
    assert!(
        stdout.contains("Risks found: 2 high, 2 medium, 0 low"),
        "overview should count risks: {stdout}"
    );
}

/// Questions asked before any analysis still get an answer, echoed as
/// plain You/Bot lines.
#[tokio::test(flavor = "multi_thread")]
async fn ask_before_analysis_gets_bot_reply() {
    let mut proc = LeaseLensProcess::spawn_session(&run_args());
    proc.send_line("ask Who pays for repairs if something breaks?")
        .await;
    settle().await;
    let output = proc.finish().await;

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("You: Who pays for repairs if something breaks?"),
        "question should echo: {stdout}"
    );
    assert!(
        stdout.contains("Bot: You're responsible for any repairs over $100"),
        "canned repairs answer should arrive: {stdout}"
    );
}

/// After the demo, a matched question lands in the chat tab transcript.
#[tokio::test(flavor = "multi_thread")]
async fn chat_after_demo_shows_transcript() {
    let mut proc = LeaseLensProcess::spawn_session(&run_args());
    proc.send_line("demo").await;
    settle().await;
    proc.send_line("ask Can my landlord raise my rent whenever they want?")
        .await;
    tokio::time::sleep(Duration::from_millis(300)).await;
    proc.send_line("quit").await;
    let output = proc.finish().await;

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("[chat]"),
        "asking should switch to the chat tab: {stdout}"
    );
    assert!(
        stdout.contains("Bot: Unfortunately, yes."),
        "canned rent answer should show in the transcript: {stdout}"
    );
}

/// Clause details open by id and close with esc.
#[tokio::test(flavor = "multi_thread")]
async fn clause_detail_opens_and_closes() {
    let mut proc = LeaseLensProcess::spawn_session(&run_args());
    proc.send_line("demo").await;
    settle().await;
    proc.send_line("clause entry_rights").await;
    proc.send_line("esc").await;
    proc.send_line("quit").await;
    let output = proc.finish().await;

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("== Landlord Entry Rights ==  [Medium Risk]"),
        "clause detail should show title and risk: {stdout}"
    );
    assert!(
        stdout.contains("(esc to close)"),
        "detail view should hint at esc: {stdout}"
    );
}

/// The upload screen lists samples; non-analyzable ones show a notice.
#[tokio::test(flavor = "multi_thread")]
async fn upload_screen_and_unsupported_sample() {
    let mut proc = LeaseLensProcess::spawn_session(&run_args());
    proc.send_line("upload").await;
    proc.send_line("sample loan").await;
    let output = proc.finish().await;

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("== Upload a document =="),
        "upload screen should render: {stdout}"
    );
    assert!(
        stdout.contains("loan contracts would also be supported"),
        "unsupported sample should show its notice: {stdout}"
    );
}

/// Unknown commands produce feedback instead of ending the session.
#[tokio::test(flavor = "multi_thread")]
async fn unknown_command_gets_feedback() {
    let mut proc = LeaseLensProcess::spawn_session(&run_args());
    proc.send_line("blah").await;
    proc.send_line("help").await;
    let output = proc.finish().await;

    assert!(
        output.status.success(),
        "unknown commands must not end the session: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Unknown command 'blah'."),
        "feedback should name the bad command: {stdout}"
    );
    assert!(
        stdout.contains("Commands:"),
        "help should still work afterwards: {stdout}"
    );
}

/// `--no-banner` suppresses the banner but not the home screen.
#[tokio::test(flavor = "multi_thread")]
async fn no_banner_flag_suppresses_banner() {
    let mut args = run_args();
    args.push("--no-banner");
    let proc = LeaseLensProcess::spawn_session(&args);
    let output = proc.finish().await;

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        !stdout.contains("LeaseLens v"),
        "banner should be suppressed: {stdout}"
    );
    assert!(
        stdout.contains("== Rental Agreement Analysis =="),
        "home screen should still render: {stdout}"
    );
}
