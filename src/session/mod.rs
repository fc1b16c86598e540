//! Interactive session loop.
//!
//! [`Session`] owns one run of the demo: it reads command lines from the
//! console, mutates the view state, schedules background work (analysis
//! timers, delayed chat replies), and emits structured events along the
//! way. All async sources meet in a single `select!` loop so one task
//! drives the whole session and the view state needs no locking.

pub mod command;
pub mod stats;

pub use command::{HELP_TEXT, ParseError, SessionCommand};
pub use stats::SessionStats;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, mpsc};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::analysis::{AnalysisEngine, ProgressUpdate};
use crate::app::{
    AppState, ClauseDetailView, DashboardView, HomeView, NoticeView, ProgressView, Section, Tab,
    UploadView,
};
use crate::chat::{QuestionMatcher, Transcript};
use crate::config::schema::DocumentPack;
use crate::console::{Console, ConsoleError, sanitize_for_log};
use crate::error::LeaseLensError;
use crate::observability::{Event, EventEmitter, NoticeKind, StopReason};

/// Greeting printed when a session starts.
const BANNER: &str = concat!(
    "LeaseLens v",
    env!("CARGO_PKG_VERSION"),
    " - type 'help' for commands"
);

/// Prompt printed before each input read.
const PROMPT: &str = "> ";

/// Longest input prefix echoed into the debug log.
const LOG_INPUT_MAX: usize = 200;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Options for constructing a [`Session`].
pub struct SessionOptions {
    /// The loaded document pack driving all content.
    pub pack: Arc<DocumentPack>,
    /// Pack name reported in the start event (builtin name or file stem).
    pub pack_name: String,
    /// Console for all interactive I/O.
    pub console: Arc<dyn Console>,
    /// Emitter for the structured event stream.
    pub event_emitter: EventEmitter,
    /// Whether to print the greeting banner.
    pub show_banner: bool,
    /// Overrides the pack's analysis step interval when set.
    pub step_interval: Option<Duration>,
    /// Overrides the pack's analysis finalize delay when set.
    pub finalize_delay: Option<Duration>,
    /// Overrides the pack's chat reply delay when set.
    pub reply_delay: Option<Duration>,
    /// Cancelled when the process is asked to shut down.
    pub cancel: CancellationToken,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A bot reply waiting out its canned delay on a background task.
#[derive(Debug)]
struct DeferredReply {
    /// Reply text to append to the transcript.
    answer: String,
    /// Canned entry that produced it, or `None` for the fallback.
    canned_index: Option<usize>,
}

/// Control-flow outcome of handling one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    /// Keep reading input.
    Continue,
    /// Leave the loop and end the session.
    Quit,
}

/// One interactive session over a document pack.
pub struct Session {
    pack: Arc<DocumentPack>,
    pack_name: String,
    console: Arc<dyn Console>,
    engine: Arc<AnalysisEngine>,
    matcher: QuestionMatcher,
    emitter: EventEmitter,
    stats: SessionStats,
    session_id: String,
    reply_delay: Duration,
    show_banner: bool,
    reply_tx: mpsc::UnboundedSender<DeferredReply>,
    reply_rx: Mutex<mpsc::UnboundedReceiver<DeferredReply>>,
    cancel: CancellationToken,
}

impl Session {
    /// Creates a session with a fresh id from the given options.
    #[must_use]
    pub fn new(opts: SessionOptions) -> Self {
        let session_id = Uuid::new_v4().to_string();
        let mut engine = AnalysisEngine::new(&opts.pack.analysis);
        if let Some(interval) = opts.step_interval {
            engine = engine.with_step_interval(interval);
        }
        if let Some(delay) = opts.finalize_delay {
            engine = engine.with_finalize_delay(delay);
        }
        let reply_delay = opts
            .reply_delay
            .unwrap_or_else(|| opts.pack.chat.reply_delay());
        let matcher = QuestionMatcher::compile(&opts.pack.chat);
        let emitter = opts.event_emitter.with_session(session_id.clone());
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();

        Self {
            engine: Arc::new(engine),
            matcher,
            emitter,
            stats: SessionStats::new(),
            session_id,
            reply_delay,
            show_banner: opts.show_banner,
            reply_tx,
            reply_rx: Mutex::new(reply_rx),
            pack: opts.pack,
            pack_name: opts.pack_name,
            console: opts.console,
            cancel: opts.cancel,
        }
    }

    /// The generated id attached to every emitted event.
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Runs the session until the user quits, stdin closes, or shutdown is
    /// requested.
    ///
    /// # Errors
    ///
    /// Returns an error when console I/O fails in a way the loop cannot
    /// recover from.
    pub async fn run(&self) -> Result<(), LeaseLensError> {
        let started = Instant::now();
        let mut app = AppState::new();
        let mut transcript = Transcript::new();

        info!(
            session_id = %self.session_id,
            pack = %self.pack_name,
            "session started"
        );
        self.emitter.emit(Event::SessionStarted {
            timestamp: Utc::now(),
            pack: self.pack_name.clone(),
        });

        if self.show_banner {
            self.console.write_line(BANNER).await?;
            self.console.write_line("").await?;
        }
        self.render_section(&app, &transcript).await?;

        let result = self.main_loop(&mut app, &mut transcript).await;

        self.engine.shutdown();

        let reason = match &result {
            Ok(reason) => *reason,
            Err(error) => {
                error!(%error, "session failed");
                StopReason::Error
            }
        };
        let summary = self.stats.summary(started.elapsed());
        info!(%summary, ?reason, "session ended");
        for (kind, count) in self.stats.snapshot() {
            debug!(kind = %kind, count, "action count");
        }
        self.emitter.emit(Event::SessionEnded {
            timestamp: Utc::now(),
            reason,
            summary: Some(summary),
        });
        self.emitter.flush();

        result.map(|_| ())
    }

    /// Drives the interleaved input, analysis, and reply sources.
    async fn main_loop(
        &self,
        app: &mut AppState,
        transcript: &mut Transcript,
    ) -> Result<StopReason, LeaseLensError> {
        loop {
            self.console.write_prompt(PROMPT).await?;

            tokio::select! {
                () = self.cancel.cancelled() => {
                    info!("shutdown requested; ending session");
                    return Ok(StopReason::Interrupted);
                }
                update = self.engine.recv_update() => {
                    if let Some(update) = update {
                        self.apply_update(app, transcript, update).await?;
                    }
                }
                reply = self.recv_reply() => {
                    if let Some(reply) = reply {
                        self.deliver_reply(app, transcript, reply).await?;
                    }
                }
                line = self.console.read_line() => match line {
                    Ok(Some(line)) => {
                        if self.handle_line(app, transcript, &line).await? == Flow::Quit {
                            return Ok(StopReason::Quit);
                        }
                    }
                    Ok(None) => {
                        debug!("console closed; ending session");
                        return Ok(StopReason::Eof);
                    }
                    Err(error @ ConsoleError::LineTooLong { .. }) => {
                        warn!(%error, "input line dropped");
                        self.console
                            .write_line(&format!("Input ignored: {error}"))
                            .await?;
                    }
                    Err(error) => return Err(error.into()),
                },
            }
        }
    }

    /// Parses one input line and routes the command, if any.
    async fn handle_line(
        &self,
        app: &mut AppState,
        transcript: &mut Transcript,
        line: &str,
    ) -> Result<Flow, LeaseLensError> {
        debug!(input = %sanitize_for_log(line, LOG_INPUT_MAX), "line received");
        match SessionCommand::parse(line) {
            Ok(Some(cmd)) => {
                self.stats.record_command(cmd.name());
                self.handle_command(app, transcript, cmd).await
            }
            Ok(None) => Ok(Flow::Continue),
            Err(feedback) => {
                self.console.write_line(&feedback.to_string()).await?;
                Ok(Flow::Continue)
            }
        }
    }

    async fn handle_command(
        &self,
        app: &mut AppState,
        transcript: &mut Transcript,
        cmd: SessionCommand,
    ) -> Result<Flow, LeaseLensError> {
        match cmd {
            SessionCommand::Demo => self.start_analysis(app, transcript).await?,
            SessionCommand::Upload => {
                self.change_section(app, transcript, Section::Upload).await?;
            }
            SessionCommand::Pick(path) | SessionCommand::Drop(path) => {
                // The file is never read; any path starts the scripted run.
                info!(path = %sanitize_for_log(&path, LOG_INPUT_MAX), "document provided");
                self.start_analysis(app, transcript).await?;
            }
            SessionCommand::Sample(id) => self.choose_sample(app, transcript, &id).await?,
            SessionCommand::Tab(name) => match Tab::from_name(&name) {
                Some(tab) => self.change_tab(app, transcript, tab).await?,
                None => {
                    self.console
                        .write_line(&format!(
                            "Unknown tab '{name}'. Tabs: overview, simplified, risks, chat, summary."
                        ))
                        .await?;
                }
            },
            SessionCommand::Digit(key) => {
                if app.section() == Section::Dashboard {
                    if let Some(tab) = Tab::from_digit(key) {
                        self.change_tab(app, transcript, tab).await?;
                    }
                } else {
                    debug!(key = %key, "digit shortcut outside dashboard ignored");
                }
            }
            SessionCommand::Ask(question) => {
                self.submit_question(app, transcript, &question).await?;
            }
            SessionCommand::Quick(number) => {
                self.quick_question(app, transcript, number).await?;
            }
            SessionCommand::Clause(id) => self.open_clause(app, &id).await?,
            SessionCommand::CloseModal => self.close_clause(app, transcript).await?,
            SessionCommand::Download => {
                self.show_notice(&self.pack.notices.download, NoticeKind::Download)
                    .await?;
            }
            SessionCommand::Share => {
                self.show_notice(&self.pack.notices.share, NoticeKind::Share)
                    .await?;
            }
            SessionCommand::Home => self.change_section(app, transcript, Section::Home).await?,
            SessionCommand::Goto(name) => match Section::from_name(&name) {
                Some(Section::Dashboard) if app.document().is_none() => {
                    debug!("goto dashboard before a document is loaded ignored");
                }
                Some(section) => self.change_section(app, transcript, section).await?,
                None => {
                    self.console
                        .write_line(&format!(
                            "Unknown section '{name}'. Sections: home, upload, progress, dashboard."
                        ))
                        .await?;
                }
            },
            SessionCommand::Help => self.console.write_line(HELP_TEXT).await?,
            SessionCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    async fn change_section(
        &self,
        app: &mut AppState,
        transcript: &Transcript,
        to: Section,
    ) -> Result<(), LeaseLensError> {
        let from = app.section();
        if from != to {
            app.set_section(to);
            self.emitter.emit(Event::SectionChanged {
                timestamp: Utc::now(),
                from: from.name().to_string(),
                to: to.name().to_string(),
            });
            debug!(%from, %to, "section changed");
        }
        self.render_section(app, transcript).await
    }

    async fn change_tab(
        &self,
        app: &mut AppState,
        transcript: &Transcript,
        to: Tab,
    ) -> Result<(), LeaseLensError> {
        if app.document().is_none() {
            debug!(tab = %to, "tab change before a document is loaded ignored");
            return Ok(());
        }
        let from = app.tab();
        if from != to {
            app.set_tab(to);
            self.emitter.emit(Event::TabChanged {
                timestamp: Utc::now(),
                from: from.name().to_string(),
                to: to.name().to_string(),
            });
            debug!(%from, %to, "tab changed");
        }
        if app.section() == Section::Dashboard {
            self.render_section(app, transcript).await?;
        }
        Ok(())
    }

    /// Renders the active section to the console.
    async fn render_section(
        &self,
        app: &AppState,
        transcript: &Transcript,
    ) -> Result<(), LeaseLensError> {
        let rendered = match app.section() {
            Section::Home => HomeView::new(&self.pack).to_string(),
            Section::Upload => UploadView::new(&self.pack).to_string(),
            Section::Progress => {
                ProgressView::new(self.engine.steps(), self.engine.state().marked()).to_string()
            }
            Section::Dashboard => match app.document() {
                Some(document) => DashboardView::new(document, app.tab(), transcript).to_string(),
                None => return Ok(()),
            },
        };
        self.console.write_line(rendered.trim_end()).await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Analysis
    // -----------------------------------------------------------------------

    async fn start_analysis(
        &self,
        app: &mut AppState,
        transcript: &Transcript,
    ) -> Result<(), LeaseLensError> {
        // A second start while a run is active is ignored without any
        // screen change.
        if self.engine.start().is_none() {
            return Ok(());
        }
        self.stats.increment(stats::ANALYSIS);
        self.emitter.emit(Event::AnalysisStarted {
            timestamp: Utc::now(),
            steps: self.engine.steps().len(),
        });
        self.change_section(app, transcript, Section::Progress).await
    }

    async fn choose_sample(
        &self,
        app: &mut AppState,
        transcript: &Transcript,
        id: &str,
    ) -> Result<(), LeaseLensError> {
        let Some(sample) = self.pack.sample(id) else {
            let known = self
                .pack
                .samples
                .iter()
                .map(|sample| sample.id.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            self.console
                .write_line(&format!("Unknown sample '{id}'. Samples: {known}."))
                .await?;
            return Ok(());
        };
        if sample.analyzable {
            info!(sample = %sample.id, "sample document chosen");
            return self.start_analysis(app, transcript).await;
        }
        let subject = sample.subject.as_deref().unwrap_or(&sample.label);
        let text = self.pack.notices.unsupported_for(subject);
        self.show_notice(&text, NoticeKind::UnsupportedSample).await
    }

    /// Applies a progress update from the analysis timer task.
    async fn apply_update(
        &self,
        app: &mut AppState,
        transcript: &Transcript,
        update: ProgressUpdate,
    ) -> Result<(), LeaseLensError> {
        match update {
            ProgressUpdate::StepMarked { index, label } => {
                self.emitter.emit(Event::StepMarked {
                    timestamp: Utc::now(),
                    index,
                    label: label.clone(),
                });
                if app.section() == Section::Progress {
                    self.console.write_line(&format!("[x] {label}")).await?;
                }
            }
            ProgressUpdate::Completed => {
                #[allow(clippy::cast_possible_truncation)]
                let elapsed_ms = self.engine.state().started_at().elapsed().as_millis() as u64;
                self.emitter.emit(Event::AnalysisCompleted {
                    timestamp: Utc::now(),
                    elapsed_ms,
                });
                app.load_document(Arc::clone(&self.pack));
                self.emitter.emit(Event::DocumentLoaded {
                    timestamp: Utc::now(),
                    title: self.pack.document.title.clone(),
                });
                info!(elapsed_ms, title = %self.pack.document.title, "document loaded");
                self.console.write_line("Analysis complete.").await?;
                self.change_section(app, transcript, Section::Dashboard)
                    .await?;
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Chat
    // -----------------------------------------------------------------------

    async fn submit_question(
        &self,
        app: &mut AppState,
        transcript: &mut Transcript,
        question: &str,
    ) -> Result<(), LeaseLensError> {
        let question = question.trim();
        if question.is_empty() {
            return Ok(());
        }
        transcript.push_user(question);
        self.stats.increment(stats::QUESTION);
        let matched = self.matcher.match_question(question);
        debug!(matched = ?matched, "question matched");
        self.emitter.emit(Event::QuestionAsked {
            timestamp: Utc::now(),
            question: question.to_string(),
            matched: matched.is_some(),
        });

        // On the dashboard the chat tab shows the transcript; everywhere
        // else the exchange is echoed as plain lines.
        if app.document().is_some() {
            self.change_tab(app, transcript, Tab::Chat).await?;
        }
        if app.section() != Section::Dashboard || app.document().is_none() {
            self.console.write_line(&format!("You: {question}")).await?;
        }

        let (answer, canned_index) = match matched.and_then(|index| self.pack.chat.canned.get(index))
        {
            Some(entry) => (entry.answer.clone(), matched),
            None => (self.pack.chat.fallback.clone(), None),
        };
        let reply_tx = self.reply_tx.clone();
        let delay = self.reply_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = reply_tx.send(DeferredReply {
                answer,
                canned_index,
            });
        });
        Ok(())
    }

    async fn quick_question(
        &self,
        app: &mut AppState,
        transcript: &mut Transcript,
        number: usize,
    ) -> Result<(), LeaseLensError> {
        // Quick slots number the canned questions first, then the
        // labelled shortcuts.
        let canned = self.pack.chat.canned.len();
        let total = canned + self.pack.chat.shortcuts.len();
        let question = match number.checked_sub(1) {
            Some(index) if index < canned => Some(self.pack.chat.canned[index].question.clone()),
            Some(index) if index < total => {
                Some(self.pack.chat.shortcuts[index - canned].question.clone())
            }
            _ => None,
        };
        let Some(question) = question else {
            self.console
                .write_line(&format!("No quick question {number}. Pick 1-{total}."))
                .await?;
            return Ok(());
        };
        self.submit_question(app, transcript, &question).await
    }

    async fn recv_reply(&self) -> Option<DeferredReply> {
        let mut rx = self.reply_rx.lock().await;
        rx.recv().await
    }

    /// Appends a delayed bot reply and shows it.
    async fn deliver_reply(
        &self,
        app: &AppState,
        transcript: &mut Transcript,
        reply: DeferredReply,
    ) -> Result<(), LeaseLensError> {
        transcript.push_bot(&reply.answer);
        self.emitter.emit(Event::AnswerDelivered {
            timestamp: Utc::now(),
            canned_index: reply.canned_index,
        });
        if app.section() == Section::Dashboard && app.tab() == Tab::Chat && app.document().is_some()
        {
            self.render_section(app, transcript).await?;
        } else {
            self.console
                .write_line(&format!("Bot: {}", reply.answer))
                .await?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Clause detail and notices
    // -----------------------------------------------------------------------

    async fn open_clause(&self, app: &mut AppState, id: &str) -> Result<(), LeaseLensError> {
        if !app.open_clause(id) {
            debug!(clause = %sanitize_for_log(id, LOG_INPUT_MAX), "unknown clause id ignored");
            return Ok(());
        }
        self.stats.increment(stats::CLAUSE_OPENED);
        if let Some(clause) = app.modal_clause() {
            self.emitter.emit(Event::ClauseOpened {
                timestamp: Utc::now(),
                clause_id: clause.id.clone(),
                risk_level: clause.risk_level,
            });
            self.console
                .write_line(ClauseDetailView::new(clause).to_string().trim_end())
                .await?;
        }
        Ok(())
    }

    async fn close_clause(
        &self,
        app: &mut AppState,
        transcript: &Transcript,
    ) -> Result<(), LeaseLensError> {
        let open_id = app.modal_clause_id().map(str::to_string);
        if !app.close_modal() {
            debug!("escape with no open detail ignored");
            return Ok(());
        }
        self.emitter.emit(Event::ClauseDismissed {
            timestamp: Utc::now(),
            clause_id: open_id.unwrap_or_default(),
        });
        self.render_section(app, transcript).await
    }

    async fn show_notice(&self, text: &str, kind: NoticeKind) -> Result<(), LeaseLensError> {
        self.stats.increment(stats::NOTICE);
        self.emitter.emit(Event::NoticeShown {
            timestamp: Utc::now(),
            notice: kind,
        });
        self.console
            .write_line(&NoticeView::new(text).to_string())
            .await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::path::Path;
    use std::sync::Mutex as StdMutex;

    use async_trait::async_trait;
    use serde_json::Value;

    use crate::config::loader::PackLoader;
    use crate::console::{DEFAULT_MAX_LINE_LENGTH, Result as ConsoleResult};
    use crate::packs;

    /// One scripted input released at an absolute offset from start.
    #[derive(Debug, Clone)]
    enum ScriptStep {
        /// A complete input line.
        Line(&'static str),
        /// An over-long line the codec rejects.
        TooLong,
    }

    /// Console that replays timed input lines and records all output.
    ///
    /// `read_line` sleeps until the next step's release offset before
    /// popping it, so dropping and re-creating the future (as `select!`
    /// does every loop turn) never loses a step. An exhausted script
    /// reads as EOF.
    struct MockConsole {
        started: Instant,
        script: StdMutex<VecDeque<(Duration, ScriptStep)>>,
        written: Arc<StdMutex<Vec<String>>>,
    }

    impl MockConsole {
        fn new(script: Vec<(Duration, ScriptStep)>) -> Self {
            Self {
                started: Instant::now(),
                script: StdMutex::new(script.into_iter().collect()),
                written: Arc::new(StdMutex::new(Vec::new())),
            }
        }

        fn written(&self) -> Arc<StdMutex<Vec<String>>> {
            Arc::clone(&self.written)
        }
    }

    #[async_trait]
    impl Console for MockConsole {
        async fn read_line(&self) -> ConsoleResult<Option<String>> {
            let release = match self.script.lock().unwrap().front() {
                Some((offset, _)) => self.started + *offset,
                None => return Ok(None),
            };
            tokio::time::sleep_until(release).await;
            let step = self.script.lock().unwrap().pop_front();
            match step {
                Some((_, ScriptStep::Line(text))) => Ok(Some(text.to_string())),
                Some((_, ScriptStep::TooLong)) | None => Err(ConsoleError::LineTooLong {
                    limit: DEFAULT_MAX_LINE_LENGTH,
                }),
            }
        }

        async fn write_line(&self, text: &str) -> ConsoleResult<()> {
            self.written.lock().unwrap().push(format!("{text}\n"));
            Ok(())
        }

        async fn write_prompt(&self, text: &str) -> ConsoleResult<()> {
            self.written.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    /// Captures emitted JSONL for assertions.
    #[derive(Clone, Default)]
    struct TestWriter(Arc<StdMutex<Vec<u8>>>);

    impl TestWriter {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl std::io::Write for TestWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct Harness {
        session: Session,
        written: Arc<StdMutex<Vec<String>>>,
        events: TestWriter,
        cancel: CancellationToken,
    }

    fn rental_pack() -> Arc<DocumentPack> {
        let loader = PackLoader::with_defaults();
        let builtin = packs::find_pack(packs::DEFAULT_PACK).unwrap();
        loader
            .load_from_str(builtin.yaml, Path::new("test"))
            .unwrap()
            .pack
    }

    fn line(ms: u64, text: &'static str) -> (Duration, ScriptStep) {
        (Duration::from_millis(ms), ScriptStep::Line(text))
    }

    fn too_long(ms: u64) -> (Duration, ScriptStep) {
        (Duration::from_millis(ms), ScriptStep::TooLong)
    }

    fn harness(script: Vec<(Duration, ScriptStep)>) -> Harness {
        harness_with(script, true)
    }

    fn harness_with(script: Vec<(Duration, ScriptStep)>, show_banner: bool) -> Harness {
        let console = MockConsole::new(script);
        let written = console.written();
        let events = TestWriter::default();
        let cancel = CancellationToken::new();
        let session = Session::new(SessionOptions {
            pack: rental_pack(),
            pack_name: "rental-agreement".to_string(),
            console: Arc::new(console),
            event_emitter: EventEmitter::new(Box::new(events.clone())),
            show_banner,
            step_interval: None,
            finalize_delay: None,
            reply_delay: None,
            cancel: cancel.clone(),
        });
        Harness {
            session,
            written,
            events,
            cancel,
        }
    }

    fn output(written: &Arc<StdMutex<Vec<String>>>) -> String {
        written.lock().unwrap().concat()
    }

    fn event_lines(events: &TestWriter) -> Vec<Value> {
        events
            .contents()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    fn event_types(events: &TestWriter) -> Vec<String> {
        event_lines(events)
            .iter()
            .map(|event| event["type"].as_str().unwrap().to_string())
            .collect()
    }

    fn count_type(events: &TestWriter, kind: &str) -> usize {
        event_types(events).iter().filter(|t| *t == kind).count()
    }

    #[tokio::test(start_paused = true)]
    async fn quit_ends_session_with_quit_reason() {
        let h = harness(vec![line(10, "quit")]);
        h.session.run().await.unwrap();

        let events = event_lines(&h.events);
        assert_eq!(events.first().unwrap()["type"], "session_started");
        let ended = events.last().unwrap();
        assert_eq!(ended["type"], "session_ended");
        assert_eq!(ended["reason"], "quit");
        assert_eq!(ended["summary"]["commands"], 1);
    }

    #[tokio::test(start_paused = true)]
    async fn eof_ends_session_with_eof_reason() {
        let h = harness(Vec::new());
        h.session.run().await.unwrap();

        let events = event_lines(&h.events);
        assert_eq!(events.last().unwrap()["reason"], "eof");
    }

    #[tokio::test(start_paused = true)]
    async fn banner_and_home_screen_print_on_start() {
        let h = harness(vec![line(10, "quit")]);
        h.session.run().await.unwrap();

        let out = output(&h.written);
        assert!(out.contains("LeaseLens v"));
        assert!(out.contains("type 'help' for commands"));
        assert!(out.contains("== Rental Agreement Analysis =="));
    }

    #[tokio::test(start_paused = true)]
    async fn banner_can_be_suppressed() {
        let h = harness_with(vec![line(10, "quit")], false);
        h.session.run().await.unwrap();

        let out = output(&h.written);
        assert!(!out.contains("LeaseLens v"));
        assert!(out.contains("== Rental Agreement Analysis =="));
    }

    #[tokio::test(start_paused = true)]
    async fn demo_runs_analysis_to_dashboard() {
        let h = harness(vec![line(10, "demo"), line(10_000, "quit")]);
        h.session.run().await.unwrap();

        let out = output(&h.written);
        assert!(out.contains("== Analyzing your document =="));
        assert!(out.contains("[x] Scanning document structure"));
        assert!(out.contains("[x] Generating recommendations"));
        assert!(out.contains("Analysis complete."));
        assert!(out.contains("== Residential Lease Agreement =="));

        assert_eq!(count_type(&h.events, "analysis_started"), 1);
        assert_eq!(count_type(&h.events, "step_marked"), 4);
        assert_eq!(count_type(&h.events, "analysis_completed"), 1);
        assert_eq!(count_type(&h.events, "document_loaded"), 1);

        let events = event_lines(&h.events);
        let ended = events.last().unwrap();
        assert_eq!(ended["summary"]["analyses"], 1);
    }

    #[tokio::test(start_paused = true)]
    async fn second_demo_while_analyzing_is_ignored() {
        let h = harness(vec![
            line(10, "demo"),
            line(500, "demo"),
            line(10_000, "quit"),
        ]);
        h.session.run().await.unwrap();

        assert_eq!(count_type(&h.events, "analysis_started"), 1);
        assert_eq!(count_type(&h.events, "step_marked"), 4);
        let events = event_lines(&h.events);
        assert_eq!(events.last().unwrap()["summary"]["analyses"], 1);
    }

    #[tokio::test(start_paused = true)]
    async fn ask_matched_question_gets_canned_reply() {
        let h = harness(vec![
            line(10, "ask Can my landlord raise my rent whenever they want?"),
            line(3_000, "quit"),
        ]);
        h.session.run().await.unwrap();

        let out = output(&h.written);
        assert!(out.contains("You: Can my landlord raise my rent whenever they want?"));
        assert!(out.contains("Bot: Unfortunately, yes."));

        let events = event_lines(&h.events);
        let asked = events
            .iter()
            .find(|e| e["type"] == "question_asked")
            .unwrap();
        assert_eq!(asked["matched"], true);
        let delivered = events
            .iter()
            .find(|e| e["type"] == "answer_delivered")
            .unwrap();
        assert_eq!(delivered["canned_index"], 1);
    }

    #[tokio::test(start_paused = true)]
    async fn ask_unmatched_question_gets_fallback() {
        let h = harness(vec![
            line(10, "ask Is my deposit refundable on Mars?"),
            line(3_000, "quit"),
        ]);
        h.session.run().await.unwrap();

        let out = output(&h.written);
        assert!(out.contains("Bot: That's a great question!"));

        let events = event_lines(&h.events);
        let asked = events
            .iter()
            .find(|e| e["type"] == "question_asked")
            .unwrap();
        assert_eq!(asked["matched"], false);
        let delivered = events
            .iter()
            .find(|e| e["type"] == "answer_delivered")
            .unwrap();
        assert_eq!(delivered["canned_index"], Value::Null);
    }

    #[tokio::test(start_paused = true)]
    async fn ask_after_demo_renders_chat_tab() {
        let h = harness(vec![
            line(10, "demo"),
            line(9_000, "ask Who pays for repairs if something breaks?"),
            line(10_500, "quit"),
        ]);
        h.session.run().await.unwrap();

        let out = output(&h.written);
        assert!(out.contains("You: Who pays for repairs if something breaks?"));
        assert!(out.contains("Bot: You're responsible for any repairs over $100"));
        assert!(out.contains("[chat]"));

        let events = event_lines(&h.events);
        let changed = events.iter().find(|e| e["type"] == "tab_changed").unwrap();
        assert_eq!(changed["from"], "overview");
        assert_eq!(changed["to"], "chat");
        let delivered = events
            .iter()
            .find(|e| e["type"] == "answer_delivered")
            .unwrap();
        assert_eq!(delivered["canned_index"], 2);
    }

    #[tokio::test(start_paused = true)]
    async fn quick_numbers_canned_first_then_shortcuts() {
        // The rental pack has 4 canned questions, so 5 is the first shortcut.
        let h = harness(vec![line(10, "quick 5"), line(3_000, "quit")]);
        h.session.run().await.unwrap();

        let out = output(&h.written);
        assert!(out.contains("You: Can my landlord raise my rent whenever they want?"));

        let events = event_lines(&h.events);
        let delivered = events
            .iter()
            .find(|e| e["type"] == "answer_delivered")
            .unwrap();
        assert_eq!(delivered["canned_index"], 1);
    }

    #[tokio::test(start_paused = true)]
    async fn quick_out_of_range_reports_bounds() {
        let h = harness(vec![line(10, "quick 9"), line(100, "quit")]);
        h.session.run().await.unwrap();

        let out = output(&h.written);
        assert!(out.contains("No quick question 9. Pick 1-6."));
        assert_eq!(count_type(&h.events, "question_asked"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn sample_rental_starts_analysis() {
        let h = harness(vec![line(10, "sample rental"), line(10_000, "quit")]);
        h.session.run().await.unwrap();

        let out = output(&h.written);
        assert!(out.contains("== Analyzing your document =="));
        assert_eq!(count_type(&h.events, "analysis_started"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn sample_loan_shows_unsupported_notice() {
        let h = harness(vec![line(10, "sample loan"), line(100, "quit")]);
        h.session.run().await.unwrap();

        let out = output(&h.written);
        assert!(out.contains("Notice: This is a demo focusing on rental agreements."));
        assert!(out.contains("loan contracts would also be supported."));
        assert_eq!(count_type(&h.events, "analysis_started"), 0);

        let events = event_lines(&h.events);
        let shown = events.iter().find(|e| e["type"] == "notice_shown").unwrap();
        assert_eq!(shown["notice"], "unsupported_sample");
    }

    #[tokio::test(start_paused = true)]
    async fn sample_unknown_lists_available_ids() {
        let h = harness(vec![line(10, "sample mortgage"), line(100, "quit")]);
        h.session.run().await.unwrap();

        let out = output(&h.written);
        assert!(out.contains("Unknown sample 'mortgage'. Samples: rental, loan, tos."));
    }

    #[tokio::test(start_paused = true)]
    async fn clause_detail_opens_and_escapes() {
        let h = harness(vec![
            line(10, "demo"),
            line(9_000, "clause entry_rights"),
            line(9_100, "esc"),
            line(9_200, "quit"),
        ]);
        h.session.run().await.unwrap();

        let out = output(&h.written);
        assert!(out.contains("== Landlord Entry Rights ==  [Medium Risk]"));
        assert!(out.contains("(esc to close)"));

        let events = event_lines(&h.events);
        let opened = events.iter().find(|e| e["type"] == "clause_opened").unwrap();
        assert_eq!(opened["clause_id"], "entry_rights");
        assert_eq!(opened["risk_level"], "medium");
        let dismissed = events
            .iter()
            .find(|e| e["type"] == "clause_dismissed")
            .unwrap();
        assert_eq!(dismissed["clause_id"], "entry_rights");
        assert_eq!(events.last().unwrap()["summary"]["clauses_opened"], 1);
    }

    #[tokio::test(start_paused = true)]
    async fn clause_before_document_is_silently_ignored() {
        let h = harness(vec![line(10, "clause rent_increase"), line(100, "quit")]);
        h.session.run().await.unwrap();

        assert_eq!(count_type(&h.events, "clause_opened"), 0);
        assert!(!output(&h.written).contains("Rent Increase Clause"));
    }

    #[tokio::test(start_paused = true)]
    async fn escape_without_open_detail_is_silent() {
        let h = harness(vec![line(10, "esc"), line(100, "quit")]);
        h.session.run().await.unwrap();

        assert_eq!(count_type(&h.events, "clause_dismissed"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn digit_shortcuts_work_only_on_dashboard() {
        let h = harness(vec![
            line(10, "3"),
            line(20, "demo"),
            line(9_000, "3"),
            line(9_100, "quit"),
        ]);
        h.session.run().await.unwrap();

        assert_eq!(count_type(&h.events, "tab_changed"), 1);
        let events = event_lines(&h.events);
        let changed = events.iter().find(|e| e["type"] == "tab_changed").unwrap();
        assert_eq!(changed["from"], "overview");
        assert_eq!(changed["to"], "risks");
        assert!(output(&h.written).contains("[risks]"));
    }

    #[tokio::test(start_paused = true)]
    async fn tab_by_name_and_unknown_tab_feedback() {
        let h = harness(vec![
            line(10, "demo"),
            line(9_000, "tab summary"),
            line(9_100, "tab bogus"),
            line(9_200, "quit"),
        ]);
        h.session.run().await.unwrap();

        let out = output(&h.written);
        assert!(out.contains("Risk score: 7/10"));
        assert!(out.contains("Unknown tab 'bogus'. Tabs: overview, simplified, risks, chat, summary."));

        let events = event_lines(&h.events);
        let changed = events.iter().find(|e| e["type"] == "tab_changed").unwrap();
        assert_eq!(changed["to"], "summary");
    }

    #[tokio::test(start_paused = true)]
    async fn goto_dashboard_before_document_is_ignored() {
        let h = harness(vec![line(10, "goto dashboard"), line(100, "quit")]);
        h.session.run().await.unwrap();

        assert_eq!(count_type(&h.events, "section_changed"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn upload_screen_lists_samples() {
        let h = harness(vec![line(10, "upload"), line(100, "quit")]);
        h.session.run().await.unwrap();

        let out = output(&h.written);
        assert!(out.contains("== Upload a document =="));
        assert!(out.contains("Loan Contract"));

        let events = event_lines(&h.events);
        let changed = events
            .iter()
            .find(|e| e["type"] == "section_changed")
            .unwrap();
        assert_eq!(changed["from"], "home");
        assert_eq!(changed["to"], "upload");
    }

    #[tokio::test(start_paused = true)]
    async fn download_and_share_notices_count_in_summary() {
        let h = harness(vec![
            line(10, "download"),
            line(20, "share"),
            line(30, "quit"),
        ]);
        h.session.run().await.unwrap();

        let out = output(&h.written);
        assert!(out.contains("Notice: Summary report would be downloaded as PDF."));
        assert!(out.contains("securely share your analysis"));

        let events = event_lines(&h.events);
        let ended = events.last().unwrap();
        assert_eq!(ended["summary"]["notices"], 2);
        assert_eq!(ended["summary"]["commands"], 3);
    }

    #[tokio::test(start_paused = true)]
    async fn help_lists_commands() {
        let h = harness(vec![line(10, "help"), line(20, "quit")]);
        h.session.run().await.unwrap();

        let out = output(&h.written);
        assert!(out.contains("Commands:"));
        assert!(out.contains("demo"));
        assert!(out.contains("quit"));
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_command_feedback_reaches_console() {
        let h = harness(vec![line(10, "demoo"), line(20, "quit")]);
        h.session.run().await.unwrap();

        let out = output(&h.written);
        assert!(out.contains("Unknown command 'demoo'."));
        assert!(out.contains("Did you mean 'demo'?"));
    }

    #[tokio::test(start_paused = true)]
    async fn overlong_line_is_reported_and_session_continues() {
        let h = harness(vec![too_long(10), line(100, "quit")]);
        h.session.run().await.unwrap();

        let out = output(&h.written);
        assert!(out.contains("Input ignored:"));
        let events = event_lines(&h.events);
        assert_eq!(events.last().unwrap()["reason"], "quit");
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_signal_interrupts_session() {
        let h = harness(vec![line(60_000, "quit")]);
        h.cancel.cancel();
        h.session.run().await.unwrap();

        let events = event_lines(&h.events);
        assert_eq!(events.last().unwrap()["reason"], "interrupted");
    }

    #[tokio::test(start_paused = true)]
    async fn events_are_ordered_and_attributed() {
        let h = harness(vec![line(10, "download"), line(20, "quit")]);
        let session_id = h.session.session_id().to_string();
        h.session.run().await.unwrap();

        let events = event_lines(&h.events);
        assert!(events.len() >= 3);
        for (expected, event) in (0u64..).zip(events.iter()) {
            assert_eq!(event["sequence"], expected);
            assert_eq!(event["session_id"], session_id.as_str());
        }
        assert_eq!(events.first().unwrap()["type"], "session_started");
        assert_eq!(events.last().unwrap()["type"], "session_ended");
    }
}
