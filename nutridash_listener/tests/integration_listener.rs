//! Integration tests for the reconnecting listener.
//!
//! The listener is driven through a scripted transport with tokio's paused
//! clock, so the fixed reconnect delay elapses instantly.

use async_trait::async_trait;
use nutridash_config::ListenerConfig;
use nutridash_core::{
    ConnectionState, Extractor, RecordLog, StateReceiver, connection_state_channel,
};
use nutridash_listener::{Connection, Error, Listener, Result, Transport};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

const DELAY: Duration = Duration::from_secs(5);

/// What a scripted connection does once its frames run out.
#[derive(Clone, Copy)]
enum AfterScript {
    Close,
    Fail,
    StayOpen,
}

#[derive(Default)]
struct Script {
    /// Remaining connect attempts that should fail.
    failures: usize,
    frames: Vec<String>,
    after: Option<AfterScript>,
    /// `close()` never completes.
    close_hangs: bool,
}

#[derive(Clone, Default)]
struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
    attempts_at: Arc<Mutex<Vec<Instant>>>,
    sent: Arc<Mutex<Vec<String>>>,
}

impl ScriptedTransport {
    fn new(failures: usize, frames: &[&str], after: AfterScript) -> Self {
        Self {
            script: Arc::new(Mutex::new(Script {
                failures,
                frames: frames.iter().map(ToString::to_string).collect(),
                after: Some(after),
                close_hangs: false,
            })),
            ..Self::default()
        }
    }

    fn with_hanging_close(self) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.close_hangs = true;
        }
        self
    }

    fn attempt_times(&self) -> Vec<Instant> {
        self.attempts_at.lock().map(|v| v.clone()).unwrap_or_default()
    }

    fn sent(&self) -> Vec<String> {
        self.sent.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

struct ScriptedConnection {
    frames: VecDeque<String>,
    after: AfterScript,
    close_hangs: bool,
    sent: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Connection for ScriptedConnection {
    async fn send_text(&mut self, text: &str) -> Result<()> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(text.to_string());
        }
        Ok(())
    }

    async fn next_text(&mut self) -> Option<Result<String>> {
        if let Some(frame) = self.frames.pop_front() {
            return Some(Ok(frame));
        }
        match self.after {
            AfterScript::Close => None,
            AfterScript::Fail => Some(Err(Error::Transport("connection reset".to_string()))),
            AfterScript::StayOpen => std::future::pending().await,
        }
    }

    async fn close(&mut self) {
        if self.close_hangs {
            std::future::pending::<()>().await;
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn connect(&self, _endpoint: &Url) -> Result<Box<dyn Connection>> {
        if let Ok(mut times) = self.attempts_at.lock() {
            times.push(Instant::now());
        }

        let (fail, frames, after, close_hangs) = {
            let mut script = self
                .script
                .lock()
                .map_err(|_| Error::Transport("script poisoned".to_string()))?;
            if script.failures > 0 {
                script.failures -= 1;
                (true, Vec::new(), AfterScript::Close, false)
            } else {
                // Only the first successful connection gets the frames.
                let frames = std::mem::take(&mut script.frames);
                (
                    false,
                    frames,
                    script.after.unwrap_or(AfterScript::Close),
                    script.close_hangs,
                )
            }
        };

        if fail {
            return Err(Error::Transport("connection refused".to_string()));
        }
        Ok(Box::new(ScriptedConnection {
            frames: frames.into(),
            after,
            close_hangs,
            sent: self.sent.clone(),
        }))
    }
}

struct Harness {
    transport: ScriptedTransport,
    log: RecordLog,
    state: StateReceiver,
    task: tokio::task::JoinHandle<()>,
    attempts: nutridash_listener::AttemptCounter,
}

#[expect(clippy::expect_used, reason = "Test failure should panic with context")]
fn start(transport: ScriptedTransport) -> Harness {
    let config = ListenerConfig {
        root_url: "ws://chat.test".to_string(),
        ..ListenerConfig::default()
    };
    let (log, _rx) = RecordLog::unbounded();
    let (state_tx, state) = connection_state_channel();
    let extractor = Extractor::with_defaults().expect("default patterns should compile");

    let listener = Listener::new(&config, extractor, log.clone(), state_tx, transport.clone())
        .expect("listener should build");
    let attempts = listener.attempts();
    let task = tokio::spawn(listener.run());

    Harness {
        transport,
        log,
        state,
        task,
        attempts,
    }
}

#[tokio::test(start_paused = true)]
async fn test_n_failures_lead_to_n_plus_one_attempts() {
    const FAILURES: usize = 4;
    let h = start(ScriptedTransport::new(FAILURES, &[], AfterScript::StayOpen));

    // Well past the last retry, short of a hypothetical one after it.
    tokio::time::sleep(DELAY * 10).await;

    let times = h.transport.attempt_times();
    assert_eq!(times.len(), FAILURES + 1);
    assert_eq!(h.attempts.get(), (FAILURES + 1) as u64);
    for pair in times.windows(2) {
        assert!(pair[1] - pair[0] >= DELAY);
    }
    assert_eq!(*h.state.borrow(), ConnectionState::Connected);
    assert!(!h.task.is_finished());
    h.task.abort();
}

#[tokio::test(start_paused = true)]
async fn test_keeps_retrying_without_limit() {
    let h = start(ScriptedTransport::new(usize::MAX, &[], AfterScript::Close));

    tokio::time::sleep(DELAY * 100 + Duration::from_millis(2500)).await;

    let times = h.transport.attempt_times();
    assert_eq!(times.len(), 101);
    for pair in times.windows(2) {
        assert!(pair[1] - pair[0] >= DELAY);
    }
    assert_eq!(*h.state.borrow(), ConnectionState::Disconnected);
    assert!(!h.task.is_finished());
    h.task.abort();
}

#[tokio::test(start_paused = true)]
async fn test_probe_is_first_frame_and_messages_are_extracted() {
    let frames = [
        r#"0{"sid":"abc","pingInterval":25000,"pingTimeout":20000}"#,
        "3probe",
        r#"40{"sid":"def"}"#,
        r#"42["message","I see you're holding an apple in your hand. About 95 calories."]"#,
        r#"42["typing",{"user":"bob"}]"#,
        r#"42["message",{"not":"text"}]"#,
        "42[\"message\"",
        "2",
        r#"42["message","Nice weather today"]"#,
    ];
    let h = start(ScriptedTransport::new(0, &frames, AfterScript::StayOpen));

    tokio::time::sleep(Duration::from_millis(100)).await;

    let sent = h.transport.sent();
    assert_eq!(sent, vec!["2probe", "40", "3"]);

    let records = h.log.snapshot();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].food_item.as_deref(), Some("apple"));
    assert_eq!(records[0].calories, Some(95));
    assert_eq!(records[1].raw_message, "Nice weather today");
    assert_eq!(records[1].food_item, None);
    assert_eq!(records[1].calories, None);

    assert_eq!(*h.state.borrow(), ConnectionState::Connected);
    assert_eq!(h.attempts.get(), 1);
    h.task.abort();
}

#[tokio::test(start_paused = true)]
async fn test_state_flips_on_close_and_reconnects_after_delay() {
    let h = start(ScriptedTransport::new(
        0,
        &[r#"42["message","I have a pear, 60 calories"]"#],
        AfterScript::Fail,
    ));
    let mut state = h.state.clone();

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(*state.borrow_and_update(), ConnectionState::Disconnected);
    assert_eq!(h.log.len(), 1);
    assert_eq!(h.attempts.get(), 1);

    // The second connection has no frames left and fails immediately again.
    tokio::time::sleep(DELAY).await;
    assert_eq!(h.attempts.get(), 2);

    let times = h.transport.attempt_times();
    assert!(times[1] - times[0] >= DELAY);
    h.task.abort();
}

#[tokio::test(start_paused = true)]
async fn test_connected_visible_while_open() {
    let h = start(ScriptedTransport::new(2, &[], AfterScript::StayOpen));
    let mut state = h.state.clone();

    // Failures publish Disconnected; the third attempt connects.
    let connected = tokio::time::timeout(DELAY * 3, async {
        loop {
            if state.borrow_and_update().is_connected() {
                return true;
            }
            if state.changed().await.is_err() {
                return false;
            }
        }
    })
    .await;

    assert_eq!(connected.ok(), Some(true));
    assert_eq!(h.attempts.get(), 3);
    h.task.abort();
}

#[tokio::test(start_paused = true)]
async fn test_disconnected_published_before_close_completes() {
    let transport = ScriptedTransport::new(
        0,
        &[r#"42["message","I have a plum"]"#],
        AfterScript::Fail,
    )
    .with_hanging_close();
    let h = start(transport);

    tokio::time::sleep(Duration::from_millis(100)).await;

    // The close handshake never finishes, yet readers already see the
    // session as gone and no retry has started.
    assert_eq!(*h.state.borrow(), ConnectionState::Disconnected);
    assert_eq!(h.log.len(), 1);
    assert_eq!(h.attempts.get(), 1);
    assert!(!h.task.is_finished());
    h.task.abort();
}
