use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use typeterm::clock::{ManualTimeSource, SystemTimeSource};
use typeterm::runtime::{EngineEvent, FixedTicker, Runner, TestEventSource};
use typeterm::session::{FinishReason, SessionConfig, SessionState, TestMode};
use typeterm::word_source::WordSource;
use typeterm::SessionEngine;

fn key(code: KeyCode) -> EngineEvent {
    EngineEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn send_str(tx: &mpsc::Sender<EngineEvent>, s: &str) {
    for c in s.chars() {
        tx.send(key(KeyCode::Char(c))).unwrap();
    }
}

// Headless integration using the runtime + engine without a TTY
#[test]
fn headless_words_session_completes() {
    let source = WordSource::fixed(vec!["hi".into(), "yo".into()], Some(2)).unwrap();
    let mut engine = SessionEngine::with_source(
        SessionConfig::new(TestMode::Words { count: 2 }),
        source,
        std::sync::Arc::new(SystemTimeSource),
    )
    .unwrap();

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    send_str(&tx, "hi yo");
    tx.send(key(KeyCode::Enter)).unwrap();

    for _ in 0..100u32 {
        runner.step_engine(&mut engine);
        if engine.is_finished() {
            break;
        }
    }

    assert_eq!(
        engine.state(),
        SessionState::Finished(FinishReason::Completed)
    );
    let snap = engine.snapshot();
    assert_eq!(snap.stats.correct_chars, 4);
    assert_eq!(snap.accuracy, 100.0);
    assert!(snap.wpm >= 0.0);
}

#[test]
fn headless_timed_session_finishes_by_ticks_alone() {
    let source = WordSource::fixed(vec!["hello".into()], None).unwrap();
    let mut engine = SessionEngine::with_source(
        SessionConfig::new(TestMode::Time { seconds: 1 }),
        source,
        std::sync::Arc::new(SystemTimeSource),
    )
    .unwrap();

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(20)),
    );

    // one key starts the clock, then nothing but timeouts
    send_str(&tx, "h");

    for _ in 0..200u32 {
        runner.step_engine(&mut engine);
        if engine.is_finished() {
            break;
        }
    }

    assert_eq!(engine.state(), SessionState::Finished(FinishReason::TimeUp));
    assert_eq!(engine.snapshot().elapsed, Duration::from_secs(1));
}

#[test]
fn headless_escape_quits_and_tab_restarts() {
    let time = ManualTimeSource::new();
    let source = WordSource::fixed(vec!["abc".into()], None).unwrap();
    let mut engine = SessionEngine::with_source(
        SessionConfig::new(TestMode::Time { seconds: 30 }),
        source,
        time.clone(),
    )
    .unwrap();

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );

    send_str(&tx, "ab");
    tx.send(key(KeyCode::Esc)).unwrap();
    tx.send(key(KeyCode::Char('c'))).unwrap();
    for _ in 0..4 {
        runner.step_engine(&mut engine);
    }
    assert_eq!(
        engine.state(),
        SessionState::Finished(FinishReason::UserQuit)
    );
    assert_eq!(engine.snapshot().typed, "ab");

    tx.send(key(KeyCode::Tab)).unwrap();
    runner.step_engine(&mut engine);
    assert_eq!(engine.state(), SessionState::Created);
    assert_eq!(engine.snapshot().typed, "");
}

#[test]
fn headless_unmapped_keys_are_ignored() {
    let source = WordSource::fixed(vec!["abc".into()], None).unwrap();
    let mut engine = SessionEngine::with_source(
        SessionConfig::new(TestMode::Time { seconds: 30 }),
        source,
        ManualTimeSource::new(),
    )
    .unwrap();

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );
    tx.send(key(KeyCode::Left)).unwrap();
    tx.send(key(KeyCode::F(5))).unwrap();
    tx.send(EngineEvent::Resize).unwrap();
    for _ in 0..3 {
        runner.step_engine(&mut engine);
    }

    assert_eq!(engine.state(), SessionState::Created);
}
