//! End-to-end tests for a writing session driven tick by tick.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use bonbasses_core::entitlement::{can_apply, CanvasMode, GateDecision, CANVAS_PACK, TIMER_10_MIN};
use bonbasses_core::events::Event;
use bonbasses_core::hints::{load_hints, HintRotation};
use bonbasses_core::platform::{PurchaseLedger, PACE_QUESTION_ID};
use bonbasses_core::session::{Collaborators, SessionConfig, SessionController, TextUpdate};
use bonbasses_core::storage::{FilePreferences, MemoryPreferences, Preferences};
use bonbasses_core::timer::{ClockState, Pace};
use proptest::prelude::*;

fn collaborators(ledger: Arc<PurchaseLedger>) -> Collaborators {
    Collaborators::new(Arc::new(MemoryPreferences::default()), ledger)
}

fn hints_of(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::HintPublished { hint, .. } => Some(hint.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_fast_seven_minute_session() {
    let config = SessionConfig {
        words: vec!["anchor".into(), "violet".into(), "thunder".into()],
        pace: Pace::Fast,
        hints: vec!["A".into(), "B".into()],
        ..SessionConfig::default()
    }
    .with_hint_seed(11);
    let mut ctl = SessionController::new(config, collaborators(Arc::new(PurchaseLedger::new())));

    // First hint lands as the clock starts at 420.
    let first = hints_of(&ctl.start());
    assert_eq!(first.len(), 1);
    assert_eq!(ctl.snapshot().pending_hint.as_deref(), Some(first[0].as_str()));
    ctl.acknowledge_hint();

    let mut second = Vec::new();
    for _ in 0..210 {
        second.extend(hints_of(&ctl.tick()));
    }
    assert_eq!(ctl.snapshot().seconds_remaining, 210);
    assert_eq!(second.len(), 1);
    assert_ne!(second[0], first[0]);

    let mut time_up = 0;
    for _ in 0..210 {
        for event in ctl.tick() {
            if matches!(event, Event::TimeUp { .. }) {
                time_up += 1;
            }
        }
    }
    assert_eq!(time_up, 1);
    let snap = ctl.snapshot();
    assert_eq!(snap.seconds_remaining, 0);
    assert!(snap.pending_time_up);
    assert!(!snap.timer_running);
    assert_eq!(ctl.clock_state(), ClockState::Stopped { time_up: true });

    // Nothing moves after time is up.
    assert!(ctl.tick().is_empty());
    assert_eq!(ctl.snapshot(), snap);
}

#[test]
fn test_locked_canvas_then_purchase() {
    let ledger = Arc::new(PurchaseLedger::new());
    let mut ctl = SessionController::new(SessionConfig::default(), collaborators(ledger.clone()));

    assert_eq!(
        ctl.select_canvas(CanvasMode::Focus),
        GateDecision::NeedsPurchase(CANVAS_PACK.to_string())
    );
    assert_eq!(ctl.snapshot().pending_paywall.as_deref(), Some(CANVAS_PACK));
    assert_eq!(ctl.snapshot().canvas, CanvasMode::Classic);
    ctl.dismiss_paywall();
    assert_eq!(ctl.snapshot().pending_paywall, None);

    ledger.record_purchase(CANVAS_PACK);
    assert!(ctl.select_canvas(CanvasMode::Focus).is_allowed());
    assert_eq!(ctl.snapshot().canvas, CanvasMode::Focus);
}

#[test]
fn test_session_from_preference_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = FilePreferences::with_path(dir.path().join("preferences.toml"));
    let mut prefs = Preferences::default();
    prefs.save_answer(PACE_QUESTION_ID, "Fast");
    prefs.timer_length = 10;
    prefs.selected_canvas = "FOCUS".into();
    store.save(&prefs).unwrap();

    let ledger = Arc::new(PurchaseLedger::new());
    ledger.record_purchase(TIMER_10_MIN);
    let store = Arc::new(store);

    let config = SessionConfig::from_preferences(
        vec!["ember".into()],
        load_hints(r#"{"hints": ["Who wants what?", "  "]}"#),
        store.as_ref(),
        ledger.as_ref(),
    );
    assert_eq!(config.pace, Pace::Fast);
    assert_eq!(config.pace.hint_offsets(), (420, 210));
    assert_eq!(config.session_minutes, 10);
    assert_eq!(config.hints, vec!["Who wants what?"]);

    // Focus is saved but not owned.
    let mut ctl = SessionController::new(config, Collaborators::new(store.clone(), ledger.clone()));
    assert_eq!(ctl.snapshot().canvas, CanvasMode::Classic);
    assert_eq!(ctl.snapshot().seconds_remaining, 600);

    ledger.record_purchase(CANVAS_PACK);
    assert!(ctl.select_canvas(CanvasMode::Typewriter).is_allowed());
    assert_eq!(ctl.snapshot().canvas, CanvasMode::Typewriter);
    let mut saved = false;
    for _ in 0..300 {
        if matches!(store.load(), Ok(written) if written.selected_canvas == "TYPEWRITER") {
            saved = true;
            break;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    assert!(saved, "canvas choice was not written");
    assert_eq!(ctl.update_text("Ember light."), TextUpdate::Accepted);
}

#[test]
fn test_corrupt_preference_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.toml");
    std::fs::write(&path, "timer_length = [[[").unwrap();
    let store = Arc::new(FilePreferences::with_path(&path));
    let ledger = Arc::new(PurchaseLedger::new());

    let config = SessionConfig::from_preferences(Vec::new(), Vec::new(), store.as_ref(), ledger.as_ref());
    assert_eq!(config.pace, Pace::Steady);
    assert_eq!(config.session_minutes, 7);
    assert!(config.gentle_haptics);

    let ctl = SessionController::new(config, Collaborators::new(store, ledger));
    assert_eq!(ctl.snapshot().canvas, CanvasMode::Classic);
    assert_eq!(ctl.snapshot().seconds_remaining, 420);
}

#[test]
fn test_hint_rotation_exhausts_before_repeating() {
    let hints: Vec<String> = ["one", "two", "three", "four"].iter().map(|s| s.to_string()).collect();
    let mut rotation = HintRotation::with_seed(hints.clone(), 99);

    let first_round: HashSet<String> = (0..hints.len()).map(|_| rotation.next()).collect();
    assert_eq!(first_round.len(), hints.len());

    // The N+1th pick starts a new rotation.
    let next = rotation.next();
    assert!(hints.contains(&next));
    assert_eq!(rotation.shown_count(), 1);
}

#[test]
fn test_resume_after_check_keeps_countdown() {
    let mut ctl = SessionController::new(
        SessionConfig::default().resumed("Half a story", 61),
        collaborators(Arc::new(PurchaseLedger::new())),
    );
    ctl.start();
    ctl.tick();
    let submission = ctl.check();
    assert_eq!(submission.seconds_remaining, 60);
    assert_eq!(submission.story_text, "Half a story");
    assert!(!ctl.snapshot().pending_time_up);
}

fn canvas_strategy() -> impl Strategy<Value = CanvasMode> {
    prop_oneof![
        Just(CanvasMode::Classic),
        Just(CanvasMode::Typewriter),
        Just(CanvasMode::Focus),
    ]
}

proptest! {
    #[test]
    fn gate_allows_exactly_free_or_owned(mode in canvas_strategy(), owns_pack in any::<bool>()) {
        let decision = can_apply(mode, |id| owns_pack && id == CANVAS_PACK);
        let expected = mode == CanvasMode::Classic || owns_pack;
        prop_assert_eq!(decision.is_allowed(), expected);
        if !expected {
            prop_assert_eq!(decision, GateDecision::NeedsPurchase(CANVAS_PACK.to_string()));
        }
    }

    #[test]
    fn seconds_never_increase(start in 0u32..=600, ticks in 0usize..700) {
        let mut ctl = SessionController::new(
            SessionConfig::default().resumed("", start),
            collaborators(Arc::new(PurchaseLedger::new())),
        );
        ctl.start();
        let mut last = ctl.snapshot().seconds_remaining;
        for _ in 0..ticks {
            ctl.tick();
            let now = ctl.snapshot().seconds_remaining;
            prop_assert!(now <= last);
            last = now;
        }
    }
}
