//! Property-based tests for the playback scheduler
//!
//! Uses proptest to drive random command sequences and check the session
//! invariants after every command.
//! No shallow tests - every property test verifies meaningful invariants.

use ear_core::{PitchClass, ProgressionCatalog};
use ear_playback::{
    EndBehavior, NullRenderer, PlaybackMode, PlaybackScheduler, PlaybackState, SchedulerConfig,
};
use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;

// ===== Helpers =====

#[derive(Debug, Clone)]
enum Command {
    Start(usize),
    StartUnknown,
    TogglePause,
    Stop,
    Tick(u64),
    SetMode(bool),
    SetNoVoice(bool),
}

fn arbitrary_command() -> impl Strategy<Value = Command> {
    prop_oneof![
        (0usize..4).prop_map(Command::Start),
        Just(Command::StartUnknown),
        Just(Command::TogglePause),
        Just(Command::Stop),
        (0u64..10_000).prop_map(Command::Tick),
        any::<bool>().prop_map(Command::SetMode),
        any::<bool>().prop_map(Command::SetNoVoice),
    ]
}

fn arbitrary_config() -> impl Strategy<Value = SchedulerConfig> {
    (40u32..240, 0u64..5000, any::<bool>(), any::<bool>()).prop_map(
        |(tempo_bpm, hold_ms, stop, harmony_only)| SchedulerConfig {
            tempo_bpm,
            reveal_hold: Duration::from_millis(hold_ms),
            end_behavior: if stop {
                EndBehavior::Stop
            } else {
                EndBehavior::Loop
            },
            harmony_only,
        },
    )
}

fn check_invariants(scheduler: &PlaybackScheduler) -> Result<(), TestCaseError> {
    match scheduler.state() {
        PlaybackState::Stopped => {
            prop_assert!(scheduler.current_key().is_none());
            prop_assert!(scheduler.current_index().is_none());
            prop_assert_eq!(scheduler.current_chord_name(), "");
            prop_assert_eq!(scheduler.current_label(), "");
            prop_assert!(scheduler.time_until_next_deadline().is_none());
            prop_assert!(scheduler.current_melody().is_none());
        }
        PlaybackState::Playing | PlaybackState::Paused => {
            let index = scheduler.current_index();
            prop_assert!(index.is_some());
            prop_assert!(index.unwrap_or(usize::MAX) < scheduler.sequence().len());
            prop_assert!(scheduler.current_key().is_some());
            prop_assert!(!scheduler.current_chord_name().is_empty());
        }
    }

    // Exactly one step timer while playing, none otherwise
    prop_assert_eq!(
        scheduler.time_until_next_deadline().is_some(),
        scheduler.state() == PlaybackState::Playing
    );

    if scheduler.playback_mode() == PlaybackMode::Recognition
        && scheduler.state() != PlaybackState::Stopped
    {
        prop_assert!(!scheduler.current_label().is_empty());
    }

    // The melody tone always belongs to the sounding chord
    if let (Some(melody), Some(index)) = (scheduler.current_melody(), scheduler.current_index()) {
        prop_assert!(!scheduler.config().harmony_only);
        let tones = scheduler.sequence()[index].tones();
        prop_assert!(tones.contains(&PitchClass::new(i32::from(melody.midi))));
    }
    Ok(())
}

// ===== Property Tests =====

proptest! {
    /// Property: session invariants hold after any command sequence
    #[test]
    fn invariants_hold_for_any_command_sequence(
        config in arbitrary_config(),
        commands in prop::collection::vec(arbitrary_command(), 1..60)
    ) {
        let catalog = Arc::new(ProgressionCatalog::builtin());
        let ids: Vec<String> = catalog.list_ids().iter().map(|s| s.to_string()).collect();
        let mut scheduler = PlaybackScheduler::new(
            Arc::clone(&catalog),
            Box::new(NullRenderer::new()),
            config,
        );

        for command in commands {
            let before = scheduler.state();
            match command {
                Command::Start(i) => {
                    let result = scheduler.start(&ids[i % ids.len()]);
                    prop_assert_eq!(result.is_ok(), before == PlaybackState::Stopped);
                }
                Command::StartUnknown => {
                    prop_assert!(scheduler.start("no_such_progression").is_err());
                    prop_assert_eq!(scheduler.state(), before);
                }
                Command::TogglePause => {
                    let index = scheduler.current_index();
                    scheduler.toggle_pause();
                    prop_assert_eq!(scheduler.current_index(), index);
                }
                Command::Stop => {
                    scheduler.stop();
                    prop_assert_eq!(scheduler.state(), PlaybackState::Stopped);
                }
                Command::Tick(ms) => scheduler.tick(Duration::from_millis(ms)),
                Command::SetMode(audiation) => {
                    let mode = if audiation { PlaybackMode::Audiation } else { PlaybackMode::Recognition };
                    let result = scheduler.set_playback_mode(mode);
                    prop_assert_eq!(result.is_ok(), before == PlaybackState::Stopped);
                }
                Command::SetNoVoice(no_voice) => {
                    let result = scheduler.set_no_voice(no_voice);
                    prop_assert_eq!(result.is_ok(), before == PlaybackState::Stopped);
                }
            }
            check_invariants(&scheduler)?;
        }
    }

    /// Property: the key never changes during a session
    #[test]
    fn key_is_fixed_for_the_session(
        ticks in prop::collection::vec(0u64..5000, 1..40),
        tonic in 0i32..12
    ) {
        let catalog = Arc::new(ProgressionCatalog::builtin());
        let key = ear_core::Key::new(PitchClass::new(tonic), ear_core::Mode::Minor);
        let mut scheduler = PlaybackScheduler::new(
            catalog,
            Box::new(NullRenderer::new()),
            SchedulerConfig::default(),
        )
        .with_key_selector(Box::new(ear_core::FixedKeySelector(key)));

        scheduler.start("minor_swing").unwrap();
        for ms in ticks {
            scheduler.tick(Duration::from_millis(ms));
            prop_assert_eq!(scheduler.current_key(), Some(key));
        }
    }

    /// Property: with looping, the index after `n` whole slots is `n mod len`
    #[test]
    fn looping_index_follows_elapsed_slots(slots in 0u32..100) {
        let catalog = Arc::new(ProgressionCatalog::builtin());
        let mut scheduler = PlaybackScheduler::new(
            catalog,
            Box::new(NullRenderer::new()),
            SchedulerConfig::default(),
        );
        scheduler.start("minor_cadence").unwrap();

        // Every slot of this progression is 4 beats = 2s at 120 bpm
        scheduler.tick(Duration::from_secs(2) * slots);
        prop_assert_eq!(scheduler.current_index(), Some(slots as usize % 4));
    }
}
