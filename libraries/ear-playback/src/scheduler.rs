//! Playback scheduler - core orchestration
//!
//! Owns the session state machine, steps through the resolved chords on its
//! own clock and applies the labelling policy of the active playback mode.
//!
//! Time only moves when the host calls [`PlaybackScheduler::tick`]. Every
//! step wait is a cancellable entry in a [`TimerQueue`], so pause and stop
//! can cut it off at any point.

use crate::{
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    renderer::{AudioRenderer, RenderHandle},
    timer::{TimerId, TimerQueue},
    types::{EndBehavior, PlaybackMode, PlaybackState, SchedulerConfig, SessionSnapshot},
};
use ear_core::{
    resolve, Key, KeySelector, MelodyLabels, MelodyPicker, MelodyTone, ProgressionCatalog,
    RandomKeySelector, ResolvedChord,
};
use std::sync::Arc;
use std::time::Duration;

/// Step timers one `tick` may fire before the clock is resynchronised
const MAX_CATCH_UP_STEPS: usize = 10_000;

/// Deferred work of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepTimer {
    /// The current chord has sounded for its full slot
    ChordEnd,

    /// An audiation label has been shown long enough
    RevealEnd,
}

/// Per-session state, present only while Playing or Paused
#[derive(Debug)]
struct Session {
    progression_id: String,
    key: Key,
    sequence: Vec<ResolvedChord>,
    index: usize,
    chord_name: String,
    label: String,

    melody_labels: MelodyLabels,
    melody: Option<MelodyTone>,
    melody_label: String,

    /// Render handle owned by the current step
    render: Option<RenderHandle>,

    /// Pending step timer
    timer: Option<TimerId>,
}

/// Callback registered through [`PlaybackScheduler::subscribe`]
pub type EventObserver = Box<dyn FnMut(&PlaybackEvent)>;

/// Chord progression playback scheduler
///
/// Manages:
/// - Session lifecycle (start, pause/resume, stop)
/// - Key selection and chord resolution at start
/// - Timed stepping through the resolved sequence
/// - Recognition / audiation labelling
/// - Render requests and their cancellation
pub struct PlaybackScheduler {
    catalog: Arc<ProgressionCatalog>,
    key_selector: Box<dyn KeySelector>,
    melody_picker: MelodyPicker,
    renderer: Box<dyn AudioRenderer>,
    config: SchedulerConfig,

    // Settings (only mutable while stopped)
    mode: PlaybackMode,
    no_voice: bool,

    // State
    state: PlaybackState,
    session: Option<Session>,

    // Clock and deferred steps
    now: Duration,
    timers: TimerQueue<StepTimer>,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,
    observers: Vec<EventObserver>,
}

impl PlaybackScheduler {
    /// Create a scheduler that picks a random key for every session
    pub fn new(
        catalog: Arc<ProgressionCatalog>,
        renderer: Box<dyn AudioRenderer>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            catalog,
            key_selector: Box::new(RandomKeySelector::new()),
            melody_picker: MelodyPicker::new(),
            renderer,
            config,
            mode: PlaybackMode::default(),
            no_voice: false,
            state: PlaybackState::Stopped,
            session: None,
            now: Duration::ZERO,
            timers: TimerQueue::new(),
            pending_events: Vec::new(),
            observers: Vec::new(),
        }
    }

    /// Replace the key selector
    #[must_use]
    pub fn with_key_selector(mut self, key_selector: Box<dyn KeySelector>) -> Self {
        self.key_selector = key_selector;
        self
    }

    /// Replace the melody tone picker
    #[must_use]
    pub fn with_melody_picker(mut self, melody_picker: MelodyPicker) -> Self {
        self.melody_picker = melody_picker;
        self
    }

    // ===== Commands =====

    /// Start a session for `progression_id`
    ///
    /// Only valid while stopped. On failure the scheduler stays stopped and
    /// an `Error` event is emitted alongside the returned error.
    pub fn start(&mut self, progression_id: &str) -> Result<()> {
        if self.state != PlaybackState::Stopped {
            return Err(PlaybackError::AlreadyActive);
        }

        let (key, sequence) = match self.prepare(progression_id) {
            Ok(prepared) => prepared,
            Err(e) => {
                tracing::warn!("Failed to start '{}': {}", progression_id, e);
                self.emit_error(e.to_string());
                return Err(e);
            }
        };

        tracing::info!(
            "Starting '{}' in {} ({} chords, {} mode)",
            progression_id,
            key,
            sequence.len(),
            self.mode.as_str()
        );

        self.session = Some(Session {
            progression_id: progression_id.to_string(),
            key,
            melody_labels: MelodyLabels::new(key, &sequence),
            sequence,
            index: 0,
            chord_name: String::new(),
            label: String::new(),
            melody: None,
            melody_label: String::new(),
            render: None,
            timer: None,
        });
        self.state = PlaybackState::Playing;
        self.emit(PlaybackEvent::SessionStarted {
            progression_id: progression_id.to_string(),
            key,
        });
        self.emit_state_changed(PlaybackState::Playing);
        self.begin_step(0);
        Ok(())
    }

    /// Pause when playing, resume when paused, no-op when stopped
    ///
    /// Resuming restarts the current chord from the top of its slot.
    pub fn toggle_pause(&mut self) {
        match self.state {
            PlaybackState::Stopped => {}
            PlaybackState::Playing => {
                self.release_step();
                self.state = PlaybackState::Paused;
                tracing::debug!("Paused at chord {:?}", self.current_index());
                self.emit_state_changed(PlaybackState::Paused);
            }
            PlaybackState::Paused => {
                self.state = PlaybackState::Playing;
                self.emit_state_changed(PlaybackState::Playing);
                let index = self.current_index().unwrap_or(0);
                tracing::debug!("Resuming at chord {}", index);
                self.begin_step(index);
            }
        }
    }

    /// End the session
    ///
    /// Idempotent when already stopped.
    pub fn stop(&mut self) {
        if self.state == PlaybackState::Stopped {
            return;
        }

        self.release_step();
        self.timers.clear();
        if let Some(session) = self.session.take() {
            tracing::info!("Stopped '{}'", session.progression_id);
        }
        self.state = PlaybackState::Stopped;
        self.emit_state_changed(PlaybackState::Stopped);
    }

    /// Advance the clock by `elapsed`
    ///
    /// Fires every step timer that falls due inside the window, in deadline
    /// order, each at its own deadline. The clock saturates at
    /// `Duration::MAX`; a jump too large to catch up on restarts the current
    /// chord at the new time.
    pub fn tick(&mut self, elapsed: Duration) {
        let target = self.now.saturating_add(elapsed);
        let mut fired = 0;
        while let Some((deadline, task)) = self.timers.pop_due(target) {
            self.now = deadline;
            self.fire(task);
            fired += 1;
            if fired == MAX_CATCH_UP_STEPS {
                tracing::warn!("Clock jumped by {:?}, resynchronising", elapsed);
                self.now = target;
                if self.state == PlaybackState::Playing {
                    let index = self.current_index().unwrap_or(0);
                    self.begin_step(index);
                }
                break;
            }
        }
        self.now = target;
    }

    /// Time until the next step timer fires, `None` when nothing is pending
    pub fn time_until_next_deadline(&self) -> Option<Duration> {
        self.timers
            .next_deadline()
            .map(|deadline| deadline.saturating_sub(self.now))
    }

    // ===== Settings =====

    /// Change the playback mode (stopped only)
    pub fn set_playback_mode(&mut self, mode: PlaybackMode) -> Result<()> {
        if self.state != PlaybackState::Stopped {
            return Err(PlaybackError::SessionActive("playback mode"));
        }
        self.mode = mode;
        Ok(())
    }

    /// Toggle the bass doubling (stopped only)
    pub fn set_no_voice(&mut self, no_voice: bool) -> Result<()> {
        if self.state != PlaybackState::Stopped {
            return Err(PlaybackError::SessionActive("no voice"));
        }
        self.no_voice = no_voice;
        Ok(())
    }

    // ===== State Queries =====

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_key(&self) -> Option<Key> {
        self.session.as_ref().map(|s| s.key)
    }

    /// Display name of the sounding chord, empty when stopped
    pub fn current_chord_name(&self) -> &str {
        self.session.as_ref().map_or("", |s| s.chord_name.as_str())
    }

    /// Answer label, empty when stopped or withheld
    pub fn current_label(&self) -> &str {
        self.session.as_ref().map_or("", |s| s.label.as_str())
    }

    pub fn current_index(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.index)
    }

    /// Melody tone over the sounding chord, `None` when stopped or harmony only
    pub fn current_melody(&self) -> Option<&MelodyTone> {
        self.session.as_ref().and_then(|s| s.melody.as_ref())
    }

    /// Melody answer, empty when stopped, withheld or harmony only
    pub fn current_melody_label(&self) -> &str {
        self.session.as_ref().map_or("", |s| s.melody_label.as_str())
    }

    pub fn progression_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.progression_id.as_str())
    }

    /// Resolved chords of the active session
    pub fn sequence(&self) -> &[ResolvedChord] {
        self.session
            .as_ref()
            .map(|s| s.sequence.as_slice())
            .unwrap_or_default()
    }

    pub fn playback_mode(&self) -> PlaybackMode {
        self.mode
    }

    pub fn no_voice(&self) -> bool {
        self.no_voice
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ProgressionCatalog {
        &self.catalog
    }

    /// Scheduler clock
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Everything the UI observes, in one value
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            playback_mode: self.mode,
            no_voice: self.no_voice,
            progression_id: self.progression_id().map(str::to_string),
            key: self.current_key(),
            current_index: self.current_index(),
            current_chord_name: self.current_chord_name().to_string(),
            current_label: self.current_label().to_string(),
            current_melody_note: self.current_melody().map(|m| m.note_name.clone()),
            current_melody_label: self.current_melody_label().to_string(),
        }
    }

    // ===== Events =====

    /// Register a callback invoked for every event as it is emitted
    pub fn subscribe(&mut self, observer: impl FnMut(&PlaybackEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internal =====

    /// Look up, pick a key and resolve, without touching state
    fn prepare(&mut self, progression_id: &str) -> Result<(Key, Vec<ResolvedChord>)> {
        let catalog = Arc::clone(&self.catalog);
        let template = catalog.lookup(progression_id)?;
        let key = self.key_selector.pick(&template.allowed_modes());
        // Validation guarantees at least one chord
        let sequence = resolve(template, &key)?;
        Ok((key, sequence))
    }

    /// Sound chord `index` and schedule its end
    fn begin_step(&mut self, index: usize) {
        self.release_step();

        let Some(chord) = self
            .session
            .as_ref()
            .and_then(|s| s.sequence.get(index))
            .cloned()
        else {
            return;
        };

        let melody = match &self.session {
            Some(session) if !self.config.harmony_only => {
                self.melody_picker.pick(&session.melody_labels, &chord)
            }
            _ => None,
        };
        let (label, melody_label) = match self.mode {
            PlaybackMode::Recognition => {
                (Some(chord.label.clone()), melody.as_ref().map(|m| m.label.clone()))
            }
            PlaybackMode::Audiation => (None, None),
        };
        let rendered = self.renderer.render(&chord, melody.as_ref(), self.no_voice);
        let deadline = self.now.saturating_add(self.config.slot_duration(chord.beats));
        let timer = self.timers.schedule(deadline, StepTimer::ChordEnd);

        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.index = index;
        session.chord_name = chord.display_name.clone();
        session.label = label.clone().unwrap_or_default();
        session.melody_label = melody_label.clone().unwrap_or_default();
        let melody_note = melody.as_ref().map(|m| m.note_name.clone());
        session.melody = melody;
        session.timer = Some(timer);
        session.render = rendered.as_ref().ok().copied();

        tracing::debug!(
            "Chord {}: {} ({})",
            index,
            chord.display_name,
            label.as_deref().unwrap_or("hidden")
        );
        self.emit(PlaybackEvent::ChordStarted {
            index,
            chord_name: chord.display_name,
            label,
            melody_note,
            melody_label,
        });

        if let Err(e) = rendered {
            tracing::warn!("Chord {} plays silently: {}", index, e);
            self.emit(PlaybackEvent::RendererUnavailable {
                index,
                message: e.to_string(),
            });
        }
    }

    /// Cancel the pending timer and in-flight render of the current step
    fn release_step(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Some(timer) = session.timer.take() {
            self.timers.cancel(timer);
        }
        if let Some(handle) = session.render.take() {
            self.renderer.cancel(handle);
        }
    }

    fn fire(&mut self, task: StepTimer) {
        if self.state != PlaybackState::Playing {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.timer = None;
        }

        match task {
            StepTimer::ChordEnd => self.finish_chord(),
            StepTimer::RevealEnd => self.advance(),
        }
    }

    /// The current chord has sounded for its full slot
    fn finish_chord(&mut self) {
        self.release_step();

        if self.mode == PlaybackMode::Recognition {
            self.advance();
            return;
        }

        let deadline = self.now.saturating_add(self.config.reveal_hold);
        let timer = self.timers.schedule(deadline, StepTimer::RevealEnd);
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(label) = session.sequence.get(session.index).map(|c| c.label.clone()) else {
            return;
        };
        let melody_label = session.melody.as_ref().map(|m| m.label.clone());
        session.label = label.clone();
        session.melody_label = melody_label.clone().unwrap_or_default();
        session.timer = Some(timer);
        let index = session.index;

        tracing::debug!("Chord {} revealed: {}", index, label);
        self.emit(PlaybackEvent::LabelRevealed {
            index,
            label,
            melody_label,
        });
    }

    /// Move to the next chord, or handle the end of the sequence
    fn advance(&mut self) {
        let Some((index, len)) = self.session.as_ref().map(|s| (s.index, s.sequence.len())) else {
            return;
        };

        if index + 1 < len {
            self.begin_step(index + 1);
            return;
        }

        match self.config.end_behavior {
            EndBehavior::Loop => {
                tracing::debug!("Sequence complete, looping");
                self.emit(PlaybackEvent::SequenceLooped);
                self.begin_step(0);
            }
            EndBehavior::Stop => {
                tracing::debug!("Sequence complete, stopping");
                self.emit(PlaybackEvent::SequenceFinished);
                self.stop();
            }
        }
    }

    fn emit(&mut self, event: PlaybackEvent) {
        for observer in &mut self.observers {
            observer(&event);
        }
        self.pending_events.push(event);
    }

    fn emit_state_changed(&mut self, state: PlaybackState) {
        self.emit(PlaybackEvent::StateChanged { state });
    }

    fn emit_error(&mut self, message: String) {
        self.emit(PlaybackEvent::Error { message });
    }
}
