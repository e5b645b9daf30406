//! Session driver
//!
//! Runs the scheduler on the tokio clock: sleeps until the next step
//! deadline, wakes early for listener commands, and ticks the scheduler with
//! the real elapsed time on every wake.

use crate::error::Result;
use ear_playback::{PlaybackEvent, PlaybackScheduler, PlaybackState};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Listener commands read from the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TogglePause,
    Stop,
    /// Start the progression again (with a fresh key)
    Restart,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "p" | "pause" | "" => Some(Command::TogglePause),
            "s" | "stop" => Some(Command::Stop),
            "r" | "restart" => Some(Command::Restart),
            "q" | "quit" | "exit" => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Drive sessions of `progression_id` until the listener quits
///
/// Starts the first session immediately. Every event the scheduler emits is
/// handed to `on_event`. Returns when a `Quit` arrives or the command channel
/// closes.
pub async fn run_session(
    scheduler: &mut PlaybackScheduler,
    progression_id: &str,
    mut commands: mpsc::Receiver<Command>,
    mut on_event: impl FnMut(&PlaybackEvent),
) -> ear_playback::Result<()> {
    scheduler.start(progression_id)?;
    let mut last_tick = Instant::now();

    loop {
        for event in scheduler.drain_events() {
            on_event(&event);
        }

        let command = tokio::select! {
            command = commands.recv() => Some(command),
            () = sleep_for(scheduler.time_until_next_deadline()) => None,
        };

        let now = Instant::now();
        scheduler.tick(now - last_tick);
        last_tick = now;

        match command {
            None => {}
            Some(Some(Command::TogglePause)) => scheduler.toggle_pause(),
            Some(Some(Command::Stop)) => scheduler.stop(),
            Some(Some(Command::Restart)) => {
                scheduler.stop();
                if let Err(e) = scheduler.start(progression_id) {
                    tracing::warn!("Restart failed: {}", e);
                }
            }
            Some(Some(Command::Quit) | None) => {
                scheduler.stop();
                break;
            }
        }
    }

    for event in scheduler.drain_events() {
        on_event(&event);
    }
    Ok(())
}

async fn sleep_for(duration: Option<Duration>) {
    match duration {
        Some(duration) => tokio::time::sleep(duration).await,
        None => std::future::pending().await,
    }
}

/// Terminal line for an event, if it is worth showing
pub fn describe_event(event: &PlaybackEvent) -> Option<String> {
    match event {
        PlaybackEvent::SessionStarted {
            progression_id,
            key,
        } => Some(format!("{} in {}", progression_id, key)),
        PlaybackEvent::StateChanged { state } => match state {
            PlaybackState::Playing => None,
            PlaybackState::Paused => Some("(paused, p to resume)".to_string()),
            PlaybackState::Stopped => Some("(stopped, r to restart, q to quit)".to_string()),
        },
        PlaybackEvent::ChordStarted {
            chord_name,
            label,
            melody_note,
            melody_label,
            ..
        } => {
            let mut line = format!("{:<8} {}", chord_name, label.as_deref().unwrap_or("?"));
            if let Some(note) = melody_note {
                line = format!(
                    "{:<17} {:<4} {}",
                    line,
                    note,
                    melody_label.as_deref().unwrap_or("?")
                );
            }
            Some(line)
        }
        PlaybackEvent::LabelRevealed {
            label,
            melody_label,
            ..
        } => Some(match melody_label {
            Some(melody_label) => format!("{:<8} {:<8} {:<4} {}", "", label, "", melody_label),
            None => format!("{:<8} {}", "", label),
        }),
        PlaybackEvent::SequenceLooped => Some("--".to_string()),
        PlaybackEvent::SequenceFinished => None,
        PlaybackEvent::RendererUnavailable { message, .. } => {
            Some(format!("(silent: {})", message))
        }
        PlaybackEvent::Error { message } => Some(format!("error: {}", message)),
    }
}

/// One JSON line per event, for front ends that read the trainer's output
pub fn event_json(event: &PlaybackEvent) -> Result<String> {
    Ok(serde_json::to_string(event)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("p\n"), Some(Command::TogglePause));
        assert_eq!(Command::parse(""), Some(Command::TogglePause));
        assert_eq!(Command::parse(" S "), Some(Command::Stop));
        assert_eq!(Command::parse("restart"), Some(Command::Restart));
        assert_eq!(Command::parse("q"), Some(Command::Quit));
        assert_eq!(Command::parse("x"), None);
    }

    #[test]
    fn withheld_labels_show_a_question_mark() {
        let event = PlaybackEvent::ChordStarted {
            index: 0,
            chord_name: "Am".to_string(),
            label: None,
            melody_note: None,
            melody_label: None,
        };
        assert_eq!(describe_event(&event).as_deref(), Some("Am       ?"));

        let event = PlaybackEvent::LabelRevealed {
            index: 0,
            label: "i".to_string(),
            melody_label: None,
        };
        assert_eq!(describe_event(&event).as_deref(), Some("         i"));
    }

    #[test]
    fn melody_follows_the_chord_column() {
        let event = PlaybackEvent::ChordStarted {
            index: 2,
            chord_name: "E7".to_string(),
            label: Some("V7".to_string()),
            melody_note: Some("G#5".to_string()),
            melody_label: Some("si, 3".to_string()),
        };
        assert_eq!(
            describe_event(&event).as_deref(),
            Some("E7       V7       G#5  si, 3")
        );

        let event = PlaybackEvent::LabelRevealed {
            index: 2,
            label: "V7".to_string(),
            melody_label: Some("si, 3".to_string()),
        };
        assert_eq!(
            describe_event(&event).as_deref(),
            Some("         V7            si, 3")
        );
    }

    #[test]
    fn events_as_json_lines() {
        let event = PlaybackEvent::LabelRevealed {
            index: 1,
            label: "iv".to_string(),
            melody_label: None,
        };
        let line = event_json(&event).unwrap();
        assert_eq!(
            line,
            r#"{"LabelRevealed":{"index":1,"label":"iv","melody_label":null}}"#
        );
        assert!(!line.contains('\n'));

        let back: PlaybackEvent = serde_json::from_str(&line).unwrap();
        assert_eq!(back, event);
    }
}
