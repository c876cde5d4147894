//! Line-oriented command console
//!
//! One command per line; arguments are whitespace separated, except names
//! (`album Kind of Blue`), which take the rest of the line.

use std::time::Duration;
use thiserror::Error;
use tonearm_core::{FocusChange, TrackDescriptor};
use tonearm_playback::{Command, PlaySource, PlaybackStatus, RepeatMode, SessionUpdate};

pub const HELP: &str = "\
Transport:  play | pause | stop | next | prev | seek <secs|m:ss> | jump <index>
Library:    album <name> | artist <name> | playlist <name> | genre <name> | all | shuffle-all
Queue:      add <track-id> | play-next <track-id> | clear | prepare
Modes:      repeat <none|one|all> | shuffle <on|off>
Focus:      focus <gain|loss|transient|duck>
Other:      status | help | quit";

/// A parsed console line
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleInput {
    Playback(Command),

    /// Append a catalog track by id
    Add(String),

    /// Insert a catalog track after the current one
    PlayNext(String),

    /// Simulate a change from another audio producer
    Focus(FocusChange),

    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("`{command}` needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("`{command}`: invalid argument {value:?}")]
    InvalidArgument { command: &'static str, value: String },
}

/// Parse one console line
pub fn parse(line: &str) -> Result<ConsoleInput, ParseError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let input = match word.to_ascii_lowercase().as_str() {
        "" => return Err(ParseError::Empty),
        "prepare" => ConsoleInput::Playback(Command::Prepare),
        "play" => ConsoleInput::Playback(Command::Play),
        "pause" => ConsoleInput::Playback(Command::Pause),
        "stop" => ConsoleInput::Playback(Command::Stop),
        "next" => ConsoleInput::Playback(Command::SkipToNext),
        "prev" | "previous" => ConsoleInput::Playback(Command::SkipToPrevious),
        "seek" => {
            let value = required(rest, "seek", "a position")?;
            let position = parse_position(value).ok_or_else(|| ParseError::InvalidArgument {
                command: "seek",
                value: value.to_string(),
            })?;
            ConsoleInput::Playback(Command::SeekTo(position))
        }
        "jump" => {
            let value = required(rest, "jump", "a queue index")?;
            let index = value.parse().map_err(|_| ParseError::InvalidArgument {
                command: "jump",
                value: value.to_string(),
            })?;
            ConsoleInput::Playback(Command::SkipToQueueIndex(index))
        }
        "album" => play_from(PlaySource::Album(required(rest, "album", "a name")?.into())),
        "artist" => play_from(PlaySource::Artist(required(rest, "artist", "a name")?.into())),
        "playlist" => play_from(PlaySource::Playlist(
            required(rest, "playlist", "a name")?.into(),
        )),
        "genre" => play_from(PlaySource::Genre(required(rest, "genre", "a name")?.into())),
        "all" => play_from(PlaySource::AllTracks),
        "shuffle-all" => play_from(PlaySource::ShuffleAll),
        "repeat" => {
            let value = required(rest, "repeat", "none, one or all")?;
            let mode = match value.to_ascii_lowercase().as_str() {
                "none" | "off" => RepeatMode::None,
                "one" => RepeatMode::One,
                "all" => RepeatMode::All,
                _ => {
                    return Err(ParseError::InvalidArgument {
                        command: "repeat",
                        value: value.to_string(),
                    })
                }
            };
            ConsoleInput::Playback(Command::SetRepeatMode(mode))
        }
        "shuffle" => {
            let value = required(rest, "shuffle", "on or off")?;
            let enabled = match value.to_ascii_lowercase().as_str() {
                "on" | "true" => true,
                "off" | "false" => false,
                _ => {
                    return Err(ParseError::InvalidArgument {
                        command: "shuffle",
                        value: value.to_string(),
                    })
                }
            };
            ConsoleInput::Playback(Command::SetShuffleMode(enabled))
        }
        "add" => ConsoleInput::Add(required(rest, "add", "a track id")?.to_string()),
        "play-next" => ConsoleInput::PlayNext(required(rest, "play-next", "a track id")?.to_string()),
        "clear" => ConsoleInput::Playback(Command::ClearQueue),
        "focus" => {
            let value = required(rest, "focus", "gain, loss, transient or duck")?;
            let change = match value.to_ascii_lowercase().as_str() {
                "gain" => FocusChange::Gained,
                "loss" => FocusChange::Loss,
                "transient" => FocusChange::TransientLoss,
                "duck" => FocusChange::TransientLossCanDuck,
                _ => {
                    return Err(ParseError::InvalidArgument {
                        command: "focus",
                        value: value.to_string(),
                    })
                }
            };
            ConsoleInput::Focus(change)
        }
        "status" => ConsoleInput::Status,
        "help" | "?" => ConsoleInput::Help,
        "quit" | "exit" => ConsoleInput::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };

    Ok(input)
}

fn play_from(source: PlaySource) -> ConsoleInput {
    ConsoleInput::Playback(Command::PlayFrom(source))
}

fn required<'a>(
    rest: &'a str,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, ParseError> {
    if rest.is_empty() {
        Err(ParseError::MissingArgument { command, argument })
    } else {
        Ok(rest)
    }
}

/// `90`, `90.5` or `1:30`
fn parse_position(value: &str) -> Option<Duration> {
    if let Some((minutes, seconds)) = value.split_once(':') {
        let minutes: u64 = minutes.parse().ok()?;
        let seconds: u64 = seconds.parse().ok()?;
        if seconds >= 60 {
            return None;
        }
        return Some(Duration::from_secs(minutes * 60 + seconds));
    }

    let seconds: f64 = value.parse().ok()?;
    Duration::try_from_secs_f64(seconds).ok()
}

// ===== Output =====

fn clock(position: Duration) -> String {
    let secs = position.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn describe_track(track: &TrackDescriptor) -> String {
    if track.artist.is_empty() {
        track.title.clone()
    } else {
        format!("{} - {}", track.artist, track.title)
    }
}

fn repeat_label(mode: RepeatMode) -> &'static str {
    match mode {
        RepeatMode::None => "none",
        RepeatMode::One => "one",
        RepeatMode::All => "all",
    }
}

/// One line per published update
pub fn format_update(update: &SessionUpdate) -> String {
    match update {
        SessionUpdate::State(snapshot) => {
            format!("[state] {:?} at {}", snapshot.state, clock(snapshot.position))
        }
        SessionUpdate::Metadata(Some(track)) => format!(
            "[track] {} ({}, {})",
            describe_track(track),
            track.album,
            clock(track.duration)
        ),
        SessionUpdate::Metadata(None) => "[track] none".to_string(),
        SessionUpdate::Queue { tracks, cursor } => match cursor {
            Some(cursor) => format!("[queue] {} tracks, at {}", tracks.len(), cursor),
            None => "[queue] empty".to_string(),
        },
        SessionUpdate::Modes { repeat, shuffle } => format!(
            "[modes] repeat {} shuffle {}",
            repeat_label(*repeat),
            if *shuffle { "on" } else { "off" }
        ),
        SessionUpdate::Error { message } => format!("[error] {message}"),
    }
}

/// Numbered queue listing with the cursor marked
pub fn format_queue(tracks: &[TrackDescriptor], cursor: Option<usize>) -> String {
    if tracks.is_empty() {
        return "Queue is empty".to_string();
    }

    tracks
        .iter()
        .enumerate()
        .map(|(index, track)| {
            let marker = if Some(index) == cursor { '>' } else { ' ' };
            format!("{marker} {index:>3}  {}", describe_track(track))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Multi-line answer to `status`
pub fn format_status(status: &PlaybackStatus) -> String {
    let position = status
        .snapshot
        .as_ref()
        .map(|snapshot| clock(snapshot.position))
        .unwrap_or_else(|| clock(Duration::ZERO));

    let current = status
        .current
        .as_ref()
        .map(describe_track)
        .unwrap_or_else(|| "nothing".to_string());

    format!(
        "{:?}: {} at {}\nrepeat {} shuffle {} focus {:?} volume {:.2}\n{}",
        status.state,
        current,
        position,
        repeat_label(status.repeat),
        if status.shuffle { "on" } else { "off" },
        status.focus,
        status.volume,
        format_queue(&status.queue, status.cursor)
    )
}
