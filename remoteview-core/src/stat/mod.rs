mod codec;

pub use codec::{LineDecoder, encode_line};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which facility produced a stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emitter {
    Logger,
    Profiler,
}

/// Event-specific part of a stat. The variant name is written as `event`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum StatEvent {
    /// A profiled section was entered.
    Enter { name: String, start: DateTime<Utc> },

    /// A profiled section was left.
    Exit {
        name: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// A free-form log message.
    Info { message: String },
}

/// A single record emitted by a reporter.
///
/// On the wire this is a flat JSON object:
/// `{"emitter":"profiler","reliable":false,"event":"enter","name":"...","start":"..."}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    pub emitter: Emitter,
    pub reliable: Option<bool>,
    #[serde(flatten)]
    pub event: StatEvent,
}

impl Stat {
    pub fn enter(name: impl Into<String>, start: DateTime<Utc>) -> Self {
        Self {
            emitter: Emitter::Profiler,
            reliable: Some(false),
            event: StatEvent::Enter {
                name: name.into(),
                start,
            },
        }
    }

    pub fn exit(name: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            emitter: Emitter::Profiler,
            reliable: Some(false),
            event: StatEvent::Exit {
                name: name.into(),
                start,
                end,
            },
        }
    }

    pub fn info(message: impl Into<String>, reliable: Option<bool>) -> Self {
        Self {
            emitter: Emitter::Logger,
            reliable,
            event: StatEvent::Info {
                message: message.into(),
            },
        }
    }

    /// Short event label, used for log fields.
    pub fn kind(&self) -> &'static str {
        match self.event {
            StatEvent::Enter { .. } => "enter",
            StatEvent::Exit { .. } => "exit",
            StatEvent::Info { .. } => "info",
        }
    }
}
