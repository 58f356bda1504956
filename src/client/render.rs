//! Output side of the channel client.

use std::io::Write;

use crate::broker::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Optimistic local echo of something this client sent.
    Sent,
    Received,
}

pub trait Render {
    fn message(&mut self, label: &str, message: &Message, direction: Direction);

    /// Local-only notice, never sent over the wire.
    fn notice(&mut self, text: &str);
}

/// Writes one line per rendered item.
#[derive(Debug)]
pub struct Terminal<W> {
    out: W,
}

impl<W: Write> Terminal<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl Terminal<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> Render for Terminal<W> {
    fn message(&mut self, label: &str, message: &Message, direction: Direction) {
        let line = match (direction, message.timestamp()) {
            (Direction::Sent, _) => format!("> {label}: {}", message.body()),
            (Direction::Received, Some(ts)) => format!("[{ts}] {label}: {}", message.body()),
            (Direction::Received, None) => format!("{label}: {}", message.body()),
        };
        if let Err(e) = writeln!(self.out, "{line}") {
            tracing::debug!("Failed to render message: {e}");
        }
    }

    fn notice(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "-- {text} --") {
            tracing::debug!("Failed to render notice: {e}");
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Message {
        label: String,
        message: Message,
        direction: Direction,
    },
    Notice(String),
}

/// Keeps everything rendered, in order.
#[derive(Debug, Default)]
pub struct Transcript {
    pub entries: Vec<Entry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                Entry::Notice(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn messages(&self, direction: Direction) -> Vec<&Message> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                Entry::Message {
                    message,
                    direction: d,
                    ..
                } if *d == direction => Some(message),
                _ => None,
            })
            .collect()
    }
}

impl Render for Transcript {
    fn message(&mut self, label: &str, message: &Message, direction: Direction) {
        self.entries.push(Entry::Message {
            label: label.to_string(),
            message: message.clone(),
            direction,
        });
    }

    fn notice(&mut self, text: &str) {
        self.entries.push(Entry::Notice(text.to_string()));
    }
}
