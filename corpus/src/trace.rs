//! Human readable progress trace of crawler and classifier state transitions.
//!
//! Every actor owns a column: crawler `i` (zero-based) prints in column `i + 1` and the
//! classifier in the column after the last crawler. A line right-aligns its label at the end
//! of the actor's column, so the output reads as a table:
//!
//! ```text
//!        crawler1       crawler2       crawler3     classifier
//!           start
//!                          start
//!                                                        start
//!            grab
//! ```
//!
//! The trace is a side channel: it is not parsed and its exact layout is not a compatibility
//! surface.

use std::borrow::Cow;
use std::fmt;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

use crate::types::CrawlerId;

/// An actor printing trace lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Crawler(CrawlerId),
    Classifier,
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Actor::Crawler(id) => write!(f, "crawler{}", id + 1),
            Actor::Classifier => write!(f, "classifier"),
        }
    }
}

/// A state transition reported by an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The actor started.
    Start,
    /// A crawler is about to block waiting for free space.
    Wait,
    /// A crawler woke up after waiting for free space.
    Resume,
    /// A crawler started generating an article.
    Grab,
    /// A crawler enqueued its article.
    Grabbed,
    /// The classifier took an article from the buffer.
    Classify,
    /// The classifier persisted an article.
    Classified,
    /// The classifier detected that the collection goal is reached.
    GoalReached { articles: u64 },
    /// The classifier drained the buffer and stored its last article.
    Stored { articles: u64 },
    /// The actor stopped.
    Quit,
}

impl Transition {
    /// Returns the short label printed for this transition.
    pub fn label(&self) -> Cow<'static, str> {
        match self {
            Transition::Start => Cow::Borrowed("start"),
            Transition::Wait => Cow::Borrowed("wait"),
            Transition::Resume => Cow::Borrowed("s-wait"),
            Transition::Grab => Cow::Borrowed("grab"),
            Transition::Grabbed => Cow::Borrowed("f-grab"),
            Transition::Classify => Cow::Borrowed("clfy"),
            Transition::Classified => Cow::Borrowed("f-clfy"),
            Transition::GoalReached { articles } => Cow::Owned(format!("{articles}-enough")),
            Transition::Stored { articles } => Cow::Owned(format!("{articles}-store")),
            Transition::Quit => Cow::Borrowed("quit"),
        }
    }
}

/// Lines collected by a capturing [`ProgressTracer`].
#[derive(Debug, Clone, Default)]
pub struct TraceCapture {
    lines: Arc<Mutex<Vec<String>>>,
}

impl TraceCapture {
    /// Returns a copy of every line traced so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push(&self, line: String) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line);
    }
}

#[derive(Debug, Clone)]
enum TraceTarget {
    Stdout,
    Capture(TraceCapture),
    Silent,
}

/// Formats and writes progress trace lines.
#[derive(Debug, Clone)]
pub struct ProgressTracer {
    target: TraceTarget,
    column_width: usize,
    num_crawlers: usize,
}

impl ProgressTracer {
    /// Creates a tracer printing to standard output.
    pub fn stdout(column_width: usize, num_crawlers: usize) -> Self {
        Self {
            target: TraceTarget::Stdout,
            column_width,
            num_crawlers,
        }
    }

    /// Creates a tracer keeping lines in memory, returned through the [`TraceCapture`].
    pub fn capture(column_width: usize, num_crawlers: usize) -> (Self, TraceCapture) {
        let capture = TraceCapture::default();
        let tracer = Self {
            target: TraceTarget::Capture(capture.clone()),
            column_width,
            num_crawlers,
        };

        (tracer, capture)
    }

    /// Creates a tracer that only emits `tracing` events.
    pub fn silent(column_width: usize, num_crawlers: usize) -> Self {
        Self {
            target: TraceTarget::Silent,
            column_width,
            num_crawlers,
        }
    }

    /// Renders the header naming every column.
    pub fn header(&self) -> String {
        let width = self.column_width;

        let mut header = (0..self.num_crawlers)
            .map(|id| format!("{:>width$}", Actor::Crawler(id).to_string()))
            .collect::<String>();
        header.push_str(&format!("{:>width$}", Actor::Classifier.to_string()));

        header
    }

    /// Renders the line for `transition` in `actor`'s column.
    pub fn render(&self, actor: Actor, transition: Transition) -> String {
        let column = match actor {
            Actor::Crawler(id) => id + 1,
            Actor::Classifier => self.num_crawlers + 1,
        };
        let width = column * self.column_width;

        format!("{:>width$}", transition.label())
    }

    /// Writes the header line.
    pub fn print_header(&self) {
        self.write_line(self.header());
    }

    /// Records a transition of `actor`.
    pub fn emit(&self, actor: Actor, transition: Transition) {
        debug!(%actor, transition = %transition.label(), "progress");

        if matches!(self.target, TraceTarget::Silent) {
            return;
        }

        self.write_line(self.render(actor, transition));
    }

    fn write_line(&self, line: String) {
        match &self.target {
            TraceTarget::Stdout => {
                let mut stdout = std::io::stdout().lock();
                // Trace output is best effort, a closed stdout must not stop the pipeline.
                let _ = writeln!(stdout, "{line}");
            }
            TraceTarget::Capture(capture) => capture.push(line),
            TraceTarget::Silent => {}
        }
    }
}
