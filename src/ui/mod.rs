//! User-facing output: event sinks and progress

pub mod progress;
pub mod sink;

pub use progress::ProgressSink;
pub use sink::{build_sink, render_outcome, ConsoleSink, EventSink, FileSink, MultiSink, NullSink};
