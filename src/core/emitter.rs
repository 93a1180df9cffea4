//! Event sinks

use std::io::Write;

use crate::types::{Event, HarnessResult};

/// Destination for emitted events
pub trait EventSink {
    fn emit(&mut self, event: &Event) -> HarnessResult<()>;
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: &Event) -> HarnessResult<()> {
        (**self).emit(event)
    }
}

/// Writes one JSON object per line, flushing after each
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl JsonLinesSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> EventSink for JsonLinesSink<W> {
    fn emit(&mut self, event: &Event) -> HarnessResult<()> {
        serde_json::to_writer(&mut self.writer, event)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Collects events in memory
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    events: Vec<Event>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Event tags in emission order
    pub fn tags(&self) -> Vec<&'static str> {
        self.events.iter().map(Event::tag).collect()
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

impl EventSink for MemorySink {
    fn emit(&mut self, event: &Event) -> HarnessResult<()> {
        self.events.push(event.clone());
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
