//! Terminal input, tick and render signals merged into one stream.

use std::time::Duration;

use crossterm::event::{EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;

/// Roughly 30 frames per second.
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

#[derive(Debug, Clone)]
pub enum Event {
    Key(KeyEvent),
    Tick,
    Render,
}

pub struct EventHandler {
    input: EventStream,
    tick: tokio::time::Interval,
    render: tokio::time::Interval,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        Self {
            input: EventStream::new(),
            tick: tokio::time::interval(tick_rate),
            render: tokio::time::interval(RENDER_INTERVAL),
        }
    }

    /// Wait for the next key press, tick or render signal.
    ///
    /// Only key presses are reported; release and repeat events are dropped.
    pub async fn next(&mut self) -> anyhow::Result<Event> {
        loop {
            tokio::select! {
                input = self.input.next() => match input {
                    Some(Ok(crossterm::event::Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        return Ok(Event::Key(key));
                    }
                    Some(Err(e)) => return Err(e.into()),
                    None => anyhow::bail!("terminal input stream closed"),
                    _ => {}
                },
                _ = self.tick.tick() => return Ok(Event::Tick),
                _ = self.render.tick() => return Ok(Event::Render),
            }
        }
    }
}
