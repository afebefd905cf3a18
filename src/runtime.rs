use std::io;
use std::sync::mpsc::{self, Receiver, RecvError, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// Interval between timer ticks.
pub const TICK_RATE_MS: u64 = 1000;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum PanelEvent {
    Key(KeyEvent),
    Resize,
    Tick,
    /// An edit notice from the activity socket, carrying the language id.
    Edit(Option<String>),
}

/// Source of events driving the panel (keyboard, edits, ticks)
pub trait PanelEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<PanelEvent, RecvTimeoutError>;
}

/// Production event source: terminal input, the activity socket, and the
/// 1 Hz ticker, all feeding one channel so the consumer stays single-threaded.
pub struct CrosstermEventSource {
    rx: Receiver<PanelEvent>,
}

impl CrosstermEventSource {
    pub fn new(port: u16) -> io::Result<Self> {
        let (tx, rx) = mpsc::channel();

        let tick_tx = tx.clone();
        thread::spawn(move || loop {
            if tick_tx.send(PanelEvent::Tick).is_err() {
                break;
            }
            thread::sleep(Duration::from_millis(TICK_RATE_MS))
        });

        crate::signal::spawn_listener(port, tx.clone())?;

        thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if tx.send(PanelEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(PanelEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Ok(Self { rx })
    }

    /// Block until the next event. Errors only when every producer is gone.
    pub fn recv(&self) -> Result<PanelEvent, RecvError> {
        self.rx.recv()
    }
}

impl PanelEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<PanelEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<PanelEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<PanelEvent>) -> Self {
        Self { rx }
    }
}

impl PanelEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<PanelEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time, for
/// headless sessions with no ticker thread: it synthesizes a Tick whenever
/// the tick interval expires with no event.
pub struct Runner<E: PanelEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: PanelEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> PanelEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                PanelEvent::Tick
            }
        }
    }
}
