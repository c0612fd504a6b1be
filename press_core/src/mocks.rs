//! Scripted sensors and spy actuators for tests and benches.
//!
//! Each scripted device plays back a fixed sequence of outcomes; the last
//! entry repeats once the script runs out, so long loops stay deterministic.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use press_traits::{AnalogInput, RangeFinder, Relay, Thermocouple};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn play<T: Clone>(script: &[T], cursor: &mut usize) -> Option<T> {
    if script.is_empty() {
        return None;
    }
    let i = (*cursor).min(script.len() - 1);
    *cursor += 1;
    Some(script[i].clone())
}

/// Range finder playing back `Some(mm)` readings, `None` timeouts, or
/// errors (`Err` entries are stored as message strings).
pub struct ScriptedRange {
    script: Vec<Result<Option<f32>, String>>,
    cursor: usize,
}

impl ScriptedRange {
    pub fn new(script: Vec<Result<Option<f32>, String>>) -> Self {
        Self { script, cursor: 0 }
    }

    /// Always returns the same reading.
    pub fn steady(mm: f32) -> Self {
        Self::new(vec![Ok(Some(mm))])
    }
}

impl RangeFinder for ScriptedRange {
    fn measure(&mut self, _timeout: Duration) -> Result<Option<f32>, BoxError> {
        match play(&self.script, &mut self.cursor) {
            Some(Ok(v)) => Ok(v),
            Some(Err(msg)) => Err(msg.into()),
            None => Ok(None),
        }
    }
}

pub struct ScriptedThermo {
    script: Vec<Result<f32, String>>,
    cursor: usize,
}

impl ScriptedThermo {
    pub fn new(script: Vec<Result<f32, String>>) -> Self {
        Self { script, cursor: 0 }
    }

    pub fn steady(temp_c: f32) -> Self {
        Self::new(vec![Ok(temp_c)])
    }
}

impl Thermocouple for ScriptedThermo {
    fn read_celsius(&mut self) -> Result<f32, BoxError> {
        match play(&self.script, &mut self.cursor) {
            Some(Ok(v)) => Ok(v),
            Some(Err(msg)) => Err(msg.into()),
            None => Err("thermocouple script exhausted".into()),
        }
    }
}

pub struct ScriptedAnalog {
    script: Vec<Result<u16, String>>,
    cursor: usize,
}

impl ScriptedAnalog {
    pub fn new(script: Vec<Result<u16, String>>) -> Self {
        Self { script, cursor: 0 }
    }

    pub fn steady(raw: u16) -> Self {
        Self::new(vec![Ok(raw)])
    }
}

impl AnalogInput for ScriptedAnalog {
    fn read_raw(&mut self) -> Result<u16, BoxError> {
        match play(&self.script, &mut self.cursor) {
            Some(Ok(v)) => Ok(v),
            Some(Err(msg)) => Err(msg.into()),
            None => Err("analog script exhausted".into()),
        }
    }
}

/// Relay that records every successful write into a shared log.
pub struct SpyRelay {
    log: Arc<Mutex<Vec<bool>>>,
    fail_all: bool,
    fail_call: Option<usize>,
    calls: usize,
}

impl SpyRelay {
    pub fn new() -> (Self, Arc<Mutex<Vec<bool>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                log: Arc::clone(&log),
                fail_all: false,
                fail_call: None,
                calls: 0,
            },
            log,
        )
    }

    /// A relay whose every write fails, for degradation tests.
    pub fn failing() -> Self {
        Self {
            log: Arc::new(Mutex::new(Vec::new())),
            fail_all: true,
            fail_call: None,
            calls: 0,
        }
    }

    /// Fails the `call`-th write (1-based) and records the rest, for
    /// transient-fault tests.
    pub fn failing_on_call(call: usize) -> (Self, Arc<Mutex<Vec<bool>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                log: Arc::clone(&log),
                fail_all: false,
                fail_call: Some(call),
                calls: 0,
            },
            log,
        )
    }
}

impl Relay for SpyRelay {
    fn set_active(&mut self, active: bool) -> Result<(), BoxError> {
        self.calls += 1;
        if self.fail_all || self.fail_call == Some(self.calls) {
            return Err("relay write failed".into());
        }
        if let Ok(mut log) = self.log.lock() {
            log.push(active);
        }
        Ok(())
    }
}
