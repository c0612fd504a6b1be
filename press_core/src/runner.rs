//! Calibrate-then-loop drivers around `PressCore`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::PressError;
use crate::press::PressCore;
use crate::telemetry::CycleRecord;

/// Calibrate, park the relays, then run cycles until `shutdown` is set.
/// Each record is handed to `emit` before the inter-cycle delay, so the
/// consumer sees it as soon as the cycle completes.
pub fn run(
    core: &mut PressCore,
    shutdown: &Arc<AtomicBool>,
    mut emit: impl FnMut(&CycleRecord),
) -> Result<(), PressError> {
    core.calibrate()?;
    core.begin()?;
    tracing::info!(baseline_mm = core.baseline_mm(), "control loop started");
    while !shutdown.load(Ordering::SeqCst) {
        let record = core.step();
        emit(&record);
        core.idle();
    }
    tracing::info!("control loop stopped");
    Ok(())
}

/// Bounded variant for tests and self-checks: runs exactly `cycles` cycles
/// and returns their records.
pub fn run_cycles(
    core: &mut PressCore,
    cycles: usize,
    mut emit: impl FnMut(&CycleRecord),
) -> Result<Vec<CycleRecord>, PressError> {
    core.calibrate()?;
    core.begin()?;
    let mut records = Vec::with_capacity(cycles);
    for _ in 0..cycles {
        let record = core.step();
        emit(&record);
        records.push(record);
        core.idle();
    }
    Ok(records)
}
