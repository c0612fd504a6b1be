//! Safety gate: the conjunction that must hold for a valve activation to
//! begin.

use crate::heater::HeaterState;
use crate::sample::PresenceReading;

/// Everything the gate looks at, captured once per cycle.
#[derive(Debug, Clone, Copy)]
pub struct GateInputs {
    pub heater: HeaterState,
    pub presence: PresenceReading,
    pub retracted: bool,
    /// Manual trigger level, `None` when no trigger input is wired
    pub trigger: Option<bool>,
}

/// Pure conjunction. Every condition must hold simultaneously; there is no
/// memory and no priority between them. A missing trigger input does not
/// block the gate.
pub fn may_actuate(inputs: &GateInputs) -> bool {
    inputs.heater == HeaterState::Ready
        && inputs.presence.workpiece_present
        && !inputs.presence.hand_present
        && inputs.retracted
        && inputs.trigger.unwrap_or(true)
}
