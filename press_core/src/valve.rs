//! Valve interlock: timed open stroke followed by a mandatory cooldown.

use crate::config::ValveCfg;

/// Interlock state, advanced once per control cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValveState {
    /// Idle; an activation may start when the gate allows it
    Closed,
    /// Stroke in progress. Time-bounded: the gate is not consulted again
    /// until the stroke completes.
    Open { opened_at_ms: u64 },
    /// Dwell after a close; no activation until it elapses
    Cooldown { closed_at_ms: u64 },
}

/// Relay action the caller must perform after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValveCommand {
    Energize,
    Release,
}

/// Pure transition function.
///
/// `may_actuate` is only consulted from `Closed` and at the end of a
/// cooldown; an in-flight stroke runs to its timed completion regardless.
/// An elapsed cooldown hands over to `Open` directly when the gate is high,
/// so a held trigger fires again without an idle cycle in between.
pub fn advance(
    state: ValveState,
    now_ms: u64,
    may_actuate: bool,
    cfg: &ValveCfg,
) -> (ValveState, Option<ValveCommand>) {
    match state {
        ValveState::Closed => {
            if may_actuate {
                (
                    ValveState::Open { opened_at_ms: now_ms },
                    Some(ValveCommand::Energize),
                )
            } else {
                (ValveState::Closed, None)
            }
        }
        ValveState::Open { opened_at_ms } => {
            if now_ms.saturating_sub(opened_at_ms) > cfg.open_ms {
                (
                    ValveState::Cooldown { closed_at_ms: now_ms },
                    Some(ValveCommand::Release),
                )
            } else {
                (state, None)
            }
        }
        ValveState::Cooldown { closed_at_ms } => {
            if now_ms.saturating_sub(closed_at_ms) > cfg.cooldown_ms {
                if may_actuate {
                    (
                        ValveState::Open { opened_at_ms: now_ms },
                        Some(ValveCommand::Energize),
                    )
                } else {
                    (ValveState::Closed, None)
                }
            } else {
                (state, None)
            }
        }
    }
}

/// Stateful wrapper used by the control loop. Boots `Closed` with no
/// pending cooldown.
#[derive(Debug)]
pub struct ValveController {
    cfg: ValveCfg,
    state: ValveState,
}

impl ValveController {
    pub fn new(cfg: ValveCfg) -> Self {
        Self {
            cfg,
            state: ValveState::Closed,
        }
    }

    /// Advance one cycle; the returned command, if any, must be applied to
    /// the relay before the cycle ends.
    pub fn update(&mut self, now_ms: u64, may_actuate: bool) -> Option<ValveCommand> {
        let (next, cmd) = advance(self.state, now_ms, may_actuate, &self.cfg);
        if next != self.state {
            tracing::debug!(from = ?self.state, to = ?next, now_ms, "valve transition");
        }
        self.state = next;
        cmd
    }

    pub fn state(&self) -> ValveState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ValveState::Open { .. })
    }
}
