//! Heater hysteresis state machine.
//!
//! Two thresholds, one per direction, form a dead band that prevents relay
//! chatter around a single setpoint: heating turns on below `on_below_c`,
//! off at `off_at_c`, and the state is held anywhere in between.

use crate::config::HeaterCfg;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaterState {
    /// Relay energized, plate below the target band
    Heating,
    /// Plate at temperature; safe to press
    Ready,
}

/// Pure hysteresis transition. Inside `[on_below_c, off_at_c)` the previous
/// state is returned unchanged.
pub fn next_state(current: HeaterState, temp_c: f32, cfg: &HeaterCfg) -> HeaterState {
    if temp_c < cfg.on_below_c {
        HeaterState::Heating
    } else if temp_c >= cfg.off_at_c {
        HeaterState::Ready
    } else {
        current
    }
}

#[derive(Debug)]
pub struct HeaterController {
    cfg: HeaterCfg,
    state: HeaterState,
}

impl HeaterController {
    /// Starts in `Ready` so the first temperature reading decides; a cold
    /// plate transitions to `Heating` on the first update.
    pub fn new(cfg: HeaterCfg) -> Self {
        Self {
            cfg,
            state: HeaterState::Ready,
        }
    }

    /// Apply one temperature reading and return the (possibly held) state.
    pub fn update(&mut self, temp_c: f32) -> HeaterState {
        self.state = next_state(self.state, temp_c, &self.cfg);
        self.state
    }

    pub fn state(&self) -> HeaterState {
        self.state
    }

    /// "Ready" = plate hot enough to press = relay released.
    pub fn is_ready(&self) -> bool {
        self.state == HeaterState::Ready
    }

    /// Whether the heater relay should be energized this cycle.
    pub fn is_heating(&self) -> bool {
        self.state == HeaterState::Heating
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> HeaterCfg {
        HeaterCfg::default()
    }

    #[test]
    fn below_band_always_heats() {
        for prior in [HeaterState::Heating, HeaterState::Ready] {
            assert_eq!(next_state(prior, 179.9, &cfg()), HeaterState::Heating);
        }
    }

    #[test]
    fn at_or_above_off_threshold_always_ready() {
        for prior in [HeaterState::Heating, HeaterState::Ready] {
            assert_eq!(next_state(prior, 185.0, &cfg()), HeaterState::Ready);
            assert_eq!(next_state(prior, 400.0, &cfg()), HeaterState::Ready);
        }
    }

    #[test]
    fn band_interior_holds_either_state() {
        for prior in [HeaterState::Heating, HeaterState::Ready] {
            for t in [180.0, 182.5, 184.9] {
                assert_eq!(next_state(prior, t, &cfg()), prior);
            }
        }
    }

    #[test]
    fn reference_sequence() {
        // 190 -> ready, 182 -> held ready, 179 -> heating
        let mut heater = HeaterController::new(cfg());
        assert_eq!(heater.update(190.0), HeaterState::Ready);
        assert_eq!(heater.update(182.0), HeaterState::Ready);
        assert_eq!(heater.update(179.0), HeaterState::Heating);
        assert!(!heater.is_ready());
    }

    #[test]
    fn lower_boundary_belongs_to_the_band() {
        // Exactly 180.0 holds; only strictly below turns the heater on.
        let mut heater = HeaterController::new(cfg());
        heater.update(190.0);
        assert_eq!(heater.update(180.0), HeaterState::Ready);
        heater.update(100.0);
        assert_eq!(heater.update(180.0), HeaterState::Heating);
    }
}
