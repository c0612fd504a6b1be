//! The cycle engine: owns every device handle and every piece of mutable
//! control state, and advances them together once per `step`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use press_traits::{AnalogInput, Clock, MonotonicClock, RangeFinder, Relay, Thermocouple};

use crate::config::{
    CycleCfg, HeaterCfg, PresenceCfg, PressureCal, RetractionCfg, Timeouts, ValveCfg,
};
use crate::error::{BuildError, PressError};
use crate::gate::{self, GateInputs};
use crate::heater::HeaterController;
use crate::hw_error::map_hw_error;
use crate::presence;
use crate::retraction::RetractionTracker;
use crate::sample::{DistanceSample, PresenceReading};
use crate::telemetry::CycleRecord;
use crate::valve::ValveController;

type DynRange = Box<dyn RangeFinder + Send>;
type DynThermo = Box<dyn Thermocouple + Send>;
type DynAnalog = Box<dyn AnalogInput + Send>;
type DynRelay = Box<dyn Relay + Send>;
type TriggerCheck = Box<dyn Fn() -> bool + Send>;

pub struct PressCore {
    range: DynRange,
    thermo: DynThermo,
    workpiece_in: DynAnalog,
    hand_in: DynAnalog,
    pressure_in: DynAnalog,
    heater_relay: DynRelay,
    valve_relay: DynRelay,
    trigger_check: Option<TriggerCheck>,
    clock: Arc<dyn Clock + Send + Sync>,

    heater: HeaterController,
    valve: ValveController,
    retraction: Option<RetractionTracker>,
    retraction_cfg: RetractionCfg,
    presence_cfg: PresenceCfg,
    cycle_cfg: CycleCfg,
    timeouts: Timeouts,
    pressure_cal: PressureCal,

    epoch: Instant,
    last_temp_c: f32,
}

impl core::fmt::Debug for PressCore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PressCore").finish_non_exhaustive()
    }
}

impl PressCore {
    pub fn builder() -> PressBuilder {
        PressBuilder::default()
    }

    /// Capture the retraction baseline: N paced measurements, averaged over
    /// the valid ones. Must run before `begin`.
    pub fn calibrate(&mut self) -> Result<(), PressError> {
        let n = self.retraction_cfg.baseline_samples;
        let gap = Duration::from_millis(self.retraction_cfg.baseline_gap_ms);
        let mut samples = Vec::with_capacity(n as usize);
        for i in 0..n {
            samples.push(self.read_distance());
            if i + 1 < n {
                self.clock.sleep(gap);
            }
        }
        self.retraction = Some(RetractionTracker::from_samples(
            &samples,
            &self.retraction_cfg,
        )?);
        Ok(())
    }

    /// Park both relays released and start the cycle timestamp epoch.
    pub fn begin(&mut self) -> Result<(), PressError> {
        if self.retraction.is_none() {
            return Err(PressError::State(
                "begin called before calibrate".to_owned(),
            ));
        }
        for (relay, name) in [
            (&mut self.heater_relay, "heater"),
            (&mut self.valve_relay, "valve"),
        ] {
            if let Err(e) = relay.set_active(false) {
                tracing::warn!(relay = name, error = %map_hw_error(e.as_ref()), "failed to park relay");
            }
        }
        self.epoch = self.clock.now();
        Ok(())
    }

    /// Run one control cycle and return its telemetry record.
    ///
    /// Nothing inside a running cycle is fatal: failed reads degrade toward
    /// the blocking side of the gate, failed relay writes are logged and
    /// retried implicitly on the next cycle's idempotent write.
    pub fn step(&mut self) -> CycleRecord {
        let temp_c = self.read_temperature();
        let pressure_raw = self.read_pressure_raw();
        let presence = self.read_presence();
        let distance = self.read_distance();

        self.heater.update(temp_c);
        self.drive_heater_relay();

        let retracted = match self.retraction.as_mut() {
            Some(t) => t.update(&distance),
            None => false,
        };

        let inputs = GateInputs {
            heater: self.heater.state(),
            presence,
            retracted,
            trigger: self.trigger_check.as_ref().map(|check| check()),
        };
        let now_ms = self.clock.ms_since(self.epoch);
        self.valve.update(now_ms, gate::may_actuate(&inputs));
        self.drive_valve_relay();

        CycleRecord::new(
            now_ms,
            temp_c,
            f32::from(pressure_raw) * self.pressure_cal.unit_per_count,
            presence,
            distance,
            self.heater.state(),
            self.valve.state(),
        )
    }

    /// Sleep one cycle period. The runner calls this after the record has
    /// been handed to the emitter, so telemetry is never a period stale.
    pub fn idle(&self) {
        self.clock
            .sleep(Duration::from_millis(self.cycle_cfg.period_ms));
    }

    pub fn baseline_mm(&self) -> Option<f32> {
        self.retraction.as_ref().map(RetractionTracker::baseline_mm)
    }

    fn read_temperature(&mut self) -> f32 {
        match self.thermo.read_celsius() {
            Ok(t) => {
                self.last_temp_c = t;
                t
            }
            Err(e) => {
                tracing::warn!(
                    error = %map_hw_error(e.as_ref()),
                    last_temp_c = self.last_temp_c,
                    "thermocouple read failed, holding last temperature"
                );
                self.last_temp_c
            }
        }
    }

    fn read_pressure_raw(&mut self) -> u16 {
        match self.pressure_in.read_raw() {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %map_hw_error(e.as_ref()), "pressure read failed");
                0
            }
        }
    }

    /// A failed presence read degrades to the blocking value for that
    /// channel: workpiece absent, hand present.
    fn read_presence(&mut self) -> PresenceReading {
        let workpiece_present = match self.workpiece_in.read_raw() {
            Ok(raw) => presence::decode_channel(raw, &self.presence_cfg.workpiece),
            Err(e) => {
                tracing::warn!(error = %map_hw_error(e.as_ref()), "workpiece presence read failed");
                false
            }
        };
        let hand_present = match self.hand_in.read_raw() {
            Ok(raw) => presence::decode_channel(raw, &self.presence_cfg.hand),
            Err(e) => {
                tracing::warn!(error = %map_hw_error(e.as_ref()), "hand presence read failed");
                true
            }
        };
        PresenceReading {
            workpiece_present,
            hand_present,
        }
    }

    fn read_distance(&mut self) -> DistanceSample {
        let timeout = Duration::from_millis(self.timeouts.echo_ms);
        match self.range.measure(timeout) {
            Ok(mm) => DistanceSample::from_echo(mm),
            Err(e) => {
                tracing::warn!(error = %map_hw_error(e.as_ref()), "distance measurement failed");
                DistanceSample::invalid()
            }
        }
    }

    fn drive_heater_relay(&mut self) {
        if let Err(e) = self.heater_relay.set_active(self.heater.is_heating()) {
            tracing::warn!(error = %map_hw_error(e.as_ref()), "heater relay write failed");
        }
    }

    // Writes the level from state every cycle, not transition edges, so a
    // lost write lasts at most one cycle.
    fn drive_valve_relay(&mut self) {
        if let Err(e) = self.valve_relay.set_active(self.valve.is_open()) {
            tracing::warn!(error = %map_hw_error(e.as_ref()), "valve relay write failed");
        }
    }
}

/// Assembles a `PressCore` from device handles and runtime configuration.
/// Every device slot is mandatory; `try_build` reports the first missing one.
#[derive(Default)]
pub struct PressBuilder {
    range: Option<DynRange>,
    thermo: Option<DynThermo>,
    workpiece_in: Option<DynAnalog>,
    hand_in: Option<DynAnalog>,
    pressure_in: Option<DynAnalog>,
    heater_relay: Option<DynRelay>,
    valve_relay: Option<DynRelay>,
    trigger_check: Option<TriggerCheck>,
    clock: Option<Arc<dyn Clock + Send + Sync>>,
    heater: HeaterCfg,
    valve: ValveCfg,
    retraction: RetractionCfg,
    presence: PresenceCfg,
    cycle: CycleCfg,
    timeouts: Timeouts,
    pressure_cal: PressureCal,
}

impl PressBuilder {
    pub fn range_finder(mut self, r: impl RangeFinder + Send + 'static) -> Self {
        self.range = Some(Box::new(r));
        self
    }

    pub fn thermocouple(mut self, t: impl Thermocouple + Send + 'static) -> Self {
        self.thermo = Some(Box::new(t));
        self
    }

    pub fn workpiece_input(mut self, i: impl AnalogInput + Send + 'static) -> Self {
        self.workpiece_in = Some(Box::new(i));
        self
    }

    pub fn hand_input(mut self, i: impl AnalogInput + Send + 'static) -> Self {
        self.hand_in = Some(Box::new(i));
        self
    }

    pub fn pressure_input(mut self, i: impl AnalogInput + Send + 'static) -> Self {
        self.pressure_in = Some(Box::new(i));
        self
    }

    pub fn heater_relay(mut self, r: impl Relay + Send + 'static) -> Self {
        self.heater_relay = Some(Box::new(r));
        self
    }

    pub fn valve_relay(mut self, r: impl Relay + Send + 'static) -> Self {
        self.valve_relay = Some(Box::new(r));
        self
    }

    /// Optional manual trigger, polled once per cycle as the last gate term.
    pub fn trigger_check(mut self, check: impl Fn() -> bool + Send + 'static) -> Self {
        self.trigger_check = Some(Box::new(check));
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn heater_cfg(mut self, cfg: HeaterCfg) -> Self {
        self.heater = cfg;
        self
    }

    pub fn valve_cfg(mut self, cfg: ValveCfg) -> Self {
        self.valve = cfg;
        self
    }

    pub fn retraction_cfg(mut self, cfg: RetractionCfg) -> Self {
        self.retraction = cfg;
        self
    }

    pub fn presence_cfg(mut self, cfg: PresenceCfg) -> Self {
        self.presence = cfg;
        self
    }

    pub fn cycle_cfg(mut self, cfg: CycleCfg) -> Self {
        self.cycle = cfg;
        self
    }

    pub fn timeouts(mut self, cfg: Timeouts) -> Self {
        self.timeouts = cfg;
        self
    }

    pub fn pressure_cal(mut self, cal: PressureCal) -> Self {
        self.pressure_cal = cal;
        self
    }

    pub fn try_build(self) -> Result<PressCore, BuildError> {
        if !(self.heater.on_below_c < self.heater.off_at_c) {
            return Err(BuildError::InvalidConfig(
                "heater on_below_c must be below off_at_c",
            ));
        }
        if self.valve.open_ms == 0 {
            return Err(BuildError::InvalidConfig("valve open_ms must be positive"));
        }
        if self.retraction.tolerance_mm <= 0.0 {
            return Err(BuildError::InvalidConfig(
                "retraction tolerance must be positive",
            ));
        }
        if self.retraction.baseline_samples == 0 {
            return Err(BuildError::InvalidConfig(
                "at least one baseline sample is required",
            ));
        }

        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(MonotonicClock::new()));
        let epoch = clock.now();
        Ok(PressCore {
            range: self.range.ok_or(BuildError::MissingRangeFinder)?,
            thermo: self.thermo.ok_or(BuildError::MissingThermocouple)?,
            workpiece_in: self.workpiece_in.ok_or(BuildError::MissingWorkpieceInput)?,
            hand_in: self.hand_in.ok_or(BuildError::MissingHandInput)?,
            pressure_in: self.pressure_in.ok_or(BuildError::MissingPressureInput)?,
            heater_relay: self.heater_relay.ok_or(BuildError::MissingHeaterRelay)?,
            valve_relay: self.valve_relay.ok_or(BuildError::MissingValveRelay)?,
            trigger_check: self.trigger_check,
            clock,
            heater: HeaterController::new(self.heater),
            valve: ValveController::new(self.valve),
            retraction: None,
            retraction_cfg: self.retraction,
            presence_cfg: self.presence,
            cycle_cfg: self.cycle,
            timeouts: self.timeouts,
            pressure_cal: self.pressure_cal,
            epoch,
            last_temp_c: 0.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{ScriptedAnalog, ScriptedRange, ScriptedThermo, SpyRelay};

    fn full_builder() -> PressBuilder {
        PressCore::builder()
            .range_finder(ScriptedRange::steady(100.0))
            .thermocouple(ScriptedThermo::steady(190.0))
            .workpiece_input(ScriptedAnalog::steady(0))
            .hand_input(ScriptedAnalog::steady(1023))
            .pressure_input(ScriptedAnalog::steady(450))
            .heater_relay(SpyRelay::new().0)
            .valve_relay(SpyRelay::new().0)
    }

    #[test]
    fn builder_reports_first_missing_device() {
        let err = PressCore::builder().try_build().expect_err("empty builder");
        assert!(matches!(err, BuildError::MissingRangeFinder));
    }

    #[test]
    fn builder_rejects_inverted_heater_band() {
        let err = full_builder()
            .heater_cfg(HeaterCfg {
                on_below_c: 185.0,
                off_at_c: 180.0,
            })
            .try_build()
            .expect_err("inverted band");
        assert!(matches!(err, BuildError::InvalidConfig(_)));
    }

    #[test]
    fn begin_requires_calibration() {
        let mut core = full_builder().try_build().expect("complete builder");
        let err = core.begin().expect_err("not calibrated");
        assert!(matches!(err, PressError::State(_)));
        core.calibrate().expect("steady sensor");
        core.begin().expect("calibrated");
        assert_eq!(core.baseline_mm(), Some(100.0));
    }
}
