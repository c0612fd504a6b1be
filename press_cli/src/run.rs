//! Controller assembly (sim or hardware backend) and loop execution.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use eyre::WrapErr;

use press_core::press::{PressBuilder, PressCore};
use press_core::{runner, telemetry::CycleRecord};

/// Map the TOML config onto the builder via the core's From impls.
fn configured_builder(cfg: &press_config::Config) -> PressBuilder {
    PressCore::builder()
        .heater_cfg((&cfg.heater).into())
        .valve_cfg((&cfg.valve).into())
        .retraction_cfg((&cfg.retraction).into())
        .presence_cfg((&cfg.presence).into())
        .cycle_cfg((&cfg.cycle).into())
        .timeouts((&cfg.timeouts).into())
        .pressure_cal((&cfg.pressure).into())
}

/// Simulation backend: a parked arm, a plate warming through the band, a
/// workpiece present and no hand in the gap.
#[cfg(not(feature = "hardware"))]
pub fn build_core(cfg: &press_config::Config) -> eyre::Result<PressCore> {
    use press_hardware::{SimulatedAnalog, SimulatedRange, SimulatedRelay, SimulatedThermo};

    let core = configured_builder(cfg)
        .range_finder(SimulatedRange::new(100.0))
        .thermocouple(SimulatedThermo::new())
        .workpiece_input(SimulatedAnalog::new(0))
        .hand_input(SimulatedAnalog::new(1023))
        .pressure_input(SimulatedAnalog::new(450))
        .heater_relay(SimulatedRelay::new("heater"))
        .valve_relay(SimulatedRelay::new("valve"))
        .try_build()?;
    Ok(core)
}

/// Hardware backend: HC-SR04 + MAX6675 bit-banged over GPIO, presence and
/// pressure through the MCP3008, relays on the shared relay board.
#[cfg(feature = "hardware")]
pub fn build_core(cfg: &press_config::Config) -> eyre::Result<PressCore> {
    use std::sync::Mutex;
    use std::time::Duration;

    use press_hardware::mcp3008::{Mcp3008, Mcp3008Channel};
    use press_hardware::{
        DigitalLevelInput, HardwareRange, HardwareRelay, HardwareThermo, make_trigger_checker,
    };

    let pins = &cfg.pins;
    let range = HardwareRange::new(pins.range_trig, pins.range_echo)
        .wrap_err("open range finder pins")?;
    let thermo = HardwareThermo::new(pins.thermo_so, pins.thermo_cs, pins.thermo_sck)
        .wrap_err("open thermocouple pins")?;
    let workpiece =
        DigitalLevelInput::new(pins.workpiece_ir).wrap_err("open workpiece detector pin")?;
    let adc = Arc::new(Mutex::new(
        Mcp3008::on_spi0(1_350_000).wrap_err("open adc")?,
    ));
    let hand = Mcp3008Channel::new(Arc::clone(&adc), pins.hand_ir_adc);
    let pressure = Mcp3008Channel::new(adc, pins.pressure_adc);
    // Both outputs sit on the same relay board, so they share its polarity.
    let heater_relay =
        HardwareRelay::new(pins.heater_relay, cfg.valve.active_low).wrap_err("open heater relay")?;
    let valve_relay =
        HardwareRelay::new(pins.valve_relay, cfg.valve.active_low).wrap_err("open valve relay")?;

    let mut builder = configured_builder(cfg)
        .range_finder(range)
        .thermocouple(thermo)
        .workpiece_input(workpiece)
        .hand_input(hand)
        .pressure_input(pressure)
        .heater_relay(heater_relay)
        .valve_relay(valve_relay);
    if let Some(pin) = pins.trigger_in {
        let check = make_trigger_checker(
            pin,
            cfg.trigger.active_low,
            Duration::from_millis(cfg.trigger.poll_ms),
        )
        .wrap_err("open trigger pin")?;
        builder = builder.trigger_check(check);
    }
    Ok(builder.try_build()?)
}

fn emit(record: &CycleRecord) {
    // stdout carries telemetry only; logs go to stderr / the log file
    println!("{}", record.to_json_line());
}

/// Calibrate and run until the shutdown flag or the cycle budget is hit.
pub fn execute(
    core: &mut PressCore,
    cycles: Option<u64>,
    shutdown: &Arc<AtomicBool>,
) -> eyre::Result<()> {
    match cycles {
        Some(n) => {
            let n = usize::try_from(n).wrap_err("cycle count out of range")?;
            runner::run_cycles(core, n, emit)?;
        }
        None => runner::run(core, shutdown, emit)?,
    }
    Ok(())
}

/// One calibration pass plus a single cycle, reporting the resulting record.
pub fn self_check(cfg: &press_config::Config) -> eyre::Result<()> {
    let mut core = build_core(cfg)?;
    let records = runner::run_cycles(&mut core, 1, |_| {})?;
    tracing::info!(
        baseline_mm = core.baseline_mm(),
        temperature_c = records[0].temperature_c,
        "self-check passed"
    );
    println!("self-check: ok");
    Ok(())
}
