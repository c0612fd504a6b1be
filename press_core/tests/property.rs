//! Property tests for the pure transition functions.

use proptest::prelude::*;

use press_core::config::{HeaterCfg, RetractionCfg, ValveCfg};
use press_core::gate::{GateInputs, may_actuate};
use press_core::heater::{HeaterState, next_state};
use press_core::retraction::RetractionTracker;
use press_core::sample::{DistanceSample, PresenceReading};
use press_core::valve::{ValveCommand, ValveState, advance};

fn heater_state() -> impl Strategy<Value = HeaterState> {
    prop_oneof![Just(HeaterState::Heating), Just(HeaterState::Ready)]
}

proptest! {
    #[test]
    fn hysteresis_settles_after_one_application(
        prior in heater_state(),
        temp in -50.0f32..500.0,
    ) {
        let cfg = HeaterCfg::default();
        let once = next_state(prior, temp, &cfg);
        prop_assert_eq!(next_state(once, temp, &cfg), once);
    }

    #[test]
    fn hysteresis_is_decisive_outside_the_band(
        prior in heater_state(),
        temp in -50.0f32..500.0,
    ) {
        let cfg = HeaterCfg::default();
        let next = next_state(prior, temp, &cfg);
        if temp < cfg.on_below_c {
            prop_assert_eq!(next, HeaterState::Heating);
        } else if temp >= cfg.off_at_c {
            prop_assert_eq!(next, HeaterState::Ready);
        } else {
            prop_assert_eq!(next, prior);
        }
    }

    #[test]
    fn invalid_samples_never_move_the_retraction_flag(
        baseline in 20.0f32..400.0,
        probe in 0.0f32..500.0,
        invalid_runs in 1usize..20,
    ) {
        let cfg = RetractionCfg::default();
        let mut tracker =
            RetractionTracker::from_samples(&[DistanceSample::valid(baseline)], &cfg).unwrap();
        tracker.update(&DistanceSample::valid(probe));
        let flag = tracker.is_retracted();
        for _ in 0..invalid_runs {
            prop_assert_eq!(tracker.update(&DistanceSample::invalid()), flag);
        }
    }

    #[test]
    fn valve_never_energizes_against_a_low_gate(
        state in valve_state(),
        now in 0u64..1_000_000,
    ) {
        let (_, cmd) = advance(state, now, false, &ValveCfg::default());
        prop_assert_ne!(cmd, Some(ValveCommand::Energize));
    }

    #[test]
    fn open_stroke_is_never_cut_short(
        opened_at in 0u64..1_000_000,
        dt in 0u64..=2_000,
        gate in any::<bool>(),
    ) {
        let cfg = ValveCfg::default();
        let state = ValveState::Open { opened_at_ms: opened_at };
        let (next, cmd) = advance(state, opened_at + dt, gate, &cfg);
        prop_assert_eq!(next, state);
        prop_assert_eq!(cmd, None);
    }

    #[test]
    fn hand_presence_dominates_the_gate(
        heater in heater_state(),
        workpiece in any::<bool>(),
        retracted in any::<bool>(),
        trigger in proptest::option::of(any::<bool>()),
    ) {
        let inputs = GateInputs {
            heater,
            presence: PresenceReading {
                workpiece_present: workpiece,
                hand_present: true,
            },
            retracted,
            trigger,
        };
        prop_assert!(!may_actuate(&inputs));
    }
}

fn valve_state() -> impl Strategy<Value = ValveState> {
    prop_oneof![
        Just(ValveState::Closed),
        (0u64..1_000_000).prop_map(|t| ValveState::Open { opened_at_ms: t }),
        (0u64..1_000_000).prop_map(|t| ValveState::Cooldown { closed_at_ms: t }),
    ]
}
