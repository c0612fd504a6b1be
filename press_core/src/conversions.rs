//! Conversions from the TOML-facing `press_config` structs into the core's
//! runtime configuration.

use crate::config::{
    CycleCfg, HeaterCfg, PresenceCfg, PresenceChannelCfg, PressureCal, RetractionCfg, Timeouts,
    ValveCfg,
};

impl From<&press_config::Heater> for HeaterCfg {
    fn from(h: &press_config::Heater) -> Self {
        Self {
            on_below_c: h.on_below_c,
            off_at_c: h.off_at_c,
        }
    }
}

impl From<&press_config::Valve> for ValveCfg {
    fn from(v: &press_config::Valve) -> Self {
        Self {
            open_ms: v.open_ms,
            cooldown_ms: v.cooldown_ms,
        }
    }
}

impl From<&press_config::Retraction> for RetractionCfg {
    fn from(r: &press_config::Retraction) -> Self {
        Self {
            tolerance_mm: r.tolerance_mm,
            baseline_samples: r.baseline_samples,
            baseline_gap_ms: r.baseline_gap_ms,
        }
    }
}

impl From<&press_config::PresenceChannel> for PresenceChannelCfg {
    fn from(c: &press_config::PresenceChannel) -> Self {
        Self {
            active_low: c.active_low,
            threshold: c.threshold,
        }
    }
}

impl From<&press_config::Presence> for PresenceCfg {
    fn from(p: &press_config::Presence) -> Self {
        Self {
            workpiece: (&p.workpiece).into(),
            hand: (&p.hand).into(),
        }
    }
}

impl From<&press_config::Cycle> for CycleCfg {
    fn from(c: &press_config::Cycle) -> Self {
        Self {
            period_ms: c.period_ms,
        }
    }
}

impl From<&press_config::Timeouts> for Timeouts {
    fn from(t: &press_config::Timeouts) -> Self {
        Self {
            echo_ms: t.echo_ms,
        }
    }
}

impl From<&press_config::Pressure> for PressureCal {
    fn from(p: &press_config::Pressure) -> Self {
        Self {
            unit_per_count: p.unit_per_count,
        }
    }
}
