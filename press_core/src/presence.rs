//! Presence decoding: threshold + polarity over raw 10-bit readings.

use crate::config::{PresenceCfg, PresenceChannelCfg};
use crate::sample::PresenceReading;
use crate::util::clamp_adc;

/// Decode one channel. Out-of-range raw values are clamped to the 10-bit
/// scale and flagged at warn level before thresholding.
pub fn decode_channel(raw: u16, cfg: &PresenceChannelCfg) -> bool {
    let (raw, clamped) = clamp_adc(raw);
    if clamped {
        tracing::warn!(raw, "presence reading above ADC range, clamped");
    }
    if cfg.active_low {
        raw <= cfg.threshold
    } else {
        raw >= cfg.threshold
    }
}

/// Decode both channels into the cycle's presence reading.
pub fn decode(workpiece_raw: u16, hand_raw: u16, cfg: &PresenceCfg) -> PresenceReading {
    PresenceReading {
        workpiece_present: decode_channel(workpiece_raw, &cfg.workpiece),
        hand_present: decode_channel(hand_raw, &cfg.hand),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(true, 900, 0, true)]
    #[case(true, 900, 900, true)]
    #[case(true, 900, 901, false)]
    #[case(false, 512, 1023, true)]
    #[case(false, 512, 512, true)]
    #[case(false, 512, 511, false)]
    fn polarity_and_threshold(
        #[case] active_low: bool,
        #[case] threshold: u16,
        #[case] raw: u16,
        #[case] expect: bool,
    ) {
        let cfg = PresenceChannelCfg {
            active_low,
            threshold,
        };
        assert_eq!(decode_channel(raw, &cfg), expect);
    }

    #[test]
    fn saturated_reading_is_clamped_not_fatal() {
        let cfg = PresenceChannelCfg {
            active_low: false,
            threshold: 1000,
        };
        // 4095 clamps to 1023, which is above the threshold.
        assert!(decode_channel(4095, &cfg));
    }

    #[test]
    fn digital_rail_values_work_as_levels() {
        // A digital detector adapted as 0/1023 decodes cleanly with a
        // mid-scale threshold in either polarity.
        let cfg = PresenceCfg::default();
        let low_low = decode(0, 0, &cfg);
        assert!(low_low.workpiece_present);
        assert!(low_low.hand_present);
        let high_high = decode(1023, 1023, &cfg);
        assert!(!high_high.workpiece_present);
        assert!(!high_high.hand_present);
    }
}
