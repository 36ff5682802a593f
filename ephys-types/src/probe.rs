//! Neuropixels probe classification.
//!
//! The probe model reported in the SpikeGLX metadata determines how raw ADC counts map to
//! voltage. Only two hardware families are recognized; anything else has to be handled by the
//! caller supplying its own scaling factor.

/// `imDatPrb_type` / `imProbeOpt` values of NP1.0-like probes
pub static NP1_PROBE_TYPES: &[&str] = &[
    "1", "3", "0", "1020", "1030", "1100", "1120", "1121", "1122", "1123", "1200", "1300", "1110",
];

/// `imDatPrb_type` values of NP2.0-like probes
pub static NP2_PROBE_TYPES: &[&str] = &["21", "2003", "2004", "24", "2013", "2014", "2020"];

/// Digitization constants of a probe family
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProbeGain {
    /// ADC resolution in counts
    pub bit_resolution: u32,
    /// Voltage range in microvolts
    pub voltage_range: f64,
    /// Amplifier gain
    pub gain: u32,
}

impl ProbeGain {
    /// Microvolts per raw ADC count
    pub fn scaling_factor(&self) -> f64 {
        self.voltage_range / (f64::from(self.bit_resolution) * f64::from(self.gain))
    }
}

/// Hardware generation of a recording probe
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProbeFamily {
    /// NP1.0 and NP1.0-like probes (10-bit ADC)
    Neuropixels1,
    /// NP2.0 and NP2.0-like probes (14-bit ADC)
    Neuropixels2,
}

const NP1_GAIN: ProbeGain = ProbeGain {
    bit_resolution: 1 << 10,
    voltage_range: 1.2e6,
    gain: 500,
};

const NP2_GAIN: ProbeGain = ProbeGain {
    bit_resolution: 1 << 14,
    voltage_range: 1e6,
    gain: 80,
};

impl ProbeFamily {
    /// Classify a probe-type string by exact membership. Returns `None` for unknown hardware.
    pub fn classify(probe_type: &str) -> Option<ProbeFamily> {
        if NP1_PROBE_TYPES.contains(&probe_type) {
            Some(ProbeFamily::Neuropixels1)
        } else if NP2_PROBE_TYPES.contains(&probe_type) {
            Some(ProbeFamily::Neuropixels2)
        } else {
            None
        }
    }

    /// Digitization constants for this family
    pub fn gain(self) -> ProbeGain {
        match self {
            ProbeFamily::Neuropixels1 => NP1_GAIN,
            ProbeFamily::Neuropixels2 => NP2_GAIN,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(ProbeFamily::classify("0"), Some(ProbeFamily::Neuropixels1));
        assert_eq!(ProbeFamily::classify("1110"), Some(ProbeFamily::Neuropixels1));
        assert_eq!(ProbeFamily::classify("24"), Some(ProbeFamily::Neuropixels2));
        assert_eq!(ProbeFamily::classify("2020"), Some(ProbeFamily::Neuropixels2));
        assert_eq!(ProbeFamily::classify("9999"), None);
        // membership is exact, no trimming or prefix matching
        assert_eq!(ProbeFamily::classify(" 3"), None);
        assert_eq!(ProbeFamily::classify("240"), None);
    }

    #[test]
    fn test_tables_disjoint() {
        for t in NP1_PROBE_TYPES {
            assert!(!NP2_PROBE_TYPES.contains(t), "{t} in both tables");
        }
        assert_eq!(NP1_PROBE_TYPES.len(), 13);
        assert_eq!(NP2_PROBE_TYPES.len(), 7);
    }

    #[test]
    fn test_scaling_factor() {
        assert_eq!(ProbeFamily::Neuropixels1.gain().scaling_factor(), 1.2e6 / (1024.0 * 500.0));
        assert_eq!(ProbeFamily::Neuropixels2.gain().scaling_factor(), 1e6 / (16384.0 * 80.0));
        assert_eq!(ProbeFamily::Neuropixels1.gain().scaling_factor(), 2.34375);
    }
}
