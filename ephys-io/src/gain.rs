use crate::meta::{find_meta_file, read_meta};
use crate::EphysError;
use anyhow::{Context, Error};
use ephys_types::ProbeFamily;
use log::{debug, info};
use std::collections::BTreeMap;
use std::path::Path;

/// Probe model key written by current SpikeGLX versions
pub const PROBE_TYPE_KEY: &str = "imDatPrb_type";
/// Probe option key written by SpikeGLX before `imDatPrb_type` existed
pub const LEGACY_PROBE_TYPE_KEY: &str = "imProbeOpt";

/// The probe-type string of a parsed metadata map.
pub fn probe_type(meta: &BTreeMap<String, String>) -> Result<&str, Error> {
    meta.get(PROBE_TYPE_KEY)
        .or_else(|| meta.get(LEGACY_PROBE_TYPE_KEY))
        .map(String::as_str)
        .ok_or_else(|| EphysError::MissingProbeKey.into())
}

/// Classify a probe-type string, failing on hardware outside the known families.
pub fn probe_family(probe_type: &str) -> Result<ProbeFamily, Error> {
    ProbeFamily::classify(probe_type).ok_or_else(|| EphysError::UnknownProbe(probe_type.to_string()).into())
}

/// Microvolts per raw ADC count for the probe described by `meta`
pub fn scaling_factor_from_meta(meta: &BTreeMap<String, String>) -> Result<f64, Error> {
    let probe_type = probe_type(meta)?;
    let family = probe_family(probe_type)?;
    let gain = family.gain();
    debug!("probe type {} -> {:?} {:?}", probe_type, family, gain);
    Ok(gain.scaling_factor())
}

/// Scaling factor (microvolts per ADC count) of the SpikeGLX recording at `meta_path`, which
/// may be the `.meta` file itself or the directory holding it.
pub fn get_gain_spikeglx(meta_path: impl AsRef<Path>) -> Result<f64, Error> {
    let meta_file = find_meta_file(meta_path)?;
    let meta = read_meta(&meta_file)?;
    let scaling_factor = scaling_factor_from_meta(&meta).with_context(|| meta_file.display().to_string())?;
    info!("scaling factor {} uV/count from {}", scaling_factor, meta_file.display());
    Ok(scaling_factor)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn meta_with(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_known_probes() {
        let np1 = scaling_factor_from_meta(&meta_with(&[(PROBE_TYPE_KEY, "3")])).unwrap();
        assert_eq!(np1, 1.2e6 / (1024.0 * 500.0));
        let np2 = scaling_factor_from_meta(&meta_with(&[(PROBE_TYPE_KEY, "24")])).unwrap();
        assert_eq!(np2, 1e6 / (16384.0 * 80.0));
    }

    #[test]
    fn test_unknown_probe() {
        let err = scaling_factor_from_meta(&meta_with(&[(PROBE_TYPE_KEY, "9999")])).unwrap_err();
        match err.downcast_ref::<EphysError>() {
            Some(EphysError::UnknownProbe(t)) => assert_eq!(t, "9999"),
            other => panic!("unexpected error {other:?}"),
        }
        assert!(err.to_string().contains("9999"));
    }

    #[test]
    fn test_probe_key_lookup() {
        // legacy key used only when the primary one is absent
        let meta = meta_with(&[(LEGACY_PROBE_TYPE_KEY, "1")]);
        assert_eq!(probe_type(&meta).unwrap(), "1");
        let meta = meta_with(&[(LEGACY_PROBE_TYPE_KEY, "1"), (PROBE_TYPE_KEY, "2013")]);
        assert_eq!(probe_type(&meta).unwrap(), "2013");
        assert_eq!(scaling_factor_from_meta(&meta).unwrap(), 1e6 / (16384.0 * 80.0));

        let err = scaling_factor_from_meta(&meta_with(&[("imSampRate", "30000")])).unwrap_err();
        assert!(matches!(err.downcast_ref::<EphysError>(), Some(EphysError::MissingProbeKey)));
    }

    #[test]
    fn test_get_gain_spikeglx() {
        let dir = tempdir().unwrap();
        let meta_file = dir.path().join("rec_g0_t0.imec0.ap.meta");
        fs::write(&meta_file, "imSampRate=30000\n~imDatPrb_type=24\n").unwrap();

        assert_eq!(get_gain_spikeglx(dir.path()).unwrap(), 1e6 / (16384.0 * 80.0));
        assert_eq!(get_gain_spikeglx(&meta_file).unwrap(), 1e6 / (16384.0 * 80.0));

        fs::write(&meta_file, "imSampRate=30000\n").unwrap();
        let err = get_gain_spikeglx(&meta_file).unwrap_err();
        assert!(matches!(err.downcast_ref::<EphysError>(), Some(EphysError::MissingProbeKey)));
    }
}
