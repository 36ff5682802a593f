// Command line utility for loading spike-sorting output with ephys-io

use anyhow::{Context, Error};
use clap::{value_parser, Arg, Command};
use ephys_io::{get_gain_spikeglx, load_ephys_data};
use log::info;
use ndarray_npy::write_npy;
use std::fs::create_dir_all;
use std::path::PathBuf;

pub fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = Command::new("ephys-cmd")
        .arg(
            Arg::new("RESULTS_DIR")
                .help("spike sorting results directory")
                .required(true)
                .index(1)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("OUT_DIR")
                .help("Output directory")
                .short('o')
                .long("out_dir")
                .default_value(".")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("META")
                .help("SpikeGLX .meta file, or the directory holding it")
                .short('m')
                .long("meta")
                .value_parser(value_parser!(PathBuf)),
        )
        .get_matches();

    let results_dir: &PathBuf = matches.get_one("RESULTS_DIR").unwrap();
    let out_dir: &PathBuf = matches.get_one("OUT_DIR").unwrap();

    let data = load_ephys_data(results_dir)?;
    info!(
        "{} spikes, {} templates, {} channels, PC features {}",
        data.n_spikes(),
        data.n_templates(),
        data.n_channels(),
        if data.pc_features.is_some() { "present" } else { "absent" }
    );

    create_dir_all(out_dir).with_context(|| out_dir.display().to_string())?;
    let out_file = out_dir.join("templates_unwhitened.npy");
    write_npy(&out_file, &data.template_waveforms).with_context(|| out_file.display().to_string())?;
    info!("wrote {}", out_file.display());

    if let Some(meta) = matches.get_one::<PathBuf>("META") {
        let scaling_factor = get_gain_spikeglx(meta)?;
        println!("{scaling_factor}");
    }

    Ok(())
}
