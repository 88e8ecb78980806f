//! Sensor radiometry chart generator
//!
//! Reads the sensor QE, filter transmittance and floating diffusion tables and
//! writes the responsivity, saturation irradiance, saturation flux, system flux
//! and capacitance charts as PDF.

use clap::Parser;
use log::info;
use radiometry::shared_args::SharedAnalysisArgs;
use radiometry::Analysis;

#[derive(Parser, Debug)]
#[command(
    name = "Sensor Radiometry",
    about = "Generates radiometric characterization charts for an image sensor",
    long_about = None
)]
struct Args {
    #[command(flatten)]
    shared: SharedAnalysisArgs,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let config = args.shared.to_config()?;
    info!(
        "Sensor {} ({}x{} px, {} um), Vsat = {} V",
        config.sensor.name,
        config.sensor.width_px,
        config.sensor.height_px,
        config.sensor.pixel_size_um,
        config.sensor.saturation_voltage
    );
    info!("Reading tables from {}", config.data_dir.display());

    Analysis::new(config).run_all()?;
    Ok(())
}
