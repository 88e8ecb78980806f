//! Prints the numbers behind the radiometry charts

use clap::Parser;
use radiometry::photometry::exposure::MILLI;
use radiometry::shared_args::{DurationArg, SharedAnalysisArgs};
use radiometry::Analysis;

#[derive(Parser, Debug)]
#[command(
    name = "Radiometric Table",
    about = "Prints responsivity, saturation irradiance and flux per wavelength",
    long_about = None
)]
struct Args {
    #[command(flatten)]
    shared: SharedAnalysisArgs,

    /// Also print the photometric (lux) columns when the CIE table is present
    #[arg(long)]
    photometric: bool,

    /// Minimum lithographic feature size in μm; prints the interpolated
    /// floating diffusion capacitance and conversion gain
    #[arg(long)]
    feature_size: Option<f64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let config = args.shared.to_config()?;
    let analysis = Analysis::new(config);
    let report = analysis.report()?;
    let sweep = &report.sweep;

    println!("Radiometric Saturation Table");
    println!("============================");
    println!();

    println!("{:>8} {:>14}", "λ (nm)", "R (V·m²/J)");
    for (wavelength, responsivity) in report.responsivity.iter() {
        println!("{:>8.1} {:>14.3}", wavelength, responsivity);
    }
    println!();

    for (row, exposure) in sweep.exposures.iter().enumerate() {
        println!("Exposure {}", DurationArg(*exposure));
        println!(
            "{:>8} {:>16} {:>16} {:>16}",
            "λ (nm)", "E (mW/m²/nm)", "Φ (mW/nm)", "Φ_src (mW/nm)"
        );
        for col in 0..sweep.wavelength.ncols() {
            println!(
                "{:>8.1} {:>16.6e} {:>16.6e} {:>16.6e}",
                sweep.wavelength[[row, col]],
                sweep.irradiance[[row, col]] * MILLI,
                sweep.flux[[row, col]] * MILLI,
                report.corrected.flux[[row, col]],
            );
        }
        println!(
            "Band power: {:.6e} mW",
            report.integrated_power_w[row] * MILLI
        );
        println!();
    }

    if args.photometric {
        match &report.illuminance {
            Some(curves) => {
                println!("{:>8} {}", "λ (nm)", "E_v (lx/nm) per exposure");
                for col in 0..sweep.wavelength.ncols() {
                    let row_values: Vec<String> = curves
                        .iter()
                        .map(|curve| format!("{:>14.6e}", curve.values()[col]))
                        .collect();
                    println!("{:>8.1} {}", sweep.wavelength[[0, col]], row_values.join(" "));
                }
            }
            None => println!("Photopic table not found, no photometric columns"),
        }
    }

    if let Some(feature_size_um) = args.feature_size {
        let point = analysis.floating_diffusion_at(feature_size_um)?;
        println!();
        println!("Floating diffusion at {} μm", point.feature_size_um);
        println!("  C_fd: {:.3} fF", point.capacitance_ff);
        println!("  Conversion gain: {:.3} μV/e⁻", point.conversion_gain_uv_per_e);
    }

    Ok(())
}
