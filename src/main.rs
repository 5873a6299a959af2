use anyhow::{Context, Result};
use bounce_common::{OutputFormat, SimulationConfig, Snapshot};
use bounce_engine::{DiagnosticsReporter, Particle, Simulation, SnapshotRecorder, TickObserver};
use clap::Parser;
use log::{debug, error, info, trace};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about = "Bouncing-disc rigid-body simulation", long_about = None)]
struct Args {
    /// Scene and parameter file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
}

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();
    let args = Args::parse();

    info!("Starting bounce engine...");

    // --- Load Configuration ---
    let config = SimulationConfig::load(&args.config)?;

    // --- Initialize Simulation ---
    let mut sim = Simulation::new(&config)?;
    info!(
        "Initialized {} particles ({:?} integrator).",
        sim.particles().len(),
        sim.method()
    );
    debug!("Simulation Parameters: {:#?}", sim.params());

    let total_steps = config.total_steps();
    let report_interval = config.report_interval_ticks();
    let mut reporter = DiagnosticsReporter::new(report_interval);
    let mut recorder = SnapshotRecorder::new(config.output.snapshot_interval_ticks);
    info!(
        "Reporting every {} ticks, recording every {} ticks.",
        report_interval, config.output.snapshot_interval_ticks
    );

    if config.output.save_snapshots {
        recorder.record(sim.snapshot());
    }

    // --- Simulation Loop ---
    info!("Starting simulation loop for {} steps (dt = {:.4} s)...", total_steps, sim.params().dt);
    let start_time = Instant::now();
    let mut collisions = 0usize;

    for step in 0..total_steps {
        let step_start_time = Instant::now();
        let report = {
            let mut observers: Vec<&mut dyn TickObserver> = vec![&mut reporter];
            if config.output.save_snapshots {
                observers.push(&mut recorder);
            }
            sim.step_observed(&mut observers)
        };
        let report = match report {
            Ok(report) => report,
            Err(e) => {
                error!("Error during simulation step {}: {}", step + 1, e);
                anyhow::bail!("Simulation step failed.");
            }
        };
        collisions += report.collisions;
        trace!(
            "Step [{}/{}] completed in {:.3} ms",
            step + 1,
            total_steps,
            step_start_time.elapsed().as_secs_f64() * 1000.0
        );
    }

    let total_duration = start_time.elapsed();
    info!(
        "Simulation finished in {:.3} seconds: {} ticks, {} collisions resolved, final energy {:.4}.",
        total_duration.as_secs_f64(),
        sim.current_step(),
        collisions,
        sim.total_energy()
    );

    // --- Save Recorded Data ---
    let base = &config.output.base_filename;
    if config.output.save_snapshots {
        let snapshots = recorder.into_snapshots();
        save_snapshots(&snapshots, base, config.output.format)?;
    } else {
        info!("Skipping saving snapshots as per config (save_snapshots is false).");
    }

    if config.output.save_final_state {
        let filename = format!("{}_final_state.csv", base);
        save_final_state(sim.particles(), &filename)?;
        info!("Final particle state saved to {}", filename);
    } else {
        info!("Skipping saving final state as per config.");
    }

    info!("Simulation Complete.");
    Ok(())
}

fn save_snapshots(snapshots: &[Snapshot], base: &str, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let filename = format!("{}_snapshots.json", base);
            let json_string = serde_json::to_string(snapshots).context("Error serializing snapshots to JSON")?;
            let mut file = File::create(&filename)
                .with_context(|| format!("Error creating snapshot file '{}'", filename))?;
            file.write_all(json_string.as_bytes())
                .with_context(|| format!("Error writing snapshot JSON to file '{}'", filename))?;
            info!("{} snapshots saved to {} ({} KB)", snapshots.len(), filename, json_string.len() / 1024);
        }
        OutputFormat::Bincode => {
            // Binary format (much more compact)
            let filename = format!("{}_snapshots.bin", base);
            let mut file = BufWriter::new(
                File::create(&filename)
                    .with_context(|| format!("Error creating snapshot file '{}'", filename))?,
            );
            bincode::serialize_into(&mut file, snapshots)
                .context("Error serializing snapshots to bincode")?;
            file.flush()
                .with_context(|| format!("Error flushing snapshot file '{}'", filename))?;
            info!("{} snapshots saved to {} (binary format)", snapshots.len(), filename);
        }
        OutputFormat::MessagePack => {
            let filename = format!("{}_snapshots.msgpack", base);
            let mut file = BufWriter::new(
                File::create(&filename)
                    .with_context(|| format!("Error creating snapshot file '{}'", filename))?,
            );
            rmp_serde::encode::write(&mut file, snapshots)
                .context("Error serializing snapshots to MessagePack")?;
            file.flush()
                .with_context(|| format!("Error flushing snapshot file '{}'", filename))?;
            info!("{} snapshots saved to {} (MessagePack format)", snapshots.len(), filename);
        }
    }
    Ok(())
}

fn save_final_state(particles: &[Particle], filename: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(filename)
        .with_context(|| format!("Error creating CSV file '{}'", filename))?;
    writer.write_record([
        "name", "x", "y", "vx", "vy", "kinetic_energy", "potential_energy", "total_energy",
    ])?;
    for p in particles {
        let s = p.state();
        writer.write_record(&[
            p.name().to_string(),
            format!("{:.4}", s.position.x),
            format!("{:.4}", s.position.y),
            format!("{:.4}", s.velocity.x),
            format!("{:.4}", s.velocity.y),
            format!("{:.4}", s.kinetic_energy),
            format!("{:.4}", s.potential_energy),
            format!("{:.4}", s.total_energy),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
