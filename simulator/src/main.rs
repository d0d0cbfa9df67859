use anyhow::Context;
use clap::Parser;
use reference::compare::compare_delays;
use reference::table::TableReferenceModel;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod reference;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Synthetic depth-phase dataset driver")]
struct Args {
    /// Generate a batch of scenarios and write the JSON dataset
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    #[arg(long, default_value_t = 16)]
    scenarios: usize,
    #[arg(long, default_value_t = 50)]
    stations: usize,
    #[arg(long, default_value_t = 0)]
    dropout: usize,
    /// Fixed source depth in kilometers; omitted draws per scenario
    #[arg(long)]
    depth_km: Option<f64>,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Output path for the JSON dataset
    #[arg(long, default_value = "tools/data/dataset.json")]
    output: PathBuf,
    /// Check the travel-time calculator against the embedded reference table
    #[arg(long, default_value_t = false)]
    compare: bool,
    /// Comparison tolerance in seconds
    #[arg(long, default_value_t = 2.0)]
    tolerance_s: f64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(
            args.scenarios,
            args.stations,
            args.dropout,
            args.depth_km,
            args.seed,
        )
    };

    if args.compare {
        let table = TableReferenceModel::new();
        for (depth_km, distance_deg) in [(50.0, 10.0), (100.0, 15.0), (300.0, 20.0)] {
            let deviation = compare_delays(&table, depth_km, distance_deg)?;
            println!(
                "depth {depth_km} km, distance {distance_deg} deg -> dpP {:+.3} s, dsP {:+.3} s",
                deviation.delta_pp_s, deviation.delta_sp_s
            );
            if !deviation.within(args.tolerance_s) {
                anyhow::bail!(
                    "depth-phase deviation exceeds tolerance {} s at {} km / {} deg",
                    args.tolerance_s,
                    depth_km,
                    distance_deg
                );
            }
        }
    }

    if args.offline {
        let runner = Runner::new(workflow_config);
        let (records, summary) = runner.execute()?;

        println!(
            "Offline run -> scenarios {}, matrix {}x{}, depths {:.1}-{:.1} km",
            summary.scenarios, summary.rows, summary.cols, summary.min_depth_km, summary.max_depth_km
        );

        if let Some(parent) = args.output.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = fs::File::create(&args.output)
            .with_context(|| format!("creating dataset file {}", args.output.display()))?;
        serde_json::to_writer(file, &records).context("serializing dataset")?;

        let metrics = runner.metrics_snapshot();
        log::info!(
            "offline batch: scenarios={} traces={} failures={} -> {}",
            metrics.scenarios,
            metrics.traces,
            metrics.failures,
            args.output.display()
        );
        let report = format!(
            "scenarios={} traces={} failures={} cols={} depth_range={:.1}-{:.1}\n",
            metrics.scenarios,
            metrics.traces,
            metrics.failures,
            summary.cols,
            summary.min_depth_km,
            summary.max_depth_km
        );
        let report_path = PathBuf::from("tools/data/offline_generation.log");
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(report_path)?;
        file.write_all(report.as_bytes())?;
    }

    Ok(())
}
