use anyhow::Result;
use power_balance_sim::{config, report, scenario, telemetry};
use config::Config;
use report::RunReport;
use telemetry::init_tracing;
use tracing::{info, warn};

fn main() -> Result<()> {
    init_tracing();

    let cfg = Config::load()?;
    if let Err(reason) = cfg.validate() {
        anyhow::bail!("invalid configuration: {reason}");
    }

    let mut sim = scenario::build_simulation(&cfg)?;
    info!(
        hours = sim.hours_total(),
        years = cfg.simulation.years,
        "starting power balance run"
    );

    let output = sim.run()?;
    output.verify()?;

    let report = RunReport::from_output(&output);
    info!(%report, "run complete");
    if report.shortage_hours > 0 {
        warn!(
            "Scenario has unserved demand: {} shortage hours, peak {:.2} GW",
            report.shortage_hours, report.peak_shortage_gw
        );
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
