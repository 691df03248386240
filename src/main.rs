//! Retrofit Risk CLI
//!
//! Command-line interface for running a single Monte Carlo risk assessment

use std::time::Instant;

use anyhow::Context;
use clap::Parser;

use retrofit_risk::simulation::PercentileTable;
use retrofit_risk::{run_simulation, Indicator, ProjectParams, SimulationConfig};

#[derive(Parser, Debug)]
#[command(
    name = "retrofit_risk",
    about = "Monte Carlo risk assessment for energy-retrofit investments"
)]
struct Args {
    /// Capital expenditure (currency)
    #[arg(long)]
    capex: f64,

    /// Expected annual energy savings (kWh)
    #[arg(long)]
    annual_energy_savings: f64,

    /// Annual maintenance cost in today's currency
    #[arg(long, default_value_t = 0.0)]
    annual_maintenance_cost: f64,

    /// Project lifetime in years (1-30)
    #[arg(long)]
    project_lifetime: u32,

    /// Loan principal (0 for all-equity financing)
    #[arg(long, default_value_t = 0.0)]
    loan_amount: f64,

    /// Loan repayment term in years
    #[arg(long, default_value_t = 0)]
    loan_term: u32,

    /// Fixed annual loan interest rate in percent (overrides sampled rates)
    #[arg(long)]
    loan_rate: Option<f64>,

    /// Number of Monte Carlo trials
    #[arg(long, default_value_t = 10_000)]
    n_sims: usize,

    /// Pseudo-random seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Emit the full result bundle as JSON instead of the text report
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    let params = ProjectParams {
        capex: args.capex,
        annual_energy_savings: args.annual_energy_savings,
        annual_maintenance_cost: args.annual_maintenance_cost,
        project_lifetime: args.project_lifetime,
        loan_amount: args.loan_amount,
        loan_term: args.loan_term,
        loan_rate: args.loan_rate,
    };
    let config = SimulationConfig {
        n_sims: args.n_sims,
        seed: args.seed,
    };

    let start = Instant::now();
    let result = run_simulation(&params, &config).context("assessment rejected")?;
    let elapsed = start.elapsed();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("Retrofit Risk v{}", env!("CARGO_PKG_VERSION"));
    println!("==================\n");

    println!("Project:");
    println!("  CAPEX:               {:>12.2}", params.capex);
    println!("  Energy savings:      {:>12.2} kWh/year", params.annual_energy_savings);
    println!("  Maintenance:         {:>12.2} /year", params.annual_maintenance_cost);
    println!("  Lifetime:            {:>12} years", result.metadata.project_lifetime);
    if params.loan_amount > 0.0 {
        println!("  Loan:                {:>12.2} over {} years", params.loan_amount, params.loan_term);
        match params.loan_rate {
            Some(rate) => println!("  Loan rate:           {:>11.2}% (fixed)", rate),
            None => println!("  Loan rate:           market-sampled"),
        }
    }
    println!(
        "\n{} trials in {:?} (seed {}, effective discount rate {:.2}%)\n",
        result.metadata.n_sims,
        elapsed,
        result.metadata.seed,
        result.metadata.disc_target_used * 100.0
    );

    println!(
        "{:>4} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "", "P10", "P25", "P50", "P75", "P90"
    );
    let percentiles = &result.summary.percentiles;
    print_row("IRR", &percentiles.irr);
    print_row("NPV", &percentiles.npv);
    print_row("PBP", &percentiles.pbp);
    print_row("DPP", &percentiles.dpp);
    print_row("ROI", &percentiles.roi);

    let probabilities = &result.summary.probabilities;
    let lifetime = result.metadata.project_lifetime;
    println!("\nSuccess probabilities:");
    println!("  Pr(NPV > 0)    = {:.4}", probabilities.npv_positive);
    println!("  Pr(PBP < {}y)  = {:.4}", lifetime, probabilities.payback_within_lifetime);
    println!(
        "  Pr(DPP < {}y)  = {:.4}",
        lifetime, probabilities.discounted_payback_within_lifetime
    );

    println!("\nMedian point forecasts:");
    for indicator in Indicator::ALL {
        println!(
            "  {:<4} {:>12.4}",
            indicator,
            result.point_forecast(indicator, retrofit_risk::Statistic::Median)
        );
    }

    Ok(())
}

fn print_row(label: &str, table: &PercentileTable) {
    println!(
        "{:>4} {:>12.4} {:>12.4} {:>12.4} {:>12.4} {:>12.4}",
        label, table.p10, table.p25, table.p50, table.p75, table.p90
    );
}
