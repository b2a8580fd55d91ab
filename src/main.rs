//! VPP revenue entry point: load a portfolio, import events, print a report.

mod cli;

use std::process;

use tracing::info;
use tracing_subscriber::EnvFilter;

use vpp_revenue::config::PortfolioConfig;
use vpp_revenue::io::export::export_report_csv;

fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vpp_revenue=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = match cli::parse_args() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(1);
        }
    };

    let portfolio = match PortfolioConfig::from_toml_file(&cli.portfolio) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let errors = portfolio.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let mut ledger = match portfolio.build_ledger() {
        Ok(ledger) => ledger,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };
    info!(
        vpps = ledger.registry().vpps().count(),
        sites = ledger.registry().sites().count(),
        "loaded portfolio"
    );

    for path in &cli.events {
        if let Err(e) = ledger.import_events(path) {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }

    let report = match ledger.create_report(&cli.vpp, &cli.month) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    let json = if cli.pretty {
        report.to_json_pretty()
    } else {
        report.to_json()
    };
    match json {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
    eprintln!("\n{report}");

    if let Some(ref path) = cli.csv_out {
        if let Err(e) = export_report_csv(&report, path) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Report lines written to {}", path.display());
    }
}
