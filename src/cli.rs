//! Command-line argument parsing for the `vpp-revenue` binary.

use std::env;
use std::path::PathBuf;

pub struct CliOptions {
    pub portfolio: PathBuf,
    pub events: Vec<PathBuf>,
    pub vpp: String,
    pub month: String,
    pub csv_out: Option<PathBuf>,
    pub pretty: bool,
}

/// Parses the process arguments.
///
/// # Errors
///
/// Returns a message describing the first invalid or missing argument.
pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(&args)
}

fn parse_args_from(args: &[String]) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut portfolio = None;
    let mut events = Vec::new();
    let mut vpp = None;
    let mut month = None;
    let mut csv_out = None;
    let mut pretty = false;

    while i < args.len() {
        match args[i].as_str() {
            "--portfolio" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --portfolio (expected a TOML file path)",
                )?;
                if portfolio.replace(PathBuf::from(path)).is_some() {
                    return Err("--portfolio provided more than once".to_string());
                }
            }
            "--events" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --events (expected a CSV file path)")?;
                events.push(PathBuf::from(path));
            }
            "--vpp" => {
                i += 1;
                let name = args.next_or_err(i, "missing value for --vpp (expected a VPP name)")?;
                if vpp.replace(name.to_string()).is_some() {
                    return Err("--vpp provided more than once".to_string());
                }
            }
            "--month" => {
                i += 1;
                let value = args.next_or_err(i, "missing value for --month (expected YYYY-MM)")?;
                if month.replace(value.to_string()).is_some() {
                    return Err("--month provided more than once".to_string());
                }
            }
            "--csv-out" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --csv-out (expected a file path)")?;
                if csv_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--csv-out provided more than once".to_string());
                }
            }
            "--pretty" => pretty = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    Ok(CliOptions {
        portfolio: portfolio.ok_or("missing required argument --portfolio")?,
        events,
        vpp: vpp.ok_or("missing required argument --vpp")?,
        month: month.ok_or("missing required argument --month")?,
        csv_out,
        pretty,
    })
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("vpp-revenue: monthly revenue split for a virtual power plant");
    eprintln!();
    eprintln!("Usage:");
    eprintln!(
        "  vpp-revenue --portfolio <toml> [--events <csv>]... --vpp <name> --month <YYYY-MM> \
         [--csv-out <path>] [--pretty]"
    );
    eprintln!();
    eprintln!("Prints the report as JSON on stdout and a summary on stderr.");
    eprintln!("Set RUST_LOG to adjust log verbosity (default: vpp_revenue=info).");
}
