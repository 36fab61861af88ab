//! CLI entry point for nw-incidents: lists one page of NetWitness incidents.
//!
//! Authenticates with username/password, fetches the requested page and
//! prints it. Pagination is left to the user: the footer shows whether a
//! next page exists and which `--page-number` to pass for it.
//!
//! Exit codes:
//! - 0: success
//! - 1: runtime error (auth failure, network error, timeout, bad response)
//! - 2: argument validation error (clap handles this automatically)

mod logging;

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use nw_incidents::client::NwClient;
use nw_incidents::incidents::{Incident, IncidentsResponse, list_incidents};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Base URL of the NetWitness server (e.g. https://nw.example.com).
    #[arg(long, env = "NW_BASE_URL")]
    base_url: String,

    /// Username for the REST API.
    #[arg(long, env = "NW_USERNAME")]
    username: String,

    /// Password for the REST API. Prefer setting via the NW_PASSWORD
    /// environment variable to keep it out of shell history.
    #[arg(long, env = "NW_PASSWORD", hide_env_values = true)]
    password: String,

    /// Only return incidents created since this timestamp
    /// (e.g. 2024-03-01T00:00:00Z). Passed through as-is.
    #[arg(long)]
    since: String,

    /// Upper bound on creation time. Accepted, but the incidents endpoint
    /// call does not currently send it.
    #[arg(long, default_value = "")]
    until: String,

    /// Number of incidents per page.
    #[arg(long, default_value_t = 100)]
    page_size: u32,

    /// Zero-based page to fetch.
    #[arg(long, default_value_t = 0)]
    page_number: u32,

    /// Give up after this many seconds.
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,

    /// Print the decoded page as JSON instead of a summary.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();

    if let Err(e) = logging::init() {
        eprintln!("Warning: could not initialise logging: {e}");
    }

    let client = match NwClient::new(&args.base_url, &args.username, &args.password) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let call = list_incidents(
        &client,
        &args.since,
        &args.until,
        args.page_size,
        args.page_number,
    );
    let page = match tokio::time::timeout(Duration::from_secs(args.timeout_secs), call).await {
        Ok(Ok(page)) => page,
        Ok(Err(e)) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
        Err(_) => {
            eprintln!("Error: timed out after {}s", args.timeout_secs);
            return ExitCode::FAILURE;
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&page) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        print_summary(&page);
    }

    ExitCode::SUCCESS
}

/// One line per incident, then a pagination footer.
fn print_summary(page: &IncidentsResponse) {
    for incident in &page.items {
        println!("{}", summary_line(incident));
    }
    println!("{}", footer_line(page));
}

fn summary_line(incident: &Incident) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}",
        incident.id,
        incident.priority.as_deref().unwrap_or("-"),
        incident.status.as_deref().unwrap_or("-"),
        incident.risk_score,
        incident.assignee.as_deref().unwrap_or("unassigned"),
        incident.title.as_deref().unwrap_or(""),
    )
}

fn footer_line(page: &IncidentsResponse) -> String {
    let mut line = format!(
        "page {} of {} ({} incidents total)",
        page.page_number, page.total_pages, page.total_items
    );
    if let Some(next) = page.next_page() {
        line.push_str(&format!(", next: --page-number {next}"));
    }
    line
}
