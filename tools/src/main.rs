//! dashboard-runner: headless analytics runner for the CRM dashboard.
//!
//! Usage:
//!   dashboard-runner --snapshot data.json --as-of 2024-06-30
//!   dashboard-runner --snapshot data.json --customer C-1042
//!   dashboard-runner --snapshot data.json --ipc-mode

use anyhow::Result;
use chrono::NaiveDate;
use crm_analytics_core::{
    clock::ReportClock, config::AnalyticsConfig, snapshot::DataSnapshot, AnalyticsEngine,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    Dashboard,
    Customer { customer_id: String },
    Reload { path: String },
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let snapshot_path = string_arg(&args, "--snapshot")
        .ok_or_else(|| anyhow::anyhow!("--snapshot <file.json> is required"))?;

    let config = match string_arg(&args, "--config") {
        Some(path) => AnalyticsConfig::load(path)?,
        None => AnalyticsConfig::default(),
    };
    let clock = match string_arg(&args, "--as-of") {
        Some(raw) => ReportClock::fixed(NaiveDate::parse_from_str(raw, "%Y-%m-%d")?),
        None => ReportClock::today(),
    };

    let engine = AnalyticsEngine::new(config);
    let snapshot = DataSnapshot::from_json_file(snapshot_path)?;
    log::info!(
        "loaded {}: customers={} sales={} remarks={}",
        snapshot_path,
        snapshot.customers.len(),
        snapshot.sales.len(),
        snapshot.remarks.len(),
    );

    if ipc_mode {
        return run_ipc_loop(&engine, snapshot, &clock);
    }

    let out = match string_arg(&args, "--customer") {
        Some(id) => serde_json::to_string_pretty(&engine.customer_insight(&snapshot, id)?)?,
        None => serde_json::to_string_pretty(&engine.dashboard(&snapshot, &clock)?)?,
    };
    println!("{out}");
    Ok(())
}

fn run_ipc_loop(engine: &AnalyticsEngine, mut snapshot: DataSnapshot, clock: &ReportClock) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                reply_error(&mut stdout, &e)?;
                continue;
            }
        };

        let reply = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::Dashboard => engine
                .dashboard(&snapshot, clock)
                .map_err(anyhow::Error::from)
                .and_then(|r| Ok(serde_json::to_string(&r)?)),
            IpcCommand::Customer { customer_id } => engine
                .customer_insight(&snapshot, &customer_id)
                .map_err(anyhow::Error::from)
                .and_then(|r| Ok(serde_json::to_string(&r)?)),
            IpcCommand::Reload { path } => DataSnapshot::from_json_file(&path)
                .map_err(anyhow::Error::from)
                .map(|fresh| {
                    let count = fresh.customers.len();
                    snapshot = fresh;
                    serde_json::json!({ "reloaded": path, "customers": count }).to_string()
                }),
        };

        match reply {
            Ok(line) => writeln!(stdout, "{line}")?,
            Err(e) => reply_error(&mut stdout, &e)?,
        }
        stdout.flush()?;
    }
    Ok(())
}

fn reply_error(stdout: &mut io::Stdout, e: &dyn std::fmt::Display) -> Result<()> {
    log::warn!("ipc: {e}");
    let err_json = serde_json::json!({ "error": e.to_string() });
    writeln!(stdout, "{}", err_json)?;
    stdout.flush()?;
    Ok(())
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
