//! dash-runner: headless runner for the telecom billing reconciliation dashboard.
//!
//! Usage:
//!   dash-runner --seed 42 --carrier "Carrier 3" --month 2024-05
//!   dash-runner --config data/dashboard_config.json --upload invoices.csv
//!   dash-runner --ipc-mode

use anyhow::Result;
use std::env;
use std::io::{self, BufRead, Write};
use std::path::Path;
use telecom_recon_core::{
    config::DashboardConfig,
    engine::{DashEngine, DashboardView},
    filter::{Choice, Selection},
    upload::UploadPanel,
};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    Options,
    Render {
        #[serde(default)]
        carrier: Option<String>,
        #[serde(default)]
        month: Option<String>,
    },
    Upload {
        path: String,
    },
    ClearUpload,
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");

    let mut config = match string_arg(&args, "--config") {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    config.seed = parse_arg(&args, "--seed", config.seed);

    let selection = Selection::new(
        Choice::from_option(string_arg(&args, "--carrier")),
        Choice::from_option(string_arg(&args, "--month")),
    );

    let mut engine = DashEngine::build(config)?;
    if let Some(path) = string_arg(&args, "--upload") {
        engine.set_upload(Path::new(path));
    }

    if ipc_mode {
        run_ipc_loop(&mut engine)?;
    } else {
        println!("Telecom Billing Reconciliation Dashboard: dash-runner");
        println!("  seed:      {}", engine.config.seed);
        println!("  carrier:   {}", selection.carrier.label());
        println!("  month:     {}", selection.month.label());
        println!();
        let view = engine.render(&selection)?;
        print_summary(&view);
    }

    Ok(())
}

fn run_ipc_loop(engine: &mut DashEngine) -> Result<()> {
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
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Unparseable command: {}", buffer.trim());
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::Options => {
                let options = engine.filter_options()?;
                writeln!(stdout, "{}", serde_json::to_string(&options)?)?;
            }
            IpcCommand::Render { carrier, month } => {
                let selection = Selection::new(
                    Choice::from_option(carrier.as_deref()),
                    Choice::from_option(month.as_deref()),
                );
                let view = engine.render(&selection)?;
                writeln!(stdout, "{}", serde_json::to_string(&view)?)?;
            }
            IpcCommand::Upload { path } => {
                let panel = engine.set_upload(Path::new(&path));
                writeln!(stdout, "{}", serde_json::to_string(panel)?)?;
            }
            IpcCommand::ClearUpload => {
                engine.clear_upload();
                writeln!(stdout, "{}", serde_json::to_string(engine.upload())?)?;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn print_summary(view: &DashboardView) {
    println!("=== RENDER #{} ({}) ===", view.render_index, view.render_id);
    println!("  rows:      {} of {}", view.filtered_rows, view.total_rows);

    for panel in &view.tabs {
        println!();
        println!("=== {} ===", panel.tab.label().to_uppercase());
        for table in &panel.tables {
            if table.is_empty() {
                println!("  ({}: no rows)", table.title);
            } else {
                print!("{}", table.to_text());
            }
        }
        for chart in &panel.charts {
            println!(
                "  chart: {} [{:?}, {} categories]",
                chart.title,
                chart.kind,
                chart.categories.len()
            );
        }
    }

    println!();
    match &view.upload {
        UploadPanel::None => {}
        UploadPanel::Loaded { table } => println!(
            "=== UPLOAD === {} ({} columns, {} rows)",
            table.file_name,
            table.columns.len(),
            table.rows.len()
        ),
        UploadPanel::Rejected { file_name, message } => {
            println!("=== UPLOAD === {file_name} could not be read: {message}")
        }
    }
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    string_arg(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
