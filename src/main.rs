// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{anyhow, Result};
use std::env;
use std::path::Path;

// Use library instead of local modules
use credit_request::{
    format, format_cents, init_logging, is_valid_identifier, load_requests, unformat,
    validate_batch, IdentifierKind, MaskKind, Settings,
};

const USAGE: &str = "Usage:
  credit-request                          interactive form
  credit-request mask <kind> <text>       kind: identifier | phone | postal-code
  credit-request unformat <text>
  credit-request check <cpf-or-cnpj>
  credit-request cents <raw-cents>
  credit-request validate <file.json|file.csv>";

fn main() -> Result<()> {
    let settings = Settings::from_env()?;
    init_logging(&settings);

    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        None => run_ui_mode(),
        Some("mask") => {
            let kind: MaskKind = arg(&args, 2)?.parse().map_err(|e: String| anyhow!(e))?;
            println!("{}", format(arg(&args, 3)?, kind));
            Ok(())
        }
        Some("unformat") => {
            println!("{}", unformat(arg(&args, 2)?));
            Ok(())
        }
        Some("check") => run_check(arg(&args, 2)?),
        Some("cents") => {
            println!("{}", format_cents(arg(&args, 2)?));
            Ok(())
        }
        Some("validate") => run_validate(Path::new(arg(&args, 2)?)),
        Some("help") | Some("--help") | Some("-h") => {
            println!("{}", USAGE);
            Ok(())
        }
        Some(other) => Err(anyhow!("Unknown command '{}'\n\n{}", other, USAGE)),
    }
}

fn arg(args: &[String], index: usize) -> Result<&str> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("Missing argument\n\n{}", USAGE))
}

fn run_check(raw: &str) -> Result<()> {
    let shown = format(raw, MaskKind::Identifier);

    match IdentifierKind::detect(raw) {
        Some(kind) if is_valid_identifier(raw) => {
            println!("✓ {} {} is valid", kind.name(), shown);
            Ok(())
        }
        Some(kind) => {
            println!("✗ {} {} has invalid check digits", kind.name(), shown);
            std::process::exit(1);
        }
        None => {
            println!(
                "✗ {} has {} digits (expected 11 for CPF or 14 for CNPJ)",
                shown,
                unformat(raw).len()
            );
            std::process::exit(1);
        }
    }
}

fn run_validate(path: &Path) -> Result<()> {
    println!("📂 Validating credit requests from {:?}", path);

    let requests = load_requests(path)?;
    let report = validate_batch(&requests);

    for row in &report.rows {
        if row.is_valid() {
            println!("✓ #{} {}", row.row, row.full_name);
        } else {
            println!("✗ #{} {}", row.row, row.full_name);
            for error in &row.errors {
                println!("    {}", error);
            }
        }
    }

    println!("\n{}", report.summary());

    if report.invalid_count > 0 {
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode() -> Result<()> {
    let mut app = ui::App::new();
    ui::run_ui(&mut app)?;

    if let Some(submission) = &app.last_submission {
        println!("✅ {}", submission.notice.title);
        println!("   {}", submission.notice.description);
        println!("   Protocolo: {}", submission.id);
    }

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode() -> Result<()> {
    eprintln!("❌ Interactive form not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the API: cargo run --bin credit-server --features server");
    std::process::exit(1);
}
