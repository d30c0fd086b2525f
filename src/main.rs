use std::env;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use totp_console::AccountSource;
use totp_console::clock::{Clock, SystemClock};
use totp_console::config::Config;
use totp_console::qrcode::read_account_from_file;
use totp_console::refresh::{RefreshTask, Snapshot};
use totp_console::{Account, TotpGenerator, otpauth};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = env::args().collect::<Vec<_>>();

    if args.len() < 2 {
        print_usage();
        return Ok(());
    }

    let generator = TotpGenerator::new();
    let clock = SystemClock;

    match args[1].as_str() {
        "code" => {
            if args.len() < 3 {
                eprintln!("❌ Usage: totp-console code <secret> [unix_ms]");
                return Ok(());
            }

            let now_ms = match args.get(3) {
                Some(ms) => ms.parse::<u64>()?,
                None => clock.now_ms(),
            };

            match generator.generate(&args[2], now_ms) {
                Ok(code) => println!("{}", code),
                Err(e) => eprintln!("❌ {}: {}", e, e.cause()),
            }
        }
        "preview" => {
            let account = match args.get(2).map(String::as_str) {
                Some("--image") => match args.get(3) {
                    Some(path) => read_account_from_file(path)?,
                    None => {
                        eprintln!("❌ Usage: totp-console preview --image <image_path>");
                        return Ok(());
                    }
                },
                Some(input) if input.starts_with("otpauth://") => otpauth::parse(input)?,
                Some(secret) => Account::new("preview", secret),
                None => {
                    eprintln!("❌ Usage: totp-console preview <secret|otpauth_uri|--image path>");
                    return Ok(());
                }
            };

            let now_ms = clock.now_ms();
            match generator.generate(&account.secret, now_ms) {
                Ok(code) => {
                    println!("🔍 {}", account.label());
                    println!("   Code: {} | Expires in: {}s", code, generator.time_remaining(now_ms));
                    println!("   Nothing was saved.");
                }
                Err(e) => eprintln!("❌ Invalid secret for {}: {}", account.label(), e.cause()),
            }
        }
        "list" => {
            let entries = Config::load()?.accounts();

            if entries.is_empty() {
                println!("📭 No TOTP accounts configured");
                return Ok(());
            }

            println!("📋 TOTP Accounts:");
            println!("================");

            for entry in entries {
                println!("🔑 {}", entry.name);
                if let Some(issuer) = entry.issuer {
                    println!("   Issuer: {}", issuer);
                }
                println!();
            }
        }
        "get" => {
            if args.len() < 3 {
                eprintln!("❌ Usage: totp-console get <name>");
                return Ok(());
            }

            let name = &args[2];
            match Config::load()?.find(name) {
                Some(entry) => {
                    let now_ms = clock.now_ms();
                    match generator.generate(&entry.secret, now_ms) {
                        Ok(code) => println!(
                            "🔑 {} | Code: {} | Expires in: {}s",
                            entry.label(),
                            code,
                            generator.time_remaining(now_ms)
                        ),
                        Err(e) => eprintln!("❌ {}: {}: {}", entry.name, e, e.cause()),
                    }
                }
                None => {
                    eprintln!("❌ Account not found: {}", name);
                }
            }
        }
        "loop" => {
            let config = Config::load()?;
            let entries = match args.get(2) {
                Some(name) => match config.find(name) {
                    Some(entry) => vec![entry],
                    None => {
                        eprintln!("❌ Account not found: {}", name);
                        return Ok(());
                    }
                },
                None => config.accounts(),
            };

            if entries.is_empty() {
                println!("📭 No TOTP accounts configured");
                return Ok(());
            }

            let interval = Duration::from_millis(config.refresh_interval_ms.max(100));
            let task = RefreshTask::spawn(entries, generator, clock, interval);
            let mut snapshots = task.subscribe();
            let mut last: Option<Snapshot> = None;

            loop {
                let snapshot = snapshots.borrow_and_update().clone();
                render(&snapshot, last.as_ref());
                last = Some(snapshot);

                tokio::select! {
                    changed = snapshots.changed() => changed?,
                    _ = tokio::signal::ctrl_c() => break,
                }
            }

            task.cancel();
            println!("\n👋 Stopped live mode");
        }
        _ => {
            eprintln!("❌ Unknown command: {}", args[1]);
            print_usage();
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn render(snapshot: &Snapshot, last: Option<&Snapshot>) {
    // Clear screen
    print!("\x1B[2J\x1B[1;1H");

    let now = chrono::DateTime::from_timestamp_millis(snapshot.now_ms as i64)
        .unwrap_or_default()
        .with_timezone(&chrono::Local);
    println!("🔄 Live TOTP Codes - {}", now.format("%H:%M:%S"));
    println!("==========================================");

    let remaining = snapshot.remaining_secs;
    let remaining_string = if env::var("NO_COLOR").is_ok() || remaining > 5 {
        format!("{}s", remaining)
    } else {
        format!("\x1b[31m{}s\x1b[0m", remaining) // Red color for low time
    };

    for (i, entry) in snapshot.entries.iter().enumerate() {
        let previous = last.and_then(|l| l.entries.get(i)).map(|e| &e.code);
        let status = if previous != Some(&entry.code) { "🆕" } else { "  " };

        match &entry.code {
            Ok(code) => println!("{} 🔑 {:30} | {} | {}", status, entry.label, code, remaining_string),
            Err(e) => println!("❌ 🔑 {:30} | {}", entry.label, e),
        }
    }

    println!("\nPress Ctrl+C to exit live mode");
}

fn print_usage() {
    println!("🔐 TOTP Console");
    println!("Usage: totp-console <command> [args]");
    println!();
    println!("Commands:");
    println!("  code <secret> [unix_ms]          Print the code for a base32 secret");
    println!("  preview <secret|otpauth_uri>     Check a secret before saving it");
    println!("  preview --image <image_path>     Check a secret from a QR code image");
    println!("  list                             List configured accounts");
    println!("  get <name>                       Get TOTP code for specific account");
    println!("  loop [name]                      Continuous refresh mode");
    println!();
    println!("Configuration:");
    println!("  Accounts are read from `totp.json` (or the file named by TOTP_CONFIG):");
    println!("  {{");
    println!("    \"accounts\": [");
    println!("      {{ \"name\": \"github\", \"issuer\": \"GitHub\", \"secret\": \"JBSWY3DPEHPK3PXP\" }}");
    println!("    ],");
    println!("    \"refresh_interval_ms\": 1000");
    println!("  }}");
    println!();
    println!("Environment Variables:");
    println!("  TOTP_CONFIG                      Path to the accounts file");
    println!("  TOTP_SECRET                      Single account secret (no file present)");
    println!("  TOTP_NAME / TOTP_ISSUER          Name and issuer for TOTP_SECRET");
    println!("  NO_COLOR                         Disable the low-time highlight");
    println!("  RUST_LOG                         Log filter (default: warn)");
    println!();
    println!("Examples:");
    println!("  totp-console code GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ 59000");
    println!("  totp-console preview 'otpauth://totp/GitHub:me?secret=JBSWY3DPEHPK3PXP'");
    println!("  totp-console get github");
    println!("  totp-console loop");
}
