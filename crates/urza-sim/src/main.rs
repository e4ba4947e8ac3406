mod boundary;

use anyhow::{bail, Context, Result};
use boundary::{Boundary, Latency};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use urza_ledger::prelude::*;
use urza_ledger::{DerivedStats, SystemClock, WithdrawalLimits};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionReport {
    user: String,
    total_points: u64,
    stats: DerivedStats,
    referrals: usize,
    transactions: usize,
    errors: Vec<String>,
}

impl SessionReport {
    fn print(&self, json: bool) -> Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(self)?);
            return Ok(());
        }
        println!("Session Report");
        println!("==============");
        println!("User: {}", self.user);
        println!("Points: {}", self.total_points);
        println!(
            "Referrals: {} (pending {}, in process {}, completed {})",
            self.stats.referrals.all,
            self.stats.referrals.pending,
            self.stats.referrals.in_process,
            self.stats.referrals.completed
        );
        println!("Total earned: ₹{}", self.stats.total_earned);
        println!("Total withdrawn: ₹{}", self.stats.total_withdrawn);
        println!("Pending withdrawals: ₹{}", self.stats.pending_withdrawals);
        println!("Transactions: {}", self.transactions);
        for err in &self.errors {
            println!("  ✗ {err}");
        }
        Ok(())
    }
}

fn cli() -> Command {
    Command::new("urza-sim")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Scripted URZA rewards session")
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Ledger configuration (TOML)"),
        )
        .subcommand(
            Command::new("session")
                .about("Sign in, submit referrals, complete them and withdraw")
                .arg(
                    Arg::new("phone")
                        .long("phone")
                        .default_value("9876543210")
                        .help("10-digit phone number to sign in with"),
                )
                .arg(
                    Arg::new("code")
                        .long("code")
                        .default_value("123456")
                        .help("6-digit one-time code"),
                )
                .arg(
                    Arg::new("referrals")
                        .long("referrals")
                        .default_value("1")
                        .value_parser(value_parser!(usize))
                        .help("Referrals to submit concurrently"),
                )
                .arg(
                    Arg::new("complete")
                        .long("complete")
                        .action(ArgAction::SetTrue)
                        .help("Advance submitted referrals to completed"),
                )
                .arg(
                    Arg::new("withdraw")
                        .long("withdraw")
                        .value_parser(value_parser!(u64))
                        .help("Withdrawal amount to request"),
                )
                .arg(
                    Arg::new("upi")
                        .long("upi")
                        .default_value("user@upi")
                        .help("UPI id for the withdrawal"),
                )
                .arg(
                    Arg::new("latency-ms")
                        .long("latency-ms")
                        .value_parser(value_parser!(u64))
                        .help("Override every simulated round-trip delay"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("limits")
                .about("Show withdrawal limits for a balance")
                .arg(
                    Arg::new("balance")
                        .long("balance")
                        .required(true)
                        .value_parser(value_parser!(u64)),
                ),
        )
}

fn load_config(matches: &ArgMatches) -> Result<LedgerConfig> {
    let Some(path) = matches.get_one::<PathBuf>("config") else {
        return Ok(LedgerConfig::default());
    };
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    LedgerConfig::from_toml_str(&source).with_context(|| format!("parsing {}", path.display()))
}

async fn run_session(config: LedgerConfig, args: &ArgMatches) -> Result<SessionReport> {
    let phone = args
        .get_one::<String>("phone")
        .cloned()
        .unwrap_or_default();
    let code = args.get_one::<String>("code").cloned().unwrap_or_default();
    let referral_count = args.get_one::<usize>("referrals").copied().unwrap_or(1);
    let complete = args.get_flag("complete");
    let withdraw = args.get_one::<u64>("withdraw").copied();
    let upi = args.get_one::<String>("upi").cloned().unwrap_or_default();
    let latency = args
        .get_one::<u64>("latency-ms")
        .map_or_else(Latency::default, |ms| {
            Latency::uniform(Duration::from_millis(*ms))
        });

    let boundary = Boundary::new(LedgerStore::new(config, SystemClock), latency);
    let mut gateway = SessionGateway::new(DemoFixtures);
    let mut errors = Vec::new();

    boundary
        .apply(latency.otp, "request_code", |_| gateway.request_code(&phone))
        .await
        .context("requesting code")?;
    boundary
        .apply(latency.otp, "verify_code", |store| {
            gateway.verify_code(&code, store).map(|_| ())
        })
        .await
        .context("signing in")?;

    // Submissions race each other; the store serializes them
    let handles: Vec<_> = (0..referral_count)
        .map(|i| {
            let b = boundary.clone();
            let delay = b.latency().submit;
            tokio::spawn(async move {
                b.apply(delay, "add_referral", move |store| {
                    store.add_referral(ReferralInput::new(
                        format!("Customer {}", i + 1),
                        format!("98{:08}", i + 1),
                        "Bangalore, Karnataka",
                    ))
                })
                .await
            })
        })
        .collect();

    let mut submitted = Vec::with_capacity(referral_count);
    for handle in handles {
        match handle.await? {
            Ok(referral) => submitted.push(referral.id),
            Err(e) => errors.push(format!("add referral: {e}")),
        }
    }

    if complete {
        for id in &submitted {
            for status in [ReferralStatus::InProcess, ReferralStatus::Completed] {
                if let Err(e) = boundary
                    .apply(Duration::ZERO, "advance_status", |store| {
                        store.advance_referral_status(id, status)
                    })
                    .await
                {
                    errors.push(format!("advance {id}: {e}"));
                }
            }
        }
    }

    if let Some(amount) = withdraw {
        if let Err(e) = boundary
            .apply(latency.withdraw, "withdraw", |store| {
                store.request_withdrawal(amount, &upi)
            })
            .await
        {
            errors.push(format!("withdraw {amount}: {e}"));
        }
    }

    let report = boundary.read(|store| -> Result<SessionReport> {
        let Some(user) = store.user() else {
            bail!("session ended unexpectedly");
        };
        Ok(SessionReport {
            user: user.name.clone(),
            total_points: user.total_points,
            stats: store.derived_stats(),
            referrals: store.referrals().len(),
            transactions: store.transactions().len(),
            errors,
        })
    })?;
    Ok(report)
}

fn print_limits(config: &LedgerConfig, balance: u64) {
    let limits = WithdrawalLimits::for_balance(balance, config);
    println!("Balance: {balance}");
    println!("Minimum: ₹{}", limits.minimum);
    println!("Maximum: ₹{}", limits.maximum);
    if limits.can_withdraw() {
        println!("Quick amounts: {:?}", limits.quick_amounts());
    } else {
        println!(
            "Locked: earn {} more points to unlock withdrawals",
            limits.points_to_unlock()
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    let config = load_config(&matches)?;

    match matches.subcommand() {
        Some(("session", args)) => {
            let json = args.get_flag("json");
            let report = run_session(config, args).await?;
            report.print(json)?;
            if !report.errors.is_empty() {
                std::process::exit(1);
            }
        }
        Some(("limits", args)) => {
            let balance = args.get_one::<u64>("balance").copied().unwrap_or_default();
            print_limits(&config, balance);
        }
        _ => {
            cli().print_help()?;
        }
    }
    Ok(())
}
