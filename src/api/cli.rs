use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use super::{
    AllocateResponse, InterestResponse, Settings, SimulateResponse, validate_amount,
    validate_debts,
};
use crate::core::{
    Debt, Strategy, StrategySummary, allocate_extra_payment, compare_strategies,
    credit_utilization, simulate, total_interest_for,
};
use crate::error::PayoffResult;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliStrategy {
    Snowball,
    Avalanche,
}

impl From<CliStrategy> for Strategy {
    fn from(value: CliStrategy) -> Self {
        match value {
            CliStrategy::Snowball => Strategy::Snowball,
            CliStrategy::Avalanche => Strategy::Avalanche,
        }
    }
}

impl From<Strategy> for CliStrategy {
    fn from(value: Strategy) -> Self {
        match value {
            Strategy::Snowball => CliStrategy::Snowball,
            Strategy::Avalanche => CliStrategy::Avalanche,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "payoff",
    about = "Debt payoff simulator: snowball vs avalanche repayment schedules"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the JSON API over HTTP
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    #[command(flatten)]
    Report(ReportCommand),
}

#[derive(Subcommand, Debug)]
pub enum ReportCommand {
    /// Full month-by-month payoff schedule for one strategy
    Simulate {
        #[command(flatten)]
        plan: PlanArgs,
        #[arg(long, help = "Print only months, total interest and payoff date")]
        summary: bool,
    },
    /// Total interest paid under one strategy
    Interest {
        #[command(flatten)]
        plan: PlanArgs,
    },
    /// Snowball and avalanche side by side
    Compare {
        #[command(flatten)]
        input: DebtsArg,
        #[arg(long, default_value_t = Settings::default().extra_payment)]
        extra_payment: f64,
    },
    /// Which debt should receive a one-off extra payment
    Allocate {
        #[command(flatten)]
        input: DebtsArg,
        #[arg(long, value_enum, default_value_t = CliStrategy::from(Settings::default().strategy))]
        strategy: CliStrategy,
        #[arg(long)]
        amount: f64,
    },
    /// Credit card utilization ratios
    Utilization {
        #[command(flatten)]
        input: DebtsArg,
    },
}

#[derive(Args, Debug)]
pub struct DebtsArg {
    #[arg(long, help = "Path to a JSON array of debt records")]
    pub debts: PathBuf,
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub input: DebtsArg,
    #[arg(long, value_enum, default_value_t = CliStrategy::from(Settings::default().strategy))]
    pub strategy: CliStrategy,
    #[arg(
        long,
        default_value_t = Settings::default().extra_payment,
        help = "Extra amount paid every month on top of minimums"
    )]
    pub extra_payment: f64,
}

impl PlanArgs {
    fn settings(&self) -> PayoffResult<Settings> {
        Ok(Settings {
            strategy: self.strategy.into(),
            extra_payment: validate_amount("--extra-payment", self.extra_payment)?,
        })
    }
}

pub fn load_debts(path: &Path) -> PayoffResult<Vec<Debt>> {
    let raw = fs::read_to_string(path)?;
    let debts: Vec<Debt> = serde_json::from_str(&raw)?;
    validate_debts(&debts)?;
    log::debug!("loaded {} debts from {}", debts.len(), path.display());
    Ok(debts)
}

/// Runs a report command and returns its pretty-printed JSON output.
pub fn run_report(command: &ReportCommand) -> PayoffResult<String> {
    match command {
        ReportCommand::Simulate { plan, summary } => {
            let debts = load_debts(&plan.input.debts)?;
            let settings = plan.settings()?;
            let timeline = simulate(&debts, settings.strategy, settings.extra_payment);
            if *summary {
                to_pretty(&StrategySummary::from(&timeline))
            } else {
                to_pretty(&SimulateResponse::new(
                    settings.strategy,
                    settings.extra_payment,
                    timeline,
                ))
            }
        }
        ReportCommand::Interest { plan } => {
            let debts = load_debts(&plan.input.debts)?;
            let settings = plan.settings()?;
            to_pretty(&InterestResponse {
                strategy: settings.strategy,
                extra_payment: settings.extra_payment,
                total_interest: total_interest_for(
                    &debts,
                    settings.strategy,
                    settings.extra_payment,
                ),
            })
        }
        ReportCommand::Compare {
            input,
            extra_payment,
        } => {
            let debts = load_debts(&input.debts)?;
            let extra_payment = validate_amount("--extra-payment", *extra_payment)?;
            to_pretty(&compare_strategies(&debts, extra_payment))
        }
        ReportCommand::Allocate {
            input,
            strategy,
            amount,
        } => {
            let debts = load_debts(&input.debts)?;
            let amount = validate_amount("--amount", *amount)?;
            let strategy = Strategy::from(*strategy);
            to_pretty(&AllocateResponse {
                strategy,
                amount,
                recommendations: allocate_extra_payment(&debts, strategy, amount),
            })
        }
        ReportCommand::Utilization { input } => {
            let debts = load_debts(&input.debts)?;
            to_pretty(&credit_utilization(&debts))
        }
    }
}

fn to_pretty<T: Serialize>(value: &T) -> PayoffResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
