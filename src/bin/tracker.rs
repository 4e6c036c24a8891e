//! Command-line policy dashboard
//!
//! Reads a policy book (.json or .csv), prints dashboard totals, the filtered
//! detailed view or the month-by-month due schedule, and applies add, edit
//! and delete changes back to the same file.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use policy_tracker::{
    policy::{load_policies, parse_date, save_policies, validate_new_policy},
    view::{advisors, format_amount},
    yearly_schedule, DetailedView, InMemoryStore, PaymentMode, Policy, PolicyFilter,
    PolicyStatus, PolicyStore, PremiumField, Summary, TrackerConfig,
};
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "tracker", about = "Insurance policy tracker dashboard")]
struct Cli {
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Policy file (.json or .csv), overrides configuration
    #[arg(long)]
    data: Option<PathBuf>,

    /// Reference date (YYYY-MM-DD), defaults to the local date
    #[arg(long, value_parser = parse_cli_date)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Totals over the whole book
    Dashboard,

    /// Filtered policy table with summary cards
    List {
        #[arg(long, value_parser = parse_mode)]
        mode: Option<PaymentMode>,
        #[arg(long)]
        advisor: Option<String>,
        /// Calendar month 1-12
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
        #[arg(long)]
        search: Option<String>,
    },

    /// Amounts falling due in each month of the current year
    Schedule {
        #[arg(long, value_parser = parse_field, default_value = "fyfrp")]
        field: PremiumField,
    },

    /// Validate and add a policy
    Add {
        #[arg(long)]
        application_number: String,
        #[arg(long)]
        policy_number: Option<String>,
        #[arg(long)]
        customer_name: String,
        #[arg(long)]
        advisor_name: String,
        #[arg(long)]
        plan_name: String,
        #[arg(long, value_parser = parse_mode)]
        mode: PaymentMode,
        #[arg(long, default_value_t = 0)]
        fyfrp: i64,
        #[arg(long, default_value_t = 0)]
        wfyfrp: i64,
        #[arg(long, value_parser = parse_status)]
        status: PolicyStatus,
        #[arg(long, value_parser = parse_cli_date)]
        login_date: Option<NaiveDate>,
        #[arg(long, value_parser = parse_cli_date)]
        issued_date: Option<NaiveDate>,
    },

    /// Change fields of an existing policy and re-validate it
    Edit {
        application_number: String,
        #[command(flatten)]
        fields: EditFields,
    },

    /// Delete one policy by application number
    Delete { application_number: String },

    /// Delete every policy
    DeleteAll,
}

/// Fields an edit may change; unset flags keep the stored value
#[derive(Args, Debug, Default)]
struct EditFields {
    #[arg(long)]
    policy_number: Option<String>,
    #[arg(long)]
    customer_name: Option<String>,
    #[arg(long)]
    advisor_name: Option<String>,
    #[arg(long)]
    plan_name: Option<String>,
    #[arg(long, value_parser = parse_mode)]
    mode: Option<PaymentMode>,
    #[arg(long)]
    fyfrp: Option<i64>,
    #[arg(long)]
    wfyfrp: Option<i64>,
    #[arg(long, value_parser = parse_status)]
    status: Option<PolicyStatus>,
    #[arg(long, value_parser = parse_cli_date)]
    login_date: Option<NaiveDate>,
    #[arg(long, value_parser = parse_cli_date)]
    issued_date: Option<NaiveDate>,
}

impl EditFields {
    /// camelCase patch holding only the fields that were given
    fn into_patch(self) -> Map<String, Value> {
        let mut patch = Map::new();
        let mut set = |key: &str, value: Option<Value>| {
            if let Some(value) = value {
                patch.insert(key.to_string(), value);
            }
        };
        set("policyNumber", self.policy_number.map(Value::from));
        set("customerName", self.customer_name.map(Value::from));
        set("advisorName", self.advisor_name.map(Value::from));
        set("planName", self.plan_name.map(Value::from));
        set("mode", self.mode.map(|m| json!(m.as_str())));
        set("fyfrp", self.fyfrp.map(Value::from));
        set("wfyfrp", self.wfyfrp.map(Value::from));
        set("status", self.status.map(|s| json!(s.as_str())));
        set("loginDate", self.login_date.map(|d| json!(d.to_string())));
        set("issuedDate", self.issued_date.map(|d| json!(d.to_string())));
        patch
    }
}

fn parse_cli_date(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).ok_or_else(|| format!("invalid date '{}', expected YYYY-MM-DD", s))
}

fn parse_mode(s: &str) -> Result<PaymentMode, String> {
    s.parse()
}

fn parse_status(s: &str) -> Result<PolicyStatus, String> {
    s.parse()
}

fn parse_field(s: &str) -> Result<PremiumField, String> {
    match s.to_ascii_lowercase().as_str() {
        "fyfrp" => Ok(PremiumField::Fyfrp),
        "wfyfrp" => Ok(PremiumField::Wfyfrp),
        _ => Err(format!("unknown premium field '{}'", s)),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = TrackerConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(path) = cli.data {
        config.data_path = path;
    }
    if let Some(today) = cli.today {
        config.today = Some(today);
    }
    let today = config.clock().today();

    let start = Instant::now();
    let policies = if config.data_path.exists() {
        load_policies(&config.data_path)
            .with_context(|| format!("Failed to load policies from {}", config.data_path.display()))?
    } else {
        log::info!("{} does not exist, starting with an empty book", config.data_path.display());
        Vec::new()
    };
    log::info!("Loaded {} policies in {:?}", policies.len(), start.elapsed());

    let symbol = config.currency_symbol.as_str();

    match cli.command {
        Command::Dashboard => {
            let summary = Summary::overview(&policies, today);
            println!("Dashboard as of {}", today);
            print_summary(&summary, symbol);
        }

        Command::List { mode, advisor, month, search } => {
            let filter = PolicyFilter { mode, advisor, month, search }.normalized()?;
            let view = DetailedView::build(&policies, &filter, today);
            println!("Detailed policy data as of {}", today);
            print_summary(&view.summary, symbol);
            println!();
            print_table(&view.policies);
            let names = advisors(&policies);
            if !names.is_empty() {
                println!("\nAdvisors: {}", names.join(", "));
            }
        }

        Command::Schedule { field } => {
            let schedule = yearly_schedule(&policies, field, today);
            println!("{} due by month, {}", field.label(), today.format("%Y"));
            println!("{:<6} {:>10} {:>16}", "Month", "Policies", "Amount");
            for row in &schedule {
                println!("{:<6} {:>10} {:>16}", month_label(row.month), row.policies_due, format_amount(row.amount, symbol));
            }
            let total = schedule.iter().map(|r| r.amount).fold(0, i64::saturating_add);
            println!("{:<6} {:>10} {:>16}", "Total", "", format_amount(total, symbol));
        }

        Command::Add {
            application_number,
            policy_number,
            customer_name,
            advisor_name,
            plan_name,
            mode,
            fyfrp,
            wfyfrp,
            status,
            login_date,
            issued_date,
        } => {
            let draft = Policy {
                application_number,
                policy_number,
                customer_name,
                advisor_name,
                plan_name,
                mode: Some(mode),
                fyfrp,
                wfyfrp,
                issued_date,
                login_date,
                status: Some(status),
            };
            let policy = validate_new_policy(&draft, today)?;
            let id = policy.application_number.clone();

            let mut store = InMemoryStore::from_policies(policies);
            store.create(policy)?;
            save_policies(&config.data_path, &store.list())
                .with_context(|| format!("Failed to save {}", config.data_path.display()))?;
            println!("Policy {} added", id);
        }

        Command::Edit { application_number, fields } => {
            let patch = fields.into_patch();
            if patch.is_empty() {
                anyhow::bail!("Nothing to edit for policy {}", application_number);
            }
            let mut store = InMemoryStore::from_policies(policies);
            store.edit(&application_number, patch, today)?;
            save_policies(&config.data_path, &store.list())
                .with_context(|| format!("Failed to save {}", config.data_path.display()))?;
            println!("Policy {} updated", application_number);
        }

        Command::Delete { application_number } => {
            let mut store = InMemoryStore::from_policies(policies);
            store.delete(&application_number)?;
            save_policies(&config.data_path, &store.list())
                .with_context(|| format!("Failed to save {}", config.data_path.display()))?;
            println!("Policy {} deleted", application_number);
        }

        Command::DeleteAll => {
            let mut store = InMemoryStore::from_policies(policies);
            let removed = store.delete_all();
            save_policies(&config.data_path, &store.list())
                .with_context(|| format!("Failed to save {}", config.data_path.display()))?;
            println!("Deleted {} policies", removed);
        }
    }

    Ok(())
}

fn print_summary(summary: &Summary, symbol: &str) {
    println!("  Total Policies:  {}", summary.total_policies);
    println!("  Issued Policies: {}", summary.issued_policies);
    for field in PremiumField::ALL {
        let label = format!("Total {}:", field.label());
        println!("  {:<17}{}", label, format_amount(summary.total(field), symbol));
    }
}

fn print_table(policies: &[Policy]) {
    println!(
        "{:<4} {:<14} {:<14} {:<20} {:<16} {:<14} {:<12} {:>10} {:>10} {:<12} {:<9}",
        "#", "Application", "Policy", "Customer", "Advisor", "Plan", "Mode", "FYFRP", "WFYFRP", "Issued", "Status"
    );
    for (i, p) in policies.iter().enumerate() {
        println!(
            "{:<4} {:<14} {:<14} {:<20} {:<16} {:<14} {:<12} {:>10} {:>10} {:<12} {:<9}",
            i + 1,
            p.application_number,
            dash(p.policy_number.as_deref()),
            dash(Some(&p.customer_name)),
            dash(Some(&p.advisor_name)),
            dash(Some(&p.plan_name)),
            p.mode.map(|m| m.as_str()).unwrap_or("-"),
            p.fyfrp,
            p.wfyfrp,
            display_date(p.issued_date),
            p.status.map(|s| s.as_str()).unwrap_or("-"),
        );
    }
}

fn dash(value: Option<&str>) -> &str {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => "-",
    }
}

/// 15-Jan-2024
fn display_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%-d-%b-%Y").to_string()).unwrap_or_else(|| "-".to_string())
}

fn month_label(month: u32) -> &'static str {
    const LABELS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    LABELS.get(month.wrapping_sub(1) as usize).copied().unwrap_or("?")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_patch_only_given_fields() {
        let fields = EditFields {
            mode: Some(PaymentMode::HalfYearly),
            fyfrp: Some(2500),
            issued_date: NaiveDate::from_ymd_opt(2024, 2, 1),
            ..Default::default()
        };
        let patch = fields.into_patch();
        assert_eq!(patch.len(), 3);
        assert_eq!(patch["mode"], "Half-Yearly");
        assert_eq!(patch["fyfrp"], 2500);
        assert_eq!(patch["issuedDate"], "2024-02-01");
        assert!(EditFields::default().into_patch().is_empty());
    }

    #[test]
    fn test_edit_command_parses() {
        let cli = Cli::try_parse_from([
            "tracker", "--today", "2024-04-20", "edit", "A1", "--status", "issued", "--issued-date", "2024-04-01",
        ])
        .unwrap();
        match cli.command {
            Command::Edit { application_number, fields } => {
                assert_eq!(application_number, "A1");
                assert_eq!(fields.status, Some(PolicyStatus::Issued));
                assert_eq!(fields.issued_date, NaiveDate::from_ymd_opt(2024, 4, 1));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
