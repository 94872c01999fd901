//! Insights command - summarize spending.

use chrono::NaiveDate;
use clap::Args;
use console::style;
use rust_decimal::Decimal;

use tally_core::store::ExpenseStore;
use tally_core::{Currency, SpendingInsights};

use super::{load_config, open_ledger};

/// Arguments for the insights command.
#[derive(Args)]
pub struct InsightsArgs {
    /// Compute as of this date (YYYY-MM-DD, default today)
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Print JSON instead of a summary
    #[arg(long)]
    json: bool,
}

pub fn run(args: InsightsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let (store, session) = open_ledger(&config)?;

    let today = args
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let expenses = store.list(&session)?;
    let insights = SpendingInsights::compute(&expenses, today);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&insights)?);
    } else {
        let currency = insights.currency.unwrap_or(config.display.currency);
        print!("{}", format_summary(&insights, currency));
    }

    Ok(())
}

fn format_summary(insights: &SpendingInsights, currency: Currency) -> String {
    if insights.is_empty() {
        return "No expenses yet. Add some expenses to see spending insights.\n".to_string();
    }

    let money = |amount: Decimal| currency.format(amount);
    let mut output = String::new();

    output.push_str(&format!("Total spent:   {}\n", money(insights.total_spent)));
    output.push_str(&format!("This month:    {}\n", money(insights.monthly_total)));
    output.push_str(&format!("Daily average: {}\n", money(insights.daily_average)));

    let trend = insights.trend_percent.round_dp(1);
    let arrow = if trend > Decimal::ZERO {
        style("▲").red()
    } else if trend < Decimal::ZERO {
        style("▼").green()
    } else {
        style("=").dim()
    };
    output.push_str(&format!(
        "Weekly trend:  {} {}% ({} vs {})\n",
        arrow,
        trend.abs(),
        money(insights.last_7_days),
        money(insights.previous_7_days)
    ));

    if insights.mixed_currency {
        output.push_str(&format!(
            "{} Expenses use more than one currency; totals are not converted.\n",
            style("!").yellow()
        ));
    }

    if !insights.top_stores.is_empty() {
        output.push_str("\nTop stores:\n");
        for (rank, store) in insights.top_stores.iter().enumerate() {
            output.push_str(&format!(
                "  {}. {:<24} {}\n",
                rank + 1,
                store.store_name,
                money(store.total)
            ));
        }
    }

    if let Some(top) = &insights.top_category {
        output.push_str(&format!(
            "\nTop category:  {} ({})\n",
            top.category,
            money(top.total)
        ));
    }

    if !insights.suggestions.is_empty() {
        output.push_str("\nSuggestions:\n");
        for suggestion in &insights.suggestions {
            output.push_str(&format!("  • {}\n", suggestion));
        }
    }

    output
}
