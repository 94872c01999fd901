//! Expense commands - add, list, edit and delete recorded expenses.

use chrono::NaiveDate;
use clap::Args;
use console::style;
use rust_decimal::Decimal;

use tally_core::models::expense::parse_item_list;
use tally_core::store::ExpenseStore;
use tally_core::{Category, Currency, Expense, ExpenseUpdate, NewExpense};

use super::{load_config, open_ledger};

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    /// Store name
    #[arg(short, long)]
    store: String,

    /// Amount paid
    #[arg(short, long)]
    amount: Decimal,

    /// Purchase date (YYYY-MM-DD, default today)
    #[arg(short, long)]
    date: Option<NaiveDate>,

    /// Category (e.g. "Food & Dining", "groceries")
    #[arg(long)]
    category: Option<Category>,

    /// Comma-separated items
    #[arg(short, long)]
    items: Option<String>,

    /// Split the bill between this many people (0 means 2, 1 means no split)
    #[arg(long)]
    split: Option<u32>,

    /// Currency (INR or USD, default from config)
    #[arg(long)]
    currency: Option<Currency>,
}

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: ListFormat,

    /// Show at most this many expenses
    #[arg(short, long)]
    limit: Option<usize>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ListFormat {
    /// Plain text table
    Text,
    /// JSON output
    Json,
    /// CSV output
    Csv,
}

/// Arguments for the edit command.
#[derive(Args)]
pub struct EditArgs {
    /// Expense id
    id: String,

    /// New store name
    #[arg(short, long)]
    store: Option<String>,

    /// New amount
    #[arg(short, long)]
    amount: Option<Decimal>,

    /// New date (YYYY-MM-DD)
    #[arg(short, long)]
    date: Option<NaiveDate>,

    /// New category
    #[arg(long)]
    category: Option<Category>,

    /// New comma-separated items (empty clears them)
    #[arg(short, long)]
    items: Option<String>,

    /// New split count (1 removes the split)
    #[arg(long)]
    split: Option<u32>,
}

/// Arguments for the delete command.
#[derive(Args)]
pub struct DeleteArgs {
    /// Expense id
    id: String,
}

pub fn add(args: AddArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let (mut store, session) = open_ledger(&config)?;

    let date = args
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let currency = args.currency.unwrap_or(config.display.currency);

    let draft = NewExpense {
        store_name: args.store,
        amount: Some(args.amount),
        date,
        category: args.category,
        items: args.items.as_deref().map(parse_item_list).unwrap_or_default(),
        split_with: args.split,
        currency,
    };

    let expense = store.create(&session, draft)?;

    println!(
        "{} Added expense {} ({} at {})",
        style("✓").green(),
        expense.id,
        expense.currency.format(expense.amount),
        expense.store_name
    );
    if let Some(portion) = expense.user_portion {
        println!(
            "  Your share: {} (split {} ways)",
            expense.currency.format(portion),
            expense.split_with.unwrap_or(1)
        );
    }

    Ok(())
}

pub fn list(args: ListArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let (store, session) = open_ledger(&config)?;

    let mut expenses = store.list(&session)?;
    if let Some(limit) = args.limit {
        expenses.truncate(limit);
    }

    let output = match args.format {
        ListFormat::Json => serde_json::to_string_pretty(&expenses)?,
        ListFormat::Csv => format_csv(&expenses)?,
        ListFormat::Text => format_text(&expenses),
    };
    println!("{}", output.trim_end());

    Ok(())
}

pub fn edit(args: EditArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let update = ExpenseUpdate {
        store_name: args.store,
        amount: args.amount,
        date: args.date,
        category: args.category,
        items: args.items.as_deref().map(parse_item_list),
        split_with: args.split,
    };

    if update.is_empty() {
        anyhow::bail!("Nothing to change. Pass at least one field to edit.");
    }

    let config = load_config(config_path)?;
    let (mut store, session) = open_ledger(&config)?;
    let expense = store.update(&session, &args.id, update)?;

    println!(
        "{} Updated expense {} ({} at {})",
        style("✓").green(),
        expense.id,
        expense.currency.format(expense.amount),
        expense.store_name
    );

    Ok(())
}

pub fn delete(args: DeleteArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let (mut store, session) = open_ledger(&config)?;
    store.delete(&session, &args.id)?;

    println!("{} Deleted expense {}", style("✓").green(), args.id);

    Ok(())
}

fn format_text(expenses: &[Expense]) -> String {
    if expenses.is_empty() {
        return "No expenses recorded yet.\n".to_string();
    }

    let mut output = String::new();
    for expense in expenses {
        output.push_str(&format!(
            "{}  {}  {:<24} {:>12}",
            expense.id,
            expense.date,
            expense.store_name,
            expense.currency.format(expense.amount)
        ));
        if let Some(portion) = expense.user_portion.filter(|_| expense.is_split()) {
            output.push_str(&format!(
                "  (your share {} of {})",
                expense.currency.format(portion),
                expense.split_with.unwrap_or(1)
            ));
        }
        output.push_str(&format!("  [{}]\n", expense.category_or_other()));
        if !expense.items.is_empty() {
            output.push_str(&format!("    {}\n", expense.items.join(", ")));
        }
    }
    output
}

fn format_csv(expenses: &[Expense]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "id",
        "date",
        "store_name",
        "amount",
        "currency",
        "category",
        "items",
        "split_with",
        "user_portion",
    ])?;

    for expense in expenses {
        let date = expense.date.to_string();
        let amount = expense.amount.to_string();
        let items = expense.items.join("; ");
        let split_with = expense.split_with.map(|n| n.to_string()).unwrap_or_default();
        let user_portion = expense
            .user_portion
            .map(|p| p.to_string())
            .unwrap_or_default();

        wtr.write_record([
            expense.id.as_str(),
            date.as_str(),
            expense.store_name.as_str(),
            amount.as_str(),
            expense.currency.code(),
            expense.category.map(|c| c.label()).unwrap_or_default(),
            items.as_str(),
            split_with.as_str(),
            user_portion.as_str(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::Utc;

    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Expense {
        NewExpense::new(
            "Swiggy",
            Decimal::from_str("450").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 14).unwrap(),
        )
        .with_category(Category::FoodAndDining)
        .with_items(vec!["Biryani".to_string(), "Raita".to_string()])
        .with_split(2)
        .with_currency(Currency::Inr)
        .into_expense("e1".to_string(), "u1".to_string(), Utc::now())
        .unwrap()
    }

    #[test]
    fn test_csv_output() {
        let csv = format_csv(&[sample()]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "id,date,store_name,amount,currency,category,items,split_with,user_portion"
        );
        assert_eq!(
            lines[1],
            "e1,2024-01-14,Swiggy,450,INR,Food & Dining,Biryani; Raita,2,225"
        );
    }

    #[test]
    fn test_text_output() {
        let text = format_text(&[sample()]);
        assert!(text.contains("Swiggy"));
        assert!(text.contains("₹450.00"));
        assert!(text.contains("your share ₹225.00 of 2"));
        assert!(text.contains("[Food & Dining]"));
        assert!(text.contains("Biryani, Raita"));

        assert_eq!(format_text(&[]), "No expenses recorded yet.\n");
    }
}
