//! Spending insights over a user's expenses.
//!
//! All amounts are effective amounts: the user's portion of split bills,
//! the full amount otherwise. Currencies are summed without conversion.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{Datelike, Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::expense::{Category, Currency, Expense};

/// Number of stores reported in [`SpendingInsights::top_stores`].
pub const TOP_STORES: usize = 3;

const TREND_WINDOW_DAYS: u64 = 7;

/// Spend attributed to one store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreTotal {
    pub store_name: String,
    pub total: Decimal,
}

/// Spend attributed to one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: Decimal,
}

/// A money-saving hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Suggestion {
    /// One category takes more than 30% of spending.
    ReduceCategory { category: Category, share_percent: Decimal },
    /// One store takes more than 25% of spending.
    FrequentStore { store_name: String },
    /// Average daily spend is above 500.
    DailyBudget { daily_average: Decimal },
    /// Last week's spend rose more than 20% over the week before.
    RisingSpend { trend_percent: Decimal },
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReduceCategory {
                category,
                share_percent,
            } => write!(
                f,
                "Consider reducing spending in {}: it's {:.1}% of your total",
                category, share_percent
            ),
            Self::FrequentStore { store_name } => write!(
                f,
                "You spend a lot at {}; look for alternatives or bulk discounts",
                store_name
            ),
            Self::DailyBudget { daily_average } => write!(
                f,
                "Your daily average is {:.2}; setting a daily budget might help",
                daily_average
            ),
            Self::RisingSpend { trend_percent } => write!(
                f,
                "Your spending increased by {:.1}% this week; try to identify unnecessary expenses",
                trend_percent
            ),
        }
    }
}

/// Aggregates shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpendingInsights {
    pub expense_count: usize,
    pub total_spent: Decimal,
    /// The single currency of every expense, if they agree.
    pub currency: Option<Currency>,
    pub mixed_currency: bool,
    pub daily_average: Decimal,
    pub top_stores: Vec<StoreTotal>,
    pub top_category: Option<CategoryTotal>,
    /// Every category with spend, highest first.
    pub categories: Vec<CategoryTotal>,
    pub last_7_days: Decimal,
    pub previous_7_days: Decimal,
    pub trend_percent: Decimal,
    pub monthly_total: Decimal,
    pub suggestions: Vec<Suggestion>,
}

impl SpendingInsights {
    /// Compute insights as of `today`.
    pub fn compute(expenses: &[Expense], today: NaiveDate) -> Self {
        let total_spent = saturating_sum(expenses.iter().map(Expense::effective_amount));

        let currencies: BTreeSet<Currency> = expenses.iter().map(|e| e.currency).collect();
        let currency = match currencies.len() {
            1 => currencies.first().copied(),
            _ => None,
        };

        let daily_average = match expenses.iter().map(|e| e.date).min() {
            Some(first) => {
                let days = (today - first).num_days().unsigned_abs().max(1);
                total_spent / Decimal::from(days)
            }
            None => Decimal::ZERO,
        };

        let mut stores: BTreeMap<&str, Decimal> = BTreeMap::new();
        let mut categories: BTreeMap<Category, Decimal> = BTreeMap::new();
        for expense in expenses {
            let amount = expense.effective_amount();
            let store = stores.entry(expense.store_name.as_str()).or_default();
            *store = store.saturating_add(amount);
            let category = categories.entry(expense.category_or_other()).or_default();
            *category = category.saturating_add(amount);
        }

        // Maps iterate in key order and the sorts are stable, so ties keep it.
        let mut top_stores: Vec<StoreTotal> = stores
            .into_iter()
            .map(|(store_name, total)| StoreTotal {
                store_name: store_name.to_string(),
                total,
            })
            .collect();
        top_stores.sort_by(|a, b| b.total.cmp(&a.total));
        top_stores.truncate(TOP_STORES);

        let mut categories: Vec<CategoryTotal> = categories
            .into_iter()
            .map(|(category, total)| CategoryTotal { category, total })
            .collect();
        categories.sort_by(|a, b| b.total.cmp(&a.total));
        let top_category = categories.first().cloned();

        let week_ago = days_before(today, TREND_WINDOW_DAYS);
        let two_weeks_ago = days_before(today, 2 * TREND_WINDOW_DAYS);
        let last_7_days = sum_where(expenses, |d| d >= week_ago);
        let previous_7_days = sum_where(expenses, |d| d >= two_weeks_ago && d < week_ago);
        let trend_percent = if previous_7_days > Decimal::ZERO {
            last_7_days
                .saturating_sub(previous_7_days)
                .checked_div(previous_7_days)
                .map(|ratio| ratio.saturating_mul(Decimal::ONE_HUNDRED))
                .unwrap_or(Decimal::MAX)
        } else {
            Decimal::ZERO
        };

        let monthly_total =
            sum_where(expenses, |d| d.year() == today.year() && d.month() == today.month());

        let mut insights = Self {
            expense_count: expenses.len(),
            total_spent,
            currency,
            mixed_currency: currencies.len() > 1,
            daily_average,
            top_stores,
            top_category,
            categories,
            last_7_days,
            previous_7_days,
            trend_percent,
            monthly_total,
            suggestions: Vec::new(),
        };
        insights.suggestions = insights.suggest();
        insights
    }

    pub fn is_empty(&self) -> bool {
        self.expense_count == 0
    }

    fn suggest(&self) -> Vec<Suggestion> {
        let mut suggestions = Vec::new();
        if self.total_spent <= Decimal::ZERO {
            return suggestions;
        }

        if let Some(top) = &self.top_category {
            if top.total > self.total_spent * Decimal::new(3, 1) {
                suggestions.push(Suggestion::ReduceCategory {
                    category: top.category,
                    share_percent: (top.total / self.total_spent * Decimal::ONE_HUNDRED)
                        .round_dp(1),
                });
            }
        }

        if let Some(top) = self.top_stores.first() {
            if top.total > self.total_spent * Decimal::new(25, 2) {
                suggestions.push(Suggestion::FrequentStore {
                    store_name: top.store_name.clone(),
                });
            }
        }

        if self.daily_average > Decimal::from(500) {
            suggestions.push(Suggestion::DailyBudget {
                daily_average: self.daily_average.round_dp(2),
            });
        }

        if self.trend_percent > Decimal::from(20) {
            suggestions.push(Suggestion::RisingSpend {
                trend_percent: self.trend_percent.round_dp(1),
            });
        }

        suggestions
    }
}

fn days_before(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days))
        .unwrap_or(NaiveDate::MIN)
}

fn saturating_sum(amounts: impl Iterator<Item = Decimal>) -> Decimal {
    amounts.fold(Decimal::ZERO, Decimal::saturating_add)
}

fn sum_where(expenses: &[Expense], keep: impl Fn(NaiveDate) -> bool) -> Decimal {
    saturating_sum(
        expenses
            .iter()
            .filter(|e| keep(e.date))
            .map(Expense::effective_amount),
    )
}
