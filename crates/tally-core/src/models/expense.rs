//! Expense records and the payloads used to create and edit them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ExpenseError;
use crate::models::receipt::ParsedReceipt;

/// Currency an expense was paid in.
///
/// Amounts in different currencies are never converted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Indian rupee.
    Inr,
    /// US dollar.
    #[default]
    Usd,
}

impl Currency {
    /// ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Inr => "INR",
            Self::Usd => "USD",
        }
    }

    /// Display symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Inr => "₹",
            Self::Usd => "$",
        }
    }

    /// Format an amount with the currency symbol and two decimals.
    pub fn format(&self, amount: Decimal) -> String {
        format!("{}{:.2}", self.symbol(), amount.round_dp(2))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = ExpenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "INR" | "₹" | "RS" => Ok(Self::Inr),
            "USD" | "$" => Ok(Self::Usd),
            _ => Err(ExpenseError::Parse {
                field: "currency".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Spending category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Food & Dining")]
    FoodAndDining,
    Shopping,
    Transportation,
    #[serde(rename = "Bills & Utilities")]
    BillsAndUtilities,
    Healthcare,
    Entertainment,
    Groceries,
    #[default]
    Other,
}

impl Category {
    /// All categories in menu order.
    pub const ALL: [Category; 8] = [
        Self::FoodAndDining,
        Self::Shopping,
        Self::Transportation,
        Self::BillsAndUtilities,
        Self::Healthcare,
        Self::Entertainment,
        Self::Groceries,
        Self::Other,
    ];

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FoodAndDining => "Food & Dining",
            Self::Shopping => "Shopping",
            Self::Transportation => "Transportation",
            Self::BillsAndUtilities => "Bills & Utilities",
            Self::Healthcare => "Healthcare",
            Self::Entertainment => "Entertainment",
            Self::Groceries => "Groceries",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = ExpenseError;

    /// Accepts the full label or its first word, ignoring case and punctuation
    /// ("food & dining", "Food", "bills").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = alnum_lower(s);
        Self::ALL
            .into_iter()
            .find(|c| {
                let label = c.label();
                alnum_lower(label) == key
                    || label
                        .split_whitespace()
                        .next()
                        .is_some_and(|first| alnum_lower(first) == key)
            })
            .filter(|_| !key.is_empty())
            .ok_or_else(|| ExpenseError::Parse {
                field: "category".to_string(),
                value: s.to_string(),
            })
    }
}

fn alnum_lower(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// A stored expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Opaque identifier assigned by the store.
    pub id: String,

    /// Owner of the record.
    pub user_id: String,

    /// Merchant name.
    pub store_name: String,

    /// Full amount paid.
    pub amount: Decimal,

    /// Purchase date.
    pub date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<String>,

    /// Number of people the bill is shared between.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_with: Option<u32>,

    /// The user's share of a split bill.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_portion: Option<Decimal>,

    pub currency: Currency,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Expense {
    /// Amount counted towards the user's spending.
    pub fn effective_amount(&self) -> Decimal {
        self.user_portion.unwrap_or(self.amount)
    }

    /// Whether the bill is shared with at least one other person.
    pub fn is_split(&self) -> bool {
        self.split_with.is_some_and(|n| n > 1)
    }

    /// Category, counting uncategorised expenses as [`Category::Other`].
    pub fn category_or_other(&self) -> Category {
        self.category.unwrap_or_default()
    }
}

/// Payload for creating an expense.
///
/// `amount` and `store_name` may be blank while the user is still filling
/// the form in; [`NewExpense::validate`] rejects them at submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub store_name: String,
    pub amount: Option<Decimal>,
    pub date: NaiveDate,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub items: Vec<String>,
    /// Requested split; `Some(0)` means "split, count not given" and becomes
    /// [`DEFAULT_SPLIT`]. `Some(1)` is no split.
    #[serde(default)]
    pub split_with: Option<u32>,
    #[serde(default)]
    pub currency: Currency,
}

impl NewExpense {
    pub fn new(store_name: impl Into<String>, amount: Decimal, date: NaiveDate) -> Self {
        Self {
            store_name: store_name.into(),
            amount: Some(amount),
            date,
            category: None,
            items: Vec::new(),
            split_with: None,
            currency: Currency::default(),
        }
    }

    /// Pre-fill a payload from scanned receipt fields.
    ///
    /// Fields the scan could not find stay blank for the user to complete.
    pub fn from_receipt(receipt: &ParsedReceipt, date: NaiveDate, currency: Currency) -> Self {
        Self {
            store_name: receipt.store_name.clone().unwrap_or_default(),
            amount: receipt.amount,
            date,
            category: None,
            items: receipt.items.clone(),
            split_with: None,
            currency,
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_items(mut self, items: Vec<String>) -> Self {
        self.items = items;
        self
    }

    pub fn with_split(mut self, split_with: u32) -> Self {
        self.split_with = Some(split_with);
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Number of people sharing the bill, if split.
    pub fn split_count(&self) -> Option<u32> {
        match self.split_with? {
            0 => Some(DEFAULT_SPLIT),
            1 => None,
            n => Some(n),
        }
    }

    /// The user's share when the bill is split.
    pub fn user_portion(&self) -> Option<Decimal> {
        let amount = self.amount?;
        self.split_count().map(|n| split_share(amount, n))
    }

    /// Check the payload is complete.
    pub fn validate(&self) -> Result<(), ExpenseError> {
        validate_store_name(&self.store_name)?;
        match self.amount {
            None => Err(ExpenseError::MissingField("amount".to_string())),
            Some(amount) => validate_amount(amount),
        }
    }

    /// Build the stored record.
    pub fn into_expense(
        self,
        id: String,
        user_id: String,
        now: DateTime<Utc>,
    ) -> Result<Expense, ExpenseError> {
        self.validate()?;
        let user_portion = self.user_portion();
        let split_with = self.split_count();

        Ok(Expense {
            id,
            user_id,
            store_name: self.store_name.trim().to_string(),
            amount: self.amount.unwrap_or_default(),
            date: self.date,
            category: self.category,
            items: self.items,
            split_with,
            user_portion,
            currency: self.currency,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial edit of a stored expense. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseUpdate {
    pub store_name: Option<String>,
    pub amount: Option<Decimal>,
    pub date: Option<NaiveDate>,
    pub category: Option<Category>,
    pub items: Option<Vec<String>>,
    /// New split count; 0 or 1 removes the split.
    pub split_with: Option<u32>,
}

impl ExpenseUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Apply to `expense`, recomputing the user's portion.
    ///
    /// The expense is left untouched when validation fails.
    pub fn apply(&self, expense: &mut Expense, now: DateTime<Utc>) -> Result<(), ExpenseError> {
        if let Some(name) = &self.store_name {
            validate_store_name(name)?;
        }
        if let Some(amount) = self.amount {
            validate_amount(amount)?;
        }

        if let Some(name) = &self.store_name {
            expense.store_name = name.trim().to_string();
        }
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(date) = self.date {
            expense.date = date;
        }
        if let Some(category) = self.category {
            expense.category = Some(category);
        }
        if let Some(items) = &self.items {
            expense.items = items.clone();
        }
        if let Some(split) = self.split_with {
            expense.split_with = (split > 1).then_some(split);
        }

        expense.user_portion = expense.split_with.map(|n| split_share(expense.amount, n));
        expense.updated_at = now;
        Ok(())
    }
}

/// Split a comma-separated item list, dropping blanks.
pub fn parse_item_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split count used when a bill is marked as shared without a count.
pub const DEFAULT_SPLIT: u32 = 2;

/// One person's share of a bill split `people` ways, rounded to cents.
///
/// A count of 0 means [`DEFAULT_SPLIT`].
pub fn split_share(amount: Decimal, people: u32) -> Decimal {
    let people = if people == 0 { DEFAULT_SPLIT } else { people };
    (amount / Decimal::from(people)).round_dp(2)
}

fn validate_store_name(name: &str) -> Result<(), ExpenseError> {
    if name.trim().is_empty() {
        Err(ExpenseError::MissingField("store name".to_string()))
    } else {
        Ok(())
    }
}

fn validate_amount(amount: Decimal) -> Result<(), ExpenseError> {
    if amount > Decimal::ZERO {
        Ok(())
    } else {
        Err(ExpenseError::Validation {
            field: "amount".to_string(),
            reason: format!("must be positive, got {}", amount),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn stored(draft: NewExpense) -> Expense {
        draft
            .into_expense("e1".to_string(), "u1".to_string(), Utc::now())
            .unwrap()
    }

    #[test]
    fn test_currency_format_and_parse() {
        assert_eq!(Currency::Inr.format(dec("1250")), "₹1250.00");
        assert_eq!(Currency::Usd.format(dec("3.456")), "$3.46");
        assert_eq!("inr".parse::<Currency>().unwrap(), Currency::Inr);
        assert_eq!("$".parse::<Currency>().unwrap(), Currency::Usd);
        assert!("EUR".parse::<Currency>().is_err());
        assert_eq!(serde_json::to_string(&Currency::Inr).unwrap(), "\"INR\"");
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("food & dining".parse::<Category>().unwrap(), Category::FoodAndDining);
        assert_eq!("Bills".parse::<Category>().unwrap(), Category::BillsAndUtilities);
        assert_eq!("groceries".parse::<Category>().unwrap(), Category::Groceries);
        assert!("".parse::<Category>().is_err());
        assert!("rent".parse::<Category>().is_err());
        assert_eq!(
            serde_json::to_string(&Category::FoodAndDining).unwrap(),
            "\"Food & Dining\""
        );
    }

    #[test]
    fn test_split_portion() {
        let expense = stored(NewExpense::new("Swiggy", dec("450"), date(2024, 1, 14)).with_split(2));

        assert!(expense.is_split());
        assert_eq!(expense.user_portion, Some(dec("225")));
        assert_eq!(expense.effective_amount(), dec("225"));
    }

    #[test]
    fn test_split_without_count_defaults_to_two() {
        let draft = NewExpense::new("Cab", dec("300"), date(2024, 1, 1)).with_split(0);
        assert_eq!(draft.split_count(), Some(2));
        assert_eq!(draft.user_portion(), Some(dec("150")));
    }

    #[test]
    fn test_split_of_one_is_no_split() {
        let expense = stored(NewExpense::new("Cab", dec("300"), date(2024, 1, 1)).with_split(1));

        assert_eq!(expense.split_with, None);
        assert_eq!(expense.user_portion, None);
        assert!(!expense.is_split());
    }

    #[test]
    fn test_split_share() {
        assert_eq!(split_share(dec("900"), 3), dec("300"));
        assert_eq!(split_share(dec("100"), 0), dec("50"));
        assert_eq!(split_share(dec("100"), 3), dec("33.33"));
    }

    #[test]
    fn test_validation() {
        let mut draft = NewExpense::new("  ", dec("10"), date(2024, 1, 1));
        assert_eq!(
            draft.validate(),
            Err(ExpenseError::MissingField("store name".to_string()))
        );

        draft.store_name = "Metro".to_string();
        draft.amount = Some(Decimal::ZERO);
        assert!(matches!(draft.validate(), Err(ExpenseError::Validation { .. })));

        draft.amount = None;
        assert_eq!(
            draft.validate(),
            Err(ExpenseError::MissingField("amount".to_string()))
        );
    }

    #[test]
    fn test_prefill_from_receipt() {
        let receipt = ParsedReceipt {
            store_name: None,
            amount: Some(dec("99.50")),
            items: vec!["Chai".to_string()],
            raw_text: "Chai 99.50".to_string(),
        };

        let draft = NewExpense::from_receipt(&receipt, date(2024, 3, 1), Currency::Inr);
        assert_eq!(draft.store_name, "");
        assert_eq!(draft.amount, Some(dec("99.50")));
        assert_eq!(draft.items, vec!["Chai"]);
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_update_recomputes_portion() {
        let mut expense = stored(NewExpense::new("Dinner", dec("900"), date(2024, 2, 2)).with_split(3));
        assert_eq!(expense.user_portion, Some(dec("300")));

        let update = ExpenseUpdate {
            amount: Some(dec("1200")),
            ..Default::default()
        };
        update.apply(&mut expense, Utc::now()).unwrap();
        assert_eq!(expense.user_portion, Some(dec("400")));

        let unsplit = ExpenseUpdate {
            split_with: Some(1),
            ..Default::default()
        };
        unsplit.apply(&mut expense, Utc::now()).unwrap();
        assert_eq!(expense.split_with, None);
        assert_eq!(expense.effective_amount(), dec("1200"));
    }

    #[test]
    fn test_invalid_update_leaves_expense_untouched() {
        let mut expense = stored(NewExpense::new("Dinner", dec("900"), date(2024, 2, 2)));
        let before = expense.clone();

        let update = ExpenseUpdate {
            store_name: Some("Lunch".to_string()),
            amount: Some(dec("-5")),
            ..Default::default()
        };
        assert!(update.apply(&mut expense, Utc::now()).is_err());
        assert_eq!(expense, before);
    }

    #[test]
    fn test_parse_item_list() {
        assert_eq!(parse_item_list("Rice, Dal,, Oil "), vec!["Rice", "Dal", "Oil"]);
        assert!(parse_item_list("").is_empty());
    }
}
