//! Studio expenses.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, input::required_text, money::Money};

/// The fixed set of expense categories.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ExpenseCategory {
  Rent,
  Supplies,
  Utilities,
  Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
  pub id:           Uuid,
  pub description:  String,
  /// Always strictly positive.
  pub amount:       Money,
  pub category:     ExpenseCategory,
  pub expense_date: NaiveDate,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

/// Input to [`crate::store::StudioStore::add_expense`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
  pub description:  String,
  pub amount:       Money,
  pub category:     ExpenseCategory,
  /// Defaults to the day the expense is recorded.
  pub expense_date: Option<NaiveDate>,
}

fn check_amount(amount: Money) -> Result<()> {
  if amount.is_zero() {
    return Err(Error::validation("expense amount must be positive"));
  }
  Ok(())
}

impl NewExpense {
  pub fn new(
    description: impl Into<String>,
    amount: Money,
    category: ExpenseCategory,
    expense_date: NaiveDate,
  ) -> Self {
    Self {
      description: description.into(),
      amount,
      category,
      expense_date: Some(expense_date),
    }
  }

  /// Validate and fill in `expense_date` with `today` when it is missing.
  pub fn normalize(self, today: NaiveDate) -> Result<Self> {
    check_amount(self.amount)?;
    Ok(Self {
      description:  required_text("expense description", &self.description)?,
      amount:       self.amount,
      category:     self.category,
      expense_date: Some(self.expense_date.unwrap_or(today)),
    })
  }
}

/// Partial update; `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpensePatch {
  pub description:  Option<String>,
  pub amount:       Option<Money>,
  pub category:     Option<ExpenseCategory>,
  pub expense_date: Option<NaiveDate>,
}

impl ExpensePatch {
  pub fn is_empty(&self) -> bool {
    self.description.is_none()
      && self.amount.is_none()
      && self.category.is_none()
      && self.expense_date.is_none()
  }
}

impl Expense {
  pub fn apply(&self, patch: ExpensePatch) -> Result<Self> {
    if patch.is_empty() {
      return Err(Error::validation("at least one field is required"));
    }
    if let Some(amount) = patch.amount {
      check_amount(amount)?;
    }
    let description = match patch.description {
      Some(d) => required_text("expense description", &d)?,
      None => self.description.clone(),
    };
    Ok(Self {
      description,
      amount: patch.amount.unwrap_or(self.amount),
      category: patch.category.unwrap_or(self.category),
      expense_date: patch.expense_date.unwrap_or(self.expense_date),
      ..self.clone()
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(2025, 6, d).unwrap() }

  fn ink() -> Expense {
    let now = Utc::now();
    Expense {
      id:           Uuid::new_v4(),
      description:  "Ink restock".into(),
      amount:       Money::new(12_000).unwrap(),
      category:     ExpenseCategory::Supplies,
      expense_date: date(3),
      created_at:   now,
      updated_at:   now,
    }
  }

  #[test]
  fn normalize_defaults_the_date() {
    let input = NewExpense {
      description:  " Rent ".into(),
      amount:       Money::new(500_000).unwrap(),
      category:     ExpenseCategory::Rent,
      expense_date: None,
    };
    let n = input.normalize(date(1)).unwrap();
    assert_eq!(n.description, "Rent");
    assert_eq!(n.expense_date, Some(date(1)));
  }

  #[test]
  fn zero_amount_is_rejected() {
    let input = NewExpense::new("Free sample", Money::ZERO, ExpenseCategory::Other, date(2));
    assert!(matches!(input.normalize(date(2)), Err(Error::Validation(_))));

    let patch = ExpensePatch { amount: Some(Money::ZERO), ..Default::default() };
    assert!(ink().apply(patch).is_err());
  }

  #[test]
  fn apply_merges_fields() {
    let e = ink();
    let patch = ExpensePatch { expense_date: Some(date(4)), ..Default::default() };
    let merged = e.apply(patch).unwrap();
    assert_eq!(merged.expense_date, date(4));
    assert_eq!(merged.amount, e.amount);
    assert_eq!(merged.description, e.description);
  }

  #[test]
  fn category_wire_names() {
    let c: ExpenseCategory = serde_json::from_str("\"utilities\"").unwrap();
    assert_eq!(c, ExpenseCategory::Utilities);
    assert!(serde_json::from_str::<ExpenseCategory>("\"Alquiler\"").is_err());
  }
}
