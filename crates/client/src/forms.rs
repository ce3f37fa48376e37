//! Dialog form models and their client-side validation.

use api_types::{
    category::{Category, CategoryCreate},
    transaction::{PaymentMethod, Transaction, TransactionCreate, TransactionType},
};
use chrono::{Local, NaiveDate};

use crate::{
    error::ValidationErrors,
    query::{CATEGORY_FILTERS, FilterSet, FormValue, ListState, TRANSACTION_FILTERS, sanitize},
};

pub const CATEGORY_NAME_MAX: usize = 50;
pub const CATEGORY_DESCRIPTION_MAX: usize = 200;
pub const COMMENT_MAX: usize = 1000;

/// A form a mutation dialog edits. `Default` is the reset state.
pub trait FormModel: Default + Clone {
    type Payload;

    fn validate(&self) -> Result<Self::Payload, ValidationErrors>;
}

fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

#[derive(Clone, Debug, PartialEq)]
pub struct TransactionForm {
    pub amount: String,
    pub transaction_type: TransactionType,
    pub category_id: Option<i64>,
    pub transaction_date: String,
    pub payment_method: Option<PaymentMethod>,
    pub description: String,
}

impl Default for TransactionForm {
    fn default() -> Self {
        Self {
            amount: "0".to_string(),
            transaction_type: TransactionType::Expense,
            category_id: None,
            transaction_date: today(),
            payment_method: Some(PaymentMethod::Cash),
            description: String::new(),
        }
    }
}

impl From<&Transaction> for TransactionForm {
    fn from(tx: &Transaction) -> Self {
        Self {
            amount: tx.amount.to_string(),
            transaction_type: tx.transaction_type,
            category_id: Some(tx.category_id),
            transaction_date: tx.transaction_date.format("%Y-%m-%d").to_string(),
            payment_method: tx.payment_method,
            description: tx.description.clone().unwrap_or_default(),
        }
    }
}

impl FormModel for TransactionForm {
    type Payload = TransactionCreate;

    fn validate(&self) -> Result<TransactionCreate, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let amount = match self.amount.trim() {
            "" => {
                errors.push("amount", "Amount is required.");
                None
            }
            raw => match raw.parse::<f64>() {
                Ok(value) if value.is_finite() && value > 0.0 => Some(value),
                _ => {
                    errors.push("amount", "Amount must be a positive number.");
                    None
                }
            },
        };

        if self.category_id.is_none() {
            errors.push("category_id", "Category is required.");
        }

        let date = match self.transaction_date.trim() {
            "" => {
                errors.push("transaction_date", "Transaction date is required.");
                None
            }
            raw => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.push("transaction_date", "Enter a date as YYYY-MM-DD.");
                    None
                }
            },
        };

        match (amount, self.category_id, date) {
            (Some(amount), Some(category_id), Some(transaction_date)) if errors.is_empty() => {
                Ok(TransactionCreate {
                    amount,
                    transaction_type: self.transaction_type,
                    category_id,
                    transaction_date,
                    payment_method: self.payment_method,
                    description: optional_text(&self.description),
                })
            }
            _ => Err(errors),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CategoryForm {
    pub name: String,
    pub description: String,
}

impl From<&Category> for CategoryForm {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            description: category.description.clone().unwrap_or_default(),
        }
    }
}

impl FormModel for CategoryForm {
    type Payload = CategoryCreate;

    fn validate(&self) -> Result<CategoryCreate, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let name = self.name.trim();
        if name.is_empty() {
            errors.push("name", "Name is required.");
        } else if name.chars().count() > CATEGORY_NAME_MAX {
            errors.push(
                "name",
                format!("Name must be at most {CATEGORY_NAME_MAX} characters."),
            );
        }
        if self.description.trim().chars().count() > CATEGORY_DESCRIPTION_MAX {
            errors.push(
                "description",
                format!("Description must be at most {CATEGORY_DESCRIPTION_MAX} characters."),
            );
        }
        errors.into_result(|| CategoryCreate {
            name: name.to_string(),
            description: optional_text(&self.description),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommentForm {
    pub content: String,
}

impl FormModel for CommentForm {
    type Payload = String;

    fn validate(&self) -> Result<String, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let content = self.content.trim();
        if content.is_empty() {
            errors.push("content", "Comment cannot be empty.");
        } else if content.chars().count() > COMMENT_MAX {
            errors.push(
                "content",
                format!("Comment must be at most {COMMENT_MAX} characters."),
            );
        }
        errors.into_result(|| content.to_string())
    }
}

/// Delete dialogs: nothing to fill in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Confirm;

impl FormModel for Confirm {
    type Payload = ();

    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

/// The transaction filter form. Inputs are kept as typed text; number
/// inputs read as `NaN` when left empty, like a browser number field.
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionFilterForm {
    pub transaction_type: String,
    pub category_id: String,
    pub payment_method: String,
    pub start_date: String,
    pub end_date: String,
    pub min_amount: String,
    pub max_amount: String,
    pub search_query: String,
    pub sort_by: String,
    pub sort_order: String,
}

pub const DEFAULT_SORT_BY: &str = "date";
pub const DEFAULT_SORT_ORDER: &str = "desc";

impl Default for TransactionFilterForm {
    fn default() -> Self {
        Self {
            transaction_type: String::new(),
            category_id: String::new(),
            payment_method: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            min_amount: String::new(),
            max_amount: String::new(),
            search_query: String::new(),
            sort_by: DEFAULT_SORT_BY.to_string(),
            sort_order: DEFAULT_SORT_ORDER.to_string(),
        }
    }
}

fn number_input(raw: &str) -> FormValue {
    FormValue::Number(raw.trim().parse::<f64>().unwrap_or(f64::NAN))
}

fn select_input(raw: &str) -> FormValue {
    if raw.is_empty() {
        FormValue::Undefined
    } else {
        FormValue::Text(raw.to_string())
    }
}

impl TransactionFilterForm {
    /// Prefills from the current location; sort fields fall back to their
    /// defaults.
    pub fn from_state(state: &ListState) -> Self {
        let filters = state.filters();
        let text = |name: &str| {
            filters
                .get(name)
                .map(ToString::to_string)
                .unwrap_or_default()
        };
        let mut form = Self {
            transaction_type: text("transactionType"),
            category_id: text("categoryId"),
            payment_method: text("paymentMethod"),
            start_date: text("startDate"),
            end_date: text("endDate"),
            min_amount: text("minAmount"),
            max_amount: text("maxAmount"),
            search_query: text("searchQuery"),
            sort_by: text("sortBy"),
            sort_order: text("sortOrder"),
        };
        if form.sort_by.is_empty() {
            form.sort_by = DEFAULT_SORT_BY.to_string();
        }
        if form.sort_order.is_empty() {
            form.sort_order = DEFAULT_SORT_ORDER.to_string();
        }
        form
    }

    pub fn to_form_values(&self) -> Vec<(&'static str, FormValue)> {
        let category = match self.category_id.trim() {
            "" => FormValue::Undefined,
            raw => raw
                .parse::<i64>()
                .map(FormValue::Integer)
                .unwrap_or_else(|_| FormValue::Text(raw.to_string())),
        };
        vec![
            ("transactionType", select_input(&self.transaction_type)),
            ("categoryId", category),
            ("paymentMethod", select_input(&self.payment_method)),
            ("startDate", FormValue::Text(self.start_date.trim().to_string())),
            ("endDate", FormValue::Text(self.end_date.trim().to_string())),
            ("minAmount", number_input(&self.min_amount)),
            ("maxAmount", number_input(&self.max_amount)),
            ("searchQuery", FormValue::Text(self.search_query.clone())),
            ("sortBy", select_input(&self.sort_by)),
            ("sortOrder", select_input(&self.sort_order)),
        ]
    }

    pub fn filters(&self) -> FilterSet {
        sanitize(self.to_form_values())
    }

    /// The state a submit navigates to: the sanitized filters on page 1.
    pub fn apply(&self, current: &ListState) -> ListState {
        current.with_filters(&TRANSACTION_FILTERS, &self.filters())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CategoryFilterForm {
    pub search_query: String,
}

impl CategoryFilterForm {
    pub fn from_state(state: &ListState) -> Self {
        Self {
            search_query: state
                .filters()
                .text("searchQuery")
                .unwrap_or_default()
                .to_string(),
        }
    }

    pub fn apply(&self, current: &ListState) -> ListState {
        let filters = sanitize([("searchQuery", FormValue::Text(self.search_query.trim().to_string()))]);
        current.with_filters(&CATEGORY_FILTERS, &filters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::FilterValue;

    #[test]
    fn transaction_form_requires_amount_category_and_date() {
        let form = TransactionForm {
            amount: " ".into(),
            transaction_date: String::new(),
            ..TransactionForm::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.for_field("amount"), Some("Amount is required."));
        assert_eq!(errors.for_field("category_id"), Some("Category is required."));
        assert_eq!(
            errors.for_field("transaction_date"),
            Some("Transaction date is required.")
        );
    }

    #[test]
    fn transaction_form_rejects_non_positive_amounts() {
        for amount in ["0", "-4", "abc", "inf"] {
            let form = TransactionForm {
                amount: amount.into(),
                category_id: Some(1),
                ..TransactionForm::default()
            };
            let errors = form.validate().unwrap_err();
            assert_eq!(
                errors.for_field("amount"),
                Some("Amount must be a positive number."),
                "amount {amount}"
            );
        }
    }

    #[test]
    fn transaction_form_builds_payload() {
        let form = TransactionForm {
            amount: "12.50".into(),
            category_id: Some(3),
            transaction_date: "2024-05-01".into(),
            description: "  lunch ".into(),
            ..TransactionForm::default()
        };
        let payload = form.validate().unwrap();
        assert_eq!(payload.amount, 12.5);
        assert_eq!(payload.transaction_type, TransactionType::Expense);
        assert_eq!(payload.payment_method, Some(PaymentMethod::Cash));
        assert_eq!(payload.description.as_deref(), Some("lunch"));
        assert_eq!(payload.transaction_date.to_string(), "2024-05-01");
    }

    #[test]
    fn bad_date_is_reported() {
        let form = TransactionForm {
            amount: "1".into(),
            category_id: Some(3),
            transaction_date: "05/01/2024".into(),
            ..TransactionForm::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.for_field("transaction_date").is_some());
    }

    #[test]
    fn category_name_length() {
        assert!(CategoryForm::default().validate().is_err());
        let long = CategoryForm {
            name: "x".repeat(CATEGORY_NAME_MAX + 1),
            description: String::new(),
        };
        assert!(long.validate().unwrap_err().for_field("name").is_some());
        let ok = CategoryForm {
            name: "Food".into(),
            description: String::new(),
        };
        assert_eq!(ok.validate().unwrap().description, None);
    }

    #[test]
    fn comment_length_limits() {
        assert!(CommentForm { content: "   ".into() }.validate().is_err());
        assert!(
            CommentForm {
                content: "é".repeat(COMMENT_MAX)
            }
            .validate()
            .is_ok()
        );
        assert!(
            CommentForm {
                content: "a".repeat(COMMENT_MAX + 1)
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn filter_form_submit_sanitizes_and_resets_page() {
        let current = ListState::new().with_page(3);
        let form = TransactionFilterForm {
            transaction_type: "expense".into(),
            min_amount: "0".into(),
            max_amount: String::new(),
            ..TransactionFilterForm::default()
        };
        let next = form.apply(&current);
        assert_eq!(next.page(), 1);
        assert_eq!(next.filters().text("transactionType"), Some("expense"));
        assert_eq!(next.filters().get("minAmount"), Some(&FilterValue::Number(0.0)));
        assert!(!next.filters().contains("maxAmount"));
        assert_eq!(next.filters().text("sortBy"), Some("date"));
        assert_eq!(next.filters().text("sortOrder"), Some("desc"));
    }

    #[test]
    fn filter_form_prefills_from_state() {
        let state = ListState::parse(&TRANSACTION_FILTERS, "page=2&categoryId=5&minAmount=2.5");
        let form = TransactionFilterForm::from_state(&state);
        assert_eq!(form.category_id, "5");
        assert_eq!(form.min_amount, "2.5");
        assert_eq!(form.sort_by, DEFAULT_SORT_BY);
        assert_eq!(form.apply(&state).filters().integer("categoryId"), Some(5));
    }

    #[test]
    fn reset_filters_keep_only_sort_defaults() {
        let state = ListState::parse(&TRANSACTION_FILTERS, "page=4&searchQuery=rent");
        let next = TransactionFilterForm::default().apply(&state);
        assert_eq!(next.page(), 1);
        assert_eq!(next.filters().len(), 2);
    }
}
