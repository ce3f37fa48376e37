//! Keyboard editing of dialog and filter forms.
//!
//! Every form is a flat list of fields. Text fields take typed characters;
//! choice fields cycle through their options with Left/Right.

use api_types::{
    category::Category,
    transaction::{PaymentMethod, TransactionType},
};
use budget_client::{
    forms::{CategoryFilterForm, CategoryForm, CommentForm, Confirm, TransactionFilterForm, TransactionForm},
    query::{PAYMENT_METHODS, SORT_FIELDS, SORT_ORDERS, TRANSACTION_TYPES},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Choice,
}

/// One rendered form row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub label: &'static str,
    /// Key under which validation errors for this field are reported.
    pub key: &'static str,
    pub value: String,
    pub kind: FieldKind,
}

impl FieldView {
    fn text(label: &'static str, key: &'static str, value: &str) -> Self {
        Self {
            label,
            key,
            value: value.to_string(),
            kind: FieldKind::Text,
        }
    }

    fn choice(label: &'static str, key: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            key,
            value: value.into(),
            kind: FieldKind::Choice,
        }
    }
}

pub trait EditableForm {
    fn fields(&self, categories: &[Category]) -> Vec<FieldView>;
    fn input(&mut self, field: usize, ch: char);
    fn backspace(&mut self, field: usize);
    fn cycle(&mut self, field: usize, forward: bool, categories: &[Category]);
}

fn step<T: Clone + PartialEq>(options: &[T], current: &T, forward: bool) -> Option<T> {
    if options.is_empty() {
        return None;
    }
    let len = options.len();
    let next = match options.iter().position(|option| option == current) {
        Some(idx) if forward => (idx + 1) % len,
        Some(idx) => (idx + len - 1) % len,
        None if forward => 0,
        None => len - 1,
    };
    options.get(next).cloned()
}

/// Cycles a select-style string; `""` stands for "any".
fn cycle_select(value: &mut String, options: &[&str], with_any: bool, forward: bool) {
    let mut all: Vec<&str> = Vec::with_capacity(options.len() + 1);
    if with_any {
        all.push("");
    }
    all.extend_from_slice(options);
    let next = step(&all, &value.as_str(), forward).map(str::to_string);
    if let Some(next) = next {
        *value = next;
    }
}

fn category_label(categories: &[Category], id: Option<i64>) -> String {
    match id {
        None => "Select a category".to_string(),
        Some(id) => categories
            .iter()
            .find(|category| category.id == id)
            .map(|category| category.name.clone())
            .unwrap_or_else(|| format!("#{id}")),
    }
}

fn any(value: &str) -> String {
    if value.is_empty() {
        "Any".to_string()
    } else {
        value.to_string()
    }
}

impl EditableForm for TransactionForm {
    fn fields(&self, categories: &[Category]) -> Vec<FieldView> {
        vec![
            FieldView::text("Amount", "amount", &self.amount),
            FieldView::choice("Type", "transaction_type", self.transaction_type.as_str()),
            FieldView::choice("Category", "category_id", category_label(categories, self.category_id)),
            FieldView::text("Date", "transaction_date", &self.transaction_date),
            FieldView::choice(
                "Payment",
                "payment_method",
                self.payment_method.map_or("none", PaymentMethod::as_str),
            ),
            FieldView::text("Description", "description", &self.description),
        ]
    }

    fn input(&mut self, field: usize, ch: char) {
        match field {
            0 if ch.is_ascii_digit() || ch == '.' => self.amount.push(ch),
            3 if ch.is_ascii_digit() || ch == '-' => self.transaction_date.push(ch),
            5 => self.description.push(ch),
            _ => {}
        }
    }

    fn backspace(&mut self, field: usize) {
        match field {
            0 => {
                self.amount.pop();
            }
            3 => {
                self.transaction_date.pop();
            }
            5 => {
                self.description.pop();
            }
            _ => {}
        }
    }

    fn cycle(&mut self, field: usize, forward: bool, categories: &[Category]) {
        match field {
            1 => {
                if let Some(next) = step(&TransactionType::ALL, &self.transaction_type, forward) {
                    self.transaction_type = next;
                }
            }
            2 => {
                let ids: Vec<Option<i64>> = categories.iter().map(|c| Some(c.id)).collect();
                if let Some(next) = step(&ids, &self.category_id, forward) {
                    self.category_id = next;
                }
            }
            4 => {
                let mut methods = vec![None];
                methods.extend(PaymentMethod::ALL.iter().copied().map(Some));
                if let Some(next) = step(&methods, &self.payment_method, forward) {
                    self.payment_method = next;
                }
            }
            _ => {}
        }
    }
}

impl EditableForm for CategoryForm {
    fn fields(&self, _categories: &[Category]) -> Vec<FieldView> {
        vec![
            FieldView::text("Name", "name", &self.name),
            FieldView::text("Description", "description", &self.description),
        ]
    }

    fn input(&mut self, field: usize, ch: char) {
        match field {
            0 => self.name.push(ch),
            1 => self.description.push(ch),
            _ => {}
        }
    }

    fn backspace(&mut self, field: usize) {
        match field {
            0 => {
                self.name.pop();
            }
            1 => {
                self.description.pop();
            }
            _ => {}
        }
    }

    fn cycle(&mut self, _field: usize, _forward: bool, _categories: &[Category]) {}
}

impl EditableForm for CommentForm {
    fn fields(&self, _categories: &[Category]) -> Vec<FieldView> {
        vec![FieldView::text("Comment", "content", &self.content)]
    }

    fn input(&mut self, field: usize, ch: char) {
        if field == 0 {
            self.content.push(ch);
        }
    }

    fn backspace(&mut self, field: usize) {
        if field == 0 {
            self.content.pop();
        }
    }

    fn cycle(&mut self, _field: usize, _forward: bool, _categories: &[Category]) {}
}

impl EditableForm for Confirm {
    fn fields(&self, _categories: &[Category]) -> Vec<FieldView> {
        Vec::new()
    }

    fn input(&mut self, _field: usize, _ch: char) {}

    fn backspace(&mut self, _field: usize) {}

    fn cycle(&mut self, _field: usize, _forward: bool, _categories: &[Category]) {}
}

fn filter_text_field(form: &mut TransactionFilterForm, field: usize) -> Option<&mut String> {
    match field {
        3 => Some(&mut form.start_date),
        4 => Some(&mut form.end_date),
        5 => Some(&mut form.min_amount),
        6 => Some(&mut form.max_amount),
        7 => Some(&mut form.search_query),
        _ => None,
    }
}

impl EditableForm for TransactionFilterForm {
    fn fields(&self, categories: &[Category]) -> Vec<FieldView> {
        let category = match self.category_id.parse::<i64>() {
            Ok(id) => category_label(categories, Some(id)),
            Err(_) => any(&self.category_id),
        };
        vec![
            FieldView::choice("Type", "transactionType", any(&self.transaction_type)),
            FieldView::choice("Category", "categoryId", category),
            FieldView::choice("Payment", "paymentMethod", any(&self.payment_method)),
            FieldView::text("From", "startDate", &self.start_date),
            FieldView::text("To", "endDate", &self.end_date),
            FieldView::text("Min amount", "minAmount", &self.min_amount),
            FieldView::text("Max amount", "maxAmount", &self.max_amount),
            FieldView::text("Search", "searchQuery", &self.search_query),
            FieldView::choice("Sort by", "sortBy", self.sort_by.as_str()),
            FieldView::choice("Order", "sortOrder", self.sort_order.as_str()),
        ]
    }

    fn input(&mut self, field: usize, ch: char) {
        let numeric = matches!(field, 5 | 6);
        let date = matches!(field, 3 | 4);
        if numeric && !(ch.is_ascii_digit() || ch == '.') {
            return;
        }
        if date && !(ch.is_ascii_digit() || ch == '-') {
            return;
        }
        if let Some(value) = filter_text_field(self, field) {
            value.push(ch);
        }
    }

    fn backspace(&mut self, field: usize) {
        if let Some(value) = filter_text_field(self, field) {
            value.pop();
        }
    }

    fn cycle(&mut self, field: usize, forward: bool, categories: &[Category]) {
        match field {
            0 => cycle_select(&mut self.transaction_type, TRANSACTION_TYPES, true, forward),
            1 => {
                let ids: Vec<String> = categories.iter().map(|c| c.id.to_string()).collect();
                let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
                cycle_select(&mut self.category_id, &ids, true, forward);
            }
            2 => cycle_select(&mut self.payment_method, PAYMENT_METHODS, true, forward),
            8 => cycle_select(&mut self.sort_by, SORT_FIELDS, false, forward),
            9 => cycle_select(&mut self.sort_order, SORT_ORDERS, false, forward),
            _ => {}
        }
    }
}

impl EditableForm for CategoryFilterForm {
    fn fields(&self, _categories: &[Category]) -> Vec<FieldView> {
        vec![FieldView::text("Search", "searchQuery", &self.search_query)]
    }

    fn input(&mut self, field: usize, ch: char) {
        if field == 0 {
            self.search_query.push(ch);
        }
    }

    fn backspace(&mut self, field: usize) {
        if field == 0 {
            self.search_query.pop();
        }
    }

    fn cycle(&mut self, _field: usize, _forward: bool, _categories: &[Category]) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i64, name: &str) -> Category {
        Category {
            id,
            name: name.to_string(),
            description: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn category_choice_cycles_through_lookup() {
        let categories = vec![category(3, "Food"), category(7, "Rent")];
        let mut form = TransactionForm::default();
        assert_eq!(form.fields(&categories)[2].value, "Select a category");

        form.cycle(2, true, &categories);
        assert_eq!(form.category_id, Some(3));
        form.cycle(2, true, &categories);
        assert_eq!(form.category_id, Some(7));
        form.cycle(2, true, &categories);
        assert_eq!(form.category_id, Some(3));
        assert_eq!(form.fields(&categories)[2].value, "Food");
    }

    #[test]
    fn amount_accepts_only_numeric_input() {
        let mut form = TransactionForm {
            amount: String::new(),
            ..TransactionForm::default()
        };
        for ch in "12a.5".chars() {
            form.input(0, ch);
        }
        assert_eq!(form.amount, "12.5");
        form.backspace(0);
        assert_eq!(form.amount, "12.");
    }

    #[test]
    fn payment_method_can_be_cleared() {
        let mut form = TransactionForm::default();
        assert_eq!(form.payment_method, Some(PaymentMethod::Cash));
        form.cycle(4, false, &[]);
        assert_eq!(form.payment_method, None);
        assert_eq!(form.fields(&[])[4].value, "none");
    }

    #[test]
    fn filter_selects_include_any() {
        let mut form = TransactionFilterForm::default();
        form.cycle(0, true, &[]);
        assert_eq!(form.transaction_type, "income");
        form.cycle(0, true, &[]);
        form.cycle(0, true, &[]);
        assert_eq!(form.transaction_type, "");
        assert_eq!(form.fields(&[])[0].value, "Any");

        form.cycle(9, true, &[]);
        assert_eq!(form.sort_order, "asc");
    }

    #[test]
    fn filter_text_fields_edit_in_place() {
        let mut form = TransactionFilterForm::default();
        for ch in "rent".chars() {
            form.input(7, ch);
        }
        form.input(5, 'x');
        form.input(5, '5');
        assert_eq!(form.search_query, "rent");
        assert_eq!(form.min_amount, "5");
        // Choice fields ignore typing.
        form.input(0, 'i');
        assert_eq!(form.transaction_type, "");
    }
}
