//! Filter and pagination state mirrored into the location's query string.
//!
//! Raw form input is `sanitize`d into a [`FilterSet`], conformed to the list's
//! [`FilterSchema`], and carried by a [`ListState`] together with the page.
//! `ListState::parse` never fails and `parse(serialize(s)) == s` for every
//! state the constructors can produce.

use std::{collections::BTreeMap, fmt};

use chrono::NaiveDate;
use tracing::warn;

pub const PAGE_PARAM: &str = "page";

/// A raw value read from a form control, before sanitizing.
///
/// Mirrors what an HTML form hands over: missing fields, explicit nulls,
/// strings, and numbers that are `NaN` when the input was left empty.
#[derive(Clone, Debug, PartialEq)]
pub enum FormValue {
    Undefined,
    Null,
    Text(String),
    Number(f64),
    Integer(i64),
    Bool(bool),
}

#[derive(Clone, Debug, PartialEq)]
pub enum FilterValue {
    Text(String),
    Number(f64),
    Integer(i64),
    Bool(bool),
}

impl FilterValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FilterValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FilterValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FilterValue::Number(value) => Some(*value),
            FilterValue::Integer(value) => Some(*value as f64),
            _ => None,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Text(text) => f.write_str(text),
            FilterValue::Number(value) => write!(f, "{value}"),
            FilterValue::Integer(value) => write!(f, "{value}"),
            FilterValue::Bool(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Integer(value)
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        FilterValue::Number(value)
    }
}

/// The active filter predicates, keyed by their location-side name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterSet(BTreeMap<String, FilterValue>);

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FilterValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<FilterValue> {
        self.0.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&FilterValue> {
        self.0.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FilterValue::as_text)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(FilterValue::as_integer)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(FilterValue::as_number)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<K: Into<String>> FromIterator<(K, FilterValue)> for FilterSet {
    fn from_iter<I: IntoIterator<Item = (K, FilterValue)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Drops every field that is undefined, null, an empty string or `NaN`.
/// Everything else, `0` and `false` included, passes through unchanged.
pub fn sanitize<I, K>(values: I) -> FilterSet
where
    I: IntoIterator<Item = (K, FormValue)>,
    K: Into<String>,
{
    values
        .into_iter()
        .filter_map(|(name, value)| {
            let value = match value {
                FormValue::Undefined | FormValue::Null => return None,
                FormValue::Text(text) if text.is_empty() => return None,
                FormValue::Number(number) if number.is_nan() => return None,
                FormValue::Text(text) => FilterValue::Text(text),
                FormValue::Number(number) => FilterValue::Number(number),
                FormValue::Integer(number) => FilterValue::Integer(number),
                FormValue::Bool(flag) => FilterValue::Bool(flag),
            };
            Some((name, value))
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Number,
    /// `YYYY-MM-DD`
    Date,
    Choice(&'static [&'static str]),
}

impl FieldKind {
    /// Reads a query-string value, or `None` when it does not fit the kind.
    pub fn parse_value(self, raw: &str) -> Option<FilterValue> {
        match self {
            FieldKind::Text => (!raw.is_empty()).then(|| FilterValue::Text(raw.to_string())),
            FieldKind::Integer => raw.trim().parse::<i64>().ok().map(FilterValue::Integer),
            FieldKind::Number => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .map(FilterValue::Number),
            FieldKind::Date => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .ok()
                .map(|date| FilterValue::Text(date.format("%Y-%m-%d").to_string())),
            FieldKind::Choice(options) => options
                .contains(&raw)
                .then(|| FilterValue::Text(raw.to_string())),
        }
    }

    /// Coerces an already-typed value into this kind.
    pub fn conform(self, value: &FilterValue) -> Option<FilterValue> {
        match value {
            FilterValue::Bool(_) => None,
            other => self.parse_value(&other.to_string()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterField {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// The canonical filter fields of one list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterSchema {
    pub fields: &'static [FilterField],
}

pub const TRANSACTION_TYPES: &[&str] = &["income", "expense"];
pub const PAYMENT_METHODS: &[&str] = &["cash", "card"];
pub const SORT_FIELDS: &[&str] = &["date", "amount"];
pub const SORT_ORDERS: &[&str] = &["asc", "desc"];

pub const TRANSACTION_FILTERS: FilterSchema = FilterSchema {
    fields: &[
        FilterField {
            name: "transactionType",
            kind: FieldKind::Choice(TRANSACTION_TYPES),
        },
        FilterField {
            name: "categoryId",
            kind: FieldKind::Integer,
        },
        FilterField {
            name: "paymentMethod",
            kind: FieldKind::Choice(PAYMENT_METHODS),
        },
        FilterField {
            name: "startDate",
            kind: FieldKind::Date,
        },
        FilterField {
            name: "endDate",
            kind: FieldKind::Date,
        },
        FilterField {
            name: "minAmount",
            kind: FieldKind::Number,
        },
        FilterField {
            name: "maxAmount",
            kind: FieldKind::Number,
        },
        FilterField {
            name: "searchQuery",
            kind: FieldKind::Text,
        },
        FilterField {
            name: "sortBy",
            kind: FieldKind::Choice(SORT_FIELDS),
        },
        FilterField {
            name: "sortOrder",
            kind: FieldKind::Choice(SORT_ORDERS),
        },
    ],
};

pub const CATEGORY_FILTERS: FilterSchema = FilterSchema {
    fields: &[FilterField {
        name: "searchQuery",
        kind: FieldKind::Text,
    }],
};

pub const ITEM_FILTERS: FilterSchema = FilterSchema { fields: &[] };

impl FilterSchema {
    pub fn field(&self, name: &str) -> Option<&FilterField> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Keeps the known fields, each coerced to its kind.
    pub fn conform(&self, filters: &FilterSet) -> FilterSet {
        filters
            .iter()
            .filter_map(|(name, value)| {
                let field = self.field(name)?;
                field.kind.conform(value).map(|value| (field.name, value))
            })
            .collect()
    }
}

/// Page plus filters of one list view. `page` is always at least 1.
#[derive(Clone, Debug, PartialEq)]
pub struct ListState {
    page: u32,
    filters: FilterSet,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            page: 1,
            filters: FilterSet::new(),
        }
    }
}

impl ListState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `?page=..&<filters>`. Never fails: a missing, malformed or zero
    /// page becomes 1, and unknown or ill-typed filters are dropped.
    pub fn parse(schema: &FilterSchema, query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs = serde_urlencoded::from_str::<Vec<(String, String)>>(query).unwrap_or_else(|err| {
            warn!(error = %err, "unreadable query string");
            Vec::new()
        });
        Self::from_pairs(schema, pairs)
    }

    pub fn from_pairs<I, K, V>(schema: &FilterSchema, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut page = None;
        let mut filters = BTreeMap::new();
        for (name, raw) in pairs {
            let (name, raw) = (name.as_ref(), raw.as_ref());
            if name == PAGE_PARAM {
                // First occurrence wins, valid or not.
                if page.is_none() {
                    page = Some(raw.trim().parse::<u32>().ok().filter(|page| *page >= 1));
                }
                continue;
            }
            let Some(field) = schema.field(name) else {
                continue;
            };
            if filters.contains_key(field.name) {
                continue;
            }
            if let Some(value) = field.kind.parse_value(raw) {
                filters.insert(field.name.to_string(), value);
            }
        }
        Self {
            page: page.flatten().unwrap_or(1),
            filters: FilterSet(filters),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    /// `page` first, then the filters by name.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        std::iter::once((PAGE_PARAM.to_string(), self.page.to_string()))
            .chain(
                self.filters
                    .iter()
                    .map(|(name, value)| (name.to_string(), value.to_string())),
            )
            .collect()
    }

    pub fn serialize(&self) -> String {
        serde_urlencoded::to_string(self.to_pairs()).unwrap_or_else(|err| {
            warn!(error = %err, "could not encode list state");
            String::new()
        })
    }

    /// Same filters on another page.
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page: page.max(1),
            filters: self.filters.clone(),
        }
    }

    /// New filter set; always back to page 1.
    pub fn with_filters(&self, schema: &FilterSchema, filters: &FilterSet) -> Self {
        Self {
            page: 1,
            filters: schema.conform(filters),
        }
    }

    /// Sets or clears one filter; always back to page 1.
    pub fn with_filter(
        &self,
        schema: &FilterSchema,
        name: &str,
        value: Option<FilterValue>,
    ) -> Self {
        let mut filters = self.filters.clone();
        match value {
            Some(value) => filters.insert(name, value),
            None => {
                filters.remove(name);
            }
        }
        self.with_filters(schema, &filters)
    }

    /// Rows to skip for the current page.
    pub fn skip(&self, page_size: u64) -> u64 {
        u64::from(self.page - 1) * page_size
    }
}

/// Number of pages for `total` rows; at least 1 so an empty list still has a
/// page to show.
pub fn page_count(total: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 1;
    }
    total.div_ceil(page_size).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_drops_empty_values() {
        let set = sanitize([
            ("minAmount", FormValue::Number(f64::NAN)),
            ("searchQuery", FormValue::Text(String::new())),
            ("categoryId", FormValue::Integer(3)),
            ("paymentMethod", FormValue::Null),
            ("sortBy", FormValue::Undefined),
        ]);
        assert_eq!(set, FilterSet::from_iter([("categoryId", FilterValue::Integer(3))]));
    }

    #[test]
    fn sanitize_keeps_zero_and_false() {
        let set = sanitize([
            ("minAmount", FormValue::Number(0.0)),
            ("flag", FormValue::Bool(false)),
        ]);
        assert_eq!(set.number("minAmount"), Some(0.0));
        assert_eq!(set.get("flag"), Some(&FilterValue::Bool(false)));
    }

    #[test]
    fn parse_is_total() {
        for raw in ["", "?", "page=abc", "page=0", "page=-2", "%%%", "page=1.5&page=2"] {
            let state = ListState::parse(&TRANSACTION_FILTERS, raw);
            assert_eq!(state.page(), 1, "query {raw:?}");
        }
        assert_eq!(ListState::parse(&TRANSACTION_FILTERS, "page=4").page(), 4);
    }

    #[test]
    fn parse_drops_unknown_and_ill_typed_fields() {
        let state = ListState::parse(
            &TRANSACTION_FILTERS,
            "?page=2&foo=bar&categoryId=x&transactionType=expense&startDate=2024-02-30&minAmount=5",
        );
        assert_eq!(state.page(), 2);
        assert_eq!(state.filters().len(), 2);
        assert_eq!(state.filters().text("transactionType"), Some("expense"));
        assert_eq!(state.filters().number("minAmount"), Some(5.0));
    }

    #[test]
    fn submitted_filters_land_on_page_one() {
        let on_page_three = ListState::parse(&TRANSACTION_FILTERS, "page=3");
        let submitted = sanitize([
            ("transactionType", FormValue::Text("expense".into())),
            ("minAmount", FormValue::Number(0.0)),
            ("maxAmount", FormValue::Number(f64::NAN)),
        ]);
        let next = on_page_three.with_filters(&TRANSACTION_FILTERS, &submitted);
        assert_eq!(next.page(), 1);
        assert_eq!(
            next.filters(),
            &FilterSet::from_iter([
                ("minAmount", FilterValue::Number(0.0)),
                ("transactionType", FilterValue::Text("expense".into())),
            ])
        );
    }

    #[test]
    fn page_change_keeps_filters() {
        let state = ListState::parse(&CATEGORY_FILTERS, "page=1&searchQuery=food");
        let next = state.with_page(5);
        assert_eq!(next.page(), 5);
        assert_eq!(next.filters(), state.filters());
        assert_eq!(state.with_page(0).page(), 1);

        let reset = next.with_filter(&CATEGORY_FILTERS, "searchQuery", Some("rent".into()));
        assert_eq!(reset.page(), 1);
        assert_eq!(reset.filters().text("searchQuery"), Some("rent"));
    }

    #[test]
    fn conform_normalizes_numbers_per_kind() {
        let raw = FilterSet::from_iter([
            ("categoryId", FilterValue::Number(4.0)),
            ("minAmount", FilterValue::Integer(10)),
            ("maxAmount", FilterValue::Number(2.5)),
            ("unknown", FilterValue::Integer(1)),
            ("transactionType", FilterValue::Text("refund".into())),
        ]);
        let conformed = TRANSACTION_FILTERS.conform(&raw);
        assert_eq!(conformed.get("categoryId"), Some(&FilterValue::Integer(4)));
        assert_eq!(conformed.get("minAmount"), Some(&FilterValue::Number(10.0)));
        assert_eq!(conformed.get("maxAmount"), Some(&FilterValue::Number(2.5)));
        assert!(!conformed.contains("unknown"));
        assert!(!conformed.contains("transactionType"));
    }

    #[test]
    fn serialize_round_trips() {
        let base = ListState::new();
        let states = [
            base.clone(),
            base.with_page(7),
            base.with_filters(
                &TRANSACTION_FILTERS,
                &sanitize([
                    ("searchQuery", FormValue::Text("rent & more=ok".into())),
                    ("minAmount", FormValue::Number(0.1)),
                    ("maxAmount", FormValue::Integer(250)),
                    ("startDate", FormValue::Text("2024-01-31".into())),
                    ("categoryId", FormValue::Number(12.0)),
                    ("sortOrder", FormValue::Text("asc".into())),
                ]),
            )
            .with_page(3),
        ];
        for state in states {
            let raw = state.serialize();
            assert!(raw.starts_with("page="));
            assert_eq!(ListState::parse(&TRANSACTION_FILTERS, &raw), state, "query {raw}");
        }
    }

    #[test]
    fn skip_and_page_count() {
        let state = ListState::new().with_page(3);
        assert_eq!(state.skip(20), 40);
        assert_eq!(page_count(0, 20), 1);
        assert_eq!(page_count(41, 20), 3);
        assert_eq!(page_count(40, 20), 2);
        assert_eq!(page_count(5, 0), 1);
    }
}
