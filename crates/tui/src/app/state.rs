use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use api_types::{
    category::Category,
    comment::Comment,
    item::Item,
    page::Page,
    stats::{BehaviorInsights, CategorySpending, MonthlyTrend},
    transaction::Transaction,
    user::User,
};
use budget_client::{
    ClientError, FetchError, History, MutationDialog, MutationStatus, Notice, QueryCache, Route,
    Settlement, ValidationErrors,
    forms::{
        CategoryFilterForm, CategoryForm, CommentForm, Confirm, FormModel, TransactionFilterForm,
        TransactionForm,
    },
    mutation::{
        CREATE_CATEGORY, CREATE_COMMENT, CREATE_TRANSACTION, DELETE_CATEGORY, DELETE_COMMENT,
        DELETE_TRANSACTION, UPDATE_CATEGORY, UPDATE_COMMENT, UPDATE_TRANSACTION,
    },
};
use uuid::Uuid;

use crate::app::editor::EditableForm;

pub const TOAST_TTL: Duration = Duration::from_secs(4);

/// Server data as a screen sees it.
#[derive(Debug)]
pub enum Remote<T> {
    Idle,
    /// `previous` is shown while the new data loads.
    Loading { previous: Option<Arc<T>> },
    Ready(Arc<T>),
    Failed(String),
}

impl<T> Default for Remote<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> Remote<T> {
    pub fn from_result(result: Result<Arc<T>, FetchError>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(err) => Self::Failed(err.user_message()),
        }
    }

    pub fn value(&self) -> Option<&Arc<T>> {
        match self {
            Self::Ready(value) | Self::Loading { previous: Some(value) } => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub notice: Notice,
    pub shown_at: Instant,
}

impl Toast {
    pub fn new(notice: Notice) -> Self {
        Self {
            notice,
            shown_at: Instant::now(),
        }
    }

    pub fn expired(&self) -> bool {
        self.shown_at.elapsed() >= TOAST_TTL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogId {
    AddTransaction,
    EditTransaction,
    DeleteTransaction,
    AddCategory,
    EditCategory,
    DeleteCategory,
    AddComment,
    EditComment,
    DeleteComment,
}

impl DialogId {
    pub fn title(self) -> &'static str {
        match self {
            Self::AddTransaction => "Add Transaction",
            Self::EditTransaction => "Edit Transaction",
            Self::DeleteTransaction => "Delete Transaction",
            Self::AddCategory => "Add Category",
            Self::EditCategory => "Edit Category",
            Self::DeleteCategory => "Delete Category",
            Self::AddComment => "Add Comment",
            Self::EditComment => "Edit Comment",
            Self::DeleteComment => "Delete Comment",
        }
    }

    /// Confirmation text of delete dialogs.
    pub fn confirmation(self) -> Option<&'static str> {
        match self {
            Self::DeleteTransaction => Some("Delete this transaction? This cannot be undone."),
            Self::DeleteCategory => Some("Delete this category? This cannot be undone."),
            Self::DeleteComment => Some("Delete this comment?"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum FilterDraft {
    Transactions(TransactionFilterForm),
    Categories(CategoryFilterForm),
}

impl FilterDraft {
    pub fn editor(&self) -> &dyn EditableForm {
        match self {
            Self::Transactions(form) => form,
            Self::Categories(form) => form,
        }
    }

    pub fn editor_mut(&mut self) -> &mut dyn EditableForm {
        match self {
            Self::Transactions(form) => form,
            Self::Categories(form) => form,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub enum Overlay {
    #[default]
    None,
    Help,
    Filter(FilterDraft),
    Dialog(DialogId),
}

impl Overlay {
    /// Overlays that take typed text.
    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Filter(_) | Self::Dialog(_))
    }
}

/// Type-erased access to one dialog, for the parts of the flow that do not
/// need its payload.
pub trait DialogHandle {
    fn is_open(&self) -> bool;
    fn cancel(&mut self);
    fn status(&self) -> &MutationStatus;
    fn errors(&self) -> &ValidationErrors;
    fn editor(&self) -> &dyn EditableForm;
    fn editor_mut(&mut self) -> &mut dyn EditableForm;
    fn settle_unit(&mut self, cache: &QueryCache, result: Result<(), ClientError>) -> Settlement;
}

impl<F: FormModel + EditableForm> DialogHandle for MutationDialog<F> {
    fn is_open(&self) -> bool {
        MutationDialog::is_open(self)
    }

    fn cancel(&mut self) {
        MutationDialog::cancel(self);
    }

    fn status(&self) -> &MutationStatus {
        MutationDialog::status(self)
    }

    fn errors(&self) -> &ValidationErrors {
        MutationDialog::errors(self)
    }

    fn editor(&self) -> &dyn EditableForm {
        self.form()
    }

    fn editor_mut(&mut self) -> &mut dyn EditableForm {
        self.form_mut()
    }

    fn settle_unit(&mut self, cache: &QueryCache, result: Result<(), ClientError>) -> Settlement {
        self.settle(cache, result)
    }
}

#[derive(Debug, Default)]
pub struct DashboardView {
    pub spending: Remote<Vec<CategorySpending>>,
    pub trends: Remote<Vec<MonthlyTrend>>,
}

#[derive(Debug)]
pub struct TransactionsView {
    pub page: Remote<Page<Transaction>>,
    pub selected: usize,
    pub add: MutationDialog<TransactionForm>,
    pub edit: MutationDialog<TransactionForm>,
    pub edit_id: Option<i64>,
    pub delete: MutationDialog<Confirm>,
    pub delete_id: Option<i64>,
}

impl Default for TransactionsView {
    fn default() -> Self {
        Self {
            page: Remote::Idle,
            selected: 0,
            add: MutationDialog::new(CREATE_TRANSACTION),
            edit: MutationDialog::new(UPDATE_TRANSACTION),
            edit_id: None,
            delete: MutationDialog::new(DELETE_TRANSACTION),
            delete_id: None,
        }
    }
}

impl TransactionsView {
    pub fn selected(&self) -> Option<&Transaction> {
        self.page.value()?.items.get(self.selected)
    }
}

#[derive(Debug)]
pub struct CategoriesView {
    pub page: Remote<Page<Category>>,
    pub selected: usize,
    pub add: MutationDialog<CategoryForm>,
    pub edit: MutationDialog<CategoryForm>,
    pub edit_id: Option<i64>,
    pub delete: MutationDialog<Confirm>,
    pub delete_id: Option<i64>,
}

impl Default for CategoriesView {
    fn default() -> Self {
        Self {
            page: Remote::Idle,
            selected: 0,
            add: MutationDialog::new(CREATE_CATEGORY),
            edit: MutationDialog::new(UPDATE_CATEGORY),
            edit_id: None,
            delete: MutationDialog::new(DELETE_CATEGORY),
            delete_id: None,
        }
    }
}

impl CategoriesView {
    pub fn selected(&self) -> Option<&Category> {
        self.page.value()?.items.get(self.selected)
    }
}

#[derive(Debug)]
pub struct ItemDetail {
    pub item: Item,
    pub comments: Remote<Page<Comment>>,
    pub selected: usize,
}

impl ItemDetail {
    pub fn new(item: Item) -> Self {
        Self {
            item,
            comments: Remote::Idle,
            selected: 0,
        }
    }

    pub fn selected(&self) -> Option<&Comment> {
        self.comments.value()?.items.get(self.selected)
    }
}

/// Comment dialogs live here rather than on the detail so a request that
/// settles after the detail closed still invalidates.
#[derive(Debug)]
pub struct ItemsView {
    pub page: Remote<Page<Item>>,
    pub selected: usize,
    pub detail: Option<ItemDetail>,
    pub add: MutationDialog<CommentForm>,
    pub edit: MutationDialog<CommentForm>,
    pub edit_id: Option<Uuid>,
    pub delete: MutationDialog<Confirm>,
    pub delete_id: Option<Uuid>,
}

impl Default for ItemsView {
    fn default() -> Self {
        Self {
            page: Remote::Idle,
            selected: 0,
            detail: None,
            add: MutationDialog::new(CREATE_COMMENT),
            edit: MutationDialog::new(UPDATE_COMMENT),
            edit_id: None,
            delete: MutationDialog::new(DELETE_COMMENT),
            delete_id: None,
        }
    }
}

impl ItemsView {
    pub fn selected(&self) -> Option<&Item> {
        self.page.value()?.items.get(self.selected)
    }
}

#[derive(Debug)]
pub struct AppState {
    pub history: History,
    pub base_url: String,
    pub page_size: u64,
    pub items_page_size: u64,
    pub dashboard: DashboardView,
    pub transactions: TransactionsView,
    pub categories: CategoriesView,
    /// Every category, for pickers and name lookups.
    pub category_lookup: Remote<Page<Category>>,
    pub items: ItemsView,
    pub current_user: Remote<User>,
    pub insights: Remote<BehaviorInsights>,
    pub overlay: Overlay,
    /// Focused field of the open filter or dialog.
    pub focus: usize,
    pub toast: Option<Toast>,
}

impl AppState {
    pub fn new(start: Route, base_url: String, page_size: u64, items_page_size: u64) -> Self {
        Self {
            history: History::new(start),
            base_url,
            page_size,
            items_page_size,
            dashboard: DashboardView::default(),
            transactions: TransactionsView::default(),
            categories: CategoriesView::default(),
            category_lookup: Remote::Idle,
            items: ItemsView::default(),
            current_user: Remote::Idle,
            insights: Remote::Idle,
            overlay: Overlay::None,
            focus: 0,
            toast: None,
        }
    }

    pub fn route(&self) -> &Route {
        self.history.current()
    }

    pub fn categories_for_pickers(&self) -> &[Category] {
        self.category_lookup
            .value()
            .map(|page| page.items.as_slice())
            .unwrap_or_default()
    }

    pub fn category_name(&self, id: i64) -> Option<&str> {
        self.categories_for_pickers()
            .iter()
            .find(|category| category.id == id)
            .map(|category| category.name.as_str())
    }

    pub fn dialog(&self, id: DialogId) -> &dyn DialogHandle {
        match id {
            DialogId::AddTransaction => &self.transactions.add,
            DialogId::EditTransaction => &self.transactions.edit,
            DialogId::DeleteTransaction => &self.transactions.delete,
            DialogId::AddCategory => &self.categories.add,
            DialogId::EditCategory => &self.categories.edit,
            DialogId::DeleteCategory => &self.categories.delete,
            DialogId::AddComment => &self.items.add,
            DialogId::EditComment => &self.items.edit,
            DialogId::DeleteComment => &self.items.delete,
        }
    }

    pub fn dialog_mut(&mut self, id: DialogId) -> &mut dyn DialogHandle {
        match id {
            DialogId::AddTransaction => &mut self.transactions.add,
            DialogId::EditTransaction => &mut self.transactions.edit,
            DialogId::DeleteTransaction => &mut self.transactions.delete,
            DialogId::AddCategory => &mut self.categories.add,
            DialogId::EditCategory => &mut self.categories.edit,
            DialogId::DeleteCategory => &mut self.categories.delete,
            DialogId::AddComment => &mut self.items.add,
            DialogId::EditComment => &mut self.items.edit,
            DialogId::DeleteComment => &mut self.items.delete,
        }
    }

    /// The form the keyboard currently edits, with the category lookup its
    /// choice fields cycle through.
    pub fn editing_mut(&mut self) -> Option<(&mut dyn EditableForm, &[Category])> {
        let categories = self
            .category_lookup
            .value()
            .map(|page| page.items.as_slice())
            .unwrap_or_default();
        match &mut self.overlay {
            Overlay::Filter(draft) => Some((draft.editor_mut(), categories)),
            Overlay::Dialog(id) => {
                let id = *id;
                let dialog: &mut dyn DialogHandle = match id {
                    DialogId::AddTransaction => &mut self.transactions.add,
                    DialogId::EditTransaction => &mut self.transactions.edit,
                    DialogId::DeleteTransaction => &mut self.transactions.delete,
                    DialogId::AddCategory => &mut self.categories.add,
                    DialogId::EditCategory => &mut self.categories.edit,
                    DialogId::DeleteCategory => &mut self.categories.delete,
                    DialogId::AddComment => &mut self.items.add,
                    DialogId::EditComment => &mut self.items.edit,
                    DialogId::DeleteComment => &mut self.items.delete,
                };
                Some((dialog.editor_mut(), categories))
            }
            Overlay::None | Overlay::Help => None,
        }
    }

    pub fn notify(&mut self, notice: Notice) {
        self.toast = Some(Toast::new(notice));
    }
}
