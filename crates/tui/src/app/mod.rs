mod editor;
mod state;

use std::{future::Future, sync::Arc, time::Duration};

use api_types::{
    category::{Category, CategoryUpdate},
    comment::{Comment, CommentCreate, CommentUpdate},
    item::Item,
    page::Page,
    stats::{BehaviorInsights, CategorySpending, MonthlyTrend},
    transaction::{Transaction, TransactionUpdate},
    user::User,
};
use budget_client::{
    Client, ClientError, FetchError, ListState, MutationDialog, Notice, QueryCache, QueryClient,
    QueryKey, Resource, Route,
    forms::{CategoryFilterForm, CategoryForm, CommentForm, FormModel, TransactionFilterForm, TransactionForm},
    mutation::SubmitError,
    queries::{
        all_categories_key, category_spending_key, comments_key, list_key, monthly_trends_key,
    },
    query::page_count,
};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    config::AppConfig,
    error::{AppError, Result},
    ui::{
        self,
        keymap::{AppAction, InputMode, map_key},
    },
};

pub use editor::{EditableForm, FieldKind, FieldView};
pub use state::{
    AppState, DialogHandle, DialogId, FilterDraft, ItemDetail, Overlay, Remote, Toast,
};

type QueryResult<T> = std::result::Result<Arc<T>, FetchError>;

/// Results of background work, delivered to the UI loop.
#[derive(Debug)]
pub(crate) enum Msg {
    Transactions {
        state: ListState,
        result: QueryResult<Page<Transaction>>,
    },
    Categories {
        state: ListState,
        result: QueryResult<Page<Category>>,
    },
    CategoryLookup(QueryResult<Page<Category>>),
    Items {
        state: ListState,
        result: QueryResult<Page<Item>>,
    },
    Comments {
        item_id: Uuid,
        result: QueryResult<Page<Comment>>,
    },
    CurrentUser(QueryResult<User>),
    CategorySpending(QueryResult<Vec<CategorySpending>>),
    MonthlyTrends(QueryResult<Vec<MonthlyTrend>>),
    Insights(QueryResult<BehaviorInsights>),
    Settled {
        dialog: DialogId,
        result: std::result::Result<(), ClientError>,
    },
}

/// Routes reachable from the tab bar, in tab order.
pub fn tab_route(index: usize) -> Option<Route> {
    match index {
        0 => Some(Route::Dashboard),
        1 => Some(Route::Transactions(ListState::new())),
        2 => Some(Route::Categories(ListState::new())),
        3 => Some(Route::Items(ListState::new())),
        4 => Some(Route::Analytics),
        _ => None,
    }
}

/// Shows a cached value right away, or marks the slot loading and asks the
/// caller to fetch. Stale entries stay on screen while they refresh.
fn begin_load<T: Send + Sync + 'static>(
    cache: &QueryCache,
    key: &QueryKey,
    slot: &mut Remote<T>,
) -> bool {
    match cache.get::<T>(key) {
        Some(entry) if !entry.stale => {
            *slot = Remote::Ready(entry.value);
            false
        }
        stale => {
            let previous = stale
                .map(|entry| entry.value)
                .or_else(|| slot.value().cloned())
                .or_else(|| cache.latest::<T>(key.resource()).map(|entry| entry.value));
            *slot = Remote::Loading { previous };
            true
        }
    }
}

fn log_failure<T>(what: &'static str, result: &QueryResult<T>) {
    if let Err(err) = result {
        warn!(query = what, error = %err, "query failed");
    }
}

fn clamp_selection<T>(selected: &mut usize, remote: &Remote<Page<T>>) {
    let len = remote.value().map_or(0, |page| page.items.len());
    *selected = (*selected).min(len.saturating_sub(1));
}

fn step_selection(selected: &mut usize, len: usize, down: bool) {
    if len == 0 {
        *selected = 0;
    } else if down {
        *selected = (*selected + 1).min(len - 1);
    } else {
        *selected = selected.saturating_sub(1);
    }
}

fn begin<F: FormModel>(
    dialog: &mut MutationDialog<F>,
    toast: &mut Option<Toast>,
) -> Option<F::Payload> {
    match dialog.begin() {
        Ok(payload) => Some(payload),
        Err(SubmitError::Busy) => {
            *toast = Some(Toast::new(Notice::info("Still saving, please wait.")));
            None
        }
        Err(err) => {
            debug!(error = %err, "submit rejected");
            None
        }
    }
}

pub struct App {
    queries: QueryClient,
    pub state: AppState,
    tx: UnboundedSender<Msg>,
    rx: UnboundedReceiver<Msg>,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Client::builder(config.base_url.clone())
            .token(config.token.clone())
            .timeout(config.request_timeout())
            .build()?;
        let cache = Arc::new(QueryCache::with_stale_after(config.stale_after()));
        let queries = QueryClient::new(client, cache)
            .with_page_sizes(config.page_size, config.items_page_size);

        let start = Route::parse(&config.location);
        let state = AppState::new(
            start,
            config.base_url.clone(),
            queries.page_size(),
            queries.items_page_size(),
        );
        let (tx, rx) = mpsc::unbounded_channel();

        Ok(Self {
            queries,
            state,
            tx,
            rx,
            should_quit: false,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        self.load_current();
        let result = self.event_loop(&mut terminal);
        ui::restore_terminal(&mut terminal)?;
        result
    }

    fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(100);

        while !self.should_quit {
            self.drain_messages();
            if self.state.toast.as_ref().is_some_and(Toast::expired) {
                self.state.toast = None;
            }

            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key(key);
            }
        }

        Ok(())
    }

    fn drain_messages(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            self.apply(msg);
        }
    }

    fn spawn(&self, work: impl Future<Output = Msg> + Send + 'static) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            if tx.send(work.await).is_err() {
                debug!("ui loop closed, dropping result");
            }
        });
    }

    fn spawn_mutation(
        &self,
        dialog: DialogId,
        request: impl Future<Output = std::result::Result<(), ClientError>> + Send + 'static,
    ) {
        info!(dialog = ?dialog, "submitting");
        self.spawn(async move {
            Msg::Settled {
                dialog,
                result: request.await,
            }
        });
    }

    fn apply(&mut self, msg: Msg) {
        match msg {
            Msg::Transactions { state, result } => {
                log_failure("transactions", &result);
                if matches!(self.state.route(), Route::Transactions(current) if *current == state) {
                    let view = &mut self.state.transactions;
                    view.page = Remote::from_result(result);
                    clamp_selection(&mut view.selected, &view.page);
                } else {
                    debug!(query = %state.serialize(), "superseded transactions page kept in cache only");
                }
            }
            Msg::Categories { state, result } => {
                log_failure("categories", &result);
                if matches!(self.state.route(), Route::Categories(current) if *current == state) {
                    let view = &mut self.state.categories;
                    view.page = Remote::from_result(result);
                    clamp_selection(&mut view.selected, &view.page);
                }
            }
            Msg::CategoryLookup(result) => {
                log_failure("category lookup", &result);
                self.state.category_lookup = Remote::from_result(result);
            }
            Msg::Items { state, result } => {
                log_failure("items", &result);
                if matches!(self.state.route(), Route::Items(current) if *current == state) {
                    let view = &mut self.state.items;
                    view.page = Remote::from_result(result);
                    clamp_selection(&mut view.selected, &view.page);
                }
            }
            Msg::Comments { item_id, result } => {
                log_failure("comments", &result);
                if let Some(detail) = self.state.items.detail.as_mut()
                    && detail.item.id == item_id
                {
                    detail.comments = Remote::from_result(result);
                    clamp_selection(&mut detail.selected, &detail.comments);
                }
            }
            Msg::CurrentUser(result) => {
                log_failure("current user", &result);
                self.state.current_user = Remote::from_result(result);
            }
            Msg::CategorySpending(result) => {
                log_failure("category spending", &result);
                self.state.dashboard.spending = Remote::from_result(result);
            }
            Msg::MonthlyTrends(result) => {
                log_failure("monthly trends", &result);
                self.state.dashboard.trends = Remote::from_result(result);
            }
            Msg::Insights(result) => {
                log_failure("behavior insights", &result);
                self.state.insights = Remote::from_result(result);
            }
            Msg::Settled { dialog, result } => {
                let cache = Arc::clone(self.queries.cache());
                let settlement = self.state.dialog_mut(dialog).settle_unit(&cache, result);
                if settlement.closed
                    && matches!(self.state.overlay, Overlay::Dialog(open) if open == dialog)
                {
                    self.state.overlay = Overlay::None;
                }
                self.state.notify(settlement.notice);
                self.load_current();
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let mode = if self.state.overlay.is_editing() {
            InputMode::Edit
        } else {
            InputMode::Browse
        };
        let action = map_key(key, mode);
        match mode {
            InputMode::Browse => self.handle_browse(action),
            InputMode::Edit => self.handle_form(action),
        }
    }

    fn handle_browse(&mut self, action: AppAction) {
        if matches!(self.state.overlay, Overlay::Help) {
            match action {
                AppAction::Quit => self.should_quit = true,
                AppAction::Help | AppAction::Cancel => self.state.overlay = Overlay::None,
                _ => {}
            }
            return;
        }

        match action {
            AppAction::Quit => self.should_quit = true,
            AppAction::Help => self.state.overlay = Overlay::Help,
            AppAction::Tab(index) => {
                if let Some(route) = tab_route(index)
                    && !route.same_screen(self.state.route())
                {
                    self.navigate(route);
                }
            }
            AppAction::Back => {
                if self.state.items.detail.is_some() {
                    self.state.items.detail = None;
                } else if self.state.history.back().is_some() {
                    self.on_route_changed();
                }
            }
            AppAction::Refresh => self.refresh(),
            AppAction::NextPage => self.turn_page(true),
            AppAction::PrevPage => self.turn_page(false),
            AppAction::Up => self.move_selection(false),
            AppAction::Down => self.move_selection(true),
            AppAction::Filter => self.open_filter(),
            AppAction::Add => self.open_add(),
            AppAction::Edit => self.open_edit(),
            AppAction::Delete => self.open_delete(),
            AppAction::Open => self.open_detail(),
            AppAction::Cancel => self.state.items.detail = None,
            _ => {}
        }
    }

    fn handle_form(&mut self, action: AppAction) {
        let focus = self.state.focus;
        match action {
            AppAction::Quit => self.should_quit = true,
            AppAction::Cancel => self.close_overlay(),
            AppAction::NextField | AppAction::PrevField => {
                let count = self.field_count();
                if count > 0 {
                    self.state.focus = if action == AppAction::NextField {
                        (focus + 1) % count
                    } else {
                        (focus + count - 1) % count
                    };
                }
            }
            AppAction::CycleNext | AppAction::CyclePrev => {
                if let Some((form, categories)) = self.state.editing_mut() {
                    form.cycle(focus, action == AppAction::CycleNext, categories);
                }
            }
            AppAction::Input(ch) => {
                if let Some((form, _)) = self.state.editing_mut() {
                    form.input(focus, ch);
                }
            }
            AppAction::Backspace => {
                if let Some((form, _)) = self.state.editing_mut() {
                    form.backspace(focus);
                }
            }
            AppAction::Submit => match self.state.overlay {
                Overlay::Filter(_) => self.apply_filter(),
                Overlay::Dialog(id) => self.submit_dialog(id),
                Overlay::None | Overlay::Help => {}
            },
            AppAction::ResetFilters => self.reset_filters(),
            _ => {}
        }
    }

    fn field_count(&self) -> usize {
        let categories = self.state.categories_for_pickers();
        match &self.state.overlay {
            Overlay::Filter(draft) => draft.editor().fields(categories).len(),
            Overlay::Dialog(id) => self.state.dialog(*id).editor().fields(categories).len(),
            Overlay::None | Overlay::Help => 0,
        }
    }

    fn close_overlay(&mut self) {
        if let Overlay::Dialog(id) = self.state.overlay {
            self.state.dialog_mut(id).cancel();
        }
        self.state.overlay = Overlay::None;
    }

    fn navigate(&mut self, route: Route) {
        if self.state.history.push(route) {
            self.on_route_changed();
        }
    }

    fn on_route_changed(&mut self) {
        info!(location = %self.state.route(), "navigated");
        self.state.overlay = Overlay::None;
        self.state.items.detail = None;
        self.state.transactions.selected = 0;
        self.state.categories.selected = 0;
        self.state.items.selected = 0;
        self.load_current();
    }

    /// Loads whatever the current screen shows.
    fn load_current(&mut self) {
        match self.state.route().clone() {
            Route::Dashboard => {
                self.load_category_spending();
                self.load_monthly_trends();
            }
            Route::Transactions(list) => {
                self.load_transactions(list);
                self.load_category_lookup();
            }
            Route::Categories(list) => self.load_categories(list),
            Route::Items(list) => {
                self.load_items(list);
                if let Some(item_id) = self.state.items.detail.as_ref().map(|d| d.item.id) {
                    self.load_comments(item_id);
                    self.load_current_user();
                }
            }
            Route::Analytics => self.load_insights(),
        }
    }

    fn refresh(&mut self) {
        let resources: &[Resource] = match self.state.route() {
            Route::Dashboard => &[Resource::CategorySpending, Resource::MonthlyTrends],
            Route::Transactions(_) => &[Resource::Transactions],
            Route::Categories(_) => &[Resource::Categories],
            Route::Items(_) if self.state.items.detail.is_some() => {
                &[Resource::Items, Resource::Comments, Resource::CurrentUser]
            }
            Route::Items(_) => &[Resource::Items],
            Route::Analytics => &[Resource::BehaviorInsights],
        };
        for resource in resources {
            self.queries.cache().invalidate(*resource);
        }
        self.load_current();
    }

    fn load_transactions(&mut self, list: ListState) {
        let key = list_key(Resource::Transactions, &list);
        let view = &mut self.state.transactions;
        let fetch = begin_load(self.queries.cache(), &key, &mut view.page);
        clamp_selection(&mut view.selected, &view.page);
        if fetch {
            let queries = self.queries.clone();
            self.spawn(async move {
                let result = queries.transactions(&list).await;
                Msg::Transactions {
                    state: list,
                    result,
                }
            });
        }
    }

    fn load_categories(&mut self, list: ListState) {
        let key = list_key(Resource::Categories, &list);
        let view = &mut self.state.categories;
        let fetch = begin_load(self.queries.cache(), &key, &mut view.page);
        clamp_selection(&mut view.selected, &view.page);
        if fetch {
            let queries = self.queries.clone();
            self.spawn(async move {
                let result = queries.categories(&list).await;
                Msg::Categories {
                    state: list,
                    result,
                }
            });
        }
    }

    fn load_category_lookup(&mut self) {
        if begin_load(
            self.queries.cache(),
            &all_categories_key(),
            &mut self.state.category_lookup,
        ) {
            let queries = self.queries.clone();
            self.spawn(async move { Msg::CategoryLookup(queries.all_categories().await) });
        }
    }

    fn load_items(&mut self, list: ListState) {
        let key = list_key(Resource::Items, &list);
        let view = &mut self.state.items;
        let fetch = begin_load(self.queries.cache(), &key, &mut view.page);
        clamp_selection(&mut view.selected, &view.page);
        if fetch {
            let queries = self.queries.clone();
            self.spawn(async move {
                let result = queries.items(&list).await;
                Msg::Items {
                    state: list,
                    result,
                }
            });
        }
    }

    fn load_comments(&mut self, item_id: Uuid) {
        let Some(detail) = self.state.items.detail.as_mut() else {
            return;
        };
        let fetch = begin_load(self.queries.cache(), &comments_key(item_id), &mut detail.comments);
        clamp_selection(&mut detail.selected, &detail.comments);
        if fetch {
            let queries = self.queries.clone();
            self.spawn(async move {
                let result = queries.comments(item_id).await;
                Msg::Comments { item_id, result }
            });
        }
    }

    fn load_current_user(&mut self) {
        let key = QueryKey::new(Resource::CurrentUser);
        if begin_load(self.queries.cache(), &key, &mut self.state.current_user) {
            let queries = self.queries.clone();
            self.spawn(async move { Msg::CurrentUser(queries.current_user().await) });
        }
    }

    fn load_category_spending(&mut self) {
        if begin_load(
            self.queries.cache(),
            &category_spending_key(),
            &mut self.state.dashboard.spending,
        ) {
            let queries = self.queries.clone();
            self.spawn(async move { Msg::CategorySpending(queries.category_spending().await) });
        }
    }

    fn load_monthly_trends(&mut self) {
        if begin_load(
            self.queries.cache(),
            &monthly_trends_key(),
            &mut self.state.dashboard.trends,
        ) {
            let queries = self.queries.clone();
            self.spawn(async move { Msg::MonthlyTrends(queries.monthly_trends().await) });
        }
    }

    fn load_insights(&mut self) {
        let key = QueryKey::new(Resource::BehaviorInsights);
        if begin_load(self.queries.cache(), &key, &mut self.state.insights) {
            let queries = self.queries.clone();
            self.spawn(async move { Msg::Insights(queries.behavior_insights().await) });
        }
    }

    fn turn_page(&mut self, forward: bool) {
        if self.state.items.detail.is_some() {
            return;
        }
        let route = self.state.route().clone();
        let Some(list) = route.list_state() else {
            return;
        };
        let (total, page_size) = match &route {
            Route::Transactions(_) => (
                self.state.transactions.page.value().map(|page| page.total),
                self.state.page_size,
            ),
            Route::Categories(_) => (
                self.state.categories.page.value().map(|page| page.total),
                self.state.page_size,
            ),
            Route::Items(_) => (
                self.state.items.page.value().map(|page| page.total),
                self.state.items_page_size,
            ),
            Route::Dashboard | Route::Analytics => return,
        };

        let page = list.page();
        let next = if forward {
            match total {
                Some(total) if u64::from(page) < page_count(total, page_size) => page + 1,
                _ => return,
            }
        } else if page > 1 {
            page - 1
        } else {
            return;
        };
        self.navigate(route.with_list_state(list.with_page(next)));
    }

    fn move_selection(&mut self, down: bool) {
        let items = &mut self.state.items;
        if let Some(detail) = items.detail.as_mut() {
            let len = detail.comments.value().map_or(0, |page| page.items.len());
            step_selection(&mut detail.selected, len, down);
            return;
        }
        match self.state.history.current() {
            Route::Transactions(_) => {
                let view = &mut self.state.transactions;
                let len = view.page.value().map_or(0, |page| page.items.len());
                step_selection(&mut view.selected, len, down);
            }
            Route::Categories(_) => {
                let view = &mut self.state.categories;
                let len = view.page.value().map_or(0, |page| page.items.len());
                step_selection(&mut view.selected, len, down);
            }
            Route::Items(_) => {
                let len = items.page.value().map_or(0, |page| page.items.len());
                step_selection(&mut items.selected, len, down);
            }
            Route::Dashboard | Route::Analytics => {}
        }
    }

    fn open_filter(&mut self) {
        let draft = match self.state.route() {
            Route::Transactions(list) => {
                FilterDraft::Transactions(TransactionFilterForm::from_state(list))
            }
            Route::Categories(list) => FilterDraft::Categories(CategoryFilterForm::from_state(list)),
            _ => return,
        };
        if matches!(draft, FilterDraft::Transactions(_)) {
            self.load_category_lookup();
        }
        self.state.overlay = Overlay::Filter(draft);
        self.state.focus = 0;
    }

    fn apply_filter(&mut self) {
        let Overlay::Filter(draft) = std::mem::take(&mut self.state.overlay) else {
            return;
        };
        let route = self.state.route().clone();
        let next = match (&draft, &route) {
            (FilterDraft::Transactions(form), Route::Transactions(list)) => {
                route.with_list_state(form.apply(list))
            }
            (FilterDraft::Categories(form), Route::Categories(list)) => {
                route.with_list_state(form.apply(list))
            }
            _ => return,
        };
        self.navigate(next);
    }

    fn reset_filters(&mut self) {
        let reset = match &self.state.overlay {
            Overlay::Filter(FilterDraft::Transactions(_)) => {
                FilterDraft::Transactions(TransactionFilterForm::default())
            }
            Overlay::Filter(FilterDraft::Categories(_)) => {
                FilterDraft::Categories(CategoryFilterForm::default())
            }
            _ => return,
        };
        self.state.overlay = Overlay::Filter(reset);
        self.apply_filter();
    }

    fn open_dialog(&mut self, id: DialogId) {
        self.state.overlay = Overlay::Dialog(id);
        self.state.focus = 0;
    }

    fn open_add(&mut self) {
        match self.state.route() {
            Route::Transactions(_) => {
                self.load_category_lookup();
                self.state.transactions.add.open();
                self.open_dialog(DialogId::AddTransaction);
            }
            Route::Categories(_) => {
                self.state.categories.add.open();
                self.open_dialog(DialogId::AddCategory);
            }
            Route::Items(_) if self.state.items.detail.is_some() => {
                self.state.items.add.open();
                self.open_dialog(DialogId::AddComment);
            }
            _ => {}
        }
    }

    fn open_edit(&mut self) {
        match self.state.route() {
            Route::Transactions(_) => {
                let Some(tx) = self.state.transactions.selected().cloned() else {
                    return;
                };
                self.load_category_lookup();
                let view = &mut self.state.transactions;
                view.edit.open_with(TransactionForm::from(&tx));
                view.edit_id = Some(tx.id);
                self.open_dialog(DialogId::EditTransaction);
            }
            Route::Categories(_) => {
                let Some(category) = self.state.categories.selected().cloned() else {
                    return;
                };
                let view = &mut self.state.categories;
                view.edit.open_with(CategoryForm::from(&category));
                view.edit_id = Some(category.id);
                self.open_dialog(DialogId::EditCategory);
            }
            Route::Items(_) => {
                let Some(comment) = self.own_selected_comment() else {
                    return;
                };
                let view = &mut self.state.items;
                view.edit.open_with(CommentForm {
                    content: comment.content.clone(),
                });
                view.edit_id = Some(comment.id);
                self.open_dialog(DialogId::EditComment);
            }
            Route::Dashboard | Route::Analytics => {}
        }
    }

    fn open_delete(&mut self) {
        match self.state.route() {
            Route::Transactions(_) => {
                let Some(id) = self.state.transactions.selected().map(|tx| tx.id) else {
                    return;
                };
                self.state.transactions.delete.open();
                self.state.transactions.delete_id = Some(id);
                self.open_dialog(DialogId::DeleteTransaction);
            }
            Route::Categories(_) => {
                let Some(id) = self.state.categories.selected().map(|c| c.id) else {
                    return;
                };
                self.state.categories.delete.open();
                self.state.categories.delete_id = Some(id);
                self.open_dialog(DialogId::DeleteCategory);
            }
            Route::Items(_) => {
                let Some(comment) = self.own_selected_comment() else {
                    return;
                };
                self.state.items.delete.open();
                self.state.items.delete_id = Some(comment.id);
                self.open_dialog(DialogId::DeleteComment);
            }
            Route::Dashboard | Route::Analytics => {}
        }
    }

    /// The selected comment of the open item, if the current user wrote it.
    fn own_selected_comment(&mut self) -> Option<Comment> {
        let comment = self.state.items.detail.as_ref()?.selected()?.clone();
        let is_author = self
            .state
            .current_user
            .value()
            .is_some_and(|user| comment.is_authored_by(user.id));
        if is_author {
            Some(comment)
        } else {
            self.state
                .notify(Notice::info("Only the author can change this comment."));
            None
        }
    }

    fn open_detail(&mut self) {
        if !matches!(self.state.route(), Route::Items(_)) || self.state.items.detail.is_some() {
            return;
        }
        let Some(item) = self.state.items.selected().cloned() else {
            return;
        };
        let item_id = item.id;
        self.state.items.detail = Some(ItemDetail::new(item));
        self.load_comments(item_id);
        self.load_current_user();
    }

    fn submit_dialog(&mut self, id: DialogId) {
        let client = self.queries.client().clone();
        let state = &mut self.state;
        match id {
            DialogId::AddTransaction => {
                let Some(payload) = begin(&mut state.transactions.add, &mut state.toast) else {
                    return;
                };
                self.spawn_mutation(id, async move {
                    client.transaction_create(&payload).await.map(drop)
                });
            }
            DialogId::EditTransaction => {
                let Some(tx_id) = state.transactions.edit_id else {
                    return;
                };
                let Some(payload) = begin(&mut state.transactions.edit, &mut state.toast) else {
                    return;
                };
                let update = TransactionUpdate::from(payload);
                self.spawn_mutation(id, async move {
                    client.transaction_update(tx_id, &update).await.map(drop)
                });
            }
            DialogId::DeleteTransaction => {
                let Some(tx_id) = state.transactions.delete_id else {
                    return;
                };
                if begin(&mut state.transactions.delete, &mut state.toast).is_none() {
                    return;
                }
                self.spawn_mutation(id, async move { client.transaction_delete(tx_id).await });
            }
            DialogId::AddCategory => {
                let Some(payload) = begin(&mut state.categories.add, &mut state.toast) else {
                    return;
                };
                self.spawn_mutation(id, async move {
                    client.category_create(&payload).await.map(drop)
                });
            }
            DialogId::EditCategory => {
                let Some(category_id) = state.categories.edit_id else {
                    return;
                };
                let Some(payload) = begin(&mut state.categories.edit, &mut state.toast) else {
                    return;
                };
                let update = CategoryUpdate::from(payload);
                self.spawn_mutation(id, async move {
                    client.category_update(category_id, &update).await.map(drop)
                });
            }
            DialogId::DeleteCategory => {
                let Some(category_id) = state.categories.delete_id else {
                    return;
                };
                if begin(&mut state.categories.delete, &mut state.toast).is_none() {
                    return;
                }
                self.spawn_mutation(id, async move { client.category_delete(category_id).await });
            }
            DialogId::AddComment => {
                let Some(item_id) = state.items.detail.as_ref().map(|d| d.item.id) else {
                    return;
                };
                let Some(content) = begin(&mut state.items.add, &mut state.toast) else {
                    return;
                };
                let payload = CommentCreate { item_id, content };
                self.spawn_mutation(id, async move {
                    client.comment_create(&payload).await.map(drop)
                });
            }
            DialogId::EditComment => {
                let Some(comment_id) = state.items.edit_id else {
                    return;
                };
                let Some(content) = begin(&mut state.items.edit, &mut state.toast) else {
                    return;
                };
                let payload = CommentUpdate { content };
                self.spawn_mutation(id, async move {
                    client.comment_update(comment_id, &payload).await.map(drop)
                });
            }
            DialogId::DeleteComment => {
                let Some(comment_id) = state.items.delete_id else {
                    return;
                };
                if begin(&mut state.items.delete, &mut state.toast).is_none() {
                    return;
                }
                self.spawn_mutation(id, async move { client.comment_delete(comment_id).await });
            }
        }
    }
}
