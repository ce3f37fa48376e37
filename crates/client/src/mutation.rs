//! Create/update/delete lifecycle shared by every dialog.
//!
//! `idle -> pending -> (success | error)`. There is no separate settled
//! status: leaving `Pending` for `Success` or `Error` is the settle step, and
//! it always invalidates the affected resources, whatever the outcome. Only one mutation per dialog can
//! be pending and there is no queue.

use std::future::Future;

use tracing::{info, warn};

use crate::{
    cache::QueryCache,
    error::{ClientError, ValidationErrors},
    forms::FormModel,
    resource::Resource,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DialogState {
    #[default]
    Closed,
    Open,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum MutationStatus {
    #[default]
    Idle,
    Pending,
    Success,
    Error(String),
}

impl MutationStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, MutationStatus::Pending)
    }

    /// Success and error are both settled outcomes.
    pub fn is_settled(&self) -> bool {
        matches!(self, MutationStatus::Success | MutationStatus::Error(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A transient user notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// What a mutation is called, what it says on success and which resources
/// it makes stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MutationSpec {
    pub name: &'static str,
    pub success_message: &'static str,
    pub invalidates: &'static [Resource],
}

const TRANSACTION_RESOURCES: &[Resource] = &[
    Resource::Transactions,
    Resource::CategorySpending,
    Resource::MonthlyTrends,
];

pub const CREATE_TRANSACTION: MutationSpec = MutationSpec {
    name: "create-transaction",
    success_message: "Transaction created successfully.",
    invalidates: TRANSACTION_RESOURCES,
};

pub const UPDATE_TRANSACTION: MutationSpec = MutationSpec {
    name: "update-transaction",
    success_message: "Transaction updated successfully.",
    invalidates: TRANSACTION_RESOURCES,
};

pub const DELETE_TRANSACTION: MutationSpec = MutationSpec {
    name: "delete-transaction",
    success_message: "Transaction deleted successfully.",
    invalidates: TRANSACTION_RESOURCES,
};

pub const CREATE_CATEGORY: MutationSpec = MutationSpec {
    name: "create-category",
    success_message: "Category created successfully.",
    invalidates: &[Resource::Categories],
};

pub const UPDATE_CATEGORY: MutationSpec = MutationSpec {
    name: "update-category",
    success_message: "Category updated successfully.",
    invalidates: &[Resource::Categories],
};

pub const DELETE_CATEGORY: MutationSpec = MutationSpec {
    name: "delete-category",
    success_message: "Category deleted successfully.",
    invalidates: &[Resource::Categories],
};

pub const CREATE_COMMENT: MutationSpec = MutationSpec {
    name: "create-comment",
    success_message: "Comment added successfully.",
    invalidates: &[Resource::Comments],
};

pub const UPDATE_COMMENT: MutationSpec = MutationSpec {
    name: "update-comment",
    success_message: "Comment updated successfully.",
    invalidates: &[Resource::Comments],
};

pub const DELETE_COMMENT: MutationSpec = MutationSpec {
    name: "delete-comment",
    success_message: "Comment deleted successfully.",
    invalidates: &[Resource::Comments],
};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("a submission is already in flight")]
    Busy,
    #[error("the dialog is closed")]
    Closed,
    #[error("form is invalid: {0}")]
    Invalid(ValidationErrors),
}

/// What settling did, for the caller to render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub notice: Notice,
    /// Each invalidated resource with the number of entries dropped.
    pub invalidated: Vec<(Resource, usize)>,
    pub closed: bool,
}

impl Settlement {
    pub fn succeeded(&self) -> bool {
        self.notice.level == NoticeLevel::Success
    }
}

/// One dialog instance: its open state, its form and its mutation status.
#[derive(Clone, Debug)]
pub struct MutationDialog<F: FormModel> {
    spec: MutationSpec,
    state: DialogState,
    status: MutationStatus,
    form: F,
    errors: ValidationErrors,
}

impl<F: FormModel> MutationDialog<F> {
    pub fn new(spec: MutationSpec) -> Self {
        Self {
            spec,
            state: DialogState::Closed,
            status: MutationStatus::Idle,
            form: F::default(),
            errors: ValidationErrors::default(),
        }
    }

    pub fn spec(&self) -> &MutationSpec {
        &self.spec
    }

    /// Opens with a fresh form.
    pub fn open(&mut self) {
        self.open_with(F::default());
    }

    /// Opens prefilled, e.g. with the entity being edited.
    pub fn open_with(&mut self, form: F) {
        self.state = DialogState::Open;
        self.form = form;
        self.errors = ValidationErrors::default();
        if !self.status.is_pending() {
            self.status = MutationStatus::Idle;
        }
    }

    /// Closes the dialog. A pending request is not aborted; it still settles.
    pub fn cancel(&mut self) {
        self.state = DialogState::Closed;
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == DialogState::Open
    }

    pub fn status(&self) -> &MutationStatus {
        &self.status
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut F {
        &mut self.form
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn can_submit(&self) -> bool {
        self.is_open() && !self.status.is_pending()
    }

    /// Validates and enters `pending`. Invalid forms stay `idle` and never
    /// reach the network.
    pub fn begin(&mut self) -> Result<F::Payload, SubmitError> {
        if self.status.is_pending() {
            return Err(SubmitError::Busy);
        }
        if !self.is_open() {
            return Err(SubmitError::Closed);
        }
        match self.form.validate() {
            Ok(payload) => {
                self.errors = ValidationErrors::default();
                self.status = MutationStatus::Pending;
                Ok(payload)
            }
            Err(errors) => {
                self.errors = errors.clone();
                self.status = MutationStatus::Idle;
                Err(SubmitError::Invalid(errors))
            }
        }
    }

    /// Records the outcome of the request started by [`begin`](Self::begin)
    /// and invalidates the affected resources.
    pub fn settle<T>(&mut self, cache: &QueryCache, result: Result<T, ClientError>) -> Settlement {
        let notice = match result {
            Ok(_) => {
                info!(mutation = self.spec.name, "mutation succeeded");
                self.status = MutationStatus::Success;
                self.form = F::default();
                self.state = DialogState::Closed;
                Notice::success(self.spec.success_message)
            }
            Err(err) => {
                warn!(mutation = self.spec.name, error = %err, "mutation failed");
                let message = err.user_message();
                self.status = MutationStatus::Error(message.clone());
                Notice::error(message)
            }
        };

        let invalidated = self
            .spec
            .invalidates
            .iter()
            .map(|resource| (*resource, cache.invalidate(*resource)))
            .collect();

        Settlement {
            notice,
            invalidated,
            closed: !self.is_open(),
        }
    }

    /// `begin`, run the request, `settle`. For callers that can hold the
    /// dialog across the await.
    pub async fn submit<T, Fut>(
        &mut self,
        cache: &QueryCache,
        run: impl FnOnce(F::Payload) -> Fut,
    ) -> Result<Settlement, SubmitError>
    where
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let payload = self.begin()?;
        let result = run(payload).await;
        Ok(self.settle(cache, result))
    }
}
