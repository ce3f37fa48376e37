use std::sync::Arc;

/// Shown when the server gave no usable message.
pub const GENERIC_ERROR: &str = "Something went wrong.";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("unauthorized")]
    Unauthorized(Option<String>),
    #[error("forbidden")]
    Forbidden(Option<String>),
    #[error("not found")]
    NotFound(Option<String>),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        let message = message.filter(|msg| !msg.trim().is_empty());
        match status {
            401 => return ClientError::Unauthorized(message),
            403 => return ClientError::Forbidden(message),
            404 => return ClientError::NotFound(message),
            _ => {}
        }
        let message = message.unwrap_or_else(|| GENERIC_ERROR.to_string());
        match status {
            409 => ClientError::Conflict(message),
            422 => ClientError::Validation(message),
            _ => ClientError::Server(message),
        }
    }

    /// Text suitable for a toast.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Unauthorized(detail) => {
                detail.clone().unwrap_or_else(|| "You are not signed in.".to_string())
            }
            ClientError::Forbidden(detail) => detail
                .clone()
                .unwrap_or_else(|| "You are not allowed to do that.".to_string()),
            ClientError::NotFound(detail) => {
                detail.clone().unwrap_or_else(|| "Not found.".to_string())
            }
            ClientError::Conflict(msg) | ClientError::Validation(msg) | ClientError::Server(msg) => {
                if msg.trim().is_empty() {
                    GENERIC_ERROR.to_string()
                } else {
                    msg.clone()
                }
            }
            ClientError::Transport(_) | ClientError::InvalidUrl(_) => GENERIC_ERROR.to_string(),
        }
    }
}

/// A fetch failure that can be handed to every waiter of a de-duplicated
/// request.
#[derive(Clone, Debug, thiserror::Error)]
#[error(transparent)]
pub struct FetchError(Arc<ClientError>);

impl FetchError {
    pub fn inner(&self) -> &ClientError {
        &self.0
    }

    pub fn user_message(&self) -> String {
        self.0.user_message()
    }
}

impl From<ClientError> for FetchError {
    fn from(err: ClientError) -> Self {
        Self(Arc::new(err))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Client-side form errors. These never reach the network layer.
#[derive(Clone, Debug, Default, PartialEq, Eq, thiserror::Error)]
#[error("{} invalid field(s)", .0.len())]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// First message recorded for `field`.
    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|err| err.field == field)
            .map(|err| err.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// `Ok(payload)` when nothing was recorded.
    pub fn into_result<T>(self, payload: impl FnOnce() -> T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(payload())
        } else {
            Err(self)
        }
    }
}
