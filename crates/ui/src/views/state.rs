use dioxus::prelude::*;

/// A failure the view can show. Service errors already read as user text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewError(String);

impl ViewError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    #[must_use]
    pub fn message(&self) -> &str {
        if self.0.is_empty() {
            "Something went wrong. Please try again."
        } else {
            &self.0
        }
    }
}

impl<E: std::error::Error> From<E> for ViewError {
    fn from(err: E) -> Self {
        Self(err.to_string())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(err.clone()),
            None => ViewState::Error(ViewError(String::new())),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use services::AuthError;

    #[test]
    fn service_errors_become_messages() {
        let err = ViewError::from(AuthError::WeakPassword { min: 6 });
        assert_eq!(err.message(), "password must be at least 6 characters");
        assert_eq!(
            ViewError(String::new()).message(),
            "Something went wrong. Please try again."
        );
    }
}
