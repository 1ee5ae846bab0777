// Login and registration forms. The confirmation field is checked before anything is sent.

use crate::api::MovieApi;
use crate::error::UiError;
use crate::toast::ToastSink;

/// Where a successful login or registration lands.
pub const MOVIES_PATH: &str = "/movies";

pub const PASSWORD_MISMATCH: &str = "Passwords do not match";
pub const MISSING_FIELDS: &str = "Username and password are required";
pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTRATION_FAILED: &str = "Registration failed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), UiError> {
        if self.username.trim().is_empty() || self.password.is_empty() {
            return Err(UiError::Validation(MISSING_FIELDS.to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub confirm: String,
}

impl Registration {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        confirm: impl Into<String>,
    ) -> Self {
        Registration {
            username: username.into(),
            password: password.into(),
            confirm: confirm.into(),
        }
    }

    pub fn validate(&self) -> Result<(), UiError> {
        if self.username.trim().is_empty() || self.password.is_empty() {
            return Err(UiError::Validation(MISSING_FIELDS.to_string()));
        }
        if self.password != self.confirm {
            return Err(UiError::Validation(PASSWORD_MISMATCH.to_string()));
        }
        Ok(())
    }
}

/// Submits the auth forms and reports failures as toasts.
pub struct AuthForms<A, N> {
    api: A,
    toasts: N,
}

impl<A: MovieApi, N: ToastSink> AuthForms<A, N> {
    pub fn new(api: A, toasts: N) -> Self {
        AuthForms { api, toasts }
    }

    /// Returns the path to navigate to.
    pub async fn login(&self, credentials: &Credentials) -> Result<&'static str, UiError> {
        let result = match credentials.validate() {
            Ok(()) => self.api.login(credentials).await,
            Err(err) => Err(err),
        };
        self.finish(result, LOGIN_FAILED)
    }

    /// Returns the path to navigate to.
    pub async fn register(&self, registration: &Registration) -> Result<&'static str, UiError> {
        let result = match registration.validate() {
            Ok(()) => self.api.register(registration).await,
            Err(err) => Err(err),
        };
        self.finish(result, REGISTRATION_FAILED)
    }

    fn finish(&self, result: Result<(), UiError>, fallback: &str) -> Result<&'static str, UiError> {
        match result {
            Ok(()) => Ok(MOVIES_PATH),
            Err(err) => {
                if !matches!(err, UiError::Validation(_)) {
                    crate::error_log!("{}: {}", fallback, err);
                }
                self.toasts.error(&err.user_message(fallback));
                Err(err)
            }
        }
    }
}
