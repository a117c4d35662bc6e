//! Authentication primitives: registration input, login credentials and the
//! identity recovered from a session token.

use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::user::PASSWORD_MIN;
use super::{EmailAddress, UserId};

/// Field-level problems found in a registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    InvalidEmail,
    PasswordTooShort,
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "Email is invalid"),
            Self::PasswordTooShort => write!(f, "Password too short!"),
        }
    }
}

impl std::error::Error for RegistrationError {}

/// Raw sign-up payload as received from a client.
#[derive(Clone)]
pub struct Registration {
    email: String,
    name: String,
    password: Zeroizing<String>,
}

/// Registration input whose fields passed validation.
#[derive(Clone)]
pub struct ValidRegistration {
    pub email: EmailAddress,
    pub name: String,
    pub password: Zeroizing<String>,
}

impl Registration {
    pub fn new(email: impl Into<String>, name: impl Into<String>, password: &str) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            password: Zeroizing::new(password.to_owned()),
        }
    }

    /// Check every field and report all violations at once, email first.
    ///
    /// # Examples
    /// ```
    /// use postboard::domain::{Registration, RegistrationError};
    ///
    /// let errors = Registration::new("nope", "Ada", "abc")
    ///     .validate()
    ///     .err()
    ///     .unwrap();
    /// assert_eq!(
    ///     errors,
    ///     vec![RegistrationError::InvalidEmail, RegistrationError::PasswordTooShort]
    /// );
    /// ```
    pub fn validate(self) -> Result<ValidRegistration, Vec<RegistrationError>> {
        let mut errors = Vec::new();
        let email = match EmailAddress::new(self.email) {
            Ok(email) => Some(email),
            Err(_) => {
                errors.push(RegistrationError::InvalidEmail);
                None
            }
        };
        if self.password.chars().count() < PASSWORD_MIN {
            errors.push(RegistrationError::PasswordTooShort);
        }

        match email {
            Some(email) if errors.is_empty() => Ok(ValidRegistration {
                email,
                name: self.name,
                password: self.password,
            }),
            _ => Err(errors),
        }
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("email", &self.email)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Login credentials.
///
/// The password keeps caller-provided whitespace and is wiped on drop.
///
/// # Examples
/// ```
/// use postboard::domain::LoginCredentials;
///
/// let creds = LoginCredentials::new("ada@example.com", "secret");
/// assert_eq!(creds.email(), "ada@example.com");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: &str) -> Self {
        Self {
            email: email.into(),
            password: Zeroizing::new(password.to_owned()),
        }
    }

    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Caller identity recovered from a verified session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub email: String,
}

/// Signed session token handed to clients after login.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Successful login result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedSession {
    #[schema(value_type = String)]
    pub token: SessionToken,
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub user_id: UserId,
}
