//! Client-side checks for the account creation form.

use once_cell::sync::Lazy;
use regex::Regex;

pub const EMAIL_ERROR: &str = "Bitte geben Sie eine gültige HAW E-Mail-Adresse ein.";
pub const PASSWORD_ERROR: &str =
    "Mind. 1 Großbuchstabe, 1 Kleinbuchstabe, 1 Zahl und 8 Zeichen lang.";
pub const REPEAT_PASSWORD_ERROR: &str = "Die Passwörter stimmen nicht überein.";

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@haw-hamburg\.de$").expect("email pattern is valid")
});

/// Per-field validity of the signup form.
///
/// Each flag is independent; a message is only shown for invalid fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignupValidation {
    pub email: bool,
    pub password: bool,
    pub repeat_password: bool,
}

impl SignupValidation {
    pub fn check(email: &str, password: &str, repeat_password: &str) -> Self {
        Self {
            email: is_valid_email(email),
            password: is_strong_password(password),
            repeat_password: is_strong_password(repeat_password) && repeat_password == password,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.email && self.password && self.repeat_password
    }

    /// Messages of the failing fields, in form order.
    pub fn errors(&self) -> Vec<&'static str> {
        [
            (self.email, EMAIL_ERROR),
            (self.password, PASSWORD_ERROR),
            (self.repeat_password, REPEAT_PASSWORD_ERROR),
        ]
        .into_iter()
        .filter(|(valid, _)| !valid)
        .map(|(_, message)| message)
        .collect()
    }
}

/// Institutional address (`...@haw-hamburg.de`).
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// At least one lowercase letter, one uppercase letter, one digit and eight
/// characters.
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= 8
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
}
