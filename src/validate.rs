use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::CommonPasswords;

/// Usernames that can never be registered
pub const RESERVED_USERNAMES: [&str; 3] = ["admin", "root", "guest"];

/// Date formats accepted from user input, tried in order
pub const DATE_FORMATS: [&str; 4] = ["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y-%m-%d"];

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_-]{3,14}$").expect("Invalid regex"));

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Invalid regex"));

/// An optional `+`, then digits with single separators between them.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?\d(?:[ ./-]?\d)*$").expect("Invalid regex"));

/// Day and month with one or two digits, the year always with four.
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d{1,2}[/.-]\d{1,2}[/.-]\d{4}|\d{4}-\d{1,2}-\d{1,2})$").expect("Invalid regex")
});

static PASSWORD_UPPER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]").expect("Invalid regex"));
static PASSWORD_LOWER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z]").expect("Invalid regex"));
static PASSWORD_DIGIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d").expect("Invalid regex"));
static PASSWORD_SPECIAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[!@#$%^&*]").expect("Invalid regex"));

/// Possible errors to occur while validating user input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid {field}: {reason}")]
    InvalidFormat { field: &'static str, reason: String },
    #[error("Username \"{0}\" already exists")]
    DuplicateUsername(String),
    #[error("A user with the e-mail address \"{0}\" already exists")]
    DuplicateEmail(String),
    #[error("Password must {}", .reasons.join(", "))]
    WeakPassword { reasons: Vec<String> },
}

impl ValidationError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type of all validators
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Checks a username for a new account
///
/// A username is rejected if it is reserved or already taken by one of the
/// `existing` usernames. Otherwise it has to be 3 to 14 characters long and
/// may only contain lowercase letters, digits, hyphens and underscores.
pub fn validate_username<I, S>(candidate: &str, existing: I) -> ValidationResult<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let candidate = candidate.trim();

    if RESERVED_USERNAMES.contains(&candidate)
        || existing.into_iter().any(|name| name.as_ref() == candidate)
    {
        return Err(ValidationError::DuplicateUsername(candidate.to_string()));
    }

    if !USERNAME_RE.is_match(candidate) {
        return Err(ValidationError::invalid(
            "username",
            "must be 3-14 characters long and contain only lowercase letters, digits, hyphens (-) or underscores (_)",
        ));
    }

    Ok(candidate.to_string())
}

/// Checks the strength of a new password
///
/// Every unmet rule is reported, not just the first one.
pub fn validate_password(candidate: &str, common: &CommonPasswords) -> ValidationResult<String> {
    let mut reasons = Vec::new();

    if common.contains(candidate) {
        reasons.push("not be too common");
    }
    if candidate.contains(' ') {
        reasons.push("not contain empty spaces");
    }
    if !(8..=20).contains(&candidate.chars().count()) {
        reasons.push("be between 8 and 20 characters long");
    }
    if !PASSWORD_UPPER_RE.is_match(candidate) {
        reasons.push("contain at least one uppercase letter");
    }
    if !PASSWORD_LOWER_RE.is_match(candidate) {
        reasons.push("contain at least one lowercase letter");
    }
    if !PASSWORD_DIGIT_RE.is_match(candidate) {
        reasons.push("contain at least one digit");
    }
    if !PASSWORD_SPECIAL_RE.is_match(candidate) {
        reasons.push("contain at least one special character (!@#$%^&*)");
    }

    match reasons.is_empty() {
        true => Ok(candidate.to_string()),
        false => Err(ValidationError::WeakPassword {
            reasons: reasons.into_iter().map(String::from).collect(),
        }),
    }
}

/// Checks that an email address has the shape `local@domain.tld`
pub fn validate_email(candidate: &str) -> ValidationResult<String> {
    let candidate = candidate.trim();
    match EMAIL_RE.is_match(candidate) {
        true => Ok(candidate.to_string()),
        false => Err(ValidationError::invalid("email", "expected something like name@example.com")),
    }
}

/// Checks a phone number and returns it without separators
///
/// Accepts an optional leading `+` and 8 to 15 digits, which may be separated
/// by single spaces, dots, slashes or hyphens.
pub fn validate_phone(candidate: &str) -> ValidationResult<String> {
    let candidate = candidate.trim();
    let digits = candidate.chars().filter(char::is_ascii_digit).count();

    if !PHONE_RE.is_match(candidate) || !(8..=15).contains(&digits) {
        return Err(ValidationError::invalid(
            "phone number",
            "expected 8 to 15 digits, e.g. +491234567890",
        ));
    }

    Ok(candidate
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect())
}

/// Parses a calendar date in one of the [`DATE_FORMATS`]
///
/// Impossible dates like the 31st of April are rejected.
pub fn validate_date(candidate: &str) -> ValidationResult<NaiveDate> {
    let candidate = candidate.trim();
    DATE_RE
        .is_match(candidate)
        .then(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(candidate, format).ok())
        })
        .flatten()
        .ok_or_else(|| {
            ValidationError::invalid(
                "date",
                "expected DD/MM/YYYY, DD-MM-YYYY, DD.MM.YYYY or YYYY-MM-DD",
            )
        })
}

/// Parses a non-negative amount, accepting both `.` and `,` as decimal separator
pub fn parse_amount(field: &'static str, candidate: &str) -> ValidationResult<f64> {
    let amount = candidate
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| ValidationError::invalid(field, "not a valid number (example: 2.4)"))?;

    match amount.is_finite() && amount >= 0. {
        true => Ok(amount),
        false => Err(ValidationError::invalid(field, "must be a non-negative number")),
    }
}

/// Parses a quantity, which has to be a positive whole number
pub fn parse_quantity(candidate: &str) -> ValidationResult<u32> {
    match candidate.trim().parse::<u32>() {
        Ok(0) => Err(ValidationError::invalid("quantity", "must be at least 1")),
        Ok(quantity) => Ok(quantity),
        Err(_) => Err(ValidationError::invalid("quantity", "not a valid whole number")),
    }
}
