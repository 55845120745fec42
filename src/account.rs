use crate::Purchase;

/// Possible errors to occur during account operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountError {
    #[error("The spending limit must be a non-negative number")]
    InvalidSpendingLimit,
}

/// A user account
///
/// The account is stored under its username, which is therefore not part of
/// the account itself. Besides the contact details, every account carries:
/// 1. The spending limit:
///    An amount the user does not want their total spending to exceed. It is
///    purely informational, a limit of `0` means that no limit is set.
/// 2. The purchases:
///    All purchases the user recorded, in the order they were entered.
///    Purchases can only ever be appended.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", try_from = "AccountRecord")]
pub struct Account {
    password: String,
    email: String,
    phone: String,
    spending_limit: f64,
    purchases: Vec<Purchase>,
}

impl Account {
    /// Creates a new account without any purchases
    ///
    /// The password, email and phone number are expected to be validated already.
    pub fn new(
        password: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        spending_limit: f64,
    ) -> Result<Self, AccountError> {
        check_limit(spending_limit)?;

        Ok(Self {
            password: password.into(),
            email: email.into(),
            phone: phone.into(),
            spending_limit,
            purchases: Vec::new(),
        })
    }

    /// Compares `password` with the stored password
    pub fn check_password(&self, password: &str) -> bool {
        self.password == password
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// The configured spending limit, `0` if none is set
    pub fn spending_limit(&self) -> f64 {
        self.spending_limit
    }

    /// Replaces the spending limit
    pub fn set_spending_limit(&mut self, limit: f64) -> Result<(), AccountError> {
        check_limit(limit)?;
        self.spending_limit = limit;

        Ok(())
    }

    /// All purchases in insertion order
    pub fn purchases(&self) -> &[Purchase] {
        &self.purchases
    }

    /// The sum of the total costs of all purchases
    pub fn total_spent(&self) -> f64 {
        self.purchases.iter().map(Purchase::total_cost).sum()
    }

    pub(crate) fn push_purchase(&mut self, purchase: Purchase) {
        self.purchases.push(purchase);
    }
}

/// An account as stored on disk, before its spending limit is checked
#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountRecord {
    password: String,
    email: String,
    phone: String,
    #[serde(default)]
    spending_limit: f64,
    #[serde(default)]
    purchases: Vec<Purchase>,
}

impl TryFrom<AccountRecord> for Account {
    type Error = AccountError;

    fn try_from(record: AccountRecord) -> Result<Self, Self::Error> {
        let mut account = Self::new(record.password, record.email, record.phone, record.spending_limit)?;
        account.purchases = record.purchases;

        Ok(account)
    }
}

fn check_limit(limit: f64) -> Result<(), AccountError> {
    match limit.is_finite() && limit >= 0. {
        true => Ok(()),
        false => Err(AccountError::InvalidSpendingLimit),
    }
}
