pub use self::{
    account::{Account, AccountError},
    passwords::{CommonPasswords, DictionaryError},
    purchase::{Purchase, PurchaseError},
    report::{check_spending_limit, filtered_report, full_report, Criterion, FilteredReport, LimitStatus, Report},
    session::{LoginPolicy, Session, SessionError},
    shell::{framed, Shell},
    store::{StoreError, UserStore},
    validate::{ValidationError, ValidationResult},
};

mod account;
mod passwords;
mod purchase;
pub mod report;
mod session;
mod shell;
mod store;
pub mod validate;
