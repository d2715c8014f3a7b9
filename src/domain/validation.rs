// src/domain/validation.rs
//! Stateless predicates gating every account and listing mutation.
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

use super::core::{AccountId, Errors};
use crate::money::Amount;
use crate::persistence::PersistenceGateway;

pub const TITLE_MAX_LENGTH: usize = 80;
pub const DESCRIPTION_MIN_LENGTH: usize = 20;
pub const DESCRIPTION_MAX_LENGTH: usize = 2000;
pub const ADDRESS_MAX_LENGTH: usize = 46;
pub const PASSWORD_MIN_LENGTH: usize = 6;
pub const COMMENT_MAX_LENGTH: usize = 2000;

pub fn min_price() -> Amount {
    Amount::units(10)
}

pub fn max_price() -> Amount {
    Amount::units(10_000)
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static POSTAL_CODE_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z0-9]+[._-])*[A-Za-z0-9]+@[A-Za-z0-9-]+(\.[A-Za-z]{2,})+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

fn postal_code_regex() -> &'static Regex {
    POSTAL_CODE_RE.get_or_init(|| {
        // D, F, I, O, Q and U never appear; W and Z never lead.
        Regex::new(r"(?i)^[ABCEGHJ-NPRSTVXY][0-9][ABCEGHJ-NPRSTV-Z][0-9][ABCEGHJ-NPRSTV-Z][0-9]$")
            .unwrap_or_else(|error| panic!("postal code regex failed to compile: {error}"))
    })
}

fn length(text: &str) -> usize {
    text.chars().count()
}

fn trimmed_alphanumeric_or_space(text: &str) -> bool {
    !text.starts_with(' ')
        && !text.ends_with(' ')
        && text.chars().all(|c| c.is_ascii_alphanumeric() || c == ' ')
}

pub fn valid_title(title: &str) -> bool {
    (1..=TITLE_MAX_LENGTH).contains(&length(title)) && trimmed_alphanumeric_or_space(title)
}

pub fn valid_description(description: &str, title: &str) -> bool {
    let len = length(description);
    (DESCRIPTION_MIN_LENGTH..=DESCRIPTION_MAX_LENGTH).contains(&len) && len > length(title)
}

pub fn valid_price(price: Amount) -> bool {
    min_price() <= price && price <= max_price()
}

pub fn valid_price_increase(old_price: Amount, new_price: Amount) -> bool {
    valid_price(new_price) && new_price > old_price
}

/// Both bounds are exclusive.
pub fn valid_modification_date(date: NaiveDate) -> bool {
    match (
        NaiveDate::from_ymd_opt(2021, 1, 2),
        NaiveDate::from_ymd_opt(2025, 1, 2),
    ) {
        (Some(earliest), Some(latest)) => earliest < date && date < latest,
        _ => false,
    }
}

pub fn valid_address(address: &str) -> bool {
    length(address) <= ADDRESS_MAX_LENGTH
}

/// The owner must be a persisted account with a non-empty email.
pub fn valid_seller<G: PersistenceGateway>(gateway: &G, owner: AccountId) -> Result<bool, Errors> {
    Ok(gateway
        .find_account_by_id(owner)?
        .map(|account| !account.email().is_empty())
        .unwrap_or(false))
}

pub fn valid_username(name: &str) -> bool {
    let len = length(name);
    !name.is_empty() && 2 < len && len < 20 && trimmed_alphanumeric_or_space(name)
}

pub fn valid_email(email: &str) -> bool {
    !email.is_empty() && email_regex().is_match(email)
}

pub fn valid_password(password: &str) -> bool {
    length(password) >= PASSWORD_MIN_LENGTH
        && password.chars().any(char::is_uppercase)
        && password.chars().any(char::is_lowercase)
        && password.chars().any(|c| !c.is_alphanumeric())
}

pub fn valid_postal_code(code: &str) -> bool {
    postal_code_regex().is_match(code)
}

pub fn valid_rating(rating: u8) -> bool {
    (1..=5).contains(&rating)
}

pub fn valid_comment(comment: &str) -> bool {
    length(comment) <= COMMENT_MAX_LENGTH
}
