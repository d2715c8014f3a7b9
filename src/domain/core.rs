// src/domain/core.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::money::Amount;

pub type AccountId = i64;
pub type ListingId = i64;
pub type BookingId = i64;
pub type ReviewId = i64;

/// Names the input a validation rule rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Username,
    Email,
    Password,
    PostalCode,
    BillingAddress,
    Title,
    Description,
    Price,
    Owner,
    Address,
    Rating,
    Comment,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Username => "username",
            Field::Email => "email",
            Field::Password => "password",
            Field::PostalCode => "postal code",
            Field::BillingAddress => "billing address",
            Field::Title => "title",
            Field::Description => "description",
            Field::Price => "price",
            Field::Owner => "owner",
            Field::Address => "address",
            Field::Rating => "rating",
            Field::Comment => "comment",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityType {
    Account,
    Listing,
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityType::Account => write!(f, "Account"),
            EntityType::Listing => write!(f, "Listing"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Errors {
    #[error("Invalid {field} {value:?}: {rule}")]
    Validation {
        field: Field,
        value: String,
        rule: &'static str,
    },

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Username already taken: {0}")]
    DuplicateUsername(String),

    #[error("Listing title already in use: {0}")]
    DuplicateTitle(String),

    #[error("Unknown {entity}: {id}")]
    NotFound { entity: EntityType, id: i64 },

    #[error("Invalid email or password")]
    Authentication,

    #[error("Invalid email or password format")]
    InvalidCredentialsFormat,

    #[error("Insufficient funds: balance {balance}, required {required}")]
    InsufficientFunds { balance: Amount, required: Amount },

    #[error("Invalid amount: {0}")]
    InvalidAmount(Amount),

    #[error("Date already booked: {0}")]
    DateConflict(NaiveDate),

    #[error("Start date {start} must precede end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Buyer and owner are the same account: {0}")]
    SameUser(AccountId),

    #[error("Account {owner} does not own listing {listing}")]
    ListingOwnerMismatch { listing: ListingId, owner: AccountId },

    #[error("Account {account} has never booked listing {listing}")]
    NotAGuest { account: AccountId, listing: ListingId },

    #[error("Field cannot be changed: {0}")]
    ImmutableField(&'static str),

    #[error("Storage failure: {0}")]
    Storage(String),
}

impl Errors {
    pub fn invalid(field: Field, value: impl fmt::Display, rule: &'static str) -> Self {
        Errors::Validation {
            field,
            value: value.to_string(),
            rule,
        }
    }

    pub fn account_not_found(id: AccountId) -> Self {
        Errors::NotFound {
            entity: EntityType::Account,
            id,
        }
    }

    pub fn listing_not_found(id: ListingId) -> Self {
        Errors::NotFound {
            entity: EntityType::Listing,
            id,
        }
    }
}
