// src/domain/commands.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::accounts::AccountSummary;
use super::bookings::BookingRecord;
use super::core::{AccountId, ListingId};
use super::listings::Listing;
use super::reviews::Review;
use crate::money::Amount;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum Command {
    #[serde(rename = "Register")]
    Register {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        username: String,
        email: String,
        password: String,
    },

    #[serde(rename = "Login")]
    Login {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        email: String,
        password: String,
    },

    /// Fields are applied in declaration order as one transaction; the first
    /// failure rolls back the fields applied before it.
    #[serde(rename = "UpdateProfile")]
    UpdateProfile {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        account: AccountId,
        #[serde(default)]
        username: Option<String>,
        #[serde(default)]
        email: Option<String>,
        #[serde(default, rename = "billingAddress")]
        billing_address: Option<String>,
        #[serde(default, rename = "postalCode")]
        postal_code: Option<String>,
    },

    #[serde(rename = "CreateListing")]
    CreateListing {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        owner: AccountId,
        title: String,
        description: String,
        price: Amount,
        #[serde(default)]
        address: String,
    },

    /// Same field semantics as `UpdateProfile`. Only the owner may update.
    #[serde(rename = "UpdateListing")]
    UpdateListing {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        by: AccountId,
        listing: ListingId,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        price: Option<Amount>,
        #[serde(default)]
        address: Option<String>,
    },

    #[serde(rename = "BookListing")]
    BookListing {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        buyer: AccountId,
        owner: AccountId,
        listing: ListingId,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[serde(rename = "PostReview")]
    PostReview {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        author: AccountId,
        listing: ListingId,
        rating: u8,
        #[serde(default)]
        comment: String,
    },
}

impl Command {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Command::Register { timestamp, .. }
            | Command::Login { timestamp, .. }
            | Command::UpdateProfile { timestamp, .. }
            | Command::CreateListing { timestamp, .. }
            | Command::UpdateListing { timestamp, .. }
            | Command::BookListing { timestamp, .. }
            | Command::PostReview { timestamp, .. } => *timestamp,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Register { .. } => "Register",
            Command::Login { .. } => "Login",
            Command::UpdateProfile { .. } => "UpdateProfile",
            Command::CreateListing { .. } => "CreateListing",
            Command::UpdateListing { .. } => "UpdateListing",
            Command::BookListing { .. } => "BookListing",
            Command::PostReview { .. } => "PostReview",
        }
    }

    /// Whether a successful run changes stored state and belongs in the command log.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Command::Login { .. })
    }
}

/// Outbound only; it carries validated entities that must not be rebuilt from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "$type")]
pub enum CommandSuccess {
    #[serde(rename = "Registered")]
    Registered {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        account: AccountSummary,
    },

    #[serde(rename = "LoggedIn")]
    LoggedIn {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        account: AccountSummary,
    },

    #[serde(rename = "ProfileUpdated")]
    ProfileUpdated {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        account: AccountSummary,
    },

    #[serde(rename = "ListingCreated")]
    ListingCreated {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        listing: Listing,
    },

    #[serde(rename = "ListingUpdated")]
    ListingUpdated {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        listing: Listing,
    },

    #[serde(rename = "ListingBooked")]
    ListingBooked {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        booking: BookingRecord,
    },

    #[serde(rename = "ReviewPosted")]
    ReviewPosted {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        review: Review,
    },
}
