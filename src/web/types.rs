use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::domain::AccountId;
use crate::money::Amount;
use crate::persistence::InMemoryStore;

/// One store behind a blocking `std::sync::Mutex`. Each command, including its
/// command-log append, runs on the actix worker with the lock held, so requests
/// are served one at a time.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub store: Arc<Mutex<InMemoryStore>>,
    pub command_log: Option<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "billingAddress")]
    pub billing_address: Option<String>,
    #[serde(default, rename = "postalCode")]
    pub postal_code: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateListingRequest {
    pub title: String,
    pub description: String,
    pub price: Amount,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateListingRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<Amount>,
    #[serde(default)]
    pub address: Option<String>,
}

/// `end` is the checkout day.
#[derive(Debug, Serialize, Deserialize)]
pub struct BookingRequest {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListingsQuery {
    pub owner: Option<AccountId>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Availability {
    #[serde(rename = "earliestAvailable")]
    pub earliest_available: NaiveDate,
}
