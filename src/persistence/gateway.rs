// src/persistence/gateway.rs
//! The storage boundary the domain core talks to.
//!
//! Implementations own the rows; the core loads values through this trait,
//! mutates them with explicit update operations and writes them back.
use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::domain::accounts::{Account, NewAccount};
use crate::domain::bookings::{BookingRecord, NewBooking};
use crate::domain::core::{AccountId, Errors, ListingId};
use crate::domain::listings::{Listing, NewListing};
use crate::domain::reviews::{NewReview, Review};

pub trait PersistenceGateway {
    fn find_account_by_id(&self, id: AccountId) -> Result<Option<Account>, Errors>;
    fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, Errors>;
    fn find_account_by_username(&self, username: &str) -> Result<Option<Account>, Errors>;

    /// Assigns the identifier. Fails with `DuplicateEmail` on collision.
    fn insert_account(&mut self, account: NewAccount) -> Result<Account, Errors>;

    /// Overwrites an existing row. Fails with `DuplicateEmail` when the email
    /// belongs to another account.
    fn update_account(&mut self, account: &Account) -> Result<(), Errors>;

    fn find_listing_by_id(&self, id: ListingId) -> Result<Option<Listing>, Errors>;
    fn find_listing_by_title(&self, title: &str) -> Result<Option<Listing>, Errors>;
    fn list_listings(&self) -> Result<Vec<Listing>, Errors>;
    fn list_listings_by_owner(&self, owner: AccountId) -> Result<Vec<Listing>, Errors>;

    /// Assigns the identifier. Fails with `DuplicateTitle` on collision.
    fn insert_listing(&mut self, listing: NewListing) -> Result<Listing, Errors>;
    fn update_listing(&mut self, listing: &Listing) -> Result<(), Errors>;

    fn list_booked_dates(&self, listing: ListingId) -> Result<BTreeSet<NaiveDate>, Errors>;
    fn append_booked_dates(&mut self, listing: ListingId, dates: &[NaiveDate]) -> Result<(), Errors>;

    fn save_booking(&mut self, booking: NewBooking) -> Result<BookingRecord, Errors>;
    fn list_bookings_for_listing(&self, listing: ListingId) -> Result<Vec<BookingRecord>, Errors>;
    fn list_bookings_for_account(&self, buyer: AccountId) -> Result<Vec<BookingRecord>, Errors>;

    fn save_review(&mut self, review: NewReview) -> Result<Review, Errors>;
    fn list_reviews(&self, listing: ListingId) -> Result<Vec<Review>, Errors>;

    /// Runs `f` as one atomic, isolated unit: if it returns `Err`, none of
    /// the writes it made are kept.
    fn run_in_transaction<T, F>(&mut self, f: F) -> Result<T, Errors>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> Result<T, Errors>;
}
