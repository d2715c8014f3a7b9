// src/persistence/in_memory.rs
use chrono::NaiveDate;
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

use super::gateway::PersistenceGateway;
use crate::domain::accounts::{Account, NewAccount};
use crate::domain::bookings::{BookingRecord, NewBooking};
use crate::domain::core::{AccountId, BookingId, Errors, ListingId, ReviewId};
use crate::domain::listings::{Listing, NewListing};
use crate::domain::reviews::{NewReview, Review};

/// Table-per-entity store. Transactions snapshot every table and restore
/// the snapshot when the transaction body fails; `&mut self` access makes
/// each transaction exclusive.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    accounts: BTreeMap<AccountId, Account>,
    listings: BTreeMap<ListingId, Listing>,
    booked_dates: BTreeMap<ListingId, BTreeSet<NaiveDate>>,
    bookings: BTreeMap<BookingId, BookingRecord>,
    reviews: BTreeMap<ReviewId, Review>,
    next_id: i64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn email_taken(&self, email: &str, except: Option<AccountId>) -> bool {
        self.accounts
            .values()
            .any(|account| account.email() == email && Some(account.id()) != except)
    }

    fn title_taken(&self, title: &str, except: Option<ListingId>) -> bool {
        self.listings
            .values()
            .any(|listing| listing.title() == title && Some(listing.id()) != except)
    }
}

impl PersistenceGateway for InMemoryStore {
    fn find_account_by_id(&self, id: AccountId) -> Result<Option<Account>, Errors> {
        Ok(self.accounts.get(&id).cloned())
    }

    fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, Errors> {
        Ok(self.accounts.values().find(|a| a.email() == email).cloned())
    }

    fn find_account_by_username(&self, username: &str) -> Result<Option<Account>, Errors> {
        Ok(self.accounts.values().find(|a| a.username() == username).cloned())
    }

    fn insert_account(&mut self, account: NewAccount) -> Result<Account, Errors> {
        if self.email_taken(&account.email, None) {
            return Err(Errors::DuplicateEmail(account.email));
        }
        let id = self.allocate_id();
        let account = account.with_id(id);
        self.accounts.insert(id, account.clone());
        Ok(account)
    }

    fn update_account(&mut self, account: &Account) -> Result<(), Errors> {
        if !self.accounts.contains_key(&account.id()) {
            return Err(Errors::account_not_found(account.id()));
        }
        if self.email_taken(account.email(), Some(account.id())) {
            return Err(Errors::DuplicateEmail(account.email().to_string()));
        }
        self.accounts.insert(account.id(), account.clone());
        Ok(())
    }

    fn find_listing_by_id(&self, id: ListingId) -> Result<Option<Listing>, Errors> {
        Ok(self.listings.get(&id).cloned())
    }

    fn find_listing_by_title(&self, title: &str) -> Result<Option<Listing>, Errors> {
        Ok(self.listings.values().find(|l| l.title() == title).cloned())
    }

    fn list_listings(&self) -> Result<Vec<Listing>, Errors> {
        Ok(self.listings.values().cloned().collect())
    }

    fn list_listings_by_owner(&self, owner: AccountId) -> Result<Vec<Listing>, Errors> {
        Ok(self
            .listings
            .values()
            .filter(|l| l.owner() == owner)
            .cloned()
            .collect())
    }

    fn insert_listing(&mut self, listing: NewListing) -> Result<Listing, Errors> {
        if self.title_taken(&listing.title, None) {
            return Err(Errors::DuplicateTitle(listing.title));
        }
        let id = self.allocate_id();
        let listing = listing.with_id(id);
        self.listings.insert(id, listing.clone());
        Ok(listing)
    }

    fn update_listing(&mut self, listing: &Listing) -> Result<(), Errors> {
        match self.listings.get(&listing.id()) {
            None => return Err(Errors::listing_not_found(listing.id())),
            Some(stored) if stored.owner() != listing.owner() => {
                return Err(Errors::ImmutableField("owner"));
            }
            Some(_) => {}
        }
        if self.title_taken(listing.title(), Some(listing.id())) {
            return Err(Errors::DuplicateTitle(listing.title().to_string()));
        }
        self.listings.insert(listing.id(), listing.clone());
        Ok(())
    }

    fn list_booked_dates(&self, listing: ListingId) -> Result<BTreeSet<NaiveDate>, Errors> {
        Ok(self.booked_dates.get(&listing).cloned().unwrap_or_default())
    }

    fn append_booked_dates(&mut self, listing: ListingId, dates: &[NaiveDate]) -> Result<(), Errors> {
        if !self.listings.contains_key(&listing) {
            return Err(Errors::listing_not_found(listing));
        }
        self.booked_dates
            .entry(listing)
            .or_default()
            .extend(dates.iter().copied());
        Ok(())
    }

    fn save_booking(&mut self, booking: NewBooking) -> Result<BookingRecord, Errors> {
        let id = self.allocate_id();
        let booking = booking.with_id(id);
        self.bookings.insert(id, booking.clone());
        Ok(booking)
    }

    fn list_bookings_for_listing(&self, listing: ListingId) -> Result<Vec<BookingRecord>, Errors> {
        Ok(self
            .bookings
            .values()
            .filter(|b| b.listing == listing)
            .cloned()
            .collect())
    }

    fn list_bookings_for_account(&self, buyer: AccountId) -> Result<Vec<BookingRecord>, Errors> {
        Ok(self
            .bookings
            .values()
            .filter(|b| b.buyer == buyer)
            .cloned()
            .collect())
    }

    fn save_review(&mut self, review: NewReview) -> Result<Review, Errors> {
        let id = self.allocate_id();
        let review = review.with_id(id);
        self.reviews.insert(id, review.clone());
        Ok(review)
    }

    fn list_reviews(&self, listing: ListingId) -> Result<Vec<Review>, Errors> {
        Ok(self
            .reviews
            .values()
            .filter(|r| r.listing == listing)
            .cloned()
            .collect())
    }

    fn run_in_transaction<T, F>(&mut self, f: F) -> Result<T, Errors>
    where
        F: FnOnce(&mut Self) -> Result<T, Errors>,
    {
        let snapshot = self.clone();
        match f(self) {
            Ok(value) => Ok(value),
            Err(err) => {
                debug!("rolling back transaction: {}", err);
                *self = snapshot;
                Err(err)
            }
        }
    }
}
