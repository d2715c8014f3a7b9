use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use qbay::domain::{
    Account, AccountId, BookingRecord, Errors, Listing, ListingId, NewAccount, NewBooking,
    NewListing, NewReview, Review,
};
use qbay::money::Amount;
use qbay::persistence::{InMemoryStore, PersistenceGateway};
use std::collections::BTreeSet;
// See https://users.rust-lang.org/t/sharing-code-and-macros-in-tests-directory/3098/7

// Sample data for tests
pub fn sample_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2022, 11, 1, 8, 28, 0).unwrap()
}

pub fn minutes_later(minutes: i64) -> DateTime<Utc> {
    sample_now() + Duration::minutes(minutes)
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn sample_password() -> &'static str {
    "Onetwo!"
}

pub fn sample_title() -> &'static str {
    "4 bed 2 bath"
}

pub fn sample_description() -> &'static str {
    "This is a lovely place!!"
}

pub fn units(value: i64) -> Amount {
    Amount::try_units(value).unwrap()
}

pub fn register_seller(store: &mut InMemoryStore) -> Account {
    Account::register(store, "Sample Seller", "seller@test.com", sample_password()).unwrap()
}

pub fn register_buyer(store: &mut InMemoryStore) -> Account {
    Account::register(store, "Buyer 1", "buyer1@test.com", sample_password()).unwrap()
}

pub fn create_listing_priced(store: &mut InMemoryStore, owner: &Account, price: Amount) -> Listing {
    Listing::create(
        store,
        sample_title(),
        sample_description(),
        price,
        owner.id(),
        "Queens University",
        sample_now(),
    )
    .unwrap()
}

pub fn sample_listing(store: &mut InMemoryStore, owner: &Account) -> Listing {
    create_listing_priced(store, owner, units(100))
}

/// Delegates to an in-memory store, but the flagged operations fail with a
/// storage error.
#[derive(Debug, Default)]
pub struct FaultyStore {
    pub inner: InMemoryStore,
    pub fail_email_lookup: bool,
    pub fail_save_booking: bool,
}

fn storage_failure<T>() -> Result<T, Errors> {
    Err(Errors::Storage("disk full".to_string()))
}

impl PersistenceGateway for FaultyStore {
    fn find_account_by_id(&self, id: AccountId) -> Result<Option<Account>, Errors> {
        self.inner.find_account_by_id(id)
    }
    fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, Errors> {
        if self.fail_email_lookup {
            return storage_failure();
        }
        self.inner.find_account_by_email(email)
    }
    fn find_account_by_username(&self, username: &str) -> Result<Option<Account>, Errors> {
        self.inner.find_account_by_username(username)
    }
    fn insert_account(&mut self, account: NewAccount) -> Result<Account, Errors> {
        self.inner.insert_account(account)
    }
    fn update_account(&mut self, account: &Account) -> Result<(), Errors> {
        self.inner.update_account(account)
    }
    fn find_listing_by_id(&self, id: ListingId) -> Result<Option<Listing>, Errors> {
        self.inner.find_listing_by_id(id)
    }
    fn find_listing_by_title(&self, title: &str) -> Result<Option<Listing>, Errors> {
        self.inner.find_listing_by_title(title)
    }
    fn list_listings(&self) -> Result<Vec<Listing>, Errors> {
        self.inner.list_listings()
    }
    fn list_listings_by_owner(&self, owner: AccountId) -> Result<Vec<Listing>, Errors> {
        self.inner.list_listings_by_owner(owner)
    }
    fn insert_listing(&mut self, listing: NewListing) -> Result<Listing, Errors> {
        self.inner.insert_listing(listing)
    }
    fn update_listing(&mut self, listing: &Listing) -> Result<(), Errors> {
        self.inner.update_listing(listing)
    }
    fn list_booked_dates(&self, listing: ListingId) -> Result<BTreeSet<NaiveDate>, Errors> {
        self.inner.list_booked_dates(listing)
    }
    fn append_booked_dates(&mut self, listing: ListingId, dates: &[NaiveDate]) -> Result<(), Errors> {
        self.inner.append_booked_dates(listing, dates)
    }
    fn save_booking(&mut self, booking: NewBooking) -> Result<BookingRecord, Errors> {
        if self.fail_save_booking {
            return storage_failure();
        }
        self.inner.save_booking(booking)
    }
    fn list_bookings_for_listing(&self, listing: ListingId) -> Result<Vec<BookingRecord>, Errors> {
        self.inner.list_bookings_for_listing(listing)
    }
    fn list_bookings_for_account(&self, buyer: AccountId) -> Result<Vec<BookingRecord>, Errors> {
        self.inner.list_bookings_for_account(buyer)
    }
    fn save_review(&mut self, review: NewReview) -> Result<Review, Errors> {
        self.inner.save_review(review)
    }
    fn list_reviews(&self, listing: ListingId) -> Result<Vec<Review>, Errors> {
        self.inner.list_reviews(listing)
    }
    fn run_in_transaction<T, F>(&mut self, f: F) -> Result<T, Errors>
    where
        F: FnOnce(&mut Self) -> Result<T, Errors>,
    {
        let snapshot = self.inner.clone();
        let result = f(self);
        if result.is_err() {
            self.inner = snapshot;
        }
        result
    }
}
