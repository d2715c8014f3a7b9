use chrono::NaiveDate;
use qbay::domain::{book_listing, night_count, nights, Account, BookingRecord, Errors, Listing};
use qbay::persistence::{InMemoryStore, PersistenceGateway};
use std::collections::BTreeSet;
#[path = "utils/mod.rs"]
mod utils;
use utils::*;

struct Fixture {
    store: InMemoryStore,
    seller: Account,
    buyer: Account,
    listing: Listing,
}

fn fixture(price: i64) -> Fixture {
    let mut store = InMemoryStore::new();
    let seller = register_seller(&mut store);
    let buyer = register_buyer(&mut store);
    let listing = create_listing_priced(&mut store, &seller, units(price));
    Fixture {
        store,
        seller,
        buyer,
        listing,
    }
}

fn balance(store: &InMemoryStore, account: &Account) -> qbay::money::Amount {
    store.find_account_by_id(account.id()).unwrap().unwrap().balance()
}

fn book(f: &mut Fixture, start: NaiveDate, end: NaiveDate) -> Result<BookingRecord, Errors> {
    book_listing(
        &mut f.store,
        f.buyer.id(),
        f.seller.id(),
        f.listing.id(),
        start,
        end,
        sample_now(),
    )
}

#[test]
fn test_nights_exclude_checkout_day() {
    assert_eq!(
        nights(date(2022, 12, 1), date(2022, 12, 3)),
        vec![date(2022, 12, 1), date(2022, 12, 2)]
    );
    assert_eq!(nights(date(2022, 12, 31), date(2023, 1, 1)), vec![date(2022, 12, 31)]);
    assert!(nights(date(2022, 12, 3), date(2022, 12, 3)).is_empty());
}

#[test]
fn test_night_count_matches_nights() {
    assert_eq!(night_count(date(2022, 12, 1), date(2022, 12, 3)), 2);
    assert_eq!(night_count(date(2022, 12, 31), date(2023, 1, 1)), 1);
    assert_eq!(night_count(date(2022, 12, 3), date(2022, 12, 1)), 0);
    assert_eq!(
        night_count(date(2020, 1, 1), date(2021, 1, 1)) as usize,
        nights(date(2020, 1, 1), date(2021, 1, 1)).len()
    );
}

#[test]
fn test_unaffordable_range_is_rejected_before_expanding_it() {
    let mut f = fixture(15);
    let nights = NaiveDate::MAX.signed_duration_since(NaiveDate::MIN).num_days();

    let result = book(&mut f, NaiveDate::MIN, NaiveDate::MAX);

    assert_eq!(
        result,
        Err(Errors::InsufficientFunds {
            balance: units(100),
            required: units(15).checked_mul(nights).unwrap(),
        })
    );
    assert!(f.store.list_booked_dates(f.listing.id()).unwrap().is_empty());
}

#[test]
fn test_conflict_reports_first_booked_night_in_range() {
    let mut f = fixture(15);
    book(&mut f, date(2022, 12, 5), date(2022, 12, 6)).unwrap();

    let result = book(&mut f, date(2022, 12, 3), date(2022, 12, 7));

    assert_eq!(result, Err(Errors::DateConflict(date(2022, 12, 5))));
    assert_eq!(balance(&f.store, &f.buyer), units(85));
}

#[test]
fn test_booking_moves_funds_and_blocks_dates() {
    let mut f = fixture(15);

    let booking = book(&mut f, date(2022, 12, 1), date(2022, 12, 3)).unwrap();

    assert_eq!(booking.buyer, f.buyer.id());
    assert_eq!(booking.owner, f.seller.id());
    assert_eq!(booking.listing, f.listing.id());
    assert_eq!(booking.start, date(2022, 12, 1));
    assert_eq!(booking.end, date(2022, 12, 3));
    assert_eq!(booking.cost, units(30));
    assert_eq!(booking.booked_at, sample_now());

    assert_eq!(balance(&f.store, &f.buyer), units(70));
    assert_eq!(balance(&f.store, &f.seller), units(130));

    let booked = f.store.list_booked_dates(f.listing.id()).unwrap();
    assert_eq!(booked, BTreeSet::from([date(2022, 12, 1), date(2022, 12, 2)]));
    assert!(!booked.contains(&date(2022, 12, 3)));

    assert_eq!(f.store.list_bookings_for_account(f.buyer.id()).unwrap(), vec![booking.clone()]);
    assert_eq!(f.store.list_bookings_for_listing(f.listing.id()).unwrap(), vec![booking]);
}

#[test]
fn test_overlapping_booking_is_rejected_without_side_effects() {
    let mut f = fixture(15);
    book(&mut f, date(2022, 12, 1), date(2022, 12, 3)).unwrap();

    let result = book(&mut f, date(2022, 12, 2), date(2022, 12, 4));

    assert_eq!(result, Err(Errors::DateConflict(date(2022, 12, 2))));
    assert_eq!(balance(&f.store, &f.buyer), units(70));
    assert_eq!(balance(&f.store, &f.seller), units(130));
    assert_eq!(
        f.store.list_booked_dates(f.listing.id()).unwrap(),
        BTreeSet::from([date(2022, 12, 1), date(2022, 12, 2)])
    );
    assert_eq!(f.store.list_bookings_for_account(f.buyer.id()).unwrap().len(), 1);
}

#[test]
fn test_back_to_back_bookings_share_the_checkout_day() {
    let mut f = fixture(15);
    book(&mut f, date(2022, 12, 1), date(2022, 12, 3)).unwrap();

    let booking = book(&mut f, date(2022, 12, 3), date(2022, 12, 4)).unwrap();

    assert_eq!(booking.cost, units(15));
    assert_eq!(balance(&f.store, &f.buyer), units(55));
    assert_eq!(balance(&f.store, &f.seller), units(145));
}

#[test]
fn test_buyer_cannot_book_own_listing() {
    let mut f = fixture(15);

    let result = book_listing(
        &mut f.store,
        f.seller.id(),
        f.seller.id(),
        f.listing.id(),
        date(2022, 12, 1),
        date(2022, 12, 3),
        sample_now(),
    );

    assert_eq!(result, Err(Errors::SameUser(f.seller.id())));
    assert!(f.store.list_booked_dates(f.listing.id()).unwrap().is_empty());
}

#[test]
fn test_empty_or_reversed_range_is_rejected() {
    let mut f = fixture(15);

    assert_eq!(
        book(&mut f, date(2022, 12, 3), date(2022, 12, 3)),
        Err(Errors::InvalidDateRange {
            start: date(2022, 12, 3),
            end: date(2022, 12, 3),
        })
    );
    assert_eq!(
        book(&mut f, date(2022, 12, 3), date(2022, 12, 1)),
        Err(Errors::InvalidDateRange {
            start: date(2022, 12, 3),
            end: date(2022, 12, 1),
        })
    );
    assert_eq!(balance(&f.store, &f.buyer), units(100));
}

#[test]
fn test_insufficient_funds() {
    let mut f = fixture(60);

    let result = book(&mut f, date(2022, 12, 1), date(2022, 12, 3));

    assert_eq!(
        result,
        Err(Errors::InsufficientFunds {
            balance: units(100),
            required: units(120),
        })
    );
    assert_eq!(balance(&f.store, &f.buyer), units(100));
    assert_eq!(balance(&f.store, &f.seller), units(100));
    assert!(f.store.list_booked_dates(f.listing.id()).unwrap().is_empty());
}

#[test]
fn test_exact_balance_is_enough() {
    let mut f = fixture(50);

    book(&mut f, date(2022, 12, 1), date(2022, 12, 3)).unwrap();

    assert_eq!(balance(&f.store, &f.buyer), units(0));
    assert_eq!(balance(&f.store, &f.seller), units(200));
}

#[test]
fn test_owner_must_own_the_listing() {
    let mut f = fixture(15);
    let third = Account::register(&mut f.store, "Third Party", "third@test.com", sample_password()).unwrap();

    let result = book_listing(
        &mut f.store,
        f.buyer.id(),
        third.id(),
        f.listing.id(),
        date(2022, 12, 1),
        date(2022, 12, 3),
        sample_now(),
    );

    assert_eq!(
        result,
        Err(Errors::ListingOwnerMismatch {
            listing: f.listing.id(),
            owner: third.id(),
        })
    );
    assert_eq!(balance(&f.store, &third), units(100));
    assert_eq!(balance(&f.store, &f.buyer), units(100));
}

#[test]
fn test_unknown_buyer_or_listing() {
    let mut f = fixture(15);
    let missing = 9_999;

    let result = book_listing(&mut f.store, missing, f.seller.id(), f.listing.id(), date(2022, 12, 1), date(2022, 12, 3), sample_now());
    assert_eq!(result, Err(Errors::account_not_found(missing)));

    let result = book_listing(&mut f.store, f.buyer.id(), f.seller.id(), missing, date(2022, 12, 1), date(2022, 12, 3), sample_now());
    assert_eq!(result, Err(Errors::listing_not_found(missing)));
}

#[test]
fn test_failed_write_rolls_back_the_whole_booking() {
    let f = fixture(15);
    let mut store = FaultyStore {
        inner: f.store,
        fail_save_booking: true,
        ..FaultyStore::default()
    };

    let result = book_listing(
        &mut store,
        f.buyer.id(),
        f.seller.id(),
        f.listing.id(),
        date(2022, 12, 1),
        date(2022, 12, 3),
        sample_now(),
    );

    assert_eq!(result, Err(Errors::Storage("disk full".to_string())));
    assert_eq!(balance(&store.inner, &f.buyer), units(100));
    assert_eq!(balance(&store.inner, &f.seller), units(100));
    assert!(store.inner.list_booked_dates(f.listing.id()).unwrap().is_empty());
}
