// src/domain/bookings.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::core::{AccountId, BookingId, Errors, ListingId};
use crate::money::Amount;
use crate::persistence::PersistenceGateway;

/// A completed booking. `end` is the checkout day and is neither booked nor charged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: BookingId,
    pub owner: AccountId,
    pub buyer: AccountId,
    pub listing: ListingId,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub cost: Amount,
    #[serde(rename = "bookedAt")]
    pub booked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub owner: AccountId,
    pub buyer: AccountId,
    pub listing: ListingId,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub cost: Amount,
    pub booked_at: DateTime<Utc>,
}

impl NewBooking {
    pub fn with_id(self, id: BookingId) -> BookingRecord {
        BookingRecord {
            id,
            owner: self.owner,
            buyer: self.buyer,
            listing: self.listing,
            start: self.start,
            end: self.end,
            cost: self.cost,
            booked_at: self.booked_at,
        }
    }
}

/// Every night in `[start, end)`.
pub fn nights(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|date| *date < end).collect()
}

/// Number of nights in `[start, end)`, without walking the range.
pub fn night_count(start: NaiveDate, end: NaiveDate) -> i64 {
    end.signed_duration_since(start).num_days().max(0)
}

/// Books `[start, end)` of a listing for `buyer_id`, moving `price × nights`
/// from the buyer's balance to the owner's.
///
/// Everything after the structural checks runs in one gateway transaction:
/// either the balances, the booked dates and the record are all written, or
/// nothing is.
pub fn book_listing<G: PersistenceGateway>(
    gateway: &mut G,
    buyer_id: AccountId,
    owner_id: AccountId,
    listing_id: ListingId,
    start: NaiveDate,
    end: NaiveDate,
    now: DateTime<Utc>,
) -> Result<BookingRecord, Errors> {
    if buyer_id == owner_id {
        return Err(Errors::SameUser(buyer_id));
    }
    if start >= end {
        return Err(Errors::InvalidDateRange { start, end });
    }

    gateway.run_in_transaction(|store| {
        let mut buyer = store
            .find_account_by_id(buyer_id)?
            .ok_or_else(|| Errors::account_not_found(buyer_id))?;
        let listing = store
            .find_listing_by_id(listing_id)?
            .ok_or_else(|| Errors::listing_not_found(listing_id))?;

        let cost = listing
            .price()
            .checked_mul(night_count(start, end))
            .map_err(|_| Errors::InvalidAmount(listing.price()))?;

        if buyer.balance() < cost {
            return Err(Errors::InsufficientFunds {
                balance: buyer.balance(),
                required: cost,
            });
        }

        let booked = store.list_booked_dates(listing_id)?;
        if let Some(taken) = booked.range(start..end).next() {
            return Err(Errors::DateConflict(*taken));
        }

        if listing.owner() != owner_id {
            return Err(Errors::ListingOwnerMismatch {
                listing: listing_id,
                owner: owner_id,
            });
        }
        let mut owner = store
            .find_account_by_id(owner_id)?
            .ok_or_else(|| Errors::account_not_found(owner_id))?;

        buyer.debit(cost)?;
        owner.credit(cost)?;
        store.update_account(&buyer)?;
        store.update_account(&owner)?;

        // Affordable by now, so the range is bounded by the buyer's balance.
        store.append_booked_dates(listing_id, &nights(start, end))?;

        store.save_booking(NewBooking {
            owner: owner_id,
            buyer: buyer_id,
            listing: listing_id,
            start,
            end,
            cost,
            booked_at: now,
        })
    })
}
