// src/domain/listings.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::core::{AccountId, Errors, Field, ListingId};
use super::validation;
use crate::money::Amount;
use crate::persistence::PersistenceGateway;

/// Only `create` builds a listing, so it serializes but never deserializes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    id: ListingId,
    title: String,
    description: String,
    price: Amount,
    address: String,
    owner: AccountId,
    #[serde(rename = "createdAt")]
    created_at: DateTime<Utc>,
    #[serde(rename = "lastModified")]
    last_modified: DateTime<Utc>,
}

/// A listing row that has not been assigned an identifier yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    pub price: Amount,
    pub address: String,
    pub owner: AccountId,
    pub created_at: DateTime<Utc>,
}

impl NewListing {
    /// Used by gateway implementations when the row is inserted.
    pub fn with_id(self, id: ListingId) -> Listing {
        Listing {
            id,
            title: self.title,
            description: self.description,
            price: self.price,
            address: self.address,
            owner: self.owner,
            created_at: self.created_at,
            last_modified: self.created_at,
        }
    }
}

fn check_title(title: &str) -> Result<(), Errors> {
    if validation::valid_title(title) {
        Ok(())
    } else {
        Err(Errors::invalid(
            Field::Title,
            title,
            "must be 1-80 alphanumeric characters or inner spaces",
        ))
    }
}

fn check_description(description: &str, title: &str) -> Result<(), Errors> {
    if validation::valid_description(description, title) {
        Ok(())
    } else {
        Err(Errors::invalid(
            Field::Description,
            description,
            "must be 20-2000 characters and longer than the title",
        ))
    }
}

fn check_address(address: &str) -> Result<(), Errors> {
    if validation::valid_address(address) {
        Ok(())
    } else {
        Err(Errors::invalid(Field::Address, address, "must be at most 46 characters"))
    }
}

impl Listing {
    pub fn id(&self) -> ListingId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> Amount {
        self.price
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn owner(&self) -> AccountId {
        self.owner
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    /// Validates title, description, price, owner and address in that order,
    /// stopping at the first failure, then claims the title.
    pub fn create<G: PersistenceGateway>(
        gateway: &mut G,
        title: &str,
        description: &str,
        price: Amount,
        owner: AccountId,
        address: &str,
        now: DateTime<Utc>,
    ) -> Result<Listing, Errors> {
        check_title(title)?;
        check_description(description, title)?;
        if !validation::valid_price(price) {
            return Err(Errors::invalid(Field::Price, price, "must be between 10.00 and 10000.00"));
        }
        if !validation::valid_seller(&*gateway, owner)? {
            return Err(Errors::invalid(
                Field::Owner,
                owner,
                "must be a registered account with an email",
            ));
        }
        check_address(address)?;
        if gateway.find_listing_by_title(title)?.is_some() {
            return Err(Errors::DuplicateTitle(title.to_string()));
        }

        gateway.insert_listing(NewListing {
            title: title.to_string(),
            description: description.to_string(),
            price,
            address: address.to_string(),
            owner,
            created_at: now,
        })
    }

    pub fn update_title<G: PersistenceGateway>(
        &mut self,
        gateway: &mut G,
        title: &str,
        now: DateTime<Utc>,
    ) -> Result<(), Errors> {
        check_title(title)?;
        if !validation::valid_description(&self.description, title) {
            return Err(Errors::invalid(
                Field::Title,
                title,
                "must be shorter than the description",
            ));
        }
        if let Some(other) = gateway.find_listing_by_title(title)? {
            if other.id != self.id {
                return Err(Errors::DuplicateTitle(title.to_string()));
            }
        }

        self.write_through(gateway, now, |listing| listing.title = title.to_string())
    }

    pub fn update_description<G: PersistenceGateway>(
        &mut self,
        gateway: &mut G,
        description: &str,
        now: DateTime<Utc>,
    ) -> Result<(), Errors> {
        check_description(description, &self.title)?;
        self.write_through(gateway, now, |listing| {
            listing.description = description.to_string()
        })
    }

    /// Prices only ever go up.
    pub fn update_price<G: PersistenceGateway>(
        &mut self,
        gateway: &mut G,
        price: Amount,
        now: DateTime<Utc>,
    ) -> Result<(), Errors> {
        if !validation::valid_price_increase(self.price, price) {
            return Err(Errors::invalid(
                Field::Price,
                price,
                "must be between 10.00 and 10000.00 and above the current price",
            ));
        }
        self.write_through(gateway, now, |listing| listing.price = price)
    }

    pub fn update_address<G: PersistenceGateway>(
        &mut self,
        gateway: &mut G,
        address: &str,
        now: DateTime<Utc>,
    ) -> Result<(), Errors> {
        check_address(address)?;
        self.write_through(gateway, now, |listing| listing.address = address.to_string())
    }

    pub fn reassign_owner(&mut self, _owner: AccountId) -> Result<(), Errors> {
        Err(Errors::ImmutableField("owner"))
    }

    /// First date on or after `today` that is not booked.
    pub fn find_earliest_available_date<G: PersistenceGateway>(
        &self,
        gateway: &G,
        today: NaiveDate,
    ) -> Result<NaiveDate, Errors> {
        let booked = gateway.list_booked_dates(self.id)?;
        let mut candidate = today;
        for date in booked.range(today..) {
            if *date != candidate {
                break;
            }
            candidate = match candidate.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
        Ok(candidate)
    }

    fn write_through<G, F>(&mut self, gateway: &mut G, now: DateTime<Utc>, change: F) -> Result<(), Errors>
    where
        G: PersistenceGateway,
        F: FnOnce(&mut Listing),
    {
        let mut updated = self.clone();
        change(&mut updated);
        updated.last_modified = now;
        gateway.update_listing(&updated)?;
        *self = updated;
        Ok(())
    }
}
