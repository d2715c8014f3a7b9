// src/domain/reviews.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::core::{AccountId, Errors, Field, ListingId, ReviewId};
use super::validation;
use crate::persistence::PersistenceGateway;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub listing: ListingId,
    pub author: AccountId,
    pub rating: u8,
    pub comment: String,
    #[serde(rename = "postedAt")]
    pub posted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub listing: ListingId,
    pub author: AccountId,
    pub rating: u8,
    pub comment: String,
    pub posted_at: DateTime<Utc>,
}

impl NewReview {
    pub fn with_id(self, id: ReviewId) -> Review {
        Review {
            id,
            listing: self.listing,
            author: self.author,
            rating: self.rating,
            comment: self.comment,
            posted_at: self.posted_at,
        }
    }
}

/// Only guests who have booked the listing may review it.
pub fn post_review<G: PersistenceGateway>(
    gateway: &mut G,
    author: AccountId,
    listing_id: ListingId,
    rating: u8,
    comment: &str,
    now: DateTime<Utc>,
) -> Result<Review, Errors> {
    if !validation::valid_rating(rating) {
        return Err(Errors::invalid(Field::Rating, rating, "must be between 1 and 5"));
    }
    if !validation::valid_comment(comment) {
        return Err(Errors::invalid(Field::Comment, comment, "must be at most 2000 characters"));
    }

    if gateway.find_account_by_id(author)?.is_none() {
        return Err(Errors::account_not_found(author));
    }
    let listing = gateway
        .find_listing_by_id(listing_id)?
        .ok_or_else(|| Errors::listing_not_found(listing_id))?;
    if listing.owner() == author {
        return Err(Errors::SameUser(author));
    }

    let has_stayed = gateway
        .list_bookings_for_listing(listing_id)?
        .iter()
        .any(|booking| booking.buyer == author);
    if !has_stayed {
        return Err(Errors::NotAGuest {
            account: author,
            listing: listing_id,
        });
    }

    gateway.save_review(NewReview {
        listing: listing_id,
        author,
        rating,
        comment: comment.to_string(),
        posted_at: now,
    })
}
