// src/domain/mod.rs
pub mod accounts;
pub mod bookings;
pub mod commands;
pub mod core;
pub mod listings;
pub mod reviews;
pub mod validation;

pub use self::accounts::*;
pub use self::bookings::*;
pub use self::commands::*;
pub use self::core::*;
pub use self::listings::*;
pub use self::reviews::*;

use crate::persistence::PersistenceGateway;

pub fn handle<G: PersistenceGateway>(command: Command, gateway: &mut G) -> Result<CommandSuccess, Errors> {
    match command {
        Command::Register { timestamp, username, email, password } => {
            let account = Account::register(gateway, &username, &email, &password)?;
            Ok(CommandSuccess::Registered {
                timestamp,
                account: AccountSummary::from(&account),
            })
        }

        Command::Login { timestamp, email, password } => {
            let account = Account::login(gateway, &email, &password)?;
            Ok(CommandSuccess::LoggedIn {
                timestamp,
                account: AccountSummary::from(&account),
            })
        }

        Command::UpdateProfile { timestamp, account, username, email, billing_address, postal_code } => {
            gateway.run_in_transaction(|store| {
                let mut account = store
                    .find_account_by_id(account)?
                    .ok_or_else(|| Errors::account_not_found(account))?;

                if let Some(username) = username {
                    account.update_username(store, &username)?;
                }
                if let Some(email) = email {
                    account.update_email(store, &email)?;
                }
                if let Some(billing_address) = billing_address {
                    account.update_billing_address(store, &billing_address)?;
                }
                if let Some(postal_code) = postal_code {
                    account.update_postal_code(store, &postal_code)?;
                }

                Ok(CommandSuccess::ProfileUpdated {
                    timestamp,
                    account: AccountSummary::from(&account),
                })
            })
        }

        Command::CreateListing { timestamp, owner, title, description, price, address } => {
            let listing = Listing::create(gateway, &title, &description, price, owner, &address, timestamp)?;
            Ok(CommandSuccess::ListingCreated { timestamp, listing })
        }

        Command::UpdateListing { timestamp, by, listing, title, description, price, address } => {
            gateway.run_in_transaction(|store| {
                let mut listing = store
                    .find_listing_by_id(listing)?
                    .ok_or_else(|| Errors::listing_not_found(listing))?;
                if listing.owner() != by {
                    return Err(Errors::ListingOwnerMismatch {
                        listing: listing.id(),
                        owner: by,
                    });
                }

                if let Some(title) = title {
                    listing.update_title(store, &title, timestamp)?;
                }
                if let Some(description) = description {
                    listing.update_description(store, &description, timestamp)?;
                }
                if let Some(price) = price {
                    listing.update_price(store, price, timestamp)?;
                }
                if let Some(address) = address {
                    listing.update_address(store, &address, timestamp)?;
                }

                Ok(CommandSuccess::ListingUpdated { timestamp, listing })
            })
        }

        Command::BookListing { timestamp, buyer, owner, listing, start, end } => {
            let booking = book_listing(gateway, buyer, owner, listing, start, end, timestamp)?;
            Ok(CommandSuccess::ListingBooked { timestamp, booking })
        }

        Command::PostReview { timestamp, author, listing, rating, comment } => {
            let review = post_review(gateway, author, listing, rating, &comment, timestamp)?;
            Ok(CommandSuccess::ReviewPosted { timestamp, review })
        }
    }
}

/// Rebuilds state from a command log. Every logged command succeeded once,
/// so any failure here means the log and the store disagree.
pub fn replay<G: PersistenceGateway>(commands: Vec<Command>, gateway: &mut G) -> Result<usize, Errors> {
    let count = commands.len();
    for command in commands {
        handle(command, gateway)?;
    }
    Ok(count)
}
