// src/domain/accounts.rs
use serde::{Deserialize, Serialize};

use super::core::{AccountId, Errors, Field};
use super::validation;
use crate::money::Amount;
use crate::persistence::PersistenceGateway;

/// Balance credited to every newly registered account.
pub fn initial_balance() -> Amount {
    Amount::units(100)
}

/// A registered user. Loaded once from the gateway; every mutation goes
/// through a named update that validates, writes through, and only then
/// changes this value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: AccountId,
    username: String,
    email: String,
    password: String,
    postal_code: Option<String>,
    billing_address: Option<String>,
    balance: Amount,
}

/// The publicly visible part of an account; never carries the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    #[serde(rename = "postalCode")]
    pub postal_code: Option<String>,
    #[serde(rename = "billingAddress")]
    pub billing_address: Option<String>,
    pub balance: Amount,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        AccountSummary {
            id: account.id,
            username: account.username.clone(),
            email: account.email.clone(),
            postal_code: account.postal_code.clone(),
            billing_address: account.billing_address.clone(),
            balance: account.balance,
        }
    }
}

/// An account row that has not been assigned an identifier yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    pub postal_code: Option<String>,
    pub billing_address: Option<String>,
    pub balance: Amount,
}

impl NewAccount {
    /// Used by gateway implementations when the row is inserted.
    pub fn with_id(self, id: AccountId) -> Account {
        Account {
            id,
            username: self.username,
            email: self.email,
            password: self.password,
            postal_code: self.postal_code,
            billing_address: self.billing_address,
            balance: self.balance,
        }
    }
}

impl Account {
    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn postal_code(&self) -> Option<&str> {
        self.postal_code.as_deref()
    }

    pub fn billing_address(&self) -> Option<&str> {
        self.billing_address.as_deref()
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    pub fn register<G: PersistenceGateway>(
        gateway: &mut G,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Account, Errors> {
        if !validation::valid_username(username) {
            return Err(Errors::invalid(
                Field::Username,
                username,
                "must be 3-19 alphanumeric characters or inner spaces",
            ));
        }
        if !validation::valid_email(email) {
            return Err(Errors::invalid(Field::Email, email, "must be a valid email address"));
        }
        if !validation::valid_password(password) {
            return Err(Errors::invalid(
                Field::Password,
                "********",
                "must be at least 6 characters with upper case, lower case and a special character",
            ));
        }
        if gateway.find_account_by_email(email)?.is_some() {
            return Err(Errors::DuplicateEmail(email.to_string()));
        }

        gateway.insert_account(NewAccount {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            postal_code: None,
            billing_address: None,
            balance: initial_balance(),
        })
    }

    /// Format checks run before any lookup so a malformed credential is
    /// indistinguishable from one that was never tried against storage.
    pub fn login<G: PersistenceGateway>(
        gateway: &G,
        email: &str,
        password: &str,
    ) -> Result<Account, Errors> {
        if !validation::valid_email(email) || !validation::valid_password(password) {
            return Err(Errors::InvalidCredentialsFormat);
        }

        match gateway.find_account_by_email(email)? {
            Some(account) if account.password == password => Ok(account),
            _ => Err(Errors::Authentication),
        }
    }

    pub fn update_username<G: PersistenceGateway>(
        &mut self,
        gateway: &mut G,
        username: &str,
    ) -> Result<(), Errors> {
        if !validation::valid_username(username) {
            return Err(Errors::invalid(
                Field::Username,
                username,
                "must be 3-19 alphanumeric characters or inner spaces",
            ));
        }
        if let Some(other) = gateway.find_account_by_username(username)? {
            if other.id != self.id {
                return Err(Errors::DuplicateUsername(username.to_string()));
            }
        }

        self.write_through(gateway, |account| account.username = username.to_string())
    }

    pub fn update_email<G: PersistenceGateway>(
        &mut self,
        gateway: &mut G,
        email: &str,
    ) -> Result<(), Errors> {
        if !validation::valid_email(email) {
            return Err(Errors::invalid(Field::Email, email, "must be a valid email address"));
        }
        if let Some(other) = gateway.find_account_by_email(email)? {
            if other.id != self.id {
                return Err(Errors::DuplicateEmail(email.to_string()));
            }
        }

        self.write_through(gateway, |account| account.email = email.to_string())
    }

    pub fn update_billing_address<G: PersistenceGateway>(
        &mut self,
        gateway: &mut G,
        billing_address: &str,
    ) -> Result<(), Errors> {
        if !validation::valid_address(billing_address) {
            return Err(Errors::invalid(
                Field::BillingAddress,
                billing_address,
                "must be at most 46 characters",
            ));
        }

        self.write_through(gateway, |account| {
            account.billing_address = Some(billing_address.to_string())
        })
    }

    pub fn update_postal_code<G: PersistenceGateway>(
        &mut self,
        gateway: &mut G,
        postal_code: &str,
    ) -> Result<(), Errors> {
        if !validation::valid_postal_code(postal_code) {
            return Err(Errors::invalid(
                Field::PostalCode,
                postal_code,
                "must be a valid Canadian postal code",
            ));
        }

        self.write_through(gateway, |account| {
            account.postal_code = Some(postal_code.to_uppercase())
        })
    }

    /// Adjusts the in-memory balance only; callers persist it, normally
    /// inside a transaction alongside the matching `credit`.
    pub fn debit(&mut self, amount: Amount) -> Result<(), Errors> {
        if amount.is_negative() {
            return Err(Errors::InvalidAmount(amount));
        }
        if amount > self.balance {
            return Err(Errors::InsufficientFunds {
                balance: self.balance,
                required: amount,
            });
        }
        self.balance = (self.balance - amount).map_err(|_| Errors::InvalidAmount(amount))?;
        Ok(())
    }

    pub fn credit(&mut self, amount: Amount) -> Result<(), Errors> {
        if amount.is_negative() {
            return Err(Errors::InvalidAmount(amount));
        }
        self.balance = (self.balance + amount).map_err(|_| Errors::InvalidAmount(amount))?;
        Ok(())
    }

    fn write_through<G, F>(&mut self, gateway: &mut G, change: F) -> Result<(), Errors>
    where
        G: PersistenceGateway,
        F: FnOnce(&mut Account),
    {
        let mut updated = self.clone();
        change(&mut updated);
        gateway.update_account(&updated)?;
        *self = updated;
        Ok(())
    }
}
