use actix_web::error::ErrorInternalServerError;
use actix_web::http::StatusCode;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer, Result};
use base64::{engine::general_purpose, Engine as _};
use chrono::Utc;
use log::{info, warn};
use serde_json::Value;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::Config;
use crate::domain::{handle, replay, AccountId, Command, Errors, ListingId};
use crate::persistence::json_file::{append_command, read_commands};
use crate::persistence::{InMemoryStore, PersistenceGateway};
use super::types::{
    ApiError, AppState, Availability, AvailabilityQuery, BookingRequest, CreateListingRequest,
    ListingsQuery, LoginRequest, RegisterRequest, ReviewRequest, UpdateListingRequest,
    UpdateProfileRequest,
};

// Initialize application state, replaying the command log when there is one
pub fn init_app_state(command_log: Option<PathBuf>) -> Result<AppState, Errors> {
    let mut store = InMemoryStore::new();
    if let Some(path) = &command_log {
        let count = replay(read_commands(path)?, &mut store)?;
        info!("Replayed {} commands from {}", count, path.display());
    }
    Ok(AppState {
        store: Arc::new(Mutex::new(store)),
        command_log,
    })
}

pub fn error_status(err: &Errors) -> StatusCode {
    match err {
        Errors::Validation { .. }
        | Errors::InvalidDateRange { .. }
        | Errors::SameUser(_)
        | Errors::InvalidAmount(_) => StatusCode::BAD_REQUEST,
        Errors::InvalidCredentialsFormat | Errors::Authentication => StatusCode::UNAUTHORIZED,
        Errors::NotAGuest { .. } | Errors::ListingOwnerMismatch { .. } | Errors::ImmutableField(_) => {
            StatusCode::FORBIDDEN
        }
        Errors::NotFound { .. } => StatusCode::NOT_FOUND,
        Errors::DuplicateEmail(_)
        | Errors::DuplicateUsername(_)
        | Errors::DuplicateTitle(_)
        | Errors::DateConflict(_)
        | Errors::InsufficientFunds { .. } => StatusCode::CONFLICT,
        Errors::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: &Errors) -> HttpResponse {
    HttpResponse::build(error_status(err)).json(ApiError {
        message: err.to_string(),
    })
}

// Read x-jwt-payload header and extract the account id
fn get_auth_account(req: &HttpRequest) -> Option<AccountId> {
    let auth_header = req.headers().get("x-jwt-payload")?;
    let auth_str = auth_header.to_str().ok()?;

    let decoded = general_purpose::STANDARD.decode(auth_str).ok()?;
    let json: Value = serde_json::from_slice(&decoded).ok()?;

    match json.get("sub")? {
        Value::String(sub) => sub.parse().ok(),
        Value::Number(sub) => sub.as_i64(),
        _ => None,
    }
}

// Middleware to require authentication
async fn with_auth<F>(req: HttpRequest, f: F) -> Result<HttpResponse>
where
    F: FnOnce(AccountId) -> Result<HttpResponse>,
{
    match get_auth_account(&req) {
        Some(account) => f(account),
        None => Ok(HttpResponse::Unauthorized().json(ApiError {
            message: "Unauthorized".to_string(),
        })),
    }
}

fn lock_store(data: &AppState) -> Result<MutexGuard<'_, InMemoryStore>> {
    data.store
        .lock()
        .map_err(|_| ErrorInternalServerError("store lock poisoned"))
}

// Run a command and its log append as one transaction
fn execute(store: &mut InMemoryStore, command_log: Option<&Path>, command: Command) -> HttpResponse {
    let name = command.name();
    let result = store.run_in_transaction(|store| {
        let logged = command.clone();
        let success = handle(command, store)?;
        if logged.is_mutation() {
            if let Some(path) = command_log {
                append_command(path, &logged)?;
            }
        }
        Ok(success)
    });

    match result {
        Ok(success) => HttpResponse::Ok().json(success),
        Err(err) => {
            warn!("{} rejected: {}", name, err);
            error_response(&err)
        }
    }
}

async fn register(body: web::Json<RegisterRequest>, data: web::Data<AppState>) -> Result<HttpResponse> {
    let body = body.into_inner();
    let command = Command::Register {
        timestamp: Utc::now(),
        username: body.username,
        email: body.email,
        password: body.password,
    };

    let mut store = lock_store(&data)?;
    Ok(execute(&mut store, data.command_log.as_deref(), command))
}

async fn login(body: web::Json<LoginRequest>, data: web::Data<AppState>) -> Result<HttpResponse> {
    let body = body.into_inner();
    let command = Command::Login {
        timestamp: Utc::now(),
        email: body.email,
        password: body.password,
    };

    let mut store = lock_store(&data)?;
    Ok(execute(&mut store, data.command_log.as_deref(), command))
}

async fn update_profile(
    req: HttpRequest,
    body: web::Json<UpdateProfileRequest>,
    data: web::Data<AppState>,
) -> Result<HttpResponse> {
    with_auth(req, |account| {
        let body = body.into_inner();
        let command = Command::UpdateProfile {
            timestamp: Utc::now(),
            account,
            username: body.username,
            email: body.email,
            billing_address: body.billing_address,
            postal_code: body.postal_code,
        };

        let mut store = lock_store(&data)?;
        Ok(execute(&mut store, data.command_log.as_deref(), command))
    })
    .await
}

async fn account_bookings(req: HttpRequest, data: web::Data<AppState>) -> Result<HttpResponse> {
    with_auth(req, |account| {
        let store = lock_store(&data)?;
        match store.list_bookings_for_account(account) {
            Ok(bookings) => Ok(HttpResponse::Ok().json(bookings)),
            Err(err) => Ok(error_response(&err)),
        }
    })
    .await
}

// Get all listings, optionally only one owner's
async fn get_listings(query: web::Query<ListingsQuery>, data: web::Data<AppState>) -> Result<HttpResponse> {
    let store = lock_store(&data)?;
    let listings = match query.owner {
        Some(owner) => store.list_listings_by_owner(owner),
        None => store.list_listings(),
    };

    match listings {
        Ok(listings) => Ok(HttpResponse::Ok().json(listings)),
        Err(err) => Ok(error_response(&err)),
    }
}

async fn get_listing(path: web::Path<ListingId>, data: web::Data<AppState>) -> Result<HttpResponse> {
    let listing_id = path.into_inner();
    let store = lock_store(&data)?;

    match store.find_listing_by_id(listing_id) {
        Ok(Some(listing)) => Ok(HttpResponse::Ok().json(listing)),
        Ok(None) => Ok(error_response(&Errors::listing_not_found(listing_id))),
        Err(err) => Ok(error_response(&err)),
    }
}

async fn create_listing(
    req: HttpRequest,
    body: web::Json<CreateListingRequest>,
    data: web::Data<AppState>,
) -> Result<HttpResponse> {
    with_auth(req, |owner| {
        let body = body.into_inner();
        let command = Command::CreateListing {
            timestamp: Utc::now(),
            owner,
            title: body.title,
            description: body.description,
            price: body.price,
            address: body.address.unwrap_or_default(),
        };

        let mut store = lock_store(&data)?;
        Ok(execute(&mut store, data.command_log.as_deref(), command))
    })
    .await
}

async fn update_listing(
    req: HttpRequest,
    path: web::Path<ListingId>,
    body: web::Json<UpdateListingRequest>,
    data: web::Data<AppState>,
) -> Result<HttpResponse> {
    let listing = path.into_inner();

    with_auth(req, |by| {
        let body = body.into_inner();
        let command = Command::UpdateListing {
            timestamp: Utc::now(),
            by,
            listing,
            title: body.title,
            description: body.description,
            price: body.price,
            address: body.address,
        };

        let mut store = lock_store(&data)?;
        Ok(execute(&mut store, data.command_log.as_deref(), command))
    })
    .await
}

async fn get_availability(
    path: web::Path<ListingId>,
    query: web::Query<AvailabilityQuery>,
    data: web::Data<AppState>,
) -> Result<HttpResponse> {
    let listing_id = path.into_inner();
    let today = query.today.unwrap_or_else(|| Utc::now().date_naive());
    let store = lock_store(&data)?;

    let earliest = store
        .find_listing_by_id(listing_id)
        .and_then(|listing| listing.ok_or_else(|| Errors::listing_not_found(listing_id)))
        .and_then(|listing| listing.find_earliest_available_date(&*store, today));

    match earliest {
        Ok(earliest_available) => Ok(HttpResponse::Ok().json(Availability { earliest_available })),
        Err(err) => Ok(error_response(&err)),
    }
}

// Book a listing; the owner is whoever owns the listing right now
async fn book_listing(
    req: HttpRequest,
    path: web::Path<ListingId>,
    body: web::Json<BookingRequest>,
    data: web::Data<AppState>,
) -> Result<HttpResponse> {
    let listing_id = path.into_inner();

    with_auth(req, |buyer| {
        let mut store = lock_store(&data)?;
        let owner = match store.find_listing_by_id(listing_id) {
            Ok(Some(listing)) => listing.owner(),
            Ok(None) => return Ok(error_response(&Errors::listing_not_found(listing_id))),
            Err(err) => return Ok(error_response(&err)),
        };

        let command = Command::BookListing {
            timestamp: Utc::now(),
            buyer,
            owner,
            listing: listing_id,
            start: body.start,
            end: body.end,
        };
        Ok(execute(&mut store, data.command_log.as_deref(), command))
    })
    .await
}

async fn get_reviews(path: web::Path<ListingId>, data: web::Data<AppState>) -> Result<HttpResponse> {
    let listing_id = path.into_inner();
    let store = lock_store(&data)?;

    let reviews = store
        .find_listing_by_id(listing_id)
        .and_then(|listing| listing.ok_or_else(|| Errors::listing_not_found(listing_id)))
        .and_then(|_| store.list_reviews(listing_id));

    match reviews {
        Ok(reviews) => Ok(HttpResponse::Ok().json(reviews)),
        Err(err) => Ok(error_response(&err)),
    }
}

async fn post_review(
    req: HttpRequest,
    path: web::Path<ListingId>,
    body: web::Json<ReviewRequest>,
    data: web::Data<AppState>,
) -> Result<HttpResponse> {
    let listing = path.into_inner();

    with_auth(req, |author| {
        let body = body.into_inner();
        let command = Command::PostReview {
            timestamp: Utc::now(),
            author,
            listing,
            rating: body.rating,
            comment: body.comment,
        };

        let mut store = lock_store(&data)?;
        Ok(execute(&mut store, data.command_log.as_deref(), command))
    })
    .await
}

// Configure routes
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/account", web::patch().to(update_profile))
            .route("/account/bookings", web::get().to(account_bookings))
            .route("/listings", web::get().to(get_listings))
            .route("/listings", web::post().to(create_listing))
            .route("/listings/{id}", web::get().to(get_listing))
            .route("/listings/{id}", web::patch().to(update_listing))
            .route("/listings/{id}/availability", web::get().to(get_availability))
            .route("/listings/{id}/bookings", web::post().to(book_listing))
            .route("/listings/{id}/reviews", web::get().to(get_reviews))
            .route("/listings/{id}/reviews", web::post().to(post_review)),
    );
}

// Main application
pub async fn run_app(config: Config) -> io::Result<()> {
    let app_state = init_app_state(config.command_log.clone())
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err.to_string()))?;

    info!("Starting server on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(Logger::default())
            .configure(configure_app)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
