use qbay::domain::{AccountSummary, NewListing};
use qbay::web::types::{
    Availability, BookingRequest, CreateListingRequest, ReviewRequest, UpdateListingRequest,
    UpdateProfileRequest,
};
use serde_json::json;
#[path = "utils/mod.rs"]
mod utils;
use utils::*;

#[test]
fn test_create_listing_request_deserialization() {
    // Price may be sent as a number or a decimal string
    let json_data = json!({
        "title": "4 bed 2 bath",
        "description": "This is a lovely place!!",
        "price": 15.5
    });

    let request: CreateListingRequest = serde_json::from_value(json_data).unwrap();

    assert_eq!(request.title, "4 bed 2 bath");
    assert_eq!(request.price.cents(), 1550);
    assert_eq!(request.address, None);

    let request: CreateListingRequest = serde_json::from_value(json!({
        "title": "4 bed 2 bath",
        "description": "This is a lovely place!!",
        "price": "100",
        "address": "Queens University"
    }))
    .unwrap();
    assert_eq!(request.price, units(100));
    assert_eq!(request.address.as_deref(), Some("Queens University"));
}

#[test]
fn test_update_requests_default_to_no_change() {
    let request: UpdateListingRequest = serde_json::from_value(json!({ "price": 150 })).unwrap();
    assert_eq!(request.price, Some(units(150)));
    assert_eq!(request.title, None);
    assert_eq!(request.description, None);
    assert_eq!(request.address, None);

    let request: UpdateProfileRequest =
        serde_json::from_value(json!({ "postalCode": "K7L3N6", "billingAddress": "1 Main Street" })).unwrap();
    assert_eq!(request.postal_code.as_deref(), Some("K7L3N6"));
    assert_eq!(request.billing_address.as_deref(), Some("1 Main Street"));
    assert_eq!(request.username, None);
}

#[test]
fn test_booking_request_deserialization() {
    let request: BookingRequest =
        serde_json::from_value(json!({ "start": "2022-12-01", "end": "2022-12-03" })).unwrap();

    assert_eq!(request.start, date(2022, 12, 1));
    assert_eq!(request.end, date(2022, 12, 3));
}

#[test]
fn test_review_request_comment_is_optional() {
    let request: ReviewRequest = serde_json::from_value(json!({ "rating": 4 })).unwrap();

    assert_eq!(request.rating, 4);
    assert_eq!(request.comment, "");
}

#[test]
fn test_listing_serialization() {
    let listing = NewListing {
        title: sample_title().to_string(),
        description: sample_description().to_string(),
        price: units(15),
        address: "Queens University".to_string(),
        owner: 1,
        created_at: sample_now(),
    }
    .with_id(3);

    let json = serde_json::to_value(&listing).unwrap();

    assert_eq!(json["id"], json!(3), "id {:?}", json["id"]);
    assert_eq!(json["title"], json!("4 bed 2 bath"), "title {:?}", json["title"]);
    assert_eq!(json["price"], json!(15.0), "price {:?}", json["price"]);
    assert_eq!(json["owner"], json!(1), "owner {:?}", json["owner"]);
    assert_eq!(json["createdAt"], json!("2022-11-01T08:28:00Z"), "createdAt {:?}", json["createdAt"]);
    assert_eq!(json["lastModified"], json!("2022-11-01T08:28:00Z"), "lastModified {:?}", json["lastModified"]);
}

#[test]
fn test_account_summary_serialization() {
    let summary = AccountSummary {
        id: 1,
        username: "u01".to_string(),
        email: "test1@test.com".to_string(),
        postal_code: Some("K7L3N6".to_string()),
        billing_address: None,
        balance: units(100),
    };

    let json = serde_json::to_value(&summary).unwrap();

    assert_eq!(json["postalCode"], json!("K7L3N6"));
    assert_eq!(json["billingAddress"], json!(null));
    assert_eq!(json["balance"], json!(100.0));
}

#[test]
fn test_availability_serialization() {
    let json = serde_json::to_value(Availability {
        earliest_available: date(2022, 12, 3),
    })
    .unwrap();

    assert_eq!(json, json!({ "earliestAvailable": "2022-12-03" }));
}
