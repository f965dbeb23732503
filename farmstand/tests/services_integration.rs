//! End-to-end marketplace flows through the service layer.

use chrono::{TimeZone, Utc};

use farmstand::db::{self, demo_snapshot, LocalRepository, ServiceError, UserRepository};
use farmstand::forms::{AvailabilityFilterForm, AvailabilityForm, NewProductForm};
use farmstand::models::{MissingBoundPolicy, User, UserId, UserRole, UserStatus, YearMonth};
use farmstand::services::{Decision, ProductQuery, SortOption};

fn applicant() -> User {
    User {
        id: UserId::from("u5"),
        name: "Hillside Orchard".to_string(),
        email: "hello@hillside.example".to_string(),
        role: UserRole::Producer,
        location: Some("Hood River, OR".to_string()),
        avatar_url: None,
        bio: None,
        status: UserStatus::Pending,
        is_verified: false,
    }
}

fn peaches() -> NewProductForm {
    NewProductForm {
        name: "Peaches".to_string(),
        category: "Fruit".to_string(),
        price: "18".to_string(),
        unit: "box".to_string(),
        availability: AvailabilityForm::new("2023-07-20", "2023-08-31"),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_new_producer_lists_after_approval() {
    let repo = LocalRepository::from_snapshot(demo_snapshot().unwrap());
    let orchard = applicant();
    repo.insert_user(&orchard).await.unwrap();

    let err = db::create_product(&repo, &orchard.id, &peaches())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotPermitted { .. }));

    db::decide_application(&repo, &UserId::from("u4"), &orchard.id, Decision::Approve)
        .await
        .unwrap();
    let listed = db::create_product(&repo, &orchard.id, &peaches())
        .await
        .unwrap();
    assert_eq!(listed.price_per_lb(), Some(3.6));

    let filter = AvailabilityFilterForm::new("2023-08-01", "2023-08-07")
        .to_query()
        .unwrap()
        .unwrap();
    let query = ProductQuery::new()
        .available_during(filter)
        .sorted_by(SortOption::PriceDesc);
    let names: Vec<String> = db::list_marketplace_products(&repo, &query)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(
        names,
        vec!["Peaches", "Microgreens Mix", "Heirloom Tomatoes", "Fresh Basil"]
    );
}

#[tokio::test]
async fn test_listing_without_window_depends_on_policy() {
    let repo = LocalRepository::from_snapshot(demo_snapshot().unwrap());
    let mut form = peaches();
    form.availability = AvailabilityForm::default();
    db::create_product(&repo, &UserId::from("u1"), &form)
        .await
        .unwrap();

    let july = YearMonth::new(2023, 7).unwrap();
    let strict = db::producer_calendar(&repo, &UserId::from("u1"), july, MissingBoundPolicy::Strict)
        .await
        .unwrap();
    let permissive = db::producer_calendar(
        &repo,
        &UserId::from("u1"),
        july,
        MissingBoundPolicy::Permissive,
    )
    .await
    .unwrap();

    assert!(strict.cells().iter().all(|c| c.items.len() == 2));
    assert!(permissive.cells().iter().all(|c| c.items.len() == 3));
}

#[tokio::test]
async fn test_consumer_contacts_and_reviews_producer() {
    let repo = LocalRepository::from_snapshot(demo_snapshot().unwrap());
    let alice = UserId::from("u2");
    let green_valley = UserId::from("u1");
    let now = Utc.with_ymd_and_hms(2023, 6, 10, 14, 30, 0).unwrap();

    let contacts = db::list_contacts(&repo, &alice).await.unwrap();
    assert!(contacts.iter().all(|u| u.role == UserRole::Producer));

    db::send_message(&repo, &alice, &green_valley, "Picking up Saturday?", now)
        .await
        .unwrap();
    let thread = db::get_conversation(&repo, &green_valley, &alice)
        .await
        .unwrap();
    assert_eq!(thread.last().unwrap().content, "Picking up Saturday?");

    db::submit_review(&repo, &alice, &green_valley, None, 3, "Good, not great.", now)
        .await
        .unwrap();
    let rating = db::producer_rating(&repo, &green_valley).await.unwrap();
    assert_eq!(rating.count, 4);
    assert!((rating.average - 4.25).abs() < 1e-9);
}

#[tokio::test]
async fn test_calendar_serializes_calendar_dates() {
    let repo = LocalRepository::from_snapshot(demo_snapshot().unwrap());
    let june = YearMonth::new(2023, 6).unwrap();
    let grid = db::producer_calendar(&repo, &UserId::from("u3"), june, MissingBoundPolicy::Strict)
        .await
        .unwrap();

    let json = serde_json::to_value(&grid).unwrap();
    assert_eq!(json["month"], "2023-06");
    assert_eq!(json["cells"][0]["date"], "2023-06-01");
    assert_eq!(json["cells"][0]["items"][0]["availableFrom"], "2023-01-01");
}
