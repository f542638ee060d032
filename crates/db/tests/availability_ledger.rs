//! Repository-level tests for the blocked-date ledger.

use sqlx::PgPool;

use sejour_core::types::{Day, DbId};
use sejour_db::models::property::CreateProperty;
use sejour_db::models::user::CreateUser;
use sejour_db::repositories::{BlockedDateRepo, PropertyRepo, UserRepo};

fn day(s: &str) -> Day {
    s.parse().unwrap()
}

async fn seed_property(pool: &PgPool) -> DbId {
    let owner = UserRepo::create(
        pool,
        &CreateUser {
            full_name: "Hôte Test".to_string(),
            email: "owner@example.fr".to_string(),
            phone: None,
            password_hash: "not-a-real-hash".to_string(),
            role: "owner".to_string(),
        },
    )
    .await
    .unwrap();

    PropertyRepo::create(
        pool,
        owner.id,
        &CreateProperty {
            title: "Villa Test".to_string(),
            description: None,
            property_type: "villa".to_string(),
            furnished: None,
            price_per_night: 200.0,
            address: "2 avenue du Port".to_string(),
            city: "Nice".to_string(),
            latitude: None,
            longitude: None,
            room_count: None,
            amenities: None,
        },
        &[],
    )
    .await
    .unwrap()
    .id
}

/// The UNNEST upsert ignores already-present dates and reports only what
/// this call inserted; the ledger reads back sorted ascending.
#[sqlx::test]
async fn add_many_is_idempotent_and_sorted(pool: PgPool) {
    let property = seed_property(&pool).await;

    let inserted = BlockedDateRepo::add_many(
        &pool,
        property,
        &[day("2031-07-03"), day("2031-07-01")],
    )
    .await
    .unwrap();
    assert_eq!(inserted.len(), 2);

    // Re-adding one existing date plus one new: only the new one comes back.
    let inserted = BlockedDateRepo::add_many(
        &pool,
        property,
        &[day("2031-07-01"), day("2031-07-02")],
    )
    .await
    .unwrap();
    assert_eq!(inserted, vec![day("2031-07-02")]);

    let all = BlockedDateRepo::list_dates(&pool, property).await.unwrap();
    assert_eq!(
        all,
        vec![day("2031-07-01"), day("2031-07-02"), day("2031-07-03")]
    );
}

/// Removal deletes what exists and ignores the rest.
#[sqlx::test]
async fn remove_many_counts_only_deleted(pool: PgPool) {
    let property = seed_property(&pool).await;
    BlockedDateRepo::add_many(&pool, property, &[day("2031-07-01"), day("2031-07-02")])
        .await
        .unwrap();

    let removed =
        BlockedDateRepo::remove_many(&pool, property, &[day("2031-07-01"), day("2031-08-15")])
            .await
            .unwrap();
    assert_eq!(removed, 1);

    let all = BlockedDateRepo::list_dates(&pool, property).await.unwrap();
    assert_eq!(all, vec![day("2031-07-02")]);
}

/// The range check is half-open: the checkout day itself may be blocked
/// without affecting a stay ending that day.
#[sqlx::test]
async fn has_any_in_range_excludes_end(pool: PgPool) {
    let property = seed_property(&pool).await;
    BlockedDateRepo::add_many(&pool, property, &[day("2031-07-05")])
        .await
        .unwrap();

    let hit = BlockedDateRepo::has_any_in_range(&pool, property, day("2031-07-01"), day("2031-07-05"))
        .await
        .unwrap();
    assert!(!hit);

    let hit = BlockedDateRepo::has_any_in_range(&pool, property, day("2031-07-01"), day("2031-07-06"))
        .await
        .unwrap();
    assert!(hit);
}
