//! Repository-level tests for the one-conversation-per-booking guarantee.

use sqlx::PgPool;

use sejour_core::types::{Day, DbId};
use sejour_db::models::booking::CreateBooking;
use sejour_db::models::property::CreateProperty;
use sejour_db::models::user::CreateUser;
use sejour_db::repositories::{BookingRepo, ConversationRepo, PropertyRepo, UserRepo};

fn day(s: &str) -> Day {
    s.parse().unwrap()
}

async fn seed_user(pool: &PgPool, email: &str, role: &str) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            full_name: "Personne Test".to_string(),
            email: email.to_string(),
            phone: None,
            password_hash: "not-a-real-hash".to_string(),
            role: role.to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_booking(pool: &PgPool) -> (DbId, DbId, DbId) {
    let owner = seed_user(pool, "owner@example.fr", "owner").await;
    let client = seed_user(pool, "client@example.fr", "client").await;
    let property = PropertyRepo::create(
        pool,
        owner,
        &CreateProperty {
            title: "Appartement Test".to_string(),
            description: None,
            property_type: "apartment".to_string(),
            furnished: None,
            price_per_night: 100.0,
            address: "1 rue de la Paix".to_string(),
            city: "Paris".to_string(),
            latitude: None,
            longitude: None,
            room_count: None,
            amenities: None,
        },
        &[],
    )
    .await
    .unwrap();

    let booking = BookingRepo::create(
        pool,
        &CreateBooking {
            property_id: property.id,
            client_id: client,
            start_date: day("2031-06-01"),
            end_date: day("2031-06-05"),
            nights: 4,
            guests: 2,
            message: None,
            total_price: 400.0,
        },
    )
    .await
    .unwrap();

    (booking.id, client, owner)
}

/// The unique constraint rejects a second conversation for the same
/// booking; callers resolve the race by re-reading.
#[sqlx::test]
async fn second_conversation_for_booking_is_rejected(pool: PgPool) {
    let (booking_id, client, owner) = seed_booking(&pool).await;

    let first = ConversationRepo::create(&pool, booking_id, client, owner)
        .await
        .unwrap();

    let err = ConversationRepo::create(&pool, booking_id, client, owner)
        .await
        .unwrap_err();
    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.constraint(), Some("uq_conversations_booking"));
        }
        other => panic!("expected database error, got {other:?}"),
    }

    let existing = ConversationRepo::find_by_booking(&pool, booking_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(existing.id, first.id);
}
