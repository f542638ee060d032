//! Repository-level tests for property persistence, in particular the
//! `image_urls` array carrying three variant URLs per uploaded image.

use sqlx::PgPool;

use sejour_core::types::DbId;
use sejour_db::models::property::{CreateProperty, UpdateProperty};
use sejour_db::models::user::CreateUser;
use sejour_db::repositories::{PropertyRepo, UserRepo};

async fn seed_owner(pool: &PgPool) -> DbId {
    UserRepo::create(
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
    .unwrap()
    .id
}

fn new_property(title: &str) -> CreateProperty {
    CreateProperty {
        title: title.to_string(),
        description: Some("Lumineux, proche du centre".to_string()),
        property_type: "apartment".to_string(),
        furnished: Some(true),
        price_per_night: 90.0,
        address: "4 place du Marché".to_string(),
        city: "Bordeaux".to_string(),
        latitude: None,
        longitude: None,
        room_count: Some(2),
        amenities: Some(vec!["wifi".to_string()]),
    }
}

fn variant_urls(property_id: DbId, image_index: u32) -> Vec<String> {
    ["thumb", "medium", "large"]
        .iter()
        .map(|suffix| {
            format!("https://cdn.example/properties/{property_id}/{image_index}-{suffix}.jpg")
        })
        .collect()
}

/// Two uploaded images persist as six URLs, in upload order, surviving a
/// create-then-update cycle the way the image pipeline writes them.
#[sqlx::test]
async fn image_urls_round_trip_three_per_image(pool: PgPool) {
    let owner = seed_owner(&pool).await;

    let created = PropertyRepo::create(&pool, owner, &new_property("Studio Quais"), &[])
        .await
        .unwrap();
    assert!(created.image_urls.is_empty());

    let mut urls = variant_urls(created.id, 0);
    urls.extend(variant_urls(created.id, 1));

    let updated = PropertyRepo::update(
        &pool,
        created.id,
        &UpdateProperty {
            image_urls: Some(urls.clone()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.image_urls, urls);
    assert_eq!(updated.image_urls.len(), 6);

    let fetched = PropertyRepo::find_by_id(&pool, created.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.image_urls, urls);
    // The update touched only the image column.
    assert_eq!(fetched.title, "Studio Quais");
    assert_eq!(fetched.price_per_night, 90.0);
}
