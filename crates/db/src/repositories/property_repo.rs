//! Repository for the `properties` table, including filtered search.

use sqlx::{PgPool, Postgres, QueryBuilder};

use sejour_core::types::DbId;

use crate::models::property::{CreateProperty, Property, PropertyFilters, UpdateProperty};

/// Column list shared across queries. `type` is quoted because it is a
/// reserved-ish identifier.
const COLUMNS: &str = "id, owner_id, title, description, type, furnished, price_per_night, \
     address, city, latitude, longitude, room_count, image_urls, amenities, \
     created_at, updated_at";

/// Provides CRUD and filtered search over property listings.
pub struct PropertyRepo;

impl PropertyRepo {
    /// Insert a new property, returning the created row.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateProperty,
        image_urls: &[String],
    ) -> Result<Property, sqlx::Error> {
        let query = format!(
            "INSERT INTO properties
                (owner_id, title, description, type, furnished, price_per_night,
                 address, city, latitude, longitude, room_count, image_urls, amenities)
             VALUES ($1, $2, $3, $4, COALESCE($5, FALSE), $6, $7, $8, $9, $10, $11, $12,
                     COALESCE($13, '{{}}'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(owner_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.property_type)
            .bind(input.furnished)
            .bind(input.price_per_night)
            .bind(&input.address)
            .bind(&input.city)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(input.room_count)
            .bind(image_urls)
            .bind(&input.amenities)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Property>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM properties WHERE id = $1");
        sqlx::query_as::<_, Property>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Filtered, paginated search ordered by `created_at DESC`.
    ///
    /// Returns the page of rows plus the total count matching the filters.
    pub async fn search(
        pool: &PgPool,
        filters: &PropertyFilters,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Property>, i64), sqlx::Error> {
        let mut list = QueryBuilder::<Postgres>::new(format!(
            "SELECT {COLUMNS} FROM properties WHERE TRUE"
        ));
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM properties WHERE TRUE");

        for builder in [&mut list, &mut count] {
            if let Some(city) = &filters.city {
                builder
                    .push(" AND city ILIKE ")
                    .push_bind(format!("%{city}%"));
            }
            if let Some(property_type) = &filters.property_type {
                builder.push(" AND type = ").push_bind(property_type.clone());
            }
            if let Some(furnished) = filters.furnished {
                builder.push(" AND furnished = ").push_bind(furnished);
            }
            if let Some(price_min) = filters.price_min {
                builder.push(" AND price_per_night >= ").push_bind(price_min);
            }
            if let Some(price_max) = filters.price_max {
                builder.push(" AND price_per_night <= ").push_bind(price_max);
            }
        }

        list.push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let rows = list.build_query_as::<Property>().fetch_all(pool).await?;
        let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

        Ok((rows, total))
    }

    /// List all properties for an owner, newest first.
    pub async fn list_by_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Property>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM properties
             WHERE owner_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Update a property. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProperty,
    ) -> Result<Option<Property>, sqlx::Error> {
        let query = format!(
            "UPDATE properties SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                type = COALESCE($4, type),
                furnished = COALESCE($5, furnished),
                price_per_night = COALESCE($6, price_per_night),
                address = COALESCE($7, address),
                city = COALESCE($8, city),
                latitude = COALESCE($9, latitude),
                longitude = COALESCE($10, longitude),
                room_count = COALESCE($11, room_count),
                image_urls = COALESCE($12, image_urls),
                amenities = COALESCE($13, amenities),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.property_type)
            .bind(input.furnished)
            .bind(input.price_per_night)
            .bind(&input.address)
            .bind(&input.city)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(input.room_count)
            .bind(&input.image_urls)
            .bind(&input.amenities)
            .fetch_optional(pool)
            .await
    }

    /// Delete a property. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
