mod common;

use axum::http::StatusCode;
use sqlx::PgPool;

/// With a live database and no Redis the service reports ok with the cache
/// flagged off.
#[sqlx::test(migrations = "../db/migrations")]
async fn health_reports_component_state(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = common::get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = common::body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["database"], true);
    assert_eq!(json["cache"], false);
}
