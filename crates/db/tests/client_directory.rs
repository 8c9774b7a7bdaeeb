//! Integration tests for client resolution and CRUD.

mod common;

use hvacdesk_core::client::ClientType;
use hvacdesk_db::models::client::{CreateClient, UpdateClient};
use hvacdesk_db::repositories::ClientRepo;
use sqlx::PgPool;

async fn client_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM clients")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn resolve_creates_then_reuses(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();

    let (first, created) =
        ClientRepo::resolve_or_create(&mut conn, "jane@example.com", "Jane Doe", "+254712345678")
            .await
            .unwrap();
    assert!(created);
    assert_eq!(first.client_type, ClientType::Individual);

    let (second, created) =
        ClientRepo::resolve_or_create(&mut conn, "JANE@example.com", "J. Doe", "+254700000000")
            .await
            .unwrap();
    assert!(!created);
    assert_eq!(second.id, first.id);
    // The stored profile is not overwritten by the new contact snapshot.
    assert_eq!(second.name, "Jane Doe");

    assert_eq!(client_count(&pool).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn novel_email_creates_exactly_one_client(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    ClientRepo::resolve_or_create(&mut conn, "a@example.com", "A", "")
        .await
        .unwrap();
    ClientRepo::resolve_or_create(&mut conn, "b@example.com", "B", "")
        .await
        .unwrap();
    assert_eq!(client_count(&pool).await, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_email_violates_unique_index(pool: PgPool) {
    let input = CreateClient {
        name: "Acme Ltd".to_string(),
        email: "ops@acme.co.ke".to_string(),
        phone: String::new(),
        client_type: Some(ClientType::Business),
        alternative_phone: None,
        address: None,
        city: Some("Nairobi".to_string()),
        county: None,
        company_name: Some("Acme".to_string()),
        industry: None,
        notes: None,
        preferred_contact_method: None,
    };
    ClientRepo::create(&pool, &input).await.unwrap();

    let err = ClientRepo::create(
        &pool,
        &CreateClient {
            email: "OPS@acme.co.ke".to_string(),
            ..input
        },
    )
    .await
    .unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.constraint(), Some("uq_clients_email"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_patches_and_delete_removes(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let (client, _) = ClientRepo::resolve_or_create(&mut conn, "x@example.com", "X", "")
        .await
        .unwrap();

    let updated = ClientRepo::update(
        &pool,
        client.id,
        &UpdateClient {
            client_type: Some(ClientType::Ngo),
            city: Some("Kisumu".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.client_type, ClientType::Ngo);
    assert_eq!(updated.city.as_deref(), Some("Kisumu"));
    assert_eq!(updated.name, "X");

    assert!(ClientRepo::delete(&pool, client.id).await.unwrap());
    assert!(ClientRepo::find_by_id(&pool, client.id).await.unwrap().is_none());
    assert!(!ClientRepo::delete(&pool, client.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_first_contacts_share_one_client(pool: PgPool) {
    let resolve = |email: &'static str| {
        let pool = pool.clone();
        async move {
            let mut tx = pool.begin().await.unwrap();
            let resolved = ClientRepo::resolve_or_create(&mut tx, email, "Wanjiru", "")
                .await
                .unwrap();
            tx.commit().await.unwrap();
            resolved
        }
    };

    let ((a, a_created), (b, b_created)) =
        tokio::join!(resolve("wanjiru@example.com"), resolve("Wanjiru@Example.com"));

    assert_eq!(a.id, b.id);
    assert!(a_created ^ b_created);
    assert_eq!(client_count(&pool).await, 1);
}
