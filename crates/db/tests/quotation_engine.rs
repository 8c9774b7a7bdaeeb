//! Integration tests for quote numbering and inquiry conversion.

mod common;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use hvacdesk_core::error::CoreError;
use hvacdesk_core::inquiry::InquiryStatus;
use hvacdesk_core::quotation::{compute_pricing, LineItem, QuotationStatus};
use hvacdesk_core::transition::plan_transition;
use hvacdesk_db::models::quotation::{Conversion, NewQuotation, QuotationContent};
use hvacdesk_db::models::StatusUpdate;
use hvacdesk_db::repositories::{ClientRepo, InquiryRepo, QuotationRepo};
use rust_decimal_macros::dec;
use sqlx::PgPool;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 10).unwrap()
}

fn content() -> QuotationContent {
    let pricing = compute_pricing(dec!(8500.00), dec!(16.00), dec!(0)).unwrap();
    QuotationContent {
        title: "Split unit installation".to_string(),
        description: String::new(),
        items: vec![LineItem::new("Split unit", dec!(1), dec!(8500.00))],
        subtotal: dec!(8500.00),
        tax_rate: dec!(16.00),
        tax_amount: pricing.tax_amount,
        discount_amount: dec!(0),
        total: pricing.total,
        terms_and_conditions: String::new(),
        valid_until: NaiveDate::from_ymd_opt(2026, 2, 9).unwrap(),
        payment_terms: "50% deposit, 50% on completion".to_string(),
        notes: String::new(),
    }
}

fn draft(client_id: i64) -> NewQuotation {
    NewQuotation {
        client_id,
        inquiry_id: None,
        created_by_id: None,
        content: content(),
    }
}

async fn set_inquiry_status(pool: &PgPool, id: i64, status: InquiryStatus) {
    sqlx::query("UPDATE inquiries SET status = $2 WHERE id = $1")
        .bind(id)
        .bind(status.as_str())
        .execute(pool)
        .await
        .unwrap();
}

async fn client_id(pool: &PgPool, email: &str) -> i64 {
    let mut conn = pool.acquire().await.unwrap();
    ClientRepo::resolve_or_create(&mut conn, email, "Client", "")
        .await
        .unwrap()
        .0
        .id
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn numbers_are_sequential_per_year(pool: PgPool) {
    let client_id = client_id(&pool, "q@example.com").await;
    let input = NewQuotation {
        client_id,
        inquiry_id: None,
        created_by_id: None,
        content: content(),
    };

    let a = QuotationRepo::create(&pool, &input, 2026).await.unwrap();
    let b = QuotationRepo::create(&pool, &input, 2026).await.unwrap();
    let c = QuotationRepo::create(&pool, &input, 2027).await.unwrap();

    assert_eq!(a.quote_number, "QT-2026-0001");
    assert_eq!(b.quote_number, "QT-2026-0002");
    assert_eq!(c.quote_number, "QT-2027-0001");
    assert_eq!(a.tax_amount, dec!(1360.00));
    assert_eq!(a.total, dec!(9860.00));
    assert_eq!(a.status, QuotationStatus::Draft);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn numbering_continues_from_existing_rows(pool: PgPool) {
    let client_id = client_id(&pool, "legacy@example.com").await;
    sqlx::query(
        "INSERT INTO quotations (quote_number, client_id, title, subtotal, tax_amount, total, valid_until) \
         VALUES ('QT-2026-0041', $1, 'Imported', 0, 0, 0, '2026-12-31')",
    )
    .bind(client_id)
    .execute(&pool)
    .await
    .unwrap();

    let input = NewQuotation {
        client_id,
        inquiry_id: None,
        created_by_id: None,
        content: content(),
    };
    let next = QuotationRepo::create(&pool, &input, 2026).await.unwrap();
    assert_eq!(next.quote_number, "QT-2026-0042");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn conversion_is_guarded_against_duplicates(pool: PgPool) {
    let service = common::seed_service(&pool, "Ducting", "ducting").await;
    let inquiry = common::seed_inquiry(&pool, Some(service.id), "brian@example.com").await;

    let first = QuotationRepo::convert_from_inquiry(&pool, inquiry.id, None, today(), 2026)
        .await
        .unwrap()
        .unwrap();
    let created = assert_matches!(first, Conversion::Created { quotation, client_created: true } => quotation);
    assert_eq!(created.items.0[0].description, "Ducting - Based on inquiry");
    assert_eq!(created.total, dec!(0));
    assert_eq!(created.tax_rate, dec!(16.00));
    assert_eq!(created.valid_until, NaiveDate::from_ymd_opt(2026, 2, 9).unwrap());

    let reloaded = InquiryRepo::find_by_id(&pool, inquiry.id).await.unwrap().unwrap();
    assert_eq!(reloaded.status, InquiryStatus::InReview);
    assert_eq!(reloaded.client_id, Some(created.client_id));

    let second = QuotationRepo::convert_from_inquiry(&pool, inquiry.id, None, today(), 2026)
        .await
        .unwrap()
        .unwrap();
    let existing = assert_matches!(second, Conversion::AlreadyExists(q) => q);
    assert_eq!(existing.id, created.id);
    assert_eq!(existing.quote_number, created.quote_number);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn conversion_of_missing_inquiry_is_none(pool: PgPool) {
    let outcome = QuotationRepo::convert_from_inquiry(&pool, 999, None, today(), 2026)
        .await
        .unwrap();
    assert!(outcome.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sending_stamps_and_locks_content(pool: PgPool) {
    let client_id = client_id(&pool, "s@example.com").await;
    let quotation = QuotationRepo::create(
        &pool,
        &NewQuotation {
            client_id,
            inquiry_id: None,
            created_by_id: None,
            content: content(),
        },
        2026,
    )
    .await
    .unwrap();

    let change = plan_transition(quotation.status, "sent", Some("Amina"), None).unwrap();
    let sent = assert_matches!(
        QuotationRepo::apply_transition(&pool, quotation.id, &change).await.unwrap(),
        StatusUpdate::Applied(q) => q
    );
    assert_eq!(sent.status, QuotationStatus::Sent);
    assert!(sent.sent_at.is_some());
    assert!(sent.decided_at.is_none());

    assert_matches!(
        QuotationRepo::update_content(&pool, quotation.id, &content()).await.unwrap(),
        StatusUpdate::Stale
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn conversion_rejects_finished_inquiries(pool: PgPool) {
    for status in [InquiryStatus::Closed, InquiryStatus::Converted] {
        let inquiry = common::seed_inquiry(&pool, None, "done@example.com").await;
        set_inquiry_status(&pool, inquiry.id, status).await;

        let outcome = QuotationRepo::convert_from_inquiry(&pool, inquiry.id, None, today(), 2026)
            .await
            .unwrap()
            .unwrap();
        assert_matches!(
            outcome,
            Conversion::Rejected(CoreError::InvalidTransition { entity: "Inquiry", .. })
        );

        let reloaded = InquiryRepo::find_by_id(&pool, inquiry.id).await.unwrap().unwrap();
        assert_eq!(reloaded.status, status);
    }
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quotations")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn conversion_keeps_a_quoted_inquiry_quoted(pool: PgPool) {
    let inquiry = common::seed_inquiry(&pool, None, "quoted@example.com").await;
    set_inquiry_status(&pool, inquiry.id, InquiryStatus::Quoted).await;

    let outcome = QuotationRepo::convert_from_inquiry(&pool, inquiry.id, None, today(), 2026)
        .await
        .unwrap()
        .unwrap();
    let created = assert_matches!(outcome, Conversion::Created { quotation, .. } => quotation);

    let reloaded = InquiryRepo::find_by_id(&pool, inquiry.id).await.unwrap().unwrap();
    assert_eq!(reloaded.status, InquiryStatus::Quoted);
    assert_eq!(reloaded.client_id, Some(created.client_id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn manual_quotation_claims_an_open_inquiry_once(pool: PgPool) {
    let inquiry = common::seed_inquiry(&pool, None, "manual@example.com").await;
    let client_id = client_id(&pool, "manual@example.com").await;

    let first = QuotationRepo::create_for_inquiry(&pool, inquiry.id, &draft(client_id), 2026)
        .await
        .unwrap()
        .unwrap();
    let created = assert_matches!(first, Conversion::Created { quotation, client_created: false } => quotation);
    assert_eq!(created.inquiry_id, Some(inquiry.id));
    assert_eq!(created.total, dec!(9860.00));

    let reloaded = InquiryRepo::find_by_id(&pool, inquiry.id).await.unwrap().unwrap();
    assert_eq!(reloaded.status, InquiryStatus::InReview);
    assert_eq!(reloaded.client_id, Some(client_id));

    let second = QuotationRepo::create_for_inquiry(&pool, inquiry.id, &draft(client_id), 2026)
        .await
        .unwrap()
        .unwrap();
    let existing = assert_matches!(second, Conversion::AlreadyExists(q) => q);
    assert_eq!(existing.quote_number, created.quote_number);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn manual_quotation_needs_an_inquiry_under_review(pool: PgPool) {
    let client_id = client_id(&pool, "late@example.com").await;
    assert!(QuotationRepo::create_for_inquiry(&pool, 999, &draft(client_id), 2026)
        .await
        .unwrap()
        .is_none());

    let inquiry = common::seed_inquiry(&pool, None, "late@example.com").await;
    set_inquiry_status(&pool, inquiry.id, InquiryStatus::Quoted).await;
    let outcome = QuotationRepo::create_for_inquiry(&pool, inquiry.id, &draft(client_id), 2026)
        .await
        .unwrap()
        .unwrap();
    assert_matches!(outcome, Conversion::Rejected(CoreError::InvalidTransition { .. }));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_creates_get_distinct_gap_free_numbers(pool: PgPool) {
    let client_id = client_id(&pool, "burst@example.com").await;

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..8 {
        let pool = pool.clone();
        tasks.spawn(async move { QuotationRepo::create(&pool, &draft(client_id), 2026).await });
    }
    let mut numbers = Vec::new();
    while let Some(result) = tasks.join_next().await {
        numbers.push(result.unwrap().unwrap().quote_number);
    }
    numbers.sort();

    let expected: Vec<String> = (1..=8).map(|n| format!("QT-2026-{n:04}")).collect();
    assert_eq!(numbers, expected);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_conversions_create_one_quotation(pool: PgPool) {
    let inquiry = common::seed_inquiry(&pool, None, "twice@example.com").await;

    let (a, b) = tokio::join!(
        QuotationRepo::convert_from_inquiry(&pool, inquiry.id, None, today(), 2026),
        QuotationRepo::convert_from_inquiry(&pool, inquiry.id, None, today(), 2026),
    );
    let outcomes = [a.unwrap().unwrap(), b.unwrap().unwrap()];

    let created: Vec<_> = outcomes
        .iter()
        .filter_map(|o| match o {
            Conversion::Created { quotation, .. } => Some(quotation),
            _ => None,
        })
        .collect();
    let existing: Vec<_> = outcomes
        .iter()
        .filter_map(|o| match o {
            Conversion::AlreadyExists(quotation) => Some(quotation),
            _ => None,
        })
        .collect();
    assert_eq!(created.len(), 1);
    assert_eq!(existing.len(), 1);
    assert_eq!(created[0].id, existing[0].id);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quotations WHERE inquiry_id = $1")
        .bind(inquiry.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}
