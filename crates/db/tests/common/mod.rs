//! Fixture builders shared by the repository tests.

#![allow(dead_code)]

use chrono::{Duration, Utc};
use hvacdesk_core::booking::{BookingSource, TimeSlot};
use hvacdesk_core::vocabulary::Priority;
use hvacdesk_db::models::booking::{Booking, NewBooking};
use hvacdesk_db::models::inquiry::{Inquiry, NewInquiry};
use hvacdesk_db::models::service::{CreateService, Service};
use hvacdesk_db::repositories::{BookingRepo, ClientRepo, InquiryRepo, ServiceRepo};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn seed_service(pool: &PgPool, name: &str, slug: &str) -> Service {
    ServiceRepo::create(
        pool,
        &CreateService {
            name: name.to_string(),
            slug: slug.to_string(),
            summary: String::new(),
            base_price_min: None,
            base_price_max: None,
        },
    )
    .await
    .unwrap()
}

/// Book a visit for `email`, resolving the client the way the public
/// workflow does.
pub async fn seed_booking(pool: &PgPool, service_id: i64, email: &str) -> Booking {
    let mut tx = pool.begin().await.unwrap();
    let (client, _) = ClientRepo::resolve_or_create(&mut tx, email, "Jane Doe", "+254712345678")
        .await
        .unwrap();
    let booking = BookingRepo::create(
        &mut tx,
        &NewBooking {
            booking_ref: Uuid::new_v4(),
            service_id,
            client_id: Some(client.id),
            contact_name: "Jane Doe".to_string(),
            contact_email: email.to_string(),
            contact_phone: "+254712345678".to_string(),
            preferred_date: Utc::now().date_naive() + Duration::days(3),
            preferred_time_slot: TimeSlot::Morning,
            message: String::new(),
            location_address: "Westlands, Nairobi".to_string(),
            priority: Priority::Normal,
            source: BookingSource::Website,
        },
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();
    booking
}

pub async fn seed_inquiry(pool: &PgPool, service_id: Option<i64>, email: &str) -> Inquiry {
    let mut conn = pool.acquire().await.unwrap();
    InquiryRepo::create(
        &mut conn,
        &NewInquiry {
            inquiry_ref: Uuid::new_v4(),
            client_id: None,
            service_id,
            contact_name: "Brian Kamau".to_string(),
            contact_email: email.to_string(),
            contact_phone: "+254722000111".to_string(),
            subject: "Office cooling".to_string(),
            message: "Three offices need split units".to_string(),
            budget_range: Some("KSh 200k-300k".to_string()),
            timeline: None,
            priority: Priority::High,
        },
    )
    .await
    .unwrap()
}
