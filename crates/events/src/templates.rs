//! Notification templates.
//!
//! Every [`LifecycleEvent`] that warrants a customer message maps to one
//! [`NotificationKind`]. Rendering produces a subject, a plain-text body and
//! an optional HTML body; kinds without an HTML layout go out as plain text.

use std::fmt::Write as _;

use hvacdesk_core::booking::BookingStatus;
use hvacdesk_core::lifecycle::{BookingSnapshot, InquirySnapshot, LifecycleEvent, QuotationSnapshot};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Company profile
// ---------------------------------------------------------------------------

const DEFAULT_COMPANY_NAME: &str = "Global Cool-Light E.A LTD";
const DEFAULT_COMPANY_PHONE: &str = "+254 700 000 000";
const DEFAULT_COMPANY_EMAIL: &str = "info@globalcool-light.com";

/// Branding rendered into every message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyProfile {
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl CompanyProfile {
    /// | Variable        | Default                       |
    /// |-----------------|-------------------------------|
    /// | `COMPANY_NAME`  | `Global Cool-Light E.A LTD`   |
    /// | `COMPANY_PHONE` | `+254 700 000 000`            |
    /// | `COMPANY_EMAIL` | `info@globalcool-light.com`   |
    pub fn from_env() -> Self {
        let var = |key: &str, default: &str| {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };
        Self {
            name: var("COMPANY_NAME", DEFAULT_COMPANY_NAME),
            phone: var("COMPANY_PHONE", DEFAULT_COMPANY_PHONE),
            email: var("COMPANY_EMAIL", DEFAULT_COMPANY_EMAIL),
        }
    }
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            name: DEFAULT_COMPANY_NAME.to_string(),
            phone: DEFAULT_COMPANY_PHONE.to_string(),
            email: DEFAULT_COMPANY_EMAIL.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    BookingReceived,
    BookingConfirmed,
    BookingInProgress,
    BookingCompleted,
    BookingCancelled,
    BookingRescheduled,
    InquiryReceived,
    QuotationSent,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BookingReceived => "booking_received",
            Self::BookingConfirmed => "booking_confirmed",
            Self::BookingInProgress => "booking_in_progress",
            Self::BookingCompleted => "booking_completed",
            Self::BookingCancelled => "booking_cancelled",
            Self::BookingRescheduled => "booking_rescheduled",
            Self::InquiryReceived => "inquiry_received",
            Self::QuotationSent => "quotation_sent",
        }
    }

    /// Kind for a booking entering `status`. `new` is never a target.
    pub fn for_booking_status(status: BookingStatus) -> Option<Self> {
        match status {
            BookingStatus::Confirmed => Some(Self::BookingConfirmed),
            BookingStatus::InProgress => Some(Self::BookingInProgress),
            BookingStatus::Completed => Some(Self::BookingCompleted),
            BookingStatus::Cancelled => Some(Self::BookingCancelled),
            BookingStatus::Rescheduled => Some(Self::BookingRescheduled),
            BookingStatus::New => None,
        }
    }

    pub fn for_event(event: &LifecycleEvent) -> Option<Self> {
        match event {
            LifecycleEvent::BookingReceived { .. } => Some(Self::BookingReceived),
            LifecycleEvent::BookingStatusChanged { to, .. } => Self::for_booking_status(*to),
            LifecycleEvent::InquiryReceived { .. } => Some(Self::InquiryReceived),
            LifecycleEvent::QuotationSent { .. } => Some(Self::QuotationSent),
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub kind: NotificationKind,
    pub subject: String,
    pub text_body: String,
    pub html_body: Option<String>,
}

/// Render the customer message for `event`, or `None` if the event carries
/// no notification.
pub fn render(event: &LifecycleEvent, company: &CompanyProfile) -> Option<RenderedMessage> {
    let kind = NotificationKind::for_event(event)?;
    let message = match event {
        LifecycleEvent::BookingReceived { booking } => booking_received(kind, booking, company),
        LifecycleEvent::BookingStatusChanged { booking, to, .. } => {
            booking_status(kind, booking, *to, company)
        }
        LifecycleEvent::InquiryReceived { inquiry } => inquiry_received(kind, inquiry, company),
        LifecycleEvent::QuotationSent { quotation } => quotation_sent(kind, quotation, company),
    };
    Some(message)
}

fn status_subject(kind: NotificationKind, ref8: &str) -> String {
    let prefix = match kind {
        NotificationKind::BookingConfirmed => "Booking Confirmed",
        NotificationKind::BookingInProgress => "Service Started",
        NotificationKind::BookingCompleted => "Service Completed",
        NotificationKind::BookingCancelled => "Booking Cancelled",
        NotificationKind::BookingRescheduled => "Booking Rescheduled",
        _ => "Booking Update",
    };
    format!("{prefix} - {ref8}")
}

/// Customer-facing explanation of a booking status.
pub fn status_message(status: BookingStatus, company: &CompanyProfile) -> String {
    match status {
        BookingStatus::Confirmed => "Your booking has been confirmed. Our team will contact you soon to finalize the details.".to_string(),
        BookingStatus::InProgress => "Our technician has started working on your service request.".to_string(),
        BookingStatus::Completed => format!(
            "Your service has been completed successfully. Thank you for choosing {}!",
            company.name
        ),
        BookingStatus::Cancelled => "Your booking has been cancelled. If you have any questions, please contact us.".to_string(),
        BookingStatus::Rescheduled => "Your booking has been rescheduled. We will contact you with the new date and time.".to_string(),
        BookingStatus::New => "Your booking status has been updated.".to_string(),
    }
}

fn status_label(status: BookingStatus) -> &'static str {
    match status {
        BookingStatus::New => "New",
        BookingStatus::Confirmed => "Confirmed",
        BookingStatus::InProgress => "In Progress",
        BookingStatus::Completed => "Completed",
        BookingStatus::Cancelled => "Cancelled",
        BookingStatus::Rescheduled => "Rescheduled",
    }
}

fn signature(company: &CompanyProfile) -> String {
    format!(
        "If you have any questions, please contact us at:\n\
         Phone: {}\n\
         Email: {}\n\n\
         Best regards,\n\
         {} Team",
        company.phone, company.email, company.name
    )
}

fn booking_received(
    kind: NotificationKind,
    booking: &BookingSnapshot,
    company: &CompanyProfile,
) -> RenderedMessage {
    let ref8 = booking.ref8();
    let date = booking.preferred_date.format("%B %d, %Y");
    let text_body = format!(
        "Dear {name},\n\n\
         Thank you for booking with {company}!\n\n\
         Booking Details:\n\
         - Booking ID: {ref8}\n\
         - Service: {service}\n\
         - Preferred Date: {date}\n\
         - Preferred Time: {slot}\n\
         - Location: {location}\n\n\
         Our team will contact you within 24 hours to confirm the booking details and schedule.\n\n\
         {signature}",
        name = booking.contact_name,
        company = company.name,
        service = booking.service_name,
        slot = booking.preferred_time_slot,
        location = booking.location_address,
        signature = signature(company),
    );
    let html_body = html_layout(
        company,
        &format!("Thank you for booking with {}", escape(&company.name)),
        &format!(
            "<p>Dear {},</p>{}<p>Our team will contact you within 24 hours to confirm the booking details and schedule.</p>",
            escape(&booking.contact_name),
            details_table(&[
                ("Booking ID", ref8.clone()),
                ("Service", booking.service_name.clone()),
                ("Preferred Date", date.to_string()),
                ("Preferred Time", booking.preferred_time_slot.to_string()),
                ("Location", booking.location_address.clone()),
            ]),
        ),
    );
    RenderedMessage {
        kind,
        subject: format!("Booking Confirmation - {ref8}"),
        text_body,
        html_body: Some(html_body),
    }
}

fn booking_status(
    kind: NotificationKind,
    booking: &BookingSnapshot,
    status: BookingStatus,
    company: &CompanyProfile,
) -> RenderedMessage {
    let ref8 = booking.ref8();
    let message = status_message(status, company);
    let text_body = format!(
        "Dear {name},\n\n\
         Your booking status has been updated:\n\n\
         Booking ID: {ref8}\n\
         Service: {service}\n\
         Status: {label}\n\
         Date: {date}\n\
         Time: {slot}\n\n\
         {message}\n\n\
         {signature}",
        name = booking.contact_name,
        service = booking.service_name,
        label = status_label(status),
        date = booking.preferred_date,
        slot = booking.preferred_time_slot,
        signature = signature(company),
    );
    let html_body = html_layout(
        company,
        "Your booking status has been updated",
        &format!(
            "<p>Dear {},</p>{}<p>{}</p>",
            escape(&booking.contact_name),
            details_table(&[
                ("Booking ID", ref8.clone()),
                ("Service", booking.service_name.clone()),
                ("Status", status_label(status).to_string()),
                ("Date", booking.preferred_date.to_string()),
                ("Time", booking.preferred_time_slot.to_string()),
            ]),
            escape(&message),
        ),
    );
    RenderedMessage {
        kind,
        subject: status_subject(kind, &ref8),
        text_body,
        html_body: Some(html_body),
    }
}

fn inquiry_received(
    kind: NotificationKind,
    inquiry: &InquirySnapshot,
    company: &CompanyProfile,
) -> RenderedMessage {
    let text_body = format!(
        "Dear {name},\n\n\
         Thank you for your inquiry with {company}!\n\n\
         Inquiry Details:\n\
         - Reference ID: {ref8}\n\
         - Subject: {subject}\n\
         - Service: {service}\n\
         - Priority: {priority}\n\n\
         Your Message:\n\
         {message}\n\n\
         Our team will review your inquiry and respond within 24 hours.\n\n\
         {signature}",
        name = inquiry.contact_name,
        company = company.name,
        ref8 = inquiry.ref8(),
        subject = inquiry.subject,
        service = inquiry.service_name.as_deref().unwrap_or("General Inquiry"),
        priority = inquiry.priority,
        message = inquiry.message,
        signature = signature(company),
    );
    RenderedMessage {
        kind,
        subject: format!("Inquiry Received - {}", inquiry.subject),
        text_body,
        html_body: None,
    }
}

fn quotation_sent(
    kind: NotificationKind,
    quotation: &QuotationSnapshot,
    company: &CompanyProfile,
) -> RenderedMessage {
    let mut lines = String::new();
    for item in &quotation.items {
        let _ = writeln!(
            lines,
            "- {} x {} @ KSh {} = KSh {}",
            item.description, item.quantity, item.unit_price, item.line_total
        );
    }
    let text_body = format!(
        "Dear {client},\n\n\
         Please find below quotation {number}: {title}\n\n\
         {lines}\n\
         Subtotal: KSh {subtotal}\n\
         Tax ({rate}%): KSh {tax}\n\
         Discount: KSh {discount}\n\
         Total: KSh {total}\n\n\
         Payment terms: {terms}\n\
         Valid until: {valid_until}\n\n\
         {signature}",
        client = quotation.client_name,
        number = quotation.quote_number,
        title = quotation.title,
        subtotal = quotation.subtotal,
        rate = quotation.tax_rate,
        tax = quotation.tax_amount,
        discount = quotation.discount_amount,
        total = quotation.total,
        terms = quotation.payment_terms,
        valid_until = quotation.valid_until.format("%B %d, %Y"),
        signature = signature(company),
    );

    let mut rows = String::new();
    for item in &quotation.items {
        let _ = write!(
            rows,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&item.description),
            item.quantity,
            item.unit_price,
            item.line_total
        );
    }
    let html_body = html_layout(
        company,
        &format!("Quotation {}", escape(&quotation.quote_number)),
        &format!(
            "<p>Dear {client},</p>\
             <p>{title}</p>\
             <table><tr><th>Description</th><th>Qty</th><th>Unit price</th><th>Total</th></tr>{rows}</table>\
             {summary}",
            client = escape(&quotation.client_name),
            title = escape(&quotation.title),
            summary = details_table(&[
                ("Subtotal", format!("KSh {}", quotation.subtotal)),
                ("Tax", format!("KSh {} ({}%)", quotation.tax_amount, quotation.tax_rate)),
                ("Discount", format!("KSh {}", quotation.discount_amount)),
                ("Total", format!("KSh {}", quotation.total)),
                ("Payment terms", quotation.payment_terms.clone()),
                ("Valid until", quotation.valid_until.format("%B %d, %Y").to_string()),
            ]),
        ),
    );

    RenderedMessage {
        kind,
        subject: format!("Quotation {} - {}", quotation.quote_number, company.name),
        text_body,
        html_body: Some(html_body),
    }
}

// ---------------------------------------------------------------------------
// HTML helpers
// ---------------------------------------------------------------------------

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn details_table(rows: &[(&str, String)]) -> String {
    let mut html = String::from("<table>");
    for (label, value) in rows {
        let _ = write!(html, "<tr><th>{label}</th><td>{}</td></tr>", escape(value));
    }
    html.push_str("</table>");
    html
}

/// `heading` and `body` are already escaped.
fn html_layout(company: &CompanyProfile, heading: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><body>\
         <h2>{heading}</h2>{body}\
         <hr><p>{name}<br>Phone: {phone}<br>Email: {email}</p>\
         <p>&copy; {year} {name}</p>\
         </body></html>",
        name = escape(&company.name),
        phone = escape(&company.phone),
        email = escape(&company.email),
        year = chrono::Utc::now().format("%Y"),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use hvacdesk_core::booking::TimeSlot;
    use hvacdesk_core::quotation::LineItem;
    use hvacdesk_core::vocabulary::Priority;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use super::*;

    fn booking() -> BookingSnapshot {
        BookingSnapshot {
            booking_id: 1,
            booking_ref: Uuid::parse_str("a1b2c3d4-0000-4000-8000-000000000000").unwrap(),
            contact_name: "Jane <Doe>".into(),
            contact_email: "jane@example.com".into(),
            service_name: "AC Repair".into(),
            preferred_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            preferred_time_slot: TimeSlot::Morning,
            location_address: "Westlands".into(),
        }
    }

    fn status_event(to: BookingStatus) -> LifecycleEvent {
        LifecycleEvent::BookingStatusChanged {
            booking: booking(),
            from: BookingStatus::New,
            to,
            actor: "System".into(),
            note: None,
        }
    }

    #[test]
    fn booking_status_subjects() {
        let company = CompanyProfile::default();
        let cases = [
            (BookingStatus::Confirmed, "Booking Confirmed - A1B2C3D4"),
            (BookingStatus::InProgress, "Service Started - A1B2C3D4"),
            (BookingStatus::Completed, "Service Completed - A1B2C3D4"),
            (BookingStatus::Cancelled, "Booking Cancelled - A1B2C3D4"),
            (BookingStatus::Rescheduled, "Booking Rescheduled - A1B2C3D4"),
        ];
        for (status, subject) in cases {
            let msg = render(&status_event(status), &company).unwrap();
            assert_eq!(msg.subject, subject);
            assert!(msg.text_body.contains(&status_message(status, &company)));
        }
    }

    #[test]
    fn received_booking_has_confirmation_subject_and_escaped_html() {
        let msg = render(
            &LifecycleEvent::BookingReceived { booking: booking() },
            &CompanyProfile::default(),
        )
        .unwrap();
        assert_eq!(msg.kind, NotificationKind::BookingReceived);
        assert_eq!(msg.subject, "Booking Confirmation - A1B2C3D4");
        assert!(msg.text_body.contains("Preferred Date: March 02, 2026"));
        let html = msg.html_body.unwrap();
        assert!(html.contains("Jane &lt;Doe&gt;"));
        assert!(!html.contains("<Doe>"));
    }

    #[test]
    fn inquiry_is_plain_text_only() {
        let msg = render(
            &LifecycleEvent::InquiryReceived {
                inquiry: InquirySnapshot {
                    inquiry_id: 3,
                    inquiry_ref: Uuid::nil(),
                    contact_name: "Brian".into(),
                    contact_email: "brian@example.com".into(),
                    subject: "Cold room".into(),
                    message: "Need a quote".into(),
                    service_name: None,
                    priority: Priority::High,
                },
            },
            &CompanyProfile::default(),
        )
        .unwrap();
        assert_eq!(msg.subject, "Inquiry Received - Cold room");
        assert!(msg.text_body.contains("General Inquiry"));
        assert!(msg.html_body.is_none());
    }

    #[test]
    fn quotation_subject_names_company() {
        let company = CompanyProfile {
            name: "Cool Co".into(),
            ..CompanyProfile::default()
        };
        let msg = render(
            &LifecycleEvent::QuotationSent {
                quotation: QuotationSnapshot {
                    quotation_id: 9,
                    quote_number: "QT-2026-0007".into(),
                    title: "Office AC".into(),
                    client_name: "Acme".into(),
                    recipient: "ops@acme.example".into(),
                    items: vec![LineItem::new("Split unit", dec!(1), dec!(8500.00))],
                    subtotal: dec!(8500.00),
                    tax_rate: dec!(16.00),
                    tax_amount: dec!(1360.00),
                    discount_amount: dec!(0),
                    total: dec!(9860.00),
                    valid_until: NaiveDate::from_ymd_opt(2026, 2, 9).unwrap(),
                    payment_terms: "50% deposit, 50% on completion".into(),
                },
            },
            &company,
        )
        .unwrap();
        assert_eq!(msg.subject, "Quotation QT-2026-0007 - Cool Co");
        assert!(msg.text_body.contains("Total: KSh 9860.00"));
        assert!(msg.html_body.unwrap().contains("<td>Split unit</td>"));
    }
}
