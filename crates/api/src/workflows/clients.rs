//! Client directory: staff CRUD plus first-contact resolution.

use hvacdesk_core::contact::{normalize_phone, validate_email, validate_name};
use hvacdesk_core::error::CoreError;
use hvacdesk_core::types::DbId;
use hvacdesk_db::models::client::{Client, CreateClient, UpdateClient};
use hvacdesk_db::repositories::ClientRepo;
use hvacdesk_db::DbPool;
use sqlx::PgConnection;

use super::clean_optional;
use crate::error::{AppError, AppResult};

/// Empty phone numbers are allowed on staff-created records.
fn normalize_optional_phone(phone: &str) -> Result<String, CoreError> {
    if phone.trim().is_empty() {
        Ok(String::new())
    } else {
        normalize_phone(phone)
    }
}

/// Validate and normalize a staff-submitted client.
pub fn normalize_new_client(input: CreateClient) -> Result<CreateClient, CoreError> {
    Ok(CreateClient {
        name: validate_name(&input.name)?,
        email: validate_email(&input.email)?,
        phone: normalize_optional_phone(&input.phone)?,
        alternative_phone: input
            .alternative_phone
            .as_deref()
            .map(normalize_optional_phone)
            .transpose()?
            .filter(|p| !p.is_empty()),
        address: clean_optional(input.address),
        city: clean_optional(input.city),
        county: clean_optional(input.county),
        company_name: clean_optional(input.company_name),
        industry: clean_optional(input.industry),
        notes: clean_optional(input.notes),
        ..input
    })
}

/// Validate the fields present in a partial update.
pub fn normalize_client_update(input: UpdateClient) -> Result<UpdateClient, CoreError> {
    Ok(UpdateClient {
        name: input.name.as_deref().map(validate_name).transpose()?,
        email: input.email.as_deref().map(validate_email).transpose()?,
        phone: input.phone.as_deref().map(normalize_optional_phone).transpose()?,
        alternative_phone: input
            .alternative_phone
            .as_deref()
            .map(normalize_optional_phone)
            .transpose()?,
        ..input
    })
}

pub async fn create_client(pool: &DbPool, input: CreateClient) -> AppResult<Client> {
    let input = normalize_new_client(input)?;
    let client = ClientRepo::create(pool, &input).await?;
    tracing::info!(client_id = client.id, "Client created");
    Ok(client)
}

pub async fn get_client(pool: &DbPool, id: DbId) -> AppResult<Client> {
    ClientRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id,
        }))
}

pub async fn update_client(pool: &DbPool, id: DbId, input: UpdateClient) -> AppResult<Client> {
    let input = normalize_client_update(input)?;
    ClientRepo::update(pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id,
        }))
}

pub async fn delete_client(pool: &DbPool, id: DbId) -> AppResult<()> {
    if ClientRepo::delete(pool, id).await? {
        tracing::info!(client_id = id, "Client deleted");
        Ok(())
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id,
        }))
    }
}

/// Find the client owning `email`, creating an `individual` client on first
/// contact. Runs on the caller's connection so it joins their transaction.
///
/// Returns the client and whether it was created by this call. An existing
/// client is returned unchanged.
pub async fn resolve_or_create(
    conn: &mut PgConnection,
    email: &str,
    name: &str,
    phone: &str,
) -> AppResult<(Client, bool)> {
    let email = validate_email(email)?;
    let name = validate_name(name)?;
    let phone = normalize_optional_phone(phone)?;
    Ok(ClientRepo::resolve_or_create(conn, &email, &name, &phone).await?)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use hvacdesk_core::client::ClientType;

    use super::*;

    fn input() -> CreateClient {
        CreateClient {
            name: "  Amina Otieno ".into(),
            email: " Amina@Example.COM".into(),
            phone: "0712 345 678".into(),
            client_type: Some(ClientType::Business),
            alternative_phone: Some("".into()),
            address: Some("  ".into()),
            city: Some("Mombasa".into()),
            county: None,
            company_name: Some("Coastline Foods".into()),
            industry: None,
            notes: None,
            preferred_contact_method: None,
        }
    }

    #[test]
    fn new_client_is_normalized() {
        let client = normalize_new_client(input()).unwrap();
        assert_eq!(client.name, "Amina Otieno");
        assert_eq!(client.email, "amina@example.com");
        assert_eq!(client.phone, "+254712345678");
        assert_eq!(client.alternative_phone, None);
        assert_eq!(client.address, None);
        assert_eq!(client.city.as_deref(), Some("Mombasa"));
        assert_eq!(client.client_type, Some(ClientType::Business));
    }

    #[test]
    fn invalid_email_is_rejected() {
        let mut bad = input();
        bad.email = "amina-at-example".into();
        assert_matches!(normalize_new_client(bad), Err(CoreError::Validation(_)));
    }

    #[test]
    fn update_only_touches_present_fields() {
        let update = normalize_client_update(UpdateClient {
            email: Some("NEW@example.com".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(update.email.as_deref(), Some("new@example.com"));
        assert!(update.name.is_none());
        assert!(update.phone.is_none());
    }
}
