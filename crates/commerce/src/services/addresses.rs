//! Address book service.

use sqlx::PgPool;

use orchard_core::{AddressId, UserId};

use crate::db::{AddressRepository, RepositoryError};
use crate::error::{CommerceError, Result};
use crate::models::address::{Address, NewAddress, UpdateAddress};

/// Address book operations for a transport layer.
pub struct AddressService<'a> {
    addresses: AddressRepository<'a>,
}

impl<'a> AddressService<'a> {
    /// Create a new address service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            addresses: AddressRepository::new(pool),
        }
    }

    /// List the user's addresses, default first.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Repository` on database failure.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<Address>> {
        Ok(self.addresses.list(user_id).await?)
    }

    /// Create an address; the user's first address becomes the default.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Validation` for blank recipient, phone, or
    /// detail fields.
    pub async fn create(
        &self,
        user_id: UserId,
        input: &NewAddress,
        make_default: bool,
    ) -> Result<Address> {
        validate_new(input)?;
        let address = self.addresses.create(user_id, input, make_default).await?;
        tracing::info!(user_id = %user_id, address_id = %address.id, is_default = address.is_default, "Address created");
        Ok(address)
    }

    /// Update an address's fields.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::AddressNotFound` if the address does not exist
    /// or belongs to another user.
    pub async fn update(
        &self,
        user_id: UserId,
        address_id: AddressId,
        input: &UpdateAddress,
    ) -> Result<Address> {
        validate_update(input)?;
        self.addresses
            .update(user_id, address_id, input)
            .await
            .map_err(not_found_as_address)
    }

    /// Delete an address.
    ///
    /// Deleting the default leaves the user with no default; no other address
    /// is promoted.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::AddressNotFound` if the address does not exist
    /// or belongs to another user.
    pub async fn delete(&self, user_id: UserId, address_id: AddressId) -> Result<()> {
        self.addresses
            .delete(user_id, address_id)
            .await
            .map_err(not_found_as_address)
    }

    /// Make an address the user's default.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::AddressNotFound` if the address does not exist
    /// or belongs to another user; the previous default is untouched then.
    pub async fn set_default(&self, user_id: UserId, address_id: AddressId) -> Result<Address> {
        let address = self
            .addresses
            .set_default(user_id, address_id)
            .await
            .map_err(not_found_as_address)?;
        tracing::info!(user_id = %user_id, address_id = %address_id, "Default address changed");
        Ok(address)
    }
}

fn not_found_as_address(err: RepositoryError) -> CommerceError {
    match err {
        RepositoryError::NotFound => CommerceError::AddressNotFound,
        other => CommerceError::Repository(other),
    }
}

fn validate_new(input: &NewAddress) -> Result<()> {
    require("recipient_name", &input.recipient_name)?;
    require("phone", &input.phone)?;
    require("detail", &input.detail)
}

fn validate_update(input: &UpdateAddress) -> Result<()> {
    for (field, value) in [
        ("recipient_name", &input.recipient_name),
        ("phone", &input.phone),
        ("detail", &input.detail),
    ] {
        if let Some(value) = value {
            require(field, value)?;
        }
    }
    Ok(())
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CommerceError::Validation(format!("{field} must not be blank")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> NewAddress {
        NewAddress {
            recipient_name: "Wen Li".to_owned(),
            phone: "13800000000".to_owned(),
            province: "Zhejiang".to_owned(),
            city: "Hangzhou".to_owned(),
            district: "Xihu".to_owned(),
            detail: "18 Longjing Rd".to_owned(),
        }
    }

    #[test]
    fn test_blank_fields_rejected() {
        assert!(validate_new(&input()).is_ok());

        let mut blank_name = input();
        blank_name.recipient_name = "  ".to_owned();
        assert!(matches!(
            validate_new(&blank_name),
            Err(CommerceError::Validation(_))
        ));

        let mut blank_phone = input();
        blank_phone.phone = String::new();
        assert!(validate_new(&blank_phone).is_err());
    }

    #[test]
    fn test_update_validates_only_present_fields() {
        let empty = UpdateAddress::default();
        assert!(validate_update(&empty).is_ok());

        let blank_detail = UpdateAddress {
            detail: Some(String::new()),
            ..UpdateAddress::default()
        };
        assert!(validate_update(&blank_detail).is_err());

        let fine = UpdateAddress {
            city: Some("Suzhou".to_owned()),
            ..UpdateAddress::default()
        };
        assert!(validate_update(&fine).is_ok());
    }
}
