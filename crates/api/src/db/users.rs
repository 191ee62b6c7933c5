//! User repository for database operations.
//!
//! Users own their address book (a JSONB column mutated through the
//! `AddressBook` aggregate), a pending OTP row, and wishlist entries.
//! Password hashes are stored in `users.password_hash` but never leave this
//! module except through [`UserRepository::get_auth`].

use chrono::{DateTime, Utc};
use sqlx::{PgPool, QueryBuilder};

use filigree_core::{
    AddressBook, Email, Gender, JewelleryInterest, OtpCode, Phone, ProductId, UserId,
};

use super::{RepositoryError, map_unique_violation};
use crate::models::user::User;

/// Database row for a user, without credential material.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    name: String,
    phone: String,
    email: String,
    is_verified: bool,
    age: Option<i32>,
    gender: Option<String>,
    jewellery_interests: Vec<String>,
    addresses: sqlx::types::Json<AddressBook>,
    password_changed_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Column list matching [`UserRow`].
const USER_COLUMNS: &str = "id, name, phone, email, is_verified, age, gender, \
     jewellery_interests, addresses, password_changed_at, created_at, updated_at";

impl UserRow {
    fn into_domain(self) -> Result<User, RepositoryError> {
        let phone = Phone::parse(&self.phone).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid phone in database: {e}"))
        })?;
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let gender = self
            .gender
            .as_deref()
            .map(str::parse::<Gender>)
            .transpose()
            .map_err(RepositoryError::DataCorruption)?;
        let jewellery_interests = self
            .jewellery_interests
            .iter()
            .map(|s| s.parse::<JewelleryInterest>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(RepositoryError::DataCorruption)?;

        Ok(User {
            id: UserId::new(self.id),
            name: self.name,
            phone,
            email,
            is_verified: self.is_verified,
            age: self.age,
            gender,
            jewellery_interests,
            addresses: self.addresses.0,
            password_changed_at: self.password_changed_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// A pending OTP issued to a user.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OtpRecord {
    pub code: String,
    pub issued_at: DateTime<Utc>,
    pub consumed: bool,
}

/// Filters for the admin user listing.
#[derive(Debug, Default, Clone)]
pub struct UserFilter {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_verified: Option<bool>,
    pub search: Option<String>,
}

/// Profile fields updatable in place; `None` keeps the stored value.
#[derive(Debug, Default, Clone)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub phone: Option<Phone>,
    pub email: Option<Email>,
    pub gender: Option<Gender>,
    pub age: Option<i32>,
    pub jewellery_interests: Option<Vec<JewelleryInterest>>,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a stored value fails validation.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_domain).transpose()
    }

    /// Get a user by phone number.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_phone(&self, phone: &Phone) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE phone = $1"
        ))
        .bind(phone.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_domain).transpose()
    }

    /// Get a user by email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_domain).transpose()
    }

    /// Get a user together with their password hash, by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_auth(&self, id: UserId) -> Result<Option<(User, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct HashRow {
            password_hash: String,
        }

        let Some(user) = self.get_by_id(id).await? else {
            return Ok(None);
        };

        let hash = sqlx::query_as::<_, HashRow>("SELECT password_hash FROM users WHERE id = $1")
            .bind(id.as_i32())
            .fetch_one(self.pool)
            .await?;

        Ok(Some((user, hash.password_hash)))
    }

    /// Create a new unverified user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` on a duplicate verified phone or
    /// email, `RepositoryError::Database` otherwise.
    pub async fn create(
        &self,
        name: &str,
        phone: &Phone,
        email: &Email,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (name, phone, email, password_hash, jewellery_interests, addresses)
             VALUES ($1, $2, $3, $4, $5, '[]'::jsonb)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(name)
        .bind(phone.as_str())
        .bind(email.as_str())
        .bind(password_hash)
        .bind(
            JewelleryInterest::default_set()
                .iter()
                .map(|i| i.as_str().to_owned())
                .collect::<Vec<_>>(),
        )
        .fetch_one(self.pool)
        .await
        .map_err(map_unique_violation)?;

        row.into_domain()
    }

    /// Mark a user as verified.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn mark_verified(&self, id: UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE users SET is_verified = TRUE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id.as_i32())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Replace a user's password hash, stamping `password_changed_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn update_password(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE users
             SET password_hash = $2, password_changed_at = NOW(), updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id.as_i32())
        .bind(password_hash)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Apply in-place profile changes; `None` fields keep their stored value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist, or
    /// `RepositoryError::Conflict` if a new phone/email collides with a
    /// verified account.
    pub async fn update_profile(
        &self,
        id: UserId,
        changes: &ProfileChanges,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET
                name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                email = COALESCE($4, email),
                gender = COALESCE($5, gender),
                age = COALESCE($6, age),
                jewellery_interests = COALESCE($7, jewellery_interests),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(changes.name.as_deref())
        .bind(changes.phone.as_ref().map(Phone::as_str))
        .bind(changes.email.as_ref().map(Email::as_str))
        .bind(changes.gender.map(|g| g.as_str().to_owned()))
        .bind(changes.age)
        .bind(changes.jewellery_interests.as_ref().map(|interests| {
            interests
                .iter()
                .map(|i| i.as_str().to_owned())
                .collect::<Vec<_>>()
        }))
        .fetch_optional(self.pool)
        .await
        .map_err(map_unique_violation)?;

        row.ok_or(RepositoryError::NotFound)?.into_domain()
    }

    /// Replace a user's address book.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn set_addresses(
        &self,
        id: UserId,
        addresses: &AddressBook,
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE users SET addresses = $2, updated_at = NOW() WHERE id = $1")
                .bind(id.as_i32())
                .bind(sqlx::types::Json(addresses))
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete a user account.
    ///
    /// Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List users for the admin panel, filtered and paginated.
    ///
    /// Returns the page of users plus the total count matching the filter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        filter: &UserFilter,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<User>, i64), RepositoryError> {
        fn apply_filter(qb: &mut QueryBuilder<'_, sqlx::Postgres>, filter: &UserFilter) {
            if let Some(name) = &filter.name {
                qb.push(" AND name ILIKE ").push_bind(format!("%{name}%"));
            }
            if let Some(email) = &filter.email {
                qb.push(" AND email ILIKE ").push_bind(format!("%{email}%"));
            }
            if let Some(phone) = &filter.phone {
                qb.push(" AND phone LIKE ").push_bind(format!("%{phone}%"));
            }
            if let Some(is_verified) = filter.is_verified {
                qb.push(" AND is_verified = ").push_bind(is_verified);
            }
            if let Some(search) = &filter.search {
                let pattern = format!("%{search}%");
                qb.push(" AND (name ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR email ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR phone LIKE ")
                    .push_bind(pattern)
                    .push(")");
            }
        }

        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM users WHERE TRUE");
        apply_filter(&mut count_qb, filter);
        let total: i64 = count_qb.build_query_scalar().fetch_one(self.pool).await?;

        let mut qb = QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users WHERE TRUE"));
        apply_filter(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind((page - 1) * limit);

        let rows = qb
            .build_query_as::<UserRow>()
            .fetch_all(self.pool)
            .await?;

        let users = rows
            .into_iter()
            .map(UserRow::into_domain)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((users, total))
    }

    // =========================================================================
    // OTP credentials
    // =========================================================================

    /// Issue a fresh OTP for a user, replacing any pending one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn issue_otp(&self, id: UserId, code: &OtpCode) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO otp_credentials (user_id, code, issued_at, consumed)
             VALUES ($1, $2, NOW(), FALSE)
             ON CONFLICT (user_id)
             DO UPDATE SET code = EXCLUDED.code, issued_at = NOW(), consumed = FALSE",
        )
        .bind(id.as_i32())
        .bind(code.as_str())
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Fetch the pending OTP record for a user, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_otp(&self, id: UserId) -> Result<Option<OtpRecord>, RepositoryError> {
        let record = sqlx::query_as::<_, OtpRecord>(
            "SELECT code, issued_at, consumed FROM otp_credentials WHERE user_id = $1",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(record)
    }

    /// Mark a user's OTP as consumed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn consume_otp(&self, id: UserId) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE otp_credentials SET consumed = TRUE WHERE user_id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(())
    }

    // =========================================================================
    // Wishlist
    // =========================================================================

    /// Add a product to a user's wishlist.
    ///
    /// Returns `false` if the product was already present.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn add_wishlist_item(
        &self,
        id: UserId,
        product: ProductId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO wishlist_items (user_id, product_id)
             VALUES ($1, $2)
             ON CONFLICT (user_id, product_id) DO NOTHING",
        )
        .bind(id.as_i32())
        .bind(product.as_i32())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove a product from a user's wishlist (no-op if absent).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn remove_wishlist_item(
        &self,
        id: UserId,
        product: ProductId,
    ) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM wishlist_items WHERE user_id = $1 AND product_id = $2")
            .bind(id.as_i32())
            .bind(product.as_i32())
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Product ids on a user's wishlist, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn wishlist_product_ids(
        &self,
        id: UserId,
    ) -> Result<Vec<ProductId>, RepositoryError> {
        let ids: Vec<(i32,)> = sqlx::query_as(
            "SELECT product_id FROM wishlist_items WHERE user_id = $1 ORDER BY added_at ASC",
        )
        .bind(id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(ids.into_iter().map(|(id,)| ProductId::new(id)).collect())
    }
}
