use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::CredentialStore;
use crate::error::AppError;
use crate::models::{
    Account, NewAccount, NewProfile, Occupation, Profile, ProfileUpdate, Role, ScoutProfile,
    ScoutProfileUpdate, TalentProfile, TalentProfileUpdate, User, UserChanges,
};

const USER_COLUMNS: &str =
    "id, email, name, password_hash, phone, role, avatar_url, created_at, updated_at";

/// PostgreSQL-backed store. Schema lives in `migrations/`.
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

#[derive(FromRow)]
struct TalentRow {
    user_id: Uuid,
    occupations: Vec<String>,
    bio: Option<String>,
}

impl TryFrom<TalentRow> for TalentProfile {
    type Error = AppError;

    fn try_from(row: TalentRow) -> Result<Self, Self::Error> {
        let occupations = row
            .occupations
            .iter()
            .map(|value| value.parse::<Occupation>())
            .collect::<Result<BTreeSet<_>, _>>()
            .map_err(AppError::Internal)?;
        Ok(TalentProfile {
            user_id: row.user_id,
            occupations,
            bio: row.bio,
        })
    }
}

fn occupation_names(occupations: &BTreeSet<Occupation>) -> Vec<String> {
    occupations.iter().map(|o| o.as_str().to_string()).collect()
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_profile(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        profile: &NewProfile,
    ) -> Result<(), sqlx::Error> {
        match profile {
            NewProfile::Talent { occupations, bio } => {
                sqlx::query(
                    "INSERT INTO talent_profiles (user_id, occupations, bio) VALUES ($1, $2, $3)",
                )
                .bind(user_id)
                .bind(occupation_names(occupations))
                .bind(bio)
                .execute(&mut **tx)
                .await?;
            }
            NewProfile::Scout {
                shop_name,
                default_address,
                website,
            } => {
                sqlx::query(
                    "INSERT INTO scout_profiles (user_id, shop_name, default_address, website)
                     VALUES ($1, $2, $3, $4)",
                )
                .bind(user_id)
                .bind(shop_name)
                .bind(default_address)
                .bind(website)
                .execute(&mut **tx)
                .await?;
            }
        }
        Ok(())
    }

    async fn upsert_talent(&self, user_id: Uuid, update: TalentProfileUpdate) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO talent_profiles (user_id, occupations, bio)
             VALUES ($1, COALESCE($2, '{}'::TEXT[]), $3)
             ON CONFLICT (user_id) DO UPDATE SET
                occupations = COALESCE($2, talent_profiles.occupations),
                bio = COALESCE($3, talent_profiles.bio)",
        )
        .bind(user_id)
        .bind(update.occupations.as_ref().map(occupation_names))
        .bind(update.bio)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn upsert_scout(&self, user_id: Uuid, update: ScoutProfileUpdate) -> Result<(), AppError> {
        if update.shop_name.is_some() {
            sqlx::query(
                "INSERT INTO scout_profiles (user_id, shop_name, default_address, website)
                 VALUES ($1, $2, $3, $4)
                 ON CONFLICT (user_id) DO UPDATE SET
                    shop_name = EXCLUDED.shop_name,
                    default_address = COALESCE($3, scout_profiles.default_address),
                    website = COALESCE($4, scout_profiles.website)",
            )
            .bind(user_id)
            .bind(&update.shop_name)
            .bind(&update.default_address)
            .bind(&update.website)
            .execute(&self.pool)
            .await?;
            return Ok(());
        }

        let updated = sqlx::query(
            "UPDATE scout_profiles SET
                default_address = COALESCE($2, default_address),
                website = COALESCE($3, website)
             WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(&update.default_address)
        .bind(&update.website)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            // No row to update, and creating one needs the name.
            return update.create(user_id).map(|_| ());
        }
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn create_account(&self, account: NewAccount) -> Result<User, AppError> {
        let mut tx = self.pool.begin().await?;

        // users_email_key turns a lost race into 23505, mapped to Conflict.
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, email, name, password_hash, phone, role)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&account.email)
        .bind(&account.name)
        .bind(&account.password_hash)
        .bind(&account.phone)
        .bind(account.role())
        .fetch_one(&mut *tx)
        .await?;

        Self::insert_profile(&mut tx, user.id, &account.profile).await?;
        tx.commit().await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_account(&self, user_id: Uuid) -> Result<Option<Account>, AppError> {
        let Some(user) = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let profile = match user.role {
            Role::Talent => sqlx::query_as::<_, TalentRow>(
                "SELECT user_id, occupations, bio FROM talent_profiles WHERE user_id = $1",
            )
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .map(TalentProfile::try_from)
            .transpose()?
            .map(Profile::Talent),
            Role::Scout => sqlx::query_as::<_, ScoutProfile>(
                "SELECT user_id, shop_name, default_address, website
                 FROM scout_profiles WHERE user_id = $1",
            )
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .map(Profile::Scout),
        };

        Ok(Some(Account { user, profile }))
    }

    async fn update_user(&self, user_id: Uuid, changes: UserChanges) -> Result<(), AppError> {
        let (set_phone, phone) = match changes.phone {
            Some(phone) => (true, phone),
            None => (false, None),
        };

        let updated = sqlx::query(
            "UPDATE users SET
                name = COALESCE($2, name),
                phone = CASE WHEN $3 THEN $4 ELSE phone END,
                avatar_url = COALESCE($5, avatar_url),
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(user_id)
        .bind(changes.name)
        .bind(set_phone)
        .bind(phone)
        .bind(changes.avatar_url)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(AppError::NotFound("User not found".into()));
        }
        Ok(())
    }

    async fn upsert_profile(&self, user_id: Uuid, update: ProfileUpdate) -> Result<(), AppError> {
        // A missing user surfaces as 23503 on insert, mapped to NotFound.
        match update {
            ProfileUpdate::Talent(update) => self.upsert_talent(user_id, update).await,
            ProfileUpdate::Scout(update) => self.upsert_scout(user_id, update).await,
        }
    }
}
