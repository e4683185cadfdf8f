use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use super::user::{Role, User, UserChanges};
use crate::error::AppError;
use crate::validation::{non_blank, normalize_phone, validate_phone};

/// Trades a talent can list. Stored as text in the `occupations` array column.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Occupation {
    Barber,
    Cosmetologist,
    TattooArtist,
}

impl Occupation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Occupation::Barber => "BARBER",
            Occupation::Cosmetologist => "COSMETOLOGIST",
            Occupation::TattooArtist => "TATTOO_ARTIST",
        }
    }
}

impl fmt::Display for Occupation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Occupation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BARBER" => Ok(Occupation::Barber),
            "COSMETOLOGIST" => Ok(Occupation::Cosmetologist),
            "TATTOO_ARTIST" => Ok(Occupation::TattooArtist),
            other => Err(format!("unknown occupation {:?}", other)),
        }
    }
}

/// Profile of a TALENT user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TalentProfile {
    pub user_id: Uuid,
    pub occupations: BTreeSet<Occupation>,
    pub bio: Option<String>,
}

/// Profile of a SCOUT user, i.e. a shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ScoutProfile {
    pub user_id: Uuid,
    pub shop_name: String,
    pub default_address: Option<String>,
    pub website: Option<String>,
}

/// The role-specific half of an account. The variant always matches the
/// owner's role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Profile {
    Talent(TalentProfile),
    Scout(ScoutProfile),
}

impl Profile {
    pub fn role(&self) -> Role {
        match self {
            Profile::Talent(_) => Role::Talent,
            Profile::Scout(_) => Role::Scout,
        }
    }
}

/// Profile data supplied at registration, before the user id exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewProfile {
    Talent {
        occupations: BTreeSet<Occupation>,
        bio: Option<String>,
    },
    Scout {
        shop_name: String,
        default_address: Option<String>,
        website: Option<String>,
    },
}

impl NewProfile {
    pub fn role(&self) -> Role {
        match self {
            NewProfile::Talent { .. } => Role::Talent,
            NewProfile::Scout { .. } => Role::Scout,
        }
    }

    pub fn into_profile(self, user_id: Uuid) -> Profile {
        match self {
            NewProfile::Talent { occupations, bio } => Profile::Talent(TalentProfile {
                user_id,
                occupations,
                bio,
            }),
            NewProfile::Scout {
                shop_name,
                default_address,
                website,
            } => Profile::Scout(ScoutProfile {
                user_id,
                shop_name,
                default_address,
                website,
            }),
        }
    }
}

/// A user together with its profile, if one exists.
///
/// `profile` is `None` only for accounts left behind by an interrupted
/// registration in older data; new accounts are created atomically.
#[derive(Debug, Clone)]
pub struct Account {
    pub user: User,
    pub profile: Option<Profile>,
}

/// What `GET /profile` returns: the user's core fields plus whichever
/// profile matches its role. The other profile is always `null`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub talent_profile: Option<TalentProfile>,
    pub scout_profile: Option<ScoutProfile>,
}

impl From<Account> for ProfileView {
    fn from(account: Account) -> Self {
        let Account { user, profile } = account;
        let (talent_profile, scout_profile) = match profile {
            Some(Profile::Talent(talent)) => (Some(talent), None),
            Some(Profile::Scout(scout)) => (None, Some(scout)),
            None => (None, None),
        };
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            phone: user.phone,
            role: user.role,
            avatar_url: user.avatar_url,
            created_at: user.created_at,
            updated_at: user.updated_at,
            talent_profile,
            scout_profile,
        }
    }
}

/// Talent fields of `PATCH /profile`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TalentProfileInput {
    pub occupations: Option<Vec<Occupation>>,
    #[validate(length(max = 1000))]
    pub bio: Option<String>,
}

/// Scout fields of `PATCH /profile`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScoutProfileInput {
    #[validate(length(min = 1, max = 120))]
    pub shop_name: Option<String>,
    #[validate(length(max = 250))]
    pub default_address: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
}

/// Request body of `PATCH /profile`. Every field is optional and absent
/// fields are left as they are.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,
    #[validate(url)]
    pub avatar_url: Option<String>,
    #[validate]
    pub talent_profile: Option<TalentProfileInput>,
    #[validate]
    pub scout_profile: Option<ScoutProfileInput>,
}

impl UpdateProfileRequest {
    /// Trims text and drops blank optional values, so that an empty form field
    /// means "unchanged". An empty `phone` is kept: it clears the number.
    pub fn normalized(self) -> Self {
        Self {
            name: non_blank(self.name),
            phone: self.phone.map(|phone| phone.trim().to_string()),
            avatar_url: non_blank(self.avatar_url),
            talent_profile: self.talent_profile.map(|talent| TalentProfileInput {
                occupations: talent.occupations,
                bio: non_blank(talent.bio),
            }),
            scout_profile: self.scout_profile.map(|scout| ScoutProfileInput {
                shop_name: non_blank(scout.shop_name),
                default_address: non_blank(scout.default_address),
                website: non_blank(scout.website),
            }),
        }
    }

    /// Splits a validated request into the core-field changes and the profile
    /// update that applies to `role`. A payload for the other role is dropped.
    pub fn into_parts(self, role: Role) -> (UserChanges, Option<ProfileUpdate>) {
        let changes = UserChanges {
            name: self.name,
            phone: self.phone.map(|phone| {
                if phone.is_empty() {
                    None
                } else {
                    normalize_phone(&phone)
                }
            }),
            avatar_url: self.avatar_url,
        };
        let profile = ProfileUpdate::for_role(role, self.talent_profile, self.scout_profile);
        (changes, profile)
    }
}

/// Partial talent profile. `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TalentProfileUpdate {
    pub occupations: Option<BTreeSet<Occupation>>,
    pub bio: Option<String>,
}

impl From<TalentProfileInput> for TalentProfileUpdate {
    fn from(input: TalentProfileInput) -> Self {
        Self {
            occupations: input.occupations.map(|list| list.into_iter().collect()),
            bio: input.bio,
        }
    }
}

impl TalentProfileUpdate {
    pub fn apply_to(&self, profile: &mut TalentProfile) {
        if let Some(occupations) = &self.occupations {
            profile.occupations = occupations.clone();
        }
        if let Some(bio) = &self.bio {
            profile.bio = Some(bio.clone());
        }
    }

    /// The profile to insert when none exists yet.
    pub fn create(&self, user_id: Uuid) -> TalentProfile {
        TalentProfile {
            user_id,
            occupations: self.occupations.clone().unwrap_or_default(),
            bio: self.bio.clone(),
        }
    }
}

/// Partial scout profile. `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoutProfileUpdate {
    pub shop_name: Option<String>,
    pub default_address: Option<String>,
    pub website: Option<String>,
}

impl From<ScoutProfileInput> for ScoutProfileUpdate {
    fn from(input: ScoutProfileInput) -> Self {
        Self {
            shop_name: input.shop_name,
            default_address: input.default_address,
            website: input.website,
        }
    }
}

impl ScoutProfileUpdate {
    pub fn apply_to(&self, profile: &mut ScoutProfile) {
        if let Some(shop_name) = &self.shop_name {
            profile.shop_name = shop_name.clone();
        }
        if let Some(default_address) = &self.default_address {
            profile.default_address = Some(default_address.clone());
        }
        if let Some(website) = &self.website {
            profile.website = Some(website.clone());
        }
    }

    /// The profile to insert when none exists yet. A shop needs a name.
    pub fn create(&self, user_id: Uuid) -> Result<ScoutProfile, AppError> {
        let shop_name = self
            .shop_name
            .clone()
            .ok_or_else(|| AppError::invalid_input("shopName is required to create a scout profile"))?;
        Ok(ScoutProfile {
            user_id,
            shop_name,
            default_address: self.default_address.clone(),
            website: self.website.clone(),
        })
    }
}

/// A profile upsert, keyed by the same enum as `User::role`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileUpdate {
    Talent(TalentProfileUpdate),
    Scout(ScoutProfileUpdate),
}

impl ProfileUpdate {
    /// Picks the payload matching `role`; the other one is ignored, never
    /// promoted to a different profile type.
    pub fn for_role(
        role: Role,
        talent: Option<TalentProfileInput>,
        scout: Option<ScoutProfileInput>,
    ) -> Option<Self> {
        match role {
            Role::Talent => talent.map(|input| ProfileUpdate::Talent(input.into())),
            Role::Scout => scout.map(|input| ProfileUpdate::Scout(input.into())),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            ProfileUpdate::Talent(_) => Role::Talent,
            ProfileUpdate::Scout(_) => Role::Scout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_occupation_text_roundtrip() {
        for occupation in [
            Occupation::Barber,
            Occupation::Cosmetologist,
            Occupation::TattooArtist,
        ] {
            assert_eq!(occupation.as_str().parse::<Occupation>().unwrap(), occupation);
            let json = serde_json::to_string(&occupation).unwrap();
            assert_eq!(json, format!("\"{}\"", occupation));
        }
        assert!("PLUMBER".parse::<Occupation>().is_err());
    }

    #[test]
    fn test_new_profile_role() {
        let talent = NewProfile::Talent {
            occupations: BTreeSet::new(),
            bio: None,
        };
        let scout = NewProfile::Scout {
            shop_name: "Cuts".into(),
            default_address: None,
            website: None,
        };
        assert_eq!(talent.role(), Role::Talent);
        assert_eq!(scout.role(), Role::Scout);

        let id = Uuid::new_v4();
        assert_eq!(scout.into_profile(id).role(), Role::Scout);
    }

    #[test]
    fn test_mismatched_payload_is_ignored() {
        let scout = Some(ScoutProfileInput {
            shop_name: Some("Cuts".into()),
            ..Default::default()
        });
        assert_eq!(ProfileUpdate::for_role(Role::Talent, None, scout.clone()), None);

        let update = ProfileUpdate::for_role(Role::Scout, None, scout).unwrap();
        assert_eq!(update.role(), Role::Scout);
    }

    #[test]
    fn test_talent_update_semantics() {
        let user_id = Uuid::new_v4();
        let mut profile = TalentProfile {
            user_id,
            occupations: BTreeSet::from([Occupation::Barber]),
            bio: Some("Fades".into()),
        };

        TalentProfileUpdate::default().apply_to(&mut profile);
        assert_eq!(profile.occupations, BTreeSet::from([Occupation::Barber]));
        assert_eq!(profile.bio.as_deref(), Some("Fades"));

        let update = TalentProfileUpdate::from(TalentProfileInput {
            occupations: Some(vec![
                Occupation::TattooArtist,
                Occupation::Barber,
                Occupation::TattooArtist,
            ]),
            bio: None,
        });
        update.apply_to(&mut profile);
        assert_eq!(
            profile.occupations,
            BTreeSet::from([Occupation::Barber, Occupation::TattooArtist])
        );
        assert_eq!(profile.bio.as_deref(), Some("Fades"));

        let created = TalentProfileUpdate::default().create(user_id);
        assert!(created.occupations.is_empty());
    }

    #[test]
    fn test_scout_create_requires_shop_name() {
        let user_id = Uuid::new_v4();
        let update = ScoutProfileUpdate {
            website: Some("https://cuts.example.com".into()),
            ..Default::default()
        };
        assert!(matches!(
            update.create(user_id),
            Err(AppError::InvalidInput { .. })
        ));

        let update = ScoutProfileUpdate {
            shop_name: Some("New Cuts".into()),
            ..Default::default()
        };
        assert_eq!(update.create(user_id).unwrap().shop_name, "New Cuts");
    }

    #[test]
    fn test_update_request_parts() {
        let request: UpdateProfileRequest = serde_json::from_value(serde_json::json!({
            "name": "  New Name ",
            "phone": "555.123.4567",
            "scoutProfile": { "shopName": "New Cuts" },
            "talentProfile": { "bio": "ignored for scouts" }
        }))
        .unwrap();
        let request = request.normalized();
        assert!(request.validate().is_ok());

        let (changes, profile) = request.into_parts(Role::Scout);
        assert_eq!(changes.name.as_deref(), Some("New Name"));
        assert_eq!(changes.phone, Some(Some("(555) 123-4567".to_string())));
        assert_eq!(changes.avatar_url, None);
        assert_eq!(
            profile,
            Some(ProfileUpdate::Scout(ScoutProfileUpdate {
                shop_name: Some("New Cuts".into()),
                default_address: None,
                website: None,
            }))
        );
    }

    #[test]
    fn test_empty_update_request_is_noop() {
        let request: UpdateProfileRequest = serde_json::from_str("{}").unwrap();
        let (changes, profile) = request.normalized().into_parts(Role::Talent);
        assert!(changes.is_empty());
        assert_eq!(profile, None);
    }

    #[test]
    fn test_empty_phone_clears() {
        let request = UpdateProfileRequest {
            phone: Some("  ".into()),
            ..Default::default()
        }
        .normalized();
        assert!(request.validate().is_ok());
        let (changes, _) = request.into_parts(Role::Talent);
        assert_eq!(changes.phone, Some(None));
    }

    #[test]
    fn test_update_request_validation() {
        let bad_website = UpdateProfileRequest {
            scout_profile: Some(ScoutProfileInput {
                website: Some("not a url".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(bad_website.validate().is_err());

        let bad_phone = UpdateProfileRequest {
            phone: Some("12345".into()),
            ..Default::default()
        };
        assert!(bad_phone.validate().is_err());

        let long_bio = UpdateProfileRequest {
            talent_profile: Some(TalentProfileInput {
                bio: Some("x".repeat(1001)),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(long_bio.validate().is_err());
    }

    #[test]
    fn test_profile_view_nulls_other_profile() {
        let user_id = Uuid::new_v4();
        let now = Utc::now();
        let account = Account {
            user: User {
                id: user_id,
                email: "a@b.com".into(),
                name: "A".into(),
                password_hash: "hash".into(),
                phone: None,
                role: Role::Scout,
                avatar_url: None,
                created_at: now,
                updated_at: now,
            },
            profile: Some(Profile::Scout(ScoutProfile {
                user_id,
                shop_name: "Cuts".into(),
                default_address: None,
                website: None,
            })),
        };

        let json = serde_json::to_value(ProfileView::from(account)).unwrap();
        assert_eq!(json["scoutProfile"]["shopName"], "Cuts");
        assert!(json["talentProfile"].is_null());
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["role"], "SCOUT");
    }
}
