pub mod profile;
pub mod user;

pub use profile::{
    Account, NewProfile, Occupation, Profile, ProfileUpdate, ProfileView, ScoutProfile,
    ScoutProfileInput, ScoutProfileUpdate, TalentProfile, TalentProfileInput, TalentProfileUpdate,
    UpdateProfileRequest,
};
pub use user::{NewAccount, PublicUser, Role, User, UserChanges};
