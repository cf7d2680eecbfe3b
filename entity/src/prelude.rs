pub use super::blueprint::Entity as Blueprint;
pub use super::esi_token::Entity as EsiToken;
pub use super::eve_character::Entity as EveCharacter;
pub use super::eve_corporation::Entity as EveCorporation;
pub use super::eve_solar_system::Entity as EveSolarSystem;
pub use super::eve_type::Entity as EveType;
pub use super::industry_job::Entity as IndustryJob;
pub use super::location::Entity as Location;
pub use super::owner::Entity as Owner;
pub use super::request::Entity as Request;
pub use super::user::Entity as User;
pub use super::user_character::Entity as UserCharacter;
pub use super::user_permission::Entity as UserPermission;
