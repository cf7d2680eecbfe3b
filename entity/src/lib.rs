pub mod prelude;

pub mod blueprint;
pub mod esi_token;
pub mod eve_character;
pub mod eve_corporation;
pub mod eve_solar_system;
pub mod eve_type;
pub mod industry_job;
pub mod location;
pub mod owner;
pub mod request;
pub mod sea_orm_active_enums;
pub mod user;
pub mod user_character;
pub mod user_permission;
