pub use sea_orm_migration::prelude::*;

mod m20260115_000001_eve_corporation;
mod m20260115_000002_eve_character;
mod m20260115_000003_eve_type;
mod m20260115_000004_eve_solar_system;
mod m20260115_000005_user;
mod m20260115_000006_user_character;
mod m20260115_000007_user_permission;
mod m20260115_000008_esi_token;
mod m20260115_000009_owner;
mod m20260115_000010_location;
mod m20260115_000011_blueprint;
mod m20260115_000012_industry_job;
mod m20260115_000013_request;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260115_000001_eve_corporation::Migration),
            Box::new(m20260115_000002_eve_character::Migration),
            Box::new(m20260115_000003_eve_type::Migration),
            Box::new(m20260115_000004_eve_solar_system::Migration),
            Box::new(m20260115_000005_user::Migration),
            Box::new(m20260115_000006_user_character::Migration),
            Box::new(m20260115_000007_user_permission::Migration),
            Box::new(m20260115_000008_esi_token::Migration),
            Box::new(m20260115_000009_owner::Migration),
            Box::new(m20260115_000010_location::Migration),
            Box::new(m20260115_000011_blueprint::Migration),
            Box::new(m20260115_000012_industry_job::Migration),
            Box::new(m20260115_000013_request::Migration),
        ]
    }
}
