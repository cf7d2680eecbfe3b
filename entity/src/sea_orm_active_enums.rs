use sea_orm::entity::prelude::*;

/// Lifecycle states of a blueprint request.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(2))")]
pub enum RequestStatus {
    #[sea_orm(string_value = "OP")]
    Open,
    #[sea_orm(string_value = "IP")]
    InProgress,
    #[sea_orm(string_value = "FL")]
    Fulfilled,
    #[sea_orm(string_value = "CL")]
    Cancelled,
}

impl RequestStatus {
    /// True for states that no longer accept transitions.
    pub fn is_closed(&self) -> bool {
        matches!(self, RequestStatus::Fulfilled | RequestStatus::Cancelled)
    }
}

/// Industry job states as reported by ESI.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum JobStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "delivered")]
    Delivered,
    #[sea_orm(string_value = "paused")]
    Paused,
    #[sea_orm(string_value = "ready")]
    Ready,
    #[sea_orm(string_value = "reverted")]
    Reverted,
}
