//! Permission strings gating user-facing operations.
//!
//! Permissions are stored as plain strings per user. Services check them
//! before listings, request transitions, and owner registration.

/// Access the app at all: blueprint listings and own requests.
pub const BASIC_ACCESS: &str = "basic_access";
/// See the resolved location column in blueprint listings.
pub const VIEW_BLUEPRINT_LOCATIONS: &str = "view_blueprint_locations";
/// Widen blueprint visibility to corporations sharing an alliance with the user's.
pub const VIEW_ALLIANCE_BLUEPRINTS: &str = "view_alliance_blueprints";
/// View industry job listings.
pub const VIEW_INDUSTRY_JOBS: &str = "view_industry_jobs";
/// Open blueprint copy requests.
pub const REQUEST_BLUEPRINTS: &str = "request_blueprints";
/// Work other users' requests: accept, fulfill, reopen, cancel.
pub const MANAGE_REQUESTS: &str = "manage_requests";
/// Register a corporation as a blueprint owner.
pub const ADD_CORPORATE_BLUEPRINT_OWNER: &str = "add_corporate_blueprint_owner";
/// Register one of the user's own characters as a personal blueprint owner.
pub const ADD_PERSONAL_BLUEPRINT_OWNER: &str = "add_personal_blueprint_owner";
