//! Blueprint request lifecycle.
//!
//! A request asks for a copy of someone else's blueprint and moves through
//! Open, InProgress, Fulfilled, and Cancelled. Fulfilled and Cancelled are
//! terminal. Transitions race under concurrent UI use (two fulfillers
//! claiming the same request), so a refused transition is a normal
//! [`TransitionOutcome::Denied`] with a message for the user, not an error.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::DatabaseConnection;

use entity::sea_orm_active_enums::RequestStatus;

use crate::data::blueprint::BlueprintRepository;
use crate::data::eve::eve_type::EveTypeRepository;
use crate::data::owner::OwnerRepository;
use crate::data::request::RequestRepository;
use crate::data::user::UserRepository;
use crate::error::Error;
use crate::model::permission::{BASIC_ACCESS, MANAGE_REQUESTS, REQUEST_BLUEPRINTS};
use crate::model::request::{RequestSummary, TransitionOutcome};
use crate::service::access::AccessService;

pub struct RequestService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> RequestService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Opens a request for a copy of a blueprint.
    ///
    /// # Arguments
    /// - `user_id`: The requesting user
    /// - `blueprint_item_id`: The blueprint a copy is wanted of, must be
    ///   visible to the user
    /// - `runs`: Licensed runs wanted, `None` to ask for an unlimited copy
    ///
    /// # Returns
    /// The open request. Blueprints outside the user's visibility scope
    /// report [`Error::BlueprintNotFound`], same as blueprints that do not
    /// exist at all.
    pub async fn create_request(
        &self,
        user_id: i32,
        blueprint_item_id: i64,
        runs: Option<i32>,
    ) -> Result<entity::request::Model, Error> {
        let access = AccessService::new(self.db);
        access.require_permission(user_id, REQUEST_BLUEPRINTS).await?;

        let blueprint = BlueprintRepository::new(self.db)
            .get_by_item_id(blueprint_item_id)
            .await?
            .ok_or(Error::BlueprintNotFound(blueprint_item_id))?;

        let visible = access.visible_owners(user_id).await?;
        if !visible.iter().any(|owner| owner.id == blueprint.owner_id) {
            return Err(Error::BlueprintNotFound(blueprint_item_id));
        }

        let request = RequestRepository::new(self.db)
            .create(blueprint.item_id, user_id, runs)
            .await?;

        tracing::info!(
            "User {} opened request {} for blueprint {}",
            user_id,
            request.id,
            blueprint.item_id
        );

        Ok(request)
    }

    /// The user's own requests that are still open or being worked on.
    pub async fn my_requests(&self, user_id: i32) -> Result<Vec<RequestSummary>, Error> {
        AccessService::new(self.db)
            .require_permission(user_id, REQUEST_BLUEPRINTS)
            .await?;

        let requests: Vec<entity::request::Model> = RequestRepository::new(self.db)
            .get_by_requesting_user_id(user_id)
            .await?
            .into_iter()
            .filter(|request| request.closed_at.is_none())
            .collect();

        self.summarize(requests).await
    }

    /// Open requests against blueprints of owners the user manages.
    pub async fn fulfillable_requests(&self, user_id: i32) -> Result<Vec<RequestSummary>, Error> {
        let access = AccessService::new(self.db);
        access.require_permission(user_id, MANAGE_REQUESTS).await?;

        let owner_ids: Vec<i32> = access
            .manageable_owners(user_id)
            .await?
            .iter()
            .map(|owner| owner.id)
            .collect();
        let requests = RequestRepository::new(self.db)
            .get_open_for_owners(&owner_ids)
            .await?;

        self.summarize(requests).await
    }

    /// In-progress requests the user has personally claimed.
    pub async fn requests_being_fulfilled(
        &self,
        user_id: i32,
    ) -> Result<Vec<RequestSummary>, Error> {
        let access = AccessService::new(self.db);
        access.require_permission(user_id, MANAGE_REQUESTS).await?;

        let owner_ids: Vec<i32> = access
            .manageable_owners(user_id)
            .await?
            .iter()
            .map(|owner| owner.id)
            .collect();
        let requests = RequestRepository::new(self.db)
            .get_in_progress_for_user(&owner_ids, user_id)
            .await?;

        self.summarize(requests).await
    }

    /// Attempts one status transition on a request.
    ///
    /// # Arguments
    /// - `request_id`: The request to move
    /// - `new_status`: The target state
    /// - `user_id`: The acting user; must manage the blueprint's owner, or
    ///   for a cancellation may be the original requester
    ///
    /// # Returns
    /// [`TransitionOutcome::Applied`] with the updated request, or
    /// [`TransitionOutcome::Denied`] when the request is already closed,
    /// the state change is not legal, or the actor lacks management rights
    /// over the blueprint's owner. The closing timestamp is set on
    /// Fulfilled and Cancelled and cleared on reopen; the fulfilling user
    /// is recorded on claim (InProgress) and fulfillment and cleared on
    /// reopen and cancellation.
    pub async fn transition(
        &self,
        request_id: i32,
        new_status: RequestStatus,
        user_id: i32,
    ) -> Result<TransitionOutcome, Error> {
        let repository = RequestRepository::new(self.db);
        let request = repository
            .get_by_id(request_id)
            .await?
            .ok_or(Error::RequestNotFound(request_id))?;

        let access = AccessService::new(self.db);
        let is_requester_cancel =
            new_status == RequestStatus::Cancelled && request.requesting_user_id == user_id;
        if is_requester_cancel {
            access.require_permission(user_id, BASIC_ACCESS).await?;
        } else {
            access.require_permission(user_id, MANAGE_REQUESTS).await?;
        }

        if request.status.is_closed() {
            return Ok(TransitionOutcome::Denied(format!(
                "Request {} is already closed",
                request_id
            )));
        }
        if !is_legal_transition(&request.status, &new_status) {
            return Ok(TransitionOutcome::Denied(format!(
                "Request {} cannot move from {:?} to {:?}",
                request_id, request.status, new_status
            )));
        }
        if !is_requester_cancel && !self.manages_blueprint(user_id, request.blueprint_id).await? {
            return Ok(TransitionOutcome::Denied(format!(
                "You do not manage the owner of request {}",
                request_id
            )));
        }

        let now = Utc::now().naive_utc();
        let (fulfilling_user_id, closed_at) = match new_status {
            RequestStatus::Open => (None, None),
            RequestStatus::InProgress => (Some(user_id), None),
            RequestStatus::Fulfilled => (Some(user_id), Some(now)),
            RequestStatus::Cancelled => (None, Some(now)),
        };

        let updated = repository
            .update_status(request.id, new_status, fulfilling_user_id, closed_at)
            .await?;

        tracing::info!(
            "User {} moved request {} to {:?}",
            user_id,
            updated.id,
            updated.status
        );

        Ok(TransitionOutcome::Applied(updated))
    }

    async fn manages_blueprint(&self, user_id: i32, blueprint_id: i64) -> Result<bool, Error> {
        let Some(blueprint) = BlueprintRepository::new(self.db)
            .get_by_item_id(blueprint_id)
            .await?
        else {
            return Ok(false);
        };

        let manageable = AccessService::new(self.db).manageable_owners(user_id).await?;

        Ok(manageable.iter().any(|owner| owner.id == blueprint.owner_id))
    }

    async fn summarize(
        &self,
        requests: Vec<entity::request::Model>,
    ) -> Result<Vec<RequestSummary>, Error> {
        let blueprint_ids: Vec<i64> =
            requests.iter().map(|request| request.blueprint_id).collect();
        let blueprints: HashMap<i64, entity::blueprint::Model> = BlueprintRepository::new(self.db)
            .get_by_item_ids(&blueprint_ids)
            .await?
            .into_iter()
            .map(|blueprint| (blueprint.item_id, blueprint))
            .collect();

        let type_ids: Vec<i64> = blueprints
            .values()
            .map(|blueprint| blueprint.eve_type_id)
            .collect();
        let type_names: HashMap<i64, String> = EveTypeRepository::new(self.db)
            .get_by_type_ids(&type_ids)
            .await?
            .into_iter()
            .map(|row| (row.type_id, row.name))
            .collect();

        let owners = OwnerRepository::new(self.db).get_all().await?;
        let owner_names = AccessService::new(self.db).owner_display_names(&owners).await?;

        let mut user_ids: Vec<i32> = requests
            .iter()
            .map(|request| request.requesting_user_id)
            .chain(requests.iter().filter_map(|request| request.fulfilling_user_id))
            .collect();
        user_ids.sort_unstable();
        user_ids.dedup();
        let user_names: HashMap<i32, String> = UserRepository::new(self.db)
            .get_by_ids(&user_ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user.name))
            .collect();

        let mut summaries: Vec<RequestSummary> = requests
            .into_iter()
            .map(|request| {
                let blueprint = blueprints.get(&request.blueprint_id);

                RequestSummary {
                    id: request.id,
                    blueprint_item_id: request.blueprint_id,
                    blueprint_type_name: blueprint
                        .and_then(|blueprint| type_names.get(&blueprint.eve_type_id))
                        .cloned()
                        .unwrap_or_else(|| format!("Blueprint #{}", request.blueprint_id)),
                    owner_name: blueprint
                        .and_then(|blueprint| owner_names.get(&blueprint.owner_id))
                        .cloned()
                        .unwrap_or_else(|| "Unknown owner".to_string()),
                    requesting_user_name: user_names
                        .get(&request.requesting_user_id)
                        .cloned()
                        .unwrap_or_else(|| format!("User #{}", request.requesting_user_id)),
                    fulfilling_user_name: request
                        .fulfilling_user_id
                        .and_then(|user_id| user_names.get(&user_id))
                        .cloned(),
                    runs: request.runs,
                    status: request.status,
                    created_at: request.created_at,
                    closed_at: request.closed_at,
                }
            })
            .collect();

        summaries.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        Ok(summaries)
    }
}

fn is_legal_transition(current: &RequestStatus, new: &RequestStatus) -> bool {
    matches!(
        (current, new),
        (RequestStatus::Open, RequestStatus::InProgress)
            | (RequestStatus::Open, RequestStatus::Cancelled)
            | (RequestStatus::InProgress, RequestStatus::Open)
            | (RequestStatus::InProgress, RequestStatus::Fulfilled)
            | (RequestStatus::InProgress, RequestStatus::Cancelled)
    )
}
