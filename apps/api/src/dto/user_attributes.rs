use blend_application::{SyncFailure, SyncMode, SyncSummary};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// How users are enumerated for a sync.
#[derive(Debug, Clone, Copy, Default, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-type-dto.ts"
)]
pub enum UpdateTypeDto {
    #[default]
    User,
    Group,
}

impl From<UpdateTypeDto> for SyncMode {
    fn from(value: UpdateTypeDto) -> Self {
        match value {
            UpdateTypeDto::User => Self::User,
            UpdateTypeDto::Group => Self::Group,
        }
    }
}

/// Incoming payload for a user attribute sync.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-user-attributes-request.ts"
)]
pub struct UpdateUserAttributesRequest {
    pub user_attribute: String,
    #[serde(default)]
    pub update_type: UpdateTypeDto,
}

/// One user whose attribute could not be written.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/erroring-user-response.ts"
)]
pub struct ErroringUserResponse {
    pub user_id: String,
    pub user_attribute_id: String,
    pub error: String,
    pub group_ua_value: String,
}

impl From<SyncFailure> for ErroringUserResponse {
    fn from(value: SyncFailure) -> Self {
        Self {
            user_id: value.user_id,
            user_attribute_id: value.user_attribute_id,
            error: value.error,
            group_ua_value: value.attempted_value,
        }
    }
}

/// User attribute sync summary.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-user-attributes-response.ts"
)]
pub struct UpdateUserAttributesResponse {
    pub success: bool,
    pub number_of_users_updated: usize,
    pub number_of_users: usize,
    pub erroring_users: Option<Vec<ErroringUserResponse>>,
}

impl From<SyncSummary> for UpdateUserAttributesResponse {
    fn from(value: SyncSummary) -> Self {
        let success = value.is_success();
        let erroring_users = (!value.failures.is_empty()).then(|| {
            value
                .failures
                .into_iter()
                .map(ErroringUserResponse::from)
                .collect()
        });

        Self {
            success,
            number_of_users_updated: value.succeeded_count,
            number_of_users: value.total_users,
            erroring_users,
        }
    }
}
