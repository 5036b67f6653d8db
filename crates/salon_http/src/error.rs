//! HTTP error taxonomy and JSON error payloads.
//!
//! Client errors carry a readable message (plus offending ids where known).
//! Server errors are logged with detail and answered with a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use salon_core::{RepoError, SyncServiceError};
use serde::Serialize;
use thiserror::Error;

const INTERNAL_ERROR_MESSAGE: &str = "server error while processing the request";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("{0}")]
    Validation(String),

    #[error("the following departments are invalid: {}", .0.join(", "))]
    InvalidDepartments(Vec<String>),

    #[error("organization not found: {0}")]
    OrganizationNotFound(String),

    #[error("department not found: {0}")]
    DepartmentNotFound(String),

    #[error("organization already exists: {0}")]
    OrganizationExists(String),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_ids: Option<Vec<String>>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedPayload(_) | Self::Validation(_) | Self::InvalidDepartments(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::OrganizationNotFound(_) | Self::DepartmentNotFound(_) => StatusCode::NOT_FOUND,
            Self::OrganizationExists(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Internal(detail) => {
                log::error!("event=http_error module=http status=error error={detail}");
                ErrorBody {
                    error: INTERNAL_ERROR_MESSAGE.to_string(),
                    invalid_ids: None,
                }
            }
            Self::InvalidDepartments(ref ids) => ErrorBody {
                error: self.to_string(),
                invalid_ids: Some(ids.clone()),
            },
            other => ErrorBody {
                error: other.to_string(),
                invalid_ids: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err.to_string()),
            RepoError::OrganizationNotFound(id) => Self::OrganizationNotFound(id),
            RepoError::DuplicateOrganization(id) => Self::OrganizationExists(id),
            RepoError::UnresolvedDepartments(ids) => Self::InvalidDepartments(ids),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<SyncServiceError> for ApiError {
    fn from(value: SyncServiceError) -> Self {
        match value {
            SyncServiceError::OrganizationNotFound(id) => Self::OrganizationNotFound(id),
            SyncServiceError::UnresolvedDepartments(ids) => Self::InvalidDepartments(ids),
            SyncServiceError::Repo(err) => Self::from(err),
            client => Self::Validation(client.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_errors_map_to_expected_statuses() {
        let empty = ApiError::from(SyncServiceError::EmptyDepartmentList);
        assert_eq!(empty.status(), StatusCode::BAD_REQUEST);

        let unresolved = ApiError::from(SyncServiceError::UnresolvedDepartments(vec![
            "d9".to_string(),
        ]));
        assert_eq!(unresolved.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            unresolved.to_string(),
            "the following departments are invalid: d9"
        );

        let missing = ApiError::from(SyncServiceError::OrganizationNotFound("x".to_string()));
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let store = ApiError::from(RepoError::MissingRequiredTable("departments"));
        assert_eq!(store.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
