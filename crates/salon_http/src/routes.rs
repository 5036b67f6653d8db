use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use log::info;
use salon_core::{
    core_version, Department, DepartmentSyncService, Organization, OrganizationDepartment,
    OrganizationService, SqliteDepartmentRepository, SqliteOrganizationRepository,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncDepartmentsRequest {
    #[serde(default)]
    pub department_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncDepartmentsResponse {
    pub message: String,
    pub data: Vec<OrganizationDepartment>,
    pub placeholders_created: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrganizationRequest {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SaveDepartmentRequest {
    pub name: String,
    pub label: String,
    pub icon: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: core_version(),
    })
}

/// `POST /organizations/{id}/departments`: replaces the organization's
/// department set with `departmentIds`.
pub async fn sync_departments_handler(
    State(state): State<AppState>,
    Path(organization_id): Path<String>,
    payload: Result<Json<SyncDepartmentsRequest>, JsonRejection>,
) -> Result<Json<SyncDepartmentsResponse>, ApiError> {
    let Json(request) =
        payload.map_err(|rejection| ApiError::MalformedPayload(rejection.body_text()))?;

    let outcome = state
        .with_connection(move |conn| {
            let repo = SqliteDepartmentRepository::try_new(conn)?;
            let mut service = DepartmentSyncService::new(repo);
            Ok(service.synchronize(&organization_id, &request.department_ids)?)
        })
        .await?;

    info!(
        "event=http_department_sync module=http status=ok linked={}",
        outcome.created.len()
    );
    Ok(Json(SyncDepartmentsResponse {
        message: "departments synchronized".to_string(),
        data: outcome.created,
        placeholders_created: outcome.placeholders_created,
    }))
}

/// `GET /organizations/{id}/departments`
pub async fn list_organization_departments_handler(
    State(state): State<AppState>,
    Path(organization_id): Path<String>,
) -> Result<Json<Vec<Department>>, ApiError> {
    let departments = state
        .with_connection(move |conn| {
            let repo = SqliteDepartmentRepository::try_new(conn)?;
            let service = DepartmentSyncService::new(repo);
            Ok(service.list_organization_departments(&organization_id)?)
        })
        .await?;
    Ok(Json(departments))
}

/// `POST /organizations`
pub async fn create_organization_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateOrganizationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Organization>), ApiError> {
    let Json(request) =
        payload.map_err(|rejection| ApiError::MalformedPayload(rejection.body_text()))?;

    let organization = state
        .with_connection(move |conn| {
            let service = OrganizationService::new(SqliteOrganizationRepository::try_new(conn)?);
            Ok(service.register_organization(&request.id, &request.name)?)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(organization)))
}

/// `GET /organizations/{id}`
pub async fn get_organization_handler(
    State(state): State<AppState>,
    Path(organization_id): Path<String>,
) -> Result<Json<Organization>, ApiError> {
    let organization = state
        .with_connection(move |conn| {
            let service = OrganizationService::new(SqliteOrganizationRepository::try_new(conn)?);
            Ok(service.get_organization(&organization_id)?)
        })
        .await?;
    Ok(Json(organization))
}

/// `GET /departments`
pub async fn list_departments_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Department>>, ApiError> {
    let departments = state
        .with_connection(|conn| {
            let service = DepartmentSyncService::new(SqliteDepartmentRepository::try_new(conn)?);
            Ok(service.list_departments()?)
        })
        .await?;
    Ok(Json(departments))
}

/// `GET /departments/{id}`
pub async fn get_department_handler(
    State(state): State<AppState>,
    Path(department_id): Path<String>,
) -> Result<Json<Department>, ApiError> {
    let department = state
        .with_connection(move |conn| {
            let service = DepartmentSyncService::new(SqliteDepartmentRepository::try_new(conn)?);
            service
                .get_department(&department_id)?
                .ok_or(ApiError::DepartmentNotFound(department_id))
        })
        .await?;
    Ok(Json(department))
}

/// `PUT /departments/{id}`: creates or edits one department's attributes.
pub async fn save_department_handler(
    State(state): State<AppState>,
    Path(department_id): Path<String>,
    payload: Result<Json<SaveDepartmentRequest>, JsonRejection>,
) -> Result<Json<Department>, ApiError> {
    let Json(request) =
        payload.map_err(|rejection| ApiError::MalformedPayload(rejection.body_text()))?;

    let department = state
        .with_connection(move |conn| {
            let service = DepartmentSyncService::new(SqliteDepartmentRepository::try_new(conn)?);
            Ok(service.save_department(Department::new(
                department_id,
                request.name,
                request.label,
                request.icon,
            ))?)
        })
        .await?;
    Ok(Json(department))
}
