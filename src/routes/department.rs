//! Department route handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::{debug, info};
use validator::Validate;

use crate::error::{validation_error, ApiResult, AppError};
use crate::models::{
    ApiResponse, CreateDepartmentRequest, Department, DepartmentDto, UpdateDepartmentRequest,
};
use crate::repository::Filter;
use crate::state::SharedState;
use crate::unit_of_work::UnitOfWork;

/// Relations eagerly loaded with department reads
const DEPARTMENT_RELATIONS: &[&str] = &["department_type"];

#[derive(Debug, Deserialize)]
pub struct GetDepartmentQuery {
    pub id: i32,
}

/// GET /api/Department/GetDepartment
pub async fn get_department(
    State(state): State<SharedState>,
    Query(params): Query<GetDepartmentQuery>,
) -> ApiResult<Json<ApiResponse<DepartmentDto>>> {
    debug!("Fetching department {}", params.id);

    let uow = UnitOfWork::new(&state.db_pool).await?;
    let department = uow
        .departments
        .get(uow.client(), Filter::by_id(params.id), DEPARTMENT_RELATIONS)
        .await?;

    Ok(Json(ApiResponse::ok(DepartmentDto::from_entity(&department))))
}

/// GET /api/Department/GetAll
pub async fn get_all(
    State(state): State<SharedState>,
) -> ApiResult<Json<ApiResponse<Vec<DepartmentDto>>>> {
    let uow = UnitOfWork::new(&state.db_pool).await?;
    let departments = uow
        .departments
        .get_all(uow.client(), DEPARTMENT_RELATIONS)
        .await?;

    info!("Listed {} departments", departments.len());

    Ok(Json(ApiResponse::ok(
        departments.iter().map(DepartmentDto::from_entity).collect(),
    )))
}

/// POST /api/Department/Create
pub async fn create(
    State(state): State<SharedState>,
    Json(payload): Json<CreateDepartmentRequest>,
) -> ApiResult<Json<ApiResponse<DepartmentDto>>> {
    payload.validate().map_err(|e| validation_error(e.to_string()))?;

    let mut uow = UnitOfWork::new(&state.db_pool).await?;
    let entity = Department {
        id: 0,
        name: payload.name,
        department_type_id: payload.department_type_id,
        department_type: None,
    };

    let pending = uow.departments.create(entity);
    uow.complete().await?;

    let created = uow
        .departments
        .resolve(&pending)
        .ok_or_else(|| AppError::Internal("Staged create was not committed".to_string()))?;

    info!("Department '{}' created with id {}", created.name, created.id);

    Ok(Json(ApiResponse::ok(DepartmentDto::from_entity(&created))))
}

/// DELETE /api/Department/Delete
pub async fn delete(
    State(state): State<SharedState>,
    Json(payload): Json<DepartmentDto>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let mut uow = UnitOfWork::new(&state.db_pool).await?;
    let entity = payload.to_entity();

    uow.departments.delete(&entity);
    uow.complete().await?;

    info!("Department {} deleted", entity.id);

    Ok(Json(ApiResponse::<()>::ok_empty()))
}

/// GET /api/Department/Edit
///
/// Only the supplied fields change; unspecified fields retain the stored
/// values.
pub async fn edit(
    State(state): State<SharedState>,
    Query(payload): Query<UpdateDepartmentRequest>,
) -> ApiResult<Json<ApiResponse<DepartmentDto>>> {
    let mut uow = UnitOfWork::new(&state.db_pool).await?;

    let mut entity = uow
        .departments
        .get(uow.client(), Filter::by_id(payload.id), &[])
        .await?;
    payload.apply(&mut entity);

    let pending = uow.departments.edit(entity);
    uow.complete().await?;

    let edited = uow
        .departments
        .resolve(&pending)
        .ok_or_else(|| AppError::Internal("Staged edit was not committed".to_string()))?;

    Ok(Json(ApiResponse::ok(DepartmentDto::from_entity(&edited))))
}
