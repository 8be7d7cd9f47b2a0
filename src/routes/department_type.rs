//! Department type route handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::{debug, info};
use validator::Validate;

use crate::error::{validation_error, ApiResult, AppError};
use crate::models::{
    ApiResponse, CreateDepartmentTypeRequest, DepartmentType, DepartmentTypeDto,
    UpdateDepartmentTypeRequest,
};
use crate::repository::Filter;
use crate::state::SharedState;
use crate::unit_of_work::UnitOfWork;

#[derive(Debug, Deserialize)]
pub struct GetDepartmentTypeQuery {
    pub id: i32,
}

/// GET /api/DepartmentType/GetDepartmentType
pub async fn get_department_type(
    State(state): State<SharedState>,
    Query(params): Query<GetDepartmentTypeQuery>,
) -> ApiResult<Json<ApiResponse<DepartmentTypeDto>>> {
    debug!("Fetching department type {}", params.id);

    let uow = UnitOfWork::new(&state.db_pool).await?;
    let department_type = uow
        .department_types
        .get(uow.client(), Filter::by_id(params.id), &[])
        .await?;

    Ok(Json(ApiResponse::ok(DepartmentTypeDto::from_entity(
        &department_type,
    ))))
}

/// GET /api/DepartmentType/GetAll
pub async fn get_all(
    State(state): State<SharedState>,
) -> ApiResult<Json<ApiResponse<Vec<DepartmentTypeDto>>>> {
    let uow = UnitOfWork::new(&state.db_pool).await?;
    let department_types = uow.department_types.get_all(uow.client(), &[]).await?;

    info!("Listed {} department types", department_types.len());

    Ok(Json(ApiResponse::ok(
        department_types
            .iter()
            .map(DepartmentTypeDto::from_entity)
            .collect(),
    )))
}

/// POST /api/DepartmentType/Create
pub async fn create(
    State(state): State<SharedState>,
    Json(payload): Json<CreateDepartmentTypeRequest>,
) -> ApiResult<Json<ApiResponse<DepartmentTypeDto>>> {
    payload.validate().map_err(|e| validation_error(e.to_string()))?;

    let mut uow = UnitOfWork::new(&state.db_pool).await?;
    let entity = DepartmentType {
        id: 0,
        name: payload.name,
    };

    let pending = uow.department_types.create(entity);
    uow.complete().await?;

    let created = uow
        .department_types
        .resolve(&pending)
        .ok_or_else(|| AppError::Internal("Staged create was not committed".to_string()))?;

    info!(
        "Department type '{}' created with id {}",
        created.name, created.id
    );

    Ok(Json(ApiResponse::ok(DepartmentTypeDto::from_entity(
        &created,
    ))))
}

/// DELETE /api/DepartmentType/Delete
pub async fn delete(
    State(state): State<SharedState>,
    Json(payload): Json<DepartmentTypeDto>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let mut uow = UnitOfWork::new(&state.db_pool).await?;
    let entity = payload.to_entity();

    uow.department_types.delete(&entity);
    uow.complete().await?;

    info!("Department type {} deleted", entity.id);

    Ok(Json(ApiResponse::<()>::ok_empty()))
}

/// GET /api/DepartmentType/Edit
///
/// Only the supplied fields change; unspecified fields retain the stored
/// values.
pub async fn edit(
    State(state): State<SharedState>,
    Query(payload): Query<UpdateDepartmentTypeRequest>,
) -> ApiResult<Json<ApiResponse<DepartmentTypeDto>>> {
    let mut uow = UnitOfWork::new(&state.db_pool).await?;

    let mut entity = uow
        .department_types
        .get(uow.client(), Filter::by_id(payload.id), &[])
        .await?;
    payload.apply(&mut entity);

    let pending = uow.department_types.edit(entity);
    uow.complete().await?;

    let edited = uow
        .department_types
        .resolve(&pending)
        .ok_or_else(|| AppError::Internal("Staged edit was not committed".to_string()))?;

    Ok(Json(ApiResponse::ok(DepartmentTypeDto::from_entity(
        &edited,
    ))))
}
