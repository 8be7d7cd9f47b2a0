//! Employee route handlers
//!
//! Uniform template: map the DTO, call one repository operation through the
//! unit of work, commit staged changes, wrap the result in the envelope.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::{debug, info};
use validator::Validate;

use crate::auth::{self, TokenResponse};
use crate::error::{validation_error, ApiResult, AppError};
use crate::models::{
    ApiResponse, CreateEmployeeRequest, Employee, EmployeeDto, LoginRequest, UpdateEmployeeRequest,
};
use crate::repository::Filter;
use crate::state::SharedState;
use crate::unit_of_work::UnitOfWork;

/// Relations eagerly loaded with employee reads
const EMPLOYEE_RELATIONS: &[&str] = &["department"];

#[derive(Debug, Deserialize)]
pub struct GetEmployeeQuery {
    pub id: i32,
}

#[derive(Debug, Deserialize)]
pub struct GetByNameQuery {
    pub name: String,
}

/// GET /api/Employee/GetEmployee
pub async fn get_employee(
    State(state): State<SharedState>,
    Query(params): Query<GetEmployeeQuery>,
) -> ApiResult<Json<ApiResponse<EmployeeDto>>> {
    debug!("Fetching employee {}", params.id);

    let uow = UnitOfWork::new(&state.db_pool).await?;
    let employee = uow
        .employees
        .get(uow.client(), Filter::by_id(params.id), EMPLOYEE_RELATIONS)
        .await?;

    Ok(Json(ApiResponse::ok(EmployeeDto::from_entity(&employee))))
}

/// GET /api/Employee/GetByName
pub async fn get_by_name(
    State(state): State<SharedState>,
    Query(params): Query<GetByNameQuery>,
) -> ApiResult<Json<ApiResponse<EmployeeDto>>> {
    if params.name.is_empty() {
        return Err(validation_error("Name is required"));
    }

    let uow = UnitOfWork::new(&state.db_pool).await?;
    let employee = uow
        .employees
        .get_by_name(uow.client(), &params.name, EMPLOYEE_RELATIONS)
        .await?;

    Ok(Json(ApiResponse::ok(EmployeeDto::from_entity(&employee))))
}

/// GET /api/Employee/GetTopSalary
pub async fn get_top_salary(
    State(state): State<SharedState>,
) -> ApiResult<Json<ApiResponse<EmployeeDto>>> {
    let uow = UnitOfWork::new(&state.db_pool).await?;
    let employee = uow
        .employees
        .get_top_salary(uow.client(), EMPLOYEE_RELATIONS)
        .await?;

    Ok(Json(ApiResponse::ok(EmployeeDto::from_entity(&employee))))
}

/// GET /api/Employee/GetAll
pub async fn get_all(
    State(state): State<SharedState>,
) -> ApiResult<Json<ApiResponse<Vec<EmployeeDto>>>> {
    let uow = UnitOfWork::new(&state.db_pool).await?;
    let employees = uow
        .employees
        .get_all(uow.client(), EMPLOYEE_RELATIONS)
        .await?;

    info!("Listed {} employees", employees.len());

    Ok(Json(ApiResponse::ok(
        employees.iter().map(EmployeeDto::from_entity).collect(),
    )))
}

/// POST /api/Employee/Create
pub async fn create(
    State(state): State<SharedState>,
    Json(payload): Json<CreateEmployeeRequest>,
) -> ApiResult<Json<ApiResponse<EmployeeDto>>> {
    payload.validate().map_err(|e| validation_error(e.to_string()))?;

    let mut uow = UnitOfWork::new(&state.db_pool).await?;
    let entity = Employee {
        id: 0,
        name: payload.name,
        salary: payload.salary,
        department_id: payload.department_id,
        password_hash: auth::hash_password(&payload.password)?,
        department: None,
    };

    let pending = uow.employees.create(entity);
    uow.complete().await?;

    let created = uow
        .employees
        .resolve(&pending)
        .ok_or_else(|| AppError::Internal("Staged create was not committed".to_string()))?;

    info!("Employee '{}' created with id {}", created.name, created.id);

    Ok(Json(ApiResponse::ok(EmployeeDto::from_entity(&created))))
}

/// DELETE /api/Employee/Delete
pub async fn delete(
    State(state): State<SharedState>,
    Json(payload): Json<EmployeeDto>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let mut uow = UnitOfWork::new(&state.db_pool).await?;
    let entity = payload.to_entity();

    uow.employees.delete(&entity);
    uow.complete().await?;

    info!("Employee {} deleted", entity.id);

    Ok(Json(ApiResponse::<()>::ok_empty()))
}

/// GET /api/Employee/Edit
///
/// Only the supplied fields change; unspecified fields retain the stored
/// values.
pub async fn edit(
    State(state): State<SharedState>,
    Query(payload): Query<UpdateEmployeeRequest>,
) -> ApiResult<Json<ApiResponse<EmployeeDto>>> {
    let mut uow = UnitOfWork::new(&state.db_pool).await?;

    let mut entity = uow
        .employees
        .get(uow.client(), Filter::by_id(payload.id), &[])
        .await?;
    payload.apply(&mut entity);

    let pending = uow.employees.edit(entity);
    uow.complete().await?;

    let edited = uow
        .employees
        .resolve(&pending)
        .ok_or_else(|| AppError::Internal("Staged edit was not committed".to_string()))?;

    Ok(Json(ApiResponse::ok(EmployeeDto::from_entity(&edited))))
}

/// POST /api/Employee/Login
pub async fn login(
    State(state): State<SharedState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<ApiResponse<TokenResponse>>> {
    let uow = UnitOfWork::new(&state.db_pool).await?;
    let token = auth::login(uow.client(), &uow.employees, &payload, &state.jwt).await?;

    info!("Employee '{}' logged in", payload.name);

    Ok(Json(ApiResponse::ok(token)))
}
