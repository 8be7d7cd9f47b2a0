//! Employee entity and DTOs

use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use validator::Validate;

use crate::models::department::{Department, DepartmentDto};
use crate::repository::{Entity, Relation, SqlValue};

/// Employee entity
#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    pub id: i32,
    pub name: String,
    pub salary: f64,
    pub department_id: i32,
    /// bcrypt hash of the login secret; never serialized
    pub password_hash: String,
    /// Populated when the "department" relation is eagerly loaded
    pub department: Option<Department>,
}

impl Entity for Employee {
    const NAME: &'static str = "Employee";
    const TABLE: &'static str = "employees";
    const ALIAS: &'static str = "e";
    const COLUMNS: &'static [&'static str] = &["name", "salary", "department_id", "password_hash"];

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(self.name.clone()),
            SqlValue::Float(self.salary),
            SqlValue::Int(self.department_id),
            SqlValue::Text(self.password_hash.clone()),
        ]
    }

    fn relation(name: &str) -> Option<Relation> {
        match name {
            "department" => Some(Relation {
                join: "LEFT JOIN departments d ON d.id = e.department_id",
                columns: &[
                    "d.id AS d_id",
                    "d.name AS d_name",
                    "d.department_type_id AS d_department_type_id",
                ],
            }),
            _ => None,
        }
    }

    fn from_row(row: &Row, related: &[&str]) -> Self {
        let department = if related.contains(&"department") {
            row.get::<_, Option<i32>>("d_id").map(|id| Department {
                id,
                name: row.get("d_name"),
                department_type_id: row.get("d_department_type_id"),
                department_type: None,
            })
        } else {
            None
        };
        Self {
            id: row.get("id"),
            name: row.get("name"),
            salary: row.get("salary"),
            department_id: row.get("department_id"),
            password_hash: row.get("password_hash"),
            department,
        }
    }
}

/// Wire-facing shape of an employee. The password hash stays server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDto {
    pub id: i32,
    pub name: String,
    pub salary: f64,
    pub department_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<DepartmentDto>,
}

impl EmployeeDto {
    pub fn from_entity(entity: &Employee) -> Self {
        Self {
            id: entity.id,
            name: entity.name.clone(),
            salary: entity.salary,
            department_id: entity.department_id,
            department: entity.department.as_ref().map(DepartmentDto::from_entity),
        }
    }

    /// Wire shape back to entity. The hash never travels in the DTO, so it is
    /// empty until the stored row is loaded.
    pub fn to_entity(&self) -> Employee {
        Employee {
            id: self.id,
            name: self.name.clone(),
            salary: self.salary,
            department_id: self.department_id,
            password_hash: String::new(),
            department: None,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(range(min = 0.0, message = "Salary must not be negative"))]
    pub salary: f64,
    #[validate(range(min = 1, message = "Department reference is required"))]
    pub department_id: i32,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeRequest {
    pub id: i32,
    pub name: Option<String>,
    pub salary: Option<f64>,
    pub department_id: Option<i32>,
}

impl UpdateEmployeeRequest {
    /// Overlay the supplied fields onto the stored entity
    pub fn apply(&self, entity: &mut Employee) {
        if let Some(name) = &self.name {
            entity.name = name.clone();
        }
        if let Some(salary) = self.salary {
            entity.salary = salary;
        }
        if let Some(department_id) = self.department_id {
            entity.department_id = department_id;
        }
    }
}

/// Login credentials for an employee
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use validator::Validate;

    fn employee() -> Employee {
        Employee {
            id: 9,
            name: "Ada".to_string(),
            salary: 4200.0,
            department_id: 2,
            password_hash: "$2b$12$abcdefghijklmnopqrstuv".to_string(),
            department: Some(Department {
                id: 2,
                name: "Platform".to_string(),
                department_type_id: 1,
                department_type: None,
            }),
        }
    }

    #[test]
    fn test_dto_carries_all_wire_fields() {
        let dto = EmployeeDto::from_entity(&employee());
        assert_eq!(dto.id, 9);
        assert_eq!(dto.name, "Ada");
        assert_eq!(dto.salary, 4200.0);
        assert_eq!(dto.department_id, 2);
        assert_eq!(dto.department.as_ref().unwrap().name, "Platform");
    }

    #[test]
    fn test_dto_never_exposes_password_hash() {
        let json = serde_json::to_value(EmployeeDto::from_entity(&employee())).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_to_entity_keeps_primary_key() {
        let entity = EmployeeDto::from_entity(&employee()).to_entity();
        assert_eq!(entity.id, 9);
        assert_eq!(entity.password_hash, "");
        assert_eq!(entity.department, None);
    }

    #[test]
    fn test_update_applies_only_supplied_fields() {
        let mut entity = employee();
        UpdateEmployeeRequest {
            id: 9,
            name: None,
            salary: Some(5000.0),
            department_id: None,
        }
        .apply(&mut entity);
        assert_eq!(entity.name, "Ada");
        assert_eq!(entity.salary, 5000.0);
        assert_eq!(entity.department_id, 2);
    }

    #[test]
    fn test_create_request_validation() {
        let ok = CreateEmployeeRequest {
            name: "Ada".to_string(),
            salary: 4200.0,
            department_id: 2,
            password: "correct horse".to_string(),
        };
        assert!(ok.validate().is_ok());

        let negative_salary = CreateEmployeeRequest {
            name: "Ada".to_string(),
            salary: -1.0,
            department_id: 2,
            password: "correct horse".to_string(),
        };
        assert!(negative_salary.validate().is_err());

        let short_password = CreateEmployeeRequest {
            name: "Ada".to_string(),
            salary: 4200.0,
            department_id: 2,
            password: "short".to_string(),
        };
        assert!(short_password.validate().is_err());
    }
}
