//! Department entity and DTOs

use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use validator::Validate;

use crate::models::department_type::{DepartmentType, DepartmentTypeDto};
use crate::repository::{Entity, Relation, SqlValue};

/// Department entity
#[derive(Debug, Clone, PartialEq)]
pub struct Department {
    pub id: i32,
    pub name: String,
    pub department_type_id: i32,
    /// Populated when the "department_type" relation is eagerly loaded
    pub department_type: Option<DepartmentType>,
}

impl Entity for Department {
    const NAME: &'static str = "Department";
    const TABLE: &'static str = "departments";
    const ALIAS: &'static str = "d";
    const COLUMNS: &'static [&'static str] = &["name", "department_type_id"];

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(self.name.clone()),
            SqlValue::Int(self.department_type_id),
        ]
    }

    fn relation(name: &str) -> Option<Relation> {
        match name {
            "department_type" => Some(Relation {
                join: "LEFT JOIN department_types t ON t.id = d.department_type_id",
                columns: &["t.id AS t_id", "t.name AS t_name"],
            }),
            _ => None,
        }
    }

    fn from_row(row: &Row, related: &[&str]) -> Self {
        let department_type = if related.contains(&"department_type") {
            row.get::<_, Option<i32>>("t_id").map(|id| DepartmentType {
                id,
                name: row.get("t_name"),
            })
        } else {
            None
        };
        Self {
            id: row.get("id"),
            name: row.get("name"),
            department_type_id: row.get("department_type_id"),
            department_type,
        }
    }
}

/// Wire-facing shape of a department
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentDto {
    pub id: i32,
    pub name: String,
    pub department_type_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_type: Option<DepartmentTypeDto>,
}

impl DepartmentDto {
    pub fn from_entity(entity: &Department) -> Self {
        Self {
            id: entity.id,
            name: entity.name.clone(),
            department_type_id: entity.department_type_id,
            department_type: entity
                .department_type
                .as_ref()
                .map(DepartmentTypeDto::from_entity),
        }
    }

    /// Wire shape back to entity. Eager-loaded relations never travel back.
    pub fn to_entity(&self) -> Department {
        Department {
            id: self.id,
            name: self.name.clone(),
            department_type_id: self.department_type_id,
            department_type: None,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartmentRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(range(min = 1, message = "Department type reference is required"))]
    pub department_type_id: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDepartmentRequest {
    pub id: i32,
    pub name: Option<String>,
    pub department_type_id: Option<i32>,
}

impl UpdateDepartmentRequest {
    /// Overlay the supplied fields onto the stored entity
    pub fn apply(&self, entity: &mut Department) {
        if let Some(name) = &self.name {
            entity.name = name.clone();
        }
        if let Some(department_type_id) = self.department_type_id {
            entity.department_type_id = department_type_id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use validator::Validate;

    fn department() -> Department {
        Department {
            id: 2,
            name: "Platform".to_string(),
            department_type_id: 1,
            department_type: Some(DepartmentType {
                id: 1,
                name: "Engineering".to_string(),
            }),
        }
    }

    #[test]
    fn test_dto_maps_nested_relation() {
        let dto = DepartmentDto::from_entity(&department());
        assert_eq!(dto.department_type.as_ref().unwrap().name, "Engineering");
    }

    #[test]
    fn test_to_entity_drops_loaded_relation() {
        let entity = DepartmentDto::from_entity(&department()).to_entity();
        assert_eq!(entity.id, 2);
        assert_eq!(entity.department_type, None);
    }

    #[test]
    fn test_dto_omits_missing_relation_in_json() {
        let mut entity = department();
        entity.department_type = None;
        let json = serde_json::to_value(DepartmentDto::from_entity(&entity)).unwrap();
        assert!(json.get("departmentType").is_none());
        assert_eq!(json["departmentTypeId"], 1);
    }

    #[test]
    fn test_create_request_requires_type_reference() {
        let req = CreateDepartmentRequest {
            name: "Platform".to_string(),
            department_type_id: 0,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_applies_only_supplied_fields() {
        let mut entity = department();
        UpdateDepartmentRequest {
            id: 2,
            name: Some("Core Platform".to_string()),
            department_type_id: None,
        }
        .apply(&mut entity);
        assert_eq!(entity.name, "Core Platform");
        assert_eq!(entity.department_type_id, 1);
    }
}
