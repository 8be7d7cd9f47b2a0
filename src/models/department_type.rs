//! Department type entity and DTOs

use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use validator::Validate;

use crate::repository::{Entity, Relation, SqlValue};

/// Department type entity
#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentType {
    pub id: i32,
    pub name: String,
}

impl Entity for DepartmentType {
    const NAME: &'static str = "DepartmentType";
    const TABLE: &'static str = "department_types";
    const ALIAS: &'static str = "t";
    const COLUMNS: &'static [&'static str] = &["name"];

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![SqlValue::Text(self.name.clone())]
    }

    fn relation(_name: &str) -> Option<Relation> {
        None
    }

    fn from_row(row: &Row, _related: &[&str]) -> Self {
        Self {
            id: row.get("id"),
            name: row.get("name"),
        }
    }
}

/// Wire-facing shape of a department type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentTypeDto {
    pub id: i32,
    pub name: String,
}

impl DepartmentTypeDto {
    pub fn from_entity(entity: &DepartmentType) -> Self {
        Self {
            id: entity.id,
            name: entity.name.clone(),
        }
    }

    pub fn to_entity(&self) -> DepartmentType {
        DepartmentType {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartmentTypeRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDepartmentTypeRequest {
    pub id: i32,
    pub name: Option<String>,
}

impl UpdateDepartmentTypeRequest {
    /// Overlay the supplied fields onto the stored entity
    pub fn apply(&self, entity: &mut DepartmentType) {
        if let Some(name) = &self.name {
            entity.name = name.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use validator::Validate;

    #[test]
    fn test_dto_round_trip() {
        let entity = DepartmentType {
            id: 4,
            name: "Engineering".to_string(),
        };
        let dto = DepartmentTypeDto::from_entity(&entity);
        assert_eq!(dto.to_entity(), entity);
    }

    #[test]
    fn test_create_request_rejects_empty_name() {
        let req = CreateDepartmentTypeRequest {
            name: String::new(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_applies_only_supplied_fields() {
        let mut entity = DepartmentType {
            id: 4,
            name: "Engineering".to_string(),
        };
        UpdateDepartmentTypeRequest { id: 4, name: None }.apply(&mut entity);
        assert_eq!(entity.name, "Engineering");

        UpdateDepartmentTypeRequest {
            id: 4,
            name: Some("Research".to_string()),
        }
        .apply(&mut entity);
        assert_eq!(entity.name, "Research");
    }
}
