//! Generic repository over the entity tables
//!
//! One parametrized component provides get/get_all/create/edit/delete for any
//! entity type. Reads go straight to the database; writes are staged in memory
//! and become durable only when the owning unit of work commits them inside a
//! transaction.

use tokio_postgres::types::ToSql;
use tokio_postgres::{GenericClient, Row, Transaction};
use tracing::debug;

use crate::error::{not_found_error, AppError};
use crate::models::Employee;

/// Owned SQL parameter value
///
/// Explicit per-type binding instead of boxed trait objects keeps staged
/// values inspectable and comparable in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Int(i32),
    Float(f64),
    Text(String),
}

impl SqlValue {
    pub fn as_sql(&self) -> &(dyn ToSql + Sync) {
        match self {
            SqlValue::Int(v) => v,
            SqlValue::Float(v) => v,
            SqlValue::Text(v) => v,
        }
    }
}

/// Equality filter on a single column of the entity's table
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: &'static str,
    pub value: SqlValue,
}

impl Filter {
    pub fn by_id(id: i32) -> Self {
        Self {
            column: "id",
            value: SqlValue::Int(id),
        }
    }

    pub fn eq(column: &'static str, value: SqlValue) -> Self {
        Self { column, value }
    }
}

/// Join spec for a named relation that can be eagerly loaded
#[derive(Debug, Clone)]
pub struct Relation {
    pub join: &'static str,
    pub columns: &'static [&'static str],
}

/// Persistence contract an entity type supplies to the generic repository
pub trait Entity: Clone + Send + Sync + 'static {
    /// Human-readable name used in error messages
    const NAME: &'static str;
    const TABLE: &'static str;
    /// Table alias used in generated SQL
    const ALIAS: &'static str;
    /// Columns excluding the primary key, in binding order
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> i32;
    fn set_id(&mut self, id: i32);

    /// Values for `COLUMNS`, in the same order
    fn values(&self) -> Vec<SqlValue>;

    /// Join spec for a named relation, if the entity has one
    fn relation(name: &str) -> Option<Relation>;

    fn from_row(row: &Row, related: &[&str]) -> Self;
}

/// A staged write, applied at commit time
#[derive(Debug, Clone)]
pub enum Staged<T> {
    Insert(T),
    Update(T),
    Delete(i32),
}

/// Handle to a staged create/edit, resolvable after commit
#[derive(Debug, Clone, Copy)]
pub struct Pending(usize);

/// Generic CRUD accessor for one entity type
pub struct Repository<T: Entity> {
    staged: Vec<Staged<T>>,
    committed: Vec<Staged<T>>,
}

impl<T: Entity> Repository<T> {
    pub fn new() -> Self {
        Self {
            staged: Vec::new(),
            committed: Vec::new(),
        }
    }

    /// Fetch a single row matching the filter, eagerly loading the named
    /// relations. A missing row surfaces as `NotFound`.
    pub async fn get(
        &self,
        client: &impl GenericClient,
        filter: Filter,
        related: &[&str],
    ) -> Result<T, AppError> {
        let sql = select_sql::<T>(Some(&filter), related, "")?;
        let row = client
            .query_opt(sql.as_str(), &[filter.value.as_sql()])
            .await?
            .ok_or_else(|| not_found_error(format!("{} not found", T::NAME)))?;
        Ok(T::from_row(&row, related))
    }

    /// Fetch all rows ordered by id, eagerly loading the named relations.
    pub async fn get_all(
        &self,
        client: &impl GenericClient,
        related: &[&str],
    ) -> Result<Vec<T>, AppError> {
        let sql = select_sql::<T>(None, related, &format!("ORDER BY {}.id", T::ALIAS))?;
        let rows = client.query(sql.as_str(), &[]).await?;
        Ok(rows.iter().map(|r| T::from_row(r, related)).collect())
    }

    /// Stage an insert. The generated id is populated at commit; the committed
    /// entity is retrievable through the returned handle.
    pub fn create(&mut self, entity: T) -> Pending {
        self.staged.push(Staged::Insert(entity));
        Pending(self.committed.len() + self.staged.len() - 1)
    }

    /// Stage an update by primary key. Updating a missing row surfaces as
    /// `NotFound` at commit time.
    pub fn edit(&mut self, entity: T) -> Pending {
        self.staged.push(Staged::Update(entity));
        Pending(self.committed.len() + self.staged.len() - 1)
    }

    /// Stage a removal by primary key.
    pub fn delete(&mut self, entity: &T) {
        self.staged.push(Staged::Delete(entity.id()));
    }

    /// Number of operations staged and not yet committed
    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }

    /// Committed entity behind a create/edit handle. `None` before commit.
    pub fn resolve(&self, pending: &Pending) -> Option<T> {
        match self.committed.get(pending.0) {
            Some(Staged::Insert(e)) | Some(Staged::Update(e)) => Some(e.clone()),
            _ => None,
        }
    }

    /// Apply every staged operation inside the commit transaction, in staging
    /// order, moving them into the committed list.
    pub(crate) async fn flush(&mut self, tx: &Transaction<'_>) -> Result<(), AppError> {
        let ops: Vec<Staged<T>> = self.staged.drain(..).collect();
        for mut op in ops {
            match &mut op {
                Staged::Insert(entity) => {
                    let sql = insert_sql::<T>();
                    let values = entity.values();
                    let params: Vec<&(dyn ToSql + Sync)> =
                        values.iter().map(SqlValue::as_sql).collect();
                    let row = tx.query_one(sql.as_str(), &params).await.map_err(commit_error)?;
                    entity.set_id(row.get(0));
                    debug!("Inserted {} with id {}", T::NAME, entity.id());
                }
                Staged::Update(entity) => {
                    let sql = update_sql::<T>();
                    let values = entity.values();
                    let id = entity.id();
                    let mut params: Vec<&(dyn ToSql + Sync)> =
                        values.iter().map(SqlValue::as_sql).collect();
                    params.push(&id);
                    let updated = tx.execute(sql.as_str(), &params).await.map_err(commit_error)?;
                    if updated == 0 {
                        return Err(AppError::NotFound(format!(
                            "{} with id {} not found",
                            T::NAME,
                            id
                        )));
                    }
                }
                Staged::Delete(id) => {
                    let sql = delete_sql::<T>();
                    tx.execute(sql.as_str(), &[id]).await.map_err(commit_error)?;
                }
            }
            self.committed.push(op);
        }
        Ok(())
    }
}

impl<T: Entity> Default for Repository<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Employee-specific queries layered on the generic repository
impl Repository<Employee> {
    /// Fetch a single employee by exact name.
    pub async fn get_by_name(
        &self,
        client: &impl GenericClient,
        name: &str,
        related: &[&str],
    ) -> Result<Employee, AppError> {
        self.get(
            client,
            Filter::eq("name", SqlValue::Text(name.to_string())),
            related,
        )
        .await
    }

    /// Employee with the maximum salary. Ties resolve to the first row of the
    /// descending sort, with id as the stable secondary order.
    pub async fn get_top_salary(
        &self,
        client: &impl GenericClient,
        related: &[&str],
    ) -> Result<Employee, AppError> {
        let suffix = format!(
            "ORDER BY {a}.salary DESC, {a}.id LIMIT 1",
            a = Employee::ALIAS
        );
        let sql = select_sql::<Employee>(None, related, &suffix)?;
        let row = client
            .query_opt(sql.as_str(), &[])
            .await?
            .ok_or_else(|| not_found_error("No employees exist"))?;
        Ok(Employee::from_row(&row, related))
    }
}

fn select_sql<T: Entity>(
    filter: Option<&Filter>,
    related: &[&str],
    suffix: &str,
) -> Result<String, AppError> {
    let mut columns: Vec<String> = vec![format!("{}.id", T::ALIAS)];
    columns.extend(T::COLUMNS.iter().map(|c| format!("{}.{}", T::ALIAS, c)));

    let mut joins = String::new();
    for name in related {
        let rel = T::relation(name).ok_or_else(|| {
            AppError::Internal(format!("Unknown relation '{}' for {}", name, T::NAME))
        })?;
        columns.extend(rel.columns.iter().map(|c| (*c).to_string()));
        joins.push(' ');
        joins.push_str(rel.join);
    }

    let mut sql = format!(
        "SELECT {} FROM {} {}{}",
        columns.join(", "),
        T::TABLE,
        T::ALIAS,
        joins
    );
    if let Some(f) = filter {
        sql.push_str(&format!(" WHERE {}.{} = $1", T::ALIAS, f.column));
    }
    if !suffix.is_empty() {
        sql.push(' ');
        sql.push_str(suffix);
    }
    Ok(sql)
}

fn insert_sql<T: Entity>() -> String {
    let placeholders: Vec<String> = (1..=T::COLUMNS.len()).map(|i| format!("${}", i)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING id",
        T::TABLE,
        T::COLUMNS.join(", "),
        placeholders.join(", ")
    )
}

fn update_sql<T: Entity>() -> String {
    let sets: Vec<String> = T::COLUMNS
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{} = ${}", c, i + 1))
        .collect();
    format!(
        "UPDATE {} SET {} WHERE id = ${}",
        T::TABLE,
        sets.join(", "),
        T::COLUMNS.len() + 1
    )
}

fn delete_sql<T: Entity>() -> String {
    format!("DELETE FROM {} WHERE id = $1", T::TABLE)
}

/// Translate a database error raised at commit time. Constraint violations
/// (foreign key, unique, not-null, check) get their own kind.
fn commit_error(e: tokio_postgres::Error) -> AppError {
    use tokio_postgres::error::SqlState;

    if let Some(db) = e.as_db_error() {
        let code = db.code();
        if *code == SqlState::FOREIGN_KEY_VIOLATION
            || *code == SqlState::UNIQUE_VIOLATION
            || *code == SqlState::NOT_NULL_VIOLATION
            || *code == SqlState::CHECK_VIOLATION
        {
            return AppError::Constraint(db.message().to_string());
        }
    }
    AppError::Database(e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Department, DepartmentType};
    use pretty_assertions::assert_eq;

    fn employee(id: i32, name: &str, salary: f64) -> Employee {
        Employee {
            id,
            name: name.to_string(),
            salary,
            department_id: 1,
            password_hash: "hash".to_string(),
            department: None,
        }
    }

    #[test]
    fn test_select_sql_plain() {
        let sql = select_sql::<DepartmentType>(None, &[], "ORDER BY t.id").unwrap();
        assert_eq!(
            sql,
            "SELECT t.id, t.name FROM department_types t ORDER BY t.id"
        );
    }

    #[test]
    fn test_select_sql_with_filter_and_relation() {
        let sql = select_sql::<Employee>(Some(&Filter::by_id(7)), &["department"], "").unwrap();
        assert_eq!(
            sql,
            "SELECT e.id, e.name, e.salary, e.department_id, e.password_hash, \
             d.id AS d_id, d.name AS d_name, d.department_type_id AS d_department_type_id \
             FROM employees e LEFT JOIN departments d ON d.id = e.department_id \
             WHERE e.id = $1"
        );
    }

    #[test]
    fn test_select_sql_unknown_relation() {
        let err = select_sql::<Department>(None, &["payroll"], "").unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn test_insert_sql_returns_generated_id() {
        assert_eq!(
            insert_sql::<Department>(),
            "INSERT INTO departments (name, department_type_id) VALUES ($1, $2) RETURNING id"
        );
    }

    #[test]
    fn test_update_sql_binds_id_last() {
        assert_eq!(
            update_sql::<Employee>(),
            "UPDATE employees SET name = $1, salary = $2, department_id = $3, \
             password_hash = $4 WHERE id = $5"
        );
    }

    #[test]
    fn test_delete_sql() {
        assert_eq!(
            delete_sql::<DepartmentType>(),
            "DELETE FROM department_types WHERE id = $1"
        );
    }

    #[test]
    fn test_staging_is_buffered_only() {
        let mut repo: Repository<Employee> = Repository::new();
        assert_eq!(repo.staged_len(), 0);

        let pending = repo.create(employee(0, "Ada", 100.0));
        repo.edit(employee(3, "Grace", 120.0));
        repo.delete(&employee(5, "Alan", 90.0));

        assert_eq!(repo.staged_len(), 3);
        // Nothing is resolvable before the unit of work commits
        assert!(repo.resolve(&pending).is_none());
    }

    #[test]
    fn test_staged_values_in_binding_order() {
        let emp = employee(0, "Ada", 100.0);
        assert_eq!(
            emp.values(),
            vec![
                SqlValue::Text("Ada".to_string()),
                SqlValue::Float(100.0),
                SqlValue::Int(1),
                SqlValue::Text("hash".to_string()),
            ]
        );
    }
}
