//! Unit of work over the entity repositories
//!
//! One instance is built per request. It owns one repository per entity type
//! and a single pooled connection; `complete()` flushes all staged operations
//! inside one transaction. The connection returns to the pool when the unit
//! of work drops, whatever the request outcome.

use deadpool_postgres::Pool;
use tokio_postgres::Client;
use tracing::debug;

use crate::error::AppError;
use crate::models::{Department, DepartmentType, Employee};
use crate::repository::Repository;

/// Aggregator of repositories sharing one transactional commit
pub struct UnitOfWork {
    client: deadpool_postgres::Object,
    pub employees: Repository<Employee>,
    pub departments: Repository<Department>,
    pub department_types: Repository<DepartmentType>,
}

impl UnitOfWork {
    /// Acquire a pooled connection and fresh repositories for one request.
    pub async fn new(pool: &Pool) -> Result<Self, AppError> {
        let client = pool.get().await?;
        Ok(Self {
            client,
            employees: Repository::new(),
            departments: Repository::new(),
            department_types: Repository::new(),
        })
    }

    /// Connection used by repository reads within this unit of work.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Flush all staged operations atomically: either every staged
    /// create/edit/delete commits or none does. Staged work is drained, so a
    /// second call on the same instance commits nothing. Dropping the
    /// transaction on an error path rolls everything back.
    pub async fn complete(&mut self) -> Result<(), AppError> {
        let total = self.department_types.staged_len()
            + self.departments.staged_len()
            + self.employees.staged_len();
        if total == 0 {
            return Ok(());
        }

        let tx = self.client.transaction().await?;
        // Parents flush before children so staged inserts satisfy FK order
        self.department_types.flush(&tx).await?;
        self.departments.flush(&tx).await?;
        self.employees.flush(&tx).await?;
        tx.commit().await?;

        debug!("Unit of work committed {} staged operation(s)", total);
        Ok(())
    }
}
