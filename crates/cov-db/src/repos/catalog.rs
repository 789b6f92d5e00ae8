//! Companies, modules and TORs.

use cov_core::entities::{Company, Module, Tor};
use cov_core::ids::{PREFIX_COMPANY, PREFIX_MODULE, PREFIX_TOR, RecordId};

use crate::error::DatabaseError;
use crate::helpers::get_id;
use crate::service::CovService;

pub(crate) async fn insert_company(
    conn: &libsql::Connection,
    company: &Company,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO companies (id, name) VALUES (?1, ?2)",
        libsql::params![company.id.as_str(), company.name.as_str()],
    )
    .await?;
    Ok(())
}

pub(crate) async fn insert_module(
    conn: &libsql::Connection,
    module: &Module,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO modules (id, code, name) VALUES (?1, ?2, ?3)",
        libsql::params![module.id.as_str(), module.code.as_str(), module.name.as_str()],
    )
    .await?;
    Ok(())
}

pub(crate) async fn insert_tor(conn: &libsql::Connection, tor: &Tor) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO tors (id, code, title, module_id) VALUES (?1, ?2, ?3, ?4)",
        libsql::params![
            tor.id.as_str(),
            tor.code.as_str(),
            tor.title.as_str(),
            tor.module_id.as_str()
        ],
    )
    .await?;
    Ok(())
}

fn row_to_company(row: &libsql::Row) -> Result<Company, DatabaseError> {
    Ok(Company {
        id: get_id(row, 0)?,
        name: row.get::<String>(1)?,
    })
}

fn row_to_module(row: &libsql::Row) -> Result<Module, DatabaseError> {
    Ok(Module {
        id: get_id(row, 0)?,
        code: row.get::<String>(1)?,
        name: row.get::<String>(2)?,
    })
}

fn row_to_tor(row: &libsql::Row) -> Result<Tor, DatabaseError> {
    Ok(Tor {
        id: get_id(row, 0)?,
        code: row.get::<String>(1)?,
        title: row.get::<String>(2)?,
        module_id: get_id(row, 3)?,
    })
}

impl CovService {
    pub async fn create_company(&self, name: &str) -> Result<Company, DatabaseError> {
        let company = Company {
            id: RecordId::new(self.db().generate_id(PREFIX_COMPANY).await?),
            name: name.to_string(),
        };
        insert_company(self.db().conn(), &company).await?;
        Ok(company)
    }

    pub async fn create_module(&self, code: &str, name: &str) -> Result<Module, DatabaseError> {
        let module = Module {
            id: RecordId::new(self.db().generate_id(PREFIX_MODULE).await?),
            code: code.to_string(),
            name: name.to_string(),
        };
        insert_module(self.db().conn(), &module).await?;
        Ok(module)
    }

    pub async fn create_tor(
        &self,
        code: &str,
        title: &str,
        module_id: &RecordId,
    ) -> Result<Tor, DatabaseError> {
        let tor = Tor {
            id: RecordId::new(self.db().generate_id(PREFIX_TOR).await?),
            code: code.to_string(),
            title: title.to_string(),
            module_id: module_id.clone(),
        };
        insert_tor(self.db().conn(), &tor).await?;
        Ok(tor)
    }

    pub async fn list_companies(&self) -> Result<Vec<Company>, DatabaseError> {
        let mut rows = self
            .db()
            .query_with("SELECT id, name FROM companies ORDER BY name, id", || {
                libsql::params::Params::None
            })
            .await?;
        let mut companies = Vec::new();
        while let Some(row) = rows.next().await? {
            companies.push(row_to_company(&row)?);
        }
        Ok(companies)
    }

    pub async fn list_modules(&self) -> Result<Vec<Module>, DatabaseError> {
        let mut rows = self
            .db()
            .query_with("SELECT id, code, name FROM modules ORDER BY code", || {
                libsql::params::Params::None
            })
            .await?;
        let mut modules = Vec::new();
        while let Some(row) = rows.next().await? {
            modules.push(row_to_module(&row)?);
        }
        Ok(modules)
    }

    pub async fn list_tors(&self) -> Result<Vec<Tor>, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(
                "SELECT id, code, title, module_id FROM tors ORDER BY code, id",
                || libsql::params::Params::None,
            )
            .await?;
        let mut tors = Vec::new();
        while let Some(row) = rows.next().await? {
            tors.push(row_to_tor(&row)?);
        }
        Ok(tors)
    }
}
