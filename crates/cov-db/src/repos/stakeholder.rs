//! Stakeholder groups and the group → TOR → test case link chain.

use cov_core::entities::{StakeholderGroup, TorTestCaseLink};
use cov_core::ids::{PREFIX_GROUP, RecordId};

use crate::error::DatabaseError;
use crate::helpers::get_id;
use crate::service::CovService;

pub(crate) async fn insert_group(
    conn: &libsql::Connection,
    group: &StakeholderGroup,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO stakeholder_groups (id, name) VALUES (?1, ?2)",
        libsql::params![group.id.as_str(), group.name.as_str()],
    )
    .await?;
    Ok(())
}

pub(crate) async fn insert_group_tor(
    conn: &libsql::Connection,
    group_id: &RecordId,
    tor_id: &RecordId,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT OR IGNORE INTO group_tors (group_id, tor_id) VALUES (?1, ?2)",
        libsql::params![group_id.as_str(), tor_id.as_str()],
    )
    .await?;
    Ok(())
}

pub(crate) async fn insert_tor_test_case(
    conn: &libsql::Connection,
    link: &TorTestCaseLink,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT OR IGNORE INTO tor_test_cases (tor_id, test_case_id) VALUES (?1, ?2)",
        libsql::params![link.tor_id.as_str(), link.test_case_id.as_str()],
    )
    .await?;
    Ok(())
}

impl CovService {
    pub async fn create_group(&self, name: &str) -> Result<StakeholderGroup, DatabaseError> {
        let group = StakeholderGroup {
            id: RecordId::new(self.db().generate_id(PREFIX_GROUP).await?),
            name: name.to_string(),
        };
        insert_group(self.db().conn(), &group).await?;
        Ok(group)
    }

    pub async fn link_group_tor(
        &self,
        group_id: &RecordId,
        tor_id: &RecordId,
    ) -> Result<(), DatabaseError> {
        insert_group_tor(self.db().conn(), group_id, tor_id).await
    }

    /// Attach a test case (an objective) to a TOR.
    pub async fn link_tor_test_case(
        &self,
        tor_id: &RecordId,
        test_case_id: &RecordId,
    ) -> Result<(), DatabaseError> {
        let link = TorTestCaseLink {
            tor_id: tor_id.clone(),
            test_case_id: test_case_id.clone(),
        };
        insert_tor_test_case(self.db().conn(), &link).await
    }

    pub async fn list_groups(&self) -> Result<Vec<StakeholderGroup>, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(
                "SELECT id, name FROM stakeholder_groups ORDER BY name, id",
                || libsql::params::Params::None,
            )
            .await?;
        let mut groups = Vec::new();
        while let Some(row) = rows.next().await? {
            groups.push(StakeholderGroup {
                id: get_id(&row, 0)?,
                name: row.get::<String>(1)?,
            });
        }
        Ok(groups)
    }
}
