//! Production `RoleDirectory` backed by the Discord REST API.

use std::sync::Arc;

use async_trait::async_trait;

use rolesync_core::config::RoleTable;
use rolesync_core::gateway::RoleDirectory;
use rolesync_core::roles::RoleAssignment;
use rolesync_core::{Result as CoreResult, SyncError};

use crate::client::DiscordClient;

pub struct MemberRoleDirectory {
    client: Arc<DiscordClient>,
    guild_id: String,
    table: RoleTable,
}

impl MemberRoleDirectory {
    pub fn new(client: Arc<DiscordClient>, guild_id: impl Into<String>, table: RoleTable) -> Self {
        Self {
            client,
            guild_id: guild_id.into(),
            table,
        }
    }

    async fn grant(&self, discord_id: &str, role_id: &str) -> CoreResult<()> {
        self.client
            .add_guild_member_role(&self.guild_id, discord_id, role_id)
            .await
            .map_err(|e| SyncError::DirectoryApply {
                identity: discord_id.to_string(),
                message: e.to_string(),
            })
    }

    async fn revoke(&self, discord_id: &str, role_id: &str) -> CoreResult<()> {
        self.client
            .remove_guild_member_role(&self.guild_id, discord_id, role_id)
            .await
            .map_err(|e| SyncError::DirectoryApply {
                identity: discord_id.to_string(),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl RoleDirectory for MemberRoleDirectory {
    async fn assign_member_roles(
        &self,
        discord_id: &str,
        assignment: &RoleAssignment,
    ) -> CoreResult<()> {
        let cohort_role = self
            .table
            .cohort_role(assignment.cohort)
            .ok_or_else(|| SyncError::InvalidConfig(format!("no role id for {}", assignment.cohort)))?
            .to_string();
        let region_role = self
            .table
            .region_role(assignment.region)
            .ok_or_else(|| SyncError::InvalidConfig(format!("no role id for {}", assignment.region)))?
            .to_string();

        // Grant before revoke: a partial failure must never leave an identity
        // with no roles at all.
        self.grant(discord_id, &self.table.member).await?;
        self.grant(discord_id, &self.table.newcomer).await?;
        self.grant(discord_id, &cohort_role).await?;
        self.grant(discord_id, &region_role).await?;
        self.revoke(discord_id, &self.table.visitor).await?;
        Ok(())
    }

    async fn assign_student_role(&self, discord_id: &str) -> CoreResult<()> {
        self.grant(discord_id, &self.table.student).await
    }
}
