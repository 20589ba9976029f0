//! Named selection presets.
//!
//! A profile is a one-click cart initializer: a connection plan plus a fixed
//! set of add-ons, resolved against the catalog when applied. Profiles are
//! immutable reference data defined alongside the catalog.

use crate::catalog::{ItemKind, PlanCategory};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: PlanCategory,
    pub config: ProfileConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileConfig {
    pub plan_id: String,
    #[serde(default)]
    pub tv_id: Option<String>,
    #[serde(default)]
    pub app_ids: Vec<String>,
    #[serde(default)]
    pub mesh_id: Option<String>,
    #[serde(default)]
    pub backup_id: Option<String>,
}

impl ProfileConfig {
    /// Every catalog reference this config makes, for validation warnings.
    pub fn references(&self) -> Vec<(ItemKind, &str)> {
        let mut refs: Vec<(ItemKind, &str)> = vec![(ItemKind::Plan, self.plan_id.as_str())];
        if let Some(tv) = &self.tv_id {
            refs.push((ItemKind::Tv, tv));
        }
        for app in &self.app_ids {
            refs.push((ItemKind::App, app));
        }
        if let Some(mesh) = &self.mesh_id {
            refs.push((ItemKind::Mesh, mesh));
        }
        if let Some(backup) = &self.backup_id {
            refs.push((ItemKind::Backup, backup));
        }
        refs
    }
}
