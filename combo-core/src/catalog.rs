//! Product catalog schema and lookups.
//!
//! The catalog is the fixed set of purchasable items (connection plans, TV
//! bundles, streaming apps, mesh Wi-Fi points, battery backup) plus the
//! one-click selection profiles. It is pure reference data: parsed from TOML,
//! validated once at startup, never mutated.

use crate::errors::{ComboError, Result};
use crate::profile::Profile;
use anyhow::{anyhow, Context};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Top-level customer segment. The labels are part of the order-message
/// contract and therefore Portuguese.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanCategory {
    Residential,
    Business,
}

impl PlanCategory {
    pub fn label(&self) -> &'static str {
        match self {
            PlanCategory::Residential => "casa",
            PlanCategory::Business => "empresa",
        }
    }
}

/// Pricing/selection bucket for streaming apps. `SkyFull` is a hard
/// carve-out: it is already sold at a fixed preferential rate and never
/// receives the combo discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppTier {
    Standard,
    Advanced,
    Top,
    Premium,
    SkyFull,
}

impl AppTier {
    pub fn label(&self) -> &'static str {
        match self {
            AppTier::Standard => "Standard",
            AppTier::Advanced => "Advanced",
            AppTier::Top => "Top",
            AppTier::Premium => "Premium",
            AppTier::SkyFull => "Sky Full",
        }
    }
}

/// Discriminant shared by line items, errors and removal intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Plan,
    Tv,
    App,
    Mesh,
    Backup,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ItemKind::Plan => "connection plan",
            ItemKind::Tv => "TV bundle",
            ItemKind::App => "app",
            ItemKind::Mesh => "mesh add-on",
            ItemKind::Backup => "backup power",
        };
        write!(f, "{}", label)
    }
}

/// 3-month introductory offer attached to some connection plans. Presence of
/// this struct is what makes a plan "introductory": the plan's own line then
/// contributes `price` to the introductory total and `base_price` to the
/// steady total.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IntroOffer {
    pub price: Decimal,
    /// Explanatory suffix shown next to the introductory price, e.g.
    /// "Nos primeiros 3 meses, após R$114,90".
    pub note: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionPlan {
    pub id: String,
    pub name: String,
    pub details: String,
    #[serde(default)]
    pub features: Vec<String>,
    pub category: PlanCategory,
    /// Steady-state monthly price.
    pub base_price: Decimal,
    #[serde(default)]
    pub intro: Option<IntroOffer>,
    /// Whether selecting this plan unlocks combo pricing for TV and apps.
    #[serde(default)]
    pub enables_combo_discount: bool,
    #[serde(default)]
    pub best_offer: bool,
    /// Next-tier-up plan used for the upgrade nudge. Entry-tier plans point
    /// at a combo-enabled plan of the same category.
    #[serde(default)]
    pub upgrade_to: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TvBundle {
    pub id: String,
    pub name: String,
    pub details: String,
    pub base_price: Decimal,
    pub combo_price: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppOffer {
    pub id: String,
    pub name: String,
    pub tier: AppTier,
    /// Display grouping only; plays no part in pricing.
    pub category: String,
    pub details: String,
    pub base_price: Decimal,
    pub combo_price: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeshAddon {
    pub id: String,
    pub name: String,
    pub details: String,
    pub base_price: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackupPower {
    pub id: String,
    pub name: String,
    pub details: String,
    pub base_price: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    pub schema_version: u32,

    #[serde(default)]
    pub plans: Vec<ConnectionPlan>,

    #[serde(default, rename = "tv")]
    pub tv_bundles: Vec<TvBundle>,

    #[serde(default)]
    pub apps: Vec<AppOffer>,

    #[serde(default, rename = "mesh")]
    pub mesh_addons: Vec<MeshAddon>,

    #[serde(default, rename = "backup")]
    pub backup_addons: Vec<BackupPower>,

    #[serde(default)]
    pub profiles: Vec<Profile>,
}

impl Catalog {
    pub fn plan(&self, id: &str) -> Option<&ConnectionPlan> {
        self.plans.iter().find(|p| p.id == id)
    }

    pub fn tv(&self, id: &str) -> Option<&TvBundle> {
        self.tv_bundles.iter().find(|t| t.id == id)
    }

    pub fn app(&self, id: &str) -> Option<&AppOffer> {
        self.apps.iter().find(|a| a.id == id)
    }

    pub fn mesh(&self, id: &str) -> Option<&MeshAddon> {
        self.mesh_addons.iter().find(|m| m.id == id)
    }

    pub fn backup(&self, id: &str) -> Option<&BackupPower> {
        self.backup_addons.iter().find(|b| b.id == id)
    }

    pub fn profile(&self, id: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    /// Connection plans for one customer segment, in declaration order.
    pub fn plans_in(&self, category: PlanCategory) -> Vec<&ConnectionPlan> {
        self.plans
            .iter()
            .filter(|p| p.category == category)
            .collect()
    }

    /// Selection profiles for one customer segment, in declaration order.
    pub fn profiles_in(&self, category: PlanCategory) -> Vec<&Profile> {
        self.profiles
            .iter()
            .filter(|p| p.category == category)
            .collect()
    }

    pub fn require_plan(&self, id: &str) -> Result<&ConnectionPlan> {
        self.plan(id).ok_or_else(|| unknown(ItemKind::Plan, id))
    }

    pub fn require_tv(&self, id: &str) -> Result<&TvBundle> {
        self.tv(id).ok_or_else(|| unknown(ItemKind::Tv, id))
    }

    pub fn require_app(&self, id: &str) -> Result<&AppOffer> {
        self.app(id).ok_or_else(|| unknown(ItemKind::App, id))
    }

    pub fn require_mesh(&self, id: &str) -> Result<&MeshAddon> {
        self.mesh(id).ok_or_else(|| unknown(ItemKind::Mesh, id))
    }

    pub fn require_backup(&self, id: &str) -> Result<&BackupPower> {
        self.backup(id).ok_or_else(|| unknown(ItemKind::Backup, id))
    }

    pub fn validate(&self) -> Result<()> {
        if self.schema_version == 0 {
            return Err(anyhow!("schema_version must be >= 1"));
        }

        let mut ids: HashSet<&str> = HashSet::new();

        for plan in &self.plans {
            check_id(&mut ids, &plan.id)?;
            validate_price("base_price", &plan.id, plan.base_price)?;
            if let Some(intro) = &plan.intro {
                validate_price("intro.price", &plan.id, intro.price)?;
                if intro.price > plan.base_price {
                    return Err(anyhow!(
                        "plan {} intro price {} exceeds base price {}",
                        plan.id,
                        intro.price,
                        plan.base_price
                    ));
                }
                if intro.note.trim().is_empty() {
                    return Err(anyhow!("plan {} has an intro offer without a note", plan.id));
                }
            }
        }

        for tv in &self.tv_bundles {
            check_id(&mut ids, &tv.id)?;
            validate_price("base_price", &tv.id, tv.base_price)?;
            validate_combo_price(&tv.id, tv.base_price, tv.combo_price)?;
        }

        for app in &self.apps {
            check_id(&mut ids, &app.id)?;
            validate_price("base_price", &app.id, app.base_price)?;
            validate_combo_price(&app.id, app.base_price, app.combo_price)?;
        }

        for mesh in &self.mesh_addons {
            check_id(&mut ids, &mesh.id)?;
            validate_price("base_price", &mesh.id, mesh.base_price)?;
        }

        for backup in &self.backup_addons {
            check_id(&mut ids, &backup.id)?;
            validate_price("base_price", &backup.id, backup.base_price)?;
        }

        for profile in &self.profiles {
            check_id(&mut ids, &profile.id)?;
        }

        // Upgrade targets must exist, differ from the source, share its
        // category, and actually unlock combo pricing.
        for plan in &self.plans {
            let Some(target_id) = &plan.upgrade_to else {
                continue;
            };
            if target_id == &plan.id {
                return Err(anyhow!("plan {} lists itself as upgrade target", plan.id));
            }
            let Some(target) = self.plan(target_id) else {
                return Err(anyhow!(
                    "plan {} upgrade target {} does not exist",
                    plan.id,
                    target_id
                ));
            };
            if target.category != plan.category {
                return Err(anyhow!(
                    "plan {} upgrade target {} belongs to a different category",
                    plan.id,
                    target_id
                ));
            }
            if !target.enables_combo_discount {
                return Err(anyhow!(
                    "plan {} upgrade target {} does not enable the combo discount",
                    plan.id,
                    target_id
                ));
            }
        }

        // Stale profile references are tolerated (a profile naming a retired
        // item silently omits it at apply time), but worth a warning.
        for profile in &self.profiles {
            for (kind, id) in profile.config.references() {
                if !self.id_exists(kind, id) {
                    log::warn!(
                        "profile {} references unknown {} id {}",
                        profile.id,
                        kind,
                        id
                    );
                }
            }
        }

        Ok(())
    }

    fn id_exists(&self, kind: ItemKind, id: &str) -> bool {
        match kind {
            ItemKind::Plan => self.plan(id).is_some(),
            ItemKind::Tv => self.tv(id).is_some(),
            ItemKind::App => self.app(id).is_some(),
            ItemKind::Mesh => self.mesh(id).is_some(),
            ItemKind::Backup => self.backup(id).is_some(),
        }
    }
}

fn check_id<'a>(ids: &mut HashSet<&'a str>, id: &'a str) -> Result<()> {
    if !ids.insert(id) {
        return Err(anyhow!("duplicate catalog id: {}", id));
    }
    Ok(())
}

fn unknown(kind: ItemKind, id: &str) -> anyhow::Error {
    ComboError::UnknownItem {
        kind,
        id: id.to_string(),
    }
    .into()
}

fn validate_price(field: &str, id: &str, price: Decimal) -> Result<()> {
    if price.is_sign_negative() {
        return Err(anyhow!("{} of {} must be >= 0, got {}", field, id, price));
    }
    Ok(())
}

fn validate_combo_price(id: &str, base: Decimal, combo: Decimal) -> Result<()> {
    validate_price("combo_price", id, combo)?;
    if combo > base {
        return Err(anyhow!(
            "combo price {} of {} exceeds base price {}",
            combo,
            id,
            base
        ));
    }
    Ok(())
}

pub fn parse_catalog_toml(toml_str: &str) -> Result<Catalog> {
    let catalog: Catalog =
        toml::from_str(toml_str).context("failed to parse product catalog")?;
    catalog.validate()?;
    Ok(catalog)
}

static BUILTIN: Lazy<Catalog> = Lazy::new(|| {
    let doc = include_str!("../data/products.toml");
    parse_catalog_toml(doc).expect("built-in product catalog must be valid")
});

/// The catalog shipped with the binary.
pub fn builtin() -> &'static Catalog {
    &BUILTIN
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_doc() -> String {
        r#"
schema_version = 1

[[plans]]
id = "res-basic"
name = "Basic"
details = "Entry plan"
category = "residential"
base_price = "99.90"
upgrade_to = "res-turbo"

[[plans]]
id = "res-turbo"
name = "Turbo"
details = "Fast plan"
category = "residential"
base_price = "114.90"
intro = { price = "89.90", note = "Nos primeiros 3 meses" }
enables_combo_discount = true

[[tv]]
id = "tv-mini"
name = "Mini"
details = "10 canais"
base_price = "15.00"
combo_price = "10.00"

[[apps]]
id = "app-music"
name = "Music"
tier = "standard"
category = "Música"
details = "Streaming de música"
base_price = "20"
combo_price = "10"

[[mesh]]
id = "mesh-6"
name = "Mesh 6"
details = "Ponto adicional"
base_price = "32.00"

[[backup]]
id = "nobreak"
name = "Mini NoBreak"
details = "Aluguel do equipamento"
base_price = "18.00"

[[profiles]]
id = "profile-music"
name = "Combo MUSIC"
description = "Música o dia todo"
category = "residential"
config = { plan_id = "res-turbo", app_ids = ["app-music"] }
"#
        .to_string()
    }

    #[test]
    fn minimal_catalog_validates() {
        let catalog = parse_catalog_toml(&minimal_doc()).unwrap();
        assert_eq!(catalog.schema_version, 1);
        assert_eq!(catalog.plans_in(PlanCategory::Residential).len(), 2);
        assert!(catalog.plan("res-turbo").unwrap().enables_combo_discount);
        assert_eq!(
            catalog.plan("res-basic").unwrap().upgrade_to.as_deref(),
            Some("res-turbo")
        );
    }

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = builtin();
        assert!(catalog.schema_version >= 1);
        assert!(!catalog.plans_in(PlanCategory::Residential).is_empty());
        assert!(!catalog.plans_in(PlanCategory::Business).is_empty());
        assert!(!catalog.apps.is_empty());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let doc = minimal_doc().replace("id = \"tv-mini\"", "id = \"app-music\"");
        let err = parse_catalog_toml(&doc).unwrap_err().to_string();
        assert!(err.contains("duplicate catalog id"));
    }

    #[test]
    fn rejects_combo_price_above_base() {
        let doc = minimal_doc().replace("combo_price = \"10.00\"", "combo_price = \"16.00\"");
        let err = parse_catalog_toml(&doc).unwrap_err().to_string();
        assert!(err.contains("exceeds base price"));
    }

    #[test]
    fn rejects_dangling_upgrade_target() {
        let doc = minimal_doc().replace(
            "upgrade_to = \"res-turbo\"",
            "upgrade_to = \"res-gone\"",
        );
        let err = parse_catalog_toml(&doc).unwrap_err().to_string();
        assert!(err.contains("does not exist"));
    }

    #[test]
    fn rejects_upgrade_target_without_combo() {
        let doc = minimal_doc().replace("enables_combo_discount = true", "");
        let err = parse_catalog_toml(&doc).unwrap_err().to_string();
        assert!(err.contains("does not enable the combo discount"));
    }

    #[test]
    fn require_lookup_signals_data_integrity() {
        let catalog = parse_catalog_toml(&minimal_doc()).unwrap();
        let err = catalog.require_app("app-retired").unwrap_err();
        assert!(err.to_string().contains("unknown app id"));
    }
}
