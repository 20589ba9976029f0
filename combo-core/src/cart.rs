//! Cart state and the mutation rules that govern it.
//!
//! The cart holds item *ids*; resolution against the catalog happens when
//! pricing runs. Every mutation goes through [`apply`], a pure transition
//! that either yields a new cart or a declined outcome — rule violations
//! (tier cap, missing plan) are expected conditions, never panics or errors.

use crate::catalog::{AppTier, Catalog, PlanCategory};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-tier selection cap for streaming apps.
pub const MAX_APPS_PER_TIER: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    pub category: Option<PlanCategory>,
    pub plan: Option<String>,
    pub tv: Option<String>,
    /// Insertion order is display order; pricing does not depend on it.
    pub apps: Vec<String>,
    pub mesh: Option<String>,
    pub backup: Option<String>,
    /// Set by [`Intent::ApplyProfile`]; cleared by any manual mutation,
    /// since the resulting cart no longer exactly matches a preset.
    pub active_profile: Option<String>,
}

impl CartState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_plan(&self) -> bool {
        self.plan.is_some()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// How many selected apps resolve to the given tier. Ids the catalog no
    /// longer knows are ignored; pricing will surface those loudly.
    pub fn tier_count(&self, catalog: &Catalog, tier: AppTier) -> usize {
        self.apps
            .iter()
            .filter_map(|id| catalog.app(id))
            .filter(|app| app.tier == tier)
            .count()
    }
}

/// Add-on slot addressable from the summary view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarySlot {
    Tv,
    App,
    Mesh,
    Backup,
}

/// A requested cart mutation.
#[derive(Debug, Clone)]
pub enum Intent {
    /// Switching customer segment discards the whole selection.
    ChooseCategory(PlanCategory),
    /// Changing speed tier keeps already-chosen extras on purpose.
    ChoosePlan(String),
    ToggleTv(String),
    ToggleApp(String),
    ToggleMesh(String),
    ToggleBackup(String),
    ApplyProfile(String),
    RemoveLine {
        slot: SummarySlot,
        id: Option<String>,
    },
    Clear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied(CartState),
    Declined(Decline),
}

impl Outcome {
    pub fn applied(self) -> Option<CartState> {
        match self {
            Outcome::Applied(cart) => Some(cart),
            Outcome::Declined(_) => None,
        }
    }
}

/// Why a mutation was not applied. These are policy outcomes for the caller
/// to present, not failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decline {
    NoCategory,
    NoPlan,
    TierLimit(AppTier),
    UnknownItem(String),
}

impl fmt::Display for Decline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decline::NoCategory => write!(f, "choose a customer segment first"),
            Decline::NoPlan => write!(f, "select a connection plan before adding extras"),
            Decline::TierLimit(tier) => write!(
                f,
                "limit of {} {} apps reached",
                MAX_APPS_PER_TIER,
                tier.label()
            ),
            Decline::UnknownItem(id) => write!(f, "item {} is not available", id),
        }
    }
}

/// Apply one intent to the cart. Pure and atomic: the input cart is never
/// mutated, and a declined intent leaves no partial update behind.
pub fn apply(cart: &CartState, catalog: &Catalog, intent: Intent) -> Outcome {
    match intent {
        Intent::ChooseCategory(category) => Outcome::Applied(CartState {
            category: Some(category),
            ..CartState::default()
        }),

        Intent::ChoosePlan(id) => {
            let Some(category) = cart.category else {
                return Outcome::Declined(Decline::NoCategory);
            };
            match catalog.plan(&id) {
                Some(plan) if plan.category == category => {
                    let mut next = cart.clone();
                    next.plan = Some(id);
                    next.active_profile = None;
                    Outcome::Applied(next)
                }
                _ => Outcome::Declined(Decline::UnknownItem(id)),
            }
        }

        Intent::ToggleTv(id) => {
            if !cart.has_plan() {
                return Outcome::Declined(Decline::NoPlan);
            }
            if cart.tv.as_deref() == Some(id.as_str()) {
                let mut next = cart.clone();
                next.tv = None;
                next.active_profile = None;
                return Outcome::Applied(next);
            }
            if catalog.tv(&id).is_none() {
                return Outcome::Declined(Decline::UnknownItem(id));
            }
            let mut next = cart.clone();
            next.tv = Some(id);
            next.active_profile = None;
            Outcome::Applied(next)
        }

        Intent::ToggleApp(id) => {
            if !cart.has_plan() {
                return Outcome::Declined(Decline::NoPlan);
            }
            if cart.apps.iter().any(|a| a == &id) {
                let mut next = cart.clone();
                next.apps.retain(|a| a != &id);
                next.active_profile = None;
                return Outcome::Applied(next);
            }
            let Some(app) = catalog.app(&id) else {
                return Outcome::Declined(Decline::UnknownItem(id));
            };
            if cart.tier_count(catalog, app.tier) >= MAX_APPS_PER_TIER {
                return Outcome::Declined(Decline::TierLimit(app.tier));
            }
            let mut next = cart.clone();
            next.apps.push(id);
            next.active_profile = None;
            Outcome::Applied(next)
        }

        Intent::ToggleMesh(id) => {
            if !cart.has_plan() {
                return Outcome::Declined(Decline::NoPlan);
            }
            if cart.mesh.as_deref() == Some(id.as_str()) {
                let mut next = cart.clone();
                next.mesh = None;
                next.active_profile = None;
                return Outcome::Applied(next);
            }
            if catalog.mesh(&id).is_none() {
                return Outcome::Declined(Decline::UnknownItem(id));
            }
            let mut next = cart.clone();
            next.mesh = Some(id);
            next.active_profile = None;
            Outcome::Applied(next)
        }

        Intent::ToggleBackup(id) => {
            if !cart.has_plan() {
                return Outcome::Declined(Decline::NoPlan);
            }
            if cart.backup.as_deref() == Some(id.as_str()) {
                let mut next = cart.clone();
                next.backup = None;
                next.active_profile = None;
                return Outcome::Applied(next);
            }
            if catalog.backup(&id).is_none() {
                return Outcome::Declined(Decline::UnknownItem(id));
            }
            let mut next = cart.clone();
            next.backup = Some(id);
            next.active_profile = None;
            Outcome::Applied(next)
        }

        Intent::ApplyProfile(id) => {
            let Some(category) = cart.category else {
                return Outcome::Declined(Decline::NoCategory);
            };
            match catalog.profile(&id) {
                Some(profile) if profile.category == category => {
                    let config = &profile.config;
                    // A profile naming a retired item silently omits it. The
                    // add-ons only survive when the plan itself resolves, so
                    // the plan-before-add-ons invariant holds.
                    let plan = catalog.plan(&config.plan_id).map(|p| p.id.clone());
                    let (tv, apps, mesh, backup) = if plan.is_some() {
                        (
                            config
                                .tv_id
                                .as_deref()
                                .and_then(|t| catalog.tv(t))
                                .map(|t| t.id.clone()),
                            config
                                .app_ids
                                .iter()
                                .filter(|a| catalog.app(a).is_some())
                                .cloned()
                                .collect(),
                            config
                                .mesh_id
                                .as_deref()
                                .and_then(|m| catalog.mesh(m))
                                .map(|m| m.id.clone()),
                            config
                                .backup_id
                                .as_deref()
                                .and_then(|b| catalog.backup(b))
                                .map(|b| b.id.clone()),
                        )
                    } else {
                        (None, Vec::new(), None, None)
                    };
                    Outcome::Applied(CartState {
                        category: Some(category),
                        plan,
                        tv,
                        apps,
                        mesh,
                        backup,
                        active_profile: Some(id),
                    })
                }
                _ => Outcome::Declined(Decline::UnknownItem(id)),
            }
        }

        Intent::RemoveLine { slot, id } => {
            let mut next = cart.clone();
            match slot {
                SummarySlot::Tv => next.tv = None,
                SummarySlot::Mesh => next.mesh = None,
                SummarySlot::Backup => next.backup = None,
                SummarySlot::App => {
                    if let Some(id) = id {
                        next.apps.retain(|a| a != &id);
                    }
                }
            }
            next.active_profile = None;
            Outcome::Applied(next)
        }

        Intent::Clear => Outcome::Applied(CartState::default()),
    }
}
