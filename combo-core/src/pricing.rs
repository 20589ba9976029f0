//! Pricing engine.
//!
//! `compute_order` is a pure function over (cart, catalog): it resolves the
//! cart's ids, applies the discount regimes (introductory plan pricing, combo
//! pricing for TV and apps, the Sky Full carve-out) and produces the itemized
//! summary plus the exportable order message. It never mutates its inputs and
//! is re-run in full on every cart change; the catalog is tens of items, so
//! there is nothing worth caching.

use crate::cart::CartState;
use crate::catalog::{
    AppOffer, AppTier, BackupPower, Catalog, ConnectionPlan, ItemKind, MeshAddon, TvBundle,
};
use crate::errors::Result;
use crate::message;
use rust_decimal::Decimal;

/// Discount tag shown on TV/app lines priced under combo rules.
pub const COMBO_LABEL: &str = "Oferta Combo";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComboDiscount {
    /// True only when the plan unlocks combo pricing *and* at least one
    /// selected add-on is actually cheaper for it.
    pub active: bool,
    pub amount_saved: Decimal,
    pub percentage_saved: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub item_id: String,
    pub kind: ItemKind,
    pub display_name: String,
    /// Reference "full" price for the line.
    pub steady_price: Decimal,
    /// Effective discounted price, when one applies (introductory plan
    /// pricing or combo pricing).
    pub introductory_price: Option<Decimal>,
    pub discount_label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderSummary {
    pub line_items: Vec<LineItem>,
    /// Monthly total during the plan's introductory window. Equal to the
    /// steady total when the plan has no introductory offer.
    pub introductory_monthly_total: Decimal,
    pub steady_monthly_total: Decimal,
    pub combo_discount: ComboDiscount,
    pub order_message: String,
}

impl OrderSummary {
    /// The canonical "nothing selected yet" summary.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Cart ids resolved against the catalog. Internal to the engine; a dangling
/// id surfaces as a data-integrity error before any price is computed.
pub(crate) struct ResolvedCart<'a> {
    pub plan: &'a ConnectionPlan,
    pub tv: Option<&'a TvBundle>,
    pub apps: Vec<&'a AppOffer>,
    pub mesh: Option<&'a MeshAddon>,
    pub backup: Option<&'a BackupPower>,
}

fn resolve<'a>(cart: &CartState, catalog: &'a Catalog) -> Result<Option<ResolvedCart<'a>>> {
    let Some(plan_id) = &cart.plan else {
        return Ok(None);
    };
    let plan = catalog.require_plan(plan_id)?;
    let tv = match &cart.tv {
        Some(id) => Some(catalog.require_tv(id)?),
        None => None,
    };
    let apps = cart
        .apps
        .iter()
        .map(|id| catalog.require_app(id))
        .collect::<Result<Vec<_>>>()?;
    let mesh = match &cart.mesh {
        Some(id) => Some(catalog.require_mesh(id)?),
        None => None,
    };
    let backup = match &cart.backup {
        Some(id) => Some(catalog.require_backup(id)?),
        None => None,
    };
    Ok(Some(ResolvedCart {
        plan,
        tv,
        apps,
        mesh,
        backup,
    }))
}

/// Compute the full order summary for the current cart.
///
/// An empty cart (no connection plan) yields [`OrderSummary::empty`], not an
/// error. A cart id the catalog cannot resolve is a data-integrity failure
/// and returns `Err`.
pub fn compute_order(cart: &CartState, catalog: &Catalog) -> Result<OrderSummary> {
    let Some(resolved) = resolve(cart, catalog)? else {
        return Ok(OrderSummary::empty());
    };

    let plan = resolved.plan;
    let combo_active = plan.enables_combo_discount;

    let mut intro_total = Decimal::ZERO;
    let mut steady_total = Decimal::ZERO;
    let mut line_items = Vec::new();

    // Connection plan: an introductory offer splits the plan's contribution
    // between the two totals; otherwise base price feeds both.
    let plan_display = format!("{} ({})", plan.name, plan.category.label());
    match &plan.intro {
        Some(intro) => {
            intro_total += intro.price;
            steady_total += plan.base_price;
            line_items.push(LineItem {
                item_id: plan.id.clone(),
                kind: ItemKind::Plan,
                display_name: plan_display,
                steady_price: plan.base_price,
                introductory_price: Some(intro.price),
                discount_label: Some(intro.note.clone()),
            });
        }
        None => {
            intro_total += plan.base_price;
            steady_total += plan.base_price;
            line_items.push(LineItem {
                item_id: plan.id.clone(),
                kind: ItemKind::Plan,
                display_name: plan_display,
                steady_price: plan.base_price,
                introductory_price: None,
                discount_label: None,
            });
        }
    }

    let mut addons_base = Decimal::ZERO;
    let mut addons_effective = Decimal::ZERO;

    // TV pricing is governed solely by the combo flag; it does not follow
    // the plan's introductory window.
    if let Some(tv) = resolved.tv {
        let effective = if combo_active {
            tv.combo_price
        } else {
            tv.base_price
        };
        intro_total += effective;
        steady_total += effective;
        addons_base += tv.base_price;
        addons_effective += effective;
        line_items.push(LineItem {
            item_id: tv.id.clone(),
            kind: ItemKind::Tv,
            display_name: format!("TV: {}", tv.name),
            steady_price: tv.base_price,
            introductory_price: combo_active.then_some(effective),
            discount_label: combo_active.then(|| COMBO_LABEL.to_string()),
        });
    }

    for app in &resolved.apps {
        // Sky Full is an absolute carve-out: never combo-priced.
        let discounted = combo_active && app.tier != AppTier::SkyFull;
        let effective = if discounted {
            app.combo_price
        } else {
            app.base_price
        };
        intro_total += effective;
        steady_total += effective;
        addons_base += app.base_price;
        addons_effective += effective;
        line_items.push(LineItem {
            item_id: app.id.clone(),
            kind: ItemKind::App,
            display_name: format!("App: {}", app.name),
            steady_price: app.base_price,
            introductory_price: discounted.then_some(effective),
            discount_label: discounted.then(|| COMBO_LABEL.to_string()),
        });
    }

    // Mesh and backup power never participate in any discount.
    if let Some(mesh) = resolved.mesh {
        intro_total += mesh.base_price;
        steady_total += mesh.base_price;
        line_items.push(LineItem {
            item_id: mesh.id.clone(),
            kind: ItemKind::Mesh,
            display_name: format!("Wi-Fi Extra: {}", mesh.name),
            steady_price: mesh.base_price,
            introductory_price: None,
            discount_label: None,
        });
    }
    if let Some(backup) = resolved.backup {
        intro_total += backup.base_price;
        steady_total += backup.base_price;
        line_items.push(LineItem {
            item_id: backup.id.clone(),
            kind: ItemKind::Backup,
            display_name: format!("Proteção: {}", backup.name),
            steady_price: backup.base_price,
            introductory_price: None,
            discount_label: None,
        });
    }

    let amount_saved = addons_base - addons_effective;
    let percentage_saved = if addons_base > Decimal::ZERO {
        amount_saved / addons_base * Decimal::from(100)
    } else {
        Decimal::ZERO
    };
    let combo_discount = ComboDiscount {
        active: combo_active && amount_saved > Decimal::ZERO,
        amount_saved,
        percentage_saved,
    };

    let order_message =
        message::build_order_message(&resolved, intro_total, steady_total, &combo_discount);

    Ok(OrderSummary {
        line_items,
        introductory_monthly_total: intro_total,
        steady_monthly_total: steady_total,
        combo_discount,
        order_message,
    })
}

/// Hypothetical comparison against the next-tier-up connection plan.
#[derive(Debug, Clone, PartialEq)]
pub struct UpgradeNudge {
    pub target_plan_id: String,
    /// Steady monthly total under the upgrade minus the current one.
    pub monthly_difference: Decimal,
    pub is_cheaper_overall: bool,
    /// Combo savings the cart's add-ons would enjoy under the upgrade.
    pub addons_savings_under_upgrade: Decimal,
}

/// Reprice the same cart under the plan's designated upgrade target. Returns
/// `None` when no plan is selected or the plan is not entry-tier. The real
/// cart is never touched.
pub fn compute_upgrade_nudge(cart: &CartState, catalog: &Catalog) -> Result<Option<UpgradeNudge>> {
    let Some(plan_id) = &cart.plan else {
        return Ok(None);
    };
    let plan = catalog.require_plan(plan_id)?;
    let Some(target_id) = &plan.upgrade_to else {
        return Ok(None);
    };

    let current = compute_order(cart, catalog)?;
    let mut hypothetical = cart.clone();
    hypothetical.plan = Some(target_id.clone());
    let upgraded = compute_order(&hypothetical, catalog)?;

    let monthly_difference = upgraded.steady_monthly_total - current.steady_monthly_total;
    Ok(Some(UpgradeNudge {
        target_plan_id: target_id.clone(),
        monthly_difference,
        is_cheaper_overall: monthly_difference <= Decimal::ZERO,
        addons_savings_under_upgrade: upgraded.combo_discount.amount_saved,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{apply, Intent};
    use crate::catalog::{self, PlanCategory};
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn cart(plan: &str) -> CartState {
        CartState {
            category: Some(PlanCategory::Residential),
            plan: Some(plan.to_string()),
            ..CartState::default()
        }
    }

    #[test]
    fn empty_cart_yields_empty_summary() {
        let summary = compute_order(&CartState::new(), catalog::builtin()).unwrap();
        assert_eq!(summary, OrderSummary::empty());
        assert_eq!(summary.steady_monthly_total, Decimal::ZERO);
        assert!(summary.order_message.is_empty());
    }

    #[test]
    fn introductory_plan_with_combo_app() {
        let mut cart = cart("res-800");
        cart.apps = vec!["app-deezer".into()];

        let summary = compute_order(&cart, catalog::builtin()).unwrap();
        assert_eq!(summary.steady_monthly_total, d("124.90"));
        assert_eq!(summary.introductory_monthly_total, d("99.90"));
        assert_eq!(summary.combo_discount.amount_saved, d("10"));
        assert_eq!(summary.combo_discount.percentage_saved, d("50"));
        assert!(summary.combo_discount.active);

        let plan_line = &summary.line_items[0];
        assert_eq!(plan_line.kind, ItemKind::Plan);
        assert_eq!(plan_line.display_name, "800 Mega (casa)");
        assert_eq!(plan_line.steady_price, d("114.90"));
        assert_eq!(plan_line.introductory_price, Some(d("89.90")));

        let app_line = &summary.line_items[1];
        assert_eq!(app_line.introductory_price, Some(d("10")));
        assert_eq!(app_line.discount_label.as_deref(), Some(COMBO_LABEL));
    }

    #[test]
    fn combo_inactive_plan_prices_tv_at_base() {
        let mut cart = cart("res-500");
        cart.tv = Some("tv-essential".into());

        let summary = compute_order(&cart, catalog::builtin()).unwrap();
        assert_eq!(summary.steady_monthly_total, d("114.90"));
        assert_eq!(summary.introductory_monthly_total, d("114.90"));
        assert!(!summary.combo_discount.active);
        assert_eq!(summary.combo_discount.amount_saved, Decimal::ZERO);

        let tv_line = &summary.line_items[1];
        assert_eq!(tv_line.steady_price, d("15.00"));
        assert_eq!(tv_line.introductory_price, None);
        assert_eq!(tv_line.discount_label, None);
    }

    #[test]
    fn sky_full_is_never_combo_priced() {
        let mut cart = cart("res-800");
        cart.apps = vec!["app-sky-full".into(), "app-deezer".into()];

        let summary = compute_order(&cart, catalog::builtin()).unwrap();
        assert!(summary.combo_discount.active);

        let sky_line = summary
            .line_items
            .iter()
            .find(|l| l.item_id == "app-sky-full")
            .unwrap();
        assert_eq!(sky_line.steady_price, d("89.90"));
        assert_eq!(sky_line.introductory_price, None);
        assert_eq!(sky_line.discount_label, None);
        // Only the Deezer line contributes savings.
        assert_eq!(summary.combo_discount.amount_saved, d("10"));
    }

    #[test]
    fn discount_arithmetic_over_mixed_addons() {
        let mut cart = cart("res-800");
        cart.tv = Some("tv-premium".into());
        cart.apps = vec!["app-deezer".into(), "app-sky-full".into()];

        let summary = compute_order(&cart, catalog::builtin()).unwrap();
        // TV saves 10 (90 -> 80), Deezer saves 10, Sky Full saves nothing.
        assert_eq!(summary.combo_discount.amount_saved, d("20"));
        let base_sum = d("90.00") + d("20") + d("89.90");
        assert_eq!(
            summary.combo_discount.percentage_saved,
            d("20") / base_sum * d("100")
        );
    }

    #[test]
    fn percentage_is_zero_without_addons() {
        let summary = compute_order(&cart("res-800"), catalog::builtin()).unwrap();
        assert_eq!(summary.combo_discount.percentage_saved, Decimal::ZERO);
        assert!(!summary.combo_discount.active);
    }

    #[test]
    fn mesh_and_backup_always_at_base_price() {
        let mut cart = cart("res-800");
        cart.mesh = Some("omni-6".into());
        cart.backup = Some("nobreak".into());

        let summary = compute_order(&cart, catalog::builtin()).unwrap();
        assert_eq!(summary.steady_monthly_total, d("114.90") + d("32.00") + d("18.00"));
        assert_eq!(
            summary.introductory_monthly_total,
            d("89.90") + d("32.00") + d("18.00")
        );
        assert!(!summary.combo_discount.active);
    }

    #[test]
    fn recompute_is_idempotent() {
        let mut cart = cart("res-800");
        cart.tv = Some("tv-cine".into());
        cart.apps = vec!["app-deezer".into(), "app-hbo-noads".into()];

        let first = compute_order(&cart, catalog::builtin()).unwrap();
        let second = compute_order(&cart, catalog::builtin()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn adding_an_item_never_decreases_steady_total() {
        let mut cart = cart("res-800");
        let mut last = compute_order(&cart, catalog::builtin())
            .unwrap()
            .steady_monthly_total;
        for intent in [
            Intent::ToggleTv("tv-essential".into()),
            Intent::ToggleApp("app-deezer".into()),
            Intent::ToggleApp("app-sky-full".into()),
            Intent::ToggleMesh("omni-cabo".into()),
            Intent::ToggleBackup("nobreak".into()),
        ] {
            cart = apply(&cart, catalog::builtin(), intent).applied().unwrap();
            let total = compute_order(&cart, catalog::builtin())
                .unwrap()
                .steady_monthly_total;
            assert!(total >= last, "total {} dropped below {}", total, last);
            last = total;
        }
    }

    #[test]
    fn switching_plans_reprices_existing_addons() {
        let mut cart = cart("res-500");
        cart.tv = Some("tv-essential".into());
        let before = compute_order(&cart, catalog::builtin()).unwrap();
        assert_eq!(before.steady_monthly_total, d("114.90"));

        let cart = apply(
            &cart,
            catalog::builtin(),
            Intent::ChoosePlan("res-800".into()),
        )
        .applied()
        .unwrap();
        let after = compute_order(&cart, catalog::builtin()).unwrap();
        // TV drops to its combo price without being re-selected.
        assert_eq!(after.steady_monthly_total, d("114.90") + d("10.00"));
        assert!(after.combo_discount.active);
    }

    #[test]
    fn dangling_cart_id_fails_loudly() {
        let mut cart = cart("res-800");
        cart.apps = vec!["app-gone".into()];
        let err = compute_order(&cart, catalog::builtin()).unwrap_err();
        assert!(err.to_string().contains("unknown app id"));
    }

    #[test]
    fn nudge_reprices_cart_under_upgrade_plan() {
        let mut cart = cart("res-600");
        cart.tv = Some("tv-essential".into());
        cart.apps = vec!["app-deezer".into()];

        let nudge = compute_upgrade_nudge(&cart, catalog::builtin())
            .unwrap()
            .unwrap();
        assert_eq!(nudge.target_plan_id, "res-800");
        // 112.90 + 15 + 20 = 147.90 today; 114.90 + 10 + 10 = 134.90 upgraded.
        assert_eq!(nudge.monthly_difference, d("-13.00"));
        assert!(nudge.is_cheaper_overall);
        assert_eq!(nudge.addons_savings_under_upgrade, d("15.00"));
    }

    #[test]
    fn nudge_break_even_counts_as_cheaper() {
        let mut cart = cart("res-500");
        cart.tv = Some("tv-essential".into());
        cart.apps = vec!["app-deezer".into()];

        // 99.90 + 15 + 20 = 134.90 today; 114.90 + 10 + 10 = 134.90 upgraded.
        let nudge = compute_upgrade_nudge(&cart, catalog::builtin())
            .unwrap()
            .unwrap();
        assert_eq!(nudge.monthly_difference, Decimal::ZERO);
        assert!(nudge.is_cheaper_overall);
    }

    #[test]
    fn nudge_absent_for_top_tier_and_empty_carts() {
        assert_eq!(
            compute_upgrade_nudge(&cart("res-920"), catalog::builtin()).unwrap(),
            None
        );
        assert_eq!(
            compute_upgrade_nudge(&CartState::new(), catalog::builtin()).unwrap(),
            None
        );
    }
}
