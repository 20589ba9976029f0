//! Non-interactive quoting and catalog listing.
//!
//! The quote subcommand builds the cart through the same mutation rules as
//! the TUI, so a selection the UI would decline (app over the tier cap,
//! add-on without a plan) fails here with the same message instead of being
//! silently priced.

use crate::cli::QuoteArgs;
use anyhow::{anyhow, Result};
use combo_core::cart::{self, CartState, Intent, Outcome};
use combo_core::catalog::Catalog;
use combo_core::currency::format_brl;
use combo_core::pricing;

pub fn run(catalog: &Catalog, args: &QuoteArgs) -> Result<()> {
    let mut cart = apply(CartState::new(), catalog, Intent::ChooseCategory(args.category.into()))?;
    if let Some(profile) = &args.profile {
        cart = apply(cart, catalog, Intent::ApplyProfile(profile.clone()))?;
    }
    if let Some(plan) = &args.plan {
        cart = apply(cart, catalog, Intent::ChoosePlan(plan.clone()))?;
    }
    if let Some(tv) = &args.tv {
        cart = apply(cart, catalog, Intent::ToggleTv(tv.clone()))?;
    }
    for app in &args.apps {
        cart = apply(cart, catalog, Intent::ToggleApp(app.clone()))?;
    }
    if let Some(mesh) = &args.mesh {
        cart = apply(cart, catalog, Intent::ToggleMesh(mesh.clone()))?;
    }
    if let Some(backup) = &args.backup {
        cart = apply(cart, catalog, Intent::ToggleBackup(backup.clone()))?;
    }

    let summary = pricing::compute_order(&cart, catalog)?;
    if args.message_only {
        println!("{}", summary.order_message);
        return Ok(());
    }

    if summary.line_items.is_empty() {
        println!("Nothing selected; pass --plan or --profile.");
        return Ok(());
    }

    for item in &summary.line_items {
        match (item.introductory_price, &item.discount_label) {
            (Some(price), Some(label)) => println!(
                "{}  {}  ({} {})",
                item.display_name,
                format_brl(item.steady_price),
                format_brl(price),
                label
            ),
            _ => println!("{}  {}", item.display_name, format_brl(item.steady_price)),
        }
    }

    let discount = &summary.combo_discount;
    if discount.active {
        println!(
            "\nDesconto combo: -{} ({}% nos adicionais)",
            format_brl(discount.amount_saved),
            discount.percentage_saved.round_dp(1)
        );
    }

    if summary.introductory_monthly_total != summary.steady_monthly_total {
        println!(
            "\nTotal mensal: {} nos 3 primeiros meses, depois {}",
            format_brl(summary.introductory_monthly_total),
            format_brl(summary.steady_monthly_total)
        );
    } else {
        println!("\nTotal mensal: {}", format_brl(summary.steady_monthly_total));
    }

    if let Some(nudge) = pricing::compute_upgrade_nudge(&cart, catalog)? {
        if let Some(target) = catalog.plan(&nudge.target_plan_id) {
            if nudge.is_cheaper_overall {
                println!(
                    "\n💡 Com o plano {} o mesmo pedido fica {} mais barato por mês.",
                    target.name,
                    format_brl(nudge.monthly_difference.abs())
                );
            }
        }
    }

    println!("\n--- Mensagem do pedido ---\n{}", summary.order_message);
    Ok(())
}

pub fn list_catalog(catalog: &Catalog) -> Result<()> {
    println!("Planos:");
    for plan in &catalog.plans {
        let price = match &plan.intro {
            Some(intro) => format!(
                "{} ({} {})",
                format_brl(plan.base_price),
                format_brl(intro.price),
                intro.note
            ),
            None => format_brl(plan.base_price),
        };
        println!("  {:<16} {} [{}] - {}", plan.id, plan.name, plan.category.label(), price);
    }
    println!("\nTV:");
    for tv in &catalog.tv_bundles {
        println!(
            "  {:<16} {} - {} (combo {})",
            tv.id,
            tv.name,
            format_brl(tv.base_price),
            format_brl(tv.combo_price)
        );
    }
    println!("\nApps:");
    for app in &catalog.apps {
        println!(
            "  {:<24} {} [{}] - {} (combo {})",
            app.id,
            app.name,
            app.tier.label(),
            format_brl(app.base_price),
            format_brl(app.combo_price)
        );
    }
    println!("\nWi-Fi extra:");
    for mesh in &catalog.mesh_addons {
        println!("  {:<16} {} - {}", mesh.id, mesh.name, format_brl(mesh.base_price));
    }
    println!("\nProteção:");
    for backup in &catalog.backup_addons {
        println!("  {:<16} {} - {}", backup.id, backup.name, format_brl(backup.base_price));
    }
    println!("\nCombos prontos:");
    for profile in &catalog.profiles {
        println!(
            "  {:<20} {} [{}] - {}",
            profile.id,
            profile.name,
            profile.category.label(),
            profile.description
        );
    }
    Ok(())
}

fn apply(cart: CartState, catalog: &Catalog, intent: Intent) -> Result<CartState> {
    match cart::apply(&cart, catalog, intent) {
        Outcome::Applied(next) => Ok(next),
        Outcome::Declined(decline) => Err(anyhow!("{}", decline)),
    }
}
