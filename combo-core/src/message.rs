//! Order message assembly.
//!
//! The message is a fixed-format Portuguese text handed verbatim to the sales
//! channel. Line order, labels and punctuation are part of the external
//! contract; nothing here is localized or configurable.

use crate::currency::format_brl;
use crate::pricing::{ComboDiscount, ResolvedCart};
use rust_decimal::Decimal;

const GREETING: &str = "Olá Entre! Tenho interesse em contratar o seguinte pedido:";

pub(crate) fn build_order_message(
    resolved: &ResolvedCart<'_>,
    intro_total: Decimal,
    steady_total: Decimal,
    discount: &ComboDiscount,
) -> String {
    let plan = resolved.plan;
    let mut out = String::new();
    out.push_str(GREETING);
    out.push_str("\n\n");

    match &plan.intro {
        Some(intro) => out.push_str(&format!(
            "*Plano Internet:* {} ({}) - {} (Promoção: {} {})\n",
            plan.name,
            plan.category.label(),
            format_brl(plan.base_price),
            format_brl(intro.price),
            intro.note,
        )),
        None => out.push_str(&format!(
            "*Plano Internet:* {} ({}) - {}\n",
            plan.name,
            plan.category.label(),
            format_brl(plan.base_price),
        )),
    }

    if let Some(tv) = resolved.tv {
        out.push_str(&format!("*TV:* {}\n", tv.name));
    }

    // The savings note precedes the app lines it (partly) explains.
    if discount.active {
        out.push_str(&format!(
            "\n*Desconto nos adicionais (TV e Apps):* -{}\n",
            format_brl(discount.amount_saved),
        ));
    }

    for app in &resolved.apps {
        out.push_str(&format!("*App:* {}\n", app.name));
    }
    if let Some(mesh) = resolved.mesh {
        out.push_str(&format!(
            "*Wi-Fi Extra:* {} - {}\n",
            mesh.name,
            format_brl(mesh.base_price),
        ));
    }
    if let Some(backup) = resolved.backup {
        out.push_str(&format!(
            "*Proteção:* {} - {}\n",
            backup.name,
            format_brl(backup.base_price),
        ));
    }

    match &plan.intro {
        Some(intro) if intro_total != steady_total => out.push_str(&format!(
            "\n*Total Mensal:* {} ({} {})",
            format_brl(steady_total),
            format_brl(intro_total),
            intro.note,
        )),
        _ => out.push_str(&format!("\n*Total Mensal:* {}", format_brl(steady_total))),
    }

    out
}
