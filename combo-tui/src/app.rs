//! Application state machine for the combo builder TUI
//!
//! Every cart mutation is routed through `combo_core::cart::apply`; the app
//! itself never edits the cart directly. Declined intents land in
//! `error_message` for the current frame, applied ones trigger a full
//! recompute of the quote and the upgrade suggestion.

use crate::widgets::SlotMark;
use combo_core::cart::{self, CartState, Intent, Outcome, SummarySlot};
use combo_core::catalog::{Catalog, ItemKind, PlanCategory};
use combo_core::currency::format_brl;
use combo_core::pricing::{self, LineItem, OrderSummary, UpgradeNudge};
use crossterm::event::{KeyCode, KeyEvent};

/// Result of handling input
pub enum InputResult {
    Continue,
    Quit,
}

/// Sequence of screens in the builder flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Category,
    Profiles,
    Plan,
    Tv,
    Apps,
    Mesh,
    Backup,
    Summary,
    Done,
}

impl Step {
    pub fn all() -> &'static [Step] {
        &[
            Step::Category,
            Step::Profiles,
            Step::Plan,
            Step::Tv,
            Step::Apps,
            Step::Mesh,
            Step::Backup,
            Step::Summary,
            Step::Done,
        ]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Step::Category => "Tipo de plano",
            Step::Profiles => "Combos prontos",
            Step::Plan => "Plano de internet",
            Step::Tv => "TV",
            Step::Apps => "Apps",
            Step::Mesh => "Wi-Fi extra",
            Step::Backup => "Proteção",
            Step::Summary => "Resumo do pedido",
            Step::Done => "Pedido pronto",
        }
    }

    pub fn next(&self) -> Option<Step> {
        match self {
            Step::Category => Some(Step::Profiles),
            Step::Profiles => Some(Step::Plan),
            Step::Plan => Some(Step::Tv),
            Step::Tv => Some(Step::Apps),
            Step::Apps => Some(Step::Mesh),
            Step::Mesh => Some(Step::Backup),
            Step::Backup => Some(Step::Summary),
            Step::Summary => Some(Step::Done),
            Step::Done => None,
        }
    }

    pub fn prev(&self) -> Option<Step> {
        match self {
            Step::Category => None,
            Step::Profiles => Some(Step::Category),
            Step::Plan => Some(Step::Profiles),
            Step::Tv => Some(Step::Plan),
            Step::Apps => Some(Step::Tv),
            Step::Mesh => Some(Step::Apps),
            Step::Backup => Some(Step::Mesh),
            Step::Summary => Some(Step::Backup),
            Step::Done => Some(Step::Summary),
        }
    }
}

/// One selectable row on the current screen.
#[derive(Debug, Clone)]
pub struct OptionRow {
    pub id: String,
    pub label: String,
    pub mark: SlotMark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotKind {
    Tv,
    Mesh,
    Backup,
}

/// Application state
pub struct App<'a> {
    pub catalog: &'a Catalog,
    pub cart: CartState,
    pub step: Step,
    pub cursor: usize,
    pub summary: OrderSummary,
    pub nudge: Option<UpgradeNudge>,
    pub status_message: String,
    pub error_message: Option<String>,
}

impl<'a> App<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            cart: CartState::new(),
            step: Step::Category,
            cursor: 0,
            summary: OrderSummary::empty(),
            nudge: None,
            status_message: "👋 Monte seu combo!".to_string(),
            error_message: None,
        }
    }

    /// Rows for the current screen, in display order.
    pub fn option_rows(&self) -> Vec<OptionRow> {
        match self.step {
            Step::Category => vec![
                OptionRow {
                    id: "residential".to_string(),
                    label: "Para sua casa".to_string(),
                    mark: SlotMark::Radio(self.cart.category == Some(PlanCategory::Residential)),
                },
                OptionRow {
                    id: "business".to_string(),
                    label: "Para sua empresa".to_string(),
                    mark: SlotMark::Radio(self.cart.category == Some(PlanCategory::Business)),
                },
            ],
            Step::Profiles => {
                let mut rows: Vec<OptionRow> = self
                    .profiles()
                    .iter()
                    .map(|profile| OptionRow {
                        id: profile.id.clone(),
                        label: format!("{} — {}", profile.name, profile.description),
                        mark: SlotMark::Radio(
                            self.cart.active_profile.as_deref() == Some(profile.id.as_str()),
                        ),
                    })
                    .collect();
                rows.push(OptionRow {
                    id: String::new(),
                    label: "Montar do zero".to_string(),
                    mark: SlotMark::Bare,
                });
                rows
            }
            Step::Plan => self
                .plans()
                .iter()
                .map(|plan| {
                    let label = match &plan.intro {
                        Some(intro) => format!(
                            "{} - {} (de {})",
                            plan.name,
                            format_brl(intro.price),
                            format_brl(plan.base_price)
                        ),
                        None => format!("{} - {}", plan.name, format_brl(plan.base_price)),
                    };
                    OptionRow {
                        id: plan.id.clone(),
                        label,
                        mark: SlotMark::Radio(
                            self.cart.plan.as_deref() == Some(plan.id.as_str()),
                        ),
                    }
                })
                .collect(),
            Step::Tv => self
                .catalog
                .tv_bundles
                .iter()
                .map(|tv| OptionRow {
                    id: tv.id.clone(),
                    label: format!(
                        "{} ({}) - {}",
                        tv.name,
                        tv.details,
                        format_brl(tv.base_price)
                    ),
                    mark: SlotMark::Radio(self.cart.tv.as_deref() == Some(tv.id.as_str())),
                })
                .collect(),
            Step::Apps => self
                .catalog
                .apps
                .iter()
                .map(|app| OptionRow {
                    id: app.id.clone(),
                    label: format!(
                        "{} [{}] - {}",
                        app.name,
                        app.tier.label(),
                        format_brl(app.base_price)
                    ),
                    mark: SlotMark::Check(self.cart.apps.iter().any(|a| a == &app.id)),
                })
                .collect(),
            Step::Mesh => self
                .catalog
                .mesh_addons
                .iter()
                .map(|mesh| OptionRow {
                    id: mesh.id.clone(),
                    label: format!("{} - {}", mesh.name, format_brl(mesh.base_price)),
                    mark: SlotMark::Radio(self.cart.mesh.as_deref() == Some(mesh.id.as_str())),
                })
                .collect(),
            Step::Backup => self
                .catalog
                .backup_addons
                .iter()
                .map(|backup| OptionRow {
                    id: backup.id.clone(),
                    label: format!("{} - {}", backup.name, format_brl(backup.base_price)),
                    mark: SlotMark::Radio(
                        self.cart.backup.as_deref() == Some(backup.id.as_str()),
                    ),
                })
                .collect(),
            Step::Summary => self
                .removable_lines()
                .iter()
                .map(|item| OptionRow {
                    id: item.item_id.clone(),
                    label: format!("{} - {}", item.display_name, format_brl(item.steady_price)),
                    mark: SlotMark::Bare,
                })
                .collect(),
            Step::Done => Vec::new(),
        }
    }

    /// Summary lines the user can remove in place (everything but the plan).
    pub fn removable_lines(&self) -> Vec<&LineItem> {
        self.summary
            .line_items
            .iter()
            .filter(|item| item.kind != ItemKind::Plan)
            .collect()
    }

    pub fn handle_input(&mut self, key: KeyEvent) -> InputResult {
        match key.code {
            KeyCode::Char('q') => return InputResult::Quit,
            KeyCode::Char('c') => {
                self.apply_intent(Intent::Clear);
                self.step = Step::Category;
                self.cursor = 0;
                self.status_message = "🧹 Carrinho esvaziado.".to_string();
                return InputResult::Continue;
            }
            _ => {}
        }
        match self.step {
            Step::Category => self.handle_category(key),
            Step::Profiles => self.handle_profiles(key),
            Step::Plan => self.handle_plan(key),
            Step::Tv => self.handle_slot(key, SlotKind::Tv),
            Step::Apps => self.handle_apps(key),
            Step::Mesh => self.handle_slot(key, SlotKind::Mesh),
            Step::Backup => self.handle_slot(key, SlotKind::Backup),
            Step::Summary => self.handle_summary(key),
            Step::Done => self.handle_done(key),
        }
    }

    fn handle_category(&mut self, key: KeyEvent) -> InputResult {
        match key.code {
            KeyCode::Up | KeyCode::Down => {
                self.move_cursor(key.code);
                InputResult::Continue
            }
            KeyCode::Enter => {
                let category = if self.cursor == 0 {
                    PlanCategory::Residential
                } else {
                    PlanCategory::Business
                };
                if self.apply_intent(Intent::ChooseCategory(category)) {
                    self.go_next();
                }
                InputResult::Continue
            }
            _ => InputResult::Continue,
        }
    }

    fn handle_profiles(&mut self, key: KeyEvent) -> InputResult {
        match key.code {
            KeyCode::Up | KeyCode::Down => {
                self.move_cursor(key.code);
                InputResult::Continue
            }
            KeyCode::Enter => {
                let rows = self.option_rows();
                match rows.get(self.cursor) {
                    Some(row) if !row.id.is_empty() => {
                        if self.apply_intent(Intent::ApplyProfile(row.id.clone())) {
                            self.status_message =
                                "✅ Combo aplicado. Ajuste o que quiser.".to_string();
                            self.go_next();
                        }
                    }
                    _ => self.go_next(),
                }
                InputResult::Continue
            }
            KeyCode::Esc => {
                self.go_prev();
                InputResult::Continue
            }
            _ => InputResult::Continue,
        }
    }

    fn handle_plan(&mut self, key: KeyEvent) -> InputResult {
        match key.code {
            KeyCode::Up | KeyCode::Down => {
                self.move_cursor(key.code);
                InputResult::Continue
            }
            KeyCode::Enter => {
                let rows = self.option_rows();
                if let Some(row) = rows.get(self.cursor) {
                    if self.apply_intent(Intent::ChoosePlan(row.id.clone())) {
                        self.go_next();
                    }
                }
                InputResult::Continue
            }
            KeyCode::Esc => {
                self.go_prev();
                InputResult::Continue
            }
            _ => InputResult::Continue,
        }
    }

    fn handle_slot(&mut self, key: KeyEvent, kind: SlotKind) -> InputResult {
        match key.code {
            KeyCode::Up | KeyCode::Down => {
                self.move_cursor(key.code);
                InputResult::Continue
            }
            KeyCode::Char(' ') => {
                let rows = self.option_rows();
                if let Some(row) = rows.get(self.cursor) {
                    let intent = match kind {
                        SlotKind::Tv => Intent::ToggleTv(row.id.clone()),
                        SlotKind::Mesh => Intent::ToggleMesh(row.id.clone()),
                        SlotKind::Backup => Intent::ToggleBackup(row.id.clone()),
                    };
                    self.apply_intent(intent);
                }
                InputResult::Continue
            }
            KeyCode::Enter => {
                self.go_next();
                InputResult::Continue
            }
            KeyCode::Esc => {
                self.go_prev();
                InputResult::Continue
            }
            _ => InputResult::Continue,
        }
    }

    fn handle_apps(&mut self, key: KeyEvent) -> InputResult {
        match key.code {
            KeyCode::Up | KeyCode::Down => {
                self.move_cursor(key.code);
                InputResult::Continue
            }
            KeyCode::Char(' ') => {
                let rows = self.option_rows();
                if let Some(row) = rows.get(self.cursor) {
                    self.apply_intent(Intent::ToggleApp(row.id.clone()));
                }
                InputResult::Continue
            }
            KeyCode::Enter => {
                self.go_next();
                InputResult::Continue
            }
            KeyCode::Esc => {
                self.go_prev();
                InputResult::Continue
            }
            _ => InputResult::Continue,
        }
    }

    fn handle_summary(&mut self, key: KeyEvent) -> InputResult {
        match key.code {
            KeyCode::Up | KeyCode::Down => {
                self.move_cursor(key.code);
                InputResult::Continue
            }
            KeyCode::Char('d') => {
                let target = self
                    .removable_lines()
                    .get(self.cursor)
                    .map(|item| (item.kind, item.item_id.clone()));
                if let Some((kind, id)) = target {
                    let slot = match kind {
                        ItemKind::Tv => SummarySlot::Tv,
                        ItemKind::App => SummarySlot::App,
                        ItemKind::Mesh => SummarySlot::Mesh,
                        ItemKind::Backup => SummarySlot::Backup,
                        ItemKind::Plan => return InputResult::Continue,
                    };
                    if self.apply_intent(Intent::RemoveLine { slot, id: Some(id) }) {
                        let len = self.removable_lines().len();
                        self.cursor = self.cursor.min(len.saturating_sub(1));
                    }
                }
                InputResult::Continue
            }
            KeyCode::Char('u') => {
                if let Some(nudge) = self.nudge.clone() {
                    if self.apply_intent(Intent::ChoosePlan(nudge.target_plan_id)) {
                        self.status_message = "⬆️ Plano atualizado.".to_string();
                    }
                }
                InputResult::Continue
            }
            KeyCode::Enter => {
                self.status_message = "📨 Copie a mensagem e envie o pedido.".to_string();
                self.go_next();
                InputResult::Continue
            }
            KeyCode::Esc => {
                self.go_prev();
                InputResult::Continue
            }
            _ => InputResult::Continue,
        }
    }

    fn handle_done(&mut self, key: KeyEvent) -> InputResult {
        match key.code {
            KeyCode::Enter => InputResult::Quit,
            KeyCode::Esc => {
                self.go_prev();
                InputResult::Continue
            }
            _ => InputResult::Continue,
        }
    }

    /// Route one intent through the cart rules; returns whether it applied.
    fn apply_intent(&mut self, intent: Intent) -> bool {
        match cart::apply(&self.cart, self.catalog, intent) {
            Outcome::Applied(next) => {
                self.cart = next;
                self.error_message = None;
                self.refresh();
                true
            }
            Outcome::Declined(decline) => {
                self.error_message = Some(decline.to_string());
                false
            }
        }
    }

    /// Recompute the quote and the upgrade suggestion after a cart change.
    fn refresh(&mut self) {
        match pricing::compute_order(&self.cart, self.catalog) {
            Ok(summary) => self.summary = summary,
            Err(err) => {
                self.summary = OrderSummary::empty();
                self.error_message = Some(err.to_string());
            }
        }
        self.nudge = pricing::compute_upgrade_nudge(&self.cart, self.catalog)
            .ok()
            .flatten();
    }

    fn go_next(&mut self) {
        let mut next = self.step.next();
        if next == Some(Step::Profiles) && self.profiles().is_empty() {
            next = Step::Profiles.next();
        }
        if let Some(step) = next {
            self.step = step;
            self.cursor = 0;
        }
    }

    fn go_prev(&mut self) {
        let mut prev = self.step.prev();
        if prev == Some(Step::Profiles) && self.profiles().is_empty() {
            prev = Step::Profiles.prev();
        }
        if let Some(step) = prev {
            self.step = step;
            self.cursor = 0;
        }
    }

    fn move_cursor(&mut self, code: KeyCode) {
        let len = self.option_rows().len();
        let delta = if code == KeyCode::Up { -1 } else { 1 };
        Self::adjust_index(len, &mut self.cursor, delta);
    }

    fn adjust_index(len: usize, index: &mut usize, delta: isize) {
        if len == 0 {
            *index = 0;
            return;
        }
        let len_i = len as isize;
        let mut next = *index as isize + delta;
        if next < 0 {
            next = len_i - 1;
        } else if next >= len_i {
            next = 0;
        }
        *index = next as usize;
    }

    fn profiles(&self) -> Vec<&combo_core::profile::Profile> {
        match self.cart.category {
            Some(category) => self.catalog.profiles_in(category),
            // Before a segment is chosen the next step is always the
            // profile-less plan list.
            None => Vec::new(),
        }
    }

    fn plans(&self) -> Vec<&combo_core::catalog::ConnectionPlan> {
        match self.cart.category {
            Some(category) => self.catalog.plans_in(category),
            None => Vec::new(),
        }
    }
}
