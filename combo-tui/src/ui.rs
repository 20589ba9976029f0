//! Rendering for the combo builder TUI
//!
//! Single-screen layout: step sidebar on the left, the current selection list
//! in the center, the live quote on the right, key legend at the bottom.

use crate::app::{App, Step};
use combo_core::catalog::Catalog;
use combo_core::currency::format_brl;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App) {
    // Main layout: Title | Body (3-panel) | Key legend
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(4),
            ]
            .as_ref(),
        )
        .split(f.area());

    let total_label = if app.cart.has_plan() {
        format!("Total: {}/mês", format_brl(app.summary.steady_monthly_total))
    } else {
        "Carrinho vazio".to_string()
    };
    let title_line = Line::from(vec![
        Span::styled("Entre Combo Builder", Style::default().fg(Color::White)),
        Span::raw(" | "),
        Span::styled(total_label, Style::default().fg(Color::Green)),
    ]);
    let title = Block::default().borders(Borders::ALL).title(title_line);
    f.render_widget(title, main_chunks[0]);

    // Three-panel layout: Sidebar | Content | Quote
    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage(20),
                Constraint::Percentage(45),
                Constraint::Percentage(35),
            ]
            .as_ref(),
        )
        .split(main_chunks[1]);

    let sidebar = Paragraph::new(build_step_sidebar(app))
        .block(Block::default().borders(Borders::ALL).title("Etapas"));
    f.render_widget(sidebar, body_chunks[0]);

    let list_items = build_content_lines(app)
        .into_iter()
        .map(ListItem::new)
        .collect::<Vec<_>>();
    let content = List::new(list_items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(app.step.title()),
    );
    f.render_widget(content, body_chunks[1]);

    let quote_panel = Paragraph::new(build_quote_panel(app))
        .block(Block::default().borders(Borders::ALL).title("Resumo"));
    f.render_widget(quote_panel, body_chunks[2]);

    // Key legend (always visible, context-specific)
    let legend_text = format!("{}\n{}", status_line(app), expected_actions(app.step));
    let legend =
        Paragraph::new(legend_text).block(Block::default().borders(Borders::ALL).title("Teclas"));
    f.render_widget(legend, main_chunks[2]);
}

/// Step progression sidebar with position markers.
fn build_step_sidebar(app: &App) -> String {
    let order = Step::all();
    let current = order.iter().position(|s| *s == app.step).unwrap_or(0);
    order
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let marker = if i == current {
                "▶"
            } else if i < current {
                "✓"
            } else {
                " "
            };
            format!("{} {}", marker, step.title())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn build_content_lines(app: &App) -> Vec<String> {
    if app.step == Step::Done {
        if app.summary.order_message.is_empty() {
            return vec!["(nenhum pedido para enviar)".to_string()];
        }
        return app
            .summary
            .order_message
            .lines()
            .map(str::to_string)
            .collect();
    }
    let rows = app.option_rows();
    if rows.is_empty() {
        return vec!["(nada para escolher nesta etapa)".to_string()];
    }
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let cursor = if i == app.cursor { "▶" } else { " " };
            format!("{} {} {}", cursor, row.mark.symbol(), row.label)
        })
        .collect()
}

/// Live quote: itemized lines, discount, totals and the upgrade hint.
fn build_quote_panel(app: &App) -> String {
    let mut lines = Vec::new();
    if app.summary.line_items.is_empty() {
        lines.push("Escolha um plano de internet".to_string());
        lines.push("para começar o pedido.".to_string());
        return lines.join("\n");
    }

    for item in &app.summary.line_items {
        match item.introductory_price {
            Some(price) => lines.push(format!(
                "{}  {} → {}",
                item.display_name,
                format_brl(item.steady_price),
                format_brl(price)
            )),
            None => lines.push(format!(
                "{}  {}",
                item.display_name,
                format_brl(item.steady_price)
            )),
        }
    }

    let discount = &app.summary.combo_discount;
    if discount.active {
        lines.push(String::new());
        lines.push(format!(
            "🏷️ Desconto combo: -{} ({}%)",
            format_brl(discount.amount_saved),
            discount.percentage_saved.round_dp(0)
        ));
    }

    lines.push(String::new());
    if app.summary.introductory_monthly_total != app.summary.steady_monthly_total {
        lines.push(format!(
            "Total: {}/mês nos 3 primeiros meses",
            format_brl(app.summary.introductory_monthly_total)
        ));
        lines.push(format!(
            "Depois: {}/mês",
            format_brl(app.summary.steady_monthly_total)
        ));
    } else {
        lines.push(format!(
            "Total: {}/mês",
            format_brl(app.summary.steady_monthly_total)
        ));
    }

    if let Some(nudge) = &app.nudge {
        if let Some(target) = app.catalog.plan(&nudge.target_plan_id) {
            lines.push(String::new());
            if nudge.is_cheaper_overall {
                lines.push(format!(
                    "💡 Com {} o total fica {} menor (tecla u)",
                    target.name,
                    format_brl(nudge.monthly_difference.abs())
                ));
            } else {
                lines.push(format!(
                    "💡 {} por +{}/mês destrava o combo (tecla u)",
                    target.name,
                    format_brl(nudge.monthly_difference)
                ));
            }
        }
    }

    lines.join("\n")
}

fn status_line(app: &App) -> String {
    match &app.error_message {
        Some(err) => format!("⚠️ {}", err),
        None => app.status_message.clone(),
    }
}

fn expected_actions(step: Step) -> &'static str {
    match step {
        Step::Category | Step::Profiles | Step::Plan => {
            "↑/↓ navegar | enter escolher | esc voltar | c limpar | q sair"
        }
        Step::Tv | Step::Apps | Step::Mesh | Step::Backup => {
            "↑/↓ navegar | espaço marcar | enter avançar | esc voltar | c limpar | q sair"
        }
        Step::Summary => {
            "↑/↓ navegar | d remover | u upgrade | enter concluir | esc voltar | q sair"
        }
        Step::Done => "enter sair | esc voltar | q sair",
    }
}

/// Plain-text render of one step, for `--dump-tui`.
pub fn dump_step(app: &App) -> String {
    format!(
        "STEP: {}\n\n- Body contents:\n{}\n- Quote panel:\n{}\n- Status: {}\n- Expected user actions (keys): {}\n",
        app.step.title(),
        build_content_lines(app).join("\n"),
        build_quote_panel(app),
        status_line(app),
        expected_actions(app.step)
    )
}

pub fn dump_all_steps(catalog: &Catalog) {
    let mut app = App::new(catalog);
    for step in Step::all() {
        app.step = *step;
        app.cursor = 0;
        println!("{}", dump_step(&app));
    }
}
