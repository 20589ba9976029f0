//! End-to-end flow tests driving the builder with synthetic key events.

use combo_core::catalog;
use combo_tui::app::{App, InputResult, Step};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rust_decimal::Decimal;
use std::str::FromStr;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn press(app: &mut App, code: KeyCode) {
    let _ = app.handle_input(key(code));
}

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[test]
fn full_flow_from_segment_to_summary() {
    let mut app = App::new(catalog::builtin());
    assert_eq!(app.step, Step::Category);

    // Residential segment, then skip the ready-made combos.
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.step, Step::Profiles);
    for _ in 0..3 {
        press(&mut app, KeyCode::Down);
    }
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.step, Step::Plan);

    // Third residential plan is 800 Mega.
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.cart.plan.as_deref(), Some("res-800"));
    assert_eq!(app.step, Step::Tv);

    press(&mut app, KeyCode::Char(' '));
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.cart.tv.as_deref(), Some("tv-essential"));
    assert_eq!(app.step, Step::Apps);

    press(&mut app, KeyCode::Char(' '));
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.cart.apps, vec!["app-deezer".to_string()]);

    press(&mut app, KeyCode::Enter); // mesh: nothing
    press(&mut app, KeyCode::Enter); // backup: nothing
    assert_eq!(app.step, Step::Summary);

    // 114.90 plan + 10 TV + 10 Deezer under combo pricing.
    assert_eq!(app.summary.steady_monthly_total, d("134.90"));
    assert_eq!(app.summary.introductory_monthly_total, d("109.90"));
    assert!(app.summary.combo_discount.active);
    assert!(app.nudge.is_none());
    assert_eq!(app.removable_lines().len(), 2);
    assert!(app.summary.order_message.contains("*Plano Internet:* 800 Mega (casa)"));

    // Summary hands off to the final message screen, which exits on Enter.
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.step, Step::Done);
    assert!(matches!(
        app.handle_input(key(KeyCode::Enter)),
        InputResult::Quit
    ));
}

#[test]
fn applying_a_profile_fills_the_cart() {
    let mut app = App::new(catalog::builtin());
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.step, Step::Profiles);

    press(&mut app, KeyCode::Enter); // first profile: Combo MUSIC
    assert_eq!(app.step, Step::Plan);
    assert_eq!(app.cart.plan.as_deref(), Some("res-800"));
    assert_eq!(app.cart.apps, vec!["app-deezer".to_string()]);
    assert_eq!(app.cart.active_profile.as_deref(), Some("profile-music"));
}

#[test]
fn business_segment_skips_the_profile_step() {
    let mut app = App::new(catalog::builtin());
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.step, Step::Plan);
    assert_eq!(app.option_rows().len(), 4);
}

#[test]
fn tier_cap_decline_is_reported_not_applied() {
    let mut app = App::new(catalog::builtin());
    press(&mut app, KeyCode::Enter);
    for _ in 0..3 {
        press(&mut app, KeyCode::Down);
    }
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Enter); // res-800
    press(&mut app, KeyCode::Enter); // no TV
    assert_eq!(app.step, Step::Apps);

    // Four Standard-tier apps in a row; the fourth must bounce.
    for _ in 0..3 {
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Down);
    }
    assert_eq!(app.cart.apps.len(), 3);
    press(&mut app, KeyCode::Char(' '));
    assert_eq!(app.cart.apps.len(), 3);
    assert!(app.error_message.as_deref().unwrap_or("").contains("limit"));
}

#[test]
fn summary_supports_removal_and_upgrade() {
    let mut app = App::new(catalog::builtin());
    press(&mut app, KeyCode::Enter);
    for _ in 0..3 {
        press(&mut app, KeyCode::Down);
    }
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Enter); // res-600
    press(&mut app, KeyCode::Char(' '));
    press(&mut app, KeyCode::Enter); // tv-essential
    press(&mut app, KeyCode::Char(' '));
    press(&mut app, KeyCode::Enter); // app-deezer
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.step, Step::Summary);

    let nudge = app.nudge.clone().expect("entry-tier plan should nudge");
    assert_eq!(nudge.target_plan_id, "res-800");
    assert!(nudge.is_cheaper_overall);

    press(&mut app, KeyCode::Char('u'));
    assert_eq!(app.cart.plan.as_deref(), Some("res-800"));
    assert!(app.nudge.is_none());

    // Drop the TV line in place.
    assert_eq!(app.removable_lines().len(), 2);
    press(&mut app, KeyCode::Char('d'));
    assert!(app.cart.tv.is_none());
    assert_eq!(app.removable_lines().len(), 1);
}

#[test]
fn quit_and_clear_work_from_any_step() {
    let mut app = App::new(catalog::builtin());
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Enter); // apply Combo MUSIC
    assert!(app.cart.has_plan());

    press(&mut app, KeyCode::Char('c'));
    assert!(app.cart.is_empty());
    assert_eq!(app.step, Step::Category);

    assert!(matches!(
        app.handle_input(key(KeyCode::Char('q'))),
        InputResult::Quit
    ));
}
