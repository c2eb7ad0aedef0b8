use crate::config::CREDIT_LINE;
use crate::geometry::{Rect, Viewport};
use crate::scoring::Session;
use crate::surface::{Align, Baseline, Surface, TextStyle};

const PANEL_X: f64 = 15.0;
const PANEL_Y: f64 = 20.0;
const PANEL_PADDING: f64 = 12.0;
const LINE_HEIGHT: f64 = 28.0;
const HUD_FONT: &str = "24px Arial";

fn hud_text(color: &str) -> TextStyle<'_> {
    TextStyle {
        font: HUD_FONT,
        color,
        align: Align::Left,
        baseline: Baseline::Top,
    }
}

pub fn draw_score_panel(surface: &mut dyn Surface, session: &Session) {
    let lines = [
        (format!("Score: {}", session.score), "white"),
        (format!("Best: {}", session.best_score), "yellow"),
        (format!("Level: {}", session.level), "cyan"),
    ];

    let widest = lines
        .iter()
        .map(|(text, _)| surface.measure_text(text, HUD_FONT))
        .fold(0.0, f64::max);

    surface.fill_rect(
        Rect::new(
            PANEL_X,
            PANEL_Y,
            widest + PANEL_PADDING * 2.0,
            LINE_HEIGHT * lines.len() as f64 + PANEL_PADDING * 2.0,
        ),
        "rgba(0, 0, 0, 0.6)",
    );

    let x = PANEL_X + PANEL_PADDING;
    let mut y = PANEL_Y + PANEL_PADDING;
    for (text, color) in &lines {
        surface.fill_text(text, x, y, hud_text(color));
        y += LINE_HEIGHT;
    }
}

pub fn draw_level_popup(surface: &mut dyn Surface, session: &Session, viewport: &Viewport) {
    if !session.popup_visible() {
        return;
    }
    surface.fill_text(
        &format!("LEVEL {}", session.level),
        viewport.center_x(),
        viewport.height * 0.5 - 100.0,
        TextStyle {
            font: "60px Arial",
            color: "white",
            align: Align::Center,
            baseline: Baseline::Alphabetic,
        },
    );
}

pub fn draw_game_over(surface: &mut dyn Surface, viewport: &Viewport) {
    surface.fill_text(
        "GAME OVER",
        viewport.center_x(),
        viewport.height * 0.5,
        TextStyle {
            font: "64px Arial",
            color: "yellow",
            align: Align::Center,
            baseline: Baseline::Middle,
        },
    );
    surface.fill_text(
        "Press Enter or tap to play again",
        viewport.center_x(),
        viewport.height * 0.5 + 56.0,
        TextStyle {
            font: "24px Arial",
            color: "white",
            align: Align::Center,
            baseline: Baseline::Middle,
        },
    );
}

pub fn draw_credit(surface: &mut dyn Surface, viewport: &Viewport) {
    surface.fill_text(
        CREDIT_LINE,
        20.0,
        viewport.height - 20.0,
        TextStyle {
            font: "18px Arial",
            color: "rgba(0, 0, 0, 0.7)",
            align: Align::Left,
            baseline: Baseline::Bottom,
        },
    );
}
