use egui::Color32;

use crate::models::event::EventType;

fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

fn blend(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |c1: u8, c2: u8| -> u8 { ((c1 as f32 * (1.0 - t)) + (c2 as f32 * t)).round() as u8 };
    Color32::from_rgb(lerp(a.r(), b.r()), lerp(a.g(), b.g()), lerp(a.b(), b.b()))
}

/// Parse a hex color string to Color32.
pub fn parse_color(hex: &str) -> Option<Color32> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }

    let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
    let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
    let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;

    Some(Color32::from_rgb(r, g, b))
}

fn event_type_hex(event_type: EventType) -> &'static str {
    match event_type {
        EventType::Class => "#3b82f6",
        EventType::Meeting => "#8b5cf6",
        EventType::OfficeHours => "#10b981",
        EventType::Exam => "#ef4444",
        EventType::Other => "#6b7280",
    }
}

pub fn event_color(event_type: EventType) -> Color32 {
    parse_color(event_type_hex(event_type)).unwrap_or(Color32::from_rgb(100, 150, 200))
}

/// Fill color for an event block; past events are dimmed.
pub fn event_fill(event_type: EventType, is_past: bool) -> Color32 {
    let base_color = event_color(event_type);
    if is_past {
        Color32::from_rgba_unmultiplied(
            (base_color.r() as f32 * 0.4) as u8,
            (base_color.g() as f32 * 0.4) as u8,
            (base_color.b() as f32 * 0.4) as u8,
            140,
        )
    } else {
        base_color
    }
}

pub fn event_text(is_past: bool) -> Color32 {
    if is_past {
        Color32::from_rgba_unmultiplied(255, 255, 255, 180)
    } else {
        Color32::WHITE
    }
}

#[derive(Clone, Copy)]
pub(crate) struct TimeGridPalette {
    pub axis_bg: Color32,
    pub column_bg: Color32,
    pub today_bg: Color32,
    pub header_bg: Color32,
    pub header_text: Color32,
    pub label_text: Color32,
    pub hour_line: Color32,
    pub slot_line: Color32,
    pub selection: Color32,
    pub now_line: Color32,
}

impl TimeGridPalette {
    pub fn from_visuals(visuals: &egui::Visuals) -> Self {
        let background = visuals.panel_fill;
        let border = visuals.widgets.noninteractive.bg_stroke.color;
        let accent = visuals.selection.bg_fill;
        Self {
            axis_bg: blend(background, visuals.extreme_bg_color, 0.4),
            column_bg: background,
            today_bg: blend(background, accent, 0.12),
            header_bg: visuals.faint_bg_color,
            header_text: visuals.strong_text_color(),
            label_text: Color32::GRAY,
            hour_line: border,
            slot_line: with_alpha(border, 110),
            selection: with_alpha(accent, if visuals.dark_mode { 110 } else { 80 }),
            now_line: Color32::from_rgb(255, 100, 100),
        }
    }
}
