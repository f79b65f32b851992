//! Schematic floor layouts
//!
//! Every floor gets the same five-room template laid out on an abstract
//! 0-100 grid. The template does not depend on the built-up area.

use std::fmt;

use tracing::debug;

use crate::models::{FloorPlan, Room};

struct RoomTemplate {
    name: &'static str,
    x: u32,
    y: u32,
    w: u32,
    h: u32,
    color: &'static str,
}

const LAYOUT_TEMPLATE: [RoomTemplate; 5] = [
    RoomTemplate { name: "Living Hall", x: 0, y: 40, w: 60, h: 60, color: "#3b82f6" },
    RoomTemplate { name: "Kitchen", x: 60, y: 40, w: 40, h: 60, color: "#ef4444" },
    RoomTemplate { name: "Master Bed", x: 0, y: 0, w: 50, h: 40, color: "#10b981" },
    RoomTemplate { name: "Bedroom 2", x: 50, y: 0, w: 30, h: 40, color: "#8b5cf6" },
    RoomTemplate { name: "Bath", x: 80, y: 0, w: 20, h: 40, color: "#06b6d4" },
];

/// Label of the floor at `index`, counting the ground floor as 0
pub fn floor_name(index: usize) -> String {
    if index == 0 {
        "Ground Floor".to_string()
    } else {
        format!("Floor {}", index)
    }
}

fn template_rooms() -> Vec<Room> {
    LAYOUT_TEMPLATE
        .iter()
        .map(|t| Room {
            name: t.name.to_string(),
            x: t.x,
            y: t.y,
            w: t.w,
            h: t.h,
            color: t.color.to_string(),
        })
        .collect()
}

/// Generate one floor plan per floor
///
/// A floor count of zero or below yields no floors.
pub fn generate_blueprint(num_floors: i64) -> Vec<FloorPlan> {
    let count = usize::try_from(num_floors).unwrap_or(0);
    debug!(num_floors, "generating blueprint");

    (0..count)
        .map(|i| FloorPlan {
            floor_name: floor_name(i),
            rooms: template_rooms(),
        })
        .collect()
}

/// Escape text for use inside SVG markup
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a floor plan as a standalone SVG document
///
/// Rooms are drawn as translucent rectangles in their own color with the
/// room name centered inside.
pub fn render_svg(plan: &FloorPlan) -> String {
    let mut svg = String::new();
    svg.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="-5 -5 110 110">"#);
    svg.push('\n');
    svg.push_str(&format!("  <title>{}</title>\n", escape_xml(&plan.floor_name)));
    svg.push_str(concat!(
        r##"  <rect width="100%" height="100%" fill="#111827""##,
        r##" stroke="#374151" stroke-width="0.5"/>"##,
    ));
    svg.push('\n');

    for room in &plan.rooms {
        let color = escape_xml(&room.color);
        svg.push_str(&format!(
            concat!(
                "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"",
                " fill-opacity=\"0.3\" stroke=\"{}\" stroke-width=\"0.5\"/>\n",
            ),
            room.x, room.y, room.w, room.h, color, color
        ));
        svg.push_str(&format!(
            concat!(
                "  <text x=\"{}\" y=\"{}\" text-anchor=\"middle\"",
                " fill=\"white\" font-size=\"3\">{}</text>\n",
            ),
            room.x as f64 + room.w as f64 / 2.0,
            room.y as f64 + room.h as f64 / 2.0,
            escape_xml(&room.name)
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

impl fmt::Display for FloorPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.floor_name)?;
        for room in &self.rooms {
            writeln!(
                f,
                "  {:<12} at ({:>3},{:>3})  {:>3} x {:<3} {}",
                room.name, room.x, room.y, room.w, room.h, room.color
            )?;
        }
        Ok(())
    }
}
