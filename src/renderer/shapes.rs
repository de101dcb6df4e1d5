//! Shape generation for 2D primitives, in world coordinates

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::sim::{Bucket, Droplet, GamePhase, GameState, Rect};

/// Two triangles covering `rect`
pub fn rect(rect: &Rect, color: [f32; 4]) -> [Vertex; 6] {
    gradient_rect(rect, color, color)
}

/// Rectangle with a vertical color gradient
pub fn gradient_rect(rect: &Rect, bottom: [f32; 4], top: [f32; 4]) -> [Vertex; 6] {
    let (x0, y0, x1, y1) = (rect.x, rect.y, rect.right(), rect.top());
    [
        Vertex::new(x0, y0, bottom),
        Vertex::new(x1, y0, bottom),
        Vertex::new(x1, y1, top),
        Vertex::new(x0, y0, bottom),
        Vertex::new(x1, y1, top),
        Vertex::new(x0, y1, top),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Bucket body with a lighter rim along the top edge
pub fn bucket(bucket: &Bucket) -> Vec<Vertex> {
    let body = bucket.rect();
    let rim_height = (body.height * 0.15).min(1.0);
    let rim = Rect::new(body.x, body.top() - rim_height, body.width, rim_height);

    let mut vertices = Vec::with_capacity(12);
    vertices.extend(rect(&body, colors::BUCKET));
    vertices.extend(rect(&rim, colors::BUCKET_RIM));
    vertices
}

/// Teardrop: round base with a pointed tip, filling the droplet's box
pub fn droplet(droplet: &Droplet) -> Vec<Vertex> {
    let r = droplet.rect();
    let radius = r.width / 3.0;
    let center = Vec2::new(r.x + r.width / 2.0, r.y + radius);

    let mut vertices = circle(center, radius, colors::DROPLET, 12);
    vertices.push(Vertex::new(center.x - radius, center.y, colors::DROPLET));
    vertices.push(Vertex::new(center.x + radius, center.y, colors::DROPLET));
    vertices.push(Vertex::new(center.x, r.top(), colors::DROPLET));
    vertices
}

/// Restart control: button face with a "play" arrow
pub fn restart_button(bounds: &Rect) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(9);
    vertices.extend(rect(bounds, colors::RESTART));

    let c = bounds.center();
    let h = bounds.height * 0.3;
    vertices.push(Vertex::new(c.x - h * 0.8, c.y - h, colors::RESTART_ICON));
    vertices.push(Vertex::new(c.x + h, c.y, colors::RESTART_ICON));
    vertices.push(Vertex::new(c.x - h * 0.8, c.y + h, colors::RESTART_ICON));
    vertices
}

/// Everything the renderer draws for the current frame
pub fn scene(state: &GameState) -> Vec<Vertex> {
    let tuning = &state.tuning;
    match state.phase {
        GamePhase::Playing => {
            let field = Rect::new(0.0, 0.0, tuning.playfield_width, tuning.playfield_height);
            let mut vertices = Vec::with_capacity(18 + state.droplets.len() * 39);
            vertices.extend(gradient_rect(&field, colors::SKY_BOTTOM, colors::SKY_TOP));
            vertices.extend(bucket(&state.bucket));
            for drop in &state.droplets {
                vertices.extend(droplet(drop));
            }
            vertices
        }
        GamePhase::GameOver => restart_button(&tuning.restart_bounds()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_covers_corners() {
        let verts = rect(&Rect::new(1.0, 2.0, 3.0, 4.0), colors::BUCKET);
        let xs: Vec<f32> = verts.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = verts.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 1.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 4.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 2.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 6.0);
    }

    #[test]
    fn test_droplet_stays_in_its_box() {
        let drop = Droplet {
            id: 1,
            pos: Vec2::new(10.0, 20.0),
            size: 6.0,
        };
        for v in droplet(&drop) {
            assert!(v.position[0] >= 10.0 - 1e-4 && v.position[0] <= 16.0 + 1e-4);
            assert!(v.position[1] >= 20.0 - 1e-4 && v.position[1] <= 26.0 + 1e-4);
        }
    }

    #[test]
    fn test_scene_playing() {
        let mut state = GameState::new(3);
        let empty = scene(&state).len();
        assert_eq!(empty, 18);

        state.spawn_droplet();
        state.spawn_droplet();
        assert_eq!(scene(&state).len(), empty + 2 * 39);
    }

    #[test]
    fn test_scene_game_over_shows_restart() {
        let mut state = GameState::new(3);
        state.spawn_droplet();
        state.phase = GamePhase::GameOver;
        let bounds = state.tuning.restart_bounds();
        let verts = scene(&state);
        assert_eq!(verts.len(), 9);
        for v in verts {
            assert!(bounds.contains(Vec2::new(v.position[0], v.position[1])));
        }
    }
}
