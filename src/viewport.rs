//! Fit viewport: maps device pixels to the fixed logical playfield
//!
//! The playfield keeps its aspect ratio and is letterboxed inside the
//! screen. Screen coordinates have their origin top-left with y down;
//! world coordinates have their origin bottom-left with y up.

use glam::Vec2;

#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// Logical playfield size
    world: Vec2,
    /// Screen size in pixels
    screen: Vec2,
    /// Pixels per world unit
    scale: f32,
    /// Letterbox offset in pixels (left, bottom)
    offset: Vec2,
}

impl Viewport {
    pub fn new(world_width: f32, world_height: f32) -> Self {
        let world = Vec2::new(world_width, world_height);
        // 1 pixel per unit until the first resize
        Self {
            world,
            screen: world,
            scale: 1.0,
            offset: Vec2::ZERO,
        }
    }

    /// Recompute the mapping for a new screen size; zero sizes are ignored
    pub fn update(&mut self, screen_width: u32, screen_height: u32) {
        if screen_width == 0 || screen_height == 0 {
            return;
        }
        self.screen = Vec2::new(screen_width as f32, screen_height as f32);
        self.scale = (self.screen.x / self.world.x).min(self.screen.y / self.world.y);
        self.offset = (self.screen - self.world * self.scale) / 2.0;
    }

    pub fn world_size(&self) -> Vec2 {
        self.world
    }

    pub fn screen_size(&self) -> Vec2 {
        self.screen
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Screen pixel -> world position. Points in the letterbox map outside
    /// the playfield; the simulation clamps what it uses.
    pub fn unproject(&self, screen: Vec2) -> Vec2 {
        let flipped = Vec2::new(screen.x, self.screen.y - screen.y);
        (flipped - self.offset) / self.scale
    }

    /// World position -> screen pixel
    pub fn project(&self, world: Vec2) -> Vec2 {
        let p = world * self.scale + self.offset;
        Vec2::new(p.x, self.screen.y - p.y)
    }

    /// World position -> normalized device coordinates (-1 to 1, y up)
    pub fn world_to_ndc(&self, world: Vec2) -> Vec2 {
        let p = world * self.scale + self.offset;
        p / self.screen * 2.0 - Vec2::ONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_exact_fit() {
        let mut vp = Viewport::new(64.0, 40.0);
        vp.update(640, 400);
        assert_eq!(vp.scale(), 10.0);
        assert!(close(vp.unproject(Vec2::new(320.0, 200.0)), Vec2::new(32.0, 20.0)));
        // Top-left pixel is the top-left of the playfield
        assert!(close(vp.unproject(Vec2::ZERO), Vec2::new(0.0, 40.0)));
        assert!(close(vp.unproject(Vec2::new(0.0, 400.0)), Vec2::ZERO));
    }

    #[test]
    fn test_pillarbox() {
        let mut vp = Viewport::new(64.0, 40.0);
        vp.update(1280, 400);
        assert_eq!(vp.scale(), 10.0);
        // 320px bars on each side
        assert!(close(vp.unproject(Vec2::new(320.0, 400.0)), Vec2::ZERO));
        assert!(close(vp.unproject(Vec2::new(960.0, 0.0)), Vec2::new(64.0, 40.0)));
        assert!(vp.unproject(Vec2::new(10.0, 200.0)).x < 0.0);
    }

    #[test]
    fn test_letterbox() {
        let mut vp = Viewport::new(64.0, 40.0);
        vp.update(640, 800);
        assert_eq!(vp.scale(), 10.0);
        assert!(close(vp.unproject(Vec2::new(0.0, 600.0)), Vec2::ZERO));
    }

    #[test]
    fn test_project_inverts_unproject() {
        let mut vp = Viewport::new(64.0, 40.0);
        vp.update(1024, 768);
        let world = Vec2::new(12.5, 33.0);
        assert!(close(vp.unproject(vp.project(world)), world));
    }

    #[test]
    fn test_ndc_corners() {
        let mut vp = Viewport::new(64.0, 40.0);
        vp.update(640, 400);
        assert!(close(vp.world_to_ndc(Vec2::ZERO), Vec2::new(-1.0, -1.0)));
        assert!(close(vp.world_to_ndc(Vec2::new(64.0, 40.0)), Vec2::ONE));
    }

    #[test]
    fn test_zero_size_ignored() {
        let mut vp = Viewport::new(64.0, 40.0);
        vp.update(640, 400);
        vp.update(0, 400);
        assert_eq!(vp.scale(), 10.0);
        assert_eq!(vp.screen_size(), Vec2::new(640.0, 400.0));
    }
}
