//! Read-only frame data handed to whatever draws the range.

use engine_core::Rgb;
use glam::Vec2;

pub const HELP_TEXT: &str = "Drag magazine to detach, Press R to reattach";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GunView {
    pub position: Vec2,
    /// Degrees.
    pub angle: f32,
    pub color: Rgb,
    pub barrel_end: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagazineView {
    pub position: Vec2,
    pub attached: bool,
    /// Cartridges to draw inside the magazine; zero while detached.
    pub rounds_visible: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleView {
    pub position: Vec2,
    pub color: Rgb,
    pub size: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetView {
    pub position: Vec2,
    pub radius: f32,
    /// Draw an explosion instead of rings.
    pub hit: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub gun: GunView,
    pub magazine: MagazineView,
    pub muzzle_flash: Vec<ParticleView>,
    pub bullets: Vec<Vec2>,
    pub targets: Vec<TargetView>,
    pub score: u32,
    pub status: &'static str,
}

impl FrameSnapshot {
    /// Score, magazine status and help line, top to bottom.
    pub fn hud_lines(&self) -> [String; 3] {
        [
            format!("Score: {}", self.score),
            format!("Magazine: {}", self.status),
            HELP_TEXT.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hud_shows_score_and_status() {
        let snapshot = FrameSnapshot {
            gun: GunView {
                position: Vec2::ZERO,
                angle: 0.0,
                color: Rgb::GRAY,
                barrel_end: Vec2::new(80.0, 0.0),
            },
            magazine: MagazineView {
                position: Vec2::new(-20.0, 30.0),
                attached: false,
                rounds_visible: 0,
            },
            muzzle_flash: Vec::new(),
            bullets: Vec::new(),
            targets: Vec::new(),
            score: 4,
            status: "Detached",
        };
        let [score, status, help] = snapshot.hud_lines();
        assert_eq!(score, "Score: 4");
        assert_eq!(status, "Magazine: Detached");
        assert_eq!(help, "Drag magazine to detach, Press R to reattach");
    }
}
