//! Parallax background motion
//!
//! Runs every frame in every phase so the title screen has ambient motion.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::random_range;

const CLOUD_COUNT: usize = 8;
const STAR_COUNT: usize = 100;
/// Clouds wrap once this far off either edge
const CLOUD_WRAP: f32 = 200.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Cloud {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub speed: f32,
}

/// Menu starfield point
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub size: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Backdrop {
    /// Dune scroll offset, wraps modulo canvas width
    pub scroll: f32,
    pub clouds: Vec<Cloud>,
    pub stars: Vec<Star>,
}

impl Backdrop {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let clouds = (0..CLOUD_COUNT)
            .map(|_| Cloud {
                x: random_range(rng, 0.0, CANVAS_WIDTH),
                y: random_range(rng, 0.0, CANVAS_HEIGHT * 0.4),
                scale: random_range(rng, 0.5, 1.0),
                speed: random_range(rng, 0.2, 0.5),
            })
            .collect();
        let stars = (0..STAR_COUNT)
            .map(|_| Star {
                x: random_range(rng, 0.0, CANVAS_WIDTH),
                y: random_range(rng, 0.0, CANVAS_HEIGHT),
                speed: random_range(rng, 0.5, 3.5),
                size: random_range(rng, 0.0, 2.0),
            })
            .collect();
        Self {
            scroll: 0.0,
            clouds,
            stars,
        }
    }

    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.scroll = (self.scroll + SCROLL_SPEED) % CANVAS_WIDTH;

        for cloud in &mut self.clouds {
            cloud.x -= cloud.speed;
            if cloud.x < -CLOUD_WRAP {
                cloud.x = CANVAS_WIDTH + CLOUD_WRAP;
            }
        }

        for star in &mut self.stars {
            star.x -= star.speed;
            if star.x < 0.0 {
                star.x = CANVAS_WIDTH;
                star.y = random_range(rng, 0.0, CANVAS_HEIGHT);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_scroll_wraps() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut backdrop = Backdrop::new(&mut rng);
        for _ in 0..1000 {
            backdrop.advance(&mut rng);
            assert!(backdrop.scroll >= 0.0 && backdrop.scroll < CANVAS_WIDTH);
        }
    }

    #[test]
    fn test_clouds_wrap_to_right_edge() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut backdrop = Backdrop::new(&mut rng);
        backdrop.clouds[0].x = -CLOUD_WRAP + 0.1;
        backdrop.clouds[0].speed = 0.5;
        backdrop.advance(&mut rng);
        assert_eq!(backdrop.clouds[0].x, CANVAS_WIDTH + CLOUD_WRAP);
    }
}
