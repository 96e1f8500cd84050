//! Decorative floating points drawn on the `#particulas-fondo` canvas.

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use rand::Rng;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use crate::config::ParticleConfig;
use crate::error::EnhanceError;
use crate::utils::dom;

pub const CANVAS_ID: &str = "particulas-fondo";

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub dx: f64,
    pub dy: f64,
    pub alpha: f64,
    pub color: String,
}

impl Particle {
    pub fn random<R: Rng>(rng: &mut R, width: f64, height: f64, config: &ParticleConfig) -> Self {
        let color = if rng.gen::<f64>() < config.secondary_ratio {
            config.secondary_color.clone()
        } else {
            config.primary_color.clone()
        };
        Self {
            x: rng.gen::<f64>() * width,
            y: rng.gen::<f64>() * height,
            radius: rng.gen::<f64>() * 1.5 + 0.4,
            dx: (rng.gen::<f64>() - 0.5) * config.speed,
            dy: (rng.gen::<f64>() - 0.5) * config.speed,
            alpha: rng.gen::<f64>() * 0.4 + 0.1,
            color,
        }
    }

    /// Moves by one frame of velocity, bouncing off the edges of
    /// `[0, width] x [0, height]`.
    pub fn step(&mut self, width: f64, height: f64) {
        self.x += self.dx;
        self.y += self.dy;
        bounce(&mut self.x, &mut self.dx, width);
        bounce(&mut self.y, &mut self.dy, height);
    }
}

// Mirrors an overshoot back inside. Anything still outside (the surface
// shrank under it) is pinned to the edge and sent back inward.
fn bounce(pos: &mut f64, vel: &mut f64, max: f64) {
    let max = max.max(0.0);
    if *pos < 0.0 {
        *pos = -*pos;
        *vel = vel.abs();
    } else if *pos > max {
        *pos = 2.0 * max - *pos;
        *vel = -vel.abs();
    }
    if *pos < 0.0 {
        *pos = 0.0;
        *vel = vel.abs();
    } else if *pos > max {
        *pos = max;
        *vel = -vel.abs();
    }
}

#[derive(Debug, Clone)]
pub struct ParticleField {
    pub particles: Vec<Particle>,
    width: f64,
    height: f64,
}

impl ParticleField {
    pub fn new<R: Rng>(rng: &mut R, width: f64, height: f64, config: &ParticleConfig) -> Self {
        let particles = (0..config.count)
            .map(|_| Particle::random(rng, width, height, config))
            .collect();
        Self {
            particles,
            width,
            height,
        }
    }

    /// Changes the drawable area. Particles keep their positions.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    #[cfg(test)]
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn step(&mut self) {
        let (width, height) = (self.width, self.height);
        for p in &mut self.particles {
            p.step(width, height);
        }
    }

    fn draw(&self, ctx: &CanvasRenderingContext2d) -> Result<(), EnhanceError> {
        ctx.clear_rect(0.0, 0.0, self.width, self.height);
        for p in &self.particles {
            ctx.begin_path();
            ctx.arc(p.x, p.y, p.radius, 0.0, TAU)?;
            ctx.set_fill_style_str(&p.color);
            ctx.set_global_alpha(p.alpha);
            ctx.fill();
        }
        ctx.set_global_alpha(1.0);
        Ok(())
    }
}

fn viewport_size(window: &Window) -> Result<(f64, f64), EnhanceError> {
    let width = window.inner_width()?.as_f64().unwrap_or(0.0);
    let height = window.inner_height()?.as_f64().unwrap_or(0.0);
    Ok((width, height))
}

fn fit_canvas(canvas: &HtmlCanvasElement, window: &Window) -> Result<(f64, f64), EnhanceError> {
    let (width, height) = viewport_size(window)?;
    canvas.set_width(width as u32);
    canvas.set_height(height as u32);
    Ok((width, height))
}

pub fn init(config: &ParticleConfig) -> Result<(), EnhanceError> {
    let window = dom::window()?;
    let document = dom::document()?;
    let canvas: HtmlCanvasElement = dom::by_id(&document, CANVAS_ID)?;
    let ctx = canvas
        .get_context("2d")?
        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
        .ok_or(EnhanceError::NoCanvasContext)?;

    let (width, height) = fit_canvas(&canvas, &window)?;
    let field = Rc::new(RefCell::new(ParticleField::new(
        &mut rand::thread_rng(),
        width,
        height,
        config,
    )));

    {
        let field = field.clone();
        let win = window.clone();
        dom::listen(window.as_ref(), "resize", move |_: web_sys::Event| {
            match fit_canvas(&canvas, &win) {
                Ok((width, height)) => field.borrow_mut().resize(width, height),
                Err(e) => log::warn!("Failed to resize particle canvas: {}", e),
            }
        })?;
    }

    log::info!("Particle field started with {} particles", config.count);
    dom::animation_loop(&window, move |_| {
        let mut field = field.borrow_mut();
        if let Err(e) = field.draw(&ctx) {
            log::error!("Particle frame failed: {}", e);
            return false;
        }
        field.step();
        true
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn in_bounds(field: &ParticleField) -> bool {
        let (w, h) = field.size();
        field
            .particles
            .iter()
            .all(|p| (0.0..=w).contains(&p.x) && (0.0..=h).contains(&p.y))
    }

    #[test]
    fn spawns_configured_count_within_ranges() {
        let mut rng = SmallRng::seed_from_u64(7);
        let config = ParticleConfig::default();
        let field = ParticleField::new(&mut rng, 800.0, 600.0, &config);
        assert_eq!(field.particles.len(), 55);
        assert!(in_bounds(&field));
        for p in &field.particles {
            assert!((0.4..1.9).contains(&p.radius));
            assert!((0.1..0.5).contains(&p.alpha));
            assert!(p.dx.abs() <= 0.175 && p.dy.abs() <= 0.175);
            assert!(p.color == "#D4A017" || p.color == "#A8D8EA");
        }
    }

    #[test]
    fn stays_in_bounds_over_many_frames() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut config = ParticleConfig::default();
        config.speed = 40.0;
        let mut field = ParticleField::new(&mut rng, 320.0, 200.0, &config);
        for _ in 0..5_000 {
            field.step();
            assert!(in_bounds(&field));
        }
    }

    #[test]
    fn bounces_off_right_edge() {
        let mut p = Particle {
            x: 99.9,
            y: 10.0,
            radius: 1.0,
            dx: 0.3,
            dy: 0.0,
            alpha: 0.5,
            color: "#D4A017".to_string(),
        };
        p.step(100.0, 50.0);
        assert!(p.x <= 100.0);
        assert!((p.x - 99.8).abs() < 1e-9);
        assert!(p.dx < 0.0);
    }

    #[test]
    fn bounces_off_top_edge() {
        let mut p = Particle {
            x: 10.0,
            y: 0.1,
            radius: 1.0,
            dx: 0.0,
            dy: -0.2,
            alpha: 0.5,
            color: "#A8D8EA".to_string(),
        };
        p.step(100.0, 50.0);
        assert!(p.y >= 0.0);
        assert!(p.dy > 0.0);
    }

    #[test]
    fn shrinking_surface_pulls_particles_back_inside() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut field = ParticleField::new(&mut rng, 1920.0, 1080.0, &ParticleConfig::default());
        field.resize(400.0, 300.0);
        field.step();
        assert!(in_bounds(&field));
        for p in field.particles.iter().filter(|p| p.x == 400.0) {
            assert!(p.dx <= 0.0);
        }
    }

    #[test]
    fn all_secondary_when_ratio_is_one() {
        let mut rng = SmallRng::seed_from_u64(1);
        let config = ParticleConfig {
            secondary_ratio: 1.0,
            ..ParticleConfig::default()
        };
        let field = ParticleField::new(&mut rng, 10.0, 10.0, &config);
        assert!(field.particles.iter().all(|p| p.color == "#A8D8EA"));
    }
}
