#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow truncation when casting from usize to i32 since particle coordinates are always small enough to fit in i32
    clippy::cast_possible_truncation,
    // Allow sign loss when going from signed to unsigned types since we validate values are non-negative before casting
    clippy::cast_sign_loss,
    // Allow precision loss when casting between numeric types since exact precision isn't critical for particle effects
    clippy::cast_precision_loss,
    // Allow potential wrapping when casting between types of same size as we validate values are in range
    clippy::cast_possible_wrap
)]

use bevy_ecs::prelude::*;
use log::{debug, trace};
use ratatui::style::Color;

use crate::components::{Particle, Pos, PowerUpKind};
use crate::screenshake;

const PARTICLES_PER_CELL: usize = 6;

/// Burst of sparks on every cell a match destroyed.
pub fn spawn_destruction_particles(world: &mut World, cells: &[Pos]) {
    debug!("Spawning destruction particles for {} cells", cells.len());

    // Bigger clears get warmer colors
    let color = match cells.len() {
        0..=3 => Color::White,
        4 => Color::LightBlue,
        5 => Color::LightGreen,
        _ => Color::LightYellow,
    };

    for &cell in cells {
        for _ in 0..PARTICLES_PER_CELL {
            let vx = (fastrand::f32() - 0.5) * 4.0;
            let vy = (fastrand::f32() - 0.7) * 4.0; // Bias upward
            spawn_particle(
                world,
                cell,
                (vx, vy),
                color,
                fastrand::f32() * 0.8 + 0.2,
                fastrand::f32() * 0.8 + 0.2,
            );
        }
    }
}

/// Directed spray along a power-up's footprint.
pub fn spawn_blast_particles(world: &mut World, kind: PowerUpKind, origin: Pos, cells: &[Pos]) {
    trace!("Spawning blast particles for {kind:?} at {origin}");

    let color = match kind {
        PowerUpKind::HorizontalRocket | PowerUpKind::VerticalRocket => Color::Cyan,
        PowerUpKind::Tnt => Color::LightRed,
        PowerUpKind::ColorBomb => Color::Magenta,
        PowerUpKind::FlyAway => Color::White,
    };

    for &cell in cells {
        // Particles fly outward from the origin of the blast
        let dx = cell.col as f32 - origin.col as f32;
        let dy = cell.row as f32 - origin.row as f32;
        let norm = (dx * dx + dy * dy).sqrt().max(1.0);

        for _ in 0..3 {
            let vx = dx / norm * 3.0 + (fastrand::f32() - 0.5) * 2.0;
            let vy = dy / norm * 3.0 + (fastrand::f32() - 0.5) * 2.0;
            spawn_particle(
                world,
                cell,
                (vx, vy),
                color,
                fastrand::f32() * 0.6 + 0.2,
                fastrand::f32() * 0.7 + 0.3,
            );
        }
    }
}

/// A trail from the fly-away's origin to where it lands.
pub fn spawn_flight_particles(world: &mut World, from: Pos, to: Pos) {
    debug!("Spawning flight trail from {from} to {to}");

    const TRAIL_STEPS: usize = 12;
    for step in 0..=TRAIL_STEPS {
        let t = step as f32 / TRAIL_STEPS as f32;
        let x = from.col as f32 + (to.col as f32 - from.col as f32) * t;
        let y = from.row as f32 + (to.row as f32 - from.row as f32) * t;

        world.spawn(Particle {
            x,
            y,
            velocity: (
                (fastrand::f32() - 0.5) * 0.8,
                (fastrand::f32() - 0.5) * 0.8,
            ),
            color: Color::White,
            lifetime: 0.2 + t * 0.4, // The head of the trail outlives the tail
            size: 0.4 + fastrand::f32() * 0.4,
        });
    }
}

/// A small ring where a new power-up appeared.
pub fn spawn_power_up_particles(world: &mut World, kind: PowerUpKind, pos: Pos) {
    trace!("Spawning power-up particles for {kind:?}");

    for _ in 0..10 {
        let angle = fastrand::f32() * std::f32::consts::TAU;
        let speed = 1.5 + fastrand::f32();
        spawn_particle(
            world,
            pos,
            (angle.cos() * speed, angle.sin() * speed),
            Color::Yellow,
            fastrand::f32() * 0.5 + 0.3,
            fastrand::f32() * 0.5 + 0.3,
        );
    }
}

pub fn update_particles(world: &mut World, delta_seconds: f32) {
    // First update all particle lifetimes and collect entities to despawn
    let mut entities_to_despawn = Vec::new();

    for (entity, mut particle) in world.query::<(Entity, &mut Particle)>().iter_mut(world) {
        particle.lifetime -= delta_seconds;
        if particle.lifetime <= 0.0 {
            entities_to_despawn.push(entity);
        }
    }

    for entity in entities_to_despawn {
        world.despawn(entity);
    }

    // Update remaining particles
    for (_, mut particle) in world.query::<(Entity, &mut Particle)>().iter_mut(world) {
        particle.x += particle.velocity.0 * delta_seconds;
        particle.y += particle.velocity.1 * delta_seconds;

        // Slow down velocity over time (friction)
        particle.velocity.0 *= 0.95;
        particle.velocity.1 *= 0.95;

        // Add some gravity
        particle.velocity.1 += delta_seconds * 1.0;

        // Gradually shrink as lifetime runs out for a smoother fade
        let fade_factor = particle.lifetime.min(1.0);
        particle.size *= 0.6 + 0.4 * fade_factor * fade_factor;
    }

    // Update screen shake using the dedicated module
    screenshake::update_screen_shake(world, delta_seconds);
}

// Helper function to spawn a single particle
fn spawn_particle(
    world: &mut World,
    cell: Pos,
    velocity: (f32, f32),
    color: Color,
    lifetime: f32,
    size: f32,
) {
    let adjusted_size = size * (0.7 + fastrand::f32() * 0.6);

    world.spawn(Particle {
        x: cell.col as f32,
        y: cell.row as f32,
        velocity,
        color,
        lifetime,
        size: adjusted_size,
    });
}
