//! Frame driver for the swarm.
//!
//! One [`Simulation::step`] is one tick: spawn from input, advance the
//! projectile list, update every particle in parallel, then pack the output
//! buffer. The projectile list is finished before the particle pass starts
//! and is only read during it. Particle state lives in parallel arrays that
//! are cut into one contiguous chunk per worker, so each index is written by
//! exactly one task and no locking is needed.

use crate::entity::{spawn_at_edge, spawn_in_arena, Liveness, Particle};
use crate::field::{apply_projectiles, field_scale, Barrier};
use crate::physics::{integrate, Arena};
use crate::projectile::{Projectile, ProjectileList};
use crate::rng::Lcg;
use crate::routing::Route;
use log::info;
use rayon::prelude::*;
use shared::config::{DT, EMPTY_PROJECTILE_SLOT, MAX_PROJECTILES, RESPAWN_MAX, RESPAWN_MIN};
use shared::{output_len, InputFrame};

/// Read-only inputs shared by every particle during one tick.
struct TickContext<'a> {
    arena: Arena,
    frame: u32,
    projectiles: &'a [Projectile],
    field_scale: f32,
    barrier: Option<Barrier>,
}

impl TickContext<'_> {
    fn update(&self, index: u32, particle: &mut Particle, liveness: &mut Liveness, route: &mut Route) {
        if liveness.advance(DT) {
            let mut rng = Lcg::for_respawn(index, self.frame);
            (*particle, *route) = spawn_at_edge(&mut rng, self.arena);
        } else if !liveness.is_alive() {
            particle.park();
            return;
        }

        if let Some(slot) = apply_projectiles(particle, self.projectiles, self.field_scale, DT) {
            let mut rng = Lcg::for_kill(index, self.frame, slot as u32);
            *liveness = Liveness::Respawning {
                remaining: rng.range(RESPAWN_MIN, RESPAWN_MAX),
            };
            particle.park();
            return;
        }

        if let Some(barrier) = &self.barrier {
            let mut rng = Lcg::for_jitter(index, self.frame);
            barrier.apply(particle, &mut rng, DT);
        }

        route.steer(particle, DT);
        integrate(particle, self.arena, DT);
    }
}

pub struct Simulation {
    arena: Arena,
    frame: u32,
    workers: usize,
    particles: Vec<Particle>,
    liveness: Vec<Liveness>,
    routes: Vec<Route>,
    projectiles: ProjectileList,
    render_buffer: Vec<f32>,
}

impl Simulation {
    /// Creates a swarm partitioned across the current rayon pool.
    pub fn new(num_particles: usize, width: f32, height: f32) -> Self {
        Self::with_workers(num_particles, width, height, rayon::current_num_threads())
    }

    /// Creates a swarm whose particle range is split into `workers` chunks.
    pub fn with_workers(num_particles: usize, width: f32, height: f32, workers: usize) -> Self {
        let arena = Arena::new(width, height);
        let (particles, routes): (Vec<Particle>, Vec<Route>) = (0..num_particles)
            .map(|index| spawn_in_arena(&mut Lcg::for_init(index as u32), arena))
            .unzip();

        info!(
            "Created swarm of {} particles in a {}x{} arena ({} workers)",
            num_particles,
            width,
            height,
            workers.max(1)
        );

        let mut simulation = Simulation {
            arena,
            frame: 0,
            workers: workers.max(1),
            particles,
            liveness: vec![Liveness::Alive; num_particles],
            routes,
            projectiles: ProjectileList::new(),
            render_buffer: vec![0.0; output_len(num_particles)],
        };
        simulation.pack_particles();
        simulation.pack_projectiles();
        simulation
    }

    /// Advances the swarm by one tick and rebuilds the output buffer.
    pub fn step(&mut self, input: &InputFrame) {
        self.projectiles.spawn(input);
        self.projectiles.advance(self.arena, DT);

        let context = TickContext {
            arena: self.arena,
            frame: self.frame,
            projectiles: self.projectiles.as_slice(),
            field_scale: field_scale(input),
            barrier: Barrier::from_input(input),
        };

        let num_particles = self.particles.len();
        let chunk = self.chunk_len();
        let (positions, _) = self.render_buffer.split_at_mut(num_particles * 2);

        self.particles
            .par_chunks_mut(chunk)
            .zip(self.liveness.par_chunks_mut(chunk))
            .zip(self.routes.par_chunks_mut(chunk))
            .zip(positions.par_chunks_mut(chunk * 2))
            .enumerate()
            .for_each(|(chunk_index, (((particles, liveness), routes), out))| {
                let base = chunk_index * chunk;
                let slots = particles
                    .iter_mut()
                    .zip(liveness.iter_mut())
                    .zip(routes.iter_mut())
                    .zip(out.chunks_exact_mut(2));
                for (offset, (((particle, liveness), route), out)) in slots.enumerate() {
                    context.update((base + offset) as u32, particle, liveness, route);
                    out[0] = particle.x;
                    out[1] = particle.y;
                }
            });

        self.pack_projectiles();
        self.frame = self.frame.wrapping_add(1);
    }

    fn chunk_len(&self) -> usize {
        self.particles.len().div_ceil(self.workers).max(1)
    }

    fn pack_particles(&mut self) {
        for (out, particle) in self.render_buffer.chunks_exact_mut(2).zip(&self.particles) {
            out[0] = particle.x;
            out[1] = particle.y;
        }
    }

    fn pack_projectiles(&mut self) {
        let offset = self.particles.len() * 2;
        let slots = self.render_buffer[offset..].chunks_exact_mut(3);
        for (slot, out) in slots.enumerate() {
            match self.projectiles.as_slice().get(slot) {
                Some(projectile) => {
                    out[0] = projectile.x;
                    out[1] = projectile.y;
                    out[2] = projectile.technique.to_wire() as f32;
                }
                None => out.copy_from_slice(&EMPTY_PROJECTILE_SLOT),
            }
        }
        debug_assert_eq!(self.render_buffer.len() - offset, MAX_PROJECTILES * 3);
    }

    /// The flat output record for the last completed tick.
    pub fn render_buffer(&self) -> &[f32] {
        &self.render_buffer
    }

    pub fn num_particles(&self) -> usize {
        self.particles.len()
    }

    /// Number of ticks completed so far.
    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn projectiles(&self) -> &[Projectile] {
        self.projectiles.as_slice()
    }

    pub fn particle(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    pub fn liveness(&self, index: usize) -> Option<Liveness> {
        self.liveness.get(index).copied()
    }

    pub fn live_count(&self) -> usize {
        self.liveness.iter().filter(|l| l.is_alive()).count()
    }
}
