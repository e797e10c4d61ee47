//! Engine tuning constants shared by the server, the driver client and the tests.

/// First word of the init record, "LMT1" read as a little-endian u32.
pub const INIT_MAGIC: u32 = 0x3154_4D4C;
pub const DEFAULT_PORT: u16 = 9999;
pub const MAX_PROJECTILES: usize = 8;

/// Fixed simulation step in seconds. One step is taken per input record.
pub const DT: f32 = 1.0 / 60.0;
pub const EPS: f32 = 1e-3;
pub const GLOBAL_DAMP: f32 = 0.995;
pub const MAX_SPEED: f32 = 2500.0;

pub const PROJECTILE_SPEED_BLUE: f32 = 1100.0;
pub const PROJECTILE_SPEED_RED: f32 = 1150.0;
pub const PROJECTILE_SPEED_PURPLE: f32 = 1250.0;

pub const PROJECTILE_RADIUS_BLUE: f32 = 90.0;
pub const PROJECTILE_RADIUS_RED: f32 = 90.0;
pub const PROJECTILE_RADIUS_PURPLE: f32 = 70.0;

pub const PROJECTILE_FORCE_BLUE: f32 = 5200.0;
pub const PROJECTILE_FORCE_RED: f32 = 5600.0;

pub const PROJECTILE_LIFE_BLUE: f32 = 5.0;
pub const PROJECTILE_LIFE_RED: f32 = 5.0;
pub const PROJECTILE_LIFE_PURPLE: f32 = 5.0;

pub const PROJECTILE_SPEED_SCALE_MIN: f32 = 0.2;
pub const PROJECTILE_SPEED_SCALE_MAX: f32 = 2.0;
pub const PROJECTILE_FIELD_MIN: f32 = 0.1;
pub const PROJECTILE_FIELD_MAX: f32 = 2.0;

/// Aim vectors with a squared length at or below this never spawn a projectile.
pub const AIM_EPS: f32 = 1e-4;

pub const INIT_SPEED: f32 = 40.0;
pub const RESPAWN_SPEED: f32 = 40.0;

pub const ROUTE_RADIUS_MIN: f32 = 40.0;
pub const ROUTE_RADIUS_MAX: f32 = 160.0;
pub const ROUTE_OMEGA_MIN: f32 = 0.01;
pub const ROUTE_OMEGA_MAX: f32 = 0.03;
pub const ROUTE_PULL: f32 = 0.08;

pub const RESPAWN_MIN: f32 = 0.25;
pub const RESPAWN_MAX: f32 = 1.2;
/// Output coordinate of a particle that is waiting to respawn.
pub const DEAD_COORD: f32 = -10000.0;
pub const SPAWN_MARGIN: f32 = 20.0;

// Barrier input floors
pub const BARRIER_RADIUS_MIN: f32 = 5.0;
pub const BARRIER_POWER_MIN: f32 = 0.5;
pub const BARRIER_JITTER_MIN: f32 = 0.0;
pub const BARRIER_PUSH_MIN: f32 = 0.0;

/// Output slot value for a projectile slot with nothing in it.
pub const EMPTY_PROJECTILE_SLOT: [f32; 3] = [-1.0, -1.0, 0.0];
