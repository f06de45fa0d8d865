//! Verlet integration.
//!
//! Velocity is the displacement since the previous step:
//! `next = pos + (pos - last) * (1 - drag) + acc * dt²`.

use hecs::World;

use shotgang_core::components::Body;
use shotgang_core::constants::DT;
use shotgang_core::enums::BodyType;

/// Integrate every dynamic body one step. Static bodies are held in place.
pub fn run(world: &mut World) {
    for (_entity, body) in world.query_mut::<&mut Body>() {
        integrate(body);
    }
}

pub fn integrate(body: &mut Body) {
    if body.body_type == BodyType::Static {
        body.halt();
        return;
    }
    let velocity = body.velocity() * (1.0 - body.drag);
    let next = body.position + velocity + body.acceleration * DT * DT;
    body.last_position = body.position;
    body.position = next;
    body.acceleration = shotgang_core::types::Vec2::ZERO;
}
