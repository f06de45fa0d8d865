//! Effect animation over lifetime. Colors are blended at snapshot time.

use hecs::World;
use rand_chacha::ChaCha8Rng;

use shotgang_core::components::{Body, Effect};
use shotgang_core::enums::EffectKind;
use shotgang_core::types::Vec2;
use shotgang_rules::input::gaussian;

pub fn run(world: &mut World, now_ms: u64, rng: &mut ChaCha8Rng) {
    for (_entity, (effect, body)) in world.query_mut::<(&mut Effect, &mut Body)>() {
        let t = 1.0 - effect.lifetime_fraction(now_ms);
        match effect.kind {
            EffectKind::Smoke => {
                let t0 = t * t;
                effect.size = Vec2::splat(t0 * effect.start_size + effect.end_size * (1.0 - t0));
                body.radius = effect.size.x * 0.5;
            }
            EffectKind::Spark => {
                effect.intensity = t * effect.start_intensity;
                let jitter = Vec2::new(gaussian(rng), gaussian(rng));
                body.last_position += jitter * t * t * effect.turbulence;
            }
            EffectKind::Flash => {
                effect.intensity = effect.start_intensity * t;
            }
            EffectKind::Shell | EffectKind::Decal | EffectKind::Decoration => {}
        }
    }
}
