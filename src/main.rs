//! Example game demonstrating engine features

use std::path::Path;

use vixeria::prelude::*;

/// Bullets live this long, in seconds
const BULLET_LIFETIME: f32 = 2.0;

/// Player moved with A/D, jumps with Space, shoots toward the cursor
#[derive(Default)]
struct Player {
    grounded: bool,
}

impl Behaviour for Player {
    fn awake(&mut self, ctx: &mut EngineContext, this: ObjectHandle) -> HookResult {
        // a missing sprite only means the player is invisible
        match ctx.load_sprite("assets/player.png") {
            Ok(sprite) => ctx.objects.renderer_mut(this)?.sprite = Some(sprite),
            Err(err) => log::warn!("{err}"),
        }
        let body = ctx.objects.rigidbody_mut(this)?;
        body.enabled = true;
        body.gravity_enabled = true;

        let object = ctx.objects.object_mut(this)?;
        object.tag = "Player".to_string();
        object.collider_tag = "Player".to_string();
        let collider = ctx.objects.collider_mut(this)?;
        collider.enabled = true;
        collider.shape = ColliderShape::Box(Vec2::new(32.0, 48.0));
        Ok(())
    }

    fn fixed_update(&mut self, ctx: &mut EngineContext, this: ObjectHandle) -> HookResult {
        let floor = -200.0;
        let position = ctx.objects.transform(this)?.position;
        self.grounded = position.y <= floor;
        if self.grounded {
            ctx.objects.transform_mut(this)?.position.y = floor;
            let body = ctx.objects.rigidbody_mut(this)?;
            body.velocity.y = body.velocity.y.max(0.0);
        }
        Ok(())
    }

    fn update(&mut self, ctx: &mut EngineContext, this: ObjectHandle) -> HookResult {
        if ctx.input.is_key_down(KeyCode::Escape) {
            ctx.quit();
            return Ok(());
        }

        let mut run = 0.0;
        if ctx.input.is_key_held(KeyCode::KeyA) {
            run -= 1.0;
        }
        if ctx.input.is_key_held(KeyCode::KeyD) {
            run += 1.0;
        }
        let jump = self.grounded && ctx.input.is_key_down(KeyCode::Space);

        let body = ctx.objects.rigidbody_mut(this)?;
        body.velocity.x = run * 240.0;
        if jump {
            body.velocity += UP * 600.0;
        }

        if ctx.input.is_mouse_button_down(MouseButton::Left) {
            let origin = ctx.objects.transform(this)?.position;
            let aim = (ctx.input.cursor_world() - origin).normalize_or(RIGHT);
            let bullet = ctx.objects.instantiate("Bullet", origin, aim.angle_degrees())?;
            ctx.objects.rigidbody_mut(bullet)?.velocity = aim * 900.0;
        }

        let hits = vixeria::physics::overlapping(&ctx.objects, this)?;
        ctx.debug.add_line(format!("Touching: {}", hits.len()));
        Ok(())
    }
}

/// Projectile that expires after a while
#[derive(Default)]
struct Bullet {
    age: f32,
}

impl Behaviour for Bullet {
    fn awake(&mut self, ctx: &mut EngineContext, this: ObjectHandle) -> HookResult {
        ctx.objects.rigidbody_mut(this)?.enabled = true;
        ctx.objects.object_mut(this)?.collider_tag = "Bullet".to_string();
        Ok(())
    }

    fn update(&mut self, ctx: &mut EngineContext, this: ObjectHandle) -> HookResult {
        self.age += ctx.time.delta_seconds();
        if self.age > BULLET_LIFETIME {
            ctx.objects.destroy(this)?;
        }
        Ok(())
    }
}

/// Spawns a few crates that fall onto nothing, then the player
#[derive(Default)]
struct Level;

impl Behaviour for Level {
    fn start(&mut self, ctx: &mut EngineContext, _this: ObjectHandle) -> HookResult {
        ctx.objects.instantiate("Player", Vec2::ZERO, 0.0)?;
        for i in 0..3 {
            let x = -150.0 + 150.0 * i as f32;
            let block = ctx.objects.instantiate("Crate", Vec2::new(x, 300.0), 0.0)?;
            let body = ctx.objects.rigidbody_mut(block)?;
            body.enabled = true;
            body.gravity_enabled = true;
            let collider = ctx.objects.collider_mut(block)?;
            collider.enabled = true;
            collider.shape = ColliderShape::Circle(20.0);
        }
        Ok(())
    }
}

fn main() {
    let config_path = Path::new("vixeria.ron");
    let config = if config_path.exists() {
        match EngineConfig::load(config_path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Ignoring {}: {err}", config_path.display());
                EngineConfig::default()
            }
        }
    } else {
        EngineConfig::default()
    };

    let engine = Engine::builder()
        .with_config(config.with_title("Vixeria Demo"))
        .register_default::<Level>("Level")
        .register_default::<Player>("Player")
        .register_default::<Bullet>("Bullet")
        .register_default::<vixeria::ecs::Inert>("Crate")
        .build();

    let result = engine.and_then(|mut engine| {
        engine.objects_mut().instantiate("Level", Vec2::ZERO, 0.0)?;
        engine.run()
    });

    if let Err(e) = result {
        eprintln!("Engine error: {e}");
    }
}
