use bevy_ecs::prelude::*;
use glam::Vec3;

use skeletal_anim::animation::{skeletal_animation_system, AnimationPlayer, AnimationService, Skeleton};
use skeletal_anim::config::EngineConfig;
use skeletal_anim::core::{init_logging, AnimationContext, EngineResult};
use skeletal_anim::ecs::{object_world_matrix, Time, WorldTransform};
use skeletal_anim::scene::{
    ChannelDesc, LocalTransformDesc, QuatKeyDesc, SceneAnimationDesc, SceneDescription, SceneNodeDesc,
    VectorKeyDesc,
};

/// 演示模式推进的帧数
const DEMO_FRAMES: usize = 120;

const MODEL: &str = "model";

fn main() {
    if let Err(e) = run() {
        eprintln!("Animation demo failed: {}", e);
        std::process::exit(1);
    }
}

fn run() -> EngineResult<()> {
    let (mut config, source) = EngineConfig::load_or_default();
    config.apply_env_overrides();
    init_logging(&config.logging);
    tracing::info!(target: "config", "Loaded config from {}", source);
    config.validate()?;

    let mut context = AnimationContext::new(config.animation.clone());
    load_model(&mut context, std::env::args().nth(1))?;

    let (skeleton, clip) = context.instantiate(MODEL)?;
    tracing::info!(target: "engine", joints = skeleton.joint_count(), "Skeleton instantiated");

    let mut player = AnimationPlayer::from_config(&config.animation);
    match clip {
        Some(clip) => AnimationService::play(&mut player, clip),
        None => tracing::warn!(target: "engine", "Model has no animation, showing bind pose"),
    }

    let mut world = World::new();
    world.insert_resource(Time::with_fixed_step(config.animation.fixed_time_step));
    let entity = world
        .spawn((player, skeleton, WorldTransform::default()))
        .id();

    let mut schedule = Schedule::default();
    schedule.add_systems(skeletal_animation_system);

    for frame in 0..DEMO_FRAMES {
        world.resource_mut::<Time>().tick_fixed();
        schedule.run(&mut world);

        if frame % 30 == 0 {
            log_tip(&world, entity, frame);
        }
    }
    log_tip(&world, entity, DEMO_FRAMES);

    Ok(())
}

fn load_model(context: &mut AnimationContext, path: Option<String>) -> EngineResult<()> {
    match path {
        #[cfg(feature = "gltf")]
        Some(path) => {
            tracing::info!(target: "engine", "Loading model from {}", path);
            context.load_gltf(MODEL, path)
        }
        #[cfg(not(feature = "gltf"))]
        Some(path) => {
            tracing::warn!(
                target: "engine",
                "glTF support is disabled, ignoring {} and using the demo scene",
                path
            );
            context.load_scene(MODEL, &demo_scene())
        }
        None => context.load_scene(MODEL, &demo_scene()),
    }
}

fn log_tip(world: &World, entity: Entity, frame: usize) {
    let (Some(skeleton), Some(transform)) = (
        world.get::<Skeleton>(entity),
        world.get::<WorldTransform>(entity),
    ) else {
        return;
    };
    let Some(tip) = skeleton.joint_positions().last().copied() else {
        return;
    };
    let world_tip = object_world_matrix(transform, skeleton).transform_point3(tip);
    tracing::info!(
        target: "engine",
        frame,
        "Tip joint at ({:.3}, {:.3}, {:.3})",
        world_tip.x,
        world_tip.y,
        world_tip.z
    );
}

/// 三关节链：root -> mid -> tip，每节沿 Y 轴偏移 1，mid 在 2 秒内上移 1
fn demo_scene() -> SceneDescription {
    let up = LocalTransformDesc::translation(Vec3::Y);
    let root = SceneNodeDesc::new("root", up)
        .with_child(SceneNodeDesc::new("mid", up).with_child(SceneNodeDesc::new("tip", up)));

    let key = |time: f64, y: f32| VectorKeyDesc {
        time,
        value: [0.0, y, 0.0],
    };
    let channel = ChannelDesc {
        node_name: "mid".to_string(),
        position_keys: vec![key(0.0, 1.0), key(1.0, 2.0), key(2.0, 1.0)],
        rotation_keys: vec![QuatKeyDesc {
            time: 0.0,
            value: [0.0, 0.0, 0.0, 1.0],
        }],
        scaling_keys: vec![VectorKeyDesc {
            time: 0.0,
            value: [1.0; 3],
        }],
        ..ChannelDesc::default()
    };

    SceneDescription {
        name: "demo".to_string(),
        root: Some(root),
        animations: vec![SceneAnimationDesc {
            name: "bob".to_string(),
            duration_ticks: 2.0,
            ticks_per_second: 1.0,
            channels: vec![channel],
        }],
    }
}
