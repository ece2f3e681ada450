//! # Skeletal Anim
//!
//! Skeletal animation evaluation pipeline: keyframe sampling, joint hierarchy
//! propagation and skinning matrix palettes for a GPU renderer.
//!
//! ## Features
//!
//! - **Keyframe Sampling**: Step / linear interpolation, quaternion slerp, clamped pre/post roll
//! - **Skeleton**: Flat joint arena in depth-first order, parent-before-child propagation
//! - **Skinning**: Inverse bind poses, matrix palette, CPU linear blend skinning
//! - **Import**: JSON scene descriptions and glTF documents (feature `gltf`)
//! - **ECS Integration**: `bevy_ecs` components and a per-frame animation system
//!
//! ## Architecture Design
//!
//! This crate follows the **Anemic Domain Model (贫血模型)** pattern:
//! - **State (Component)**: `Skeleton`, `SkinCluster`, `AnimationPlayer` are pure data
//! - **Service**: `AnimationService` holds playback and evaluation logic as static methods
//! - **System**: `skeletal_animation_system` orchestrates one frame per entity
//!
//! ### Example
//!
//! ```ignore
//! use skeletal_anim::prelude::*;
//!
//! let mut context = AnimationContext::new(AnimationConfig::default());
//! context.load_scene("hero", &SceneDescription::from_json_file("hero.json")?)?;
//!
//! let (skeleton, _) = context.instantiate("hero")?;
//! let player = context.player("hero")?;
//! world.spawn((player, skeleton));
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Errors, logging and the animation context
//! - [`config`]: Configuration files and environment overrides
//! - [`scene`]: Imported node hierarchy, scene descriptions and coordinate conversion
//! - [`animation`]: Keyframes, clips, skeleton, skin cluster and playback
//! - [`ecs`]: Frame time resource and object world transform

/// Core functionality: errors, logging and the animation context
pub mod core;
/// Configuration system
pub mod config;
/// Scene import: node hierarchy and scene descriptions
pub mod scene;
/// Skeletal animation with keyframes
pub mod animation;
/// ECS resources and components
pub mod ecs;

/// Commonly used types
pub mod prelude {
    pub use crate::animation::{
        skeletal_animation_system, AnimationClip, AnimationPlayer, AnimationService,
        InterpolationMode, Keyframe, KeyframeTrack, NodeAnimation, Skeleton, SkinCluster,
        Transform, VertexInfluence,
    };
    pub use crate::config::{AnimationConfig, EngineConfig};
    pub use crate::core::{AnimationContext, AnimationError, EngineError, ImportError};
    pub use crate::ecs::{object_world_matrix, Time, WorldTransform};
    pub use crate::scene::{CoordinateConversion, NodeHierarchy, SceneDescription};
}
