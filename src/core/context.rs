//! 动画上下文
//!
//! 显式构造并传递的资源持有者：按名称保存导入好的节点层级和动画片段。
//! 节点层级和动画片段导入后只读，用 `Arc` 在骨骼实例之间共享。

use std::collections::HashMap;
use std::sync::Arc;

use crate::animation::{AnimationClip, AnimationPlayer, AnimationService, Skeleton};
use crate::config::AnimationConfig;
use crate::core::{AnimationError, AnimationResult, EngineResult, ImportError};
use crate::scene::{NodeHierarchy, SceneDescription};

pub struct AnimationContext {
    config: AnimationConfig,
    hierarchies: HashMap<String, Arc<NodeHierarchy>>,
    clips: HashMap<String, Arc<AnimationClip>>,
}

impl AnimationContext {
    pub fn new(config: AnimationConfig) -> Self {
        Self {
            config,
            hierarchies: HashMap::new(),
            clips: HashMap::new(),
        }
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    /// 导入模型场景：节点层级必须存在，动画可选
    ///
    /// 场景带动画时同时以相同名称注册第一个动画序列。
    pub fn load_scene(&mut self, name: &str, scene: &SceneDescription) -> EngineResult<()> {
        let conversion = self.config.coordinate_conversion;
        let hierarchy = NodeHierarchy::import(scene, conversion)?;

        let clip = match AnimationClip::import_first(scene, conversion) {
            Ok(clip) => Some(clip),
            Err(ImportError::NoAnimations) => {
                tracing::debug!(target: "import", name, "Scene has no animations");
                None
            }
            Err(e) => return Err(e.into()),
        };

        self.hierarchies
            .insert(name.to_string(), Arc::new(hierarchy));
        if let Some(clip) = clip {
            self.clips.insert(name.to_string(), Arc::new(clip));
        }
        Ok(())
    }

    /// 导入动画文件（只需要动画，没有动画序列时失败）
    pub fn load_animation(
        &mut self,
        name: &str,
        scene: &SceneDescription,
    ) -> EngineResult<Arc<AnimationClip>> {
        let clip = Arc::new(AnimationClip::import_first(
            scene,
            self.config.coordinate_conversion,
        )?);
        self.clips.insert(name.to_string(), Arc::clone(&clip));
        Ok(clip)
    }

    /// 从 glTF 文件导入模型场景
    #[cfg(feature = "gltf")]
    pub fn load_gltf<P: AsRef<std::path::Path>>(&mut self, name: &str, path: P) -> EngineResult<()> {
        let scene = crate::scene::gltf::load_gltf(path)?;
        self.load_scene(name, &scene)
    }

    pub fn hierarchy(&self, name: &str) -> AnimationResult<Arc<NodeHierarchy>> {
        self.hierarchies
            .get(name)
            .cloned()
            .ok_or_else(|| AnimationError::UnknownHierarchy(name.to_string()))
    }

    pub fn clip(&self, name: &str) -> AnimationResult<Arc<AnimationClip>> {
        self.clips
            .get(name)
            .cloned()
            .ok_or_else(|| AnimationError::UnknownClip(name.to_string()))
    }

    /// 为一个物体实例创建骨骼，同时返回同名模型自带的动画片段
    pub fn instantiate(
        &self,
        name: &str,
    ) -> AnimationResult<(Skeleton, Option<Arc<AnimationClip>>)> {
        let hierarchy = self.hierarchy(name)?;
        let skeleton = Skeleton::build_with(&hierarchy, self.config.strict_joint_names)?;
        Ok((skeleton, self.clips.get(name).cloned()))
    }

    /// 创建正在播放指定片段的播放器
    pub fn player(&self, clip_name: &str) -> AnimationResult<AnimationPlayer> {
        let clip = self.clip(clip_name)?;
        let mut player = AnimationPlayer::from_config(&self.config);
        AnimationService::play(&mut player, clip);
        Ok(player)
    }
}
