//! glTF 场景导入
//!
//! 把 glTF 文档转换为 [`SceneDescription`]。glTF 的时间单位已经是秒，
//! 因此 `ticks_per_second` 固定为 1.0。坐标系转换不在这里做。
//!
//! # 示例
//! ```ignore
//! let scene = skeletal_anim::scene::gltf::load_gltf("character.glb")?;
//! let hierarchy = NodeHierarchy::import(&scene, CoordinateConversion::MirrorX)?;
//! ```

use std::collections::HashMap;
use std::path::Path;

use gltf::animation::util::ReadOutputs;
use gltf::animation::{Interpolation, Property};

use super::description::{
    ChannelDesc, LocalTransformDesc, QuatKeyDesc, SceneAnimationDesc, SceneDescription,
    SceneNodeDesc, VectorKeyDesc,
};
use crate::animation::InterpolationMode;
use crate::core::ImportResult;

/// 多个场景根节点时包裹它们的合成根节点名称
pub const SYNTHETIC_ROOT_NAME: &str = "RootNode";

/// 从文件加载 glTF/GLB
pub fn load_gltf<P: AsRef<Path>>(path: P) -> ImportResult<SceneDescription> {
    let (document, buffers, _images) = gltf::import(path.as_ref())?;
    tracing::debug!(target: "import", path = ?path.as_ref(), "Loaded glTF document");
    Ok(scene_from_document(&document, &buffers))
}

/// 从内存加载 glTF/GLB
pub fn load_gltf_slice(bytes: &[u8]) -> ImportResult<SceneDescription> {
    let (document, buffers, _images) = gltf::import_slice(bytes)?;
    Ok(scene_from_document(&document, &buffers))
}

/// 转换 glTF 文档
pub fn scene_from_document(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
) -> SceneDescription {
    let scene = document.default_scene().or_else(|| document.scenes().next());

    let (name, root) = match scene {
        Some(scene) => {
            let mut roots: Vec<SceneNodeDesc> = scene.nodes().map(|n| read_node(&n)).collect();
            let root = match roots.len() {
                0 => None,
                1 => roots.pop(),
                _ => Some(SceneNodeDesc {
                    name: SYNTHETIC_ROOT_NAME.to_string(),
                    transform: LocalTransformDesc::default(),
                    children: roots,
                }),
            };
            (scene.name().unwrap_or_default().to_string(), root)
        }
        None => (String::new(), None),
    };

    let animations = document
        .animations()
        .map(|animation| read_animation(&animation, buffers))
        .collect();

    SceneDescription {
        name,
        root,
        animations,
    }
}

fn node_name(node: &gltf::Node) -> String {
    node.name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("node_{}", node.index()))
}

fn node_transform(node: &gltf::Node) -> LocalTransformDesc {
    let (translation, rotation, scale) = node.transform().decomposed();
    LocalTransformDesc::Trs {
        translation,
        rotation,
        scale,
    }
}

fn read_node(node: &gltf::Node) -> SceneNodeDesc {
    SceneNodeDesc {
        name: node_name(node),
        transform: node_transform(node),
        children: node.children().map(|child| read_node(&child)).collect(),
    }
}

fn read_animation(
    animation: &gltf::Animation,
    buffers: &[gltf::buffer::Data],
) -> SceneAnimationDesc {
    // glTF 中平移/旋转/缩放是独立通道，按目标节点合并
    let mut channels: HashMap<usize, (gltf::Node, ChannelDesc)> = HashMap::new();
    let mut order = Vec::new();
    let mut duration = 0.0f64;

    for channel in animation.channels() {
        let target = channel.target().node();
        let reader =
            channel.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));

        let Some(times) = reader.read_inputs() else {
            continue;
        };
        let times: Vec<f64> = times.map(f64::from).collect();
        if let Some(last) = times.last() {
            duration = duration.max(*last);
        }

        let entry = channels.entry(target.index()).or_insert_with(|| {
            order.push(target.index());
            (
                target.clone(),
                ChannelDesc {
                    node_name: node_name(&target),
                    ..ChannelDesc::default()
                },
            )
        });

        let interpolation = channel.sampler().interpolation();
        let mode = interpolation_mode(interpolation);
        let cubic = interpolation == Interpolation::CubicSpline;

        match (channel.target().property(), reader.read_outputs()) {
            (Property::Translation, Some(ReadOutputs::Translations(values))) => {
                entry.1.position_keys = times
                    .iter()
                    .copied()
                    .zip(spline_values(values, cubic))
                    .map(|(time, value)| VectorKeyDesc { time, value })
                    .collect();
                entry.1.position_interpolation = mode;
            }
            (Property::Rotation, Some(ReadOutputs::Rotations(values))) => {
                entry.1.rotation_keys = times
                    .iter()
                    .copied()
                    .zip(spline_values(values.into_f32(), cubic))
                    .map(|(time, value)| QuatKeyDesc { time, value })
                    .collect();
                entry.1.rotation_interpolation = mode;
            }
            (Property::Scale, Some(ReadOutputs::Scales(values))) => {
                entry.1.scaling_keys = times
                    .iter()
                    .copied()
                    .zip(spline_values(values, cubic))
                    .map(|(time, value)| VectorKeyDesc { time, value })
                    .collect();
                entry.1.scaling_interpolation = mode;
            }
            _ => {}
        }
    }

    let channels = order
        .into_iter()
        .filter_map(|index| channels.remove(&index))
        .map(|(node, mut desc)| {
            fill_missing_keys(&node, &mut desc);
            desc
        })
        .collect();

    SceneAnimationDesc {
        name: animation.name().unwrap_or_default().to_string(),
        duration_ticks: duration,
        ticks_per_second: 1.0,
        channels,
    }
}

/// 三次样条按线性插值导入，只保留关键帧值
fn interpolation_mode(interpolation: Interpolation) -> InterpolationMode {
    match interpolation {
        Interpolation::Step => InterpolationMode::Step,
        Interpolation::Linear => InterpolationMode::Linear,
        Interpolation::CubicSpline => {
            tracing::debug!(
                target: "import",
                "Cubic spline sampler imported as linear, tangents are dropped"
            );
            InterpolationMode::Linear
        }
    }
}

/// 三次样条的输出按 (入切线, 值, 出切线) 三个一组排列，取中间的值
fn spline_values<T>(values: impl Iterator<Item = T>, cubic: bool) -> Vec<T> {
    if cubic {
        values.skip(1).step_by(3).collect()
    } else {
        values.collect()
    }
}

/// 未被动画化的属性补一个取自节点静止变换的关键帧
fn fill_missing_keys(node: &gltf::Node, desc: &mut ChannelDesc) {
    let (translation, rotation, scale) = node.transform().decomposed();
    if desc.position_keys.is_empty() {
        desc.position_keys.push(VectorKeyDesc {
            time: 0.0,
            value: translation,
        });
    }
    if desc.rotation_keys.is_empty() {
        desc.rotation_keys.push(QuatKeyDesc {
            time: 0.0,
            value: rotation,
        });
    }
    if desc.scaling_keys.is_empty() {
        desc.scaling_keys.push(VectorKeyDesc {
            time: 0.0,
            value: scale,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 两个根节点，无缓冲区，无动画
    const TWO_ROOTS: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [ { "name": "stage", "nodes": [0, 1] } ],
        "nodes": [
            { "name": "hips", "translation": [0.0, 1.0, 0.0], "children": [2] },
            { "translation": [3.0, 0.0, 0.0] },
            { "name": "spine", "rotation": [0.0, 0.0, 0.0, 1.0] }
        ]
    }"#;

    #[test]
    fn test_multiple_roots_are_wrapped() {
        let scene = load_gltf_slice(TWO_ROOTS.as_bytes()).unwrap();
        assert_eq!(scene.name, "stage");
        let root = scene.root.unwrap();
        assert_eq!(root.name, SYNTHETIC_ROOT_NAME);
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].name, "hips");
        assert_eq!(root.children[0].children[0].name, "spine");
        assert_eq!(root.children[1].name, "node_1");
        assert!(scene.animations.is_empty());
    }

    #[test]
    fn test_node_transform_decomposed() {
        let scene = load_gltf_slice(TWO_ROOTS.as_bytes()).unwrap();
        let hips = &scene.root.unwrap().children[0];
        let (_, _, translation) = hips.transform.decompose();
        assert_eq!(translation, glam::Vec3::new(0.0, 1.0, 0.0));
    }

    // hips 的平移 (LINEAR) 与旋转 (STEP) 是两个通道；arm 只有三次样条平移。
    // 缓冲区布局：
    //   0..8    时间 [0, 1]
    //   8..32   hips 平移 (0,1,0) (0,3,0)
    //   32..64  hips 旋转 identity, 绕 Y 轴 90 度
    //   64..72  时间 [0, 2]
    //   72..144 arm 平移，每帧 (入切线 0, 值, 出切线 0)，值为 (1,0,0) (2,0,0)
    const ANIMATED: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [ { "nodes": [0] } ],
        "nodes": [
            { "name": "hips", "translation": [0.0, 1.0, 0.0], "scale": [2.0, 2.0, 2.0], "children": [1] },
            { "name": "arm", "translation": [1.0, 0.0, 0.0] }
        ],
        "buffers": [ { "byteLength": 144, "uri": "data:application/octet-stream;base64,AAAAAAAAgD8AAAAAAACAPwAAAAAAAAAAAABAQAAAAAAAAAAAAAAAAAAAAAAAAIA/AAAAAPMENT8AAAAA8wQ1PwAAAAAAAABAAAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAQAAAAAAAAAAAAAAAAAAAAAAAAAAA" } ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 8 },
            { "buffer": 0, "byteOffset": 8, "byteLength": 24 },
            { "buffer": 0, "byteOffset": 32, "byteLength": 32 },
            { "buffer": 0, "byteOffset": 64, "byteLength": 8 },
            { "buffer": 0, "byteOffset": 72, "byteLength": 72 }
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 2, "type": "SCALAR", "min": [0.0], "max": [1.0] },
            { "bufferView": 1, "componentType": 5126, "count": 2, "type": "VEC3" },
            { "bufferView": 2, "componentType": 5126, "count": 2, "type": "VEC4" },
            { "bufferView": 3, "componentType": 5126, "count": 2, "type": "SCALAR", "min": [0.0], "max": [2.0] },
            { "bufferView": 4, "componentType": 5126, "count": 6, "type": "VEC3" }
        ],
        "animations": [ {
            "name": "move",
            "samplers": [
                { "input": 0, "output": 1, "interpolation": "LINEAR" },
                { "input": 0, "output": 2, "interpolation": "STEP" },
                { "input": 3, "output": 4, "interpolation": "CUBICSPLINE" }
            ],
            "channels": [
                { "sampler": 0, "target": { "node": 0, "path": "translation" } },
                { "sampler": 1, "target": { "node": 0, "path": "rotation" } },
                { "sampler": 2, "target": { "node": 1, "path": "translation" } }
            ]
        } ]
    }"#;

    fn animated_scene() -> SceneDescription {
        load_gltf_slice(ANIMATED.as_bytes()).unwrap()
    }

    #[test]
    fn test_animation_duration_and_rate() {
        let scene = animated_scene();
        assert_eq!(scene.animations.len(), 1);
        let animation = &scene.animations[0];
        assert_eq!(animation.name, "move");
        assert_eq!(animation.duration_ticks, 2.0);
        assert_eq!(animation.ticks_per_second, 1.0);
    }

    #[test]
    fn test_channels_merged_per_node() {
        let scene = animated_scene();
        let channels = &scene.animations[0].channels;
        let names: Vec<_> = channels.iter().map(|c| c.node_name.as_str()).collect();
        assert_eq!(names, ["hips", "arm"]);

        let hips = &channels[0];
        assert_eq!(
            hips.position_keys,
            [
                VectorKeyDesc { time: 0.0, value: [0.0, 1.0, 0.0] },
                VectorKeyDesc { time: 1.0, value: [0.0, 3.0, 0.0] },
            ]
        );
        assert_eq!(hips.position_interpolation, InterpolationMode::Linear);
        assert_eq!(hips.rotation_keys.len(), 2);
        assert_eq!(hips.rotation_keys[0].value, [0.0, 0.0, 0.0, 1.0]);
        assert!((hips.rotation_keys[1].value[1] - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
        assert_eq!(hips.rotation_interpolation, InterpolationMode::Step);
    }

    #[test]
    fn test_missing_properties_filled_from_rest_pose() {
        let scene = animated_scene();
        let channels = &scene.animations[0].channels;

        assert_eq!(
            channels[0].scaling_keys,
            [VectorKeyDesc { time: 0.0, value: [2.0, 2.0, 2.0] }]
        );
        assert_eq!(
            channels[1].rotation_keys,
            [QuatKeyDesc { time: 0.0, value: [0.0, 0.0, 0.0, 1.0] }]
        );
        assert_eq!(
            channels[1].scaling_keys,
            [VectorKeyDesc { time: 0.0, value: [1.0, 1.0, 1.0] }]
        );
    }

    #[test]
    fn test_cubic_spline_keeps_values_not_tangents() {
        let scene = animated_scene();
        let arm = &scene.animations[0].channels[1];
        assert_eq!(
            arm.position_keys,
            [
                VectorKeyDesc { time: 0.0, value: [1.0, 0.0, 0.0] },
                VectorKeyDesc { time: 2.0, value: [2.0, 0.0, 0.0] },
            ]
        );
        assert_eq!(arm.position_interpolation, InterpolationMode::Linear);
    }

    #[test]
    fn test_imported_clip_samples_step_rotation() {
        use crate::animation::AnimationClip;
        use crate::scene::CoordinateConversion;
        use glam::Quat;

        let scene = animated_scene();
        let clip = AnimationClip::import_first(&scene, CoordinateConversion::None).unwrap();
        assert_eq!(clip.duration, 2.0);

        let hips = clip.node_animation("hips").unwrap();
        assert_eq!(hips.rotation.interpolation, InterpolationMode::Step);

        let pose = clip.sample_node("hips", 0.5).unwrap().unwrap();
        assert_eq!(pose.rotation, Quat::IDENTITY);
        assert!((pose.translation.y - 2.0).abs() < 1e-6);
        assert_eq!(pose.scale, glam::Vec3::splat(2.0));
    }
}
