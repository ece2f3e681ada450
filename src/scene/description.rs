use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::animation::InterpolationMode;
use crate::core::{ImportError, ImportResult};

/// 场景描述
///
/// 外部导入器（glTF、JSON 等）产出的纯数据，坐标系保持源格式（右手系）。
/// 转换到运行时坐标系发生在 [`NodeHierarchy::import`](super::NodeHierarchy::import)
/// 和 [`AnimationClip::import_first`](crate::animation::AnimationClip::import_first) 中。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneDescription {
    /// 场景名称
    #[serde(default)]
    pub name: String,
    /// 根节点
    pub root: Option<SceneNodeDesc>,
    /// 动画序列
    #[serde(default)]
    pub animations: Vec<SceneAnimationDesc>,
}

/// 场景节点
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneNodeDesc {
    pub name: String,
    /// 相对父节点的变换
    #[serde(default)]
    pub transform: LocalTransformDesc,
    #[serde(default)]
    pub children: Vec<SceneNodeDesc>,
}

/// 节点局部变换，矩阵或分解形式
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalTransformDesc {
    /// 列主序 4x4 矩阵
    Matrix([f32; 16]),
    Trs {
        #[serde(default = "zero3")]
        translation: [f32; 3],
        /// 四元数 (x, y, z, w)
        #[serde(default = "identity_quat")]
        rotation: [f32; 4],
        #[serde(default = "one3")]
        scale: [f32; 3],
    },
}

fn zero3() -> [f32; 3] {
    [0.0; 3]
}

fn one3() -> [f32; 3] {
    [1.0; 3]
}

fn identity_quat() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

impl Default for LocalTransformDesc {
    fn default() -> Self {
        Self::Trs {
            translation: zero3(),
            rotation: identity_quat(),
            scale: one3(),
        }
    }
}

impl LocalTransformDesc {
    pub fn translation(translation: Vec3) -> Self {
        Self::Trs {
            translation: translation.to_array(),
            rotation: identity_quat(),
            scale: one3(),
        }
    }

    /// 分解为 (缩放, 旋转, 平移)
    pub fn decompose(&self) -> (Vec3, Quat, Vec3) {
        match self {
            Self::Matrix(cols) => Mat4::from_cols_array(cols).to_scale_rotation_translation(),
            Self::Trs {
                translation,
                rotation,
                scale,
            } => (
                Vec3::from_array(*scale),
                Quat::from_array(*rotation),
                Vec3::from_array(*translation),
            ),
        }
    }
}

impl SceneNodeDesc {
    pub fn new(name: impl Into<String>, transform: LocalTransformDesc) -> Self {
        Self {
            name: name.into(),
            transform,
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: SceneNodeDesc) -> Self {
        self.children.push(child);
        self
    }
}

/// 动画序列（时间单位为 tick）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneAnimationDesc {
    #[serde(default)]
    pub name: String,
    pub duration_ticks: f64,
    pub ticks_per_second: f64,
    #[serde(default)]
    pub channels: Vec<ChannelDesc>,
}

/// 单个节点的动画通道
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelDesc {
    pub node_name: String,
    #[serde(default)]
    pub position_keys: Vec<VectorKeyDesc>,
    #[serde(default)]
    pub rotation_keys: Vec<QuatKeyDesc>,
    #[serde(default)]
    pub scaling_keys: Vec<VectorKeyDesc>,
    #[serde(default)]
    pub position_interpolation: InterpolationMode,
    #[serde(default)]
    pub rotation_interpolation: InterpolationMode,
    #[serde(default)]
    pub scaling_interpolation: InterpolationMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VectorKeyDesc {
    pub time: f64,
    pub value: [f32; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuatKeyDesc {
    pub time: f64,
    /// (x, y, z, w)
    pub value: [f32; 4],
}

impl SceneDescription {
    /// 从JSON字符串解析
    pub fn from_json_str(content: &str) -> ImportResult<Self> {
        serde_json::from_str(content).map_err(|e| ImportError::Parse(e.to_string()))
    }

    /// 从JSON文件加载
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ImportResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn to_json_string(&self) -> ImportResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ImportError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WAVE: &str = r#"{
        "name": "wave",
        "root": {
            "name": "root",
            "children": [
                {
                    "name": "arm",
                    "transform": { "trs": { "translation": [0.0, 1.0, 0.0] } }
                }
            ]
        },
        "animations": [
            {
                "name": "wave",
                "duration_ticks": 48.0,
                "ticks_per_second": 24.0,
                "channels": [
                    {
                        "node_name": "arm",
                        "position_keys": [{ "time": 0.0, "value": [0.0, 1.0, 0.0] }],
                        "rotation_keys": [{ "time": 0.0, "value": [0.0, 0.0, 0.0, 1.0] }],
                        "scaling_keys": [{ "time": 0.0, "value": [1.0, 1.0, 1.0] }]
                    }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_parse_json_scene() {
        let scene = SceneDescription::from_json_str(WAVE).unwrap();
        let root = scene.root.as_ref().unwrap();
        assert_eq!(root.name, "root");
        assert_eq!(root.transform, LocalTransformDesc::default());
        assert_eq!(root.children[0].name, "arm");
        assert_eq!(
            root.children[0].transform.decompose().2,
            Vec3::new(0.0, 1.0, 0.0)
        );
        assert_eq!(scene.animations[0].ticks_per_second, 24.0);
        assert_eq!(scene.animations[0].channels[0].node_name, "arm");
    }

    #[test]
    fn test_matrix_transform_decompose() {
        let m = Mat4::from_translation(Vec3::new(2.0, 0.0, -1.0));
        let desc = LocalTransformDesc::Matrix(m.to_cols_array());
        let (scale, rotation, translation) = desc.decompose();
        assert!((scale - Vec3::ONE).length() < 1e-6);
        assert!(rotation.dot(Quat::IDENTITY).abs() > 0.9999);
        assert_eq!(translation, Vec3::new(2.0, 0.0, -1.0));
    }

    #[test]
    fn test_json_round_trip_keeps_structure() {
        let scene = SceneDescription::from_json_str(WAVE).unwrap();
        let json = scene.to_json_string().unwrap();
        let again = SceneDescription::from_json_str(&json).unwrap();
        assert_eq!(again.animations[0].duration_ticks, 48.0);
        assert_eq!(again.root.unwrap().children.len(), 1);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            SceneDescription::from_json_str("{\"root\": 5}"),
            Err(ImportError::Parse(_))
        ));
    }
}
