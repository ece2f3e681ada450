//! 节点层级
//!
//! 导入后只读的节点树，每个节点按值持有子节点。

use glam::Mat4;

use super::convert::CoordinateConversion;
use super::description::{SceneDescription, SceneNodeDesc};
use crate::animation::Transform;
use crate::core::{ImportError, ImportResult};

/// 场景节点
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// 节点名称（骨骼按名称查找）
    pub name: String,
    /// 局部变换
    pub transform: Transform,
    /// 局部矩阵（由 transform 合成）
    pub local_matrix: Mat4,
    /// 子节点（保持导入顺序）
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(name: impl Into<String>, transform: Transform) -> Self {
        Self {
            name: name.into(),
            transform,
            local_matrix: transform.to_matrix(),
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// 子树中的节点总数（含自身）
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Node::count).sum::<usize>()
    }

    /// 深度优先查找第一个同名节点
    pub fn find(&self, name: &str) -> Option<&Node> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    fn read(desc: &SceneNodeDesc, conversion: CoordinateConversion) -> Self {
        let (scale, rotation, translation) = desc.transform.decompose();
        let transform = conversion.transform(Transform::new(scale, rotation, translation));

        let mut node = Node::new(desc.name.clone(), transform);
        node.children = desc
            .children
            .iter()
            .map(|child| Node::read(child, conversion))
            .collect();
        node
    }
}

/// 节点层级
#[derive(Debug, Clone, PartialEq)]
pub struct NodeHierarchy {
    pub root: Node,
}

impl NodeHierarchy {
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    /// 从场景描述递归构建节点树
    ///
    /// 场景没有根节点时整个加载失败，不做部分恢复。
    pub fn import(scene: &SceneDescription, conversion: CoordinateConversion) -> ImportResult<Self> {
        let root = scene.root.as_ref().ok_or(ImportError::MissingRoot)?;
        let hierarchy = Self::new(Node::read(root, conversion));

        tracing::info!(
            target: "import",
            scene = %scene.name,
            nodes = hierarchy.node_count(),
            "Imported node hierarchy"
        );
        Ok(hierarchy)
    }

    pub fn node_count(&self) -> usize {
        self.root.count()
    }

    pub fn find(&self, name: &str) -> Option<&Node> {
        self.root.find(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::LocalTransformDesc;
    use glam::{Quat, Vec3};

    fn sample_scene() -> SceneDescription {
        let root = SceneNodeDesc::new("root", LocalTransformDesc::default())
            .with_child(
                SceneNodeDesc::new(
                    "spine",
                    LocalTransformDesc::translation(Vec3::new(1.0, 2.0, 3.0)),
                )
                .with_child(SceneNodeDesc::new("head", LocalTransformDesc::default())),
            )
            .with_child(SceneNodeDesc::new("tail", LocalTransformDesc::default()));

        SceneDescription {
            name: "sample".to_string(),
            root: Some(root),
            animations: Vec::new(),
        }
    }

    #[test]
    fn test_import_preserves_order_and_names() {
        let hierarchy = NodeHierarchy::import(&sample_scene(), CoordinateConversion::None).unwrap();
        assert_eq!(hierarchy.node_count(), 4);
        assert_eq!(hierarchy.root.name, "root");
        let names: Vec<_> = hierarchy.root.children.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["spine", "tail"]);
        assert_eq!(hierarchy.root.children[0].children[0].name, "head");
    }

    #[test]
    fn test_import_applies_mirror() {
        let hierarchy =
            NodeHierarchy::import(&sample_scene(), CoordinateConversion::MirrorX).unwrap();
        let spine = hierarchy.find("spine").unwrap();
        assert_eq!(spine.transform.translation, Vec3::new(-1.0, 2.0, 3.0));
        assert_eq!(spine.local_matrix, spine.transform.to_matrix());
    }

    #[test]
    fn test_import_mirrors_rotation() {
        let mut scene = sample_scene();
        let q = Quat::from_rotation_y(0.5);
        scene.root.as_mut().unwrap().transform = LocalTransformDesc::Trs {
            translation: [0.0; 3],
            rotation: q.to_array(),
            scale: [1.0; 3],
        };
        let hierarchy = NodeHierarchy::import(&scene, CoordinateConversion::MirrorX).unwrap();
        let r = hierarchy.root.transform.rotation;
        assert_eq!((r.x, r.y, r.z, r.w), (q.x, -q.y, -q.z, q.w));
    }

    #[test]
    fn test_missing_root_fails() {
        let scene = SceneDescription::default();
        assert!(matches!(
            NodeHierarchy::import(&scene, CoordinateConversion::MirrorX),
            Err(ImportError::MissingRoot)
        ));
    }
}
