/// 目標點四叉樹空間索引
///
/// 只索引偵測用的目標點，不是遮擋物加速結構
use vek::Vec2;

use crate::vision::targets::TargetInfo;

/// 四叉樹節點
#[derive(Debug, Clone)]
pub struct QuadTreeNode {
    /// 節點邊界
    pub bounds: Bounds,
    /// 子節點（NW, NE, SW, SE）
    pub children: Option<Box<[QuadTreeNode; 4]>>,
    /// 存儲的目標
    pub targets: Vec<TargetInfo>,
    /// 節點深度
    pub depth: usize,
}

/// 邊界矩形（XZ 平面）
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    pub min: Vec2<f32>,
    pub max: Vec2<f32>,
}

impl Bounds {
    pub fn new(min: Vec2<f32>, max: Vec2<f32>) -> Self {
        Self { min, max }
    }

    pub fn contains_point(&self, point: Vec2<f32>) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}

pub struct QuadTree {
    pub root: Option<QuadTreeNode>,
    pub max_tree_depth: usize,
    pub max_targets_per_node: usize,
}

impl QuadTree {
    pub fn new(max_tree_depth: usize, max_targets_per_node: usize) -> Self {
        Self {
            root: None,
            max_tree_depth,
            max_targets_per_node,
        }
    }

    /// 初始化四叉樹
    pub fn initialize(&mut self, world_bounds: Bounds, targets: Vec<TargetInfo>) {
        let mut root = QuadTreeNode {
            bounds: world_bounds,
            children: None,
            targets,
            depth: 0,
        };

        self.subdivide_node(&mut root);
        self.root = Some(root);
    }

    /// 遞歸細分節點
    fn subdivide_node(&self, node: &mut QuadTreeNode) {
        if node.targets.len() <= self.max_targets_per_node || node.depth >= self.max_tree_depth {
            return;
        }

        let bounds = &node.bounds;
        let mid_x = (bounds.min.x + bounds.max.x) * 0.5;
        let mid_y = (bounds.min.y + bounds.max.y) * 0.5;

        let mut children = Box::new([
            // 西北
            QuadTreeNode {
                bounds: Bounds {
                    min: Vec2::new(bounds.min.x, mid_y),
                    max: Vec2::new(mid_x, bounds.max.y),
                },
                children: None,
                targets: Vec::new(),
                depth: node.depth + 1,
            },
            // 東北
            QuadTreeNode {
                bounds: Bounds {
                    min: Vec2::new(mid_x, mid_y),
                    max: bounds.max,
                },
                children: None,
                targets: Vec::new(),
                depth: node.depth + 1,
            },
            // 西南
            QuadTreeNode {
                bounds: Bounds {
                    min: bounds.min,
                    max: Vec2::new(mid_x, mid_y),
                },
                children: None,
                targets: Vec::new(),
                depth: node.depth + 1,
            },
            // 東南
            QuadTreeNode {
                bounds: Bounds {
                    min: Vec2::new(mid_x, bounds.min.y),
                    max: Vec2::new(bounds.max.x, mid_y),
                },
                children: None,
                targets: Vec::new(),
                depth: node.depth + 1,
            },
        ]);

        // 每個目標點只分配到第一個包含它的子節點，避免重複回報
        for target in node.targets.drain(..) {
            let flat = Vec2::new(target.position.x, target.position.z);
            for child in children.iter_mut() {
                if child.bounds.contains_point(flat) {
                    child.targets.push(target);
                    break;
                }
            }
        }

        node.children = Some(children);

        // 遞歸細分子節點
        if let Some(ref mut children) = node.children {
            for child in children.iter_mut() {
                self.subdivide_node(child);
            }
        }
    }

    /// 查詢範圍內的目標
    pub fn query_targets_in_range(&self, center: Vec2<f32>, range: f32) -> Vec<TargetInfo> {
        let mut targets = Vec::new();

        if let Some(ref tree) = self.root {
            let query_bounds = Bounds {
                min: center - Vec2::new(range, range),
                max: center + Vec2::new(range, range),
            };

            self.query_node_recursive(tree, &query_bounds, center, range, &mut targets);
        }

        targets
    }

    /// 遞歸查詢節點
    fn query_node_recursive(
        &self,
        node: &QuadTreeNode,
        query_bounds: &Bounds,
        center: Vec2<f32>,
        range: f32,
        results: &mut Vec<TargetInfo>,
    ) {
        if !self.bounds_intersect(&node.bounds, query_bounds) {
            return;
        }

        for target in &node.targets {
            let flat = Vec2::new(target.position.x, target.position.z);
            if flat.distance(center) <= range {
                results.push(target.clone());
            }
        }

        if let Some(ref children) = node.children {
            for child in children.iter() {
                self.query_node_recursive(child, query_bounds, center, range, results);
            }
        }
    }

    /// 檢查兩個邊界是否相交
    fn bounds_intersect(&self, bounds1: &Bounds, bounds2: &Bounds) -> bool {
        bounds1.min.x <= bounds2.max.x && bounds1.max.x >= bounds2.min.x &&
        bounds1.min.y <= bounds2.max.y && bounds1.max.y >= bounds2.min.y
    }

    /// 計算四叉樹節點數量
    pub fn count_nodes(&self) -> usize {
        if let Some(ref root) = self.root {
            self.count_nodes_recursive(root)
        } else {
            0
        }
    }

    /// 遞歸計算節點數量
    fn count_nodes_recursive(&self, node: &QuadTreeNode) -> usize {
        let mut count = 1;
        if let Some(ref children) = node.children {
            for child in children.iter() {
                count += self.count_nodes_recursive(child);
            }
        }
        count
    }
}
