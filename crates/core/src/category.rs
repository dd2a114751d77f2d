//! Category hierarchy helpers.
//!
//! The tree is stored as an adjacency list (`parent_id`). These functions
//! work over any row type implementing [`CategoryLike`] so the database
//! crate can hand its rows straight in.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::types::DbId;

/// Level of a root category.
pub const ROOT_LEVEL: i32 = 1;

/// Separator used when rendering a category path as a label.
pub const PATH_SEPARATOR: &str = "-";

/// Read access to the fields the hierarchy helpers need.
pub trait CategoryLike {
    fn id(&self) -> DbId;
    fn parent_id(&self) -> Option<DbId>;
    fn level(&self) -> i32;
    fn sort_order(&self) -> i32;
    fn name(&self) -> &str;
}

/// A category with its children nested beneath it.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryTreeNode<T> {
    #[serde(flatten)]
    pub category: T,
    pub children: Vec<CategoryTreeNode<T>>,
}

/// Level of a category created under a parent at `parent_level`.
pub fn compute_level(parent_level: Option<i32>) -> i32 {
    parent_level.map_or(ROOT_LEVEL, |level| level + 1)
}

/// Nest a flat list into a forest.
///
/// Siblings are ordered by `(sort_order, id)`. A row whose parent is not in
/// `categories` becomes a root.
pub fn build_tree<T: CategoryLike>(categories: Vec<T>) -> Vec<CategoryTreeNode<T>> {
    let ids: HashSet<DbId> = categories.iter().map(|c| c.id()).collect();

    let mut children_of: HashMap<Option<DbId>, Vec<T>> = HashMap::new();
    for category in categories {
        let parent = category.parent_id().filter(|p| ids.contains(p));
        children_of.entry(parent).or_default().push(category);
    }
    for siblings in children_of.values_mut() {
        siblings.sort_by_key(|c| (c.sort_order(), c.id()));
    }

    let mut visited = HashSet::new();
    attach_children(None, &mut children_of, &mut visited)
}

fn attach_children<T: CategoryLike>(
    parent: Option<DbId>,
    children_of: &mut HashMap<Option<DbId>, Vec<T>>,
    visited: &mut HashSet<DbId>,
) -> Vec<CategoryTreeNode<T>> {
    let Some(siblings) = children_of.remove(&parent) else {
        return Vec::new();
    };

    siblings
        .into_iter()
        .filter_map(|category| {
            if !visited.insert(category.id()) {
                return None;
            }
            let children = attach_children(Some(category.id()), children_of, visited);
            Some(CategoryTreeNode { category, children })
        })
        .collect()
}

/// Ancestor ids of `id`, root first, ending with `id` itself.
///
/// Stops at a missing parent or a repeated id, so corrupt data yields a
/// truncated chain instead of looping.
pub fn ancestor_ids<T: CategoryLike>(id: DbId, categories: &[T]) -> Vec<DbId> {
    let by_id: HashMap<DbId, &T> = categories.iter().map(|c| (c.id(), c)).collect();
    let mut chain = Vec::new();
    let mut seen = HashSet::new();
    let mut current = Some(id);

    while let Some(cid) = current {
        if !seen.insert(cid) {
            break;
        }
        let Some(category) = by_id.get(&cid) else {
            break;
        };
        chain.push(cid);
        current = category.parent_id();
    }

    chain.reverse();
    chain
}

/// Category names from the root down to `id`.
pub fn path_of<T: CategoryLike>(id: DbId, categories: &[T]) -> Vec<String> {
    let by_id: HashMap<DbId, &T> = categories.iter().map(|c| (c.id(), c)).collect();
    ancestor_ids(id, categories)
        .into_iter()
        .filter_map(|cid| by_id.get(&cid).map(|c| c.name().to_string()))
        .collect()
}

/// Render a path, appending the item's unique code when it has one.
///
/// `["Robotics", "Hands"]` with `LHT3000` becomes `Robotics-Hands-LHT3000`.
pub fn path_label(path: &[String], unique_code: Option<&str>) -> String {
    let mut parts: Vec<&str> = path.iter().map(String::as_str).collect();
    if let Some(code) = unique_code.filter(|c| !c.is_empty()) {
        parts.push(code);
    }
    parts.join(PATH_SEPARATOR)
}

/// Name indented by depth, for flat select lists.
pub fn display_name(name: &str, level: i32) -> String {
    let depth = usize::try_from(level - ROOT_LEVEL).unwrap_or(0);
    format!("{}{name}", "  ".repeat(depth))
}

/// Depth-first flattening of a forest, parents before children.
pub fn flatten_tree<T>(nodes: Vec<CategoryTreeNode<T>>) -> Vec<T> {
    let mut out = Vec::new();
    for node in nodes {
        out.push(node.category);
        out.extend(flatten_tree(node.children));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct Cat {
        id: DbId,
        parent_id: Option<DbId>,
        level: i32,
        sort_order: i32,
        name: String,
    }

    impl CategoryLike for Cat {
        fn id(&self) -> DbId {
            self.id
        }
        fn parent_id(&self) -> Option<DbId> {
            self.parent_id
        }
        fn level(&self) -> i32 {
            self.level
        }
        fn sort_order(&self) -> i32 {
            self.sort_order
        }
        fn name(&self) -> &str {
            &self.name
        }
    }

    fn cat(id: DbId, parent_id: Option<DbId>, level: i32, sort_order: i32, name: &str) -> Cat {
        Cat {
            id,
            parent_id,
            level,
            sort_order,
            name: name.to_string(),
        }
    }

    fn sample() -> Vec<Cat> {
        vec![
            cat(3, Some(1), 2, 1, "Hands"),
            cat(1, None, 1, 0, "Robotics"),
            cat(2, Some(1), 2, 0, "Arms"),
            cat(4, Some(3), 3, 0, "Dexterous"),
            cat(5, None, 1, 0, "Sensors"),
        ]
    }

    #[test]
    fn test_compute_level() {
        assert_eq!(compute_level(None), 1);
        assert_eq!(compute_level(Some(1)), 2);
        assert_eq!(compute_level(Some(3)), 4);
    }

    #[test]
    fn test_build_tree_nests_and_orders() {
        let tree = build_tree(sample());
        let roots: Vec<&str> = tree.iter().map(|n| n.category.name.as_str()).collect();
        assert_eq!(roots, vec!["Robotics", "Sensors"]);

        let robotics = &tree[0];
        let kids: Vec<&str> = robotics
            .children
            .iter()
            .map(|n| n.category.name.as_str())
            .collect();
        assert_eq!(kids, vec!["Arms", "Hands"]);
        assert_eq!(robotics.children[1].children[0].category.name, "Dexterous");
    }

    #[test]
    fn test_orphan_becomes_root() {
        let tree = build_tree(vec![cat(9, Some(42), 2, 0, "Stray")]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].category.id, 9);
    }

    #[test]
    fn test_cycle_does_not_hang() {
        let looped = vec![cat(1, Some(2), 2, 0, "A"), cat(2, Some(1), 2, 0, "B")];
        assert_eq!(path_of(1, &looped), vec!["B", "A"]);
        // Neither row is reachable from a root.
        assert!(build_tree(looped).is_empty());
    }

    #[test]
    fn test_path_of_walks_to_root() {
        let cats = sample();
        assert_eq!(path_of(4, &cats), vec!["Robotics", "Hands", "Dexterous"]);
        assert_eq!(path_of(5, &cats), vec!["Sensors"]);
        assert!(path_of(99, &cats).is_empty());
    }

    #[test]
    fn test_path_label() {
        let path = vec!["Robotics".to_string(), "Hands".to_string()];
        assert_eq!(path_label(&path, Some("LHT3000")), "Robotics-Hands-LHT3000");
        assert_eq!(path_label(&path, None), "Robotics-Hands");
        assert_eq!(path_label(&path, Some("")), "Robotics-Hands");
    }

    #[test]
    fn test_display_name_indents_by_level() {
        assert_eq!(display_name("Robotics", 1), "Robotics");
        assert_eq!(display_name("Dexterous", 3), "    Dexterous");
    }

    #[test]
    fn test_ancestor_ids_root_first() {
        assert_eq!(ancestor_ids(4, &sample()), vec![1, 3, 4]);
        assert_eq!(ancestor_ids(2, &sample()), vec![1, 2]);
    }

    #[test]
    fn test_flatten_is_depth_first() {
        let names: Vec<String> = flatten_tree(build_tree(sample()))
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Robotics", "Arms", "Hands", "Dexterous", "Sensors"]);
    }
}
