//! Branch filter: prune the tree down to the branches that mention a query.

use std::borrow::Cow;

use crate::model::Entity;

/// Normalized, case-insensitive search query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the entity's name or any attribute value contains the query.
    /// The empty query matches everything.
    pub fn matches(&self, e: &Entity) -> bool {
        if self.is_empty() {
            return true;
        }
        if e.name.to_lowercase().contains(&self.0) {
            return true;
        }
        e.attributes
            .values()
            .any(|v| v.to_lowercase().contains(&self.0))
    }
}

/// Recursively filter `node`, keeping each entity that matches or still has a
/// surviving descendant. Returns `None` when nothing in the subtree matches.
pub fn filter_tree(node: &Entity, query: &Query) -> Option<Entity> {
    let children: Vec<Entity> = node
        .children
        .iter()
        .filter_map(|c| filter_tree(c, query))
        .collect();
    if query.matches(node) || !children.is_empty() {
        Some(Entity {
            name: node.name.clone(),
            attributes: node.attributes.clone(),
            children,
        })
    } else {
        None
    }
}

/// The view shown for a search string: the original tree for an empty search,
/// the pruned tree otherwise, or the "not found" placeholder.
pub fn filtered_view<'a>(root: &'a Entity, search: &str) -> Cow<'a, Entity> {
    let query = Query::new(search);
    if query.is_empty() {
        return Cow::Borrowed(root);
    }
    match filter_tree(root, &query) {
        Some(tree) => {
            tracing::debug!(query = query.as_str(), kept = tree.count(), "branch filter");
            Cow::Owned(tree)
        }
        None => {
            tracing::debug!(query = query.as_str(), "branch filter matched nothing");
            Cow::Owned(Entity::not_found())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NOT_FOUND_LABEL, attrs};
    use proptest::prelude::*;

    fn family() -> Entity {
        Entity::new("Root").with_children(vec![
            Entity::new("Child One").with_attr(attrs::BIRTH, "1920"),
            Entity::new("Child Two").with_children(vec![
                Entity::new("Grandchild").with_attr(attrs::ROLE, "Trưởng họ"),
            ]),
        ])
    }

    fn names(e: &Entity) -> Vec<String> {
        let mut out = Vec::new();
        e.walk(&mut |n| out.push(n.name.clone()));
        out
    }

    #[test]
    fn search_keeps_only_the_matching_branch() {
        let tree = family();
        let view = filtered_view(&tree, "grandchild");
        assert_eq!(names(&view), ["Root", "Child Two", "Grandchild"]);
        assert_eq!(view.children.len(), 1);
    }

    #[test]
    fn search_is_trimmed_and_case_insensitive() {
        let tree = family();
        let view = filtered_view(&tree, "  TRƯỞNG  ");
        assert_eq!(names(&view), ["Root", "Child Two", "Grandchild"]);
    }

    #[test]
    fn attribute_values_are_searched() {
        let tree = family();
        let view = filtered_view(&tree, "1920");
        assert_eq!(names(&view), ["Root", "Child One"]);
    }

    #[test]
    fn matching_parent_drops_non_matching_children() {
        let tree = family();
        let view = filtered_view(&tree, "child two");
        assert_eq!(names(&view), ["Root", "Child Two"]);
    }

    #[test]
    fn no_match_yields_placeholder() {
        let tree = family();
        let view = filtered_view(&tree, "zzz-nobody");
        assert_eq!(view.name, NOT_FOUND_LABEL);
        assert!(view.children.is_empty());
        assert!(view.attributes.is_empty());
    }

    #[test]
    fn empty_search_borrows_the_original() {
        let tree = family();
        assert!(matches!(filtered_view(&tree, "   "), Cow::Borrowed(_)));
    }

    fn arb_entity() -> impl Strategy<Value = Entity> {
        let leaf = ("[a-e]{1,3}", proptest::option::of("[a-e]{1,2}")).prop_map(|(name, role)| {
            let e = Entity::new(name);
            match role {
                Some(r) => e.with_attr(attrs::ROLE, r),
                None => e,
            }
        });
        leaf.prop_recursive(4, 32, 4, |inner| {
            ("[a-e]{1,3}", prop::collection::vec(inner, 0..4))
                .prop_map(|(name, children)| Entity::new(name).with_children(children))
        })
    }

    fn any_match(e: &Entity, q: &Query) -> bool {
        q.matches(e) || e.children.iter().any(|c| any_match(c, q))
    }

    fn every_node_justified(e: &Entity, q: &Query) -> bool {
        (q.matches(e) || !e.children.is_empty())
            && e.children.iter().all(|c| every_node_justified(c, q))
    }

    proptest! {
        #[test]
        fn none_iff_nothing_matches(tree in arb_entity(), raw in "[a-f]{1,2}") {
            let q = Query::new(&raw);
            let out = filter_tree(&tree, &q);
            prop_assert_eq!(out.is_none(), !any_match(&tree, &q));
            if let Some(t) = out {
                prop_assert!(every_node_justified(&t, &q));
            }
        }

        #[test]
        fn always_true_is_identity(tree in arb_entity()) {
            let out = filter_tree(&tree, &Query::new(""));
            prop_assert_eq!(out, Some(tree));
        }

        #[test]
        fn refiltering_is_stable(tree in arb_entity(), raw in "[a-f]{1,2}") {
            let q = Query::new(&raw);
            if let Some(once) = filter_tree(&tree, &q) {
                let twice = filter_tree(&once, &q);
                prop_assert_eq!(twice, Some(once));
            }
        }
    }
}
