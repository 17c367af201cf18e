//! End-to-end checks of the ancestry graphs against declarative
//! hierarchies.

use c1_core::{EntityToken, Hierarchy, HierarchyEntry, Providers};
use c1_graph::{
    GraphError, MemoryParentCache, ParentCache, RelationshipGraph, RelationshipGraphNodeType,
    RelationshipGraphSearchOption, RelationshipOrientedGraph, SledParentCache, MAX_LEVELS,
};
use std::collections::HashSet;

fn token(id: &str) -> EntityToken {
    EntityToken::new("data", "sql", id)
}

fn native(edges: &[(&str, &[&str])]) -> Hierarchy {
    let mut hierarchy = Hierarchy::new();
    for (child, parents) in edges {
        let parents = parents.iter().map(|p| token(p)).collect();
        hierarchy
            .insert(HierarchyEntry::new(token(child)).native(parents))
            .unwrap();
    }
    hierarchy
}

/// Three layers above the leaf, every node linked to every node of the
/// next layer.
fn layered() -> Hierarchy {
    let layers: [&[&str]; 4] = [&["leaf"], &["l1a", "l1b"], &["l2a", "l2b", "l2c"], &["top"]];
    let mut hierarchy = Hierarchy::new();
    for pair in layers.windows(2) {
        for child in pair[0] {
            let parents = pair[1].iter().map(|p| token(p)).collect();
            hierarchy
                .insert(HierarchyEntry::new(token(child)).native(parents))
                .unwrap();
        }
    }
    hierarchy
}

#[test]
fn test_layered_graph_depth_and_tops() {
    let hierarchy = layered();
    let graph =
        RelationshipGraph::new(token("leaf"), RelationshipGraphSearchOption::Native, &hierarchy)
            .unwrap();

    assert_eq!(graph.level_count(), 4);
    assert!(!graph.has_more_levels());

    // Global dedup: seven tokens, seven nodes.
    assert_eq!(graph.node_count(), 7);

    // l1b and l2b/l2c lost their parent edges to the first-discovered
    // siblings, so they end up as tops next to the real one.
    let tops: Vec<&str> = graph
        .top_nodes()
        .into_iter()
        .map(|n| n.entity_token.id.as_str())
        .collect();
    assert_eq!(tops, vec!["l1b", "l2b", "l2c", "top"]);

    let l2a = graph.find(&token("l2a")).unwrap();
    assert_eq!(graph.parents_of(l2a), vec![graph.find(&token("top")).unwrap()]);
}

#[test]
fn test_every_token_appears_once() {
    let hierarchy = native(&[
        ("a", &["b", "c"]),
        ("b", &["d", "e"]),
        ("c", &["d", "e", "a"]),
        ("d", &["e"]),
    ]);
    let graph =
        RelationshipGraph::new(token("a"), RelationshipGraphSearchOption::Native, &hierarchy)
            .unwrap();

    let mut seen = HashSet::new();
    for level in graph.expanded_levels() {
        for entity in level.all_entities() {
            assert!(seen.insert(entity.clone()), "{} listed twice", entity);
        }
    }
    assert_eq!(seen.len(), 5);
}

#[test]
fn test_diamond_top_appears_once_on_level_two() {
    let hierarchy = native(&[("a", &["b", "c"]), ("b", &["d"]), ("c", &["d"])]);
    let graph =
        RelationshipGraph::new(token("a"), RelationshipGraphSearchOption::Native, &hierarchy)
            .unwrap();

    let levels = graph.expanded_levels();
    assert_eq!(levels.len(), 3);
    assert_eq!(levels[2].entities, vec![token("d")]);
}

#[test]
fn test_lazy_level_past_depth_is_absent() {
    let hierarchy = native(&[("a", &["b"]), ("b", &["c"])]);
    let mut graph = RelationshipGraph::builder(token("a"))
        .lazy(true)
        .build(&hierarchy)
        .unwrap();

    assert!(graph.level(2).unwrap().is_some());
    assert!(graph.level(3).unwrap().is_none());
    assert!(!graph.has_more_levels());

    let count = graph.level_count();
    assert!(graph.level(50).unwrap().is_none());
    assert_eq!(graph.level_count(), count);
}

#[test]
fn test_both_mode_with_closure_providers() {
    let child = token("child");
    let providers = Providers::new()
        .native(|t: &EntityToken| (t.id == "child").then(|| vec![token("p1")]))
        .hooking(|t: &EntityToken| (t.id == "child").then(|| vec![token("p2")]));

    let graph = RelationshipGraph::new(child, RelationshipGraphSearchOption::Both, &providers)
        .unwrap();

    let p1 = graph.find(&token("p1")).unwrap();
    let p2 = graph.find(&token("p2")).unwrap();
    assert_eq!(graph.node(p1).unwrap().node_type, RelationshipGraphNodeType::Entity);
    assert_eq!(graph.node(p2).unwrap().node_type, RelationshipGraphNodeType::Hooking);
    assert_eq!(graph.node(p1).unwrap().level, 1);
    assert_eq!(graph.node(p2).unwrap().level, 1);
}

#[test]
fn test_hooked_mode_falls_back_to_hooks() {
    let providers = Providers::new()
        .auxiliary(|_: &EntityToken| -> Option<Vec<EntityToken>> { None })
        .hooking(|t: &EntityToken| (t.id == "child").then(|| vec![token("h1"), token("h2")]));

    let graph =
        RelationshipGraph::new(token("child"), RelationshipGraphSearchOption::Hooked, &providers)
            .unwrap();

    let level = &graph.expanded_levels()[1];
    assert_eq!(level.hooked_entities, vec![token("h1"), token("h2")]);
    assert!(level.entities.is_empty());
}

#[test]
fn test_overlong_chain_is_fatal() {
    // A1 <- A2 <- ... <- A1002
    let mut hierarchy = Hierarchy::new();
    for i in 1..=MAX_LEVELS + 1 {
        hierarchy
            .insert(
                HierarchyEntry::new(token(&format!("A{}", i)))
                    .native(vec![token(&format!("A{}", i + 1))]),
            )
            .unwrap();
    }

    let eager =
        RelationshipGraph::new(token("A1"), RelationshipGraphSearchOption::Native, &hierarchy);
    assert!(matches!(eager, Err(GraphError::ProbableInfiniteLoop { .. })));

    // Lazily the deepest legal level is still reachable.
    let mut lazy = RelationshipGraph::builder(token("A1"))
        .lazy(true)
        .build(&hierarchy)
        .unwrap();
    let last = lazy.level(MAX_LEVELS + 1).unwrap().unwrap();
    assert_eq!(last.entities, vec![token("A1002")]);

    let err = lazy.expand_all().unwrap_err();
    assert!(err.to_string().contains("data:sql:A1"));
}

#[test]
fn test_paths_through_shared_grandparent() {
    let hierarchy = native(&[("a", &["b", "c"]), ("b", &["g"]), ("c", &["g"])]);
    let mut graph = RelationshipOrientedGraph::new(token("a"), &hierarchy).unwrap();

    let paths = graph.all_paths();
    assert_eq!(
        paths,
        vec![
            vec![token("a"), token("b"), token("g")],
            vec![token("a"), token("c"), token("g")],
        ]
    );
}

#[test]
fn test_sled_cache_serves_second_graph() {
    let dir = tempfile::tempdir().unwrap();
    let cache = SledParentCache::open(dir.path()).unwrap();
    let hierarchy = native(&[("a", &["b"]), ("b", &["c"])]);

    let first = RelationshipGraph::builder(token("a"))
        .cache(&cache)
        .build(&hierarchy)
        .unwrap();
    assert_eq!(first.level_count(), 3);
    assert_eq!(cache.len(), 3);

    // An empty hierarchy can only be answered from the cache.
    let empty = Hierarchy::new();
    let second = RelationshipGraph::builder(token("a"))
        .cache(&cache)
        .build(&empty)
        .unwrap();
    assert_eq!(second.to_string(), first.to_string());

    cache.flush();
    let third = RelationshipGraph::builder(token("a"))
        .cache(&cache)
        .build(&empty)
        .unwrap();
    assert_eq!(third.level_count(), 1);
}

#[test]
fn test_memory_cache_is_scoped_by_user() {
    let cache = MemoryParentCache::new();
    let admin = native(&[("a", &["b"])]).with_user("admin");
    let editor = Hierarchy::new().with_user("editor");

    RelationshipGraph::builder(token("a"))
        .cache(&cache)
        .build(&admin)
        .unwrap();

    let graph = RelationshipGraph::builder(token("a"))
        .cache(&cache)
        .build(&editor)
        .unwrap();
    assert_eq!(graph.level_count(), 1);
}

#[test]
fn test_demo_site_hierarchy() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../demos/site.json");
    let hierarchy = Hierarchy::load(path).unwrap();
    let about = EntityToken::new("page", "pages", "about");
    let root = EntityToken::new("website", "pages", "root");

    let graph =
        RelationshipGraph::new(about.clone(), RelationshipGraphSearchOption::Both, &hierarchy)
            .unwrap();
    let levels = graph.expanded_levels();
    assert_eq!(levels[1].entities.len(), 1);
    assert_eq!(levels[1].hooked_entities.len(), 1);
    assert_eq!(levels[2].entities, vec![root.clone(), EntityToken::new("sitemap", "pages", "main")]);

    let mut oriented = RelationshipOrientedGraph::new(about, &hierarchy).unwrap();
    let paths = oriented.all_paths();
    assert_eq!(paths.len(), 3);
    assert!(paths.iter().all(|path| path.last() == Some(&root)));
}
