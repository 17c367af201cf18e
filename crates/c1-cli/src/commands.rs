//! CLI command implementations.

use crate::config::Config;
use c1_core::{EntityToken, Hierarchy};
use c1_graph::{
    RelationshipGraph, RelationshipGraphLevel, RelationshipGraphSearchOption,
    RelationshipOrientedGraph, SledParentCache,
};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::debug;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Write a default configuration.
pub fn init(path: &Path) -> Result<()> {
    let config_path = Config::path(path);

    if config_path.exists() {
        println!("{} Already initialized", "✓".green());
        return Ok(());
    }

    let written = Config::default().save(path)?;

    println!("{} Wrote {}", "✓".green(), written.display());
    println!(
        "  Run {} to expand a token",
        "c1 levels <hierarchy.json> <type:source:id>".cyan()
    );

    Ok(())
}

/// Arguments of the `levels` command.
pub struct LevelsArgs<'a> {
    pub hierarchy: &'a Path,
    pub token: &'a str,
    pub search: Option<&'a str>,
    pub depth: Option<usize>,
    pub user: Option<String>,
    pub cache: bool,
    pub cache_dir: Option<PathBuf>,
    pub raw: bool,
    pub json: bool,
}

/// Expand and print the level graph of a token.
pub fn levels(args: LevelsArgs<'_>) -> Result<()> {
    let config = Config::load(&std::env::current_dir()?)?;

    let search = match args.search {
        Some(s) => s.parse::<RelationshipGraphSearchOption>()?,
        None => config.search,
    };
    let token: EntityToken = args.token.parse()?;

    let mut hierarchy = Hierarchy::load(args.hierarchy)?;
    if let Some(user) = args.user.or(config.user.clone()) {
        hierarchy = hierarchy.with_user(user);
    }

    let store = if args.cache || args.cache_dir.is_some() {
        let dir = config.cache_dir(args.cache_dir)?;
        debug!("Using parent cache at {}", dir.display());
        Some(SledParentCache::open(&dir)?)
    } else {
        None
    };

    let mut builder = RelationshipGraph::builder(token.clone())
        .search(search)
        .lazy(args.depth.is_some());
    if let Some(store) = &store {
        builder = builder.cache(store);
    }
    let mut graph = builder.build(&hierarchy)?;

    if let Some(depth) = args.depth {
        graph.level(depth)?;
    }

    if args.raw {
        print!("{}", graph);
        return Ok(());
    }

    let levels = graph.expanded_levels();
    let tops: Vec<&EntityToken> = graph.top_nodes().into_iter().map(|n| &n.entity_token).collect();
    let bottoms: Vec<&EntityToken> = graph
        .bottom_nodes()
        .into_iter()
        .map(|n| &n.entity_token)
        .collect();

    if args.json {
        let output = serde_json::json!({
            "token": token,
            "search": search,
            "levels": levels,
            "top": tops,
            "bottom": bottoms,
            "complete": !graph.has_more_levels(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{} {} {}",
        "Ancestry of".cyan().bold(),
        token.to_string().cyan(),
        format!("(search: {})", search).dimmed()
    );
    println!();

    for level in &levels {
        print_level(level);
    }

    if graph.has_more_levels() {
        println!("  {}", "... more levels available".dimmed());
    }

    println!();
    println!("{} {}", "Top:".dimmed(), join(&tops));
    println!("{} {}", "Bottom:".dimmed(), join(&bottoms));

    Ok(())
}

fn print_level(level: &RelationshipGraphLevel) {
    println!("{} {}", "Level".yellow(), level.level.to_string().yellow().bold());
    for token in &level.entities {
        println!("  {} {}", "native".green(), token);
    }
    for token in &level.hooked_entities {
        println!("  {} {}", "hooked".magenta(), token);
    }
}

fn join(tokens: &[&EntityToken]) -> String {
    tokens
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Print every ancestor path of a token.
pub fn paths(hierarchy: &Path, token: &str, json_output: bool) -> Result<()> {
    let token: EntityToken = token.parse()?;
    let hierarchy = Hierarchy::load(hierarchy)?;

    let mut graph = RelationshipOrientedGraph::new(token.clone(), &hierarchy)?;
    let paths = graph.all_paths();

    if json_output {
        let output = serde_json::json!({
            "token": token,
            "paths": paths,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if paths.is_empty() {
        println!("No ancestor paths found for {}", token);
        return Ok(());
    }

    let arrow = format!(" {} ", "→".dimmed());
    println!("Found {} path(s):\n", paths.len());
    for path in &paths {
        let rendered: Vec<String> = path.iter().map(|t| t.to_string()).collect();
        println!("  {}", rendered.join(arrow.as_str()));
    }

    Ok(())
}

/// Drop every entry of the persistent cache.
pub fn cache_clear(cache_dir: Option<PathBuf>) -> Result<()> {
    let config = Config::load(&std::env::current_dir()?)?;
    let dir = config.cache_dir(cache_dir)?;

    if !dir.exists() {
        println!("{} No cache at {}", "✓".green(), dir.display());
        return Ok(());
    }

    let store = SledParentCache::open(&dir)?;
    let entries = store.len();
    store.clear()?;

    println!(
        "{} Cleared {} entries from {}",
        "✓".green(),
        entries.to_string().cyan(),
        dir.display()
    );

    Ok(())
}

/// Show the persistent cache location and size.
pub fn cache_status(cache_dir: Option<PathBuf>) -> Result<()> {
    let config = Config::load(&std::env::current_dir()?)?;
    let dir = config.cache_dir(cache_dir)?;

    println!("{}", "Parent Cache".cyan().bold());
    println!();
    println!("  {} {}", "Location:".dimmed(), dir.display());

    if dir.exists() {
        let store = SledParentCache::open(&dir)?;
        println!("  {} {}", "Entries:".dimmed(), store.len());
    } else {
        println!("  {} {}", "Entries:".dimmed(), "not created".dimmed());
    }

    Ok(())
}
