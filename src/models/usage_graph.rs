//! Directed file usage graph
//!
//! Nodes are project-relative file paths, edges point from an importer to the
//! file it imports. Reachability is a depth-first closure that tolerates
//! cycles.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use petgraph::Direction;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct UsageGraph {
    graph: DiGraph<PathBuf, ()>,
    indices: HashMap<PathBuf, NodeIndex>,
}

impl UsageGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file node, returning the existing index if already present
    pub fn add_file(&mut self, path: &Path) -> NodeIndex {
        if let Some(idx) = self.indices.get(path) {
            return *idx;
        }
        let idx = self.graph.add_node(path.to_path_buf());
        self.indices.insert(path.to_path_buf(), idx);
        idx
    }

    /// Add an import edge. Returns false when the edge already existed.
    pub fn add_import(&mut self, from: &Path, to: &Path) -> bool {
        let a = self.add_file(from);
        let b = self.add_file(to);
        if self.graph.contains_edge(a, b) {
            return false;
        }
        self.graph.add_edge(a, b, ());
        true
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.indices.contains_key(path)
    }

    pub fn file_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn import_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Files directly imported by `path`
    pub fn imports_of(&self, path: &Path) -> Vec<PathBuf> {
        self.neighbors(path, Direction::Outgoing)
    }

    /// Files that directly import `path`
    pub fn importers_of(&self, path: &Path) -> Vec<PathBuf> {
        self.neighbors(path, Direction::Incoming)
    }

    fn neighbors(&self, path: &Path, direction: Direction) -> Vec<PathBuf> {
        let Some(idx) = self.indices.get(path) else {
            return Vec::new();
        };
        let mut out: Vec<PathBuf> = self
            .graph
            .neighbors_directed(*idx, direction)
            .map(|n| self.graph[n].clone())
            .collect();
        out.sort();
        out
    }

    /// Every file reachable from `roots`, roots included
    ///
    /// Each node is visited at most once, so import cycles terminate. Roots that
    /// are not in the graph are ignored.
    pub fn reachable_from<'p, I>(&self, roots: I) -> HashSet<PathBuf>
    where
        I: IntoIterator<Item = &'p Path>,
    {
        let mut reached = HashSet::new();
        let mut dfs = Dfs::empty(&self.graph);

        for root in roots {
            let Some(start) = self.indices.get(root) else {
                continue;
            };
            dfs.move_to(*start);
            while let Some(nx) = dfs.next(&self.graph) {
                reached.insert(self.graph[nx].clone());
            }
        }

        reached
    }

    /// Render as Graphviz DOT; entry points green, unused files red
    pub fn to_dot(&self, entry_points: &[PathBuf], unused: &[PathBuf]) -> String {
        let mut dot = String::from("digraph usage {\n");
        dot.push_str("  rankdir=LR;\n");
        dot.push_str("  node [shape=box];\n\n");

        for idx in self.graph.node_indices() {
            let path = &self.graph[idx];
            let label = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown");

            let color = if entry_points.contains(path) {
                "green"
            } else if unused.contains(path) {
                "red"
            } else {
                "black"
            };

            dot.push_str(&format!(
                "  \"{}\" [label=\"{}\", color={}];\n",
                path.display(),
                label,
                color
            ));
        }

        dot.push('\n');

        for edge in self.graph.edge_indices() {
            if let Some((a, b)) = self.graph.edge_endpoints(edge) {
                dot.push_str(&format!(
                    "  \"{}\" -> \"{}\";\n",
                    self.graph[a].display(),
                    self.graph[b].display()
                ));
            }
        }

        dot.push_str("}\n");
        dot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> PathBuf {
        PathBuf::from(s)
    }

    #[test]
    fn test_reachability_follows_chain() {
        let mut graph = UsageGraph::new();
        graph.add_import(Path::new("main.ts"), Path::new("a.ts"));
        graph.add_import(Path::new("a.ts"), Path::new("b.ts"));
        graph.add_file(Path::new("orphan.ts"));

        let reached = graph.reachable_from([Path::new("main.ts")]);
        assert!(reached.contains(&p("main.ts")));
        assert!(reached.contains(&p("a.ts")));
        assert!(reached.contains(&p("b.ts")));
        assert!(!reached.contains(&p("orphan.ts")));
    }

    #[test]
    fn test_reachability_terminates_on_cycle() {
        let mut graph = UsageGraph::new();
        graph.add_import(Path::new("x.ts"), Path::new("y.ts"));
        graph.add_import(Path::new("y.ts"), Path::new("x.ts"));
        graph.add_import(Path::new("main.ts"), Path::new("x.ts"));

        let reached = graph.reachable_from([Path::new("main.ts")]);
        assert_eq!(reached.len(), 3);
    }

    #[test]
    fn test_duplicate_edges_collapse() {
        let mut graph = UsageGraph::new();
        assert!(graph.add_import(Path::new("a.ts"), Path::new("b.ts")));
        assert!(!graph.add_import(Path::new("a.ts"), Path::new("b.ts")));
        assert_eq!(graph.import_count(), 1);
        assert_eq!(graph.importers_of(Path::new("b.ts")), vec![p("a.ts")]);
        assert_eq!(graph.imports_of(Path::new("a.ts")), vec![p("b.ts")]);
    }

    #[test]
    fn test_to_dot_colors() {
        let mut graph = UsageGraph::new();
        graph.add_import(Path::new("main.ts"), Path::new("a.ts"));
        graph.add_file(Path::new("b.ts"));

        let dot = graph.to_dot(&[p("main.ts")], &[p("b.ts")]);
        assert!(dot.starts_with("digraph usage {"));
        assert!(dot.contains("\"main.ts\" [label=\"main.ts\", color=green]"));
        assert!(dot.contains("\"b.ts\" [label=\"b.ts\", color=red]"));
        assert!(dot.contains("\"main.ts\" -> \"a.ts\";"));
    }
}
