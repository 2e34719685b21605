//! Commit graph rendering
//!
//! Collects the commits reachable from a set of tips and renders them as a
//! Graphviz DOT digraph, with branch names and HEAD attached as label nodes.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::commit::SlimCommit;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt::Write;

/// One commit in the rendered graph.
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub oid: ObjectId,
    pub parents: Vec<ObjectId>,
    pub message: String,
    /// Branch names pointing at this commit.
    pub labels: Vec<String>,
    pub is_head: bool,
}

/// All commits reachable from `tips`, keyed by id.
///
/// Breadth-first walk over parent links; each commit is loaded once.
pub fn reachable_commits<CommitLoaderFn>(
    tips: impl IntoIterator<Item = ObjectId>,
    commit_loader: CommitLoaderFn,
) -> anyhow::Result<BTreeMap<ObjectId, SlimCommit>>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    let mut commits = BTreeMap::new();
    let mut queue: VecDeque<ObjectId> = tips.into_iter().collect();

    while let Some(oid) = queue.pop_front() {
        if commits.contains_key(&oid) {
            continue;
        }
        let commit = commit_loader(&oid)?;
        queue.extend(commit.parents.iter().cloned());
        commits.insert(oid, commit);
    }

    Ok(commits)
}

/// Renders `nodes` as a DOT digraph.
///
/// Commit nodes are labelled with their short id and message summary and
/// point at their parents. Branch labels and HEAD are drawn as plaintext
/// nodes with an edge to the commit they reference.
pub fn render_dot(nodes: &[GraphNode]) -> String {
    let mut dot = String::new();
    dot.push_str("digraph history {\n");
    dot.push_str("    rankdir=RL;\n");
    dot.push_str("    node [shape=box, fontname=\"monospace\"];\n");

    let known: HashMap<&ObjectId, ()> = nodes.iter().map(|node| (&node.oid, ())).collect();

    for node in nodes {
        let _ = writeln!(
            dot,
            "    \"{}\" [label=\"{} {}\"];",
            node.oid,
            node.oid.to_short_oid(),
            escape_label(&node.message)
        );
        for parent in &node.parents {
            // tips may reach commits outside the selected set when rendering
            // a single branch; skip edges to unrendered commits
            if known.contains_key(parent) {
                let _ = writeln!(dot, "    \"{}\" -> \"{}\";", node.oid, parent);
            }
        }
    }

    for node in nodes {
        for label in &node.labels {
            let _ = writeln!(
                dot,
                "    \"{label}\" [shape=plaintext];\n    \"{label}\" -> \"{}\";",
                node.oid
            );
        }
        if node.is_head {
            let _ = writeln!(
                dot,
                "    \"HEAD\" [shape=plaintext];\n    \"HEAD\" -> \"{}\";",
                node.oid
            );
        }
    }

    dot.push_str("}\n");
    dot
}

fn escape_label(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
