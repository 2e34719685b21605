use crate::areas::repository::Repository;
use crate::artifacts::graph::{self, GraphNode};
use crate::artifacts::objects::object_id::ObjectId;
use std::io::Write;

impl Repository {
    /// Render the commit history as Graphviz DOT on the output writer.
    ///
    /// By default only commits reachable from HEAD are drawn; `all` extends
    /// the walk to every branch tip.
    pub fn graph(&self, all: bool) -> anyhow::Result<()> {
        let head_oid = self.refs().read_head()?;

        let mut tips: Vec<ObjectId> = head_oid.iter().cloned().collect();
        if all {
            for branch in self.refs().list_branches()? {
                if let Some(oid) = self.refs().read_ref(&branch)? {
                    tips.push(oid);
                }
            }
        }

        let commits =
            graph::reachable_commits(tips, |oid: &ObjectId| self.database().slim_commit(oid))?;

        let labels = self.refs().reverse_refs()?;

        let nodes: Vec<GraphNode> = commits
            .keys()
            .map(|oid| {
                let commit = self.database().parse_commit(oid)?;
                Ok(GraphNode {
                    oid: oid.clone(),
                    parents: commit.parents().to_vec(),
                    message: commit.short_message(),
                    labels: labels
                        .get(oid)
                        .map(|branches| branches.iter().map(|b| b.to_string()).collect())
                        .unwrap_or_default(),
                    is_head: head_oid.as_ref() == Some(oid),
                })
            })
            .collect::<anyhow::Result<_>>()?;

        write!(self.writer(), "{}", graph::render_dot(&nodes))?;

        Ok(())
    }
}
