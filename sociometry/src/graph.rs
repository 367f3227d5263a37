//! The directed graph drawn in a sociogram.

use log::debug;
use std::collections::HashMap;

use crate::config::*;

/// The fill colour of a node. Popular and very popular participants share the same colour.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum NodeColor {
    Red,
    Orange,
    Yellow,
    Green,
}

impl NodeColor {
    pub fn from_tier(tier: Tier) -> NodeColor {
        match tier {
            Tier::Isolated => NodeColor::Red,
            Tier::Limited => NodeColor::Orange,
            Tier::Adequate => NodeColor::Yellow,
            Tier::Popular | Tier::VeryPopular => NodeColor::Green,
        }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            NodeColor::Red => (255, 0, 0),
            NodeColor::Orange => (255, 165, 0),
            NodeColor::Yellow => (255, 255, 0),
            NodeColor::Green => (0, 128, 0),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SociogramNode {
    pub name: String,
    /// `None` for a name that only appears in the nominations.
    pub rank: Option<u32>,
    pub score: u32,
    pub color: NodeColor,
}

impl SociogramNode {
    /// The text displayed on the node: "{rank}. {name}".
    pub fn label(&self) -> String {
        match self.rank {
            Some(rank) => format!("{}. {}", rank, self.name),
            None => self.name.clone(),
        }
    }
}

/// An edge from the nominator to the nominee, as indexes in [`Sociogram::nodes`].
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct SociogramEdge {
    pub from: usize,
    pub to: usize,
}

impl SociogramEdge {
    pub fn is_loop(&self) -> bool {
        self.from == self.to
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Sociogram {
    /// In the order of the result table.
    pub nodes: Vec<SociogramNode>,
    /// In the order of the nominations.
    pub edges: Vec<SociogramEdge>,
}

impl Sociogram {
    pub fn from_result(result: &SociometryResult) -> Sociogram {
        Sociogram::from_parts(&result.table, &result.nominations)
    }

    /// Builds the graph from a result table and a list of nominations.
    ///
    /// Nominees or nominators missing from the table still get a node, without a rank,
    /// at the end of the node list.
    pub fn from_parts(table: &[ScoreRow], nominations: &[Nomination]) -> Sociogram {
        let mut nodes: Vec<SociogramNode> = table
            .iter()
            .map(|row| SociogramNode {
                name: row.name.clone(),
                rank: Some(row.rank),
                score: row.score,
                color: NodeColor::from_tier(row.tier),
            })
            .collect();
        let mut index: HashMap<String, usize> = nodes
            .iter()
            .enumerate()
            .map(|(idx, n)| (n.name.clone(), idx))
            .collect();

        let mut edges: Vec<SociogramEdge> = Vec::new();
        for n in nominations.iter() {
            let from = node_index(&mut nodes, &mut index, &n.nominator);
            let to = node_index(&mut nodes, &mut index, &n.nominee);
            edges.push(SociogramEdge { from, to });
        }

        // Names outside the table are scored with the edges of this graph.
        for edge in edges.iter() {
            let node = &mut nodes[edge.to];
            if node.rank.is_none() {
                node.score += 1;
                node.color = NodeColor::from_tier(Tier::from_score(node.score));
            }
        }
        debug!(
            "Sociogram::from_parts: {} nodes, {} edges",
            nodes.len(),
            edges.len()
        );
        Sociogram { nodes, edges }
    }

    /// The edges as pairs of node indexes.
    pub fn edge_pairs(&self) -> Vec<(usize, usize)> {
        self.edges.iter().map(|e| (e.from, e.to)).collect()
    }
}

fn node_index(
    nodes: &mut Vec<SociogramNode>,
    index: &mut HashMap<String, usize>,
    name: &str,
) -> usize {
    if let Some(idx) = index.get(name) {
        return *idx;
    }
    let idx = nodes.len();
    nodes.push(SociogramNode {
        name: name.to_string(),
        rank: None,
        score: 0,
        color: NodeColor::from_tier(Tier::Isolated),
    });
    index.insert(name.to_string(), idx);
    idx
}
