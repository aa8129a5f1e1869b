use std::collections::HashMap;

use crate::geometry::Point2D;

pub type Tags = HashMap<String, String>;

/// Attribute access shared by nodes, ways and relations
pub trait Tagged {
    fn tags(&self) -> &Tags;

    fn attribute(&self, key: &str) -> Option<&str> {
        self.tags().get(key).map(String::as_str)
    }

    /// `value: None` matches any value of `key`
    fn has_attribute(&self, key: &str, value: Option<&str>) -> bool {
        match (self.attribute(key), value) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(found), Some(wanted)) => found == wanted,
        }
    }
}

/// A node projected onto the local plane
#[derive(Debug, Clone)]
pub struct Node {
    pub id: u64,
    pub position: Point2D,
    pub tags: Tags,
}

/// An ordered list of node references
#[derive(Debug, Clone)]
pub struct Way {
    pub id: u64,
    pub nodes: Vec<u64>,
    pub tags: Tags,
}

impl Way {
    pub fn first_node(&self) -> Option<u64> {
        self.nodes.first().copied()
    }

    pub fn last_node(&self) -> Option<u64> {
        self.nodes.last().copied()
    }

    pub fn is_closed(&self) -> bool {
        self.nodes.len() > 1 && self.first_node() == self.last_node()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Node,
    Way,
}

#[derive(Debug, Clone)]
pub struct Member {
    pub kind: MemberKind,
    pub id: u64,
    pub role: String,
}

#[derive(Debug, Clone)]
pub struct Relation {
    pub id: u64,
    pub members: Vec<Member>,
    pub tags: Tags,
}

impl Relation {
    /// Role of the member with the given way id, if it is a member
    pub fn role_of_way(&self, way_id: u64) -> Option<&str> {
        self.members
            .iter()
            .find(|m| m.kind == MemberKind::Way && m.id == way_id)
            .map(|m| m.role.as_str())
    }
}

impl Tagged for Node {
    fn tags(&self) -> &Tags {
        &self.tags
    }
}

impl Tagged for Way {
    fn tags(&self) -> &Tags {
        &self.tags
    }
}

impl Tagged for Relation {
    fn tags(&self) -> &Tags {
        &self.tags
    }
}

/// Resolves node ids to positions
pub trait NodeLookup {
    fn position(&self, node_id: u64) -> Option<Point2D>;
}

impl NodeLookup for HashMap<u64, Point2D> {
    fn position(&self, node_id: u64) -> Option<Point2D> {
        self.get(&node_id).copied()
    }
}
