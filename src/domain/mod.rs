pub mod feature;

pub use feature::{Member, MemberKind, Node, NodeLookup, Relation, Tagged, Tags, Way};
