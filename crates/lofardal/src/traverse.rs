//! Enumeration of existing children.
//!
//! Existence is decided by what is stored, never by count attributes such as
//! `NOF_BEAMS`. Indexed kinds are probed from index 0 upwards and the
//! sequence ends at the first gap; keyed kinds list stored names by prefix.

use std::vec;

use tracing::warn;

use crate::naming;
use crate::node::Node;
use crate::schema::NodeKind;

enum State {
    Indexed { next: usize },
    Keyed { prefix: Option<&'static str>, names: Option<vec::IntoIter<String>> },
    Done,
}

/// Lazy iterator over the children of one kind. See [`children`].
pub struct Children {
    parent: Node,
    kind: NodeKind,
    state: State,
}

impl Iterator for Children {
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        match &mut self.state {
            State::Indexed { next } => {
                let name = naming::indexed_name(self.kind, *next)?;
                if !self.parent.has_child(&name) {
                    self.state = State::Done;
                    return None;
                }
                *next += 1;
                Some(self.parent.child_node(&name, self.kind))
            }
            State::Keyed { prefix, names } => {
                let prefix = *prefix;
                let names = names.get_or_insert_with(|| {
                    let mut all = self.parent.child_names().unwrap_or_default();
                    if let Some(p) = prefix {
                        all.retain(|n| n.starts_with(p));
                    }
                    all.into_iter()
                });
                let name = names.next()?;
                Some(self.parent.child_node(&name, self.kind))
            }
            State::Done => None,
        }
    }
}

/// Children of `parent` of the given kind.
///
/// Calling this again restarts the enumeration against the current file
/// contents.
pub fn children(parent: &Node, kind: NodeKind) -> Children {
    let state = if naming::indexed_name(kind, 0).is_some() {
        State::Indexed { next: 0 }
    } else {
        State::Keyed {
            prefix: naming::key_prefix(kind),
            names: None,
        }
    };
    Children {
        parent: parent.clone(),
        kind,
        state,
    }
}

/// Log a warning when the count attribute `attr` disagrees with `actual`.
///
/// Returns whether they agree; an absent count attribute agrees.
pub fn check_count(node: &Node, attr: &str, actual: usize) -> bool {
    match node.attribute::<u32>(attr).get() {
        Ok(declared) if declared as usize != actual => {
            warn!(
                path = node.path(),
                attribute = attr,
                declared,
                actual,
                "count attribute disagrees with stored children"
            );
            false
        }
        _ => true,
    }
}
