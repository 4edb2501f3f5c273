//! Node ordering within a conversation's mapping

use std::collections::HashSet;

use super::{Conversation, Node};
use crate::config::NodeOrder;

/// Nodes of a conversation in the requested visiting order.
///
/// `Mapping` yields the mapping's own order. `Thread` walks from
/// `current_node` back to the root and reverses that chain; exports without
/// a usable `current_node` fall back to message `create_time` order.
pub fn ordered_nodes<'a>(conversation: &Conversation<'a>, order: NodeOrder) -> Vec<Node<'a>> {
    let Some(mapping) = conversation.mapping() else {
        return Vec::new();
    };

    match order {
        NodeOrder::Mapping => mapping.values().map(Node::new).collect(),
        NodeOrder::Thread => {
            let chain = conversation
                .current_node()
                .filter(|id| mapping.contains_key(*id))
                .map(|current| {
                    let mut chain = Vec::new();
                    let mut visited = HashSet::new();
                    let mut cursor = Some(current);
                    while let Some(id) = cursor {
                        if !visited.insert(id) {
                            break;
                        }
                        let Some(node) = mapping.get(id).map(Node::new) else {
                            break;
                        };
                        chain.push(node);
                        cursor = node.parent();
                    }
                    chain.reverse();
                    chain
                });

            chain.unwrap_or_else(|| {
                let mut nodes: Vec<_> = mapping.values().map(Node::new).collect();
                nodes.sort_by(|a, b| message_time(a).total_cmp(&message_time(b)));
                nodes
            })
        }
    }
}

fn message_time(node: &Node<'_>) -> f64 {
    node.message()
        .and_then(|message| message.create_time())
        .unwrap_or(0.0)
}
