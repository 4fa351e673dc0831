//! Topological traversal and the reverse-mode backward pass.

use log::trace;

use super::graph::{Graph, NodeId};

impl Graph {
    /// Depth-first post-order of every node reachable from `root`.
    ///
    /// Each distinct node appears once, after all of its operands. The visited set is
    /// keyed by id, so a node shared by many consumers is expanded only the first time
    /// it is reached. Iterative, so deep chains do not grow the call stack.
    ///
    /// # Panics
    ///
    /// Panics if `root` was issued by another graph or was truncated away.
    #[must_use]
    pub fn topo_order(&self, root: NodeId) -> Vec<NodeId> {
        self.slot(root);
        let nodes = self.nodes.borrow();
        let mut visited = vec![false; nodes.len()];
        let mut order = Vec::new();
        // (node, operands already pushed)
        let mut stack = vec![(root, false)];

        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                order.push(id);
                continue;
            }
            if visited[id.index] {
                continue;
            }
            visited[id.index] = true;
            stack.push((id, true));
            for operand in nodes[id.index].op.operands() {
                if !visited[operand.index] {
                    stack.push((operand, false));
                }
            }
        }
        order
    }

    /// Propagates gradients from `root` to every node it depends on.
    ///
    /// Sets `root`'s gradient to 1.0, then visits nodes in reverse topological order and
    /// adds `partial * grad(node)` into each operand, once per use site. By the time a
    /// node is visited all of its consumers have already contributed, so its gradient is
    /// the full sum over paths.
    ///
    /// Gradients of other nodes are accumulated, not reset: call [`Graph::zero_grad`] on
    /// reused nodes between passes.
    ///
    /// # Panics
    ///
    /// Panics if `root` was issued by another graph or was truncated away.
    pub fn backward(&self, root: NodeId) {
        let order = self.topo_order(root);
        let mut nodes = self.nodes.borrow_mut();
        nodes[root.index].grad = 1.0;

        for &id in order.iter().rev() {
            let node = &nodes[id.index];
            let upstream = node.grad;
            let partials = node.op.partials(node.value, |operand| nodes[operand.index].value);
            for (operand, local) in partials.into_iter().flatten() {
                nodes[operand.index].grad += local * upstream;
            }
        }
        trace!("backward from {root}: {} nodes visited", order.len());
    }
}
