use std::collections::BTreeMap;

use super::Node;

/// Total atom count per element symbol, every group multiplier applied.
/// Elements absent from the formula are absent from the map.
pub type Composition = BTreeMap<String, u64>;

/// Counts of a formula that came out of the parser, which has already
/// rejected anything whose counts overflow.
pub(super) fn flatten(nodes: &[Node]) -> Composition {
    try_flatten(nodes).unwrap_or_default()
}

/// `None` if any count overflows a `u64`
pub(super) fn try_flatten(nodes: &[Node]) -> Option<Composition> {
    let mut ret = Composition::new();
    walk(nodes, 1, &mut ret)?;
    Some(ret)
}

fn walk(nodes: &[Node], multiplier: u64, out: &mut Composition) -> Option<()> {
    for node in nodes {
        match node {
            Node::Leaf(leaf) => {
                let count = out.entry(leaf.symbol.clone()).or_insert(0);
                *count = count.checked_add(u64::from(leaf.amount).checked_mul(multiplier)?)?;
            }
            Node::Group(group) => walk(
                &group.children,
                multiplier.checked_mul(u64::from(group.multiplier))?,
                out,
            )?,
        }
    }
    Some(())
}
