//! Netlist construction: grouping electrically joined pins into nets.

use std::collections::{HashMap, HashSet, VecDeque};

use super::types::{ComponentId, PinRef, Wire};
use crate::components::Component;

/// Index of a net within one [`Netlist`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetId(pub usize);

/// A maximal set of mutually connected pins.
#[derive(Debug, Clone, PartialEq)]
pub struct Net {
    pub id: NetId,
    /// Member pins in discovery order
    pub pins: Vec<PinRef>,
}

/// A partition of every connected pin into disjoint nets.
///
/// Only pins touched by at least one edge (a wire or an internal short)
/// appear here. Everything else is isolated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Netlist {
    nets: Vec<Net>,
    index: HashMap<PinRef, NetId>,
}

impl Netlist {
    /// Build the partition from the current components and wires.
    ///
    /// Wires whose endpoint component is not placed are inert, and a wire
    /// from a pin to itself adds no edge.
    pub fn build(components: &[Component], wires: &[Wire]) -> Self {
        let placed: HashSet<&ComponentId> = components.iter().map(|c| &c.id).collect();
        let mut graph = PinGraph::default();

        for wire in wires {
            if wire.is_self_loop() {
                continue;
            }
            if !placed.contains(&wire.start_component_id) || !placed.contains(&wire.end_component_id) {
                tracing::trace!(wire = %wire.id, "skipping dangling wire");
                continue;
            }
            graph.connect(wire.start(), wire.end());
        }

        for component in components {
            for (a, b) in component.device.internal_shorts() {
                graph.connect(
                    PinRef::new(component.id.clone(), a),
                    PinRef::new(component.id.clone(), b),
                );
            }
        }

        graph.into_netlist()
    }

    /// All nets in discovery order.
    pub fn nets(&self) -> &[Net] {
        &self.nets
    }

    /// Get a net by id.
    pub fn net(&self, id: NetId) -> &Net {
        &self.nets[id.0]
    }

    /// Find the net a pin belongs to.
    pub fn net_of(&self, pin: &PinRef) -> Option<NetId> {
        self.index.get(pin).copied()
    }

    /// True if both pins belong to the same net.
    pub fn connected(&self, a: &PinRef, b: &PinRef) -> bool {
        match (self.net_of(a), self.net_of(b)) {
            (Some(x), Some(y)) => x == y,
            _ => a == b,
        }
    }

    /// Number of nets.
    pub fn len(&self) -> usize {
        self.nets.len()
    }

    /// True if no pin is connected to anything.
    pub fn is_empty(&self) -> bool {
        self.nets.is_empty()
    }
}

/// Undirected pin graph with vertices interned in insertion order.
#[derive(Default)]
struct PinGraph {
    vertices: Vec<PinRef>,
    lookup: HashMap<PinRef, usize>,
    adjacency: Vec<Vec<usize>>,
}

impl PinGraph {
    fn intern(&mut self, pin: PinRef) -> usize {
        if let Some(&idx) = self.lookup.get(&pin) {
            return idx;
        }
        let idx = self.vertices.len();
        self.lookup.insert(pin.clone(), idx);
        self.vertices.push(pin);
        self.adjacency.push(Vec::new());
        idx
    }

    fn connect(&mut self, a: PinRef, b: PinRef) {
        let a = self.intern(a);
        let b = self.intern(b);
        if a == b || self.adjacency[a].contains(&b) {
            return;
        }
        self.adjacency[a].push(b);
        self.adjacency[b].push(a);
    }

    /// Breadth-first traversal from each unvisited vertex.
    fn into_netlist(self) -> Netlist {
        let mut visited = vec![false; self.vertices.len()];
        let mut nets = Vec::new();
        let mut index = HashMap::with_capacity(self.vertices.len());
        let mut queue = VecDeque::new();

        for start in 0..self.vertices.len() {
            if visited[start] {
                continue;
            }
            let id = NetId(nets.len());
            let mut pins = Vec::new();
            visited[start] = true;
            queue.push_back(start);

            while let Some(v) = queue.pop_front() {
                pins.push(self.vertices[v].clone());
                index.insert(self.vertices[v].clone(), id);
                for &next in &self.adjacency[v] {
                    if !visited[next] {
                        visited[next] = true;
                        queue.push_back(next);
                    }
                }
            }

            nets.push(Net { id, pins });
        }

        Netlist { nets, index }
    }
}

/// Reuses the last partition while the wiring is unchanged.
///
/// The key is the wire list plus each component's id and internal shorts,
/// which is everything [`Netlist::build`] reads.
#[derive(Debug, Default)]
pub struct NetlistCache {
    wires: Vec<Wire>,
    placement: Vec<(ComponentId, usize)>,
    netlist: Option<Netlist>,
}

impl NetlistCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the partition for the given wiring, rebuilding only when it changed.
    pub fn netlist_for(&mut self, components: &[Component], wires: &[Wire]) -> &Netlist {
        let unchanged = self.netlist.is_some()
            && self.wires.as_slice() == wires
            && self.placement.len() == components.len()
            && self
                .placement
                .iter()
                .zip(components)
                .all(|((id, shorts), c)| *id == c.id && *shorts == c.device.internal_short_count());

        if !unchanged {
            let netlist = Netlist::build(components, wires);
            tracing::debug!(nets = netlist.len(), wires = wires.len(), "rebuilt netlist");
            self.wires = wires.to_vec();
            self.placement = components
                .iter()
                .map(|c| (c.id.clone(), c.device.internal_short_count()))
                .collect();
            self.netlist = Some(netlist);
        }

        self.netlist.get_or_insert_with(Netlist::default)
    }

    /// Forget the cached partition.
    pub fn invalidate(&mut self) {
        self.netlist = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Component, PartType};

    fn part(id: &str, part: PartType) -> Component {
        Component::new(id, part)
    }

    fn wire(id: &str, a: (&str, &str), b: (&str, &str)) -> Wire {
        Wire::new(id, PinRef::new(a.0, a.1), PinRef::new(b.0, b.1))
    }

    #[test]
    fn test_chain_forms_one_net() {
        let components = vec![
            part("S1", PartType::ToggleSwitch),
            part("G1", PartType::Not),
            part("L1", PartType::LedLamp),
        ];
        let wires = vec![
            wire("w1", ("S1", "OUT"), ("G1", "IN")),
            wire("w2", ("G1", "IN"), ("L1", "IN")),
        ];
        let netlist = Netlist::build(&components, &wires);

        assert_eq!(netlist.len(), 1);
        assert_eq!(netlist.nets()[0].pins.len(), 3);
        assert!(netlist.connected(&PinRef::new("S1", "OUT"), &PinRef::new("L1", "IN")));
        assert!(!netlist.connected(&PinRef::new("S1", "OUT"), &PinRef::new("G1", "OUT")));
    }

    #[test]
    fn test_disjoint_nets_stay_apart() {
        let components = vec![part("A", PartType::And), part("B", PartType::Or)];
        let wires = vec![
            wire("w1", ("A", "OUT"), ("B", "A")),
            wire("w2", ("B", "OUT"), ("A", "A")),
        ];
        let netlist = Netlist::build(&components, &wires);

        assert_eq!(netlist.len(), 2);
        assert_ne!(
            netlist.net_of(&PinRef::new("A", "OUT")),
            netlist.net_of(&PinRef::new("A", "A"))
        );
    }

    #[test]
    fn test_self_loop_and_duplicates() {
        let components = vec![part("A", PartType::And), part("L", PartType::LedLamp)];
        let wires = vec![
            wire("loop", ("A", "OUT"), ("A", "OUT")),
            wire("w1", ("A", "OUT"), ("L", "IN")),
            wire("w2", ("L", "IN"), ("A", "OUT")),
        ];
        let netlist = Netlist::build(&components, &wires);

        assert_eq!(netlist.len(), 1);
        assert_eq!(netlist.nets()[0].pins.len(), 2);

        let only_loop = Netlist::build(&components, &wires[..1]);
        assert!(only_loop.is_empty());
    }

    #[test]
    fn test_dangling_wire_is_inert() {
        let components = vec![part("A", PartType::And)];
        let wires = vec![wire("w1", ("A", "OUT"), ("GONE", "IN"))];
        let netlist = Netlist::build(&components, &wires);

        assert!(netlist.is_empty());
        assert_eq!(netlist.net_of(&PinRef::new("A", "OUT")), None);
    }

    #[test]
    fn test_breadboard_rows_are_shorted() {
        let components = vec![
            part("BB", PartType::Breadboard),
            part("S1", PartType::ToggleSwitch),
            part("L1", PartType::LedLamp),
        ];
        let wires = vec![
            wire("w1", ("S1", "OUT"), ("BB", "L5")),
            wire("w2", ("BB", "R5"), ("L1", "IN")),
        ];
        let netlist = Netlist::build(&components, &wires);

        assert!(netlist.connected(&PinRef::new("S1", "OUT"), &PinRef::new("L1", "IN")));
        assert!(!netlist.connected(&PinRef::new("BB", "L5"), &PinRef::new("BB", "L6")));
        // 30 row pairs; row 5 absorbed the two wired pins
        assert_eq!(netlist.len(), 30);
    }

    #[test]
    fn test_cache_rebuilds_on_wire_change() {
        let components = vec![part("A", PartType::And), part("L", PartType::LedLamp)];
        let mut wires = vec![wire("w1", ("A", "OUT"), ("L", "IN"))];
        let mut cache = NetlistCache::new();

        assert_eq!(cache.netlist_for(&components, &wires).len(), 1);
        wires.push(wire("w2", ("A", "A"), ("A", "B")));
        assert_eq!(cache.netlist_for(&components, &wires).len(), 2);
        wires.clear();
        assert!(cache.netlist_for(&components, &wires).is_empty());
    }
}
