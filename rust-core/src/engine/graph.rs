//! Static dependency graph and dirty tracking for the engine cache
//!
//! Nodes are listed in topological order; every edge points from an earlier
//! node to a later one. Invalidation is a single forward pass over that order.

/// Every input parameter and derived value the engine tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Node {
    // Inputs, written by setters
    RateSpec,
    SignalSpec,
    Order,
    Kind,
    Cutoff,
    Custom,

    // Derived values
    SampleRate,
    Time,
    FrequencyAxis,
    Input,
    Coefficients,
    Impulse,
    Transfer,
    Magnitude,
    Phase,
    Output,
}

impl Node {
    pub const COUNT: usize = 16;

    /// All nodes, topologically sorted
    pub const ALL: [Node; Node::COUNT] = [
        Node::RateSpec,
        Node::SignalSpec,
        Node::Order,
        Node::Kind,
        Node::Cutoff,
        Node::Custom,
        Node::SampleRate,
        Node::Time,
        Node::FrequencyAxis,
        Node::Input,
        Node::Coefficients,
        Node::Impulse,
        Node::Transfer,
        Node::Magnitude,
        Node::Phase,
        Node::Output,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Direct upstream nodes
    pub fn dependencies(self) -> &'static [Node] {
        match self {
            Node::RateSpec
            | Node::SignalSpec
            | Node::Order
            | Node::Kind
            | Node::Cutoff
            | Node::Custom => &[],
            Node::SampleRate => &[Node::RateSpec],
            Node::Time => &[Node::SampleRate],
            Node::FrequencyAxis => &[Node::SampleRate],
            Node::Input => &[Node::SampleRate, Node::SignalSpec, Node::Time],
            Node::Coefficients => &[
                Node::Order,
                Node::Kind,
                Node::Cutoff,
                Node::SampleRate,
                Node::Custom,
            ],
            Node::Impulse => &[Node::Coefficients],
            Node::Transfer => &[Node::Coefficients],
            Node::Magnitude => &[Node::Transfer],
            Node::Phase => &[Node::Transfer],
            Node::Output => &[Node::Coefficients, Node::Input],
        }
    }

    pub fn is_input(self) -> bool {
        self.dependencies().is_empty()
    }
}

/// Staleness flags for every node
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    stale: [bool; Node::COUNT],
}

impl DependencyGraph {
    /// Inputs start fresh, every derived node starts stale
    pub fn new() -> Self {
        let mut stale = [false; Node::COUNT];
        for node in Node::ALL {
            stale[node.index()] = !node.is_input();
        }
        Self { stale }
    }

    pub fn is_stale(&self, node: Node) -> bool {
        self.stale[node.index()]
    }

    pub fn mark_fresh(&mut self, node: Node) {
        self.stale[node.index()] = false;
    }

    /// Mark everything downstream of `changed` stale
    ///
    /// # Returns
    /// The nodes reached, in topological order (excluding `changed`)
    pub fn invalidate(&mut self, changed: Node) -> Vec<Node> {
        let mut reached = [false; Node::COUNT];
        reached[changed.index()] = true;

        let mut invalidated = Vec::new();
        for node in Node::ALL {
            if node
                .dependencies()
                .iter()
                .any(|dep| reached[dep.index()])
            {
                reached[node.index()] = true;
                self.stale[node.index()] = true;
                invalidated.push(node);
            }
        }
        invalidated
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}
