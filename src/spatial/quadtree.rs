//! Barnes-Hut quadtree over the simulation plane.
//!
//! Nodes live in a flat arena (`Vec<Node>`) and refer to their children by
//! index. A tree is rebuilt from scratch for every body snapshot; `rebuild`
//! keeps the arena's allocation so a running simulation does not churn the heap
//! once the node count has settled.
//!
//! Leaves hold up to `capacity` bodies. Inserting one more splits the leaf into
//! four equal quadrants and redistributes its bodies. Leaves at `max_depth`
//! never split and simply overflow, which bounds the recursion for coincident
//! bodies.
use crate::forces::point_mass_acceleration;
use crate::models::{BodyId, PointMass, Vector2};
use crate::utils::{SimulationError, MAX_TREE_DEPTH_LIMIT};

/// Index of a node inside a [`QuadTree`] arena.
pub type NodeIndex = usize;

const ROOT: NodeIndex = 0;

// A depth-first walk holds at most three pending siblings per level plus the
// four children of the deepest opened node.
const QUERY_STACK_SLOTS: usize = 3 * MAX_TREE_DEPTH_LIMIT as usize + 4;

/// Axis-aligned rectangle given by its minimum corner and its extent.
/// `y` grows towards the north.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// The four children of a subdivided node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Quadrant {
    /// Child order inside an internal node.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::NorthEast,
        Quadrant::NorthWest,
        Quadrant::SouthEast,
        Quadrant::SouthWest,
    ];

    pub fn index(&self) -> usize {
        match self {
            Quadrant::NorthEast => 0,
            Quadrant::NorthWest => 1,
            Quadrant::SouthEast => 2,
            Quadrant::SouthWest => 3,
        }
    }
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect { x, y, width, height }
    }

    /// A square of side `2 * half_size` centered on `center`.
    pub fn centered(center: Vector2, half_size: f64) -> Self {
        Rect::new(center.x - half_size, center.y - half_size, 2.0 * half_size, 2.0 * half_size)
    }

    /// Returns true if `point` lies inside the rectangle, edges included.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_nbody::models::Vector2;
    /// use rs_nbody::spatial::Rect;
    ///
    /// let rect = Rect::new(0.0, 0.0, 10.0, 5.0);
    /// assert!(rect.contains(Vector2::new(10.0, 5.0)));
    /// assert!(!rect.contains(Vector2::new(10.1, 2.0)));
    /// assert!(!rect.contains(Vector2::new(f64::NAN, 2.0)));
    /// ```
    pub fn contains(&self, point: Vector2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn center(&self) -> Vector2 {
        Vector2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// The quadrant of this rectangle a point falls into. Points on the center
    /// lines go north and east.
    pub fn quadrant_of(&self, point: Vector2) -> Quadrant {
        let center = self.center();
        let is_east = point.x >= center.x;
        let is_north = point.y >= center.y;
        match (is_north, is_east) {
            (true, true) => Quadrant::NorthEast,
            (true, false) => Quadrant::NorthWest,
            (false, true) => Quadrant::SouthEast,
            (false, false) => Quadrant::SouthWest,
        }
    }

    /// The sub-rectangle covering one quadrant.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_nbody::spatial::{Quadrant, Rect};
    ///
    /// let rect = Rect::new(0.0, 0.0, 2.0, 2.0);
    /// assert_eq!(rect.child(Quadrant::NorthEast), Rect::new(1.0, 1.0, 1.0, 1.0));
    /// assert_eq!(rect.child(Quadrant::SouthWest), Rect::new(0.0, 0.0, 1.0, 1.0));
    /// ```
    pub fn child(&self, quadrant: Quadrant) -> Rect {
        let half_width = self.width / 2.0;
        let half_height = self.height / 2.0;
        match quadrant {
            Quadrant::NorthEast => Rect::new(self.x + half_width, self.y + half_height, half_width, half_height),
            Quadrant::NorthWest => Rect::new(self.x, self.y + half_height, half_width, half_height),
            Quadrant::SouthEast => Rect::new(self.x + half_width, self.y, half_width, half_height),
            Quadrant::SouthWest => Rect::new(self.x, self.y, half_width, half_height),
        }
    }

    /// Smallest square enclosing every point, grown on each side by `padding`
    /// times its side (plus one unit, so coincident points still get an area).
    ///
    /// Returns `None` for an empty set or when any point is not finite.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_nbody::models::Vector2;
    /// use rs_nbody::spatial::Rect;
    ///
    /// let points = [Vector2::new(-100.0, 0.0), Vector2::new(100.0, 20.0)];
    /// let square = Rect::bounding_square(points.iter().copied(), 0.1).unwrap();
    /// assert_eq!(square.width, square.height);
    /// assert!(points.iter().all(|p| square.contains(*p)));
    /// ```
    pub fn bounding_square<I>(points: I, padding: f64) -> Option<Rect>
    where
        I: IntoIterator<Item = Vector2>,
    {
        let mut min = Vector2::new(f64::INFINITY, f64::INFINITY);
        let mut max = Vector2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        let mut any = false;
        for point in points {
            if !point.is_finite() {
                return None;
            }
            min = Vector2::new(min.x.min(point.x), min.y.min(point.y));
            max = Vector2::new(max.x.max(point.x), max.y.max(point.y));
            any = true;
        }
        if !any {
            return None;
        }
        let side = (max.x - min.x).max(max.y - min.y);
        let half_size = side / 2.0 + side * padding.max(0.0) + 1.0;
        Some(Rect::centered((min + max) / 2.0, half_size))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Holds its bodies directly.
    Leaf { bodies: Vec<PointMass> },
    /// Delegates to four children, in [`Quadrant::ALL`] order.
    Internal { children: [NodeIndex; 4] },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    boundary: Rect,
    depth: u32,
    mass: f64,
    center_of_mass: Vector2,
    kind: NodeKind,
}

impl Node {
    fn leaf(boundary: Rect, depth: u32) -> Self {
        Node {
            boundary,
            depth,
            mass: 0.0,
            center_of_mass: boundary.center(),
            kind: NodeKind::Leaf { bodies: Vec::new() },
        }
    }

    pub fn boundary(&self) -> Rect {
        self.boundary
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Total mass of every body under this node.
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Mass-weighted mean position of every body under this node. An empty
    /// node reports its geometric center.
    pub fn center_of_mass(&self) -> Vector2 {
        self.center_of_mass
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// Bodies held directly by this node; always empty for internal nodes.
    pub fn bodies(&self) -> &[PointMass] {
        match &self.kind {
            NodeKind::Leaf { bodies } => bodies,
            NodeKind::Internal { .. } => &[],
        }
    }

    pub fn children(&self) -> Option<[NodeIndex; 4]> {
        match &self.kind {
            NodeKind::Leaf { .. } => None,
            NodeKind::Internal { children } => Some(*children),
        }
    }
}

/// Barnes-Hut quadtree.
///
/// # Examples
///
/// ```
/// use rs_nbody::spatial::{QuadTree, Rect};
///
/// let tree = QuadTree::new(Rect::new(-10.0, -10.0, 20.0, 20.0), 4).unwrap();
/// assert_eq!(tree.body_count(), 0);
/// assert_eq!(tree.total_mass(), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct QuadTree {
    nodes: Vec<Node>,
    capacity: usize,
    max_depth: u32,
    body_count: usize,
}

impl Default for QuadTree {
    /// An empty unit-square tree with the default capacity and depth limit.
    fn default() -> Self {
        QuadTree {
            nodes: vec![Node::leaf(Rect::new(0.0, 0.0, 1.0, 1.0), 0)],
            capacity: Self::DEFAULT_CAPACITY,
            max_depth: Self::DEFAULT_MAX_DEPTH,
            body_count: 0,
        }
    }
}

impl QuadTree {
    pub const DEFAULT_CAPACITY: usize = 4;
    pub const DEFAULT_MAX_DEPTH: u32 = 24;

    /// Creates an empty tree covering `boundary`.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidCapacity`] if `capacity` is zero.
    pub fn new(boundary: Rect, capacity: usize) -> Result<Self, SimulationError> {
        Self::with_max_depth(boundary, capacity, Self::DEFAULT_MAX_DEPTH)
    }

    /// Creates an empty tree whose leaves stop splitting at `max_depth`.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidCapacity`] if `capacity` is zero and
    /// [`SimulationError::InvalidTreeDepth`] if `max_depth` exceeds
    /// [`MAX_TREE_DEPTH_LIMIT`].
    pub fn with_max_depth(boundary: Rect, capacity: usize, max_depth: u32) -> Result<Self, SimulationError> {
        if capacity == 0 {
            return Err(SimulationError::InvalidCapacity);
        }
        if max_depth > MAX_TREE_DEPTH_LIMIT {
            return Err(SimulationError::InvalidTreeDepth);
        }
        Ok(QuadTree {
            nodes: vec![Node::leaf(boundary, 0)],
            capacity,
            max_depth,
            body_count: 0,
        })
    }

    /// Builds a tree over `bodies`. Bodies outside `boundary` are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_nbody::models::{BodyId, PointMass, Vector2};
    /// use rs_nbody::spatial::{QuadTree, Rect};
    ///
    /// let bodies: Vec<PointMass> = (0..10)
    ///     .map(|i| PointMass { id: BodyId(i), position: Vector2::new(i as f64, -(i as f64)), mass: 2.0 })
    ///     .collect();
    /// let tree = QuadTree::build(Rect::new(-16.0, -16.0, 32.0, 32.0), 4, &bodies).unwrap();
    ///
    /// assert_eq!(tree.body_count(), 10);
    /// assert!((tree.total_mass() - 20.0).abs() < 1e-12);
    /// assert!(!tree.root().is_leaf());
    /// ```
    pub fn build(boundary: Rect, capacity: usize, bodies: &[PointMass]) -> Result<Self, SimulationError> {
        let mut tree = Self::new(boundary, capacity)?;
        tree.rebuild(boundary, bodies);
        Ok(tree)
    }

    /// Empties the tree and gives it a new root boundary, keeping the arena.
    pub fn clear(&mut self, boundary: Rect) {
        self.nodes.clear();
        self.nodes.push(Node::leaf(boundary, 0));
        self.body_count = 0;
    }

    /// Clears the tree and inserts every body of the snapshot.
    /// Returns the number of bodies rejected for lying outside `boundary`.
    pub fn rebuild(&mut self, boundary: Rect, bodies: &[PointMass]) -> usize {
        self.clear(boundary);
        bodies.iter().filter(|body| !self.insert(**body)).count()
    }

    /// Inserts a body, returning `false` if its position is outside the root
    /// boundary. The aggregates of every node on the insertion path are
    /// recomputed.
    pub fn insert(&mut self, body: PointMass) -> bool {
        if !self.nodes[ROOT].boundary.contains(body.position) {
            return false;
        }
        self.insert_into(ROOT, body);
        self.body_count += 1;
        true
    }

    fn insert_into(&mut self, index: NodeIndex, body: PointMass) {
        let capacity = self.capacity;
        let max_depth = self.max_depth;
        let node = &mut self.nodes[index];
        let mut needs_split = false;
        let next = match &mut node.kind {
            NodeKind::Internal { children } => Some(children[node.boundary.quadrant_of(body.position).index()]),
            NodeKind::Leaf { bodies } => {
                bodies.push(body);
                needs_split = bodies.len() > capacity && node.depth < max_depth;
                None
            }
        };

        if let Some(child) = next {
            self.insert_into(child, body);
        } else if needs_split {
            self.subdivide(index);
        }
        self.update_aggregate(index);
    }

    fn subdivide(&mut self, index: NodeIndex) {
        let boundary = self.nodes[index].boundary;
        let depth = self.nodes[index].depth;
        let first = self.nodes.len();
        for quadrant in Quadrant::ALL {
            self.nodes.push(Node::leaf(boundary.child(quadrant), depth + 1));
        }
        let children = [first, first + 1, first + 2, first + 3];

        let previous = std::mem::replace(&mut self.nodes[index].kind, NodeKind::Internal { children });
        if let NodeKind::Leaf { bodies } = previous {
            for body in bodies {
                let child = children[boundary.quadrant_of(body.position).index()];
                self.insert_into(child, body);
            }
        }
    }

    fn update_aggregate(&mut self, index: NodeIndex) {
        let (mass, weighted) = match &self.nodes[index].kind {
            NodeKind::Leaf { bodies } => bodies
                .iter()
                .fold((0.0, Vector2::ZERO), |(m, w), b| (m + b.mass, w + b.position * b.mass)),
            NodeKind::Internal { children } => children.iter().fold((0.0, Vector2::ZERO), |(m, w), &c| {
                let child = &self.nodes[c];
                (m + child.mass, w + child.center_of_mass * child.mass)
            }),
        };
        let node = &mut self.nodes[index];
        node.mass = mass;
        node.center_of_mass = if mass > 0.0 { weighted / mass } else { node.boundary.center() };
    }

    /// Gravitational acceleration at `point` under the Barnes-Hut criterion.
    ///
    /// Massless nodes contribute nothing. An internal node that satisfies
    /// `width / distance < theta` is treated as a point mass at its center of
    /// mass, unless it contains `point` or the snapshot position of `exclude`;
    /// other internal nodes are opened. Leaves contribute each of their bodies
    /// exactly, skipping `exclude` by id. The excluded body therefore never
    /// pulls on itself, even when `point` has moved out of its cell.
    /// With `theta == 0` the result equals the direct sum up to rounding.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_nbody::models::{BodyId, PointMass, Vector2};
    /// use rs_nbody::spatial::{QuadTree, Rect};
    ///
    /// let bodies = [
    ///     PointMass { id: BodyId(0), position: Vector2::new(1.0, 0.0), mass: 1.0 },
    ///     PointMass { id: BodyId(1), position: Vector2::new(-1.0, 0.0), mass: 1.0 },
    /// ];
    /// let tree = QuadTree::build(Rect::new(-2.0, -2.0, 4.0, 4.0), 1, &bodies).unwrap();
    ///
    /// // Pulls from both sides cancel at the origin.
    /// let a = tree.acceleration_at(Vector2::ZERO, None, 0.5, 1.0, 0.0);
    /// assert!(a.magnitude() < 1e-12);
    /// ```
    pub fn acceleration_at(
        &self,
        point: Vector2,
        exclude: Option<&PointMass>,
        theta: f64,
        gravitational_constant: f64,
        softening: f64,
    ) -> Vector2 {
        let excluded_id: Option<BodyId> = exclude.map(|body| body.id);
        let mut acceleration = Vector2::ZERO;
        let mut stack = [ROOT; QUERY_STACK_SLOTS];
        let mut pending = 1;
        while pending > 0 {
            pending -= 1;
            let node = &self.nodes[stack[pending]];
            if node.mass <= 0.0 {
                continue;
            }
            match &node.kind {
                NodeKind::Leaf { bodies } => {
                    for body in bodies.iter().filter(|b| Some(b.id) != excluded_id) {
                        acceleration += point_mass_acceleration(point, body.position, body.mass, gravitational_constant, softening);
                    }
                }
                NodeKind::Internal { children } => {
                    let distance = node.center_of_mass.distance(&point);
                    let far_enough = distance > 0.0 && node.boundary.width / distance < theta;
                    let holds_excluded = exclude.is_some_and(|body| node.boundary.contains(body.position));
                    if far_enough && !node.boundary.contains(point) && !holds_excluded {
                        acceleration += point_mass_acceleration(point, node.center_of_mass, node.mass, gravitational_constant, softening);
                    } else {
                        for &child in children {
                            stack[pending] = child;
                            pending += 1;
                        }
                    }
                }
            }
        }
        acceleration
    }

    pub fn root(&self) -> &Node {
        &self.nodes[ROOT]
    }

    pub fn node(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn boundary(&self) -> Rect {
        self.nodes[ROOT].boundary
    }

    pub fn total_mass(&self) -> f64 {
        self.nodes[ROOT].mass
    }

    pub fn center_of_mass(&self) -> Vector2 {
        self.nodes[ROOT].center_of_mass
    }

    pub fn body_count(&self) -> usize {
        self.body_count
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Depth of the deepest node; a lone root has depth 0.
    pub fn depth(&self) -> u32 {
        self.nodes.iter().map(|node| node.depth).max().unwrap_or(0)
    }
}
