//! Mesh data structure for plane FEA.
//!
//! Stores nodal coordinates and quadrilateral element connectivity, and
//! generates structured rectangle meshes.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::types::Point2;

/// Finite element mesh of 4-node quadrilaterals.
///
/// Element connectivity lists node indices counter-clockwise starting from
/// the bottom-left corner: `[bl, br, tr, tl]`.
#[derive(Debug, Clone)]
pub struct Mesh {
    /// Nodal coordinates.
    nodes: Vec<Point2>,
    /// Element connectivity (0-based node indices, counter-clockwise).
    elements: Vec<[usize; 4]>,
}

impl Mesh {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            elements: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(n_nodes: usize, n_elements: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(n_nodes),
            elements: Vec::with_capacity(n_elements),
        }
    }

    /// Generate a structured rectangle mesh on `[0, length] x [0, height]`.
    ///
    /// Nodes are laid out row-major from the bottom-left corner with index
    /// `iy * (nx + 1) + ix`; elements are numbered the same way. `nx` and
    /// `ny` are the element counts along x and y.
    ///
    /// # Errors
    ///
    /// Returns a mesh error for non-positive dimensions or zero subdivisions.
    pub fn rectangle(length: f64, height: f64, nx: usize, ny: usize) -> Result<Self> {
        if !(length > 0.0) || !(height > 0.0) {
            return Err(Error::Mesh(format!(
                "Rectangle dimensions must be positive, got {} x {}",
                length, height
            )));
        }
        if nx == 0 || ny == 0 {
            return Err(Error::Mesh(format!(
                "Rectangle subdivisions must be at least 1, got {} x {}",
                nx, ny
            )));
        }

        let mut mesh = Mesh::with_capacity((nx + 1) * (ny + 1), nx * ny);

        let dx = length / nx as f64;
        let dy = height / ny as f64;
        for iy in 0..=ny {
            for ix in 0..=nx {
                mesh.add_node(Point2::new(ix as f64 * dx, iy as f64 * dy));
            }
        }

        for iy in 0..ny {
            for ix in 0..nx {
                let bl = iy * (nx + 1) + ix;
                let br = bl + 1;
                let tl = bl + (nx + 1);
                let tr = tl + 1;
                mesh.add_element([bl, br, tr, tl])?;
            }
        }

        Ok(mesh)
    }

    /// Add a node to the mesh, returning its index.
    pub fn add_node(&mut self, point: Point2) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(point);
        idx
    }

    /// Add a quadrilateral element to the mesh.
    ///
    /// # Errors
    ///
    /// Returns a mesh error if any node index is out of bounds.
    pub fn add_element(&mut self, nodes: [usize; 4]) -> Result<usize> {
        for &node_idx in &nodes {
            if node_idx >= self.nodes.len() {
                return Err(Error::Mesh(format!(
                    "Node index {} out of bounds (mesh has {} nodes)",
                    node_idx,
                    self.nodes.len()
                )));
            }
        }

        let idx = self.elements.len();
        self.elements.push(nodes);
        Ok(idx)
    }

    /// Number of nodes in the mesh.
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of elements in the mesh.
    pub fn n_elements(&self) -> usize {
        self.elements.len()
    }

    /// Get nodal coordinates.
    pub fn nodes(&self) -> &[Point2] {
        &self.nodes
    }

    /// Get a specific node's coordinates.
    pub fn node(&self, idx: usize) -> Option<&Point2> {
        self.nodes.get(idx)
    }

    /// Get element connectivity.
    pub fn elements(&self) -> &[[usize; 4]] {
        &self.elements
    }

    /// Get a specific element's connectivity.
    pub fn element(&self, idx: usize) -> Option<&[usize; 4]> {
        self.elements.get(idx)
    }

    /// Get coordinates for an element's nodes.
    pub fn element_coords(&self, elem_idx: usize) -> Option<Vec<Point2>> {
        let elem = self.elements.get(elem_idx)?;
        Some(elem.iter().map(|&i| self.nodes[i]).collect())
    }

    /// Indices of all nodes whose coordinates satisfy a predicate.
    pub fn nodes_where(&self, pred: impl Fn(&Point2) -> bool) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, p)| pred(p))
            .map(|(i, _)| i)
            .collect()
    }

    /// Boundary edges whose endpoints both satisfy a predicate.
    ///
    /// An edge is on the boundary when exactly one element references it.
    /// Returns `(element_index, local_edge)` pairs; local edge `e` runs from
    /// local node `e` to local node `(e + 1) % 4`.
    pub fn boundary_edges_where(&self, pred: impl Fn(&Point2) -> bool) -> Vec<(usize, usize)> {
        let mut edge_count: HashMap<(usize, usize), usize> = HashMap::new();
        for elem in &self.elements {
            for e in 0..4 {
                let key = Self::edge_key(elem[e], elem[(e + 1) % 4]);
                *edge_count.entry(key).or_insert(0) += 1;
            }
        }

        let mut edges = Vec::new();
        for (elem_idx, elem) in self.elements.iter().enumerate() {
            for e in 0..4 {
                let a = elem[e];
                let b = elem[(e + 1) % 4];
                if edge_count[&Self::edge_key(a, b)] == 1
                    && pred(&self.nodes[a])
                    && pred(&self.nodes[b])
                {
                    edges.push((elem_idx, e));
                }
            }
        }
        edges
    }

    fn edge_key(a: usize, b: usize) -> (usize, usize) {
        if a < b {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Compute mesh bounding box.
    pub fn bounds(&self) -> Option<(Point2, Point2)> {
        if self.nodes.is_empty() {
            return None;
        }

        let mut min = self.nodes[0];
        let mut max = self.nodes[0];

        for node in &self.nodes[1..] {
            for i in 0..2 {
                min[i] = min[i].min(node[i]);
                max[i] = max[i].max(node[i]);
            }
        }

        Some((min, max))
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
