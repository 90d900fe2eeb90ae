use std::collections::{HashMap, HashSet};

use crate::types::MeshOptions;

const ICOSAHEDRON_FACES: [[u32; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

fn icosahedron_vertices() -> [[f32; 3]; 12] {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    [
        [-1.0, t, 0.0],
        [1.0, t, 0.0],
        [-1.0, -t, 0.0],
        [1.0, -t, 0.0],
        [0.0, -1.0, t],
        [0.0, 1.0, t],
        [0.0, -1.0, -t],
        [0.0, 1.0, -t],
        [t, 0.0, -1.0],
        [t, 0.0, 1.0],
        [-t, 0.0, -1.0],
        [-t, 0.0, 1.0],
    ]
}

/// Grid point on an icosahedron face, keyed by its integer barycentric
/// weights so points on shared edges resolve to the same vertex.
type PointKey = [(u32, u32); 3];

fn point_key(face: [u32; 3], weights: [u32; 3]) -> PointKey {
    let mut key = [(u32::MAX, 0); 3];
    for (slot, (corner, weight)) in face.iter().zip(weights).enumerate() {
        if weight > 0 {
            key[slot] = (*corner, weight);
        }
    }
    key.sort_unstable();
    key
}

/// Line-list geometry for a subdivided icosphere.
#[derive(Debug, Clone)]
pub(crate) struct WireframeMesh {
    pub vertices: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl WireframeMesh {
    pub fn icosphere(options: MeshOptions) -> Self {
        let corners = icosahedron_vertices();
        let segments = options.detail + 1;
        let mut lookup: HashMap<PointKey, u32> = HashMap::new();
        let mut vertices = Vec::new();
        let mut edges: HashSet<(u32, u32)> = HashSet::new();
        let mut indices = Vec::new();

        for face in ICOSAHEDRON_FACES {
            let mut vertex = |i: u32, j: u32| -> u32 {
                let weights = [segments - i - j, i, j];
                let key = point_key(face, weights);
                *lookup.entry(key).or_insert_with(|| {
                    let mut position = [0.0_f32; 3];
                    for (corner, weight) in face.iter().zip(weights) {
                        let scale = weight as f32 / segments as f32;
                        let source = corners[*corner as usize];
                        for axis in 0..3 {
                            position[axis] += source[axis] * scale;
                        }
                    }
                    vertices.push(project(position, options.radius));
                    (vertices.len() - 1) as u32
                })
            };

            let mut face_edges = Vec::new();
            for i in 0..segments {
                for j in 0..(segments - i) {
                    let here = vertex(i, j);
                    let right = vertex(i + 1, j);
                    let up = vertex(i, j + 1);
                    face_edges.push((here, right));
                    face_edges.push((here, up));
                    face_edges.push((right, up));
                }
            }

            for (a, b) in face_edges {
                let edge = (a.min(b), a.max(b));
                if edges.insert(edge) {
                    indices.push(edge.0);
                    indices.push(edge.1);
                }
            }
        }

        Self { vertices, indices }
    }

    pub fn edge_count(&self) -> usize {
        self.indices.len() / 2
    }
}

fn project(position: [f32; 3], radius: f32) -> [f32; 3] {
    let length = (position[0] * position[0]
        + position[1] * position[1]
        + position[2] * position[2])
        .sqrt()
        .max(f32::EPSILON);
    let scale = radius / length;
    [position[0] * scale, position[1] * scale, position[2] * scale]
}
