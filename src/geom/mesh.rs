use serde::Serialize;

/// Indexed triangle mesh with optional texture coordinates and morph targets.
///
/// Morph target buffers share the base mesh's index buffer, so each entry of
/// `morph_positions` / `morph_normals` has exactly `positions.len()` vertices.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeomMesh {
    pub positions: Vec<[f64; 3]>,
    pub normals: Vec<[f64; 3]>,
    pub uvs: Option<Vec<[f64; 2]>>,
    pub indices: Vec<u32>,
    pub morph_positions: Vec<Vec<[f64; 3]>>,
    pub morph_normals: Vec<Vec<[f64; 3]>>,
}

impl GeomMesh {
    /// Create a mesh with zeroed position/normal buffers for `vertex_count` vertices.
    ///
    /// The uv buffer is only allocated when `with_uvs` is set.
    #[must_use]
    pub fn allocate(vertex_count: usize, with_uvs: bool) -> Self {
        Self {
            positions: vec![[0.0; 3]; vertex_count],
            normals: vec![[0.0; 3]; vertex_count],
            uvs: with_uvs.then(|| vec![[0.0; 2]; vertex_count]),
            indices: Vec::new(),
            morph_positions: Vec::new(),
            morph_normals: Vec::new(),
        }
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[must_use]
    pub fn morph_target_count(&self) -> usize {
        self.morph_positions.len()
    }

    /// Drop the texture coordinate attribute.
    pub fn remove_uvs(&mut self) {
        self.uvs = None;
    }

    /// Iterate over triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    #[must_use]
    pub fn positions_flat(&self) -> &[f64] {
        flatten(&self.positions)
    }

    #[must_use]
    pub fn normals_flat(&self) -> &[f64] {
        flatten(&self.normals)
    }

    #[must_use]
    pub fn uvs_flat(&self) -> Option<&[f64]> {
        self.uvs.as_deref().map(flatten)
    }

    /// Validate buffer sizes and index ranges.
    pub fn validate(&self) -> Result<(), String> {
        let vertex_count = self.positions.len();
        if self.normals.len() != vertex_count {
            return Err(format!(
                "normal count {} does not match vertex count {vertex_count}",
                self.normals.len()
            ));
        }
        if let Some(uvs) = self.uvs.as_ref() {
            if uvs.len() != vertex_count {
                return Err(format!(
                    "uv count {} does not match vertex count {vertex_count}",
                    uvs.len()
                ));
            }
        }
        if self.indices.len() % 3 != 0 {
            return Err(format!("index count {} is not a multiple of 3", self.indices.len()));
        }
        if let Some(bad) = self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(format!("index {bad} out of range for {vertex_count} vertices"));
        }
        if self.morph_positions.len() != self.morph_normals.len() {
            return Err("morph position/normal target counts differ".to_string());
        }
        for (idx, (p, n)) in self.morph_positions.iter().zip(&self.morph_normals).enumerate() {
            if p.len() != vertex_count || n.len() != vertex_count {
                return Err(format!("morph target {idx} does not match base vertex count"));
            }
        }
        if self.positions.iter().flatten().any(|v| !v.is_finite()) {
            return Err("mesh has non-finite positions".to_string());
        }
        Ok(())
    }
}

fn flatten<const N: usize>(items: &[[f64; N]]) -> &[f64] {
    items.as_flattened()
}
