//! Triangle face records

/// Attribute channel a face index refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeChannel {
    /// Vertex positions (`v`)
    Vertices,
    /// Texture coordinates (`vt`)
    TextureCoordinates,
    /// Vertex normals (`vn`)
    Normals,
}

/// One triangle's index triples, one triple per attribute channel.
///
/// Indices are kept as signed integers exactly as they came out of index
/// correction; range is only checked when a face is resolved against its
/// mesh. A channel the face does not reference is `None` rather than a
/// sentinel index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Face {
    vertex_indices: [i64; 3],
    texcoord_indices: Option<[i64; 3]>,
    normal_indices: Option<[i64; 3]>,
}

impl Face {
    /// Create a face from its per-channel index triples
    pub fn new(
        vertex_indices: [i64; 3],
        texcoord_indices: Option<[i64; 3]>,
        normal_indices: Option<[i64; 3]>,
    ) -> Self {
        Self {
            vertex_indices,
            texcoord_indices,
            normal_indices,
        }
    }

    /// Position indices of the three corners
    pub fn vertex_indices(&self) -> [i64; 3] {
        self.vertex_indices
    }

    /// Texture coordinate indices, if the face references any
    pub fn texcoord_indices(&self) -> Option<[i64; 3]> {
        self.texcoord_indices
    }

    /// Normal indices, if the face references any
    pub fn normal_indices(&self) -> Option<[i64; 3]> {
        self.normal_indices
    }

    /// Index triple for the given channel
    pub fn indices(&self, channel: AttributeChannel) -> Option<[i64; 3]> {
        match channel {
            AttributeChannel::Vertices => Some(self.vertex_indices),
            AttributeChannel::TextureCoordinates => self.texcoord_indices,
            AttributeChannel::Normals => self.normal_indices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_channels() {
        let face = Face::new([0, 1, 2], None, Some([3, 3, 3]));
        assert_eq!(face.indices(AttributeChannel::Vertices), Some([0, 1, 2]));
        assert_eq!(face.indices(AttributeChannel::TextureCoordinates), None);
        assert_eq!(face.indices(AttributeChannel::Normals), Some([3, 3, 3]));
    }

    #[test]
    fn test_large_indices_are_exact() {
        let big = (1_i64 << 24) + 1;
        let face = Face::new([big, big + 1, big + 2], None, None);
        assert_eq!(face.vertex_indices(), [16_777_217, 16_777_218, 16_777_219]);
    }
}
