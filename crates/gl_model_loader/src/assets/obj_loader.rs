//! OBJ file loader for 3D models
//!
//! The parser is line oriented. Each line is matched against an ordered table
//! of directive prefixes and the first match wins, which keeps the dialects of
//! different exporters (`o ` vs `# object `, `v ` vs `v  `) working side by
//! side. Lines matching no prefix are skipped.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use log::{debug, info, trace, warn};

use crate::core::config::{ImportConfig, IndexPolicy};
use crate::foundation::math::Vec3;
use crate::render::{AttributeChannel, Face, Material, Mesh};

use super::materials::material_indices;
use super::post_process;
use super::{LoaderError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
    MaterialLibrary,
    Object,
    Vertex,
    TexCoord,
    Normal,
    Face,
    UseMaterial,
}

/// Recognized line prefixes, evaluated top to bottom
const DIRECTIVES: &[(&str, Directive)] = &[
    ("mtllib ", Directive::MaterialLibrary),
    ("# object ", Directive::Object),
    ("o ", Directive::Object),
    ("v  ", Directive::Vertex),
    ("v ", Directive::Vertex),
    ("vt ", Directive::TexCoord),
    ("vn ", Directive::Normal),
    ("f ", Directive::Face),
    ("usemtl ", Directive::UseMaterial),
];

fn classify(line: &str) -> Option<(Directive, &str)> {
    DIRECTIVES
        .iter()
        .find_map(|(prefix, directive)| line.strip_prefix(prefix).map(|rest| (*directive, rest)))
}

/// Result of parsing one OBJ stream
#[derive(Debug, Clone, PartialEq)]
pub struct ObjModel {
    copyright: Option<String>,
    material_library: Option<String>,
    meshes: Vec<Mesh>,
}

impl ObjModel {
    /// Text of the first non-empty line from its third character on
    pub fn copyright(&self) -> Option<&str> {
        self.copyright.as_deref()
    }

    /// File named by `mtllib`
    pub fn material_library(&self) -> Option<&str> {
        self.material_library.as_deref()
    }

    /// Meshes in file order
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Mutable meshes, e.g. for tangent calculation
    pub fn meshes_mut(&mut self) -> &mut [Mesh] {
        &mut self.meshes
    }

    /// Take ownership of the meshes
    pub fn into_meshes(self) -> Vec<Mesh> {
        self.meshes
    }

    /// Index into `materials` for each mesh, see [`material_indices`]
    pub fn material_indices(&self, materials: &[Material]) -> Result<Vec<usize>> {
        material_indices(&self.meshes, materials)
    }
}

/// OBJ stream parser bound to one import configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjParser {
    config: ImportConfig,
}

impl ObjParser {
    /// Create a parser for the given configuration
    pub fn new(config: ImportConfig) -> Self {
        Self { config }
    }

    /// Configuration used by this parser
    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Parse OBJ text held in memory
    pub fn parse_str(&self, contents: &str) -> Result<ObjModel> {
        self.parse_lines(contents.lines().map(Ok::<_, io::Error>))
    }

    /// Parse OBJ text from a buffered reader
    pub fn parse_reader<R: BufRead>(&self, reader: R) -> Result<ObjModel> {
        self.parse_lines(reader.lines())
    }

    /// Parse a forward-only sequence of lines.
    ///
    /// # Errors
    /// - `Io` when the line source fails
    /// - `MalformedObj` for unparsable numbers, missing fields, faces that are
    ///   not triangles, geometry before the first object marker, or (with
    ///   index elimination) face indices outside their attribute arrays
    pub fn parse_lines<I, S>(&self, lines: I) -> Result<ObjModel>
    where
        I: IntoIterator<Item = io::Result<S>>,
        S: AsRef<str>,
    {
        let mut state = ParseState::new(self.config);

        for (line_idx, line) in lines.into_iter().enumerate() {
            let line = line?;
            let line = line.as_ref();
            let line = line.strip_suffix('\r').unwrap_or(line);
            state.line_num = line_idx + 1;
            state.process_line(line)?;
        }

        if self.config.triangulate() {
            warn!("TRIANGULATE was requested but polygon triangulation is not performed");
        }

        let ParseState {
            copyright,
            material_library,
            meshes,
            ..
        } = state;

        info!(
            "Parsed OBJ: {} mesh(es), {} face(s)",
            meshes.len(),
            meshes.iter().map(|m| m.faces().len()).sum::<usize>()
        );

        let meshes = post_process::eliminate_indices(meshes, self.config.index_elimination())?;

        Ok(ObjModel {
            copyright,
            material_library,
            meshes,
        })
    }
}

struct ParseState {
    config: ImportConfig,
    policy: IndexPolicy,
    copyright: Option<String>,
    material_library: Option<String>,
    meshes: Vec<Mesh>,
    line_num: usize,
}

impl ParseState {
    fn new(config: ImportConfig) -> Self {
        Self {
            config,
            policy: config.effective_policy(),
            copyright: None,
            material_library: None,
            meshes: Vec::new(),
            line_num: 0,
        }
    }

    fn error(&self, reason: impl std::fmt::Display) -> LoaderError {
        LoaderError::MalformedObj(format!("line {}: {}", self.line_num, reason))
    }

    fn current_mesh(&mut self) -> Result<&mut Mesh> {
        if self.meshes.is_empty() {
            return Err(self.error("geometry before the first object marker"));
        }
        let last = self.meshes.len() - 1;
        Ok(&mut self.meshes[last])
    }

    fn process_line(&mut self, line: &str) -> Result<()> {
        if line.is_empty() {
            return Ok(());
        }

        // The first non-empty line carries the exporter banner. It is still
        // dispatched like any other line afterwards.
        if self.copyright.is_none() {
            let banner = line.char_indices().nth(2).map_or("", |(i, _)| &line[i..]);
            self.copyright = Some(banner.to_string());
        }

        let Some((directive, rest)) = classify(line) else {
            trace!("line {}: skipping '{}'", self.line_num, line);
            return Ok(());
        };

        match directive {
            Directive::MaterialLibrary => {
                self.material_library = Some(rest.trim_end().to_string());
            }
            Directive::Object => {
                let mut mesh = Mesh::new(rest.trim_end());
                mesh.set_index_eliminated(self.config.index_elimination());
                debug!("line {}: new mesh '{}'", self.line_num, mesh.name());
                self.meshes.push(mesh);
            }
            Directive::Vertex => {
                let [x, y, z] = self.parse_floats::<3>(rest, "vertex")?;
                self.current_mesh()?.push_vertex(Vec3::new(x, y, z));
            }
            Directive::TexCoord => {
                let texcoord = self.parse_texcoord(rest)?;
                self.current_mesh()?.push_texcoord(texcoord);
            }
            Directive::Normal => {
                let [x, y, z] = self.parse_floats::<3>(rest, "normal")?;
                self.current_mesh()?.push_normal(Vec3::new(x, y, z));
            }
            Directive::Face => {
                let face = self.parse_face(rest)?;
                self.current_mesh()?.push_face(face);
            }
            Directive::UseMaterial => {
                let name = rest.trim_end().to_string();
                self.current_mesh()?.set_material_name(name);
            }
        }
        Ok(())
    }

    fn parse_float(&self, token: &str, what: &str) -> Result<f32> {
        token
            .parse::<f32>()
            .map_err(|e| self.error(format!("invalid {what} component '{token}': {e}")))
    }

    /// Parse the first `N` fields as floats; later fields are ignored
    fn parse_floats<const N: usize>(&self, rest: &str, what: &str) -> Result<[f32; N]> {
        let mut values = [0.0; N];
        let mut fields = rest.split_whitespace();
        for (i, value) in values.iter_mut().enumerate() {
            let token = fields
                .next()
                .ok_or_else(|| self.error(format!("{what} has {i} of {N} components")))?;
            *value = self.parse_float(token, what)?;
        }
        Ok(values)
    }

    fn parse_texcoord(&self, rest: &str) -> Result<Vec3> {
        let [u, v] = self.parse_floats::<2>(rest, "texture coordinate")?;
        let w = match rest.split_whitespace().nth(2) {
            Some(token) => self.parse_float(token, "texture coordinate")?,
            None => 0.0,
        };
        let texcoord = Vec3::new(u, v, w);
        Ok(if self.config.flip_uv() {
            post_process::flip_uv(texcoord)
        } else {
            texcoord
        })
    }

    fn parse_index(&self, token: &str) -> Result<i64> {
        token
            .parse::<i64>()
            .map_err(|e| self.error(format!("invalid face index '{token}': {e}")))
    }

    fn parse_face(&self, rest: &str) -> Result<Face> {
        let corners: Vec<&str> = rest.split_whitespace().collect();
        if corners.len() != 3 {
            return Err(self.error(format!(
                "face has {} vertices, only triangles are supported",
                corners.len()
            )));
        }

        let mut vertex = [0_i64; 3];
        let mut texcoord = [None; 3];
        let mut normal = [None; 3];

        for (i, corner) in corners.iter().enumerate() {
            let parts: Vec<&str> = corner.split('/').collect();
            if parts.len() > 3 {
                return Err(self.error(format!("face vertex '{corner}' has too many '/' separators")));
            }
            vertex[i] = self.parse_index(parts[0])?;
            texcoord[i] = match parts.get(1) {
                Some(t) if !t.is_empty() => Some(self.parse_index(t)?),
                _ => None,
            };
            normal[i] = match parts.get(2) {
                Some(n) if !n.is_empty() => Some(self.parse_index(n)?),
                _ => None,
            };
        }

        let texcoord = self.channel_triple(texcoord, "texture coordinate")?;
        let normal = self.channel_triple(normal, "normal")?;

        let mesh = self
            .meshes
            .last()
            .ok_or_else(|| self.error("geometry before the first object marker"))?;
        let correct = |indices: [i64; 3], channel: AttributeChannel| -> Result<[i64; 3]> {
            let seen = mesh.channel_len(channel);
            let mut corrected = [0_i64; 3];
            for (out, idx) in corrected.iter_mut().zip(indices) {
                *out = self
                    .policy
                    .correct(idx, seen)
                    .ok_or_else(|| self.error(format!("face index {idx} out of range")))?;
            }
            Ok(corrected)
        };

        Ok(Face::new(
            correct(vertex, AttributeChannel::Vertices)?,
            texcoord
                .map(|t| correct(t, AttributeChannel::TextureCoordinates))
                .transpose()?,
            normal.map(|n| correct(n, AttributeChannel::Normals)).transpose()?,
        ))
    }

    /// A channel is present only when all three corners reference it
    fn channel_triple(&self, corners: [Option<i64>; 3], what: &str) -> Result<Option<[i64; 3]>> {
        match corners {
            [Some(a), Some(b), Some(c)] => Ok(Some([a, b, c])),
            [None, None, None] => Ok(None),
            _ => Err(self.error(format!("face mixes corners with and without a {what} index"))),
        }
    }
}

/// File-backed OBJ loading
pub struct ObjLoader;

impl ObjLoader {
    /// Load an OBJ file from disk
    ///
    /// # Errors
    /// `NotAnObjFile` when the path does not end in `.obj`, `Io` when it
    /// cannot be opened or read, plus any error from [`ObjParser::parse_lines`].
    pub fn load_obj<P: AsRef<Path>>(path: P, config: &ImportConfig) -> Result<ObjModel> {
        let path = path.as_ref();
        if !has_extension(path, "obj") {
            return Err(LoaderError::NotAnObjFile(path.to_path_buf()));
        }

        let file = File::open(path)?;
        debug!("Loading OBJ {}", path.display());
        ObjParser::new(*config).parse_reader(BufReader::new(file))
    }
}

pub(crate) fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|ext| ext == extension)
}
