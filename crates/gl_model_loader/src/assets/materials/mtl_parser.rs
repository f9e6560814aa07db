//! MTL (Material Template Library) file parser
//!
//! Parses Wavefront .mtl text into [`Material`] records in file order.
//! Lines are trimmed and split on whitespace, then dispatched on the first
//! token. Unknown directives are skipped so newer MTL extensions do not break
//! the import.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use log::{debug, info, trace};

use crate::assets::obj_loader::has_extension;
use crate::assets::{LoaderError, Result};
use crate::foundation::math::Vec3;
use crate::render::{MapRef, MapRole, Material};

use super::map_options::apply_map_options;

/// MTL file parser
pub struct MtlParser;

impl MtlParser {
    /// Parse MTL text held in memory
    pub fn parse(contents: &str) -> Result<Vec<Material>> {
        Self::parse_lines(contents.lines().map(Ok::<_, io::Error>))
    }

    /// Parse MTL text from a buffered reader
    pub fn parse_reader<R: BufRead>(reader: R) -> Result<Vec<Material>> {
        Self::parse_lines(reader.lines())
    }

    /// Parse a forward-only sequence of lines
    ///
    /// # Errors
    /// - `Io` when the line source fails
    /// - `MalformedMtl` for unparsable numbers, missing fields, or material
    ///   attributes before the first `newmtl`
    /// - `IllegalMapOption` / `IllegalRange` from texture map options
    pub fn parse_lines<I, S>(lines: I) -> Result<Vec<Material>>
    where
        I: IntoIterator<Item = io::Result<S>>,
        S: AsRef<str>,
    {
        let mut materials = Vec::new();
        let mut current: Option<Material> = None;

        for (line_idx, line) in lines.into_iter().enumerate() {
            let line = line?;
            let line_num = line_idx + 1;
            let tokens: Vec<&str> = line.as_ref().split_whitespace().collect();
            let Some(&command) = tokens.first() else {
                continue;
            };

            if command == "newmtl" {
                let name = tokens
                    .get(1)
                    .ok_or_else(|| malformed(line_num, "newmtl missing material name"))?;
                if let Some(done) = current.take() {
                    materials.push(done);
                }
                debug!("line {line_num}: new material '{name}'");
                current = Some(Material::new(*name));
                continue;
            }

            if let Some(role) = MapRole::from_directive(command) {
                let mat = require_material(&mut current, line_num, command)?;
                if tokens.len() < 2 {
                    return Err(malformed(line_num, format!("{command} missing texture path")));
                }
                let location = tokens[tokens.len() - 1];
                let map = apply_map_options(MapRef::new(role, location), &tokens[1..], line_num)?;
                mat.attach_map(map);
                continue;
            }

            match command {
                "Ns" => {
                    let value = parse_f32(&tokens, 1, line_num, command)?;
                    require_material(&mut current, line_num, command)?.set_specular_exponent(value);
                }
                "d" => {
                    let value = parse_f32(&tokens, 1, line_num, command)?;
                    require_material(&mut current, line_num, command)?.set_dissolve(value);
                }
                "Tr" => {
                    let value = parse_f32(&tokens, 1, line_num, command)?;
                    require_material(&mut current, line_num, command)?.set_inverted_dissolve(value);
                }
                "Ni" => {
                    let value = parse_f32(&tokens, 1, line_num, command)?;
                    require_material(&mut current, line_num, command)?.set_refraction_index(value);
                }
                "Tf" => {
                    let color = parse_vec3(&tokens, line_num, command)?;
                    require_material(&mut current, line_num, command)?.set_transmission_filter(color);
                }
                "Ka" => {
                    let color = parse_vec3(&tokens, line_num, command)?;
                    require_material(&mut current, line_num, command)?.set_ambient(color);
                }
                "Kd" => {
                    let color = parse_vec3(&tokens, line_num, command)?;
                    require_material(&mut current, line_num, command)?.set_diffuse(color);
                }
                "Ks" => {
                    let color = parse_vec3(&tokens, line_num, command)?;
                    require_material(&mut current, line_num, command)?.set_specular(color);
                }
                "Ke" => {
                    let color = parse_vec3(&tokens, line_num, command)?;
                    require_material(&mut current, line_num, command)?.set_emissive(color);
                }
                "illum" => {
                    let token = token_at(&tokens, 1, line_num, command)?;
                    let model = token.parse::<i32>().map_err(|_| {
                        malformed(line_num, format!("illum invalid integer value '{token}'"))
                    })?;
                    require_material(&mut current, line_num, command)?.set_illumination_model(model);
                }
                // Ignore unknown commands silently
                _ => trace!("line {line_num}: skipping '{command}'"),
            }
        }

        if let Some(done) = current {
            materials.push(done);
        }

        info!("Parsed MTL: {} material(s)", materials.len());
        Ok(materials)
    }
}

fn malformed(line_num: usize, reason: impl std::fmt::Display) -> LoaderError {
    LoaderError::MalformedMtl(format!("line {line_num}: {reason}"))
}

fn require_material<'a>(
    current: &'a mut Option<Material>,
    line_num: usize,
    command: &str,
) -> Result<&'a mut Material> {
    current
        .as_mut()
        .ok_or_else(|| malformed(line_num, format!("{command} before the first newmtl")))
}

fn token_at<'a>(tokens: &[&'a str], index: usize, line_num: usize, command: &str) -> Result<&'a str> {
    tokens
        .get(index)
        .copied()
        .ok_or_else(|| malformed(line_num, format!("{command} missing value")))
}

/// Parse a single f32 value
fn parse_f32(tokens: &[&str], index: usize, line_num: usize, command: &str) -> Result<f32> {
    let token = token_at(tokens, index, line_num, command)?;
    token
        .parse::<f32>()
        .map_err(|_| malformed(line_num, format!("{command} invalid float value '{token}'")))
}

/// Parse a Vec3 color from RGB tokens
fn parse_vec3(tokens: &[&str], line_num: usize, command: &str) -> Result<Vec3> {
    Ok(Vec3::new(
        parse_f32(tokens, 1, line_num, command)?,
        parse_f32(tokens, 2, line_num, command)?,
        parse_f32(tokens, 3, line_num, command)?,
    ))
}

/// File-backed MTL loading
pub struct MtlLoader;

impl MtlLoader {
    /// Load every material from an MTL file
    ///
    /// # Errors
    /// `NotAMtlFile` when the path does not end in `.mtl`, `Io` when it cannot
    /// be opened or read, plus any error from [`MtlParser::parse_lines`].
    pub fn load_mtl<P: AsRef<Path>>(path: P) -> Result<Vec<Material>> {
        let path = path.as_ref();
        if !has_extension(path, "mtl") {
            return Err(LoaderError::NotAMtlFile(path.to_path_buf()));
        }

        let file = File::open(path)?;
        debug!("Loading MTL {}", path.display());
        MtlParser::parse_reader(BufReader::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Channel;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_simple_material() {
        let mtl_content = r#"
# Simple material
newmtl TestMaterial
Ka 1.0 1.0 1.0
Kd 0.8 0.2 0.2
Ks 0.5 0.5 0.5
Ns 250.0
d 1.0
Tr 0.0
Ni 1.45
illum 2
"#;

        let materials = MtlParser::parse(mtl_content).unwrap();
        assert_eq!(materials.len(), 1);

        let mat = &materials[0];
        assert_eq!(mat.name(), "TestMaterial");
        assert_eq!(mat.ambient(), Some(Vec3::new(1.0, 1.0, 1.0)));
        assert_eq!(mat.diffuse(), Some(Vec3::new(0.8, 0.2, 0.2)));
        assert_eq!(mat.specular(), Some(Vec3::new(0.5, 0.5, 0.5)));
        assert_eq!(mat.specular_exponent(), 250.0);
        assert_eq!(mat.dissolve(), 1.0);
        assert_eq!(mat.inverted_dissolve(), 0.0);
        assert_relative_eq!(mat.refraction_index(), 1.45);
        assert_eq!(mat.illumination_model(), 2);
        assert!(mat.emissive().is_none());
    }

    #[test]
    fn test_red_diffuse() {
        let materials = MtlParser::parse("newmtl Red\nKd 1.0 0.0 0.0\n").unwrap();
        assert_eq!(materials[0].diffuse(), Some(Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_parse_multiple_materials_in_order() {
        let mtl_content = r#"
newmtl Material2
Kd 0.0 1.0 0.0

newmtl Material1
Kd 1.0 0.0 0.0
Ke 0.2 0.6 1.0
Tf 0.9 0.9 0.9
"#;

        let materials = MtlParser::parse(mtl_content).unwrap();
        assert_eq!(materials.len(), 2);
        assert_eq!(materials[0].name(), "Material2");
        assert_eq!(materials[1].name(), "Material1");
        assert_eq!(materials[1].emissive(), Some(Vec3::new(0.2, 0.6, 1.0)));
        assert_eq!(materials[1].transmission_filter(), Some(Vec3::new(0.9, 0.9, 0.9)));
    }

    #[test]
    fn test_parse_material_with_textures() {
        let mtl_content = r#"
newmtl TexturedMaterial
map_Kd -o 0.1 0.2 0.0 -clamp on wood.png
map_Ka ambient.png
map_Ks -s 2 2 2 spec.png
bump -bm 0.5 -imfchan l normal.png
disp -mm 0 2 height.png
decal -blendu on sticker.png
refl -type sphere sky.png
"#;

        let materials = MtlParser::parse(mtl_content).unwrap();
        let mat = &materials[0];

        let diffuse = mat.diffuse_map().unwrap();
        assert_eq!(diffuse.location(), "wood.png");
        assert_relative_eq!(diffuse.offset(), Vec3::new(0.1, 0.2, 0.0));
        assert!(diffuse.clamp());
        assert_eq!(diffuse.scale(), Vec3::new(1.0, 1.0, 1.0));

        assert_eq!(mat.map(MapRole::Ambient).unwrap().location(), "ambient.png");
        assert_eq!(mat.map(MapRole::Specular).unwrap().scale(), Vec3::new(2.0, 2.0, 2.0));

        let normal = mat.normal_map().unwrap();
        assert_eq!(normal.role(), MapRole::Normal);
        assert_relative_eq!(normal.bump_multiplier(), 0.5);
        assert_eq!(normal.channel(), Channel::Luminance);

        assert_eq!(mat.map(MapRole::Displacement).unwrap().color_range().unwrap().gain(), 2.0);
        assert!(mat.map(MapRole::Decal).unwrap().blend().u);
        assert_eq!(mat.map(MapRole::Reflection).unwrap().location(), "sky.png");
        assert_eq!(mat.maps().count(), 7);
    }

    #[test]
    fn test_unknown_directives_ignored() {
        let materials = MtlParser::parse("newmtl A\nPr 0.5\nmap_Pr rough.png\nsharpness 60\n").unwrap();
        assert_eq!(materials.len(), 1);
        assert_eq!(materials[0].maps().count(), 0);
    }

    #[test]
    fn test_indented_lines() {
        let materials = MtlParser::parse("newmtl A\n\tKd 0.1 0.2 0.3\n").unwrap();
        assert_eq!(materials[0].diffuse(), Some(Vec3::new(0.1, 0.2, 0.3)));
    }

    #[test]
    fn test_malformed_values() {
        assert!(matches!(
            MtlParser::parse("newmtl A\nKd 1.0 x 0.0\n"),
            Err(LoaderError::MalformedMtl(_))
        ));
        assert!(matches!(
            MtlParser::parse("newmtl A\nKs 1.0 0.0\n"),
            Err(LoaderError::MalformedMtl(_))
        ));
        assert!(matches!(
            MtlParser::parse("newmtl A\nillum two\n"),
            Err(LoaderError::MalformedMtl(_))
        ));
        assert!(matches!(MtlParser::parse("newmtl\n"), Err(LoaderError::MalformedMtl(_))));
        assert!(matches!(MtlParser::parse("newmtl A\nmap_Kd\n"), Err(LoaderError::MalformedMtl(_))));
    }

    #[test]
    fn test_attribute_before_newmtl() {
        assert!(matches!(
            MtlParser::parse("Kd 1 1 1\nnewmtl A\n"),
            Err(LoaderError::MalformedMtl(_))
        ));
    }

    #[test]
    fn test_map_option_errors_propagate() {
        assert!(matches!(
            MtlParser::parse("newmtl A\nmap_Kd -bm big n.png\n"),
            Err(LoaderError::IllegalMapOption { .. })
        ));
        assert!(matches!(
            MtlParser::parse("newmtl A\nmap_Kd -mm 1 0 n.png\n"),
            Err(LoaderError::IllegalRange { .. })
        ));
    }

    #[test]
    fn test_load_mtl_rejects_extension() {
        assert!(matches!(
            MtlLoader::load_mtl("materials.txt"),
            Err(LoaderError::NotAMtlFile(_))
        ));
    }
}
