//! Material model parsed from MTL files
//!
//! A [`Material`] owns at most one [`MapRef`] per [`MapRole`]. Texture maps are
//! independent value records; nothing in a map refers back to its material.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::assets::{LoaderError, Result};
use crate::foundation::math::Vec3;

/// Semantic role of a texture map
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MapRole {
    /// `map_Ka`
    Ambient,
    /// `map_Kd`
    Diffuse,
    /// `map_Ks`
    Specular,
    /// `map_Bump` / `bump`
    Normal,
    /// `disp`
    Displacement,
    /// `decal`
    Decal,
    /// `refl`
    Reflection,
}

impl MapRole {
    /// Map a directive token to its role
    pub fn from_directive(token: &str) -> Option<Self> {
        match token {
            "map_Ka" => Some(Self::Ambient),
            "map_Kd" => Some(Self::Diffuse),
            "map_Ks" => Some(Self::Specular),
            "map_Bump" | "bump" => Some(Self::Normal),
            "disp" => Some(Self::Displacement),
            "decal" => Some(Self::Decal),
            "refl" => Some(Self::Reflection),
            _ => None,
        }
    }
}

/// Image channel used for scalar textures (`-imfchan`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Channel {
    /// `r`
    Red,
    /// `g`
    Green,
    /// `b`
    Blue,
    /// `m`
    Matte,
    /// `l`
    #[default]
    Luminance,
    /// `z`
    ZDepth,
}

impl Channel {
    /// Parse the single-letter `-imfchan` argument
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "r" => Some(Self::Red),
            "g" => Some(Self::Green),
            "b" => Some(Self::Blue),
            "m" => Some(Self::Matte),
            "l" => Some(Self::Luminance),
            "z" => Some(Self::ZDepth),
            _ => None,
        }
    }
}

/// Texture color range (`-mm base gain`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorRange {
    base: f32,
    gain: f32,
}

impl ColorRange {
    /// Create a range; `base` must not exceed `gain`
    ///
    /// # Errors
    /// `IllegalRange` when `base > gain`.
    pub fn new(base: f32, gain: f32) -> Result<Self> {
        if base > gain {
            return Err(LoaderError::IllegalRange { base, gain });
        }
        Ok(Self { base, gain })
    }

    /// Brightness offset
    pub fn base(&self) -> f32 {
        self.base
    }

    /// Contrast
    pub fn gain(&self) -> f32 {
        self.gain
    }
}

/// Texture blending along U and V (`-blendu`, `-blendv`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BlendSetting {
    /// Blend horizontally
    pub u: bool,
    /// Blend vertically
    pub v: bool,
}

/// A texture map reference and its texture-transform options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapRef {
    role: MapRole,
    location: String,
    offset: Vec3,
    scale: Vec3,
    turbulence: Vec3,
    bump_multiplier: f32,
    channel: Channel,
    clamp: bool,
    color_correction: bool,
    resolution: i32,
    color_range: Option<ColorRange>,
    blend: BlendSetting,
}

impl MapRef {
    /// Create a map with every option at its default
    pub fn new(role: MapRole, location: impl Into<String>) -> Self {
        Self {
            role,
            location: location.into(),
            offset: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            turbulence: Vec3::zeros(),
            bump_multiplier: 1.0,
            channel: Channel::default(),
            clamp: false,
            color_correction: false,
            resolution: 2,
            color_range: None,
            blend: BlendSetting::default(),
        }
    }

    /// Set the texture offset (`-o`)
    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    /// Set the texture scale (`-s`)
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Set the turbulence (`-t`)
    pub fn with_turbulence(mut self, turbulence: Vec3) -> Self {
        self.turbulence = turbulence;
        self
    }

    /// Set the bump multiplier (`-bm`)
    pub fn with_bump_multiplier(mut self, multiplier: f32) -> Self {
        self.bump_multiplier = multiplier;
        self
    }

    /// Set the scalar channel (`-imfchan`)
    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = channel;
        self
    }

    /// Set clamping (`-clamp`)
    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    /// Set color correction (`-cc`)
    pub fn with_color_correction(mut self, enabled: bool) -> Self {
        self.color_correction = enabled;
        self
    }

    /// Set the texture resolution (`-texres`)
    pub fn with_resolution(mut self, resolution: i32) -> Self {
        self.resolution = resolution;
        self
    }

    /// Set the color range (`-mm`)
    pub fn with_color_range(mut self, range: ColorRange) -> Self {
        self.color_range = Some(range);
        self
    }

    /// Set blending (`-blendu`, `-blendv`)
    pub fn with_blend(mut self, blend: BlendSetting) -> Self {
        self.blend = blend;
        self
    }

    /// Semantic role
    pub fn role(&self) -> MapRole {
        self.role
    }

    /// Texture path as written in the MTL file
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Texture offset
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    /// Texture scale
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Turbulence
    pub fn turbulence(&self) -> Vec3 {
        self.turbulence
    }

    /// Bump multiplier
    pub fn bump_multiplier(&self) -> f32 {
        self.bump_multiplier
    }

    /// Scalar channel
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Whether texture coordinates are clamped
    pub fn clamp(&self) -> bool {
        self.clamp
    }

    /// Whether color correction is enabled
    pub fn color_correction(&self) -> bool {
        self.color_correction
    }

    /// Texture resolution
    pub fn resolution(&self) -> i32 {
        self.resolution
    }

    /// Color range, if given
    pub fn color_range(&self) -> Option<ColorRange> {
        self.color_range
    }

    /// Blending
    pub fn blend(&self) -> BlendSetting {
        self.blend
    }
}

/// One named material (Wavefront Phong model)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    name: String,
    specular_exponent: f32,
    dissolve: f32,
    inverted_dissolve: f32,
    refraction_index: f32,
    illumination_model: i32,
    ambient: Option<Vec3>,
    diffuse: Option<Vec3>,
    specular: Option<Vec3>,
    emissive: Option<Vec3>,
    transmission_filter: Option<Vec3>,
    maps: BTreeMap<MapRole, MapRef>,
}

impl Material {
    /// Create a material with default values
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            specular_exponent: 0.0,
            dissolve: 0.0,
            inverted_dissolve: 1.0,
            refraction_index: 1.0,
            illumination_model: 0,
            ambient: None,
            diffuse: None,
            specular: None,
            emissive: None,
            transmission_filter: None,
            maps: BTreeMap::new(),
        }
    }

    /// Name given by `newmtl`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Specular exponent (`Ns`)
    pub fn specular_exponent(&self) -> f32 {
        self.specular_exponent
    }

    /// Dissolve (`d`)
    pub fn dissolve(&self) -> f32 {
        self.dissolve
    }

    /// Inverted dissolve (`Tr`)
    pub fn inverted_dissolve(&self) -> f32 {
        self.inverted_dissolve
    }

    /// Optical density (`Ni`)
    pub fn refraction_index(&self) -> f32 {
        self.refraction_index
    }

    /// Illumination model (`illum`)
    pub fn illumination_model(&self) -> i32 {
        self.illumination_model
    }

    /// Ambient color (`Ka`)
    pub fn ambient(&self) -> Option<Vec3> {
        self.ambient
    }

    /// Diffuse color (`Kd`)
    pub fn diffuse(&self) -> Option<Vec3> {
        self.diffuse
    }

    /// Specular color (`Ks`)
    pub fn specular(&self) -> Option<Vec3> {
        self.specular
    }

    /// Emissive color (`Ke`)
    pub fn emissive(&self) -> Option<Vec3> {
        self.emissive
    }

    /// Transmission filter (`Tf`)
    pub fn transmission_filter(&self) -> Option<Vec3> {
        self.transmission_filter
    }

    /// Texture map for a role
    pub fn map(&self, role: MapRole) -> Option<&MapRef> {
        self.maps.get(&role)
    }

    /// All texture maps, ordered by role
    pub fn maps(&self) -> impl Iterator<Item = &MapRef> {
        self.maps.values()
    }

    /// Diffuse texture map
    pub fn diffuse_map(&self) -> Option<&MapRef> {
        self.map(MapRole::Diffuse)
    }

    /// Normal/bump map
    pub fn normal_map(&self) -> Option<&MapRef> {
        self.map(MapRole::Normal)
    }

    pub(crate) fn set_specular_exponent(&mut self, value: f32) {
        self.specular_exponent = value;
    }

    pub(crate) fn set_dissolve(&mut self, value: f32) {
        self.dissolve = value;
    }

    pub(crate) fn set_inverted_dissolve(&mut self, value: f32) {
        self.inverted_dissolve = value;
    }

    pub(crate) fn set_refraction_index(&mut self, value: f32) {
        self.refraction_index = value;
    }

    pub(crate) fn set_illumination_model(&mut self, value: i32) {
        self.illumination_model = value;
    }

    pub(crate) fn set_ambient(&mut self, color: Vec3) {
        self.ambient = Some(color);
    }

    pub(crate) fn set_diffuse(&mut self, color: Vec3) {
        self.diffuse = Some(color);
    }

    pub(crate) fn set_specular(&mut self, color: Vec3) {
        self.specular = Some(color);
    }

    pub(crate) fn set_emissive(&mut self, color: Vec3) {
        self.emissive = Some(color);
    }

    pub(crate) fn set_transmission_filter(&mut self, color: Vec3) {
        self.transmission_filter = Some(color);
    }

    /// Attach a map, replacing any earlier map with the same role
    pub(crate) fn attach_map(&mut self, map: MapRef) {
        self.maps.insert(map.role(), map);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_defaults() {
        let mat = Material::new("Red");
        assert_eq!(mat.name(), "Red");
        assert_eq!(mat.inverted_dissolve(), 1.0);
        assert_eq!(mat.refraction_index(), 1.0);
        assert_eq!(mat.illumination_model(), 0);
        assert!(mat.diffuse().is_none());
        assert!(mat.transmission_filter().is_none());
        assert_eq!(mat.maps().count(), 0);
    }

    #[test]
    fn test_map_defaults() {
        let map = MapRef::new(MapRole::Diffuse, "wood.png");
        assert_eq!(map.location(), "wood.png");
        assert_eq!(map.offset(), Vec3::zeros());
        assert_eq!(map.scale(), Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(map.turbulence(), Vec3::zeros());
        assert_eq!(map.bump_multiplier(), 1.0);
        assert_eq!(map.channel(), Channel::Luminance);
        assert!(!map.clamp());
        assert!(!map.color_correction());
        assert_eq!(map.resolution(), 2);
        assert!(map.color_range().is_none());
        assert_eq!(map.blend(), BlendSetting { u: false, v: false });
    }

    #[test]
    fn test_color_range_validation() {
        assert!(ColorRange::new(0.0, 1.0).is_ok());
        assert!(ColorRange::new(0.5, 0.5).is_ok());
        assert!(matches!(
            ColorRange::new(2.0, 1.0),
            Err(LoaderError::IllegalRange { .. })
        ));
    }

    #[test]
    fn test_attach_map_replaces_same_role() {
        let mut mat = Material::new("Wood");
        mat.attach_map(MapRef::new(MapRole::Normal, "a.png"));
        mat.attach_map(MapRef::new(MapRole::Normal, "b.png"));
        assert_eq!(mat.normal_map().map(MapRef::location), Some("b.png"));
        assert_eq!(mat.maps().count(), 1);
    }

    #[test]
    fn test_directive_roles() {
        assert_eq!(MapRole::from_directive("bump"), Some(MapRole::Normal));
        assert_eq!(MapRole::from_directive("map_Bump"), Some(MapRole::Normal));
        assert_eq!(MapRole::from_directive("refl"), Some(MapRole::Reflection));
        assert_eq!(MapRole::from_directive("map_Ns"), None);
    }
}
