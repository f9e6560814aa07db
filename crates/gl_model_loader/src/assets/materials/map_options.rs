//! Texture map option sub-grammar (`-o`, `-s`, `-bm`, `-imfchan`, ...)
//!
//! Each flag is looked up on its own by scanning the directive's tokens left
//! to right; the first occurrence wins and an absent flag keeps the default.
//! Flags may appear in any order and any subset.

use crate::assets::{LoaderError, Result};
use crate::foundation::math::Vec3;
use crate::render::{BlendSetting, Channel, ColorRange, MapRef};

/// Position of the first token equal to `flag`
fn find_flag(tokens: &[&str], flag: &str) -> Option<usize> {
    tokens.iter().position(|t| *t == flag)
}

/// Arguments following a flag, if present
fn flag_args<'a>(tokens: &'a [&'a str], flag: &str, count: usize, line_num: usize) -> Result<Option<&'a [&'a str]>> {
    let Some(pos) = find_flag(tokens, flag) else {
        return Ok(None);
    };
    tokens
        .get(pos + 1..pos + 1 + count)
        .map(Some)
        .ok_or_else(|| {
            LoaderError::MalformedMtl(format!(
                "line {line_num}: {flag} expects {count} value(s)"
            ))
        })
}

fn illegal(flag: &str, value: &str) -> LoaderError {
    LoaderError::IllegalMapOption {
        option: flag.to_string(),
        value: value.to_string(),
    }
}

fn option_f32(flag: &str, token: &str) -> Result<f32> {
    token.parse::<f32>().map_err(|_| illegal(flag, token))
}

fn option_vec3(flag: &str, args: &[&str]) -> Result<Vec3> {
    Ok(Vec3::new(
        option_f32(flag, args[0])?,
        option_f32(flag, args[1])?,
        option_f32(flag, args[2])?,
    ))
}

fn option_switch(flag: &str, token: &str) -> Result<bool> {
    match token {
        "on" => Ok(true),
        "off" => Ok(false),
        other => Err(illegal(flag, other)),
    }
}

/// Apply every recognized option found in `tokens` to `map`.
///
/// `tokens` is the directive's argument list, texture path included.
///
/// # Errors
/// - `MalformedMtl` when a flag is missing its values
/// - `IllegalMapOption` when a value does not parse
/// - `IllegalRange` when `-mm` base exceeds gain
pub fn apply_map_options(mut map: MapRef, tokens: &[&str], line_num: usize) -> Result<MapRef> {
    if let Some(args) = flag_args(tokens, "-o", 3, line_num)? {
        map = map.with_offset(option_vec3("-o", args)?);
    }
    if let Some(args) = flag_args(tokens, "-s", 3, line_num)? {
        map = map.with_scale(option_vec3("-s", args)?);
    }
    if let Some(args) = flag_args(tokens, "-t", 3, line_num)? {
        map = map.with_turbulence(option_vec3("-t", args)?);
    }
    if let Some(args) = flag_args(tokens, "-bm", 1, line_num)? {
        map = map.with_bump_multiplier(option_f32("-bm", args[0])?);
    }
    if let Some(args) = flag_args(tokens, "-mm", 2, line_num)? {
        let range = ColorRange::new(option_f32("-mm", args[0])?, option_f32("-mm", args[1])?)?;
        map = map.with_color_range(range);
    }
    if let Some(args) = flag_args(tokens, "-clamp", 1, line_num)? {
        map = map.with_clamp(option_switch("-clamp", args[0])?);
    }

    let mut blend = BlendSetting::default();
    if let Some(args) = flag_args(tokens, "-blendu", 1, line_num)? {
        blend.u = option_switch("-blendu", args[0])?;
    }
    if let Some(args) = flag_args(tokens, "-blendv", 1, line_num)? {
        blend.v = option_switch("-blendv", args[0])?;
    }

    if let Some(args) = flag_args(tokens, "-imfchan", 1, line_num)? {
        let channel = Channel::from_token(args[0]).ok_or_else(|| illegal("-imfchan", args[0]))?;
        map = map.with_channel(channel);
    }
    if let Some(args) = flag_args(tokens, "-texres", 1, line_num)? {
        let resolution = args[0].parse::<i32>().map_err(|_| illegal("-texres", args[0]))?;
        map = map.with_resolution(resolution);
    }
    if let Some(args) = flag_args(tokens, "-cc", 1, line_num)? {
        map = map.with_color_correction(option_switch("-cc", args[0])?);
    }

    Ok(map.with_blend(blend))
}
