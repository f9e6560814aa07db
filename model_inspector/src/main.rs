//! Model inspector
//!
//! Loads an OBJ file, and optionally its MTL library, then prints what the
//! importer produced for each mesh.
//!
//! Usage: model_inspector model.obj [materials.mtl] [--config import.toml] [--bias 0.001]
//!
//! Without `--config` the model is read with one-based index correction and
//! index elimination, which is what most exporters need.

use std::env;
use std::path::PathBuf;

use gl_model_loader::config::ConfigError;
use gl_model_loader::foundation::logging;
use gl_model_loader::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
enum InspectorError {
    #[error("{0}")]
    Usage(String),

    #[error("Failed to load import config: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to load model: {0}")]
    Loader(#[from] LoaderError),
}

struct Args {
    obj_path: PathBuf,
    mtl_path: Option<PathBuf>,
    config_path: Option<String>,
    bias: f32,
}

fn usage(program: &str) -> String {
    format!("Usage: {program} model.obj [materials.mtl] [--config import.toml|import.ron] [--bias 0.001]")
}

fn parse_args() -> Result<Args, InspectorError> {
    let mut raw = env::args();
    let program = raw.next().unwrap_or_else(|| "model_inspector".to_string());

    let mut positional = Vec::new();
    let mut config_path = None;
    let mut bias = 0.001;

    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "--config" => {
                config_path = Some(raw.next().ok_or_else(|| InspectorError::Usage(usage(&program)))?);
            }
            "--bias" => {
                let value = raw.next().ok_or_else(|| InspectorError::Usage(usage(&program)))?;
                bias = value
                    .parse()
                    .map_err(|_| InspectorError::Usage(format!("Invalid bias '{value}'")))?;
            }
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    let mut positional = positional.into_iter();
    let obj_path = positional.next().ok_or_else(|| InspectorError::Usage(usage(&program)))?;
    let mtl_path = positional.next();
    if positional.next().is_some() {
        return Err(InspectorError::Usage(usage(&program)));
    }

    Ok(Args { obj_path, mtl_path, config_path, bias })
}

fn import_config(args: &Args) -> Result<ImportConfig, InspectorError> {
    match &args.config_path {
        Some(path) => Ok(ImportConfig::load_from_file(path)?),
        None => Ok(ImportConfig::new()
            .with_index_correction(IndexPolicy::OneBased)
            .with_post_process(PostProcessFlags::INDEX_ELIMINATION, true)),
    }
}

fn run() -> Result<(), InspectorError> {
    let args = parse_args()?;
    let config = import_config(&args)?;
    log::debug!("Import config: {config:?}");

    let mut model = ModelLoader::load(&args.obj_path, args.mtl_path.as_ref(), &config)?;

    if let Some(copyright) = model.obj.copyright() {
        println!("Header:    {copyright}");
    }
    if let Some(library) = model.obj.material_library() {
        println!("Library:   {library}");
    }

    if config.index_elimination() {
        match model.calculate_tangents(false, args.bias) {
            Ok(count) => log::info!("Calculated tangents for {count} mesh(es)"),
            Err(e) => log::warn!("Tangent calculation stopped: {e}"),
        }
    }

    let indices = if model.materials.is_empty() {
        None
    } else {
        match model.material_indices() {
            Ok(indices) => Some(indices),
            Err(e) => {
                log::warn!("{e}");
                None
            }
        }
    };

    println!("Meshes:    {}", model.meshes().len());
    for (i, mesh) in model.meshes().iter().enumerate() {
        println!("  [{i}] {}", mesh.name());
        println!(
            "      {} vertices, {} texcoords, {} normals, {} triangles",
            mesh.vertices().len(),
            mesh.texcoords().len(),
            mesh.normals().len(),
            mesh.triangle_count()
        );
        match (mesh.material_name(), &indices) {
            (Some(name), Some(indices)) => println!("      material: {name} (#{})", indices[i]),
            (Some(name), None) => println!("      material: {name}"),
            (None, _) => println!("      material: none"),
        }
        if !mesh.tangents().is_empty() {
            println!("      tangents: {} ({})", mesh.tangents().len(), mesh.tangent_status());
        }
    }

    println!("Materials: {}", model.materials.len());
    for material in &model.materials {
        let maps: Vec<String> = material
            .maps()
            .map(|m| format!("{:?}={}", m.role(), m.location()))
            .collect();
        println!("  {} illum={} maps=[{}]", material.name(), material.illumination_model(), maps.join(", "));
    }

    Ok(())
}

fn main() {
    logging::init(log::LevelFilter::Info);

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
