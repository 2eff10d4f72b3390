//! GMD model commands

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, bail};
use serde::Serialize;

use crate::cli::progress::{CUBE, DISK, LOOKING_GLASS, print_done, print_step, simple_bar};
use crate::formats::gmd::{
    GmdInfo, LoadOptions, ModelInfo, ModelStore, batch_validate, find_gmd_files,
};

#[derive(Serialize)]
struct InspectReport {
    file: GmdInfo,
    model: Option<ModelInfo>,
}

/// Inspect a GMD file and display its structure.
pub fn inspect(path: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let store = ModelStore::native();
    if !store.file_system().exists(path) {
        bail!("File not found: {}", path.display());
    }
    let info = store
        .inspect(path)
        .with_context(|| format!("Failed to inspect {}", path.display()))?;
    let model = store.try_load(path).ok().map(|m| ModelInfo::from_model(&m));

    if let Some(output) = output {
        let report = InspectReport { file: info, model };
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(output, json)?;
        println!("Written to: {}", output.display());
        return Ok(());
    }

    println!("Inspecting GMD file: {}", path.display());
    println!();
    println!("GMD File Information");
    println!("====================");
    println!("Version:     {}", info.version);
    println!("Name:        {}", info.name);
    println!("Author:      {}", info.author);
    println!("Application: {}", info.app_name);
    println!("Bones:       {}", info.num_bones);
    println!("Meshes:      {}", info.num_meshes);
    println!("File size:   {} bytes", info.file_size);
    println!();

    println!("Chunks ({}):", info.num_chunks);
    println!("---------");
    for chunk in &info.chunks {
        let note = match (chunk.known, chunk.truncated) {
            (_, true) => " [truncated]",
            (false, false) => " [skipped]",
            (true, false) => "",
        };
        println!(
            "  [{:2}] {:12} | {:>8} bytes @ {:<8} | {} entries{}",
            chunk.index, chunk.name, chunk.size, chunk.offset, chunk.entries, note
        );
    }

    println!();
    match model {
        Some(model) => {
            println!("Meshes ({}):", model.meshes.len());
            for mesh in &model.meshes {
                println!(
                    "  - {} [{}] ({} vertices, {} indices, up to {} weights)",
                    mesh.name, mesh.material, mesh.vertex_count, mesh.index_count, mesh.max_weights
                );
            }
        }
        None => println!("(Could not decode model data)"),
    }

    Ok(())
}

fn collect_inputs(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(find_gmd_files(path));
        } else {
            files.push(path.clone());
        }
    }
    files
}

/// Strictly load every model and report problems.
pub fn validate(paths: &[PathBuf], quiet: bool) -> anyhow::Result<()> {
    let start = Instant::now();
    let files = collect_inputs(paths);
    if files.is_empty() {
        bail!("No GMD files found");
    }

    let store = ModelStore::native();
    let result = if quiet {
        batch_validate(&store, &files, |_| {})
    } else {
        print_step(1, 1, LOOKING_GLASS, &format!("Validating {} models...", files.len()));
        let pb = simple_bar(files.len() as u64, "Validating");
        let result = batch_validate(&store, &files, |_| pb.inc(1));
        pb.finish_and_clear();
        result
    };

    for file in &result.results {
        if !file.ok || !file.messages.is_empty() {
            let status = if file.ok { "WARN" } else { "FAIL" };
            println!("{status} {}", file.path.display());
            for message in &file.messages {
                println!("     {message}");
            }
        }
    }

    println!(
        "{}{} passed, {} failed",
        CUBE, result.success_count, result.fail_count
    );
    if !quiet {
        print_done(start.elapsed());
    }

    if result.fail_count > 0 {
        bail!("{} file(s) failed validation", result.fail_count);
    }
    Ok(())
}

/// Load a model and write it back out.
pub fn resave(source: &Path, destination: &Path) -> anyhow::Result<()> {
    let store = ModelStore::native();

    print_step(1, 2, LOOKING_GLASS, &format!("Reading {}...", source.display()));
    let model = store
        .try_load_with(source, &LoadOptions::default())
        .with_context(|| format!("Failed to load {}", source.display()))?;

    print_step(2, 2, DISK, &format!("Writing {}...", destination.display()));
    store
        .try_save(&model, destination)
        .with_context(|| format!("Failed to save {}", destination.display()))?;

    println!(
        "Saved {} bones and {} meshes",
        model.num_bones(),
        model.num_meshes()
    );
    Ok(())
}
