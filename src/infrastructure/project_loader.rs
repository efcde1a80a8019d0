use cargo_metadata::MetadataCommand;
use std::fs;
use std::path::Path;
use anyhow::{Context, Result};
use tracing::debug;

/// `(module_path, file_path, source)`
pub type SourceFile = (String, String, String);

pub struct ProjectLoader;

impl ProjectLoader {
    /// Load the shader sources of every member of a Cargo workspace.
    pub fn load_workspace(manifest_path: &Path) -> Result<Vec<SourceFile>> {
        let metadata = MetadataCommand::new()
            .manifest_path(manifest_path)
            .no_deps()
            .exec()
            .context("Failed to execute cargo metadata")?;

        let mut files = Vec::new();

        for package_id in &metadata.workspace_members {
            if let Some(package) = metadata.packages.iter().find(|p| &p.id == package_id) {
                let crate_name = package.name.replace('-', "_");

                for target in &package.targets {
                    if !target.kind.iter().any(|k| k == "lib" || k == "bin") {
                        continue;
                    }
                    let src_path = &target.src_path;
                    let src_dir = src_path.parent().unwrap_or(src_path);
                    Self::collect_rs_recursive(src_dir.as_std_path(), src_dir.as_std_path(), &crate_name, &mut files)?;
                }
            }
        }

        // lib and bin targets usually share src/
        files.sort_by(|a, b| a.1.cmp(&b.1));
        files.dedup_by(|a, b| a.1 == b.1);

        debug!(files = files.len(), manifest = %manifest_path.display(), "workspace sources loaded");
        Ok(files)
    }

    /// Load every `.rs` file under `dir`, treating `dir` as the root of `crate_name`.
    pub fn load_folder(dir: &Path, crate_name: &str) -> Result<Vec<SourceFile>> {
        let mut files = Vec::new();
        Self::collect_rs_recursive(dir, dir, crate_name, &mut files)?;
        files.sort_by(|a, b| a.1.cmp(&b.1));
        Ok(files)
    }

    /// Load a single file as the root module of `crate_name`.
    pub fn load_file(path: &Path, crate_name: &str) -> Result<SourceFile> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file {}", path.display()))?;
        Ok((crate_name.to_string(), path.display().to_string(), content))
    }

    /// `src/lighting/mod.rs` under crate `shaders` is `shaders::lighting`.
    pub fn module_path(root: &Path, file: &Path, crate_name: &str) -> String {
        let relative = file.strip_prefix(root).unwrap_or(file).with_extension("");
        let mut segments = vec![crate_name.to_string()];
        segments.extend(
            relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().to_string()),
        );
        if matches!(segments.last().map(String::as_str), Some("lib" | "main" | "mod")) && segments.len() > 1 {
            segments.pop();
        }
        segments.join("::")
    }

    fn collect_rs_recursive(
        root: &Path,
        dir: &Path,
        crate_name: &str,
        out: &mut Vec<SourceFile>,
    ) -> Result<()> {
        if dir.ends_with("target") || dir.ends_with(".git") {
            return Ok(());
        }
        if !dir.exists() {
            return Ok(());
        }

        for entry in fs::read_dir(dir).with_context(|| format!("Failed to read directory {}", dir.display()))? {
            let entry = entry?;
            let path = entry.path();

            if path.is_dir() {
                Self::collect_rs_recursive(root, &path, crate_name, out)?;
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                let content = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read file {}", path.display()))?;
                let module = Self::module_path(root, &path, crate_name);
                out.push((module, path.display().to_string(), content));
            }
        }
        Ok(())
    }
}
