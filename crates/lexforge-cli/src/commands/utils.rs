use anyhow::{Context, Result};
use lexforge_core::api::GeneratedFile;
use lexforge_core::contract::ContractData;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory downloads land in: `--out`, else the user's download directory,
/// else the current directory.
pub fn download_dir(out: Option<&Path>) -> PathBuf {
    out.map(Path::to_path_buf)
        .or_else(dirs::download_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn write_download(file: &GeneratedFile, out: Option<&Path>) -> Result<PathBuf> {
    let dir = download_dir(out);
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(&file.filename);
    fs::write(&path, &file.bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("  ✓ Saved {}", path.display());
    Ok(path)
}

/// Reads a contract payload in the backend's JSON shape.
pub fn read_contract_data(path: &Path) -> Result<ContractData> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {} as contract data", path.display()))
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
