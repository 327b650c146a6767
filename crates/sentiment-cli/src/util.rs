use anyhow::Result;
use std::{fs::File, io::Write, path::Path};

/// Check that `path` is an existing review table and return the delimiter its
/// extension implies: tab for `.tsv`, comma for `.csv`.
pub fn data_file_delimiter(path: &Path) -> Result<char> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    let delimiter = match ext.as_deref() {
        Some("tsv") => '\t',
        Some("csv") => ',',
        _ => anyhow::bail!(
            "Review table must have a .csv or .tsv extension: {}",
            path.display()
        ),
    };
    if !path.exists() {
        anyhow::bail!("Review table does not exist: {}", path.display());
    }
    Ok(delimiter)
}

pub fn write_bytes_to_file<P: AsRef<Path>>(path: P, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path.as_ref())?;
    file.write_all(bytes)?;
    Ok(())
}
