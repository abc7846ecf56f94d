// File-level helpers wrapping the in-memory engine with buffered reads and
// writes. Both sides of a diff are read fully into memory — line splitting
// needs the whole buffer up front, unlike a streaming byte-oriented codec.
// Optionally computes SHA-256 checksums (feature-gated behind `file-io`).

use std::fs;
use std::io;
use std::path::Path;

#[cfg(feature = "file-io")]
use sha2::Digest;

use crate::engine::{self, BdiffError, PatchedSizeError, PatchesError};

/// Statistics returned by [`diff_files`].
#[derive(Debug, Clone)]
pub struct DiffStats {
    pub source_size: u64,
    pub target_size: u64,
    pub delta_size: u64,
    pub hunks: usize,
    /// SHA-256 of the source file, if the `file-io` feature is enabled.
    pub source_sha256: Option<[u8; 32]>,
    /// SHA-256 of the target file, if the `file-io` feature is enabled.
    pub target_sha256: Option<[u8; 32]>,
}

/// Statistics returned by [`patch_files`].
#[derive(Debug, Clone)]
pub struct PatchStats {
    pub source_size: u64,
    pub deltas_applied: usize,
    pub output_size: u64,
    /// SHA-256 of the reconstructed output, if the `file-io` feature is enabled.
    pub output_sha256: Option<[u8; 32]>,
}

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("diff failed: {0}")]
    Diff(#[from] BdiffError),
    #[error("patch failed: {0}")]
    Patch(#[from] PatchesError),
    #[error("size calculation failed: {0}")]
    PatchedSize(#[from] PatchedSizeError),
}

#[cfg(feature = "file-io")]
fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = sha2::Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Diff two files, writing the binary delta to `delta_path`.
pub fn diff_files(source_path: &Path, target_path: &Path, delta_path: &Path) -> Result<DiffStats, IoError> {
    let source = fs::read(source_path)?;
    let target = fs::read(target_path)?;

    let hunks = engine::blocks(&source, &target).map_err(BdiffError::from)?;
    let delta = engine::bdiff(&source, &target)?;
    fs::write(delta_path, &delta)?;

    log::info!(
        "diff_files: {} -> {} ({} hunks, {} byte delta)",
        source_path.display(),
        target_path.display(),
        hunks.len(),
        delta.len()
    );

    #[cfg(feature = "file-io")]
    let (source_sha256, target_sha256) = (Some(sha256(&source)), Some(sha256(&target)));
    #[cfg(not(feature = "file-io"))]
    let (source_sha256, target_sha256) = (None, None);

    Ok(DiffStats {
        source_size: source.len() as u64,
        target_size: target.len() as u64,
        delta_size: delta.len() as u64,
        hunks: hunks.len(),
        source_sha256,
        target_sha256,
    })
}

/// Apply an ordered sequence of delta files to a source file, writing the
/// result to `output_path`.
pub fn patch_files(source_path: &Path, delta_paths: &[&Path], output_path: &Path) -> Result<PatchStats, IoError> {
    let source = fs::read(source_path)?;
    let deltas: Vec<Vec<u8>> = delta_paths.iter().map(|p| fs::read(p)).collect::<Result<_, _>>()?;
    let delta_refs: Vec<&[u8]> = deltas.iter().map(|d| d.as_slice()).collect();

    let output = engine::patches(&source, &delta_refs)?;
    fs::write(output_path, &output)?;

    log::info!(
        "patch_files: {} deltas applied to {}, output {} bytes",
        delta_paths.len(),
        source_path.display(),
        output.len()
    );

    #[cfg(feature = "file-io")]
    let output_sha256 = Some(sha256(&output));
    #[cfg(not(feature = "file-io"))]
    let output_sha256 = None;

    Ok(PatchStats {
        source_size: source.len() as u64,
        deltas_applied: delta_paths.len(),
        output_size: output.len() as u64,
        output_sha256,
    })
}

/// Compute the size a source file would grow/shrink to after applying a
/// single (already folded) delta file, without writing any output.
pub fn patchedsize_file(source_path: &Path, delta_path: &Path) -> Result<usize, IoError> {
    let source_len = fs::metadata(source_path)?.len() as usize;
    let delta = fs::read(delta_path)?;
    Ok(engine::patchedsize(source_len, &delta)?)
}
