//! File-level send and receive on top of [`SharePipeline`].

use std::io::ErrorKind;
use std::path::Path;

use tokio::fs::{self, OpenOptions};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

use crate::error::ShareError;
use crate::link::ShareLink;
use crate::pipeline::SharePipeline;
use crate::transfer::TransferClient;

/// Output path used by `get` when none is given. Filenames are not carried
/// through the protocol.
pub const DEFAULT_OUTPUT: &str = "decrypted-output";

/// Read `path` and share its contents.
///
/// # Errors
///
/// Returns [`ShareError::Io`] if the file cannot be read, otherwise whatever
/// the pipeline reports.
pub async fn send_file<T: TransferClient>(
    pipeline: &mut SharePipeline<T>,
    path: &Path,
) -> Result<ShareLink, ShareError> {
    let plaintext = fs::read(path).await?;
    info!(bytes = plaintext.len(), "read input file");
    pipeline.send(&plaintext).await
}

/// Fetch and decrypt the share behind `link` into a new file at `output`.
///
/// Returns the number of plaintext bytes written.
///
/// # Errors
///
/// Returns [`ShareError::Io`] with [`ErrorKind::AlreadyExists`] if `output`
/// exists; it is checked before the download and again on create.
pub async fn receive_file<T: TransferClient>(
    pipeline: &mut SharePipeline<T>,
    link: &ShareLink,
    output: &Path,
) -> Result<usize, ShareError> {
    if fs::try_exists(output).await? {
        return Err(already_exists(output));
    }

    let plaintext = pipeline.receive(link).await?;

    let mut file = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(output)
        .await
    {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Err(already_exists(output)),
        Err(e) => return Err(e.into()),
    };
    write_or_remove(&mut file, output, &plaintext).await?;
    drop(file);

    info!(bytes = plaintext.len(), path = %output.display(), "wrote decrypted file");
    Ok(plaintext.len())
}

/// Write `bytes` to `file`, which was just created at `path`. On failure the
/// partial file is removed so a retry is not blocked by it.
async fn write_or_remove<W>(file: &mut W, path: &Path, bytes: &[u8]) -> Result<(), ShareError>
where
    W: AsyncWrite + Unpin,
{
    let written = async {
        file.write_all(bytes).await?;
        file.flush().await
    }
    .await;

    if let Err(e) = written {
        warn!(path = %path.display(), error = %e, "removing partially written output");
        let _ = fs::remove_file(path).await;
        return Err(e.into());
    }
    Ok(())
}

fn already_exists(path: &Path) -> ShareError {
    ShareError::Io(std::io::Error::new(
        ErrorKind::AlreadyExists,
        format!("{} already exists, refusing to overwrite", path.display()),
    ))
}
