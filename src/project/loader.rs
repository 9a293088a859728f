//! One scoped conversion run.

use crate::assembly::{AssemblyError, AssemblyProvider};
use crate::metadata::{ConverterOptions, Metadata, convert_with_cancel};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

/// Open a session over `paths`, convert it and release the session.
///
/// The session is dropped on every path out of this function, including
/// cancellation (`Ok(None)`). Provider handles are cleared from the result
/// since they die with the session.
pub fn load_metadata(
    provider: &dyn AssemblyProvider,
    paths: &[PathBuf],
    options: &ConverterOptions,
    cancel: &CancellationToken,
) -> Result<Option<Metadata>, AssemblyError> {
    let session = provider.open_session(paths)?;
    tracing::debug!(
        target_name = session.target_assembly_name().unwrap_or_default(),
        libraries = paths.len(),
        "Loading metadata"
    );

    let Some(mut metadata) = convert_with_cancel(&*session, options, cancel) else {
        tracing::debug!("Metadata load cancelled");
        return Ok(None);
    };
    drop(session);

    metadata.release_handles();
    Ok(Some(metadata))
}
