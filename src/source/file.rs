// src/source/file.rs
// =============================================================================
// Reads a URL file line by line as an async stream.
//
// The file is opened up front so a missing or unreadable file fails before
// any worker starts. Lines are read lazily afterwards, so a large file never
// sits in memory and the bounded work queue throttles how far ahead we read.
// =============================================================================

use futures::stream::{self, Stream};
use std::io;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

/// Opens `path` and returns a stream of its lines (LF or CRLF stripped).
///
/// A read error in the middle of the file is logged and ends the stream.
pub async fn open_url_file(path: &Path) -> io::Result<impl Stream<Item = String> + Send + 'static> {
    let file = File::open(path).await?;
    let lines = BufReader::new(file).lines();

    Ok(stream::unfold(lines, |mut lines| async move {
        match lines.next_line().await {
            Ok(Some(line)) => Some((line, lines)),
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "stopped reading url file");
                None
            }
        }
    }))
}
