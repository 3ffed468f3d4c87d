//! Line-delimited JSON transport
//!
//! Each input line is one request object; each request produces exactly one
//! response line. Blank lines are skipped. The loop ends when the input
//! closes.

use crate::actor::StoreHandle;
use crate::protocol::Response;
use crate::ServiceError;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

/// Serve requests from `reader` until it reaches end of input
pub async fn serve<R, W>(handle: StoreHandle, reader: R, mut writer: W) -> Result<(), ServiceError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    info!("Serving requests");

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        debug!("Received request: {}", line);
        let response = handle.send_json(&line).await;
        write_response(&mut writer, &response).await?;
    }

    info!("Input closed, server stopped");
    Ok(())
}

/// Serve requests over the process's stdin and stdout
pub async fn serve_stdio(handle: StoreHandle) -> Result<(), ServiceError> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    serve(handle, stdin, tokio::io::stdout()).await
}

async fn write_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    response: &Response,
) -> Result<(), ServiceError> {
    let mut line = serde_json::to_string(response)?;
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await?;
    debug!("Sent response: {}", line.trim_end());
    Ok(())
}
