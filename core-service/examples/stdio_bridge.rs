//! JSON-lines bridge over stdin/stdout.
//!
//! Each input line is an invocation message, e.g.
//! `{"command": "getBatteryLevel"}`; each output line is the matching
//! response message. Invocations run concurrently, so responses can come back
//! in a different order than the requests. Logs go to stderr.
//!
//! ```text
//! echo '{"command":"showAlert","arguments":{"message":"Hi"}}' \
//!   | cargo run -p core-service --example stdio_bridge
//! ```

use anyhow::Context;
use core_service::{bootstrap_desktop, init_logging, DesktopOptions, LogFormat, LoggingConfig};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut logging = LoggingConfig::default().with_format(LogFormat::Compact);
    if let Ok(filter) = std::env::var("CAPBRIDGE_LOG") {
        logging = logging.with_filter(filter);
    }
    init_logging(logging).context("installing the log subscriber")?;

    let service = bootstrap_desktop(DesktopOptions::default())
        .context("building the desktop capability set")?;
    tracing::info!(commands = ?service.commands(), "Reading invocations from stdin");

    let (responses, mut outbox) = mpsc::unbounded_channel::<String>();
    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(line) = outbox.recv().await {
            stdout.write_all(line.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }
        Ok::<_, std::io::Error>(())
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        if line.trim().is_empty() {
            continue;
        }

        let service = service.clone();
        let responses = responses.clone();
        tokio::spawn(async move {
            let response = service.handle_json(&line).await;
            let _ = responses.send(response);
        });
    }

    // Writer exits once every in-flight invocation has answered.
    drop(responses);
    writer.await.context("stdout writer task")??;
    Ok(())
}
