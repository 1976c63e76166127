//! Screen capture through the platform screenshot tool.

use bridge_traits::{
    capture::{Frame, ScreenCapture},
    error::{BridgeError, Result},
};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// Longest a single screenshot tool may run before it is killed.
const TOOL_TIMEOUT: Duration = Duration::from_secs(10);
const TOOL_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// One external screenshot tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CaptureTool {
    program: &'static str,
    args: &'static [&'static str],
}

/// Shells out to the OS screenshot tool and decodes its PNG output.
///
/// - **macOS**: `screencapture -x`
/// - **Linux**: `grim` (Wayland), then ImageMagick `import -window root` (X11)
///
/// Meant to be called on the UI thread like any other [`ScreenCapture`].
/// A tool still running after the timeout is killed, so a stuck tool cannot
/// hold the UI thread.
#[derive(Debug, Clone)]
pub struct CommandScreenCapture {
    tools: Vec<CaptureTool>,
    scratch_dir: PathBuf,
    timeout: Duration,
}

impl CommandScreenCapture {
    pub fn new() -> Self {
        Self {
            tools: platform_tools(),
            scratch_dir: std::env::temp_dir(),
            timeout: TOOL_TIMEOUT,
        }
    }

    /// Bound each tool run to `timeout` instead of the default ten seconds.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn scratch_file(&self) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        self.scratch_dir
            .join(format!("bridge-capture-{}-{}.png", std::process::id(), nanos))
    }

    fn run_tool(tool: &CaptureTool, target: &Path, timeout: Duration) -> Result<()> {
        let mut child = Command::new(tool.program)
            .args(tool.args)
            .arg(target)
            .stdin(Stdio::null())
            .spawn()?;

        let deadline = Instant::now() + timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                warn!(tool = tool.program, ?timeout, "Capture tool timed out; killing it");
                let _ = child.kill();
                let _ = child.wait();
                return Err(BridgeError::OperationFailed(format!(
                    "{} timed out after {:?}",
                    tool.program, timeout
                )));
            }
            thread::sleep(TOOL_POLL_INTERVAL);
        };

        if status.success() && target.exists() {
            Ok(())
        } else {
            Err(BridgeError::OperationFailed(format!(
                "{} exited with {}",
                tool.program, status
            )))
        }
    }
}

impl Default for CommandScreenCapture {
    fn default() -> Self {
        Self::new()
    }
}

fn platform_tools() -> Vec<CaptureTool> {
    if cfg!(target_os = "macos") {
        vec![CaptureTool {
            program: "screencapture",
            args: &["-x", "-t", "png"],
        }]
    } else if cfg!(target_os = "linux") {
        vec![
            CaptureTool {
                program: "grim",
                args: &[],
            },
            CaptureTool {
                program: "import",
                args: &["-window", "root"],
            },
        ]
    } else {
        Vec::new()
    }
}

/// Decode an image file into an RGBA frame.
fn decode_frame(path: &Path) -> Result<Frame> {
    let image = image::open(path)
        .map_err(|e| BridgeError::OperationFailed(format!("unreadable capture: {}", e)))?
        .into_rgba8();
    let (width, height) = image.dimensions();
    Frame::new(width, height, image.into_raw())
}

impl ScreenCapture for CommandScreenCapture {
    fn capture(&self) -> Result<Frame> {
        if self.tools.is_empty() {
            return Err(BridgeError::NotAvailable(format!(
                "screen capture is not supported on {}",
                std::env::consts::OS
            )));
        }

        let target = self.scratch_file();
        let mut last_error = None;

        for tool in &self.tools {
            match Self::run_tool(tool, &target, self.timeout) {
                Ok(()) => {
                    let frame = decode_frame(&target);
                    let _ = std::fs::remove_file(&target);
                    return frame;
                }
                Err(e) => {
                    debug!(tool = tool.program, error = %e, "Capture tool failed");
                    last_error = Some(e);
                }
            }
        }

        let _ = std::fs::remove_file(&target);
        Err(BridgeError::NotAvailable(match last_error {
            Some(e) => format!("no screenshot tool succeeded: {}", e),
            None => "no screenshot tool succeeded".to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use tempfile::tempdir;

    #[test]
    fn test_decode_frame_from_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let mut image = RgbaImage::new(3, 2);
        image.put_pixel(2, 1, Rgba([10, 20, 30, 255]));
        image.save_with_format(&path, ImageFormat::Png).unwrap();

        let frame = decode_frame(&path).unwrap();
        assert_eq!((frame.width(), frame.height()), (3, 2));
        assert_eq!(&frame.rgba()[20..24], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_decode_frame_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("frame.png");
        std::fs::write(&path, b"not a png").unwrap();

        assert!(matches!(
            decode_frame(&path),
            Err(BridgeError::OperationFailed(_))
        ));
    }

    #[test]
    fn test_missing_tool_reports_not_available() {
        let dir = tempdir().unwrap();
        let capture = CommandScreenCapture {
            tools: vec![CaptureTool {
                program: "definitely-not-a-screenshot-tool",
                args: &[],
            }],
            scratch_dir: dir.path().to_path_buf(),
            timeout: TOOL_TIMEOUT,
        };

        assert!(matches!(
            capture.capture(),
            Err(BridgeError::NotAvailable(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_hung_tool_is_killed_and_ui_thread_recovers() {
        use crate::ui::DedicatedUiThread;
        use bridge_traits::run_on_ui;
        use std::sync::Arc;

        let dir = tempdir().unwrap();
        let capture = Arc::new(CommandScreenCapture {
            tools: vec![CaptureTool {
                program: "sh",
                args: &["-c", "sleep 3600"],
            }],
            scratch_dir: dir.path().to_path_buf(),
            timeout: Duration::from_millis(200),
        });
        let ui = DedicatedUiThread::spawn().unwrap();

        let started = Instant::now();
        let result = run_on_ui(&ui, {
            let capture = Arc::clone(&capture);
            move || capture.capture()
        })
        .await
        .unwrap();
        match result {
            Err(BridgeError::NotAvailable(message)) => assert!(message.contains("timed out")),
            other => panic!("expected a timeout, got {:?}", other),
        }
        assert!(started.elapsed() < Duration::from_secs(5));

        let later = tokio::time::timeout(Duration::from_secs(5), run_on_ui(&ui, || 1)).await;
        assert_eq!(later.unwrap().unwrap(), 1);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
