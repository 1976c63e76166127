use crate::arguments::Arguments;
use crate::error::{HandlerError, Result};
use crate::handler::CapabilityHandler;
use crate::outcome::Value;
use async_trait::async_trait;
use bridge_traits::{
    run_on_ui, Clock, Frame, Permission, PermissionProvider, ScreenCapture, UiExecutor,
};
use core_runtime::logging::strip_path;
use image::{ImageFormat, RgbaImage};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Name collisions within the same millisecond get a numeric suffix, up to this many.
const MAX_NAME_ATTEMPTS: u32 = 100;

/// `takeScreenshot`: captures the screen, saves a PNG and returns its
/// absolute path.
///
/// Pixels are read on the UI thread; encoding and file I/O run on the
/// blocking pool. While the PNG is written, the final name is held by an
/// empty placeholder; the complete file replaces it by rename. A failed save
/// removes both.
pub struct TakeScreenshotHandler {
    capture: Arc<dyn ScreenCapture>,
    ui: Arc<dyn UiExecutor>,
    permissions: Arc<dyn PermissionProvider>,
    clock: Arc<dyn Clock>,
    output_dir: PathBuf,
    require_storage_permission: bool,
}

impl TakeScreenshotHandler {
    pub fn new(
        capture: Arc<dyn ScreenCapture>,
        ui: Arc<dyn UiExecutor>,
        permissions: Arc<dyn PermissionProvider>,
        clock: Arc<dyn Clock>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            capture,
            ui,
            permissions,
            clock,
            output_dir: output_dir.into(),
            require_storage_permission: false,
        }
    }

    /// Refuse to capture unless the storage-write permission is granted.
    pub fn require_storage_permission(mut self, required: bool) -> Self {
        self.require_storage_permission = required;
        self
    }
}

fn encode_png(frame: Frame) -> io::Result<Vec<u8>> {
    let (width, height) = (frame.width(), frame.height());
    let image = RgbaImage::from_raw(width, height, frame.into_rgba()).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            "frame buffer does not match its dimensions",
        )
    })?;

    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    Ok(png)
}

/// Claim a fresh `screenshot_<millis>[_n].png` in `dir` by creating it empty.
fn reserve_name(dir: &Path, millis: i64) -> io::Result<PathBuf> {
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let name = if attempt == 0 {
            format!("screenshot_{}.png", millis)
        } else {
            format!("screenshot_{}_{}.png", millis, attempt)
        };
        let path = dir.join(name);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => return Ok(path),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }

    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        "no free screenshot file name",
    ))
}

/// Write the screenshot to a temp file next to a reserved name, then rename
/// it into place. Returns the absolute path.
///
/// Leaves nothing behind on failure.
fn save_atomically<F>(dir: &Path, millis: i64, write: F) -> io::Result<PathBuf>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    fs::create_dir_all(dir)?;
    let dir = dir.canonicalize()?;
    let target = reserve_name(&dir, millis)?;
    let file_name = target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp = dir.join(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));

    let written = (|| {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp)?;
        write(&mut file)?;
        file.sync_all()?;
        fs::rename(&temp, &target)
    })();

    if let Err(e) = written {
        let _ = fs::remove_file(&temp);
        let _ = fs::remove_file(&target);
        return Err(e);
    }

    Ok(target)
}

#[async_trait]
impl CapabilityHandler for TakeScreenshotHandler {
    async fn invoke(&self, _arguments: &Arguments) -> Result<Value> {
        if self.require_storage_permission
            && !self.permissions.is_granted(Permission::StorageWrite).await
        {
            return Err(HandlerError::PermissionDenied(
                "Storage permission not granted".to_string(),
            ));
        }

        let capture = Arc::clone(&self.capture);
        let frame = run_on_ui(self.ui.as_ref(), move || capture.capture())
            .await
            .map_err(|e| HandlerError::internal(format!("Could not reach UI thread: {}", e)))?
            .map_err(|e| HandlerError::internal(format!("Screen capture failed: {}", e)))?;

        debug!(
            width = frame.width(),
            height = frame.height(),
            "Captured frame"
        );

        let dir = self.output_dir.clone();
        let millis = self.clock.unix_timestamp_millis();
        let path = tokio::task::spawn_blocking(move || {
            save_atomically(&dir, millis, |file| {
                let png = encode_png(frame)?;
                file.write_all(&png)
            })
        })
        .await
        .map_err(|e| HandlerError::internal(format!("Screenshot task failed: {}", e)))?
        .map_err(|e| HandlerError::internal(format!("Failed to save screenshot: {}", e)))?;

        let path = path.to_string_lossy().into_owned();
        info!(file = %strip_path(&path), "Screenshot saved");

        Ok(Value::Text(path))
    }
}
