//! Screen capture abstraction.

use crate::error::{BridgeError, Result};

/// Raw screen pixels, RGBA8, row-major, no padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl Frame {
    /// Wrap a pixel buffer, checking that it matches the dimensions.
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(BridgeError::OperationFailed(format!(
                "Captured frame has empty dimensions {}x{}",
                width, height
            )));
        }

        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(BridgeError::OperationFailed(format!(
                "Captured frame is {} bytes, expected {} for {}x{} RGBA",
                rgba.len(),
                expected,
                width,
                height
            )));
        }

        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn into_rgba(self) -> Vec<u8> {
        self.rgba
    }
}

/// Screen capture trait
///
/// Called on the UI thread. Encoding and writing the image is not part of
/// this contract.
///
/// - **Android**: `PixelCopy.request(window, bitmap, …)`
/// - **iOS**: `UIWindow.drawHierarchy(in:afterScreenUpdates:)`
/// - **Desktop**: the OS screenshot tool
pub trait ScreenCapture: Send + Sync {
    fn capture(&self) -> Result<Frame>;
}
