//! Renderer setup errors.

use thiserror::Error;

/// Largest render target side the renderer will allocate.
pub const MAX_TARGET_SIZE: u32 = 8192;

/// Failures while bringing the renderer up. All of them leave it unable to draw.
#[derive(Debug, Error)]
pub enum SetupError {
    /// Target side length of zero
    #[error("render target size must be non-zero")]
    EmptyTarget,

    /// Target side length above [`MAX_TARGET_SIZE`]
    #[error("render target size {0} exceeds the maximum of {max}", max = MAX_TARGET_SIZE)]
    TargetTooLarge(u32),

    /// Camera with a non-positive distance or non-finite values
    #[error("invalid camera: {0}")]
    InvalidCamera(String),

    /// Rayon could not start the worker threads
    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}
