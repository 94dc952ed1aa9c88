#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The stream does not start with an ISBIC header.
    #[error("Not an ISBIC stream")]
    InvalidFormat,

    #[error("Image has no pixels ({width}x{height})")]
    EmptyImage { width: u16, height: u16 },

    #[error("Pitch of {pitch} bytes is too small, need at least {min}")]
    PitchTooSmall { pitch: usize, min: usize },

    #[error("Pixel buffer holds {len} bytes, need at least {needed}")]
    BufferTooSmall { len: usize, needed: usize },
}
