// Errors only come from configuration and host I/O.
// Gestures, erasing and revealing never fail: bad input degrades to a no-op.

pub type TearResult<T> = Result<T, TearError>;

#[derive(thiserror::Error, Debug)]
pub enum TearError {
    #[error("config error: {0}")]
    Config(String), // a tear/auto-tear parameter is out of range

    #[error("window error: {0}")]
    Window(String), // creating or updating the demo window failed

    #[error(transparent)]
    Image(#[from] image::ImageError), // loading the reveal image or writing the mask
}

impl TearError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn window(msg: impl Into<String>) -> Self {
        Self::Window(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(TearError::config("x").to_string().contains("config error:"));
        assert!(TearError::window("x").to_string().contains("window error:"));
    }
}
