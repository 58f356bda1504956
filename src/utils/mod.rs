//! The `utils` module provides shared building blocks used across the
//! `chathub` application: the crate-wide error type and logging setup.

pub mod error;
pub mod logging;

pub use error::{Error, Result};

#[cfg(test)]
mod tests {
    use super::logging;

    #[test]
    fn logging_init_accepts_levels() {
        // Should not panic
        logging::init("info");
        logging::init("debug");
        logging::init("warn");
        logging::init("bogus");
    }
}
