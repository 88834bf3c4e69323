//! Error types for the tally-csv codec.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("Sorry, this will exceed the limit of {max} clients")]
  ClientLimit { max: usize },

  #[error("CSV error: {0}")]
  Csv(#[from] csv::Error),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
