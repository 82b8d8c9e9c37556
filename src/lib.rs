//! # gioitinh 🚻
//!
//! Predict the gender associated with a Vietnamese full name.
//!
//! The crate splits a full name into family/middle/given components, builds a
//! bag-of-words vector from the middle and given names, and classifies it with
//! a [`linfa-bayes`](https://crates.io/crates/linfa-bayes) Multinomial Naive
//! Bayes model (with class probabilities) or a
//! [`linfa-svm`](https://crates.io/crates/linfa-svm) linear SVM (label only).
//!
//! ## Features
//! - Vietnamese full-name splitting (family / middle / given)
//! - Word-token bag-of-words vectorization
//! - Naive Bayes with confidence scores, or linear SVM
//! - Model persistence with `rmp-serde` (MessagePack)
//! - Auto-retrain when the training CSV is newer than the saved model
//! - Browser UI and JSON API (axum)
//!
//! ## Example
//! ```no_run
//! use std::path::Path;
//! use gioitinh::{Algorithm, GenderModel};
//!
//! let model = GenderModel::load_or_train_if_stale(
//!     Path::new("model.msgpack"),
//!     Path::new("data/vn_names.csv"),
//!     Algorithm::NaiveBayes,
//!     0.2,
//! ).unwrap();
//! let prediction = model.predict("Nguyễn Thị Hoa").unwrap();
//! println!("{} ({:?})", prediction.gender.vietnamese(), prediction.scores);
//! ```

use std::path::PathBuf;

pub mod config;
pub mod dataset;
pub mod features;
pub mod model;
pub mod name;
pub mod web;

pub use config::ServeConfig;
pub use dataset::{DatasetSplit, Gender, NameRecord, read_csv, train_test_split};
pub use features::Vocabulary;
pub use model::{Algorithm, ClassScores, GenderModel, Prediction, TokenStat};
pub use name::FullName;

/// Errors produced by the library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("name is empty after normalization")]
    EmptyName,

    #[error("dataset has no usable rows")]
    EmptyDataset,

    #[error("unknown gender label `{0}`")]
    UnknownGender(String),

    #[error("unknown algorithm `{0}`, expected `nb` or `svm`")]
    UnknownAlgorithm(String),

    #[error("model file not found: {}", .0.display())]
    ModelNotFound(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to parse dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to parse config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("failed to decode model: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    #[error("failed to encode model: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("training failed: {0}")]
    Training(String),
}

pub type Result<T> = std::result::Result<T, Error>;
