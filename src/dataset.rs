//! Labeled name records and CSV loading.

use crate::{Error, Result};
use rand::rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

/// Gender label. Numeric convention: 0 = female, 1 = male.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub fn label(self) -> usize {
        match self {
            Gender::Female => 0,
            Gender::Male => 1,
        }
    }

    pub fn from_label(label: usize) -> Self {
        if label == 0 { Gender::Female } else { Gender::Male }
    }

    /// Display string used in the UI.
    pub fn vietnamese(self) -> &'static str {
        match self {
            Gender::Female => "Nữ",
            Gender::Male => "Nam",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Female => "female",
            Gender::Male => "male",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "nữ" | "nu" | "female" | "f" | "0" => Ok(Gender::Female),
            "nam" | "male" | "m" | "1" => Ok(Gender::Male),
            other => Err(Error::UnknownGender(other.to_string())),
        }
    }
}

/// One labeled training example.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameRecord {
    pub full_name: String,
    pub gender: Gender,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    full_name: String,
    gender: String,
}

/// Load records from a `full_name,gender` CSV file.
pub fn read_csv(path: &Path) -> Result<Vec<NameRecord>> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);

    let mut records = Vec::new();
    for row in reader.deserialize() {
        let row: CsvRow = row?;
        records.push(NameRecord {
            full_name: row.full_name,
            gender: row.gender.parse()?,
        });
    }

    if records.is_empty() {
        return Err(Error::EmptyDataset);
    }
    Ok(records)
}

/// A helper type for holding train/test splits.
#[derive(Debug)]
pub struct DatasetSplit {
    pub train: Vec<NameRecord>,
    pub test: Vec<NameRecord>,
}

/// Randomly splits a dataset into train and test sets based on `test_ratio`.
pub fn train_test_split(data: &[NameRecord], test_ratio: f64) -> DatasetSplit {
    let mut rng = rng();
    let mut data = data.to_vec();
    data.shuffle(&mut rng);

    let test_size = ((data.len() as f64) * test_ratio).round() as usize;
    let test = data[..test_size].to_vec();
    let train = data[test_size..].to_vec();

    DatasetSplit { train, test }
}
