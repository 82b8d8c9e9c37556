//! Training, prediction, and persistence of the gender classifier.

use crate::dataset::{Gender, NameRecord, read_csv, train_test_split};
use crate::features::Vocabulary;
use crate::name::FullName;
use crate::{Error, Result};
use linfa::prelude::*;
use linfa_bayes::{MultinomialNb, NaiveBayes};
use linfa_svm::Svm;
use ndarray::{Array1, Axis};
use rmp_serde::{decode::from_read, encode::write_named};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::str::FromStr;
use std::time::SystemTime;

/// Classifier family to fit at training time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Algorithm {
    NaiveBayes,
    Svm,
}

impl Algorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::NaiveBayes => "Naive Bayes",
            Algorithm::Svm => "SVM",
        }
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "nb" | "naive-bayes" | "naive_bayes" | "bayes" => Ok(Algorithm::NaiveBayes),
            "svm" => Ok(Algorithm::Svm),
            other => Err(Error::UnknownAlgorithm(other.to_string())),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
enum Classifier {
    NaiveBayes(MultinomialNb<f64, usize>),
    Svm(Svm<f64, bool>),
}

/// Class probabilities from the Naive Bayes classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassScores {
    pub female: f64,
    pub male: f64,
}

impl ClassScores {
    /// Probability of the predicted class.
    pub fn confidence(&self) -> f64 {
        self.female.max(self.male)
    }
}

/// Result of classifying one name.
#[derive(Debug, Clone)]
pub struct Prediction {
    pub gender: Gender,
    /// `None` for the SVM classifier, which reports no probability.
    pub scores: Option<ClassScores>,
}

/// Per-token training frequencies, used for the informative-token view.
#[derive(Debug, Clone)]
pub struct TokenStat {
    pub token: String,
    pub male: usize,
    pub female: usize,
    /// Smoothed female/male frequency ratio.
    pub ratio: f64,
}

/// Trained name-to-gender classifier with its vocabulary and token
/// frequency data.
#[derive(Debug, Serialize, Deserialize)]
pub struct GenderModel {
    classifier: Classifier,
    vocab: Vocabulary,
    token_freq_female: HashMap<String, usize>,
    token_freq_male: HashMap<String, usize>,
    female_count: usize,
    male_count: usize,
}

impl GenderModel {
    /// Fit a classifier on labeled records.
    ///
    /// Rows whose name normalizes to nothing are skipped with a warning;
    /// an empty remainder is an error.
    pub fn train(records: &[NameRecord], algorithm: Algorithm) -> Result<Self> {
        let mut texts = Vec::new();
        let mut genders = Vec::new();
        let mut token_freq_female: HashMap<String, usize> = HashMap::new();
        let mut token_freq_male: HashMap<String, usize> = HashMap::new();
        let mut female_count = 0;
        let mut male_count = 0;

        for record in records {
            let name = match FullName::parse(&record.full_name) {
                Ok(name) => name,
                Err(_) => {
                    tracing::warn!(full_name = %record.full_name, "skipping unusable row");
                    continue;
                }
            };
            let text = name.classifier_text();

            let freq = match record.gender {
                Gender::Female => {
                    female_count += 1;
                    &mut token_freq_female
                }
                Gender::Male => {
                    male_count += 1;
                    &mut token_freq_male
                }
            };
            for token in text.split_whitespace() {
                *freq.entry(token.to_string()).or_insert(0) += 1;
            }

            texts.push(text);
            genders.push(record.gender);
        }

        if texts.is_empty() {
            return Err(Error::EmptyDataset);
        }

        let vocab = Vocabulary::fit(texts.iter().map(String::as_str));
        let x = vocab.transform_batch(&texts);

        let classifier = match algorithm {
            Algorithm::NaiveBayes => {
                let y = Array1::from_vec(genders.iter().map(|g| g.label()).collect());
                let dataset = Dataset::new(x, y);
                let model = MultinomialNb::params()
                    .fit(&dataset)
                    .map_err(|e| Error::Training(e.to_string()))?;
                Classifier::NaiveBayes(model)
            }
            Algorithm::Svm => {
                let y = Array1::from_vec(genders.iter().map(|g| *g == Gender::Male).collect());
                let dataset = Dataset::new(x, y);
                let model = Svm::<f64, bool>::params()
                    .linear_kernel()
                    .fit(&dataset)
                    .map_err(|e| Error::Training(e.to_string()))?;
                Classifier::Svm(model)
            }
        };

        Ok(GenderModel {
            classifier,
            vocab,
            token_freq_female,
            token_freq_male,
            female_count,
            male_count,
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        match self.classifier {
            Classifier::NaiveBayes(_) => Algorithm::NaiveBayes,
            Classifier::Svm(_) => Algorithm::Svm,
        }
    }

    /// Number of female training names.
    pub fn female_count(&self) -> usize {
        self.female_count
    }

    /// Number of male training names.
    pub fn male_count(&self) -> usize {
        self.male_count
    }

    /// Classify one free-form name.
    pub fn predict(&self, raw_name: &str) -> Result<Prediction> {
        let name = FullName::parse(raw_name)?;
        let row = self.vocab.transform(&name.classifier_text());
        let input = row.insert_axis(Axis(0));

        match &self.classifier {
            Classifier::NaiveBayes(model) => {
                let (proba, classes) = model.predict_proba(input.view());
                let p_female = classes
                    .iter()
                    .position(|&c| *c == Gender::Female.label())
                    .map(|i| proba[[0, i]])
                    .unwrap_or(0.0);
                let p_male = classes
                    .iter()
                    .position(|&c| *c == Gender::Male.label())
                    .map(|i| proba[[0, i]])
                    .unwrap_or(0.0);

                let gender = if p_male >= p_female {
                    Gender::Male
                } else {
                    Gender::Female
                };
                Ok(Prediction {
                    gender,
                    scores: Some(ClassScores {
                        female: p_female,
                        male: p_male,
                    }),
                })
            }
            Classifier::Svm(model) => {
                let labels = model.predict(&input);
                let gender = if labels[0] { Gender::Male } else { Gender::Female };
                Ok(Prediction {
                    gender,
                    scores: None,
                })
            }
        }
    }

    /// Classification accuracy over labeled records.
    pub fn evaluate_on(&self, records: &[NameRecord]) -> Result<f64> {
        let mut correct = 0;
        let mut total = 0;

        for record in records {
            match self.predict(&record.full_name) {
                Ok(prediction) => {
                    if prediction.gender == record.gender {
                        correct += 1;
                    }
                    total += 1;
                }
                Err(Error::EmptyName) => continue,
                Err(e) => return Err(e),
            }
        }

        if total == 0 {
            return Err(Error::EmptyDataset);
        }
        Ok(correct as f64 / total as f64)
    }

    /// Most informative tokens by smoothed female/male frequency ratio,
    /// female-skewed first.
    pub fn informative_tokens(&self, n: usize) -> Vec<TokenStat> {
        let mut stats: Vec<TokenStat> = self
            .vocab
            .tokens()
            .map(|token| {
                let male = *self.token_freq_male.get(token).unwrap_or(&0);
                let female = *self.token_freq_female.get(token).unwrap_or(&0);
                let ratio = (female as f64 + 1.0) / (male as f64 + 1.0);
                TokenStat {
                    token: token.to_string(),
                    male,
                    female,
                    ratio,
                }
            })
            .collect();

        stats.sort_by(|a, b| b.ratio.partial_cmp(&a.ratio).unwrap_or(Ordering::Equal));
        stats.truncate(n);
        stats
    }

    /// Saves the model to a binary MessagePack file.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        write_named(&mut writer, self)?;
        Ok(())
    }

    /// Loads the model from a binary MessagePack file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ModelNotFound(path.to_path_buf()));
        }
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(from_read(reader)?)
    }

    /// Load a saved model if up-to-date, or retrain and persist if the CSV
    /// is newer than the model file (or the model is missing).
    pub fn load_or_train_if_stale(
        model_path: &Path,
        csv_path: &Path,
        algorithm: Algorithm,
        test_ratio: f64,
    ) -> Result<Self> {
        let model_mtime = model_path
            .metadata()
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        let csv_mtime = csv_path
            .metadata()
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);

        let should_retrain = !model_path.exists() || csv_mtime > model_mtime;

        if should_retrain {
            tracing::info!(model = %model_path.display(), "training model (CSV is newer or model missing)");
            let records = read_csv(csv_path)?;
            let split = train_test_split(&records, test_ratio);
            let model = GenderModel::train(&split.train, algorithm)?;

            if !split.test.is_empty() {
                if let Ok(accuracy) = model.evaluate_on(&split.test) {
                    tracing::info!("holdout accuracy: {:.2}%", accuracy * 100.0);
                }
            }

            model.save_to_file(model_path)?;
            Ok(model)
        } else {
            tracing::info!(model = %model_path.display(), "loading model (up-to-date)");
            GenderModel::load_from_file(model_path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_records() -> Vec<NameRecord> {
        let male = [
            "Nguyễn Văn Nam",
            "Trần Văn Hùng",
            "Lê Đức Dũng",
            "Phạm Văn Tuấn",
            "Hoàng Minh Long",
            "Vũ Quang Sơn",
        ];
        let female = [
            "Nguyễn Thị Hoa",
            "Trần Thị Lan",
            "Lê Thị Hương",
            "Phạm Ngọc Mai",
            "Hoàng Thị Thảo",
            "Vũ Thu Trang",
        ];
        male.iter()
            .map(|&n| NameRecord {
                full_name: n.to_string(),
                gender: Gender::Male,
            })
            .chain(female.iter().map(|&n| NameRecord {
                full_name: n.to_string(),
                gender: Gender::Female,
            }))
            .collect()
    }

    #[test]
    fn naive_bayes_separates_training_names() {
        let model = GenderModel::train(&demo_records(), Algorithm::NaiveBayes).unwrap();

        let nam = model.predict("Nguyễn Văn Nam").unwrap();
        assert_eq!(nam.gender, Gender::Male);
        let hoa = model.predict("Nguyễn Thị Hoa").unwrap();
        assert_eq!(hoa.gender, Gender::Female);

        let scores = hoa.scores.unwrap();
        assert!(scores.female > scores.male);
        assert!((scores.female + scores.male - 1.0).abs() < 1e-6);
        assert!(scores.confidence() >= 0.5 && scores.confidence() <= 1.0);
    }

    #[test]
    fn svm_predicts_labels_without_scores() {
        let model = GenderModel::train(&demo_records(), Algorithm::Svm).unwrap();

        let prediction = model.predict("Trần Thị Lan").unwrap();
        assert_eq!(prediction.gender, Gender::Female);
        assert!(prediction.scores.is_none());
    }

    #[test]
    fn predict_handles_names_with_no_known_tokens() {
        let model = GenderModel::train(&demo_records(), Algorithm::NaiveBayes).unwrap();
        assert!(model.predict("Zzz Qqq").is_ok());
        assert!(matches!(model.predict("!!"), Err(Error::EmptyName)));
    }

    #[test]
    fn training_on_no_usable_rows_fails() {
        let records = vec![NameRecord {
            full_name: "123".to_string(),
            gender: Gender::Male,
        }];
        assert!(matches!(
            GenderModel::train(&records, Algorithm::NaiveBayes),
            Err(Error::EmptyDataset)
        ));
    }

    #[test]
    fn informative_tokens_rank_female_markers_first() {
        let model = GenderModel::train(&demo_records(), Algorithm::NaiveBayes).unwrap();
        let stats = model.informative_tokens(3);

        assert_eq!(stats.len(), 3);
        assert!(stats[0].ratio >= stats[1].ratio);
        // "thị" appears in four female names and no male name.
        assert!(stats.iter().any(|s| s.token == "thị" && s.male == 0));
    }

    #[test]
    fn evaluate_on_training_set_is_accurate() {
        let records = demo_records();
        let model = GenderModel::train(&records, Algorithm::NaiveBayes).unwrap();
        let accuracy = model.evaluate_on(&records).unwrap();
        assert!(accuracy > 0.9, "accuracy was {accuracy}");
    }

    #[test]
    fn algorithm_parses_cli_spellings() {
        assert_eq!("nb".parse::<Algorithm>().unwrap(), Algorithm::NaiveBayes);
        assert_eq!("SVM".parse::<Algorithm>().unwrap(), Algorithm::Svm);
        assert!("forest".parse::<Algorithm>().is_err());
    }
}
