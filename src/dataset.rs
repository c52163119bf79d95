//! Control-error samples and their CSV storage
//!
//! The flat file has one row per sample with the columns
//! `algorithm,control_error`. Files written by older tooling used `error` for
//! the second column; the reader accepts both.

use crate::algorithm::Algorithm;
use crate::error::{AnovaError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// A single control-error observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub algorithm: Algorithm,
    /// Control error in millimeters
    #[serde(alias = "error")]
    pub control_error: f64,
}

/// All samples belonging to one algorithm, in dataset order
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub algorithm: Algorithm,
    pub values: Vec<f64>,
}

impl Group {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            None
        } else {
            Some(self.values.iter().sum::<f64>() / self.values.len() as f64)
        }
    }
}

/// Ordered collection of samples
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    samples: Vec<Sample>,
}

impl Dataset {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Partition samples by algorithm
    ///
    /// Groups appear in the order their label first occurs in the dataset,
    /// which is the iteration order every downstream stage relies on.
    pub fn groups(&self) -> Vec<Group> {
        let mut groups: Vec<Group> = Vec::new();
        for sample in &self.samples {
            match groups.iter_mut().find(|g| g.algorithm == sample.algorithm) {
                Some(group) => group.values.push(sample.control_error),
                None => groups.push(Group {
                    algorithm: sample.algorithm,
                    values: vec![sample.control_error],
                }),
            }
        }
        groups
    }

    /// Sample count per algorithm, in group order
    pub fn group_counts(&self) -> Vec<(Algorithm, usize)> {
        self.groups()
            .into_iter()
            .map(|g| (g.algorithm, g.len()))
            .collect()
    }

    /// Serialize as CSV into any writer
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for sample in &self.samples {
            csv_writer.serialize(sample)?;
        }
        csv_writer
            .flush()
            .map_err(|e| AnovaError::Csv(csv::Error::from(e)))?;
        Ok(())
    }

    /// Parse CSV from any reader, rejecting non-finite control errors
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut samples = Vec::new();
        for record in csv_reader.deserialize() {
            let sample: Sample = record?;
            if !sample.control_error.is_finite() {
                return Err(AnovaError::InvalidControlError {
                    algorithm: sample.algorithm.to_string(),
                    value: sample.control_error,
                });
            }
            samples.push(sample);
        }
        Ok(Self { samples })
    }

    /// Write the dataset to a CSV file, replacing any existing file
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| AnovaError::file_io(path, e))?;
        self.to_writer(file)?;
        tracing::debug!("Wrote {} samples to {}", self.len(), path.display());
        Ok(())
    }

    /// Load a dataset from a CSV file
    pub fn read_csv(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| AnovaError::file_io(path, e))?;
        let dataset = Self::from_reader(file)?;
        tracing::debug!("Loaded {} samples from {}", dataset.len(), path.display());
        Ok(dataset)
    }
}

impl FromIterator<Sample> for Dataset {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
