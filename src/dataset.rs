//! Labeled feature-vector collections and the image-to-dataset build step.
use crate::error::{Error, Result};
use crate::histogram::{hue_histogram, BgrImage};

/// One labeled feature vector. `label` indexes the dataset's class list.
#[derive(Debug, Clone)]
pub struct Sample {
    pub features: Vec<f64>,
    pub label: usize,
}

/// The opaque decode collaborator: hands back every decoded image for a
/// class. Unreadable or corrupt inputs must surface as [`Error::Decode`],
/// never as an empty image list.
pub trait ImageSource {
    fn images(&self, class_name: &str) -> Result<Vec<BgrImage>>;
}

/// An ordered collection of samples plus the class list it was built from.
/// Immutable once built; row order is insertion order (class-major, in
/// declared class order).
#[derive(Debug, Clone)]
pub struct Dataset {
    samples: Vec<Sample>,
    class_names: Vec<String>,
}

impl Dataset {
    /// Assemble a dataset from pre-extracted samples. Labels must index the
    /// class list.
    pub fn from_samples(class_names: Vec<String>, samples: Vec<Sample>) -> Result<Self> {
        if let Some(sample) = samples.iter().find(|s| s.label >= class_names.len()) {
            return Err(Error::LabelOutOfRange {
                label: sample.label,
                classes: class_names.len(),
            });
        }
        Ok(Self {
            samples,
            class_names,
        })
    }

    /// Build a dataset by extracting a hue histogram from every image of
    /// every class. Class indices follow the declared order of
    /// `class_names`, not any filesystem order.
    pub fn build<S: AsRef<str>>(class_names: &[S], source: &impl ImageSource) -> Result<Self> {
        let mut samples = Vec::new();
        for (label, name) in class_names.iter().enumerate() {
            for image in source.images(name.as_ref())? {
                samples.push(Sample {
                    features: hue_histogram(&image),
                    label,
                });
            }
        }
        Ok(Self {
            samples,
            class_names: class_names.iter().map(|n| n.as_ref().to_string()).collect(),
        })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn class_names(&self) -> &[String] {
        &self.class_names
    }

    pub fn num_classes(&self) -> usize {
        self.class_names.len()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
