//! Dataset assembly from the image-source collaborator.
use fruitnet::{
    confusion_matrix, BgrImage, Classifier, Dataset, Error, EvalReport, ImageSource, Prediction,
    HIST_BINS,
};
use std::collections::HashMap;

struct MapSource {
    by_class: HashMap<String, Vec<BgrImage>>,
}

impl ImageSource for MapSource {
    fn images(&self, class_name: &str) -> fruitnet::Result<Vec<BgrImage>> {
        self.by_class
            .get(class_name)
            .cloned()
            .ok_or_else(|| Error::Decode(format!("unreadable class {:?}", class_name)))
    }
}

fn source() -> MapSource {
    let mut by_class = HashMap::new();
    by_class.insert(
        "lemon".to_string(),
        vec![
            BgrImage::solid(2, 2, [0, 255, 255]),
            BgrImage::solid(3, 1, [0, 255, 255]),
        ],
    );
    by_class.insert(
        "apple".to_string(),
        vec![BgrImage::solid(2, 3, [0, 0, 255])],
    );
    MapSource { by_class }
}

#[test]
fn labels_follow_declared_class_order() {
    // "lemon" is declared first, so it gets index 0 regardless of any
    // other ordering.
    let dataset = Dataset::build(&["lemon", "apple"], &source()).unwrap();
    assert_eq!(dataset.class_names(), &["lemon", "apple"]);
    assert_eq!(dataset.num_classes(), 2);
    assert_eq!(dataset.len(), 3);

    let labels: Vec<usize> = dataset.samples().iter().map(|s| s.label).collect();
    assert_eq!(labels, vec![0, 0, 1]);
}

#[test]
fn built_samples_carry_hue_histograms() {
    let dataset = Dataset::build(&["lemon", "apple"], &source()).unwrap();
    for sample in dataset.samples() {
        assert_eq!(sample.features.len(), HIST_BINS);
    }
    // First lemon swatch: 4 pixels, all hue 30.
    assert_eq!(dataset.samples()[0].features[30], 4.0);
    // Apple swatch: 6 red pixels in bin 0.
    assert_eq!(dataset.samples()[2].features[0], 6.0);
}

#[test]
fn missing_class_propagates_as_decode_error() {
    let result = Dataset::build(&["lemon", "durian"], &source());
    assert!(matches!(result, Err(Error::Decode(_))));
}

#[test]
fn out_of_range_label_is_rejected() {
    let result = Dataset::from_samples(
        vec!["only".to_string()],
        vec![fruitnet::Sample {
            features: vec![0.0; HIST_BINS],
            label: 3,
        }],
    );
    assert!(matches!(
        result,
        Err(Error::LabelOutOfRange {
            label: 3,
            classes: 1
        })
    ));
}

#[test]
fn confusion_matrix_skips_out_of_range_predictions() {
    let report = EvalReport {
        predictions: vec![
            Prediction {
                score: 0.1,
                predicted: 0,
                actual: 0,
            },
            Prediction {
                score: 1.4,
                predicted: 1,
                actual: 0,
            },
            Prediction {
                score: 5.2,
                predicted: 5,
                actual: 1,
            },
            Prediction {
                score: -0.9,
                predicted: -1,
                actual: 1,
            },
        ],
        correct: 1,
    };
    let cm = confusion_matrix(&report, 2);
    assert_eq!(cm, vec![vec![1, 1], vec![0, 0]]);
}

#[test]
fn empty_report_accuracy_is_zero_not_nan() {
    let report = EvalReport {
        predictions: Vec::new(),
        correct: 0,
    };
    assert_eq!(report.accuracy(), 0.0);
    assert_eq!(report.accuracy_percent(), 0.0);
}

#[test]
fn end_to_end_build_train_evaluate() {
    let dataset = Dataset::build(&["lemon", "apple"], &source()).unwrap();
    let mut model = fruitnet::MlpModel::new(
        &[HIST_BINS, 8, 1],
        fruitnet::SymmetricSigmoid::default(),
        11,
    )
    .unwrap();
    let trainer = fruitnet::Trainer::new(0.01, fruitnet::TermCriteria::new(2000, 1e-6), 4);
    trainer.train(&mut model, &dataset).unwrap();

    let eval = Classifier::new(&model).evaluate(&dataset).unwrap();
    assert_eq!(eval.predictions.len(), 3);
    assert_eq!(eval.accuracy_percent(), 100.0);
}
