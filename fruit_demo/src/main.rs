// fruit_demo/src/main.rs
//
// End-to-end walkthrough on a synthetic four-fruit dataset: build hue
// histograms, train the MLP, save the model, reload it, and report
// per-sample predictions with the aggregate accuracy.
use anyhow::Result;
use fruitnet::{
    confusion_matrix, BgrImage, Classifier, Dataset, ImageSource, MlpModel, SymmetricSigmoid,
    TermCriteria, Trainer,
};

/// Stand-in for the image decode collaborator: solid-color swatches per
/// fruit, with small per-image brightness variation.
struct SwatchSource;

impl ImageSource for SwatchSource {
    fn images(&self, class_name: &str) -> fruitnet::Result<Vec<BgrImage>> {
        let base: [u8; 3] = match class_name {
            "apple" => [30, 30, 220],      // red
            "lemon" => [30, 230, 230],     // yellow
            "mango" => [20, 160, 250],     // orange
            "raspberry" => [90, 20, 225],  // crimson
            other => {
                return Err(fruitnet::Error::Decode(format!(
                    "no images for class {:?}",
                    other
                )))
            }
        };
        let images = (0..5u8)
            .map(|i| {
                let bgr = [
                    base[0].saturating_add(i * 4),
                    base[1].saturating_add(i * 4),
                    base[2].saturating_sub(i * 4),
                ];
                BgrImage::solid(4, 4, bgr)
            })
            .collect();
        Ok(images)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    let classes = ["apple", "lemon", "mango", "raspberry"];
    let dataset = Dataset::build(&classes, &SwatchSource)?;
    println!(
        "Dataset: {} samples, {} classes",
        dataset.len(),
        dataset.num_classes()
    );

    // Same topology as the classic fruit ANN: 180 -> 60 -> 20 -> 1.
    let mut model = MlpModel::new(&[180, 60, 20, 1], SymmetricSigmoid::default(), 42)?;
    println!("Model: {}", model);

    let trainer = Trainer::new(0.01, TermCriteria::new(10_000, 1e-8), 7);
    let report = trainer.train(&mut model, &dataset)?;
    println!(
        "Training stopped after {} epochs ({:?}), final MSE {:.3e}",
        report.epochs, report.stop, report.final_mse
    );

    model.save("models/fruit_mlp.json.gz")?;
    println!("Model saved.");

    let reloaded = MlpModel::load("models/fruit_mlp.json.gz")?;
    let classifier = Classifier::new(&reloaded);
    let eval = classifier.evaluate(&dataset)?;
    for p in &eval.predictions {
        println!(
            "score {:+.4}  predicted {}  actual {} ({})",
            p.score,
            p.predicted,
            p.actual,
            dataset.class_names()[p.actual]
        );
    }
    println!("Accuracy: {:.2}%", eval.accuracy_percent());

    let cm = confusion_matrix(&eval, dataset.num_classes());
    println!("Confusion matrix (rows = true class):");
    for row in &cm {
        println!("  {:?}", row);
    }

    Ok(())
}
