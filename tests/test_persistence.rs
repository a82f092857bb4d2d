//! Model persistence: bit-exact round trips and load-time shape validation.
use flate2::write::GzEncoder;
use flate2::Compression;
use fruitnet::{Error, MlpModel, SymmetricSigmoid};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Write;

fn probe_inputs(n: usize, dim: usize) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(99);
    (0..n)
        .map(|_| (0..dim).map(|_| rng.gen_range(0.0..10.0)).collect())
        .collect()
}

#[test]
fn round_trip_reproduces_forward_outputs_exactly() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json.gz");

    let mut model = MlpModel::new(&[180, 60, 20, 1], SymmetricSigmoid::default(), 42).unwrap();
    // Values whose shortest decimal form needs all 17 significant digits;
    // these only survive a save/load cycle under correctly rounded parsing.
    model.layers[0].weights[0][0] = 1.0 / 3.0;
    model.layers[1].weights[0][0] = 0.1 + 0.2;
    model.save(&path).unwrap();
    let reloaded = MlpModel::load(&path).unwrap();

    assert_eq!(
        reloaded.layers[0].weights[0][0].to_bits(),
        model.layers[0].weights[0][0].to_bits()
    );

    assert_eq!(reloaded.layer_sizes(), model.layer_sizes());
    assert_eq!(reloaded.activation(), model.activation());
    assert_eq!(reloaded.train_method(), model.train_method());
    for input in probe_inputs(8, 180) {
        assert_eq!(
            reloaded.forward(&input).unwrap().to_bits(),
            model.forward(&input).unwrap().to_bits()
        );
    }
}

#[test]
fn save_load_save_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("a.json.gz");
    let second = dir.path().join("b.json.gz");

    let model = MlpModel::new(&[10, 4, 1], SymmetricSigmoid::default(), 3).unwrap();
    model.save(&first).unwrap();
    let once = MlpModel::load(&first).unwrap();
    once.save(&second).unwrap();
    let twice = MlpModel::load(&second).unwrap();

    for input in probe_inputs(4, 10) {
        assert_eq!(
            once.forward(&input).unwrap().to_bits(),
            twice.forward(&input).unwrap().to_bits()
        );
    }
}

fn write_gz_json(path: &std::path::Path, value: &serde_json::Value) {
    let file = std::fs::File::create(path).unwrap();
    let mut enc = GzEncoder::new(file, Compression::default());
    enc.write_all(value.to_string().as_bytes()).unwrap();
    enc.finish().unwrap();
}

#[test]
fn misshapen_weight_matrix_is_a_model_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json.gz");

    // Declares a 3-input layer but carries 2-wide weight rows.
    let bad = serde_json::json!({
        "version": 1,
        "layer_sizes": [3, 1],
        "activation": { "alpha": 1.7159, "beta": 0.6666666666666666 },
        "train_method": "backprop",
        "output_scale": { "scale": 1.0, "shift": 0.0 },
        "layers": [ { "weights": [[0.1, 0.2]], "bias": [0.0] } ]
    });
    write_gz_json(&path, &bad);

    assert!(matches!(MlpModel::load(&path), Err(Error::ModelLoad(_))));
}

#[test]
fn missing_layer_is_a_model_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short.json.gz");

    let bad = serde_json::json!({
        "version": 1,
        "layer_sizes": [3, 2, 1],
        "activation": { "alpha": 1.7159, "beta": 0.6666666666666666 },
        "train_method": "backprop",
        "output_scale": { "scale": 1.0, "shift": 0.0 },
        "layers": [ { "weights": [[0.1, 0.2, 0.3], [0.0, 0.0, 0.0]], "bias": [0.0, 0.0] } ]
    });
    write_gz_json(&path, &bad);

    assert!(matches!(MlpModel::load(&path), Err(Error::ModelLoad(_))));
}

#[test]
fn garbage_bytes_are_a_model_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.bin");
    std::fs::write(&path, b"definitely not a gzipped model").unwrap();

    assert!(matches!(MlpModel::load(&path), Err(Error::ModelLoad(_))));
}

#[test]
fn unknown_version_is_a_model_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("v9.json.gz");

    let bad = serde_json::json!({
        "version": 9,
        "layer_sizes": [2, 1],
        "activation": { "alpha": 1.7159, "beta": 0.6666666666666666 },
        "train_method": "backprop",
        "output_scale": { "scale": 1.0, "shift": 0.0 },
        "layers": [ { "weights": [[0.1, 0.2]], "bias": [0.0] } ]
    });
    write_gz_json(&path, &bad);

    assert!(matches!(MlpModel::load(&path), Err(Error::ModelLoad(_))));
}
