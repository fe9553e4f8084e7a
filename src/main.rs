use daedalus::metrics::{accuracy_score, mean_squared_error, r2_score};
use daedalus::nn::activation::ReLU;
use daedalus::preprocessing::StandardScaler;
use daedalus::utils::train_test_split;
use daedalus::{
    DenseLayer, Knn, LinearRegression, LogisticRegression, Matrix, Model, NeuralNetwork, Penalty,
    Persist, RegressionConfig,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Noisy samples of `y = 2x + 1` for `x` in `[0, 4)`.
fn linear_data(n: usize, rng: &mut StdRng) -> daedalus::Result<(Matrix, Matrix)> {
    let xs: Vec<f64> = (0..n).map(|_| rng.gen_range(0.0..4.0)).collect();
    let ys: Vec<f64> = xs
        .iter()
        .map(|x| 2.0 * x + 1.0 + rng.gen_range(-0.1..0.1))
        .collect();
    Ok((Matrix::from_vec(n, 1, xs)?, Matrix::from_vec(n, 1, ys)?))
}

/// Two Gaussian-ish blobs labelled 0 and 1.
fn blob_data(n: usize, rng: &mut StdRng) -> daedalus::Result<(Matrix, Matrix)> {
    let mut rows = Vec::with_capacity(n);
    let mut labels = Vec::with_capacity(n);
    for i in 0..n {
        let label = (i % 2) as f64;
        let center = if label == 1.0 { 2.0 } else { -2.0 };
        rows.push(vec![
            center + rng.gen_range(-1.0..1.0),
            center + rng.gen_range(-1.0..1.0),
        ]);
        labels.push(label);
    }
    Ok((Matrix::from_rows(&rows)?, Matrix::from_vec(n, 1, labels)?))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let mut rng = StdRng::seed_from_u64(42);

    let (x, y) = linear_data(200, &mut rng)?;
    let (x_train, x_test, y_train, y_test) = train_test_split(&x, &y, 0.2, 42)?;

    let mut linear = LinearRegression::new(RegressionConfig::default().with_learning_rate(0.05));
    linear.fit_epochs(&x_train, &y_train, 2000)?;
    let pred = linear.predict(&x_test)?;
    log::info!(
        "linear regression: w = {:.4}, b = {:.4}, test mse = {:.5}, r2 = {:.4}",
        linear.params().weights().get(0, 0)?,
        linear.params().bias(),
        mean_squared_error(&y_test, &pred)?,
        r2_score(&y_test, &pred)?
    );

    let path = std::env::temp_dir().join("daedalus_linear.txt");
    linear.save_model(&path)?;
    let mut restored = LinearRegression::default();
    restored.load_model(&path)?;
    log::info!(
        "reloaded model reproduces predictions: {}",
        restored.predict(&x_test)? == pred
    );

    let mut net = NeuralNetwork::new(0.01)
        .with_layer(DenseLayer::with_rng(1, 16, &mut rng)?)
        .with_layer(ReLU::new())
        .with_layer(DenseLayer::with_rng(16, 1, &mut rng)?);
    net.fit_epochs(&x_train, &y_train, 1000)?;
    log::info!(
        "neural network ({} params): test mse = {:.5}",
        net.param_count(),
        mean_squared_error(&y_test, &net.predict(&x_test)?)?
    );

    let (bx, by) = blob_data(200, &mut rng)?;
    let mut scaler = StandardScaler::new();
    let bx = scaler.fit_transform(&bx)?;
    let (bx_train, bx_test, by_train, by_test) = train_test_split(&bx, &by, 0.25, 7)?;

    let mut logistic = LogisticRegression::new(
        RegressionConfig::default()
            .with_learning_rate(0.1)
            .with_penalty("l2".parse::<Penalty>()?)
            .with_lambda(0.1),
    );
    logistic.fit_epochs(&bx_train, &by_train, 500)?;
    log::info!(
        "logistic regression: test accuracy = {:.3}",
        accuracy_score(&by_test, &logistic.predict(&bx_test)?)?
    );

    let mut knn = Knn::new(5)?;
    knn.fit(&bx_train, &by_train)?;
    log::info!(
        "knn (k = {}): test accuracy = {:.3}",
        knn.k(),
        accuracy_score(&by_test, &knn.predict(&bx_test)?)?
    );

    Ok(())
}
