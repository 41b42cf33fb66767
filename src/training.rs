use crate::config::TrainingConfig;
use crate::dataset::Samples;
use crate::descent::{CostHistory, Descent, GradientDescent, State};
use crate::error::Result;
use crate::model::LinearModel;
use crate::scaling::Scaler;

#[derive(Clone, Debug)]
pub struct TrainingReport {
    /// Coefficients on the original kilometer scale.
    pub model: LinearModel,
    /// Coefficients as learned on the scaled feature column.
    pub scaled_model: LinearModel,
    pub scaler: Scaler,
    pub state: State,
    pub iterations: usize,
    pub history: CostHistory,
}

/// Scales the feature column, runs gradient descent and maps the learned
/// coefficients back to kilometers.
pub fn train(samples: &Samples, config: &TrainingConfig) -> Result<TrainingReport> {
    config.validate()?;

    let scaler = Scaler::fit(config.scaling, samples.x())?;
    let scaled_x = scaler.forward(samples.x());

    log::info!(
        "training on {} samples: learning rate {}, tolerance {}, max iterations {}, scaling {:?}",
        samples.len(),
        config.learning_rate,
        config.tolerance,
        config.max_iterations,
        config.scaling
    );

    let initial = scaler.forward_model(config.initial);

    let Descent {
        model: scaled_model,
        state,
        iterations,
        history,
    } = GradientDescent::new(scaled_x.view(), samples.y(), initial, config)?.run();

    let model = scaler.inverse(scaled_model);

    log::info!(
        "finished in state {state:?} after {iterations} iterations: w = {}, b = {}",
        model.w,
        model.b
    );

    Ok(TrainingReport {
        model,
        scaled_model,
        scaler,
        state,
        iterations,
        history,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::testing::noisy_line;
    use crate::error::Error;
    use crate::least_squares;
    use crate::scaling::ScalingPolicy;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn recovers_ten_per_km() {
        let samples = Samples::from_vecs(vec![100., 200., 300.], vec![1000., 2000., 3000.]).unwrap();
        let config = TrainingConfig {
            learning_rate: 0.01,
            max_iterations: 1000,
            ..Default::default()
        };

        let report = train(&samples, &config).unwrap();

        assert_abs_diff_eq!(report.model.w, 10., epsilon = 1e-2);
        assert_abs_diff_eq!(report.model.b, 0., epsilon = 1e-2);
    }

    #[test]
    fn every_policy_reaches_the_same_line() {
        let samples = noisy_line(80, -0.021, 8500., 350., 19);
        let optimum = least_squares::fit(samples.x(), samples.y()).unwrap();

        for (scaling, learning_rate, max_iterations) in [
            (ScalingPolicy::ZScore, 0.01, 5000),
            (ScalingPolicy::MinMax, 0.5, 20000),
        ] {
            let config = TrainingConfig {
                scaling,
                learning_rate,
                max_iterations,
                ..Default::default()
            };

            let report = train(&samples, &config).unwrap();

            assert_eq!(report.state, State::Converged, "{scaling:?}");
            assert_relative_eq!(report.model.w, optimum.w, max_relative = 1e-4);
            assert_relative_eq!(report.model.b, optimum.b, max_relative = 1e-4);
        }
    }

    #[test]
    fn initial_coefficients_are_on_original_scale() {
        let samples = noisy_line(40, -0.02, 8000., 100., 23);
        let optimum = least_squares::fit(samples.x(), samples.y()).unwrap();
        let config = TrainingConfig {
            initial: optimum,
            ..Default::default()
        };

        let report = train(&samples, &config).unwrap();

        assert_eq!(report.state, State::Converged);
        assert!(report.iterations < 10, "took {} iterations", report.iterations);
    }

    #[test]
    fn unscaled_kilometers_with_huge_rate_diverge() {
        let samples = noisy_line(30, -0.02, 8000., 100., 29);
        let config = TrainingConfig {
            scaling: ScalingPolicy::None,
            learning_rate: 1e6,
            ..Default::default()
        };

        let report = train(&samples, &config).unwrap();

        assert_eq!(report.state, State::Diverged);
        assert!(report.model.is_finite());
    }

    #[test]
    fn constant_feature_fails_before_training() {
        let samples = Samples::from_vecs(vec![5., 5., 5.], vec![1., 2., 3.]).unwrap();

        let err = train(&samples, &TrainingConfig::default()).unwrap_err();
        assert!(matches!(err, Error::DegenerateScale(_)));
    }

    #[test]
    fn invalid_config_fails_before_training() {
        let samples = Samples::from_vecs(vec![1., 2.], vec![1., 2.]).unwrap();
        let config = TrainingConfig {
            learning_rate: -0.1,
            ..Default::default()
        };

        assert!(matches!(
            train(&samples, &config),
            Err(Error::InvalidConfig(_))
        ));
    }
}
