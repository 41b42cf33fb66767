use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Hypothesis `price = w * km + b`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LinearModel {
    pub w: f64,
    pub b: f64,
}

impl LinearModel {
    pub fn new(w: f64, b: f64) -> Self {
        LinearModel { w, b }
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        self.w * x + self.b
    }

    pub fn is_finite(&self) -> bool {
        self.w.is_finite() && self.b.is_finite()
    }

    /// Price estimate for a positive kilometer count.
    pub fn predict(&self, km: f64) -> Result<f64> {
        if !(km.is_finite() && km > 0.) {
            return Err(Error::InvalidInput(format!(
                "kilometers must be a positive number, got {km}"
            )));
        }

        Ok(self.evaluate(km))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        std::fs::write(path, self.to_string()).map_err(|source| Error::Persistence {
            path: path.to_path_buf(),
            source,
        })?;

        log::info!("coefficients saved to {}", path.display());

        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|source| Error::Persistence {
            path: path.to_path_buf(),
            source,
        })?;

        content.parse()
    }
}

/// The coefficients file format, `w_final: <w>` and `b_final: <b>` on two lines.
impl fmt::Display for LinearModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "w_final: {:?}", self.w)?;
        writeln!(f, "b_final: {:?}", self.b)
    }
}

fn parse_field(line: &str) -> Result<f64> {
    let (_, value) = line.split_once(':').ok_or_else(|| {
        Error::MalformedCoefficients(format!("expected `name: value`, got `{line}`"))
    })?;

    let value = value.trim();

    let parsed: f64 = value.parse().map_err(|_| {
        Error::MalformedCoefficients(format!("`{value}` is not a number"))
    })?;

    if !parsed.is_finite() {
        return Err(Error::MalformedCoefficients(format!(
            "`{value}` is not a finite number"
        )));
    }

    Ok(parsed)
}

impl FromStr for LinearModel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lines: Vec<&str> = s.lines().collect();

        let [w_line, b_line] = lines.as_slice() else {
            return Err(Error::MalformedCoefficients(format!(
                "expected 2 lines, found {}",
                lines.len()
            )));
        };

        Ok(LinearModel {
            w: parse_field(w_line)?,
            b: parse_field(b_line)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_and_predicts() {
        let model: LinearModel = "w_final: 5.5\nb_final: 120.0".parse().unwrap();

        assert_eq!(model, LinearModel::new(5.5, 120.));
        assert_eq!(model.predict(50000.).unwrap(), 275120.);
    }

    #[test]
    fn three_lines_are_malformed() {
        let err = "w_final: 5.5\nb_final: 120.0\nextra: 1.0"
            .parse::<LinearModel>()
            .unwrap_err();

        assert!(matches!(err, Error::MalformedCoefficients(_)));
    }

    #[test]
    fn non_numeric_value_is_malformed() {
        let err = "w_final: fast\nb_final: 120.0"
            .parse::<LinearModel>()
            .unwrap_err();

        assert!(matches!(err, Error::MalformedCoefficients(_)));
    }

    #[test]
    fn missing_colon_is_malformed() {
        let err = "w_final 5.5\nb_final: 120.0"
            .parse::<LinearModel>()
            .unwrap_err();

        assert!(matches!(err, Error::MalformedCoefficients(_)));
    }

    #[test]
    fn non_finite_value_is_malformed() {
        let err = "w_final: NaN\nb_final: 120.0"
            .parse::<LinearModel>()
            .unwrap_err();

        assert!(matches!(err, Error::MalformedCoefficients(_)));
    }

    #[test]
    fn splits_on_first_colon_only() {
        assert!(matches!(
            "w_final: 1:2\nb_final: 0".parse::<LinearModel>(),
            Err(Error::MalformedCoefficients(_))
        ));
    }

    #[test]
    fn writes_two_lines() {
        let text = LinearModel::new(-0.021448963, 8499.599649).to_string();

        assert_eq!(text, "w_final: -0.021448963\nb_final: 8499.599649\n");
    }

    #[test]
    fn save_then_load_keeps_full_precision() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coefficients.txt");
        let model = LinearModel::new(-0.02144896347292456, 8499.599649933216);

        model.save(&path).unwrap();

        assert_eq!(LinearModel::load(&path).unwrap(), model);
    }

    #[test]
    fn missing_file_is_persistence_error() {
        let dir = tempfile::tempdir().unwrap();

        let err = LinearModel::load(dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, Error::Persistence { .. }));
    }

    #[test]
    fn unwritable_path_is_persistence_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("coefficients.txt");
        let model = LinearModel::new(-0.0214, 8499.6);

        match model.save(&path) {
            Err(Error::Persistence { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected a persistence error, got {other:?}"),
        }

        assert!(!path.exists());
        assert_eq!(model.predict(100000.).unwrap(), model.evaluate(100000.));
    }

    #[test]
    fn rejects_non_positive_km() {
        let model = LinearModel::new(-0.02, 8500.);

        assert!(matches!(model.predict(0.), Err(Error::InvalidInput(_))));
        assert!(matches!(model.predict(-10.), Err(Error::InvalidInput(_))));
        assert!(matches!(
            model.predict(f64::INFINITY),
            Err(Error::InvalidInput(_))
        ));
    }
}
