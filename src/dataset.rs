use std::path::Path;

use ndarray::{Array1, ArrayView1};

use crate::error::{Error, Result};

#[derive(Copy, Clone, Debug, serde::Deserialize)]
struct Record {
    km: f64,
    price: f64,
}

/// Feature values (kilometers) paired with target values (prices).
///
/// Always holds at least one sample and both columns have the same length.
#[derive(Clone, Debug)]
#[allow(clippy::len_without_is_empty)]
pub struct Samples {
    x: Array1<f64>,
    y: Array1<f64>,
}

impl Samples {
    pub fn new(x: Array1<f64>, y: Array1<f64>) -> Result<Self> {
        check_columns(x.view(), y.view())?;

        Ok(Samples { x, y })
    }

    pub fn from_vecs(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        Self::new(Array1::from(x), Array1::from(y))
    }

    pub fn x(&self) -> ArrayView1<'_, f64> {
        self.x.view()
    }

    pub fn y(&self) -> ArrayView1<'_, f64> {
        self.y.view()
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }
}

/// Feature and target columns must be non-empty and of equal length.
pub fn check_columns(x: ArrayView1<f64>, y: ArrayView1<f64>) -> Result<()> {
    if x.is_empty() {
        return Err(Error::InvalidInput("sample set is empty".to_string()));
    }

    if x.len() != y.len() {
        return Err(Error::InvalidInput(format!(
            "feature and target lengths differ: {} != {}",
            x.len(),
            y.len()
        )));
    }

    Ok(())
}

/// Reads a `km,price` CSV with a header row. Column order is free and other
/// columns are ignored.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Samples> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;

    let records: Vec<Record> = reader.deserialize().collect::<std::result::Result<_, _>>()?;

    log::debug!(
        "loaded {} rows from {}",
        records.len(),
        path.as_ref().display()
    );

    let (km, price): (Vec<f64>, Vec<f64>) = records
        .into_iter()
        .map(|Record { km, price }| (km, price))
        .unzip();

    Samples::from_vecs(km, price)
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn rejects_empty_samples() {
        let err = Samples::from_vecs(vec![], vec![]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn rejects_mismatched_lengths() {
        let err = Samples::from_vecs(vec![1., 2.], vec![1.]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn loads_csv_by_column_name() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "price,km,owner").unwrap();
        writeln!(file, "3650,240000,a").unwrap();
        writeln!(file, "8290,61789,b").unwrap();

        let samples = load_csv(file.path()).unwrap();

        assert_eq!(samples.len(), 2);
        assert_eq!(samples.x().to_vec(), vec![240000., 61789.]);
        assert_eq!(samples.y().to_vec(), vec![3650., 8290.]);
    }

    #[test]
    fn header_only_csv_is_invalid_input() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "km,price").unwrap();

        let err = load_csv(file.path()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn non_numeric_cell_is_dataset_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "km,price").unwrap();
        writeln!(file, "lots,3650").unwrap();

        let err = load_csv(file.path()).unwrap_err();
        assert!(matches!(err, Error::Dataset(_)));
    }
}
