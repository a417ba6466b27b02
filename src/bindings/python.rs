use crate::error::FilterError;
use crate::filters::FilterAlgorithm;
use crate::processing::stream_filter::{FilterOptions, NonFinitePolicy, StreamFilter};

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

fn to_py_err(error: FilterError) -> PyErr {
    match error {
        FilterError::InvalidMode(_)
        | FilterError::InvalidFilterSpec(_)
        | FilterError::NonFiniteSample(_)
        | FilterError::InvalidInput(_) => PyValueError::new_err(error.to_string()),
        _ => PyRuntimeError::new_err(error.to_string()),
    }
}

#[pyclass(name = "StreamFilter")]
pub struct PyStreamFilter {
    filter: StreamFilter,
}

#[pymethods]
impl PyStreamFilter {
    #[new]
    #[pyo3(signature = (sample_rate = 250.0, biquad = false, window = 20, non_finite = "reject"))]
    pub fn new(sample_rate: f64, biquad: bool, window: usize, non_finite: &str) -> PyResult<Self> {
        let non_finite: NonFinitePolicy = non_finite.parse().map_err(to_py_err)?;
        let algorithm = if biquad {
            FilterAlgorithm::Biquad
        } else {
            FilterAlgorithm::MovingAverage
        };
        Ok(PyStreamFilter {
            filter: StreamFilter::with_options(FilterOptions {
                sample_rate,
                algorithm,
                window,
                non_finite,
            }),
        })
    }

    pub fn set_mode(&mut self, mode: &str) -> PyResult<()> {
        self.filter.set_mode_str(mode).map_err(to_py_err)
    }

    pub fn mode(&self) -> String {
        self.filter.mode().to_string()
    }

    pub fn process(&mut self, sample: f64) -> PyResult<f64> {
        self.filter.process(sample).map_err(to_py_err)
    }

    pub fn filter_signal(&mut self, data: Vec<f64>) -> PyResult<Vec<f64>> {
        self.filter.process_slice(&data).map_err(to_py_err)
    }

    pub fn reset(&mut self) {
        self.filter.reset();
    }
}

/// A Python module implemented in Rust.
#[pymodule]
pub fn biopotential_filter(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyStreamFilter>()?;
    Ok(())
}
