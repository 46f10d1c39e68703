#[cfg(feature = "python-bindings")]
use chrono::NaiveDate;

#[cfg(feature = "python-bindings")]
use ndarray::Array1;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::rt::{core::data::CaseSeries, core::preset::RtPreset, models::bayesian::RtModel};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

#[cfg(feature = "python-bindings")]
pub fn extract_case_series<'py>(
    py: Python<'py>, start_date: &str, cases: &Bound<'py, PyAny>,
) -> PyResult<CaseSeries> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").map_err(|_| {
        PyValueError::new_err(format!(
            "invalid start_date {start_date:?} (expected an ISO date like '2020-03-01')"
        ))
    })?;

    let case_arr = extract_f64_array(py, cases)?;
    let case_slice = case_arr.as_slice().map_err(|_| {
        PyValueError::new_err("cases must be a 1-D contiguous float64 array or sequence")
    })?;
    let counts = Array1::from(case_slice.to_vec());

    Ok(CaseSeries::from_start(start, counts)?)
}

#[cfg(feature = "python-bindings")]
pub fn extract_series_set<'py>(
    py: Python<'py>, raw_series: &Bound<'py, PyAny>,
) -> PyResult<Vec<CaseSeries>> {
    let pairs: Vec<(String, Bound<'py, PyAny>)> = raw_series.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a sequence of (start_date, cases) pairs, e.g. [('2020-03-01', counts)]",
        )
    })?;

    let mut series_set = Vec::with_capacity(pairs.len());
    for (start_date, cases) in &pairs {
        series_set.push(extract_case_series(py, start_date, cases)?);
    }
    Ok(series_set)
}

#[cfg(feature = "python-bindings")]
pub fn extract_preset(preset: Option<&str>) -> PyResult<RtPreset> {
    let name = preset.unwrap_or("LOFT");
    Ok(RtPreset::from_name(name)?)
}

#[cfg(feature = "python-bindings")]
pub fn build_rt_model(preset: Option<&str>, credible_mass: Option<f64>) -> PyResult<RtModel> {
    let preset = extract_preset(preset)?;
    let model = match credible_mass {
        Some(mass) => RtModel::with_mass(preset, mass)?,
        None => RtModel::new(preset),
    };
    Ok(model)
}
