//! CSV output of finished temperature sweeps.
use crate::finite_size::Peak;
use crate::observables::ObservableSeries;
use csv::WriterBuilder;
use std::path::Path;

pub const SERIES_HEADER: [&str; 6] = [
    "temperature",
    "energy",
    "magnetization",
    "specific_heat",
    "susceptibility",
    "acceptance",
];

/// One row per temperature point.
pub fn write_series_csv(path: &Path, series: &ObservableSeries) -> Result<(), csv::Error> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.write_record(SERIES_HEADER)?;
    for k in 0..series.len() {
        wtr.write_record(&[
            series.temperature[k].to_string(),
            series.energy[k].to_string(),
            series.magnetization[k].to_string(),
            series.specific_heat[k].to_string(),
            series.susceptibility[k].to_string(),
            series.acceptance_rate[k].to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Specific-heat and susceptibility peaks, one row per lattice size.
/// Both slices are expected in the same size order.
pub fn write_peaks_csv(path: &Path, cv: &[Peak], chi: &[Peak]) -> Result<(), csv::Error> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.write_record(["lattice_size", "t_cv", "cv_max", "t_chi", "chi_max"])?;
    for (c, x) in cv.iter().zip(chi) {
        wtr.write_record(&[
            c.lattice_size.to_string(),
            c.temperature.to_string(),
            c.value.to_string(),
            x.temperature.to_string(),
            x.value.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
