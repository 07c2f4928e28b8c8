//! CSV files for the index series and the predictor dataset.

use std::io::Write;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use csv::{ReaderBuilder, StringRecord, Writer};
use tracing::info;
use ttt_dataset::Dataset;

use crate::error::IoError;

/// Header of the index file.
pub const INDEX_HEADER: [&str; 5] = ["year", "month", "day", "index_value", "event_day"];

/// Fixed leading columns of the dataset file.
pub const DATASET_HEADER: [&str; 5] = ["doy", "ttt_index", "ttt_event", "omi_amp", "omi_phase"];

/// Column name of the optional noise baseline.
pub const NOISE_COLUMN: &str = "rand_var";

/// A daily index series with its event flags, as stored in the index file.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexTable {
    /// Dates, ascending.
    pub dates: Vec<NaiveDate>,
    /// Index value per date; NaN where undefined.
    pub index: Vec<f64>,
    /// 1 on event peak days.
    pub flags: Vec<u8>,
}

/// Write the index series to `path`.
///
/// Index values are written with three decimals; undefined values as `NaN`.
///
/// # Errors
///
/// Returns [`IoError::LengthMismatch`] if the columns differ in length, or
/// [`IoError::Csv`] on write failure.
pub fn write_index_csv(path: &Path, table: &IndexTable) -> Result<(), IoError> {
    let mut writer = Writer::from_path(path)?;
    write_index(&mut writer, table)?;
    writer.flush()?;
    info!(path = %path.display(), n_rows = table.dates.len(), "wrote index");
    Ok(())
}

fn write_index<W: Write>(writer: &mut Writer<W>, table: &IndexTable) -> Result<(), IoError> {
    let n = table.dates.len();
    check_len("index", n, table.index.len())?;
    check_len("event flags", n, table.flags.len())?;

    writer.write_record(INDEX_HEADER)?;
    for ((date, value), flag) in table.dates.iter().zip(&table.index).zip(&table.flags) {
        let record = StringRecord::from(vec![
            date.year().to_string(),
            date.month().to_string(),
            date.day().to_string(),
            format!("{value:.3}"),
            flag.to_string(),
        ]);
        writer.write_record(&record)?;
    }
    Ok(())
}

/// Read an index file written by [`write_index_csv`].
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`], [`IoError::Csv`], or
/// [`IoError::Parse`] for a row that does not hold a valid date, value and
/// flag.
pub fn read_index_csv(path: &Path) -> Result<IndexTable, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut table = IndexTable {
        dates: Vec::new(),
        index: Vec::new(),
        flags: Vec::new(),
    };

    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        // Header is line 1.
        let line = i + 2;
        let parse_err = |reason: String| IoError::Parse {
            path: path.to_path_buf(),
            line,
            reason,
        };
        let field = |k: usize| {
            record
                .get(k)
                .map(str::trim)
                .ok_or_else(|| parse_err(format!("missing column {}", INDEX_HEADER[k])))
        };

        let year: i32 = field(0)?.parse().map_err(|e| parse_err(format!("year: {e}")))?;
        let month: u32 = field(1)?.parse().map_err(|e| parse_err(format!("month: {e}")))?;
        let day: u32 = field(2)?.parse().map_err(|e| parse_err(format!("day: {e}")))?;
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| parse_err(format!("invalid date {year}-{month}-{day}")))?;
        let value: f64 = field(3)?
            .parse()
            .map_err(|e| parse_err(format!("index_value: {e}")))?;
        let flag: u8 = field(4)?
            .parse()
            .map_err(|e| parse_err(format!("event_day: {e}")))?;

        table.dates.push(date);
        table.index.push(value);
        table.flags.push(flag);
    }

    info!(path = %path.display(), n_rows = table.dates.len(), "read index");
    Ok(table)
}

/// Write the assembled dataset to `path`.
///
/// Columns: `doy, ttt_index, ttt_event, omi_amp, omi_phase`, one column per
/// predictor, then `rand_var` if the dataset carries noise. A missing MJO
/// phase is written as an empty field.
///
/// # Errors
///
/// Returns [`IoError::Csv`] on write failure.
pub fn write_dataset_csv(path: &Path, dataset: &Dataset) -> Result<(), IoError> {
    let mut writer = Writer::from_path(path)?;
    write_dataset(&mut writer, dataset)?;
    writer.flush()?;
    info!(
        path = %path.display(),
        n_rows = dataset.len(),
        n_predictors = dataset.predictor_names().len(),
        "wrote dataset"
    );
    Ok(())
}

fn write_dataset<W: Write>(writer: &mut Writer<W>, dataset: &Dataset) -> Result<(), IoError> {
    let mut header: Vec<&str> = DATASET_HEADER.to_vec();
    header.extend(dataset.predictor_names().iter().map(String::as_str));
    if dataset.has_noise() {
        header.push(NOISE_COLUMN);
    }
    writer.write_record(&header)?;

    for r in dataset.records() {
        let mut row = vec![
            r.doy.to_string(),
            r.index_value.to_string(),
            r.event.to_string(),
            r.mjo_amplitude.to_string(),
            r.mjo_phase.map(|p| p.to_string()).unwrap_or_default(),
        ];
        row.extend(r.predictors.iter().map(f64::to_string));
        if let Some(noise) = r.noise {
            row.push(noise.to_string());
        }
        writer.write_record(&row)?;
    }
    Ok(())
}

fn check_len(field: &'static str, expected: usize, got: usize) -> Result<(), IoError> {
    if expected != got {
        return Err(IoError::LengthMismatch {
            field,
            expected,
            got,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use ttt_dataset::{DatasetBuilder, DatedSeries, MjoIndex};

    use super::*;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Writer<Vec<u8>>) -> Result<(), IoError>,
    {
        let mut writer = Writer::from_writer(vec![]);
        f(&mut writer).unwrap();
        String::from_utf8(writer.into_inner().unwrap()).unwrap()
    }

    fn days(n: usize) -> Vec<NaiveDate> {
        NaiveDate::from_ymd_opt(1980, 2, 28)
            .unwrap()
            .iter_days()
            .take(n)
            .collect()
    }

    #[test]
    fn index_rows_rounded_to_three_decimals() {
        let table = IndexTable {
            dates: days(3),
            index: vec![1.23456, f64::NAN, 2.0],
            flags: vec![0, 0, 1],
        };
        let out = render(|w| write_index(w, &table));
        assert_eq!(
            out,
            "year,month,day,index_value,event_day\n\
             1980,2,28,1.235,0\n\
             1980,2,29,NaN,0\n\
             1980,3,1,2.000,1\n"
        );
    }

    #[test]
    fn index_columns_must_align() {
        let table = IndexTable {
            dates: days(2),
            index: vec![1.0],
            flags: vec![0, 0],
        };
        let mut writer = Writer::from_writer(vec![]);
        let err = write_index(&mut writer, &table).unwrap_err();
        assert!(matches!(
            err,
            IoError::LengthMismatch {
                field: "index",
                expected: 2,
                got: 1
            }
        ));
    }

    #[test]
    fn dataset_header_and_rows() {
        let d = days(2);
        let mjo = MjoIndex::new(d.clone(), vec![0.5, f64::NAN], vec![-1.0, 0.0], vec![1.1, 0.0])
            .unwrap();
        let q = DatedSeries::new("q850", d.clone(), vec![0.25, -0.5]).unwrap();
        let ds = DatasetBuilder::new(d.clone(), vec![1.5, 2.0], vec![1, 0], mjo)
            .unwrap()
            .with_predictor("q850", q)
            .unwrap()
            .assemble();

        let out = render(|w| write_dataset(w, &ds));
        assert_eq!(
            out,
            "doy,ttt_index,ttt_event,omi_amp,omi_phase,q850\n\
             59,1.5,1,1.1,1,0.25\n\
             60,2,0,0,,-0.5\n"
        );
    }

    #[test]
    fn noise_column_appended_last() {
        let d = days(1);
        let mjo = MjoIndex::new(d.clone(), vec![1.0], vec![1.0], vec![1.0]).unwrap();
        let ds = DatasetBuilder::new(d.clone(), vec![0.0], vec![0], mjo)
            .unwrap()
            .with_noise_seed(3)
            .assemble();
        let out = render(|w| write_dataset(w, &ds));
        let header = out.lines().next().unwrap();
        assert_eq!(header, "doy,ttt_index,ttt_event,omi_amp,omi_phase,rand_var");
        assert_eq!(out.lines().nth(1).unwrap().split(',').count(), 6);
    }
}
