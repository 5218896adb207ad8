use std::fs::File;
use std::path::Path;

use super::{SensorError, SensorSource};
use crate::processing::Sample;

// -----------------------------------------------------------------------------
// SETUP FOR REPLAYING READINGS FROM CSV
// -----------------------------------------------------------------------------

/// Replays `x,y,z` rows, one per read. A leading header row is skipped.
pub struct CsvSensor {
    records: csv::StringRecordsIntoIter<File>,
    row: usize,
    name: String,
}

impl CsvSensor {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SensorError> {
        let path = path.as_ref();
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| SensorError::Open(format!("{}: {}", path.display(), e)))?;

        Ok(Self {
            records: reader.into_records(),
            row: 0,
            name: format!("csv:{}", path.display()),
        })
    }

    fn parse_record(record: &csv::StringRecord, row: usize) -> Result<Sample, SensorError> {
        if record.len() < 3 {
            return Err(SensorError::Malformed {
                row,
                message: format!("expected 3 columns, found {}", record.len()),
            });
        }

        let mut axes = [0.0; 3];
        for (axis, value) in axes.iter_mut().zip(record.iter()) {
            *axis = value.parse::<f64>().map_err(|e| SensorError::Malformed {
                row,
                message: format!("'{}': {}", value, e),
            })?;
        }

        Ok(Sample::new(axes[0], axes[1], axes[2]))
    }

    fn is_header(record: &csv::StringRecord) -> bool {
        record.iter().all(|field| field.parse::<f64>().is_err())
    }
}

impl SensorSource for CsvSensor {
    fn read(&mut self) -> Result<Sample, SensorError> {
        loop {
            let record = match self.records.next() {
                Some(Ok(record)) => record,
                Some(Err(e)) => {
                    self.row += 1;
                    return Err(SensorError::Malformed {
                        row: self.row,
                        message: e.to_string(),
                    });
                }
                None => return Err(SensorError::Exhausted),
            };
            self.row += 1;

            if self.row == 1 && Self::is_header(&record) {
                continue;
            }
            return Self::parse_record(&record, self.row);
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn csv_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn replays_rows_and_skips_header() {
        let file = csv_file("x,y,z\n10.0, 0.0, 0.0\n10.0,0.0,35.0\n");
        let mut sensor = CsvSensor::open(file.path()).unwrap();

        assert_eq!(sensor.read().unwrap(), Sample::new(10.0, 0.0, 0.0));
        assert_eq!(sensor.read().unwrap(), Sample::new(10.0, 0.0, 35.0));
        assert!(matches!(sensor.read(), Err(SensorError::Exhausted)));
    }

    #[test]
    fn headerless_files_start_at_first_row() {
        let file = csv_file("1,2,3\n");
        let mut sensor = CsvSensor::open(file.path()).unwrap();
        assert_eq!(sensor.read().unwrap(), Sample::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn malformed_row_is_an_error_and_replay_continues() {
        let file = csv_file("1,2,3\n4,oops,6\n7,8,9\n");
        let mut sensor = CsvSensor::open(file.path()).unwrap();

        sensor.read().unwrap();
        match sensor.read() {
            Err(SensorError::Malformed { row, .. }) => assert_eq!(row, 2),
            other => panic!("expected malformed row, got {:?}", other),
        }
        assert_eq!(sensor.read().unwrap(), Sample::new(7.0, 8.0, 9.0));
    }

    #[test]
    fn short_rows_are_rejected() {
        let file = csv_file("1,2\n");
        let mut sensor = CsvSensor::open(file.path()).unwrap();
        assert!(matches!(sensor.read(), Err(SensorError::Malformed { row: 1, .. })));
    }

    #[test]
    fn missing_file_fails_to_open() {
        assert!(matches!(
            CsvSensor::open("/definitely/not/here.csv"),
            Err(SensorError::Open(_))
        ));
    }
}
