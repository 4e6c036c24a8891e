//! Load and save policy books as JSON or CSV
//!
//! JSON is the store's list response: an array of policy objects. CSV uses a
//! header row with the same camelCase field names. Unreadable records are
//! logged and skipped so one bad row never drops the whole book.

use super::Policy;
use crate::error::{Result, TrackerError};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Csv,
}

impl FileFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("json") => Ok(FileFormat::Json),
            Some("csv") => Ok(FileFormat::Csv),
            _ => Err(TrackerError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Load policies from a .json or .csv file
pub fn load_policies<P: AsRef<Path>>(path: P) -> Result<Vec<Policy>> {
    let path = path.as_ref();
    let format = FileFormat::from_path(path)?;
    let file = File::open(path)?;
    let policies = load_policies_from_reader(BufReader::new(file), format)?;
    log::debug!("Loaded {} policies from {}", policies.len(), path.display());
    Ok(policies)
}

/// Load policies from any reader
pub fn load_policies_from_reader<R: Read>(reader: R, format: FileFormat) -> Result<Vec<Policy>> {
    let records = match format {
        FileFormat::Json => read_json_records(reader)?,
        FileFormat::Csv => read_csv_records(reader)?,
    };
    Ok(policies_from_values(records))
}

/// Decode raw records one by one, skipping any that cannot form a policy
pub fn policies_from_values(records: Vec<Value>) -> Vec<Policy> {
    let mut policies = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<Policy>(record) {
            Ok(policy) => policies.push(policy),
            Err(e) => log::warn!("Skipping policy record {}: {}", index + 1, e),
        }
    }
    policies
}

fn read_json_records<R: Read>(reader: R) -> Result<Vec<Value>> {
    Ok(serde_json::from_reader(reader)?)
}

/// CSV rows become JSON objects of strings so both formats share one
/// lenient decoding path and numeric-looking identifiers keep their text.
fn read_csv_records<R: Read>(reader: R) -> Result<Vec<Value>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result?;
        let object: Map<String, Value> = headers
            .iter()
            .zip(row.iter())
            .map(|(header, field)| {
                let value = if field.is_empty() {
                    Value::Null
                } else {
                    Value::String(field.to_string())
                };
                (header.to_string(), value)
            })
            .collect();
        records.push(Value::Object(object));
    }
    Ok(records)
}

/// Write policies to a .json or .csv file, replacing its contents
pub fn save_policies<P: AsRef<Path>>(path: P, policies: &[Policy]) -> Result<()> {
    let path = path.as_ref();
    let format = FileFormat::from_path(path)?;
    let file = File::create(path)?;
    write_policies(BufWriter::new(file), format, policies)?;
    log::debug!("Saved {} policies to {}", policies.len(), path.display());
    Ok(())
}

pub fn write_policies<W: Write>(mut writer: W, format: FileFormat, policies: &[Policy]) -> Result<()> {
    match format {
        FileFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, policies)?;
            writer.flush()?;
        }
        FileFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(writer);
            for policy in policies {
                wtr.serialize(policy)?;
            }
            wtr.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{PaymentMode, PolicyStatus};
    use chrono::NaiveDate;

    const CSV_BOOK: &str = "\
applicationNumber,policyNumber,customerName,advisorName,planName,mode,fyfrp,wfyfrp,issuedDate,loginDate,status
00123,P-1,Asha Verma,R. Singh,Endowment,Monthly,1200,1500,2024-01-15,2024-01-10,Issued
00124,,Kiran Rao,R. Singh,Term,Yearly,abc,,,,Pending
,,No Key,R. Singh,Term,Yearly,100,100,2024-02-01,,Issued
";

    #[test]
    fn test_load_csv() {
        let policies = load_policies_from_reader(CSV_BOOK.as_bytes(), FileFormat::Csv).unwrap();

        // Row without an application number is skipped
        assert_eq!(policies.len(), 2);

        let first = &policies[0];
        assert_eq!(first.application_number, "00123");
        assert_eq!(first.mode, Some(PaymentMode::Monthly));
        assert_eq!(first.fyfrp, 1200);
        assert_eq!(first.issued_date, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(first.status, Some(PolicyStatus::Issued));

        let second = &policies[1];
        assert_eq!(second.policy_number, None);
        assert_eq!(second.fyfrp, 0);
        assert_eq!(second.issued_date, None);
    }

    #[test]
    fn test_load_json_skips_bad_records() {
        let json = r#"[
            {"applicationNumber": "A1", "mode": "Quarterly", "fyfrp": 300, "issuedDate": "2024-02-10"},
            {"applicationNumber": {"nested": true}},
            {"applicationNumber": 7, "issuedDate": "garbage"}
        ]"#;
        let policies = load_policies_from_reader(json.as_bytes(), FileFormat::Json).unwrap();
        assert_eq!(policies.len(), 2);
        assert_eq!(policies[1].application_number, "7");
        assert_eq!(policies[1].issued_date, None);
    }

    #[test]
    fn test_policies_from_values_mixed_batch() {
        let records = vec![
            serde_json::json!({"applicationNumber": "A1", "mode": "Monthly", "fyfrp": 1200}),
            serde_json::json!({"customerName": "No Key"}),
            serde_json::json!("not an object"),
            serde_json::json!({"applicationNumber": "A2"}),
        ];
        let ids: Vec<String> = policies_from_values(records)
            .into_iter()
            .map(|p| p.application_number)
            .collect();
        assert_eq!(ids, vec!["A1", "A2"]);
    }

    #[test]
    fn test_load_json_not_an_array() {
        let result = load_policies_from_reader(r#"{"a": 1}"#.as_bytes(), FileFormat::Json);
        assert!(matches!(result, Err(TrackerError::Json(_))));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(FileFormat::from_path(Path::new("book.JSON")).unwrap(), FileFormat::Json);
        assert_eq!(FileFormat::from_path(Path::new("data/book.csv")).unwrap(), FileFormat::Csv);
        assert!(matches!(
            FileFormat::from_path(Path::new("book.xlsx")),
            Err(TrackerError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_csv_write_then_read() {
        let original = load_policies_from_reader(CSV_BOOK.as_bytes(), FileFormat::Csv).unwrap();
        let mut buf = Vec::new();
        write_policies(&mut buf, FileFormat::Csv, &original).unwrap();
        let reloaded = load_policies_from_reader(buf.as_slice(), FileFormat::Csv).unwrap();
        assert_eq!(reloaded, original);
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("policy_tracker_loader_{}.json", std::process::id()));
        let original = load_policies_from_reader(CSV_BOOK.as_bytes(), FileFormat::Csv).unwrap();
        save_policies(&path, &original).unwrap();
        let reloaded = load_policies(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(reloaded, original);
    }
}
