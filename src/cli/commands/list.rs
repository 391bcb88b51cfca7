//! List command implementation
//!
//! Loads the owned patients and prints them as a table.

use super::{report_failure, setup, EXIT_OK, PLACEHOLDER};
use crate::config::AppConfig;
use crate::domain::PatientRecord;
use clap::Args;

/// Arguments for the list command
#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Name filter applied by the server
    #[arg(long)]
    pub name: Option<String>,

    /// Case-insensitive filter over given and family names
    #[arg(short, long)]
    pub search: Option<String>,
}

impl ListArgs {
    /// Execute the list command
    pub async fn execute(&self, config: &AppConfig) -> anyhow::Result<i32> {
        tracing::info!(name = ?self.name, search = ?self.search, "Listing patients");

        let mut controller = match setup(config) {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };

        let loaded = match self.name.as_deref() {
            Some(name) => controller.refresh(Some(name)).await,
            None => controller.load().await,
        };
        if let Err(e) = loaded {
            return Ok(report_failure("Failed to load patients. Please try again.", &e));
        }

        let patients = controller.search(self.search.as_deref().unwrap_or_default());

        println!("Total Patients: {}", controller.store().len());
        println!();

        if patients.is_empty() {
            println!("No Patients Found");
            return Ok(EXIT_OK);
        }

        println!("{}", format_header());
        for patient in patients {
            println!("{}", format_row(patient));
        }

        Ok(EXIT_OK)
    }
}

fn format_header() -> String {
    format!(
        "{:<3} {:<30} {:<8} {:<12} {:<18} {}",
        "", "NAME", "GENDER", "BIRTH DATE", "PHONE", "ID"
    )
}

/// One table row; `📷` marks records with a photo
fn format_row(record: &PatientRecord) -> String {
    let photo = if record.photo.is_some() { "📷" } else { "" };
    let gender = record
        .gender
        .map(|g| g.to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string());
    let birth_date = record
        .birth_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string());
    let id = record
        .id
        .as_ref()
        .map(|i| i.to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string());

    format!(
        "{:<3} {:<30} {:<8} {:<12} {:<18} {}",
        photo,
        record.name.full_name(),
        gender,
        birth_date,
        record.phone().unwrap_or(PLACEHOLDER),
        id
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Gender;

    #[test]
    fn test_row_uses_placeholders() {
        let record = PatientRecord::builder()
            .id("42")
            .unwrap()
            .given(["Jane"])
            .family("Doe")
            .build()
            .unwrap();

        let row = format_row(&record);
        assert!(row.contains("Jane Doe"));
        assert_eq!(row.matches(PLACEHOLDER).count(), 3);
        assert!(row.ends_with("42"));
    }

    #[test]
    fn test_row_with_all_fields() {
        let record = PatientRecord::builder()
            .id("7")
            .unwrap()
            .given(["Jan"])
            .family("Smith")
            .gender(Gender::Male)
            .birth_date(chrono::NaiveDate::from_ymd_opt(1980, 1, 2).unwrap())
            .phone("0800")
            .photo("image/jpeg", "https://img/jan.jpg")
            .build()
            .unwrap();

        let row = format_row(&record);
        assert!(row.starts_with("📷"));
        assert!(row.contains("male"));
        assert!(row.contains("1980-01-02"));
        assert!(row.contains("0800"));
        assert!(!row.contains(PLACEHOLDER));
    }
}
