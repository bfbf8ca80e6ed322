//! CSV report export

use std::collections::HashMap;
use std::io::Write;

use serde::Serialize;
use uuid::Uuid;

use crate::models::{Client, Project, TimeEntry};
use crate::Result;

/// One exported report row
#[derive(Debug, Serialize)]
struct ReportCsvRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Project")]
    project: String,
    #[serde(rename = "Client")]
    client: String,
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "Duration (hours)")]
    duration_hours: String,
    #[serde(rename = "Earnings")]
    earnings: String,
}

/// Write entries as the report CSV: one row per entry, newest ordering is
/// whatever the caller passed in
pub fn write_report_csv<W: Write>(
    writer: W,
    entries: &[TimeEntry],
    projects: &HashMap<Uuid, Project>,
    clients: &HashMap<Uuid, Client>,
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for entry in entries {
        let project = projects.get(&entry.project_id);
        let client = project
            .and_then(|p| p.client_id)
            .and_then(|id| clients.get(&id));
        let seconds = entry.duration.max(0);
        let earnings = project.map(|p| p.earnings_for(seconds)).unwrap_or(0.0);

        csv_writer.serialize(ReportCsvRow {
            date: entry.start_time.format("%Y-%m-%d %H:%M").to_string(),
            project: project.map(|p| p.name.clone()).unwrap_or_default(),
            client: client.map(|c| c.name.clone()).unwrap_or_default(),
            description: entry.description.clone().unwrap_or_default(),
            duration_hours: format!("{:.2}", seconds as f64 / 3600.0),
            earnings: format!("{:.2}", earnings),
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn test_report_csv_contents() {
        let user_id = Uuid::new_v4();
        let client = Client {
            id: Uuid::new_v4(),
            user_id,
            name: "Acme".to_string(),
            email: None,
            color: "#14B8A6".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let project = Project {
            id: Uuid::new_v4(),
            user_id,
            client_id: Some(client.id),
            name: "Website".to_string(),
            description: None,
            color: "#3B82F6".to_string(),
            hourly_rate: Some(100.0),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let start = Utc.with_ymd_and_hms(2025, 6, 2, 9, 30, 0).unwrap();
        let entry = TimeEntry {
            id: Uuid::new_v4(),
            user_id,
            project_id: project.id,
            description: Some("writing spec".to_string()),
            start_time: start,
            end_time: Some(start + Duration::seconds(5400)),
            duration: 5400,
            is_running: false,
            created_at: start,
            updated_at: start,
        };

        let projects = [(project.id, project)].into_iter().collect();
        let clients = [(client.id, client)].into_iter().collect();

        let mut out = Vec::new();
        write_report_csv(&mut out, &[entry], &projects, &clients).unwrap();
        let text = String::from_utf8(out).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Date,Project,Client,Description,Duration (hours),Earnings"
        );
        assert_eq!(
            lines.next().unwrap(),
            "2025-06-02 09:30,Website,Acme,writing spec,1.50,150.00"
        );
    }

    #[test]
    fn test_report_csv_missing_project() {
        let start = Utc.with_ymd_and_hms(2025, 6, 2, 9, 30, 0).unwrap();
        let entry = TimeEntry {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            description: None,
            start_time: start,
            end_time: Some(start + Duration::seconds(60)),
            duration: 60,
            is_running: false,
            created_at: start,
            updated_at: start,
        };

        let mut out = Vec::new();
        write_report_csv(&mut out, &[entry], &HashMap::new(), &HashMap::new()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.lines().nth(1).unwrap().starts_with("2025-06-02 09:30,,,"));
    }
}
