//! Report building: fetch a window of entries and aggregate it

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use uuid::Uuid;

use chronotrack_core::export::write_report_csv;
use chronotrack_core::models::{Client, Project, TimeEntry};
use chronotrack_core::report::{
    daily_totals, project_totals, summarize, DailyTotal, DateRange, ProjectTotal, ReportSummary,
};
use chronotrack_store::{Query, StoreClient};

use crate::error::Result;
use crate::session::SessionManager;

/// Raw rows a report window is built from
#[derive(Debug, Clone)]
pub struct ReportData {
    pub entries: Vec<TimeEntry>,
    pub projects: HashMap<Uuid, Project>,
    pub clients: HashMap<Uuid, Client>,
}

#[derive(Debug, Clone)]
pub struct Report {
    pub summary: ReportSummary,
    pub daily: Vec<DailyTotal>,
    pub per_project: Vec<ProjectTotal>,
    pub data: ReportData,
}

pub struct ReportManager {
    store: Arc<StoreClient>,
    session: Arc<SessionManager>,
}

impl ReportManager {
    pub fn new(store: Arc<StoreClient>, session: Arc<SessionManager>) -> Self {
        Self { store, session }
    }

    /// Entries in the window (newest first) plus the project and client rows
    /// needed to label them
    pub async fn fetch(
        &self,
        range: &DateRange,
        project_id: Option<Uuid>,
    ) -> Result<ReportData> {
        let user = self.session.require_user().await?;

        let mut query = Query::new()
            .eq("user_id", user.id)
            .gte("start_time", range.start.to_rfc3339())
            .lte("start_time", range.end.to_rfc3339())
            .order("start_time", true);
        if let Some(project_id) = project_id {
            query = query.eq("project_id", project_id);
        }
        let entries: Vec<TimeEntry> = self.store.select("time_entries", &query).await?;

        let projects: Vec<Project> = self
            .store
            .select("projects", &Query::new().eq("user_id", user.id))
            .await?;
        let clients: Vec<Client> = self
            .store
            .select("clients", &Query::new().eq("user_id", user.id))
            .await?;

        Ok(ReportData {
            entries,
            projects: projects.into_iter().map(|p| (p.id, p)).collect(),
            clients: clients.into_iter().map(|c| (c.id, c)).collect(),
        })
    }

    pub async fn build(&self, range: &DateRange, project_id: Option<Uuid>) -> Result<Report> {
        let data = self.fetch(range, project_id).await?;
        Ok(Report {
            summary: summarize(&data.entries, &data.projects, range),
            daily: daily_totals(&data.entries),
            per_project: project_totals(&data.entries, &data.projects),
            data,
        })
    }

    /// Write the window as the report CSV
    pub async fn export_csv<W: Write>(
        &self,
        writer: W,
        range: &DateRange,
        project_id: Option<Uuid>,
    ) -> Result<()> {
        let data = self.fetch(range, project_id).await?;
        write_report_csv(writer, &data.entries, &data.projects, &data.clients)?;
        Ok(())
    }
}
