//! Import orchestration: whole-file walk, all-or-nothing persistence,
//! and the job lifecycle around it.
//!
//! One call processes one fully buffered workbook. The job record is
//! persisted in `Running` state before the first row is parsed, so a
//! crash mid-import still leaves a discoverable record, and is persisted
//! again exactly once with a terminal status. After the job row exists,
//! no failure escapes this module: parse and storage faults become a
//! single job-level field error on a `Failed` job.

use std::collections::HashSet;

use chrono::Utc;

use crate::country::{CountryRow, NewCountry};
use crate::job::{ImportJob, ImportStatus};
use crate::schema::ColumnRuleSet;
use crate::sheet::{self, Sheet, SheetError};
use crate::store::{ImportStore, StoreError};
use crate::validate::{validate_row, FieldError, RowOutcome};

/// A failure outside normal row validation. Terminal for the job.
#[derive(Debug, thiserror::Error)]
enum ImportFault {
    #[error("{0}")]
    Sheet(#[from] SheetError),
    #[error("{0}")]
    Store(#[from] StoreError),
    #[error("row does not match the country schema")]
    Shape,
}

/// Run a countries import over an uploaded workbook.
///
/// Returns the terminal job on success of the pipeline itself; the
/// only `Err` case is a failure to create the initial job record,
/// without which there is nothing to report an outcome on.
pub async fn run_import(
    store: &dyn ImportStore,
    rules: &ColumnRuleSet,
    file_name: &str,
    file_bytes: Vec<u8>,
    submitted_by: &str,
) -> Result<ImportJob, StoreError> {
    let mut job = ImportJob {
        id: 0,
        file_name: file_name.to_string(),
        status: ImportStatus::Running,
        total_rows: 0,
        success_count: 0,
        failure_count: 0,
        errors: Vec::new(),
        submitted_by: submitted_by.to_string(),
        started_at: Utc::now(),
        completed_at: None,
        original_file: Some(file_bytes.clone()),
    };

    // Recoverability anchor: from here on an abandoned run is visible
    // as a Running job.
    job.id = store.insert_job(&job).await?;

    let fault = match process_file(store, rules, &mut job, &file_bytes, submitted_by).await {
        Ok(()) => {
            job.completed_at = Some(Utc::now());
            store.replace_job(job.id, &job).await.err().map(ImportFault::Store)
        }
        Err(fault) => Some(fault),
    };

    if let Some(fault) = fault {
        job.status = ImportStatus::Failed;
        job.errors.push(FieldError {
            row: 0,
            column: String::new(),
            message: format!("Unexpected error: {fault}"),
        });
        job.completed_at = Some(Utc::now());
        if let Err(error) = store.replace_job(job.id, &job).await {
            tracing::error!(job_id = job.id, %error, "failed to persist terminal import job");
        }
    }

    Ok(job)
}

/// Walk every data row, validate, and apply the all-or-nothing policy.
///
/// On success the job carries a terminal status and final counts; the
/// caller still owns the terminal persistence write.
async fn process_file(
    store: &dyn ImportStore,
    rules: &ColumnRuleSet,
    job: &mut ImportJob,
    bytes: &[u8],
    submitted_by: &str,
) -> Result<(), ImportFault> {
    let sheet = Sheet::from_bytes(bytes)?;
    let last_row = sheet.last_row();
    job.total_rows = last_row.saturating_sub(sheet::HEADER_ROW);

    let last_column = rules.last_column();
    let mut errors: Vec<FieldError> = Vec::new();
    let mut candidates: Vec<NewCountry> = Vec::new();

    for row in sheet::FIRST_DATA_ROW..=last_row {
        let cells: Vec<String> = (1..=last_column)
            .map(|column| sheet.cell_string(row, column))
            .collect();

        match validate_row(rules, &cells, row) {
            RowOutcome::Valid(values) => {
                let parsed = CountryRow::from_cells(&values).ok_or(ImportFault::Shape)?;
                candidates.push(NewCountry {
                    code: parsed.code.to_string(),
                    name: parsed.name,
                    is_active: parsed.is_active,
                    start_date: parsed.start_date,
                    created_by: submitted_by.to_string(),
                });
            }
            RowOutcome::Invalid(row_errors) => errors.extend(row_errors),
        }
    }

    if errors.is_empty() {
        if !candidates.is_empty() {
            store.insert_countries(&candidates).await?;
        }
        job.status = ImportStatus::Completed;
        job.success_count = candidates.len() as u32;
        job.failure_count = 0;
    } else {
        // No candidate is persisted once any row failed; the counts are
        // still reported for visibility.
        let failed_rows: HashSet<u32> = errors.iter().map(|e| e.row).collect();
        job.status = ImportStatus::Failed;
        job.success_count = candidates.len() as u32;
        job.failure_count = failed_rows.len() as u32;
        job.errors = errors;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use rust_xlsxwriter::Workbook;

    use super::*;
    use crate::country::country_rules;
    use crate::types::DbId;

    /// In-memory store recording every job write in order.
    #[derive(Default)]
    struct MemStore {
        writes: Mutex<Vec<ImportJob>>,
        countries: Mutex<Vec<NewCountry>>,
        fail_country_insert: bool,
    }

    #[async_trait]
    impl ImportStore for MemStore {
        async fn insert_job(&self, job: &ImportJob) -> Result<DbId, StoreError> {
            let mut writes = self.writes.lock().unwrap();
            let id = writes.len() as DbId + 1;
            let mut stored = job.clone();
            stored.id = id;
            writes.push(stored);
            Ok(id)
        }

        async fn replace_job(&self, _id: DbId, job: &ImportJob) -> Result<(), StoreError> {
            self.writes.lock().unwrap().push(job.clone());
            Ok(())
        }

        async fn find_job(&self, id: DbId) -> Result<Option<ImportJob>, StoreError> {
            Ok(self
                .writes
                .lock()
                .unwrap()
                .iter()
                .rev()
                .find(|j| j.id == id)
                .cloned())
        }

        async fn list_recent_jobs(&self, _limit: i64) -> Result<Vec<ImportJob>, StoreError> {
            Ok(Vec::new())
        }

        async fn insert_countries(&self, batch: &[NewCountry]) -> Result<(), StoreError> {
            if self.fail_country_insert {
                return Err(StoreError::Backend("countries insert refused".to_string()));
            }
            self.countries.lock().unwrap().extend_from_slice(batch);
            Ok(())
        }
    }

    fn workbook_bytes(rows: &[&[&str]]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                sheet.write_string(r as u32, c as u16, *cell).unwrap();
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    const HEADER: &[&str] = &["Code", "Name", "IsActive", "StartDate"];

    #[tokio::test]
    async fn clean_file_completes_and_persists_all_rows() {
        let store = MemStore::default();
        let bytes = workbook_bytes(&[
            HEADER,
            &["1001", "Singapore", "TRUE", "01012025"],
            &["1002", "Malaysia", "no", "15062024"],
        ]);

        let job = run_import(&store, &country_rules(), "countries.xlsx", bytes, "tester")
            .await
            .unwrap();

        assert_eq!(job.status, ImportStatus::Completed);
        assert_eq!(job.total_rows, 2);
        assert_eq!(job.success_count, 2);
        assert_eq!(job.failure_count, 0);
        assert!(job.errors.is_empty());
        assert!(job.completed_at.is_some());

        let countries = store.countries.lock().unwrap();
        assert_eq!(countries.len(), 2);
        assert_eq!(countries[0].code, "1001");
        assert_eq!(countries[0].name, "Singapore");
        assert!(countries[0].is_active);
        assert!(!countries[1].is_active);
        assert_eq!(countries[1].created_by, "tester");
    }

    #[tokio::test]
    async fn one_bad_row_fails_the_job_and_persists_nothing() {
        let store = MemStore::default();
        let bytes = workbook_bytes(&[
            HEADER,
            &["1001", "Singapore", "TRUE", "01012025"],
            &["1002", "Malaysia", "TRUE", "01012025"],
            &["abc", "Vietnam", "TRUE", "01012025"],
            &["1004", "Thailand", "TRUE", "01012025"],
            &["1005", "Laos", "TRUE", "01012025"],
        ]);

        let job = run_import(&store, &country_rules(), "countries.xlsx", bytes, "tester")
            .await
            .unwrap();

        assert_eq!(job.status, ImportStatus::Failed);
        assert_eq!(job.total_rows, 5);
        assert_eq!(job.success_count, 4);
        assert_eq!(job.failure_count, 1);
        assert_eq!(job.errors.len(), 1);
        assert_eq!(job.errors[0].row, 4);
        assert_eq!(job.errors[0].column, "Code");
        assert!(store.countries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn multiple_errors_in_one_row_count_it_once() {
        let store = MemStore::default();
        let bytes = workbook_bytes(&[
            HEADER,
            &["abc", "Singapore", "maybe", "01012025"],
        ]);

        let job = run_import(&store, &country_rules(), "countries.xlsx", bytes, "tester")
            .await
            .unwrap();

        assert_eq!(job.status, ImportStatus::Failed);
        assert_eq!(job.failure_count, 1);
        assert_eq!(job.errors.len(), 2);
    }

    #[tokio::test]
    async fn job_is_persisted_running_before_any_processing() {
        let store = MemStore::default();
        let bytes = workbook_bytes(&[HEADER, &["1001", "Singapore", "TRUE", "01012025"]]);

        run_import(&store, &country_rules(), "countries.xlsx", bytes.clone(), "tester")
            .await
            .unwrap();

        let writes = store.writes.lock().unwrap();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0].status, ImportStatus::Running);
        assert!(writes[0].completed_at.is_none());
        assert_eq!(writes[0].original_file.as_deref(), Some(bytes.as_slice()));
        assert_eq!(writes[1].status, ImportStatus::Completed);
        assert!(writes[1].completed_at.is_some());
    }

    #[tokio::test]
    async fn header_only_file_completes_with_zero_rows() {
        let store = MemStore::default();
        let bytes = workbook_bytes(&[HEADER]);

        let job = run_import(&store, &country_rules(), "countries.xlsx", bytes, "tester")
            .await
            .unwrap();

        assert_eq!(job.status, ImportStatus::Completed);
        assert_eq!(job.total_rows, 0);
        assert_eq!(job.success_count, 0);
        assert!(store.countries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_workbook_becomes_job_level_error() {
        let store = MemStore::default();

        let job = run_import(
            &store,
            &country_rules(),
            "broken.xlsx",
            b"not a workbook".to_vec(),
            "tester",
        )
        .await
        .unwrap();

        assert_eq!(job.status, ImportStatus::Failed);
        assert_eq!(job.errors.len(), 1);
        assert_eq!(job.errors[0].row, 0);
        assert_eq!(job.errors[0].column, "");
        assert!(job.errors[0].message.starts_with("Unexpected error:"));
        assert!(job.completed_at.is_some());

        // The failed job still reached storage with a terminal status.
        let writes = store.writes.lock().unwrap();
        assert_eq!(writes.last().unwrap().status, ImportStatus::Failed);
    }

    #[tokio::test]
    async fn storage_fault_during_batch_insert_fails_the_job() {
        let store = MemStore { fail_country_insert: true, ..MemStore::default() };
        let bytes = workbook_bytes(&[HEADER, &["1001", "Singapore", "TRUE", "01012025"]]);

        let job = run_import(&store, &country_rules(), "countries.xlsx", bytes, "tester")
            .await
            .unwrap();

        assert_eq!(job.status, ImportStatus::Failed);
        assert_eq!(job.errors.len(), 1);
        assert_eq!(job.errors[0].row, 0);
        assert!(job.errors[0].message.contains("countries insert refused"));
        assert!(store.countries.lock().unwrap().is_empty());
    }
}
