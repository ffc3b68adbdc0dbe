//! Batch orchestration: one extraction call per document, strictly in order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use crate::error::Result;
use crate::extraction::PayrollExtractor;
use crate::models::document::Document;
use crate::models::payroll::PayrollRecord;
use crate::upload::UploadCollector;

/// Summary of a finished batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    /// Number of documents processed.
    pub documents: usize,
    /// Number of records extracted across all documents.
    pub records: usize,
    /// Wall-clock time for the whole batch.
    pub elapsed: Duration,
}

/// Extract every document in order and concatenate the records.
///
/// Documents are processed one at a time; the next request starts only after
/// the previous one finished. The first failure aborts the batch and nothing
/// extracted so far is returned.
pub async fn extract_batch<E>(extractor: &E, documents: &[Document]) -> Result<Vec<PayrollRecord>>
where
    E: PayrollExtractor + ?Sized,
{
    let mut records = Vec::new();

    for (i, document) in documents.iter().enumerate() {
        debug!(
            "Extracting document {}/{}: {}",
            i + 1,
            documents.len(),
            document.name
        );
        let extracted = extractor.extract(document).await?;
        debug!("{} yielded {} records", document.name, extracted.len());
        records.extend(extracted);
    }

    Ok(records)
}

/// Shared view of whether a session has a batch in flight.
///
/// Clones observe the same session, so a progress display or another task
/// can poll it while [`ExtractionSession::submit`] is running.
#[derive(Debug, Clone, Default)]
pub struct ProcessingState(Arc<AtomicBool>);

impl ProcessingState {
    /// Whether a batch is currently being processed.
    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn set(&self, active: bool) {
        self.0.store(active, Ordering::Release);
    }
}

/// State of the extraction surface: selection list, current results and
/// the last error.
///
/// Each submitted batch replaces the previous results entirely.
pub struct ExtractionSession<E> {
    extractor: E,
    collector: UploadCollector,
    results: Vec<PayrollRecord>,
    last_error: Option<String>,
    processing: ProcessingState,
}

impl<E: PayrollExtractor> ExtractionSession<E> {
    /// Create a session around an extractor.
    pub fn new(extractor: E) -> Self {
        Self {
            extractor,
            collector: UploadCollector::new(),
            results: Vec::new(),
            last_error: None,
            processing: ProcessingState::default(),
        }
    }

    /// Accept candidate files and process the newly accepted PDFs as one batch.
    ///
    /// Returns `Ok(None)` when no candidate was accepted (nothing is run and
    /// the previous state is kept). On failure the results stay empty and the
    /// user-facing message is stored in [`last_error`](Self::last_error).
    pub async fn submit(&mut self, candidates: Vec<Document>) -> Result<Option<BatchReport>> {
        let batch = self.collector.accept(candidates);
        if batch.is_empty() {
            debug!("No PDF files accepted, nothing to process");
            return Ok(None);
        }

        let start = Instant::now();
        self.results.clear();
        self.last_error = None;
        self.processing.set(true);
        self.collector.lock();

        info!("Processing batch of {} documents", batch.len());
        let outcome = extract_batch(&self.extractor, &batch).await;

        self.collector.unlock();
        self.processing.set(false);

        match outcome {
            Ok(records) => {
                let report = BatchReport {
                    documents: batch.len(),
                    records: records.len(),
                    elapsed: start.elapsed(),
                };
                info!(
                    "Extracted {} records from {} documents in {:?}",
                    report.records, report.documents, report.elapsed
                );
                self.results = records;
                Ok(Some(report))
            }
            Err(e) => {
                error!("Batch failed: {}", e);
                self.last_error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Remove an entry from the selection list.
    pub fn remove_selected(&mut self, index: usize) -> Option<Document> {
        self.collector.remove(index)
    }

    /// Records of the last successful batch.
    pub fn results(&self) -> &[PayrollRecord] {
        &self.results
    }

    /// Message describing the last failure, if the last batch failed.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether a batch is in flight.
    pub fn is_processing(&self) -> bool {
        self.processing.is_active()
    }

    /// Handle for observing the processing state from outside the session.
    pub fn processing_state(&self) -> ProcessingState {
        self.processing.clone()
    }

    /// The upload collector with the selection list.
    pub fn collector(&self) -> &UploadCollector {
        &self.collector
    }

    /// The underlying extractor.
    pub fn extractor(&self) -> &E {
        &self.extractor
    }
}
