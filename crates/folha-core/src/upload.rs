//! Upload collection: keeps PDF files and tracks the user's selection list.

use tracing::debug;

use crate::models::document::Document;

/// Gathers candidate files and keeps only PDFs.
///
/// Accepted files are appended to a selection list shown to the user. While
/// locked (a batch is processing) new candidates and removals are ignored.
#[derive(Debug, Default)]
pub struct UploadCollector {
    selected: Vec<Document>,
    locked: bool,
}

impl UploadCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter candidates down to PDFs and append them to the selection list.
    ///
    /// Returns only the newly accepted files, which is the batch to process.
    /// Non-PDF candidates are dropped without error.
    pub fn accept(&mut self, candidates: Vec<Document>) -> Vec<Document> {
        if self.locked {
            debug!(
                "Ignoring {} candidate files while a batch is processing",
                candidates.len()
            );
            return Vec::new();
        }

        let accepted: Vec<Document> = candidates
            .into_iter()
            .filter(|doc| {
                let keep = doc.is_pdf();
                if !keep {
                    debug!("Dropping {} ({})", doc.name, doc.media_type);
                }
                keep
            })
            .collect();

        self.selected.extend(accepted.iter().cloned());
        accepted
    }

    /// Remove an entry from the selection list.
    ///
    /// Only the list changes; work already submitted is not affected.
    pub fn remove(&mut self, index: usize) -> Option<Document> {
        if self.locked || index >= self.selected.len() {
            return None;
        }
        Some(self.selected.remove(index))
    }

    /// Files currently in the selection list.
    pub fn selected(&self) -> &[Document] {
        &self.selected
    }

    /// Suppress uploads and removals.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// Allow uploads and removals again.
    pub fn unlock(&mut self) {
        self.locked = false;
    }

    /// Whether uploads are currently suppressed.
    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::PDF_MEDIA_TYPE;
    use pretty_assertions::assert_eq;

    fn pdf(name: &str) -> Document {
        Document::new(name, PDF_MEDIA_TYPE, b"%PDF".to_vec())
    }

    fn other(name: &str, media_type: &str) -> Document {
        Document::new(name, media_type, b"data".to_vec())
    }

    fn names(docs: &[Document]) -> Vec<&str> {
        docs.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn test_only_pdfs_are_accepted() {
        let mut collector = UploadCollector::new();
        let accepted = collector.accept(vec![
            pdf("a.pdf"),
            other("b.png", "image/png"),
            other("c.txt", "text/plain"),
            pdf("d.pdf"),
        ]);

        assert_eq!(names(&accepted), vec!["a.pdf", "d.pdf"]);
        assert_eq!(names(collector.selected()), vec!["a.pdf", "d.pdf"]);
    }

    #[test]
    fn test_accept_returns_only_new_batch() {
        let mut collector = UploadCollector::new();
        collector.accept(vec![pdf("jan.pdf")]);
        let second = collector.accept(vec![pdf("fev.pdf")]);

        assert_eq!(names(&second), vec!["fev.pdf"]);
        assert_eq!(names(collector.selected()), vec!["jan.pdf", "fev.pdf"]);
    }

    #[test]
    fn test_remove_only_touches_list() {
        let mut collector = UploadCollector::new();
        let batch = collector.accept(vec![pdf("a.pdf"), pdf("b.pdf")]);

        let removed = collector.remove(0).unwrap();
        assert_eq!(removed.name, "a.pdf");
        assert_eq!(names(collector.selected()), vec!["b.pdf"]);
        assert_eq!(batch.len(), 2);

        assert!(collector.remove(5).is_none());
    }

    #[test]
    fn test_locked_collector_ignores_input() {
        let mut collector = UploadCollector::new();
        collector.accept(vec![pdf("a.pdf")]);
        collector.lock();

        assert!(collector.accept(vec![pdf("b.pdf")]).is_empty());
        assert!(collector.remove(0).is_none());
        assert_eq!(names(collector.selected()), vec!["a.pdf"]);

        collector.unlock();
        assert_eq!(collector.accept(vec![pdf("b.pdf")]).len(), 1);
    }
}
