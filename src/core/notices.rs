use crate::domain::model::Notice;
use std::sync::{Mutex, PoisonError};

/// Pending user-visible notices, drained by whatever front end is attached.
#[derive(Debug, Default)]
pub struct Notices {
    pending: Mutex<Vec<Notice>>,
}

impl Notices {
    pub fn raise(&self, notice: Notice) {
        tracing::info!("📢 {}", notice.message);
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }

    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn is_empty(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::NoticeKind;

    #[test]
    fn test_drain_hands_out_each_notice_once() {
        let notices = Notices::default();
        notices.raise(Notice::narration_unavailable());
        notices.raise(Notice::transaction_failed());

        let drained = notices.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].kind, NoticeKind::NarrationUnavailable);
        assert!(notices.is_empty());
        assert!(notices.drain().is_empty());
    }
}
