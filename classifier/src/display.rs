//! Display state and the surface it is presented on.
//!
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use common::display::{format_confidence, ContextId, DisplayState};

/// Where display changes are presented.
pub trait DisplaySurface: Send + Sync {
    /// Show the winning label and its confidence percentage for one context.
    fn show_label(&self, context: ContextId, label: &str, confidence: u8);

    /// Point the shared image slot to another asset.
    fn show_image(&self, asset: &str);
}

/// Surface that only writes log records.
#[derive(Debug, Default)]
pub struct LogSurface;

impl DisplaySurface for LogSurface {
    fn show_label(&self, context: ContextId, label: &str, confidence: u8) {
        log::info!("[{context}] {label} {}", format_confidence(confidence));
    }

    fn show_image(&self, asset: &str) {
        log::info!("Showing {asset}");
    }
}

/// Reservation for one inference result in one context.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Ticket {
    context: ContextId,
    seq: u64,
}

impl Ticket {
    pub fn context(&self) -> ContextId {
        self.context
    }
}

#[derive(Default)]
struct BoardState {
    display: DisplayState,
    issued: [u64; 2],
    committed: [u64; 2],
}

/// Current display state, shared by both contexts.
///
/// A context only ever shows its most recently started inference: results are
/// committed in ticket order and an older result arriving after a newer one is
/// dropped. The image slot is overwritten by whichever context commits last.
pub struct DisplayBoard {
    state: Mutex<BoardState>,
    surface: Arc<dyn DisplaySurface>,
}

impl DisplayBoard {
    pub fn new(surface: Arc<dyn DisplaySurface>) -> Self {
        Self {
            state: Mutex::new(BoardState::default()),
            surface,
        }
    }

    /// Reserve a slot for an inference that is about to start.
    pub fn begin(&self, context: ContextId) -> Ticket {
        let mut state = self.lock();
        let issued = &mut state.issued[context.index()];
        *issued += 1;

        Ticket {
            context,
            seq: *issued,
        }
    }

    /// Apply a finished inference. Returns `false` if a newer result for the same
    /// context was committed already, in which case nothing changes.
    pub fn commit(&self, ticket: Ticket, label: &str, confidence: u8, asset: &str) -> bool {
        let mut state = self.lock();
        let committed = &mut state.committed[ticket.context.index()];
        if ticket.seq <= *committed {
            return false;
        }
        *committed = ticket.seq;

        let context = state.display.context_mut(ticket.context);
        context.label = Some(label.to_owned());
        context.confidence = Some(confidence);
        state.display.image = Some(asset.to_owned());

        // Presented under the lock so the surface sees changes in commit order
        self.surface.show_label(ticket.context, label, confidence);
        self.surface.show_image(asset);
        log::debug!("[{}] {} {}% -> {}", ticket.context, label, confidence, asset);

        true
    }

    pub fn snapshot(&self) -> DisplayState {
        self.lock().display.clone()
    }

    fn lock(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl DisplaySurface for Recorder {
        fn show_label(&self, context: ContextId, label: &str, confidence: u8) {
            self.events
                .lock()
                .unwrap()
                .push(format!("{context}:{label}:{confidence}"));
        }

        fn show_image(&self, asset: &str) {
            self.events.lock().unwrap().push(format!("img:{asset}"));
        }
    }

    #[test]
    fn commit_updates_context_and_shared_image() {
        let recorder = Arc::new(Recorder::default());
        let board = DisplayBoard::new(recorder.clone());

        let ticket = board.begin(ContextId::Camera);
        assert!(board.commit(ticket, "Class 2", 80, "images/class0.png"));

        let state = board.snapshot();
        assert_eq!(state.camera.label.as_deref(), Some("Class 2"));
        assert_eq!(state.camera.confidence, Some(80));
        assert_eq!(state.file.label, None);
        assert_eq!(state.image.as_deref(), Some("images/class0.png"));

        assert_eq!(
            *recorder.events.lock().unwrap(),
            vec!["cam:Class 2:80", "img:images/class0.png"]
        );
    }

    #[test]
    fn stale_result_is_dropped() {
        let recorder = Arc::new(Recorder::default());
        let board = DisplayBoard::new(recorder.clone());

        let older = board.begin(ContextId::File);
        let newer = board.begin(ContextId::File);

        assert!(board.commit(newer, "Class 1", 90, "images/class1.png"));
        assert!(!board.commit(older, "Class 2", 60, "images/class0.png"));

        let state = board.snapshot();
        assert_eq!(state.file.label.as_deref(), Some("Class 1"));
        assert_eq!(state.image.as_deref(), Some("images/class1.png"));
        assert_eq!(recorder.events.lock().unwrap().len(), 2);
    }

    #[test]
    fn tickets_are_per_context() {
        let board = DisplayBoard::new(Arc::new(LogSurface));

        let file = board.begin(ContextId::File);
        let camera = board.begin(ContextId::Camera);
        assert_eq!(file.context(), ContextId::File);

        assert!(board.commit(camera, "Class 1", 70, "images/class1.png"));
        assert!(board.commit(file, "Class 2", 55, "images/class0.png"));

        // Last commit wins the shared image, labels stay separate
        let state = board.snapshot();
        assert_eq!(state.image.as_deref(), Some("images/class0.png"));
        assert_eq!(state.camera.label.as_deref(), Some("Class 1"));
        assert_eq!(state.file.label.as_deref(), Some("Class 2"));
    }
}
