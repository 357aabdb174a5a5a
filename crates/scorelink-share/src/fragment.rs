//! Fragment port and session state container.
//!
//! The address bar is ambient global state in a browser; here it is an
//! explicit port so the dispatcher can be driven with synthetic fragments
//! in tests and headless embeddings. An embedder wires its real
//! fragment-change notifications to [`SharedSession::sync_from`].

use std::cell::RefCell;

use scorelink_core::model::{default_exam, Question, StudentInput};

use crate::dispatch::{decode_fragment, encode_fragment};
use crate::error::ShareError;

/// Access to the current page-location fragment.
pub trait FragmentPort {
    /// The current fragment, `#` included when non-empty.
    fn current_fragment(&self) -> String;

    /// Replace the current fragment.
    fn set_fragment(&self, fragment: &str);
}

/// An in-memory fragment for tests and non-browser embeddings.
#[derive(Debug, Default)]
pub struct InMemoryFragment {
    fragment: RefCell<String>,
}

impl InMemoryFragment {
    pub fn new(fragment: &str) -> InMemoryFragment {
        InMemoryFragment {
            fragment: RefCell::new(fragment.to_string()),
        }
    }
}

impl FragmentPort for InMemoryFragment {
    fn current_fragment(&self) -> String {
        self.fragment.borrow().clone()
    }

    fn set_fragment(&self, fragment: &str) {
        *self.fragment.borrow_mut() = fragment.to_string();
    }
}

/// The single application state container the dispatcher feeds.
///
/// State is replaced atomically on a successful decode and left untouched
/// otherwise; a session entered through a shared link is flagged as
/// shared-origin, which gates the "return to setup" affordance.
#[derive(Debug, Clone)]
pub struct SharedSession {
    questions: Vec<Question>,
    student: StudentInput,
    shared_origin: bool,
}

impl Default for SharedSession {
    fn default() -> SharedSession {
        SharedSession::new()
    }
}

impl SharedSession {
    /// A fresh-entry session: the default exam, an empty submission.
    pub fn new() -> SharedSession {
        SharedSession {
            questions: default_exam(),
            student: StudentInput::empty(),
            shared_origin: false,
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn student(&self) -> &StudentInput {
        &self.student
    }

    /// Whether this session was entered through a shared link.
    pub fn is_shared_origin(&self) -> bool {
        self.shared_origin
    }

    /// Replace the configured questions (evaluator edits).
    pub fn set_questions(&mut self, questions: Vec<Question>) {
        self.questions = questions;
    }

    /// Replace the student submission (entry edits).
    pub fn set_student(&mut self, student: StudentInput) {
        self.student = student;
    }

    /// Feed a fragment through the dispatcher. On success the whole state
    /// is swapped in one step and the session becomes shared-origin; on
    /// failure nothing changes. Returns whether shared state was applied.
    pub fn apply_fragment(&mut self, fragment: &str) -> bool {
        match decode_fragment(fragment) {
            Some(state) => {
                self.questions = state.questions;
                self.student = state.student;
                self.shared_origin = true;
                true
            }
            None => false,
        }
    }

    /// Re-read the port's current fragment; the embedder calls this on
    /// every fragment-change notification and on initial load.
    pub fn sync_from(&mut self, port: &dyn FragmentPort) -> bool {
        self.apply_fragment(&port.current_fragment())
    }

    /// Encode the current session and publish it through the port.
    pub fn publish(&self, port: &dyn FragmentPort) -> Result<String, ShareError> {
        let fragment = encode_fragment(&self.questions, &self.student)?;
        port.set_fragment(&fragment);
        Ok(fragment)
    }

    /// Leave report view. A shared-origin session clears the fragment and
    /// starts over from a fresh entry; a local session only clears the
    /// submission, keeping the configured questions.
    pub fn reset(&mut self, port: &dyn FragmentPort) {
        if self.shared_origin {
            port.set_fragment("");
            *self = SharedSession::new();
        } else {
            self.student = StudentInput::empty();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scorelink_core::model::Section;

    fn shared_fragment() -> String {
        let questions = vec![Question {
            correct_answer: Some("C".into()),
            ..Question::mcq(Section::Reading, 1)
        }];
        let mut student = StudentInput {
            name: "Park".into(),
            ..StudentInput::empty()
        };
        student.answers.insert("R-1".into(), "c".into());
        encode_fragment(&questions, &student).unwrap()
    }

    #[test]
    fn fresh_session_is_not_shared_origin() {
        let session = SharedSession::new();
        assert!(!session.is_shared_origin());
        assert_eq!(session.questions().len(), 60);
        assert!(session.student().name.is_empty());
    }

    #[test]
    fn sync_applies_shared_state_atomically() {
        let port = InMemoryFragment::new(&shared_fragment());
        let mut session = SharedSession::new();

        assert!(session.sync_from(&port));
        assert!(session.is_shared_origin());
        assert_eq!(session.questions().len(), 1);
        assert_eq!(session.student().name, "Park");
    }

    #[test]
    fn corrupt_fragment_leaves_state_untouched() {
        let port = InMemoryFragment::new(&shared_fragment());
        let mut session = SharedSession::new();
        session.sync_from(&port);

        // A later fragment change to a corrupted token is a no-op.
        port.set_fragment("#s=corrupted-beyond-repair");
        assert!(!session.sync_from(&port));
        assert!(session.is_shared_origin());
        assert_eq!(session.student().name, "Park");
    }

    #[test]
    fn unrecognized_fragment_is_a_quiet_no_op() {
        let port = InMemoryFragment::new("#about");
        let mut session = SharedSession::new();
        assert!(!session.sync_from(&port));
        assert!(!session.is_shared_origin());
    }

    #[test]
    fn publish_then_sync_round_trips() {
        let port = InMemoryFragment::default();
        let mut original = SharedSession::new();
        let mut student = StudentInput {
            name: "Kim".into(),
            ..StudentInput::empty()
        };
        student.answers.insert("R-1".into(), "A".into());
        original.set_student(student);

        original.publish(&port).unwrap();
        assert!(port.current_fragment().starts_with("#s="));

        let mut restored = SharedSession::new();
        assert!(restored.sync_from(&port));
        assert_eq!(restored.student().name, "Kim");
        assert_eq!(restored.student().answer("R-1"), Some("A"));
    }

    #[test]
    fn reset_from_shared_origin_clears_everything() {
        let port = InMemoryFragment::new(&shared_fragment());
        let mut session = SharedSession::new();
        session.sync_from(&port);

        session.reset(&port);
        assert!(port.current_fragment().is_empty());
        assert!(!session.is_shared_origin());
        assert_eq!(session.questions().len(), 60);
        assert!(session.student().name.is_empty());
    }

    #[test]
    fn reset_from_local_entry_keeps_questions() {
        let port = InMemoryFragment::default();
        let mut session = SharedSession::new();
        session.set_student(StudentInput {
            name: "Kim".into(),
            ..StudentInput::empty()
        });

        session.reset(&port);
        assert_eq!(session.questions().len(), 60);
        assert!(session.student().name.is_empty());
    }
}
