// src/session.rs

use crate::models::{Product, ProductDraft};
use crate::staging::StagedImages;

/// Which submit path an open session drives: `Creating` appends with a fresh
/// id, `Editing` replaces the referenced product in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Creating,
    Editing(i64),
}

/// Everything an open modal owns: the mode, the draft record, and the staged
/// attachments. Built fresh on entering `Creating`/`Editing`, dropped as a
/// whole on close, which is also what releases every staged preview handle.
#[derive(Debug)]
pub struct OpenSession {
    pub mode: EditorMode,
    pub draft: ProductDraft,
    pub staging: StagedImages,
}

impl OpenSession {
    pub fn is_editing(&self) -> bool {
        matches!(self.mode, EditorMode::Editing(_))
    }
}

/// The editor session finite state: `Closed`, or open in one of the two
/// modes. The modal is open iff an add or edit action has been initiated and
/// no submit or cancel has yet completed.
#[derive(Debug, Default)]
pub enum EditorSession {
    #[default]
    Closed,
    Open(OpenSession),
}

impl EditorSession {
    /// `-> Creating`: empty draft, empty staging. Replaces whatever session
    /// was open before; its staging is dropped with it.
    pub fn open_create(&mut self) -> &OpenSession {
        *self = EditorSession::Open(OpenSession {
            mode: EditorMode::Creating,
            draft: ProductDraft::default(),
            staging: StagedImages::default(),
        });
        self.as_open().expect("session was just opened")
    }

    /// `-> Editing(product.id)`: draft populated from the product's current
    /// fields, empty staging.
    pub fn open_edit(&mut self, product: &Product) -> &OpenSession {
        *self = EditorSession::Open(OpenSession {
            mode: EditorMode::Editing(product.id),
            draft: ProductDraft::from_product(product),
            staging: StagedImages::default(),
        });
        self.as_open().expect("session was just opened")
    }

    /// `-> Closed`, dropping draft and staging. Used by both cancel and
    /// successful submit.
    pub fn close(&mut self) {
        *self = EditorSession::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(self, EditorSession::Open(_))
    }

    pub fn as_open(&self) -> Option<&OpenSession> {
        match self {
            EditorSession::Open(open) => Some(open),
            EditorSession::Closed => None,
        }
    }

    pub fn as_open_mut(&mut self) -> Option<&mut OpenSession> {
        match self {
            EditorSession::Open(open) => Some(open),
            EditorSession::Closed => None,
        }
    }
}
