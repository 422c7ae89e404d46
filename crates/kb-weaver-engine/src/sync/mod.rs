//! Feedback-loop-safe synchronization between an externally-owned markdown
//! value and a stateful editor surface.
//!
//! The owner of the document (form composition, ticket load, draft load)
//! pushes new values in through [`EditorSync::set_external`]; keystrokes made
//! directly in the surface come back out through [`EditorSync::local_edit`].
//! A single guard value, the last value the controller applied to or received
//! from the surface, keeps the two directions from fighting: without it every
//! keystroke would round-trip through the producer and be rewritten into the
//! editor, destroying cursor position and undo history.

use serde::{Deserialize, Serialize};

/// The stateful text editor the controller mediates. Implementations own
/// cursor state, undo history and rendering; the controller only ever reads
/// the full document or replaces it wholesale.
pub trait EditorSurface {
    /// Current full document text. Change events carry full text, not deltas.
    fn content(&self) -> String;

    /// Replace the entire document. No diffing: replacements only happen on
    /// genuine external changes, which are rare next to keystrokes.
    fn replace_all(&mut self, text: &str);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyntaxMode {
    #[default]
    Markdown,
}

/// Surface configuration, fixed at construction. Changing the theme means
/// tearing the surface down and building a fresh one ([`EditorSync::rebuild`]),
/// not restyling in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditorOptions {
    pub theme: Theme,
    pub syntax: SyntaxMode,
}

/// Mediates between the external markdown value and an editor surface.
///
/// The surface is exclusively owned here and must only be mutated through the
/// two defined triggers: an external value change, or a local edit reported
/// after typing into [`EditorSync::surface_mut`].
pub struct EditorSync<S: EditorSurface> {
    surface: S,
    options: EditorOptions,
    /// The most recent value this controller applied to, or received from,
    /// the surface. Distinguishes "external state changed" from "the editor
    /// itself produced this value a moment ago".
    last_external_value: String,
}

impl<S: EditorSurface> EditorSync<S> {
    /// Build a controller around a fresh surface, seeding it with the current
    /// external value.
    pub fn new(mut surface: S, options: EditorOptions, seed: &str) -> Self {
        surface.replace_all(seed);
        Self {
            surface,
            options,
            last_external_value: seed.to_string(),
        }
    }

    /// The producer supplied a new external value. Returns whether a replace
    /// was actually issued to the surface.
    ///
    /// A value equal to the live surface content is the producer echoing what
    /// the user just typed; replacing would clobber cursor and undo state, so
    /// it is a no-op.
    pub fn set_external(&mut self, value: &str) -> bool {
        if value == self.last_external_value {
            return false;
        }
        if value == self.surface.content() {
            return false;
        }
        self.surface.replace_all(value);
        self.last_external_value = value.to_string();
        true
    }

    /// The user edited the surface directly. Reads the new full content,
    /// records it as the last external value *before* returning, so the
    /// controller will not re-apply it when the producer echoes it back, and
    /// hands it to the owner to adopt as the authoritative document.
    pub fn local_edit(&mut self) -> String {
        let value = self.surface.content();
        self.last_external_value = value.clone();
        value
    }

    /// Tear down the surface and seed a freshly constructed one with the live
    /// document. This is the only way to change [`EditorOptions`].
    pub fn rebuild(&mut self, mut surface: S, options: EditorOptions) {
        let document = self.surface.content();
        surface.replace_all(&document);
        self.surface = surface;
        self.options = options;
        self.last_external_value = document;
    }

    pub fn options(&self) -> EditorOptions {
        self.options
    }

    pub fn content(&self) -> String {
        self.surface.content()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access for feeding keystrokes into the surface. Callers must
    /// follow up with [`EditorSync::local_edit`] once the edit settles.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
