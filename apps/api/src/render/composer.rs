//! Document Composer — pairs the rendered résumé with an optional cover-letter view.
//!
//! The cover view is derived on first request only; most previews never look at it.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::models::resume::ResumeRecord;
use crate::render::export::DocumentKind;
use crate::render::template::{render_template, TemplateId};

pub const COVER_LETTER_FALLBACK: &str = "No cover letter provided";

const COVER_STYLE: &str = "white-space: pre-wrap; font-family: Arial, sans-serif;";

/// Which of the two views is currently shown (and would be exported).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveView {
    #[default]
    Resume,
    CoverLetter,
}

impl ActiveView {
    pub fn document_kind(self) -> DocumentKind {
        match self {
            ActiveView::Resume => DocumentKind::Resume,
            ActiveView::CoverLetter => DocumentKind::CoverLetter,
        }
    }
}

#[derive(Debug)]
struct LazyCover {
    source: String,
    view: OnceLock<String>,
}

/// Output of `compose`. Owns copies of what it needs; the record is not retained.
#[derive(Debug)]
pub struct ComposedDocument {
    template: TemplateId,
    main_view: String,
    cover: Option<LazyCover>,
    active: ActiveView,
}

/// Composes the preview for `record`. `cover_view` is only ever present when
/// `include_cover_letter` is set.
pub fn compose(
    record: &ResumeRecord,
    template: TemplateId,
    include_cover_letter: bool,
) -> ComposedDocument {
    ComposedDocument {
        template,
        main_view: render_template(record, template),
        cover: include_cover_letter.then(|| LazyCover {
            source: record.cover_letter.clone(),
            view: OnceLock::new(),
        }),
        active: ActiveView::Resume,
    }
}

impl ComposedDocument {
    pub fn template(&self) -> TemplateId {
        self.template
    }

    pub fn main_view(&self) -> &str {
        &self.main_view
    }

    /// The cover-letter view, derived on first call.
    pub fn cover_view(&self) -> Option<&str> {
        self.cover
            .as_ref()
            .map(|c| c.view.get_or_init(|| render_cover_letter(&c.source)).as_str())
    }

    /// True once the cover view has been derived.
    #[cfg(test)]
    pub fn cover_derived(&self) -> bool {
        self.cover.as_ref().is_some_and(|c| c.view.get().is_some())
    }

    pub fn active_view(&self) -> ActiveView {
        self.active
    }

    pub fn select(&mut self, view: ActiveView) {
        self.active = view;
    }

    /// The markup of the active view, or `None` when the cover letter is active
    /// but was not included.
    pub fn active_markup(&self) -> Option<&str> {
        match self.active {
            ActiveView::Resume => Some(self.main_view()),
            ActiveView::CoverLetter => self.cover_view(),
        }
    }
}

/// Fixed, non-templated presentation of the raw cover-letter text.
pub fn render_cover_letter(text: &str) -> String {
    let body = if text.trim().is_empty() {
        COVER_LETTER_FALLBACK.to_string()
    } else {
        html_escape::encode_text(text).into_owned()
    };
    format!(r#"<div><pre style="{COVER_STYLE}">{body}</pre></div>"#)
}
