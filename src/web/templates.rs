//! Compiled slide and index templates.

use super::context::SlideContext;
use crate::error::Result;
use crate::spec::SlideKind;
use crate::theme::ThemeTokens;
use askama::Template;

#[derive(Template)]
#[template(path = "cover.html")]
struct CoverSlide<'a> {
    ctx: &'a SlideContext,
}

#[derive(Template)]
#[template(path = "agenda.html")]
struct AgendaSlide<'a> {
    ctx: &'a SlideContext,
}

#[derive(Template)]
#[template(path = "section.html")]
struct SectionSlide<'a> {
    ctx: &'a SlideContext,
}

#[derive(Template)]
#[template(path = "two-column.html")]
struct TwoColumnSlide<'a> {
    ctx: &'a SlideContext,
}

#[derive(Template)]
#[template(path = "checklist.html")]
struct ChecklistSlide<'a> {
    ctx: &'a SlideContext,
}

#[derive(Template)]
#[template(path = "qna.html")]
struct QnaSlide<'a> {
    ctx: &'a SlideContext,
}

#[derive(Template)]
#[template(path = "example.html")]
struct ExampleSlide<'a> {
    ctx: &'a SlideContext,
}

#[derive(Template)]
#[template(path = "interpret.html")]
struct InterpretSlide<'a> {
    ctx: &'a SlideContext,
}

/// Render one slide page with the template for `kind`.
pub fn render_slide(kind: SlideKind, ctx: &SlideContext) -> Result<String> {
    let html = match kind {
        SlideKind::Cover => CoverSlide { ctx }.render()?,
        SlideKind::Agenda => AgendaSlide { ctx }.render()?,
        SlideKind::Section => SectionSlide { ctx }.render()?,
        SlideKind::TwoColumn => TwoColumnSlide { ctx }.render()?,
        SlideKind::Checklist => ChecklistSlide { ctx }.render()?,
        SlideKind::Qna => QnaSlide { ctx }.render()?,
        SlideKind::Example => ExampleSlide { ctx }.render()?,
        SlideKind::Interpret => InterpretSlide { ctx }.render()?,
    };
    Ok(html)
}

/// A slide page written to the deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSlide {
    /// File name inside `slides/`
    pub file: String,
    /// Title for the viewer window
    pub title: String,
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexPage<'a> {
    title: &'a str,
    background: &'a str,
    text: &'a str,
    primary: &'a str,
    accent: &'a str,
    first_slide: &'a str,
    slides_json: String,
}

/// Render the deck viewer.
pub fn render_index(slides: &[RenderedSlide], theme: &ThemeTokens) -> Result<String> {
    let fallback_title = format!("{} Deck", theme.name);
    let files: Vec<&str> = slides.iter().map(|s| s.file.as_str()).collect();
    // File names are generated, so a JSON array is safe inside <script>
    let slides_json = serde_json::to_string(&files)
        .map_err(|e| crate::error::Error::Template(e.to_string()))?;

    let page = IndexPage {
        title: slides.first().map_or(fallback_title.as_str(), |s| s.title.as_str()),
        background: &theme.colors.light_gray,
        text: &theme.colors.charcoal,
        primary: &theme.colors.primary,
        accent: &theme.colors.accent_blue,
        first_slide: slides.first().map_or("", |s| s.file.as_str()),
        slides_json,
    };
    Ok(page.render()?)
}
