//! Per-slide rendering context.

use crate::spec::{format_data_pair, Slide, SlideKind};
use crate::theme::ThemeTokens;
use serde::Serialize;

/// Everything a slide template can reference.
///
/// List fields are always present (possibly empty) so templates never have
/// to deal with missing values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SlideContext {
    pub background_color: String,
    pub text_color: String,
    pub primary_color: String,
    pub accent_color: String,
    pub font: String,

    pub title: String,
    pub subtitle: String,
    pub tagline: String,
    pub highlight: String,
    pub items: Vec<String>,
    pub bullets: Vec<String>,
    pub left: Vec<String>,
    pub right: Vec<String>,

    /// Data pairs formatted as `key → value`
    pub data_pairs: Vec<String>,

    /// Relative path of the copied chart image, or empty
    pub chart_image: String,
}

impl SlideContext {
    /// Theme colors only.
    pub fn base(theme: &ThemeTokens) -> Self {
        Self {
            background_color: theme.colors.light_gray.clone(),
            text_color: theme.colors.charcoal.clone(),
            primary_color: theme.colors.primary.clone(),
            accent_color: theme.colors.accent_blue.clone(),
            font: theme.font.clone(),
            ..Default::default()
        }
    }

    /// Build the context for one slide.
    ///
    /// `chart_image` is the asset path the chart was copied to, if any.
    pub fn for_slide(slide: &Slide, theme: &ThemeTokens, chart_image: Option<&str>) -> Self {
        let mut ctx = Self::base(theme);

        ctx.title = slide.title.clone().unwrap_or_default();
        ctx.subtitle = slide.subtitle.clone().unwrap_or_default();
        ctx.tagline = slide.tagline_text().unwrap_or_default().to_string();
        ctx.highlight = slide.highlight.clone().unwrap_or_default();
        ctx.items = slide.items.clone();
        ctx.bullets = slide.bullets.clone();
        ctx.left = slide.left.clone();
        ctx.right = slide.right.clone();

        let overrides = [
            (&mut ctx.background_color, &slide.background_color),
            (&mut ctx.text_color, &slide.text_color),
            (&mut ctx.primary_color, &slide.primary_color),
            (&mut ctx.accent_color, &slide.accent_color),
        ];
        for (field, value) in overrides {
            if let Some(value) = value.as_ref().filter(|v| !v.is_empty()) {
                *field = value.clone();
            }
        }

        match slide.kind {
            SlideKind::Section => {
                ctx.background_color = theme.colors.primary.clone();
                ctx.text_color = theme.colors.white.clone();
            }
            SlideKind::Example => {
                ctx.chart_image = chart_image.unwrap_or_default().to_string();
                ctx.data_pairs = slide
                    .data_pairs
                    .iter()
                    .flatten()
                    .map(format_data_pair)
                    .collect();
            }
            _ => {}
        }

        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn slide(value: serde_json::Value) -> Slide {
        Slide::from_value(1, &value).unwrap()
    }

    #[test]
    fn test_base_colors() {
        let theme = ThemeTokens::default();
        let ctx = SlideContext::for_slide(&slide(json!({"type": "cover"})), &theme, None);
        assert_eq!(ctx.background_color, theme.colors.light_gray);
        assert_eq!(ctx.text_color, theme.colors.charcoal);
        assert_eq!(ctx.primary_color, theme.colors.primary);
        assert_eq!(ctx.accent_color, theme.colors.accent_blue);
    }

    #[test]
    fn test_section_inverts_colors() {
        let theme = ThemeTokens::default();
        let section = slide(json!({
            "type": "section",
            "title": "Part two",
            "background_color": "#000000",
            "text_color": "#123456"
        }));
        let ctx = SlideContext::for_slide(&section, &theme, None);
        assert_eq!(ctx.background_color, theme.colors.primary);
        assert_eq!(ctx.text_color, theme.colors.white);
        assert_eq!(ctx.title, "Part two");
    }

    #[test]
    fn test_slide_color_overrides() {
        let theme = ThemeTokens::default();
        let agenda = slide(json!({
            "type": "agenda",
            "background_color": "#101010",
            "text_color": "#FAFAFA",
            "accent_color": ""
        }));
        let ctx = SlideContext::for_slide(&agenda, &theme, None);
        assert_eq!(ctx.background_color, "#101010");
        assert_eq!(ctx.text_color, "#FAFAFA");
        assert_eq!(ctx.primary_color, theme.colors.primary);
        assert_eq!(ctx.accent_color, theme.colors.accent_blue);
    }

    #[test]
    fn test_tagline_falls_back_to_tag() {
        let theme = ThemeTokens::default();
        let cover = slide(json!({"type": "cover", "tagline": "", "tag": "Q3 2024"}));
        let ctx = SlideContext::for_slide(&cover, &theme, None);
        assert_eq!(ctx.tagline, "Q3 2024");

        let cover = slide(json!({"type": "cover", "tagline": 2024, "tag": "unused"}));
        let ctx = SlideContext::for_slide(&cover, &theme, None);
        assert_eq!(ctx.tagline, "2024");
    }

    #[test]
    fn test_example_fields() {
        let theme = ThemeTokens::default();
        let example = slide(json!({
            "type": "example",
            "title": "Throughput",
            "data_pairs": [["Line A", "98%"], "Line B idle"]
        }));
        let ctx = SlideContext::for_slide(&example, &theme, Some("../assets/chart.png"));
        assert_eq!(ctx.chart_image, "../assets/chart.png");
        assert_eq!(ctx.data_pairs, vec!["Line A → 98%", "Line B idle"]);
        assert!(ctx.bullets.is_empty());
    }

    #[test]
    fn test_lists_default_to_empty() {
        let theme = ThemeTokens::default();
        let ctx = SlideContext::for_slide(&slide(json!({"type": "two-column"})), &theme, None);
        assert!(ctx.left.is_empty());
        assert!(ctx.right.is_empty());
        assert_eq!(ctx.tagline, "");
    }

    #[test]
    fn test_chart_only_on_example() {
        let theme = ThemeTokens::default();
        let ctx = SlideContext::for_slide(
            &slide(json!({"type": "agenda", "items": ["One"]})),
            &theme,
            Some("../assets/x.png"),
        );
        assert_eq!(ctx.chart_image, "");
        assert_eq!(ctx.items, vec!["One"]);
    }
}
