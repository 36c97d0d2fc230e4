//! Fixed and generated package parts other than slides.

use super::media::ImageFormat;
use super::xml::{group_shape_header, XmlOut, NS_A, NS_P, NS_R};
use crate::error::Result;
use chrono::{DateTime, SecondsFormat, Utc};

pub const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
pub const REL_CORE_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
pub const REL_EXTENDED_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
pub const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
pub const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
pub const REL_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
pub const REL_THEME: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
pub const REL_PRES_PROPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/presProps";
pub const REL_VIEW_PROPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/viewProps";
pub const REL_TABLE_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/tableStyles";
pub const REL_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

const CT_PRESENTATION: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
const CT_SLIDE_MASTER: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
const CT_SLIDE_LAYOUT: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
const CT_THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
const CT_PRES_PROPS: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presProps+xml";
const CT_VIEW_PROPS: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.viewProps+xml";
const CT_TABLE_STYLES: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml";
const CT_CORE: &str = "application/vnd.openxmlformats-package.core-properties+xml";
const CT_APP: &str = "application/vnd.openxmlformats-officedocument.extended-properties+xml";

/// Relationship ids in `presentation.xml.rels` before the first slide.
pub const FIRST_SLIDE_REL: usize = 6;

/// `[Content_Types].xml` for a deck with `slide_count` slides and the
/// given media formats.
pub fn content_types_xml(slide_count: usize, media: &[ImageFormat]) -> Result<String> {
    let mut x = XmlOut::new()?;
    x.open(
        "Types",
        &[(
            "xmlns",
            "http://schemas.openxmlformats.org/package/2006/content-types",
        )],
    )?;
    x.empty(
        "Default",
        &[
            ("Extension", "rels"),
            ("ContentType", "application/vnd.openxmlformats-package.relationships+xml"),
        ],
    )?;
    x.empty(
        "Default",
        &[("Extension", "xml"), ("ContentType", "application/xml")],
    )?;

    let mut seen: Vec<ImageFormat> = Vec::new();
    for format in media {
        if seen.contains(format) {
            continue;
        }
        seen.push(*format);
        x.empty(
            "Default",
            &[
                ("Extension", format.extension()),
                ("ContentType", format.content_type()),
            ],
        )?;
    }

    let overrides = [
        ("/ppt/presentation.xml", CT_PRESENTATION),
        ("/ppt/slideMasters/slideMaster1.xml", CT_SLIDE_MASTER),
        ("/ppt/slideLayouts/slideLayout1.xml", CT_SLIDE_LAYOUT),
        ("/ppt/theme/theme1.xml", CT_THEME),
        ("/ppt/presProps.xml", CT_PRES_PROPS),
        ("/ppt/viewProps.xml", CT_VIEW_PROPS),
        ("/ppt/tableStyles.xml", CT_TABLE_STYLES),
        ("/docProps/core.xml", CT_CORE),
        ("/docProps/app.xml", CT_APP),
    ];
    for (part, content_type) in overrides {
        x.empty("Override", &[("PartName", part), ("ContentType", content_type)])?;
    }
    for n in 1..=slide_count {
        let part = format!("/ppt/slides/slide{}.xml", n);
        x.empty(
            "Override",
            &[("PartName", part.as_str()), ("ContentType", CT_SLIDE)],
        )?;
    }

    x.close("Types")?;
    x.finish()
}

/// Package-level `_rels/.rels`.
pub fn root_relationships() -> Vec<(String, &'static str, String)> {
    vec![
        ("rId1".into(), REL_OFFICE_DOCUMENT, "ppt/presentation.xml".into()),
        ("rId2".into(), REL_CORE_PROPERTIES, "docProps/core.xml".into()),
        ("rId3".into(), REL_EXTENDED_PROPERTIES, "docProps/app.xml".into()),
    ]
}

/// `ppt/_rels/presentation.xml.rels`; slides follow the fixed parts.
pub fn presentation_relationships(slide_count: usize) -> Vec<(String, &'static str, String)> {
    let mut rels: Vec<(String, &'static str, String)> = vec![
        ("rId1".into(), REL_SLIDE_MASTER, "slideMasters/slideMaster1.xml".into()),
        ("rId2".into(), REL_THEME, "theme/theme1.xml".into()),
        ("rId3".into(), REL_PRES_PROPS, "presProps.xml".into()),
        ("rId4".into(), REL_VIEW_PROPS, "viewProps.xml".into()),
        ("rId5".into(), REL_TABLE_STYLES, "tableStyles.xml".into()),
    ];
    for n in 1..=slide_count {
        rels.push((
            format!("rId{}", FIRST_SLIDE_REL + n - 1),
            REL_SLIDE,
            format!("slides/slide{}.xml", n),
        ));
    }
    rels
}

/// `ppt/presentation.xml`. `size_type` is omitted for custom sizes.
pub fn presentation_xml(
    slide_count: usize,
    width: i64,
    height: i64,
    size_type: Option<&str>,
) -> Result<String> {
    let mut x = XmlOut::new()?;
    x.open(
        "p:presentation",
        &[
            ("xmlns:a", NS_A),
            ("xmlns:r", NS_R),
            ("xmlns:p", NS_P),
            ("saveSubsetFonts", "1"),
        ],
    )?;

    x.open("p:sldMasterIdLst", &[])?;
    x.empty("p:sldMasterId", &[("id", "2147483648"), ("r:id", "rId1")])?;
    x.close("p:sldMasterIdLst")?;

    // An empty sldIdLst is invalid, so it is left out entirely
    if slide_count > 0 {
        x.open("p:sldIdLst", &[])?;
        for n in 0..slide_count {
            let id = (256 + n).to_string();
            let rel = format!("rId{}", FIRST_SLIDE_REL + n);
            x.empty("p:sldId", &[("id", id.as_str()), ("r:id", rel.as_str())])?;
        }
        x.close("p:sldIdLst")?;
    }

    let cx = width.to_string();
    let cy = height.to_string();
    let mut size: Vec<(&str, &str)> = vec![("cx", cx.as_str()), ("cy", cy.as_str())];
    if let Some(kind) = size_type {
        size.push(("type", kind));
    }
    x.empty("p:sldSz", &size)?;
    x.empty("p:notesSz", &[("cx", "6858000"), ("cy", "9144000")])?;
    x.empty("p:defaultTextStyle", &[])?;
    x.close("p:presentation")?;
    x.finish()
}

/// `docProps/core.xml` with title, author and timestamps.
pub fn core_xml(title: &str, author: &str, timestamp: DateTime<Utc>) -> Result<String> {
    let stamp = timestamp.to_rfc3339_opts(SecondsFormat::Secs, true);
    let mut x = XmlOut::new()?;
    x.open(
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:dcmitype", "http://purl.org/dc/dcmitype/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    x.element("dc:title", &[], title)?;
    x.element("dc:creator", &[], author)?;
    x.element("cp:lastModifiedBy", &[], author)?;
    x.element("cp:revision", &[], "1")?;
    x.element("dcterms:created", &[("xsi:type", "dcterms:W3CDTF")], &stamp)?;
    x.element("dcterms:modified", &[("xsi:type", "dcterms:W3CDTF")], &stamp)?;
    x.close("cp:coreProperties")?;
    x.finish()
}

/// `docProps/app.xml`.
pub fn app_xml(slide_count: usize) -> Result<String> {
    let mut x = XmlOut::new()?;
    x.open(
        "Properties",
        &[
            (
                "xmlns",
                "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties",
            ),
            (
                "xmlns:vt",
                "http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes",
            ),
        ],
    )?;
    x.element("Application", &[], "deckgen")?;
    x.element("PresentationFormat", &[], "On-screen Show")?;
    x.element("Slides", &[], &slide_count.to_string())?;
    x.element("AppVersion", &[], "16.0000")?;
    x.close("Properties")?;
    x.finish()
}

/// The single slide master. Its background follows the theme's `bg1`.
pub fn slide_master_xml() -> Result<String> {
    let mut x = XmlOut::new()?;
    x.open(
        "p:sldMaster",
        &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)],
    )?;
    x.open("p:cSld", &[])?;
    x.open("p:bg", &[])?;
    x.open("p:bgRef", &[("idx", "1001")])?;
    x.empty("a:schemeClr", &[("val", "bg1")])?;
    x.close("p:bgRef")?;
    x.close("p:bg")?;
    x.open("p:spTree", &[])?;
    group_shape_header(&mut x)?;
    x.close("p:spTree")?;
    x.close("p:cSld")?;

    x.empty(
        "p:clrMap",
        &[
            ("bg1", "lt1"),
            ("tx1", "dk1"),
            ("bg2", "lt2"),
            ("tx2", "dk2"),
            ("accent1", "accent1"),
            ("accent2", "accent2"),
            ("accent3", "accent3"),
            ("accent4", "accent4"),
            ("accent5", "accent5"),
            ("accent6", "accent6"),
            ("hlink", "hlink"),
            ("folHlink", "folHlink"),
        ],
    )?;
    x.open("p:sldLayoutIdLst", &[])?;
    x.empty("p:sldLayoutId", &[("id", "2147483649"), ("r:id", "rId1")])?;
    x.close("p:sldLayoutIdLst")?;

    x.open("p:txStyles", &[])?;
    for style in ["p:titleStyle", "p:bodyStyle", "p:otherStyle"] {
        x.open(style, &[])?;
        x.open("a:lvl1pPr", &[])?;
        x.open("a:defRPr", &[("lang", "en-US")])?;
        x.open("a:solidFill", &[])?;
        x.empty("a:schemeClr", &[("val", "tx1")])?;
        x.close("a:solidFill")?;
        x.close("a:defRPr")?;
        x.close("a:lvl1pPr")?;
        x.close(style)?;
    }
    x.close("p:txStyles")?;
    x.close("p:sldMaster")?;
    x.finish()
}

/// The blank layout every slide uses.
pub fn slide_layout_xml() -> Result<String> {
    let mut x = XmlOut::new()?;
    x.open(
        "p:sldLayout",
        &[
            ("xmlns:a", NS_A),
            ("xmlns:r", NS_R),
            ("xmlns:p", NS_P),
            ("type", "blank"),
            ("preserve", "1"),
        ],
    )?;
    x.open("p:cSld", &[("name", "Blank")])?;
    x.open("p:spTree", &[])?;
    group_shape_header(&mut x)?;
    x.close("p:spTree")?;
    x.close("p:cSld")?;
    x.open("p:clrMapOvr", &[])?;
    x.empty("a:masterClrMapping", &[])?;
    x.close("p:clrMapOvr")?;
    x.close("p:sldLayout")?;
    x.finish()
}

pub fn layout_relationships() -> Vec<(String, &'static str, String)> {
    vec![(
        "rId1".into(),
        REL_SLIDE_MASTER,
        "../slideMasters/slideMaster1.xml".into(),
    )]
}

pub fn master_relationships() -> Vec<(String, &'static str, String)> {
    vec![
        ("rId1".into(), REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml".into()),
        ("rId2".into(), REL_THEME, "../theme/theme1.xml".into()),
    ]
}

/// Office theme with the given body font as both major and minor latin face.
pub fn theme_xml(font: &str) -> Result<String> {
    let mut x = XmlOut::new()?;
    x.open("a:theme", &[("xmlns:a", NS_A), ("name", "Deck")])?;
    x.open("a:themeElements", &[])?;

    x.open("a:clrScheme", &[("name", "Deck")])?;
    for (slot, system, rgb) in [
        ("a:dk1", Some("windowText"), "000000"),
        ("a:lt1", Some("window"), "FFFFFF"),
        ("a:dk2", None, "4C4D4F"),
        ("a:lt2", None, "F2F2F2"),
        ("a:accent1", None, "00A5A8"),
        ("a:accent2", None, "0071B9"),
        ("a:accent3", None, "A5A5A5"),
        ("a:accent4", None, "FFC000"),
        ("a:accent5", None, "5B9BD5"),
        ("a:accent6", None, "70AD47"),
        ("a:hlink", None, "0563C1"),
        ("a:folHlink", None, "954F72"),
    ] {
        x.open(slot, &[])?;
        match system {
            Some(name) => x.empty("a:sysClr", &[("val", name), ("lastClr", rgb)])?,
            None => x.empty("a:srgbClr", &[("val", rgb)])?,
        }
        x.close(slot)?;
    }
    x.close("a:clrScheme")?;

    x.open("a:fontScheme", &[("name", "Deck")])?;
    for slot in ["a:majorFont", "a:minorFont"] {
        x.open(slot, &[])?;
        x.empty("a:latin", &[("typeface", font)])?;
        x.empty("a:ea", &[("typeface", "")])?;
        x.empty("a:cs", &[("typeface", "")])?;
        x.close(slot)?;
    }
    x.close("a:fontScheme")?;

    x.open("a:fmtScheme", &[("name", "Deck")])?;
    x.open("a:fillStyleLst", &[])?;
    for _ in 0..3 {
        phclr_fill(&mut x)?;
    }
    x.close("a:fillStyleLst")?;

    x.open("a:lnStyleLst", &[])?;
    for width in ["6350", "12700", "19050"] {
        x.open(
            "a:ln",
            &[("w", width), ("cap", "flat"), ("cmpd", "sng"), ("algn", "ctr")],
        )?;
        phclr_fill(&mut x)?;
        x.empty("a:prstDash", &[("val", "solid")])?;
        x.close("a:ln")?;
    }
    x.close("a:lnStyleLst")?;

    x.open("a:effectStyleLst", &[])?;
    for _ in 0..3 {
        x.open("a:effectStyle", &[])?;
        x.empty("a:effectLst", &[])?;
        x.close("a:effectStyle")?;
    }
    x.close("a:effectStyleLst")?;

    x.open("a:bgFillStyleLst", &[])?;
    for _ in 0..3 {
        phclr_fill(&mut x)?;
    }
    x.close("a:bgFillStyleLst")?;
    x.close("a:fmtScheme")?;

    x.close("a:themeElements")?;
    x.close("a:theme")?;
    x.finish()
}

fn phclr_fill(x: &mut XmlOut) -> Result<()> {
    x.open("a:solidFill", &[])?;
    x.empty("a:schemeClr", &[("val", "phClr")])?;
    x.close("a:solidFill")
}

pub fn pres_props_xml() -> Result<String> {
    let mut x = XmlOut::new()?;
    x.empty(
        "p:presentationPr",
        &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)],
    )?;
    x.finish()
}

pub fn view_props_xml() -> Result<String> {
    let mut x = XmlOut::new()?;
    x.open(
        "p:viewPr",
        &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)],
    )?;
    x.open("p:normalViewPr", &[])?;
    x.empty("p:restoredLeft", &[("sz", "15620")])?;
    x.empty("p:restoredTop", &[("sz", "94660")])?;
    x.close("p:normalViewPr")?;
    x.empty("p:gridSpacing", &[("cx", "76200"), ("cy", "76200")])?;
    x.close("p:viewPr")?;
    x.finish()
}

pub fn table_styles_xml() -> Result<String> {
    let mut x = XmlOut::new()?;
    x.empty(
        "a:tblStyleLst",
        &[
            ("xmlns:a", NS_A),
            ("def", "{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}"),
        ],
    )?;
    x.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_content_types_lists_slides_and_media_once() {
        let xml = content_types_xml(
            2,
            &[ImageFormat::Png, ImageFormat::Png, ImageFormat::Jpeg],
        )
        .unwrap();
        assert_eq!(xml.matches(r#"Extension="png""#).count(), 1);
        assert!(xml.contains(r#"<Default Extension="jpeg" ContentType="image/jpeg"/>"#));
        assert!(xml.contains(r#"PartName="/ppt/slides/slide1.xml""#));
        assert!(xml.contains(r#"PartName="/ppt/slides/slide2.xml""#));
        assert!(!xml.contains("slide3.xml"));
    }

    #[test]
    fn test_presentation_slide_ids_follow_fixed_rels() {
        let xml = presentation_xml(2, 9_144_000, 5_143_500, Some("screen16x9")).unwrap();
        assert!(xml.contains(r#"<p:sldId id="256" r:id="rId6"/>"#));
        assert!(xml.contains(r#"<p:sldId id="257" r:id="rId7"/>"#));
        assert!(xml.contains(r#"<p:sldSz cx="9144000" cy="5143500" type="screen16x9"/>"#));

        let rels = presentation_relationships(2);
        assert_eq!(rels.len(), 7);
        assert_eq!(rels[5].0, "rId6");
        assert_eq!(rels[5].2, "slides/slide1.xml");
        assert_eq!(rels[6].2, "slides/slide2.xml");
    }

    #[test]
    fn test_presentation_custom_size_and_no_slides() {
        let xml = presentation_xml(0, 12_192_000, 6_858_000, None).unwrap();
        assert!(!xml.contains("sldIdLst"));
        assert!(xml.contains(r#"<p:sldSz cx="12192000" cy="6858000"/>"#));
    }

    #[test]
    fn test_core_properties() {
        let stamp = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let xml = core_xml("Q3 Review & Plan", "Ops Team", stamp).unwrap();
        assert!(xml.contains("<dc:title>Q3 Review &amp; Plan</dc:title>"));
        assert!(xml.contains("<dc:creator>Ops Team</dc:creator>"));
        assert!(xml.contains(
            r#"<dcterms:created xsi:type="dcterms:W3CDTF">2024-03-01T12:30:00Z</dcterms:created>"#
        ));
    }

    #[test]
    fn test_theme_uses_font() {
        let xml = theme_xml("Arial").unwrap();
        assert_eq!(xml.matches(r#"<a:latin typeface="Arial"/>"#).count(), 2);
        assert_eq!(xml.matches("<a:effectStyle>").count(), 3);
    }

    #[test]
    fn test_app_slide_count() {
        let xml = app_xml(3).unwrap();
        assert!(xml.contains("<Slides>3</Slides>"));
    }
}
