//! XML serialization of generated parts.

use super::layout::{Frame, Paragraph, Shape, SlidePart, BULLET_INDENT, INSET_X, INSET_Y};
use crate::error::{Error, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

pub const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
pub const NS_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Event writer with shorthand for the element shapes OOXML uses.
pub struct XmlOut {
    writer: Writer<Vec<u8>>,
}

impl XmlOut {
    /// Start a part with the standard XML declaration.
    pub fn new() -> Result<Self> {
        let mut writer = Writer::new(Vec::new());
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(Self { writer })
    }

    pub fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let mut start = BytesStart::new(name);
        for &attr in attrs {
            start.push_attribute(attr);
        }
        self.writer.write_event(Event::Start(start))?;
        Ok(())
    }

    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let mut start = BytesStart::new(name);
        for &attr in attrs {
            start.push_attribute(attr);
        }
        self.writer.write_event(Event::Empty(start))?;
        Ok(())
    }

    pub fn close(&mut self, name: &str) -> Result<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    pub fn text(&mut self, text: &str) -> Result<()> {
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        Ok(())
    }

    /// `<name attrs>text</name>`
    pub fn element(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<()> {
        self.open(name, attrs)?;
        self.text(text)?;
        self.close(name)
    }

    pub fn finish(self) -> Result<String> {
        String::from_utf8(self.writer.into_inner()).map_err(|e| Error::XmlWrite(e.to_string()))
    }
}

/// Serialize one slide. Pictures reference media through `media_rel`,
/// which maps a media index to the slide's relationship id.
pub fn slide_xml(slide: &SlidePart, media_rel: impl Fn(usize) -> String) -> Result<String> {
    let mut x = XmlOut::new()?;
    x.open(
        "p:sld",
        &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)],
    )?;
    x.open("p:cSld", &[])?;

    if let Some(bg) = slide.background {
        x.open("p:bg", &[])?;
        x.open("p:bgPr", &[])?;
        solid_fill(&mut x, &bg.hex())?;
        x.empty("a:effectLst", &[])?;
        x.close("p:bgPr")?;
        x.close("p:bg")?;
    }

    x.open("p:spTree", &[])?;
    group_shape_header(&mut x)?;

    for (i, shape) in slide.shapes.iter().enumerate() {
        // Id 1 belongs to the shape tree itself
        let id = (i + 2).to_string();
        match shape {
            Shape::Text { frame, paragraphs } => {
                text_shape(&mut x, &id, *frame, paragraphs, &slide.font)?
            }
            Shape::Picture {
                frame,
                media,
                description,
            } => picture(&mut x, &id, *frame, &media_rel(*media), description)?,
        }
    }

    x.close("p:spTree")?;
    x.close("p:cSld")?;
    x.open("p:clrMapOvr", &[])?;
    x.empty("a:masterClrMapping", &[])?;
    x.close("p:clrMapOvr")?;
    x.close("p:sld")?;
    x.finish()
}

/// Empty `nvGrpSpPr` and `grpSpPr` every shape tree starts with.
pub fn group_shape_header(x: &mut XmlOut) -> Result<()> {
    x.open("p:nvGrpSpPr", &[])?;
    x.empty("p:cNvPr", &[("id", "1"), ("name", "")])?;
    x.empty("p:cNvGrpSpPr", &[])?;
    x.empty("p:nvPr", &[])?;
    x.close("p:nvGrpSpPr")?;
    x.open("p:grpSpPr", &[])?;
    x.open("a:xfrm", &[])?;
    x.empty("a:off", &[("x", "0"), ("y", "0")])?;
    x.empty("a:ext", &[("cx", "0"), ("cy", "0")])?;
    x.empty("a:chOff", &[("x", "0"), ("y", "0")])?;
    x.empty("a:chExt", &[("cx", "0"), ("cy", "0")])?;
    x.close("a:xfrm")?;
    x.close("p:grpSpPr")
}

fn solid_fill(x: &mut XmlOut, hex: &str) -> Result<()> {
    x.open("a:solidFill", &[])?;
    x.empty("a:srgbClr", &[("val", hex)])?;
    x.close("a:solidFill")
}

fn transform(x: &mut XmlOut, frame: Frame) -> Result<()> {
    x.open("a:xfrm", &[])?;
    x.empty(
        "a:off",
        &[("x", frame.x.to_string().as_str()), ("y", frame.y.to_string().as_str())],
    )?;
    x.empty(
        "a:ext",
        &[("cx", frame.cx.to_string().as_str()), ("cy", frame.cy.to_string().as_str())],
    )?;
    x.close("a:xfrm")?;
    x.open("a:prstGeom", &[("prst", "rect")])?;
    x.empty("a:avLst", &[])?;
    x.close("a:prstGeom")
}

fn text_shape(
    x: &mut XmlOut,
    id: &str,
    frame: Frame,
    paragraphs: &[Paragraph],
    font: &str,
) -> Result<()> {
    let name = format!("Text {}", id);
    x.open("p:sp", &[])?;
    x.open("p:nvSpPr", &[])?;
    x.empty("p:cNvPr", &[("id", id), ("name", name.as_str())])?;
    x.empty("p:cNvSpPr", &[("txBox", "1")])?;
    x.empty("p:nvPr", &[])?;
    x.close("p:nvSpPr")?;

    x.open("p:spPr", &[])?;
    transform(x, frame)?;
    x.empty("a:noFill", &[])?;
    x.close("p:spPr")?;

    let inset_x = INSET_X.to_string();
    let inset_y = INSET_Y.to_string();
    x.open("p:txBody", &[])?;
    x.open(
        "a:bodyPr",
        &[
            ("wrap", "square"),
            ("lIns", inset_x.as_str()),
            ("tIns", inset_y.as_str()),
            ("rIns", inset_x.as_str()),
            ("bIns", inset_y.as_str()),
            ("rtlCol", "0"),
            ("anchor", "t"),
        ],
    )?;
    x.empty("a:normAutofit", &[])?;
    x.close("a:bodyPr")?;
    x.empty("a:lstStyle", &[])?;

    for paragraph in paragraphs {
        write_paragraph(x, paragraph, font)?;
    }

    x.close("p:txBody")?;
    x.close("p:sp")
}

fn write_paragraph(x: &mut XmlOut, paragraph: &Paragraph, font: &str) -> Result<()> {
    let size = (paragraph.size * 100).to_string();
    let color = paragraph.color.hex();

    x.open("a:p", &[])?;
    match paragraph.bullet {
        Some(bullet) => {
            let indent = BULLET_INDENT.to_string();
            let hanging = (-BULLET_INDENT).to_string();
            let bullet = bullet.to_string();
            x.open("a:pPr", &[("marL", indent.as_str()), ("indent", hanging.as_str())])?;
            x.empty("a:buFont", &[("typeface", "Arial")])?;
            x.empty("a:buChar", &[("char", bullet.as_str())])?;
            x.close("a:pPr")?;
        }
        None => {
            x.open("a:pPr", &[])?;
            x.empty("a:buNone", &[])?;
            x.close("a:pPr")?;
        }
    }

    for run in &paragraph.runs {
        let bold = if paragraph.bold || run.bold { "1" } else { "0" };
        let italic = if paragraph.italic || run.italic { "1" } else { "0" };
        let props: [(&str, &str); 5] = [
            ("lang", "en-US"),
            ("sz", size.as_str()),
            ("b", bold),
            ("i", italic),
            ("dirty", "0"),
        ];

        if run.line_break {
            x.open("a:br", &[])?;
            run_properties(x, &props, &color, font)?;
            x.close("a:br")?;
            continue;
        }

        x.open("a:r", &[])?;
        run_properties(x, &props, &color, font)?;
        x.element("a:t", &[], &run.text)?;
        x.close("a:r")?;
    }

    x.empty(
        "a:endParaRPr",
        &[("lang", "en-US"), ("sz", size.as_str()), ("dirty", "0")],
    )?;
    x.close("a:p")
}

fn run_properties(x: &mut XmlOut, props: &[(&str, &str)], color: &str, font: &str) -> Result<()> {
    x.open("a:rPr", props)?;
    solid_fill(x, color)?;
    x.empty("a:latin", &[("typeface", font)])?;
    x.close("a:rPr")
}

fn picture(x: &mut XmlOut, id: &str, frame: Frame, rel_id: &str, description: &str) -> Result<()> {
    let name = format!("Picture {}", id);
    x.open("p:pic", &[])?;
    x.open("p:nvPicPr", &[])?;
    x.empty(
        "p:cNvPr",
        &[("id", id), ("name", name.as_str()), ("descr", description)],
    )?;
    x.open("p:cNvPicPr", &[])?;
    x.empty("a:picLocks", &[("noChangeAspect", "1")])?;
    x.close("p:cNvPicPr")?;
    x.empty("p:nvPr", &[])?;
    x.close("p:nvPicPr")?;

    x.open("p:blipFill", &[])?;
    x.empty("a:blip", &[("r:embed", rel_id)])?;
    x.open("a:stretch", &[])?;
    x.empty("a:fillRect", &[])?;
    x.close("a:stretch")?;
    x.close("p:blipFill")?;

    x.open("p:spPr", &[])?;
    transform(x, frame)?;
    x.close("p:spPr")?;
    x.close("p:pic")
}

/// A `.rels` part.
pub fn relationships_xml(rels: &[(String, &str, String)]) -> Result<String> {
    let mut x = XmlOut::new()?;
    x.open("Relationships", &[("xmlns", NS_RELS)])?;
    for (id, rel_type, target) in rels {
        x.empty(
            "Relationship",
            &[("Id", id.as_str()), ("Type", *rel_type), ("Target", target.as_str())],
        )?;
    }
    x.close("Relationships")?;
    x.finish()
}
