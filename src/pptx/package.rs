//! The in-memory presentation and its ZIP packaging.

use super::layout::{EmbeddedImage, SlidePart};
use super::media::{image_dimensions, ImageFormat};
use super::parts;
use super::xml::{relationships_xml, slide_xml};
use super::SlideLayout;
use crate::error::{Error, Result};
use chrono::Utc;
use std::collections::HashMap;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const DEFAULT_TITLE: &str = "Presentation";
const DEFAULT_AUTHOR: &str = "deckgen";

/// An image stored once under `ppt/media/`.
#[derive(Debug, Clone)]
struct Media {
    format: ImageFormat,
    data: Vec<u8>,
}

/// A presentation being assembled slide by slide.
#[derive(Debug, Clone)]
pub struct Presentation {
    layout: SlideLayout,
    title: String,
    author: String,
    slides: Vec<SlidePart>,
    media: Vec<Media>,
    media_by_path: HashMap<PathBuf, usize>,
}

impl Presentation {
    pub fn new(layout: SlideLayout) -> Self {
        Self {
            layout,
            title: DEFAULT_TITLE.to_string(),
            author: DEFAULT_AUTHOR.to_string(),
            slides: Vec::new(),
            media: Vec::new(),
            media_by_path: HashMap::new(),
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.author = author.into();
    }

    pub fn layout(&self) -> SlideLayout {
        self.layout
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn media_count(&self) -> usize {
        self.media.len()
    }

    /// Read an image file and store it, reusing the stored copy when the
    /// same file was embedded before.
    pub fn embed_image(&mut self, path: &Path) -> Result<EmbeddedImage> {
        let key = fs::canonicalize(path).map_err(|_| Error::ImageNotFound(path.to_path_buf()))?;
        if let Some(&index) = self.media_by_path.get(&key) {
            return Ok(EmbeddedImage {
                media: index,
                size: image_dimensions(&self.media[index].data),
            });
        }

        let data = fs::read(&key).map_err(|_| Error::ImageNotFound(path.to_path_buf()))?;
        let format = ImageFormat::detect(&key, &data).ok_or_else(|| {
            Error::Html {
                file: path.to_path_buf(),
                message: "unsupported image format".to_string(),
            }
        })?;
        let size = image_dimensions(&data);

        let index = self.media.len();
        self.media.push(Media { format, data });
        self.media_by_path.insert(key, index);
        log::debug!("Embedded {} as image{}", path.display(), index + 1);

        Ok(EmbeddedImage { media: index, size })
    }

    pub fn add_slide(&mut self, slide: SlidePart) {
        self.slides.push(slide);
    }

    /// Serialize the package into memory.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
            let options =
                SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
            let mut put = |name: &str, data: &[u8]| -> Result<()> {
                zip.start_file(name, options)?;
                zip.write_all(data)?;
                Ok(())
            };

            let count = self.slides.len();
            let formats: Vec<ImageFormat> = self.media.iter().map(|m| m.format).collect();
            let (width, height) = self.layout.size_emu();

            put(
                "[Content_Types].xml",
                parts::content_types_xml(count, &formats)?.as_bytes(),
            )?;
            put(
                "_rels/.rels",
                relationships_xml(&parts::root_relationships())?.as_bytes(),
            )?;
            put(
                "docProps/core.xml",
                parts::core_xml(&self.title, &self.author, Utc::now())?.as_bytes(),
            )?;
            put("docProps/app.xml", parts::app_xml(count)?.as_bytes())?;
            put(
                "ppt/presentation.xml",
                parts::presentation_xml(count, width, height, self.layout.size_type())?
                    .as_bytes(),
            )?;
            put(
                "ppt/_rels/presentation.xml.rels",
                relationships_xml(&parts::presentation_relationships(count))?.as_bytes(),
            )?;
            put("ppt/presProps.xml", parts::pres_props_xml()?.as_bytes())?;
            put("ppt/viewProps.xml", parts::view_props_xml()?.as_bytes())?;
            put("ppt/tableStyles.xml", parts::table_styles_xml()?.as_bytes())?;
            put(
                "ppt/theme/theme1.xml",
                parts::theme_xml(self.theme_font())?.as_bytes(),
            )?;
            put(
                "ppt/slideMasters/slideMaster1.xml",
                parts::slide_master_xml()?.as_bytes(),
            )?;
            put(
                "ppt/slideMasters/_rels/slideMaster1.xml.rels",
                relationships_xml(&parts::master_relationships())?.as_bytes(),
            )?;
            put(
                "ppt/slideLayouts/slideLayout1.xml",
                parts::slide_layout_xml()?.as_bytes(),
            )?;
            put(
                "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
                relationships_xml(&parts::layout_relationships())?.as_bytes(),
            )?;

            for (i, slide) in self.slides.iter().enumerate() {
                let n = i + 1;
                // rId1 is the layout; images follow in first-use order
                let used = slide_media(slide);
                let rel_of = |media: usize| {
                    let pos = used.iter().position(|&m| m == media).unwrap_or(0);
                    format!("rId{}", pos + 2)
                };

                let mut rels: Vec<(String, &str, String)> = vec![(
                    "rId1".to_string(),
                    parts::REL_SLIDE_LAYOUT,
                    "../slideLayouts/slideLayout1.xml".to_string(),
                )];
                for &media in &used {
                    rels.push((
                        rel_of(media),
                        parts::REL_IMAGE,
                        format!("../media/{}", self.media_name(media)),
                    ));
                }

                put(
                    &format!("ppt/slides/slide{}.xml", n),
                    slide_xml(slide, rel_of)?.as_bytes(),
                )?;
                put(
                    &format!("ppt/slides/_rels/slide{}.xml.rels", n),
                    relationships_xml(&rels)?.as_bytes(),
                )?;
            }

            for (i, media) in self.media.iter().enumerate() {
                put(&format!("ppt/media/{}", self.media_name(i)), &media.data)?;
            }

            zip.finish()?;
        }
        Ok(buffer)
    }

    /// Write the package to `path`, creating missing parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, bytes)?;
        Ok(())
    }

    fn media_name(&self, index: usize) -> String {
        format!("image{}.{}", index + 1, self.media[index].format.extension())
    }

    fn theme_font(&self) -> &str {
        self.slides
            .first()
            .map(|s| s.font.as_str())
            .unwrap_or("Arial")
    }
}

/// Media indices referenced by a slide, without repeats.
fn slide_media(slide: &SlidePart) -> Vec<usize> {
    let mut used = Vec::new();
    for shape in &slide.shapes {
        if let super::layout::Shape::Picture { media, .. } = shape {
            if !used.contains(media) {
                used.push(*media);
            }
        }
    }
    used
}
