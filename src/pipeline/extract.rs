//! PDF extraction: page text and embedded images via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async contexts.
//! `tokio::task::spawn_blocking` moves the work onto a dedicated thread pool
//! thread designed for blocking operations.
//!
//! Text comes out as plain lines with no font or position data; that is all
//! the plain-text classifier gets to work with. Embedded images are written
//! out in page order, and only their filenames travel further.

use crate::error::{DocTrainerError, ImageError};
use crate::output::DocumentMetadata;
use crate::pipeline::images::{FsImageStore, ImageStore};
use pdfium_render::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info, warn};

/// Environment variable pointing at an existing pdfium library file.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Raw material pulled out of a PDF.
#[derive(Debug, Default)]
pub struct PdfExtraction {
    /// Page texts, each followed by a blank line.
    pub text: String,
    pub page_count: usize,
    /// Filenames written to the image store, in page order.
    pub images: Vec<String>,
    pub skipped_images: Vec<ImageError>,
}

/// Extract text (and, with a store, images) from every page.
pub async fn extract_pdf(
    pdf_path: &Path,
    password: Option<&str>,
    image_store: Option<FsImageStore>,
) -> Result<PdfExtraction, DocTrainerError> {
    let path = pdf_path.to_path_buf();
    let password = password.map(str::to_string);

    tokio::task::spawn_blocking(move || {
        let store = image_store.as_ref().map(|s| s as &dyn ImageStore);
        extract_pdf_blocking(&path, password.as_deref(), store)
    })
    .await
    .map_err(|e| DocTrainerError::Internal(format!("Extract task panicked: {}", e)))?
}

/// Bind to pdfium: `PDFIUM_LIB_PATH` first, then the working directory,
/// then the system library search path.
pub fn bind_pdfium() -> Result<Pdfium, DocTrainerError> {
    let bindings = match std::env::var(PDFIUM_LIB_PATH_ENV) {
        Ok(path) if !path.is_empty() => Pdfium::bind_to_library(&path)
            .map_err(|e| DocTrainerError::PdfiumBindingFailed(format!("{path}: {e:?}")))?,
        _ => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| DocTrainerError::PdfiumBindingFailed(format!("{e:?}")))?,
    };
    Ok(Pdfium::new(bindings))
}

fn open_document<'a>(
    pdfium: &'a Pdfium,
    pdf_path: &Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, DocTrainerError> {
    pdfium.load_pdf_from_file(pdf_path, password).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                DocTrainerError::WrongPassword {
                    path: pdf_path.to_path_buf(),
                }
            } else {
                DocTrainerError::PasswordRequired {
                    path: pdf_path.to_path_buf(),
                }
            }
        } else {
            DocTrainerError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: err_str,
            }
        }
    })
}

/// Blocking implementation of [`extract_pdf`].
fn extract_pdf_blocking(
    pdf_path: &Path,
    password: Option<&str>,
    store: Option<&dyn ImageStore>,
) -> Result<PdfExtraction, DocTrainerError> {
    let pdfium = bind_pdfium()?;
    let document = open_document(&pdfium, pdf_path, password)?;

    let pages = document.pages();
    let mut out = PdfExtraction {
        page_count: pages.len() as usize,
        ..Default::default()
    };
    info!("PDF loaded: {} pages", out.page_count);

    for (idx, page) in pages.iter().enumerate() {
        let page_num = idx + 1;

        match page.text() {
            Ok(text) => {
                out.text.push_str(&text.all());
                out.text.push_str("\n\n");
            }
            Err(e) => warn!("Skipping text of page {}: {:?}", page_num, e),
        }

        let Some(store) = store else {
            continue;
        };

        let mut image_idx = 0;
        for object in page.objects().iter() {
            let Some(image_object) = object.as_image_object() else {
                continue;
            };
            image_idx += 1;
            let name = format!("img-{:03}-{:03}.png", page_num, image_idx);

            match save_image(image_object, &name, store) {
                Ok(()) => {
                    debug!("Extracted {}", name);
                    out.images.push(name);
                }
                Err(detail) => {
                    let err = ImageError::ExtractFailed {
                        page: page_num,
                        detail,
                    };
                    warn!("{}", err);
                    out.skipped_images.push(err);
                }
            }
        }
    }

    info!(
        "Extracted {} chars of text and {} images",
        out.text.len(),
        out.images.len()
    );
    Ok(out)
}

fn save_image(
    image_object: &PdfPageImageObject,
    name: &str,
    store: &dyn ImageStore,
) -> Result<(), String> {
    let image = image_object
        .get_raw_image()
        .map_err(|e| format!("decode: {:?}", e))?;

    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| format!("encode: {}", e))?;

    store
        .write(name, &buf)
        .map_err(|e| format!("write: {}", e))
}

/// Extract document metadata from a PDF without reading page content.
pub async fn extract_metadata(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<DocumentMetadata, DocTrainerError> {
    let path = pdf_path.to_path_buf();
    let pwd = password.map(|s| s.to_string());

    tokio::task::spawn_blocking(move || extract_metadata_blocking(&path, pwd.as_deref()))
        .await
        .map_err(|e| DocTrainerError::Internal(format!("Metadata task panicked: {}", e)))?
}

fn extract_metadata_blocking(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<DocumentMetadata, DocTrainerError> {
    let pdfium = bind_pdfium()?;
    let document = open_document(&pdfium, pdf_path, password)?;

    let metadata = document.metadata();

    let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
        metadata.get(tag).and_then(|t| {
            let v = t.value().to_string();
            if v.is_empty() {
                None
            } else {
                Some(v)
            }
        })
    };

    Ok(DocumentMetadata {
        title: get_meta(PdfDocumentMetadataTagType::Title),
        author: get_meta(PdfDocumentMetadataTagType::Author),
        subject: get_meta(PdfDocumentMetadataTagType::Subject),
        creator: get_meta(PdfDocumentMetadataTagType::Creator),
        producer: get_meta(PdfDocumentMetadataTagType::Producer),
        creation_date: get_meta(PdfDocumentMetadataTagType::CreationDate),
        modification_date: get_meta(PdfDocumentMetadataTagType::ModificationDate),
        page_count: document.pages().len() as usize,
        pdf_version: format!("{:?}", document.version()),
    })
}
