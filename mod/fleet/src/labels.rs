//! Label generation seam.
//!
//! Rendering real barcode/QR pixels is a downstream concern. The engine
//! only needs a fallible collaborator that turns an identifier into a
//! stored label and hands back a reference. A renderer failure must
//! never corrupt the document; the engine treats it as retryable.

use std::path::PathBuf;

use thiserror::Error;

/// Which symbology a label uses. Module labels are barcodes, the
/// pack-level master label is a QR code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Barcode,
    Qr,
}

/// One label to render.
#[derive(Debug, Clone)]
pub struct LabelRequest {
    pub kind: LabelKind,
    pub pack_serial: String,
    /// Label role: a module slot name or "master".
    pub role: String,
    /// Machine-readable payload encoded into the symbol.
    pub payload: String,
    /// Human-readable text printed alongside the symbol.
    pub human_text: String,
}

#[derive(Error, Debug)]
pub enum LabelError {
    #[error("render failed: {0}")]
    Render(String),

    #[error("io error: {0}")]
    Io(String),
}

/// Renders and stores one label, returning its reference (URL/path).
pub trait LabelRenderer: Send + Sync {
    fn render(&self, req: &LabelRequest) -> Result<String, LabelError>;
}

/// Payload embedded in every label: identifier plus creation date.
pub fn label_payload(id: &str, created_at: &str) -> String {
    format!("{id}|{created_at}")
}

/// Writes placeholder SVG labels under a directory, one file per
/// pack/role, and returns the relative path as the label reference.
/// Stands in for the real print-shop renderer.
pub struct DiskLabelRenderer {
    dir: PathBuf,
}

impl DiskLabelRenderer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

/// Validate a caller-supplied value as a single path component.
///
/// Pack serials come straight from API submissions, so anything that
/// could navigate out of the labels directory is rejected outright.
fn path_component(value: &str) -> Result<&str, LabelError> {
    if value.is_empty() || value == "." || value == ".." || value.contains(['/', '\\']) {
        return Err(LabelError::Render(format!(
            "'{value}' is not usable as a label file name"
        )));
    }
    Ok(value)
}

impl LabelRenderer for DiskLabelRenderer {
    fn render(&self, req: &LabelRequest) -> Result<String, LabelError> {
        let rel = format!(
            "{}/{}.svg",
            path_component(&req.pack_serial)?,
            path_component(&req.role)?
        );
        let path = self.dir.join(&rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| LabelError::Io(e.to_string()))?;
        }

        let class = match req.kind {
            LabelKind::Barcode => "barcode",
            LabelKind::Qr => "qr",
        };
        let svg = format!(
            concat!(
                "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"400\" height=\"120\">\n",
                "  <rect width=\"400\" height=\"120\" fill=\"white\"/>\n",
                "  <text x=\"10\" y=\"50\" class=\"{class}\" font-family=\"monospace\">{payload}</text>\n",
                "  <text x=\"10\" y=\"100\" font-family=\"monospace\">{human}</text>\n",
                "</svg>\n"
            ),
            class = class,
            payload = req.payload,
            human = req.human_text,
        );
        std::fs::write(&path, svg).map_err(|e| LabelError::Io(e.to_string()))?;

        Ok(rel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_embeds_id_and_date() {
        assert_eq!(
            label_payload("RVM152600001", "2026-03-15T08:00:00Z"),
            "RVM152600001|2026-03-15T08:00:00Z"
        );
    }

    #[test]
    fn disk_renderer_writes_file_and_returns_ref() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = DiskLabelRenderer::new(dir.path());
        let req = LabelRequest {
            kind: LabelKind::Qr,
            pack_serial: "RIV2603LFP90010001".into(),
            role: "master".into(),
            payload: "RIV2603LFP90010001|2026-03-15T08:00:00Z".into(),
            human_text: "RIV2603LFP90010001".into(),
        };
        let label_ref = renderer.render(&req).unwrap();
        assert_eq!(label_ref, "RIV2603LFP90010001/master.svg");
        let written = std::fs::read_to_string(dir.path().join(&label_ref)).unwrap();
        assert!(written.contains("RIV2603LFP90010001|2026-03-15T08:00:00Z"));
    }

    // A caller-supplied serial must never write outside the labels dir.
    #[test]
    fn traversal_serial_is_rejected() {
        let base = tempfile::tempdir().unwrap();
        let labels_dir = base.path().join("labels");
        std::fs::create_dir_all(&labels_dir).unwrap();
        let renderer = DiskLabelRenderer::new(&labels_dir);

        for serial in ["../outside", "a/b", "a\\b", "..", ".", ""] {
            let req = LabelRequest {
                kind: LabelKind::Qr,
                pack_serial: serial.into(),
                role: "master".into(),
                payload: "x|y".into(),
                human_text: "x".into(),
            };
            assert!(
                matches!(renderer.render(&req), Err(LabelError::Render(_))),
                "serial {serial:?} must be rejected"
            );
        }
        assert!(!base.path().join("outside").exists());
        assert!(!base.path().join("outside/master.svg").exists());
    }

    #[test]
    fn traversal_role_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = DiskLabelRenderer::new(dir.path());
        let req = LabelRequest {
            kind: LabelKind::Barcode,
            pack_serial: "RIV2603LFP90010001".into(),
            role: "../module1".into(),
            payload: "x|y".into(),
            human_text: "x".into(),
        };
        assert!(matches!(renderer.render(&req), Err(LabelError::Render(_))));
    }

    // Dots inside a serial are fine; only whole-component traversal is not.
    #[test]
    fn dotted_serial_is_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = DiskLabelRenderer::new(dir.path());
        let req = LabelRequest {
            kind: LabelKind::Qr,
            pack_serial: "PACK..01".into(),
            role: "master".into(),
            payload: "x|y".into(),
            human_text: "x".into(),
        };
        assert_eq!(renderer.render(&req).unwrap(), "PACK..01/master.svg");
    }
}
