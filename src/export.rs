//! Export orchestrator: drives capture and assembly across all faces,
//! reports progress through the notification collaborator, and delivers
//! the finished file.
//!
//! State machine: idle -> generating -> {done | failed}, with an atomic
//! re-entrancy guard so only one export is ever in flight. Captures run
//! strictly one face at a time; the document is written only after every
//! page is assembled, so no partial file can appear.

use crate::capture::{CaptureEngine, CapturedFace, PrintSpec};
use crate::error::AppError;
use crate::layout::{self, Face, FaceSide};
use crate::notify::{Notice, Notifier};
use crate::pdf;
use crate::record::{EmployeeRecord, ImageAsset};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::OnceLock;
use uuid::Uuid;

const GENERATING_MESSAGE: &str = "Generating PDF...";
const SUCCESS_MESSAGE: &str = "PDF downloaded successfully!";

/// Faces exported, in page order.
const FACE_ORDER: [FaceSide; 2] = [FaceSide::Front, FaceSide::Back];

const IDLE: u8 = 0;
const GENERATING: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportState {
    Idle,
    Generating,
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub print: PrintSpec,
    /// Explicit font file for the capture engine; system fonts otherwise.
    pub font: Option<PathBuf>,
    /// Organisation logo for the header box and watermark.
    pub logo: Option<ImageAsset>,
    /// Destination path; defaults to the computed file name in the
    /// current directory.
    pub output: Option<PathBuf>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions { print: PrintSpec::default(), font: None, logo: None, output: None }
    }
}

#[derive(Debug, Clone)]
pub struct ExportReceipt {
    pub file_name: String,
    pub path: PathBuf,
    pub pages: usize,
}

#[derive(Debug)]
pub enum Outcome {
    Completed(ExportReceipt),
    /// A trigger arrived while an export was already generating; it is
    /// ignored and no second document is produced.
    AlreadyInProgress,
}

/// Document name derived from the record: `{firstName}_ID_Card.pdf`,
/// with a generic fallback when the first name is absent.
pub fn document_file_name(record: &EmployeeRecord) -> String {
    let name: String = record
        .first_name
        .as_deref()
        .unwrap_or("")
        .trim()
        .replace(' ', "-")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-')
        .collect();
    if name.is_empty() {
        "Employee_ID_Card.pdf".to_string()
    } else {
        format!("{}_ID_Card.pdf", name)
    }
}

/// Locate one face in the rendered tree; absence is fatal to the export.
pub fn find_face(faces: &[Face], side: FaceSide) -> Result<&Face, AppError> {
    faces
        .iter()
        .find(|f| f.side == side)
        .ok_or(AppError::ElementNotFound(side))
}

pub struct Exporter {
    state: AtomicU8,
    engine: OnceLock<CaptureEngine>,
}

impl Default for Exporter {
    fn default() -> Self {
        Exporter::new()
    }
}

impl Exporter {
    pub fn new() -> Self {
        Exporter { state: AtomicU8::new(IDLE), engine: OnceLock::new() }
    }

    pub fn state(&self) -> ExportState {
        match self.state.load(Ordering::SeqCst) {
            GENERATING => ExportState::Generating,
            _ => ExportState::Idle,
        }
    }

    /// Capture engine handle, acquired on first use and reused across the
    /// process lifetime.
    fn engine(&self, font: Option<&Path>) -> Result<&CaptureEngine, AppError> {
        match self.engine.get() {
            Some(engine) => Ok(engine),
            None => {
                let engine = CaptureEngine::acquire(font)?;
                Ok(self.engine.get_or_init(move || engine))
            }
        }
    }

    /// Run one export end to end.
    ///
    /// Side effects are strictly ordered: progress notice, captures in
    /// face order, a single file write. Every failure is converted into
    /// one error notice correlated with the progress notice, and the
    /// orchestrator returns to idle.
    pub fn export(
        &self,
        record: &EmployeeRecord,
        opts: &ExportOptions,
        notifier: &dyn Notifier,
    ) -> Result<Outcome, AppError> {
        if self
            .state
            .compare_exchange(IDLE, GENERATING, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("export already in flight; trigger ignored");
            return Ok(Outcome::AlreadyInProgress);
        }

        let ticket = Uuid::new_v4();
        notifier.notify(Notice::progress(ticket, GENERATING_MESSAGE));
        let result = self.run(record, opts);
        self.state.store(IDLE, Ordering::SeqCst);

        match result {
            Ok(receipt) => {
                notifier.notify(Notice::success(ticket, SUCCESS_MESSAGE));
                Ok(Outcome::Completed(receipt))
            }
            Err(e) => {
                notifier.notify(Notice::error(ticket, format!("Failed to generate PDF: {}", e)));
                Err(e)
            }
        }
    }

    fn run(&self, record: &EmployeeRecord, opts: &ExportOptions) -> Result<ExportReceipt, AppError> {
        let engine = self.engine(opts.font.as_deref())?;
        let faces = layout::render_faces(record, opts.logo.as_ref());

        let mut captures: Vec<CapturedFace> = Vec::with_capacity(FACE_ORDER.len());
        for side in FACE_ORDER {
            let face = find_face(&faces, side)?;
            captures.push(engine.capture(face, &opts.print)?);
        }

        let bytes = pdf::assemble(&captures, &opts.print)?;

        let file_name = document_file_name(record);
        let path = opts
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(&file_name));
        fs::write(&path, &bytes)?;
        info!("exported {} ({} pages, {} bytes)", path.display(), captures.len(), bytes.len());

        Ok(ExportReceipt { file_name, path, pages: captures.len() })
    }
}

// ============================================================================
// Tests
// ============================================================================
