//! Employee ID card generator: turns a form record into a print-ready
//! two-sided CR80 card delivered as a rasterized PDF.
//!
//! Pipeline: a validated [`record::EmployeeRecord`] is handed through a
//! [`store::SessionStore`], rendered into resolution-independent face
//! trees by [`layout`], rasterized at print resolution by
//! [`capture::CaptureEngine`], and composed into the final document by
//! [`pdf`]. The [`export::Exporter`] orchestrates the whole run and
//! reports progress through a [`notify::Notifier`].

pub mod assets;
pub mod capture;
pub mod error;
pub mod export;
pub mod layout;
pub mod notify;
pub mod pdf;
pub mod record;
pub mod scale;
pub mod store;

pub use error::AppError;
pub use export::{ExportOptions, Exporter, Outcome};
pub use record::EmployeeRecord;
