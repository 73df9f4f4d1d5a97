//! The employee record: the single source of truth for both the on-screen
//! preview and the exported document.

use crate::error::AppError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::{DynamicImage, ImageFormat};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Required fields for a record to count as complete. Completeness is
/// advisory: it gates the transition to preview but is never enforced by
/// the storage layer.
pub const REQUIRED_FIELDS: [&str; 12] = [
    "firstName",
    "lastName",
    "bloodGroup",
    "department",
    "designation",
    "officeLocation",
    "cfmsId",
    "hrmsId",
    "address",
    "mobileNumber",
    "photo",
    "signature",
];

// ============================================================================
// Image payloads
// ============================================================================

/// An opaque inline image payload (base64 data URI, or bare base64).
///
/// The renderer makes no assumption about the encoding beyond "decodable as
/// an image"; decoding happens once, up front, during capture preparation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageAsset(String);

impl ImageAsset {
    pub fn new(payload: impl Into<String>) -> Self {
        ImageAsset(payload.into())
    }

    /// Wrap raw image bytes into a `data:` URI, the same shape the browser's
    /// `FileReader.readAsDataURL` hands the form.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mime = match image::guess_format(bytes) {
            Ok(ImageFormat::Png) => "image/png",
            Ok(ImageFormat::Jpeg) => "image/jpeg",
            Ok(ImageFormat::Gif) => "image/gif",
            Ok(ImageFormat::WebP) => "image/webp",
            Ok(ImageFormat::Bmp) => "image/bmp",
            _ => "application/octet-stream",
        };
        ImageAsset(format!("data:{};base64,{}", mime, BASE64.encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Decode the payload into pixels. Both `data:<mime>;base64,<data>` and
    /// bare base64 are accepted.
    pub fn decode(&self) -> Result<DynamicImage, AppError> {
        let raw = self.0.trim();
        let b64 = raw
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(',').map(|(_, data)| data))
            .unwrap_or(raw);
        let bytes = BASE64
            .decode(b64.as_bytes())
            .map_err(|e| AppError::CaptureFailure(format!("Undecodable image payload: {}", e)))?;
        image::load_from_memory(&bytes)
            .map_err(|e| AppError::CaptureFailure(format!("Unsupported image: {}", e)))
    }
}

// ============================================================================
// Blood group
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BloodGroup {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BloodGroup::APositive => "A+",
            BloodGroup::ANegative => "A-",
            BloodGroup::BPositive => "B+",
            BloodGroup::BNegative => "B-",
            BloodGroup::OPositive => "O+",
            BloodGroup::ONegative => "O-",
            BloodGroup::AbPositive => "AB+",
            BloodGroup::AbNegative => "AB-",
        };
        f.write_str(s)
    }
}

// ============================================================================
// Employee record
// ============================================================================

/// One employee's ID-card data. Field names match the `employeeData` JSON
/// payload written by the form stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeRecord {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub blood_group: Option<BloodGroup>,
    pub department: Option<String>,
    pub designation: Option<String>,
    /// May contain embedded line breaks; rendered literally, line by line.
    pub office_location: Option<String>,
    pub cfms_id: Option<String>,
    pub hrms_id: Option<String>,
    pub address: Option<String>,
    pub mobile_number: Option<String>,
    pub aadhaar_number: Option<String>,
    pub photo: Option<ImageAsset>,
    pub signature: Option<ImageAsset>,
}

fn filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

fn asset_filled(value: &Option<ImageAsset>) -> bool {
    value.as_ref().is_some_and(|a| !a.is_blank())
}

impl EmployeeRecord {
    /// Number of required fields that are present and non-blank after trim.
    pub fn filled_required_count(&self) -> usize {
        [
            filled(&self.first_name),
            filled(&self.last_name),
            self.blood_group.is_some(),
            filled(&self.department),
            filled(&self.designation),
            filled(&self.office_location),
            filled(&self.cfms_id),
            filled(&self.hrms_id),
            filled(&self.address),
            filled(&self.mobile_number),
            asset_filled(&self.photo),
            asset_filled(&self.signature),
        ]
        .iter()
        .filter(|&&f| f)
        .count()
    }

    /// Completion percentage: round(100·k/N) over the required field set.
    pub fn completion_percent(&self) -> u8 {
        let k = self.filled_required_count() as f32;
        let n = REQUIRED_FIELDS.len() as f32;
        (k / n * 100.0).round() as u8
    }

    pub fn is_complete(&self) -> bool {
        self.filled_required_count() == REQUIRED_FIELDS.len()
    }

    /// Names (in JSON form) of required fields still blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let states = [
            filled(&self.first_name),
            filled(&self.last_name),
            self.blood_group.is_some(),
            filled(&self.department),
            filled(&self.designation),
            filled(&self.office_location),
            filled(&self.cfms_id),
            filled(&self.hrms_id),
            filled(&self.address),
            filled(&self.mobile_number),
            asset_filled(&self.photo),
            asset_filled(&self.signature),
        ];
        REQUIRED_FIELDS
            .iter()
            .zip(states)
            .filter(|(_, ok)| !ok)
            .map(|(name, _)| *name)
            .collect()
    }

    /// "First Last", as printed on the card. Middle name is collected but
    /// not part of the card face.
    pub fn full_name(&self) -> String {
        let first = self.first_name.as_deref().unwrap_or("").trim();
        let last = self.last_name.as_deref().unwrap_or("").trim();
        let mut name = String::new();
        name.push_str(first);
        if !first.is_empty() && !last.is_empty() {
            name.push(' ');
        }
        name.push_str(last);
        name
    }

    /// Office text split on embedded line breaks, original order, untrimmed
    /// beyond the record-level trim.
    pub fn office_lines(&self) -> Vec<&str> {
        self.office_location
            .as_deref()
            .map(|s| s.split('\n').collect())
            .unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================
