use std::fmt;

/// Packet-kind tag carried at the fixed offset of every frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PacketKind {
    /// Host-to-device command packet
    Command = 0x01,
    /// Device-to-host acknowledgement packet
    Ack = 0x07,
}

impl PacketKind {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Primitive device operations and their wire codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    GetImage = 0x01,
    GenChar = 0x02,
    Match = 0x03,
    Search = 0x04,
    RegModel = 0x05,
    Store = 0x06,
    LoadChar = 0x07,
    DeleteChar = 0x0C,
}

impl Command {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Single-byte status reported in every acknowledgement payload.
///
/// `0x00` means the operation succeeded; every other value is a
/// device-reported condition. The textual mapping is diagnostic only --
/// control flow keys off [`is_success`](Self::is_success) alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationCode(pub u8);

impl ConfirmationCode {
    pub const SUCCESS: ConfirmationCode = ConfirmationCode(0x00);

    pub fn is_success(self) -> bool {
        self.0 == 0x00
    }

    /// Human-readable meaning of this code.
    ///
    /// Unmapped codes render as their hex value (e.g. `0x7f`) rather than
    /// failing, since modules report vendor-specific codes in the field.
    pub fn describe(self) -> String {
        match self.meaning() {
            Some(s) => s.to_string(),
            None => format!("{:#04x}", self.0),
        }
    }

    fn meaning(self) -> Option<&'static str> {
        Some(match self.0 {
            0x00 => "success",
            0x01 => "error receiving frame",
            0x02 => "no finger / capture error",
            0x03 => "image too noisy to enrol",
            0x06 => "image too disordered to extract features",
            0x07 => "too few feature points",
            0x08 => "fingerprints do not match",
            0x09 => "no matching template found",
            0x0A => "failed to fuse character files",
            0x0B => "image width error",
            0x0C => "packet length error",
            0x15 => "no valid raw image in buffer",
            0x17 => "finger did not move between captures",
            0x18 => "flash write error",
            0x28 => "feature-link association error",
            0x31 => "unsupported encryption level",
            0x35 => "illegal data",
            _ => return None,
        })
    }
}

impl fmt::Display for ConfirmationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// Decoded acknowledgement frame.
///
/// `payload` is the full ack payload including the confirmation byte at
/// offset 0, so command-specific fields sit at their datasheet offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    pub code: ConfirmationCode,
    pub payload: Vec<u8>,
}

/// Successful library search result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit {
    /// Library page holding the matched template
    pub page_id: u16,
    /// Match confidence score
    pub score: u16,
}

/// Primitive step within a compound workflow, used for abort reporting.
///
/// Only steps that can abort a chain appear here; terminal steps (the search,
/// the compare, the delete itself) report their non-zero codes through the
/// outcome enums instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStep {
    FirstCapture,
    FirstExtract,
    SecondCapture,
    SecondExtract,
    FuseModel,
    StoreTemplate,
    Capture,
    Extract,
    LoadTemplate,
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowStep::FirstCapture => "first capture",
            WorkflowStep::FirstExtract => "first feature extraction",
            WorkflowStep::SecondCapture => "second capture",
            WorkflowStep::SecondExtract => "second feature extraction",
            WorkflowStep::FuseModel => "model fusion",
            WorkflowStep::StoreTemplate => "template store",
            WorkflowStep::Capture => "capture",
            WorkflowStep::Extract => "feature extraction",
            WorkflowStep::LoadTemplate => "template load",
        };
        f.write_str(name)
    }
}

/// First failing step of an aborted workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure {
    pub step: WorkflowStep,
    pub code: ConfirmationCode,
    /// Human-readable meaning captured at abort time
    pub reason: String,
}

impl StepFailure {
    pub(crate) fn new(step: WorkflowStep, code: ConfirmationCode) -> Self {
        StepFailure {
            step,
            code,
            reason: code.describe(),
        }
    }
}

impl fmt::Display for StepFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.step, self.reason)
    }
}

/// Result of an enrolment workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrollOutcome {
    /// All six steps succeeded; the template lives at `page_id`
    Stored { page_id: u16 },
    /// Captures fused into a model but the final store was refused.
    /// The model is left in the volatile buffer; nothing is rolled back.
    StoreFailed(StepFailure),
    /// A step before fusion completed failed; no model was registered
    Aborted(StepFailure),
}

/// Result of a search-identify workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A template in the searched range matched the live finger
    Match(SearchHit),
    /// Clean exchange, but the library holds no match (usually code 0x09)
    NoMatch(ConfirmationCode),
    /// Capture or extraction failed before the search was issued
    Aborted(StepFailure),
}

/// Result of an identify-by-id workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Live finger matched the stored template
    Match { score: u16 },
    /// The final compare reported a mismatch
    NoMatch(ConfirmationCode),
    /// An earlier step failed; no comparison was made
    Aborted(StepFailure),
}
