/// Coarse classification shared by every error in this crate.
///
/// Lets callers answer "access denied" for routine rejections and
/// "service degraded" for infrastructure faults without matching on
/// individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Expected outcome of bad input: wrong password, forged/expired token, unknown key.
    Rejected,
    /// The system could not do its job: random source, hashing primitive, serialization.
    Infrastructure,
}

impl ErrorClass {
    pub fn is_rejection(self) -> bool {
        matches!(self, ErrorClass::Rejected)
    }
}
