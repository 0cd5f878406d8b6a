use super::edge::LegFlags;
use crate::diagnostics::SourceLocation;

/// State the reading layer keeps up to date while it feeds observations in.
/// New legs are stamped with `flags`; diagnostics carry `location`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurveyContext {
    pub flags: LegFlags,
    pub location: Option<SourceLocation>,
}

impl SurveyContext {
    pub fn with_flags(flags: LegFlags) -> Self {
        Self { flags, location: None }
    }

    pub fn at(&mut self, file: impl Into<String>, line: u32) -> &mut Self {
        self.location = Some(SourceLocation { file: file.into(), line });
        self
    }
}
