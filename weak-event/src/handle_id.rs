use std::fmt;

use uuid::Uuid;

/// Identifies one subscription in log fields and `Debug` output.
///
/// Every call to [`Event::subscribe`](crate::Event::subscribe) mints a new
/// id, so two handles built from the same closure still log differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandleId(Uuid);

impl HandleId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}
