//! Resolver for grep-style listings (`LINE:text`, `path:LINE:text`, `path:LINE:COL:text`)

use follow_mode::follow::{ResolveError, Resolver};
use follow_mode::host::{Host, Location, ViewId};

/// Resolves a listing line to the start of the referenced line in one source view
pub struct GrepLineResolver {
    source: ViewId,
}

impl GrepLineResolver {
    pub fn new(source: ViewId) -> Self {
        Self { source }
    }
}

/// First `:`-separated field that is a positive line number (1-indexed)
pub fn line_number(item: &str) -> Option<usize> {
    let mut fields = item.split(':');
    // last field is the matched text, never a line number
    fields.next_back();
    fields
        .map(str::trim)
        .find_map(|f| f.parse::<usize>().ok())
        .filter(|n| *n > 0)
}

impl Resolver for GrepLineResolver {
    fn resolve(&self, host: &mut dyn Host, at: Location) -> Result<Location, ResolveError> {
        let item = host
            .line_text(at.view, at.offset)
            .ok_or_else(|| ResolveError::new("listing view is gone"))?;
        let line = line_number(&item).ok_or_else(ResolveError::no_item)?;
        let offset = host
            .line_offset(self.source, line - 1)
            .ok_or_else(|| ResolveError::new(format!("line {} is past the end", line)))?;
        Ok(Location::new(self.source, offset))
    }
}
