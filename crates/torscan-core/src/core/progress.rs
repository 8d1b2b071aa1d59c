/// Coarse progress events emitted while processing a scan.
#[derive(Debug, Clone)]
pub enum Progress {
    /// A named pipeline phase began (cataloguing, analysis, rendering).
    PhaseStart { name: &'static str },
    PhaseFinish,

    /// The cataloguer found the scan's angle directories and is about to
    /// walk them.
    CatalogStart { angle_count: u64 },
    /// One angle directory was visited (catalogued or skipped).
    AngleCatalogued,
    CatalogFinish,
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards progress events to an optional caller-supplied callback.
///
/// The default reporter is silent, so library callers that do not care
/// about progress pay nothing.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}
