//! Pass configuration.

/// Configuration for one member-rebinding pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RebindingOptions {
    /// Worker threads for the scan and planning phases (0 = rayon default).
    pub num_threads: usize,
    /// Output is class files rather than dex. Super calls may then only
    /// reach immediate superinterfaces, which makes interface-indirection
    /// bridges necessary.
    pub generating_class_files: bool,
    /// The target runtime mis-dispatches `invoke-super` into library
    /// code; route such calls through the first library class instead.
    pub super_invoke_defect: bool,
}

impl Default for RebindingOptions {
    fn default() -> Self {
        RebindingOptions {
            num_threads: 0,
            generating_class_files: true,
            super_invoke_defect: false,
        }
    }
}

impl RebindingOptions {
    /// Everything on the calling thread.
    pub fn single_threaded() -> Self {
        RebindingOptions {
            num_threads: 1,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    #[must_use]
    pub fn with_class_files(mut self, generating_class_files: bool) -> Self {
        self.generating_class_files = generating_class_files;
        self
    }

    #[must_use]
    pub fn with_super_invoke_defect(mut self, super_invoke_defect: bool) -> Self {
        self.super_invoke_defect = super_invoke_defect;
        self
    }
}

#[cfg(test)]
mod tests;
