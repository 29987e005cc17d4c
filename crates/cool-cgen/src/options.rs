//! Generator configuration

use serde::{Deserialize, Serialize};

use crate::gc::GcMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodegenOptions {
    /// Collector the program is linked against
    pub collector: GcMode,
    /// Ask the runtime to collect on every allocation
    pub gc_test: bool,
}
