//! Garbage collector strategies
//!
//! The collector is picked once when the generator is built. It decides
//! which runtime routines the memory manager tables point at and whether
//! stores into the heap must notify the collector.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::machine::{Instr, Reg, WORD_SIZE};

/// Collector selected by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GcMode {
    /// No collection at all
    #[default]
    None,
    /// Generational collector with an assignment write barrier
    Generational,
    /// Stop-and-copy collector
    StopAndCopy,
}

impl GcMode {
    pub fn strategy(self) -> Box<dyn Collector> {
        match self {
            GcMode::None => Box::new(NoCollector),
            GcMode::Generational => Box::new(GenerationalCollector),
            GcMode::StopAndCopy => Box::new(StopAndCopyCollector),
        }
    }
}

impl fmt::Display for GcMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GcMode::None => "none",
            GcMode::Generational => "generational",
            GcMode::StopAndCopy => "stop-and-copy",
        })
    }
}

impl FromStr for GcMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(GcMode::None),
            "generational" => Ok(GcMode::Generational),
            "stop-and-copy" => Ok(GcMode::StopAndCopy),
            other => Err(format!(
                "unknown collector '{}' (expected none, generational or stop-and-copy)",
                other
            )),
        }
    }
}

/// Collector-specific parts of the generated program
pub trait Collector: fmt::Debug {
    /// Routine stored in `_MemMgr_INITIALIZER`
    fn init_routine(&self) -> &'static str;

    /// Routine stored in `_MemMgr_COLLECTOR`
    fn collect_routine(&self) -> &'static str;

    /// Instructions to run right after `$a0` was stored `offset` words above
    /// `base`. Empty when the collector needs no barrier.
    fn write_barrier(&self, _base: Reg, _offset: i32) -> Vec<Instr> {
        Vec::new()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoCollector;

impl Collector for NoCollector {
    fn init_routine(&self) -> &'static str {
        "_NoGC_Init"
    }

    fn collect_routine(&self) -> &'static str {
        "_NoGC_Collect"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GenerationalCollector;

/// Runtime routine recording an assignment for the generational collector
pub const WRITE_BARRIER: &str = "_GenGC_Assign";

impl Collector for GenerationalCollector {
    fn init_routine(&self) -> &'static str {
        "_GenGC_Init"
    }

    fn collect_routine(&self) -> &'static str {
        "_GenGC_Collect"
    }

    fn write_barrier(&self, base: Reg, offset: i32) -> Vec<Instr> {
        vec![
            Instr::AddImm {
                dst: Reg::A1,
                src: base,
                imm: offset * WORD_SIZE,
            },
            Instr::Call(WRITE_BARRIER.to_string()),
        ]
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StopAndCopyCollector;

impl Collector for StopAndCopyCollector {
    fn init_routine(&self) -> &'static str {
        "_SCGC_Init"
    }

    fn collect_routine(&self) -> &'static str {
        "_SCGC_Collect"
    }
}
