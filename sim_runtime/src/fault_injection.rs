//! Deterministic fault injection for the simulated runtime
//!
//! ## Example
//!
//! ```
//! use sim_runtime::fault_injection::{FaultPlan, RuntimeAction, RuntimeFault};
//!
//! let plan = FaultPlan::new()
//!     .with_fault(RuntimeFault::FailNext { action: RuntimeAction::Start, count: 1 })
//!     .with_fault(RuntimeFault::FailAlways { action: RuntimeAction::Handover });
//! assert_eq!(plan.faults().len(), 2);
//! ```

use std::collections::BTreeMap;

/// Effects the runtime can be asked to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuntimeAction {
    Fetch,
    Start,
    Stop,
    Suspend,
    Resume,
    Relocate,
    Handover,
    StartTarget,
    ApplyConfiguration,
}

impl RuntimeAction {
    /// Returns the action name used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            RuntimeAction::Fetch => "fetch",
            RuntimeAction::Start => "start",
            RuntimeAction::Stop => "stop",
            RuntimeAction::Suspend => "suspend",
            RuntimeAction::Resume => "resume",
            RuntimeAction::Relocate => "relocate",
            RuntimeAction::Handover => "handover",
            RuntimeAction::StartTarget => "start target",
            RuntimeAction::ApplyConfiguration => "apply configuration",
        }
    }
}

/// A fault to inject
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeFault {
    /// Fail the next N invocations of an action
    FailNext { action: RuntimeAction, count: usize },

    /// Fail every invocation of an action
    FailAlways { action: RuntimeAction },
}

/// A plan describing all faults to inject
#[derive(Debug, Clone, Default)]
pub struct FaultPlan {
    faults: Vec<RuntimeFault>,
}

impl FaultPlan {
    /// Creates an empty plan
    pub fn new() -> Self {
        Self { faults: Vec::new() }
    }

    /// Adds a fault to the plan
    pub fn with_fault(mut self, fault: RuntimeFault) -> Self {
        self.faults.push(fault);
        self
    }

    /// Returns the planned faults
    pub fn faults(&self) -> &[RuntimeFault] {
        &self.faults
    }
}

/// Tracks which planned faults are still pending
#[derive(Debug, Default)]
pub struct FaultInjector {
    fail_next: BTreeMap<RuntimeAction, usize>,
    fail_always: Vec<RuntimeAction>,
}

impl FaultInjector {
    /// Creates an injector from a plan
    pub fn new(plan: &FaultPlan) -> Self {
        let mut injector = Self::default();
        for fault in plan.faults() {
            match fault {
                RuntimeFault::FailNext { action, count } => {
                    *injector.fail_next.entry(*action).or_insert(0) += count;
                }
                RuntimeFault::FailAlways { action } => {
                    injector.fail_always.push(*action);
                }
            }
        }
        injector
    }

    /// Checks (and consumes) a fault for the given action
    pub fn should_fail(&mut self, action: RuntimeAction) -> bool {
        if self.fail_always.contains(&action) {
            return true;
        }
        match self.fail_next.get_mut(&action) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fail_next_is_consumed() {
        let plan = FaultPlan::new().with_fault(RuntimeFault::FailNext {
            action: RuntimeAction::Start,
            count: 2,
        });
        let mut injector = FaultInjector::new(&plan);

        assert!(injector.should_fail(RuntimeAction::Start));
        assert!(injector.should_fail(RuntimeAction::Start));
        assert!(!injector.should_fail(RuntimeAction::Start));
        assert!(!injector.should_fail(RuntimeAction::Stop));
    }

    #[test]
    fn test_fail_always() {
        let plan = FaultPlan::new().with_fault(RuntimeFault::FailAlways {
            action: RuntimeAction::Handover,
        });
        let mut injector = FaultInjector::new(&plan);

        for _ in 0..5 {
            assert!(injector.should_fail(RuntimeAction::Handover));
        }
    }

    #[test]
    fn test_empty_plan_never_fails() {
        let mut injector = FaultInjector::new(&FaultPlan::new());
        assert!(!injector.should_fail(RuntimeAction::Fetch));
    }
}
