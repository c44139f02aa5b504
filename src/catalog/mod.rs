// Thu Oct 15 2026 - Alex

pub mod assemble;
pub mod hook;
pub mod invocable;
pub mod summary;

pub use assemble::{merge_external, AssemblyInputs, CatalogAssembler, NATIVE_DISCOVERY};
pub use hook::{InvokeError, InvokeHook};
pub use invocable::{Documentation, Evidence, Execution, Invocable, InvocableKind, Signature};
pub use summary::{ConfidenceSummary, RunConditions, TierCount, TierSample};
