//! Zone Copy
//!
//! Rewrites template zone entities for the target zone and imports them:
//! zone-qualified names are renamed, origin group ids are translated by
//! name, and rules are re-created so their order survives.

mod orchestrator;
mod origin_index;
mod rename;
mod report;
mod rule_rewriter;

pub use orchestrator::ZoneCopier;
pub use origin_index::OriginIndex;
pub use rename::{rewrite_name, ZoneRenamer};
pub use report::{EntityKind, ImportAction, ImportOutcome, ImportReport, Module};
pub use rule_rewriter::{needs_origin_index, single_body, RuleRewriter};
