//! Import results

use std::fmt;

use clap::ValueEnum;

/// Entity type handled by one import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    OriginGroup,
    Domain,
    Rule,
    ZoneSetting,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::OriginGroup => write!(f, "origin group"),
            EntityKind::Domain => write!(f, "domain"),
            EntityKind::Rule => write!(f, "rule"),
            EntityKind::ZoneSetting => write!(f, "zone setting"),
        }
    }
}

/// Selection of entity types for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Module {
    Origin,
    Domain,
    Rule,
    ZoneSetting,
    All,
}

impl Module {
    /// Entity types in import order; origin groups come first so that
    /// domains and rules can resolve references to them
    pub fn kinds(self) -> &'static [EntityKind] {
        match self {
            Module::Origin => &[EntityKind::OriginGroup],
            Module::Domain => &[EntityKind::Domain],
            Module::Rule => &[EntityKind::Rule],
            Module::ZoneSetting => &[EntityKind::ZoneSetting],
            Module::All => &[
                EntityKind::OriginGroup,
                EntityKind::Domain,
                EntityKind::Rule,
                EntityKind::ZoneSetting,
            ],
        }
    }
}

/// What happened to a single entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportAction {
    Created,
    /// Already present in the target zone
    Skipped,
    /// Settings written over the target's
    Applied,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Name in the target zone
    pub name: String,
    pub action: ImportAction,
}

/// Result of importing one entity type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub kind: EntityKind,
    pub outcomes: Vec<ImportOutcome>,
}

impl ImportReport {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            outcomes: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, name: impl Into<String>, action: ImportAction) {
        self.outcomes.push(ImportOutcome {
            name: name.into(),
            action,
        });
    }

    pub fn created(&self) -> usize {
        self.count(ImportAction::Created)
    }

    pub fn skipped(&self) -> usize {
        self.count(ImportAction::Skipped)
    }

    pub fn applied(&self) -> usize {
        self.count(ImportAction::Applied)
    }

    fn count(&self, action: ImportAction) -> usize {
        self.outcomes.iter().filter(|o| o.action == action).count()
    }
}
