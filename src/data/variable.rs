use serde::{Serialize, Deserialize};

/// Position of a variable within its data set's column order.
///
/// Subsamples keep the column order of their source, so an id resolved
/// against the full data set stays valid for every subsample drawn from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct VariableId(pub u32);

impl VariableId {
    #[inline(always)]
    pub fn index(&self) -> usize { self.0 as usize }
    pub fn new(idx: usize) -> Self { Self(idx as u32) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VariableKind {
    #[default]
    Continuous,
    Discrete,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub kind: VariableKind,
}

impl Variable {
    pub fn continuous(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: VariableKind::Continuous }
    }

    pub fn discrete(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: VariableKind::Discrete }
    }
}
