use crate::core::data::cell::Cell;

/// Cells of one work item, stamped with the generation that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderResult {
    pub generation: u64,
    pub pass: u32,
    pub cells: Vec<Cell>,
}

/// What a worker sends back for one work item. Cancelled items send nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Computed(RenderResult),
    Failed {
        generation: u64,
        pass: u32,
        message: String,
    },
}

impl ItemOutcome {
    #[must_use]
    pub fn generation(&self) -> u64 {
        match self {
            Self::Computed(result) => result.generation,
            Self::Failed { generation, .. } => *generation,
        }
    }
}
