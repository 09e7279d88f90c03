use serde::{Deserialize, Serialize};

/// What a renderer should do with one output line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstructionKind {
    Unchanged,
    Added,
    Removed,
    Replace,
}

/// One index-referencing diff line
///
/// Only the indices implied by `kind` are set: `removed` carries `index_a`,
/// `unchanged` and `added` carry `index_b`, `replace` carries both. Text is
/// looked up by the consumer in `lines_a` / `lines_b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderInstruction {
    #[serde(rename = "type")]
    kind: InstructionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    index_a: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    index_b: Option<usize>,
}

impl RenderInstruction {
    #[must_use]
    pub fn unchanged(index_b: usize) -> Self {
        Self {
            kind: InstructionKind::Unchanged,
            index_a: None,
            index_b: Some(index_b),
        }
    }

    #[must_use]
    pub fn added(index_b: usize) -> Self {
        Self {
            kind: InstructionKind::Added,
            index_a: None,
            index_b: Some(index_b),
        }
    }

    #[must_use]
    pub fn removed(index_a: usize) -> Self {
        Self {
            kind: InstructionKind::Removed,
            index_a: Some(index_a),
            index_b: None,
        }
    }

    #[must_use]
    pub fn replace(index_a: usize, index_b: usize) -> Self {
        Self {
            kind: InstructionKind::Replace,
            index_a: Some(index_a),
            index_b: Some(index_b),
        }
    }

    #[must_use]
    pub fn kind(&self) -> InstructionKind {
        self.kind
    }

    #[must_use]
    pub fn index_a(&self) -> Option<usize> {
        self.index_a
    }

    #[must_use]
    pub fn index_b(&self) -> Option<usize> {
        self.index_b
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_only_implied_indices() {
        let removed = serde_json::to_value(RenderInstruction::removed(4)).expect("serialize");
        assert_eq!(removed, json!({"type": "removed", "index_a": 4}));

        let unchanged = serde_json::to_value(RenderInstruction::unchanged(2)).expect("serialize");
        assert_eq!(unchanged, json!({"type": "unchanged", "index_b": 2}));

        let replace = serde_json::to_value(RenderInstruction::replace(1, 3)).expect("serialize");
        assert_eq!(replace, json!({"type": "replace", "index_a": 1, "index_b": 3}));
    }
}
