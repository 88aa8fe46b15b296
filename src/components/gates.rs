//! Combinational logic gates.

use super::registry::PartType;
use crate::circuit::PinInputs;

/// The boolean function of a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateKind {
    And,
    Or,
    Not,
    Nand,
    Nor,
    Xor,
}

impl GateKind {
    /// Gate kind for a catalog part, if it is a gate.
    pub fn from_part(part: PartType) -> Option<Self> {
        match part {
            PartType::And => Some(Self::And),
            PartType::Or => Some(Self::Or),
            PartType::Not => Some(Self::Not),
            PartType::Nand => Some(Self::Nand),
            PartType::Nor => Some(Self::Nor),
            PartType::Xor => Some(Self::Xor),
            _ => None,
        }
    }

    /// The catalog part for this gate.
    pub fn part(&self) -> PartType {
        match self {
            Self::And => PartType::And,
            Self::Or => PartType::Or,
            Self::Not => PartType::Not,
            Self::Nand => PartType::Nand,
            Self::Nor => PartType::Nor,
            Self::Xor => PartType::Xor,
        }
    }

    /// Truth function. `Not` ignores `b`.
    pub fn truth(&self, a: bool, b: bool) -> bool {
        match self {
            Self::And => a && b,
            Self::Or => a || b,
            Self::Not => !a,
            Self::Nand => !(a && b),
            Self::Nor => !(a || b),
            Self::Xor => a != b,
        }
    }
}

/// A logic gate. Inputs are `A`/`B` (or `IN` for `NOT`); output is `OUT`.
#[derive(Debug, Clone, PartialEq)]
pub struct Gate {
    pub kind: GateKind,
}

impl Gate {
    /// Create a new gate.
    pub fn new(kind: GateKind) -> Self {
        Self { kind }
    }

    /// Output level for the given inputs. Nonzero reads as true.
    pub fn output(&self, inputs: PinInputs<'_>) -> f64 {
        let out = match self.kind {
            GateKind::Not => self.kind.truth(inputs.is_high("IN"), false),
            _ => self.kind.truth(inputs.is_high("A"), inputs.is_high("B")),
        };
        if out {
            1.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{ComponentId, PinValues};

    fn eval(kind: GateKind, a: f64, b: f64) -> f64 {
        let id = ComponentId::new("G");
        let mut values = PinValues::new();
        values.insert(&id, "A", a);
        values.insert(&id, "B", b);
        values.insert(&id, "IN", a);
        Gate::new(kind).output(values.for_component(&id))
    }

    #[test]
    fn test_truth_tables() {
        let cases = [(0.0, 0.0), (0.0, 1.0), (1.0, 0.0), (1.0, 1.0)];
        let table = |kind| cases.map(|(a, b)| eval(kind, a, b));

        assert_eq!(table(GateKind::And), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(table(GateKind::Or), [0.0, 1.0, 1.0, 1.0]);
        assert_eq!(table(GateKind::Nand), [1.0, 1.0, 1.0, 0.0]);
        assert_eq!(table(GateKind::Nor), [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(table(GateKind::Xor), [0.0, 1.0, 1.0, 0.0]);
        assert_eq!(table(GateKind::Not), [1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_analog_inputs_read_as_boolean() {
        assert_eq!(eval(GateKind::And, 0.4, 0.9), 1.0);
        assert_eq!(eval(GateKind::Xor, 0.4, 0.9), 0.0);
    }

    #[test]
    fn test_missing_inputs_read_low() {
        let gate = Gate::new(GateKind::Nor);
        assert_eq!(gate.output(PinInputs::EMPTY), 1.0);
        assert_eq!(Gate::new(GateKind::Not).output(PinInputs::EMPTY), 1.0);
    }
}
