//! Tool-operation names exposed to the conversational layer.

/// The closed set of operations a caller can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolOp {
    /// Forecast card for a date or date range.
    GetNoShowRisk,
    /// Prioritized action list for one day.
    GetSchedulingActions,
    /// One patient's risk profile.
    GetPatientRiskProfile,
}

impl ToolOp {
    /// Resolve an operation from its wire name. A closed match: unknown
    /// names are rejected here, never routed dynamically.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "getNoShowRisk" => Some(Self::GetNoShowRisk),
            "getSchedulingActions" => Some(Self::GetSchedulingActions),
            "getPatientRiskProfile" => Some(Self::GetPatientRiskProfile),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::GetNoShowRisk => "getNoShowRisk",
            Self::GetSchedulingActions => "getSchedulingActions",
            Self::GetPatientRiskProfile => "getPatientRiskProfile",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ToolOp;

    #[test]
    fn names_round_trip() {
        for op in [
            ToolOp::GetNoShowRisk,
            ToolOp::GetSchedulingActions,
            ToolOp::GetPatientRiskProfile,
        ] {
            assert_eq!(ToolOp::from_name(op.name()), Some(op));
        }
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(ToolOp::from_name("dropAllTables"), None);
        assert_eq!(ToolOp::from_name(""), None);
        // Matching is exact, not case-folded.
        assert_eq!(ToolOp::from_name("getnoshowrisk"), None);
    }
}
