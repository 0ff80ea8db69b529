// record.rs - Representative/member assignment records

/// Opaque sequence identifier. Compared by exact string match, case-sensitive.
pub type SequenceId = String;

/// One line of the engine's assignment table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentRecord {
    pub representative: SequenceId,
    pub member: SequenceId,
}

impl AssignmentRecord {
    pub fn new(representative: impl Into<SequenceId>, member: impl Into<SequenceId>) -> Self {
        Self {
            representative: representative.into(),
            member: member.into(),
        }
    }

    /// Representative listed as its own member
    pub fn is_self_referential(&self) -> bool {
        self.representative == self.member
    }
}
