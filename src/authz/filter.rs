use super::engine::Owner;

/// Row predicate for list operations, expressed over the owner columns of a
/// resource. Compiled to a store query by `services::scope`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowFilter {
    Unrestricted,
    OwningGym(i64),
    OwningMember(i64),
    /// Matches no rows. Used for gym admins that have no gym yet.
    Nothing,
}

impl RowFilter {
    pub fn matches(&self, owner: &Owner) -> bool {
        match *self {
            RowFilter::Unrestricted => true,
            RowFilter::OwningGym(gym_id) => owner.gym_id == Some(gym_id),
            RowFilter::OwningMember(member_id) => owner.member_id == Some(member_id),
            RowFilter::Nothing => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches() {
        let owner = Owner::member(7, Some(3));
        assert!(RowFilter::Unrestricted.matches(&owner));
        assert!(RowFilter::OwningGym(3).matches(&owner));
        assert!(!RowFilter::OwningGym(4).matches(&owner));
        assert!(RowFilter::OwningMember(7).matches(&owner));
        assert!(!RowFilter::OwningMember(8).matches(&owner));
        assert!(!RowFilter::Nothing.matches(&owner));
    }

    #[test]
    fn test_unlinked_row_never_matches_a_gym() {
        let orphan = Owner::member(7, None);
        assert!(!RowFilter::OwningGym(3).matches(&orphan));
    }
}
