use uuid::Uuid;

/// Authenticated caller as seen by the use cases. Token handling happens at
/// the HTTP edge; the core only sees the subject and the staff decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub is_staff: bool,
}

impl Actor {
    pub fn user(user_id: Uuid) -> Self {
        Self {
            user_id,
            is_staff: false,
        }
    }

    pub fn staff(user_id: Uuid) -> Self {
        Self {
            user_id,
            is_staff: true,
        }
    }

    /// Owner-or-staff rule applied to every plan-scoped operation.
    pub fn can_access(&self, owner_id: Uuid) -> bool {
        self.is_staff || self.user_id == owner_id
    }

    /// `None` for staff (no restriction), the caller's id otherwise.
    pub fn owner_scope(&self) -> Option<Uuid> {
        if self.is_staff {
            None
        } else {
            Some(self.user_id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_and_staff_can_access_a_plan() {
        let owner = Uuid::new_v4();
        assert!(Actor::user(owner).can_access(owner));
        assert!(Actor::staff(Uuid::new_v4()).can_access(owner));
        assert!(!Actor::user(Uuid::new_v4()).can_access(owner));
    }

    #[test]
    fn staff_are_not_scoped_to_an_owner() {
        let id = Uuid::new_v4();
        assert_eq!(Actor::staff(id).owner_scope(), None);
        assert_eq!(Actor::user(id).owner_scope(), Some(id));
    }
}
