//! Role- and ownership-based authorization policy.
//!
//! Evaluated after authentication and strictly before any mutation: a
//! denial guarantees the mutating pipeline step was never reached.

use super::error::Error;
use super::outcome::Outcome;
use super::principal::{Principal, PrincipalId};

/// Operations the policy knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateItem,
    UpdateItem,
    DeleteItem,
    ManageUsers,
}

/// Whether the principal may perform the operation.
///
/// Admins are granted everything. Ownership-scoped mutations are
/// granted to a non-admin only when the principal owns the target.
pub fn allow(principal: &Principal, operation: Operation, target_owner: Option<PrincipalId>) -> bool {
    if principal.is_admin() {
        return true;
    }
    match operation {
        Operation::CreateItem => true,
        Operation::UpdateItem | Operation::DeleteItem => {
            target_owner.is_some_and(|owner| owner == principal.id)
        }
        Operation::ManageUsers => false,
    }
}

/// Pipeline-friendly form of [`allow`], failing with `Forbidden`.
pub fn authorize(
    principal: &Principal,
    operation: Operation,
    target_owner: Option<PrincipalId>,
) -> Outcome<()> {
    if allow(principal, operation, target_owner) {
        Ok(())
    } else {
        Err(Error::forbidden("You are not allowed to perform this action"))
    }
}
