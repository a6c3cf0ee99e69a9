//! Request-context authorization guards.
//!
//! Checked at the handler boundary, before any store access. Role and
//! identity come exclusively from the verified [`AuthContext`]; nothing here
//! trusts request bodies or client-decoded claims.

use storefront_core::{AccountId, DomainError};

use crate::context::AuthContext;

/// Operator-only operations: catalog mutation, account listing, and
/// unrestricted order-status overrides.
pub fn require_admin(ctx: &AuthContext) -> Result<(), DomainError> {
    if ctx.role().is_admin() {
        Ok(())
    } else {
        Err(DomainError::forbidden("admin access required"))
    }
}

/// Self-service operations: the bearer subject must be the target account.
pub fn require_self(ctx: &AuthContext, account_id: AccountId) -> Result<(), DomainError> {
    if ctx.account_id() == account_id {
        Ok(())
    } else {
        Err(DomainError::forbidden("cannot act on another account"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_auth::Role;

    #[test]
    fn admin_guard_follows_role() {
        let admin = AuthContext::new(AccountId::new(), Role::Admin);
        let user = AuthContext::new(AccountId::new(), Role::User);

        assert!(require_admin(&admin).is_ok());
        assert!(matches!(require_admin(&user), Err(DomainError::Forbidden(_))));
    }

    #[test]
    fn self_guard_compares_account_ids() {
        let id = AccountId::new();
        let ctx = AuthContext::new(id, Role::User);

        assert!(require_self(&ctx, id).is_ok());
        assert!(matches!(
            require_self(&ctx, AccountId::new()),
            Err(DomainError::Forbidden(_))
        ));
    }
}
