use storefront_auth::Role;
use storefront_core::AccountId;

/// Authenticated request context.
///
/// Built by the auth middleware from *verified* token claims and attached to
/// the request; handlers never look at the raw bearer token. This is the
/// only place identity and role come from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AuthContext {
    account_id: AccountId,
    role: Role,
}

impl AuthContext {
    pub fn new(account_id: AccountId, role: Role) -> Self {
        Self { account_id, role }
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn role(&self) -> Role {
        self.role
    }
}
