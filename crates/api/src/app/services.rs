use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;

use storefront_accounts::{Account, ProfilePatch};
use storefront_auth::{
    Hs256Jwt, PasswordError, Role, hash_password, validate_password, verify_password,
};
use storefront_catalog::{Product, ProductDraft};
use storefront_core::{AccountId, DomainError, OrderId, ProductId};
use storefront_docstore::{Collection, InMemoryCollection};
use storefront_orders::{CancellationPolicy, LineItemDraft, Order, OrderStatus, ShippingDraft};

/// Lifetime of a login token, in hours.
const TOKEN_TTL_HOURS: i64 = 1;

/// The operations layer: domain rules wired to the document store.
///
/// One collection per record type. Each operation performs at most one
/// persistence call per document; there are no transactions and concurrent
/// writers are last-write-wins, relying on the store's per-document atomic
/// replace.
pub struct AppServices {
    accounts: Arc<dyn Collection<Account>>,
    products: Arc<dyn Collection<Product>>,
    orders: Arc<dyn Collection<Order>>,
    jwt: Arc<Hs256Jwt>,
    cancellation: CancellationPolicy,
}

/// Pick a store backend from the environment.
///
/// Defaults to in-memory collections (dev/test); `USE_PERSISTENT_STORE=true`
/// selects the Postgres backend when the `postgres` feature is compiled in.
pub async fn build_services(jwt: Arc<Hs256Jwt>, cancellation: CancellationPolicy) -> AppServices {
    let use_persistent = std::env::var("USE_PERSISTENT_STORE")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false);

    if use_persistent {
        #[cfg(feature = "postgres")]
        {
            return build_postgres_services(jwt, cancellation).await;
        }
        #[cfg(not(feature = "postgres"))]
        tracing::warn!(
            "USE_PERSISTENT_STORE=true but postgres feature not enabled, falling back to in-memory"
        );
    }

    build_in_memory_services(jwt, cancellation)
}

fn build_in_memory_services(jwt: Arc<Hs256Jwt>, cancellation: CancellationPolicy) -> AppServices {
    AppServices {
        accounts: Arc::new(InMemoryCollection::new()),
        products: Arc::new(InMemoryCollection::new()),
        orders: Arc::new(InMemoryCollection::new()),
        jwt,
        cancellation,
    }
}

#[cfg(feature = "postgres")]
async fn build_postgres_services(
    jwt: Arc<Hs256Jwt>,
    cancellation: CancellationPolicy,
) -> AppServices {
    use storefront_docstore::PgCollection;

    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set when USE_PERSISTENT_STORE=true");

    let pool = sqlx::PgPool::connect(&database_url)
        .await
        .expect("failed to connect to Postgres");

    let accounts = PgCollection::<Account>::new(pool.clone(), "accounts");
    let products = PgCollection::<Product>::new(pool.clone(), "products");
    let orders = PgCollection::<Order>::new(pool, "orders");

    accounts
        .ensure_table()
        .await
        .expect("failed to prepare accounts table");
    products
        .ensure_table()
        .await
        .expect("failed to prepare products table");
    orders
        .ensure_table()
        .await
        .expect("failed to prepare orders table");

    AppServices {
        accounts: Arc::new(accounts),
        products: Arc::new(products),
        orders: Arc::new(orders),
        jwt,
        cancellation,
    }
}

fn password_error(err: PasswordError) -> DomainError {
    match err {
        PasswordError::Weak(msg) => DomainError::validation(msg),
        PasswordError::InvalidCredentials => DomainError::Unauthorized,
        PasswordError::Hash => DomainError::internal("failed to hash password"),
    }
}

impl AppServices {
    pub fn cancellation(&self) -> &CancellationPolicy {
        &self.cancellation
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accounts
    // ─────────────────────────────────────────────────────────────────────

    pub async fn register(&self, email: &str, password: &str) -> Result<Account, DomainError> {
        validate_password(password).map_err(password_error)?;

        let hash = hash_password(password).map_err(password_error)?;
        let account = Account::register(AccountId::new(), email, hash, Utc::now())?;

        if self.accounts.find_by("email", &account.email).await?.is_some() {
            return Err(DomainError::conflict("an account with this email already exists"));
        }

        self.accounts.put(&account.id.to_string(), &account).await?;
        Ok(account)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(String, Account), DomainError> {
        let email = email.trim().to_lowercase();
        let account = self
            .accounts
            .find_by("email", &email)
            .await?
            .ok_or(DomainError::NotFound)?;

        verify_password(password, &account.password_hash).map_err(|_| DomainError::Unauthorized)?;

        let token = self
            .jwt
            .issue(account.id, account.role, Utc::now(), Duration::hours(TOKEN_TTL_HOURS))
            .map_err(|e| DomainError::internal(e.to_string()))?;

        Ok((token, account))
    }

    pub async fn find_account(&self, id: AccountId) -> Result<Option<Account>, DomainError> {
        Ok(self.accounts.get(&id.to_string()).await?)
    }

    pub async fn require_account(&self, id: AccountId) -> Result<Account, DomainError> {
        self.find_account(id).await?.ok_or(DomainError::NotFound)
    }

    pub async fn list_accounts(&self) -> Result<Vec<Account>, DomainError> {
        let mut accounts = self.accounts.list().await?;
        accounts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(accounts)
    }

    pub async fn update_profile(
        &self,
        id: AccountId,
        patch: &ProfilePatch,
    ) -> Result<Account, DomainError> {
        let mut account = self.require_account(id).await?;
        account.apply_patch(patch);
        self.accounts.put(&account.id.to_string(), &account).await?;
        Ok(account)
    }

    pub async fn change_password(
        &self,
        id: AccountId,
        current: &str,
        new: &str,
    ) -> Result<(), DomainError> {
        let mut account = self.require_account(id).await?;

        verify_password(current, &account.password_hash).map_err(|_| DomainError::Unauthorized)?;
        validate_password(new).map_err(password_error)?;

        account.set_password_hash(hash_password(new).map_err(password_error)?);
        self.accounts.put(&account.id.to_string(), &account).await?;
        Ok(())
    }

    pub async fn add_to_cart(
        &self,
        id: AccountId,
        product_id: ProductId,
        quantity: u32,
        unit_price: Decimal,
    ) -> Result<Account, DomainError> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }

        let mut account = self.require_account(id).await?;
        account.add_to_cart(product_id, quantity, unit_price);
        self.accounts.put(&account.id.to_string(), &account).await?;
        Ok(account)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Catalog
    // ─────────────────────────────────────────────────────────────────────

    pub async fn list_products(&self, category: Option<&str>) -> Result<Vec<Product>, DomainError> {
        let mut products = self.products.list().await?;
        if let Some(category) = category {
            products.retain(|p| p.category == category);
        }
        products.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(products)
    }

    pub async fn find_product(&self, id: ProductId) -> Result<Option<Product>, DomainError> {
        Ok(self.products.get(&id.to_string()).await?)
    }

    pub async fn get_product(&self, id: ProductId) -> Result<Product, DomainError> {
        self.find_product(id).await?.ok_or(DomainError::NotFound)
    }

    pub async fn create_product(&self, draft: ProductDraft) -> Result<Product, DomainError> {
        let product = Product::create(ProductId::new(), draft, Utc::now())?;
        self.products.put(&product.id.to_string(), &product).await?;
        Ok(product)
    }

    pub async fn update_product(
        &self,
        id: ProductId,
        draft: ProductDraft,
    ) -> Result<Product, DomainError> {
        let mut product = self.get_product(id).await?;
        product.update(draft, Utc::now())?;
        self.products.put(&product.id.to_string(), &product).await?;
        Ok(product)
    }

    pub async fn delete_product(&self, id: ProductId) -> Result<(), DomainError> {
        if !self.products.remove(&id.to_string()).await? {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Orders
    // ─────────────────────────────────────────────────────────────────────

    pub async fn place_order(
        &self,
        account_id: AccountId,
        items: Vec<LineItemDraft>,
        shipping: ShippingDraft,
    ) -> Result<Order, DomainError> {
        let mut account = self.require_account(account_id).await?;

        let order = Order::place(OrderId::new(), account.id, items, shipping, Utc::now())?;

        // Checkout details become the account's new profile defaults.
        account.remember_shipping(
            &order.shipping.name,
            &order.shipping.phone,
            &order.shipping.address,
        );
        self.accounts.put(&account.id.to_string(), &account).await?;

        self.orders.put(&order.id.to_string(), &order).await?;
        Ok(order)
    }

    pub async fn set_order_status(
        &self,
        order_id: OrderId,
        requested: OrderStatus,
        requester: AccountId,
        role: Role,
    ) -> Result<Order, DomainError> {
        // The requester account must still exist, as on the other order
        // operations.
        self.require_account(requester).await?;

        let mut order = self
            .orders
            .get(&order_id.to_string())
            .await?
            .ok_or(DomainError::NotFound)?;

        order.set_status(requested, requester, role, Utc::now(), &self.cancellation)?;

        self.orders.put(&order.id.to_string(), &order).await?;
        Ok(order)
    }

    /// Orders visible to the requester, newest first: everything for admins,
    /// own orders otherwise.
    pub async fn orders_visible_to(
        &self,
        requester: AccountId,
        role: Role,
    ) -> Result<Vec<Order>, DomainError> {
        let mut orders = self.orders.list().await?;
        if !role.is_admin() {
            orders.retain(|o| o.is_owned_by(requester));
        }
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }
}
