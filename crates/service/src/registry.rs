//! Wires repositories into services, either over Postgres or in memory.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::auth::{AuthService, CredentialHasher, TokenService};
use crate::company::repository::mock::MockCompanyRepository;
use crate::company::seaorm::SeaOrmCompanyRepository;
use crate::company::{CompanyRepository, CompanyService};
use crate::product::repository::mock::MockProductRepository;
use crate::product::seaorm::SeaOrmProductRepository;
use crate::product::{ProductRepository, ProductService, RandomRegistrationNumbers, RegistrationNumberSource};
use crate::product_sale::repository::mock::MockProductSaleRepository;
use crate::product_sale::seaorm::SeaOrmProductSaleRepository;
use crate::product_sale::{ProductSaleRepository, ProductSaleService};
use crate::role::mock::MockRoleRepository;
use crate::role::{RoleRepository, RoleService, SeaOrmRoleRepository};
use crate::user::repository::mock::MockUserRepository;
use crate::user::seaorm::SeaOrmUserRepository;
use crate::user::{UserRepository, UserService};
use configs::{AuthConfig, CatalogConfig};

pub type DynCompanyService = CompanyService<dyn CompanyRepository, dyn ProductRepository>;
pub type DynProductService = ProductService<dyn ProductRepository, dyn CompanyRepository, dyn ProductSaleRepository>;
pub type DynProductSaleService = ProductSaleService<dyn ProductSaleRepository, dyn ProductRepository>;
pub type DynUserService = UserService<dyn UserRepository, dyn RoleRepository>;
pub type DynRoleService = RoleService<dyn RoleRepository>;
pub type DynAuthService = AuthService<dyn UserRepository>;

/// One repository per entity, shared by every service.
#[derive(Clone)]
pub struct Repositories {
    pub companies: Arc<dyn CompanyRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub sales: Arc<dyn ProductSaleRepository>,
    pub users: Arc<dyn UserRepository>,
    pub roles: Arc<dyn RoleRepository>,
}

impl Repositories {
    pub fn seaorm(db: DatabaseConnection) -> Self {
        Self {
            companies: Arc::new(SeaOrmCompanyRepository::new(db.clone())),
            products: Arc::new(SeaOrmProductRepository::new(db.clone())),
            sales: Arc::new(SeaOrmProductSaleRepository::new(db.clone())),
            users: Arc::new(SeaOrmUserRepository::new(db.clone())),
            roles: Arc::new(SeaOrmRoleRepository::new(db)),
        }
    }

    /// Process-local storage with seeded roles; nothing survives a restart.
    pub fn in_memory() -> Self {
        let products = Arc::new(MockProductRepository::default());
        Self {
            companies: Arc::new(MockCompanyRepository::default()),
            sales: Arc::new(MockProductSaleRepository::new(products.clone())),
            products,
            users: Arc::new(MockUserRepository::default()),
            roles: Arc::new(MockRoleRepository::default()),
        }
    }
}

/// Every business service, built over one set of repositories.
#[derive(Clone)]
pub struct Services {
    pub companies: Arc<DynCompanyService>,
    pub products: Arc<DynProductService>,
    pub sales: Arc<DynProductSaleService>,
    pub users: Arc<DynUserService>,
    pub roles: Arc<DynRoleService>,
    pub auth: Arc<DynAuthService>,
    /// Kept so tests can seed users before the first login.
    pub repositories: Repositories,
}

impl Services {
    pub fn new(repos: Repositories, hasher: Arc<dyn CredentialHasher>, auth: &AuthConfig, catalog: &CatalogConfig) -> Self {
        let numbers: Arc<dyn RegistrationNumberSource> =
            Arc::new(RandomRegistrationNumbers::new(catalog.registration_number_digits));
        let tokens = Arc::new(TokenService::new(auth));
        Self {
            companies: Arc::new(CompanyService::new(repos.companies.clone(), repos.products.clone())),
            products: Arc::new(ProductService::new(
                repos.products.clone(),
                repos.companies.clone(),
                repos.sales.clone(),
                numbers,
                catalog.max_registration_attempts,
            )),
            sales: Arc::new(ProductSaleService::new(repos.sales.clone(), repos.products.clone())),
            users: Arc::new(UserService::new(
                repos.users.clone(),
                repos.roles.clone(),
                hasher.clone(),
                auth.min_password_length,
            )),
            roles: Arc::new(RoleService::new(repos.roles.clone())),
            auth: Arc::new(AuthService::new(repos.users.clone(), hasher, tokens, auth.min_password_length)),
            repositories: repos,
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::auth::password::fast_hasher;
    use crate::company::CompanyInput;
    use crate::pagination::PageRequest;
    use crate::product::ProductInput;
    use crate::product_sale::{NewProductSale, ProductSaleFilter};
    use crate::errors::ServiceError;

    fn services() -> Services {
        let auth = AuthConfig { jwt_secret: "secret".into(), ..AuthConfig::default() };
        Services::new(Repositories::in_memory(), Arc::new(fast_hasher()), &auth, &CatalogConfig::default())
    }

    #[tokio::test]
    async fn in_memory_services_share_storage() {
        let s = services();
        let c = s
            .companies
            .add(CompanyInput { name: "Acme".into(), address: "1 Main St".into(), phone: "555".into() })
            .await
            .unwrap();
        let p = s
            .products
            .add(ProductInput { name: "Widget".into(), company_id: c.id, price: Decimal::new(500, 2) })
            .await
            .unwrap();
        s.sales.add(NewProductSale { product_id: p.id, amount: 2, price_per_unit: None, date: None }).await.unwrap();

        let filter = ProductSaleFilter { product_name: Some("widg".into()), ..Default::default() };
        assert_eq!(s.sales.get_all_paged(&filter, PageRequest::default()).await.unwrap().total_count, 1);

        // the whole chain guards removal top-down
        assert!(matches!(s.companies.remove(c.id).await, Err(ServiceError::Conflict(_))));
        assert!(matches!(s.products.remove(p.id).await, Err(ServiceError::Conflict(_))));
        assert_eq!(s.roles.list().await.unwrap().len(), 3);
    }
}
